//! Track catalog client.
//!
//! Resolves a genre to a list of playable preview tracks via a
//! Deezer-compatible search API. The query is constrained to the genre and
//! a bounded result count; selection among the candidates is a separate
//! pure function so tests can drive it with a seeded random source.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Catalog search configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Search API base URL
    pub base_url: String,
    /// Maximum number of candidates to request per search
    pub result_limit: u32,
}

impl CatalogConfig {
    /// Create a new catalog configuration.
    pub fn new(base_url: impl Into<String>, result_limit: u32) -> Self {
        Self {
            base_url: base_url.into(),
            result_limit,
        }
    }

    /// Get the search endpoint URL.
    pub fn search_url(&self) -> String {
        format!("{}/search", self.base_url.trim_end_matches('/'))
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.deezer.com".to_string(),
            result_limit: 50,
        }
    }
}

/// Catalog client error types.
#[derive(Debug)]
pub enum CatalogError {
    /// Search succeeded but returned no tracks for the genre
    NoResults { genre: String },
    /// Service returned a non-success status
    Upstream { status: u16 },
    /// Network/HTTP error
    Network(String),
    /// Response body could not be decoded
    Decode(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::NoResults { genre } => {
                write!(f, "No tracks found for genre \"{genre}\"")
            }
            CatalogError::Upstream { status } => {
                write!(f, "Catalog service error (status {status})")
            }
            CatalogError::Network(msg) => write!(f, "Catalog network error: {msg}"),
            CatalogError::Decode(msg) => write!(f, "Catalog decode error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Artist metadata attached to a track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

/// A playable search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    /// Preview stream URL
    pub preview: String,
    pub artist: Artist,
}

/// Wire shape of the search response.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Track>,
}

/// Anything that can resolve a genre to candidate tracks.
///
/// The pipeline depends on this seam rather than a concrete client so tests
/// can substitute a stub catalog.
pub trait TrackSource {
    fn search(&self, genre: &str) -> Result<Vec<Track>, CatalogError>;
}

/// Async catalog client.
pub struct CatalogClient {
    config: CatalogConfig,
    client: reqwest::Client,
}

impl CatalogClient {
    /// Create a new catalog client.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Search the catalog for tracks in the given genre.
    ///
    /// Guaranteed nonempty on success: an empty result set is reported as
    /// `NoResults`, distinct from transport failure.
    pub async fn search(&self, genre: &str) -> Result<Vec<Track>, CatalogError> {
        let query = format!("genre:\"{genre}\"");
        let response = self
            .client
            .get(self.config.search_url())
            .query(&[
                ("q", query.as_str()),
                ("limit", &self.config.result_limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Upstream {
                status: status.as_u16(),
            });
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))?;

        if body.data.is_empty() {
            return Err(CatalogError::NoResults {
                genre: genre.to_string(),
            });
        }

        Ok(body.data)
    }
}

/// Blocking catalog client for use from the ingestion loop's thread.
pub struct BlockingCatalogClient {
    inner: CatalogClient,
    runtime: tokio::runtime::Runtime,
}

impl BlockingCatalogClient {
    /// Create a new blocking catalog client.
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CatalogError::Network(format!("Failed to create runtime: {e}")))?;

        Ok(Self {
            inner: CatalogClient::new(config)?,
            runtime,
        })
    }

    /// Search the catalog for tracks in the given genre.
    pub fn search(&self, genre: &str) -> Result<Vec<Track>, CatalogError> {
        self.runtime.block_on(self.inner.search(genre))
    }
}

impl TrackSource for BlockingCatalogClient {
    fn search(&self, genre: &str) -> Result<Vec<Track>, CatalogError> {
        BlockingCatalogClient::search(self, genre)
    }
}

/// Pick one track uniformly at random from the candidates.
pub fn pick_track<'a, R: Rng + ?Sized>(tracks: &'a [Track], rng: &mut R) -> Option<&'a Track> {
    tracks.choose(rng)
}
