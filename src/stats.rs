//! Session accounting.
//!
//! Lightweight counters describing what the agent did this session: samples
//! seen, windows consumed, switches and replays performed, errors recovered
//! from. Counters are atomic so the ingestion loop and the shutdown path can
//! share one instance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Counters for the current session.
#[derive(Debug)]
pub struct SessionStats {
    /// Samples accepted into the pipeline
    samples_processed: AtomicU64,
    /// Samples rejected as invalid readings
    invalid_samples: AtomicU64,
    /// HRV windows consumed
    windows_completed: AtomicU64,
    /// Genre switches performed
    genre_switches: AtomicU64,
    /// Same-genre replays performed
    replays: AtomicU64,
    /// Catalog lookups that failed or came back empty
    catalog_errors: AtomicU64,
    /// Playback start/stop failures
    playback_errors: AtomicU64,
    /// Unique identifier for this session
    session_id: Uuid,
    /// Session start time
    session_start: DateTime<Utc>,
    /// Path for persisting cumulative stats
    persist_path: Option<PathBuf>,
}

impl SessionStats {
    /// Create a new stats instance.
    pub fn new() -> Self {
        Self {
            samples_processed: AtomicU64::new(0),
            invalid_samples: AtomicU64::new(0),
            windows_completed: AtomicU64::new(0),
            genre_switches: AtomicU64::new(0),
            replays: AtomicU64::new(0),
            catalog_errors: AtomicU64::new(0),
            playback_errors: AtomicU64::new(0),
            session_id: Uuid::new_v4(),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create a stats instance that persists cumulative counters.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut stats = Self::new();
        stats.persist_path = Some(path);

        if let Err(e) = stats.load() {
            eprintln!("Note: Could not load previous session stats: {e}");
        }

        stats
    }

    pub fn record_sample(&self) {
        self.samples_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalid_sample(&self) {
        self.invalid_samples.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_window_completed(&self) {
        self.windows_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_genre_switch(&self) {
        self.genre_switches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_replay(&self) {
        self.replays.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_catalog_error(&self) {
        self.catalog_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_playback_error(&self) {
        self.playback_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the session identifier.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Get the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            samples_processed: self.samples_processed.load(Ordering::Relaxed),
            invalid_samples: self.invalid_samples.load(Ordering::Relaxed),
            windows_completed: self.windows_completed.load(Ordering::Relaxed),
            genre_switches: self.genre_switches.load(Ordering::Relaxed),
            replays: self.replays.load(Ordering::Relaxed),
            catalog_errors: self.catalog_errors.load(Ordering::Relaxed),
            playback_errors: self.playback_errors.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.snapshot();
        format!(
            "Session Statistics:\n\
             - Samples processed: {}\n\
             - Invalid samples dropped: {}\n\
             - HRV windows completed: {}\n\
             - Genre switches: {}\n\
             - Replays: {}\n\
             - Catalog errors: {}\n\
             - Playback errors: {}\n\
             - Session duration: {} seconds",
            stats.samples_processed,
            stats.invalid_samples,
            stats.windows_completed,
            stats.genre_switches,
            stats.replays,
            stats.catalog_errors,
            stats.playback_errors,
            stats.session_duration_secs
        )
    }

    /// Save stats to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.snapshot();
            let persisted = PersistedStats {
                samples_processed: stats.samples_processed,
                invalid_samples: stats.invalid_samples,
                windows_completed: stats.windows_completed,
                genre_switches: stats.genre_switches,
                replays: stats.replays,
                catalog_errors: stats.catalog_errors,
                playback_errors: stats.playback_errors,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load stats from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedStats =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.samples_processed
                    .store(persisted.samples_processed, Ordering::Relaxed);
                self.invalid_samples
                    .store(persisted.invalid_samples, Ordering::Relaxed);
                self.windows_completed
                    .store(persisted.windows_completed, Ordering::Relaxed);
                self.genre_switches
                    .store(persisted.genre_switches, Ordering::Relaxed);
                self.replays.store(persisted.replays, Ordering::Relaxed);
                self.catalog_errors
                    .store(persisted.catalog_errors, Ordering::Relaxed);
                self.playback_errors
                    .store(persisted.playback_errors, Ordering::Relaxed);
            }
        }
        Ok(())
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of session statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub samples_processed: u64,
    pub invalid_samples: u64,
    pub windows_completed: u64,
    pub genre_switches: u64,
    pub replays: u64,
    pub catalog_errors: u64,
    pub playback_errors: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Stats format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedStats {
    samples_processed: u64,
    invalid_samples: u64,
    windows_completed: u64,
    genre_switches: u64,
    replays: u64,
    catalog_errors: u64,
    playback_errors: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared stats handle.
pub type SharedSessionStats = Arc<SessionStats>;

/// Create a new shared stats instance.
pub fn create_shared_stats() -> SharedSessionStats {
    Arc::new(SessionStats::new())
}

/// Create a new shared stats instance with persistence.
pub fn create_shared_stats_with_persistence(path: PathBuf) -> SharedSessionStats {
    Arc::new(SessionStats::with_persistence(path))
}
