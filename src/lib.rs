//! Pulsetune - heart-rate adaptive music agent.
//!
//! This library turns a live stream of wearable heart-rate samples into
//! playback decisions: it estimates heart-rate variability over fixed
//! windows, classifies the wearer's activity state, and switches the music
//! genre accordingly, with a cooldown lock so noisy per-sample
//! classifications cannot thrash playback.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Pulsetune                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌──────────┐   ┌────────────┐   ┌─────────┐ │
//! │  │  Sensor  │──▶│   HRV    │──▶│ Classifier │──▶│  Genre  │ │
//! │  │ (channel)│   │ (30-spl  │   │  (pure)    │   │ Policy  │ │
//! │  └──────────┘   │  window) │   └────────────┘   └────┬────┘ │
//! │                 └──────────┘                         │      │
//! │                                  ┌─────────┐   ┌─────▼────┐ │
//! │                                  │Playback │◀──│ Catalog  │ │
//! │                                  │ Control │   │  Search  │ │
//! │                                  └─────────┘   └──────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Samples are handed off from the transport thread through a bounded
//! channel and consumed serially by one [`Pipeline`], so a slow catalog
//! fetch or playback start delays later samples but never drops or
//! reorders them.
//!
//! # Example
//!
//! ```no_run
//! use pulsetune::catalog::{BlockingCatalogClient, CatalogConfig};
//! use pulsetune::playback::NullSink;
//! use pulsetune::sensor::Sample;
//! use pulsetune::stats::create_shared_stats;
//! use pulsetune::Pipeline;
//!
//! let catalog = BlockingCatalogClient::new(CatalogConfig::default()).unwrap();
//! let mut pipeline = Pipeline::new(catalog, NullSink, create_shared_stats());
//!
//! // One call per reading delivered by the transport.
//! pipeline.process_sample(&Sample::new(85));
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod pipeline;
pub mod playback;
pub mod sensor;
pub mod stats;

// Re-export key types at crate root for convenience
pub use catalog::{pick_track, BlockingCatalogClient, CatalogConfig, CatalogError, Track, TrackSource};
pub use config::Config;
pub use core::{classify, ActivityState, GenrePolicy, HrvEstimator, PolicyAction};
pub use pipeline::Pipeline;
pub use playback::{AudioSink, NullSink, PlaybackController, PlaybackError, ProcessSink};
pub use sensor::{Sample, SensorConfig, SimulatedSensor};
pub use stats::{SessionStats, SharedSessionStats, StatsSnapshot};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
