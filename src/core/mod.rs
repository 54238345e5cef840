//! Core signal-to-decision stages.
//!
//! This module contains:
//! - Windowed HRV (RMSSD) estimation from raw heart-rate samples
//! - Activity state classification from (heart rate, HRV)
//! - The debounced genre policy that turns states into playback decisions

pub mod classifier;
pub mod hrv;
pub mod policy;

// Re-export commonly used types
pub use classifier::{classify, ActivityState};
pub use hrv::{HrvEstimator, InvalidSampleError, INITIAL_HRV_MS, WINDOW_SIZE};
pub use policy::{genre_for, GenrePolicy, PolicyAction, DEFAULT_GENRE};
