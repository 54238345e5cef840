//! Physiological/activity state classification.
//!
//! Maps a heart-rate reading plus the current variability estimate onto one
//! of six discrete states via an ordered rule chain. Every threshold is a
//! strict `>`, so each bracket owns its upper bound: a reading of exactly
//! 150 bpm falls in the 100-150 bracket, exactly 30 ms HRV falls in the
//! low-variability branch.

use serde::{Deserialize, Serialize};

/// Discrete physiological/activity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityState {
    IntenseExercise,
    Stressed,
    LightExercise,
    Excited,
    RelaxedOrCalm,
    FatiguedOrLowActivity,
}

impl std::fmt::Display for ActivityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ActivityState::IntenseExercise => "intense exercise",
            ActivityState::Stressed => "stressed",
            ActivityState::LightExercise => "light exercise",
            ActivityState::Excited => "excited",
            ActivityState::RelaxedOrCalm => "relaxed or calm",
            ActivityState::FatiguedOrLowActivity => "fatigued or low activity",
        };
        write!(f, "{label}")
    }
}

/// Classify a heart rate (bpm) and HRV (ms) into an activity state.
///
/// Pure and total: exactly one state for every input.
pub fn classify(heart_rate: u32, hrv_ms: f64) -> ActivityState {
    if heart_rate > 150 {
        if hrv_ms > 30.0 {
            ActivityState::IntenseExercise
        } else {
            ActivityState::Stressed
        }
    } else if heart_rate > 100 {
        if hrv_ms > 30.0 {
            ActivityState::LightExercise
        } else {
            ActivityState::Excited
        }
    } else if heart_rate > 70 {
        ActivityState::RelaxedOrCalm
    } else {
        ActivityState::FatiguedOrLowActivity
    }
}
