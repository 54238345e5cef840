//! Genre selection policy and switch debouncing.
//!
//! Each activity state maps to a fixed genre. The policy decides, once per
//! processed sample, whether playback should switch genre or refresh the
//! current one, and suppresses both while a lock engaged by the previous
//! decision has not yet expired. The lock expires lazily: it is checked and
//! cleared on the next evaluated sample, not by a timer.

use crate::core::classifier::ActivityState;
use chrono::{DateTime, Duration, Utc};

/// Fallback genre when no mapping applies.
pub const DEFAULT_GENRE: &str = "Classical";

/// Map an activity state to its music genre.
pub fn genre_for(state: ActivityState) -> &'static str {
    match state {
        ActivityState::IntenseExercise => "Rap/Hip Hop",
        ActivityState::RelaxedOrCalm => "Jazz",
        ActivityState::LightExercise => "Dance",
        ActivityState::FatiguedOrLowActivity => "Blues",
        ActivityState::Stressed => DEFAULT_GENRE,
        ActivityState::Excited => "Pop",
    }
}

/// A playback decision emitted by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    /// Start playing a different genre.
    Switch(&'static str),
    /// Refresh the track within the current genre.
    Replay(&'static str),
}

impl PolicyAction {
    pub fn genre(&self) -> &'static str {
        match self {
            PolicyAction::Switch(genre) | PolicyAction::Replay(genre) => genre,
        }
    }
}

/// Debounced genre policy.
///
/// Engages its lock the moment it emits an action, before any track fetch
/// or playback happens, so a failed fetch still backs off for the full lock
/// window instead of retrying on every sample.
pub struct GenrePolicy {
    locked_until: Option<DateTime<Utc>>,
    lock_duration: Duration,
    replay_interval: Duration,
}

impl GenrePolicy {
    /// Create a policy with the default 30-second lock and replay interval.
    pub fn new() -> Self {
        Self::with_intervals(Duration::seconds(30), Duration::seconds(30))
    }

    /// Create a policy with custom lock and replay intervals.
    pub fn with_intervals(lock_duration: Duration, replay_interval: Duration) -> Self {
        Self {
            locked_until: None,
            lock_duration,
            replay_interval,
        }
    }

    /// Evaluate one sample's classification against the playback state.
    ///
    /// `current_genre` and `last_started` describe the live playback
    /// session; `now` is the sample's timestamp.
    pub fn evaluate(
        &mut self,
        state: ActivityState,
        current_genre: Option<&str>,
        last_started: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<PolicyAction> {
        if let Some(expires_at) = self.locked_until {
            if now >= expires_at {
                self.locked_until = None;
            } else {
                // Locked: even a changed classification stays suppressed.
                return None;
            }
        }

        let target = genre_for(state);
        match current_genre {
            Some(playing) if playing == target => {
                let due = last_started.is_some_and(|started| now - started >= self.replay_interval);
                if due {
                    self.locked_until = Some(now + self.lock_duration);
                    Some(PolicyAction::Replay(target))
                } else {
                    None
                }
            }
            _ => {
                self.locked_until = Some(now + self.lock_duration);
                Some(PolicyAction::Switch(target))
            }
        }
    }

    /// Whether the lock is engaged at the given instant.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|expires_at| now < expires_at)
    }
}

impl Default for GenrePolicy {
    fn default() -> Self {
        Self::new()
    }
}
