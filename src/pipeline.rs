//! The sample-to-playback pipeline.
//!
//! One `process_sample` call per incoming reading, advancing the stages in
//! order: HRV estimation, state classification, genre policy, then (when the
//! policy emits an action) the slow track fetch and playback start. Only
//! that last step blocks; samples arriving meanwhile queue in the transport
//! channel and are processed afterwards in arrival order.
//!
//! Every failure past input validation is recoverable: it is reported,
//! counted, and the loop moves on to the next sample. Decisions are made
//! against the sample's own timestamp, which keeps the policy deterministic
//! when samples are replayed under test.

use crate::catalog::{pick_track, TrackSource};
use crate::core::{classify, GenrePolicy, HrvEstimator, PolicyAction};
use crate::playback::{AudioSink, PlaybackController, PlaybackSession};
use crate::sensor::Sample;
use crate::stats::SharedSessionStats;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Owns every stage of the pipeline plus the live playback session.
pub struct Pipeline<T: TrackSource, S: AudioSink> {
    hrv: HrvEstimator,
    policy: GenrePolicy,
    source: T,
    playback: PlaybackController<S>,
    stats: SharedSessionStats,
    rng: StdRng,
}

impl<T: TrackSource, S: AudioSink> Pipeline<T, S> {
    /// Create a pipeline with default windowing and lock intervals.
    pub fn new(source: T, sink: S, stats: SharedSessionStats) -> Self {
        Self {
            hrv: HrvEstimator::new(),
            policy: GenrePolicy::new(),
            source,
            playback: PlaybackController::new(sink),
            stats,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a pipeline with explicit windowing and interval settings.
    pub fn with_settings(
        source: T,
        sink: S,
        stats: SharedSessionStats,
        window_size: usize,
        initial_hrv_ms: f64,
        genre_lock: Duration,
        replay_interval: Duration,
    ) -> Self {
        Self {
            hrv: HrvEstimator::with_window(window_size, initial_hrv_ms),
            policy: GenrePolicy::with_intervals(genre_lock, replay_interval),
            source,
            playback: PlaybackController::new(sink),
            stats,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Replace the selection RNG with a seeded one (tests).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The current HRV estimate in milliseconds.
    pub fn current_hrv(&self) -> f64 {
        self.hrv.current()
    }

    /// The live playback session.
    pub fn session(&self) -> &PlaybackSession {
        self.playback.session()
    }

    /// Whether the genre lock is engaged at the given instant.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.policy.is_locked(now)
    }

    /// Process one incoming sample through all stages.
    pub fn process_sample(&mut self, sample: &Sample) {
        let now = sample.timestamp;

        match self.hrv.observe(sample.heart_rate) {
            Err(e) => {
                eprintln!("Dropping sample: {e}");
                self.stats.record_invalid_sample();
                return;
            }
            Ok(Some(hrv)) => {
                self.stats.record_window_completed();
                println!("[{}] HRV window complete: {hrv:.1} ms", now.format("%H:%M:%S"));
            }
            Ok(None) => {}
        }
        self.stats.record_sample();

        let state = classify(sample.heart_rate, self.hrv.current());

        let session = self.playback.session();
        let action = self
            .policy
            .evaluate(state, session.genre.as_deref(), session.started_at, now);

        if let Some(action) = action {
            self.run_action(action, now);
        }
    }

    /// Stop playback on shutdown.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.playback.stop() {
            eprintln!("Warning: {e}");
            self.stats.record_playback_error();
        }
    }

    /// Resolve and start a track for the emitted action.
    ///
    /// The genre lock is already engaged by the policy at this point, so a
    /// failed search or start backs off for the full lock window instead of
    /// retrying on the next sample.
    fn run_action(&mut self, action: PolicyAction, now: DateTime<Utc>) {
        let genre = action.genre();
        match action {
            PolicyAction::Switch(_) => println!("Switching to genre: {genre}"),
            PolicyAction::Replay(_) => println!("Replaying genre: {genre}"),
        }

        let tracks = match self.source.search(genre) {
            Ok(tracks) => tracks,
            Err(e) => {
                eprintln!("Skipping {genre}: {e}");
                self.stats.record_catalog_error();
                return;
            }
        };

        let Some(track) = pick_track(&tracks, &mut self.rng) else {
            self.stats.record_catalog_error();
            return;
        };
        let (title, artist, url) = (
            track.title.clone(),
            track.artist.name.clone(),
            track.preview.clone(),
        );

        match self.playback.play(genre, &url, now) {
            Ok(()) => {
                println!("Now playing: {title} by {artist}");
                match action {
                    PolicyAction::Switch(_) => self.stats.record_genre_switch(),
                    PolicyAction::Replay(_) => self.stats.record_replay(),
                }
            }
            Err(e) => {
                eprintln!("{e}");
                self.stats.record_playback_error();
            }
        }
    }
}
