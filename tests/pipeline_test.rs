//! End-to-end tests for the sample-to-playback pipeline.

use chrono::{DateTime, Duration, Utc};
use pulsetune::catalog::{Artist, CatalogError, Track, TrackSource};
use pulsetune::playback::{AudioSink, PlaybackError};
use pulsetune::sensor::Sample;
use pulsetune::stats::create_shared_stats;
use pulsetune::Pipeline;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Catalog stub with a fixed track list per genre; unlisted genres come
/// back empty.
struct FixtureCatalog {
    by_genre: HashMap<String, Vec<Track>>,
}

impl FixtureCatalog {
    fn new(genres: &[(&str, &[&str])]) -> Self {
        let by_genre = genres
            .iter()
            .map(|(genre, titles)| {
                let tracks = titles
                    .iter()
                    .map(|title| Track {
                        title: title.to_string(),
                        preview: format!("https://cdn.example/{}.mp3", title.replace(' ', "-")),
                        artist: Artist {
                            name: format!("{title} Band"),
                        },
                    })
                    .collect();
                (genre.to_string(), tracks)
            })
            .collect();
        Self { by_genre }
    }
}

impl TrackSource for FixtureCatalog {
    fn search(&self, genre: &str) -> Result<Vec<Track>, CatalogError> {
        match self.by_genre.get(genre) {
            Some(tracks) if !tracks.is_empty() => Ok(tracks.clone()),
            _ => Err(CatalogError::NoResults {
                genre: genre.to_string(),
            }),
        }
    }
}

/// Sink that records every start/stop in order.
#[derive(Clone, Default)]
struct RecordingSink {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl AudioSink for RecordingSink {
    fn start(&mut self, url: &str) -> Result<(), PlaybackError> {
        self.calls.lock().unwrap().push(format!("start {url}"));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        self.calls.lock().unwrap().push("stop".to_string());
        Ok(())
    }
}

fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-06-01T08:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// Alternating high heart rates keep every reading above 150 bpm while the
/// RR intervals swing enough for RMSSD to land well above 30 ms.
fn intense_rate(i: i64) -> u32 {
    if i % 2 == 0 {
        155
    } else {
        180
    }
}

#[test]
fn test_intense_exercise_switch_locks_then_replays() {
    let catalog = FixtureCatalog::new(&[("Rap/Hip Hop", &["Work It"][..])]);
    let sink = RecordingSink::default();
    let stats = create_shared_stats();
    let mut pipeline = Pipeline::new(catalog, sink.clone(), stats.clone()).with_seed(3);

    // 30 samples, one per second. The first sample already classifies as
    // intense exercise (placeholder HRV is 50 ms) and switches once; every
    // later sample inside the lock window is suppressed.
    for i in 0..30 {
        let sample = Sample::at(t0() + Duration::seconds(i), intense_rate(i));
        pipeline.process_sample(&sample);
    }

    assert_eq!(stats.snapshot().genre_switches, 1);
    assert_eq!(stats.snapshot().replays, 0);
    assert_eq!(stats.snapshot().windows_completed, 1);
    assert!(pipeline.current_hrv() > 30.0);
    assert_eq!(pipeline.session().genre.as_deref(), Some("Rap/Hip Hop"));
    assert!(pipeline.is_locked(t0() + Duration::seconds(29)));

    // At t+31s the lock has lapsed and the track is old enough: replay.
    pipeline.process_sample(&Sample::at(t0() + Duration::seconds(31), 160));
    assert_eq!(stats.snapshot().replays, 1);

    // One stop between the two starts, final state on the second start.
    let calls = sink.calls();
    assert_eq!(calls[0], "start https://cdn.example/Work-It.mp3");
    assert_eq!(calls[1], "stop");
    assert!(calls[2].starts_with("start "));
    assert_eq!(calls.len(), 3);
}

#[test]
fn test_same_genre_within_window_switches_once() {
    let catalog = FixtureCatalog::new(&[("Jazz", &["Take Five", "So What"][..])]);
    let stats = create_shared_stats();
    let mut pipeline = Pipeline::new(catalog, RecordingSink::default(), stats.clone()).with_seed(9);

    // 20 relaxed samples over 20 seconds, all mapping to Jazz.
    for i in 0..20 {
        pipeline.process_sample(&Sample::at(t0() + Duration::seconds(i), 85));
    }

    assert_eq!(stats.snapshot().genre_switches, 1);
    assert_eq!(stats.snapshot().samples_processed, 20);
}

#[test]
fn test_replay_not_due_before_interval() {
    let catalog = FixtureCatalog::new(&[("Jazz", &["Take Five"][..])]);
    let stats = create_shared_stats();
    let mut pipeline = Pipeline::new(catalog, RecordingSink::default(), stats.clone()).with_seed(9);

    pipeline.process_sample(&Sample::at(t0(), 85));
    pipeline.process_sample(&Sample::at(t0() + Duration::seconds(29), 85));

    assert_eq!(stats.snapshot().genre_switches, 1);
    assert_eq!(stats.snapshot().replays, 0);
}

#[test]
fn test_empty_catalog_preserves_current_playback() {
    // Rap resolves; Jazz comes back empty.
    let catalog = FixtureCatalog::new(&[("Rap/Hip Hop", &["Work It"][..]), ("Jazz", &[][..])]);
    let sink = RecordingSink::default();
    let stats = create_shared_stats();
    let mut pipeline = Pipeline::new(catalog, sink.clone(), stats.clone()).with_seed(3);

    // Start playing rap.
    pipeline.process_sample(&Sample::at(t0(), 160));
    assert_eq!(pipeline.session().genre.as_deref(), Some("Rap/Hip Hop"));

    // After the lock lapses, a calm sample wants Jazz, which has no tracks.
    let later = t0() + Duration::seconds(35);
    pipeline.process_sample(&Sample::at(later, 85));

    assert_eq!(stats.snapshot().catalog_errors, 1);
    // The rap session is untouched and the lock re-engaged.
    assert_eq!(pipeline.session().genre.as_deref(), Some("Rap/Hip Hop"));
    assert!(pipeline.is_locked(later + Duration::seconds(1)));

    // Further calm samples inside the new lock don't hammer the catalog.
    pipeline.process_sample(&Sample::at(later + Duration::seconds(5), 85));
    assert_eq!(stats.snapshot().catalog_errors, 1);

    // No stop was issued for the failed switch.
    let stops = sink.calls().iter().filter(|c| *c == "stop").count();
    assert_eq!(stops, 0);
}

#[test]
fn test_state_change_during_lock_is_suppressed() {
    let catalog = FixtureCatalog::new(&[
        ("Jazz", &["Take Five"][..]),
        ("Rap/Hip Hop", &["Work It"][..]),
    ]);
    let stats = create_shared_stats();
    let mut pipeline = Pipeline::new(catalog, RecordingSink::default(), stats.clone()).with_seed(3);

    pipeline.process_sample(&Sample::at(t0(), 85));
    assert_eq!(pipeline.session().genre.as_deref(), Some("Jazz"));

    // Intense reading 10s later: still locked, no switch.
    pipeline.process_sample(&Sample::at(t0() + Duration::seconds(10), 160));
    assert_eq!(pipeline.session().genre.as_deref(), Some("Jazz"));
    assert_eq!(stats.snapshot().genre_switches, 1);

    // Same reading after expiry switches.
    pipeline.process_sample(&Sample::at(t0() + Duration::seconds(31), 160));
    assert_eq!(pipeline.session().genre.as_deref(), Some("Rap/Hip Hop"));
    assert_eq!(stats.snapshot().genre_switches, 2);
}

#[test]
fn test_invalid_samples_do_not_stall_the_stream() {
    let catalog = FixtureCatalog::new(&[("Jazz", &["Take Five"][..])]);
    let stats = create_shared_stats();
    let mut pipeline = Pipeline::new(catalog, RecordingSink::default(), stats.clone()).with_seed(3);

    pipeline.process_sample(&Sample::at(t0(), 0));
    pipeline.process_sample(&Sample::at(t0() + Duration::seconds(1), 85));

    assert_eq!(stats.snapshot().invalid_samples, 1);
    assert_eq!(stats.snapshot().samples_processed, 1);
    assert_eq!(pipeline.session().genre.as_deref(), Some("Jazz"));
}
