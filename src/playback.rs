//! Playback session ownership.
//!
//! The controller owns exactly one live session at a time: starting a new
//! track always stops the previous one first, and session metadata (genre,
//! URL, start time) is only recorded once the sink confirms the start. The
//! recorded start time is what the genre policy reads for its replay check.

use chrono::{DateTime, Utc};
use std::process::{Child, Command, Stdio};

/// Playback failure surfaced by a sink.
#[derive(Debug)]
pub enum PlaybackError {
    StartFailed(String),
    StopFailed(String),
}

impl std::fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackError::StartFailed(msg) => write!(f, "Playback start failed: {msg}"),
            PlaybackError::StopFailed(msg) => write!(f, "Playback stop failed: {msg}"),
        }
    }
}

impl std::error::Error for PlaybackError {}

/// The media engine seam: start a stream URL, stop whatever is playing.
pub trait AudioSink {
    fn start(&mut self, url: &str) -> Result<(), PlaybackError>;
    fn stop(&mut self) -> Result<(), PlaybackError>;
}

impl AudioSink for Box<dyn AudioSink> {
    fn start(&mut self, url: &str) -> Result<(), PlaybackError> {
        self.as_mut().start(url)
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        self.as_mut().stop()
    }
}

/// A sink that only logs. Default for simulated runs and tests.
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn start(&mut self, url: &str) -> Result<(), PlaybackError> {
        println!("[audio] start {url}");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        println!("[audio] stop");
        Ok(())
    }
}

/// A sink that runs an external player process per track.
///
/// The configured command is invoked with the stream URL as its single
/// argument; stopping kills the child process.
pub struct ProcessSink {
    command: String,
    child: Option<Child>,
}

impl ProcessSink {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            child: None,
        }
    }
}

impl AudioSink for ProcessSink {
    fn start(&mut self, url: &str) -> Result<(), PlaybackError> {
        let child = Command::new(&self.command)
            .arg(url)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| PlaybackError::StartFailed(format!("{}: {e}", self.command)))?;
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PlaybackError> {
        if let Some(mut child) = self.child.take() {
            child
                .kill()
                .map_err(|e| PlaybackError::StopFailed(e.to_string()))?;
            let _ = child.wait();
        }
        Ok(())
    }
}

impl Drop for ProcessSink {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Metadata for the live playback session.
#[derive(Debug, Clone, Default)]
pub struct PlaybackSession {
    /// Genre currently playing
    pub genre: Option<String>,
    /// Stream URL currently playing
    pub track_url: Option<String>,
    /// When the current track was confirmed started
    pub started_at: Option<DateTime<Utc>>,
}

impl PlaybackSession {
    pub fn is_active(&self) -> bool {
        self.track_url.is_some()
    }
}

/// Owns the audio sink and the single live session.
pub struct PlaybackController<S: AudioSink> {
    sink: S,
    session: PlaybackSession,
}

impl<S: AudioSink> PlaybackController<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            session: PlaybackSession::default(),
        }
    }

    /// Start playing a track, stopping any previous one first.
    ///
    /// Session metadata is written only after the sink reports success; on
    /// failure the session is left empty rather than pointing at a track
    /// that never started.
    pub fn play(
        &mut self,
        genre: &str,
        url: &str,
        now: DateTime<Utc>,
    ) -> Result<(), PlaybackError> {
        if self.session.is_active() {
            self.sink.stop()?;
            self.session = PlaybackSession::default();
        }

        self.sink.start(url)?;
        self.session = PlaybackSession {
            genre: Some(genre.to_string()),
            track_url: Some(url.to_string()),
            started_at: Some(now),
        };
        Ok(())
    }

    /// Stop playback. A no-op when nothing is playing.
    pub fn stop(&mut self) -> Result<(), PlaybackError> {
        if !self.session.is_active() {
            return Ok(());
        }
        self.sink.stop()?;
        self.session = PlaybackSession::default();
        Ok(())
    }

    /// The live session metadata.
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records sink calls in order for assertions.
    #[derive(Clone, Default)]
    struct RecordingSink {
        calls: Rc<RefCell<Vec<String>>>,
        fail_start: bool,
    }

    impl AudioSink for RecordingSink {
        fn start(&mut self, url: &str) -> Result<(), PlaybackError> {
            if self.fail_start {
                return Err(PlaybackError::StartFailed("sink down".to_string()));
            }
            self.calls.borrow_mut().push(format!("start {url}"));
            Ok(())
        }

        fn stop(&mut self) -> Result<(), PlaybackError> {
            self.calls.borrow_mut().push("stop".to_string());
            Ok(())
        }
    }

    #[test]
    fn test_play_records_session() {
        let sink = RecordingSink::default();
        let mut controller = PlaybackController::new(sink.clone());
        let now = Utc::now();

        controller.play("Jazz", "http://cdn/a.mp3", now).unwrap();
        let session = controller.session();
        assert_eq!(session.genre.as_deref(), Some("Jazz"));
        assert_eq!(session.track_url.as_deref(), Some("http://cdn/a.mp3"));
        assert_eq!(session.started_at, Some(now));
    }

    #[test]
    fn test_second_play_stops_first() {
        let sink = RecordingSink::default();
        let mut controller = PlaybackController::new(sink.clone());
        let now = Utc::now();

        controller.play("Jazz", "http://cdn/a.mp3", now).unwrap();
        controller.play("Pop", "http://cdn/b.mp3", now).unwrap();

        let calls = sink.calls.borrow();
        assert_eq!(
            *calls,
            vec!["start http://cdn/a.mp3", "stop", "start http://cdn/b.mp3"]
        );
        assert_eq!(controller.session().track_url.as_deref(), Some("http://cdn/b.mp3"));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let sink = RecordingSink::default();
        let mut controller = PlaybackController::new(sink.clone());

        controller.stop().unwrap();
        controller.stop().unwrap();
        assert!(sink.calls.borrow().is_empty());

        controller.play("Jazz", "http://cdn/a.mp3", Utc::now()).unwrap();
        controller.stop().unwrap();
        controller.stop().unwrap();
        // Exactly one stop reaches the sink.
        let stops = sink.calls.borrow().iter().filter(|c| *c == "stop").count();
        assert_eq!(stops, 1);
    }

    #[test]
    fn test_failed_start_leaves_no_session() {
        let sink = RecordingSink {
            fail_start: true,
            ..RecordingSink::default()
        };
        let mut controller = PlaybackController::new(sink);

        let result = controller.play("Jazz", "http://cdn/a.mp3", Utc::now());
        assert!(result.is_err());
        assert!(!controller.session().is_active());
        assert_eq!(controller.session().started_at, None);
    }
}
