//! Simulated heart-rate source.
//!
//! Stands in for the wearable transport so the agent can run end to end
//! without hardware. Emits samples on a fixed interval following a slow
//! sinusoidal profile with a little jitter, which is enough to walk the
//! classifier through several states over a session.

use crate::sensor::types::Sample;
use crossbeam_channel::{bounded, Receiver, Sender};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Configuration for the simulated sensor.
#[derive(Debug, Clone)]
pub struct SensorConfig {
    /// Interval between emitted samples
    pub sample_interval: Duration,
    /// Midpoint of the simulated heart rate in bpm
    pub base_bpm: u32,
    /// Peak deviation from the midpoint in bpm
    pub swing_bpm: u32,
    /// Period of one full rise-and-fall cycle
    pub cycle: Duration,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_millis(1000),
            base_bpm: 110,
            swing_bpm: 50,
            cycle: Duration::from_secs(300),
        }
    }
}

/// Errors that can occur while driving the simulated sensor.
#[derive(Debug)]
pub enum SensorError {
    AlreadyRunning,
}

impl std::fmt::Display for SensorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorError::AlreadyRunning => write!(f, "Sensor is already running"),
        }
    }
}

impl std::error::Error for SensorError {}

/// A sample source that synthesizes heart-rate readings on a background thread.
pub struct SimulatedSensor {
    config: SensorConfig,
    sender: Sender<Sample>,
    receiver: Receiver<Sample>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SimulatedSensor {
    /// Create a new simulated sensor. No samples flow until `start`.
    pub fn new(config: SensorConfig) -> Self {
        let (sender, receiver) = bounded(10_000);
        Self {
            config,
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start emitting samples.
    pub fn start(&mut self) -> Result<(), SensorError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(SensorError::AlreadyRunning);
        }
        self.running.store(true, Ordering::SeqCst);

        let running = self.running.clone();
        let sender = self.sender.clone();
        let config = self.config.clone();

        let handle = std::thread::spawn(move || {
            let mut rng = rand::rng();
            let mut elapsed = Duration::ZERO;
            while running.load(Ordering::SeqCst) {
                let phase =
                    elapsed.as_secs_f64() / config.cycle.as_secs_f64() * std::f64::consts::TAU;
                let swing = config.swing_bpm as f64 * phase.sin();
                let jitter: i32 = rng.random_range(-2..=2);
                let bpm = (config.base_bpm as f64 + swing) as i64 + jitter as i64;

                // A full queue means the consumer is gone or badly stalled;
                // dropping the sample matches the transport's at-most-once delivery.
                let _ = sender.try_send(Sample::new(bpm.max(1) as u32));

                std::thread::sleep(config.sample_interval);
                elapsed += config.sample_interval;
            }
        });

        self.handle = Some(handle);
        Ok(())
    }

    /// Stop emitting samples.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Check if the sensor is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for emitted samples.
    pub fn receiver(&self) -> &Receiver<Sample> {
        &self.receiver
    }
}

impl Drop for SimulatedSensor {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_emits_valid_samples() {
        let config = SensorConfig {
            sample_interval: Duration::from_millis(5),
            ..SensorConfig::default()
        };
        let mut sensor = SimulatedSensor::new(config);
        sensor.start().unwrap();

        let sample = sensor
            .receiver()
            .recv_timeout(Duration::from_secs(2))
            .expect("no sample emitted");
        assert!(sample.heart_rate > 0);

        sensor.stop();
        assert!(!sensor.is_running());
    }

    #[test]
    fn test_double_start_rejected() {
        let mut sensor = SimulatedSensor::new(SensorConfig::default());
        sensor.start().unwrap();
        assert!(matches!(sensor.start(), Err(SensorError::AlreadyRunning)));
        sensor.stop();
    }
}
