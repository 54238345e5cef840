//! Sample ingestion for the heart-rate agent.
//!
//! Real transports (BLE heart-rate straps) hand their readings to the agent
//! through the same channel interface the simulated source uses here.

pub mod simulated;
pub mod types;

pub use simulated::{SensorConfig, SensorError, SimulatedSensor};
pub use types::{decode_measurement, Sample};
