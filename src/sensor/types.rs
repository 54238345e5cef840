//! Sample types delivered by a heart-rate sensor transport.
//!
//! The transport itself (device discovery, pairing, notification
//! subscription) lives outside this crate; everything here is the shape of
//! what it delivers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single heart-rate reading, arrival-ordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sample {
    /// Timestamp when the reading arrived
    pub timestamp: DateTime<Utc>,
    /// Heart rate in beats per minute
    pub heart_rate: u32,
}

impl Sample {
    pub fn new(heart_rate: u32) -> Self {
        Self {
            timestamp: Utc::now(),
            heart_rate,
        }
    }

    /// Create a sample with an explicit timestamp (used by tests and replays).
    pub fn at(timestamp: DateTime<Utc>, heart_rate: u32) -> Self {
        Self {
            timestamp,
            heart_rate,
        }
    }
}

/// Decode a Bluetooth Heart Rate Measurement characteristic payload.
///
/// Layout per the GATT spec: a flags byte, then the heart-rate value as a
/// u8, or a little-endian u16 when flag bit 0 is set. Returns `None` for
/// payloads too short to carry a value.
pub fn decode_measurement(payload: &[u8]) -> Option<u32> {
    let flags = *payload.first()?;
    if flags & 0x01 == 0 {
        payload.get(1).map(|&hr| hr as u32)
    } else {
        let lo = *payload.get(1)? as u32;
        let hi = *payload.get(2)? as u32;
        Some(hi << 8 | lo)
    }
}
