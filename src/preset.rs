//! Serialization of the plugin's long-term state into the opaque "chunks" that a host stores in
//! its project files and presets.
//!
//! The format is a small versioned JSON object holding each parameter's plain value, keyed by
//! parameter id. Loading clamps and snaps every value into its declared range, so saving,
//! loading, and saving again always reproduces the first save exactly.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::params::{ParamSnapshot, FREQUENCY, GAIN};

pub const PRESET_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PresetData {
    pub version: u32,
    pub frequency: f32,
    pub gain: f32,
}

impl PresetData {
    pub fn from_snapshot(snapshot: ParamSnapshot) -> Self {
        Self {
            version: PRESET_VERSION,
            frequency: snapshot.frequency,
            gain: snapshot.gain,
        }
    }

    /// Returns the stored values, forced into the legal range of each parameter.
    pub fn to_snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            frequency: FREQUENCY.range.snap(self.frequency),
            gain: GAIN.range.snap(self.gain),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        let preset: Self = serde_json::from_slice(data)?;
        if preset.version != PRESET_VERSION {
            return Err(Error::PresetVersion {
                found: preset.version,
                expected: PRESET_VERSION,
            });
        }
        Ok(preset)
    }
}
