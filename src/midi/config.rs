//! MIDI configuration — device selection loaded from ~/.digisonic/midi.yaml.

use serde::{Deserialize, Serialize};

/// MIDI configuration loaded from YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MidiConfig {
    /// Preferred MIDI device name (substring match). None = first available.
    #[serde(default)]
    pub device_name: Option<String>,
    /// Only accept messages on this MIDI channel (0-15). None = all channels.
    #[serde(default)]
    pub channel_filter: Option<u8>,
}

impl MidiConfig {
    /// Load config from the standard path (~/.digisonic/midi.yaml).
    /// Returns None if the file doesn't exist (graceful fallback).
    pub fn load() -> Option<Self> {
        let home = dirs::home_dir()?;
        let path = home.join(".digisonic").join("midi.yaml");
        let content = std::fs::read_to_string(path).ok()?;
        serde_yaml::from_str(&content).ok()
    }
}
