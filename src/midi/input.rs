//! MIDI input — connects to a MIDI device and forwards note-on numbers.

use std::sync::mpsc;

use log::{debug, info};
use midir::{MidiInput as MidirInput, MidiInputConnection};
use thiserror::Error;

use super::config::MidiConfig;
use super::mapping::note_on_from_message;

#[derive(Debug, Error)]
pub enum MidiError {
    #[error("MIDI init: {0}")]
    Init(String),
    #[error("no MIDI input ports available")]
    NoInputs,
    #[error("MIDI device matching '{0}' not found")]
    DeviceNotFound(String),
    #[error("MIDI connect: {0}")]
    Connect(String),
}

/// Active MIDI input connection.
pub struct MidiInput {
    _connection: MidiInputConnection<()>,
    port_name: String,
}

impl MidiInput {
    /// One-shot MIDI initialization: the available input device names, or
    /// why MIDI can't be used.
    pub fn enable() -> Result<Vec<String>, MidiError> {
        let midi_in =
            MidirInput::new("digisonic-probe").map_err(|e| MidiError::Init(e.to_string()))?;
        let devices: Vec<String> = midi_in
            .ports()
            .iter()
            .filter_map(|p| midi_in.port_name(p).ok())
            .collect();
        if devices.is_empty() {
            return Err(MidiError::NoInputs);
        }
        Ok(devices)
    }

    /// Start listening on a MIDI port.
    /// Finds a port matching the config's device_name (or the first available port).
    /// Note-on numbers are sent through `sender`; range checking is left to the receiver.
    pub fn start(config: &MidiConfig, sender: mpsc::Sender<u8>) -> Result<Self, MidiError> {
        let midi_in = MidirInput::new("digisonic").map_err(|e| MidiError::Init(e.to_string()))?;

        let ports = midi_in.ports();
        if ports.is_empty() {
            return Err(MidiError::NoInputs);
        }

        let (port, port_name) = if let Some(ref name_filter) = config.device_name {
            ports
                .iter()
                .find_map(|p| {
                    let name = midi_in.port_name(p).unwrap_or_default();
                    if name.contains(name_filter.as_str()) {
                        Some((p.clone(), name))
                    } else {
                        None
                    }
                })
                .ok_or_else(|| MidiError::DeviceNotFound(name_filter.clone()))?
        } else {
            let p = ports[0].clone();
            let name = midi_in
                .port_name(&p)
                .unwrap_or_else(|_| "unknown".to_string());
            (p, name)
        };

        let channel_filter = config.channel_filter;
        let connection = midi_in
            .connect(
                &port,
                "digisonic-input",
                move |_timestamp, msg, _| {
                    if let Some(note) = note_on_from_message(msg, channel_filter) {
                        debug!("MIDI note-on {note}");
                        let _ = sender.send(note);
                    }
                },
                (),
            )
            .map_err(|e| MidiError::Connect(e.to_string()))?;

        info!("listening for MIDI on {port_name}");
        Ok(Self {
            _connection: connection,
            port_name,
        })
    }

    /// Get the connected port name.
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_does_not_panic() {
        // No MIDI hardware in CI; either outcome is fine.
        match MidiInput::enable() {
            Ok(devices) => assert!(!devices.is_empty()),
            Err(e) => assert!(!e.to_string().is_empty()),
        }
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            MidiError::DeviceNotFound("Arturia".into()).to_string(),
            "MIDI device matching 'Arturia' not found"
        );
        assert_eq!(
            MidiError::NoInputs.to_string(),
            "no MIDI input ports available"
        );
    }
}
