//! MIDI input — hardware note-on messages become candidate input notes.

pub mod config;
pub mod input;
pub mod mapping;

pub use config::MidiConfig;
pub use input::{MidiError, MidiInput};
pub use mapping::note_on_from_message;
