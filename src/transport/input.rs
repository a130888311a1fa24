//! Note preview — piano clicks, the note/MIDI input boxes and hardware MIDI
//! input. Previewing is only allowed while the transport is stopped.

use log::warn;

use crate::event::{AudioClock, NoteLength};
use crate::host::{EditorWidget, PianoWidget};
use crate::pitch::{self, convert_midi_to_en_note, convert_midi_to_pt_note};

use super::TransportController;

/// The candidate note shown in the input boxes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    /// Pt-note spelling, e.g. `do3`.
    pub note: Option<String>,
    pub midi: Option<u8>,
}

impl<C: AudioClock, P: PianoWidget, E: EditorWidget> TransportController<C, P, E> {
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// A piano key was pressed or released by the user.
    ///
    /// On key-down while stopped, the key becomes the input note and is
    /// sounded as an eighth note. Returns whether a preview happened.
    pub fn piano_key_changed(&mut self, midi: u8, is_down: bool) -> bool {
        if self.flags.playing || !is_down {
            return false;
        }

        self.input.midi = Some(midi);
        self.input.note = Some(convert_midi_to_pt_note(midi as i32));
        if self.flags.loaded {
            let note = convert_midi_to_en_note(midi as i32, true);
            self.ctx.clock.trigger_note(&note, NoteLength::Eighth, None);
        }
        true
    }

    /// The MIDI input box changed. Zero and out-of-range values are ignored.
    pub fn set_input_midi(&mut self, midi: i32) -> bool {
        let range = self.scheduler.parser().range();
        if midi == 0 || !pitch::is_valid_midi(Some(midi), range) {
            return false;
        }
        let Ok(key) = u8::try_from(midi) else {
            return false;
        };

        self.input.midi = Some(key);
        self.light_single_key(key);
        true
    }

    /// The note input box changed. Unparseable notes are ignored.
    pub fn set_input_note(&mut self, note: &str) -> bool {
        let Some(key) = pitch::convert_pt_note_to_midi(note).and_then(|m| u8::try_from(m).ok())
        else {
            warn!("invalid note format: {note:?}");
            return false;
        };

        self.input.note = Some(note.to_string());
        self.light_single_key(key);
        true
    }

    /// A note-on arrived from a MIDI device.
    pub fn midi_note_received(&mut self, midi: u8) -> bool {
        if !self.scheduler.parser().range().contains(midi as i32) {
            return false;
        }
        self.set_input_midi(midi as i32)
    }

    fn light_single_key(&mut self, midi: u8) {
        self.ctx.piano.reset_all_keys();
        self.ctx.piano.toggle_key(midi);
    }
}
