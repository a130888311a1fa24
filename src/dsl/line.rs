//! Line parser — one source line into an [`Instruction`].
//!
//! Grammar: `line := "" | keyword SP param`, where keyword is `toca`
//! (play a note) or `espera` (wait a number of quarter-note beats).

use crate::event::Beat;
use crate::pitch::{self, KeyRange};

use super::error::ParseError;

pub const PLAY_KEYWORD: &str = "toca";
pub const WAIT_KEYWORD: &str = "espera";

/// A parsed, valid line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Sound `note` (letter spelling, pt-octave convention) for one beat.
    Play { note: String, midi: u8 },
    /// Advance the beat offset.
    Wait { beats: Beat },
}

/// Extra note-format check applied after the range check.
pub trait NoteValidator {
    fn is_valid(&self, note: &str) -> bool;
}

/// Accepts every note that made it through range checking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl NoteValidator for AcceptAll {
    fn is_valid(&self, _note: &str) -> bool {
        true
    }
}

/// Parses lines against an instrument range and a note validator.
pub struct LineParser {
    range: KeyRange,
    validator: Box<dyn NoteValidator>,
}

impl LineParser {
    pub fn new(range: KeyRange) -> Self {
        Self {
            range,
            validator: Box::new(AcceptAll),
        }
    }

    /// Replace the note validator.
    pub fn with_validator(mut self, validator: impl NoteValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn range(&self) -> KeyRange {
        self.range
    }

    /// Parse one line. Blank lines, and notes resolving to MIDI 0, are
    /// no-ops and yield `Ok(None)`.
    pub fn parse(&self, line: &str, index: usize) -> Result<Option<Instruction>, ParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let mut tokens = line.split(' ');
        let keyword = tokens.next().unwrap_or_default();
        let param = tokens.next().unwrap_or_default();

        match keyword {
            PLAY_KEYWORD => self.parse_play(param, index),
            WAIT_KEYWORD => parse_wait(param, index).map(Some),
            other => Err(ParseError::invalid_instruction(other, index)),
        }
    }

    fn parse_play(&self, param: &str, index: usize) -> Result<Option<Instruction>, ParseError> {
        let note = pitch::parse_note(param).ok_or_else(|| ParseError::invalid_note(param, index))?;
        let midi = pitch::convert_pt_note_to_midi(&note)
            .ok_or_else(|| ParseError::invalid_note(param, index))?;

        if !pitch::is_valid_midi(Some(midi), self.range) {
            return Err(ParseError::invalid_midi(midi, index));
        }
        if !self.validator.is_valid(&note) {
            return Err(ParseError::invalid_note(note, index));
        }
        if midi == 0 {
            return Ok(None);
        }

        let midi = u8::try_from(midi).map_err(|_| ParseError::invalid_midi(midi, index))?;
        Ok(Some(Instruction::Play { note, midi }))
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new(KeyRange::default())
    }
}

fn parse_wait(param: &str, index: usize) -> Result<Instruction, ParseError> {
    param
        .parse::<f64>()
        .ok()
        .and_then(Beat::try_from_beats_f64)
        .map(|beats| Instruction::Wait { beats })
        .ok_or_else(|| ParseError::invalid_duration(param, index))
}
