//! Error types for the line interpreter.

use thiserror::Error;

/// What went wrong on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The note resolved to a MIDI number the instrument can't play.
    InvalidMidi,
    /// The `toca` parameter isn't a recognisable note.
    InvalidNote,
    /// The keyword is neither `toca` nor `espera`.
    InvalidInstruction,
    /// The `espera` parameter isn't a non-negative number.
    InvalidDuration,
}

impl ParseErrorKind {
    /// The user-facing message for this kind, naming the stock 48–84
    /// piano for `InvalidMidi`. [`ErrorReporter`](crate::report::ErrorReporter)
    /// renders the configured range instead.
    pub fn message(self) -> &'static str {
        match self {
            ParseErrorKind::InvalidMidi => "the MIDI note must be a number between 48 and 84",
            ParseErrorKind::InvalidNote => "invalid note format",
            ParseErrorKind::InvalidInstruction => "the instruction must be toca or espera",
            ParseErrorKind::InvalidDuration => "the wait duration must be a non-negative number",
        }
    }
}

/// The first error found while scheduling a program.
///
/// `line` is zero-based. `found` holds the offending token (or the resolved
/// MIDI number for [`ParseErrorKind::InvalidMidi`]) for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "line {line_no}: {kind:?}: {message} (found {found:?})",
    line_no = .line + 1,
    message = .kind.message()
)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub line: usize,
    pub found: String,
}

impl ParseError {
    pub fn invalid_midi(midi: i32, line: usize) -> Self {
        Self {
            kind: ParseErrorKind::InvalidMidi,
            line,
            found: midi.to_string(),
        }
    }

    pub fn invalid_note(found: impl Into<String>, line: usize) -> Self {
        Self {
            kind: ParseErrorKind::InvalidNote,
            line,
            found: found.into(),
        }
    }

    pub fn invalid_instruction(found: impl Into<String>, line: usize) -> Self {
        Self {
            kind: ParseErrorKind::InvalidInstruction,
            line,
            found: found.into(),
        }
    }

    pub fn invalid_duration(found: impl Into<String>, line: usize) -> Self {
        Self {
            kind: ParseErrorKind::InvalidDuration,
            line,
            found: found.into(),
        }
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }
}
