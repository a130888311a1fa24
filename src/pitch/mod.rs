//! Pitch model — closed-form pitch-class/octave arithmetic and note spellings.
//!
//! Two spellings are understood: scientific (`C4`, `Eb3`, `F#2`, MIDI 60 = C4)
//! and solfège pt-notes (`do`, `re#3`, `sib2`). Pt-notes sit one octave above
//! scientific notation: `do3` is MIDI 60, not 48. See [`convert`] for the
//! string-level conversions built on top of [`Pitch`].

pub mod convert;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use convert::{
    convert_en_note_to_midi, convert_en_note_to_pt, convert_midi_to_en_note,
    convert_midi_to_pt_note, convert_pt_note_to_en, convert_pt_note_to_midi, parse_note,
};

/// Octave assumed when a pt-note is written without one (`do` == `do3`).
pub const DEFAULT_PT_OCTAVE: i32 = 3;

/// Semitones between a pt-note octave and the scientific octave of the same digit.
pub const PT_OCTAVE_OFFSET: i32 = 12;

/// A natural note letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

/// Solfège syllables, longest first so `sol` is tried before the two-letter ones.
const SYLLABLES: [(&str, Letter); 7] = [
    ("sol", Letter::G),
    ("do", Letter::C),
    ("re", Letter::D),
    ("mi", Letter::E),
    ("fa", Letter::F),
    ("la", Letter::A),
    ("si", Letter::B),
];

/// Sharp spelling of each pitch class.
const SHARP_SPELLING: [(Letter, i8); 12] = [
    (Letter::C, 0),
    (Letter::C, 1),
    (Letter::D, 0),
    (Letter::D, 1),
    (Letter::E, 0),
    (Letter::F, 0),
    (Letter::F, 1),
    (Letter::G, 0),
    (Letter::G, 1),
    (Letter::A, 0),
    (Letter::A, 1),
    (Letter::B, 0),
];

impl Letter {
    /// Semitones above C.
    pub fn pitch_class(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Parse a letter name, case-insensitive.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }

    /// The lowercase solfège syllable for this letter.
    pub fn syllable(self) -> &'static str {
        SYLLABLES
            .iter()
            .find(|(_, letter)| *letter == self)
            .map(|(syllable, _)| *syllable)
            .unwrap_or("do")
    }

    /// Match a solfège syllable at the start of an already lowercased string.
    /// Returns the letter and the syllable's byte length.
    fn from_syllable_prefix(lower: &str) -> Option<(Self, usize)> {
        SYLLABLES
            .iter()
            .find(|(syllable, _)| lower.starts_with(syllable))
            .map(|(syllable, letter)| (*letter, syllable.len()))
    }
}

/// A spelled pitch: letter, accidental (-1 flat, 0 natural, +1 sharp) and
/// scientific octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub letter: Letter,
    pub accidental: i8,
    pub octave: i32,
}

impl Pitch {
    pub fn new(letter: Letter, accidental: i8, octave: i32) -> Self {
        Self {
            letter,
            accidental,
            octave,
        }
    }

    /// MIDI number: `(octave + 1) * 12 + pitch_class + accidental`.
    ///
    /// Not clamped to 0–127; values outside are left for range checks to
    /// reject. Extreme octaves saturate at the `i32` bounds.
    pub fn midi(&self) -> i32 {
        self.octave
            .saturating_add(1)
            .saturating_mul(12)
            .saturating_add(self.letter.pitch_class() + self.accidental as i32)
    }

    /// Spell a MIDI number with sharps. Negative numbers land in negative octaves.
    pub fn from_midi(midi: i32) -> Self {
        let octave = midi.div_euclid(12) - 1;
        let (letter, accidental) = SHARP_SPELLING[midi.rem_euclid(12) as usize];
        Self {
            letter,
            accidental,
            octave,
        }
    }

    pub fn transpose_octaves(self, octaves: i32) -> Self {
        Self {
            octave: self.octave.saturating_add(octaves),
            ..self
        }
    }

    /// Scientific spelling, e.g. `C#4`.
    pub fn scientific(&self) -> String {
        format!(
            "{}{}{}",
            self.letter.as_char(),
            accidental_suffix(self.accidental),
            self.octave
        )
    }

    /// Solfège spelling with the literal octave digit, e.g. `do#4`.
    pub fn solfege(&self) -> String {
        format!(
            "{}{}{}",
            self.letter.syllable(),
            accidental_suffix(self.accidental),
            self.octave
        )
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scientific())
    }
}

fn accidental_suffix(accidental: i8) -> &'static str {
    match accidental {
        a if a > 0 => "#",
        a if a < 0 => "b",
        _ => "",
    }
}

/// Which alphabet a note token was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spelling {
    Solfege,
    Scientific,
}

/// A note token split into its parts. The octave is kept as written (it may
/// be absent) so callers can apply their own default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteName {
    pub letter: Letter,
    pub accidental: i8,
    pub octave: Option<i32>,
    pub spelling: Spelling,
}

impl NoteName {
    /// Split `<syllable|letter><#|b>?<octave>?`. Case-insensitive.
    pub fn split(input: &str) -> Option<Self> {
        let lower = input.trim().to_ascii_lowercase();
        let first = lower.chars().next()?;

        let (letter, len, spelling) = match Letter::from_syllable_prefix(&lower) {
            Some((letter, len)) => (letter, len, Spelling::Solfege),
            None => (Letter::from_char(first)?, 1, Spelling::Scientific),
        };

        let rest = &lower[len..];
        let (accidental, rest) = if let Some(r) = rest.strip_prefix('#') {
            (1, r)
        } else if let Some(r) = rest.strip_prefix('b') {
            (-1, r)
        } else {
            (0, rest)
        };

        let octave = if rest.is_empty() {
            None
        } else {
            Some(rest.parse::<i32>().ok()?)
        };

        Some(Self {
            letter,
            accidental,
            octave,
            spelling,
        })
    }

    /// Resolve to a pitch, filling a missing octave with `default_octave`.
    pub fn pitch_or(&self, default_octave: i32) -> Pitch {
        Pitch::new(
            self.letter,
            self.accidental,
            self.octave.unwrap_or(default_octave),
        )
    }
}

/// The inclusive MIDI range the instrument can sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRange {
    pub low: u8,
    pub high: u8,
}

impl KeyRange {
    pub const PIANO: KeyRange = KeyRange { low: 48, high: 84 };

    pub fn contains(&self, midi: i32) -> bool {
        midi >= self.low as i32 && midi <= self.high as i32
    }
}

impl Default for KeyRange {
    fn default() -> Self {
        Self::PIANO
    }
}

/// Whether a MIDI value may be handed to the instrument.
///
/// An absent or zero value means "no note" and is accepted; anything else
/// must fall inside `range`.
pub fn is_valid_midi(midi: Option<i32>, range: KeyRange) -> bool {
    match midi {
        None | Some(0) => true,
        Some(m) => range.contains(m),
    }
}
