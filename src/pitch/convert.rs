//! String-level note conversions between MIDI numbers, scientific names and
//! solfège pt-notes.

use super::{
    accidental_suffix, NoteName, Pitch, Spelling, DEFAULT_PT_OCTAVE, PT_OCTAVE_OFFSET,
};

/// Parse a `toca` parameter into a letter-spelled note in the pt-octave
/// convention, ready for [`convert_pt_note_to_midi`].
///
/// - A bare integer is an absolute MIDI number, spelled one octave down
///   (`"60"` → `"C3"`).
/// - Otherwise a syllable or letter is required; octave 3 is assumed when
///   none is written (`"do"` → `"C3"`, `"mi4"` → `"E4"`).
pub fn parse_note(input: &str) -> Option<String> {
    let input = input.trim();
    if let Ok(midi) = input.parse::<i32>() {
        return Some(convert_midi_to_en_note(midi, true));
    }

    let name = NoteName::split(input)?;
    Some(name.pitch_or(DEFAULT_PT_OCTAVE).scientific())
}

/// Replace a solfège syllable by its uppercase letter. Accidental and octave
/// pass through as written; scientific input is only uppercased.
pub fn convert_pt_note_to_en(note: &str) -> Option<String> {
    let name = NoteName::split(note)?;
    Some(format_name(&name, Spelling::Scientific))
}

/// Replace a note letter by its lowercase solfège syllable.
pub fn convert_en_note_to_pt(note: &str) -> Option<String> {
    let name = NoteName::split(note)?;
    Some(format_name(&name, Spelling::Solfege))
}

/// Spell a MIDI number scientifically, optionally one octave lower.
pub fn convert_midi_to_en_note(midi: i32, shift_octave_down: bool) -> String {
    let midi = if shift_octave_down {
        midi.saturating_sub(PT_OCTAVE_OFFSET)
    } else {
        midi
    };
    Pitch::from_midi(midi).scientific()
}

/// Spell a MIDI number as a pt-note (`60` → `"do3"`).
pub fn convert_midi_to_pt_note(midi: i32) -> String {
    Pitch::from_midi(midi).transpose_octaves(-1).solfege()
}

/// MIDI number of a pt-note: the scientific reading plus one octave.
///
/// Letter-spelled input is read in the same convention, so
/// `convert_pt_note_to_midi(&parse_note(x)?)` works for every accepted `x`.
pub fn convert_pt_note_to_midi(note: &str) -> Option<i32> {
    let name = NoteName::split(note)?;
    Some(
        name.pitch_or(DEFAULT_PT_OCTAVE)
            .midi()
            .saturating_add(PT_OCTAVE_OFFSET),
    )
}

/// MIDI number of a scientific note. The octave is required.
pub fn convert_en_note_to_midi(note: &str) -> Option<i32> {
    let name = NoteName::split(note)?;
    if name.spelling != Spelling::Scientific {
        return None;
    }
    let octave = name.octave?;
    Some(Pitch::new(name.letter, name.accidental, octave).midi())
}

fn format_name(name: &NoteName, spelling: Spelling) -> String {
    let stem = match spelling {
        Spelling::Scientific => name.letter.as_char().to_string(),
        Spelling::Solfege => name.letter.syllable().to_string(),
    };
    let accidental = accidental_suffix(name.accidental);
    match name.octave {
        Some(octave) => format!("{stem}{accidental}{octave}"),
        None => format!("{stem}{accidental}"),
    }
}
