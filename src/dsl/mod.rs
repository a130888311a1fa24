//! Line interpreter for the melody notation.
//!
//! ```text
//! toca do        play C (pt-octave 3, MIDI 60) for one beat
//! toca sol#4     accidentals and explicit octaves
//! toca 64        bare MIDI numbers
//! espera 1       wait one quarter-note beat
//! ```
//!
//! Each line is parsed on its own by [`LineParser`]; whole programs are
//! scheduled by [`crate::event::Scheduler`].

pub mod error;
pub mod line;

pub use error::{ParseError, ParseErrorKind};
pub use line::{AcceptAll, Instruction, LineParser, NoteValidator, PLAY_KEYWORD, WAIT_KEYWORD};

/// The program loaded into a fresh editor: the opening of "Ode to Joy".
pub const STARTER_PROGRAM: &str = "\
toca mi
espera 1
toca mi
espera 1
toca fa
espera 1
toca sol
espera 1
toca sol
espera 1
toca fa
espera 1
toca mi
espera 1
toca re
espera 1
toca do
espera 1
toca do
espera 1
toca re
espera 1
toca mi
espera 1
toca mi
espera 1.5
toca re
espera 0.5
toca re
espera 2";

/// Split editor text into program lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}
