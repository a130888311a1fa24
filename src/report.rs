//! Error reporter — turns a scheduling error into an editor decoration.

use serde::{Deserialize, Serialize};

use crate::dsl::{ParseError, ParseErrorKind};
use crate::pitch::KeyRange;

/// Language of user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    English,
    Portuguese,
}

/// Underline `line` in the editor with `message` as its tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationRequest {
    pub line: usize,
    pub message: String,
}

/// Renders errors in one locale. The MIDI range in `InvalidMidi`
/// messages is the instrument's configured key range.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorReporter {
    locale: Locale,
    range: KeyRange,
}

impl ErrorReporter {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            range: KeyRange::default(),
        }
    }

    /// Name `range` in out-of-range messages.
    pub fn with_range(mut self, range: KeyRange) -> Self {
        self.range = range;
        self
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn report(&self, error: &ParseError) -> DecorationRequest {
        DecorationRequest {
            line: error.line,
            message: self.message(error.kind),
        }
    }

    pub fn message(&self, kind: ParseErrorKind) -> String {
        let KeyRange { low, high } = self.range;
        match (self.locale, kind) {
            (Locale::English, ParseErrorKind::InvalidMidi) => {
                format!("the MIDI note must be a number between {low} and {high}")
            }
            (Locale::English, kind) => kind.message().to_string(),
            (Locale::Portuguese, ParseErrorKind::InvalidMidi) => {
                format!("a nota MIDI deve ser um número entre {low} e {high}")
            }
            (Locale::Portuguese, ParseErrorKind::InvalidNote) => "formato inválido de nota".into(),
            (Locale::Portuguese, ParseErrorKind::InvalidInstruction) => {
                "a instrução terá de ser toca ou espera".into()
            }
            (Locale::Portuguese, ParseErrorKind::InvalidDuration) => {
                "a duração da espera deve ser um número não negativo".into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_messages() {
        let reporter = ErrorReporter::default();
        let req = reporter.report(&ParseError::invalid_midi(20, 3));
        assert_eq!(
            req,
            DecorationRequest {
                line: 3,
                message: "the MIDI note must be a number between 48 and 84".into(),
            }
        );
        assert_eq!(
            reporter.report(&ParseError::invalid_note("x", 0)).message,
            "invalid note format"
        );
        assert_eq!(
            reporter
                .report(&ParseError::invalid_instruction("foo", 0))
                .message,
            "the instruction must be toca or espera"
        );
        assert_eq!(
            reporter.report(&ParseError::invalid_duration("abc", 0)).message,
            "the wait duration must be a non-negative number"
        );
    }

    #[test]
    fn portuguese_messages() {
        let reporter = ErrorReporter::new(Locale::Portuguese);
        let req = reporter.report(&ParseError::invalid_instruction("foo", 1));
        assert_eq!(req.line, 1);
        assert_eq!(req.message, "a instrução terá de ser toca ou espera");
    }

    #[test]
    fn midi_message_names_configured_range() {
        let wide = KeyRange { low: 36, high: 96 };
        let english = ErrorReporter::default().with_range(wide);
        assert_eq!(
            english.report(&ParseError::invalid_midi(20, 0)).message,
            "the MIDI note must be a number between 36 and 96"
        );
        let portuguese = ErrorReporter::new(Locale::Portuguese).with_range(wide);
        assert_eq!(
            portuguese.message(ParseErrorKind::InvalidMidi),
            "a nota MIDI deve ser um número entre 36 e 96"
        );
    }

    #[test]
    fn locale_from_yaml() {
        let locale: Locale = serde_yaml::from_str("portuguese").unwrap();
        assert_eq!(locale, Locale::Portuguese);
    }
}
