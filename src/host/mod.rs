//! Piano and editor collaborators.
//!
//! The transport only talks to these traits. [`KeyboardState`] and
//! [`TextBuffer`] are in-memory implementations for headless playback and
//! tests; a GUI host would implement the traits on its own widgets.

use std::collections::BTreeSet;

use crate::dsl::split_lines;
use crate::pitch::KeyRange;
use crate::report::DecorationRequest;

/// The on-screen piano.
pub trait PianoWidget {
    /// Flip the highlighted state of key `midi`.
    fn toggle_key(&mut self, midi: u8);
    fn reset_all_keys(&mut self);
}

/// The source editor.
pub trait EditorWidget {
    /// Current program text, one entry per line.
    fn lines(&self) -> Vec<String>;
    /// Underline/annotate one line.
    fn decorate(&mut self, line: usize, message: &str);
    fn clear_decorations(&mut self);
    /// Mark `line` as the one currently playing, clearing any previous mark.
    fn highlight_line(&mut self, line: usize);
    fn clear_highlight(&mut self);
}

/// Highlighted keys of a piano spanning `range`.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    range: KeyRange,
    down: BTreeSet<u8>,
}

impl KeyboardState {
    pub fn new(range: KeyRange) -> Self {
        Self {
            range,
            down: BTreeSet::new(),
        }
    }

    pub fn range(&self) -> KeyRange {
        self.range
    }

    pub fn is_down(&self, midi: u8) -> bool {
        self.down.contains(&midi)
    }

    /// Highlighted keys, lowest first.
    pub fn keys_down(&self) -> Vec<u8> {
        self.down.iter().copied().collect()
    }
}

impl PianoWidget for KeyboardState {
    /// Keys outside the piano's range don't exist and are ignored.
    fn toggle_key(&mut self, midi: u8) {
        if !self.range.contains(midi as i32) {
            return;
        }
        if !self.down.remove(&midi) {
            self.down.insert(midi);
        }
    }

    fn reset_all_keys(&mut self) {
        self.down.clear();
    }
}

/// Editor contents plus its decoration state.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    lines: Vec<String>,
    decoration: Option<DecorationRequest>,
    highlighted: Option<usize>,
}

impl TextBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            lines: split_lines(text),
            ..Self::default()
        }
    }

    /// Replace the whole text, as if the user edited it.
    pub fn set_text(&mut self, text: &str) {
        self.lines = split_lines(text);
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn decoration(&self) -> Option<&DecorationRequest> {
        self.decoration.as_ref()
    }

    pub fn highlighted_line(&self) -> Option<usize> {
        self.highlighted
    }
}

impl EditorWidget for TextBuffer {
    fn lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    fn decorate(&mut self, line: usize, message: &str) {
        self.decoration = Some(DecorationRequest {
            line,
            message: message.to_string(),
        });
    }

    fn clear_decorations(&mut self) {
        self.decoration = None;
    }

    fn highlight_line(&mut self, line: usize) {
        self.highlighted = Some(line);
    }

    fn clear_highlight(&mut self) {
        self.highlighted = None;
    }
}
