//! Timeline event data model.
//!
//! A [`TimelineEvent`] is an immutable, absolutely-timed instruction for the
//! audio clock and the piano/editor collaborators.

use std::time::Duration;

use super::beat::Beat;

/// What happens when an event fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Sound `note` and light piano key `midi`.
    NoteOn { midi: u8, note: String },
    /// Release the piano key lit by the matching `NoteOn`.
    NoteOff { midi: u8 },
    /// Highlight source line `line` (zero-based).
    LineHighlight { line: usize },
    /// The end of the program; playback stops or wraps here.
    LoopBoundaryReached,
}

/// A single event on the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEvent {
    /// When this event fires, in wall-clock time from the start of the loop.
    pub time: Duration,
    /// The same position in musical time.
    pub beat: Beat,
    pub kind: EventKind,
}

impl TimelineEvent {
    pub fn new(beat: Beat, beat_duration: Duration, kind: EventKind) -> Self {
        Self {
            time: beat.to_duration(beat_duration),
            beat,
            kind,
        }
    }

    pub fn is_loop_boundary(&self) -> bool {
        matches!(self.kind, EventKind::LoopBoundaryReached)
    }
}
