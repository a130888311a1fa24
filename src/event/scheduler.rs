//! Program scheduler — turns source lines into an absolutely-timed event list.
//!
//! One pass walks the program top to bottom keeping a beat offset. `toca`
//! emits a one-beat note at the current offset without moving it; `espera`
//! highlights its line and then advances the offset. The first invalid line
//! aborts the pass: nothing is scheduled, only that error is returned.

use std::time::Duration;

use log::debug;

use crate::dsl::{Instruction, LineParser, ParseError};

use super::beat::{beat_duration, Beat, TICKS_PER_BEAT};
use super::types::{EventKind, TimelineEvent};

/// Length of every `toca` note.
pub const NOTE_LENGTH: Beat = Beat::from_ticks(TICKS_PER_BEAT);

/// A successfully scheduled program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Events in non-decreasing time order, ending with the loop boundary.
    pub events: Vec<TimelineEvent>,
    /// Wall-clock length of the program.
    pub loop_end: Duration,
    /// Musical length of the program.
    pub length: Beat,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Per-pass state. Never outlives a call to [`Scheduler::schedule`].
#[derive(Debug, Default)]
struct ScheduleState {
    offset: Beat,
    events: Vec<TimelineEvent>,
}

/// Schedules whole programs at a fixed beat duration.
pub struct Scheduler {
    parser: LineParser,
    beat_duration: Duration,
}

impl Scheduler {
    pub fn new(parser: LineParser, beat_duration: Duration) -> Self {
        Self {
            parser,
            beat_duration,
        }
    }

    /// A scheduler for the default piano range at `bpm`.
    pub fn with_bpm(bpm: f64) -> Self {
        Self::new(LineParser::default(), beat_duration(bpm))
    }

    pub fn beat_duration(&self) -> Duration {
        self.beat_duration
    }

    pub fn set_beat_duration(&mut self, beat_duration: Duration) {
        self.beat_duration = beat_duration;
    }

    pub fn parser(&self) -> &LineParser {
        &self.parser
    }

    /// Schedule a program, or return the first error by line order.
    pub fn schedule<S: AsRef<str>>(&self, lines: &[S]) -> Result<Schedule, ParseError> {
        let mut state = ScheduleState::default();

        for (index, line) in lines.iter().enumerate() {
            match self.parser.parse(line.as_ref(), index)? {
                None => {}
                Some(Instruction::Play { note, midi }) => {
                    let start = state.offset;
                    self.emit(&mut state, start, EventKind::NoteOn { midi, note });
                    self.emit(&mut state, start + NOTE_LENGTH, EventKind::NoteOff { midi });
                }
                Some(Instruction::Wait { beats }) => {
                    let at = state.offset;
                    self.emit(&mut state, at, EventKind::LineHighlight { line: index });
                    state.offset = state.offset + beats;
                }
            }
        }

        let length = state.offset;
        self.emit(&mut state, length, EventKind::LoopBoundaryReached);

        let mut events = state.events;
        events.sort_by_key(|e| e.time);
        let loop_end = length.to_duration(self.beat_duration);

        debug!(
            "scheduled {} lines into {} events, loop end {:?}",
            lines.len(),
            events.len(),
            loop_end
        );

        Ok(Schedule {
            events,
            loop_end,
            length,
        })
    }

    fn emit(&self, state: &mut ScheduleState, at: Beat, kind: EventKind) {
        state
            .events
            .push(TimelineEvent::new(at, self.beat_duration, kind));
    }
}
