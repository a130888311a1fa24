//! Audio clock — the boundary between scheduling and playback.
//!
//! The transport hands the clock immutable [`TimelineEvent`]s instead of
//! callbacks. Whoever drives the clock feeds the events it fires back into
//! [`TransportController::handle_event`](crate::transport::TransportController::handle_event),
//! so no callback ever needs to own the controller.
//!
//! [`ManualClock`] is a deterministic implementation advanced explicitly by
//! its host. It backs the headless player and the tests.

use std::fmt;
use std::time::Duration;

use super::timeline::Timeline;
use super::types::TimelineEvent;

/// Note lengths understood by the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteLength {
    Quarter,
    Eighth,
}

impl fmt::Display for NoteLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteLength::Quarter => f.write_str("4n"),
            NoteLength::Eighth => f.write_str("8n"),
        }
    }
}

/// What the transport needs from an audio clock and its sampler.
pub trait AudioClock {
    /// Whether the underlying audio context is suspended (e.g. awaiting a user gesture).
    fn is_suspended(&self) -> bool;
    fn resume(&mut self);

    /// Fire `event` at `event.time` from the loop start.
    fn register(&mut self, event: TimelineEvent);
    /// Drop every registered event that hasn't fired yet.
    fn cancel_all_pending(&mut self);

    fn start(&mut self);
    fn stop(&mut self);

    fn set_loop_bounds(&mut self, start: Duration, end: Duration);
    fn set_loop_enabled(&mut self, enabled: bool);
    fn set_muted(&mut self, muted: bool);
    fn set_tempo(&mut self, bpm: f64);

    /// Sound `note` (scientific spelling) for `length`; `None` means now.
    fn trigger_note(&mut self, note: &str, length: NoteLength, at: Option<Duration>);
}

/// A note the sampler was asked to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggeredNote {
    pub note: String,
    pub length: NoteLength,
    pub at: Option<Duration>,
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    timeline: Timeline,
    position: Duration,
    playing: bool,
    suspended: bool,
    loop_enabled: bool,
    loop_start: Duration,
    loop_end: Duration,
    muted: bool,
    bpm: f64,
    triggered: Vec<TriggeredNote>,
}

impl ManualClock {
    pub fn new(bpm: f64) -> Self {
        Self {
            timeline: Timeline::new(),
            position: Duration::ZERO,
            playing: false,
            suspended: false,
            loop_enabled: false,
            loop_start: Duration::ZERO,
            loop_end: Duration::ZERO,
            muted: false,
            bpm,
            triggered: Vec::new(),
        }
    }

    /// Start in the suspended state, as a browser-style audio context would.
    pub fn suspended(mut self) -> Self {
        self.suspended = true;
        self
    }

    /// Move time forward and return the events that fired, in order.
    ///
    /// With looping enabled, reaching the loop end fires everything up to and
    /// including it, rewinds, and returns; events of the next pass fire on
    /// later calls.
    pub fn advance(&mut self, by: Duration) -> Vec<TimelineEvent> {
        if !self.playing {
            return Vec::new();
        }

        let target = self.position + by;
        if self.loop_enabled && self.loop_end > self.loop_start && target >= self.loop_end {
            let fired = self.timeline.drain_through(self.loop_end);
            self.position = self.loop_start + (target - self.loop_end);
            self.timeline.reset_cursor();
            return fired;
        }

        let fired = self.timeline.drain_through(target);
        self.position = target;
        fired
    }

    /// Time until the next registered event, if any is left.
    pub fn until_next_event(&self) -> Option<Duration> {
        let position = self.position;
        self.timeline
            .peek_next()
            .map(|e| e.time.saturating_sub(position))
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub fn loop_bounds(&self) -> (Duration, Duration) {
        (self.loop_start, self.loop_end)
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Number of registered events, fired or not.
    pub fn registered(&self) -> usize {
        self.timeline.len()
    }

    /// Number of registered events still to fire in this pass.
    pub fn pending(&self) -> usize {
        self.timeline.remaining()
    }

    pub fn triggered_notes(&self) -> &[TriggeredNote] {
        &self.triggered
    }

    pub fn take_triggered(&mut self) -> Vec<TriggeredNote> {
        std::mem::take(&mut self.triggered)
    }
}

impl AudioClock for ManualClock {
    fn is_suspended(&self) -> bool {
        self.suspended
    }

    fn resume(&mut self) {
        self.suspended = false;
    }

    fn register(&mut self, event: TimelineEvent) {
        self.timeline.insert(event);
    }

    fn cancel_all_pending(&mut self) {
        self.timeline.clear();
    }

    /// (Re)start from the loop start.
    fn start(&mut self) {
        self.playing = true;
        self.position = self.loop_start;
        self.timeline.reset_cursor();
    }

    fn stop(&mut self) {
        self.playing = false;
        self.position = Duration::ZERO;
        self.timeline.reset_cursor();
    }

    fn set_loop_bounds(&mut self, start: Duration, end: Duration) {
        self.loop_start = start;
        self.loop_end = end;
    }

    fn set_loop_enabled(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn set_tempo(&mut self, bpm: f64) {
        self.bpm = bpm;
    }

    fn trigger_note(&mut self, note: &str, length: NoteLength, at: Option<Duration>) {
        if self.muted {
            return;
        }
        self.triggered.push(TriggeredNote {
            note: note.to_string(),
            length,
            at,
        });
    }
}
