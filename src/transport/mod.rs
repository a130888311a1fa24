//! Transport controller — play/stop/loop/mute state and the glue between the
//! scheduler, the audio clock and the piano/editor widgets.
//!
//! Every state change is an explicit call (`set_playing`, `set_looping`,
//! `set_muted`, ...) that performs its effect immediately. The one deferred
//! path is [`TransportController::request_reevaluate`], which only takes
//! effect when the clock next reaches the loop boundary.

pub mod input;

use std::time::Duration;

use log::{debug, info, warn};

use crate::dsl::ParseError;
use crate::event::{beat_duration, AudioClock, EventKind, NoteLength, Scheduler, TimelineEvent};
use crate::host::{EditorWidget, PianoWidget};
use crate::report::ErrorReporter;

pub use input::InputState;

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Stopped,
    Playing,
}

/// Session-wide transport flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportFlags {
    /// The instrument's samples are loaded.
    pub loaded: bool,
    pub playing: bool,
    pub looping: bool,
    pub muted: bool,
    /// Re-parse and reschedule at the next loop boundary.
    pub reevaluate: bool,
}

/// The external collaborators the transport drives.
#[derive(Debug)]
pub struct Collaborators<C, P, E> {
    pub clock: C,
    pub piano: P,
    pub editor: E,
}

/// What a `set_playing` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The program was scheduled and the clock started.
    Started { events: usize, loop_end: Duration },
    /// The instrument isn't ready; nothing happened.
    NotLoaded,
    /// The program has an error; it was reported and playback stays stopped.
    Rejected(ParseError),
    Stopped,
}

pub struct TransportController<C, P, E> {
    scheduler: Scheduler,
    reporter: ErrorReporter,
    flags: TransportFlags,
    input: InputState,
    ctx: Collaborators<C, P, E>,
}

impl<C: AudioClock, P: PianoWidget, E: EditorWidget> TransportController<C, P, E> {
    pub fn new(scheduler: Scheduler, reporter: ErrorReporter, ctx: Collaborators<C, P, E>) -> Self {
        Self {
            scheduler,
            reporter,
            flags: TransportFlags::default(),
            input: InputState::default(),
            ctx,
        }
    }

    pub fn flags(&self) -> TransportFlags {
        self.flags
    }

    pub fn state(&self) -> PlayState {
        if self.flags.playing {
            PlayState::Playing
        } else {
            PlayState::Stopped
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn clock(&self) -> &C {
        &self.ctx.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.ctx.clock
    }

    pub fn piano(&self) -> &P {
        &self.ctx.piano
    }

    pub fn editor(&self) -> &E {
        &self.ctx.editor
    }

    pub fn editor_mut(&mut self) -> &mut E {
        &mut self.ctx.editor
    }

    /// The sampler finished loading; playback may start.
    pub fn on_instrument_ready(&mut self) {
        info!("instrument loaded");
        self.flags.loaded = true;
    }

    pub fn set_playing(&mut self, playing: bool) -> PlayOutcome {
        if playing {
            self.play()
        } else {
            self.stop();
            PlayOutcome::Stopped
        }
    }

    pub fn toggle_playing(&mut self) -> PlayOutcome {
        self.set_playing(!self.flags.playing)
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.flags.looping = looping;
        self.ctx.clock.set_loop_enabled(looping);
    }

    pub fn toggle_looping(&mut self) {
        self.set_looping(!self.flags.looping);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.flags.muted = muted;
        self.ctx.clock.set_muted(muted);
    }

    /// Change the tempo used by the next (re-)schedule.
    pub fn set_tempo(&mut self, bpm: f64) {
        self.scheduler.set_beat_duration(beat_duration(bpm));
        self.ctx.clock.set_tempo(bpm);
    }

    /// Pick up editor changes at the next loop boundary.
    pub fn request_reevaluate(&mut self) {
        self.flags.reevaluate = true;
    }

    /// Apply a fired clock event. Events arriving while stopped are stale and dropped.
    pub fn handle_event(&mut self, event: &TimelineEvent) {
        if !self.flags.playing {
            debug!("dropping {:?} fired while stopped", event.kind);
            return;
        }

        match &event.kind {
            EventKind::NoteOn { midi, note } => {
                self.ctx
                    .clock
                    .trigger_note(note, NoteLength::Quarter, Some(event.time));
                self.ctx.piano.toggle_key(*midi);
            }
            EventKind::NoteOff { midi } => self.ctx.piano.toggle_key(*midi),
            EventKind::LineHighlight { line } => self.ctx.editor.highlight_line(*line),
            EventKind::LoopBoundaryReached => self.on_loop_boundary(),
        }
    }

    fn play(&mut self) -> PlayOutcome {
        if !self.flags.loaded {
            info!("instrument not loaded yet, ignoring play");
            return PlayOutcome::NotLoaded;
        }

        let ctx = &mut self.ctx;
        if ctx.clock.is_suspended() {
            ctx.clock.resume();
        }
        ctx.piano.reset_all_keys();
        ctx.clock.cancel_all_pending();
        ctx.editor.clear_decorations();

        let lines = ctx.editor.lines();
        match self.scheduler.schedule(&lines) {
            Ok(schedule) => {
                let events = schedule.len();
                let loop_end = schedule.loop_end;
                ctx.clock.set_loop_bounds(Duration::ZERO, loop_end);
                for event in schedule.events {
                    ctx.clock.register(event);
                }
                ctx.clock.start();
                self.flags.playing = true;
                info!("playing {events} events, loop end {loop_end:?}");
                PlayOutcome::Started { events, loop_end }
            }
            Err(error) => {
                warn!("not playing: {error}");
                self.stop();
                let decoration = self.reporter.report(&error);
                self.ctx
                    .editor
                    .decorate(decoration.line, &decoration.message);
                PlayOutcome::Rejected(error)
            }
        }
    }

    fn stop(&mut self) {
        if self.flags.playing {
            info!("stopping");
        }
        self.flags.playing = false;
        self.ctx.clock.stop();
        self.ctx.piano.reset_all_keys();
        self.ctx.editor.clear_highlight();
    }

    fn on_loop_boundary(&mut self) {
        if !self.flags.looping {
            self.stop();
            return;
        }

        if self.flags.reevaluate {
            self.flags.reevaluate = false;
            info!("re-evaluating program at loop boundary");
            self.play();
        } else {
            self.ctx.piano.reset_all_keys();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::ParseErrorKind;
    use crate::event::ManualClock;
    use crate::host::{KeyboardState, TextBuffer};
    use crate::pitch::KeyRange;

    type Controller = TransportController<ManualClock, KeyboardState, TextBuffer>;

    fn controller(text: &str) -> Controller {
        let mut c = TransportController::new(
            Scheduler::with_bpm(60.0),
            ErrorReporter::default(),
            Collaborators {
                clock: ManualClock::new(60.0),
                piano: KeyboardState::new(KeyRange::PIANO),
                editor: TextBuffer::new(text),
            },
        );
        c.on_instrument_ready();
        c
    }

    fn run(c: &mut Controller, by: Duration) {
        for event in c.clock_mut().advance(by) {
            c.handle_event(&event);
        }
    }

    #[test]
    fn not_loaded_is_a_noop() {
        let mut c = TransportController::new(
            Scheduler::with_bpm(60.0),
            ErrorReporter::default(),
            Collaborators {
                clock: ManualClock::new(60.0),
                piano: KeyboardState::default(),
                editor: TextBuffer::new("toca do"),
            },
        );
        assert_eq!(c.set_playing(true), PlayOutcome::NotLoaded);
        assert_eq!(c.state(), PlayState::Stopped);
        assert_eq!(c.clock().registered(), 0);
    }

    #[test]
    fn play_registers_schedule_and_starts() {
        let mut c = controller("toca do\nespera 1");
        let outcome = c.set_playing(true);
        assert_eq!(
            outcome,
            PlayOutcome::Started {
                events: 4,
                loop_end: Duration::from_secs(1)
            }
        );
        assert_eq!(c.state(), PlayState::Playing);
        assert!(c.clock().is_playing());
        assert_eq!(c.clock().registered(), 4);
        assert_eq!(
            c.clock().loop_bounds(),
            (Duration::ZERO, Duration::from_secs(1))
        );
    }

    #[test]
    fn play_twice_keeps_one_schedule() {
        let mut c = controller("toca do\nespera 1\ntoca re\nespera 1");
        c.set_playing(true);
        let once = c.clock().registered();
        c.set_playing(true);
        assert_eq!(c.clock().registered(), once);
    }

    #[test]
    fn play_resumes_suspended_clock() {
        let mut c = TransportController::new(
            Scheduler::with_bpm(60.0),
            ErrorReporter::default(),
            Collaborators {
                clock: ManualClock::new(60.0).suspended(),
                piano: KeyboardState::default(),
                editor: TextBuffer::new("espera 1"),
            },
        );
        c.on_instrument_ready();
        c.set_playing(true);
        assert!(!c.clock().is_suspended());
    }

    #[test]
    fn error_is_decorated_and_nothing_plays() {
        let mut c = controller("toca do\nfoo 1\nespera 1");
        let outcome = c.set_playing(true);
        match outcome {
            PlayOutcome::Rejected(err) => {
                assert_eq!(err.kind, ParseErrorKind::InvalidInstruction);
                assert_eq!(err.line, 1);
            }
            other => panic!("expected rejection, got {other:?}"),
        }
        assert_eq!(c.state(), PlayState::Stopped);
        assert_eq!(c.clock().registered(), 0);
        let decoration = c.editor().decoration().unwrap();
        assert_eq!(decoration.line, 1);
        assert_eq!(decoration.message, "the instruction must be toca or espera");
    }

    #[test]
    fn successful_play_clears_old_decoration() {
        let mut c = controller("foo");
        c.set_playing(true);
        assert!(c.editor().decoration().is_some());

        c.editor_mut().set_text("espera 1");
        c.set_playing(true);
        assert!(c.editor().decoration().is_none());
    }

    #[test]
    fn events_drive_piano_and_editor() {
        let mut c = controller("toca do\nespera 1\ntoca mi\nespera 1");
        c.set_playing(true);

        run(&mut c, Duration::ZERO);
        assert_eq!(c.piano().keys_down(), vec![60]);
        assert_eq!(c.editor().highlighted_line(), Some(1));
        assert_eq!(c.clock().triggered_notes()[0].note, "C3");

        run(&mut c, Duration::from_secs(1));
        assert_eq!(c.piano().keys_down(), vec![64]);
        assert_eq!(c.editor().highlighted_line(), Some(3));
    }

    #[test]
    fn boundary_without_loop_stops() {
        let mut c = controller("toca do\nespera 1");
        c.set_playing(true);
        run(&mut c, Duration::from_secs(1));

        assert_eq!(c.state(), PlayState::Stopped);
        assert!(!c.clock().is_playing());
        assert!(c.piano().keys_down().is_empty());
        assert_eq!(c.editor().highlighted_line(), None);
    }

    #[test]
    fn boundary_with_loop_keeps_playing() {
        let mut c = controller("toca do\nespera 1");
        c.set_looping(true);
        c.set_playing(true);
        run(&mut c, Duration::from_secs(1));

        assert_eq!(c.state(), PlayState::Playing);
        assert!(c.piano().keys_down().is_empty());

        run(&mut c, Duration::ZERO);
        assert_eq!(c.piano().keys_down(), vec![60]);
    }

    #[test]
    fn reevaluate_waits_for_boundary() {
        let mut c = controller("toca do\nespera 2");
        c.set_looping(true);
        c.set_playing(true);
        run(&mut c, Duration::ZERO);

        c.editor_mut().set_text("toca sol\nespera 2");
        c.request_reevaluate();
        assert!(c.flags().reevaluate);

        run(&mut c, Duration::from_secs(1));
        assert!(c.piano().keys_down().is_empty());
        assert!(c.flags().reevaluate);

        run(&mut c, Duration::from_secs(1));
        assert!(!c.flags().reevaluate);

        run(&mut c, Duration::ZERO);
        assert_eq!(c.piano().keys_down(), vec![67]);
    }

    #[test]
    fn reevaluate_with_broken_edit_stops() {
        let mut c = controller("espera 1");
        c.set_looping(true);
        c.set_playing(true);

        c.editor_mut().set_text("espera nope");
        c.request_reevaluate();
        run(&mut c, Duration::from_secs(1));

        assert_eq!(c.state(), PlayState::Stopped);
        assert_eq!(c.editor().decoration().map(|d| d.line), Some(0));
    }

    #[test]
    fn stop_resets_widgets() {
        let mut c = controller("toca do\nespera 4");
        c.set_playing(true);
        run(&mut c, Duration::ZERO);
        assert!(!c.piano().keys_down().is_empty());

        assert_eq!(c.set_playing(false), PlayOutcome::Stopped);
        assert!(c.piano().keys_down().is_empty());
        assert_eq!(c.editor().highlighted_line(), None);
        assert!(!c.clock().is_playing());
    }

    #[test]
    fn loop_and_mute_are_forwarded() {
        let mut c = controller("");
        c.toggle_looping();
        assert!(c.clock().loop_enabled());
        assert!(c.flags().looping);
        c.set_muted(true);
        assert!(c.clock().is_muted());
        c.toggle_looping();
        assert!(!c.clock().loop_enabled());
    }

    #[test]
    fn tempo_applies_to_next_schedule() {
        let mut c = controller("espera 2");
        c.set_tempo(120.0);
        assert_eq!(c.clock().bpm(), 120.0);
        let outcome = c.set_playing(true);
        assert_eq!(
            outcome,
            PlayOutcome::Started {
                events: 2,
                loop_end: Duration::from_secs(1)
            }
        );
    }

    #[test]
    fn unplayably_slow_tempo_does_not_panic() {
        let mut c = controller("toca do\nespera 1");
        c.set_tempo(1e-20);
        let outcome = c.set_playing(true);
        assert_eq!(
            outcome,
            PlayOutcome::Started {
                events: 4,
                loop_end: Duration::ZERO
            }
        );
    }

    #[test]
    fn toggle_playing_flips_state() {
        let mut c = controller("espera 1");
        c.toggle_playing();
        assert_eq!(c.state(), PlayState::Playing);
        c.toggle_playing();
        assert_eq!(c.state(), PlayState::Stopped);
    }

    #[test]
    fn stale_events_after_stop_are_dropped() {
        let mut c = controller("toca do\nespera 1");
        c.set_playing(true);
        let fired = c.clock_mut().advance(Duration::ZERO);
        c.set_playing(false);
        for event in &fired {
            c.handle_event(event);
        }
        assert!(c.piano().keys_down().is_empty());
    }
}
