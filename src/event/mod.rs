//! Event layer — musical time, timeline events, the program scheduler and
//! the audio clock boundary.
//!
//! The [`Scheduler`] turns source lines into a [`Schedule`] of
//! [`TimelineEvent`]s. The transport registers those with an [`AudioClock`],
//! which fires them back in time order. Nothing here touches audio hardware,
//! so all scheduling logic is testable with a [`ManualClock`].

pub mod beat;
pub mod clock;
pub mod scheduler;
pub mod timeline;
pub mod types;

pub use beat::{beat_duration, Beat, TICKS_PER_BEAT};
pub use clock::{AudioClock, ManualClock, NoteLength, TriggeredNote};
pub use scheduler::{Schedule, Scheduler, NOTE_LENGTH};
pub use timeline::Timeline;
pub use types::{EventKind, TimelineEvent};
