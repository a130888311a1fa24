//! Musical time representation using integer ticks.
//!
//! Uses 960 PPQN (Pulses Per Quarter Note) so that summing many `espera`
//! offsets never accumulates floating-point error. Conversion to wall-clock
//! [`Duration`]s happens only at the scheduling boundary.

use std::cmp::Ordering;
use std::ops::{Add, Sub};
use std::time::Duration;

/// Ticks per quarter note (beat). 960 divides cleanly by 2, 3, 4, 5, 6, 8,
/// 10, 12, 15, 16, 20, 24, 32, etc.
pub const TICKS_PER_BEAT: u64 = 960;

/// Musical time measured in integer ticks at [`TICKS_PER_BEAT`] resolution.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct Beat {
    ticks: u64,
}

impl Beat {
    /// Zero time — the very start of the timeline.
    pub const ZERO: Beat = Beat { ticks: 0 };

    /// Create a `Beat` from a raw tick count.
    pub const fn from_ticks(ticks: u64) -> Self {
        Self { ticks }
    }

    /// Create a `Beat` from whole beats (quarter notes).
    pub fn from_beats(beats: u32) -> Self {
        Self {
            ticks: beats as u64 * TICKS_PER_BEAT,
        }
    }

    /// Create a `Beat` from a fractional beat value (e.g. 1.5 = one and a half beats).
    pub fn from_beats_f64(beats: f64) -> Self {
        Self {
            ticks: (beats * TICKS_PER_BEAT as f64).round() as u64,
        }
    }

    /// Like [`Beat::from_beats_f64`], but `None` for negative, NaN or
    /// infinite input.
    pub fn try_from_beats_f64(beats: f64) -> Option<Self> {
        if beats.is_finite() && beats >= 0.0 {
            Some(Self::from_beats_f64(beats))
        } else {
            None
        }
    }

    /// Return the raw tick count.
    pub fn ticks(self) -> u64 {
        self.ticks
    }

    /// Convert to a floating-point beat value.
    pub fn as_beats_f64(self) -> f64 {
        self.ticks as f64 / TICKS_PER_BEAT as f64
    }

    /// Wall-clock time of this position when one beat lasts `beat_duration`.
    ///
    /// Integer nanosecond arithmetic, so whole beats map exactly.
    pub fn to_duration(self, beat_duration: Duration) -> Duration {
        let nanos = beat_duration
            .as_nanos()
            .saturating_mul(self.ticks as u128)
            / TICKS_PER_BEAT as u128;
        Duration::from_nanos(nanos.min(u64::MAX as u128) as u64)
    }
}

/// Length of one quarter-note beat at `bpm`.
///
/// Zero for tempos with no representable beat: non-positive, NaN, or so
/// slow the beat overflows a `Duration`.
pub fn beat_duration(bpm: f64) -> Duration {
    if bpm.is_finite() && bpm > 0.0 {
        Duration::try_from_secs_f64(60.0 / bpm).unwrap_or(Duration::ZERO)
    } else {
        Duration::ZERO
    }
}

impl Ord for Beat {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ticks.cmp(&other.ticks)
    }
}

impl PartialOrd for Beat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Beat {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            ticks: self.ticks.saturating_add(rhs.ticks),
        }
    }
}

impl Sub for Beat {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            ticks: self.ticks.saturating_sub(rhs.ticks),
        }
    }
}
