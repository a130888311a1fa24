//! Digisonic — a line-based melody notation (`toca do` / `espera 1`)
//! interpreted into a timeline that plays in sync with a piano display.

pub mod config;
pub mod dsl;
pub mod event;
pub mod host;
pub mod midi;
pub mod pitch;
pub mod report;
pub mod transport;
