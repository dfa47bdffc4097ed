//! Contract definitions for the pattern engine.
//!
//! This module contains trait definitions that detectors and time sources
//! must implement.

mod clock;
mod pattern_detector;

pub use clock::{Clock, SystemClock};
pub use pattern_detector::PatternDetector;
