//! Geometric quality decay.
//!
//! Each step removes `round_half_up(quality * decay)` from the current quality,
//! at least 1, never going below the floor. Steps shrink as quality drops, so
//! high qualities are skipped through quickly while the low end near the floor
//! is still sampled finely.

use crate::Quality;

/// Quality to try after `current`.
///
/// Returns `floor` once `current` is at or below it.
pub fn next_quality(current: Quality, floor: Quality, decay: f64) -> Quality {
    if current <= floor {
        return floor;
    }
    // f64::round rounds halves away from zero, which is half-up for positives
    let step = (f64::from(current.get()) * decay).round().max(1.0) as u8;
    Quality::clamped(current.get().saturating_sub(step).max(floor.get()))
}

/// The qualities an engine would attempt, from the initial quality down to the floor.
///
/// The engine stops early when a candidate fits; this iterator always runs to
/// the floor.
#[derive(Debug, Clone)]
pub struct QualitySchedule {
    next: Option<Quality>,
    floor: Quality,
    decay: f64,
}

impl QualitySchedule {
    pub(crate) fn new(initial: Quality, floor: Quality, decay: f64) -> Self {
        Self {
            next: Some(initial),
            floor,
            decay,
        }
    }
}

impl Iterator for QualitySchedule {
    type Item = Quality;

    fn next(&mut self) -> Option<Quality> {
        let current = self.next?;
        self.next = (current > self.floor).then(|| next_quality(current, self.floor, self.decay));
        Some(current)
    }
}
