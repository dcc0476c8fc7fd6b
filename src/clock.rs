//! Fixed-rate frame pacing
//!
//! Browsers hand us variable frame deltas; the simulation only understands
//! fixed 60 Hz ticks. The accumulator converts one into the other and caps
//! catch-up work after long stalls.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Longest frame delta accepted, in seconds
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Debug, Clone, Default)]
pub struct FixedTimestep {
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame delta (seconds) and return how many ticks to run now
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_deltas_accumulate() {
        let mut clock = FixedTimestep::new();
        assert_eq!(clock.advance(SIM_DT * 0.6), 0);
        assert_eq!(clock.advance(SIM_DT * 0.6), 1);
    }

    #[test]
    fn test_one_second_is_sixty_ticks() {
        let mut clock = FixedTimestep::new();
        let total: u32 = (0..100).map(|_| clock.advance(0.01)).sum();
        // Float error may leave the last tick pending
        assert!((59..=60).contains(&total));
    }

    #[test]
    fn test_long_stall_is_capped() {
        let mut clock = FixedTimestep::new();
        let ticks = clock.advance(5.0);
        // Clamped to a tenth of a second
        assert!((5..=6).contains(&ticks));
        assert!(ticks <= MAX_SUBSTEPS);
        assert!(clock.advance(0.0) <= 1);
    }

    #[test]
    fn test_negative_delta_ignored() {
        let mut clock = FixedTimestep::new();
        assert_eq!(clock.advance(-1.0), 0);
        clock.reset();
        assert_eq!(clock.advance(SIM_DT * 1.01), 1);
    }
}
