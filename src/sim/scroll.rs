//! World scroll: camera offset, spawn threshold and difficulty ramp

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::tuning::ScrollTuning;
use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};

/// Viewport reported by the resize collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// How far ahead of the scroll offset the world is visible
    pub fn spawn_extent(&self, tuning: &ScrollTuning) -> f32 {
        tuning.view_depth.unwrap_or(self.width)
    }
}

/// Camera offset and spawn bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldScroller {
    /// Ball forward coordinate minus the lead distance
    pub offset: f32,
    /// Spawn once the frontier passes this coordinate
    pub next_spawn: f32,
    /// Speed at which the world approaches the ball
    pub speed: f32,
}

impl WorldScroller {
    pub fn new(tuning: &ScrollTuning, ball_forward: f32) -> Self {
        Self {
            offset: ball_forward - tuning.lead_distance,
            next_spawn: tuning.first_spawn,
            speed: tuning.world_speed,
        }
    }

    #[inline]
    pub fn frontier(&self, extent: f32) -> f32 {
        self.offset + extent
    }

    /// Follow the ball and ramp speed. Returns true when a spawn is due, in
    /// which case the threshold has already moved a random gap past the
    /// current frontier.
    pub fn advance<R: Rng>(&mut self, ball_forward: f32, extent: f32, tuning: &ScrollTuning, rng: &mut R) -> bool {
        self.offset = ball_forward - tuning.lead_distance;
        self.speed += tuning.world_speed_ramp;

        let frontier = self.frontier(extent);
        if frontier > self.next_spawn {
            let gap = rng.random_range(tuning.spawn_gap.min..=tuning.spawn_gap.max);
            self.next_spawn = frontier + gap;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_offset_tracks_ball() {
        let tuning = Tuning::flat().scroll;
        let mut rng = Pcg32::seed_from_u64(1);
        let mut scroller = WorldScroller::new(&tuning, 100.0);
        assert_eq!(scroller.offset, -100.0);

        scroller.advance(350.0, 800.0, &tuning, &mut rng);
        assert_eq!(scroller.offset, 150.0);
    }

    #[test]
    fn test_spawn_threshold_advances_by_gap() {
        let tuning = Tuning::flat().scroll;
        let mut rng = Pcg32::seed_from_u64(1);
        let mut scroller = WorldScroller::new(&tuning, 100.0);

        // Frontier = -100 + 800 = 700 > 400
        assert!(scroller.advance(100.0, 800.0, &tuning, &mut rng));
        let gap = scroller.next_spawn - 700.0;
        assert!(tuning.spawn_gap.contains(gap));

        // Not due again until the frontier catches up
        assert!(!scroller.advance(101.0, 800.0, &tuning, &mut rng));
    }

    #[test]
    fn test_speed_ramps_every_tick() {
        let tuning = Tuning::perspective().scroll;
        let mut rng = Pcg32::seed_from_u64(1);
        let mut scroller = WorldScroller::new(&tuning, 0.0);
        for _ in 0..100 {
            scroller.advance(0.0, 190.0, &tuning, &mut rng);
        }
        let expected = tuning.world_speed + 100.0 * tuning.world_speed_ramp;
        assert!((scroller.speed - expected).abs() < 1e-5);
    }

    #[test]
    fn test_viewport_extent() {
        let flat = Tuning::flat().scroll;
        let persp = Tuning::perspective().scroll;
        let viewport = Viewport::new(1024.0, 768.0);
        assert_eq!(viewport.spawn_extent(&flat), 1024.0);
        assert_eq!(viewport.spawn_extent(&persp), 190.0);
    }
}
