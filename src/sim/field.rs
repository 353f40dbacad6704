//! Obstacle and collectible pools
//!
//! Two recycling policies coexist:
//! - pass-through: obstacles that fall behind are removed and score a pass,
//!   new ones are appended by spawn events (capped at `max_live`)
//! - in-place: the pool keeps its initial cardinality; entities that fall
//!   behind are repositioned past the frontier with a fresh shape and color
//!
//! Entities are kept in id order so iteration is deterministic.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Collectible, Obstacle, ObstacleShape};
use super::tuning::{Elevation, FieldTuning};

/// Pool of obstacles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    pub items: Vec<Obstacle>,
    next_id: u32,
}

/// Pool of collectibles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectibleField {
    pub items: Vec<Collectible>,
}

fn draw_shape<R: Rng>(tuning: &FieldTuning, rng: &mut R) -> ObstacleShape {
    tuning.shapes[rng.random_range(0..tuning.shapes.len())]
}

fn draw_color<R: Rng>(tuning: &FieldTuning, rng: &mut R) -> u32 {
    tuning.palette[rng.random_range(0..tuning.palette.len())]
}

fn draw_lateral<R: Rng>(tuning: &FieldTuning, rng: &mut R) -> f32 {
    if tuning.lateral_spread > 0.0 {
        rng.random_range(-tuning.lateral_spread..=tuning.lateral_spread)
    } else {
        0.0
    }
}

fn draw_height<R: Rng>(tuning: &FieldTuning, shape: &ObstacleShape, rng: &mut R) -> f32 {
    match tuning.elevation {
        Elevation::Fixed(y) => y,
        Elevation::Random { floor, ceiling } => {
            let height = shape.extent().y;
            let top = (ceiling - height).max(floor);
            rng.random_range(floor..=top) + height / 2.0
        }
    }
}

impl ObstacleField {
    /// Lay out `obstacle_count` obstacles ahead of the ball
    pub fn initial_layout<R: Rng>(tuning: &FieldTuning, ball_forward: f32, rng: &mut R) -> Self {
        let mut field = Self {
            items: Vec::with_capacity(tuning.obstacle_count.max(tuning.max_live)),
            next_id: 1,
        };
        for i in 0..tuning.obstacle_count {
            let forward = ball_forward + tuning.obstacle_start + i as f32 * tuning.obstacle_spacing;
            let obstacle = field.make(forward, tuning, rng);
            field.items.push(obstacle);
        }
        field
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// New obstacle whose leading edge sits at `forward`
    fn make<R: Rng>(&mut self, forward: f32, tuning: &FieldTuning, rng: &mut R) -> Obstacle {
        let id = self.next_id;
        self.next_id += 1;
        let shape = draw_shape(tuning, rng);
        let color = draw_color(tuning, rng);
        Obstacle {
            id,
            pos: Vec3::new(
                forward + shape.extent().x / 2.0,
                draw_height(tuning, &shape, rng),
                draw_lateral(tuning, rng),
            ),
            shape,
            color,
        }
    }

    /// Spawn event: append one obstacle just past the frontier.
    /// Returns false if the pool is at its live cap.
    pub fn spawn<R: Rng>(&mut self, frontier: f32, tuning: &FieldTuning, rng: &mut R) -> bool {
        if self.items.len() >= tuning.max_live {
            log::debug!("Obstacle cap ({}) reached, skipping spawn", tuning.max_live);
            return false;
        }
        let obstacle = self.make(frontier + tuning.spawn_ahead, tuning, rng);
        self.items.push(obstacle);
        true
    }

    /// Move every obstacle toward the ball
    pub fn approach(&mut self, speed: f32) {
        if speed == 0.0 {
            return;
        }
        for obstacle in &mut self.items {
            obstacle.pos.x -= speed;
        }
    }

    /// Pass-through policy: drop obstacles fully behind `offset - behind_margin`.
    /// Returns how many were removed.
    pub fn remove_passed(&mut self, offset: f32, tuning: &FieldTuning) -> u32 {
        let limit = offset - tuning.behind_margin;
        let before = self.items.len();
        self.items.retain(|o| o.trailing_edge() >= limit);
        (before - self.items.len()) as u32
    }

    /// In-place policy: reposition obstacles fully behind `offset - behind_margin`
    /// to just past the frontier, redrawing lane, shape and color.
    /// Returns how many were recycled.
    pub fn recycle_behind<R: Rng>(&mut self, offset: f32, frontier: f32, tuning: &FieldTuning, rng: &mut R) -> u32 {
        let limit = offset - tuning.behind_margin;
        let mut recycled = 0;
        for obstacle in &mut self.items {
            if obstacle.trailing_edge() < limit {
                let shape = draw_shape(tuning, rng);
                obstacle.shape = shape;
                obstacle.color = draw_color(tuning, rng);
                obstacle.pos = Vec3::new(
                    frontier + tuning.spawn_ahead + shape.extent().x / 2.0,
                    draw_height(tuning, &shape, rng),
                    draw_lateral(tuning, rng),
                );
                recycled += 1;
            }
        }
        recycled
    }
}

impl CollectibleField {
    /// Lay out `collectible_count` gems ahead of the ball
    pub fn initial_layout<R: Rng>(tuning: &FieldTuning, ball_forward: f32, rng: &mut R) -> Self {
        let items = (0..tuning.collectible_count)
            .map(|i| Collectible {
                id: i as u32 + 1,
                pos: Vec3::new(
                    ball_forward + tuning.collectible_start + i as f32 * tuning.collectible_spacing,
                    tuning.collectible_height,
                    draw_lateral(tuning, rng),
                ),
                collected: false,
            })
            .collect();
        Self { items }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Move every collectible toward the ball
    pub fn approach(&mut self, speed: f32) {
        if speed == 0.0 {
            return;
        }
        for gem in &mut self.items {
            gem.pos.x -= speed;
        }
    }

    /// Reposition gems behind `offset - behind_margin` past the frontier.
    /// This is the only place the sticky `collected` flag is cleared.
    pub fn recycle_behind<R: Rng>(&mut self, offset: f32, frontier: f32, tuning: &FieldTuning, rng: &mut R) -> u32 {
        let limit = offset - tuning.behind_margin;
        let mut recycled = 0;
        for gem in &mut self.items {
            if gem.pos.x < limit {
                gem.pos = Vec3::new(
                    frontier + tuning.spawn_ahead,
                    tuning.collectible_height,
                    draw_lateral(tuning, rng),
                );
                gem.collected = false;
                recycled += 1;
            }
        }
        recycled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tuning::Tuning;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_perspective_initial_layout() {
        let tuning = Tuning::perspective().field;
        let mut rng = Pcg32::seed_from_u64(3);
        let obstacles = ObstacleField::initial_layout(&tuning, 0.0, &mut rng);
        let gems = CollectibleField::initial_layout(&tuning, 0.0, &mut rng);

        assert_eq!(obstacles.len(), 10);
        assert_eq!(gems.len(), 15);
        for obstacle in &obstacles.items {
            assert!(obstacle.pos.x >= tuning.obstacle_start);
            assert!(obstacle.pos.z.abs() <= tuning.lateral_spread);
            assert!(tuning.palette.contains(&obstacle.color));
            assert!(tuning.shapes.contains(&obstacle.shape));
        }
        assert!(gems.items.iter().all(|g| !g.collected));
    }

    #[test]
    fn test_flat_spawn_places_past_frontier() {
        let tuning = Tuning::flat().field;
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = ObstacleField::initial_layout(&tuning, 100.0, &mut rng);
        assert!(field.is_empty());

        assert!(field.spawn(700.0, &tuning, &mut rng));
        let obstacle = &field.items[0];
        let extent = obstacle.shape.extent();
        assert_eq!(obstacle.pos.x - extent.x / 2.0, 750.0);
        // Bottom edge on or above the floor, top edge under the spawn ceiling
        assert!(obstacle.pos.y - extent.y / 2.0 >= 0.0);
        assert!(obstacle.pos.y + extent.y / 2.0 <= 500.0 + 1e-3);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut tuning = Tuning::flat().field;
        tuning.max_live = 2;
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = ObstacleField::default();
        assert!(field.spawn(0.0, &tuning, &mut rng));
        assert!(field.spawn(0.0, &tuning, &mut rng));
        assert!(!field.spawn(0.0, &tuning, &mut rng));
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_remove_passed_counts() {
        let tuning = Tuning::flat().field;
        let mut rng = Pcg32::seed_from_u64(3);
        let mut field = ObstacleField::default();
        field.spawn(0.0, &tuning, &mut rng);
        field.spawn(1000.0, &tuning, &mut rng);

        // Offset far enough that only the first is fully behind
        let removed = field.remove_passed(500.0, &tuning);
        assert_eq!(removed, 1);
        assert_eq!(field.len(), 1);
        assert!(field.items[0].pos.x > 1000.0);
    }

    #[test]
    fn test_collected_flag_clears_only_on_recycle() {
        let tuning = Tuning::perspective().field;
        let mut rng = Pcg32::seed_from_u64(3);
        let mut gems = CollectibleField::initial_layout(&tuning, 0.0, &mut rng);
        gems.items[0].collected = true;
        let first_x = gems.items[0].pos.x;

        // Still ahead: nothing recycled, flag stays set
        assert_eq!(gems.recycle_behind(0.0, 180.0, &tuning, &mut rng), 0);
        assert!(gems.items[0].collected);

        // Scroll past it: position and flag reset together
        let offset = first_x + tuning.behind_margin + 1.0;
        assert!(gems.recycle_behind(offset, offset + 190.0, &tuning, &mut rng) >= 1);
        assert!(!gems.items[0].collected);
        assert_eq!(gems.items[0].pos.x, offset + 190.0 + tuning.spawn_ahead);
    }

    proptest! {
        #[test]
        fn in_place_recycling_keeps_cardinality(seed in any::<u64>(), steps in 1usize..500) {
            let tuning = Tuning::perspective().field;
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut obstacles = ObstacleField::initial_layout(&tuning, 0.0, &mut rng);
            let mut gems = CollectibleField::initial_layout(&tuning, 0.0, &mut rng);
            let ids: Vec<u32> = obstacles.items.iter().map(|o| o.id).collect();

            for step in 0..steps {
                let offset = step as f32 * 0.5;
                obstacles.approach(0.1);
                gems.approach(0.1);
                obstacles.recycle_behind(offset, offset + 190.0, &tuning, &mut rng);
                gems.recycle_behind(offset, offset + 190.0, &tuning, &mut rng);
                prop_assert_eq!(obstacles.len(), 10);
                prop_assert_eq!(gems.len(), 15);
            }
            let after: Vec<u32> = obstacles.items.iter().map(|o| o.id).collect();
            prop_assert_eq!(ids, after);
        }
    }
}
