//! Ball-vs-entity overlap tests
//!
//! Two approximations, chosen per variant: axis-aligned boxes in the
//! forward/vertical plane, or center distance (every entity treated as a
//! sphere regardless of its real shape). Pools are small, so every live
//! entity is scanned every tick.

use glam::{Vec2, Vec3};

use super::state::{Ball, Collectible, Obstacle};
use super::tuning::CollisionModel;

/// Axis-aligned box given by its min corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    /// Box enclosing a ball: center ± radius
    pub fn around_ball(center: Vec2, radius: f32) -> Self {
        Self::from_center(center, Vec2::splat(radius * 2.0))
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Center distance strictly below `threshold`
#[inline]
pub fn spheres_touch(a: Vec3, b: Vec3, threshold: f32) -> bool {
    a.distance_squared(b) < threshold * threshold
}

impl CollisionModel {
    /// Does the ball touch an entity centered at `center` with bounding `extent`?
    pub fn touches(&self, ball: &Ball, center: Vec3, extent: Vec3) -> bool {
        match *self {
            CollisionModel::Aabb => {
                let ball_box = Aabb::around_ball(ball.pos.truncate(), ball.radius);
                let entity = Aabb::from_center(center.truncate(), extent.truncate());
                ball_box.overlaps(&entity)
            }
            CollisionModel::Sphere { threshold } => spheres_touch(ball.pos, center, threshold),
        }
    }
}

/// First obstacle (in pool order) the ball touches. Any hit is fatal.
pub fn first_fatal(ball: &Ball, obstacles: &[Obstacle], model: CollisionModel) -> Option<u32> {
    obstacles
        .iter()
        .find(|o| model.touches(ball, o.pos, o.shape.extent()))
        .map(|o| o.id)
}

/// Mark every uncollected gem the ball touches as collected, calling
/// `on_collect` with each id. Already-collected gems are skipped.
/// Returns the number newly collected.
pub fn collect_touching(
    ball: &Ball,
    collectibles: &mut [Collectible],
    model: CollisionModel,
    gem_size: f32,
    mut on_collect: impl FnMut(u32),
) -> u32 {
    let extent = Vec3::splat(gem_size);
    let mut count = 0;
    for gem in collectibles.iter_mut().filter(|g| !g.collected) {
        if model.touches(ball, gem.pos, extent) {
            gem.collected = true;
            on_collect(gem.id);
            count += 1;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleShape;
    use crate::sim::tuning::Tuning;

    fn ball_at(pos: Vec3, radius: f32) -> Ball {
        let mut ball = Ball::new(&Tuning::perspective().ball);
        ball.pos = pos;
        ball.radius = radius;
        ball
    }

    #[test]
    fn test_aabb_overlap() {
        let ball_box = Aabb::new(0.0, 0.0, 10.0, 10.0);
        assert!(ball_box.overlaps(&Aabb::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!ball_box.overlaps(&Aabb::new(20.0, 20.0, 5.0, 5.0)));
        // Touching edges do not overlap
        assert!(!ball_box.overlaps(&Aabb::new(10.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_aabb_around_ball() {
        let b = Aabb::around_ball(Vec2::new(100.0, 50.0), 20.0);
        assert_eq!(b, Aabb::new(80.0, 30.0, 40.0, 40.0));
    }

    #[test]
    fn test_sphere_threshold() {
        assert!(spheres_touch(Vec3::ZERO, Vec3::new(0.0, 0.0, 0.9), 1.0));
        assert!(!spheres_touch(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.1), 1.0));
    }

    #[test]
    fn test_first_fatal_aabb() {
        let ball = ball_at(Vec3::new(100.0, 50.0, 0.0), 20.0);
        let obstacles = vec![
            Obstacle {
                id: 1,
                pos: Vec3::new(300.0, 50.0, 0.0),
                shape: ObstacleShape::Rect { width: 20.0, height: 100.0 },
                color: 0,
            },
            Obstacle {
                id: 2,
                pos: Vec3::new(125.0, 40.0, 0.0),
                shape: ObstacleShape::Rect { width: 20.0, height: 100.0 },
                color: 0,
            },
        ];
        assert_eq!(first_fatal(&ball, &obstacles, CollisionModel::Aabb), Some(2));
        assert_eq!(first_fatal(&ball, &obstacles[..1], CollisionModel::Aabb), None);
    }

    #[test]
    fn test_sphere_ignores_shape() {
        let ball = ball_at(Vec3::new(0.0, 1.0, 0.0), 0.5);
        let model = CollisionModel::Sphere { threshold: 1.0 };
        let wide = Obstacle {
            id: 7,
            pos: Vec3::new(0.0, 1.0, 1.2),
            shape: ObstacleShape::Cube { size: Vec3::splat(10.0) },
            color: 0,
        };
        assert_eq!(first_fatal(&ball, &[wide], model), None);
    }

    #[test]
    fn test_collect_is_idempotent() {
        let ball = ball_at(Vec3::new(0.0, 1.5, 0.0), 0.5);
        let model = CollisionModel::Sphere { threshold: 1.0 };
        let mut gems = vec![
            Collectible { id: 1, pos: Vec3::new(0.5, 1.5, 0.0), collected: false },
            Collectible { id: 2, pos: Vec3::new(5.0, 1.5, 0.0), collected: false },
        ];
        let mut seen = Vec::new();
        assert_eq!(collect_touching(&ball, &mut gems, model, 0.6, |id| seen.push(id)), 1);
        assert_eq!(seen, vec![1]);
        assert!(gems[0].collected);

        // Second pass over the same overlap scores nothing
        assert_eq!(collect_touching(&ball, &mut gems, model, 0.6, |_| {}), 0);
    }
}
