//! Data-driven game balance
//!
//! Every physics, scroll and spawn constant lives here so the two game
//! variants differ only in data. Presets mirror the shipped games; custom
//! tunings can be loaded from JSON.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::ObstacleShape;
use crate::error::ConfigError;

/// Which game the simulation is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variant {
    /// Side-scrolling flat-plane game
    #[default]
    Flat,
    /// Perspective 3D highway game
    Perspective,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Flat => "flat",
            Variant::Perspective => "perspective",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "flat" | "2d" => Some(Variant::Flat),
            "perspective" | "3d" => Some(Variant::Perspective),
            _ => None,
        }
    }

    /// Preset tuning for this variant
    pub fn tuning(&self) -> Tuning {
        match self {
            Variant::Flat => Tuning::flat(),
            Variant::Perspective => Tuning::perspective(),
        }
    }
}

/// Axis that left/right input pushes along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SteerAxis {
    /// Left slows down, right speeds up (flat game)
    Forward,
    /// Left/right move across the track (3D game)
    Lateral,
}

/// How the "up" input acts on the ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JumpMode {
    /// Adds `jump_impulse` to vertical velocity every tick the input is held
    Thrust,
    /// Sets vertical velocity to `jump_impulse`, only within `epsilon` of the ground
    Grounded { epsilon: f32 },
}

/// Geometric approximation used for ball-vs-entity tests
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionModel {
    /// Axis-aligned boxes in the forward/vertical plane
    Aabb,
    /// Center distance below `threshold`, whatever the entity's shape
    Sphere { threshold: f32 },
}

/// What happens to an obstacle once it falls behind the scroll offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecyclePolicy {
    /// Removed (scoring a pass), new obstacles appended on spawn events
    PassThrough,
    /// Fixed pool; entities are repositioned ahead of the frontier
    InPlace,
}

/// Inclusive `[min, max]` range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Ball body constants (per-tick units)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallTuning {
    pub radius: f32,
    pub start: Vec3,
    /// Subtracted from vertical velocity every tick
    pub gravity: f32,
    /// Multiplicative air resistance (< 1)
    pub damping: f32,
    pub steer_axis: SteerAxis,
    pub steer_impulse: f32,
    pub jump_mode: JumpMode,
    pub jump_impulse: f32,
    pub down_impulse: f32,
    /// Forward acceleration applied regardless of input
    pub forward_drift: f32,
    pub forward_limit: Range,
    pub vertical_limit: Range,
    pub lateral_limit: Range,
    /// Lowest allowed ball center height
    pub ground_level: f32,
    pub ground_restitution: f32,
    /// Bounces slower than this come to rest
    pub min_bounce: f32,
    /// Highest allowed ball center height
    pub ceiling: Option<f32>,
    pub ceiling_restitution: f32,
    /// Lateral bound for the ball center (3D track edges)
    pub track_half_width: Option<f32>,
    pub wall_restitution: f32,
    /// Ball may not fall behind the scroll offset
    pub rear_wall: bool,
    pub trail_length: usize,
    pub trail_decay: f32,
}

/// World scroll constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollTuning {
    /// Distance the camera keeps behind the ball
    pub lead_distance: f32,
    /// Fixed visible depth; `None` uses the viewport width
    pub view_depth: Option<f32>,
    /// First spawn threshold (world forward coordinate)
    pub first_spawn: f32,
    pub spawn_gap: Range,
    /// Initial speed at which the world approaches the ball
    pub world_speed: f32,
    /// Added to world speed every tick
    pub world_speed_ramp: f32,
}

/// Vertical placement of freshly spawned obstacles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Elevation {
    /// Center at a fixed height
    Fixed(f32),
    /// Bottom edge anywhere between `floor` and `ceiling - height`
    Random { floor: f32, ceiling: f32 },
}

/// Entity pool constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldTuning {
    pub recycle: RecyclePolicy,
    pub collision: CollisionModel,
    pub shapes: Vec<ObstacleShape>,
    pub palette: Vec<u32>,
    pub elevation: Elevation,
    /// Lateral spawn positions are drawn from `[-spread, spread]`
    pub lateral_spread: f32,
    /// Initial layout: count, distance ahead of the ball, spacing
    pub obstacle_count: usize,
    pub obstacle_start: f32,
    pub obstacle_spacing: f32,
    pub collectible_count: usize,
    pub collectible_start: f32,
    pub collectible_spacing: f32,
    pub collectible_height: f32,
    pub collectible_size: f32,
    /// Distance past the frontier where new entities appear
    pub spawn_ahead: f32,
    /// Distance behind the scroll offset before an entity is removed/recycled
    pub behind_margin: f32,
    /// Upper bound on live obstacles under pass-through removal
    pub max_live: usize,
    pub pass_reward: u64,
    pub collect_reward: u64,
}

/// Beat clock constants (seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatTuning {
    /// Time between drum steps; the first step fires on the first tick
    pub step_interval: f32,
    /// Ball scale pulse on every n-th step
    pub pulse_every: u32,
    pub pulse_duration: f32,
    pub pulse_scale: f32,
}

/// Cosmetic particle constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleTuning {
    pub crash_burst: usize,
    pub crash_color: u32,
    pub speed: Range,
    pub gravity: f32,
    pub life_decay: f32,
}

/// Complete tuning for one variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    pub variant: Variant,
    pub ball: BallTuning,
    pub scroll: ScrollTuning,
    pub field: FieldTuning,
    pub beat: BeatTuning,
    pub particles: ParticleTuning,
}

/// Neon palette of the flat game
pub const FLAT_PALETTE: [u32; 5] = [0xFF6B9D, 0x00D4FF, 0x39FF14, 0xFFD700, 0xFF4757];
/// Neon palette of the 3D game
pub const TRACK_PALETTE: [u32; 6] = [0xFF6B9D, 0x00D4FF, 0x39FF14, 0xFFD700, 0xFF4757, 0x9C88FF];

impl Default for Tuning {
    fn default() -> Self {
        Self::flat()
    }
}

impl Tuning {
    /// Flat side-scroller (800x600 canvas, ground strip 50 px tall)
    pub fn flat() -> Self {
        let radius = 20.0;
        let play_height = 550.0;
        Self {
            variant: Variant::Flat,
            ball: BallTuning {
                radius,
                start: Vec3::new(100.0, 350.0, 0.0),
                gravity: 0.3,
                damping: 0.99,
                steer_axis: SteerAxis::Forward,
                steer_impulse: 0.5,
                jump_mode: JumpMode::Thrust,
                jump_impulse: 1.0,
                down_impulse: 0.5,
                forward_drift: 0.1,
                forward_limit: Range::new(-8.0, 8.0),
                vertical_limit: Range::new(-12.0, 12.0),
                lateral_limit: Range::new(0.0, 0.0),
                ground_level: radius,
                ground_restitution: 0.7,
                min_bounce: 0.5,
                ceiling: Some(play_height - radius),
                ceiling_restitution: 0.5,
                track_half_width: None,
                wall_restitution: 1.0,
                rear_wall: true,
                trail_length: 10,
                trail_decay: 0.9,
            },
            scroll: ScrollTuning {
                lead_distance: 200.0,
                view_depth: None,
                first_spawn: 400.0,
                spawn_gap: Range::new(100.0, 300.0),
                world_speed: 0.0,
                world_speed_ramp: 0.001,
            },
            field: FieldTuning {
                recycle: RecyclePolicy::PassThrough,
                collision: CollisionModel::Aabb,
                shapes: vec![
                    ObstacleShape::Rect { width: 20.0, height: 100.0 },
                    ObstacleShape::Rect { width: 40.0, height: 60.0 },
                    ObstacleShape::Rect { width: 60.0, height: 80.0 },
                    ObstacleShape::Rect { width: 30.0, height: 120.0 },
                ],
                palette: FLAT_PALETTE.to_vec(),
                elevation: Elevation::Random {
                    floor: 0.0,
                    ceiling: play_height - 50.0,
                },
                lateral_spread: 0.0,
                obstacle_count: 0,
                obstacle_start: 0.0,
                obstacle_spacing: 0.0,
                collectible_count: 0,
                collectible_start: 0.0,
                collectible_spacing: 0.0,
                collectible_height: 0.0,
                collectible_size: 0.0,
                spawn_ahead: 50.0,
                behind_margin: 100.0,
                max_live: 64,
                pass_reward: 10,
                collect_reward: 0,
            },
            beat: BeatTuning::default(),
            particles: ParticleTuning {
                crash_burst: 12,
                crash_color: 0xFF6B9D,
                speed: Range::new(2.0, 5.0),
                gravity: 0.1,
                life_decay: 0.02,
            },
        }
    }

    /// Perspective highway (8 unit wide road, camera 10 units behind the ball)
    pub fn perspective() -> Self {
        let radius = 0.5;
        Self {
            variant: Variant::Perspective,
            ball: BallTuning {
                radius,
                start: Vec3::new(0.0, 1.0, 0.0),
                gravity: 0.02,
                damping: 0.98,
                steer_axis: SteerAxis::Lateral,
                steer_impulse: 0.02,
                jump_mode: JumpMode::Grounded { epsilon: 0.6 },
                jump_impulse: 0.3,
                down_impulse: 0.05,
                forward_drift: 0.005,
                forward_limit: Range::new(0.0, 0.05),
                vertical_limit: Range::new(-0.5, 0.5),
                lateral_limit: Range::new(-0.3, 0.3),
                ground_level: radius,
                ground_restitution: 0.7,
                min_bounce: 0.0,
                ceiling: None,
                ceiling_restitution: 0.0,
                track_half_width: Some(3.5),
                wall_restitution: 1.0,
                rear_wall: false,
                trail_length: 10,
                trail_decay: 0.9,
            },
            scroll: ScrollTuning {
                lead_distance: 10.0,
                view_depth: Some(190.0),
                first_spawn: 0.0,
                spawn_gap: Range::new(15.0, 30.0),
                world_speed: 0.05,
                world_speed_ramp: 0.0001,
            },
            field: FieldTuning {
                recycle: RecyclePolicy::InPlace,
                collision: CollisionModel::Sphere { threshold: 1.0 },
                shapes: vec![
                    ObstacleShape::Cube { size: Vec3::new(1.0, 2.0, 1.0) },
                    ObstacleShape::Cylinder { radius: 0.5, height: 2.0 },
                    ObstacleShape::Pyramid { radius: 0.7, height: 2.0 },
                ],
                palette: TRACK_PALETTE.to_vec(),
                elevation: Elevation::Fixed(1.0),
                lateral_spread: 3.0,
                obstacle_count: 10,
                obstacle_start: 20.0,
                obstacle_spacing: 15.0,
                collectible_count: 15,
                collectible_start: 15.0,
                collectible_spacing: 10.0,
                collectible_height: 1.5,
                collectible_size: 0.6,
                spawn_ahead: 20.0,
                behind_margin: 10.0,
                max_live: 10,
                pass_reward: 0,
                collect_reward: 10,
            },
            beat: BeatTuning::default(),
            particles: ParticleTuning {
                crash_burst: 0,
                crash_color: 0xFF4757,
                speed: Range::new(0.0, 0.0),
                gravity: 0.0,
                life_decay: 0.02,
            },
        }
    }

    /// Parse a tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tunings the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.field.shapes.is_empty() {
            return invalid("obstacle shape catalog is empty");
        }
        if self.field.palette.is_empty() {
            return invalid("obstacle palette is empty");
        }
        if !(0.0..1.0).contains(&self.ball.damping) {
            return invalid("damping must be in [0, 1)");
        }
        if self.ball.ground_restitution >= 1.0 {
            return invalid("ground restitution must be below 1");
        }
        if self.ball.jump_impulse <= self.ball.down_impulse {
            return invalid("jump impulse must exceed down impulse");
        }
        for (name, range) in [
            ("forward_limit", self.ball.forward_limit),
            ("vertical_limit", self.ball.vertical_limit),
            ("lateral_limit", self.ball.lateral_limit),
            ("spawn_gap", self.scroll.spawn_gap),
            ("particle_speed", self.particles.speed),
        ] {
            if range.min.is_nan() || range.max.is_nan() || range.min > range.max {
                return Err(ConfigError::Invalid(format!("{name}: min exceeds max")));
            }
        }
        if let Elevation::Random { floor, ceiling } = self.field.elevation {
            if floor.is_nan() || ceiling.is_nan() || floor > ceiling {
                return invalid("elevation floor exceeds ceiling");
            }
        }
        if self.beat.step_interval.is_nan() || self.beat.step_interval <= 0.0 {
            return invalid("beat step interval must be positive");
        }
        if self.beat.pulse_every == 0 {
            return invalid("beat pulse_every must be at least 1");
        }
        Ok(())
    }
}

impl Default for BeatTuning {
    fn default() -> Self {
        Self {
            step_interval: 0.25,
            pulse_every: 2,
            pulse_duration: 0.1,
            pulse_scale: 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(Tuning::flat().validate().is_ok());
        assert!(Tuning::perspective().validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_preserves_variant() {
        let json = Tuning::perspective().to_json().unwrap();
        let tuning = Tuning::from_json(&json).unwrap();
        assert_eq!(tuning.variant, Variant::Perspective);
        assert_eq!(tuning.field.shapes.len(), 3);
    }

    #[test]
    fn test_rejects_empty_palette() {
        let mut tuning = Tuning::flat();
        tuning.field.palette.clear();
        let json = serde_json::to_string(&tuning).unwrap();
        assert!(matches!(
            Tuning::from_json(&json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_rejects_inverted_particle_speed() {
        let mut tuning = Tuning::flat();
        tuning.particles.speed = Range::new(5.0, 2.0);
        let json = serde_json::to_string(&tuning).unwrap();
        match Tuning::from_json(&json) {
            Err(ConfigError::Invalid(msg)) => assert!(msg.contains("particle_speed")),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_inverted_elevation() {
        let mut tuning = Tuning::flat();
        tuning.field.elevation = Elevation::Random {
            floor: 300.0,
            ceiling: 100.0,
        };
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_zero_pulse_every() {
        let mut tuning = Tuning::perspective();
        tuning.beat.pulse_every = 0;
        assert!(matches!(tuning.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(Tuning::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!(Variant::from_str("3D"), Some(Variant::Perspective));
        assert_eq!(Variant::from_str("flat"), Some(Variant::Flat));
        assert_eq!(Variant::from_str("iso"), None);
    }
}
