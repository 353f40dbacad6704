//! Game state and core simulation types
//!
//! `GameState` is the whole simulation context: it is owned by the runner,
//! mutated only by `tick` and `apply_command`, and read by render/audio
//! collaborators after each update.
//!
//! World frame: `x` is forward progress, `y` is up, `z` is lateral.

use std::collections::VecDeque;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::beat::BeatClock;
use super::field::{CollectibleField, ObstacleField};
use super::scroll::{Viewport, WorldScroller};
use super::session::{Command, Session};
use super::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    #[default]
    Menu,
    /// Active run
    Playing,
    /// Run ended by a fatal collision
    GameOver,
}

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec3,
    pub alpha: f32,
}

/// The player's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
    /// Past positions, oldest first
    pub trail: VecDeque<TrailPoint>,
}

/// Obstacle bounds per shape kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleShape {
    /// Flat-plane rectangle
    Rect { width: f32, height: f32 },
    Cube { size: Vec3 },
    Cylinder { radius: f32, height: f32 },
    /// Four-sided cone
    Pyramid { radius: f32, height: f32 },
}

impl ObstacleShape {
    /// Full bounding extent along (forward, vertical, lateral)
    pub fn extent(&self) -> Vec3 {
        match *self {
            ObstacleShape::Rect { width, height } => Vec3::new(width, height, 0.0),
            ObstacleShape::Cube { size } => size,
            ObstacleShape::Cylinder { radius, height } | ObstacleShape::Pyramid { radius, height } => {
                Vec3::new(radius * 2.0, height, radius * 2.0)
            }
        }
    }
}

/// An obstacle entity. Touching one ends the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Center position
    pub pos: Vec3,
    pub shape: ObstacleShape,
    /// 0xRRGGBB
    pub color: u32,
}

impl Obstacle {
    /// Forward coordinate of the edge closest to the ball's past
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        self.pos.x + self.shape.extent().x / 2.0
    }
}

/// A gem worth points. `collected` is sticky until the slot is recycled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub pos: Vec3,
    pub collected: bool,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Things that happened during an update, drained by the runner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Grounded jump launched
    Jump,
    Collect { id: u32 },
    /// Obstacles left behind the scroll offset this tick
    Passed { count: u32 },
    Crash { obstacle_id: u32 },
    /// Drum step; `step` cycles 0..4 within a bar
    Beat { step: u8 },
    ScoreChanged(u64),
    /// Final score beat the stored best; persist it
    NewHighScore(u64),
    PhaseChanged(GamePhase),
}

/// Complete simulation context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub rng: Pcg32,
    /// Ticks since the current run started
    pub time_ticks: u64,
    pub session: Session,
    pub ball: Ball,
    pub scroller: WorldScroller,
    pub obstacles: ObstacleField,
    pub collectibles: CollectibleField,
    pub beat: BeatClock,
    /// Visual particles (not gameplay-affecting)
    #[serde(skip)]
    pub particles: Vec<Particle>,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state sitting on the menu, with the world laid out for a first run
    pub fn new(tuning: Tuning, seed: u64, high_score: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let viewport = Viewport::default();
        let ball = Ball::new(&tuning.ball);
        let scroller = WorldScroller::new(&tuning.scroll, ball.pos.x);
        let obstacles = ObstacleField::initial_layout(&tuning.field, ball.pos.x, &mut rng);
        let collectibles = CollectibleField::initial_layout(&tuning.field, ball.pos.x, &mut rng);
        let beat = BeatClock::new(&tuning.beat);

        Self {
            seed,
            tuning,
            viewport,
            rng,
            time_ticks: 0,
            session: Session::new(high_score),
            ball,
            scroller,
            obstacles,
            collectibles,
            beat,
            particles: Vec::new(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.session.phase()
    }

    /// Apply a session command. Returns false if the command is not valid
    /// in the current phase.
    pub fn apply_command(&mut self, command: Command) -> bool {
        let Some(phase) = self.session.apply(command) else {
            log::debug!("Ignoring {:?} in phase {:?}", command, self.phase());
            return false;
        };

        if phase == GamePhase::Playing {
            self.reset_world();
            self.events.push(GameEvent::ScoreChanged(0));
        }
        self.events.push(GameEvent::PhaseChanged(phase));
        log::info!("Phase -> {:?} ({})", phase, self.tuning.variant.as_str());
        true
    }

    /// Resize collaborator entry point. Only spawn distances depend on it.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    /// Put ball, pools, scroll and clocks back to the initial layout
    pub fn reset_world(&mut self) {
        self.time_ticks = 0;
        self.ball = Ball::new(&self.tuning.ball);
        self.scroller = WorldScroller::new(&self.tuning.scroll, self.ball.pos.x);
        self.obstacles =
            ObstacleField::initial_layout(&self.tuning.field, self.ball.pos.x, &mut self.rng);
        self.collectibles =
            CollectibleField::initial_layout(&self.tuning.field, self.ball.pos.x, &mut self.rng);
        self.beat = BeatClock::new(&self.tuning.beat);
        self.particles.clear();
    }

    /// Forward-most world coordinate relevant to spawning
    #[inline]
    pub fn frontier(&self) -> f32 {
        self.scroller
            .frontier(self.viewport.spawn_extent(&self.tuning.scroll))
    }

    /// Drain pending events
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
