//! Ball body: force integration and boundary bounces
//!
//! Per-tick units throughout. Nothing here can fail; every edge case is a clamp.

use std::collections::VecDeque;

use glam::Vec3;

use super::state::{Ball, TrailPoint};
use super::tick::TickInput;
use super::tuning::{BallTuning, JumpMode, SteerAxis};

impl Ball {
    pub fn new(tuning: &BallTuning) -> Self {
        Self {
            pos: tuning.start,
            vel: Vec3::ZERO,
            radius: tuning.radius,
            trail: VecDeque::with_capacity(tuning.trail_length),
        }
    }

    /// Forward progress coordinate
    #[inline]
    pub fn forward(&self) -> f32 {
        self.pos.x
    }

    /// True when the ball is close enough to the ground to launch a jump
    #[inline]
    pub fn near_ground(&self, tuning: &BallTuning, epsilon: f32) -> bool {
        self.pos.y - tuning.ground_level <= epsilon
    }

    /// Advance the ball by one tick.
    ///
    /// `rear_limit` is the forward coordinate the ball may not fall behind
    /// (the scroll offset in the flat game). Returns true if a grounded jump
    /// was launched this tick.
    pub fn integrate(&mut self, input: &TickInput, tuning: &BallTuning, rear_limit: Option<f32>) -> bool {
        // Gravity, then air resistance on every axis
        self.vel.y -= tuning.gravity;
        self.vel *= tuning.damping;

        // Steering
        let steer = match (input.left, input.right) {
            (true, false) => -tuning.steer_impulse,
            (false, true) => tuning.steer_impulse,
            _ => 0.0,
        };
        match tuning.steer_axis {
            SteerAxis::Forward => self.vel.x += steer,
            SteerAxis::Lateral => self.vel.z += steer,
        }

        let mut jumped = false;
        if input.up {
            match tuning.jump_mode {
                JumpMode::Thrust => self.vel.y += tuning.jump_impulse,
                JumpMode::Grounded { epsilon } => {
                    if self.near_ground(tuning, epsilon) {
                        self.vel.y = tuning.jump_impulse;
                        jumped = true;
                    }
                }
            }
        }
        if input.down {
            self.vel.y -= tuning.down_impulse;
        }

        self.vel.x += tuning.forward_drift;

        self.vel.x = tuning.forward_limit.clamp(self.vel.x);
        self.vel.y = tuning.vertical_limit.clamp(self.vel.y);
        self.vel.z = tuning.lateral_limit.clamp(self.vel.z);

        self.pos += self.vel;

        self.resolve_bounds(tuning, rear_limit);
        self.record_trail(tuning.trail_length, tuning.trail_decay);

        jumped
    }

    /// Ground, ceiling, track edges and rear wall
    fn resolve_bounds(&mut self, tuning: &BallTuning, rear_limit: Option<f32>) {
        if self.pos.y <= tuning.ground_level {
            self.pos.y = tuning.ground_level;
            self.vel.y = self.vel.y.abs() * tuning.ground_restitution;
            if self.vel.y < tuning.min_bounce {
                self.vel.y = 0.0;
            }
        }

        if let Some(ceiling) = tuning.ceiling {
            if self.pos.y > ceiling {
                self.pos.y = ceiling;
                self.vel.y = -self.vel.y.abs() * tuning.ceiling_restitution;
            }
        }

        if let Some(half_width) = tuning.track_half_width {
            if self.pos.z < -half_width {
                self.pos.z = -half_width;
                self.vel.z = self.vel.z.abs() * tuning.wall_restitution;
            } else if self.pos.z > half_width {
                self.pos.z = half_width;
                self.vel.z = -self.vel.z.abs() * tuning.wall_restitution;
            }
        }

        if let Some(rear) = rear_limit {
            if self.pos.x - self.radius < rear {
                self.pos.x = rear + self.radius;
                self.vel.x = self.vel.x.abs() * tuning.wall_restitution;
            }
        }
    }

    /// Append the current position, evicting the oldest, and fade the rest
    pub fn record_trail(&mut self, capacity: usize, decay: f32) {
        if capacity == 0 {
            return;
        }
        if self.trail.len() == capacity {
            self.trail.pop_front();
        }
        self.trail.push_back(TrailPoint {
            pos: self.pos,
            alpha: 1.0,
        });
        for point in self.trail.iter_mut() {
            point.alpha *= decay;
        }
    }
}
