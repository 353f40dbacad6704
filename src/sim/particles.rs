//! Cosmetic crash particles (flat game only)

use glam::Vec3;
use rand::Rng;

use super::state::{MAX_PARTICLES, Particle};
use super::tuning::ParticleTuning;

/// Radial burst of `tuning.crash_burst` particles in the forward/vertical plane
pub fn burst<R: Rng>(particles: &mut Vec<Particle>, center: Vec3, tuning: &ParticleTuning, rng: &mut R) {
    let count = tuning.crash_burst.min(MAX_PARTICLES.saturating_sub(particles.len()));
    for i in 0..count {
        let angle = std::f32::consts::TAU * i as f32 / count as f32;
        let speed = rng.random_range(tuning.speed.min..=tuning.speed.max);
        particles.push(Particle {
            pos: center,
            vel: Vec3::new(angle.cos() * speed, angle.sin() * speed, 0.0),
            color: tuning.crash_color,
            life: 1.0,
        });
    }
}

/// Move, pull down and fade particles; drop the dead ones
pub fn update(particles: &mut Vec<Particle>, tuning: &ParticleTuning) {
    for particle in particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel.y -= tuning.gravity;
        particle.life -= tuning.life_decay;
    }
    particles.retain(|p| p.life > 0.0);
}
