//! Fixed timestep simulation tick
//!
//! Core game loop step: input -> ball -> scroll -> pools -> collisions -> session.
//! Physics runs in per-tick units; `dt` only feeds the beat clock.

use serde::{Deserialize, Serialize};

use super::collision;
use super::particles;
use super::state::{GameEvent, GamePhase, GameState};
use super::tuning::RecyclePolicy;

/// Input snapshot for a single tick, already mapped from keys/touch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Advance the game state by one tick. Does nothing outside `Playing`.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase() != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    if let Some(step) = state.beat.advance(dt) {
        state.events.push(GameEvent::Beat { step });
    }

    // Ball
    let rear_limit = state.tuning.ball.rear_wall.then_some(state.scroller.offset);
    if state.ball.integrate(input, &state.tuning.ball, rear_limit) {
        state.events.push(GameEvent::Jump);
    }

    // Scroll
    let extent = state.viewport.spawn_extent(&state.tuning.scroll);
    let spawn_due = state
        .scroller
        .advance(state.ball.forward(), extent, &state.tuning.scroll, &mut state.rng);
    let offset = state.scroller.offset;
    let frontier = state.scroller.frontier(extent);

    // Pools
    let field = &state.tuning.field;
    state.obstacles.approach(state.scroller.speed);
    state.collectibles.approach(state.scroller.speed);
    let passed = match field.recycle {
        RecyclePolicy::PassThrough => {
            if spawn_due {
                state.obstacles.spawn(frontier, field, &mut state.rng);
            }
            state.obstacles.remove_passed(offset, field)
        }
        RecyclePolicy::InPlace => {
            state.collectibles.recycle_behind(offset, frontier, field, &mut state.rng);
            state.obstacles.recycle_behind(offset, frontier, field, &mut state.rng)
        }
    };
    if passed > 0 {
        let points = u64::from(passed) * field.pass_reward;
        state.events.push(GameEvent::Passed { count: passed });
        award(state, points);
    }

    // Collisions
    let model = state.tuning.field.collision;
    let gem_size = state.tuning.field.collectible_size;
    let collect_reward = state.tuning.field.collect_reward;
    if let Some(obstacle_id) = collision::first_fatal(&state.ball, &state.obstacles.items, model) {
        crash(state, obstacle_id);
        return;
    }

    let events = &mut state.events;
    let collected = collision::collect_touching(
        &state.ball,
        &mut state.collectibles.items,
        model,
        gem_size,
        |id| events.push(GameEvent::Collect { id }),
    );
    if collected > 0 {
        award(state, u64::from(collected) * collect_reward);
    }

    particles::update(&mut state.particles, &state.tuning.particles);
}

fn award(state: &mut GameState, points: u64) {
    if state.session.award(points) {
        state.events.push(GameEvent::ScoreChanged(state.session.score()));
    }
}

/// Fatal collision: burst, freeze the score and settle the high score
fn crash(state: &mut GameState, obstacle_id: u32) {
    particles::burst(
        &mut state.particles,
        state.ball.pos,
        &state.tuning.particles,
        &mut state.rng,
    );
    state.events.push(GameEvent::Crash { obstacle_id });

    if let Some(outcome) = state.session.end_run() {
        log::info!(
            "Crash into obstacle {} at tick {}: score {} (best {})",
            obstacle_id,
            state.time_ticks,
            outcome.final_score,
            state.session.high_score()
        );
        if outcome.new_high_score {
            state.events.push(GameEvent::NewHighScore(outcome.final_score));
        }
        state.events.push(GameEvent::PhaseChanged(GamePhase::GameOver));
    }
}
