//! Full runs through the public scheduler API

use crazy_roll::audio::{AudioSink, Cue};
use crazy_roll::consts::SIM_DT;
use crazy_roll::persistence::MemoryStore;
use crazy_roll::sim::{GameEvent, GamePhase, Obstacle, ObstacleShape, TickInput, Tuning, Variant};
use crazy_roll::{GameRunner, Settings};
use glam::Vec3;

/// Records every cue it is asked to play
#[derive(Debug, Default)]
struct RecordingAudio {
    cues: Vec<Cue>,
    volume: f32,
    muted: bool,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        self.cues.push(cue);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

fn runner(tuning: Tuning, high_score: u64) -> GameRunner<MemoryStore, RecordingAudio> {
    GameRunner::new(
        tuning,
        2024,
        MemoryStore::with_high_score(high_score),
        RecordingAudio::default(),
        Settings::default(),
    )
}

/// Empty flat field: no spawns ever
fn empty_flat() -> Tuning {
    let mut tuning = Tuning::flat();
    tuning.field.max_live = 0;
    tuning
}

fn wall_at(pos: Vec3, variant: Variant) -> Obstacle {
    let shape = match variant {
        Variant::Flat => ObstacleShape::Rect { width: 60.0, height: 2000.0 },
        Variant::Perspective => ObstacleShape::Cube { size: Vec3::new(1.0, 2.0, 1.0) },
    };
    Obstacle {
        id: 4242,
        pos,
        shape,
        color: 0xFF4757,
    }
}

#[test]
fn drift_only_run_survives_and_progresses() {
    let mut runner = runner(empty_flat(), 0);
    assert!(runner.start());

    let start_x = runner.state().ball.forward();
    let mut last = start_x;
    for _ in 0..600 {
        assert_eq!(runner.frame(SIM_DT, &TickInput::default()), 1);
        let x = runner.state().ball.forward();
        assert!(x > last);
        last = x;
    }

    assert_eq!(runner.state().phase(), GamePhase::Playing);
    assert!(runner.is_running());
    assert_eq!(runner.state().session.score(), 0);
    assert!(runner.state().obstacles.is_empty());
}

#[test]
fn forced_collision_at_tick_k_ends_run_and_persists_new_best() {
    let mut runner = runner(empty_flat(), 5);
    runner.start();

    for _ in 0..120 {
        runner.frame(SIM_DT, &TickInput::default());
    }
    runner.state_mut().session.award(25);

    // Drop a wall on the ball's next position
    let state = runner.state_mut();
    let ahead = state.ball.pos + state.ball.vel;
    state.obstacles.items.push(wall_at(ahead, Variant::Flat));

    runner.frame(SIM_DT, &TickInput::default());

    let state = runner.state();
    assert_eq!(state.phase(), GamePhase::GameOver);
    assert_eq!(state.time_ticks, 121);
    assert_eq!(state.session.score(), 25);
    assert_eq!(state.session.high_score(), 25);
    assert!(!runner.is_running());
    assert!(runner.events().contains(&GameEvent::Crash { obstacle_id: 4242 }));
    assert!(runner.events().contains(&GameEvent::NewHighScore(25)));
    assert_eq!(runner.store().high_score, 25);
    assert_eq!(runner.store().saves, 1);
    assert!(runner.audio().cues.contains(&Cue::Crash));
}

#[test]
fn lower_score_leaves_stored_best_alone() {
    let mut runner = runner(empty_flat(), 500);
    runner.start();
    let pos = runner.state().ball.pos;
    runner.state_mut().obstacles.items.push(wall_at(pos, Variant::Flat));

    runner.frame(SIM_DT, &TickInput::default());
    assert_eq!(runner.state().phase(), GamePhase::GameOver);
    assert_eq!(runner.state().session.high_score(), 500);
    assert_eq!(runner.store().saves, 0);
}

#[test]
fn perspective_collect_then_crash_then_restart() {
    let mut runner = runner(Tuning::perspective(), 0);
    runner.start();

    // Clear the lane, then put a gem on the ball
    let state = runner.state_mut();
    for obstacle in &mut state.obstacles.items {
        obstacle.pos.z = 50.0;
    }
    for gem in &mut state.collectibles.items {
        gem.pos.z = 50.0;
    }
    let ball = state.ball.pos;
    state.collectibles.items[3].pos = ball + Vec3::new(0.2, 0.3, 0.0);

    runner.frame(SIM_DT, &TickInput::default());
    assert_eq!(runner.state().session.score(), 10);
    assert!(runner.audio().cues.contains(&Cue::Collect));

    let ball = runner.state().ball.pos;
    runner.state_mut().obstacles.items[0].pos = ball;
    runner.frame(SIM_DT, &TickInput::default());
    assert_eq!(runner.state().phase(), GamePhase::GameOver);
    assert_eq!(runner.store().high_score, 10);

    assert!(runner.restart());
    assert_eq!(runner.state().session.score(), 0);
    assert_eq!(runner.state().session.high_score(), 10);
    assert_eq!(runner.state().obstacles.len(), 10);
    assert_eq!(runner.state().collectibles.len(), 15);
    assert!(runner.state().collectibles.items.iter().all(|g| !g.collected));
}

#[test]
fn beat_cues_follow_measured_time() {
    let mut runner = runner(empty_flat(), 0);
    runner.start();

    // Kick sounds as soon as play starts
    runner.frame(SIM_DT, &TickInput::default());
    assert_eq!(runner.audio().cues.first(), Some(&Cue::Beat { step: 0 }));

    // About 1.85 s in total, delivered as uneven frames
    let mut remaining = 110;
    let mut steps = 1;
    while remaining > 0 {
        let ticks = runner.frame(SIM_DT * 2.0 + 0.0001, &TickInput::default());
        remaining -= ticks as i32;
        steps += runner
            .events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Beat { .. }))
            .count();
    }
    // Four steps per second: two full bars
    assert_eq!(steps, 8);
    let pattern: Vec<Cue> = runner
        .audio()
        .cues
        .iter()
        .copied()
        .filter(|c| matches!(c, Cue::Beat { .. }))
        .collect();
    assert_eq!(pattern[..4], [
        Cue::Beat { step: 0 },
        Cue::Beat { step: 1 },
        Cue::Beat { step: 2 },
        Cue::Beat { step: 3 },
    ]);
}

#[test]
fn settings_reach_audio_sink() {
    let settings = Settings {
        master_volume: 0.3,
        muted: true,
        ..Default::default()
    };
    let mut runner = GameRunner::new(
        Tuning::flat(),
        1,
        MemoryStore::default(),
        RecordingAudio::default(),
        settings,
    );
    assert_eq!(runner.audio().volume, 0.3);
    assert!(runner.audio().muted);

    runner.set_muted(false);
    runner.set_volume(2.0);
    assert!(!runner.audio().muted);
    assert_eq!(runner.audio().volume, 1.0);
}
