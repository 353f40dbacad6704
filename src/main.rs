//! Crazy Roll headless runner
//!
//! `crazy-roll [flat|perspective] [frames]` plays one run with a simple dodge
//! autopilot and logs the result. Set `CRAZY_ROLL_TUNING` to a JSON file to
//! override the preset tuning. The browser build enters through `web::start`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use crazy_roll::audio::NullAudio;
    use crazy_roll::consts::SIM_DT;
    use crazy_roll::persistence::FileStore;
    use crazy_roll::platform::{init_logging, time_seed};
    use crazy_roll::sim::{GameState, TickInput, Tuning, Variant};
    use crazy_roll::{ConfigError, GameRunner, Settings};

    /// One minute of play at 60 Hz
    const DEFAULT_FRAMES: u32 = 3600;

    /// How far ahead the autopilot looks, in multiples of the ball radius
    const LOOKAHEAD_RADII: f32 = 8.0;

    fn load_tuning(variant: Variant) -> Result<Tuning, ConfigError> {
        match std::env::var("CRAZY_ROLL_TUNING") {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|e| ConfigError::Invalid(format!("{}: {}", path, e)))?;
                let tuning = Tuning::from_json(&json)?;
                log::info!("Loaded tuning from {}", path);
                Ok(tuning)
            }
            Err(_) => Ok(variant.tuning()),
        }
    }

    /// Steer away from the nearest obstacle ahead of the ball
    fn autopilot(state: &GameState) -> TickInput {
        let ball = &state.ball;
        let reach = ball.radius * LOOKAHEAD_RADII;
        let threat = state
            .obstacles
            .items
            .iter()
            .filter(|o| o.trailing_edge() > ball.pos.x && o.pos.x - ball.pos.x < reach)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

        let mut input = TickInput::default();
        let Some(obstacle) = threat else {
            return input;
        };

        match state.tuning.variant {
            Variant::Flat => {
                // Go over tall-from-the-floor blocks, under hanging ones
                let extent = obstacle.shape.extent();
                let top = obstacle.pos.y + extent.y / 2.0;
                let bottom = obstacle.pos.y - extent.y / 2.0;
                if ball.pos.y + ball.radius > bottom && ball.pos.y - ball.radius < top {
                    if bottom - state.tuning.ball.ground_level > 2.0 * ball.radius {
                        input.down = true;
                    } else {
                        input.up = true;
                    }
                }
                // Brake to buy time
                input.left = obstacle.pos.x - ball.pos.x < reach / 2.0;
            }
            Variant::Perspective => {
                let dz = ball.pos.z - obstacle.pos.z;
                if dz.abs() < 1.5 {
                    let half_width = state.tuning.ball.track_half_width.unwrap_or(f32::MAX);
                    // Dodge toward the side with more room
                    if (dz >= 0.0 && ball.pos.z < half_width - 1.0) || ball.pos.z < -half_width + 1.0 {
                        input.right = true;
                    } else {
                        input.left = true;
                    }
                }
            }
        }
        input
    }

    pub fn run() {
        init_logging();

        let mut args = std::env::args().skip(1);
        let settings = Settings::load();
        let variant = match args.next() {
            Some(arg) => match Variant::from_str(&arg) {
                Some(v) => v,
                None => {
                    log::error!("Unknown variant {:?} (expected flat or perspective)", arg);
                    std::process::exit(2);
                }
            },
            None => settings.variant,
        };
        let frames = args
            .next()
            .and_then(|a| a.parse::<u32>().ok())
            .unwrap_or(DEFAULT_FRAMES);

        let tuning = match load_tuning(variant) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        };

        let store = FileStore::new(format!("crazy_roll_{}.json", tuning.variant.as_str()));
        let mut runner = GameRunner::new(tuning, time_seed(), store, NullAudio, settings);
        runner.start();

        let mut frame = 0;
        while runner.is_running() && frame < frames {
            let input = autopilot(runner.state());
            runner.frame(SIM_DT, &input);
            frame += 1;
        }
        runner.stop();

        let state = runner.state();
        log::info!(
            "{} run finished after {} ticks: phase {:?}, score {}, best {}, distance {:.1}",
            state.tuning.variant.as_str(),
            state.time_ticks,
            state.phase(),
            state.session.score(),
            state.session.high_score(),
            state.ball.forward() - state.tuning.ball.start.x
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point is `crazy_roll::web::start`
}
