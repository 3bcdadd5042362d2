//! Galactic Rage entry point
//!
//! In the browser the page drives `galactic_rage::web::WebGame`. Natively this
//! binary plays a headless run with a simple autopilot, which is handy for
//! checking balance changes and the high-score file.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result};
    use clap::Parser;

    use galactic_rage::platform::{Clock, FileStore, LogSink, ManualClock, SystemClock};
    use galactic_rage::sim::{MoveDirection, Viewport};
    use galactic_rage::{SessionController, SessionPhase, Settings};

    /// Pixels of slack before the autopilot bothers to move
    const AIM_SLACK: f32 = 4.0;

    #[derive(Parser, Debug)]
    #[command(name = "galactic-rage", version, about = "Play Galactic Rage headless with an autopilot")]
    struct Cli {
        /// Frames to simulate at most
        #[arg(long, default_value_t = 3600)]
        frames: u32,

        /// RNG seed (overrides the settings file)
        #[arg(long)]
        seed: Option<u64>,

        /// JSON settings file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Where the high score is kept
        #[arg(long, default_value = "galactic-rage-highscore.json")]
        high_score_file: PathBuf,

        #[arg(long, default_value_t = 800.0)]
        width: f32,

        #[arg(long, default_value_t = 600.0)]
        height: f32,

        /// Pace frames against the wall clock instead of running flat out
        #[arg(long)]
        realtime: bool,

        /// Print the final game state as JSON
        #[arg(long)]
        json: bool,
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
        let cli = Cli::parse();

        let mut settings = cli
            .settings
            .as_deref()
            .map(Settings::load_from)
            .unwrap_or_default();
        if cli.seed.is_some() {
            settings.seed = cli.seed;
        }
        let frame_ms = settings.frame_ms;

        let manual = ManualClock::new(0.0);
        let clock: Box<dyn Clock> = if cli.realtime {
            Box::new(SystemClock::default())
        } else {
            Box::new(manual.clone())
        };
        let mut session = SessionController::new(
            settings,
            Viewport::new(cli.width, cli.height),
            Box::new(FileStore::new(&cli.high_score_file)),
            Box::new(LogSink),
            clock,
        );

        log::info!("Galactic Rage (headless) starting, {} frames", cli.frames);
        session.start();
        for frame in 0..cli.frames {
            if session.phase() == SessionPhase::GameOver {
                log::info!("Run ended after {} frames", frame);
                break;
            }
            autopilot(&mut session);
            if cli.realtime {
                std::thread::sleep(Duration::from_secs_f64(frame_ms / 1000.0));
            } else {
                manual.advance(frame_ms);
            }
            session.on_frame();
        }

        let state = session.state();
        if cli.json {
            let json = serde_json::to_string_pretty(state).context("serializing final state")?;
            println!("{json}");
        }
        println!(
            "score {} | level {} | lives {} | high score {}",
            state.score, state.level, state.player.lives, state.high_score
        );
        Ok(())
    }

    /// Chase the horizontally nearest enemy and keep firing
    fn autopilot(session: &mut SessionController) {
        let viewport = session.viewport();
        let state = session.state();
        let player_x = state.player.pos.x + state.player.size.x / 2.0;
        let target = state
            .enemies
            .iter()
            .map(|e| e.center().x)
            .min_by(|a, b| (a - player_x).abs().total_cmp(&(b - player_x).abs()));

        let Some(x) = target else {
            return;
        };
        if x < player_x - AIM_SLACK {
            session.move_player(MoveDirection::Left, viewport);
        } else if x > player_x + AIM_SLACK {
            session.move_player(MoveDirection::Right, viewport);
        }
        session.fire();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is galactic_rage::web::init, this is just to satisfy the compiler
}
