//! Headless lucky-bowl simulator.
//!
//! Plays complete rounds through the same runner the browser uses, with real
//! physics and 1/60 s frames, then prints the lucky / not-lucky split.
//!
//! Example:
//!   cargo run -p lucky-bowl --bin bowl-sim -- --rounds 500 --seed 7 --fixed-delay

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, Result};
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
use bowl_engine::{GamePhase, InputEvent, Outcome, RevealMode, SpinConfig, UiState};
#[cfg(not(target_arch = "wasm32"))]
use bowl_web::GameRunner;
#[cfg(not(target_arch = "wasm32"))]
use lucky_bowl::game::events;
#[cfg(not(target_arch = "wasm32"))]
use lucky_bowl::LuckyBowl;

#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(author, version, about = "Play lucky-bowl rounds headlessly", long_about = None)]
struct Args {
    /// Rounds to play.
    #[arg(long, default_value_t = 100)]
    rounds: u32,
    /// Seed for ball placement, ball choice and outcomes.
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// JSON file with spin settings; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Reveal after a fixed delay instead of waiting for the ball to leave.
    #[arg(long)]
    fixed_delay: bool,
    /// Give up on a round after this many simulated seconds.
    #[arg(long, default_value_t = 30.0)]
    max_round_secs: f32,
    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("read config {:?}", path))?;
            SpinConfig::from_json(&text).with_context(|| format!("parse config {:?}", path))?
        }
        None => SpinConfig::default(),
    };
    if args.fixed_delay {
        config.reveal = RevealMode::FixedDelay;
    }

    let mut runner = GameRunner::new(LuckyBowl::new(config, args.seed)?);
    runner.init();
    let mut ui = UiState::default();
    runner.flush_ui(&mut ui);

    let max_frames = (args.max_round_secs / FRAME_DT).ceil() as u32;
    let mut lucky = 0u32;
    let mut not_lucky = 0u32;
    let mut stuck = 0u32;
    let mut total_ms = 0.0f64;

    for round in 1..=args.rounds {
        runner.push_input(InputEvent::custom(events::SPIN));
        let started_ms = runner.game().sequencer().elapsed_ms();

        let mut frames = 0;
        while runner.game().phase() != GamePhase::Result && frames < max_frames {
            runner.tick(FRAME_DT);
            frames += 1;
        }
        runner.flush_ui(&mut ui);

        match runner.game().sequencer().outcome() {
            Some(outcome) if runner.game().phase() == GamePhase::Result => {
                total_ms += runner.game().sequencer().elapsed_ms() - started_ms;
                match outcome {
                    Outcome::Lucky => lucky += 1,
                    Outcome::NotLucky => not_lucky += 1,
                }
                log::debug!("Round {}: {}", round, outcome.headline());
            }
            _ => {
                log::warn!("Round {} did not reveal within {}s", round, args.max_round_secs);
                stuck += 1;
            }
        }

        // Tap the result; a stuck round keeps running into the next iteration
        runner.push_input(InputEvent::custom(events::DISMISS));
        let mut frames = 0;
        while runner.game().phase() == GamePhase::Result && frames < 10 {
            runner.tick(FRAME_DT);
            frames += 1;
        }
        runner.flush_ui(&mut ui);
    }

    let revealed = lucky + not_lucky;
    let mean_ms = if revealed > 0 { total_ms / f64::from(revealed) } else { 0.0 };

    if args.json {
        let summary = serde_json::json!({
            "rounds": args.rounds,
            "lucky": lucky,
            "not_lucky": not_lucky,
            "stuck": stuck,
            "mean_round_ms": mean_ms,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("rounds:      {}", args.rounds);
        println!("lucky:       {}", lucky);
        println!("not lucky:   {}", not_lucky);
        if stuck > 0 {
            println!("stuck:       {}", stuck);
        }
        println!("mean round:  {:.0} ms", mean_ms);
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point is game_init; this binary is native only
}
