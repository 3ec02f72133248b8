//! Tile Runner entry point
//!
//! Headless demo run: an autopilot swipes its way up the grid while the
//! camera follows, and the outcome is logged.
//!
//! Usage: `tile-runner [settings.json] [waves.json] [seed]`

use std::path::Path;
use std::process::ExitCode;

use rand::Rng;
use tile_runner::Settings;
use tile_runner::consts::*;
use tile_runner::sim::{
    GameEvent, GamePhase, GameState, RngState, TickInput, WaveData, WaveLibrary, tick,
};

/// Length of the demo run in simulated seconds
const DEMO_SECONDS: f32 = 45.0;
/// Simulated frame time; the fixed-step loop absorbs the mismatch
const FRAME_DT: f32 = 1.0 / 50.0;
/// Seconds between autopilot swipes
const SWIPE_INTERVAL: f32 = 0.4;
/// Camera easing factor per frame
const CAMERA_FOLLOW: f32 = 0.05;

fn demo_library() -> WaveLibrary {
    let row = |cells: &[&str]| cells.iter().map(|c| c.to_string()).collect::<Vec<_>>();
    WaveLibrary {
        waves: vec![
            WaveData {
                width: 5,
                lines: vec![
                    row(&["TileDefault"; 5]),
                    row(&[
                        "TileDefault",
                        "TileDefault+cracked",
                        "TileDefault",
                        "TileDefault+cracked",
                        "TileDefault",
                    ]),
                    row(&["TileDefault"; 5]),
                    row(&["TileDefault"; 4]),
                    row(&["TileDefault"; 5]),
                ],
            },
            WaveData {
                width: 7,
                lines: vec![
                    row(&["TileDefault"; 7]),
                    row(&["TileDefault+slow"; 7]),
                    row(&["TileDefault"; 6]),
                ],
            },
        ],
    }
}

fn load_library(path: Option<&str>) -> WaveLibrary {
    let Some(path) = path else {
        return demo_library();
    };
    match WaveLibrary::load(path) {
        Ok(library) => {
            log::info!("Loaded {} waves from {}", library.waves.len(), path);
            library
        }
        Err(e) => {
            log::warn!("{e}; using built-in waves");
            demo_library()
        }
    }
}

/// Autopilot: mostly forward swipes with some sideways drift
struct Autopilot {
    rng: rand_pcg::Pcg32,
    timer: f32,
}

impl Autopilot {
    fn new(seed: u64) -> Self {
        Self {
            rng: RngState::new(seed.wrapping_add(1)).to_rng(),
            timer: 0.0,
        }
    }

    fn next_swipe(&mut self, dt: f32) -> Option<f32> {
        self.timer -= dt;
        if self.timer > 0.0 {
            return None;
        }
        self.timer = SWIPE_INTERVAL;
        let angle: f32 = self.rng.random_range(-100.0..100.0);
        Some(tile_runner::normalize_degrees(angle))
    }
}

fn run(mut state: GameState, seed: u64) {
    let mut autopilot = Autopilot::new(seed);
    let mut input = TickInput::default();
    let mut accumulator = 0.0;
    let mut elapsed = 0.0;

    while elapsed < DEMO_SECONDS && state.phase == GamePhase::Playing {
        elapsed += FRAME_DT;
        accumulator += FRAME_DT;

        input.swipe_angle = autopilot.next_swipe(FRAME_DT);
        let origin = state.view_origin_y;
        input.view_origin_y = Some(origin + (state.player.position.y - origin) * CAMERA_FOLLOW);

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if let Err(e) = tick(&mut state, &input, SIM_DT) {
                log::error!("Wave content failed: {e}");
                state.end_run();
                break;
            }
            accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            input.swipe_angle = None;
        }

        for event in state.drain_events() {
            match event {
                GameEvent::LineReached { line, .. } if line % 10 == 0 => {
                    log::info!("Reached line {line}");
                }
                GameEvent::RunEnded { .. } => {}
                other => log::debug!("{:?}", other),
            }
        }
    }

    state.end_run();
    log::info!(
        "Demo finished after {:.1}s: progress {}, score {}, {} lines live, {} tiles substituted",
        elapsed,
        state.player.progress(),
        state.player.score(),
        state.grid.len(),
        state.grid.substituted_tiles()
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();
    log::info!("Tile Runner (headless demo) starting...");

    let args: Vec<String> = std::env::args().collect();
    let settings = Settings::load_or_default(args.get(1).map(Path::new));
    let library = load_library(args.get(2).map(String::as_str));
    let seed = args
        .get(3)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);

    match GameState::from_library(settings, library, seed) {
        Ok(state) => {
            run(state, seed);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Cannot start run: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by the host page on the web
}
