//! Headless driver
//!
//! Runs a scripted round at a fixed timestep and logs the outcome. Useful
//! for smoke-testing a rules file and for profiling the simulation without
//! a window system; a windowed host would drive `App` the same way with a
//! real `Platform` implementation.

use std::path::Path;

use cosmo_blast::platform::{Key, Platform, ScriptedPlatform};
use cosmo_blast::render::{SCREEN_HEIGHT, SCREEN_WIDTH};
use cosmo_blast::sim::GamePhase;
use cosmo_blast::{App, Rules};

const DT: f32 = 1.0 / 60.0;
const MAX_FRAMES: u32 = 60 * 120;

fn main() {
    env_logger::init();

    let rules = Rules::load(Path::new("rules.json"));
    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xC05_B1A57);

    let mut app = App::new(rules, seed);
    app.initialize(Path::new("background.txt"));

    let mut platform = ScriptedPlatform::new();
    let mut buffer = vec![0u32; SCREEN_WIDTH * SCREEN_HEIGHT];

    // Pick single-player from the menu, then hold fire and a slow turn
    platform.press(Key::S);
    app.update(&mut platform, DT);
    platform.release_all();
    platform.press(Key::Space);
    platform.press(Key::Right);

    let mut frames = 0;
    while matches!(app.phase(), GamePhase::Playing) && frames < MAX_FRAMES {
        app.update(&mut platform, DT);
        app.render(&mut buffer);
        frames += 1;
    }

    let state = app.state();
    log::info!(
        "finished after {frames} frames: {:?}, score {}, high score {}",
        state.phase,
        state.final_score,
        state.high_score
    );
    println!(
        "{:?} after {:.1}s simulated, score {}",
        state.phase,
        frames as f32 * DT,
        state.final_score
    );
    app.shutdown();
}
