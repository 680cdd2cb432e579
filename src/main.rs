//! Metal Shot entry point
//!
//! Headless native runner: loads a level (or the built-in demo), drives the
//! controller with a scripted autopilot and prints a JSON summary of the run.
//!
//! Usage: `metal-shot [LEVEL_DIR] [SETTINGS_JSON]`

use std::path::Path;

use serde::Serialize;

use metal_shot::audio::NullAudio;
use metal_shot::consts::{SIM_DT, TPS};
use metal_shot::sim::{GamePhase, GameState, Level, LevelMap};
use metal_shot::{Controller, Key, Settings, View};

/// Longest run the autopilot will play, in seconds of game time
const MAX_RUN_SECONDS: f32 = 120.0;

const DEMO_MAPS: [&str; 3] = [
    "\
....................
....................
....................
..........###.......
....................
.P..............E...
####################",
    "\
....................
....................
.........S..........
.......######.......
....................
.............K......
####################",
    "\
..........
..........
..........
..........
..........
..........
##########",
];

/// View that reports to the log instead of drawing
#[derive(Debug, Default)]
struct LogView {
    frames: u64,
}

impl View for LogView {
    fn render(&mut self, state: &GameState) {
        self.frames += 1;
        if state.time_ticks % TPS as u64 == 0 {
            let player = &state.stage.player;
            log::debug!(
                "tick {}: player at ({:.2}, {:.2}) hp {} segment {} | {} enemies, {} bullets",
                state.time_ticks,
                player.pos.x,
                player.pos.y,
                player.health,
                state.stage.player_segment(),
                state.stage.enemies.len(),
                state.stage.bullets.len()
            );
        }
    }

    fn display_pause_menu(&mut self) {
        log::info!("== Paused ==");
    }

    fn display_game_over_menu(&mut self) {
        log::info!("== Game over ==");
    }

    fn display_win_menu(&mut self) {
        log::info!("== Level complete ==");
    }
}

#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    player: &'a str,
    points: u32,
    phase: GamePhase,
    ticks: u64,
    frames: u64,
    health: u32,
}

fn main() {
    env_logger::init();
    log::info!("Metal Shot (headless) starting...");

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let level_dir = args.next();
    let settings = match args.next() {
        Some(path) => Settings::load(Path::new(&path))?,
        None => Settings::default(),
    };

    let map: LevelMap = match level_dir {
        Some(dir) => Level::load_dir(Path::new(&dir))?,
        None => Level::from_text_maps(&DEMO_MAPS)?,
    };

    let mut controller = Controller::new(map, &settings, LogView::default(), NullAudio);
    autopilot(&mut controller);

    let summary = RunSummary {
        player: &controller.user().name,
        points: controller.user().points,
        phase: controller.phase(),
        ticks: controller.state().time_ticks,
        frames: controller.view().frames,
        health: controller.state().stage.player.health,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Hold right and fire, hop periodically, take a short break halfway
fn autopilot(controller: &mut Controller<LogView, NullAudio>) {
    controller.key_pressed(Key::D);
    controller.key_pressed(Key::J);

    let frames = (MAX_RUN_SECONDS / SIM_DT) as u64;
    for frame in 0..frames {
        if controller.phase().is_terminal() {
            break;
        }

        match frame % 90 {
            0 => controller.key_pressed(Key::Space),
            10 => controller.key_released(Key::Space),
            _ => {}
        }
        if frame == frames / 2 {
            controller.key_pressed(Key::Escape);
            controller.key_pressed(Key::Escape);
        }

        controller.update(SIM_DT);
    }
}
