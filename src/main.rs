//! Crowdrun main entry point.
//!
//! Runs the game core headless using:
//! - **bevy_ecs** for entity-component-system architecture
//! - **crossbeam-channel** bridges for the model loader and the scene
//! - **configparser**/**serde_json** for tuning values and user settings
//!
//! A scripted input sampler plays the game for a fixed number of 60 Hz ticks
//! while the scene commands are drained and counted, as a renderer would
//! consume them. A summary is logged at the end.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run --release -- --frames 1200 --seed 7
//! ```

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use log::{info, warn};

use crowdrun::events::scene::SceneCmd;
use crowdrun::game::GameWorld;
use crowdrun::resources::gameconfig::GameConfig;
use crowdrun::resources::input::{InputSampler, InputSnapshot};
use crowdrun::resources::modelloader::JsonRigLoader;
use crowdrun::resources::settings::PlayerSettings;

const TICK: f32 = 1.0 / 60.0;

/// Crowdrun headless runner
#[derive(Parser)]
#[command(version, about = "Plays a scripted crowdrun session without a window.")]
struct Cli {
    /// Configuration INI file.
    #[arg(long, value_name = "PATH", default_value = "assets/config.ini")]
    config: PathBuf,

    /// Player settings JSON (overrides the path in the configuration).
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Rig description to load for the player (overrides the configuration).
    #[arg(long, value_name = "PATH")]
    rig: Option<String>,

    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 1800)]
    frames: u64,

    /// Seed for jitter and projectile sprites.
    #[arg(long)]
    seed: Option<u64>,
}

/// Walks forward, weaves between the lanes, jumps and fires on a timer, and
/// presses restart now and then (ignored unless dead).
#[derive(Default)]
struct ScriptedInput {
    frame: u64,
}

impl InputSampler for ScriptedInput {
    fn sample(&mut self) -> InputSnapshot {
        let f = self.frame;
        self.frame += 1;
        // four seconds per lane change cycle
        let phase = f % 240;
        InputSnapshot {
            forward: true,
            left: (60..90).contains(&phase),
            right: (180..210).contains(&phase),
            jump: f % 150 == 0,
            sprint: phase >= 120,
            fire: f % 45 < 2,
            restart: f % 300 == 299,
            mouse_delta: Vec2::new(if phase < 10 { 2.0 } else { 0.0 }, 0.0),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default)]
struct Summary {
    commands: usize,
    spawned_characters: usize,
    spawned_projectiles: usize,
    goals: usize,
    deaths: usize,
    max_characters: u32,
}

impl Summary {
    fn record(&mut self, cmd: &SceneCmd) {
        self.commands += 1;
        match cmd {
            SceneCmd::SpawnCharacter { primary: false, .. } => self.spawned_characters += 1,
            SceneCmd::SpawnProjectile { .. } => self.spawned_projectiles += 1,
            SceneCmd::SpawnGoal { .. } => self.goals += 1,
            SceneCmd::ShowDeathScreen => self.deaths += 1,
            SceneCmd::SetHud { characters } => {
                self.max_characters = self.max_characters.max(*characters)
            }
            SceneCmd::LoadProgress { percent } => info!("Loading model: {}%", percent),
            _ => {}
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}, using default configuration", e);
    }
    if let Some(rig) = cli.rig {
        config.model = rig;
    }
    if let Some(settings) = cli.settings {
        config.settings_path = settings;
    }
    let settings = PlayerSettings::load_or_default(&config.settings_path);
    info!("Graphics quality: {}", settings.quality);

    let mut game = GameWorld::new(config, settings, cli.seed);
    if !game.start_model_load(Box::new(JsonRigLoader::new("."))) {
        warn!("Model loader is not running, the player stays a box");
    }

    let mut input = ScriptedInput::default();
    let mut summary = Summary::default();
    for _ in 0..cli.frames {
        let snapshot = input.sample();
        game.tick(TICK, &snapshot);
        for cmd in game.scene_receiver().try_iter() {
            summary.record(&cmd);
        }
    }

    info!(
        "Simulated {} ticks ({:.1}s): {} scene commands, {} followers spawned (peak crowd {}), {} projectiles, {} goals, {} deaths, final state {:?}",
        cli.frames,
        cli.frames as f32 * TICK,
        summary.commands,
        summary.spawned_characters,
        summary.max_characters,
        summary.spawned_projectiles,
        summary.goals,
        summary.deaths,
        game.state()
    );
}
