//! Game configuration resource.
//!
//! Tuning values loaded from an INI file. Every value has a safe default so a
//! missing file or a missing key never stops the game from starting.
//!
//! # Configuration File Format
//!
//! ```ini
//! [road]
//! segment_count = 6
//! segment_length = 40
//! road_width = 19
//! scroll_per_tick = 0.2
//!
//! [goals]
//! spawn_interval = 8
//! spawn_distance = 50
//!
//! [player]
//! move_speed = 9
//! jump_speed = 18
//! gravity = 54
//!
//! [assets]
//! model = assets/rigs/leib.json
//! settings = settings.json
//! ```
//!
//! Speeds in `[player]` and `[projectile]` are per second; `[road]` scroll and
//! the `[followers]` easing/falling values are per tick.

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_CONFIG_PATH: &str = "./config.ini";
const DEFAULT_MODEL: &str = "assets/rigs/leib.json";
const DEFAULT_SETTINGS: &str = "settings.json";

/// Road ring layout and scroll speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoadConfig {
    pub segment_count: usize,
    pub segment_length: f32,
    pub road_width: f32,
    /// Distance everything on the road moves towards `+z` each tick.
    pub scroll_per_tick: f32,
    /// Spacing between lane markings inside a segment.
    pub marking_spacing: f32,
    pub marking_height: f32,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            segment_count: 6,
            segment_length: 40.0,
            road_width: 19.0,
            scroll_per_tick: 0.2,
            marking_spacing: 10.0,
            marking_height: 0.01,
        }
    }
}

impl RoadConfig {
    pub fn half_width(&self) -> f32 {
        self.road_width / 2.0
    }

    /// True when `x` lies on the road surface.
    pub fn is_on_road(&self, x: f32) -> bool {
        x.abs() <= self.half_width()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalConfig {
    /// Seconds of world time between goal pairs.
    pub spawn_interval: f32,
    /// How far ahead of the player a pair appears.
    pub spawn_distance: f32,
    /// Goals further than this behind the player are removed.
    pub despawn_distance: f32,
    pub trigger_half_x: f32,
    pub trigger_half_z: f32,
    /// Seconds before a passed goal stops flashing.
    pub flash_duration: f32,
    pub lane_offset: f32,
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 8.0,
            spawn_distance: 50.0,
            despawn_distance: 20.0,
            trigger_half_x: 3.0,
            trigger_half_z: 2.0,
            flash_duration: 0.3,
            lane_offset: 5.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerConfig {
    pub move_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,
    pub ground_height: f32,
    /// Downward speed applied when stepping off the road.
    pub fall_nudge: f32,
    pub death_height: f32,
    pub start_height: f32,
    /// Vertical speed above which an airborne player is rising.
    pub rising_threshold: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 9.0,
            jump_speed: 18.0,
            gravity: 54.0,
            ground_height: 0.5,
            fall_nudge: 6.0,
            death_height: -5.0,
            start_height: 1.0,
            rising_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowerConfig {
    /// Fraction of the distance to the formation slot covered each tick.
    pub easing: f32,
    pub fall_gravity: f32,
    pub fall_start_speed: f32,
    /// Followers off the road at or below this height start falling.
    pub fall_check_height: f32,
    pub removal_height: f32,
    pub ring_size: usize,
    pub base_radius: f32,
    pub ring_spacing: f32,
    /// Half-width of the uniform jitter added to each slot.
    pub jitter: f32,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            easing: 0.15,
            fall_gravity: 0.015,
            fall_start_speed: 0.05,
            fall_check_height: 0.6,
            removal_height: -10.0,
            ring_size: 8,
            base_radius: 1.5,
            ring_spacing: 1.0,
            jitter: 0.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileConfig {
    pub speed: f32,
    pub life: f32,
    /// Delay between the cast animation starting and the fireball leaving.
    pub cast_delay: f32,
    pub spin_per_tick: f32,
    pub min_sprite_scale: f32,
    pub sprite_scale_range: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 30.0,
            life: 2.0,
            cast_delay: 0.2,
            spin_per_tick: 0.1,
            min_sprite_scale: 0.5,
            sprite_scale_range: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub distance: f32,
    pub height: f32,
    /// Radians per pixel of mouse movement.
    pub sensitivity: f32,
    pub pitch_limit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 10.0,
            height: 5.0,
            sensitivity: 0.002,
            pitch_limit: std::f32::consts::FRAC_PI_3,
        }
    }
}

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    pub road: RoadConfig,
    pub goals: GoalConfig,
    pub player: PlayerConfig,
    pub followers: FollowerConfig,
    pub projectile: ProjectileConfig,
    pub camera: CameraConfig,
    /// Reference handed to the model loader for the player character.
    pub model: String,
    /// Path of the player settings JSON.
    pub settings_path: PathBuf,
    /// Path of the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_f32(config: &Ini, section: &str, key: &str, target: &mut f32) {
    if let Some(value) = config.getfloat(section, key).ok().flatten() {
        *target = value as f32;
    }
}

fn read_usize(config: &Ini, section: &str, key: &str, target: &mut usize) {
    if let Some(value) = config.getuint(section, key).ok().flatten() {
        *target = value as usize;
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            road: RoadConfig::default(),
            goals: GoalConfig::default(),
            player: PlayerConfig::default(),
            followers: FollowerConfig::default(),
            projectile: ProjectileConfig::default(),
            camera: CameraConfig::default(),
            model: DEFAULT_MODEL.to_string(),
            settings_path: PathBuf::from(DEFAULT_SETTINGS),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: {} road segments of {}x{}, goals every {}s, model '{}'",
            self.road.segment_count,
            self.road.road_width,
            self.road.segment_length,
            self.goals.spawn_interval,
            self.model
        );

        Ok(())
    }

    /// Load configuration from INI text. Used by tests and embedders.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .read(text.to_string())
            .map_err(|e| format!("Failed to parse config: {}", e))?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [road]
        read_usize(config, "road", "segment_count", &mut self.road.segment_count);
        read_f32(config, "road", "segment_length", &mut self.road.segment_length);
        read_f32(config, "road", "road_width", &mut self.road.road_width);
        read_f32(config, "road", "scroll_per_tick", &mut self.road.scroll_per_tick);
        read_f32(config, "road", "marking_spacing", &mut self.road.marking_spacing);

        // [goals]
        read_f32(config, "goals", "spawn_interval", &mut self.goals.spawn_interval);
        read_f32(config, "goals", "spawn_distance", &mut self.goals.spawn_distance);
        read_f32(config, "goals", "despawn_distance", &mut self.goals.despawn_distance);
        read_f32(config, "goals", "trigger_half_x", &mut self.goals.trigger_half_x);
        read_f32(config, "goals", "trigger_half_z", &mut self.goals.trigger_half_z);
        read_f32(config, "goals", "flash_duration", &mut self.goals.flash_duration);
        read_f32(config, "goals", "lane_offset", &mut self.goals.lane_offset);

        // [player]
        read_f32(config, "player", "move_speed", &mut self.player.move_speed);
        read_f32(config, "player", "jump_speed", &mut self.player.jump_speed);
        read_f32(config, "player", "gravity", &mut self.player.gravity);
        read_f32(config, "player", "ground_height", &mut self.player.ground_height);
        read_f32(config, "player", "fall_nudge", &mut self.player.fall_nudge);
        read_f32(config, "player", "death_height", &mut self.player.death_height);
        read_f32(config, "player", "start_height", &mut self.player.start_height);

        // [followers]
        read_f32(config, "followers", "easing", &mut self.followers.easing);
        read_f32(config, "followers", "fall_gravity", &mut self.followers.fall_gravity);
        read_f32(config, "followers", "fall_start_speed", &mut self.followers.fall_start_speed);
        read_f32(config, "followers", "fall_check_height", &mut self.followers.fall_check_height);
        read_f32(config, "followers", "removal_height", &mut self.followers.removal_height);
        read_usize(config, "followers", "ring_size", &mut self.followers.ring_size);
        read_f32(config, "followers", "base_radius", &mut self.followers.base_radius);
        read_f32(config, "followers", "ring_spacing", &mut self.followers.ring_spacing);
        read_f32(config, "followers", "jitter", &mut self.followers.jitter);

        // [projectile]
        read_f32(config, "projectile", "speed", &mut self.projectile.speed);
        read_f32(config, "projectile", "life", &mut self.projectile.life);
        read_f32(config, "projectile", "cast_delay", &mut self.projectile.cast_delay);
        read_f32(config, "projectile", "spin_per_tick", &mut self.projectile.spin_per_tick);

        // [camera]
        read_f32(config, "camera", "distance", &mut self.camera.distance);
        read_f32(config, "camera", "height", &mut self.camera.height);
        read_f32(config, "camera", "sensitivity", &mut self.camera.sensitivity);

        // [assets]
        if let Some(model) = config.get("assets", "model") {
            self.model = model;
        }
        if let Some(settings) = config.get("assets", "settings") {
            self.settings_path = PathBuf::from(settings);
        }

        if self.road.segment_count == 0 {
            self.road.segment_count = 1;
        }
        if self.followers.ring_size == 0 {
            self.followers.ring_size = 1;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();
        let mut set = |section: &str, key: &str, value: String| {
            config.set(section, key, Some(value));
        };

        set("road", "segment_count", self.road.segment_count.to_string());
        set("road", "segment_length", self.road.segment_length.to_string());
        set("road", "road_width", self.road.road_width.to_string());
        set("road", "scroll_per_tick", self.road.scroll_per_tick.to_string());
        set("road", "marking_spacing", self.road.marking_spacing.to_string());

        set("goals", "spawn_interval", self.goals.spawn_interval.to_string());
        set("goals", "spawn_distance", self.goals.spawn_distance.to_string());
        set("goals", "despawn_distance", self.goals.despawn_distance.to_string());
        set("goals", "trigger_half_x", self.goals.trigger_half_x.to_string());
        set("goals", "trigger_half_z", self.goals.trigger_half_z.to_string());
        set("goals", "flash_duration", self.goals.flash_duration.to_string());
        set("goals", "lane_offset", self.goals.lane_offset.to_string());

        set("player", "move_speed", self.player.move_speed.to_string());
        set("player", "jump_speed", self.player.jump_speed.to_string());
        set("player", "gravity", self.player.gravity.to_string());
        set("player", "ground_height", self.player.ground_height.to_string());
        set("player", "fall_nudge", self.player.fall_nudge.to_string());
        set("player", "death_height", self.player.death_height.to_string());
        set("player", "start_height", self.player.start_height.to_string());

        set("followers", "easing", self.followers.easing.to_string());
        set("followers", "fall_gravity", self.followers.fall_gravity.to_string());
        set("followers", "fall_start_speed", self.followers.fall_start_speed.to_string());
        set("followers", "fall_check_height", self.followers.fall_check_height.to_string());
        set("followers", "removal_height", self.followers.removal_height.to_string());
        set("followers", "ring_size", self.followers.ring_size.to_string());
        set("followers", "base_radius", self.followers.base_radius.to_string());
        set("followers", "ring_spacing", self.followers.ring_spacing.to_string());
        set("followers", "jitter", self.followers.jitter.to_string());

        set("projectile", "speed", self.projectile.speed.to_string());
        set("projectile", "life", self.projectile.life.to_string());
        set("projectile", "cast_delay", self.projectile.cast_delay.to_string());
        set("projectile", "spin_per_tick", self.projectile.spin_per_tick.to_string());

        set("camera", "distance", self.camera.distance.to_string());
        set("camera", "height", self.camera.height.to_string());
        set("camera", "sensitivity", self.camera.sensitivity.to_string());

        set("assets", "model", self.model.clone());
        set(
            "assets",
            "settings",
            self.settings_path.to_string_lossy().into_owned(),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_keep_defaults() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[road]\nsegment_count = 3\n\n[player]\ngravity = 20.5\n")
            .unwrap();
        assert_eq!(config.road.segment_count, 3);
        assert!((config.player.gravity - 20.5).abs() < 1e-6);
        assert!((config.road.segment_length - 40.0).abs() < 1e-6);
        assert!((config.goals.spawn_interval - 8.0).abs() < 1e-6);
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn assets_section_sets_paths() {
        let mut config = GameConfig::new();
        config
            .load_from_str("[assets]\nmodel = rigs/marco.json\nsettings = my.json\n")
            .unwrap();
        assert_eq!(config.model, "rigs/marco.json");
        assert_eq!(config.settings_path, PathBuf::from("my.json"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut config = GameConfig::with_path("/nonexistent/crowdrun.ini");
        assert!(config.load_from_file().is_err());
        assert_eq!(config.road.segment_count, 6);
    }

    #[test]
    fn road_half_width() {
        let road = RoadConfig::default();
        assert!(road.is_on_road(9.5));
        assert!(!road.is_on_road(-9.6));
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = std::env::temp_dir().join(format!("crowdrun-{}.ini", std::process::id()));
        let mut config = GameConfig::with_path(&path);
        config.road.scroll_per_tick = 0.5;
        config.followers.ring_size = 6;
        config.save_to_file().unwrap();

        let mut loaded = GameConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        assert!((loaded.road.scroll_per_tick - 0.5).abs() < 1e-6);
        assert_eq!(loaded.followers.ring_size, 6);
        let _ = std::fs::remove_file(&path);
    }
}
