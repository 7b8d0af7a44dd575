//! Game configuration resource.
//!
//! Manages settings loaded from an INI configuration file. Provides
//! defaults for safe startup; a missing file or key is never an error.
//!
//! # Configuration File Format
//!
//! ```ini
//! [render]
//! width = 400
//! height = 240
//!
//! [window]
//! width = 1200
//! height = 720
//! target_fps = 120
//!
//! [audio]
//! master_volume = 1.0
//! start_muted = false
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

const DEFAULT_RENDER_WIDTH: u32 = 400;
const DEFAULT_RENDER_HEIGHT: u32 = 240;
const DEFAULT_WINDOW_WIDTH: u32 = 1200;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 120;
const DEFAULT_MASTER_VOLUME: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Render, window, and audio settings.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Internal render width in pixels (the virtual resolution).
    pub render_width: u32,
    /// Internal render height in pixels.
    pub render_height: u32,
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,
    /// Master volume multiplier in [0, 1].
    pub master_volume: f32,
    pub start_muted: bool,
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            render_width: DEFAULT_RENDER_WIDTH,
            render_height: DEFAULT_RENDER_HEIGHT,
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            master_volume: DEFAULT_MASTER_VOLUME,
            start_muted: false,
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
    /// Missing values retain their current (default) values. Returns an
    /// error only if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        if let Some(width) = config.getuint("render", "width").ok().flatten() {
            self.render_width = width as u32;
        }
        if let Some(height) = config.getuint("render", "height").ok().flatten() {
            self.render_height = height as u32;
        }

        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }

        if let Some(volume) = config.getfloat("audio", "master_volume").ok().flatten() {
            self.master_volume = (volume as f32).clamp(0.0, 1.0);
        }
        if let Some(muted) = config.getbool("audio", "start_muted").ok().flatten() {
            self.start_muted = muted;
        }

        info!(
            "Loaded config: {}x{} render, {}x{} window, fps={}, volume={}, muted={}",
            self.render_width,
            self.render_height,
            self.window_width,
            self.window_height,
            self.target_fps,
            self.master_volume,
            self.start_muted
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_virtual_resolution() {
        let cfg = GameConfig::new();
        assert_eq!(cfg.render_width, 400);
        assert_eq!(cfg.render_height, 240);
        assert_eq!(cfg.master_volume, 1.0);
        assert!(!cfg.start_muted);
    }

    #[test]
    fn test_missing_file_is_an_error_but_defaults_survive() {
        let mut cfg = GameConfig::with_path("./definitely-not-here.ini");
        assert!(cfg.load_from_file().is_err());
        assert_eq!(cfg.render_width, 400);
    }
}
