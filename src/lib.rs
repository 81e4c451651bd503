//! Snake Horror - a grid snake game haunted by its own sanity meter
//!
//! Core modules:
//! - `sim`: Simulation core (grid state, level generation, tick resolution)
//! - `horror`: Sanity-driven horror effect scheduler
//! - `renderer`: Software frame compositor (tiles, particles, vignette)
//! - `game`: Screen state machine and the tick/frame loop
//! - `persistence`: Key/value storage backends
//! - `input`, `audio`: Collaborators feeding intent in and cues out

pub mod audio;
pub mod autopilot;
pub mod game;
pub mod highscores;
pub mod horror;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::{Game, GameConfig, Screen};
pub use highscores::{HighScores, LevelUnlocks};
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Grid dimensions in cells
    pub const GRID_WIDTH: i32 = 40;
    pub const GRID_HEIGHT: i32 = 22;

    /// Size of one grid cell in pixels
    pub const TILE_SIZE: f32 = 20.0;

    /// Fixed simulation interval in milliseconds
    pub const TICK_INTERVAL_MS: f64 = 150.0;

    /// Sanity bounds and per-tick drain
    pub const MAX_SANITY: f32 = 100.0;
    pub const SANITY_DECAY_PER_TICK: f32 = 0.05;
    /// Sanity restored by each piece of meat
    pub const FOOD_SANITY_RESTORE: f32 = 15.0;
    /// Sanity after surviving a non-fatal jumpscare
    pub const JUMPSCARE_RECOVERY_SANITY: f32 = 50.0;

    /// Score awards
    pub const FOOD_SCORE: u64 = 10;
    pub const KEY_SCORE: u64 = 50;

    /// Levels listed on the level select screen
    pub const LEVEL_COUNT: u32 = 20;

    /// Upper bound on rejection sampling draws before falling back
    pub const SPAWN_ATTEMPTS: u32 = 4096;
}

/// Grid dimensions in pixels
#[inline]
pub fn grid_pixel_size() -> Vec2 {
    Vec2::new(
        consts::GRID_WIDTH as f32 * consts::TILE_SIZE,
        consts::GRID_HEIGHT as f32 * consts::TILE_SIZE,
    )
}

/// Pixel-space center of a grid cell (relative to the grid origin)
#[inline]
pub fn cell_center(x: i32, y: i32) -> Vec2 {
    Vec2::new(
        x as f32 * consts::TILE_SIZE + consts::TILE_SIZE / 2.0,
        y as f32 * consts::TILE_SIZE + consts::TILE_SIZE / 2.0,
    )
}

/// Convert sanity (0-100) into stress (0 calm, 1 panic)
#[inline]
pub fn stress_from_sanity(sanity: f32) -> f32 {
    ((consts::MAX_SANITY - sanity) / consts::MAX_SANITY).clamp(0.0, 1.0)
}
