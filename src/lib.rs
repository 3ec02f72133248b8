//! Tile Runner - lane grid and tile movement engine for an endless vertical runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tile graph streaming, player motion, wraparound)
//! - `settings`: Data-driven configuration loaded from JSON

pub mod settings;
pub mod sim;

pub use settings::{DirectionPermissions, Settings, SettingsError};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Distance between tile centers, horizontally and between lines
    pub const SPACE_SIZE: f32 = 1.0;
    /// Half the visible height of the playfield (orthographic camera size)
    pub const VIEW_HALF_EXTENT: f32 = 6.0;
    /// Lines spawned before explicit wave content is used
    pub const WARMUP_LINES: u32 = 5;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 4.0;
    pub const INPUT_QUEUE_SIZE: usize = 3;
    /// Seconds between forced forward moves (before difficulty scaling)
    pub const AUTO_MOVE_DELAY: f32 = 2.0;
    /// Percent speed gained per line of progress
    pub const DIFFICULTY_INCREASE: f32 = 0.5;

    /// Tile type used for default lines and unknown specs
    pub const DEFAULT_TILE: &str = "TileDefault";
}

/// Normalize an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Unit vector for a heading in degrees, clockwise from "up" (+y)
#[inline]
pub fn heading_to_vec(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.sin(), rad.cos())
}

/// Dot product of the unit vectors of two headings (degrees)
///
/// Evaluated as the cosine of their difference so that headings mirrored
/// around the reference produce bit-identical results.
#[inline]
pub fn heading_alignment(a: f32, b: f32) -> f32 {
    (a - b).to_radians().cos()
}
