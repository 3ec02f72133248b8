//! Game settings
//!
//! Loaded from a JSON file; every field has a default so the file only
//! needs the values it overrides.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::Direction;

/// Configuration errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Which directions may be chosen by player input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionPermissions {
    pub north: bool,
    pub south: bool,
    pub east: bool,
    pub west: bool,
    pub north_east: bool,
    pub north_west: bool,
    pub south_east: bool,
    pub south_west: bool,
}

impl Default for DirectionPermissions {
    /// Forward, sideways and forward diagonals; no stepping back
    fn default() -> Self {
        Self {
            north: true,
            south: false,
            east: true,
            west: true,
            north_east: true,
            north_west: true,
            south_east: false,
            south_west: false,
        }
    }
}

impl DirectionPermissions {
    pub const ALL: Self = Self {
        north: true,
        south: true,
        east: true,
        west: true,
        north_east: true,
        north_west: true,
        south_east: true,
        south_west: true,
    };

    pub const NONE: Self = Self {
        north: false,
        south: false,
        east: false,
        west: false,
        north_east: false,
        north_west: false,
        south_east: false,
        south_west: false,
    };

    /// Permission table indexed by [`Direction`]
    pub fn table(&self) -> [bool; Direction::COUNT] {
        let mut table = [false; Direction::COUNT];
        for dir in Direction::ALL {
            table[dir.index()] = self.allows(dir);
        }
        table
    }

    pub fn allows(&self, dir: Direction) -> bool {
        match dir {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::East => self.east,
            Direction::West => self.west,
            Direction::NorthEast => self.north_east,
            Direction::NorthWest => self.north_west,
            Direction::SouthEast => self.south_east,
            Direction::SouthWest => self.south_west,
        }
    }

    pub fn set(&mut self, dir: Direction, allowed: bool) {
        let slot = match dir {
            Direction::North => &mut self.north,
            Direction::South => &mut self.south,
            Direction::East => &mut self.east,
            Direction::West => &mut self.west,
            Direction::NorthEast => &mut self.north_east,
            Direction::NorthWest => &mut self.north_west,
            Direction::SouthEast => &mut self.south_east,
            Direction::SouthWest => &mut self.south_west,
        };
        *slot = allowed;
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Grid ===
    /// Distance between tile centers (also the line offset)
    pub space_size: f32,
    /// Close every line into a ring (leftmost and rightmost columns adjacent)
    pub loop_left_right: bool,
    /// Half the visible height; lines spawn this far above the view
    pub view_half_extent: f32,
    /// Lines created with default width before wave content is used
    pub warmup_lines: u32,
    /// Pre-laid lines present at start
    pub prelaid_lines: usize,
    /// World y of the first pre-laid line
    pub first_line_y: f32,
    /// Known tile type names
    pub tile_types: Vec<String>,
    /// Fallback for default lines and unknown tile names
    pub default_tile: String,

    // === Player ===
    pub player_speed: f32,
    /// Pending move limit; `None` means unbounded
    pub input_queue_size: Option<usize>,
    /// Player position before snapping to the nearest tile
    pub spawn_point: Vec2,
    pub permissions: DirectionPermissions,
    /// Accept swipe angles as input
    pub swipe_control: bool,
    /// Award one point per newly reached line
    pub points_per_line: bool,

    // === Difficulty ===
    /// Percent of speed gained per line of progress
    pub difficulty_increase: f32,

    // === Auto move ===
    pub auto_move: bool,
    /// Seconds between forced moves at difficulty 1
    pub auto_move_delay: f32,
    /// Direction of forced moves
    pub forward: Direction,

    // === Run end ===
    /// End the run when the player drops this far below the view origin
    pub kill_margin: Option<f32>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Grid
            space_size: SPACE_SIZE,
            loop_left_right: true,
            view_half_extent: VIEW_HALF_EXTENT,
            warmup_lines: WARMUP_LINES,
            prelaid_lines: 3,
            first_line_y: 0.0,
            tile_types: vec![DEFAULT_TILE.to_string()],
            default_tile: DEFAULT_TILE.to_string(),

            // Player
            player_speed: PLAYER_SPEED,
            input_queue_size: Some(INPUT_QUEUE_SIZE),
            spawn_point: Vec2::ZERO,
            permissions: DirectionPermissions::default(),
            swipe_control: true,
            points_per_line: true,

            // Difficulty
            difficulty_increase: DIFFICULTY_INCREASE,

            // Auto move
            auto_move: true,
            auto_move_delay: AUTO_MOVE_DELAY,
            forward: Direction::North,

            // Run end
            kill_margin: None,
        }
    }
}

impl Settings {
    /// Multiplier applied to speed and timing for the given progress
    pub fn difficulty_modifier(&self, progress: u32) -> f32 {
        (self.difficulty_increase * progress as f32 + 100.0) / 100.0
    }

    /// Forced move delay at the given progress
    pub fn auto_move_delay_at(&self, progress: u32) -> f32 {
        self.auto_move_delay / self.difficulty_modifier(progress)
    }

    /// Distance between consecutive lines
    pub fn line_offset(&self) -> f32 {
        self.space_size
    }

    /// Check values that would break the simulation
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.space_size > 0.0) {
            return Err(SettingsError::Invalid {
                field: "space_size",
                reason: "must be positive",
            });
        }
        if !(self.view_half_extent > 0.0) {
            return Err(SettingsError::Invalid {
                field: "view_half_extent",
                reason: "must be positive",
            });
        }
        if !(self.player_speed >= 0.0) {
            return Err(SettingsError::Invalid {
                field: "player_speed",
                reason: "must not be negative",
            });
        }
        if self.prelaid_lines == 0 {
            return Err(SettingsError::Invalid {
                field: "prelaid_lines",
                reason: "at least one line is required",
            });
        }
        if !self.tile_types.iter().any(|t| t == &self.default_tile) {
            return Err(SettingsError::Invalid {
                field: "default_tile",
                reason: "must be one of tile_types",
            });
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path.map(|p| Self::load(p)) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
