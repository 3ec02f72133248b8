//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (lines oldest first, neighbors in direction order)
//! - No rendering or platform dependencies

pub mod direction;
pub mod grid;
pub mod line;
pub mod player;
pub mod state;
pub mod tick;
pub mod tile;
pub mod wave;
pub mod wrap;

pub use direction::Direction;
pub use grid::{Grid, StreamReport};
pub use line::Line;
pub use player::{ClickableSet, MotionState, PlayerMotion, QueueCapacity};
pub use state::{GameEvent, GamePhase, GameState, RngState, StartError};
pub use tick::{TickInput, tick};
pub use tile::{Tile, TileAttributes, TileCatalog, TileId, TileSpec};
pub use wave::{LineContent, WaveData, WaveError, WaveFeed, WaveLibrary, WaveSource};
pub use wrap::WraparoundProjector;
