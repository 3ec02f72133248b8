//! Game state and core simulation types
//!
//! [`GameState`] is the single context object passed to every tick: it owns
//! the grid, the player, the wave feed and the pending event list.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::Grid;
use super::player::PlayerMotion;
use super::tile::TileId;
use super::wave::{WaveError, WaveFeed, WaveLibrary, WaveSource};
use crate::settings::{Settings, SettingsError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Things that happened during a tick, in order
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Player arrived on a tile
    TileEntered(TileId),
    /// Player committed to leaving a tile
    TileLeft(TileId),
    /// A new highest line was reached
    LineReached { line: u32, points: u64 },
    /// A forced forward move was queued
    AutoMoveTriggered(TileId),
    /// Wave content named an unknown tile type
    TileTypeSubstituted { type_name: String },
    RunEnded { progress: u32, score: u64 },
}

/// Reasons a run cannot start
#[derive(Debug, Error)]
pub enum StartError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Wave(#[from] WaveError),
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete game state
#[derive(Debug)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: GamePhase,
    pub grid: Grid,
    pub player: PlayerMotion,
    pub feed: WaveFeed,
    /// Camera origin; lines behind it are pruned
    pub view_origin_y: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(super) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run: pre-laid lines, player snapped onto the nearest tile
    ///
    /// Settings are validated first; a non-positive spacing or view extent
    /// would keep the grid spawning forever.
    pub fn new(
        settings: Settings,
        sources: Vec<Box<dyn WaveSource>>,
        seed: u64,
    ) -> Result<Self, StartError> {
        settings.validate()?;
        let feed = WaveFeed::new(sources, &RngState::new(seed))?;
        let grid = Grid::new(&settings, feed.default_width());
        let mut player = PlayerMotion::new(&settings);
        player.place_on_nearest(&grid);
        let view_origin_y = player.position.y;

        log::info!("New run (seed {seed})");
        Ok(Self {
            settings,
            seed,
            phase: GamePhase::Playing,
            grid,
            player,
            feed,
            view_origin_y,
            time_ticks: 0,
            events: Vec::new(),
        })
    }

    pub fn from_library(
        settings: Settings,
        library: WaveLibrary,
        seed: u64,
    ) -> Result<Self, StartError> {
        Self::new(settings, library.into_sources(), seed)
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// End the run; further ticks do nothing
    pub fn end_run(&mut self) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        let (progress, score) = (self.player.progress(), self.player.score());
        self.events.push(GameEvent::RunEnded { progress, score });
        log::info!("Run ended: progress {progress}, score {score}");
    }
}
