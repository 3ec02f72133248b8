//! Line content supply
//!
//! A [`WaveSource`] hands out the tile specifications of a wave line by
//! line. [`WaveFeed`] walks the current source and, when it runs dry,
//! picks another one from its library (seeded RNG) and retries once.

use std::fmt;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::RngState;
use super::tile::TileSpec;

/// Content of a line to spawn
#[derive(Debug, Clone, PartialEq)]
pub enum LineContent {
    /// Explicit ordered tile specifications, one per column
    Explicit(Vec<TileSpec>),
    /// A row of default tiles
    Default { width: usize },
}

/// Supplier of per-line content
pub trait WaveSource: fmt::Debug {
    /// Specs for the given line of this wave, `None` once exhausted
    fn line_spec(&self, line_index: usize) -> Option<Vec<TileSpec>>;
    /// Width used for default lines while this source is active
    fn default_width(&self) -> usize;
}

/// Wave content errors
#[derive(Debug, Error)]
pub enum WaveError {
    #[error("wave library is empty")]
    EmptyLibrary,
    #[error("no wave could supply line {line_index} after reselecting a source")]
    Exhausted { line_index: usize },
    #[error("failed to read wave library: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse wave library: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A data-defined wave: a width and rows of `name+modifier` strings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveData {
    pub width: usize,
    #[serde(default)]
    pub lines: Vec<Vec<String>>,
}

impl WaveData {
    /// A wave with no explicit rows, only a default width
    pub fn plain(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
        }
    }
}

impl WaveSource for WaveData {
    fn line_spec(&self, line_index: usize) -> Option<Vec<TileSpec>> {
        // Empty rows are treated as missing content
        self.lines
            .get(line_index)
            .filter(|row| !row.is_empty())
            .map(|row| row.iter().map(|raw| TileSpec::parse(raw)).collect())
    }

    fn default_width(&self) -> usize {
        self.width
    }
}

/// Collection of waves, as stored in a level file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveLibrary {
    pub waves: Vec<WaveData>,
}

impl WaveLibrary {
    pub fn from_json(json: &str) -> Result<Self, WaveError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, WaveError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Box every wave as a source for a [`WaveFeed`]
    pub fn into_sources(self) -> Vec<Box<dyn WaveSource>> {
        self.waves
            .into_iter()
            .map(|wave| Box::new(wave) as Box<dyn WaveSource>)
            .collect()
    }
}

/// Cursor over a set of wave sources
#[derive(Debug)]
pub struct WaveFeed {
    sources: Vec<Box<dyn WaveSource>>,
    current: usize,
    line_cursor: usize,
    rng: Pcg32,
}

impl WaveFeed {
    /// Build a feed and select the first wave
    pub fn new(sources: Vec<Box<dyn WaveSource>>, rng_state: &RngState) -> Result<Self, WaveError> {
        if sources.is_empty() {
            return Err(WaveError::EmptyLibrary);
        }
        let mut feed = Self {
            sources,
            current: 0,
            line_cursor: 0,
            rng: rng_state.to_rng(),
        };
        feed.select_wave();
        Ok(feed)
    }

    pub fn from_library(library: WaveLibrary, rng_state: &RngState) -> Result<Self, WaveError> {
        Self::new(library.into_sources(), rng_state)
    }

    /// Index of the active source
    pub fn current_wave(&self) -> usize {
        self.current
    }

    /// Line of the active source that will be served next
    pub fn line_cursor(&self) -> usize {
        self.line_cursor
    }

    pub fn default_width(&self) -> usize {
        self.sources[self.current].default_width()
    }

    fn select_wave(&mut self) {
        self.line_cursor = 0;
        self.current = self.rng.random_range(0..self.sources.len());
        log::info!("Selected wave {} of {}", self.current, self.sources.len());
    }

    /// Specs for the next explicit line
    ///
    /// When the active source is exhausted another one is selected and asked
    /// once more; a second miss means the library cannot feed the grid.
    pub fn next_line(&mut self) -> Result<Vec<TileSpec>, WaveError> {
        let specs = match self.sources[self.current].line_spec(self.line_cursor) {
            Some(specs) => specs,
            None => {
                self.select_wave();
                self.sources[self.current]
                    .line_spec(self.line_cursor)
                    .ok_or(WaveError::Exhausted {
                        line_index: self.line_cursor,
                    })?
            }
        };
        self.line_cursor += 1;
        Ok(specs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(width: usize, rows: &[&[&str]]) -> WaveData {
        WaveData {
            width,
            lines: rows
                .iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_wave_data_parses_specs() {
        let data = wave(2, &[&["TileDefault", "TileSpike+hot"]]);
        let specs = data.line_spec(0).unwrap();
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[1].type_name, "TileSpike");
        assert_eq!(specs[1].modifiers, vec!["hot"]);
        assert!(data.line_spec(1).is_none());
        assert_eq!(data.default_width(), 2);
    }

    #[test]
    fn test_feed_walks_lines_then_reselects() {
        let library = WaveLibrary {
            waves: vec![wave(3, &[&["A", "B", "C"], &["D"]])],
        };
        let mut feed = WaveFeed::from_library(library, &RngState::new(7)).unwrap();
        assert_eq!(feed.next_line().unwrap().len(), 3);
        assert_eq!(feed.next_line().unwrap().len(), 1);
        assert_eq!(feed.line_cursor(), 2);
        // Exhausted: the only wave is reselected and restarts from line 0
        assert_eq!(feed.next_line().unwrap()[0].type_name, "A");
        assert_eq!(feed.line_cursor(), 1);
    }

    #[test]
    fn test_feed_fails_when_retry_also_misses() {
        let library = WaveLibrary {
            waves: vec![WaveData::plain(4)],
        };
        let mut feed = WaveFeed::from_library(library, &RngState::new(1)).unwrap();
        assert_eq!(feed.default_width(), 4);
        assert!(matches!(
            feed.next_line(),
            Err(WaveError::Exhausted { line_index: 0 })
        ));
    }

    #[test]
    fn test_empty_library_rejected() {
        let result = WaveFeed::from_library(WaveLibrary::default(), &RngState::new(1));
        assert!(matches!(result, Err(WaveError::EmptyLibrary)));
    }

    #[test]
    fn test_library_from_json() {
        let json = r#"{"waves":[{"width":3,"lines":[["TileDefault","TileDefault","TileHole+deep"]]}]}"#;
        let library = WaveLibrary::from_json(json).unwrap();
        assert_eq!(library.waves.len(), 1);
        assert_eq!(library.waves[0].line_spec(0).unwrap()[2].modifiers, vec!["deep"]);
        assert!(WaveLibrary::from_json("{not json").is_err());
    }

    #[test]
    fn test_selection_is_deterministic_per_seed() {
        let make = || {
            let library = WaveLibrary {
                waves: (1..=6).map(WaveData::plain).collect(),
            };
            WaveFeed::from_library(library, &RngState::new(4242)).unwrap()
        };
        assert_eq!(make().current_wave(), make().current_wave());
    }
}
