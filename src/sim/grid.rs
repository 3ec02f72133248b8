//! Streaming window of tile lines
//!
//! The grid owns every line (and through them every tile). New lines are
//! spawned above the newest one while it is still inside the view; old
//! lines are pruned from the bottom once they fall far enough behind.

use std::collections::VecDeque;

use glam::Vec2;

use super::direction::Direction;
use super::line::Line;
use super::state::GameEvent;
use super::tile::{Tile, TileAttributes, TileCatalog, TileId};
use super::wave::{LineContent, WaveError, WaveFeed};
use crate::settings::Settings;

/// Lines added and removed by one maintenance pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamReport {
    pub spawned: usize,
    pub pruned: usize,
}

/// The live window of lines, oldest first
#[derive(Debug, Clone)]
pub struct Grid {
    lines: VecDeque<Line>,
    line_counter: u32,
    last_width: usize,
    space_size: f32,
    wrap: bool,
    view_half_extent: f32,
    warmup_lines: u32,
    catalog: TileCatalog,
    substituted_tiles: u32,
}

impl Grid {
    /// Build the pre-laid lines at the configured start height
    pub fn new(settings: &Settings, default_width: usize) -> Self {
        Self::with_prelaid(settings, vec![Vec::new(); settings.prelaid_lines], default_width)
    }

    /// Build the initial lines from pre-allocated rows
    ///
    /// Each row may already hold placeholder tiles; they are kept for their
    /// columns and the rest of the row is filled with default tiles up to
    /// `width`. At least one line is always created.
    pub fn with_prelaid(
        settings: &Settings,
        placeholders: Vec<Vec<TileAttributes>>,
        width: usize,
    ) -> Self {
        let mut grid = Self {
            lines: VecDeque::new(),
            line_counter: 0,
            last_width: width,
            space_size: settings.space_size,
            wrap: settings.loop_left_right,
            view_half_extent: settings.view_half_extent,
            warmup_lines: settings.warmup_lines,
            catalog: TileCatalog::new(settings.tile_types.clone(), &settings.default_tile),
            substituted_tiles: 0,
        };

        let rows = if placeholders.is_empty() {
            vec![Vec::new()]
        } else {
            placeholders
        };
        let mut world_y = settings.first_line_y;
        for row in rows {
            let sequence = grid.next_sequence();
            let previous = grid.lines.back().map(|l| l.sequence_number);
            let line = Line::new(sequence, world_y, previous).with_placeholders(row);
            let defaults = vec![grid.catalog.default_attributes(); width];
            grid.attach(line, defaults);
            world_y += settings.line_offset();
        }
        log::info!(
            "Grid ready: {} lines of width {} (wrap: {})",
            grid.lines.len(),
            width,
            grid.wrap
        );
        grid
    }

    fn next_sequence(&mut self) -> u32 {
        self.line_counter += 1;
        self.line_counter
    }

    /// Populate, link and append a line
    fn attach(&mut self, mut line: Line, attributes: Vec<TileAttributes>) {
        line.populate(attributes, self.space_size);
        line.link(self.lines.back_mut(), self.wrap);
        self.last_width = line.width();
        self.lines.push_back(line);
    }

    /// Spawn one line directly above the newest one
    ///
    /// Returns the new line's sequence number.
    pub fn spawn_line(&mut self, content: LineContent, events: &mut Vec<GameEvent>) -> u32 {
        let attributes = match content {
            LineContent::Explicit(specs) if !specs.is_empty() => specs
                .iter()
                .map(|spec| match self.catalog.resolve(spec) {
                    Ok(attrs) => attrs,
                    Err((fallback, rejected)) => {
                        self.substituted_tiles += 1;
                        events.push(GameEvent::TileTypeSubstituted { type_name: rejected });
                        fallback
                    }
                })
                .collect(),
            LineContent::Explicit(_) => {
                log::warn!("Empty line content, using width {}", self.last_width);
                vec![self.catalog.default_attributes(); self.last_width]
            }
            LineContent::Default { width } => vec![self.catalog.default_attributes(); width],
        };

        let (previous, world_y) = match self.lines.back() {
            Some(newest) => (
                Some(newest.sequence_number),
                newest.world_y + self.space_size,
            ),
            None => (None, 0.0),
        };
        let sequence = self.next_sequence();
        self.attach(Line::new(sequence, world_y, previous), attributes);
        sequence
    }

    /// Per-tick streaming: spawn ahead of the view, then prune behind it
    ///
    /// `pinned` is the lowest line the player still references; pruning never
    /// removes it or anything above it.
    pub fn maintain(
        &mut self,
        reference_y: f32,
        origin_y: f32,
        feed: &mut WaveFeed,
        pinned: Option<u32>,
        events: &mut Vec<GameEvent>,
    ) -> Result<StreamReport, WaveError> {
        let mut report = StreamReport::default();

        let spawn_ceiling = reference_y.max(origin_y) + self.view_half_extent;
        while self.newest().world_y < spawn_ceiling {
            // Keep structured content away from the start area
            let content = if self.line_counter + 1 > self.warmup_lines {
                LineContent::Explicit(feed.next_line()?)
            } else {
                LineContent::Default {
                    width: feed.default_width(),
                }
            };
            self.spawn_line(content, events);
            report.spawned += 1;
        }

        report.pruned = self.prune(origin_y, pinned);

        if report.spawned > 0 || report.pruned > 0 {
            log::debug!(
                "Streaming: +{} -{} lines, window {}..={}",
                report.spawned,
                report.pruned,
                self.oldest().sequence_number,
                self.newest().sequence_number
            );
        }
        Ok(report)
    }

    /// Remove lines from the bottom while they sit below the prune boundary
    ///
    /// Stops at the first line still above the boundary, at the pinned line,
    /// and always keeps at least one line.
    pub fn prune(&mut self, origin_y: f32, pinned: Option<u32>) -> usize {
        let boundary = origin_y - self.view_half_extent * 2.0;
        let mut pruned = 0;
        while self.lines.len() > 1 {
            let oldest = self.oldest();
            if oldest.world_y >= boundary {
                break;
            }
            if pinned.is_some_and(|p| oldest.sequence_number >= p) {
                break;
            }
            self.lines.pop_front();
            if let Some(new_oldest) = self.lines.front_mut() {
                new_oldest.unlink_below();
            }
            pruned += 1;
        }
        pruned
    }

    /// Oldest live line
    pub fn oldest(&self) -> &Line {
        // The window is never empty
        &self.lines[0]
    }

    /// Newest live line
    pub fn newest(&self) -> &Line {
        &self.lines[self.lines.len() - 1]
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Live line with the given sequence number
    pub fn line(&self, sequence: u32) -> Option<&Line> {
        let first = self.oldest().sequence_number;
        let offset = sequence.checked_sub(first)?;
        self.lines.get(offset as usize)
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.line(id.line)?.tile(id.column)
    }

    pub fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        let first = self.oldest().sequence_number;
        let offset = id.line.checked_sub(first)?;
        self.lines.get_mut(offset as usize)?.tile_mut(id.column)
    }

    pub fn position(&self, id: TileId) -> Option<Vec2> {
        self.tile(id).map(|t| t.position)
    }

    pub fn neighbor(&self, id: TileId, dir: Direction) -> Option<TileId> {
        self.tile(id)?.neighbor(dir)
    }

    /// Heading (degrees, clockwise from up) of the slot linking `root` to `candidate`
    pub fn neighbor_angle(&self, root: TileId, candidate: TileId) -> Option<f32> {
        self.tile(root)?.direction_to(candidate).map(Direction::angle)
    }

    /// Tile whose center is closest to `point`
    pub fn nearest_tile(&self, point: Vec2) -> Option<TileId> {
        let mut best: Option<(f32, TileId)> = None;
        for tile in self.lines.iter().flat_map(|l| l.tiles()) {
            let dist = tile.position.distance(point);
            if best.is_none_or(|(d, _)| dist < d) {
                best = Some((dist, tile.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// Horizontal extent of a live row; phantom copies on it sit this far apart
    pub fn lane_width(&self, sequence: u32) -> Option<f32> {
        self.line(sequence)
            .map(|line| line.width() as f32 * self.space_size)
    }

    pub fn wraps(&self) -> bool {
        self.wrap
    }

    /// Highest sequence number handed out so far
    pub fn line_counter(&self) -> u32 {
        self.line_counter
    }

    /// Number of tiles built from an unknown type name
    pub fn substituted_tiles(&self) -> u32 {
        self.substituted_tiles
    }
}
