//! Queued tile-to-tile player movement
//!
//! The player is either idle on its last visited tile or transiting toward
//! the head of the move queue. Input (keyboard, swipe, forced auto-move)
//! only ever appends to the queue; [`PlayerMotion::update`] integrates the
//! position and handles arrivals.

use std::collections::VecDeque;

use glam::Vec2;

use super::direction::Direction;
use super::grid::Grid;
use super::state::GameEvent;
use super::tile::TileId;
use super::wrap::WraparoundProjector;
use crate::settings::{DirectionPermissions, Settings};

/// Upper bound on pending moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueCapacity {
    Bounded(usize),
    Unbounded,
}

impl QueueCapacity {
    /// `None` in settings means no limit
    pub fn from_setting(size: Option<usize>) -> Self {
        match size {
            Some(n) => QueueCapacity::Bounded(n),
            None => QueueCapacity::Unbounded,
        }
    }

    pub fn limit(&self) -> usize {
        match self {
            QueueCapacity::Bounded(n) => *n,
            QueueCapacity::Unbounded => usize::MAX,
        }
    }

    /// No further entries can be queued
    #[inline]
    pub fn is_full(&self, len: usize) -> bool {
        len >= self.limit()
    }

    /// Player input is refused: the last slot is kept for forced moves
    #[inline]
    pub fn input_blocked(&self, len: usize) -> bool {
        len >= self.limit().saturating_sub(1)
    }
}

/// Neighbors of the root tile currently eligible as move targets
///
/// Built in [`Direction`] order; swipe tie-breaking depends on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClickableSet {
    slots: [Option<(Direction, TileId)>; Direction::COUNT],
    len: usize,
}

impl ClickableSet {
    pub fn clear(&mut self) {
        self.slots = [None; Direction::COUNT];
        self.len = 0;
    }

    fn push(&mut self, dir: Direction, tile: TileId) {
        // At most one entry per direction, so this never overflows
        self.slots[self.len] = Some((dir, tile));
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, tile: TileId) -> bool {
        self.iter().any(|(_, t)| t == tile)
    }

    /// Entries in build order
    pub fn iter(&self) -> impl Iterator<Item = (Direction, TileId)> + '_ {
        self.slots[..self.len].iter().flatten().copied()
    }
}

/// Coarse movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// Queue empty, standing on the root tile
    Idle,
    /// Moving toward the queue head
    Transiting,
}

/// The player's token and its movement queue
#[derive(Debug, Clone)]
pub struct PlayerMotion {
    /// Authoritative position (may sit on a phantom copy after a wrap)
    pub position: Vec2,
    history: Vec<TileId>,
    queue: VecDeque<TileId>,
    capacity: QueueCapacity,
    permissions: DirectionPermissions,
    clickable: ClickableSet,
    /// Highest line sequence number reached
    progress: u32,
    score: u64,
    auto_move_timer: f32,
    auto_move_target: Option<TileId>,
    projector: WraparoundProjector,
}

impl PlayerMotion {
    pub fn new(settings: &Settings) -> Self {
        Self {
            position: settings.spawn_point,
            history: Vec::new(),
            queue: VecDeque::new(),
            capacity: QueueCapacity::from_setting(settings.input_queue_size),
            permissions: settings.permissions,
            clickable: ClickableSet::default(),
            progress: 0,
            score: 0,
            auto_move_timer: settings.auto_move_delay_at(0),
            auto_move_target: None,
            projector: WraparoundProjector::default(),
        }
    }

    // === Queries ===

    pub fn state(&self) -> MotionState {
        if self.queue.is_empty() {
            MotionState::Idle
        } else {
            MotionState::Transiting
        }
    }

    /// Tile the next move is evaluated from: queue tail, else last visited
    pub fn root_tile(&self) -> Option<TileId> {
        self.queue.back().or(self.history.last()).copied()
    }

    /// Visited tile `offset` steps back from the most recent one
    pub fn last_tile(&self, offset: usize) -> Option<TileId> {
        let index = self.history.len().checked_sub(offset + 1)?;
        self.history.get(index).copied()
    }

    pub fn history(&self) -> &[TileId] {
        &self.history
    }

    pub fn queue(&self) -> impl Iterator<Item = TileId> + '_ {
        self.queue.iter().copied()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn capacity(&self) -> QueueCapacity {
        self.capacity
    }

    pub fn clickable(&self) -> &ClickableSet {
        &self.clickable
    }

    pub fn is_tile_clickable(&self, tile: TileId) -> bool {
        self.clickable.contains(tile)
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn auto_move_timer(&self) -> f32 {
        self.auto_move_timer
    }

    pub fn auto_move_target(&self) -> Option<TileId> {
        self.auto_move_target
    }

    /// Left and right phantom copies, as of the end of the last update
    pub fn ghosts(&self) -> [Vec2; 2] {
        self.projector.ghosts()
    }

    /// Lowest line still referenced by the current tile or the queue
    pub fn pinned_line(&self) -> Option<u32> {
        self.history
            .last()
            .into_iter()
            .chain(self.queue.iter())
            .map(|t| t.line)
            .min()
    }

    /// Player position followed by every queued tile, for path display
    pub fn path_points(&self, grid: &Grid) -> Vec<Vec2> {
        std::iter::once(self.position)
            .chain(self.queue.iter().filter_map(|&t| grid.position(t)))
            .collect()
    }

    /// Auto-move countdown as a dial angle in degrees (360 = full delay)
    pub fn auto_move_dial_degrees(&self, settings: &Settings) -> f32 {
        let delay = settings.auto_move_delay_at(self.progress);
        if delay <= 0.0 {
            return 0.0;
        }
        360.0 / delay * self.auto_move_timer.max(0.0)
    }

    // === Placement ===

    /// Start on the tile nearest the current position
    pub fn place_on_nearest(&mut self, grid: &Grid) -> Option<TileId> {
        let tile = grid.nearest_tile(self.position)?;
        self.history.push(tile);
        // Standing on the start line is not worth points
        self.progress = self.progress.max(tile.line);
        if let Some(pos) = grid.position(tile) {
            self.position = pos;
        }
        self.rebuild_clickable(grid);
        self.sync_ghosts(grid);
        log::info!("Player placed on {:?}", tile);
        Some(tile)
    }

    /// Jump straight onto a tile, dropping every pending move
    pub fn teleport(
        &mut self,
        tile: TileId,
        grid: &Grid,
        settings: &Settings,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let Some(pos) = grid.position(tile) else {
            return false;
        };
        self.position = pos;
        self.queue.clear();
        self.history.push(tile);
        events.push(GameEvent::TileEntered(tile));
        self.auto_move_target = None;
        self.auto_move_timer = settings.auto_move_delay_at(self.progress);
        self.rebuild_clickable(grid);
        true
    }

    /// Replace pending moves with `tile`
    ///
    /// With `finish_move` the move in progress (queue head) is kept first.
    pub fn force_tile(
        &mut self,
        tile: TileId,
        finish_move: bool,
        grid: &Grid,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        self.auto_move_target = None;
        // Re-arm the countdown edge it may have already passed
        if self.auto_move_timer < 0.0 {
            self.auto_move_timer = 0.0;
        }
        if finish_move {
            self.queue.truncate(1);
        } else {
            self.queue.clear();
        }
        self.queue_tile(Some(tile), grid, events)
    }

    /// Make the forced forward move fire on the next update
    pub fn force_auto_move(&mut self) {
        self.auto_move_timer = 0.0;
    }

    // === Input ===

    /// Append a target to the move queue
    ///
    /// Returns `false` for a missing tile or a full queue; both are normal
    /// under fast input and leave the queue untouched.
    pub fn queue_tile(
        &mut self,
        tile: Option<TileId>,
        grid: &Grid,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let Some(tile) = tile else {
            return false;
        };
        if self.capacity.is_full(self.queue.len()) {
            return false;
        }
        self.queue.push_back(tile);
        if self.queue.len() == 1 {
            self.project_onto_nearest(grid);
            // Committed to leaving the current tile
            if let Some(current) = self.history.last() {
                events.push(GameEvent::TileLeft(*current));
            }
        }
        self.rebuild_clickable(grid);
        true
    }

    /// Queue the root tile's neighbor in `dir`
    ///
    /// Without `force` the neighbor must be in the clickable set.
    pub fn move_direction(
        &mut self,
        dir: Direction,
        force: bool,
        grid: &Grid,
        events: &mut Vec<GameEvent>,
    ) -> Option<TileId> {
        let root = self.root_tile()?;
        let target = grid.neighbor(root, dir)?;
        if !force && !self.clickable.contains(target) {
            return None;
        }
        self.queue_tile(Some(target), grid, events).then_some(target)
    }

    pub fn move_left(&mut self, grid: &Grid, events: &mut Vec<GameEvent>) -> Option<TileId> {
        self.move_lateral(
            [Direction::NorthWest, Direction::West, Direction::SouthWest],
            grid,
            events,
        )
    }

    pub fn move_right(&mut self, grid: &Grid, events: &mut Vec<GameEvent>) -> Option<TileId> {
        self.move_lateral(
            [Direction::NorthEast, Direction::East, Direction::SouthEast],
            grid,
            events,
        )
    }

    /// Queue the first clickable neighbor in priority order
    fn move_lateral(
        &mut self,
        priority: [Direction; 3],
        grid: &Grid,
        events: &mut Vec<GameEvent>,
    ) -> Option<TileId> {
        if self.capacity.input_blocked(self.queue.len()) {
            return None;
        }
        let root = self.root_tile()?;
        let target = priority
            .into_iter()
            .filter_map(|dir| grid.neighbor(root, dir))
            .find(|&t| self.clickable.contains(t))?;
        self.queue_tile(Some(target), grid, events).then_some(target)
    }

    /// Queue the clickable neighbor best aligned with a swipe
    ///
    /// `angle` is in degrees, clockwise from up. Equal alignment keeps the
    /// earlier candidate in build order.
    pub fn swipe(&mut self, angle: f32, grid: &Grid, events: &mut Vec<GameEvent>) -> Option<TileId> {
        let mut best: Option<(f32, TileId)> = None;
        for (dir, tile) in self.clickable.iter() {
            let dot = dir.alignment(angle);
            if best.is_none_or(|(best_dot, _)| dot > best_dot) {
                best = Some((dot, tile));
            }
        }
        let (_, target) = best?;
        self.queue_tile(Some(target), grid, events).then_some(target)
    }

    // === Simulation ===

    /// Advance one tick: integrate motion, handle arrival, run auto-move and
    /// rebuild the clickable set
    pub fn update(
        &mut self,
        grid: &Grid,
        settings: &Settings,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        let speed = settings.player_speed * settings.difficulty_modifier(self.progress);

        if let Some(&target) = self.queue.front() {
            match grid.position(target) {
                Some(target_pos) => {
                    let to_target = target_pos - self.position;
                    let step = speed * dt;
                    if to_target.length() <= step {
                        self.position = target_pos;
                        self.arrive(target, grid, settings, events);
                    } else {
                        self.position += to_target.normalize() * step;
                    }
                }
                None => {
                    log::warn!("Queued tile {:?} is no longer live, dropping it", target);
                    self.queue.pop_front();
                }
            }
        }

        self.auto_move(grid, settings, dt, events);
        self.rebuild_clickable(grid);
        self.sync_ghosts(grid);
    }

    fn arrive(
        &mut self,
        target: TileId,
        grid: &Grid,
        settings: &Settings,
        events: &mut Vec<GameEvent>,
    ) {
        self.history.push(target);

        if target.line > self.progress {
            let gained = target.line - self.progress;
            let points = if settings.points_per_line {
                u64::from(gained)
            } else {
                0
            };
            self.score += points;
            self.progress = target.line;
            events.push(GameEvent::LineReached {
                line: target.line,
                points,
            });
        }

        if self.auto_move_target == Some(target) {
            self.auto_move_target = None;
            self.auto_move_timer = settings.auto_move_delay_at(self.progress);
        }

        events.push(GameEvent::TileEntered(target));
        self.queue.pop_front();
        if !self.queue.is_empty() {
            events.push(GameEvent::TileLeft(target));
        }
        self.project_onto_nearest(grid);
    }

    /// Edge-triggered forced forward move
    fn auto_move(
        &mut self,
        grid: &Grid,
        settings: &Settings,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        if !settings.auto_move {
            return;
        }
        let before = self.auto_move_timer;
        self.auto_move_timer -= dt;
        let crossed = before >= 0.0 && self.auto_move_timer < 0.0;
        if !crossed || self.auto_move_target.is_some() {
            return;
        }

        // Only the move already under way survives
        self.queue.truncate(1);
        match self.move_direction(settings.forward, true, grid, events) {
            Some(target) => {
                log::debug!("Auto move toward {:?}", target);
                self.auto_move_target = Some(target);
                events.push(GameEvent::AutoMoveTriggered(target));
            }
            None => {
                // Nothing ahead yet; fire again on the next tick
                self.auto_move_timer = 0.0;
            }
        }
    }

    fn rebuild_clickable(&mut self, grid: &Grid) {
        self.clickable.clear();
        if self.capacity.input_blocked(self.queue.len()) {
            return;
        }
        let Some(root) = self.root_tile().and_then(|id| grid.tile(id)) else {
            return;
        };
        for dir in Direction::ALL {
            if !self.permissions.allows(dir) {
                continue;
            }
            if let Some(neighbor) = root.neighbor(dir) {
                self.clickable.push(dir, neighbor);
            }
        }
    }

    /// Move onto whichever copy of the player is nearest the queue head
    ///
    /// Copies are offset by the width of the target's own row.
    fn project_onto_nearest(&mut self, grid: &Grid) {
        if !grid.wraps() {
            return;
        }
        let Some(&head) = self.queue.front() else {
            return;
        };
        let (Some(target), Some(lane_width)) = (grid.position(head), grid.lane_width(head.line))
        else {
            return;
        };
        self.projector.lane_width = lane_width;
        self.position = self.projector.nearest(self.position, target);
    }

    /// Place the ghosts around the player, spaced by its current row
    fn sync_ghosts(&mut self, grid: &Grid) {
        if let Some(lane_width) = self
            .history
            .last()
            .and_then(|t| grid.lane_width(t.line))
        {
            self.projector.lane_width = lane_width;
        }
        self.projector.sync(self.position);
    }
}
