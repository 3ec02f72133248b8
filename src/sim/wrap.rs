//! Phantom copies of the player for horizontal wraparound
//!
//! Two ghosts trail the player one lane width to the left and right. When a
//! new target is taken, the player is relocated onto whichever copy is
//! closest to it, so crossing the seam of a wrapped row is a short straight
//! move instead of a trip across the whole lane.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WraparoundProjector {
    /// Horizontal distance between the player and each ghost
    pub lane_width: f32,
    /// Left and right ghost positions
    ghosts: [Vec2; 2],
}

impl WraparoundProjector {
    pub fn new(lane_width: f32) -> Self {
        Self {
            lane_width,
            ghosts: [Vec2::ZERO; 2],
        }
    }

    /// Move both ghosts along with the player
    pub fn sync(&mut self, position: Vec2) {
        self.ghosts = self.copies_of(position);
    }

    pub fn ghosts(&self) -> [Vec2; 2] {
        self.ghosts
    }

    fn copies_of(&self, position: Vec2) -> [Vec2; 2] {
        let offset = Vec2::new(self.lane_width, 0.0);
        [position - offset, position + offset]
    }

    /// Copy of `position` (itself or a ghost) nearest to `target`
    ///
    /// The real position wins ties.
    pub fn nearest(&self, position: Vec2, target: Vec2) -> Vec2 {
        let mut best = position;
        let mut best_dist = position.distance(target);
        for ghost in self.copies_of(position) {
            let dist = ghost.distance(target);
            if dist < best_dist {
                best_dist = dist;
                best = ghost;
            }
        }
        best
    }
}
