//! Compass directions for the 8-connected tile graph
//!
//! Enumeration order is stable and load-bearing: neighbor arrays, the
//! permission table and clickable-set iteration are all indexed by it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{heading_alignment, heading_to_vec};

/// One of the 8 neighbor slots of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// Number of neighbor slots
    pub const COUNT: usize = 8;

    /// All directions in enumeration order
    pub const ALL: [Direction; Self::COUNT] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];

    /// Slot index in neighbor arrays and the permission table
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Direction for a slot index
    ///
    /// # Panics
    /// Panics if `index >= 8`; both the neighbor array and the permission
    /// table are fixed-size, so an out-of-range slot is a programming error.
    pub fn from_index(index: usize) -> Self {
        match Self::ALL.get(index) {
            Some(dir) => *dir,
            None => panic!("direction index {index} out of range"),
        }
    }

    /// Fixed heading in degrees, clockwise from "up"
    pub fn angle(self) -> f32 {
        match self {
            Direction::North => 0.0,
            Direction::NorthEast => 45.0,
            Direction::East => 90.0,
            Direction::SouthEast => 135.0,
            Direction::South => 180.0,
            Direction::SouthWest => 225.0,
            Direction::West => 270.0,
            Direction::NorthWest => 315.0,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::NorthEast => Direction::SouthWest,
            Direction::SouthWest => Direction::NorthEast,
            Direction::NorthWest => Direction::SouthEast,
            Direction::SouthEast => Direction::NorthWest,
        }
    }

    /// Unit vector pointing along this direction
    pub fn unit(self) -> Vec2 {
        heading_to_vec(self.angle())
    }

    /// Dot product between this direction and a heading in degrees
    #[inline]
    pub fn alignment(self, heading: f32) -> f32 {
        heading_alignment(self.angle(), heading)
    }
}
