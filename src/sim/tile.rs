//! Tile graph nodes and tile specifications
//!
//! Tiles live inside their line's arena. Every cross-reference (neighbor
//! links, the owning line) is a plain [`TileId`] handle resolved through
//! the grid, so pruning a line never leaves a dangling pointer behind.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use crate::consts::DEFAULT_TILE;

/// Handle to a tile: owning line sequence number plus column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId {
    pub line: u32,
    pub column: usize,
}

impl TileId {
    pub const fn new(line: u32, column: usize) -> Self {
        Self { line, column }
    }
}

/// One column entry of a line specification, e.g. `"TileSpike+slow+glow"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSpec {
    pub type_name: String,
    /// Free-form modifier tokens following the type name
    #[serde(default)]
    pub modifiers: Vec<String>,
}

impl TileSpec {
    /// Parse `name+mod+mod`; empty modifier tokens are dropped
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split('+');
        let type_name = parts.next().unwrap_or_default().trim().to_string();
        let modifiers = parts
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            type_name,
            modifiers,
        }
    }
}

/// Payload carried by a tile, queryable by collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileAttributes {
    pub type_name: String,
    pub modifiers: Vec<String>,
}

impl TileAttributes {
    pub fn has_modifier(&self, name: &str) -> bool {
        self.modifiers.iter().any(|m| m == name)
    }
}

/// Known tile type names plus the fallback for unrecognized specs
#[derive(Debug, Clone)]
pub struct TileCatalog {
    known: Vec<String>,
    default_type: String,
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self::new(vec![DEFAULT_TILE.to_string()], DEFAULT_TILE)
    }
}

impl TileCatalog {
    pub fn new(known: Vec<String>, default_type: &str) -> Self {
        let mut known = known;
        if !known.iter().any(|k| k == default_type) {
            known.push(default_type.to_string());
        }
        Self {
            known,
            default_type: default_type.to_string(),
        }
    }

    pub fn default_type(&self) -> &str {
        &self.default_type
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.known.iter().any(|k| k == type_name)
    }

    /// Attributes for a default (unstructured) tile
    pub fn default_attributes(&self) -> TileAttributes {
        TileAttributes {
            type_name: self.default_type.clone(),
            modifiers: Vec::new(),
        }
    }

    /// Resolve a spec into tile attributes
    ///
    /// Unknown type names are a content error: they are logged and replaced
    /// by the default type, keeping the modifiers. The `Err` side carries the
    /// rejected name so the caller can report it.
    pub fn resolve(&self, spec: &TileSpec) -> Result<TileAttributes, (TileAttributes, String)> {
        if self.contains(&spec.type_name) {
            Ok(TileAttributes {
                type_name: spec.type_name.clone(),
                modifiers: spec.modifiers.clone(),
            })
        } else {
            log::error!("Wrong tile type: {}", spec.type_name);
            Err((
                TileAttributes {
                    type_name: self.default_type.clone(),
                    modifiers: spec.modifiers.clone(),
                },
                spec.type_name.clone(),
            ))
        }
    }
}

/// A graph node with 8 directional neighbor slots
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    pub neighbors: [Option<TileId>; Direction::COUNT],
    pub attributes: TileAttributes,
    /// World position of the tile center
    pub position: Vec2,
}

impl Tile {
    pub fn new(id: TileId, attributes: TileAttributes, position: Vec2) -> Self {
        Self {
            id,
            neighbors: [None; Direction::COUNT],
            attributes,
            position,
        }
    }

    /// Sequence number of the owning line
    #[inline]
    pub fn line(&self) -> u32 {
        self.id.line
    }

    #[inline]
    pub fn column(&self) -> usize {
        self.id.column
    }

    #[inline]
    pub fn neighbor(&self, dir: Direction) -> Option<TileId> {
        self.neighbors[dir.index()]
    }

    #[inline]
    pub fn set_neighbor(&mut self, dir: Direction, tile: Option<TileId>) {
        self.neighbors[dir.index()] = tile;
    }

    /// First slot under which `other` is linked
    pub fn direction_to(&self, other: TileId) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|dir| self.neighbors[dir.index()] == Some(other))
    }
}
