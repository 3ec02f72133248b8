//! A horizontal row of tiles and its neighbor linking rules

use glam::Vec2;

use super::direction::Direction;
use super::tile::{Tile, TileAttributes, TileId};

/// One row of the grid; owns the arena of its tiles
#[derive(Debug, Clone)]
pub struct Line {
    /// Monotonic creation counter, never reused
    pub sequence_number: u32,
    /// Vertical placement of the row
    pub world_y: f32,
    /// Sequence number of the line immediately below
    pub previous_line: Option<u32>,
    tiles: Vec<Tile>,
}

impl Line {
    /// Create an empty row; tiles are added with [`Line::populate`]
    pub fn new(sequence_number: u32, world_y: f32, previous_line: Option<u32>) -> Self {
        Self {
            sequence_number,
            world_y,
            previous_line,
            tiles: Vec::new(),
        }
    }

    /// Fill the row with one tile per attribute entry, centered on x = 0
    ///
    /// Tiles already present (placeholders of a pre-allocated row) keep their
    /// attributes for their columns; only missing columns take the supplied
    /// entry. Extra placeholders beyond the requested width are dropped.
    pub fn populate(&mut self, attributes: Vec<TileAttributes>, space_size: f32) {
        let width = attributes.len();
        self.tiles.truncate(width);
        for (column, attrs) in attributes.into_iter().enumerate() {
            let id = TileId::new(self.sequence_number, column);
            let position = Vec2::new(column_x(column, width, space_size), self.world_y);
            match self.tiles.get_mut(column) {
                Some(existing) => {
                    existing.id = id;
                    existing.position = position;
                    existing.neighbors = [None; Direction::COUNT];
                }
                None => self.tiles.push(Tile::new(id, attrs, position)),
            }
        }
    }

    /// Seed unlinked placeholder tiles (pre-allocated row)
    pub fn with_placeholders(mut self, placeholders: Vec<TileAttributes>) -> Self {
        self.tiles = placeholders
            .into_iter()
            .enumerate()
            .map(|(column, attrs)| {
                Tile::new(TileId::new(self.sequence_number, column), attrs, Vec2::ZERO)
            })
            .collect();
        self
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, column: usize) -> Option<&Tile> {
        self.tiles.get(column)
    }

    pub fn tile_mut(&mut self, column: usize) -> Option<&mut Tile> {
        self.tiles.get_mut(column)
    }

    fn id(&self, column: usize) -> TileId {
        TileId::new(self.sequence_number, column)
    }

    /// Establish neighbor links inside this row and toward `previous`
    ///
    /// Widths of the two rows may differ: vertical and diagonal links are
    /// only made when the column exists in the previous row, or through the
    /// wraparound substitute at an edge column. Every link is written on both
    /// ends.
    ///
    /// With wraparound, column 0 takes the previous row's last column as its
    /// south-west neighbor only when this row is not wider than the previous
    /// one. A wider row already links that last column as the south-west of
    /// column `prev_width`, and a tile's north-east slot holds one link. The
    /// last column takes the previous row's column 0 as its south-east
    /// neighbor when no regular south-east exists.
    pub fn link(&mut self, previous: Option<&mut Line>, wrap: bool) {
        let width = self.tiles.len();

        if let Some(prev) = previous {
            let prev_width = prev.tiles.len();
            for column in 0..width {
                let here = self.id(column);

                if column < prev_width {
                    let below = prev.id(column);
                    prev.tiles[column].set_neighbor(Direction::North, Some(here));
                    self.tiles[column].set_neighbor(Direction::South, Some(below));
                }

                // South-west: previous row one column to the left
                let south_west = if column > 0 {
                    (column - 1 < prev_width).then(|| column - 1)
                } else if wrap && prev_width > 0 && width <= prev_width {
                    // A wider row already links prev[last].NE from column prev_width
                    Some(prev_width - 1)
                } else {
                    None
                };
                if let Some(target) = south_west {
                    prev.tiles[target].set_neighbor(Direction::NorthEast, Some(here));
                    self.tiles[column].set_neighbor(Direction::SouthWest, Some(prev.id(target)));
                }

                // South-east: previous row one column to the right
                let south_east = if column + 1 < prev_width {
                    Some(column + 1)
                } else if wrap && prev_width > 0 && column + 1 == width {
                    Some(0)
                } else {
                    None
                };
                if let Some(target) = south_east {
                    prev.tiles[target].set_neighbor(Direction::NorthWest, Some(here));
                    self.tiles[column].set_neighbor(Direction::SouthEast, Some(prev.id(target)));
                }
            }
        }

        for column in 1..width {
            let (left, right) = (self.id(column - 1), self.id(column));
            self.tiles[column - 1].set_neighbor(Direction::East, Some(right));
            self.tiles[column].set_neighbor(Direction::West, Some(left));
        }
        if wrap && width > 0 {
            let (first, last) = (self.id(0), self.id(width - 1));
            self.tiles[width - 1].set_neighbor(Direction::East, Some(first));
            self.tiles[0].set_neighbor(Direction::West, Some(last));
        }
    }

    /// Drop every link pointing into the line below (it is being pruned)
    pub fn unlink_below(&mut self) {
        for tile in &mut self.tiles {
            tile.set_neighbor(Direction::South, None);
            tile.set_neighbor(Direction::SouthWest, None);
            tile.set_neighbor(Direction::SouthEast, None);
        }
        self.previous_line = None;
    }
}

/// X coordinate of a column in a row of `width` tiles centered on 0
#[inline]
pub fn column_x(column: usize, width: usize, space_size: f32) -> f32 {
    space_size * (column as f32 - (width as f32 - 1.0) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::TileCatalog;

    fn row(seq: u32, width: usize, prev: Option<u32>) -> Line {
        let catalog = TileCatalog::default();
        let mut line = Line::new(seq, seq as f32, prev);
        line.populate(vec![catalog.default_attributes(); width], 1.0);
        line
    }

    fn linked_pair(prev_width: usize, width: usize, wrap: bool) -> (Line, Line) {
        let mut below = row(1, prev_width, None);
        below.link(None, wrap);
        let mut above = row(2, width, Some(1));
        above.link(Some(&mut below), wrap);
        (below, above)
    }

    fn neighbor(line: &Line, column: usize, dir: Direction) -> Option<TileId> {
        line.tile(column).and_then(|t| t.neighbor(dir))
    }

    #[test]
    fn test_positions_centered() {
        let line = row(3, 3, None);
        let xs: Vec<f32> = line.tiles().iter().map(|t| t.position.x).collect();
        assert_eq!(xs, vec![-1.0, 0.0, 1.0]);
        assert!(line.tiles().iter().all(|t| t.position.y == 3.0));
    }

    #[test]
    fn test_first_line_has_no_vertical_links() {
        let mut line = row(1, 3, None);
        line.link(None, true);
        for tile in line.tiles() {
            for dir in [
                Direction::North,
                Direction::South,
                Direction::NorthEast,
                Direction::NorthWest,
                Direction::SouthEast,
                Direction::SouthWest,
            ] {
                assert_eq!(tile.neighbor(dir), None);
            }
        }
    }

    #[test]
    fn test_equal_width_links() {
        let (below, above) = linked_pair(3, 3, false);
        assert_eq!(neighbor(&below, 1, Direction::North), Some(TileId::new(2, 1)));
        assert_eq!(neighbor(&above, 1, Direction::South), Some(TileId::new(1, 1)));
        assert_eq!(neighbor(&above, 1, Direction::SouthWest), Some(TileId::new(1, 0)));
        assert_eq!(neighbor(&above, 1, Direction::SouthEast), Some(TileId::new(1, 2)));
        assert_eq!(neighbor(&below, 0, Direction::NorthEast), Some(TileId::new(2, 1)));
        assert_eq!(neighbor(&below, 2, Direction::NorthWest), Some(TileId::new(2, 1)));
        // Edges without wraparound
        assert_eq!(neighbor(&above, 0, Direction::SouthWest), None);
        assert_eq!(neighbor(&above, 2, Direction::SouthEast), None);
        assert_eq!(neighbor(&above, 0, Direction::West), None);
        assert_eq!(neighbor(&above, 2, Direction::East), None);
    }

    #[test]
    fn test_wraparound_closes_ring_and_diagonals() {
        let (below, above) = linked_pair(4, 4, true);
        assert_eq!(neighbor(&above, 0, Direction::West), Some(TileId::new(2, 3)));
        assert_eq!(neighbor(&above, 3, Direction::East), Some(TileId::new(2, 0)));
        assert_eq!(neighbor(&above, 0, Direction::SouthWest), Some(TileId::new(1, 3)));
        assert_eq!(neighbor(&below, 3, Direction::NorthEast), Some(TileId::new(2, 0)));
        assert_eq!(neighbor(&above, 3, Direction::SouthEast), Some(TileId::new(1, 0)));
        assert_eq!(neighbor(&below, 0, Direction::NorthWest), Some(TileId::new(2, 3)));
    }

    #[test]
    fn test_wider_line_edge_fallback() {
        // Width 5 above width 3: column 4 is past the previous row
        let (_, above) = linked_pair(3, 5, false);
        assert_eq!(neighbor(&above, 4, Direction::SouthEast), None);
        assert_eq!(neighbor(&above, 4, Direction::South), None);
        assert_eq!(neighbor(&above, 3, Direction::SouthWest), Some(TileId::new(1, 2)));

        let (below, above) = linked_pair(3, 5, true);
        assert_eq!(neighbor(&above, 4, Direction::SouthEast), Some(TileId::new(1, 0)));
        assert_eq!(neighbor(&below, 0, Direction::NorthWest), Some(TileId::new(2, 4)));
        // Non-edge column past the previous row gets no wrap substitute
        assert_eq!(neighbor(&above, 3, Direction::SouthEast), None);
        // The previous row's last column is already taken by column 3
        assert_eq!(neighbor(&above, 0, Direction::SouthWest), None);
        assert_eq!(neighbor(&below, 2, Direction::NorthEast), Some(TileId::new(2, 3)));
    }

    #[test]
    fn test_narrower_line_uses_in_range_diagonals() {
        let (below, above) = linked_pair(5, 3, true);
        assert_eq!(neighbor(&above, 2, Direction::SouthEast), Some(TileId::new(1, 3)));
        assert_eq!(neighbor(&above, 0, Direction::SouthWest), Some(TileId::new(1, 4)));
        assert_eq!(neighbor(&below, 4, Direction::North), None);
        assert_eq!(neighbor(&below, 4, Direction::NorthEast), Some(TileId::new(2, 0)));
    }

    #[test]
    fn test_width_one_ring_links_to_itself() {
        let (below, above) = linked_pair(1, 1, true);
        let me = TileId::new(2, 0);
        assert_eq!(neighbor(&above, 0, Direction::East), Some(me));
        assert_eq!(neighbor(&above, 0, Direction::West), Some(me));
        assert_eq!(neighbor(&above, 0, Direction::SouthWest), Some(TileId::new(1, 0)));
        assert_eq!(neighbor(&above, 0, Direction::SouthEast), Some(TileId::new(1, 0)));
        assert_eq!(neighbor(&below, 0, Direction::NorthEast), Some(me));
        assert_eq!(neighbor(&below, 0, Direction::NorthWest), Some(me));
    }

    #[test]
    fn test_populate_keeps_placeholders() {
        let catalog = TileCatalog::new(vec!["TileSpike".into()], "TileDefault");
        let spike = TileAttributes {
            type_name: "TileSpike".into(),
            modifiers: vec![],
        };
        let mut line = Line::new(1, 0.0, None).with_placeholders(vec![spike]);
        line.populate(vec![catalog.default_attributes(); 3], 1.0);
        assert_eq!(line.width(), 3);
        assert_eq!(line.tile(0).unwrap().attributes.type_name, "TileSpike");
        assert_eq!(line.tile(1).unwrap().attributes.type_name, "TileDefault");
        assert_eq!(line.tile(0).unwrap().position.x, -1.0);
    }

    #[test]
    fn test_unlink_below() {
        let (_, mut above) = linked_pair(3, 3, true);
        above.unlink_below();
        assert!(above.tiles().iter().all(|t| t.neighbor(Direction::South).is_none()
            && t.neighbor(Direction::SouthWest).is_none()
            && t.neighbor(Direction::SouthEast).is_none()));
        assert_eq!(neighbor(&above, 0, Direction::East), Some(TileId::new(2, 1)));
        assert_eq!(above.previous_line, None);
    }
}
