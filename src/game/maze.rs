//! Map grid loading and queries.
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use glam::Vec2;

use crate::error::{Error, Result};

/// Wall texture index as written in the map file.
pub type TextureId = u8;

/// (column, row), origin top-left.
pub type Cell = (i32, i32);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall(TextureId),
}

pub const DEFAULT_MAP: &str = "\
11111111111111111111111111111111
1..............................1
1..3333....222.................1
1......3.......2.......4.......1
1......3.......2.......4.......1
1..3333........2.......4.......1
1..............2...............1
1..............222....333......1
1...4.....................3....1
1...4.................5...3....1
1...4.....111.........5...3....1
1.........1..1........5........1
1....3....1..1........5...3333.1
1....3..........2..............1
1....3..........2..............1
11111111111111111111111111111111
";

#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Parses a text map: `.`, space or tab are floor, `1`-`9` are walls with
    /// that texture, `#` is a wall using texture 1. Short rows are padded with walls.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows: Vec<Vec<Tile>> = Vec::new();
        for (j, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for (i, ch) in line.chars().enumerate() {
                let tile = match ch {
                    '.' | ' ' | '\t' => Tile::Empty,
                    '#' => Tile::Wall(1),
                    '1'..='9' => Tile::Wall(ch as u8 - b'0'),
                    other => {
                        return Err(Error::Map(format!(
                            "unknown tile {other:?} at line {}, column {}",
                            j + 1,
                            i + 1
                        )));
                    }
                };
                row.push(tile);
            }
            rows.push(row);
        }

        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        if width == 0 {
            return Err(Error::Map("map is empty".into()));
        }
        let height = rows.len();
        let mut tiles = Vec::with_capacity(width * height);
        for mut r in rows {
            r.resize(width, Tile::Wall(1));
            tiles.extend(r);
        }

        let grid = Self { width, height, tiles };
        if !grid.is_enclosed() {
            log::warn!("map border is not fully walled; rays may escape the grid");
        }
        Ok(grid)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let grid = Self::parse(&text)?;
        log::info!("loaded {}x{} map from {}", grid.width, grid.height, path.display());
        Ok(grid)
    }

    pub fn default_map() -> Self {
        Self::parse(DEFAULT_MAP).expect("built-in map parses")
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, (i, j): Cell) -> bool {
        i >= 0 && j >= 0 && (i as usize) < self.width && (j as usize) < self.height
    }

    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        if !self.in_bounds(cell) {
            return None;
        }
        Some(self.tiles[cell.1 as usize * self.width + cell.0 as usize])
    }

    /// Out-of-bounds cells count as solid.
    #[inline]
    pub fn is_wall(&self, cell: Cell) -> bool {
        !matches!(self.tile(cell), Some(Tile::Empty))
    }

    #[inline]
    pub fn cell_of(pos: Vec2) -> Cell {
        (pos.x.floor() as i32, pos.y.floor() as i32)
    }

    #[inline]
    pub fn cell_center((i, j): Cell) -> Vec2 {
        Vec2::new(i as f32 + 0.5, j as f32 + 0.5)
    }

    pub fn is_wall_at(&self, pos: Vec2) -> bool {
        self.is_wall(Self::cell_of(pos))
    }

    /// True when an axis-aligned square of half extent `half` centred on `center`
    /// touches no wall cell. `half` must be below half a cell.
    pub fn box_is_free(&self, center: Vec2, half: f32) -> bool {
        let corners = [
            Vec2::new(center.x - half, center.y - half),
            Vec2::new(center.x + half, center.y - half),
            Vec2::new(center.x - half, center.y + half),
            Vec2::new(center.x + half, center.y + half),
        ];
        corners.iter().all(|&c| !self.is_wall_at(c))
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.tiles.iter().enumerate().filter_map(|(idx, t)| match t {
            Tile::Empty => Some(((idx % self.width) as i32, (idx / self.width) as i32)),
            Tile::Wall(_) => None,
        })
    }

    /// Every wall texture referenced by the map.
    pub fn texture_ids(&self) -> BTreeSet<TextureId> {
        self.tiles
            .iter()
            .filter_map(|t| match t {
                Tile::Wall(id) => Some(*id),
                Tile::Empty => None,
            })
            .collect()
    }

    fn is_enclosed(&self) -> bool {
        let (w, h) = (self.width as i32, self.height as i32);
        (0..w).all(|i| self.is_wall((i, 0)) && self.is_wall((i, h - 1)))
            && (0..h).all(|j| self.is_wall((0, j)) && self.is_wall((w - 1, j)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_pads_rows() {
        let g = Grid::parse("111\n1.\n111\n").unwrap();
        assert_eq!((g.width(), g.height()), (3, 3));
        assert_eq!(g.tile((1, 1)), Some(Tile::Empty));
        assert_eq!(g.tile((2, 1)), Some(Tile::Wall(1)));
    }

    #[test]
    fn rejects_unknown_tiles_and_empty_maps() {
        assert!(matches!(Grid::parse("1x1"), Err(Error::Map(_))));
        assert!(matches!(Grid::parse("\n\n"), Err(Error::Map(_))));
    }

    #[test]
    fn out_of_bounds_is_solid() {
        let g = Grid::parse("...\n...").unwrap();
        assert!(g.is_wall((-1, 0)));
        assert!(g.is_wall((0, 5)));
        assert!(!g.is_wall((2, 1)));
    }

    #[test]
    fn default_map_is_enclosed_and_uses_five_textures() {
        let g = Grid::default_map();
        assert!(g.is_enclosed());
        assert_eq!(g.texture_ids().into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn box_collision_touches_neighbours() {
        let g = Grid::parse("111\n1.1\n111").unwrap();
        assert!(g.box_is_free(Vec2::new(1.5, 1.5), 0.2));
        assert!(!g.box_is_free(Vec2::new(1.15, 1.5), 0.2));
    }
}
