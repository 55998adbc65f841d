//! Grid store: tiles, positions and the hidden spawn row.

use thiserror::Error;

/// Single cell: either empty or a tile of a given kind (palette index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Empty,
    Kind(u8),
}

impl Tile {
    #[inline]
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }

    /// Palette index, or None for an empty cell.
    #[inline]
    pub fn kind(self) -> Option<u8> {
        match self {
            Self::Empty => None,
            Self::Kind(k) => Some(k),
        }
    }
}

/// Cell coordinate. `y == 0` is the bottom row; `y` grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("row {row} has {len} tiles, expected {expected}")]
    RaggedRows { row: usize, len: usize, expected: usize },
}

/// Playfield of `width x height` visible tiles plus one spawn row at `y == height`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major, `height + 1` rows; `cells[y * width + x]`.
    cells: Vec<Tile>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Tile::Empty; width * (height + 1)],
        }
    }

    /// Build a grid from visible rows listed top row first, the way a board is drawn.
    /// The spawn row starts empty.
    pub fn from_rows(rows: &[&[Tile]]) -> Result<Self, GridError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.len());
        let mut grid = Self::new(width, height);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(GridError::RaggedRows {
                    row: i,
                    len: row.len(),
                    expected: width,
                });
            }
            let y = height - 1 - i;
            for (x, &tile) in row.iter().enumerate() {
                grid.cells[y * width + x] = tile;
            }
        }
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Visible rows (the spawn row is not counted).
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row index of the hidden spawn row.
    #[inline]
    pub fn spawn_row(&self) -> usize {
        self.height
    }

    fn check(&self, pos: Pos) -> Result<usize, GridError> {
        if pos.x < self.width && pos.y <= self.height {
            Ok(pos.y * self.width + pos.x)
        } else {
            Err(GridError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Tile at `pos`; the spawn row is addressable.
    pub fn get(&self, pos: Pos) -> Result<Tile, GridError> {
        self.check(pos).map(|i| self.cells[i])
    }

    pub fn set(&mut self, pos: Pos, tile: Tile) -> Result<(), GridError> {
        let i = self.check(pos)?;
        self.cells[i] = tile;
        Ok(())
    }

    /// Unchecked-by-contract access for loops that already stay in range.
    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize) -> Tile {
        self.cells[y * self.width + x]
    }

    #[inline]
    pub(crate) fn put(&mut self, x: usize, y: usize, tile: Tile) {
        self.cells[y * self.width + x] = tile;
    }

    /// True if `pos` is a visible cell.
    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Visible cell under a point in grid units, if any.
    pub fn cell_at_point(&self, fx: f32, fy: f32) -> Option<Pos> {
        if fx < 0.0 || fy < 0.0 {
            return None;
        }
        let pos = Pos::new(fx.floor() as usize, fy.floor() as usize);
        self.contains(pos).then_some(pos)
    }

    pub fn swap(&mut self, a: Pos, b: Pos) -> Result<(), GridError> {
        let ia = self.check(a)?;
        let ib = self.check(b)?;
        self.cells.swap(ia, ib);
        Ok(())
    }

    /// Visible rows, bottom row first.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.width.max(1)).take(self.height)
    }

    /// Copy of the visible tiles, `snapshot[y][x]`, bottom row first.
    pub fn snapshot(&self) -> Vec<Vec<Tile>> {
        self.rows().map(<[Tile]>::to_vec).collect()
    }

    pub fn count_empty(&self) -> usize {
        self.rows().flatten().filter(|t| t.is_empty()).count()
    }
}
