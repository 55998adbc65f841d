//! Match detection and batched removal.
//!
//! Detection is a pure scan of the visible rows and columns; removal is applied
//! afterwards in one batch so crossing runs (L, T, plus shapes) share their corner
//! cell instead of one pass clearing it before the other sees it.

use crate::grid::{Grid, Pos, Tile};
use crate::score::ComboState;
use std::collections::BTreeSet;

/// Shortest run that gets removed.
pub const MIN_RUN: usize = 3;

/// A tile taken off the board by a removal batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedTile {
    pub pos: Pos,
    pub kind: u8,
}

/// Result of a nonzero removal batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub tiles: Vec<RemovedTile>,
    /// Combo count after this batch was counted.
    pub combo_after: u32,
    pub points: u32,
}

/// Running `(value, length)` along one line. Empty cells never extend a run.
#[derive(Default)]
struct Run {
    value: Option<u8>,
    len: usize,
}

impl Run {
    /// Feed the next tile; returns how many trailing cells became part of a qualifying run.
    fn push(&mut self, tile: Tile) -> usize {
        match tile.kind() {
            Some(k) if self.value == Some(k) => {
                self.len += 1;
                match self.len {
                    MIN_RUN => MIN_RUN,
                    n if n > MIN_RUN => 1,
                    _ => 0,
                }
            }
            kind => {
                self.value = kind;
                self.len = 1;
                0
            }
        }
    }
}

/// All visible cells that belong to a horizontal or vertical run of `MIN_RUN` or more.
pub fn detect_matches(grid: &Grid) -> BTreeSet<Pos> {
    let (w, h) = (grid.width(), grid.height());
    let mut marked = BTreeSet::new();

    for y in 0..h {
        let mut run = Run::default();
        for x in 0..w {
            let n = run.push(grid.at(x, y));
            marked.extend((0..n).map(|j| Pos::new(x - j, y)));
        }
    }

    for x in 0..w {
        let mut run = Run::default();
        for y in 0..h {
            let n = run.push(grid.at(x, y));
            marked.extend((0..n).map(|j| Pos::new(x, y - j)));
        }
    }

    marked
}

/// Clear every marked cell at once, reporting what was there.
pub fn remove_matches(grid: &mut Grid, marked: &BTreeSet<Pos>) -> Vec<RemovedTile> {
    let mut removed = Vec::with_capacity(marked.len());
    for &pos in marked {
        if let Some(kind) = grid.at(pos.x, pos.y).kind() {
            removed.push(RemovedTile { pos, kind });
        }
        grid.put(pos.x, pos.y, Tile::Empty);
    }
    removed
}

/// Detect, remove and score one batch. Returns None (and ends the combo) when nothing matched.
pub fn clear_matches(grid: &mut Grid, combo: &mut ComboState) -> Option<Removal> {
    let marked = detect_matches(grid);
    if marked.is_empty() {
        combo.reset();
        return None;
    }
    let tiles = remove_matches(grid, &marked);
    let points = combo.record_batch(tiles.len());
    Some(Removal {
        tiles,
        combo_after: combo.combo,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Tile = Tile::Kind(0);
    const B: Tile = Tile::Kind(1);
    const C: Tile = Tile::Kind(2);
    const D: Tile = Tile::Kind(3);
    const E: Tile = Tile::Empty;

    fn set(positions: &[(usize, usize)]) -> BTreeSet<Pos> {
        positions.iter().map(|&p| Pos::from(p)).collect()
    }

    #[test]
    fn test_row_of_three_detected() {
        let grid = Grid::from_rows(&[&[B, C, D, B], &[A, A, A, B]]).unwrap();
        assert_eq!(detect_matches(&grid), set(&[(0, 0), (1, 0), (2, 0)]));
    }

    #[test]
    fn test_pair_is_not_a_match() {
        let grid = Grid::from_rows(&[&[A, A, B, C]]).unwrap();
        assert!(detect_matches(&grid).is_empty());
    }

    #[test]
    fn test_empty_breaks_run() {
        let grid = Grid::from_rows(&[&[A, A, E, A, A]]).unwrap();
        assert!(detect_matches(&grid).is_empty());
    }

    #[test]
    fn test_empty_cells_never_match_each_other() {
        let grid = Grid::from_rows(&[&[E, E, E, E]]).unwrap();
        assert!(detect_matches(&grid).is_empty());
    }

    #[test]
    fn test_long_row_fully_marked() {
        let grid = Grid::from_rows(&[&[B, A, A, A, A, A, C]]).unwrap();
        assert_eq!(
            detect_matches(&grid),
            set(&[(1, 0), (2, 0), (3, 0), (4, 0), (5, 0)])
        );
    }

    #[test]
    fn test_long_column_fully_marked() {
        let grid = Grid::from_rows(&[&[B], &[A], &[A], &[A], &[A], &[A], &[C]]).unwrap();
        assert_eq!(
            detect_matches(&grid),
            set(&[(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)])
        );
    }

    #[test]
    fn test_l_shape_removes_five_distinct_cells() {
        let mut grid = Grid::from_rows(&[
            &[A, B, C, D],
            &[A, C, D, B],
            &[A, A, A, C],
        ])
        .unwrap();
        let marked = detect_matches(&grid);
        assert_eq!(marked, set(&[(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)]));

        let mut combo = ComboState::new();
        let removal = clear_matches(&mut grid, &mut combo).unwrap();
        assert_eq!(removal.tiles.len(), 5);
        assert_eq!(removal.points, 5);
        assert_eq!(grid.count_empty(), 5);
    }

    #[test]
    fn test_plus_shape_shares_center() {
        let grid = Grid::from_rows(&[
            &[B, A, C],
            &[A, A, A],
            &[C, A, B],
        ])
        .unwrap();
        assert_eq!(detect_matches(&grid).len(), 5);
    }

    #[test]
    fn test_removal_reports_kinds() {
        let mut grid = Grid::from_rows(&[&[C, C, C, A]]).unwrap();
        let marked = detect_matches(&grid);
        let removed = remove_matches(&mut grid, &marked);
        assert!(removed.iter().all(|r| r.kind == 2));
        assert_eq!(grid.get(Pos::new(3, 0)).unwrap(), A);
        assert_eq!(grid.get(Pos::new(0, 0)).unwrap(), E);
    }

    #[test]
    fn test_no_match_resets_combo_without_touching_grid() {
        let mut grid = Grid::from_rows(&[&[A, B, A, B]]).unwrap();
        let before = grid.clone();
        let mut combo = ComboState { combo: 4, score: 30 };
        assert!(clear_matches(&mut grid, &mut combo).is_none());
        assert_eq!(combo.combo, 0);
        assert_eq!(combo.score, 30);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_spawn_row_is_not_scanned() {
        let mut grid = Grid::new(3, 1);
        for x in 0..3 {
            grid.set(Pos::new(x, 1), A).unwrap();
        }
        assert!(detect_matches(&grid).is_empty());
    }
}
