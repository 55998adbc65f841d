//! Gravity: one-row fall steps, spawn-row refills and the fall countdown.

use crate::grid::{Grid, Pos, Tile};
use rand::Rng;

/// Combo count at which a fall step takes no time at all.
pub const FAST_FALL_COMBO: u32 = 9;

/// Countdown for the current fall step, driven by the simulation's tick delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallTimer {
    duration: f32,
    remaining: f32,
}

impl FallTimer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: duration,
        }
    }

    /// A timer that expires on the next advance.
    pub fn expired() -> Self {
        Self::new(0.0)
    }

    pub fn set(&mut self, duration: f32) {
        *self = Self::new(duration);
    }

    pub fn advance(&mut self, dt: f32) {
        self.remaining -= dt;
    }

    /// Countdown reached zero.
    #[inline]
    pub fn elapsed(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Still counting down.
    #[inline]
    pub fn active(&self) -> bool {
        !self.elapsed()
    }

    /// Fraction of the step already elapsed, 0..=1.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining / self.duration).clamp(0.0, 1.0)
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

/// Cells whose tile arrived during the latest fall step (visible rows only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallMask {
    width: usize,
    fell: Vec<bool>,
}

impl FallMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            fell: vec![false; width * height],
        }
    }

    pub fn clear(&mut self) {
        self.fell.fill(false);
    }

    #[inline]
    pub fn fell(&self, pos: Pos) -> bool {
        pos.x < self.width && self.fell.get(pos.y * self.width + pos.x).copied().unwrap_or(false)
    }

    fn mark(&mut self, x: usize, y: usize) {
        self.fell[y * self.width + x] = true;
    }

    pub fn any(&self) -> bool {
        self.fell.iter().any(|&f| f)
    }
}

/// Step duration for the current combo: full `base` with no combo, shrinking linearly
/// to zero at `FAST_FALL_COMBO`.
pub fn fall_duration(base: f32, combo: u32) -> f32 {
    let p = (combo as f32 / FAST_FALL_COMBO as f32).clamp(0.0, 1.0);
    base * (1.0 - p)
}

/// Refill every column of the spawn row with a random tile kind in `0..tile_types`.
pub fn spawn_row<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, tile_types: u8) {
    let y = grid.spawn_row();
    for x in 0..grid.width() {
        grid.put(x, y, Tile::Kind(rng.random_range(0..tile_types)));
    }
}

/// One fall step: every tile with an empty cell directly below drops one row.
/// Scanning bottom-up moves a whole stack above a gap together, but never more than
/// one row per call, so multi-row gaps close over several steps.
/// Returns true if anything moved.
pub fn fall_step(grid: &mut Grid, mask: &mut FallMask) -> bool {
    mask.clear();
    let mut moved = false;
    for x in (0..grid.width()).rev() {
        for y in 0..grid.height() {
            let above = grid.at(x, y + 1);
            if grid.at(x, y).is_empty() && !above.is_empty() {
                grid.put(x, y, above);
                grid.put(x, y + 1, Tile::Empty);
                mask.mark(x, y);
                moved = true;
            }
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const A: Tile = Tile::Kind(0);
    const B: Tile = Tile::Kind(1);
    const C: Tile = Tile::Kind(2);
    const E: Tile = Tile::Empty;

    fn column(grid: &Grid, x: usize) -> Vec<Tile> {
        (0..grid.height()).map(|y| grid.at(x, y)).collect()
    }

    #[test]
    fn test_single_step_moves_one_row() {
        let mut grid = Grid::from_rows(&[&[A], &[E], &[E]]).unwrap();
        let mut mask = FallMask::new(1, 3);
        assert!(fall_step(&mut grid, &mut mask));
        assert_eq!(column(&grid, 0), vec![E, A, E]);
        assert!(mask.fell(Pos::new(0, 1)));
        assert!(!mask.fell(Pos::new(0, 0)));
    }

    #[test]
    fn test_stack_above_gap_moves_together() {
        let mut grid = Grid::from_rows(&[&[A], &[B], &[E], &[C]]).unwrap();
        let mut mask = FallMask::new(1, 4);
        assert!(fall_step(&mut grid, &mut mask));
        assert_eq!(column(&grid, 0), vec![C, B, A, E]);
    }

    #[test]
    fn test_settled_board_does_not_move() {
        let mut grid = Grid::from_rows(&[&[E, E], &[A, B]]).unwrap();
        let mut mask = FallMask::new(2, 2);
        assert!(!fall_step(&mut grid, &mut mask));
        assert!(!mask.any());
    }

    #[test]
    fn test_gravity_converges_to_compacted_column() {
        let patterns: [&[Tile]; 4] = [
            &[A, E, B, E, E, C],
            &[E, E, E, A, B, C],
            &[A, E, E, E, E, E],
            &[E, A, E, B, E, C],
        ];
        for pattern in patterns {
            let rows: Vec<&[Tile]> = pattern.chunks(1).collect();
            let mut grid = Grid::from_rows(&rows).unwrap();
            let tiles: Vec<Tile> = column(&grid, 0).into_iter().filter(|t| !t.is_empty()).collect();
            let mut mask = FallMask::new(1, grid.height());
            let mut steps = 0;
            while fall_step(&mut grid, &mut mask) {
                steps += 1;
                assert!(steps <= grid.height(), "gravity did not settle");
            }
            let col = column(&grid, 0);
            let (filled, empty) = col.split_at(tiles.len());
            assert_eq!(filled, &tiles[..]);
            assert!(empty.iter().all(|t| t.is_empty()));
        }
    }

    #[test]
    fn test_spawn_row_feeds_top_visible_row() {
        let mut grid = Grid::new(3, 2);
        let mut rng = SmallRng::seed_from_u64(7);
        spawn_row(&mut grid, &mut rng, 4);
        for x in 0..3 {
            let t = grid.get(Pos::new(x, 2)).unwrap();
            assert!(matches!(t, Tile::Kind(k) if k < 4));
        }
        let mut mask = FallMask::new(3, 2);
        assert!(fall_step(&mut grid, &mut mask));
        assert!((0..3).all(|x| grid.at(x, 2).is_empty()));
        assert!((0..3).all(|x| !grid.at(x, 1).is_empty()));
    }

    #[test]
    fn test_fall_duration_shrinks_with_combo() {
        assert_eq!(fall_duration(0.2, 0), 0.2);
        assert!(fall_duration(0.2, 3) < fall_duration(0.2, 1));
        assert_eq!(fall_duration(0.2, 9), 0.0);
        assert_eq!(fall_duration(0.2, 40), 0.0);
    }

    #[test]
    fn test_timer_lifecycle() {
        let mut timer = FallTimer::new(0.2);
        assert!(timer.active());
        timer.advance(0.1);
        assert!(timer.active());
        assert!((timer.progress() - 0.5).abs() < 1e-6);
        timer.advance(0.15);
        assert!(timer.elapsed());
        assert_eq!(timer.progress(), 1.0);

        let zero = FallTimer::expired();
        assert!(zero.elapsed());
        assert_eq!(zero.progress(), 1.0);
    }
}
