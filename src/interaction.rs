//! Drag-to-swap gesture handling.

use crate::grid::{Grid, Pos};
use crate::matcher::{Removal, clear_matches};
use crate::score::ComboState;

/// Pointer state for one tick, already resolved by the front-end.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerInput {
    /// Position in grid units (`x` right, `y` up); None when the pointer is elsewhere.
    pub position: Option<(f32, f32)>,
    /// Button went down this tick.
    pub pressed: bool,
    /// Button is down.
    pub held: bool,
}

impl PointerInput {
    pub fn idle() -> Self {
        Self::default()
    }

    /// Pointer over the center of `pos`.
    pub fn over(pos: Pos, pressed: bool, held: bool) -> Self {
        Self {
            position: Some((pos.x as f32 + 0.5, pos.y as f32 + 0.5)),
            pressed,
            held,
        }
    }
}

/// What a completed swap attempt did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The swap produced a run; the batch has already been removed.
    Committed(Removal),
    /// No run formed and the tiles went back where they were.
    RolledBack,
}

/// Gesture state: nothing held, or a drag that started on a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Pos),
}

/// Exactly one axis differs, by exactly one. Diagonals and the cell itself are rejected.
pub fn is_orthogonal_neighbor(a: Pos, b: Pos) -> bool {
    (a.x.abs_diff(b.x) == 1) ^ (a.y.abs_diff(b.y) == 1)
}

#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn start_cell(&self) -> Option<Pos> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging(p) => Some(p),
        }
    }

    /// Advance the gesture by one tick. Returns the outcome when a swap was attempted.
    pub fn update(
        &mut self,
        grid: &mut Grid,
        combo: &mut ComboState,
        input: &PointerInput,
    ) -> Option<SwapOutcome> {
        let Some(cell) = input
            .position
            .and_then(|(fx, fy)| grid.cell_at_point(fx, fy))
        else {
            self.state = DragState::Idle;
            return None;
        };

        match self.state {
            DragState::Idle if input.pressed => {
                self.state = DragState::Dragging(cell);
                None
            }
            DragState::Dragging(start) if input.held => {
                if !is_orthogonal_neighbor(start, cell) {
                    return None;
                }
                let outcome = try_swap(grid, combo, start, cell)?;
                self.state = DragState::Idle;
                Some(outcome)
            }
            _ => {
                self.state = DragState::Idle;
                None
            }
        }
    }
}

/// Swap two visible, adjacent tiles and keep the swap only if it clears something.
/// Returns None without touching the board when either cell is empty.
fn try_swap(grid: &mut Grid, combo: &mut ComboState, a: Pos, b: Pos) -> Option<SwapOutcome> {
    let ta = grid.get(a).ok()?;
    let tb = grid.get(b).ok()?;
    if ta.is_empty() || tb.is_empty() {
        return None;
    }
    grid.put(a.x, a.y, tb);
    grid.put(b.x, b.y, ta);

    match clear_matches(grid, combo) {
        Some(removal) => Some(SwapOutcome::Committed(removal)),
        None => {
            grid.put(a.x, a.y, ta);
            grid.put(b.x, b.y, tb);
            Some(SwapOutcome::RolledBack)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;

    const A: Tile = Tile::Kind(0);
    const B: Tile = Tile::Kind(1);
    const C: Tile = Tile::Kind(2);
    const D: Tile = Tile::Kind(3);
    const E: Tile = Tile::Empty;

    fn drag(
        ctl: &mut DragController,
        grid: &mut Grid,
        combo: &mut ComboState,
        from: Pos,
        to: Pos,
    ) -> Option<SwapOutcome> {
        assert!(ctl.update(grid, combo, &PointerInput::over(from, true, true)).is_none());
        ctl.update(grid, combo, &PointerInput::over(to, false, true))
    }

    #[test]
    fn test_neighbor_rule() {
        let c = Pos::new(2, 2);
        assert!(is_orthogonal_neighbor(c, Pos::new(1, 2)));
        assert!(is_orthogonal_neighbor(c, Pos::new(2, 3)));
        assert!(!is_orthogonal_neighbor(c, Pos::new(3, 3)));
        assert!(!is_orthogonal_neighbor(c, Pos::new(1, 1)));
        assert!(!is_orthogonal_neighbor(c, c));
        assert!(!is_orthogonal_neighbor(c, Pos::new(4, 2)));
    }

    #[test]
    fn test_press_starts_drag() {
        let mut grid = Grid::from_rows(&[&[A, B]]).unwrap();
        let mut combo = ComboState::new();
        let mut ctl = DragController::new();
        ctl.update(&mut grid, &mut combo, &PointerInput::over(Pos::new(1, 0), true, true));
        assert_eq!(ctl.start_cell(), Some(Pos::new(1, 0)));
    }

    #[test]
    fn test_leaving_grid_cancels() {
        let mut grid = Grid::from_rows(&[&[A, B]]).unwrap();
        let mut combo = ComboState::new();
        let mut ctl = DragController::new();
        ctl.update(&mut grid, &mut combo, &PointerInput::over(Pos::new(0, 0), true, true));
        let outside = PointerInput {
            position: Some((5.0, 0.5)),
            pressed: false,
            held: true,
        };
        assert!(ctl.update(&mut grid, &mut combo, &outside).is_none());
        assert_eq!(ctl.state(), DragState::Idle);
    }

    #[test]
    fn test_release_abandons_drag() {
        let mut grid = Grid::from_rows(&[&[A, B]]).unwrap();
        let mut combo = ComboState::new();
        let mut ctl = DragController::new();
        ctl.update(&mut grid, &mut combo, &PointerInput::over(Pos::new(0, 0), true, true));
        ctl.update(&mut grid, &mut combo, &PointerInput::over(Pos::new(0, 0), false, false));
        assert_eq!(ctl.state(), DragState::Idle);
    }

    #[test]
    fn test_holding_on_start_or_diagonal_keeps_dragging() {
        let mut grid = Grid::from_rows(&[&[A, B], &[C, D]]).unwrap();
        let before = grid.clone();
        let mut combo = ComboState::new();
        let mut ctl = DragController::new();
        let start = Pos::new(0, 0);
        assert!(drag(&mut ctl, &mut grid, &mut combo, start, start).is_none());
        assert!(ctl.update(&mut grid, &mut combo, &PointerInput::over(Pos::new(1, 1), false, true)).is_none());
        assert_eq!(ctl.start_cell(), Some(start));
        assert_eq!(grid, before);
    }

    #[test]
    fn test_swap_with_empty_is_ignored() {
        let mut grid = Grid::from_rows(&[&[A, E]]).unwrap();
        let before = grid.clone();
        let mut combo = ComboState::new();
        let mut ctl = DragController::new();
        assert!(drag(&mut ctl, &mut grid, &mut combo, Pos::new(0, 0), Pos::new(1, 0)).is_none());
        assert_eq!(grid, before);
        assert_eq!(ctl.start_cell(), Some(Pos::new(0, 0)));
    }

    #[test]
    fn test_bad_swap_rolls_back_and_resets_combo() {
        let mut grid = Grid::from_rows(&[&[A, B, C, D], &[B, C, D, A]]).unwrap();
        let before = grid.clone();
        let mut combo = ComboState { combo: 3, score: 18 };
        let mut ctl = DragController::new();
        let outcome = drag(&mut ctl, &mut grid, &mut combo, Pos::new(0, 0), Pos::new(1, 0));
        assert_eq!(outcome, Some(SwapOutcome::RolledBack));
        assert_eq!(grid, before);
        assert_eq!(combo.combo, 0);
        assert_eq!(combo.score, 18);
        assert_eq!(ctl.state(), DragState::Idle);
    }

    #[test]
    fn test_good_swap_commits_and_clears() {
        // Moving the B at (2,1) down into (2,0) completes the bottom row of B.
        let mut grid = Grid::from_rows(&[&[C, D, B, A], &[B, B, A, C]]).unwrap();
        let mut combo = ComboState::new();
        let mut ctl = DragController::new();
        let outcome = drag(&mut ctl, &mut grid, &mut combo, Pos::new(2, 1), Pos::new(2, 0));
        let Some(SwapOutcome::Committed(removal)) = outcome else {
            panic!("expected a committed swap, got {outcome:?}");
        };
        assert_eq!(removal.tiles.len(), 3);
        assert_eq!(removal.combo_after, 1);
        assert_eq!(grid.get(Pos::new(2, 1)).unwrap(), A);
        for x in 0..3 {
            assert_eq!(grid.get(Pos::new(x, 0)).unwrap(), E);
        }
        assert_eq!(combo.score, 3);
    }

    #[test]
    fn test_one_swap_per_gesture() {
        let mut grid = Grid::from_rows(&[&[A, B, C, D], &[B, C, D, A]]).unwrap();
        let mut combo = ComboState::new();
        let mut ctl = DragController::new();
        drag(&mut ctl, &mut grid, &mut combo, Pos::new(0, 0), Pos::new(1, 0));
        let again = ctl.update(&mut grid, &mut combo, &PointerInput::over(Pos::new(2, 0), false, true));
        assert!(again.is_none());
        assert_eq!(ctl.state(), DragState::Idle);
    }
}
