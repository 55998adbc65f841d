//! Simulation: owns the board and interleaves falling, matching and player swaps.
//!
//! Each call to [`Simulation::tick`] is one atomic step. While a fall is in progress the
//! board only advances under gravity; once it settles a match pass runs, and only a
//! settled board with nothing to clear accepts a swap. Chains resolve on their own:
//! swap, clear, fall, clear, fall, ... until a match pass finds nothing.

use crate::config::{ConfigError, SimConfig};
use crate::gravity::{FallMask, FallTimer, fall_duration, fall_step, spawn_row};
use crate::grid::{Grid, GridError, Pos, Tile};
use crate::interaction::{DragController, PointerInput, SwapOutcome};
use crate::matcher::{RemovedTile, clear_matches};
use crate::score::ComboState;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Observable things that happened during a tick, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimEvent {
    TilesRemoved {
        tiles: Vec<RemovedTile>,
        combo_after: u32,
    },
    FallStep,
    GoodMove,
    BadMove,
    RowSpawned {
        row: usize,
    },
}

/// Falling while tiles are still dropping; interactive once the board has settled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Interactive,
    Falling(FallTimer),
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    grid: Grid,
    fall_mask: FallMask,
    combo: ComboState,
    best_score: u32,
    phase: Phase,
    drag: DragController,
    rng: SmallRng,
}

impl Simulation {
    /// New session with every visible cell filled at random.
    /// Runs already present on the board clear on the first tick.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut sim = Self::with_grid(config.clone(), Grid::new(config.width, config.height))?;
        for y in 0..config.height {
            for x in 0..config.width {
                let kind = sim.rng.random_range(0..config.tile_types);
                sim.grid.put(x, y, Tile::Kind(kind));
            }
        }
        Ok(sim)
    }

    /// New session on a prepared board. The config's width and height are taken from `grid`.
    pub fn with_grid(mut config: SimConfig, grid: Grid) -> Result<Self, ConfigError> {
        config.width = grid.width();
        config.height = grid.height();
        config.validate()?;
        for (y, row) in grid.rows().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                match *tile {
                    Tile::Kind(kind) if kind >= config.tile_types => {
                        return Err(ConfigError::TileOutOfPalette {
                            x,
                            y,
                            kind,
                            tile_types: config.tile_types,
                        });
                    }
                    _ => {}
                }
            }
        }
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Ok(Self {
            fall_mask: FallMask::new(grid.width(), grid.height()),
            grid,
            combo: ComboState::new(),
            best_score: 0,
            phase: Phase::Interactive,
            drag: DragController::new(),
            rng,
            config,
        })
    }

    /// Carry a best score in from storage; it only ever rises from here.
    pub fn with_best_score(mut self, best: u32) -> Self {
        self.best_score = self.best_score.max(best);
        self
    }

    /// Advance by `dt` seconds with this tick's pointer state.
    /// A negative or non-finite `dt` counts as no time passing.
    pub fn tick(&mut self, dt: f32, input: &PointerInput) -> Vec<SimEvent> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let mut events = Vec::new();
        match self.phase {
            Phase::Falling(mut timer) => {
                timer.advance(dt);
                self.phase = self.step_fall(timer, &mut events);
            }
            Phase::Interactive => self.step_settled(input, &mut events),
        }
        self.best_score = self.best_score.max(self.combo.score);
        events
    }

    fn step_fall(&mut self, mut timer: FallTimer, events: &mut Vec<SimEvent>) -> Phase {
        if timer.elapsed() {
            spawn_row(&mut self.grid, &mut self.rng, self.config.tile_types);
            events.push(SimEvent::RowSpawned {
                row: self.grid.spawn_row(),
            });
        }
        if timer.active() {
            return Phase::Falling(timer);
        }
        if fall_step(&mut self.grid, &mut self.fall_mask) {
            timer.set(fall_duration(self.config.base_fall_time, self.combo.combo));
            events.push(SimEvent::FallStep);
            Phase::Falling(timer)
        } else {
            self.fall_mask.clear();
            Phase::Interactive
        }
    }

    fn step_settled(&mut self, input: &PointerInput, events: &mut Vec<SimEvent>) {
        if let Some(removal) = clear_matches(&mut self.grid, &mut self.combo) {
            events.push(SimEvent::TilesRemoved {
                tiles: removal.tiles,
                combo_after: removal.combo_after,
            });
            self.phase = Phase::Falling(FallTimer::expired());
            return;
        }

        match self.drag.update(&mut self.grid, &mut self.combo, input) {
            Some(SwapOutcome::Committed(removal)) => {
                events.push(SimEvent::TilesRemoved {
                    tiles: removal.tiles,
                    combo_after: removal.combo_after,
                });
                events.push(SimEvent::GoodMove);
                self.phase = Phase::Falling(FallTimer::expired());
            }
            Some(SwapOutcome::RolledBack) => events.push(SimEvent::BadMove),
            None => {}
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Copy of the visible board, `[y][x]` with `y == 0` at the bottom.
    pub fn grid_snapshot(&self) -> Vec<Vec<Tile>> {
        self.grid.snapshot()
    }

    pub fn tile(&self, pos: Pos) -> Result<Tile, GridError> {
        self.grid.get(pos)
    }

    pub fn fall_mask(&self) -> &FallMask {
        &self.fall_mask
    }

    pub fn drag_start(&self) -> Option<Pos> {
        self.drag.start_cell()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_falling(&self) -> bool {
        matches!(self.phase, Phase::Falling(_))
    }

    /// How far the current fall step has progressed, 0..=1; 1 when nothing is falling.
    pub fn fall_progress(&self) -> f32 {
        match self.phase {
            Phase::Falling(timer) => timer.progress(),
            Phase::Interactive => 1.0,
        }
    }

    pub fn score(&self) -> u32 {
        self.combo.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn combo(&self) -> u32 {
        self.combo.combo
    }
}
