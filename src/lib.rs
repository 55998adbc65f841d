//! Swaptui core: the grid state machine behind a match-3 tile swapping puzzle.
//!
//! The player drags one tile onto an orthogonal neighbour. If the swap lines up three
//! or more identical tiles in a row or column they are removed, the tiles above fall one
//! row per fall step, new tiles spawn in a hidden row above the board, and any runs
//! formed by the fall clear on their own, building a combo multiplier.
//!
//! Nothing here touches a terminal, a file or a clock: the host calls
//! [`Simulation::tick`] with the elapsed time and the pointer state and reacts to the
//! returned [`SimEvent`]s.

pub mod config;
pub mod gravity;
pub mod grid;
pub mod interaction;
pub mod matcher;
pub mod score;
pub mod sim;

pub use config::{ConfigError, MAX_GRID_SIDE, MAX_TILE_TYPES, SimConfig};
pub use grid::{Grid, GridError, Pos, Tile};
pub use interaction::{DragState, PointerInput};
pub use matcher::RemovedTile;
pub use sim::{Phase, SimEvent, Simulation};
