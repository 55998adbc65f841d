//! Swaptui — match-3 tile swapping puzzle in the terminal.

mod app;
mod highscores;
mod input;
mod theme;
mod ui;

use anyhow::Result;
use app::App;
use clap::{Parser, ValueEnum};
use swaptui::SimConfig;

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let mut app = App::new(args, theme)?;
    app.run()?;
    Ok(())
}

/// Match-3 tile swapping puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "swaptui",
    version,
    about = "Match-3 tile swapping puzzle in the terminal. Line up three or more tiles to clear them.",
    long_about = "Swaptui is a terminal match-3 puzzle.\n\n\
        Drag a tile with the mouse onto a horizontal or vertical neighbour to swap them. \
        A swap only sticks if it lines up three or more identical tiles; those clear, the \
        tiles above fall and new ones drop in from the top. Matches made by falling tiles \
        clear automatically and raise the combo multiplier.\n\n\
        CONTROLS:\n  Mouse drag  Swap tiles    P / Space  Pause    R  Restart    Q / Esc  Quit\n\n\
        Use --theme to load a btop-style theme (tile colours via theme[tile0]..theme[tile6])."
)]
pub struct Args {
    /// Board width in tiles.
    #[arg(long, default_value = "12", value_name = "COLS")]
    pub width: usize,

    /// Board height in tiles.
    #[arg(long, default_value = "6", value_name = "ROWS")]
    pub height: usize,

    /// Number of tile colours (1-7). Fewer colours make matches more likely.
    #[arg(short, long, default_value = "7", value_name = "N")]
    pub colors: u8,

    /// Seconds per one-row fall step; steps speed up as the combo grows.
    #[arg(long, default_value = "0.2", value_name = "SECS")]
    pub fall_time: f32,

    /// Fixed RNG seed for a reproducible board.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Disable the tile removal fade.
    #[arg(long)]
    pub no_animation: bool,

    /// Target render frames per second; the simulation ticks once per frame.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Ignore the stored best score for this session (it is still updated).
    #[arg(long)]
    pub fresh_best: bool,
}

impl Args {
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            width: self.width,
            height: self.height,
            tile_types: self.colors,
            base_fall_time: self.fall_time,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}
