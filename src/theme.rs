//! Theme loading: btop-style `theme[key]="value"` and hex → ratatui Color.

use crate::Palette;
use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use swaptui::MAX_TILE_TYPES;
use thiserror::Error;

const TILE_COUNT: usize = MAX_TILE_TYPES as usize;

/// One Dark defaults for the tile palette, in tile-kind order.
const ONEDARK_TILES: [&str; TILE_COUNT] = [
    "#E06C75", // red
    "#DCDFE4", // white
    "#E5C07B", // yellow
    "#98C379", // green
    "#61AFEF", // blue
    "#C678DD", // purple
    "#7F848E", // grey
];

/// btop keys that stand in for each tile colour when the file has no `tileN` entry.
const TILE_FALLBACK_KEYS: [&[&str]; TILE_COUNT] = [
    &["cpu_end", "temp_end"],
    &["hi_fg", "selected_fg"],
    &["title", "cpu_mid"],
    &["mem_box", "cpu_start"],
    &["cpu_box"],
    &["net_box"],
    &["inactive_fg"],
];

/// Tile colours and UI colours loaded from a theme file.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Tile colours by kind (index 0..=6).
    pub tiles: [Color; TILE_COUNT],
    /// Board background.
    pub bg: Color,
    /// Grid / border.
    pub div_line: Color,
    /// Text (score, combo).
    pub main_fg: Color,
    /// Highlight / titles.
    pub title: Color,
    /// Drag-start outline and status accents.
    pub selected: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    pub fn onedark_default() -> Self {
        Self {
            tiles: ONEDARK_TILES.map(hex_or_gray),
            bg: hex_or_gray("#282C34"),
            div_line: hex_or_gray("#3F444F"),
            main_fg: hex_or_gray("#ABB2BF"),
            title: hex_or_gray("#E5C07B"),
            selected: hex_or_gray("#FFFFFF"),
        }
    }

    /// Load theme from a btop-style file: `theme[key]="value"` or `theme[key]='value'`.
    /// Falls back to One Dark if path is None or the file is missing.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let path = match path {
            Some(p) if p.exists() => p,
            _ => return Ok(Self::default_for_palette(palette)),
        };
        let s = std::fs::read_to_string(path)?;
        let map = parse_theme_file(&s);
        let mut theme = Self::from_map(&map);
        theme.apply_palette(palette);
        Ok(theme)
    }

    fn default_for_palette(palette: Palette) -> Self {
        let mut t = Self::onedark_default();
        t.apply_palette(palette);
        t
    }

    /// Override tile colours for high-contrast or colorblind play.
    pub fn apply_palette(&mut self, palette: Palette) {
        let hexes = match palette {
            Palette::Normal => return,
            Palette::HighContrast => [
                "#FF0000", "#FFFFFF", "#FFFF00", "#00FF00", "#0099FF", "#9900FF", "#808080",
            ],
            // Paul Tol's bright scheme.
            Palette::Colorblind => [
                "#EE6677", "#FFFFFF", "#CCBB44", "#228833", "#4477AA", "#AA3377", "#BBBBBB",
            ],
        };
        self.tiles = hexes.map(hex_or_gray);
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).and_then(|v| parse_hex(v).ok());
        let defaults = Self::onedark_default();
        let mut tiles = defaults.tiles;
        for (i, tile) in tiles.iter_mut().enumerate() {
            let own = get(&format!("tile{i}"));
            let fallback = TILE_FALLBACK_KEYS[i].iter().find_map(|k| get(k));
            if let Some(c) = own.or(fallback) {
                *tile = c;
            }
        }
        Self {
            tiles,
            bg: get("main_bg").or_else(|| get("meter_bg")).unwrap_or(defaults.bg),
            div_line: get("div_line").unwrap_or(defaults.div_line),
            main_fg: get("main_fg").unwrap_or(defaults.main_fg),
            title: get("title").unwrap_or(defaults.title),
            selected: get("selected_bg").unwrap_or(defaults.selected),
        }
    }

    /// Colour for a tile kind; kinds past the palette wrap around.
    #[inline]
    pub fn tile_color(&self, kind: u8) -> Color {
        self.tiles[(kind as usize) % TILE_COUNT]
    }
}

/// Glyph drawn on each tile so kinds stay distinguishable without colour.
pub fn tile_glyph(kind: u8) -> &'static str {
    const GLYPHS: [&str; TILE_COUNT] = ["●", "◆", "▲", "■", "★", "♥", "✚"];
    GLYPHS[(kind as usize) % TILE_COUNT]
}

fn hex_or_gray(s: &str) -> Color {
    parse_hex(s).unwrap_or(Color::Gray)
}

/// Parse btop-style theme file into key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(value) = rest.strip_prefix('=') {
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                map.insert(key.to_string(), value.to_string());
            }
        }
    }
    map
}

/// Parse hex colour "#RRGGBB" or "#RGB" into ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let s = s.trim().trim_start_matches('#');
    let invalid = || ThemeError::InvalidHex(s.to_string());
    let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());
    if !s.is_ascii() {
        return Err(invalid());
    }
    let (r, g, b) = match s.len() {
        6 => (channel(&s[0..2])?, channel(&s[2..4])?, channel(&s[4..6])?),
        3 => (
            channel(&s[0..1])? * 17,
            channel(&s[1..2])? * 17,
            channel(&s[2..3])? * 17,
        ),
        _ => return Err(invalid()),
    };
    Ok(Color::Rgb(r, g, b))
}
