//! Construction-time settings for a simulation.

use thiserror::Error;

/// Largest palette the front-end has colours for.
pub const MAX_TILE_TYPES: u8 = 7;

/// Longest side a board may have. Keeps the cell count and the terminal
/// layout (four columns, two rows per tile) well inside `u16`.
pub const MAX_GRID_SIDE: usize = 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Columns.
    pub width: usize,
    /// Visible rows; one hidden spawn row sits above them.
    pub height: usize,
    /// Palette size; tiles are kinds `0..tile_types`.
    pub tile_types: u8,
    /// Seconds per fall step with no combo running.
    pub base_fall_time: f32,
    /// Fixed RNG seed for reproducible boards; OS entropy when None.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 12,
            height: 6,
            tile_types: MAX_TILE_TYPES,
            base_fall_time: 0.2,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid width must be at least 1")]
    ZeroWidth,
    #[error("grid height must be at least 1")]
    ZeroHeight,
    #[error("grid of {width}x{height} is too large, sides are limited to 1024")]
    TooLarge { width: usize, height: usize },
    #[error("tile types must be between 1 and 7, got {0}")]
    TileTypes(u8),
    #[error("tile kind {kind} at ({x}, {y}) is outside a palette of {tile_types}")]
    TileOutOfPalette {
        x: usize,
        y: usize,
        kind: u8,
        tile_types: u8,
    },
    #[error("fall time must be a non-negative number of seconds, got {0}")]
    FallTime(f32),
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if self.width > MAX_GRID_SIDE || self.height > MAX_GRID_SIDE {
            return Err(ConfigError::TooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.tile_types == 0 || self.tile_types > MAX_TILE_TYPES {
            return Err(ConfigError::TileTypes(self.tile_types));
        }
        if !self.base_fall_time.is_finite() || self.base_fall_time < 0.0 {
            return Err(ConfigError::FallTime(self.base_fall_time));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(SimConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_values() {
        let base = SimConfig::default();
        let cases = [
            (SimConfig { width: 0, ..base.clone() }, ConfigError::ZeroWidth),
            (SimConfig { height: 0, ..base.clone() }, ConfigError::ZeroHeight),
            (
                SimConfig { width: 20_000, ..base.clone() },
                ConfigError::TooLarge { width: 20_000, height: 6 },
            ),
            (
                SimConfig { height: usize::MAX, ..base.clone() },
                ConfigError::TooLarge { width: 12, height: usize::MAX },
            ),
            (SimConfig { tile_types: 0, ..base.clone() }, ConfigError::TileTypes(0)),
            (SimConfig { tile_types: 8, ..base.clone() }, ConfigError::TileTypes(8)),
            (SimConfig { base_fall_time: -1.0, ..base.clone() }, ConfigError::FallTime(-1.0)),
        ];
        for (config, expected) in cases {
            assert_eq!(config.validate(), Err(expected));
        }
    }

    #[test]
    fn test_largest_board_is_accepted() {
        let config = SimConfig {
            width: MAX_GRID_SIDE,
            height: MAX_GRID_SIDE,
            ..SimConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
        assert!(MAX_GRID_SIDE.checked_mul(MAX_GRID_SIDE + 1).is_some());
        assert!(MAX_GRID_SIDE * 4 + 2 + 24 < usize::from(u16::MAX));
    }
}
