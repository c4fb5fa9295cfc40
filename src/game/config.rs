use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// The starting snake's head sits this many cells from the top-left corner,
/// so the board needs at least one more cell than this on each axis.
pub const START_CELL: i32 = 5;

/// Number of segments in a freshly reset snake
pub const INITIAL_SNAKE_LENGTH: usize = 3;

const MIN_CELLS: i32 = START_CELL + 1;

/// Rejected board configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: i64 },

    #[error("board {axis} of {value}px is not a multiple of the {cell_size}px cell size")]
    Misaligned {
        axis: &'static str,
        value: i32,
        cell_size: i32,
    },

    #[error("board is {columns}x{rows} cells, need at least {min}x{min}")]
    BoardTooSmall { columns: i32, rows: i32, min: i32 },
}

/// Board configuration, fixed for the lifetime of an engine.
///
/// All lengths are in pixels; the board is `width / cell_size` columns by
/// `height / cell_size` rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in pixels
    pub width: i32,
    /// Board height in pixels
    pub height: i32,
    /// Edge length of one cell in pixels
    pub cell_size: i32,
    /// Delay between two ticks
    pub tick_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            cell_size: 20,
            tick_delay_ms: 100,
        }
    }
}

impl GameConfig {
    /// Create a validated configuration
    pub fn new(
        width: i32,
        height: i32,
        cell_size: i32,
        tick_delay_ms: u64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            width,
            height,
            cell_size,
            tick_delay_ms,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the grid-alignment and size rules.
    ///
    /// Configs built through `new` are already valid; this is for values
    /// deserialized from a file or assembled field by field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("cell_size", self.cell_size),
        ] {
            if value <= 0 {
                return Err(ConfigError::NonPositive {
                    field,
                    value: value.into(),
                });
            }
        }
        if self.tick_delay_ms == 0 {
            return Err(ConfigError::NonPositive {
                field: "tick_delay_ms",
                value: 0,
            });
        }

        for (axis, value) in [("width", self.width), ("height", self.height)] {
            if value % self.cell_size != 0 {
                return Err(ConfigError::Misaligned {
                    axis,
                    value,
                    cell_size: self.cell_size,
                });
            }
        }

        let (columns, rows) = (self.columns(), self.rows());
        if columns < MIN_CELLS || rows < MIN_CELLS {
            return Err(ConfigError::BoardTooSmall {
                columns,
                rows,
                min: MIN_CELLS,
            });
        }

        Ok(())
    }

    /// Number of cells per row
    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    /// Number of cells per column
    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    /// Total number of cells on the board. Widened so large boards cannot
    /// overflow the product.
    pub fn cell_count(&self) -> u64 {
        self.columns() as u64 * self.rows() as u64
    }

    pub fn tick_delay(&self) -> Duration {
        Duration::from_millis(self.tick_delay_ms)
    }
}
