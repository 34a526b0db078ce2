use serde::{Deserialize, Serialize};

use crate::config::Validate;
use crate::{EngineError, EngineResult};

pub const MIN_GRID_SIZE: usize = 3;
pub const MAX_GRID_SIZE: usize = 8;
pub const MIN_WIN_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub grid_size: usize,
    pub win_length: usize,
}

impl GameSettings {
    pub fn new(grid_size: usize, win_length: usize) -> EngineResult<Self> {
        let settings = Self {
            grid_size,
            win_length,
        };
        settings.check()?;
        Ok(settings)
    }

    pub fn check(&self) -> EngineResult<()> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(EngineError::GridSizeOutOfRange {
                grid_size: self.grid_size,
                min: MIN_GRID_SIZE,
                max: MAX_GRID_SIZE,
            });
        }
        if self.win_length < MIN_WIN_LENGTH || self.win_length > self.grid_size {
            return Err(EngineError::InvalidConfiguration {
                grid_size: self.grid_size,
                win_length: self.win_length,
            });
        }
        Ok(())
    }

    /// Changes the grid size, pulling the win length down if it no longer fits.
    pub fn with_grid_size(self, grid_size: usize) -> EngineResult<Self> {
        Self::new(grid_size, self.win_length.min(grid_size))
    }

    pub fn with_win_length(self, win_length: usize) -> EngineResult<Self> {
        Self::new(self.grid_size, win_length)
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            grid_size: 3,
            win_length: 3,
        }
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        self.check().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_supported_range() {
        for size in MIN_GRID_SIZE..=MAX_GRID_SIZE {
            for k in MIN_WIN_LENGTH..=size {
                assert!(GameSettings::new(size, k).is_ok(), "{}x{} k={}", size, size, k);
            }
        }
    }

    #[test]
    fn test_rejects_grid_out_of_range() {
        assert!(matches!(
            GameSettings::new(2, 2),
            Err(EngineError::GridSizeOutOfRange { grid_size: 2, .. })
        ));
        assert!(matches!(
            GameSettings::new(9, 3),
            Err(EngineError::GridSizeOutOfRange { grid_size: 9, .. })
        ));
    }

    #[test]
    fn test_rejects_win_length_out_of_range() {
        assert!(matches!(
            GameSettings::new(5, 6),
            Err(EngineError::InvalidConfiguration { grid_size: 5, win_length: 6 })
        ));
        assert!(matches!(
            GameSettings::new(5, 2),
            Err(EngineError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_shrinking_grid_clamps_win_length() {
        let settings = GameSettings::new(6, 5).unwrap();
        let smaller = settings.with_grid_size(4).unwrap();
        assert_eq!(smaller, GameSettings { grid_size: 4, win_length: 4 });
        let larger = smaller.with_grid_size(7).unwrap();
        assert_eq!(larger.win_length, 4);
    }

    #[test]
    fn test_validate_reports_message() {
        let bad = GameSettings {
            grid_size: 3,
            win_length: 4,
        };
        assert!(bad.validate().unwrap_err().contains("win length 4"));
    }
}
