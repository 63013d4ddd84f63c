use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Number of units in the layout grid
pub const GRID_UNITS: u8 = 12;

/// Share of the parent's inline extent, in grid units (1..=12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Width(u8);

impl Width {
    pub const FULL: Width = Width(GRID_UNITS);

    pub fn new(units: u8) -> Result<Self, ModelError> {
        if (1..=GRID_UNITS).contains(&units) {
            Ok(Self(units))
        } else {
            Err(ModelError::InvalidWidth(units))
        }
    }

    /// Width of one column when the parent is split into `columns` equal columns
    pub fn for_columns(columns: usize) -> Self {
        let columns = columns.clamp(1, GRID_UNITS as usize) as u8;
        Self(GRID_UNITS / columns)
    }

    pub fn units(self) -> u8 {
        self.0
    }
}

impl Default for Width {
    fn default() -> Self {
        Self::FULL
    }
}

impl TryFrom<u8> for Width {
    type Error = ModelError;

    fn try_from(units: u8) -> Result<Self, Self::Error> {
        Self::new(units)
    }
}

impl From<Width> for u8 {
    fn from(width: Width) -> Self {
        width.0
    }
}
