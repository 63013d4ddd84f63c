//! Error types for the element model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Width {0} is outside the 12-unit grid")]
    InvalidWidth(u8),

    #[error("Slot count {count} is out of range (1..={max})")]
    InvalidSlotCount { count: usize, max: usize },

    #[error("Declared {declared} slots but found {actual} entries")]
    SlotLengthMismatch { declared: usize, actual: usize },
}
