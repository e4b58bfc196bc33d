use thiserror::Error;

use crate::button::ControlButton;

/// Reasons a frame style cannot be laid out
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("control button {0:?} is placed more than once")]
    DuplicateButton(ControlButton),

    #[error("control buttons need a non-zero size, got {width}x{height}")]
    EmptyButton { width: u32, height: u32 },

    #[error("minimum content size must be non-zero, got {width}x{height}")]
    EmptyMinimum { width: u32, height: u32 },
}
