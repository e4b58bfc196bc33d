//! Subdeco Layout
//!
//! Platform-free decoration engine for client-side window frames: where the
//! title bar, resize borders and control buttons go for a given content size,
//! and what a pointer press on any of them means.

pub mod button;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod region;
pub mod state;

pub use button::{
    default_placements, validate_placements, ButtonAnchor, ButtonPlacement, ControlButton,
    DEFAULT_BUTTON_SIZE,
};
pub use error::LayoutError;
pub use geometry::{Rect, Size};
pub use interaction::{Action, ClickPolicy, PointerButton, PointerPhase, PointerTracker, Target};
pub use layout::{
    clamp_content, region_rect, DecorationLayout, Element, ElementId, ElementKind, FrameMetrics,
    FrameStyle, DEFAULT_MIN_CONTENT,
};
pub use region::{Region, DEFAULT_CURSOR};
pub use state::{MaximizeRequest, WindowState};
