//! Decoration regions: the title bar plus the eight resize zones

use serde::{Deserialize, Serialize};

/// Cursor glyph used over content, buttons, or anything not decoration-related
pub const DEFAULT_CURSOR: &str = "left_ptr";

/// One of the nine zones surrounding the content surface.
///
/// Every region other than [`Region::Title`] doubles as a resize direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    Title,
    EdgeTop,
    EdgeBottom,
    EdgeLeft,
    EdgeRight,
    CornerTopLeft,
    CornerTopRight,
    CornerBottomLeft,
    CornerBottomRight,
}

impl Region {
    /// All regions in creation order
    pub const ALL: [Region; 9] = [
        Region::Title,
        Region::EdgeTop,
        Region::EdgeBottom,
        Region::EdgeLeft,
        Region::EdgeRight,
        Region::CornerTopLeft,
        Region::CornerTopRight,
        Region::CornerBottomLeft,
        Region::CornerBottomRight,
    ];

    /// Position of this region in [`Region::ALL`]
    pub fn index(self) -> usize {
        match self {
            Region::Title => 0,
            Region::EdgeTop => 1,
            Region::EdgeBottom => 2,
            Region::EdgeLeft => 3,
            Region::EdgeRight => 4,
            Region::CornerTopLeft => 5,
            Region::CornerTopRight => 6,
            Region::CornerBottomLeft => 7,
            Region::CornerBottomRight => 8,
        }
    }

    pub fn is_resize(self) -> bool {
        self != Region::Title
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Region::CornerTopLeft
                | Region::CornerTopRight
                | Region::CornerBottomLeft
                | Region::CornerBottomRight
        )
    }

    /// XCursor glyph shown while hovering this region
    pub fn cursor_name(self) -> &'static str {
        match self {
            Region::Title => "grabbing",
            Region::EdgeTop => "top_side",
            Region::EdgeBottom => "bottom_side",
            Region::EdgeLeft => "left_side",
            Region::EdgeRight => "right_side",
            Region::CornerTopLeft => "top_left_corner",
            Region::CornerTopRight => "top_right_corner",
            Region::CornerBottomLeft => "bottom_left_corner",
            Region::CornerBottomRight => "bottom_right_corner",
        }
    }
}
