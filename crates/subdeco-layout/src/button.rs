//! Window-control buttons anchored inside the title bar

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geometry::{extent, Rect, Size};
use crate::interaction::Action;

// Nord Theme Colors
const COLOR_CLOSE: u32 = 0xbf616a; // Aurora Red
const COLOR_MAX: u32 = 0xa3be8c; // Aurora Green
const COLOR_MIN: u32 = 0xebcb8b; // Aurora Yellow

/// Default button size in logical units
pub const DEFAULT_BUTTON_SIZE: Size = Size::new(10, 8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlButton {
    Close,
    Maximize,
    Minimize,
}

impl ControlButton {
    pub const ALL: [ControlButton; 3] = [
        ControlButton::Close,
        ControlButton::Maximize,
        ControlButton::Minimize,
    ];

    pub fn index(self) -> usize {
        match self {
            ControlButton::Close => 0,
            ControlButton::Maximize => 1,
            ControlButton::Minimize => 2,
        }
    }

    /// Action emitted when this button is pressed
    pub fn action(self) -> Action {
        match self {
            ControlButton::Close => Action::Close,
            ControlButton::Maximize => Action::ToggleMaximize,
            ControlButton::Minimize => Action::Minimize,
        }
    }

    /// Fill colour (0xRRGGBB)
    pub fn default_color(self) -> u32 {
        match self {
            ControlButton::Close => COLOR_CLOSE,
            ControlButton::Maximize => COLOR_MAX,
            ControlButton::Minimize => COLOR_MIN,
        }
    }
}

/// Which title-bar edge a button's horizontal offset is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAnchor {
    /// Offset from the title's left edge to the button's left edge
    #[default]
    Start,
    /// Offset from the title's right edge to the button's right edge
    End,
}

/// Where one control button sits inside the title bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonPlacement {
    pub button: ControlButton,
    #[serde(default)]
    pub anchor: ButtonAnchor,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl ButtonPlacement {
    pub fn new(button: ControlButton, anchor: ButtonAnchor, offset_x: i32, offset_y: i32) -> Self {
        Self {
            button,
            anchor,
            offset_x,
            offset_y,
        }
    }

    /// Button rectangle for the given title rect. No clipping: a button
    /// placed outside a narrow title simply hangs over it.
    pub fn rect(&self, title: Rect, size: Size) -> Rect {
        let x = match self.anchor {
            ButtonAnchor::Start => title.x.saturating_add(self.offset_x),
            ButtonAnchor::End => title
                .right()
                .saturating_sub(self.offset_x)
                .saturating_sub(extent(size.width)),
        };
        Rect::new(x, title.y.saturating_add(self.offset_y), size.width, size.height)
    }
}

/// Close, maximize, minimize from the right, like most desktop themes
pub fn default_placements() -> Vec<ButtonPlacement> {
    vec![
        ButtonPlacement::new(ControlButton::Close, ButtonAnchor::End, 4, 4),
        ButtonPlacement::new(ControlButton::Maximize, ButtonAnchor::End, 18, 4),
        ButtonPlacement::new(ControlButton::Minimize, ButtonAnchor::End, 32, 4),
    ]
}

/// Reject empty buttons and duplicate kinds
pub fn validate_placements(placements: &[ButtonPlacement], size: Size) -> Result<(), LayoutError> {
    if !placements.is_empty() && (size.width == 0 || size.height == 0) {
        return Err(LayoutError::EmptyButton {
            width: size.width,
            height: size.height,
        });
    }

    let mut seen = [false; 3];
    for placement in placements {
        let slot = &mut seen[placement.button.index()];
        if *slot {
            return Err(LayoutError::DuplicateButton(placement.button));
        }
        *slot = true;
    }
    Ok(())
}
