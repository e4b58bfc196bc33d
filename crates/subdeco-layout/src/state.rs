//! Window sizing and maximize state

use tracing::debug;

use crate::geometry::Size;
use crate::interaction::{PointerPhase, PointerTracker, Target};
use crate::layout::{clamp_content, FrameMetrics};

/// Toplevel request that follows a maximize toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaximizeRequest {
    Maximize,
    Unmaximize,
}

/// Mutable state of one decorated window
#[derive(Debug, Clone)]
pub struct WindowState {
    content: Size,
    metrics: FrameMetrics,
    min_content: Size,
    maximized: bool,
    /// Content size to return to when leaving the maximized state
    restore: Option<Size>,
    pub pointer: PointerTracker,
}

impl WindowState {
    pub fn new(
        content: Size,
        metrics: FrameMetrics,
        min_content: Size,
        pointer: PointerTracker,
    ) -> Self {
        Self {
            content: clamp_content(content, min_content),
            metrics,
            min_content,
            maximized: false,
            restore: None,
            pointer,
        }
    }

    pub fn content(&self) -> Size {
        self.content
    }

    pub fn content_width(&self) -> u32 {
        self.content.width
    }

    pub fn content_height(&self) -> u32 {
        self.content.height
    }

    pub fn border_thickness(&self) -> u32 {
        self.metrics.border
    }

    pub fn title_thickness(&self) -> u32 {
        self.metrics.title
    }

    pub fn metrics(&self) -> FrameMetrics {
        self.metrics
    }

    pub fn min_content(&self) -> Size {
        self.min_content
    }

    pub fn is_maximized(&self) -> bool {
        self.maximized
    }

    pub fn pressed(&self) -> bool {
        self.pointer.phase() == PointerPhase::Pressed
    }

    pub fn hovered(&self) -> Option<Target> {
        self.pointer.hovered()
    }

    /// Flip the maximized flag. Entering saves the current size. Leaving
    /// keeps the maximized size until the compositor confirms with an
    /// unmaximized configure, which restores the saved one.
    pub fn toggle_maximize(&mut self) -> MaximizeRequest {
        if self.maximized {
            self.maximized = false;
            MaximizeRequest::Unmaximize
        } else {
            self.enter_maximized();
            MaximizeRequest::Maximize
        }
    }

    /// Apply a toplevel configure. `frame` is the outer size the compositor
    /// asked for; a zero dimension leaves that axis to us. Returns whether
    /// the content size changed.
    pub fn apply_configure(&mut self, frame: Size, maximized: bool) -> bool {
        let before = self.content;

        if maximized && !self.maximized {
            debug!("Compositor maximized the window");
            self.enter_maximized();
        } else if !maximized && self.restore.is_some() {
            debug!("Compositor unmaximized the window");
            self.leave_maximized();
        }

        if frame.width > 0 {
            self.content.width = self.metrics.content_width(frame.width);
        }
        if frame.height > 0 {
            self.content.height = self.metrics.content_height(frame.height);
        }
        self.content = clamp_content(self.content, self.min_content);

        self.content != before
    }

    fn enter_maximized(&mut self) {
        // A stale maximized configure after our unmaximize request must not
        // overwrite the size we are about to restore
        if self.restore.is_none() {
            self.restore = Some(self.content);
        }
        self.maximized = true;
    }

    fn leave_maximized(&mut self) {
        self.maximized = false;
        if let Some(size) = self.restore.take() {
            self.content = clamp_content(size, self.min_content);
        }
    }
}
