//! Surfaces of one decorated window
//!
//! The content surface is an xdg toplevel; every decoration element gets a
//! synchronized subsurface positioned relative to the content origin.

use anyhow::Result;
use subdeco_layout::{DecorationLayout, Element, ElementId, ElementKind, Rect, Size};
use tracing::{debug, trace, warn};
use wayland_client::protocol::{
    wl_buffer::WlBuffer, wl_compositor::WlCompositor, wl_shm::WlShm,
    wl_subcompositor::WlSubcompositor, wl_subsurface::WlSubsurface, wl_surface::WlSurface,
};
use wayland_client::QueueHandle;
use wayland_protocols::xdg::shell::client::{
    xdg_surface::XdgSurface, xdg_toplevel::XdgToplevel, xdg_wm_base::XdgWmBase,
};

use super::shm::solid_buffer;
use super::App;
use crate::config::Config;
use crate::frame::SurfaceRole;

/// Attach a fresh solid buffer, or detach when the area is empty
fn paint(
    surface: &WlSurface,
    shm: &WlShm,
    qh: &QueueHandle<App>,
    size: Size,
    rgb: u32,
) -> Result<()> {
    if size.width == 0 || size.height == 0 {
        surface.attach(None, 0, 0);
    } else {
        let buffer: WlBuffer = solid_buffer(shm, qh, size, rgb)?;
        surface.attach(Some(&buffer), 0, 0);
        surface.damage(0, 0, i32::MAX, i32::MAX);
    }
    Ok(())
}

/// Repaint failures are fatal until the window has been shown once; later
/// ones are logged and the surface is retried on the next pass.
fn tolerate(mapped: bool, err: anyhow::Error) -> Result<()> {
    if !mapped {
        return Err(err);
    }
    warn!("{:#}", err);
    Ok(())
}

/// One title/border/button subsurface
pub struct DecorationSurface {
    id: ElementId,
    surface: WlSurface,
    subsurface: WlSubsurface,
    color: u32,
    rect: Rect,
    dirty: bool,
}

impl DecorationSurface {
    fn new(
        compositor: &WlCompositor,
        subcompositor: &WlSubcompositor,
        qh: &QueueHandle<App>,
        parent: &WlSurface,
        element: &Element,
        color: u32,
    ) -> Self {
        let surface = compositor.create_surface(qh, SurfaceRole::Element(element.id));
        let subsurface = subcompositor.get_subsurface(&surface, parent, qh, ());
        subsurface.set_sync();
        subsurface.set_position(element.rect.x, element.rect.y);

        Self {
            id: element.id,
            surface,
            subsurface,
            color,
            rect: element.rect,
            dirty: true,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Move to `rect`; a size change schedules a repaint
    fn place(&mut self, rect: Rect) {
        if (rect.x, rect.y) != (self.rect.x, self.rect.y) {
            self.subsurface.set_position(rect.x, rect.y);
        }
        if rect.size() != self.rect.size() {
            self.dirty = true;
        }
        self.rect = rect;
    }

    fn present(&mut self, shm: &WlShm, qh: &QueueHandle<App>) -> Result<()> {
        if self.dirty {
            paint(&self.surface, shm, qh, self.rect.size(), self.color)?;
            self.dirty = false;
            self.surface.commit();
        }
        Ok(())
    }
}

impl Drop for DecorationSurface {
    fn drop(&mut self) {
        self.subsurface.destroy();
        self.surface.destroy();
    }
}

/// Content surface, its xdg roles, and the decoration subsurfaces
pub struct DecoratedWindow {
    surface: WlSurface,
    xdg_surface: XdgSurface,
    toplevel: XdgToplevel,
    content: Size,
    content_color: u32,
    dirty: bool,
    configured: bool,
    /// Content has been committed with a buffer at least once
    mapped: bool,
    /// In creation order; torn down in reverse
    elements: Vec<DecorationSurface>,
}

impl DecoratedWindow {
    pub fn new(
        compositor: &WlCompositor,
        subcompositor: &WlSubcompositor,
        wm_base: &XdgWmBase,
        qh: &QueueHandle<App>,
        layout: &DecorationLayout,
        config: &Config,
    ) -> Self {
        let surface = compositor.create_surface(qh, SurfaceRole::Content);
        let xdg_surface = wm_base.get_xdg_surface(&surface, qh, ());
        let toplevel = xdg_surface.get_toplevel(qh, ());
        toplevel.set_title(config.window.title.clone());
        toplevel.set_app_id("subdeco".to_string());

        let min_frame = layout.metrics().frame_size(config.frame_style().min_content);
        toplevel.set_min_size(
            i32::try_from(min_frame.width).unwrap_or(i32::MAX),
            i32::try_from(min_frame.height).unwrap_or(i32::MAX),
        );

        let elements = layout
            .elements()
            .iter()
            .map(|element| {
                let color = match element.kind {
                    ElementKind::Region(region) => config.colors.region(region),
                    ElementKind::Button(button) => config.colors.button(button),
                };
                DecorationSurface::new(compositor, subcompositor, qh, &surface, element, color)
            })
            .collect::<Vec<_>>();
        debug!("Created {} decoration surfaces", elements.len());

        let window = Self {
            surface,
            xdg_surface,
            toplevel,
            content: layout.content(),
            content_color: config.colors.content,
            dirty: true,
            configured: false,
            mapped: false,
            elements,
        };
        window.set_geometry(layout);
        // Initial commit without a buffer asks for the first configure
        window.surface.commit();
        window
    }

    pub fn toplevel(&self) -> &XdgToplevel {
        &self.toplevel
    }

    pub fn ack_configure(&mut self, serial: u32) {
        self.xdg_surface.ack_configure(serial);
        if !self.configured {
            self.configured = true;
            self.dirty = true;
        }
    }

    fn set_geometry(&self, layout: &DecorationLayout) {
        let geometry = layout.window_geometry();
        self.xdg_surface.set_window_geometry(
            geometry.x,
            geometry.y,
            i32::try_from(geometry.width).unwrap_or(i32::MAX),
            i32::try_from(geometry.height).unwrap_or(i32::MAX),
        );
    }

    /// Match surface positions and sizes to `layout`
    pub fn apply_layout(&mut self, layout: &DecorationLayout) {
        for surface in &mut self.elements {
            if let Some(element) = layout.element(surface.id()) {
                surface.place(element.rect);
            }
        }
        if layout.content() != self.content {
            self.content = layout.content();
            self.dirty = true;
        }
        self.set_geometry(layout);
        trace!("Applied layout, content {}x{}", self.content.width, self.content.height);
    }

    /// Repaint whatever changed. Subsurface state lands with the parent commit.
    /// Errors only surface while the window has never been mapped.
    pub fn present(&mut self, shm: &WlShm, qh: &QueueHandle<App>) -> Result<()> {
        if !self.configured {
            return Ok(());
        }
        let mut changed = self.dirty;
        for surface in &mut self.elements {
            changed |= surface.dirty;
            if let Err(e) = surface.present(shm, qh) {
                let id = surface.id();
                tolerate(self.mapped, e.context(format!("Failed to paint decoration {:?}", id)))?;
            }
        }
        if self.dirty {
            match paint(&self.surface, shm, qh, self.content, self.content_color) {
                Ok(()) => self.dirty = false,
                Err(e) => tolerate(self.mapped, e.context("Failed to paint content surface"))?,
            }
        }
        if changed {
            self.surface.commit();
            if !self.mapped && !self.dirty {
                debug!("Window mapped at {}x{}", self.content.width, self.content.height);
                self.mapped = true;
            }
        }
        Ok(())
    }
}

impl Drop for DecoratedWindow {
    fn drop(&mut self) {
        while let Some(surface) = self.elements.pop() {
            drop(surface);
        }
        self.toplevel.destroy();
        self.xdg_surface.destroy();
        self.surface.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wayland::error::StartupError;

    #[test]
    fn test_paint_failure_fatal_before_map() {
        let err = StartupError::BufferTooLarge {
            width: 100_000,
            height: 100_000,
        };
        assert!(tolerate(false, err.into()).is_err());
    }

    #[test]
    fn test_paint_failure_tolerated_after_map() {
        assert!(tolerate(true, anyhow::anyhow!("memfd_create failed")).is_ok());
    }
}
