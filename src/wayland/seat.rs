//! Seat, pointer and cursor handling

use anyhow::Result;
use subdeco_layout::DEFAULT_CURSOR;
use tracing::{debug, info, warn};
use wayland_client::protocol::{
    wl_buffer::WlBuffer, wl_compositor::WlCompositor, wl_pointer, wl_seat, wl_shm::WlShm,
    wl_surface::WlSurface,
};
use wayland_client::{Connection, Dispatch, Proxy, QueueHandle, WEnum};
use wayland_cursor::CursorTheme;

use super::error::StartupError;
use super::App;
use crate::config::CursorConfig;
use crate::frame::{SurfaceRole, WindowEventHandler};

/// Themed cursor images and the surface they are shown on
pub struct Cursor {
    theme: CursorTheme,
    surface: WlSurface,
    current: Option<&'static str>,
}

impl Cursor {
    pub fn load(
        conn: &Connection,
        compositor: &WlCompositor,
        shm: &WlShm,
        qh: &QueueHandle<App>,
        config: &CursorConfig,
    ) -> Result<Self> {
        let theme = match &config.theme {
            Some(name) => CursorTheme::load_from_name(conn, shm.clone(), name, config.size),
            None => CursorTheme::load(conn, shm.clone(), config.size),
        }
        .map_err(|_| StartupError::CursorTheme)?;

        info!(
            "Loaded cursor theme {} at size {}",
            config.theme.as_deref().unwrap_or("default"),
            config.size
        );

        Ok(Self {
            theme,
            surface: compositor.create_surface(qh, SurfaceRole::Cursor),
            current: None,
        })
    }

    /// Show glyph `name`, falling back to the default arrow
    pub fn set(&mut self, pointer: &wl_pointer::WlPointer, serial: u32, name: &'static str) {
        let name = if self.theme.get_cursor(name).is_some() {
            name
        } else {
            warn!("Cursor theme has no {:?}, using {:?}", name, DEFAULT_CURSOR);
            DEFAULT_CURSOR
        };

        let Some(cursor) = self.theme.get_cursor(name) else {
            warn!("Cursor theme has no {:?}", DEFAULT_CURSOR);
            return;
        };
        let image = &cursor[0];
        let (hx, hy) = image.hotspot();
        let (width, height) = image.dimensions();
        let buffer: &WlBuffer = image;

        if self.current != Some(name) {
            self.surface.attach(Some(buffer), 0, 0);
            self.surface.damage(0, 0, width as i32, height as i32);
            self.surface.commit();
            self.current = Some(name);
        }
        pointer.set_cursor(serial, Some(&self.surface), hx as i32, hy as i32);
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.surface.destroy();
    }
}

impl Dispatch<wl_seat::WlSeat, ()> for App {
    fn event(
        state: &mut Self,
        seat: &wl_seat::WlSeat,
        event: wl_seat::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_seat::Event::Capabilities {
            capabilities: WEnum::Value(caps),
        } = event
        {
            let has_pointer = caps.contains(wl_seat::Capability::Pointer);
            match (&state.platform.pointer, has_pointer) {
                (None, true) => {
                    debug!("Seat gained a pointer");
                    state.platform.pointer = Some(seat.get_pointer(qh, ()));
                }
                (Some(_), false) => {
                    debug!("Seat lost its pointer");
                    if let Some(pointer) = state.platform.pointer.take() {
                        if pointer.version() >= 3 {
                            pointer.release();
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

impl Dispatch<wl_pointer::WlPointer, ()> for App {
    fn event(
        state: &mut Self,
        _: &wl_pointer::WlPointer,
        event: wl_pointer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        let App { controller, platform } = state;
        match event {
            wl_pointer::Event::Enter {
                serial,
                surface,
                surface_x,
                surface_y,
            } => {
                let role = surface.data::<SurfaceRole>().copied().unwrap_or(SurfaceRole::Content);
                controller.pointer_enter(platform, serial, role, surface_x, surface_y);
            }
            wl_pointer::Event::Leave { serial, .. } => {
                controller.pointer_leave(platform, serial);
            }
            wl_pointer::Event::Motion {
                time,
                surface_x,
                surface_y,
            } => {
                controller.pointer_motion(platform, time, surface_x, surface_y);
            }
            wl_pointer::Event::Button {
                serial,
                time,
                button,
                state: button_state,
            } => {
                let pressed =
                    matches!(button_state, WEnum::Value(wl_pointer::ButtonState::Pressed));
                controller.pointer_button(platform, serial, time, button, pressed);
            }
            wl_pointer::Event::Axis { time, value, .. } => {
                controller.pointer_axis(platform, time, value);
            }
            _ => {}
        }
    }
}
