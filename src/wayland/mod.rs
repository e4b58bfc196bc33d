//! Wayland backend
//!
//! Binds the globals, creates one decorated toplevel and feeds protocol
//! events into the [`WindowController`] until it stops running.

mod error;
mod seat;
mod shm;
mod surfaces;

use anyhow::{Context, Result};
use subdeco_layout::{DecorationLayout, Region, Size};
use tracing::{debug, info, warn};
use wayland_client::globals::{registry_queue_init, GlobalListContents};
use wayland_client::protocol::{
    wl_buffer, wl_compositor::WlCompositor, wl_pointer::WlPointer, wl_registry, wl_seat::WlSeat,
    wl_shm::WlShm, wl_shm_pool::WlShmPool, wl_subcompositor::WlSubcompositor,
    wl_subsurface::WlSubsurface, wl_surface,
};
use wayland_client::{delegate_noop, Connection, Dispatch, Proxy, QueueHandle};
use wayland_protocols::xdg::shell::client::{xdg_surface, xdg_toplevel, xdg_wm_base};

use crate::config::Config;
use crate::frame::{Shell, SurfaceRole, WindowController, WindowEventHandler};
use error::StartupError;
use seat::Cursor;
use surfaces::DecoratedWindow;

pub struct App {
    pub controller: WindowController,
    pub platform: Platform,
}

/// Toplevel configure fields, held until the matching xdg_surface configure
#[derive(Debug, Default, Clone, Copy)]
struct PendingConfigure {
    size: Size,
    maximized: bool,
}

/// Protocol objects the controller acts through
pub struct Platform {
    qh: QueueHandle<App>,
    shm: WlShm,
    wm_base: xdg_wm_base::XdgWmBase,
    seat: Option<WlSeat>,
    pointer: Option<WlPointer>,
    cursor: Option<Cursor>,
    window: Option<DecoratedWindow>,
    pending: PendingConfigure,
}

impl Platform {
    fn present(&mut self) -> Result<()> {
        match &mut self.window {
            Some(window) => window.present(&self.shm, &self.qh),
            None => Ok(()),
        }
    }

    fn toplevel(&self) -> Option<&xdg_toplevel::XdgToplevel> {
        self.window.as_ref().map(|w| w.toplevel())
    }
}

fn resize_edge(region: Region) -> Option<xdg_toplevel::ResizeEdge> {
    use xdg_toplevel::ResizeEdge;
    match region {
        Region::Title => None,
        Region::EdgeTop => Some(ResizeEdge::Top),
        Region::EdgeBottom => Some(ResizeEdge::Bottom),
        Region::EdgeLeft => Some(ResizeEdge::Left),
        Region::EdgeRight => Some(ResizeEdge::Right),
        Region::CornerTopLeft => Some(ResizeEdge::TopLeft),
        Region::CornerTopRight => Some(ResizeEdge::TopRight),
        Region::CornerBottomLeft => Some(ResizeEdge::BottomLeft),
        Region::CornerBottomRight => Some(ResizeEdge::BottomRight),
    }
}

impl Shell for Platform {
    fn start_move(&mut self, serial: u32) {
        if let (Some(toplevel), Some(seat)) = (self.toplevel(), &self.seat) {
            toplevel._move(seat, serial);
        }
    }

    fn start_resize(&mut self, serial: u32, region: Region) {
        let Some(edge) = resize_edge(region) else {
            warn!("{:?} is not a resize region", region);
            return;
        };
        if let (Some(toplevel), Some(seat)) = (self.toplevel(), &self.seat) {
            toplevel.resize(seat, serial, edge);
        }
    }

    fn set_maximized(&mut self, maximized: bool) {
        if let Some(toplevel) = self.toplevel() {
            if maximized {
                toplevel.set_maximized();
            } else {
                toplevel.unset_maximized();
            }
        }
    }

    fn show_window_menu(&mut self, serial: u32, x: i32, y: i32) {
        if let (Some(toplevel), Some(seat)) = (self.toplevel(), &self.seat) {
            toplevel.show_window_menu(seat, serial, x, y);
        }
    }

    fn set_cursor(&mut self, serial: u32, name: &'static str) {
        if let (Some(cursor), Some(pointer)) = (&mut self.cursor, &self.pointer) {
            cursor.set(pointer, serial, name);
        }
    }

    fn apply_layout(&mut self, layout: &DecorationLayout) {
        if let Some(window) = &mut self.window {
            window.apply_layout(layout);
        }
    }
}

/// Maximized flag out of the packed toplevel state array
fn is_maximized(states: &[u8]) -> bool {
    states
        .chunks_exact(4)
        .filter_map(|chunk| chunk.try_into().ok().map(u32::from_ne_bytes))
        .any(|state| state == xdg_toplevel::State::Maximized as u32)
}

pub fn run(config: &Config) -> Result<()> {
    let conn = Connection::connect_to_env().context("Failed to connect to Wayland display")?;
    let (globals, mut event_queue) =
        registry_queue_init::<App>(&conn).context("Failed to read Wayland globals")?;
    let qh = event_queue.handle();

    let compositor: WlCompositor = globals
        .bind(&qh, 1..=4, ())
        .map_err(|source| StartupError::MissingGlobal {
            interface: "wl_compositor",
            source,
        })?;
    let subcompositor: WlSubcompositor = globals
        .bind(&qh, 1..=1, ())
        .map_err(|source| StartupError::MissingGlobal {
            interface: "wl_subcompositor",
            source,
        })?;
    let shm: WlShm = globals
        .bind(&qh, 1..=1, ())
        .map_err(|source| StartupError::MissingGlobal {
            interface: "wl_shm",
            source,
        })?;
    let wm_base: xdg_wm_base::XdgWmBase = globals
        .bind(&qh, 1..=5, ())
        .map_err(|source| StartupError::MissingGlobal {
            interface: "xdg_wm_base",
            source,
        })?;
    let seat: Option<WlSeat> = match globals.bind(&qh, 1..=5, ()) {
        Ok(seat) => Some(seat),
        Err(e) => {
            warn!("No wl_seat ({}), window will not react to input", e);
            None
        }
    };

    let cursor = match Cursor::load(&conn, &compositor, &shm, &qh, &config.cursor) {
        Ok(cursor) => Some(cursor),
        Err(e) => {
            warn!("Failed to load cursor theme: {:#}", e);
            None
        }
    };

    let controller = WindowController::new(
        config.initial_size(),
        config.frame_style(),
        config.click_policy(),
    );
    let window = DecoratedWindow::new(
        &compositor,
        &subcompositor,
        &wm_base,
        &qh,
        controller.layout(),
        config,
    );

    let mut app = App {
        controller,
        platform: Platform {
            qh,
            shm,
            wm_base,
            seat,
            pointer: None,
            cursor,
            window: Some(window),
            pending: PendingConfigure::default(),
        },
    };
    info!("Window created, entering event loop");

    while app.controller.is_running() {
        event_queue
            .blocking_dispatch(&mut app)
            .context("Wayland dispatch failed")?;
        app.platform
            .present()
            .context("Failed to map window")?;
    }

    info!("Closing window");
    app.platform.window = None;
    app.platform.cursor = None;
    if let Some(pointer) = app.platform.pointer.take() {
        if pointer.version() >= 3 {
            pointer.release();
        }
    }
    app.platform.wm_base.destroy();
    debug!("Released window objects");
    conn.flush().context("Failed to flush Wayland connection")?;
    Ok(())
}

impl Dispatch<wl_registry::WlRegistry, GlobalListContents> for App {
    fn event(
        _: &mut Self,
        _: &wl_registry::WlRegistry,
        _: wl_registry::Event,
        _: &GlobalListContents,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

delegate_noop!(App: WlCompositor);
delegate_noop!(App: WlSubcompositor);
delegate_noop!(App: WlSubsurface);
delegate_noop!(App: WlShmPool);
delegate_noop!(App: ignore WlShm);

impl Dispatch<wl_buffer::WlBuffer, ()> for App {
    fn event(
        _: &mut Self,
        buffer: &wl_buffer::WlBuffer,
        event: wl_buffer::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let wl_buffer::Event::Release = event {
            buffer.destroy();
        }
    }
}

impl Dispatch<wl_surface::WlSurface, SurfaceRole> for App {
    fn event(
        _: &mut Self,
        _: &wl_surface::WlSurface,
        _: wl_surface::Event,
        _: &SurfaceRole,
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
    }
}

impl Dispatch<xdg_wm_base::XdgWmBase, ()> for App {
    fn event(
        _: &mut Self,
        wm_base: &xdg_wm_base::XdgWmBase,
        event: xdg_wm_base::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let xdg_wm_base::Event::Ping { serial } = event {
            wm_base.pong(serial);
        }
    }
}

impl Dispatch<xdg_surface::XdgSurface, ()> for App {
    fn event(
        state: &mut Self,
        _: &xdg_surface::XdgSurface,
        event: xdg_surface::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        if let xdg_surface::Event::Configure { serial } = event {
            let App { controller, platform } = state;
            if let Some(window) = &mut platform.window {
                window.ack_configure(serial);
            }
            let pending = platform.pending;
            controller.configure(platform, pending.size, pending.maximized);
        }
    }
}

impl Dispatch<xdg_toplevel::XdgToplevel, ()> for App {
    fn event(
        state: &mut Self,
        _: &xdg_toplevel::XdgToplevel,
        event: xdg_toplevel::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            xdg_toplevel::Event::Configure {
                width,
                height,
                states,
            } => {
                let size = Size::new(
                    u32::try_from(width).unwrap_or(0),
                    u32::try_from(height).unwrap_or(0),
                );
                state.platform.pending = PendingConfigure {
                    size,
                    maximized: is_maximized(&states),
                };
            }
            xdg_toplevel::Event::Close => {
                let App { controller, platform } = state;
                controller.close_requested(platform);
            }
            _ => {}
        }
    }
}
