//! Events Module
//!
//! The seams between the platform backend and the frame controller: the
//! backend feeds compositor events through [`WindowEventHandler`], the
//! controller answers with requests on [`Shell`].

use subdeco_layout::{DecorationLayout, ElementId, Region, Size};

/// Which of our surfaces an input event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceRole {
    /// The main content surface
    Content,
    /// A decoration subsurface (region or control button)
    Element(ElementId),
    /// The pointer cursor surface
    Cursor,
}

/// Requests the controller issues to the windowing system
pub trait Shell {
    /// Hand an interactive move over to the compositor
    fn start_move(&mut self, serial: u32);

    /// Hand an interactive resize over to the compositor. `edge` is never
    /// [`Region::Title`].
    fn start_resize(&mut self, serial: u32, edge: Region);

    fn set_maximized(&mut self, maximized: bool);

    /// Window menu at a position in window-geometry coordinates
    fn show_window_menu(&mut self, serial: u32, x: i32, y: i32);

    fn set_cursor(&mut self, serial: u32, name: &'static str);

    /// Reposition and resize every surface to match `layout`
    fn apply_layout(&mut self, layout: &DecorationLayout);
}

/// One method per compositor event kind the frame reacts to
pub trait WindowEventHandler {
    /// Coordinates are surface-local
    fn pointer_enter(
        &mut self,
        shell: &mut dyn Shell,
        serial: u32,
        role: SurfaceRole,
        x: f64,
        y: f64,
    );

    fn pointer_leave(&mut self, shell: &mut dyn Shell, serial: u32);

    /// Coordinates are local to the surface last entered
    fn pointer_motion(&mut self, shell: &mut dyn Shell, time: u32, x: f64, y: f64);

    fn pointer_button(
        &mut self,
        shell: &mut dyn Shell,
        serial: u32,
        time: u32,
        button: u32,
        pressed: bool,
    );

    fn pointer_axis(&mut self, shell: &mut dyn Shell, time: u32, value: f64);

    /// Toplevel configure, acknowledged by the backend. `frame` is the
    /// outer window-geometry size, zero on an axis the client may choose.
    fn configure(&mut self, shell: &mut dyn Shell, frame: Size, maximized: bool);

    fn close_requested(&mut self, shell: &mut dyn Shell);
}
