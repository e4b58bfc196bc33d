//! Frame controller
//!
//! Owns the window state and current decoration layout, turns pointer and
//! toplevel events into shell requests. Platform-free: the Wayland backend
//! drives it through [`WindowEventHandler`].

pub mod events;

use subdeco_layout::{
    Action, ClickPolicy, DecorationLayout, FrameStyle, MaximizeRequest, PointerButton,
    PointerTracker, Size, Target, WindowState, DEFAULT_CURSOR,
};
use tracing::{debug, info, trace};

pub use events::{Shell, SurfaceRole, WindowEventHandler};

pub struct WindowController {
    style: FrameStyle,
    state: WindowState,
    layout: DecorationLayout,
    /// Surface the pointer is currently over
    entered: Option<SurfaceRole>,
    running: bool,
}

impl WindowController {
    pub fn new(initial: Size, style: FrameStyle, policy: ClickPolicy) -> Self {
        let state = WindowState::new(
            initial,
            style.metrics,
            style.min_content,
            PointerTracker::new(policy),
        );
        let layout = DecorationLayout::compute(state.content(), &style);
        Self {
            style,
            state,
            layout,
            entered: None,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn layout(&self) -> &DecorationLayout {
        &self.layout
    }

    #[cfg(test)]
    pub fn state(&self) -> &WindowState {
        &self.state
    }

    /// Translate surface-local coordinates into content coordinates
    fn to_content(&self, role: SurfaceRole, x: f64, y: f64) -> (f64, f64) {
        match role {
            SurfaceRole::Element(id) => match self.layout.element(id) {
                Some(element) => (element.rect.x as f64 + x, element.rect.y as f64 + y),
                None => (x, y),
            },
            SurfaceRole::Content | SurfaceRole::Cursor => (x, y),
        }
    }

    fn target_of(&self, role: SurfaceRole) -> Option<Target> {
        match role {
            SurfaceRole::Content => Some(Target::Content),
            SurfaceRole::Element(id) => self.layout.target_of(id),
            SurfaceRole::Cursor => None,
        }
    }

    /// Recompute the layout if the content size moved
    fn relayout(&mut self, shell: &mut dyn Shell) {
        if self.layout.content() == self.state.content() {
            return;
        }
        self.layout = DecorationLayout::compute(self.state.content(), &self.style);
        let content = self.layout.content();
        debug!("Relayout at {}x{}", content.width, content.height);
        shell.apply_layout(&self.layout);
    }

    fn dispatch(&mut self, shell: &mut dyn Shell, serial: u32, action: Action) {
        debug!("Pointer action {:?}", action);
        match action {
            Action::Move => shell.start_move(serial),
            Action::Resize(edge) => shell.start_resize(serial, edge),
            Action::Close => {
                info!("Close requested from title bar");
                self.running = false;
            }
            Action::ToggleMaximize => {
                // Sizes follow once the compositor's configure arrives
                let request = self.state.toggle_maximize();
                shell.set_maximized(request == MaximizeRequest::Maximize);
            }
            Action::Minimize => {
                info!("Minimize is not supported, ignoring");
            }
            Action::ShowMenu { x, y } => {
                let geometry = self.layout.window_geometry();
                shell.show_window_menu(serial, x - geometry.x, y - geometry.y);
            }
        }
    }
}

impl WindowEventHandler for WindowController {
    fn pointer_enter(
        &mut self,
        shell: &mut dyn Shell,
        serial: u32,
        role: SurfaceRole,
        x: f64,
        y: f64,
    ) {
        self.entered = Some(role);
        let (cx, cy) = self.to_content(role, x, y);
        let cursor = match self.target_of(role) {
            Some(target) => self.state.pointer.enter(target, cx, cy),
            None => DEFAULT_CURSOR,
        };
        shell.set_cursor(serial, cursor);
    }

    fn pointer_leave(&mut self, _shell: &mut dyn Shell, _serial: u32) {
        self.entered = None;
        self.state.pointer.leave();
    }

    fn pointer_motion(&mut self, _shell: &mut dyn Shell, _time: u32, x: f64, y: f64) {
        if let Some(role) = self.entered {
            let (cx, cy) = self.to_content(role, x, y);
            self.state.pointer.motion(cx, cy);
        }
    }

    fn pointer_button(
        &mut self,
        shell: &mut dyn Shell,
        serial: u32,
        time: u32,
        button: u32,
        pressed: bool,
    ) {
        let button = PointerButton::from_code(button);
        if !pressed {
            self.state.pointer.release(button);
            return;
        }
        if let Some(action) = self.state.pointer.press(button, time) {
            self.dispatch(shell, serial, action);
        }
    }

    fn pointer_axis(&mut self, _shell: &mut dyn Shell, _time: u32, value: f64) {
        trace!("Ignoring axis event ({})", value);
    }

    fn configure(&mut self, shell: &mut dyn Shell, frame: Size, maximized: bool) {
        trace!("Configure {}x{} maximized={}", frame.width, frame.height, maximized);
        if self.state.apply_configure(frame, maximized) {
            self.relayout(shell);
        }
    }

    fn close_requested(&mut self, _shell: &mut dyn Shell) {
        info!("Compositor requested close");
        self.running = false;
    }
}
