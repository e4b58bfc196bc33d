//! Pointer tracking and press classification
//!
//! Two-state machine (idle, pressed). A primary press over a decoration
//! emits exactly one [`Action`]; releases never emit anything.

use tracing::{debug, trace};

use crate::button::ControlButton;
use crate::region::{Region, DEFAULT_CURSOR};

/// Linux input event codes (linux/input-event-codes.h)
pub const BTN_LEFT: u32 = 0x110;
pub const BTN_RIGHT: u32 = 0x111;

/// What the pointer is currently over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Content,
    Region(Region),
    Button(ControlButton),
}

impl Target {
    pub fn cursor_name(self) -> &'static str {
        match self {
            Target::Region(region) => region.cursor_name(),
            Target::Content | Target::Button(_) => DEFAULT_CURSOR,
        }
    }
}

/// Request produced by a pointer press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move,
    Resize(Region),
    Close,
    ToggleMaximize,
    Minimize,
    /// Window menu at a position in content coordinates
    ShowMenu { x: i32, y: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Other(u32),
}

impl PointerButton {
    pub fn from_code(code: u32) -> Self {
        match code {
            BTN_LEFT => PointerButton::Primary,
            BTN_RIGHT => PointerButton::Secondary,
            other => PointerButton::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerPhase {
    #[default]
    Idle,
    Pressed,
}

/// Click timing and leave behaviour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickPolicy {
    /// Max interval between two title presses to count as a double click
    pub double_click_ms: u32,
    /// Max per-axis travel between the two presses
    pub double_click_distance: f64,
    /// Keep the hovered target when the pointer leaves a surface
    pub retain_hover_on_leave: bool,
}

impl Default for ClickPolicy {
    fn default() -> Self {
        Self {
            double_click_ms: 400,
            double_click_distance: 4.0,
            retain_hover_on_leave: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct TitlePress {
    time: u32,
    x: f64,
    y: f64,
}

/// Per-window pointer state
#[derive(Debug, Clone)]
pub struct PointerTracker {
    policy: ClickPolicy,
    phase: PointerPhase,
    hovered: Option<Target>,
    /// Last known position, content coordinates
    position: (f64, f64),
    last_title_press: Option<TitlePress>,
}

impl PointerTracker {
    pub fn new(policy: ClickPolicy) -> Self {
        Self {
            policy,
            phase: PointerPhase::Idle,
            hovered: None,
            position: (0.0, 0.0),
            last_title_press: None,
        }
    }

    pub fn policy(&self) -> ClickPolicy {
        self.policy
    }

    pub fn phase(&self) -> PointerPhase {
        self.phase
    }

    pub fn is_pressed(&self) -> bool {
        self.phase == PointerPhase::Pressed
    }

    pub fn hovered(&self) -> Option<Target> {
        self.hovered
    }

    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    /// Pointer entered `target`; returns the cursor glyph to show
    pub fn enter(&mut self, target: Target, x: f64, y: f64) -> &'static str {
        trace!("Pointer entered {:?} at ({:.1}, {:.1})", target, x, y);
        self.hovered = Some(target);
        self.position = (x, y);
        target.cursor_name()
    }

    pub fn leave(&mut self) {
        self.phase = PointerPhase::Idle;
        if !self.policy.retain_hover_on_leave {
            self.hovered = None;
        }
    }

    pub fn motion(&mut self, x: f64, y: f64) {
        self.position = (x, y);
    }

    /// Classify a button press. `time` is the event timestamp in ms.
    pub fn press(&mut self, button: PointerButton, time: u32) -> Option<Action> {
        match button {
            PointerButton::Primary => self.primary_press(time),
            PointerButton::Secondary => self.secondary_press(),
            PointerButton::Other(code) => {
                debug!("Ignoring press of button {:#x}", code);
                None
            }
        }
    }

    pub fn release(&mut self, button: PointerButton) {
        if button == PointerButton::Primary {
            self.phase = PointerPhase::Idle;
        }
    }

    fn primary_press(&mut self, time: u32) -> Option<Action> {
        if self.phase == PointerPhase::Pressed {
            return None;
        }
        let action = match self.hovered? {
            Target::Content => return None,
            Target::Region(Region::Title) => {
                if self.is_double_click(time) {
                    self.last_title_press = None;
                    Action::ToggleMaximize
                } else {
                    let (x, y) = self.position;
                    self.last_title_press = Some(TitlePress { time, x, y });
                    Action::Move
                }
            }
            Target::Region(region) => {
                self.last_title_press = None;
                Action::Resize(region)
            }
            Target::Button(button) => {
                self.last_title_press = None;
                button.action()
            }
        };
        self.phase = PointerPhase::Pressed;
        Some(action)
    }

    fn secondary_press(&mut self) -> Option<Action> {
        match self.hovered? {
            Target::Region(Region::Title) | Target::Button(_) => {
                let (x, y) = self.position;
                Some(Action::ShowMenu {
                    x: x.round() as i32,
                    y: y.round() as i32,
                })
            }
            _ => None,
        }
    }

    fn is_double_click(&self, time: u32) -> bool {
        let Some(prev) = self.last_title_press else {
            return false;
        };
        let (x, y) = self.position;
        time.wrapping_sub(prev.time) <= self.policy.double_click_ms
            && (x - prev.x).abs() <= self.policy.double_click_distance
            && (y - prev.y).abs() <= self.policy.double_click_distance
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(ClickPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click(tracker: &mut PointerTracker, time: u32) -> Option<Action> {
        let action = tracker.press(PointerButton::Primary, time);
        tracker.release(PointerButton::Primary);
        action
    }

    #[test]
    fn test_resize_edge_press_then_release() {
        let mut tracker = PointerTracker::default();
        let cursor = tracker.enter(Target::Region(Region::EdgeRight), 258.0, 100.0);
        assert_eq!(cursor, "right_side");

        let action = tracker.press(PointerButton::from_code(BTN_LEFT), 10);
        assert_eq!(action, Some(Action::Resize(Region::EdgeRight)));
        assert_eq!(tracker.phase(), PointerPhase::Pressed);

        tracker.release(PointerButton::Primary);
        assert_eq!(tracker.phase(), PointerPhase::Idle);
    }

    #[test]
    fn test_one_action_per_press() {
        let mut tracker = PointerTracker::default();
        tracker.enter(Target::Region(Region::CornerTopLeft), -2.0, -18.0);
        assert!(tracker.press(PointerButton::Primary, 0).is_some());
        assert_eq!(tracker.press(PointerButton::Primary, 5), None);
    }

    #[test]
    fn test_press_without_hover_does_nothing() {
        let mut tracker = PointerTracker::default();
        assert_eq!(tracker.press(PointerButton::Primary, 0), None);
        assert_eq!(tracker.phase(), PointerPhase::Idle);
    }

    #[test]
    fn test_content_press_has_no_action() {
        let mut tracker = PointerTracker::default();
        assert_eq!(tracker.enter(Target::Content, 10.0, 10.0), DEFAULT_CURSOR);
        assert_eq!(tracker.press(PointerButton::Primary, 0), None);
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn test_buttons_map_to_actions() {
        let mut tracker = PointerTracker::default();
        for (button, expected) in [
            (ControlButton::Close, Action::Close),
            (ControlButton::Maximize, Action::ToggleMaximize),
            (ControlButton::Minimize, Action::Minimize),
        ] {
            assert_eq!(tracker.enter(Target::Button(button), 1.0, 1.0), DEFAULT_CURSOR);
            assert_eq!(click(&mut tracker, 0), Some(expected));
        }
    }

    #[test]
    fn test_title_double_click_toggles_maximize() {
        let mut tracker = PointerTracker::default();
        tracker.enter(Target::Region(Region::Title), 40.0, -7.0);
        assert_eq!(click(&mut tracker, 1000), Some(Action::Move));
        tracker.motion(41.0, -6.0);
        assert_eq!(click(&mut tracker, 1200), Some(Action::ToggleMaximize));
        // Third press starts a fresh sequence
        assert_eq!(click(&mut tracker, 1300), Some(Action::Move));
    }

    #[test]
    fn test_slow_or_distant_clicks_move() {
        let mut tracker = PointerTracker::default();
        tracker.enter(Target::Region(Region::Title), 40.0, -7.0);
        assert_eq!(click(&mut tracker, 1000), Some(Action::Move));
        assert_eq!(click(&mut tracker, 1500), Some(Action::Move));

        tracker.motion(80.0, -7.0);
        assert_eq!(click(&mut tracker, 1600), Some(Action::Move));
    }

    #[test]
    fn test_press_elsewhere_breaks_double_click() {
        let mut tracker = PointerTracker::default();
        tracker.enter(Target::Region(Region::Title), 40.0, -7.0);
        assert_eq!(click(&mut tracker, 1000), Some(Action::Move));
        tracker.enter(Target::Region(Region::EdgeTop), 40.0, -17.0);
        click(&mut tracker, 1050);
        tracker.enter(Target::Region(Region::Title), 40.0, -7.0);
        assert_eq!(click(&mut tracker, 1100), Some(Action::Move));
    }

    #[test]
    fn test_leave_clears_hover_by_default() {
        let mut tracker = PointerTracker::default();
        tracker.enter(Target::Region(Region::EdgeLeft), -2.0, 10.0);
        tracker.press(PointerButton::Primary, 0);
        tracker.leave();
        assert_eq!(tracker.phase(), PointerPhase::Idle);
        assert_eq!(tracker.hovered(), None);
        assert_eq!(tracker.press(PointerButton::Primary, 10), None);
    }

    #[test]
    fn test_leave_can_retain_hover() {
        let mut tracker = PointerTracker::new(ClickPolicy {
            retain_hover_on_leave: true,
            ..ClickPolicy::default()
        });
        tracker.enter(Target::Region(Region::EdgeLeft), -2.0, 10.0);
        tracker.press(PointerButton::Primary, 0);
        tracker.leave();
        assert_eq!(tracker.phase(), PointerPhase::Idle);
        assert_eq!(tracker.hovered(), Some(Target::Region(Region::EdgeLeft)));
        assert_eq!(
            tracker.press(PointerButton::Primary, 10),
            Some(Action::Resize(Region::EdgeLeft))
        );
    }

    #[test]
    fn test_secondary_press_on_title_shows_menu() {
        let mut tracker = PointerTracker::default();
        tracker.enter(Target::Region(Region::Title), 30.4, -7.6);
        assert_eq!(
            tracker.press(PointerButton::Secondary, 0),
            Some(Action::ShowMenu { x: 30, y: -8 })
        );
        assert!(!tracker.is_pressed());

        tracker.enter(Target::Region(Region::EdgeBottom), 3.0, 260.0);
        assert_eq!(tracker.press(PointerButton::Secondary, 0), None);
    }

    #[test]
    fn test_other_buttons_are_ignored() {
        let mut tracker = PointerTracker::default();
        tracker.enter(Target::Region(Region::Title), 0.0, -1.0);
        assert_eq!(tracker.press(PointerButton::from_code(0x112), 0), None);
        assert!(!tracker.is_pressed());
    }
}
