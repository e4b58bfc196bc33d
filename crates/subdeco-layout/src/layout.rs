//! Decoration layout
//!
//! Maps a content size and frame thickness onto the rectangles of the title
//! bar, the eight resize zones and the control buttons. All coordinates are
//! relative to the content surface origin, which is also where the
//! subsurfaces get positioned.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::button::{validate_placements, ButtonPlacement, ControlButton, DEFAULT_BUTTON_SIZE};
use crate::error::LayoutError;
use crate::geometry::{extent, Rect, Size};
use crate::interaction::Target;
use crate::region::Region;

/// Smallest content size the layout will produce
pub const DEFAULT_MIN_CONTENT: Size = Size::new(50, 50);

/// Border and title thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMetrics {
    pub border: u32,
    pub title: u32,
}

impl FrameMetrics {
    pub const fn new(border: u32, title: u32) -> Self {
        Self { border, title }
    }

    /// Outer size of content plus decorations
    pub fn frame_size(&self, content: Size) -> Size {
        Size {
            width: content.width.saturating_add(self.border.saturating_mul(2)),
            height: content
                .height
                .saturating_add(self.title)
                .saturating_add(self.border.saturating_mul(2)),
        }
    }

    /// Content width left inside an outer frame width
    pub fn content_width(&self, frame_width: u32) -> u32 {
        frame_width.saturating_sub(self.border.saturating_mul(2))
    }

    /// Content height left inside an outer frame height
    pub fn content_height(&self, frame_height: u32) -> u32 {
        frame_height.saturating_sub(self.title.saturating_add(self.border.saturating_mul(2)))
    }

    /// Inverse of [`FrameMetrics::frame_size`], clamped to `min`
    pub fn content_for_frame(&self, frame: Size, min: Size) -> Size {
        Size::new(self.content_width(frame.width), self.content_height(frame.height)).at_least(min)
    }

    /// Outer frame rectangle relative to the content origin
    pub fn window_geometry(&self, content: Size) -> Rect {
        let b = extent(self.border);
        let t = extent(self.title);
        let frame = self.frame_size(content);
        Rect::new(-b, -t.saturating_add(b), frame.width, frame.height)
    }
}

/// Per-axis clamp of the content size to its minimum
pub fn clamp_content(size: Size, min: Size) -> Size {
    size.at_least(min)
}

/// Rectangle of `region` around content of size `content`
pub fn region_rect(content: Size, metrics: FrameMetrics, region: Region) -> Rect {
    let (w, h) = (content.width, content.height);
    let (b, t) = (metrics.border, metrics.title);
    let (wi, hi) = (extent(w), extent(h));
    let (bi, ti) = (extent(b), extent(t));
    let top = -ti.saturating_add(bi);

    match region {
        Region::Title => Rect::new(0, -ti, w, t),
        Region::EdgeTop => Rect::new(0, top, w, b),
        Region::EdgeBottom => Rect::new(0, hi, w, b),
        Region::EdgeLeft => Rect::new(-bi, -ti, b, h.saturating_add(t)),
        Region::EdgeRight => Rect::new(wi, -ti, b, h.saturating_add(t)),
        Region::CornerTopLeft => Rect::new(-bi, top, b, b),
        Region::CornerTopRight => Rect::new(wi, top, b, b),
        Region::CornerBottomLeft => Rect::new(-bi, hi, b, b),
        Region::CornerBottomRight => Rect::new(wi, hi, b, b),
    }
}

/// Everything needed to lay out a frame apart from the content size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameStyle {
    pub metrics: FrameMetrics,
    pub min_content: Size,
    pub button_size: Size,
    pub placements: Vec<ButtonPlacement>,
}

impl FrameStyle {
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.min_content.width == 0 || self.min_content.height == 0 {
            return Err(LayoutError::EmptyMinimum {
                width: self.min_content.width,
                height: self.min_content.height,
            });
        }
        validate_placements(&self.placements, self.button_size)
    }
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            metrics: FrameMetrics::new(5, 15),
            min_content: DEFAULT_MIN_CONTENT,
            button_size: DEFAULT_BUTTON_SIZE,
            placements: crate::button::default_placements(),
        }
    }
}

/// Stable index of a decoration element.
///
/// Regions occupy ids 0..9 in [`Region::ALL`] order, buttons follow in
/// placement order. Relayout never renumbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Region(Region),
    Button(ControlButton),
}

impl ElementKind {
    pub fn target(self) -> Target {
        match self {
            ElementKind::Region(region) => Target::Region(region),
            ElementKind::Button(button) => Target::Button(button),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Element {
    pub id: ElementId,
    pub kind: ElementKind,
    pub rect: Rect,
}

/// Arena of decoration elements for one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationLayout {
    content: Size,
    metrics: FrameMetrics,
    elements: Vec<Element>,
    buttons: [Option<ElementId>; 3],
}

impl DecorationLayout {
    /// Clamp `content` to the style's minimum and lay out every element.
    /// A button kind placed twice keeps its first placement.
    pub fn compute(content: Size, style: &FrameStyle) -> Self {
        let content = clamp_content(content, style.min_content);
        let metrics = style.metrics;

        let mut elements: Vec<Element> = Region::ALL
            .iter()
            .enumerate()
            .map(|(i, &region)| Element {
                id: ElementId(i),
                kind: ElementKind::Region(region),
                rect: region_rect(content, metrics, region),
            })
            .collect();

        let title = elements[Region::Title.index()].rect;
        let mut buttons = [None; 3];
        for placement in &style.placements {
            let slot = &mut buttons[placement.button.index()];
            if slot.is_some() {
                continue;
            }
            let id = ElementId(elements.len());
            *slot = Some(id);
            elements.push(Element {
                id,
                kind: ElementKind::Button(placement.button),
                rect: placement.rect(title, style.button_size),
            });
        }

        trace!(
            "Laid out {} elements for content {}x{}",
            elements.len(),
            content.width,
            content.height
        );

        Self {
            content,
            metrics,
            elements,
            buttons,
        }
    }

    /// Content size after clamping
    pub fn content(&self) -> Size {
        self.content
    }

    pub fn metrics(&self) -> FrameMetrics {
        self.metrics
    }

    pub fn content_rect(&self) -> Rect {
        Rect::new(0, 0, self.content.width, self.content.height)
    }

    pub fn window_geometry(&self) -> Rect {
        self.metrics.window_geometry(self.content)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn region(&self, region: Region) -> &Element {
        &self.elements[region.index()]
    }

    pub fn button(&self, button: ControlButton) -> Option<&Element> {
        self.buttons[button.index()].and_then(|id| self.element(id))
    }

    pub fn target_of(&self, id: ElementId) -> Option<Target> {
        self.element(id).map(|e| e.kind.target())
    }

    /// Classify a point given in content coordinates.
    ///
    /// Buttons win over the title they sit in; points outside the frame
    /// return `None`.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<Target> {
        if let Some(hit) = self
            .buttons
            .iter()
            .flatten()
            .filter_map(|&id| self.element(id))
            .find(|e| e.rect.contains(x, y))
        {
            return Some(hit.kind.target());
        }

        if let Some(hit) = self.elements[..Region::ALL.len()]
            .iter()
            .find(|e| e.rect.contains(x, y))
        {
            return Some(hit.kind.target());
        }

        if self.content_rect().contains(x, y) {
            Some(Target::Content)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::{ButtonAnchor, ButtonPlacement};

    fn metrics() -> FrameMetrics {
        FrameMetrics::new(5, 15)
    }

    #[test]
    fn test_reference_scenario() {
        let content = Size::new(256, 256);
        assert_eq!(region_rect(content, metrics(), Region::Title), Rect::new(0, -15, 256, 15));
        assert_eq!(
            region_rect(content, metrics(), Region::CornerBottomRight),
            Rect::new(256, 256, 5, 5)
        );
        assert_eq!(region_rect(content, metrics(), Region::EdgeTop), Rect::new(0, -20, 256, 5));
        assert_eq!(region_rect(content, metrics(), Region::EdgeLeft), Rect::new(-5, -15, 5, 271));
        assert_eq!(
            region_rect(content, metrics(), Region::CornerTopLeft),
            Rect::new(-5, -20, 5, 5)
        );
    }

    #[test]
    fn test_left_column_is_contiguous() {
        for &(w, h, b, t) in &[(256, 256, 5, 15), (1, 1, 0, 0), (80, 30, 12, 30), (50, 50, 3, 0)] {
            let content = Size::new(w, h);
            let m = FrameMetrics::new(b, t);
            let corner_top = region_rect(content, m, Region::CornerTopLeft);
            let edge = region_rect(content, m, Region::EdgeLeft);
            let corner_bottom = region_rect(content, m, Region::CornerBottomLeft);
            let bottom = region_rect(content, m, Region::EdgeBottom);

            assert_eq!(corner_top.y, -(t as i32) - b as i32);
            assert_eq!(corner_top.bottom(), edge.y);
            assert_eq!(edge.bottom(), bottom.y);
            assert_eq!(edge.bottom(), corner_bottom.y);
            assert_eq!(corner_bottom.bottom(), h as i32 + b as i32);
        }
    }

    #[test]
    fn test_border_tiles_frame_exactly() {
        for &(w, h, b, t) in &[(256, 256, 5, 15), (50, 50, 1, 1), (640, 480, 8, 24)] {
            let content = Size::new(w, h);
            let m = FrameMetrics::new(b, t);
            let content_rect = Rect::new(0, 0, w, h);
            let rects: Vec<Rect> =
                Region::ALL.iter().map(|&r| region_rect(content, m, r)).collect();

            let covered: u64 = rects.iter().map(|r| r.area()).sum();
            assert_eq!(covered, m.frame_size(content).area() - content.area());

            for (i, a) in rects.iter().enumerate() {
                assert!(!a.intersects(&content_rect), "{:?} overlaps content", Region::ALL[i]);
                for b_rect in &rects[i + 1..] {
                    assert!(!a.intersects(b_rect), "{:?} overlaps {:?}", a, b_rect);
                }
            }

            let geometry = m.window_geometry(content);
            for r in &rects {
                assert!(r.x >= geometry.x && r.right() <= geometry.right());
                assert!(r.y >= geometry.y && r.bottom() <= geometry.bottom());
            }
        }
    }

    #[test]
    fn test_layout_is_pure() {
        let style = FrameStyle::default();
        let a = DecorationLayout::compute(Size::new(300, 200), &style);
        let b = DecorationLayout::compute(Size::new(300, 200), &style);
        assert_eq!(a, b);
    }

    #[test]
    fn test_content_clamped_before_layout() {
        let style = FrameStyle::default();
        let layout = DecorationLayout::compute(Size::new(0, 10), &style);
        assert_eq!(layout.content(), Size::new(50, 50));
        assert_eq!(layout.region(Region::EdgeBottom).rect, Rect::new(0, 50, 50, 5));
        assert!(layout.elements().iter().all(|e| e.rect.width <= 60 && e.rect.height <= 70));
    }

    #[test]
    fn test_zero_thickness_gives_empty_borders() {
        let style = FrameStyle {
            metrics: FrameMetrics::new(0, 15),
            ..FrameStyle::default()
        };
        let layout = DecorationLayout::compute(Size::new(100, 100), &style);
        assert!(layout.region(Region::EdgeLeft).rect.is_empty());
        assert!(layout.region(Region::CornerTopRight).rect.is_empty());
        assert!(!layout.region(Region::Title).rect.is_empty());
    }

    #[test]
    fn test_ids_are_stable_across_relayout() {
        let style = FrameStyle::default();
        let small = DecorationLayout::compute(Size::new(100, 100), &style);
        let large = DecorationLayout::compute(Size::new(900, 700), &style);
        for (a, b) in small.elements().iter().zip(large.elements()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.kind, b.kind);
        }
        assert_eq!(small.region(Region::EdgeRight).id.index(), 4);
        assert_eq!(small.button(ControlButton::Close).map(|e| e.id.index()), Some(9));
    }

    #[test]
    fn test_duplicate_button_keeps_first_placement() {
        let style = FrameStyle {
            placements: vec![
                ButtonPlacement::new(ControlButton::Close, ButtonAnchor::Start, 2, 2),
                ButtonPlacement::new(ControlButton::Close, ButtonAnchor::Start, 40, 2),
            ],
            ..FrameStyle::default()
        };
        let layout = DecorationLayout::compute(Size::new(100, 100), &style);
        assert_eq!(layout.elements().len(), 10);
        assert_eq!(layout.button(ControlButton::Close).map(|e| e.rect.x), Some(2));
        assert!(layout.button(ControlButton::Minimize).is_none());
    }

    #[test]
    fn test_hit_test() {
        let layout = DecorationLayout::compute(Size::new(256, 256), &FrameStyle::default());
        let close = layout.button(ControlButton::Close).map(|e| e.rect).unwrap();

        assert_eq!(
            layout.hit_test(close.x as f64 + 1.0, close.y as f64 + 1.0),
            Some(Target::Button(ControlButton::Close))
        );
        assert_eq!(layout.hit_test(10.0, -5.0), Some(Target::Region(Region::Title)));
        assert_eq!(layout.hit_test(258.0, 100.0), Some(Target::Region(Region::EdgeRight)));
        assert_eq!(layout.hit_test(-1.0, -19.0), Some(Target::Region(Region::CornerTopLeft)));
        assert_eq!(layout.hit_test(128.0, 128.0), Some(Target::Content));
        assert_eq!(layout.hit_test(-6.0, 0.0), None);
        assert_eq!(layout.hit_test(0.0, 261.0), None);
    }

    #[test]
    fn test_frame_size_round_trip() {
        let m = metrics();
        let content = Size::new(256, 256);
        let frame = m.frame_size(content);
        assert_eq!(frame, Size::new(266, 281));
        assert_eq!(m.content_for_frame(frame, DEFAULT_MIN_CONTENT), content);
        assert_eq!(
            m.content_for_frame(Size::new(20, 20), DEFAULT_MIN_CONTENT),
            DEFAULT_MIN_CONTENT
        );
        assert_eq!(m.window_geometry(content), Rect::new(-5, -20, 266, 281));
    }

    #[test]
    fn test_style_validation() {
        assert!(FrameStyle::default().validate().is_ok());
        let style = FrameStyle {
            min_content: Size::new(0, 50),
            ..FrameStyle::default()
        };
        assert_eq!(
            style.validate(),
            Err(LayoutError::EmptyMinimum { width: 0, height: 50 })
        );
    }
}
