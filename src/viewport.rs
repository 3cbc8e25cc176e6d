//! Scroll viewport: proportional scrollbar and list virtualization
//!
//! [`ScrollViewport`] turns content size, viewport size and raw pointer
//! values into a clamped scroll offset, a thumb rectangle and a row window
//! for virtualized rendering. It never polls an input device; the caller
//! samples the pointer once per frame and passes it in as plain data, so
//! the whole state machine is unit-testable without a terminal or window.
//!
//! Units are abstract "pixels". The terminal frontend feeds cell
//! coordinates (row height 1-3 cells); the tests use the original pixel
//! geometry.

/// Default minimum thumb extent so the thumb stays grabbable even for very
/// long content.
pub const MIN_THUMB_EXTENT: f32 = 30.0;

/// Default scroll distance applied per wheel notch.
pub const DEFAULT_WHEEL_STEP: f32 = 30.0;

/// A 2D position in viewport units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in viewport units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `p` falls inside the rectangle (top/left inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Pointer state for one frame, sampled by the input layer.
///
/// `pressed`/`released` are edge flags (the button changed state this
/// frame); `wheel` is in notches, positive meaning scroll-up.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerInput {
    pub position: Point,
    pub pressed: bool,
    pub released: bool,
    pub wheel: f32,
}

impl PointerInput {
    /// Button went down at `(x, y)` this frame.
    pub fn press(x: f32, y: f32) -> Self {
        Self {
            position: Point::new(x, y),
            pressed: true,
            ..Self::default()
        }
    }

    /// Button went up at `(x, y)` this frame.
    pub fn release(x: f32, y: f32) -> Self {
        Self {
            position: Point::new(x, y),
            released: true,
            ..Self::default()
        }
    }

    /// Pointer moved to `(x, y)` with no button change.
    pub fn move_to(x: f32, y: f32) -> Self {
        Self {
            position: Point::new(x, y),
            ..Self::default()
        }
    }

    /// Wheel turned by `notches` with the pointer at `(x, y)`.
    pub fn wheel(x: f32, y: f32, notches: f32) -> Self {
        Self {
            position: Point::new(x, y),
            wheel: notches,
            ..Self::default()
        }
    }
}

/// Which logical rows are visible and how far the top row is clipped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowWindow {
    /// Index of the first (possibly clipped) visible row.
    pub first_index: usize,
    /// How many units of the first row lie above the viewport top.
    pub offset_within_row: f32,
    /// Upper bound on rows to render; covers the partially clipped row at
    /// the bottom edge.
    pub max_visible: usize,
}

/// Stateful scrollbar and virtualization controller for one view.
///
/// When `content_extent <= visible_extent` the viewport is inert: no
/// thumb, `max_scroll == 0`, all input ignored and the offset pinned to 0.
#[derive(Clone, Debug)]
pub struct ScrollViewport {
    track: Rect,
    content_extent: f32,
    visible_extent: f32,
    scroll_offset: f32,
    max_scroll: f32,
    dragging: bool,
    drag_anchor: f32,
    min_thumb_extent: f32,
    wheel_step: f32,
}

impl Default for ScrollViewport {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollViewport {
    pub fn new() -> Self {
        Self::with_metrics(MIN_THUMB_EXTENT, DEFAULT_WHEEL_STEP)
    }

    /// Create a viewport with a custom minimum thumb size and wheel step.
    ///
    /// The terminal frontend uses cell units, where the 30-unit defaults
    /// would dwarf the track.
    pub fn with_metrics(min_thumb_extent: f32, wheel_step: f32) -> Self {
        Self {
            track: Rect::default(),
            content_extent: 0.0,
            visible_extent: 0.0,
            scroll_offset: 0.0,
            max_scroll: 0.0,
            dragging: false,
            drag_anchor: 0.0,
            min_thumb_extent,
            wheel_step,
        }
    }

    /// Recompute geometry after content length or viewport bounds change.
    ///
    /// Clamps the current offset into the new `[0, max_scroll]` range, so
    /// shrinking content never leaves the view past the end. Calling this
    /// twice with the same arguments changes nothing.
    pub fn set_layout(&mut self, track: Rect, content_extent: f32, visible_extent: f32) {
        self.track = track;
        self.content_extent = content_extent.max(0.0);
        self.visible_extent = visible_extent.max(0.0);
        self.max_scroll = (self.content_extent - self.visible_extent).max(0.0);
        if self.is_inert() {
            self.scroll_offset = 0.0;
            self.dragging = false;
        } else {
            self.scroll_offset = self.scroll_offset.clamp(0.0, self.max_scroll);
        }
    }

    /// True when all content fits and no scrolling is possible.
    pub fn is_inert(&self) -> bool {
        self.content_extent <= self.visible_extent
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn max_scroll(&self) -> f32 {
        self.max_scroll
    }

    pub fn content_extent(&self) -> f32 {
        self.content_extent
    }

    pub fn visible_extent(&self) -> f32 {
        self.visible_extent
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Thumb length: the visible fraction of content projected onto the
    /// track, never below the configured minimum.
    pub fn thumb_extent(&self) -> f32 {
        if self.is_inert() || self.content_extent <= 0.0 {
            return 0.0;
        }
        let proportional = self.visible_extent * self.visible_extent / self.content_extent;
        proportional.max(self.min_thumb_extent)
    }

    /// Thumb rectangle in track coordinates, or `None` when inert.
    pub fn thumb_rect(&self) -> Option<Rect> {
        if self.is_inert() {
            return None;
        }
        let extent = self.thumb_extent();
        let range = self.track.height - extent;
        let top = if self.max_scroll > 0.0 && range > 0.0 {
            self.track.y + self.scroll_offset * range / self.max_scroll
        } else {
            self.track.y
        };
        Some(Rect::new(self.track.x, top, self.track.width, extent))
    }

    /// Scroll by a signed distance, clamped to the valid range.
    pub fn scroll_by(&mut self, delta: f32) {
        if self.is_inert() {
            return;
        }
        self.scroll_offset = (self.scroll_offset + delta).clamp(0.0, self.max_scroll);
    }

    /// Jump to an absolute offset, clamped to the valid range.
    pub fn scroll_to(&mut self, offset: f32) {
        if self.is_inert() {
            return;
        }
        self.scroll_offset = offset.clamp(0.0, self.max_scroll);
    }

    /// Feed one frame of pointer state.
    ///
    /// `content_area` is the scrollable region the wheel acts over; wheel
    /// input outside it (including over the scrollbar itself) is ignored.
    pub fn handle_pointer(&mut self, input: &PointerInput, content_area: Rect) {
        if self.is_inert() {
            self.dragging = false;
            return;
        }

        let extent = self.thumb_extent();

        if input.pressed {
            if let Some(thumb) = self.thumb_rect() {
                if thumb.contains(input.position) {
                    self.dragging = true;
                    self.drag_anchor = input.position.y - thumb.y;
                } else if self.track.contains(input.position) {
                    // Discrete jump: center the thumb on the click point,
                    // clamped to the track.
                    let top = input.position.y - self.track.y - extent / 2.0;
                    self.scroll_offset = self.offset_for_thumb_top(top, extent);
                }
            }
        }

        if input.released {
            self.dragging = false;
        }

        if self.dragging {
            let top = input.position.y - self.drag_anchor - self.track.y;
            self.scroll_offset = self.offset_for_thumb_top(top, extent);
        }

        if input.wheel != 0.0 && content_area.contains(input.position) {
            self.scroll_by(-input.wheel * self.wheel_step);
        }
    }

    /// Linear thumb-position to scroll-offset mapping, track-relative.
    fn offset_for_thumb_top(&self, top: f32, extent: f32) -> f32 {
        let range = self.track.height - extent;
        if range <= 0.0 {
            return 0.0;
        }
        let top = top.clamp(0.0, range);
        (top * self.max_scroll / range).clamp(0.0, self.max_scroll)
    }

    /// Virtualization query: which rows intersect the viewport.
    pub fn row_window(&self, row_height: f32) -> RowWindow {
        if row_height <= 0.0 {
            return RowWindow {
                first_index: 0,
                offset_within_row: 0.0,
                max_visible: 0,
            };
        }
        RowWindow {
            first_index: (self.scroll_offset / row_height) as usize,
            offset_within_row: self.scroll_offset % row_height,
            max_visible: (self.visible_extent / row_height).ceil() as usize + 1,
        }
    }

    /// Map a click inside the content area to a logical row index.
    ///
    /// Returns `None` when the computed index is outside `0..row_count`.
    pub fn clicked_row(
        &self,
        pointer_y: f32,
        viewport_top: f32,
        row_height: f32,
        row_count: usize,
    ) -> Option<usize> {
        if row_height <= 0.0 {
            return None;
        }
        let rel = pointer_y - viewport_top + self.scroll_offset;
        if rel < 0.0 {
            return None;
        }
        let index = (rel / row_height) as usize;
        (index < row_count).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport_3000_500() -> ScrollViewport {
        let mut vp = ScrollViewport::new();
        vp.set_layout(Rect::new(990.0, 100.0, 12.0, 500.0), 3000.0, 500.0);
        vp
    }

    #[test]
    fn test_inert_when_content_fits() {
        let mut vp = ScrollViewport::new();
        vp.set_layout(Rect::new(0.0, 0.0, 12.0, 500.0), 400.0, 500.0);
        assert!(vp.is_inert());
        assert_eq!(vp.max_scroll(), 0.0);
        assert!(vp.thumb_rect().is_none());

        // Wheel and drag input must not change state.
        vp.handle_pointer(
            &PointerInput::wheel(100.0, 100.0, -3.0),
            Rect::new(0.0, 0.0, 900.0, 500.0),
        );
        assert_eq!(vp.scroll_offset(), 0.0);
        vp.handle_pointer(
            &PointerInput::press(5.0, 10.0),
            Rect::new(0.0, 0.0, 900.0, 500.0),
        );
        assert!(!vp.is_dragging());
    }

    #[test]
    fn test_inert_forces_offset_to_zero() {
        let mut vp = viewport_3000_500();
        vp.scroll_to(1000.0);
        assert_eq!(vp.scroll_offset(), 1000.0);
        // Content shrinks below the viewport: offset resets.
        vp.set_layout(Rect::new(990.0, 100.0, 12.0, 500.0), 300.0, 500.0);
        assert_eq!(vp.scroll_offset(), 0.0);
    }

    #[test]
    fn test_max_scroll_and_thumb_extent() {
        let vp = viewport_3000_500();
        assert_eq!(vp.max_scroll(), 2500.0);
        // visible^2 / content = 500*500/3000
        assert!((vp.thumb_extent() - 83.3333).abs() < 0.001);
    }

    #[test]
    fn test_thumb_extent_clamps_to_minimum() {
        let mut vp = ScrollViewport::new();
        vp.set_layout(Rect::new(0.0, 0.0, 12.0, 100.0), 100_000.0, 100.0);
        assert_eq!(vp.thumb_extent(), MIN_THUMB_EXTENT);
    }

    #[test]
    fn test_wheel_scroll_scenario() {
        let mut vp = viewport_3000_500();
        let content = Rect::new(10.0, 100.0, 960.0, 500.0);
        vp.handle_pointer(&PointerInput::wheel(400.0, 300.0, -3.0), content);
        assert_eq!(vp.scroll_offset(), 90.0);

        let window = vp.row_window(30.0);
        assert_eq!(window.first_index, 3);
        assert_eq!(window.offset_within_row, 0.0);
        assert_eq!(window.max_visible, 18); // ceil(500/30) + 1
    }

    #[test]
    fn test_wheel_ignored_outside_content_area() {
        let mut vp = viewport_3000_500();
        let content = Rect::new(10.0, 100.0, 960.0, 500.0);
        vp.handle_pointer(&PointerInput::wheel(995.0, 300.0, -3.0), content);
        assert_eq!(vp.scroll_offset(), 0.0);
    }

    #[test]
    fn test_wheel_clamps_at_both_ends() {
        let mut vp = viewport_3000_500();
        let content = Rect::new(10.0, 100.0, 960.0, 500.0);
        vp.handle_pointer(&PointerInput::wheel(400.0, 300.0, 5.0), content);
        assert_eq!(vp.scroll_offset(), 0.0);
        vp.handle_pointer(&PointerInput::wheel(400.0, 300.0, -1000.0), content);
        assert_eq!(vp.scroll_offset(), 2500.0);
    }

    #[test]
    fn test_drag_sequence_follows_linear_mapping() {
        let mut vp = viewport_3000_500();
        let content = Rect::new(10.0, 100.0, 960.0, 500.0);
        let thumb = vp.thumb_rect().unwrap();

        // Press 10 units below the thumb top.
        vp.handle_pointer(&PointerInput::press(995.0, thumb.y + 10.0), content);
        assert!(vp.is_dragging());

        // Move so the thumb top lands 100 units down the track.
        vp.handle_pointer(&PointerInput::move_to(995.0, 100.0 + 100.0 + 10.0), content);
        let extent = vp.thumb_extent();
        let expected = 100.0 * vp.max_scroll() / (500.0 - extent);
        assert!((vp.scroll_offset() - expected).abs() < 0.001);

        // Release ends the drag regardless of pointer position.
        vp.handle_pointer(&PointerInput::release(0.0, 0.0), content);
        assert!(!vp.is_dragging());
        assert!(vp.scroll_offset() >= 0.0 && vp.scroll_offset() <= vp.max_scroll());
    }

    #[test]
    fn test_drag_clamps_past_track_ends() {
        let mut vp = viewport_3000_500();
        let content = Rect::new(10.0, 100.0, 960.0, 500.0);
        let thumb = vp.thumb_rect().unwrap();
        vp.handle_pointer(&PointerInput::press(995.0, thumb.y + 1.0), content);
        vp.handle_pointer(&PointerInput::move_to(995.0, 10_000.0), content);
        assert_eq!(vp.scroll_offset(), vp.max_scroll());
        vp.handle_pointer(&PointerInput::move_to(995.0, -10_000.0), content);
        assert_eq!(vp.scroll_offset(), 0.0);
    }

    #[test]
    fn test_track_click_centers_thumb() {
        let mut vp = viewport_3000_500();
        let content = Rect::new(10.0, 100.0, 960.0, 500.0);
        // Click at the very bottom of the track, outside the thumb.
        vp.handle_pointer(&PointerInput::press(995.0, 599.0), content);
        assert!(!vp.is_dragging());
        assert_eq!(vp.scroll_offset(), vp.max_scroll());
    }

    #[test]
    fn test_track_click_midpoint_maps_linearly() {
        let mut vp = viewport_3000_500();
        let content = Rect::new(10.0, 100.0, 960.0, 500.0);
        let extent = vp.thumb_extent();
        // Click so the centered thumb top sits exactly mid-range.
        let range = 500.0 - extent;
        let click_y = 100.0 + range / 2.0 + extent / 2.0;
        vp.handle_pointer(&PointerInput::press(995.0, click_y), content);
        assert!((vp.scroll_offset() - 1250.0).abs() < 0.001);
    }

    #[test]
    fn test_degenerate_track_maps_to_zero() {
        // Thumb as tall as the track: the mapping range collapses and the
        // offset must stay 0 rather than dividing by zero.
        let mut vp = ScrollViewport::with_metrics(40.0, 30.0);
        vp.set_layout(Rect::new(0.0, 0.0, 12.0, 40.0), 50.0, 40.0);
        assert_eq!(vp.thumb_extent(), 40.0);
        vp.handle_pointer(
            &PointerInput::press(5.0, 39.0),
            Rect::new(0.0, 0.0, 900.0, 40.0),
        );
        vp.handle_pointer(
            &PointerInput::move_to(5.0, 200.0),
            Rect::new(0.0, 0.0, 900.0, 40.0),
        );
        assert_eq!(vp.scroll_offset(), 0.0);
    }

    #[test]
    fn test_set_layout_is_idempotent() {
        let mut vp = viewport_3000_500();
        vp.scroll_to(700.0);
        let before = (vp.scroll_offset(), vp.max_scroll(), vp.thumb_extent());
        vp.set_layout(Rect::new(990.0, 100.0, 12.0, 500.0), 3000.0, 500.0);
        vp.set_layout(Rect::new(990.0, 100.0, 12.0, 500.0), 3000.0, 500.0);
        let after = (vp.scroll_offset(), vp.max_scroll(), vp.thumb_extent());
        assert_eq!(before, after);
    }

    #[test]
    fn test_shrinking_content_clamps_offset() {
        let mut vp = viewport_3000_500();
        vp.scroll_to(2500.0);
        vp.set_layout(Rect::new(990.0, 100.0, 12.0, 500.0), 1000.0, 500.0);
        assert_eq!(vp.scroll_offset(), 500.0);
    }

    #[test]
    fn test_clicked_row_scenario() {
        let mut vp = ScrollViewport::new();
        vp.set_layout(Rect::new(990.0, 120.0, 12.0, 500.0), 3000.0, 500.0);
        vp.scroll_to(60.0);
        // (245 - 120 + 60) / 45 = 4
        assert_eq!(vp.clicked_row(245.0, 120.0, 45.0, 10), Some(4));
    }

    #[test]
    fn test_clicked_row_out_of_range() {
        let mut vp = ScrollViewport::new();
        vp.set_layout(Rect::new(990.0, 120.0, 12.0, 500.0), 3000.0, 500.0);
        assert_eq!(vp.clicked_row(121.0, 120.0, 30.0, 0), None);
        assert_eq!(vp.clicked_row(100.0, 120.0, 30.0, 10), None);
        assert_eq!(vp.clicked_row(120.0 + 30.0 * 99.0, 120.0, 30.0, 10), None);
    }

    #[test]
    fn test_row_window_partial_row_offset() {
        let mut vp = viewport_3000_500();
        vp.scroll_to(95.0);
        let window = vp.row_window(30.0);
        assert_eq!(window.first_index, 3);
        assert_eq!(window.offset_within_row, 5.0);
    }

    #[test]
    fn test_inert_row_window_starts_at_zero() {
        let mut vp = ScrollViewport::new();
        vp.set_layout(Rect::new(0.0, 0.0, 12.0, 500.0), 200.0, 500.0);
        let window = vp.row_window(30.0);
        assert_eq!(window.first_index, 0);
        assert_eq!(window.offset_within_row, 0.0);
    }
}
