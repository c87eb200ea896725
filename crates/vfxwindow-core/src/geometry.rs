use tracing::debug;

use crate::error::{Result, WindowError};

/// Rectangle of screen space covered by one monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Display {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub primary: bool,
}

impl Display {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            primary: false,
        }
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    fn left(&self) -> i64 {
        i64::from(self.x)
    }

    fn top(&self) -> i64 {
        i64::from(self.y)
    }

    fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width.max(0))
    }

    fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height.max(0))
    }

    /// Whether the whole window lies on this display.
    pub fn contains(&self, window: &WindowGeometry) -> bool {
        window.left() >= self.left()
            && window.top() >= self.top()
            && window.right() <= self.right()
            && window.bottom() <= self.bottom()
    }

    /// Area of the window that lies on this display.
    pub fn overlap_area(&self, window: &WindowGeometry) -> i64 {
        let w = self.right().min(window.right()) - self.left().max(window.left());
        let h = self.bottom().min(window.bottom()) - self.top().max(window.top());
        if w <= 0 || h <= 0 {
            return 0;
        }
        w * h
    }
}

/// Position and size of a window in pixels.
///
/// A width or height of zero or less means "size unknown": only the
/// top-left point takes part in placement on that axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowGeometry {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn left(&self) -> i64 {
        i64::from(self.x)
    }

    fn top(&self) -> i64 {
        i64::from(self.y)
    }

    fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width.max(0))
    }

    fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height.max(0))
    }
}

/// Anything that can enumerate the displays currently attached.
///
/// Implementations must query on every call; monitors come and go between
/// two placements.
pub trait DisplaySource {
    fn displays(&self) -> Vec<Display>;
}

impl DisplaySource for Vec<Display> {
    fn displays(&self) -> Vec<Display> {
        self.clone()
    }
}

/// Display used when a window touches none: the primary one, else the first.
pub fn fallback_display(displays: &[Display]) -> Option<&Display> {
    displays
        .iter()
        .find(|display| display.primary)
        .or_else(|| displays.first())
}

/// Centre a window of the given size on a display, never left of or above
/// its origin.
pub fn center_on(display: &Display, width: i32, height: i32) -> (i32, i32) {
    (
        center_axis(display.left(), display.right(), width),
        center_axis(display.top(), display.bottom(), height),
    )
}

fn center_axis(start: i64, end: i64, len: i32) -> i32 {
    let offset = (end - start - i64::from(len.max(0))) / 2;
    to_coordinate(start + offset.max(0))
}

fn to_coordinate(pos: i64) -> i32 {
    pos.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Return a top-left position that keeps the window visible.
///
/// Displays are queried from `source` on every call. A window lying wholly
/// on one display keeps its position. A window straddling displays is pulled
/// onto the one it overlaps most, and a window touching none is moved onto
/// the fallback display. In both cases each edge that would leave the
/// display ends up `padding` pixels inside it.
pub fn clamp_to_visible_area(
    source: &dyn DisplaySource,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    padding: u32,
) -> Result<(i32, i32)> {
    let displays = source.displays();
    clamp_to_displays(&displays, x, y, width, height, padding)
}

/// [`clamp_to_visible_area`] against an already enumerated display list.
pub fn clamp_to_displays(
    displays: &[Display],
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    padding: u32,
) -> Result<(i32, i32)> {
    let window = WindowGeometry::new(x, y, width, height);

    if displays.iter().any(|display| display.contains(&window)) {
        return Ok((x, y));
    }

    // rev() so that ties go to the display enumerated first
    let target = displays
        .iter()
        .rev()
        .filter(|display| display.overlap_area(&window) > 0)
        .max_by_key(|display| display.overlap_area(&window))
        .or_else(|| fallback_display(displays))
        .ok_or(WindowError::NoDisplayAvailable)?;

    let padding = i64::from(padding);
    let clamped = (
        clamp_axis(window.left(), window.right() - window.left(), target.left(), target.right(), padding),
        clamp_axis(window.top(), window.bottom() - window.top(), target.top(), target.bottom(), padding),
    );
    debug!(
        "Clamped window ({}, {}, {}x{}) onto display ({}, {}, {}x{}) -> ({}, {})",
        x, y, width, height, target.x, target.y, target.width, target.height, clamped.0, clamped.1
    );
    Ok(clamped)
}

fn clamp_axis(pos: i64, len: i64, start: i64, end: i64, padding: i64) -> i32 {
    let lo = start + padding;
    let hi = end - padding - len;
    let pos = if hi < lo { lo } else { pos.clamp(lo, hi) };
    to_coordinate(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn full_hd() -> Vec<Display> {
        vec![Display::new(0, 0, 1920, 1080).with_primary(true)]
    }

    fn dual() -> Vec<Display> {
        vec![
            Display::new(0, 0, 1920, 1080).with_primary(true),
            Display::new(1920, 0, 1280, 1024),
        ]
    }

    #[test]
    fn test_window_on_display_is_untouched() {
        assert_eq!(clamp_to_visible_area(&full_hd(), 100, 200, 400, 300, 5).unwrap(), (100, 200));
        // touching the edges is still fully visible
        assert_eq!(clamp_to_visible_area(&full_hd(), 0, 0, 1920, 1080, 5).unwrap(), (0, 0));
    }

    #[test]
    fn test_window_left_of_screen() {
        let (x, y) = clamp_to_visible_area(&full_hd(), -500, 300, 400, 300, 5).unwrap();
        assert_eq!(x, 5);
        assert_eq!(y, 300);
    }

    #[test]
    fn test_window_past_bottom_right() {
        let (x, y) = clamp_to_visible_area(&full_hd(), 3000, 2000, 400, 300, 5).unwrap();
        assert_eq!(x + 400, 1920 - 5);
        assert_eq!(y + 300, 1080 - 5);
    }

    #[test]
    fn test_partially_visible_window_is_pulled_in() {
        assert_eq!(clamp_to_visible_area(&full_hd(), 1800, 100, 400, 300, 5).unwrap(), (1515, 100));
        assert_eq!(clamp_to_visible_area(&full_hd(), 100, -40, 400, 300, 5).unwrap(), (100, 5));
    }

    #[test]
    fn test_secondary_display_is_kept() {
        assert_eq!(clamp_to_visible_area(&dual(), 2000, 100, 400, 300, 5).unwrap(), (2000, 100));
    }

    #[test]
    fn test_straddling_window_goes_to_larger_overlap() {
        // 300px on the right display, 100px on the left one
        let (x, y) = clamp_to_visible_area(&dual(), 1820, 100, 400, 300, 5).unwrap();
        assert_eq!((x, y), (1925, 100));
    }

    #[test]
    fn test_disconnected_monitor_falls_back_to_primary() {
        let displays = vec![
            Display::new(-1280, 0, 1280, 1024),
            Display::new(0, 0, 1920, 1080).with_primary(true),
        ];
        let (x, y) = clamp_to_visible_area(&displays, 4000, 200, 400, 300, 5).unwrap();
        assert_eq!((x, y), (1515, 200));
    }

    #[test]
    fn test_fallback_without_primary_uses_first() {
        let displays = vec![Display::new(100, 100, 800, 600), Display::new(900, 100, 800, 600)];
        assert_eq!(fallback_display(&displays), Some(&displays[0]));
        let (x, y) = clamp_to_visible_area(&displays, -2000, -2000, 200, 200, 5).unwrap();
        assert_eq!((x, y), (105, 105));
    }

    #[test]
    fn test_window_larger_than_display_anchors_at_origin() {
        let (x, y) = clamp_to_visible_area(&full_hd(), 300, 300, 2500, 1500, 5).unwrap();
        assert_eq!((x, y), (5, 5));
    }

    #[test]
    fn test_unknown_size_only_clamps_position() {
        assert_eq!(clamp_to_visible_area(&full_hd(), -50, 50, 0, 0, 5).unwrap(), (5, 50));
        assert_eq!(clamp_to_visible_area(&full_hd(), 5000, 50, -1, -1, 5).unwrap(), (1915, 50));
        assert_eq!(clamp_to_visible_area(&full_hd(), 60, 70, -1, 0, 5).unwrap(), (60, 70));
    }

    #[test]
    fn test_no_display() {
        assert!(matches!(
            clamp_to_visible_area(&Vec::<Display>::new(), 0, 0, 100, 100, 5),
            Err(WindowError::NoDisplayAvailable)
        ));
    }

    struct Hotplug {
        displays: RefCell<Vec<Display>>,
        queries: RefCell<usize>,
    }

    impl DisplaySource for Hotplug {
        fn displays(&self) -> Vec<Display> {
            *self.queries.borrow_mut() += 1;
            self.displays.borrow().clone()
        }
    }

    #[test]
    fn test_displays_are_queried_every_call() {
        let source = Hotplug {
            displays: RefCell::new(dual()),
            queries: RefCell::new(0),
        };
        assert_eq!(clamp_to_visible_area(&source, 2000, 100, 400, 300, 5).unwrap(), (2000, 100));

        source.displays.borrow_mut().pop();
        assert_eq!(clamp_to_visible_area(&source, 2000, 100, 400, 300, 5).unwrap(), (1515, 100));
        assert_eq!(*source.queries.borrow(), 2);
    }

    #[test]
    fn test_center_on() {
        let display = Display::new(1920, 0, 1280, 1024);
        assert_eq!(center_on(&display, 400, 300), (1920 + 440, 362));
        assert_eq!(center_on(&display, 2000, 2000), (1920, 0));
    }

    #[test]
    fn test_center_on_display_at_coordinate_limits() {
        let display = Display::new(i32::MAX - 100, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!(center_on(&display, 100, 100), (i32::MAX, -1_073_741_875));

        let empty = Display::new(-50, -60, -10, 0);
        assert_eq!(center_on(&empty, 400, 300), (-50, -60));
    }
}
