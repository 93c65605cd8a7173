use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan_distance(self, other: Point) -> i64 {
        (i64::from(self.x) - i64::from(other.x)).abs()
            + (i64::from(self.y) - i64::from(other.y)).abs()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub const fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }
}

/// Distances between an outer frame and the client area it decorates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Margins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Margins {
    pub const ZERO: Margins = Margins {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    /// Margins between `outer` (frame geometry) and `inner` (client geometry).
    pub fn between(outer: Rect, inner: Rect) -> Self {
        Self {
            left: inner.x - outer.x,
            top: inner.y - outer.y,
            right: outer.right() - inner.right(),
            bottom: outer.bottom() - inner.bottom(),
        }
    }
}

/// Integer rectangle; `right()` and `bottom()` are exclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.w, size.h)
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    pub const fn right(&self) -> i32 {
        self.x + self.w
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.h
    }

    pub const fn center(&self) -> Point {
        Point::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    pub const fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    pub fn margins_removed(&self, margins: Margins) -> Rect {
        Rect::new(
            self.x + margins.left,
            self.y + margins.top,
            self.w - margins.left - margins.right,
            self.h - margins.top - margins.bottom,
        )
    }

    pub fn translated(&self, by: Point) -> Rect {
        Rect::new(self.x + by.x, self.y + by.y, self.w, self.h)
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// A `size` rectangle centered inside `self`, never starting before its top-left.
    pub fn centered(&self, size: Size) -> Rect {
        Rect::new(
            self.x + ((self.w - size.w) / 2).max(0),
            self.y + ((self.h - size.h) / 2).max(0),
            size.w,
            size.h,
        )
    }
}

/// A display as reported by the windowing toolkit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Monitor {
    pub name: String,
    /// Full monitor rectangle in global desktop coordinates.
    pub geometry: Rect,
    /// `geometry` minus taskbars, docks and other reserved regions.
    pub available: Rect,
    #[serde(default)]
    pub primary: bool,
}

impl Monitor {
    pub fn new(name: impl Into<String>, geometry: Rect, available: Rect) -> Self {
        Self {
            name: name.into(),
            geometry,
            available,
            primary: false,
        }
    }

    #[must_use]
    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    pub fn center(&self) -> Point {
        self.geometry.center()
    }
}

/// The primary monitor, or the first one when none is flagged.
pub fn primary_monitor(monitors: &[Monitor]) -> Option<&Monitor> {
    monitors
        .iter()
        .find(|m| m.primary)
        .or_else(|| monitors.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_never_starts_before_origin() {
        let area = Rect::new(100, 50, 600, 400);
        assert_eq!(area.centered(Size::new(400, 200)), Rect::new(200, 150, 400, 200));
        assert_eq!(area.centered(Size::new(800, 600)), Rect::new(100, 50, 800, 600));
    }

    #[test]
    fn margins_between_frame_and_client() {
        let outer = Rect::new(0, 0, 820, 640);
        let inner = Rect::new(10, 30, 800, 600);
        let m = Margins::between(outer, inner);
        assert_eq!(
            m,
            Margins {
                left: 10,
                top: 30,
                right: 10,
                bottom: 10
            }
        );
        assert_eq!(outer.margins_removed(m), inner);
    }

    #[test]
    fn primary_falls_back_to_first() {
        let a = Monitor::new("A", Rect::new(0, 0, 10, 10), Rect::new(0, 0, 10, 10));
        let b = Monitor::new("B", Rect::new(10, 0, 10, 10), Rect::new(10, 0, 10, 10));
        let monitors = vec![a.clone(), b.clone()];
        assert_eq!(primary_monitor(&monitors), Some(&a));

        let monitors = vec![a, b.clone().with_primary(true)];
        assert_eq!(primary_monitor(&monitors).map(|m| m.name.as_str()), Some("B"));
        assert_eq!(primary_monitor(&[]), None);
    }
}
