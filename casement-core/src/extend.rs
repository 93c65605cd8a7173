//! Widening the window when a right column appears.

use crate::geometry::Rect;

/// How much wider the body may grow on a desktop of `desktop` size.
pub fn maximal_extend_by(desktop: Rect, body_width: i32) -> i32 {
    (desktop.w - body_width).max(0)
}

/// Whether `inner` can grow by `extend_by` without moving its left edge.
pub fn can_extend_no_move(inner: Rect, desktop: Rect, extend_by: i32) -> bool {
    inner.right() + extend_by <= desktop.right()
}

/// Grow `inner` by up to `add_to_width`, moving it left if the right edge
/// would leave `desktop`. Returns the new rectangle and the width actually added.
pub fn extend_width(inner: Rect, desktop: Rect, add_to_width: i32) -> (Rect, i32) {
    let add = add_to_width.min(maximal_extend_by(desktop, inner.w));
    let new_width = inner.w + add;
    let new_left = inner.x.min(desktop.right() - new_width);
    (Rect::new(new_left, inner.y, new_width, inner.h), add)
}
