use crate::geometry::Size;

/// Pieces of the main window that raise its minimum size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeAdditions {
    /// Width of the chat-folder strip, `0` when hidden.
    pub filters_width: i32,
    pub right_column_width: i32,
    /// Height of the "outdated system" bar, `0` when hidden.
    pub outdated_bar_height: i32,
}

pub fn compute_min_size(base: Size, additions: SizeAdditions) -> Size {
    Size::new(
        base.w + additions.filters_width + additions.right_column_width,
        base.h + additions.outdated_bar_height,
    )
}
