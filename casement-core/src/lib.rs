//! Window geometry for the main messaging window: remembering where it was,
//! and putting it back somewhere sensible on whatever monitors exist now.

pub mod checksum;
pub mod constraints;
pub mod extend;
pub mod geometry;
pub mod position;
pub mod reconcile;

pub use checksum::screen_name_checksum;
pub use constraints::{SizeAdditions, compute_min_size};
pub use extend::{can_extend_no_move, extend_width, maximal_extend_by};
pub use geometry::{Margins, Monitor, Point, Rect, Size, primary_monitor};
pub use position::{WindowPosition, scale_position};
pub use reconcile::{
    SaveInput, WindowState, compute_initial_geometry, default_geometry, nearest_monitor,
    reconcile_on_save,
};

/// Delay between the last move/resize notification and the position write.
pub const SAVE_WINDOW_POSITION_TIMEOUT_MS: u64 = 1000;
