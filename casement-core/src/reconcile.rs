use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    checksum::screen_name_checksum,
    geometry::{Margins, Monitor, Point, Rect, Size, primary_monitor},
    position::WindowPosition,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    Fullscreen,
}

/// Snapshot of the window taken when a debounced save fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveInput {
    /// Client area in global desktop coordinates.
    pub body: Rect,
    pub state: WindowState,
    pub visible: bool,
    pub position_inited: bool,
    /// Width of an optional right column; it is not part of the remembered size.
    pub right_column_width: i32,
}

/// Default placement: `default_size` centered in the primary monitor's available area.
pub fn default_geometry(monitors: &[Monitor], default_size: Size) -> Rect {
    primary_monitor(monitors)
        .map(|m| m.available.centered(default_size))
        .unwrap_or_else(|| Rect::from_origin_size(Point::default(), default_size))
}

/// Monitor whose geometry center is closest (Manhattan) to `point`; first wins on ties.
pub fn nearest_monitor(monitors: &[Monitor], point: Point) -> Option<&Monitor> {
    let mut chosen: Option<(&Monitor, i64)> = None;
    for monitor in monitors {
        let delta = monitor.center().manhattan_distance(point);
        if chosen.is_none_or(|(_, min_delta)| delta < min_delta) {
            chosen = Some((monitor, delta));
        }
    }
    chosen.map(|(monitor, _)| monitor)
}

/// Fit `[start, start + len)` into `[area_start, area_start + area_len)`:
/// shift back first, shrink only when shifting would cross `area_start`.
///
/// Arithmetic is in `i64`: `start` and `len` are unchecked values from disk.
fn fit_span(start: i64, len: i64, area_start: i64, area_len: i64) -> (i64, i64) {
    let area_end = area_start + area_len;
    let end = start + len;
    if end <= area_end {
        return (start, len);
    }
    let shifted = start - (end - area_end);
    if shifted >= area_start {
        (shifted, len)
    } else {
        let overflow = area_start + len - area_end;
        (area_start, len - overflow)
    }
}

/// Turn a remembered position into a global rectangle valid for `monitors`.
///
/// Falls back to [`default_geometry`] whenever the record is empty, its
/// monitor is gone, the monitor is too small, or the fitted window would not
/// leave room for `min_size` on that monitor.
pub fn compute_initial_geometry(
    saved: WindowPosition,
    monitors: &[Monitor],
    default_size: Size,
    min_size: Size,
    frame: Margins,
) -> Rect {
    let initial = default_geometry(monitors, default_size);
    if !saved.has_size() {
        debug!("Window Pos: no saved size, using default {:?}", initial);
        return initial;
    }

    let Some(monitor) = monitors
        .iter()
        .find(|m| screen_name_checksum(&m.name) == saved.monitor_checksum)
    else {
        debug!(
            checksum = saved.monitor_checksum,
            "Window Pos: saved monitor not found, using default"
        );
        return initial;
    };

    let screen = monitor.geometry;
    let space = monitor.available.margins_removed(frame);
    debug!(monitor = %monitor.name, ?screen, "Window Pos: screen found");

    if space.w < min_size.w || space.h < min_size.h {
        return initial;
    }
    let area_x = i64::from(space.x) - i64::from(screen.x);
    let area_y = i64::from(space.y) - i64::from(screen.y);
    let area_w = i64::from(space.w);
    let area_h = i64::from(space.h);

    let x = i64::from(saved.x).max(area_x);
    let y = i64::from(saved.y).max(area_y);
    let w = i64::from(saved.w).min(area_w);
    let h = i64::from(saved.h).min(area_h);
    let (x, w) = fit_span(x, w, area_x, area_w);
    let (y, h) = fit_span(y, h, area_y, area_h);

    let x = x + i64::from(screen.x);
    let y = y + i64::from(screen.y);
    let screen_right = i64::from(screen.x) + i64::from(screen.w);
    let screen_bottom = i64::from(screen.y) + i64::from(screen.h);
    if x + i64::from(min_size.w) > screen_right || y + i64::from(min_size.h) > screen_bottom {
        return initial;
    }
    let (Ok(x), Ok(y), Ok(w), Ok(h)) = (
        i32::try_from(x),
        i32::try_from(y),
        i32::try_from(w),
        i32::try_from(h),
    ) else {
        return initial;
    };
    let result = Rect::new(x, y, w, h);
    debug!(?result, "Window Pos: resulting geometry");
    result
}

/// Compute the record to persist after the window moved or changed state.
///
/// Returns `None` when nothing should be written: the window is minimized,
/// hidden, not yet placed, too small, or the record would be unchanged.
pub fn reconcile_on_save(
    input: &SaveInput,
    saved: &WindowPosition,
    monitors: &[Monitor],
    current_scale: i32,
    min_size: Size,
) -> Option<WindowPosition> {
    if input.state == WindowState::Minimized || !input.visible || !input.position_inited {
        return None;
    }

    let mut real = *saved;
    if input.state == WindowState::Maximized {
        real.maximized = true;
        debug!("Window Pos: saving maximized position");
    } else {
        let body = input.body;
        real.x = body.x;
        real.y = body.y;
        real.w = body.w - input.right_column_width;
        real.h = body.h;
        real.scale = current_scale;
        real.maximized = false;
        real.monitor_checksum = 0;
        debug!(
            x = real.x,
            y = real.y,
            w = real.w,
            h = real.h,
            "Window Pos: saving non-maximized position"
        );

        let center = Point::new(real.x + real.w / 2, real.y + real.h / 2);
        if let Some(monitor) = nearest_monitor(monitors, center) {
            let screen = monitor.geometry;
            debug!(monitor = %monitor.name, ?screen, "Window Pos: screen found");
            real.x -= screen.x;
            real.y -= screen.y;
            real.monitor_checksum = screen_name_checksum(&monitor.name);
        }
    }

    if !real.fits_minimum(min_size) || real == *saved {
        return None;
    }
    debug!(
        x = real.x,
        y = real.y,
        w = real.w,
        h = real.h,
        scale = real.scale,
        maximized = real.maximized,
        "Window Pos: writing"
    );
    Some(real)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::scale_position;

    const DEFAULT: Size = Size::new(800, 600);
    const MIN: Size = Size::new(380, 480);

    fn full_hd(name: &str, x: i32) -> Monitor {
        let rect = Rect::new(x, 0, 1920, 1080);
        Monitor::new(name, rect, rect)
    }

    fn saved_on(name: &str, x: i32, y: i32, w: i32, h: i32) -> WindowPosition {
        WindowPosition {
            x,
            y,
            w,
            h,
            scale: 100,
            maximized: false,
            monitor_checksum: screen_name_checksum(name),
        }
    }

    fn visible_normal(body: Rect) -> SaveInput {
        SaveInput {
            body,
            state: WindowState::Normal,
            visible: true,
            position_inited: true,
            right_column_width: 0,
        }
    }

    #[test]
    fn empty_size_uses_centered_default() {
        let monitors = vec![full_hd("A", 0).with_primary(true)];
        for (w, h) in [(0, 600), (800, 0), (0, 0)] {
            let saved = saved_on("A", 10, 10, w, h);
            let rect = compute_initial_geometry(saved, &monitors, DEFAULT, MIN, Margins::ZERO);
            assert_eq!(rect, Rect::new(560, 240, 800, 600));
        }
    }

    #[test]
    fn unknown_monitor_uses_centered_default() {
        let monitors = vec![full_hd("A", 0).with_primary(true), full_hd("B", 1920)];
        let saved = saved_on("C", 10, 10, 900, 700);
        let rect = compute_initial_geometry(saved, &monitors, DEFAULT, MIN, Margins::ZERO);
        assert_eq!(rect, default_geometry(&monitors, DEFAULT));
    }

    #[test]
    fn no_monitors_default_sits_at_origin() {
        let rect = default_geometry(&[], DEFAULT);
        assert_eq!(rect, Rect::new(0, 0, 800, 600));
    }

    #[test]
    fn position_inside_usable_area_is_translated_only() {
        let monitors = vec![full_hd("A", 0).with_primary(true), full_hd("B", 1920)];
        let saved = saved_on("B", 100, 80, 900, 700);
        let rect = compute_initial_geometry(saved, &monitors, DEFAULT, MIN, Margins::ZERO);
        assert_eq!(rect, Rect::new(2020, 80, 900, 700));
    }

    #[test]
    fn right_overflow_shifts_left() {
        let monitors = vec![full_hd("A", 0).with_primary(true)];
        let saved = saved_on("A", 1800, 50, 400, 300);
        let min_size = Size::new(300, 200);
        let rect = compute_initial_geometry(saved, &monitors, DEFAULT, min_size, Margins::ZERO);
        assert_eq!(rect, Rect::new(1520, 50, 400, 300));
    }

    #[test]
    fn oversized_window_is_clamped_to_usable_area() {
        let monitor = Monitor::new("A", Rect::new(0, 0, 1920, 1080), Rect::new(0, 0, 1920, 1040));
        let saved = saved_on("A", -50, -20, 2500, 1500);
        let rect = compute_initial_geometry(saved, &[monitor], DEFAULT, MIN, Margins::ZERO);
        assert_eq!(rect, Rect::new(0, 0, 1920, 1040));
    }

    #[test]
    fn frame_margins_shrink_usable_area() {
        let monitor = full_hd("A", 0);
        let frame = Margins {
            left: 8,
            top: 31,
            right: 8,
            bottom: 8,
        };
        let saved = saved_on("A", 0, 0, 1920, 1080);
        let rect = compute_initial_geometry(saved, &[monitor], DEFAULT, MIN, frame);
        assert_eq!(rect, Rect::new(8, 31, 1904, 1041));
    }

    #[test]
    fn too_small_monitor_uses_default() {
        let small = Rect::new(0, 0, 300, 300);
        let monitors = vec![
            full_hd("A", 0).with_primary(true),
            Monitor::new(
                "tiny",
                Rect::new(1920, 0, 300, 300),
                small.translated(Point::new(1920, 0)),
            ),
        ];
        let saved = saved_on("tiny", 0, 0, 290, 290);
        let rect = compute_initial_geometry(saved, &monitors, DEFAULT, MIN, Margins::ZERO);
        assert_eq!(rect, default_geometry(&monitors, DEFAULT));
    }

    #[test]
    fn minimum_footprint_past_far_edge_uses_default() {
        // Usable area hugs the right edge of the monitor.
        let monitor = Monitor::new(
            "A",
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1500, 0, 420, 1080),
        );
        let monitors = vec![monitor];

        let saved = saved_on("A", 1600, 0, 400, 600);
        let rect = compute_initial_geometry(saved, &monitors, DEFAULT, MIN, Margins::ZERO);
        assert_eq!(rect, Rect::new(1520, 0, 400, 600));

        // A narrow legacy record fits the usable area but leaves no room for the minimum width.
        let saved = saved_on("A", 1700, 0, 200, 600);
        let rect = compute_initial_geometry(saved, &monitors, DEFAULT, MIN, Margins::ZERO);
        assert_eq!(rect, default_geometry(&monitors, DEFAULT));
    }

    #[test]
    fn save_is_relative_to_nearest_monitor() {
        let monitors = vec![full_hd("A", 0), full_hd("B", 1920)];
        let input = visible_normal(Rect::new(2100, 100, 800, 600));
        let saved = WindowPosition::default();
        let real = reconcile_on_save(&input, &saved, &monitors, 125, MIN).unwrap();
        assert_eq!(
            real,
            WindowPosition {
                x: 180,
                y: 100,
                w: 800,
                h: 600,
                scale: 125,
                maximized: false,
                monitor_checksum: screen_name_checksum("B"),
            }
        );
    }

    #[test]
    fn save_subtracts_right_column() {
        let monitors = vec![full_hd("A", 0)];
        let mut input = visible_normal(Rect::new(10, 10, 1200, 700));
        input.right_column_width = 300;
        let real =
            reconcile_on_save(&input, &WindowPosition::default(), &monitors, 100, MIN).unwrap();
        assert_eq!(real.w, 900);
    }

    #[test]
    fn identical_save_is_skipped() {
        let monitors = vec![full_hd("A", 0)];
        let input = visible_normal(Rect::new(10, 10, 800, 600));
        let first =
            reconcile_on_save(&input, &WindowPosition::default(), &monitors, 100, MIN).unwrap();
        assert_eq!(reconcile_on_save(&input, &first, &monitors, 100, MIN), None);
    }

    #[test]
    fn maximized_only_flips_flag() {
        let monitors = vec![full_hd("A", 0)];
        let saved = saved_on("A", 10, 10, 800, 600);
        let mut input = visible_normal(Rect::new(0, 0, 1920, 1080));
        input.state = WindowState::Maximized;
        let real = reconcile_on_save(&input, &saved, &monitors, 200, MIN).unwrap();
        assert_eq!(
            real,
            WindowPosition {
                maximized: true,
                ..saved
            }
        );
    }

    #[test]
    fn gated_states_produce_nothing() {
        let monitors = vec![full_hd("A", 0)];
        let saved = WindowPosition::default();
        let base = visible_normal(Rect::new(10, 10, 800, 600));

        let minimized = SaveInput {
            state: WindowState::Minimized,
            ..base
        };
        let hidden = SaveInput {
            visible: false,
            ..base
        };
        let not_inited = SaveInput {
            position_inited: false,
            ..base
        };
        for input in [minimized, hidden, not_inited] {
            assert_eq!(reconcile_on_save(&input, &saved, &monitors, 100, MIN), None);
        }
    }

    #[test]
    fn undersized_window_is_not_saved() {
        let monitors = vec![full_hd("A", 0)];
        let input = visible_normal(Rect::new(10, 10, 300, 600));
        assert_eq!(
            reconcile_on_save(&input, &WindowPosition::default(), &monitors, 100, MIN),
            None
        );
    }

    #[test]
    fn saved_then_restored_lands_in_place() {
        let monitors = vec![full_hd("A", 0).with_primary(true), full_hd("B", 1920)];
        let body = Rect::new(2500, 200, 1000, 700);
        let input = visible_normal(body);
        let real =
            reconcile_on_save(&input, &WindowPosition::default(), &monitors, 100, MIN).unwrap();
        let rect = compute_initial_geometry(real, &monitors, DEFAULT, MIN, Margins::ZERO);
        assert_eq!(rect, body);
    }

    #[test]
    fn non_positive_size_uses_centered_default() {
        let monitors = vec![full_hd("A", 0).with_primary(true)];
        let saved = saved_on("A", 0, 0, -100, -100);
        let rect = compute_initial_geometry(saved, &monitors, DEFAULT, MIN, Margins::ZERO);
        assert_eq!(rect, default_geometry(&monitors, DEFAULT));
    }

    #[test]
    fn huge_saved_offset_is_pulled_back_on_screen() {
        let monitors = vec![full_hd("A", 0).with_primary(true)];
        let saved = saved_on("A", i32::MAX - 10, i32::MAX, 800, 600);
        let rect = compute_initial_geometry(saved, &monitors, DEFAULT, MIN, Margins::ZERO);
        assert_eq!(rect, Rect::new(1120, 480, 800, 600));

        let saved = saved_on("A", i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        let rect = compute_initial_geometry(saved, &monitors, DEFAULT, MIN, Margins::ZERO);
        assert_eq!(rect, Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn rescaled_large_offset_still_places_window() {
        let monitors = vec![full_hd("A", 0).with_primary(true)];
        let saved = WindowPosition {
            x: 1_500_000_000,
            scale: 50,
            ..saved_on("A", 0, 40, 400, 200)
        };
        let scaled = scale_position(saved, 200);
        assert_eq!(scaled.x, i32::MAX);
        let rect = compute_initial_geometry(scaled, &monitors, DEFAULT, MIN, Margins::ZERO);
        assert_eq!(rect, Rect::new(320, 160, 1600, 800));
    }
}
