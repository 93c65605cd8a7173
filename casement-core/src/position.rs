use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Persisted main window placement.
///
/// When not maximized, `x`/`y` are relative to the top-left corner of the
/// monitor identified by `monitor_checksum`, not global desktop coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    /// Display scale percentage at save time, `0` for records written before scale was tracked.
    pub scale: i32,
    pub maximized: bool,
    pub monitor_checksum: u32,
}

impl WindowPosition {
    pub fn has_size(&self) -> bool {
        self.w > 0 && self.h > 0
    }

    /// Whether the record is large enough to be stored.
    pub fn fits_minimum(&self, min_size: Size) -> bool {
        self.w >= min_size.w && self.h >= min_size.h
    }
}

/// Rescale a saved position recorded at `saved.scale` percent to `current_scale`.
pub fn scale_position(saved: WindowPosition, current_scale: i32) -> WindowPosition {
    if saved.scale == 0 {
        return saved;
    }
    let factor = f64::from(current_scale) / f64::from(saved.scale);
    let scaled = |value: i32| (f64::from(value) * factor) as i32;
    WindowPosition {
        x: scaled(saved.x),
        y: scaled(saved.y),
        w: scaled(saved.w),
        h: scaled(saved.h),
        ..saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscaled_record_is_returned_as_is() {
        let saved = WindowPosition {
            x: 10,
            y: 20,
            w: 800,
            h: 600,
            ..WindowPosition::default()
        };
        assert_eq!(scale_position(saved, 200), saved);
    }

    #[test]
    fn scale_150_to_100_shrinks_by_two_thirds() {
        let saved = WindowPosition {
            x: 300,
            y: 150,
            w: 1000,
            h: 900,
            scale: 150,
            maximized: false,
            monitor_checksum: 7,
        };
        let scaled = scale_position(saved, 100);
        assert_eq!((scaled.x, scaled.y, scaled.w, scaled.h), (200, 100, 666, 600));
        assert_eq!(scaled.scale, 150);
        assert_eq!(scaled.monitor_checksum, 7);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let pos: WindowPosition = serde_json::from_str(r#"{"x": 5, "w": 640}"#).unwrap();
        assert_eq!(pos.x, 5);
        assert_eq!(pos.w, 640);
        assert_eq!(pos.h, 0);
        assert!(!pos.has_size());
    }

    #[test]
    fn negative_size_counts_as_absent() {
        let pos = WindowPosition {
            w: -100,
            h: -100,
            ..WindowPosition::default()
        };
        assert!(!pos.has_size());
        let flat = WindowPosition { w: 800, ..pos };
        assert!(!flat.has_size());
        let tiny = WindowPosition { w: 1, h: 1, ..pos };
        assert!(tiny.has_size());
    }
}
