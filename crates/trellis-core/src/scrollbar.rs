//! Process-wide scrollbar extent cache.
//!
//! The space a native scrollbar occupies is constant for the life of the
//! process, so it is probed (or configured) once and memoized. Grids that
//! reserve scrollbar space read it on every post-process pass.

use std::sync::Mutex;

use trellis_geom::Size;

/// Fallback extent used until the host reports the real value.
const DEFAULT_EXTENT: Size = Size { w: 12.0, h: 12.0 };

static EXTENT: Mutex<Option<Size>> = Mutex::new(None);

/// The cached scrollbar extent: width of a vertical bar, height of a
/// horizontal one.
pub fn extent() -> Size {
    match EXTENT.lock() {
        Ok(guard) => guard.unwrap_or(DEFAULT_EXTENT),
        Err(_) => DEFAULT_EXTENT,
    }
}

/// Record the platform's scrollbar extent, replacing any cached value.
pub fn set_extent(size: Size) {
    if let Ok(mut guard) = EXTENT.lock() {
        *guard = Some(size);
    }
}

/// Clear the cache so the next read falls back to the default, e.g. after
/// a platform theme change.
pub fn reset() {
    if let Ok(mut guard) = EXTENT.lock() {
        *guard = None;
    }
}
