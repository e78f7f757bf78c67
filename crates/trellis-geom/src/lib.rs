//! Geometry primitives used across trellis.
//!
//! All quantities are in logical pixels, expressed as `f64` so fractional
//! stretch distribution does not accumulate rounding drift.

/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;
/// Width/height size type.
mod size;

pub use point::Point;
pub use rect::Rect;
pub use size::Size;

/// Cardinal directions, used for neighbor scans in the cell registry.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Direction {
    /// Upward direction.
    Up,
    /// Downward direction.
    Down,
    /// Leftward direction.
    Left,
    /// Rightward direction.
    Right,
}
