use super::{Point, Rect};

/// A `Size` is a rectangle with a width and height but no location. Useful
/// for preferred-size queries, where the placement is the grid's decision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Width in logical pixels.
    pub w: f64,
    /// Height in logical pixels.
    pub h: f64,
}

impl Size {
    /// Construct a size.
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// A zero-valued size.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The area of this size.
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Return a `Rect` with the same dimensions, located at the origin.
    pub fn rect(&self) -> Rect {
        Rect {
            tl: Point::zero(),
            w: self.w,
            h: self.h,
        }
    }

    /// True if this size can completely enclose `other` in both dimensions.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }

    /// The component-wise maximum of two sizes.
    pub fn max(&self, other: Self) -> Self {
        Self {
            w: self.w.max(other.w),
            h: self.h.max(other.h),
        }
    }
}

impl From<Rect> for Size {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(f64, f64)> for Size {
    fn from(v: (f64, f64)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}
