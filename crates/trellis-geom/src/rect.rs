use super::{Point, Size};

/// A rectangle located in logical pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// The top-left corner.
    pub tl: Point,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect {
    /// Construct a new rect from the top-left corner and dimensions.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            tl: Point::new(x, y),
            w,
            h,
        }
    }

    /// A zero rect at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The left edge.
    pub fn left(&self) -> f64 {
        self.tl.x
    }

    /// The top edge.
    pub fn top(&self) -> f64 {
        self.tl.y
    }

    /// The right edge (left + width).
    pub fn right(&self) -> f64 {
        self.tl.x + self.w
    }

    /// The bottom edge (top + height).
    pub fn bottom(&self) -> f64 {
        self.tl.y + self.h
    }

    /// The dimensions of this rect, discarding its location.
    pub fn size(&self) -> Size {
        Size { w: self.w, h: self.h }
    }

    /// True if this rect has no area.
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Does this rect contain the point? Containment includes the left/top
    /// edges and excludes the right/bottom edges, so adjacent rects never
    /// both claim a shared boundary point.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Does this rect fully contain `other`?
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Do two rects overlap with positive area? Edge-adjacent rects do not
    /// intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// The same rect moved to a new top-left corner.
    pub fn at(&self, tl: Point) -> Self {
        Self {
            tl,
            w: self.w,
            h: self.h,
        }
    }

    /// The same rect shifted by an offset.
    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            tl: Point::new(self.tl.x + dx, self.tl.y + dy),
            w: self.w,
            h: self.h,
        }
    }

    /// The smallest rect covering both self and other.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.left().min(other.left());
        let y = self.top().min(other.top());
        Self {
            tl: Point::new(x, y),
            w: self.right().max(other.right()) - x,
            h: self.bottom().max(other.bottom()) - y,
        }
    }
}

impl From<Size> for Rect {
    fn from(s: Size) -> Self {
        s.rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.size(), Size::new(30.0, 40.0));
    }

    #[test]
    fn containment() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(Point::new(0.0, 0.0)));
        assert!(r.contains_point(Point::new(9.9, 9.9)));
        // Right/bottom edges are exclusive.
        assert!(!r.contains_point(Point::new(10.0, 5.0)));
        assert!(r.contains_rect(&Rect::new(2.0, 2.0, 8.0, 8.0)));
        assert!(!r.contains_rect(&Rect::new(2.0, 2.0, 9.0, 8.0)));
    }

    #[test]
    fn intersection() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Sharing an edge is not an intersection.
        assert!(!r.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!r.intersects(&Rect::new(20.0, 20.0, 1.0, 1.0)));
        // Empty rects never intersect.
        assert!(!r.intersects(&Rect::new(5.0, 5.0, 0.0, 10.0)));
    }

    #[test]
    fn union() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 30.0, 15.0));
        assert_eq!(a.union(&Rect::zero()), a);
    }
}
