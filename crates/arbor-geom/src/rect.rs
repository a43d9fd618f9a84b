use super::{Axis, Edges, Point, Size};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Rect {
    /// Construct a rectangle from its top-left corner and dimensions.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            tl: Point::new(x, y),
            w,
            h,
        }
    }

    /// Construct a rectangle from an origin and a size.
    pub fn from_origin(tl: Point, size: Size) -> Self {
        Self {
            tl,
            w: size.w,
            h: size.h,
        }
    }

    /// A zero-sized rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// The dimensions of this rectangle.
    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> f32 {
        self.tl.x + self.w
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> f32 {
        self.tl.y + self.h
    }

    /// Leading coordinate along an axis.
    pub fn start(&self, axis: Axis) -> f32 {
        self.tl.along(axis)
    }

    /// Trailing coordinate along an axis.
    pub fn end(&self, axis: Axis) -> f32 {
        self.tl.along(axis) + self.extent(axis)
    }

    /// Length along an axis.
    pub fn extent(&self, axis: Axis) -> f32 {
        self.size().along(axis)
    }

    /// True if the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Does this rectangle contain the point? Left and top edges are
    /// inclusive, right and bottom edges exclusive.
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.tl.x && p.x < self.right() && p.y >= self.tl.y && p.y < self.bottom()
    }

    /// Does this rectangle completely enclose `other`?
    pub fn contains_rect(&self, other: Self) -> bool {
        other.tl.x >= self.tl.x
            && other.tl.y >= self.tl.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The overlapping region of two rectangles, or `None` if they do not
    /// overlap with positive area.
    pub fn intersect(&self, other: Self) -> Option<Self> {
        let x = self.tl.x.max(other.tl.x);
        let y = self.tl.y.max(other.tl.y);
        let r = self.right().min(other.right());
        let b = self.bottom().min(other.bottom());
        if r <= x || b <= y {
            return None;
        }
        let (w, h) = (span(x, r), span(y, b));
        if w <= 0.0 || h <= 0.0 {
            return None;
        }
        Some(Self::new(x, y, w, h))
    }

    /// Shrink the rectangle by insets. Dimensions never go below zero.
    pub fn shrink(&self, edges: Edges) -> Self {
        Self::new(
            self.tl.x + edges.left,
            self.tl.y + edges.top,
            (self.w - edges.horizontal()).max(0.0),
            (self.h - edges.vertical()).max(0.0),
        )
    }

    /// Grow the rectangle by insets.
    pub fn grow(&self, edges: Edges) -> Self {
        Self::new(
            self.tl.x - edges.left,
            self.tl.y - edges.top,
            self.w + edges.horizontal(),
            self.h + edges.vertical(),
        )
    }

    /// Shift the rectangle by an offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            tl: self.tl + offset,
            ..*self
        }
    }
}

/// Length from `start` to `end`, shortened so that `start + len` never
/// rounds past `end`.
fn span(start: f32, end: f32) -> f32 {
    let mut len = end - start;
    while len > 0.0 && start + len > end {
        len = len.next_down();
    }
    len
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn contains_point_half_open() {
        let r = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains_point(Point::new(10.0, 10.0)));
        assert!(r.contains_point(Point::new(14.9, 14.9)));
        assert!(!r.contains_point(Point::new(15.0, 12.0)));
        assert!(!r.contains_point(Point::new(9.9, 12.0)));
    }

    #[test]
    fn intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(b), Some(Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert_eq!(a.intersect(Rect::new(10.0, 0.0, 5.0, 5.0)), None);
    }

    #[test]
    fn intersect_stays_inside_after_rounding() {
        let a = Rect::new(40.737167, -16.91111, 86.93497, 28.086498);
        let i = a.intersect(a);
        assert!(i.is_some_and(|i| a.contains_rect(i)));
        for b in [
            Rect::new(0.0, 0.0, 200.0, 200.0),
            Rect::new(-100.0, -100.0, 150.0, 95.0),
        ] {
            if let Some(i) = a.intersect(b) {
                assert!(a.contains_rect(i), "{i:?} escapes {a:?}");
                assert!(b.contains_rect(i), "{i:?} escapes {b:?}");
            }
        }
    }

    #[test]
    fn shrink_clamps() {
        let r = Rect::new(0.0, 0.0, 10.0, 4.0).shrink(Edges::all(3.0));
        assert_eq!(r, Rect::new(3.0, 3.0, 4.0, 0.0));
    }

    fn rect_strategy() -> impl Strategy<Value = Rect> {
        (-100.0f32..100.0, -100.0f32..100.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn intersection_is_enclosed(a in rect_strategy(), b in rect_strategy()) {
            if let Some(i) = a.intersect(b) {
                prop_assert!(a.contains_rect(i));
                prop_assert!(b.contains_rect(i));
                prop_assert!(!i.is_empty());
            }
        }
    }
}
