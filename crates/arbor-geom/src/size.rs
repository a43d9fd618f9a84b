use super::{Axis, Error, Point, Rect, Result};

/// A width and height with no location.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub w: f32,
    /// Height in pixels.
    pub h: f32,
}

impl Size {
    /// A zero-valued size.
    pub const ZERO: Self = Self { w: 0.0, h: 0.0 };

    /// Construct a new size.
    pub fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }

    /// Construct a size, rejecting negative or non-finite dimensions.
    pub fn checked(w: f32, h: f32) -> Result<Self> {
        for v in [w, h] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidDimension(format!("{v}")));
            }
        }
        Ok(Self { w, h })
    }

    /// The extent along an axis.
    pub fn along(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.w,
            Axis::Vertical => self.h,
        }
    }

    /// Replace the extent along an axis.
    pub fn set_along(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Horizontal => self.w = value,
            Axis::Vertical => self.h = value,
        }
    }

    /// Build a size from main/cross extents relative to an axis.
    pub fn from_main_cross(axis: Axis, main: f32, cross: f32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }

    /// The area covered by this size.
    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// A rect with these dimensions at the origin.
    pub fn rect(&self) -> Rect {
        Rect::from_origin(Point::zero(), *self)
    }

    /// True if this size can enclose `other` in both dimensions.
    pub fn contains(&self, other: &Self) -> bool {
        self.w >= other.w && self.h >= other.h
    }
}

impl From<Rect> for Size {
    fn from(r: Rect) -> Self {
        Self { w: r.w, h: r.h }
    }
}

impl From<(f32, f32)> for Size {
    fn from(v: (f32, f32)) -> Self {
        Self { w: v.0, h: v.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_rejects_negative() {
        assert!(Size::checked(-1.0, 2.0).is_err());
        assert!(Size::checked(f32::NAN, 2.0).is_err());
        assert_eq!(Size::checked(1.0, 2.0), Ok(Size::new(1.0, 2.0)));
    }

    #[test]
    fn contains() {
        assert!(Size::new(10.0, 10.0).contains(&Size::new(10.0, 3.0)));
        assert!(!Size::new(10.0, 10.0).contains(&Size::new(11.0, 3.0)));
    }
}
