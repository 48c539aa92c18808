#![forbid(unsafe_code)]

//! Pixel-space geometry shared by the layout engine and hosts.

/// A point in viewport pixels, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to `other`.
    #[inline]
    pub fn distance_squared(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Move `distance` pixels from `self` towards `target`.
    ///
    /// Returns `self` unchanged when the two points coincide.
    pub fn towards(self, target: Point, distance: f32) -> Point {
        let len = self.distance_squared(target).sqrt();
        if len <= f32::EPSILON {
            return self;
        }
        let t = distance / len;
        Point::new(
            self.x + (target.x - self.x) * t,
            self.y + (target.y - self.y) * t,
        )
    }
}

/// The drawable area handed to the renderer by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Create a viewport.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Zero, negative or non-finite in either dimension.
    ///
    /// Rendering into a degenerate viewport yields an empty frame.
    pub fn is_degenerate(self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Whether `point` lies inside the viewport.
    pub fn contains(self, point: Point) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x <= self.width && point.y <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_viewports() {
        assert!(Viewport::new(0.0, 400.0).is_degenerate());
        assert!(Viewport::new(400.0, 0.0).is_degenerate());
        assert!(Viewport::new(-1.0, 10.0).is_degenerate());
        assert!(Viewport::new(f32::NAN, 10.0).is_degenerate());
        assert!(Viewport::new(f32::INFINITY, 10.0).is_degenerate());
        assert!(!Viewport::new(640.0, 480.0).is_degenerate());
    }

    #[test]
    fn towards_moves_along_segment() {
        let p = Point::new(0.0, 0.0).towards(Point::new(10.0, 0.0), 4.0);
        assert!((p.x - 4.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn towards_same_point_is_identity() {
        let p = Point::new(3.0, 3.0);
        assert_eq!(p.towards(p, 5.0), p);
    }

    #[test]
    fn contains_edges() {
        let vp = Viewport::new(100.0, 50.0);
        assert!(vp.contains(Point::new(0.0, 0.0)));
        assert!(vp.contains(Point::new(100.0, 50.0)));
        assert!(!vp.contains(Point::new(100.5, 10.0)));
    }
}
