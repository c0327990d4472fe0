//! Core 2D value types: [`Point`], [`Offset`], and [`BBox`].
//!
//! Points are plain `f64` pairs with value equality and no identity. All
//! arithmetic returns new values; nothing here mutates in place except
//! [`BBox`] expansion during bounds accumulation.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use glam::DVec2;

/// An absolute 2D position.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Linear interpolation: `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }

    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Scale both components about the origin.
    pub fn scaled(self, factor: f64) -> Point {
        Point {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    pub fn to_vec(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_vec(v: DVec2) -> Point {
        Point { x: v.x, y: v.y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A displacement vector (not an absolute position).
///
/// `Point + Offset = Point`, `Point - Point = Offset`. Keeping the two apart
/// stops layout math from accidentally adding two positions.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { dx: 0.0, dy: 0.0 };

    pub const fn new(dx: f64, dy: f64) -> Offset {
        Offset { dx, dy }
    }

    pub fn length(self) -> f64 {
        self.dx.hypot(self.dy)
    }

    /// Bearing of this displacement in degrees, counter-clockwise from +x.
    /// The zero displacement answers 0.
    pub fn angle_deg(self) -> f64 {
        if self.dx == 0.0 && self.dy == 0.0 {
            0.0
        } else {
            self.dy.atan2(self.dx).to_degrees()
        }
    }

    /// Perpendicular displacement (rotated 90 degrees counter-clockwise).
    pub fn perp(self) -> Offset {
        Offset {
            dx: -self.dy,
            dy: self.dx,
        }
    }
}

impl Add<Offset> for Point {
    type Output = Point;
    fn add(self, rhs: Offset) -> Point {
        Point {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
        }
    }
}

impl AddAssign<Offset> for Point {
    fn add_assign(&mut self, rhs: Offset) {
        self.x += rhs.dx;
        self.y += rhs.dy;
    }
}

impl Sub<Offset> for Point {
    type Output = Point;
    fn sub(self, rhs: Offset) -> Point {
        Point {
            x: self.x - rhs.dx,
            y: self.y - rhs.dy,
        }
    }
}

impl Sub for Point {
    type Output = Offset;
    fn sub(self, rhs: Point) -> Offset {
        Offset {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

impl Add for Offset {
    type Output = Offset;
    fn add(self, rhs: Offset) -> Offset {
        Offset {
            dx: self.dx + rhs.dx,
            dy: self.dy + rhs.dy,
        }
    }
}

impl Sub for Offset {
    type Output = Offset;
    fn sub(self, rhs: Offset) -> Offset {
        Offset {
            dx: self.dx - rhs.dx,
            dy: self.dy - rhs.dy,
        }
    }
}

impl Mul<f64> for Offset {
    type Output = Offset;
    fn mul(self, rhs: f64) -> Offset {
        Offset {
            dx: self.dx * rhs,
            dy: self.dy * rhs,
        }
    }
}

impl Neg for Offset {
    type Output = Offset;
    fn neg(self) -> Offset {
        Offset {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

/// Axis-aligned bounding box.
///
/// Also the shape of the opaque rectangle handed over by the external
/// grid/cell layout module: a cell is just a `BBox` to this crate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    /// An empty box; expands on the first point.
    pub fn empty() -> BBox {
        BBox {
            min: Point::new(f64::MAX, f64::MAX),
            max: Point::new(f64::MIN, f64::MIN),
        }
    }

    /// Box from an origin corner and a size (the grid collaborator's
    /// `(x, y, width, height)` rectangle).
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> BBox {
        BBox {
            min: Point::new(x, y),
            max: Point::new(x + width, y + height),
        }
    }

    /// Box centered on a point with the given full width and height.
    pub fn around(center: Point, width: f64, height: f64) -> BBox {
        let half = Offset::new(width / 2.0, height / 2.0);
        BBox {
            min: center - half,
            max: center + half,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_point(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Map a normalized `(u, v)` pair in `[0,1] x [0,1]` onto the box.
    /// `(0, 0)` is `min`, `(1, 1)` is `max`; out-of-range values
    /// extrapolate linearly.
    pub fn at_frac(&self, u: f64, v: f64) -> Point {
        Point {
            x: self.min.x + self.width() * u,
            y: self.min.y + self.height() * v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn point_plus_offset_gives_point() {
        let p = Point::new(1.0, 2.0) + Offset::new(3.0, 4.0);
        assert_eq!(p, Point::new(4.0, 6.0));
    }

    #[test]
    fn point_minus_point_gives_offset() {
        let o = Point::new(5.0, 7.0) - Point::new(2.0, 3.0);
        assert_eq!(o, Offset::new(3.0, 4.0));
        assert!((o.length() - 5.0).abs() < EPS);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(4.0, 6.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.midpoint(b), Point::new(2.0, 3.0));
    }

    #[test]
    fn offset_angle_deg() {
        assert!((Offset::new(1.0, 0.0).angle_deg() - 0.0).abs() < EPS);
        assert!((Offset::new(0.0, 1.0).angle_deg() - 90.0).abs() < EPS);
        assert!((Offset::new(-1.0, 0.0).angle_deg().abs() - 180.0).abs() < EPS);
    }

    #[test]
    fn zero_offset_angle_is_zero() {
        assert_eq!(Offset::ZERO.angle_deg(), 0.0);
    }

    #[test]
    fn offset_perp_rotates_ccw() {
        let o = Offset::new(1.0, 0.0).perp();
        assert!((o.dx - 0.0).abs() < EPS);
        assert!((o.dy - 1.0).abs() < EPS);
    }

    #[test]
    fn bbox_empty_then_expand() {
        let mut bb = BBox::empty();
        assert!(bb.is_empty());
        bb.expand_point(Point::new(1.0, 2.0));
        bb.expand_point(Point::new(3.0, -1.0));
        assert!(!bb.is_empty());
        assert_eq!(bb.min, Point::new(1.0, -1.0));
        assert_eq!(bb.max, Point::new(3.0, 2.0));
        assert_eq!(bb.width(), 2.0);
        assert_eq!(bb.height(), 3.0);
    }

    #[test]
    fn bbox_around_center() {
        let bb = BBox::around(Point::new(5.0, 5.0), 4.0, 2.0);
        assert_eq!(bb.min, Point::new(3.0, 4.0));
        assert_eq!(bb.max, Point::new(7.0, 6.0));
        assert_eq!(bb.center(), Point::new(5.0, 5.0));
    }

    #[test]
    fn bbox_at_frac_corners() {
        let bb = BBox::from_rect(10.0, 20.0, 4.0, 6.0);
        assert_eq!(bb.at_frac(0.0, 0.0), Point::new(10.0, 20.0));
        assert_eq!(bb.at_frac(1.0, 1.0), Point::new(14.0, 26.0));
        assert_eq!(bb.at_frac(0.5, 0.5), bb.center());
    }
}
