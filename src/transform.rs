//! Non-destructive rotation/scale with a pivot.
//!
//! A [`Transform`] is stored per entity and applied at resolution time; raw
//! geometry is never rewritten, so re-reading a transformed anchor always
//! re-applies the same composed transform to the same base coordinates.

use glam::{DMat2, DVec2};

use crate::types::Point;

/// Rotation (degrees, counter-clockwise) and non-uniform scale about a
/// pivot.
///
/// Composition policy: successive calls compose rotation additively and
/// scale multiplicatively, and the pivot named by the most recent call
/// replaces the stored one (single-pivot-wins). This is deliberately not a
/// full affine stack; see the crate docs. A `None` pivot means "the
/// entity's resolved center at application time".
///
/// Application order is fixed: translate to pivot-relative coordinates,
/// scale, rotate, translate back. Scale-before-rotate keeps shapes scaled
/// along their local axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub rotation_deg: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub pivot: Option<Point>,
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        rotation_deg: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        pivot: None,
    };

    /// Add a rotation, keeping the current pivot.
    pub fn rotate(mut self, degrees: f64) -> Transform {
        self.rotation_deg += degrees;
        self
    }

    /// Add a rotation about an explicit pivot. The pivot replaces any
    /// previously stored one.
    pub fn rotate_about(mut self, degrees: f64, pivot: Point) -> Transform {
        self.rotation_deg += degrees;
        self.pivot = Some(pivot);
        self
    }

    /// Multiply in a uniform scale, keeping the current pivot.
    pub fn scale(self, factor: f64) -> Transform {
        self.scale_xy(factor, factor)
    }

    /// Multiply in a non-uniform scale, keeping the current pivot.
    pub fn scale_xy(mut self, sx: f64, sy: f64) -> Transform {
        self.scale_x *= sx;
        self.scale_y *= sy;
        self
    }

    /// Multiply in a scale about an explicit pivot. The pivot replaces any
    /// previously stored one.
    pub fn scale_about(mut self, sx: f64, sy: f64, pivot: Point) -> Transform {
        self.scale_x *= sx;
        self.scale_y *= sy;
        self.pivot = Some(pivot);
        self
    }

    pub fn is_identity(&self) -> bool {
        self.rotation_deg == 0.0 && self.scale_x == 1.0 && self.scale_y == 1.0
    }

    /// Apply to a point. `default_pivot` is used when no explicit pivot was
    /// set (the entity's resolved center, supplied by the resolver).
    pub fn apply(&self, point: Point, default_pivot: Point) -> Point {
        if self.is_identity() {
            return point;
        }
        let pivot = self.pivot.unwrap_or(default_pivot).to_vec();
        let local = point.to_vec() - pivot;
        let scaled = DVec2::new(local.x * self.scale_x, local.y * self.scale_y);
        let rotated = DMat2::from_angle(self.rotation_deg.to_radians()) * scaled;
        Point::from_vec(rotated + pivot)
    }
}
