//! Parametric paths: the [`Pathable`] capability and its built-in shapes.
//!
//! Everything here is driven by a single primitive, `point_at(t)` for
//! `t` in `[0, 1]`. Tangent angle and arc length are derived from it
//! generically and overridden where a closed form exists. Out-of-range `t`
//! evaluates without failing; shapes that are only meaningful on `[0, 1]`
//! leave clamping to the caller.

use std::f64::consts::TAU;
use std::fmt;
use std::rc::Rc;

use enum_dispatch::enum_dispatch;
use glam::{DMat2, DVec2};

use crate::types::{Offset, Point};

/// Default sample count for chord-accumulation arc length. Within 1% of the
/// true length for typical smooth curves; raise it for pathological paths.
pub const DEFAULT_ARC_SAMPLES: usize = 128;

/// Default segment count for discretized polylines.
pub const DEFAULT_POLYLINE_SEGMENTS: usize = 64;

/// Parameter-space step for finite-difference tangents.
const TANGENT_EPS: f64 = 1e-5;

/// Capability: any geometry that can answer "where are you at parameter t".
///
/// `point_at` is the one required method; the rest have generic defaults
/// computed from it. Implementations with closed forms (straight lines,
/// ellipses) override for accuracy.
#[enum_dispatch]
pub trait Pathable {
    /// Position at parameter `t`, nominally in `[0, 1]`.
    fn point_at(&self, t: f64) -> Point;

    /// Tangent direction at `t`, in degrees counter-clockwise from +x.
    ///
    /// Default: symmetric finite difference
    /// `point_at(t + eps) - point_at(t - eps)`.
    fn angle_at(&self, t: f64) -> f64 {
        let before = self.point_at(t - TANGENT_EPS);
        let after = self.point_at(t + TANGENT_EPS);
        (after - before).angle_deg()
    }

    /// Accumulated chord length over `samples` uniform steps across
    /// `[0, 1]`. Non-decreasing in `samples`; converges from below.
    fn arc_length(&self, samples: usize) -> f64 {
        let n = samples.max(1);
        let mut total = 0.0;
        let mut prev = self.point_at(0.0);
        for i in 1..=n {
            let p = self.point_at(i as f64 / n as f64);
            total += prev.distance(p);
            prev = p;
        }
        total
    }

    /// Arc length at this shape's preferred resolution.
    fn length(&self) -> f64 {
        self.arc_length(DEFAULT_ARC_SAMPLES)
    }

    /// Discretize into `segments` uniform chords (`segments + 1` points).
    /// This is how arbitrary curves become drawable by a renderer that only
    /// understands polylines.
    fn polyline(&self, segments: usize) -> Vec<Point> {
        let n = segments.max(1);
        (0..=n).map(|i| self.point_at(i as f64 / n as f64)).collect()
    }
}

/// A straight segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub start: Point,
    pub end: Point,
}

impl Line {
    pub const fn new(start: Point, end: Point) -> Line {
        Line { start, end }
    }
}

impl Pathable for Line {
    fn point_at(&self, t: f64) -> Point {
        self.start.lerp(self.end, t)
    }

    /// Constant bearing for all `t`. A zero-length line answers 0.
    fn angle_at(&self, _t: f64) -> f64 {
        (self.end - self.start).angle_deg()
    }

    /// Exact: `|end - start|`, regardless of sample count.
    fn arc_length(&self, _samples: usize) -> f64 {
        self.start.distance(self.end)
    }

    fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// A quadratic Bezier bow between two endpoints.
///
/// The control point is not stored: it is derived from `curvature` and the
/// perpendicular of the chord, `mid + perp(end - start) * curvature`.
/// Curvature 0 degenerates exactly to the straight chord; the sign selects
/// the bow direction. Because the perpendicular scales with the chord,
/// coincident endpoints collapse to a constant point with no singularity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curve {
    pub start: Point,
    pub end: Point,
    pub curvature: f64,
}

impl Curve {
    pub const fn new(start: Point, end: Point, curvature: f64) -> Curve {
        Curve {
            start,
            end,
            curvature,
        }
    }

    /// The derived Bezier control point.
    pub fn control(&self) -> Point {
        let mid = self.start.midpoint(self.end);
        mid + (self.end - self.start).perp() * self.curvature
    }
}

impl Pathable for Curve {
    fn point_at(&self, t: f64) -> Point {
        let p0 = self.start.to_vec();
        let p1 = self.control().to_vec();
        let p2 = self.end.to_vec();
        let u = 1.0 - t;
        Point::from_vec(p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t))
    }

    /// Analytic tangent from the derivative
    /// `2(1-t)(p1-p0) + 2t(p2-p1)`; falls back to the chord bearing when
    /// the derivative vanishes (degenerate curve).
    fn angle_at(&self, t: f64) -> f64 {
        let p0 = self.start.to_vec();
        let p1 = self.control().to_vec();
        let p2 = self.end.to_vec();
        let d = (p1 - p0) * (2.0 * (1.0 - t)) + (p2 - p1) * (2.0 * t);
        if d == DVec2::ZERO {
            (self.end - self.start).angle_deg()
        } else {
            Offset::new(d.x, d.y).angle_deg()
        }
    }
}

/// An ellipse, or an elliptical arc when `[start_t, end_t]` narrows the
/// parameter range. `rotation_deg` tilts the whole figure about its center.
///
/// `point_at(t) = center + R(rotation) * (rx cos(theta), ry sin(theta))`
/// with `theta` sweeping `TAU * start_t .. TAU * end_t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    pub center: Point,
    pub rx: f64,
    pub ry: f64,
    pub rotation_deg: f64,
    pub start_t: f64,
    pub end_t: f64,
}

impl Ellipse {
    /// Full ellipse, unrotated.
    pub const fn new(center: Point, rx: f64, ry: f64) -> Ellipse {
        Ellipse {
            center,
            rx,
            ry,
            rotation_deg: 0.0,
            start_t: 0.0,
            end_t: 1.0,
        }
    }

    pub fn with_rotation(mut self, degrees: f64) -> Ellipse {
        self.rotation_deg = degrees;
        self
    }

    /// Restrict to a sub-range of the parameter, making this an arc.
    pub fn arc(mut self, start_t: f64, end_t: f64) -> Ellipse {
        self.start_t = start_t;
        self.end_t = end_t;
        self
    }

    fn theta(&self, t: f64) -> f64 {
        TAU * (self.start_t + (self.end_t - self.start_t) * t)
    }

    fn rotation(&self) -> DMat2 {
        DMat2::from_angle(self.rotation_deg.to_radians())
    }
}

impl Pathable for Ellipse {
    fn point_at(&self, t: f64) -> Point {
        let theta = self.theta(t);
        let local = DVec2::new(self.rx * theta.cos(), self.ry * theta.sin());
        Point::from_vec(self.center.to_vec() + self.rotation() * local)
    }

    /// Analytic tangent from the parametric derivative
    /// `(-rx sin(theta), ry cos(theta))`, rotated by the ellipse's own
    /// rotation and oriented along the sweep direction.
    ///
    /// A zero axis degenerates the ellipse to a segment; where the
    /// derivative vanishes this answers the segment's bearing instead of
    /// dividing by zero.
    fn angle_at(&self, t: f64) -> f64 {
        let theta = self.theta(t);
        let sweep = self.end_t - self.start_t;
        let local = DVec2::new(-self.rx * theta.sin(), self.ry * theta.cos());
        let d = self.rotation() * local * if sweep < 0.0 { -1.0 } else { 1.0 };
        if d == DVec2::ZERO {
            // Degenerate axis: the figure is a segment along the surviving
            // axis (x when ry == 0, y when rx == 0).
            if self.rx == 0.0 && self.ry != 0.0 {
                self.rotation_deg + 90.0
            } else {
                self.rotation_deg
            }
        } else {
            Offset::new(d.x, d.y).angle_deg()
        }
    }
}

/// A generic path around any caller-supplied `point_at` function.
///
/// This is the bridge for user-defined curves (spirals, Lissajous figures,
/// waves): implement the position function, wrap it, and the derived
/// operations plus the discretized polyline make it drawable and
/// parametrically positionable like any built-in.
#[derive(Clone)]
pub struct SampledPath {
    f: Rc<dyn Fn(f64) -> Point>,
    closed: bool,
    samples: usize,
}

impl SampledPath {
    pub fn new(f: impl Fn(f64) -> Point + 'static) -> SampledPath {
        SampledPath {
            f: Rc::new(f),
            closed: false,
            samples: DEFAULT_POLYLINE_SEGMENTS,
        }
    }

    /// Closed paths wrap `t` modulo 1, so `point_at(1.25)` equals
    /// `point_at(0.25)`.
    pub fn closed(mut self, closed: bool) -> SampledPath {
        self.closed = closed;
        self
    }

    /// Sample count used by [`Pathable::length`] and the default polyline.
    pub fn with_samples(mut self, samples: usize) -> SampledPath {
        self.samples = samples.max(1);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn sample_count(&self) -> usize {
        self.samples
    }

    /// A copy shifted by a constant displacement, sharing the underlying
    /// position function. Used to place a path-local curve at its resolved
    /// scene position.
    pub fn translated(&self, offset: Offset) -> SampledPath {
        let f = Rc::clone(&self.f);
        SampledPath {
            f: Rc::new(move |t| f(t) + offset),
            closed: self.closed,
            samples: self.samples,
        }
    }
}

impl fmt::Debug for SampledPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SampledPath")
            .field("closed", &self.closed)
            .field("samples", &self.samples)
            .finish_non_exhaustive()
    }
}

impl Pathable for SampledPath {
    fn point_at(&self, t: f64) -> Point {
        let t = if self.closed { t.rem_euclid(1.0) } else { t };
        (self.f)(t)
    }

    fn length(&self) -> f64 {
        self.arc_length(self.samples)
    }
}

/// The built-in shapes, statically dispatched.
#[enum_dispatch(Pathable)]
#[derive(Clone, Debug)]
pub enum PathShape {
    Line,
    Curve,
    Ellipse,
    SampledPath,
}
