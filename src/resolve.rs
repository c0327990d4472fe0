//! The coordinate resolution engine.
//!
//! Resolution is a pure recursive walk over the current scene snapshot:
//! every public query starts a fresh [`Walk`], so a moved upstream entity is
//! reflected in all dependents on their next read with no invalidation
//! protocol. The walk's `visiting` stack is the only mutable state; it
//! bounds recursion to the number of distinct entities and turns any
//! revisit into a [`ResolveError::Cycle`] naming the loop.
//!
//! Within one walk a memo of resolved entity centers avoids recomputing a
//! shared ancestor referenced twice. Correctness never depends on it; it is
//! dropped with the walk.

use std::collections::{HashMap, HashSet};

use crate::anchor::{Anchor, AnchorSpec, suggest_anchor};
use crate::coord::Coord;
use crate::entity::{Entity, EntityId, Geometry, Scene};
use crate::errors::ResolveError;
use crate::log::debug;
use crate::path::{Curve, Ellipse, Line, PathShape, Pathable};
use crate::types::{BBox, Offset, Point};

/// Parameter-space step for tangents of transformed paths.
const TANGENT_EPS: f64 = 1e-5;

/// Segment count used when a bounding box has to be sampled from a curve.
const BBOX_SAMPLES: usize = 32;

/// Stack-scoped state for one resolution walk.
#[derive(Default)]
struct Walk {
    /// Entities currently being resolved, in entry order (for cycle
    /// reporting).
    visiting: Vec<EntityId>,
    in_progress: HashSet<EntityId>,
    /// Untransformed centers resolved earlier in this walk.
    centers: HashMap<EntityId, Point>,
}

impl Walk {
    fn enter(&mut self, scene: &Scene, id: EntityId) -> Result<(), ResolveError> {
        if self.in_progress.contains(&id) {
            let start = self
                .visiting
                .iter()
                .position(|v| *v == id)
                .unwrap_or_default();
            let mut ids: Vec<EntityId> = self.visiting[start..].to_vec();
            ids.push(id);
            let chain = ids
                .iter()
                .map(|eid| display_name(scene, *eid))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ResolveError::Cycle { chain, ids });
        }
        self.visiting.push(id);
        self.in_progress.insert(id);
        Ok(())
    }

    fn leave(&mut self, id: EntityId) {
        self.visiting.pop();
        self.in_progress.remove(&id);
    }
}

fn display_name(scene: &Scene, id: EntityId) -> String {
    match scene.get(id).and_then(|e| e.name.clone()) {
        Some(name) => name,
        None => id.to_string(),
    }
}

fn entity(scene: &Scene, id: EntityId) -> Result<&Entity, ResolveError> {
    scene.get(id).ok_or(ResolveError::UnknownEntity { id })
}

/// Resolve any coordinate to a concrete point.
fn resolve_coord(scene: &Scene, walk: &mut Walk, coord: &Coord) -> Result<Point, ResolveError> {
    match coord {
        Coord::Abs(p) => Ok(*p),
        Coord::Offset { base, dx, dy } => {
            let base = resolve_coord(scene, walk, base)?;
            Ok(base + Offset::new(*dx, *dy))
        }
        Coord::Anchor { target, spec } => resolve_anchor(scene, walk, *target, spec),
        Coord::OnPath { target, t } => resolve_point_on(scene, walk, *target, *t),
    }
}

/// Resolve an anchor on an entity, transform applied.
fn resolve_anchor(
    scene: &Scene,
    walk: &mut Walk,
    id: EntityId,
    spec: &AnchorSpec,
) -> Result<Point, ResolveError> {
    entity(scene, id)?;
    walk.enter(scene, id)?;
    let result = anchor_in_walk(scene, walk, id, spec)
        .and_then(|p| apply_transform(scene, walk, id, p));
    walk.leave(id);
    result
}

fn anchor_in_walk(
    scene: &Scene,
    walk: &mut Walk,
    id: EntityId,
    spec: &AnchorSpec,
) -> Result<Point, ResolveError> {
    let e = entity(scene, id)?;
    debug!(entity = %display_name(scene, id), ?spec, "resolving anchor");
    match spec {
        AnchorSpec::Named(name) => {
            // User-defined anchors shadow the built-ins. Their coordinates
            // resolve in the same walk, so loops through them are caught.
            if let Some(coord) = e.custom_anchor(name) {
                return resolve_coord(scene, walk, coord);
            }
            match Anchor::parse(name) {
                Some(anchor) => {
                    if e.geometry.is_pathable() {
                        // start/mid/end/center are parameters on pathables.
                        if let Some(t) = anchor.path_param() {
                            let shape = shape_in_walk(scene, walk, id)?;
                            return Ok(shape.point_at(t));
                        }
                    } else if anchor.path_param().is_some() && anchor != Anchor::Center {
                        // start/mid/end have no meaning on box-like kinds.
                        return Err(ResolveError::AnchorNotFound {
                            name: name.clone(),
                            kind: e.kind(),
                            suggestion: Some("center".to_string()),
                        });
                    }
                    let bbox = bbox_in_walk(scene, walk, id)?;
                    Ok(anchor.on_bbox(&bbox))
                }
                None => Err(ResolveError::AnchorNotFound {
                    name: name.clone(),
                    kind: e.kind(),
                    suggestion: suggest_anchor(name),
                }),
            }
        }
        AnchorSpec::Frac(u, v) => {
            let bbox = bbox_in_walk(scene, walk, id)?;
            Ok(bbox.at_frac(*u, *v))
        }
        AnchorSpec::Param(t) => {
            let shape = shape_in_walk(scene, walk, id)?;
            Ok(shape.point_at(*t))
        }
    }
}

/// Resolve `point_at(t)` on an entity, transform applied.
fn resolve_point_on(
    scene: &Scene,
    walk: &mut Walk,
    id: EntityId,
    t: f64,
) -> Result<Point, ResolveError> {
    entity(scene, id)?;
    walk.enter(scene, id)?;
    let result = shape_in_walk(scene, walk, id)
        .map(|shape| shape.point_at(t))
        .and_then(|p| apply_transform(scene, walk, id, p));
    walk.leave(id);
    result
}

/// Apply the entity's transform to an already-resolved local point. The
/// default pivot is the entity's untransformed center.
fn apply_transform(
    scene: &Scene,
    walk: &mut Walk,
    id: EntityId,
    point: Point,
) -> Result<Point, ResolveError> {
    let e = entity(scene, id)?;
    match e.transform {
        Some(tr) if !tr.is_identity() => {
            let pivot = if tr.pivot.is_some() {
                // Explicit pivot: skip resolving the center.
                Point::ORIGIN
            } else {
                center_in_walk(scene, walk, id)?
            };
            Ok(tr.apply(point, pivot))
        }
        _ => Ok(point),
    }
}

/// The entity's untransformed center, memoized per walk.
fn center_in_walk(scene: &Scene, walk: &mut Walk, id: EntityId) -> Result<Point, ResolveError> {
    if let Some(p) = walk.centers.get(&id) {
        return Ok(*p);
    }
    let bbox = bbox_in_walk(scene, walk, id)?;
    let center = bbox.center();
    walk.centers.insert(id, center);
    Ok(center)
}

/// Build the concrete parametric shape for a pathable entity, endpoints
/// resolved but transform not yet applied.
fn shape_in_walk(scene: &Scene, walk: &mut Walk, id: EntityId) -> Result<PathShape, ResolveError> {
    let e = entity(scene, id)?;
    match &e.geometry {
        Geometry::Line { start, end } => {
            let a = resolve_coord(scene, walk, start)?;
            let b = resolve_coord(scene, walk, end)?;
            Ok(Line::new(a, b).into())
        }
        Geometry::Curve {
            start,
            end,
            curvature,
        } => {
            let a = resolve_coord(scene, walk, start)?;
            let b = resolve_coord(scene, walk, end)?;
            Ok(Curve::new(a, b, *curvature).into())
        }
        Geometry::Ellipse {
            center,
            rx,
            ry,
            rotation_deg,
            start_t,
            end_t,
        } => {
            let c = resolve_coord(scene, walk, center)?;
            Ok(Ellipse::new(c, *rx, *ry)
                .with_rotation(*rotation_deg)
                .arc(*start_t, *end_t)
                .into())
        }
        Geometry::Path { at, path } => {
            let origin = resolve_coord(scene, walk, at)?;
            Ok(path.translated(origin - path.point_at(0.0)).into())
        }
        other => Err(ResolveError::NotPathable { kind: other.kind() }),
    }
}

/// Untransformed bounding box of the entity's resolved geometry.
fn bbox_in_walk(scene: &Scene, walk: &mut Walk, id: EntityId) -> Result<BBox, ResolveError> {
    let e = entity(scene, id)?;
    match &e.geometry {
        Geometry::Dot { at, radius } => {
            let c = resolve_coord(scene, walk, at)?;
            Ok(BBox::around(c, radius * 2.0, radius * 2.0))
        }
        Geometry::Line { start, end } => {
            let mut bb = BBox::empty();
            bb.expand_point(resolve_coord(scene, walk, start)?);
            bb.expand_point(resolve_coord(scene, walk, end)?);
            Ok(bb)
        }
        Geometry::Curve { .. } | Geometry::Path { .. } => {
            let shape = shape_in_walk(scene, walk, id)?;
            let samples = match &shape {
                PathShape::SampledPath(p) => p.sample_count(),
                _ => BBOX_SAMPLES,
            };
            let mut bb = BBox::empty();
            for p in shape.polyline(samples) {
                bb.expand_point(p);
            }
            Ok(bb)
        }
        Geometry::Ellipse {
            center,
            rx,
            ry,
            rotation_deg,
            ..
        } => {
            let rot = rotation_deg.to_radians();
            let c = resolve_coord(scene, walk, center)?;
            // Exact extents of a rotated ellipse.
            let half_w = (rx * rot.cos()).hypot(ry * rot.sin());
            let half_h = (rx * rot.sin()).hypot(ry * rot.cos());
            Ok(BBox::around(c, half_w * 2.0, half_h * 2.0))
        }
        Geometry::Polygon { vertices } => {
            let mut bb = BBox::empty();
            for v in vertices {
                bb.expand_point(resolve_coord(scene, walk, v)?);
            }
            if bb.is_empty() {
                // An empty polygon still answers a well-defined point.
                bb = BBox::around(Point::ORIGIN, 0.0, 0.0);
            }
            Ok(bb)
        }
        Geometry::Text { at, content, size } => {
            // Nominal metrics; real text measurement belongs to the
            // styling/serialization collaborators.
            let width = 0.6 * size * content.chars().count() as f64;
            let c = resolve_coord(scene, walk, at)?;
            Ok(BBox::around(c, width, *size))
        }
    }
}

/// Resolved defining points for a geometry kind, untransformed.
fn defining_points(scene: &Scene, walk: &mut Walk, id: EntityId) -> Result<Vec<Point>, ResolveError> {
    let e = entity(scene, id)?;
    match &e.geometry {
        Geometry::Dot { at, .. } | Geometry::Text { at, .. } | Geometry::Path { at, .. } => {
            Ok(vec![resolve_coord(scene, walk, at)?])
        }
        Geometry::Line { start, end } | Geometry::Curve { start, end, .. } => Ok(vec![
            resolve_coord(scene, walk, start)?,
            resolve_coord(scene, walk, end)?,
        ]),
        Geometry::Ellipse { center, .. } => Ok(vec![resolve_coord(scene, walk, center)?]),
        Geometry::Polygon { vertices } => vertices
            .iter()
            .map(|v| resolve_coord(scene, walk, v))
            .collect(),
    }
}

impl Scene {
    /// Resolve a coordinate against the current scene state. Fresh walk;
    /// nothing is cached across calls.
    pub fn resolve(&self, coord: &Coord) -> Result<Point, ResolveError> {
        let mut walk = Walk::default();
        resolve_coord(self, &mut walk, coord)
    }

    /// Resolve an anchor point on an entity, transform applied.
    pub fn anchor(
        &self,
        id: EntityId,
        spec: impl Into<AnchorSpec>,
    ) -> Result<Point, ResolveError> {
        let mut walk = Walk::default();
        resolve_anchor(self, &mut walk, id, &spec.into())
    }

    /// `point_at(t)` on a pathable entity, transform applied.
    pub fn point_on(&self, id: EntityId, t: f64) -> Result<Point, ResolveError> {
        let mut walk = Walk::default();
        resolve_point_on(self, &mut walk, id, t)
    }

    /// Tangent direction at `t` in degrees, transform included.
    ///
    /// Without a transform this is the shape's analytic tangent. With one,
    /// a non-uniform scale bends tangents, so the angle is measured by
    /// symmetric finite difference over transformed points.
    pub fn angle_on(&self, id: EntityId, t: f64) -> Result<f64, ResolveError> {
        let e = entity(self, id)?;
        let has_transform = e.transform.is_some_and(|tr| !tr.is_identity());
        let mut walk = Walk::default();
        if !has_transform {
            walk.enter(self, id)?;
            let result = shape_in_walk(self, &mut walk, id).map(|shape| shape.angle_at(t));
            walk.leave(id);
            result
        } else {
            let before = resolve_point_on(self, &mut walk, id, t - TANGENT_EPS)?;
            let after = resolve_point_on(self, &mut walk, id, t + TANGENT_EPS)?;
            Ok((after - before).angle_deg())
        }
    }

    /// Arc length of a pathable entity as drawn (transform applied), by
    /// chord accumulation over `samples` uniform steps.
    pub fn arc_length_on(&self, id: EntityId, samples: usize) -> Result<f64, ResolveError> {
        let pts = self.polyline_of(id, samples.max(1))?;
        Ok(pts.windows(2).map(|w| w[0].distance(w[1])).sum())
    }

    /// Discretized outline of a pathable entity (`segments + 1` points),
    /// transform applied. This is what a renderer consumes for shapes it
    /// cannot express as a native primitive.
    pub fn polyline_of(
        &self,
        id: EntityId,
        segments: usize,
    ) -> Result<Vec<Point>, ResolveError> {
        let mut walk = Walk::default();
        walk.enter(self, id)?;
        let result = shape_in_walk(self, &mut walk, id).map(|shape| {
            shape.polyline(segments.max(1))
        });
        let points = match result {
            Ok(points) => points,
            Err(err) => {
                walk.leave(id);
                return Err(err);
            }
        };
        let transformed: Result<Vec<Point>, ResolveError> = points
            .into_iter()
            .map(|p| apply_transform(self, &mut walk, id, p))
            .collect();
        walk.leave(id);
        transformed
    }

    /// The entity's resolved center with its transform applied.
    pub fn origin(&self, id: EntityId) -> Result<Point, ResolveError> {
        let mut walk = Walk::default();
        walk.enter(self, id)?;
        let result = center_in_walk(self, &mut walk, id)
            .and_then(|c| apply_transform(self, &mut walk, id, c));
        walk.leave(id);
        result
    }

    /// Ordered defining points (endpoints, vertices, or the single origin)
    /// with the transform applied - the renderer-facing view of an entity.
    pub fn points_of(&self, id: EntityId) -> Result<Vec<Point>, ResolveError> {
        let mut walk = Walk::default();
        walk.enter(self, id)?;
        let points = match defining_points(self, &mut walk, id) {
            Ok(points) => points,
            Err(err) => {
                walk.leave(id);
                return Err(err);
            }
        };
        let transformed: Result<Vec<Point>, ResolveError> = points
            .into_iter()
            .map(|p| apply_transform(self, &mut walk, id, p))
            .collect();
        walk.leave(id);
        transformed
    }
}
