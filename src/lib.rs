//! Relative-coordinate resolution for 2D compositions.
//!
//! `tether` lets a caller describe a composition of dots, lines, curves,
//! ellipses, polygons, text, and custom parametric paths whose positions
//! may be absolute or expressed *relative to other entities*: an anchor on
//! a neighbor, a fraction along a curve, a normalized spot in a bounding
//! box. Positions resolve lazily and reactively - move a referenced entity
//! and every dependent reflects it on the next read, because resolution is
//! a fresh pull-based walk with no cached state and no invalidation
//! protocol.
//!
//! The three load-bearing pieces:
//!
//! - [`Coord`]: a declarative, unresolved position. Pure data; the
//!   resolver on [`Scene`] turns it into a concrete [`Point`], detecting
//!   reference cycles along the way.
//! - [`Pathable`]: anything that answers `point_at(t)`. Tangent angle,
//!   arc length, and a discretized polyline are derived from that one
//!   primitive; [`Line`], [`Curve`], [`Ellipse`] override with closed
//!   forms, and [`SampledPath`] wraps any user function.
//! - [`Transform`]: non-destructive rotation and non-uniform scale about a
//!   pivot, stored per entity and applied at read time. Raw geometry is
//!   never rewritten.
//!
//! ```
//! use tether::{Coord, Entity, Geometry, Point, Scene};
//!
//! let mut scene = Scene::new();
//! let hub = scene.add_named("hub", Geometry::dot((10.0, 10.0), 1.0));
//! let sat = scene.add(Entity::new(Geometry::dot(
//!     Coord::anchor(hub, "center").offset(5.0, 0.0),
//!     0.5,
//! )));
//! assert_eq!(scene.origin(sat)?, Point::new(15.0, 10.0));
//!
//! // Move the hub; the satellite follows on the next read.
//! scene.get_mut(hub).unwrap().move_to(Point::new(20.0, 20.0));
//! assert_eq!(scene.origin(sat)?, Point::new(25.0, 20.0));
//! # Ok::<(), tether::ResolveError>(())
//! ```
//!
//! Everything is single-threaded and synchronous: resolution happens on
//! the calling thread at the moment a position is requested. The only
//! non-termination risk, a cyclic reference, is guarded structurally by
//! the walk's visiting set and surfaces as [`ResolveError::Cycle`].
//!
//! Transform composition is deliberately not a full affine stack: rotation
//! composes additively, scale multiplicatively, and the pivot named by the
//! most recent call wins. See [`Transform`] for the policy.

pub mod anchor;
pub mod coord;
pub mod entity;
pub mod errors;
pub mod log;
pub mod path;
mod resolve;
pub mod transform;
pub mod types;

pub use anchor::{Anchor, AnchorSpec};
pub use coord::Coord;
pub use entity::{Entity, EntityId, Geometry, Scene, Style};
pub use errors::ResolveError;
pub use path::{
    Curve, DEFAULT_ARC_SAMPLES, DEFAULT_POLYLINE_SEGMENTS, Ellipse, Line, PathShape, Pathable,
    SampledPath,
};
pub use transform::Transform;
pub use types::{BBox, Offset, Point};
