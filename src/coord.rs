//! Declarative, unresolved positions.
//!
//! A [`Coord`] is pure data: it names where a point should come from but
//! carries no resolution logic. [`Scene::resolve`](crate::entity::Scene::resolve)
//! turns it into a concrete [`Point`] on demand, so a coordinate expressed
//! relative to another entity tracks that entity when it moves.

use crate::anchor::AnchorSpec;
use crate::entity::EntityId;
use crate::types::Point;

/// A position that may be absolute or expressed relative to another entity.
#[derive(Clone, Debug, PartialEq)]
pub enum Coord {
    /// A concrete point; resolution returns it unchanged.
    Abs(Point),
    /// An anchor on another entity, evaluated after that entity's
    /// transform.
    Anchor { target: EntityId, spec: AnchorSpec },
    /// A fractional position along another (pathable) entity.
    OnPath { target: EntityId, t: f64 },
    /// A base coordinate plus a constant delta. The delta itself is never
    /// relative.
    Offset {
        base: Box<Coord>,
        dx: f64,
        dy: f64,
    },
}

impl Coord {
    pub fn abs(x: f64, y: f64) -> Coord {
        Coord::Abs(Point::new(x, y))
    }

    pub fn at(point: Point) -> Coord {
        Coord::Abs(point)
    }

    pub fn anchor(target: EntityId, spec: impl Into<AnchorSpec>) -> Coord {
        Coord::Anchor {
            target,
            spec: spec.into(),
        }
    }

    pub fn on_path(target: EntityId, t: f64) -> Coord {
        Coord::OnPath { target, t }
    }

    /// Shift this coordinate by a constant delta. Chains: offsetting an
    /// offset nests, and both deltas apply.
    pub fn offset(self, dx: f64, dy: f64) -> Coord {
        Coord::Offset {
            base: Box::new(self),
            dx,
            dy,
        }
    }

    /// The entity this coordinate directly references, if any.
    pub fn target(&self) -> Option<EntityId> {
        match self {
            Coord::Abs(_) => None,
            Coord::Anchor { target, .. } | Coord::OnPath { target, .. } => Some(*target),
            Coord::Offset { base, .. } => base.target(),
        }
    }
}

impl From<Point> for Coord {
    fn from(p: Point) -> Coord {
        Coord::Abs(p)
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Coord {
        Coord::abs(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_nests() {
        let c = Coord::abs(1.0, 2.0).offset(3.0, 0.0).offset(0.0, 4.0);
        match &c {
            Coord::Offset { base, dx, dy } => {
                assert_eq!((*dx, *dy), (0.0, 4.0));
                assert!(matches!(**base, Coord::Offset { .. }));
            }
            other => panic!("expected nested offset, got {other:?}"),
        }
    }

    #[test]
    fn target_skips_through_offsets() {
        let id = EntityId(7);
        let c = Coord::anchor(id, "center").offset(1.0, 1.0);
        assert_eq!(c.target(), Some(id));
        assert_eq!(Coord::abs(0.0, 0.0).target(), None);
    }
}
