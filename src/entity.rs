//! Entities and the scene that owns them.
//!
//! An [`Entity`] bundles a geometry description (whose positions are
//! [`Coord`]s, so any of them may be relative), an optional non-destructive
//! [`Transform`], user-defined named anchors, and an opaque style bag the
//! core forwards without reading. The [`Scene`] is a plain ordered
//! collection - no scene-graph hierarchy, just ids, names, and iteration
//! helpers.

use std::collections::HashMap;
use std::fmt;

use crate::coord::Coord;
use crate::path::SampledPath;
use crate::transform::Transform;

/// Stable handle to an entity within its scene.
///
/// Ids are never reused; removing an entity leaves a hole, and coordinates
/// still naming the dead id fail with `UnknownEntity` at resolution time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Kind-specific geometry. Every positional field is a [`Coord`], so a
/// line's endpoints or an ellipse's center can reference other entities.
#[derive(Clone, Debug)]
pub enum Geometry {
    Dot {
        at: Coord,
        radius: f64,
    },
    Line {
        start: Coord,
        end: Coord,
    },
    /// Quadratic bow; see [`crate::path::Curve`] for the curvature model.
    Curve {
        start: Coord,
        end: Coord,
        curvature: f64,
    },
    Ellipse {
        center: Coord,
        rx: f64,
        ry: f64,
        rotation_deg: f64,
        start_t: f64,
        end_t: f64,
    },
    Polygon {
        vertices: Vec<Coord>,
    },
    Text {
        at: Coord,
        content: String,
        size: f64,
    },
    /// A caller-supplied parametric path, positioned at `at` (the path's
    /// own coordinates are offsets from there).
    Path {
        at: Coord,
        path: SampledPath,
    },
}

impl Geometry {
    pub fn dot(at: impl Into<Coord>, radius: f64) -> Geometry {
        Geometry::Dot {
            at: at.into(),
            radius,
        }
    }

    pub fn line(start: impl Into<Coord>, end: impl Into<Coord>) -> Geometry {
        Geometry::Line {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn curve(start: impl Into<Coord>, end: impl Into<Coord>, curvature: f64) -> Geometry {
        Geometry::Curve {
            start: start.into(),
            end: end.into(),
            curvature,
        }
    }

    pub fn ellipse(center: impl Into<Coord>, rx: f64, ry: f64) -> Geometry {
        Geometry::Ellipse {
            center: center.into(),
            rx,
            ry,
            rotation_deg: 0.0,
            start_t: 0.0,
            end_t: 1.0,
        }
    }

    pub fn polygon(vertices: Vec<Coord>) -> Geometry {
        Geometry::Polygon { vertices }
    }

    pub fn text(at: impl Into<Coord>, content: impl Into<String>, size: f64) -> Geometry {
        Geometry::Text {
            at: at.into(),
            content: content.into(),
            size,
        }
    }

    pub fn path(at: impl Into<Coord>, path: SampledPath) -> Geometry {
        Geometry::Path {
            at: at.into(),
            path,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Dot { .. } => "dot",
            Geometry::Line { .. } => "line",
            Geometry::Curve { .. } => "curve",
            Geometry::Ellipse { .. } => "ellipse",
            Geometry::Polygon { .. } => "polygon",
            Geometry::Text { .. } => "text",
            Geometry::Path { .. } => "path",
        }
    }

    /// Whether this kind answers point-at-parameter queries.
    pub fn is_pathable(&self) -> bool {
        matches!(
            self,
            Geometry::Line { .. }
                | Geometry::Curve { .. }
                | Geometry::Ellipse { .. }
                | Geometry::Path { .. }
        )
    }

    /// The single coordinate that positions this geometry, for kinds that
    /// have one. Lines, curves, and polygons are positioned by their
    /// endpoints/vertices instead.
    pub fn origin_mut(&mut self) -> Option<&mut Coord> {
        match self {
            Geometry::Dot { at, .. } | Geometry::Text { at, .. } | Geometry::Path { at, .. } => {
                Some(at)
            }
            Geometry::Ellipse { center, .. } => Some(center),
            _ => None,
        }
    }
}

/// Paint attributes from the styling collaborator. Stored and forwarded
/// verbatim; the core never interprets them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Style {
    attrs: Vec<(String, String)>,
}

impl Style {
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value.into();
        } else {
            self.attrs.push((key, value.into()));
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// The aggregate the resolver and renderer operate on.
#[derive(Clone, Debug)]
pub struct Entity {
    pub name: Option<String>,
    pub geometry: Geometry,
    pub transform: Option<Transform>,
    pub style: Style,
    anchors: HashMap<String, Coord>,
}

impl Entity {
    pub fn new(geometry: Geometry) -> Entity {
        Entity {
            name: None,
            geometry,
            transform: None,
            style: Style::default(),
            anchors: HashMap::new(),
        }
    }

    pub fn named(name: impl Into<String>, geometry: Geometry) -> Entity {
        let mut e = Entity::new(geometry);
        e.name = Some(name.into());
        e
    }

    pub fn with_transform(mut self, transform: Transform) -> Entity {
        self.transform = Some(transform);
        self
    }

    /// Define (or redefine) a custom named anchor. Custom anchors shadow
    /// the built-in names and may themselves be relative coordinates.
    pub fn define_anchor(&mut self, name: impl Into<String>, coord: Coord) {
        self.anchors.insert(name.into(), coord);
    }

    pub fn with_anchor(mut self, name: impl Into<String>, coord: Coord) -> Entity {
        self.define_anchor(name, coord);
        self
    }

    pub fn custom_anchor(&self, name: &str) -> Option<&Coord> {
        self.anchors.get(name)
    }

    pub fn kind(&self) -> &'static str {
        self.geometry.kind()
    }

    /// Reposition an entity whose geometry has a single origin coordinate.
    /// Answers false for endpoint-positioned kinds (line, curve, polygon).
    pub fn move_to(&mut self, coord: impl Into<Coord>) -> bool {
        match self.geometry.origin_mut() {
            Some(slot) => {
                *slot = coord.into();
                true
            }
            None => false,
        }
    }
}

/// The ordered collection owning all entities of one composition.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    // Slot storage: removal leaves None so ids stay stable.
    slots: Vec<Option<Entity>>,
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }

    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.slots.len());
        self.slots.push(Some(entity));
        id
    }

    /// Convenience: add a bare geometry with a name.
    pub fn add_named(&mut self, name: impl Into<String>, geometry: Geometry) -> EntityId {
        self.add(Entity::named(name, geometry))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    /// Drop an entity from the scene. Coordinates still referencing it
    /// will fail with `UnknownEntity` on their next resolution.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.slots.get_mut(id.0).and_then(|slot| slot.take())
    }

    /// First entity with the given name, in insertion order.
    pub fn by_name(&self, name: &str) -> Option<EntityId> {
        self.iter()
            .find(|(_, e)| e.name.as_deref() == Some(name))
            .map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|e| (EntityId(i), e)))
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.iter().map(|(id, _)| id)
    }

    /// Entities matching a predicate, in insertion order.
    pub fn select<'a>(
        &'a self,
        pred: impl Fn(&Entity) -> bool + 'a,
    ) -> impl Iterator<Item = (EntityId, &'a Entity)> {
        self.iter().filter(move |(_, e)| pred(e))
    }

    /// Entities of one geometry kind, e.g. `"dot"`.
    pub fn select_kind(&self, kind: &str) -> impl Iterator<Item = (EntityId, &Entity)> {
        let kind = kind.to_string();
        self.iter().filter(move |(_, e)| e.kind() == kind)
    }

    /// Most recently added live entity.
    pub fn last(&self) -> Option<EntityId> {
        self.iter().map(|(id, _)| id).last()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn add_get_roundtrip() {
        let mut scene = Scene::new();
        let id = scene.add(Entity::new(Geometry::dot((1.0, 2.0), 0.5)));
        assert_eq!(scene.get(id).map(|e| e.kind()), Some("dot"));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn by_name_finds_first_match() {
        let mut scene = Scene::new();
        scene.add(Entity::new(Geometry::dot((0.0, 0.0), 1.0)));
        let b = scene.add_named("b", Geometry::dot((1.0, 1.0), 1.0));
        scene.add_named("b", Geometry::dot((2.0, 2.0), 1.0));
        assert_eq!(scene.by_name("b"), Some(b));
        assert_eq!(scene.by_name("missing"), None);
    }

    #[test]
    fn remove_keeps_ids_stable() {
        let mut scene = Scene::new();
        let a = scene.add(Entity::new(Geometry::dot((0.0, 0.0), 1.0)));
        let b = scene.add(Entity::new(Geometry::dot((1.0, 0.0), 1.0)));
        assert!(scene.remove(a).is_some());
        assert!(scene.get(a).is_none());
        assert!(scene.get(b).is_some());
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.last(), Some(b));
    }

    #[test]
    fn select_kind_filters() {
        let mut scene = Scene::new();
        scene.add(Entity::new(Geometry::dot((0.0, 0.0), 1.0)));
        scene.add(Entity::new(Geometry::line((0.0, 0.0), (1.0, 1.0))));
        scene.add(Entity::new(Geometry::dot((2.0, 0.0), 1.0)));
        assert_eq!(scene.select_kind("dot").count(), 2);
        assert_eq!(scene.select_kind("line").count(), 1);
        assert_eq!(scene.select(|e| e.geometry.is_pathable()).count(), 1);
    }

    #[test]
    fn move_to_rewrites_single_origin_kinds() {
        let mut dot = Entity::new(Geometry::dot((0.0, 0.0), 1.0));
        assert!(dot.move_to(Point::new(5.0, 5.0)));
        match &dot.geometry {
            Geometry::Dot { at, .. } => assert_eq!(*at, Coord::abs(5.0, 5.0)),
            other => panic!("unexpected geometry {other:?}"),
        }
        let mut line = Entity::new(Geometry::line((0.0, 0.0), (1.0, 0.0)));
        assert!(!line.move_to(Point::ORIGIN));
    }

    #[test]
    fn style_is_an_opaque_bag() {
        let mut style = Style::default();
        style.set("fill", "tomato");
        style.set("fill", "teal");
        style.set("stroke-width", "2");
        assert_eq!(style.get("fill"), Some("teal"));
        assert_eq!(style.iter().count(), 2);
    }
}
