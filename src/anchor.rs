//! Symbolic anchors: named points on an entity's bounding geometry.
//!
//! Compass names resolve against the bounding box (Y-up: north is +y);
//! `start` / `mid` / `end` resolve along pathable entities. Everything is
//! evaluated after the target's transform by the resolver.

use crate::types::{BBox, Offset, Point};

/// Built-in symbolic anchor names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Center,
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
    /// `point_at(0)` on pathables; `min` corner influence on box-likes is
    /// deliberately absent - start/mid/end are path-only names.
    Start,
    Mid,
    End,
}

/// Accepted spellings, kept for not-found suggestions.
pub const ANCHOR_NAMES: &[&str] = &[
    "center", "c", "north", "n", "top", "south", "s", "bottom", "east", "e", "right", "west", "w",
    "left", "ne", "nw", "se", "sw", "start", "mid", "end",
];

impl Anchor {
    /// Parse a symbolic name. Accepts the long and short compass spellings
    /// plus top/bottom/left/right aliases.
    pub fn parse(name: &str) -> Option<Anchor> {
        Some(match name {
            "center" | "c" => Anchor::Center,
            "north" | "n" | "top" => Anchor::North,
            "south" | "s" | "bottom" => Anchor::South,
            "east" | "e" | "right" => Anchor::East,
            "west" | "w" | "left" => Anchor::West,
            "ne" | "northeast" => Anchor::NorthEast,
            "nw" | "northwest" => Anchor::NorthWest,
            "se" | "southeast" => Anchor::SouthEast,
            "sw" | "southwest" => Anchor::SouthWest,
            "start" => Anchor::Start,
            "mid" | "middle" => Anchor::Mid,
            "end" => Anchor::End,
            _ => return None,
        })
    }

    /// Direction from the center in half-extent units: each component is in
    /// `[-1, 1]`, so east is `(1, 0)` and ne is `(1, 1)`.
    pub fn unit_offset(self) -> Offset {
        match self {
            Anchor::Center | Anchor::Start | Anchor::Mid | Anchor::End => Offset::ZERO,
            Anchor::North => Offset::new(0.0, 1.0),
            Anchor::South => Offset::new(0.0, -1.0),
            Anchor::East => Offset::new(1.0, 0.0),
            Anchor::West => Offset::new(-1.0, 0.0),
            Anchor::NorthEast => Offset::new(1.0, 1.0),
            Anchor::NorthWest => Offset::new(-1.0, 1.0),
            Anchor::SouthEast => Offset::new(1.0, -1.0),
            Anchor::SouthWest => Offset::new(-1.0, -1.0),
        }
    }

    /// The anchor point on a bounding box. An empty box answers its center
    /// (a degenerate but well-defined point).
    pub fn on_bbox(self, bbox: &BBox) -> Point {
        if bbox.is_empty() {
            return bbox.min.midpoint(bbox.max);
        }
        let unit = self.unit_offset();
        bbox.center() + Offset::new(unit.dx * bbox.width() / 2.0, unit.dy * bbox.height() / 2.0)
    }

    /// Path parameter for the path-flavored names.
    pub fn path_param(self) -> Option<f64> {
        match self {
            Anchor::Start => Some(0.0),
            Anchor::Mid | Anchor::Center => Some(0.5),
            Anchor::End => Some(1.0),
            _ => None,
        }
    }
}

/// Suggest the closest known anchor spelling for an unknown name.
pub fn suggest_anchor(name: &str) -> Option<String> {
    ANCHOR_NAMES
        .iter()
        .map(|known| (edit_distance(name, known), *known))
        .filter(|(d, _)| *d <= 2)
        .min_by_key(|(d, _)| *d)
        .map(|(_, known)| known.to_string())
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let sub = prev[j] + usize::from(ca != cb);
            cur[j + 1] = sub.min(prev[j + 1] + 1).min(cur[j] + 1);
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

/// How a caller designates an anchor point on a target entity.
#[derive(Clone, Debug, PartialEq)]
pub enum AnchorSpec {
    /// A symbolic name: a built-in (compass, start/mid/end) or an anchor
    /// the entity defined itself.
    Named(String),
    /// Normalized `(u, v)` in `[0,1] x [0,1]` against the bounding box.
    Frac(f64, f64),
    /// Parameter `t` along a pathable entity.
    Param(f64),
}

impl AnchorSpec {
    pub fn named(name: impl Into<String>) -> AnchorSpec {
        AnchorSpec::Named(name.into())
    }

    pub fn frac(u: f64, v: f64) -> AnchorSpec {
        AnchorSpec::Frac(u, v)
    }

    pub fn param(t: f64) -> AnchorSpec {
        AnchorSpec::Param(t)
    }
}

impl From<&str> for AnchorSpec {
    fn from(name: &str) -> AnchorSpec {
        AnchorSpec::Named(name.to_string())
    }
}
