//! Error types for coordinate resolution, with miette diagnostics.
//!
//! Structural errors (cycles, missing anchors, dangling references) surface
//! synchronously at the point of resolution; degenerate geometry never
//! errors - it resolves to a well-defined fallback instead.

use miette::Diagnostic;
use thiserror::Error;

use crate::entity::EntityId;

/// Errors raised while resolving a coordinate, anchor, or path query.
#[derive(Error, Diagnostic, Debug)]
pub enum ResolveError {
    /// A reference chain revisited an entity already being resolved in the
    /// current walk. `chain` renders the loop with entity names where they
    /// exist, e.g. `A -> B -> A`.
    #[error("circular reference: {chain}")]
    #[diagnostic(
        code(tether::resolve::cycle),
        help("give one of these entities an absolute position to break the loop")
    )]
    Cycle {
        chain: String,
        /// The ids along the cycle, first repeated at the end.
        ids: Vec<EntityId>,
    },

    /// A symbolic anchor name is not defined for the target entity's kind.
    /// No default anchor is substituted; guessing would hide authoring
    /// errors.
    #[error("unknown anchor {name:?} on {kind} entity")]
    #[diagnostic(code(tether::resolve::anchor_not_found))]
    AnchorNotFound {
        name: String,
        kind: &'static str,
        #[help]
        suggestion: Option<String>,
    },

    /// A coordinate names an entity id that is not in the scene (for
    /// example after the owning collection dropped it).
    #[error("entity {id:?} not found in scene")]
    #[diagnostic(code(tether::resolve::unknown_entity))]
    UnknownEntity { id: EntityId },

    /// A path-parameter reference pointed at an entity kind that has no
    /// parametric form.
    #[error("{kind} entity cannot be evaluated as a path")]
    #[diagnostic(
        code(tether::resolve::not_pathable),
        help("only lines, curves, ellipses, and custom paths answer point-at-parameter queries")
    )]
    NotPathable { kind: &'static str },
}
