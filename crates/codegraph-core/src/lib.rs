//! Codegraph Core — the entity/relation data model, the code graph, and the
//! two-phase pipeline's shared symbol tables.

pub mod context;
pub mod graph;
pub mod inheritance;
pub mod model;
pub mod registry;
pub mod text;

#[cfg(test)]
pub mod test_utils;

#[cfg(test)]
pub mod tests;

pub use context::{
    AstHandle, DefinitionEntry, FileContext, GlobalContext, ImportEntry, ImportKind, ScopeEntry,
};
pub use graph::Graph;
pub use model::{
    ClassExtra, CodeElement, DependencyType, ElementKind, ElementRef, EnumConstantExtra, Extra,
    ExtraKind, FieldExtra, GraphEdge, Location, MethodExtra, NodeId, DependencyRelation, EdgeId,
};
pub use registry::Resolver;
