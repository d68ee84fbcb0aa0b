//! Phase-2 helpers shared by every language's extractor: deterministic edge
//! construction and the "materialize a placeholder element" fallback used
//! whenever resolution misses. The language-specific query-driven logic
//! (E1/E2/E3) lives in `languages::<lang>::extractor`; this module is what
//! keeps that logic from re-deriving the same id/edge plumbing per language.

use std::path::{Path, PathBuf};

use codegraph_core::{
    ClassExtra, CodeElement, DependencyType, EdgeId, ElementKind, Extra, ExtraKind, GlobalContext,
    GraphEdge, Location, NodeId,
};

/// Build a `GraphEdge` with a deterministic id derived from its endpoints —
/// re-running the pipeline over unchanged input reproduces the same id.
pub fn make_edge(
    source: NodeId,
    target: NodeId,
    kind: DependencyType,
    location: Option<Location>,
    details: Option<String>,
) -> GraphEdge {
    let id = EdgeId::new(source, target, kind, details.as_deref());
    GraphEdge {
        id,
        source,
        target,
        kind,
        location,
        details,
    }
}

/// Per-node failure-model fallback (§4.9/§7 of the project spec): a
/// resolution miss is not an error, it's a placeholder element carrying the
/// unresolved name as its own QN and `ElementKind::Unknown`. Registered (not
/// just referenced) so the emitted `Contain`/`Call`/... edge still has a
/// real graph endpoint to point at.
pub fn unknown_element(ctx: &GlobalContext, path: &Path, qualified_name: &str) -> NodeId {
    if let Some(id) = ctx.lookup_qn(qualified_name) {
        return id;
    }
    let name = qualified_name
        .rsplit('.')
        .next()
        .unwrap_or(qualified_name)
        .to_string();
    let element = CodeElement {
        id: NodeId::new(&path.to_path_buf(), ElementKind::Unknown, qualified_name),
        kind: ElementKind::Unknown,
        name,
        qualified_name: qualified_name.to_string(),
        path: path.to_path_buf(),
        signature: None,
        location: None,
        doc: None,
        comment: None,
        extra: Extra::default(),
    };
    ctx.register_element(element)
}

/// Materialize (or fetch) a built-in standard-library symbol as a registered
/// element, so relations referencing it have a stable endpoint. Class-like
/// kinds carry `ClassExtra.is_builtin = true` per §4.7.
pub fn materialize_builtin(ctx: &GlobalContext, qualified_name: &str, kind: ElementKind) -> NodeId {
    if let Some(id) = ctx.lookup_qn(qualified_name) {
        return id;
    }
    let is_class_like = matches!(
        kind,
        ElementKind::Class | ElementKind::Interface | ElementKind::Enum | ElementKind::Annotation
    );
    let extra = if is_class_like {
        Extra {
            modifiers: vec![],
            annotations: vec![],
            kind: Some(ExtraKind::Class(ClassExtra {
                is_builtin: true,
                ..Default::default()
            })),
        }
    } else {
        Extra::default()
    };
    let name = qualified_name
        .rsplit('.')
        .next()
        .unwrap_or(qualified_name)
        .to_string();
    let element = CodeElement {
        id: NodeId::new(&PathBuf::new(), kind, qualified_name),
        kind,
        name,
        qualified_name: qualified_name.to_string(),
        path: PathBuf::new(),
        signature: None,
        location: None,
        doc: None,
        comment: None,
        extra,
    };
    ctx.register_element(element)
}
