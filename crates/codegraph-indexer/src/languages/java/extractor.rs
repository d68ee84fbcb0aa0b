//! Phase 2: turn a file's complete, now-global symbol table into relations.
//!
//! Three passes, run in order but sharing nothing but `ctx`:
//!   E1 - import declarations become IMPORT edges from the file element.
//!   E2 - each registered definition's metadata (superclass, interfaces,
//!        annotations, parameter/return/throws types) becomes structural
//!        edges, read under one `GlobalContext::graph` read-lock pass so it
//!        doesn't interleave with the write-locking `register_element` calls
//!        E3 may still need to make.
//!   E3 - a single tree-sitter query over the file's retained `Tree` finds
//!        every call/creation/use/cast site and resolves its target through
//!        the same prefix-resolution chain (this/super/identifier/nested
//!        member access) regardless of which action captured it.

use std::path::Path;
use std::sync::OnceLock;

use anyhow::{anyhow, Result};
use codegraph_core::context::{ImportEntry, ImportKind};
use codegraph_core::inheritance;
use codegraph_core::text::clean_type_text;
use codegraph_core::{
    DependencyType, ElementKind, ExtraKind, FileContext, GlobalContext, GraphEdge, Location, NodeId,
};
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Query, QueryCursor};

use crate::extractor::{make_edge, materialize_builtin, unknown_element};
use crate::heuristics;

use super::builtins;

pub fn extract(ctx: &GlobalContext, file_path: &Path) -> Result<Vec<GraphEdge>> {
    let file_ctx = ctx
        .file_contexts
        .get(file_path)
        .map(|entry| std::sync::Arc::clone(entry.value()))
        .ok_or_else(|| anyhow!("no file context registered for {}", file_path.display()))?;

    let mut edges = Vec::new();
    extract_imports(ctx, file_path, &file_ctx, &mut edges);
    extract_structural(ctx, file_path, &file_ctx, &mut edges);
    extract_actions(ctx, file_path, &file_ctx, &mut edges)?;
    Ok(edges)
}

// ---------------------------------------------------------------------
// E1 - imports
// ---------------------------------------------------------------------

fn extract_imports(ctx: &GlobalContext, file_path: &Path, file_ctx: &FileContext, edges: &mut Vec<GraphEdge>) {
    let file_qn = file_ctx.file_path.to_string_lossy().to_string();
    let Some(file_id) = ctx.lookup_qn(&file_qn) else { return };

    for entries in file_ctx.imports.values() {
        for imp in entries {
            let target_id = resolve_import_target(ctx, file_path, imp);
            edges.push(make_edge(file_id, target_id, DependencyType::Import, imp.location, None));
        }
    }
}

fn resolve_import_target(ctx: &GlobalContext, file_path: &Path, imp: &ImportEntry) -> NodeId {
    if imp.is_wildcard {
        let pkg_qn = imp.raw_import_path.clone();
        ctx.resolver.register_package(ctx, &pkg_qn);
        return ctx
            .lookup_qn(&pkg_qn)
            .unwrap_or_else(|| unknown_element(ctx, file_path, &pkg_qn));
    }

    if let Some(id) = ctx.lookup_qn(&imp.raw_import_path) {
        return id;
    }

    let last = imp
        .raw_import_path
        .rsplit('.')
        .next()
        .unwrap_or(&imp.raw_import_path);
    if let Some(entry) = builtins::lookup(last) {
        return materialize_builtin(ctx, entry.qualified_name, entry.kind);
    }

    unknown_element(ctx, file_path, &imp.raw_import_path)
}

// ---------------------------------------------------------------------
// E2 - structural edges from definition metadata
// ---------------------------------------------------------------------

struct DefSnapshot {
    id: NodeId,
    kind: ElementKind,
    parent_qn: String,
    location: Option<Location>,
    annotations: Vec<String>,
    extra_kind: Option<ExtraKind>,
}

fn snapshot_definitions(ctx: &GlobalContext, file_ctx: &FileContext) -> Vec<DefSnapshot> {
    let graph = ctx.graph.read().expect("graph lock poisoned");
    let mut out = Vec::new();
    for defs in file_ctx.definitions_by_sn.values() {
        for def in defs {
            let Some(element) = graph.node(def.element_id) else { continue };
            out.push(DefSnapshot {
                id: def.element_id,
                kind: element.kind,
                parent_qn: def.parent_qn.clone(),
                location: element.location,
                annotations: element.extra.annotations.clone(),
                extra_kind: element.extra.kind.clone(),
            });
        }
    }
    out
}

fn extract_structural(ctx: &GlobalContext, file_path: &Path, file_ctx: &FileContext, edges: &mut Vec<GraphEdge>) {
    for snap in snapshot_definitions(ctx, file_ctx) {
        if !snap.parent_qn.is_empty() && snap.parent_qn != file_ctx.package_name && ctx.has_qn(&snap.parent_qn) {
            if let Some(parent_id) = ctx.lookup_qn(&snap.parent_qn) {
                edges.push(make_edge(parent_id, snap.id, DependencyType::Contain, None, None));
            }
        }

        for raw in &snap.annotations {
            let cleaned = codegraph_core::text::clean_annotation_text(raw);
            let target = resolve_type(ctx, file_ctx, file_path, &cleaned);
            edges.push(make_edge(
                snap.id,
                target,
                DependencyType::Annotation,
                snap.location,
                Some(raw.clone()),
            ));
        }

        match &snap.extra_kind {
            Some(ExtraKind::Class(class)) => {
                if let Some(super_raw) = &class.super_class {
                    let target = resolve_type(ctx, file_ctx, file_path, super_raw);
                    edges.push(make_edge(snap.id, target, DependencyType::Extend, snap.location, None));
                }
                let iface_kind = if snap.kind == ElementKind::Interface {
                    DependencyType::Extend
                } else {
                    DependencyType::Implement
                };
                for iface_raw in &class.implemented_interfaces {
                    let target = resolve_type(ctx, file_ctx, file_path, iface_raw);
                    edges.push(make_edge(snap.id, target, iface_kind, snap.location, None));
                }
            }
            Some(ExtraKind::Method(method)) => {
                if let Some(ret) = &method.return_type {
                    let target = resolve_type(ctx, file_ctx, file_path, ret);
                    edges.push(make_edge(snap.id, target, DependencyType::Return, snap.location, None));
                }
                for param in &method.parameters {
                    let type_part = param.rsplit_once(' ').map(|(t, _)| t).unwrap_or(param.as_str());
                    let target = resolve_type(ctx, file_ctx, file_path, type_part);
                    edges.push(make_edge(snap.id, target, DependencyType::Parameter, snap.location, None));
                }
                for throws in &method.throws_types {
                    let target = resolve_type(ctx, file_ctx, file_path, throws);
                    edges.push(make_edge(snap.id, target, DependencyType::Throw, snap.location, None));
                }
            }
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------
// Shared name resolution helpers (E2 + E3)
// ---------------------------------------------------------------------

fn resolve_name(ctx: &GlobalContext, file_ctx: &FileContext, file_path: &Path, short_name: &str) -> NodeId {
    let candidates = ctx.resolver.resolve(ctx, file_ctx, short_name);
    if let Some(first) = candidates.first() {
        return first.element_id;
    }
    if let Some(entry) = builtins::lookup(short_name) {
        return materialize_builtin(ctx, entry.qualified_name, entry.kind);
    }
    if let Some(implicit) = heuristics::implicit_java_lang(short_name) {
        return materialize_builtin(ctx, &implicit, ElementKind::Class);
    }
    unknown_element(ctx, file_path, short_name)
}

fn resolve_type(ctx: &GlobalContext, file_ctx: &FileContext, file_path: &Path, raw: &str) -> NodeId {
    let cleaned = clean_type_text(raw);
    if cleaned.is_empty() {
        return unknown_element(ctx, file_path, raw);
    }
    resolve_name(ctx, file_ctx, file_path, &cleaned)
}

/// Append `()` to a call target's final segment if it isn't already a method
/// QN, so textual resolution of a call target matches the stored method QN
/// format regardless of which branch produced the raw string.
fn canonicalize_call_qn(qn: &str) -> String {
    let last = qn.rsplit('.').next().unwrap_or(qn);
    if last.contains('(') {
        qn.to_string()
    } else {
        format!("{qn}()")
    }
}

fn is_known_builtin_prefix(qn: &str) -> bool {
    qn.starts_with("java.")
}

fn super_class_text(ctx: &GlobalContext, class_qn: &str) -> Option<String> {
    let id = ctx.lookup_qn(class_qn)?;
    let graph = ctx.graph.read().expect("graph lock poisoned");
    match &graph.node(id)?.extra.kind {
        Some(ExtraKind::Class(c)) => c.super_class.clone(),
        _ => None,
    }
}

fn text(source: &[u8], node: Node) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}

fn location_of(node: Node) -> Option<Location> {
    Some(Location {
        start_line: node.start_position().row as u32 + 1,
        end_line: node.end_position().row as u32 + 1,
        start_column: node.start_position().column as u32,
        end_column: node.end_position().column as u32,
    })
}

fn enclosing_source(file_ctx: &FileContext, node: Node) -> Option<NodeId> {
    file_ctx.enclosing_scope(node.start_byte()).map(|s| s.element_id)
}

/// Resolve an object-position expression (`this`, `super`, a plain
/// identifier, or a nested `field_access`) to a QN and whether it names a
/// class-like element. Recursive so `a.b.c` resolves `a`, then `a.b`, before
/// the caller resolves the final `.c` hop itself (a method call or a field
/// read, which disambiguate differently at that last step).
fn resolve_prefix_qn(
    ctx: &GlobalContext,
    file_ctx: &FileContext,
    source: &[u8],
    node: Node,
) -> (String, bool) {
    match node.kind() {
        "this" => match file_ctx.enclosing_type_scope(node.start_byte()) {
            Some(scope) => (scope.qualified_name.clone(), true),
            None => (String::new(), false),
        },
        "super" => match file_ctx.enclosing_type_scope(node.start_byte()) {
            Some(scope) => match super_class_text(ctx, &scope.qualified_name) {
                Some(super_raw) => {
                    let cleaned = clean_type_text(&super_raw);
                    let qn = match ctx.lookup_qn(&cleaned) {
                        Some(_) => cleaned,
                        None => ctx.qns_ending_in(&cleaned).into_iter().next().unwrap_or(cleaned),
                    };
                    (qn, true)
                }
                None => (String::new(), false),
            },
            None => (String::new(), false),
        },
        "field_access" => {
            let (Some(inner), Some(field_node)) = (
                node.child_by_field_name("object"),
                node.child_by_field_name("field"),
            ) else {
                return (text(source, node), false);
            };
            let field_name = text(source, field_node);
            let (inner_qn, inner_is_class) = resolve_prefix_qn(ctx, file_ctx, source, inner);
            if inner_is_class {
                if let Some(id) = inheritance::walk(ctx, &inner_qn, &field_name) {
                    let graph = ctx.graph.read().expect("graph lock poisoned");
                    if let Some(el) = graph.node(id) {
                        return (el.qualified_name.clone(), false);
                    }
                }
            }
            if inner_qn.is_empty() {
                (field_name, false)
            } else {
                (format!("{inner_qn}.{field_name}"), false)
            }
        }
        "identifier" | "type_identifier" => {
            let name = text(source, node);
            let candidates = ctx.resolver.resolve(ctx, file_ctx, &name);
            if let Some(first) = candidates.first() {
                let is_class = {
                    let graph = ctx.graph.read().expect("graph lock poisoned");
                    graph.node(first.element_id).is_some_and(|e| {
                        matches!(
                            e.kind,
                            ElementKind::Class | ElementKind::Interface | ElementKind::Enum | ElementKind::Annotation
                        )
                    })
                };
                return (first.qualified_name.clone(), is_class);
            }
            if let Some(entry) = builtins::lookup(&name) {
                let is_class = matches!(
                    entry.kind,
                    ElementKind::Class | ElementKind::Interface | ElementKind::Enum | ElementKind::Annotation
                );
                return (entry.qualified_name.to_string(), is_class);
            }
            if let Some(implicit) = heuristics::implicit_java_lang(&name) {
                return (implicit, true);
            }
            (name, false)
        }
        "object_creation_expression" => {
            let Some(type_node) = node.child_by_field_name("type") else {
                return (text(source, node), false);
            };
            let cleaned = clean_type_text(&text(source, type_node));
            let candidates = ctx.resolver.resolve(ctx, file_ctx, &cleaned);
            if let Some(first) = candidates.first() {
                return (first.qualified_name.clone(), true);
            }
            if let Some(entry) = builtins::lookup(&cleaned) {
                return (entry.qualified_name.to_string(), true);
            }
            if let Some(implicit) = heuristics::implicit_java_lang(&cleaned) {
                return (implicit, true);
            }
            (cleaned, true)
        }
        "parenthesized_expression" => match node.named_child(0) {
            Some(inner) => resolve_prefix_qn(ctx, file_ctx, source, inner),
            None => (text(source, node), false),
        },
        _ => (text(source, node), false),
    }
}

// ---------------------------------------------------------------------
// E3 - action edges via a single tree-sitter query
// ---------------------------------------------------------------------

const ACTION_QUERY_SRC: &str = r#"
(method_invocation) @call
(method_reference) @mref
(explicit_constructor_invocation) @ctor
(object_creation_expression) @create
(field_access) @use
(cast_expression) @cast
"#;

static ACTION_QUERY: OnceLock<Query> = OnceLock::new();

fn action_query() -> &'static Query {
    ACTION_QUERY.get_or_init(|| {
        let grammar: Language = tree_sitter_java::LANGUAGE.into();
        Query::new(&grammar, ACTION_QUERY_SRC).expect("action query must compile")
    })
}

fn extract_actions(ctx: &GlobalContext, file_path: &Path, file_ctx: &FileContext, edges: &mut Vec<GraphEdge>) -> Result<()> {
    let query = action_query();
    let source: &[u8] = &file_ctx.source;
    let names = query.capture_names();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, file_ctx.tree.root_node(), source);
    while let Some(m) = matches.next() {
        for capture in m.captures {
            let node = capture.node;
            match names[capture.index as usize] {
                "call" => handle_call(ctx, file_ctx, file_path, source, node, edges),
                "mref" => handle_mref(ctx, file_ctx, file_path, source, node, edges),
                "ctor" => handle_ctor(ctx, file_ctx, file_path, source, node, edges),
                "create" => handle_create(ctx, file_ctx, file_path, source, node, edges),
                "use" => handle_use(ctx, file_ctx, file_path, source, node, edges),
                "cast" => handle_cast(ctx, file_ctx, file_path, source, node, edges),
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_create(ctx: &GlobalContext, file_ctx: &FileContext, file_path: &Path, source: &[u8], node: Node, edges: &mut Vec<GraphEdge>) {
    let Some(source_id) = enclosing_source(file_ctx, node) else { return };
    let Some(type_node) = node.child_by_field_name("type") else { return };
    let raw_type = text(source, type_node);
    let target = resolve_type(ctx, file_ctx, file_path, &raw_type);
    edges.push(make_edge(source_id, target, DependencyType::Create, location_of(node), None));
}

fn handle_cast(ctx: &GlobalContext, file_ctx: &FileContext, file_path: &Path, source: &[u8], node: Node, edges: &mut Vec<GraphEdge>) {
    let Some(source_id) = enclosing_source(file_ctx, node) else { return };
    let Some(type_node) = node.child_by_field_name("type") else { return };
    let raw_type = text(source, type_node);
    let target = resolve_type(ctx, file_ctx, file_path, &raw_type);
    edges.push(make_edge(source_id, target, DependencyType::Cast, location_of(node), None));
}

fn handle_use(ctx: &GlobalContext, file_ctx: &FileContext, file_path: &Path, source: &[u8], node: Node, edges: &mut Vec<GraphEdge>) {
    let Some(source_id) = enclosing_source(file_ctx, node) else { return };
    let (Some(obj_node), Some(field_node)) = (
        node.child_by_field_name("object"),
        node.child_by_field_name("field"),
    ) else {
        return;
    };
    let field_name = text(source, field_node);
    let (prefix_qn, prefix_is_class) = resolve_prefix_qn(ctx, file_ctx, source, obj_node);

    let target_id = if prefix_is_class {
        match inheritance::walk(ctx, &prefix_qn, &field_name) {
            Some(id) => id,
            None => {
                let qn = format!("{prefix_qn}.{field_name}");
                if is_known_builtin_prefix(&prefix_qn) {
                    materialize_builtin(ctx, &qn, ElementKind::Field)
                } else {
                    unknown_element(ctx, file_path, &qn)
                }
            }
        }
    } else if prefix_qn.is_empty() {
        unknown_element(ctx, file_path, &field_name)
    } else {
        let qn = format!("{prefix_qn}.{field_name}");
        if is_known_builtin_prefix(&prefix_qn) {
            materialize_builtin(ctx, &qn, ElementKind::Field)
        } else {
            unknown_element(ctx, file_path, &qn)
        }
    };
    edges.push(make_edge(source_id, target_id, DependencyType::Use, location_of(node), None));
}

fn handle_call(ctx: &GlobalContext, file_ctx: &FileContext, file_path: &Path, source: &[u8], node: Node, edges: &mut Vec<GraphEdge>) {
    let Some(source_id) = enclosing_source(file_ctx, node) else { return };
    let Some(name_node) = node.child_by_field_name("name") else { return };
    let member_name = text(source, name_node);
    let target_id = resolve_call_target(ctx, file_ctx, file_path, node, &member_name, source);
    edges.push(make_edge(source_id, target_id, DependencyType::Call, location_of(node), None));
}

fn resolve_call_target(
    ctx: &GlobalContext,
    file_ctx: &FileContext,
    file_path: &Path,
    node: Node,
    member_name: &str,
    source: &[u8],
) -> NodeId {
    match node.child_by_field_name("object") {
        None => {
            if let Some(imports) = file_ctx.imports.get(member_name) {
                if let Some(imp) = imports.iter().find(|i| matches!(i.kind, ImportKind::Constant)) {
                    let qn = canonicalize_call_qn(&imp.raw_import_path);
                    return ctx.lookup_qn(&qn).unwrap_or_else(|| unknown_element(ctx, file_path, &qn));
                }
            }
            let candidates = ctx.resolver.resolve(ctx, file_ctx, member_name);
            if let Some(first) = candidates.first() {
                let qn = canonicalize_call_qn(&first.qualified_name);
                return ctx.lookup_qn(&qn).unwrap_or(first.element_id);
            }
            if let Some(entry) = builtins::lookup(member_name) {
                return materialize_builtin(ctx, &canonicalize_call_qn(entry.qualified_name), entry.kind);
            }
            if let Some(implicit) = heuristics::implicit_java_lang(member_name) {
                return materialize_builtin(ctx, &canonicalize_call_qn(&implicit), ElementKind::Class);
            }
            unknown_element(ctx, file_path, &canonicalize_call_qn(member_name))
        }
        Some(obj_node) => {
            let (prefix_qn, is_class) = resolve_prefix_qn(ctx, file_ctx, source, obj_node);

            if is_class && !prefix_qn.is_empty() {
                if let Some(id) =
                    inheritance::walk_with_key(ctx, &prefix_qn, member_name, |c, m| format!("{c}.{m}()"))
                {
                    return id;
                }
            }

            if prefix_qn.is_empty() {
                return unknown_element(ctx, file_path, &canonicalize_call_qn(member_name));
            }

            let qn = canonicalize_call_qn(&format!("{prefix_qn}.{member_name}"));
            if is_known_builtin_prefix(&prefix_qn) || is_class {
                materialize_builtin(ctx, &qn, ElementKind::Method)
            } else {
                ctx.lookup_qn(&qn).unwrap_or_else(|| unknown_element(ctx, file_path, &qn))
            }
        }
    }
}

fn handle_ctor(ctx: &GlobalContext, file_ctx: &FileContext, file_path: &Path, source: &[u8], node: Node, edges: &mut Vec<GraphEdge>) {
    let Some(source_id) = enclosing_source(file_ctx, node) else { return };
    let Some(type_scope) = file_ctx.enclosing_type_scope(node.start_byte()) else { return };
    let type_qn = type_scope.qualified_name.clone();
    let keyword = node.child(0).map(|n| text(source, n)).unwrap_or_default();

    let target_id = if keyword == "super" {
        match super_class_text(ctx, &type_qn) {
            Some(super_raw) => {
                let cleaned = clean_type_text(&super_raw);
                let super_qn = match ctx.lookup_qn(&cleaned) {
                    Some(_) => cleaned.clone(),
                    None => ctx.qns_ending_in(&cleaned).into_iter().next().unwrap_or(cleaned),
                };
                let short = super_qn.rsplit('.').next().unwrap_or(&super_qn).to_string();
                let ctor_qn = format!("{super_qn}.{short}()");
                ctx.lookup_qn(&ctor_qn).unwrap_or_else(|| unknown_element(ctx, file_path, &ctor_qn))
            }
            None => unknown_element(ctx, file_path, "java.lang.Object.Object()"),
        }
    } else {
        let short = type_qn.rsplit('.').next().unwrap_or(&type_qn).to_string();
        let ctor_qn = format!("{type_qn}.{short}()");
        ctx.lookup_qn(&ctor_qn).unwrap_or_else(|| unknown_element(ctx, file_path, &ctor_qn))
    };
    edges.push(make_edge(source_id, target_id, DependencyType::Call, location_of(node), None));
}

fn handle_mref(ctx: &GlobalContext, file_ctx: &FileContext, file_path: &Path, source: &[u8], node: Node, edges: &mut Vec<GraphEdge>) {
    let Some(source_id) = enclosing_source(file_ctx, node) else { return };
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).filter(|c| c.is_named() || c.kind() == "new").collect();
    let Some(&object_node) = children.first() else { return };
    let Some(&last) = children.last() else { return };
    let member_name = text(source, last);

    let target_id = if member_name == "new" {
        let raw_type = text(source, object_node);
        resolve_type(ctx, file_ctx, file_path, &raw_type)
    } else {
        let (prefix_qn, is_class) = resolve_prefix_qn(ctx, file_ctx, source, object_node);
        if is_class && !prefix_qn.is_empty() {
            inheritance::walk_with_key(ctx, &prefix_qn, &member_name, |c, m| format!("{c}.{m}()"))
                .unwrap_or_else(|| unknown_element(ctx, file_path, &canonicalize_call_qn(&format!("{prefix_qn}.{member_name}"))))
        } else if prefix_qn.is_empty() {
            unknown_element(ctx, file_path, &canonicalize_call_qn(&member_name))
        } else {
            unknown_element(ctx, file_path, &canonicalize_call_qn(&format!("{prefix_qn}.{member_name}")))
        }
    };
    edges.push(make_edge(source_id, target_id, DependencyType::Call, location_of(node), None));
}
