//! Unit tests for codegraph-core

use crate::context::{AstHandle, DefinitionEntry, GlobalContext};
use crate::model::*;
use crate::registry::Resolver;
use std::path::PathBuf;
use std::sync::Arc;

#[test]
fn test_node_id_creation() {
    let path = PathBuf::from("test.java");
    let node_id = NodeId::new(&path, ElementKind::Method, "pkg.Foo.bar()");

    let same_id = NodeId::new(&path, ElementKind::Method, "pkg.Foo.bar()");
    assert_eq!(node_id, same_id);

    let different_id = NodeId::new(&path, ElementKind::Method, "pkg.Foo.baz()");
    assert_ne!(node_id, different_id);
}

fn sample_element(id: u64, kind: ElementKind, name: &str, qn: &str) -> CodeElement {
    CodeElement {
        id: NodeId(id),
        kind,
        name: name.to_string(),
        qualified_name: qn.to_string(),
        path: PathBuf::from("test.java"),
        signature: None,
        location: None,
        doc: None,
        comment: None,
        extra: Extra::default(),
    }
}

#[test]
fn test_code_element_creation() {
    let element = sample_element(1, ElementKind::Method, "bar", "pkg.Foo.bar()");
    assert_eq!(element.name, "bar");
    assert_eq!(element.kind, ElementKind::Method);
}

#[test]
fn test_graph_operations() {
    let mut graph = Graph::new();

    let id1 = graph.add_node(sample_element(0, ElementKind::Class, "Foo", "pkg.Foo"));
    let id2 = graph.add_node(sample_element(0, ElementKind::Method, "bar", "pkg.Foo.bar()"));

    assert_eq!(graph.node_count(), 2);

    let edge = GraphEdge {
        id: EdgeId(0),
        source: id1,
        target: id2,
        kind: DependencyType::Contain,
        location: None,
        details: None,
    };
    graph.add_edge(edge);
    assert_eq!(graph.edge_count(), 1);

    assert!(graph.has_edge_between(id1, id2, DependencyType::Contain));
}

#[test]
fn test_graph_to_relation() {
    let mut graph = Graph::new();
    let id1 = graph.add_node(sample_element(0, ElementKind::Class, "Foo", "pkg.Foo"));
    let id2 = graph.add_node(sample_element(0, ElementKind::Method, "bar", "pkg.Foo.bar()"));
    let edge_id = graph.add_edge(GraphEdge {
        id: EdgeId(0),
        source: id1,
        target: id2,
        kind: DependencyType::Contain,
        location: None,
        details: None,
    });

    let edge = graph.edge(edge_id).unwrap();
    let relation = graph.to_relation(edge).unwrap();
    assert_eq!(relation.source.qualified_name, "pkg.Foo");
    assert_eq!(relation.target.qualified_name, "pkg.Foo.bar()");
    assert_eq!(relation.kind, DependencyType::Contain);
}

#[test]
fn test_dependency_type_set() {
    let kinds = vec![
        DependencyType::Call,
        DependencyType::Create,
        DependencyType::Use,
        DependencyType::Import,
    ];
    let mut set = std::collections::HashSet::new();
    for kind in kinds {
        set.insert(kind);
    }
    assert_eq!(set.len(), 4);
    assert!(set.contains(&DependencyType::Call));
}

#[test]
fn test_element_kind_match() {
    let kind = ElementKind::Method;
    match kind {
        ElementKind::Method => (),
        _ => panic!("expected Method"),
    }
}

#[test]
fn test_graph_ancestors() {
    let mut graph = Graph::new();

    let pkg = graph.add_node(sample_element(0, ElementKind::Package, "pkg", "pkg"));
    let file = graph.add_node(sample_element(0, ElementKind::File, "Foo.java", "Foo.java"));
    let class = graph.add_node(sample_element(0, ElementKind::Class, "Foo", "pkg.Foo"));

    graph.add_edge(GraphEdge {
        id: EdgeId(0),
        source: pkg,
        target: file,
        kind: DependencyType::Contain,
        location: None,
        details: None,
    });
    graph.add_edge(GraphEdge {
        id: EdgeId(0),
        source: file,
        target: class,
        kind: DependencyType::Contain,
        location: None,
        details: None,
    });

    let ancestors = graph.ancestors(class);
    assert!(ancestors.contains(&file));
    assert!(ancestors.contains(&pkg));
}

#[test]
fn test_node_id_serialization() {
    let node_id = NodeId(42);
    let json = serde_json::to_string(&node_id).unwrap();
    let deserialized: NodeId = serde_json::from_str(&json).unwrap();
    assert_eq!(node_id, deserialized);
}

#[test]
fn test_code_element_serialization() {
    let element = sample_element(1, ElementKind::Field, "count", "pkg.Foo.count");
    let json = serde_json::to_string(&element).unwrap();
    let deserialized: CodeElement = serde_json::from_str(&json).unwrap();
    assert_eq!(element.id, deserialized.id);
    assert_eq!(element.qualified_name, deserialized.qualified_name);
}

#[test]
fn test_method_extra_round_trip() {
    let mut element = sample_element(1, ElementKind::Method, "bar", "pkg.Foo.bar(int)");
    element.extra.kind = Some(ExtraKind::Method(MethodExtra {
        is_constructor: false,
        return_type: Some("void".to_string()),
        parameters: vec!["int n".to_string()],
        throws_types: vec![],
        include_param_name_qn: "pkg.Foo.bar(int n)".to_string(),
    }));

    let json = serde_json::to_string(&element).unwrap();
    let back: CodeElement = serde_json::from_str(&json).unwrap();
    match back.extra.kind {
        Some(ExtraKind::Method(m)) => assert_eq!(m.return_type.as_deref(), Some("void")),
        other => panic!("expected Method extra, got {other:?}"),
    }
}

struct DotResolver;

impl Resolver for DotResolver {
    fn separator(&self) -> &'static str {
        "."
    }

    fn register_package(&self, ctx: &GlobalContext, package_name: &str) {
        if package_name.is_empty() {
            return;
        }
        let mut prefix = String::new();
        for segment in package_name.split('.') {
            prefix = if prefix.is_empty() {
                segment.to_string()
            } else {
                format!("{prefix}.{segment}")
            };
            if !ctx.has_qn(&prefix) {
                ctx.register_element(sample_element(0, ElementKind::Package, segment, &prefix));
            }
        }
    }

    fn resolve(
        &self,
        ctx: &GlobalContext,
        file_ctx: &crate::context::FileContext,
        short_name: &str,
    ) -> Vec<DefinitionEntry> {
        let local = file_ctx.local(short_name);
        if !local.is_empty() {
            return local.to_vec();
        }
        let qn = self.build_qualified_name(&file_ctx.package_name, short_name);
        ctx.lookup_qn(&qn)
            .map(|id| {
                vec![DefinitionEntry {
                    element_id: id,
                    qualified_name: qn.clone(),
                    parent_qn: file_ctx.package_name.clone(),
                    ast: AstHandle {
                        start_byte: 0,
                        end_byte: 0,
                        kind_id: 0,
                    },
                }]
            })
            .unwrap_or_default()
    }
}

#[test]
fn test_global_context_register_and_lookup() {
    let ctx = GlobalContext::new(Arc::new(DotResolver));
    let id = ctx.register_element(sample_element(0, ElementKind::Class, "Foo", "pkg.Foo"));
    assert_eq!(ctx.lookup_qn("pkg.Foo"), Some(id));
    assert!(ctx.has_qn("pkg.Foo"));
    assert!(!ctx.has_qn("pkg.Bar"));
}

#[test]
fn test_register_package_creates_prefixes() {
    let ctx = GlobalContext::new(Arc::new(DotResolver));
    ctx.resolver.register_package(&ctx, "com.example.app");
    assert!(ctx.has_qn("com"));
    assert!(ctx.has_qn("com.example"));
    assert!(ctx.has_qn("com.example.app"));
}

#[test]
fn test_qns_ending_in_suffix_match() {
    let ctx = GlobalContext::new(Arc::new(DotResolver));
    ctx.register_element(sample_element(0, ElementKind::Class, "Base", "com.example.Base"));
    let matches = ctx.qns_ending_in("Base");
    assert_eq!(matches, vec!["com.example.Base".to_string()]);
}

#[test]
fn test_ast_handle_resolve_round_trip() {
    let source = b"class Foo { void bar() {} }".to_vec();
    let mut parser = tree_sitter::Parser::new();
    let language: tree_sitter::Language = tree_sitter_java::LANGUAGE.into();
    parser.set_language(&language).unwrap();
    let tree = parser.parse(&source, None).unwrap();

    let root = tree.root_node();
    let class_node = root.child(0).unwrap();
    let handle = AstHandle::from_node(&class_node);

    let resolved = handle.resolve(&tree).unwrap();
    assert_eq!(resolved.kind(), class_node.kind());
    assert_eq!(resolved.start_byte(), class_node.start_byte());
}

#[test]
fn test_inheritance_walk_finds_member_through_superclass() {
    let ctx = GlobalContext::new(Arc::new(DotResolver));

    let mut base = sample_element(0, ElementKind::Class, "Base", "pkg.Base");
    base.extra.kind = Some(ExtraKind::Class(ClassExtra::default()));
    ctx.register_element(base);

    let mut child = sample_element(0, ElementKind::Class, "Child", "pkg.Child");
    child.extra.kind = Some(ExtraKind::Class(ClassExtra {
        super_class: Some("Base".to_string()),
        ..Default::default()
    }));
    ctx.register_element(child);

    let field = sample_element(0, ElementKind::Field, "value", "pkg.Base.value");
    let field_id = ctx.register_element(field);

    let found = crate::inheritance::walk(&ctx, "pkg.Child", "value");
    assert_eq!(found, Some(field_id));
}
