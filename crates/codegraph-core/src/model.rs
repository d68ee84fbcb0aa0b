//! Core data structures for the code dependency graph

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Unique, stable identifier for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Deterministic hash of (path, kind, qualified_name). Two runs over unchanged
    /// input produce identical ids, which is what lets the pipeline be re-run without
    /// the emitted graph appearing to "drift".
    pub fn new(file_path: &PathBuf, kind: ElementKind, qualified_name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        file_path.hash(&mut hasher);
        kind.hash(&mut hasher);
        qualified_name.hash(&mut hasher);
        NodeId(hasher.finish())
    }
}

/// Unique edge identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct EdgeId(pub u64);

impl EdgeId {
    /// Deterministic hash of (source, target, kind, details), mirroring
    /// `NodeId::new` so re-running the pipeline over unchanged input
    /// produces identical edge ids.
    pub fn new(source: NodeId, target: NodeId, kind: DependencyType, details: Option<&str>) -> Self {
        let mut hasher = DefaultHasher::new();
        source.hash(&mut hasher);
        target.hash(&mut hasher);
        kind.hash(&mut hasher);
        details.hash(&mut hasher);
        EdgeId(hasher.finish())
    }
}

/// Discriminates what kind of code entity an element represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementKind {
    File,
    Package,
    Module,
    Namespace,
    Class,
    Interface,
    Struct,
    Enum,
    EnumConstant,
    Trait,
    Annotation,
    Function,
    Method,
    Macro,
    Variable,
    Constant,
    Field,
    Type,
    Unknown,
}

/// A single named entity in the code graph.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeElement {
    pub id: NodeId,
    pub kind: ElementKind,
    pub name: String,
    pub qualified_name: String,
    pub path: PathBuf,
    pub signature: Option<String>,
    pub location: Option<Location>,
    pub doc: Option<String>,
    pub comment: Option<String>,
    pub extra: Extra,
}

/// 1-based line, 0-based column source span.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: u32,
    pub end_column: u32,
}

/// Modifiers/annotations shared by every kind, plus an optional tagged payload
/// for the kinds that carry richer metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Extra {
    pub modifiers: Vec<String>,
    pub annotations: Vec<String>,
    #[serde(flatten)]
    pub kind: Option<ExtraKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "extraKind", rename_all = "camelCase")]
pub enum ExtraKind {
    Class(ClassExtra),
    Method(MethodExtra),
    Field(FieldExtra),
    EnumConstant(EnumConstantExtra),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClassExtra {
    pub super_class: Option<String>,
    pub implemented_interfaces: Vec<String>,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_builtin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MethodExtra {
    pub is_constructor: bool,
    pub return_type: Option<String>,
    pub parameters: Vec<String>,
    pub throws_types: Vec<String>,
    pub include_param_name_qn: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FieldExtra {
    pub r#type: Option<String>,
    pub is_constant: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnumConstantExtra {
    pub arguments: Option<String>,
}

/// What kind of relationship an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DependencyType {
    Import,
    Contain,
    Extend,
    Implement,
    Annotation,
    Call,
    Create,
    Use,
    Cast,
    Parameter,
    Return,
    Throw,
    /// Reserved for languages not yet registered (e.g. Rust `impl` blocks).
    ImplLink,
    /// Reserved for languages not yet registered (e.g. Python mixins).
    Mixin,
}

/// A lightweight pointer to an element, carried by a relation so the relation
/// stands alone in the JSONL stream without embedding the full element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementRef {
    pub kind: ElementKind,
    pub qualified_name: String,
    pub path: PathBuf,
}

impl ElementRef {
    pub fn from_element(element: &CodeElement) -> Self {
        ElementRef {
            kind: element.kind,
            qualified_name: element.qualified_name.clone(),
            path: element.path.clone(),
        }
    }
}

/// A directed, typed dependency edge between two elements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRelation {
    pub id: EdgeId,
    pub kind: DependencyType,
    pub source: ElementRef,
    pub target: ElementRef,
    pub location: Option<Location>,
    /// Free-form human-readable detail (e.g. the raw annotation text).
    pub details: Option<String>,
}

/// Internal edge storage keyed by `NodeId` rather than `ElementRef`, used by
/// the `Graph` wrapper. Converted to/from `DependencyRelation` at the edges of
/// the pipeline (see `Graph::to_relation`/`Graph::add_relation`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: DependencyType,
    pub location: Option<Location>,
    pub details: Option<String>,
}

/// Extra per-file/per-element free-form metadata not otherwise modeled.
/// Retained for forward-compat with the graph-DB loader's schema; unused by
/// the Java language support today.
pub type MetadataMap = HashMap<String, String>;
