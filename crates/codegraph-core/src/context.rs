//! Per-file and project-wide symbol tables built during the two-phase pipeline.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use tree_sitter::Tree;

use crate::graph::Graph;
use crate::model::{CodeElement, ElementKind, GraphEdge, Location, NodeId};
use crate::registry::Resolver;

/// A byte-range index into a retained `tree_sitter::Tree`, used instead of a
/// borrowed `Node` so a `DefinitionEntry` can outlive the traversal that
/// created it without fighting the tree's lifetime. Re-locate the node with
/// `resolve` once the caller also holds the `Arc<Tree>` the handle was cut
/// from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AstHandle {
    pub start_byte: usize,
    pub end_byte: usize,
    pub kind_id: u16,
}

impl AstHandle {
    pub fn from_node(node: &tree_sitter::Node) -> Self {
        AstHandle {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            kind_id: node.kind_id(),
        }
    }

    /// Re-locate the node this handle describes within `tree`. Returns `None`
    /// if no descendant matches the recorded byte range and kind.
    pub fn resolve<'a>(&self, tree: &'a Tree) -> Option<tree_sitter::Node<'a>> {
        let node = tree
            .root_node()
            .descendant_for_byte_range(self.start_byte, self.end_byte)?;
        if node.kind_id() == self.kind_id {
            Some(node)
        } else {
            None
        }
    }

    pub fn to_location(&self, tree: &Tree) -> Option<Location> {
        let node = self.resolve(tree)?;
        Some(Location {
            start_line: node.start_position().row as u32 + 1,
            end_line: node.end_position().row as u32 + 1,
            start_column: node.start_position().column as u32,
            end_column: node.end_position().column as u32,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Class,
    Package,
    Constant,
}

#[derive(Debug, Clone)]
pub struct ImportEntry {
    pub raw_import_path: String,
    pub alias: String,
    pub kind: ImportKind,
    pub is_wildcard: bool,
    pub location: Option<Location>,
}

/// One definition registered from a file, indexed by its short name within
/// that file (`FileContext::definitions_by_sn`) and by QN in the
/// `GlobalContext`.
#[derive(Debug, Clone)]
pub struct DefinitionEntry {
    pub element_id: NodeId,
    pub qualified_name: String,
    pub parent_qn: String,
    pub ast: AstHandle,
}

/// A registered definition's byte range, kept so the extractor can find the
/// smallest enclosing definition of an action site (a call, a field read, a
/// cast) without re-walking AST parents by hand.
#[derive(Debug, Clone)]
pub struct ScopeEntry {
    pub ast: AstHandle,
    pub element_id: NodeId,
    pub qualified_name: String,
    pub kind: ElementKind,
}

/// Everything collected from a single source file during Phase 1.
pub struct FileContext {
    pub file_path: PathBuf,
    pub package_name: String,
    pub tree: Arc<Tree>,
    pub source: Arc<[u8]>,
    /// Short name -> ordered list of definitions (source order; duplicates
    /// accommodate overloads and same-named nested entities).
    pub definitions_by_sn: HashMap<String, Vec<DefinitionEntry>>,
    /// Import alias -> ordered list of import entries under that alias.
    pub imports: HashMap<String, Vec<ImportEntry>>,
    /// Every registered definition's byte range, for enclosing-scope lookup.
    pub scopes: Vec<ScopeEntry>,
}

impl FileContext {
    pub fn new(file_path: PathBuf, tree: Arc<Tree>, source: Arc<[u8]>) -> Self {
        FileContext {
            file_path,
            package_name: String::new(),
            tree,
            source,
            definitions_by_sn: HashMap::new(),
            imports: HashMap::new(),
            scopes: Vec::new(),
        }
    }

    pub fn add_definition(&mut self, short_name: &str, kind: ElementKind, entry: DefinitionEntry) {
        self.scopes.push(ScopeEntry {
            ast: entry.ast,
            element_id: entry.element_id,
            qualified_name: entry.qualified_name.clone(),
            kind,
        });
        self.definitions_by_sn
            .entry(short_name.to_string())
            .or_default()
            .push(entry);
    }

    /// The smallest registered scope whose byte range contains `byte_offset`.
    /// Ties (e.g. a field declaration and its single declarator sharing a
    /// range) resolve to the first-registered, which is source order.
    pub fn enclosing_scope(&self, byte_offset: usize) -> Option<&ScopeEntry> {
        let mut best: Option<&ScopeEntry> = None;
        for scope in &self.scopes {
            if scope.ast.start_byte <= byte_offset && byte_offset <= scope.ast.end_byte {
                let tighter = best
                    .map(|b| {
                        (scope.ast.end_byte - scope.ast.start_byte)
                            < (b.ast.end_byte - b.ast.start_byte)
                    })
                    .unwrap_or(true);
                if tighter {
                    best = Some(scope);
                }
            }
        }
        best
    }

    /// The smallest registered scope of a type-like kind (`Class`,
    /// `Interface`, `Enum`, `Annotation`) containing `byte_offset`. Distinct
    /// from `enclosing_scope`, which may return a tighter `Method`/`Field`
    /// scope that is not itself a type — needed to resolve `this`/`super`
    /// member access, which always targets the enclosing *type*.
    pub fn enclosing_type_scope(&self, byte_offset: usize) -> Option<&ScopeEntry> {
        let mut best: Option<&ScopeEntry> = None;
        for scope in &self.scopes {
            if !matches!(
                scope.kind,
                ElementKind::Class | ElementKind::Interface | ElementKind::Enum | ElementKind::Annotation
            ) {
                continue;
            }
            if scope.ast.start_byte <= byte_offset && byte_offset <= scope.ast.end_byte {
                let tighter = best
                    .map(|b| {
                        (scope.ast.end_byte - scope.ast.start_byte)
                            < (b.ast.end_byte - b.ast.start_byte)
                    })
                    .unwrap_or(true);
                if tighter {
                    best = Some(scope);
                }
            }
        }
        best
    }

    pub fn add_import(&mut self, entry: ImportEntry) {
        self.imports
            .entry(entry.alias.clone())
            .or_default()
            .push(entry);
    }

    pub fn wildcard_imports(&self) -> impl Iterator<Item = &ImportEntry> {
        self.imports.values().flatten().filter(|i| i.is_wildcard)
    }

    pub fn local(&self, short_name: &str) -> &[DefinitionEntry] {
        self.definitions_by_sn
            .get(short_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Project-wide state shared read-only across Phase-2 workers, and written
/// to (under guards) during Phase-1 registration and hierarchy synthesis.
pub struct GlobalContext {
    pub file_contexts: DashMap<PathBuf, Arc<FileContext>>,
    /// QN -> node ids; a `Vec` because QNs can collide across files or
    /// between a wildcard-imported symbol and a same-named local one.
    pub qn_index: DashMap<String, Vec<NodeId>>,
    pub graph: RwLock<Graph>,
    pub resolver: Arc<dyn Resolver>,
}

impl GlobalContext {
    pub fn new(resolver: Arc<dyn Resolver>) -> Self {
        GlobalContext {
            file_contexts: DashMap::new(),
            qn_index: DashMap::new(),
            graph: RwLock::new(Graph::new()),
            resolver,
        }
    }

    /// Register a fully-built element, returning its assigned `NodeId`.
    pub fn register_element(&self, element: CodeElement) -> NodeId {
        let qn = element.qualified_name.clone();
        let id = {
            let mut graph = self.graph.write().expect("graph lock poisoned");
            graph.add_node(element)
        };
        self.qn_index.entry(qn).or_default().push(id);
        id
    }

    pub fn register_edge(&self, edge: GraphEdge) {
        let mut graph = self.graph.write().expect("graph lock poisoned");
        graph.add_edge(edge);
    }

    /// Freeze a file's Phase-1 output into the global registry. Called once
    /// per file; overwrites any previous context for the same path (used by
    /// tests that re-register a fixture).
    pub fn register_file_context(&self, ctx: FileContext) {
        self.file_contexts.insert(ctx.file_path.clone(), Arc::new(ctx));
    }

    /// First definition registered under `qn`, if any.
    pub fn lookup_qn(&self, qn: &str) -> Option<NodeId> {
        self.qn_index.get(qn).and_then(|ids| ids.first().copied())
    }

    pub fn has_qn(&self, qn: &str) -> bool {
        self.qn_index.contains_key(qn)
    }

    /// Every QN in the index whose final segment (after the resolver's
    /// separator) equals `suffix`. Used by the inheritance walk's fallback
    /// when a superclass's package cannot be determined locally.
    pub fn qns_ending_in(&self, suffix: &str) -> Vec<String> {
        let dotted_suffix = format!(".{suffix}");
        self.qn_index
            .iter()
            .map(|e| e.key().clone())
            .filter(|qn| qn == suffix || qn.ends_with(&dotted_suffix))
            .collect()
    }
}
