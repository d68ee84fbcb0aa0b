//! Graph wrapper using petgraph::StableDiGraph with custom NodeId/EdgeId

use crate::model::*;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// The code graph — a directed multigraph with stable node/edge indices.
///
/// Node and edge ids are derived from content (`NodeId::new`/`EdgeId::new`),
/// not from petgraph's insertion-order indices, so the same input produces
/// the same ids regardless of the order Phase 1's parallel workers happen to
/// register things in. `node_index`/`edge_index` map those stable ids to the
/// underlying petgraph indices actually used for storage.
pub struct Graph {
    inner: StableDiGraph<CodeElement, GraphEdge>,
    node_index: HashMap<NodeId, NodeIndex>,
    edge_index: HashMap<EdgeId, EdgeIndex>,
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl Graph {
    pub fn new() -> Self {
        Graph {
            inner: StableDiGraph::new(),
            node_index: HashMap::new(),
            edge_index: HashMap::new(),
        }
    }

    /// Add an element to the graph, keyed by its content-derived id rather
    /// than whatever `element.id` the caller set. If an element with the same
    /// (path, kind, qualified_name) is already present, the existing node
    /// wins and no duplicate is inserted — mirrors `qn_index`'s first-wins
    /// lookup semantics.
    pub fn add_node(&mut self, mut element: CodeElement) -> NodeId {
        let id = NodeId::new(&element.path, element.kind, &element.qualified_name);
        if self.node_index.contains_key(&id) {
            return id;
        }
        element.id = id;
        let idx = self.inner.add_node(element);
        self.node_index.insert(id, idx);
        id
    }

    /// Add an edge to the graph, keyed by its content-derived id. Distinct
    /// edges that happen to hash to the same id (e.g. two calls to the same
    /// method from the same method, which `EdgeId::new` can't tell apart
    /// without a location) are still both inserted — only the last one wins
    /// the `edge_index` lookup slot, `all_edges`/`ancestors` see both.
    pub fn add_edge(&mut self, mut edge: GraphEdge) -> EdgeId {
        let id = EdgeId::new(edge.source, edge.target, edge.kind, edge.details.as_deref());
        edge.id = id;
        let (Some(&source_idx), Some(&target_idx)) =
            (self.node_index.get(&edge.source), self.node_index.get(&edge.target))
        else {
            return id;
        };
        let idx = self.inner.add_edge(source_idx, target_idx, edge);
        self.edge_index.insert(id, idx);
        id
    }

    /// Get an element by ID.
    pub fn node(&self, id: NodeId) -> Option<&CodeElement> {
        let idx = *self.node_index.get(&id)?;
        self.inner.node_weight(idx)
    }

    /// Get a mutable element by ID.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut CodeElement> {
        let idx = *self.node_index.get(&id)?;
        self.inner.node_weight_mut(idx)
    }

    /// Get an edge by ID.
    pub fn edge(&self, id: EdgeId) -> Option<&GraphEdge> {
        let idx = *self.edge_index.get(&id)?;
        self.inner.edge_weight(idx)
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn all_nodes(&self) -> impl Iterator<Item = &CodeElement> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// Mutable iterator over every element, used for the orchestrator's
    /// final path-normalization sweep.
    pub fn all_nodes_mut(&mut self) -> impl Iterator<Item = &mut CodeElement> {
        self.inner.node_weights_mut()
    }

    pub fn all_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.inner
            .edge_indices()
            .filter_map(move |idx| self.inner.edge_weight(idx))
    }

    /// Get all outgoing edges from a node.
    pub fn edges_from(&self, source: NodeId) -> impl Iterator<Item = &GraphEdge> {
        let idx = self.node_index.get(&source).copied();
        idx.into_iter().flat_map(move |idx| {
            self.inner
                .edges_directed(idx, Direction::Outgoing)
                .filter_map(move |edge_ref| self.inner.edge_weight(edge_ref.id()))
        })
    }

    /// Get all incoming edges to a node.
    pub fn edges_to(&self, target: NodeId) -> impl Iterator<Item = &GraphEdge> {
        let idx = self.node_index.get(&target).copied();
        idx.into_iter().flat_map(move |idx| {
            self.inner
                .edges_directed(idx, Direction::Incoming)
                .filter_map(move |edge_ref| self.inner.edge_weight(edge_ref.id()))
        })
    }

    /// Check if an edge of a given kind exists between two nodes.
    pub fn has_edge_between(&self, source: NodeId, target: NodeId, kind: DependencyType) -> bool {
        self.edges_from(source)
            .any(|e| e.target == target && e.kind == kind)
    }

    /// Find a node by short name (first match).
    pub fn find_node_by_name(&self, name: &str) -> Option<NodeId> {
        self.inner
            .node_weights()
            .find(|n| n.name == name)
            .map(|n| n.id)
    }

    /// Find a node by fully qualified name.
    pub fn find_node_by_qualified(&self, qualified_name: &str) -> Option<NodeId> {
        self.inner
            .node_weights()
            .find(|n| n.qualified_name == qualified_name)
            .map(|n| n.id)
    }

    /// Get all nodes of a specific kind.
    pub fn nodes_of_kind(&self, kind: ElementKind) -> impl Iterator<Item = NodeId> + '_ {
        self.inner
            .node_weights()
            .filter(move |n| n.kind == kind)
            .map(|n| n.id)
    }

    /// Remove a node and all its edges.
    pub fn remove_node(&mut self, id: NodeId) -> Option<CodeElement> {
        let idx = self.node_index.remove(&id)?;
        for edge_ref in self
            .inner
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.inner.edges_directed(idx, Direction::Incoming))
        {
            self.edge_index.remove(&edge_ref.weight().id);
        }
        self.inner.remove_node(idx)
    }

    /// Remove an edge by ID.
    pub fn remove_edge(&mut self, id: EdgeId) -> Option<GraphEdge> {
        let idx = self.edge_index.remove(&id)?;
        self.inner.remove_edge(idx)
    }

    /// Get all nodes that are ancestors of a given node, following Contain edges.
    pub fn ancestors(&self, node: NodeId) -> HashSet<NodeId> {
        let mut ancestors = HashSet::new();
        let mut to_visit = vec![node];

        while let Some(current) = to_visit.pop() {
            let Some(&current_idx) = self.node_index.get(&current) else { continue };
            for edge_ref in self.inner.edges_directed(current_idx, Direction::Incoming) {
                if let Some(edge) = self.inner.edge_weight(edge_ref.id()) {
                    if edge.kind == DependencyType::Contain && !ancestors.contains(&edge.source) {
                        ancestors.insert(edge.source);
                        to_visit.push(edge.source);
                    }
                }
            }
        }

        ancestors
    }

    /// Materialize a `GraphEdge` into a self-contained `DependencyRelation`,
    /// resolving both endpoints' `ElementRef`s. Returns `None` if either
    /// endpoint has been removed from the graph.
    pub fn to_relation(&self, edge: &GraphEdge) -> Option<DependencyRelation> {
        let source = ElementRef::from_element(self.node(edge.source)?);
        let target = ElementRef::from_element(self.node(edge.target)?);
        Some(DependencyRelation {
            id: edge.id,
            kind: edge.kind,
            source,
            target,
            location: edge.location,
            details: edge.details.clone(),
        })
    }

    /// Materialize every edge as a `DependencyRelation`, dropping any whose
    /// endpoints no longer resolve.
    pub fn all_relations(&self) -> Vec<DependencyRelation> {
        self.all_edges().filter_map(|e| self.to_relation(e)).collect()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
