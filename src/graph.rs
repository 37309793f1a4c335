//! Relationship graph over the canonical store.
//!
//! An undirected graph whose nodes are entity names. Person names and
//! organization names share one string-keyed namespace; each node carries a
//! [`NodeKind`] attribute, and each canonical record contributes one
//! `"works at"` edge between its person node and its organization node.
//! Records sharing an organization name share a single organization node,
//! which is how colleagues are discovered. The graph is built once per store
//! load and never mutated afterwards.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::store::CanonicalStore;

/// Relation label carried by every edge.
pub const WORKS_AT: &str = "works at";

/// Classification of a graph node.
///
/// A name re-encountered with a different role keeps the kind it was first
/// created with; node creation never resets attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A person from a canonical record's `name` field.
    Person,
    /// An organization from a canonical record's `organization` field.
    Organization,
}

/// Node payload: the entity name and its kind.
#[derive(Debug, Clone)]
pub struct EntityNode {
    /// Entity name (shared namespace for people and organizations).
    pub name: String,
    /// Kind assigned when the node was first created.
    pub kind: NodeKind,
}

/// Undirected graph linking people to the organizations they work at.
#[derive(Debug, Clone, Default)]
pub struct RelationshipGraph {
    graph: UnGraph<EntityNode, &'static str>,
    by_name: HashMap<String, NodeIndex>,
}

impl RelationshipGraph {
    /// Builds the graph from the store, deterministically in row order.
    ///
    /// For each record: ensure a Person node for its name, ensure an
    /// Organization node for its organization, then connect them with one
    /// `"works at"` edge (re-asserting an existing pair does not add a
    /// parallel edge).
    #[must_use]
    pub fn build(store: &CanonicalStore) -> Self {
        let mut graph = Self::default();

        for record in store.records() {
            let person = graph.ensure_node(&record.name, NodeKind::Person);
            let organization = graph.ensure_node(&record.organization, NodeKind::Organization);
            graph.graph.update_edge(person, organization, WORKS_AT);
        }

        info!(
            nodes = graph.graph.node_count(),
            edges = graph.graph.edge_count(),
            "relationship graph built"
        );
        graph
    }

    fn ensure_node(&mut self, name: &str, kind: NodeKind) -> NodeIndex {
        if let Some(&index) = self.by_name.get(name) {
            return index;
        }
        let index = self.graph.add_node(EntityNode {
            name: name.to_string(),
            kind,
        });
        self.by_name.insert(name.to_string(), index);
        index
    }

    /// Number of nodes in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Kind of the named node, if present.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<NodeKind> {
        self.by_name.get(name).map(|&index| self.graph[index].kind)
    }

    /// Up to `limit` neighbor names of the organization node, excluding
    /// `exclude`, in the graph's internal neighbor-iteration order.
    ///
    /// The order is deterministic for a fixed build but is not sorted;
    /// callers should not rely on it beyond set membership. A missing
    /// organization node yields an empty list, silently.
    #[must_use]
    pub fn colleagues_of(&self, organization: &str, exclude: &str, limit: usize) -> Vec<String> {
        let Some(&index) = self.by_name.get(organization) else {
            return Vec::new();
        };

        self.graph
            .neighbors(index)
            .filter_map(|neighbor| {
                let node = &self.graph[neighbor];
                if node.name == exclude {
                    None
                } else {
                    Some(node.name.clone())
                }
            })
            .take(limit)
            .collect()
    }
}
