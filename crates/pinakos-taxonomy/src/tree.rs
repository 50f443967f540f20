//! Tree storage and traversal.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use pinakos_core::{Error, Lang, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;

/// A single taxonomy node.
///
/// `name` is the default (German) label; `name_en` is the optional English
/// variant; `synonyms` are alternate spellings that take part in text
/// matching and indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Taxon<I> {
    /// Node identifier.
    pub id: I,
    /// Default-language name.
    pub name: String,
    /// English name variant, empty if none exists.
    #[serde(default)]
    pub name_en: String,
    /// Alternate spellings.
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl<I> Taxon<I> {
    /// Create a node with just a default-language name.
    pub fn new(id: I, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            name_en: String::new(),
            synonyms: Vec::new(),
        }
    }

    /// The display label in the requested language.
    pub fn name_localized(&self, lang: Lang) -> &str {
        lang.pick(&self.name, &self.name_en)
    }
}

/// A tree of taxonomy nodes with parent→child edges.
///
/// Wraps a `DiGraph` plus an id → `NodeIndex` lookup table, the same shape
/// the knowledge-graph layer uses. Each node has at most one parent; the
/// root level may contain any number of nodes.
#[derive(Debug)]
pub struct Taxonomy<I: Copy + Eq + Hash> {
    graph: DiGraph<Taxon<I>, ()>,
    index: HashMap<I, NodeIndex>,
}

impl<I: Copy + Eq + Hash + fmt::Display> Taxonomy<I> {
    /// Create an empty taxonomy.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Insert a node, optionally under a parent.
    ///
    /// Fails if the id is already present or the parent is unknown.
    pub fn insert(&mut self, taxon: Taxon<I>, parent: Option<I>) -> Result<()> {
        if self.index.contains_key(&taxon.id) {
            return Err(Error::validation(format!(
                "taxonomy node {} already exists",
                taxon.id
            )));
        }

        let parent_idx = match parent {
            Some(pid) => Some(
                self.index
                    .get(&pid)
                    .copied()
                    .ok_or_else(|| Error::not_found("taxonomy node", pid))?,
            ),
            None => None,
        };

        let id = taxon.id;
        let idx = self.graph.add_node(taxon);
        self.index.insert(id, idx);

        if let Some(pidx) = parent_idx {
            self.graph.add_edge(pidx, idx, ());
        }

        Ok(())
    }

    /// Replace a node's payload, keeping its position in the tree.
    pub fn update(&mut self, taxon: Taxon<I>) -> Result<()> {
        let idx = self
            .index
            .get(&taxon.id)
            .copied()
            .ok_or_else(|| Error::not_found("taxonomy node", taxon.id))?;
        self.graph[idx] = taxon;
        Ok(())
    }

    /// Get a node by id.
    pub fn get(&self, id: I) -> Option<&Taxon<I>> {
        self.index.get(&id).map(|idx| &self.graph[*idx])
    }

    /// Returns `true` if the node exists.
    pub fn contains(&self, id: I) -> bool {
        self.index.contains_key(&id)
    }

    /// Iterate over all nodes, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Taxon<I>> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// All ids at or below a node, breadth-first.
    ///
    /// Returns an empty list for an unknown id. This is the expansion used
    /// by hierarchical facet filters: a reference to a node covers the node
    /// and its entire subtree.
    pub fn descendants(&self, id: I, include_self: bool) -> Vec<I> {
        let Some(&start) = self.index.get(&id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        if include_self {
            out.push(id);
        }

        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for child in self.graph.neighbors_directed(current, Direction::Outgoing) {
                out.push(self.graph[child].id);
                queue.push_back(child);
            }
        }

        out
    }

    /// All ids from a node up to its root.
    ///
    /// Returns an empty list for an unknown id. Used by the reindexer:
    /// editing a node affects every artwork attached to it *or to any of
    /// its ancestors*, because indexed text includes subtree names.
    pub fn ancestors(&self, id: I, include_self: bool) -> Vec<I> {
        let Some(&start) = self.index.get(&id) else {
            return Vec::new();
        };

        let mut out = Vec::new();
        if include_self {
            out.push(id);
        }

        let mut current = start;
        while let Some(parent) = self
            .graph
            .neighbors_directed(current, Direction::Incoming)
            .next()
        {
            out.push(self.graph[parent].id);
            current = parent;
        }

        out
    }
}

// ============================================================================
// Tests
// ============================================================================
