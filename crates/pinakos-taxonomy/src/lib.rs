//! Hierarchical taxonomies for Pinakos.
//!
//! Keywords and locations form trees: every node has at most one parent,
//! and filtering or indexing by a node implicitly covers everything beneath
//! it. This crate provides [`Taxonomy`], a thin wrapper around a directed
//! petgraph with an id → index lookup table, plus the descendant and
//! ancestor walks the search subsystem relies on.

pub mod tree;

pub use tree::{Taxon, Taxonomy};
