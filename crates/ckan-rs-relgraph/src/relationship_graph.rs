//! A browsable tree of the relationships of one package.
//! 
//! # Usage
//! 1. [`RelationshipTree::build_root()`] with the selected package, the root's relationships are resolved immediately.
//! 1. [`RelationshipTree::expand_layer()`] a node when its children are wanted,
//! or [`RelationshipTree::expand_children()`] when a node is opened to make its children expandable.
//! 1. Read nodes with [`RelationshipTree::children()`] and indexing.
//! 
//! # Resolving
//! Every relationship becomes exactly one child, see [`NodeVariant`] for what it can turn out to be.
//! Relationships are listed by kind in the order of [`RelationshipKind::ALL`](crate::metadb::package::RelationshipKind::ALL)
//! and in declaration order within a kind.
//! 
//! # Cycles
//! Packages can depend on themselves through other packages. A node whose package already appears among its
//! ancestors is shown but never expanded, so the tree stays finite however the relationships loop.

mod node;
pub use node::GraphNode;
pub use node::NodeVariant;
pub use node::Emphasis;

mod resolve;
pub use resolve::ResolvedRelationship;

mod relationship_tree;
pub use relationship_tree::RelationshipTree;
pub use relationship_tree::Layer;
pub use relationship_tree::EdgeData;

pub use petgraph::graph::NodeIndex;
