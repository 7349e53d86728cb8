use petgraph::prelude::*;
use serde::{Serialize, Deserialize};

use crate::metadb::RegistryQuery;
use crate::metadb::package::*;

use super::GraphNode;
use super::resolve::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeData {
	/// The target was resolved from one of the source package's relationships.
	Relationship(RelationshipKind),
	/// The target is one of the candidates of a provides group.
	Provides,
}

/// One layer of children for a node, computed but not yet part of the tree.
/// 
/// Produced by [`RelationshipTree::resolve_layer()`] and consumed by [`RelationshipTree::attach_layer()`].
#[derive(Debug, Clone)]
pub struct Layer {
	parent: NodeIndex,
	children: Vec<ResolvedRelationship>,
}

impl Layer {
	pub fn parent(&self) -> NodeIndex {
		self.parent
	}

	pub fn children(&self) -> &[ResolvedRelationship] {
		&self.children
	}
}

/// The relationships of a package as a tree, grown one layer at a time.
/// 
/// Nodes are never removed so node indices stay valid and ascend in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipTree {
	graph: StableDiGraph<GraphNode, EdgeData>,
	root: NodeIndex,
}

impl RelationshipTree {
	/// Creates a tree for `package` with its relationships already expanded.
	/// 
	/// # Errors
	/// Registry failures, see [`RelationshipTree::expand_layer()`].
	pub fn build_root<R: RegistryQuery + ?Sized>(package: Package, registry: &R, criteria: Option<&VersionCriteria>) -> crate::Result<Self> {
		log::debug!("Building relationship tree for {}", package.identifier);
		let mut graph = StableDiGraph::<GraphNode, EdgeData>::default();
		let root = graph.add_node(GraphNode::root(package));
		let mut tree = Self { graph, root };
		tree.expand_layer(root, registry, criteria)?;
		Ok(tree)
	}

	pub fn root(&self) -> NodeIndex {
		self.root
	}

	pub fn node(&self, node: NodeIndex) -> Option<&GraphNode> {
		self.graph.node_weight(node)
	}

	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	pub fn graph(&self) -> &StableDiGraph<GraphNode, EdgeData> {
		&self.graph
	}

	pub fn parent(&self, node: NodeIndex) -> Option<NodeIndex> {
		self.graph.neighbors_directed(node, Incoming).next()
	}

	/// Children of `node` grouped by relationship kind, in declaration order within a kind.
	pub fn children(&self, node: NodeIndex) -> Vec<NodeIndex> {
		let mut children = self.graph.neighbors_directed(node, Outgoing).collect::<Vec<_>>();
		children.sort();
		children
	}

	/// Parent, grandparent and so on up to the root.
	pub fn ancestors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
		std::iter::successors(self.parent(node), move |i| self.parent(*i))
	}

	/// Checks if the package of `node` already appears further up the tree.
	/// 
	/// Packages are compared by identifier only so a chain of relationships can't go around forever by changing versions.
	pub fn is_own_ancestor(&self, node: NodeIndex) -> bool {
		let Some(package) = self.node(node).and_then(|n| n.package()) else { return false };
		self.ancestors(node)
			.filter_map(|i| self.graph[i].package())
			.any(|p| p.identifier.identifier == package.identifier.identifier)
	}

	/// Resolves the relationships of `node` without changing the tree.
	/// 
	/// This only needs shared access so layers for different nodes can be resolved at the same time.
	/// The layer is empty when `node` is already expanded, has no package or relationships, or repeats an ancestor.
	/// The registry is only queried when there is something to resolve.
	/// 
	/// # Errors
	/// - [`InvalidSelection`](crate::Error::InvalidSelection) if `node` isn't part of this tree.
	/// - Any registry failure, in which case no layer is produced.
	pub fn resolve_layer<R: RegistryQuery + ?Sized>(&self, node: NodeIndex, registry: &R, criteria: Option<&VersionCriteria>) -> crate::Result<Layer> {
		let weight = self.node(node).ok_or(crate::Error::InvalidSelection)?;
		let mut layer = Layer { parent: node, children: Vec::new() };

		if weight.is_expanded() {
			return Ok(layer)
		}
		if self.is_own_ancestor(node) {
			log::debug!("{} is its own ancestor, not expanding", weight.name());
			return Ok(layer)
		}
		let Some(package) = weight.package() else { return Ok(layer) };
		if RelationshipKind::ALL.iter().all(|k| package.relationships(*k).is_empty()) {
			return Ok(layer)
		}

		let installed = InstalledSnapshot::capture(registry)?;
		for kind in RelationshipKind::ALL {
			for relationship in package.relationships(kind) {
				layer.children.push(resolve_relationship(registry, &installed, relationship, kind, criteria)?);
			}
		}

		Ok(layer)
	}

	/// Adds a layer from [`RelationshipTree::resolve_layer()`] below its parent and marks the parent expanded.
	/// 
	/// Does nothing if the parent was expanded in the meantime.
	/// 
	/// # Errors
	/// [`InvalidSelection`](crate::Error::InvalidSelection) if the layer's parent isn't part of this tree.
	pub fn attach_layer(&mut self, layer: Layer) -> crate::Result<()> {
		let parent = self.graph.node_weight_mut(layer.parent).ok_or(crate::Error::InvalidSelection)?;
		if parent.is_expanded() {
			return Ok(())
		}
		parent.mark_expanded();
		log::debug!("Expanding {} with {} relationships", parent.name(), layer.children.len());

		for child in layer.children {
			let group = self.graph.add_node(child.node);
			self.graph.add_edge(layer.parent, group, EdgeData::Relationship(child.kind));
			for provider in child.providers {
				let provider = self.graph.add_node(provider);
				self.graph.add_edge(group, provider, EdgeData::Provides);
			}
		}

		Ok(())
	}

	/// Populates the children of `node`, one layer deep.
	/// 
	/// Calling this on an already expanded node does nothing.
	/// A node repeating one of its ancestors is marked expanded without children.
	/// 
	/// # Errors
	/// - [`InvalidSelection`](crate::Error::InvalidSelection) if `node` isn't part of this tree.
	/// - Any registry failure, the tree is left unchanged.
	pub fn expand_layer<R: RegistryQuery + ?Sized>(&mut self, node: NodeIndex, registry: &R, criteria: Option<&VersionCriteria>) -> crate::Result<()> {
		let layer = self.resolve_layer(node, registry, criteria)?;
		self.attach_layer(layer)
	}

	/// Expands every child of `node` that isn't expanded yet, what a viewer does when `node` is opened.
	/// 
	/// # Errors
	/// As [`RelationshipTree::expand_layer()`], children expanded before the failure stay expanded.
	pub fn expand_children<R: RegistryQuery + ?Sized>(&mut self, node: NodeIndex, registry: &R, criteria: Option<&VersionCriteria>) -> crate::Result<()> {
		if self.node(node).is_none() {
			return Err(crate::Error::InvalidSelection)
		}
		for child in self.children(node) {
			self.expand_layer(child, registry, criteria)?;
		}
		Ok(())
	}
}

impl std::ops::Index<NodeIndex> for RelationshipTree {
	type Output = GraphNode;

	fn index(&self, index: NodeIndex) -> &Self::Output {
		&self.graph[index]
	}
}
