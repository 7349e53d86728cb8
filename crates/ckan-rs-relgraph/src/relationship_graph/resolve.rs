//! Resolving a single relationship to the node that represents it.

use std::collections::HashSet;

use crate::metadb::RegistryQuery;
use crate::metadb::package::*;

use super::GraphNode;

/// A resolved relationship waiting to be attached to a tree.
/// 
/// Provides groups carry their candidates, they are attached together with the group.
#[derive(Debug, Clone)]
pub struct ResolvedRelationship {
	pub(super) kind: RelationshipKind,
	pub(super) node: GraphNode,
	pub(super) providers: Vec<GraphNode>,
}

impl ResolvedRelationship {
	fn single(kind: RelationshipKind, node: GraphNode) -> Self {
		Self { kind, node, providers: Vec::new() }
	}

	pub fn kind(&self) -> RelationshipKind {
		self.kind
	}

	pub fn node(&self) -> &GraphNode {
		&self.node
	}

	pub fn providers(&self) -> &[GraphNode] {
		&self.providers
	}
}

/// What is installed, read once per layer so every relationship in it sees the same state.
pub(super) struct InstalledSnapshot {
	packages: Vec<Package>,
	dlls: HashSet<String>,
	dlc: HashSet<PackageIdentifier>,
}

impl InstalledSnapshot {
	pub(super) fn capture<R: RegistryQuery + ?Sized>(registry: &R) -> crate::Result<Self> {
		Ok(Self {
			packages: registry.installed_packages()?,
			dlls: registry.installed_capability_markers()?,
			dlc: registry.installed_builtin_capabilities()?,
		})
	}
}

/// Finds the node for `relationship`.
/// 
/// In order, the first that applies:
/// 1. Something installed fulfills it.
/// 1. Packages compatible with `criteria` fulfill it.
/// 1. Packages of any game version fulfill it, these are flagged incompatible.
/// 1. Nothing does, the result is an unindexed node.
/// 
/// A relationship with malformed version requirements is unindexed without querying the registry.
/// 
/// # Errors
/// Only registry failures, an unresolvable relationship still produces a node.
pub(super) fn resolve_relationship<R: RegistryQuery + ?Sized>(
	registry: &R,
	installed: &InstalledSnapshot,
	relationship: &Relationship,
	kind: RelationshipKind,
	criteria: Option<&VersionCriteria>,
) -> crate::Result<ResolvedRelationship> {
	if let Err(e) = relationship.validate() {
		log::warn!("{} relationship `{}` is malformed: {}", kind, relationship, e);
		return Ok(ResolvedRelationship::single(kind, GraphNode::unindexed(relationship, kind)))
	}

	if relationship.matches_any(&installed.packages, &installed.dlls, &installed.dlc) {
		log::trace!("{} `{}` fulfilled by an installed capability", kind, relationship);
		return Ok(ResolvedRelationship::single(kind, GraphNode::installed(relationship, kind)))
	}

	if let Some(resolved) = find_dependency_shallow(registry, relationship, kind, criteria, true)? {
		return Ok(resolved)
	}

	/* Without criteria the first search was already unconstrained */
	if criteria.is_some() {
		if let Some(resolved) = find_dependency_shallow(registry, relationship, kind, None, false)? {
			return Ok(resolved)
		}
	}

	log::trace!("{} `{}` not found in the index", kind, relationship);
	Ok(ResolvedRelationship::single(kind, GraphNode::unindexed(relationship, kind)))
}

fn find_dependency_shallow<R: RegistryQuery + ?Sized>(
	registry: &R,
	relationship: &Relationship,
	kind: RelationshipKind,
	criteria: Option<&VersionCriteria>,
	compatible: bool,
) -> crate::Result<Option<ResolvedRelationship>> {
	let candidates = registry.available_satisfying(relationship, criteria)?;

	let package_node = |package: Package| -> crate::Result<GraphNode> {
		if compatible {
			Ok(GraphNode::resolved(package, kind))
		} else {
			let summary = registry.compatible_version_summary(&package.identifier.identifier)?;
			Ok(GraphNode::incompatible(package, kind, summary))
		}
	};

	match candidates.len() {
		0 => Ok(None),
		1 if relationship.contains_any(&[candidates[0].identifier.identifier.as_str()]) => {
			log::trace!("{} `{}` resolved to {}", kind, relationship, candidates[0].identifier);
			let package = candidates.into_iter().next().expect("len() should be confirmed 1.");
			Ok(Some(ResolvedRelationship::single(kind, package_node(package)?)))
		},
		n => {
			log::trace!("{} `{}` provided by {} packages", kind, relationship, n);
			Ok(Some(ResolvedRelationship {
				kind,
				node: GraphNode::provides(relationship, kind),
				providers: candidates.into_iter().map(package_node).collect::<crate::Result<Vec<_>>>()?,
			}))
		},
	}
}
