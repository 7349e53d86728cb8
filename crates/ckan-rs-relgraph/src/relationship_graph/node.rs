use serde::{Serialize, Deserialize};

use crate::metadb::package::*;

/// What a [`GraphNode`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeVariant {
	/// The package the tree was built for.
	Root,
	/// A single package from the index.
	ResolvedPackage,
	/// A relationship several packages can fulfill, or one package fulfills under another name.
	/// The candidates are its children.
	ProvidesGroup,
	/// A relationship already fulfilled by something installed, such as a DLL or DLC.
	InstalledCapability,
	/// A relationship nothing in the index fulfills.
	Unindexed,
}

/// How strongly a node should stand out when displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emphasis {
	Normal,
	/// Grouping nodes that aren't packages themselves.
	Muted,
	/// Incompatible or unresolvable targets.
	Error,
}

/// A single entry in a [`RelationshipTree`](super::RelationshipTree).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
	label: String,
	variant: NodeVariant,
	relationship: Option<RelationshipKind>,
	/// The package identifier, or the relationship text when there is no single package.
	identity: String,
	package: Option<Package>,
	compatible: bool,
	compatibility_note: Option<String>,
	expanded: bool,
}

impl GraphNode {
	pub(super) fn root(package: Package) -> Self {
		Self {
			label: format!("{} {}", package.name, package.identifier.version),
			variant: NodeVariant::Root,
			relationship: None,
			identity: package.identifier.identifier.clone(),
			package: Some(package),
			compatible: true,
			compatibility_note: None,
			expanded: false,
		}
	}

	pub(super) fn resolved(package: Package, kind: RelationshipKind) -> Self {
		Self {
			label: format!("{} {}", package.name, package.identifier.version),
			variant: NodeVariant::ResolvedPackage,
			relationship: Some(kind),
			identity: package.identifier.identifier.clone(),
			package: Some(package),
			compatible: true,
			compatibility_note: None,
			expanded: false,
		}
	}

	/// A package only found when ignoring the version criteria, `summary` describes the game versions it does support.
	pub(super) fn incompatible(package: Package, kind: RelationshipKind, summary: String) -> Self {
		Self {
			label: format!("{} {} ({})", package.name, package.identifier.version, summary),
			compatible: false,
			compatibility_note: Some(summary),
			..Self::resolved(package, kind)
		}
	}

	pub(super) fn provides(relationship: &Relationship, kind: RelationshipKind) -> Self {
		Self::without_package(format!("{} (virtual)", relationship), NodeVariant::ProvidesGroup, relationship, kind)
	}

	pub(super) fn installed(relationship: &Relationship, kind: RelationshipKind) -> Self {
		Self::without_package(relationship.to_string(), NodeVariant::InstalledCapability, relationship, kind)
	}

	pub(super) fn unindexed(relationship: &Relationship, kind: RelationshipKind) -> Self {
		Self::without_package(format!("{} (not indexed)", relationship), NodeVariant::Unindexed, relationship, kind)
	}

	/* Nodes without a package never expand so they start out expanded */
	fn without_package(label: String, variant: NodeVariant, relationship: &Relationship, kind: RelationshipKind) -> Self {
		Self {
			label,
			variant,
			relationship: Some(kind),
			identity: relationship.to_string(),
			package: None,
			compatible: true,
			compatibility_note: None,
			expanded: true,
		}
	}

	pub(super) fn mark_expanded(&mut self) {
		self.expanded = true;
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn variant(&self) -> NodeVariant {
		self.variant
	}

	/// The relationship leading to this node from its parent, `None` for the root.
	pub fn relationship(&self) -> Option<RelationshipKind> {
		self.relationship
	}

	/// Key identifying what the node refers to, used for cycle detection and to select the package elsewhere.
	pub fn name(&self) -> &str {
		&self.identity
	}

	pub fn package(&self) -> Option<&Package> {
		self.package.as_ref()
	}

	/// `false` only for packages that didn't meet the version criteria.
	pub fn is_compatible(&self) -> bool {
		self.compatible
	}

	/// The game versions an incompatible package supports.
	pub fn compatibility_note(&self) -> Option<&str> {
		self.compatibility_note.as_deref()
	}

	/// Whether this node's children have been populated.
	pub fn is_expanded(&self) -> bool {
		self.expanded
	}

	pub fn is_failure(&self) -> bool {
		self.variant == NodeVariant::Unindexed
	}

	pub fn icon_index(&self) -> usize {
		self.relationship.map_or(0, |k| k.icon_index())
	}

	pub fn tooltip(&self) -> Option<String> {
		self.relationship.map(|k| k.to_string())
	}

	pub fn emphasis(&self) -> Emphasis {
		match self.variant {
			NodeVariant::ProvidesGroup => Emphasis::Muted,
			NodeVariant::Unindexed => Emphasis::Error,
			_ if !self.compatible => Emphasis::Error,
			_ => Emphasis::Normal,
		}
	}
}
