//! Various types associated with packages.

use std::collections::HashSet;
use serde::*;

/// A `.ckan` file's relationship relevant info.
/// 
/// We use the term "Package" instead of "Module" due to the overlap with rust's keywords.
/* NOTE: We don't use serde's deserialize to import the .ckan files because it's way to involved and limited. use `read_from_json` associated function instead. */
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
	pub identifier: PackageIdentifier,
	pub name: String,
	/// Rust friendly alias for `abstract`.
	pub blurb: String,
	pub ksp_version: KspVersionBounds,
	pub ksp_version_strict: bool,
	pub depends: Vec<Relationship>,
	pub recommends: Vec<Relationship>,
	pub suggests: Vec<Relationship>,
	pub supports: Vec<Relationship>,
	pub conflicts: Vec<Relationship>,
	pub provides: HashSet<String>,
}

impl std::hash::Hash for Package {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.identifier.hash(state);
	}
}

impl std::cmp::Ord for Package {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.identifier.cmp(&other.identifier)
	}
}

impl std::cmp::PartialOrd for Package {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::cmp::PartialEq for Package {
	fn eq(&self, other: &Self) -> bool {
		self.identifier == other.identifier
	}
}

impl std::cmp::Eq for Package {}

impl Package {
	/// A package with no relationships that is compatible with any game version.
	pub fn new(identifier: impl Into<String>, version: PackageVersion) -> Self {
		let identifier = identifier.into();
		Self {
			name: identifier.clone(),
			identifier: PackageIdentifier::new(identifier, version),
			blurb: String::new(),
			ksp_version: KspVersionBounds::Any,
			ksp_version_strict: false,
			depends: Vec::new(),
			recommends: Vec::new(),
			suggests: Vec::new(),
			supports: Vec::new(),
			conflicts: Vec::new(),
			provides: HashSet::new(),
		}
	}

	/// The relationships of `kind` in declaration order.
	pub fn relationships(&self, kind: RelationshipKind) -> &[Relationship] {
		match kind {
			RelationshipKind::Depends => &self.depends,
			RelationshipKind::Recommends => &self.recommends,
			RelationshipKind::Suggests => &self.suggests,
			RelationshipKind::Supports => &self.supports,
			RelationshipKind::Conflicts => &self.conflicts,
		}
	}

	pub fn relationships_mut(&mut self, kind: RelationshipKind) -> &mut Vec<Relationship> {
		match kind {
			RelationshipKind::Depends => &mut self.depends,
			RelationshipKind::Recommends => &mut self.recommends,
			RelationshipKind::Suggests => &mut self.suggests,
			RelationshipKind::Supports => &mut self.supports,
			RelationshipKind::Conflicts => &mut self.conflicts,
		}
	}
}

/* CKAN Types */

mod version_bounds;
pub use version_bounds::VersionBounds;

mod ksp_version;
pub use ksp_version::KspVersionReal;
pub use ksp_version::KspVersionBounds;

mod package_version;
pub use package_version::PackageVersion;
pub type PackageVersionBounds = VersionBounds<PackageVersion>;

mod version_criteria;
pub use version_criteria::VersionCriteria;

mod relationship;
pub use relationship::PackageIdentifier;
pub use relationship::PackageDescriptor;
pub use relationship::Relationship;
pub use relationship::RelationshipKind;
pub use relationship::does_package_fulfill_relationship;
pub use relationship::does_package_provide_descriptor;
pub use relationship::does_package_match_descriptor;

mod import;
