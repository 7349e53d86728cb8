use std::collections::HashSet;

use serde::*;
use try_map::FallibleMapExt;
use super::*;

/// A unique identifier for packages.
/// 
/// Mainly used as an index into [`crate::MetaDB`].
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PackageIdentifier {
	pub identifier: String,
	pub version: PackageVersion,
}

impl PackageIdentifier {
	pub fn new(identifier: impl Into<String>, version: PackageVersion) -> Self {
		Self { identifier: identifier.into(), version }
	}
}

impl std::cmp::Ord for PackageIdentifier {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		match self.identifier.cmp(&other.identifier) {
			core::cmp::Ordering::Equal => {}
			ord => return ord,
		}
		self.version.cmp(&other.version)
	}
}

impl std::cmp::PartialOrd for PackageIdentifier {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::fmt::Display for PackageIdentifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}-{}", self.identifier, self.version)
	}
}

/// Describes a package using an identifier and version requirement.
/// 
/// Differs from [`PackageIdentifier`] in that it represents a range of packages.
/// 
/// The version strings are kept as they appear in the metadata and only parsed by [`PackageDescriptor::version_bounds()`],
/// one bad version string only invalidates the relationship it is part of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageDescriptor {
	pub name: String,
	pub version: Option<String>,
	pub min_version: Option<String>,
	pub max_version: Option<String>,
}

impl PackageDescriptor {
	/// A descriptor accepting any version of `name`.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			version: None,
			min_version: None,
			max_version: None,
		}
	}

	pub fn with_version(mut self, version: impl Into<String>) -> Self {
		self.version = Some(version.into());
		self
	}

	pub fn with_min_version(mut self, version: impl Into<String>) -> Self {
		self.min_version = Some(version.into());
		self
	}

	pub fn with_max_version(mut self, version: impl Into<String>) -> Self {
		self.max_version = Some(version.into());
		self
	}

	/// Parses the version requirement.
	/// 
	/// # Errors
	/// [`Parse`](crate::Error::Parse) when a version string is malformed or `version` is combined with `min_version`/`max_version`.
	pub fn version_bounds(&self) -> crate::Result<PackageVersionBounds> {
		let explicit = self.version.as_deref().try_map(PackageVersion::new)?;
		let min = self.min_version.as_deref().try_map(PackageVersion::new)?;
		let max = self.max_version.as_deref().try_map(PackageVersion::new)?;
		VersionBounds::new(explicit, min, max)
	}

	/// A malformed requirement accepts nothing.
	pub fn is_version_within(&self, version: &PackageVersion) -> bool {
		self.version_bounds().map_or(false, |bounds| bounds.is_version_within(version))
	}
}

impl std::fmt::Display for PackageDescriptor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name)?;
		if let Some(version) = &self.version {
			write!(f, " {}", version)?;
		}
		match (&self.min_version, &self.max_version) {
			(Some(min), Some(max)) => write!(f, " {} - {}", min, max),
			(Some(min), None) => write!(f, " {}+", min),
			(None, Some(max)) => write!(f, " up to {}", max),
			(None, None) => Ok(()),
		}
	}
}

/// A relationship from one package to another.
/// 
/// The target is named by a single descriptor or by a list of alternatives of which any one will do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Relationship {
	/// This single descriptor requirement must be met.
	One(PackageDescriptor),
	/// At least one of the descriptors must match to fulfill the relationship.
	AnyOf(Vec<PackageDescriptor>),
}

impl Relationship {
	pub fn descriptors(&self) -> std::slice::Iter<'_, PackageDescriptor> {
		match self {
			Relationship::One(d) => std::slice::from_ref(d).iter(),
			Relationship::AnyOf(v) => v.iter(),
		}
	}

	/// Checks the relationship can be used for matching.
	/// 
	/// # Errors
	/// - [`Validation`](crate::Error::Validation) for an empty `any_of` or a descriptor without a name.
	/// - [`Parse`](crate::Error::Parse) for malformed version requirements.
	pub fn validate(&self) -> crate::Result<()> {
		if let Relationship::AnyOf(v) = self {
			if v.is_empty() {
				return Err(crate::Error::Validation("any_of relationship has no alternatives".to_string()))
			}
		}
		for desc in self.descriptors() {
			if desc.name.is_empty() {
				return Err(crate::Error::Validation("relationship has an empty name".to_string()))
			}
			desc.version_bounds()?;
		}
		Ok(())
	}

	pub fn is_fulfilled_by(&self, package: &Package) -> bool {
		does_package_fulfill_relationship(package, self)
	}

	/// Checks whether something already installed satisfies the relationship.
	/// 
	/// # Parameters
	/// - `installed` - Installed packages, matched by identifier or `provides`.
	/// - `dlls` - Detected DLL markers, matched by name only.
	/// - `dlc` - Installed DLC, matched by identifier and version.
	pub fn matches_any(&self, installed: &[Package], dlls: &HashSet<String>, dlc: &HashSet<PackageIdentifier>) -> bool {
		self.descriptors().any(|desc| {
			installed.iter().any(|p| does_package_provide_descriptor(p, desc))
			|| dlls.contains(&desc.name)
			|| dlc.iter().any(|id| does_package_match_descriptor(id, desc))
		})
	}

	/// Checks if any of `identifiers` is named directly by this relationship, `provides` aliases are not considered.
	pub fn contains_any(&self, identifiers: &[impl AsRef<str>]) -> bool {
		self.descriptors().any(|desc| identifiers.iter().any(|id| id.as_ref() == desc.name))
	}
}

impl From<PackageDescriptor> for Relationship {
	fn from(value: PackageDescriptor) -> Self {
		Relationship::One(value)
	}
}

impl std::fmt::Display for Relationship {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		for (i, desc) in self.descriptors().enumerate() {
			if i > 0 {
				write!(f, " or ")?;
			}
			write!(f, "{}", desc)?;
		}
		Ok(())
	}
}

/// The kinds of relationship a package can declare.
/// 
/// [`RelationshipKind::ALL`] is the order relationships are always listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationshipKind {
	Depends,
	Recommends,
	Suggests,
	Supports,
	/// Resolving a conflict to a package is the adverse outcome, it's up to the reader to treat it that way.
	Conflicts,
}

impl RelationshipKind {
	pub const ALL: [RelationshipKind; 5] = [
		RelationshipKind::Depends,
		RelationshipKind::Recommends,
		RelationshipKind::Suggests,
		RelationshipKind::Supports,
		RelationshipKind::Conflicts,
	];

	/// Icon slot for the kind, `0` is left for the root package.
	pub fn icon_index(&self) -> usize {
		*self as usize + 1
	}
}

impl std::fmt::Display for RelationshipKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			RelationshipKind::Depends => "Depends",
			RelationshipKind::Recommends => "Recommends",
			RelationshipKind::Suggests => "Suggests",
			RelationshipKind::Supports => "Supports",
			RelationshipKind::Conflicts => "Conflicts",
		};
		write!(f, "{}", s)
	}
}

pub fn does_package_fulfill_relationship(package: &Package, relationship: &Relationship) -> bool {
	relationship.descriptors().any(|desc| does_package_provide_descriptor(package, desc))
}

pub fn does_package_match_descriptor(identifier: &PackageIdentifier, descriptor: &PackageDescriptor) -> bool {
	if identifier.identifier != descriptor.name {
		return false
	}
	descriptor.is_version_within(&identifier.version)
}

pub fn does_package_provide_descriptor(package: &Package, descriptor: &PackageDescriptor) -> bool {
	if package.identifier.identifier != descriptor.name && !package.provides.contains(&descriptor.name) {
		return false
	}
	descriptor.is_version_within(&package.identifier.version)
}
