//! Various helper functions for testing
//! 
//! functions in this module should use results and not use any panics to avoid confusion in callers

use ckan_rs_relgraph::MetaDB;
use ckan_rs_relgraph::metadb::package::*;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("CKAN-rs error: {0}")]
	CKANrs(#[from] ckan_rs_relgraph::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
}

/// Builds packages for test registries.
#[derive(Debug, Clone)]
pub struct PackageBuilder {
	package: Package,
}

impl PackageBuilder {
	pub fn new(identifier: &str, version: &str) -> Result<Self, Error> {
		Ok(Self { package: Package::new(identifier, PackageVersion::new(version)?) })
	}

	pub fn name(mut self, name: &str) -> Self {
		self.package.name = name.to_string();
		self
	}

	pub fn relationship(mut self, kind: RelationshipKind, relationship: impl Into<Relationship>) -> Self {
		self.package.relationships_mut(kind).push(relationship.into());
		self
	}

	pub fn depends(self, name: &str) -> Self { self.relationship(RelationshipKind::Depends, PackageDescriptor::new(name)) }
	pub fn recommends(self, name: &str) -> Self { self.relationship(RelationshipKind::Recommends, PackageDescriptor::new(name)) }
	pub fn suggests(self, name: &str) -> Self { self.relationship(RelationshipKind::Suggests, PackageDescriptor::new(name)) }
	pub fn supports(self, name: &str) -> Self { self.relationship(RelationshipKind::Supports, PackageDescriptor::new(name)) }
	pub fn conflicts(self, name: &str) -> Self { self.relationship(RelationshipKind::Conflicts, PackageDescriptor::new(name)) }

	pub fn provides(mut self, name: &str) -> Self {
		self.package.provides.insert(name.to_string());
		self
	}

	/// Restricts the package to game versions `min` through `max`.
	pub fn ksp_versions(mut self, min: &str, max: &str) -> Result<Self, Error> {
		self.package.ksp_version = KspVersionBounds::new_from_str(None::<&str>, Some(min), Some(max))?;
		Ok(self)
	}

	pub fn build(self) -> Package {
		self.package
	}
}

pub fn criteria(versions: &[&str]) -> Result<VersionCriteria, Error> {
	Ok(versions.iter().map(KspVersionReal::new).collect::<ckan_rs_relgraph::Result<VersionCriteria>>()?)
}

/// "Core" depends on "Lib" and recommends "Widget" which is provided by "WidgetA" and "WidgetB".
pub fn core_metadb() -> Result<MetaDB, Error> {
	let mut db = MetaDB::default();
	db.add_package(PackageBuilder::new("Core", "1.0")?.depends("Lib").recommends("Widget").build());
	db.add_package(PackageBuilder::new("Lib", "1.0")?.build());
	db.add_package(PackageBuilder::new("Lib", "2.0")?.build());
	db.add_package(PackageBuilder::new("WidgetA", "1.0")?.provides("Widget").build());
	db.add_package(PackageBuilder::new("WidgetB", "1.0")?.provides("Widget").build());
	Ok(db)
}

/// Saves `db` to a temporary file that is removed when dropped.
pub fn temp_metadb_file(db: &MetaDB) -> Result<tempfile::NamedTempFile, Error> {
	let file = tempfile::NamedTempFile::new()?;
	db.save_to_disk(file.path())?;
	Ok(file)
}
