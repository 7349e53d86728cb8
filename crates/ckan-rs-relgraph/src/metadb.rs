//! # CKAN's metadb
//! 
//! An in-memory snapshot of the package registry: every indexed package plus what is installed in the current game instance.
//! 
//! The snapshot is what the relationship graph queries through [`RegistryQuery`],
//! it can be imported from a JSON registry document and persisted with bincode.

use std::collections::HashSet;

use serde::{Serialize, Deserialize};

pub mod package;
use package::*;

mod iterator;
pub use iterator::*;

mod registry;
pub use registry::RegistryQuery;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct MetaDB {
	packages: Vec<Package>,
	installed: Vec<Package>,
	installed_dlls: HashSet<String>,
	installed_dlc: HashSet<PackageIdentifier>,
}

impl MetaDB {
	pub fn get_packages(&self) -> &Vec<Package> {
		&self.packages
	}

	pub fn get_installed(&self) -> &Vec<Package> {
		&self.installed
	}

	pub fn get_installed_dlls(&self) -> &HashSet<String> {
		&self.installed_dlls
	}

	pub fn get_installed_dlc(&self) -> &HashSet<PackageIdentifier> {
		&self.installed_dlc
	}

	pub fn add_package(&mut self, package: Package) {
		self.packages.push(package);
	}

	pub fn add_installed(&mut self, package: Package) {
		self.installed.push(package);
	}

	pub fn add_installed_dll(&mut self, name: impl Into<String>) {
		self.installed_dlls.insert(name.into());
	}

	pub fn add_installed_dlc(&mut self, identifier: PackageIdentifier) {
		self.installed_dlc.insert(identifier);
	}

	/// The highest version of `identifier` in the index, `provides` is not considered.
	pub fn get_latest(&self, identifier: &str) -> Option<&Package> {
		self.packages.iter()
			.filter(|p| p.identifier.identifier == identifier)
			.max_by(|a, b| a.identifier.version.cmp(&b.identifier.version))
	}

	/// Imports a registry document.
	/// 
	/// ```json
	/// {
	/// 	"available": [ { ".ckan": "document" } ],
	/// 	"installed": [ { ".ckan": "document" } ],
	/// 	"installed_dlls": [ "ModuleManager" ],
	/// 	"installed_dlc": { "MakingHistory-DLC": "1.1.0" }
	/// }
	/// ```
	/// 
	/// Packages that fail to import are skipped with a warning, the rest of the document must be well formed.
	pub fn from_json(v: &serde_json::Value) -> crate::Result<Self> {
		use crate::Error::Parse;

		let obj = v.as_object().ok_or_else(|| Parse("registry JSON is not an object".to_string()))?;

		fn read_packages(v: Option<&serde_json::Value>, section: &str) -> crate::Result<Vec<Package>> {
			let Some(v) = v else { return Ok(Vec::new()) };
			let arr = v.as_array().ok_or_else(|| Parse(format!("{} must be an array", section)))?;
			Ok(arr.iter().enumerate().filter_map(|(i, doc)| {
				match Package::read_from_json(doc) {
					Ok(p) => Some(p),
					Err(e) => {
						log::warn!("Skipping {} entry {}: {}", section, i, e);
						None
					},
				}
			}).collect())
		}

		let mut db = MetaDB {
			packages: read_packages(obj.get("available"), "available")?,
			installed: read_packages(obj.get("installed"), "installed")?,
			..Default::default()
		};

		if let Some(v) = obj.get("installed_dlls") {
			for name in v.as_array().ok_or_else(|| Parse("installed_dlls must be an array".to_string()))? {
				db.add_installed_dll(name.as_str().ok_or_else(|| Parse("installed_dlls elements must be strings".to_string()))?);
			}
		}

		if let Some(v) = obj.get("installed_dlc") {
			for (name, version) in v.as_object().ok_or_else(|| Parse("installed_dlc must be an object".to_string()))? {
				let version = version.as_str().ok_or_else(|| Parse(format!("version of DLC {} must be a string", name)))?;
				db.add_installed_dlc(PackageIdentifier::new(name.clone(), PackageVersion::new(version)?));
			}
		}

		log::debug!("Imported registry with {} available and {} installed packages", db.packages.len(), db.installed.len());
		Ok(db)
	}

	pub fn save_to_disk(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
		let path = path.as_ref();
		log::trace!("Saving metadb to {}", path.display());
		let data = bincode::serialize(self)?;
		std::fs::write(path, data)?;
		Ok(())
	}

	pub fn load_from_disk(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		log::trace!("Loading metadb from {}", path.display());
		let data = std::fs::read(path)?;
		Ok(bincode::deserialize(&data)?)
	}

	/// Loads a registry from `path`, a `.json` extension is read as a registry document and anything else as a saved metadb.
	pub fn load_from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		if path.extension().is_some_and(|e| e.eq_ignore_ascii_case("json")) {
			let file = std::fs::File::open(path)?;
			let v: serde_json::Value = serde_json::from_reader(std::io::BufReader::new(file))?;
			Self::from_json(&v)
		} else {
			Self::load_from_disk(path)
		}
	}
}
