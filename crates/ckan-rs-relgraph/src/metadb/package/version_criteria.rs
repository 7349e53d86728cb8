use serde::*;

use super::*;

/// The game versions currently considered compatible, usually the versions of the selected game instance.
/// 
/// A package is compatible when its game version bounds accept any one of the criteria versions.
/// Empty criteria accept no package at all.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionCriteria {
	versions: Vec<KspVersionReal>,
}

impl VersionCriteria {
	pub fn new(versions: impl IntoIterator<Item = KspVersionReal>) -> Self {
		Self { versions: versions.into_iter().collect() }
	}

	pub fn versions(&self) -> &[KspVersionReal] {
		&self.versions
	}

	pub fn is_package_compatible(&self, package: &Package) -> bool {
		self.versions.iter().any(|v| package.ksp_version.is_version_compatible(v, package.ksp_version_strict))
	}
}

impl FromIterator<KspVersionReal> for VersionCriteria {
	fn from_iter<T: IntoIterator<Item = KspVersionReal>>(iter: T) -> Self {
		Self::new(iter)
	}
}
