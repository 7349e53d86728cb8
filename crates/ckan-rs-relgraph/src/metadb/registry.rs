//! The read-only queries the relationship graph needs from a package registry.

use std::collections::HashSet;

use super::package::*;
use super::iterator::*;
use super::MetaDB;

/// Read-only access to a snapshot of a package registry.
/// 
/// Implementors must answer every query of one expansion from the same snapshot,
/// nothing in this trait is allowed to change registry state.
/// 
/// # Errors
/// Every query may fail when the underlying data source is unavailable, callers propagate these as-is.
pub trait RegistryQuery {
	/// Packages installed in the current game instance.
	fn installed_packages(&self) -> crate::Result<Vec<Package>>;
	/// Names of DLLs detected in the game instance that aren't tracked as packages.
	fn installed_capability_markers(&self) -> crate::Result<HashSet<String>>;
	/// Installed DLC and other built-ins which aren't backed by package metadata.
	fn installed_builtin_capabilities(&self) -> crate::Result<HashSet<PackageIdentifier>>;
	/// The latest version of every identifier whose package fulfills `relationship`, by identifier or `provides`.
	/// 
	/// When `criteria` is `Some` only versions compatible with it are considered.
	fn available_satisfying(&self, relationship: &Relationship, criteria: Option<&VersionCriteria>) -> crate::Result<Vec<Package>>;
	/// Human readable description of the game versions `identifier` has releases for.
	fn compatible_version_summary(&self, identifier: &str) -> crate::Result<String>;
}

impl RegistryQuery for MetaDB {
	fn installed_packages(&self) -> crate::Result<Vec<Package>> {
		Ok(self.get_installed().to_vec())
	}

	fn installed_capability_markers(&self) -> crate::Result<HashSet<String>> {
		Ok(self.get_installed_dlls().clone())
	}

	fn installed_builtin_capabilities(&self) -> crate::Result<HashSet<PackageIdentifier>> {
		Ok(self.get_installed_dlc().clone())
	}

	fn available_satisfying(&self, relationship: &Relationship, criteria: Option<&VersionCriteria>) -> crate::Result<Vec<Package>> {
		let matching = self.get_packages().iter().relationship_matches(relationship);
		let latest = match criteria {
			Some(criteria) => matching.criteria_matches(criteria).latest_per_identifier(),
			None => matching.latest_per_identifier(),
		};
		Ok(latest.into_iter().cloned().collect())
	}

	fn compatible_version_summary(&self, identifier: &str) -> crate::Result<String> {
		let bounds = self.get_packages().iter()
			.filter(|p| p.identifier.identifier == identifier)
			.map(|p| &p.ksp_version)
			.collect::<Vec<_>>();
		Ok(summarize_game_versions(&bounds))
	}
}

/// Describes the union of `bounds` like `KSP 1.8 - 1.12`.
/// 
/// The union is treated as one continuous range from the lowest to the highest version mentioned.
fn summarize_game_versions(bounds: &[&KspVersionBounds]) -> String {
	if bounds.is_empty() {
		return "KSP none".to_string()
	}

	/* `None` in either position means that side is unbounded for at least one release */
	let lower = bounds.iter().map(|b| b.lower()).min().flatten();
	let upper = bounds.iter().try_fold(None::<&KspVersionReal>, |acc, b| {
		b.upper().map(|u| Some(acc.map_or(u, |a| a.max(u))))
	}).flatten();

	match (lower, upper) {
		(Some(l), Some(u)) if l == u => format!("KSP {}", l),
		(Some(l), Some(u)) => format!("KSP {} - {}", l, u),
		(Some(l), None) => format!("KSP {}+", l),
		(None, Some(u)) => format!("KSP up to {}", u),
		(None, None) => "KSP any".to_string(),
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn bounds(min: Option<&str>, max: Option<&str>) -> KspVersionBounds {
		KspVersionBounds::new_from_str(None::<&str>, min, max).unwrap()
	}

	#[test] fn summary_range() { assert_eq!(summarize_game_versions(&[&bounds(Some("1.8"), Some("1.9")), &bounds(Some("1.10"), Some("1.12"))]), "KSP 1.8 - 1.12") }
	#[test] fn summary_open_ended() { assert_eq!(summarize_game_versions(&[&bounds(Some("1.8"), Some("1.9")), &bounds(Some("1.10"), None)]), "KSP 1.8+") }
	#[test] fn summary_unbounded_below() { assert_eq!(summarize_game_versions(&[&bounds(None, Some("1.9")), &bounds(Some("1.10"), Some("1.11"))]), "KSP up to 1.11") }
	#[test] fn summary_any() { assert_eq!(summarize_game_versions(&[&KspVersionBounds::Any]), "KSP any") }
	#[test] fn summary_single_version() { assert_eq!(summarize_game_versions(&[&KspVersionBounds::Explicit(KspVersionReal::new("1.12").unwrap())]), "KSP 1.12") }
}
