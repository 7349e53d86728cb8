//! Game versions and the game version ranges packages declare.
//!
//! KSP bumps its minor version for breaking changes, a package listing `1.12` works with every `1.12.x` release.
//! That's why matching against criteria uses [`KspVersionReal::is_compatible_with()`] rather than plain ordering.

use serde::*;
use try_map::FallibleMapExt;

/// A concrete game version, `MAJOR.MINOR[.PATCH[.BUILD]]` such as `1.12.3.3173`.
///
/// `build` takes no part in equality, hashing or ordering so `1.12.3` and `1.12.3.3173` are the same release.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KspVersionReal {
	major: u32,
	minor: u32,
	patch: Option<u32>,
	build: Option<u32>,
}

impl KspVersionReal {
	/// # Errors
	/// [`Parse`](crate::Error::Parse) for `"any"`, fewer than two or more than four components, or non-numeric components.
	pub fn new(s: impl AsRef<str>) -> crate::Result<Self> {
		s.as_ref().parse()
	}

	/* Everything compared, `None` patch sorts before any patch */
	fn release(&self) -> (u32, u32, Option<u32>) {
		(self.major, self.minor, self.patch)
	}

	/// Same major and minor, and when both have a patch `self` isn't the newer one.
	pub fn is_compatible_with(&self, other: &Self) -> bool {
		(self.major, self.minor) == (other.major, other.minor)
			&& self.patch.zip(other.patch).map_or(true, |(lhs, rhs)| lhs <= rhs)
	}

	pub fn major(&self) -> u32 { self.major }
	pub fn minor(&self) -> u32 { self.minor }
	pub fn patch(&self) -> Option<u32> { self.patch }
	pub fn build(&self) -> Option<u32> { self.build }
}

impl std::str::FromStr for KspVersionReal {
	type Err = crate::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		use crate::Error::Parse;

		if s.eq_ignore_ascii_case("any") {
			return Err(Parse("\"any\" is a range, not a game version".to_string()))
		}

		let mut numbers = Vec::with_capacity(4);
		for component in s.split('.') {
			numbers.push(component.parse::<u32>().map_err(|_| Parse(format!("\"{}\" in game version \"{}\" is not a number", component, s)))?);
		}

		match numbers[..] {
			[major, minor] => Ok(Self { major, minor, patch: None, build: None }),
			[major, minor, patch] => Ok(Self { major, minor, patch: Some(patch), build: None }),
			[major, minor, patch, build] => Ok(Self { major, minor, patch: Some(patch), build: Some(build) }),
			_ => Err(Parse(format!("game version \"{}\" needs two to four components", s))),
		}
	}
}

impl TryFrom<String> for KspVersionReal {
	type Error = crate::Error;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		value.parse()
	}
}

impl From<KspVersionReal> for String {
	fn from(value: KspVersionReal) -> Self {
		value.to_string()
	}
}

impl PartialEq for KspVersionReal {
	fn eq(&self, other: &Self) -> bool {
		self.release() == other.release()
	}
}

impl std::hash::Hash for KspVersionReal {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.release().hash(state);
	}
}

impl Ord for KspVersionReal {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.release().cmp(&other.release())
	}
}

impl PartialOrd for KspVersionReal {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> { Some(self.cmp(other)) }
}

impl std::fmt::Display for KspVersionReal {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}", self.major, self.minor)?;
		for n in [self.patch, self.build].into_iter().flatten() {
			write!(f, ".{}", n)?;
		}
		Ok(())
	}
}

pub type KspVersionBounds = super::VersionBounds<KspVersionReal>;

impl KspVersionBounds {
	/// Bounds from the `ksp_version`, `ksp_version_min` and `ksp_version_max` fields of a package.
	///
	/// An explicit `"any"` is [`Any`](super::VersionBounds::Any), a min or max of `"any"` is the same as leaving it out.
	///
	/// # Errors
	/// [`Parse`](crate::Error::Parse) from [`KspVersionReal::new()`] or [`VersionBounds::new()`](super::VersionBounds::new()).
	pub fn new_from_str(explicit: Option<impl AsRef<str>>, min: Option<impl AsRef<str>>, max: Option<impl AsRef<str>>) -> crate::Result<Self> {
		fn is_any(s: &impl AsRef<str>) -> bool {
			s.as_ref().eq_ignore_ascii_case("any")
		}

		if explicit.as_ref().is_some_and(is_any) {
			return Ok(Self::Any)
		}

		super::VersionBounds::new(
			explicit.try_map(KspVersionReal::new)?,
			min.filter(|s| !is_any(s)).try_map(KspVersionReal::new)?,
			max.filter(|s| !is_any(s)).try_map(KspVersionReal::new)?,
		)
	}

	/// Checks whether a game at version `other` can run a package with these bounds.
	///
	/// With `strict` the bounds are exact. Otherwise a bound also accepts every patch of its own major and minor version,
	/// so `up to 1.10.0` allows `1.10.1` and `from 1.12.3` allows `1.12.1`.
	pub fn is_version_compatible(&self, other: &KspVersionReal, strict: bool) -> bool {
		let at_least = |min: &KspVersionReal| other >= min || (!strict && other.is_compatible_with(min));
		let at_most = |max: &KspVersionReal| other <= max || (!strict && max.is_compatible_with(other));
		match self {
			Self::Any => true,
			Self::Explicit(v) if strict => other == v,
			Self::Explicit(v) => v.is_compatible_with(other),
			Self::MinOnly(min) => at_least(min),
			Self::MaxOnly(max) => at_most(max),
			Self::MinMax(min, max) => at_least(min) && at_most(max),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	fn v(s: &str) -> KspVersionReal { KspVersionReal::new(s).unwrap() }

	#[test] fn minor_compares_numerically() { assert!(v("1.9") < v("1.10")) }
	#[test] fn missing_patch_sorts_first() { assert!(v("1.12") < v("1.12.1") && v("1.11.1") < v("1.12")) }
	#[test] fn build_is_ignored() { assert_eq!(v("1.12.1"), v("1.12.1.1234")) }
	#[test] fn any_is_not_a_version() { assert!(KspVersionReal::new("any").is_err()) }
	#[test] fn needs_minor() { assert!(KspVersionReal::new("1").is_err()) }
	#[test] fn rejects_five_components() { assert!(KspVersionReal::new("1.2.3.4.5").is_err()) }
	#[test] fn rejects_words() { assert!(KspVersionReal::new("1.x").is_err()) }
	#[test] fn display_keeps_build() { assert_eq!(v("1.12.3.3173").to_string(), "1.12.3.3173") }
	#[test] fn patch_compatibility() { assert!(v("1.12").is_compatible_with(&v("1.12.5")) && !v("1.12.5").is_compatible_with(&v("1.12.3"))) }
	#[test] fn bounds_any_string() { assert_eq!(KspVersionBounds::new_from_str(Some("any"), None::<&str>, None::<&str>).unwrap(), KspVersionBounds::Any) }
	#[test] fn bounds_any_min_is_open() { assert_eq!(KspVersionBounds::new_from_str(None::<&str>, Some("any"), Some("1.9")).unwrap(), KspVersionBounds::MaxOnly(v("1.9"))) }
	#[test] fn loose_explicit_accepts_patch() {
		let bounds = KspVersionBounds::new_from_str(Some("1.12"), None::<&str>, None::<&str>).unwrap();
		assert!(bounds.is_version_compatible(&v("1.12.3"), false));
		assert!(!bounds.is_version_compatible(&v("1.12.3"), true));
	}
	#[test] fn max_accepts_its_patches() {
		let bounds = KspVersionBounds::new_from_str(None::<&str>, Some("1.8"), Some("1.10")).unwrap();
		assert!(bounds.is_version_compatible(&v("1.10.1"), false));
		assert!(!bounds.is_version_compatible(&v("1.12"), false));
	}
	#[test] fn loose_max_with_patch_accepts_later_patch() {
		let bounds = KspVersionBounds::new_from_str(None::<&str>, None::<&str>, Some("1.10.0")).unwrap();
		assert!(bounds.is_version_compatible(&v("1.10.1"), false));
		assert!(!bounds.is_version_compatible(&v("1.10.1"), true));
		assert!(!bounds.is_version_compatible(&v("1.11"), false));
	}
	#[test] fn strict_range_is_exact() {
		let bounds = KspVersionBounds::new_from_str(None::<&str>, Some("1.12.3"), Some("1.12.5")).unwrap();
		assert!(!bounds.is_version_compatible(&v("1.12.1"), true));
		assert!(!bounds.is_version_compatible(&v("1.12.6"), true));
		assert!(bounds.is_version_compatible(&v("1.12.4"), true));
		assert!(bounds.is_version_compatible(&v("1.12.1"), false));
		assert!(bounds.is_version_compatible(&v("1.12.6"), false));
	}
	#[test] fn strict_min_only() {
		let bounds = KspVersionBounds::new_from_str(None::<&str>, Some("1.12.3"), None::<&str>).unwrap();
		assert!(!bounds.is_version_compatible(&v("1.12.1"), true));
		assert!(bounds.is_version_compatible(&v("1.12.1"), false));
		assert!(bounds.is_version_compatible(&v("1.13"), true));
	}
	#[test] fn serializes_as_string() {
		assert_eq!(serde_json::to_string(&v("1.12.3")).unwrap(), "\"1.12.3\"");
		assert_eq!(serde_json::from_str::<KspVersionReal>("\"1.12\"").unwrap(), v("1.12"));
		assert!(serde_json::from_str::<KspVersionReal>("\"1.x\"").is_err());
	}
}
