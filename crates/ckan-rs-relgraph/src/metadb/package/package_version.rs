use std::sync::OnceLock;
use serde::*;

/// A package version in CKAN's `[epoch:]version` format.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct PackageVersion {
	epoch: u32,
	version: String,
}

fn version_regex() -> &'static regex::Regex {
	static RE: OnceLock<regex::Regex> = OnceLock::new();
	RE.get_or_init(|| regex::Regex::new(r"^(?:(?P<epoch>[0-9]+):)?(?P<version>[^:\s]+)$").expect("version pattern should compile"))
}

impl PackageVersion {
	/// # Errors
	/// [`Parse`](crate::Error::Parse) when the string is empty, contains whitespace or has a non-numeric epoch.
	pub fn new(version: impl AsRef<str>) -> crate::Result<Self> {
		let version = version.as_ref();
		let captures = version_regex().captures(version)
			.ok_or_else(|| crate::Error::Parse(format!("\"{}\" is not a valid package version", version)))?;

		let epoch = match captures.name("epoch") {
			Some(e) => e.as_str().parse::<u32>().map_err(|_| crate::Error::Parse(format!("epoch of \"{}\" is out of range", version)))?,
			None => 0,
		};

		Ok(PackageVersion {
			epoch,
			version: captures["version"].to_string(),
		})
	}

	pub fn epoch(&self) -> u32 { self.epoch }
	pub fn version(&self) -> &str { &self.version }
}

impl PartialEq for PackageVersion {
	fn eq(&self, other: &Self) -> bool {
		self.epoch == other.epoch &&
		self.version == other.version
	}
}

/// Splits `s` at the first char where `pred` stops holding.
fn split_while(s: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
	match s.char_indices().find(|(_, c)| !pred(*c)) {
		Some((i, _)) => s.split_at(i),
		None => (s, ""),
	}
}

/// Compares two strings of digits by value without parsing them into a fixed width integer.
fn cmp_numeric(lhs: &str, rhs: &str) -> std::cmp::Ordering {
	let lhs = lhs.trim_start_matches('0');
	let rhs = rhs.trim_start_matches('0');
	lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs))
}

impl Ord for PackageVersion {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		match self.epoch.cmp(&other.epoch) {
			std::cmp::Ordering::Equal => {
				let mut lhs: (&str, &str) = ("", &self.version);
				let mut rhs: (&str, &str) = ("", &other.version);

				while !lhs.1.is_empty() && !rhs.1.is_empty() {
					lhs = split_while(lhs.1, |c| !c.is_ascii_digit());
					rhs = split_while(rhs.1, |c| !c.is_ascii_digit());

					match lhs.0.cmp(rhs.0) {
						std::cmp::Ordering::Equal => {},
						ord => return ord
					}

					lhs = split_while(lhs.1, |c| c.is_ascii_digit());
					rhs = split_while(rhs.1, |c| c.is_ascii_digit());

					match cmp_numeric(lhs.0, rhs.0) {
						std::cmp::Ordering::Equal => {},
						ord => return ord
					}
				}

				/* Falls back to the raw strings so `1.01` and `1.1` stay distinct like they are in `Eq` */
				lhs.1.len().cmp(&rhs.1.len()).then_with(|| self.version.cmp(&other.version))
			},
			ord => ord,
		}
	}
}

impl PartialOrd for PackageVersion {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}

impl std::hash::Hash for PackageVersion {
	fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
		self.epoch.hash(state);
		self.version.hash(state);
	}
}

impl std::fmt::Display for PackageVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.epoch == 0 {
			write!(f, "{}", self.version)
		} else {
			write!(f, "{}:{}", self.epoch, self.version)
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test] fn mod_version_are_not_compared_lexically() { assert!(PackageVersion::new("1.2.4.0").unwrap() < PackageVersion::new("1.2.10.0").unwrap()) }
	#[test] fn mod_version_short_version_is_lt() { assert!(PackageVersion::new("1.2").unwrap() < PackageVersion::new("1.2.3").unwrap()) }
	#[test] fn mod_version_identical_are_eq() { assert!(PackageVersion::new("1.2.3").unwrap() == PackageVersion::new("1.2.3").unwrap()) }
	#[test] fn mod_version_higher_version_is_gt() { assert!(PackageVersion::new("1.2.3").unwrap() < PackageVersion::new("1.2.4").unwrap()) }
	#[test] fn mod_version_prefix_is_supported() { assert!(PackageVersion::new("v1.2.3").unwrap() < PackageVersion::new("v1.2.4").unwrap()) }
	#[test] fn mod_version_prefix_is_compared_lexically() { assert!(PackageVersion::new("a1.2.3").unwrap() < PackageVersion::new("b1.2.3").unwrap()) }
	#[test] fn mod_version_trailing_non_digit() { assert!(PackageVersion::new("1.2a").unwrap() < PackageVersion::new("1.2b").unwrap()) }
	#[test] fn mod_version_trailing_digit() { assert!(PackageVersion::new("1.2").unwrap() < PackageVersion::new("1.3").unwrap()) }
	#[test] fn mod_version_epoch_is_respected() { assert!(PackageVersion::new("1:1.2").unwrap() < PackageVersion::new("2:v0.1").unwrap()) }
	#[test] fn mod_version_huge_numbers_dont_overflow() { assert!(PackageVersion::new("1.99999999999999999999").unwrap() > PackageVersion::new("1.9").unwrap()) }
	#[test] fn mod_version_empty_is_err() { assert!(PackageVersion::new("").is_err()) }
	#[test] fn mod_version_bad_epoch_is_err() { assert!(PackageVersion::new("x:1.0").is_err()) }
	#[test] fn mod_version_whitespace_is_err() { assert!(PackageVersion::new("1.0 beta").is_err()) }
	#[test] fn mod_version_display_hides_zero_epoch() { assert_eq!(PackageVersion::new("0:1.2").unwrap().to_string(), "1.2") }
	#[test] fn mod_version_display_keeps_epoch() { assert_eq!(PackageVersion::new("2:1.2").unwrap().to_string(), "2:1.2") }
}
