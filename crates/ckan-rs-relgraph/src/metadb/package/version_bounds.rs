use serde::{Serialize, Deserialize};

/// A generic enum to describe a range of versions.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub enum VersionBounds<T>
where T: std::cmp::PartialEq + std::cmp::Ord + std::clone::Clone,
{
	#[default] Any,
	Explicit(T),
	MinOnly(T),
	MaxOnly(T),
	MinMax(T, T),
}

impl<T> VersionBounds<T>
where T: std::cmp::PartialEq + std::cmp::Ord + std::clone::Clone,
{
	/// When all arguments are `None` will return `Any`
	pub fn new(explicit: Option<T>, min: Option<T>, max: Option<T>) -> crate::Result<VersionBounds<T>> {
		match (explicit, min, max) {
			(None, None, None) => Ok(VersionBounds::Any),
			(None, None, Some(max)) => Ok(VersionBounds::MaxOnly(max)),
			(None, Some(min), None) => Ok(VersionBounds::MinOnly(min)),
			(None, Some(min), Some(max)) => {
				if min > max {
					return Err(crate::Error::Parse("minimum version is greater than the maximum version".to_string()))
				}
				Ok(VersionBounds::MinMax(min, max))
			},
			(Some(e), None, None) => Ok(VersionBounds::Explicit(e)),
			_ => Err(crate::Error::Parse("Attempted to create bounds with both explicit and min or max version constraint".to_string()))
		}
	}

	pub fn is_version_within(&self, other: &T) -> bool {
		match self {
			VersionBounds::Any => true,
			VersionBounds::Explicit(v) => other == v,
			VersionBounds::MinOnly(min) => other >= min,
			VersionBounds::MaxOnly(max) => other <= max,
			VersionBounds::MinMax(min, max) => min <= other && other <= max,
		}
	}

	/// The lowest version inside the bounds, `None` when unbounded below.
	pub fn lower(&self) -> Option<&T> {
		match self {
			VersionBounds::Any | VersionBounds::MaxOnly(_) => None,
			VersionBounds::Explicit(v) | VersionBounds::MinOnly(v) | VersionBounds::MinMax(v, _) => Some(v),
		}
	}

	/// The highest version inside the bounds, `None` when unbounded above.
	pub fn upper(&self) -> Option<&T> {
		match self {
			VersionBounds::Any | VersionBounds::MinOnly(_) => None,
			VersionBounds::Explicit(v) | VersionBounds::MaxOnly(v) | VersionBounds::MinMax(_, v) => Some(v),
		}
	}
}
