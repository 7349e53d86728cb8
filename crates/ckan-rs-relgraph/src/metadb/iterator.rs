//! Iterator adaptors for filtering packages.

use std::collections::BTreeMap;

use super::package::*;

pub struct CriteriaMatches<'a, 'c, I>
where
	I: Iterator<Item = &'a Package>,
{
	criteria: &'c VersionCriteria,
	underlying: I,
}

impl<'a, 'c, I> Iterator for CriteriaMatches<'a, 'c, I>
where
	I: Iterator<Item = &'a Package>,
{
	type Item = I::Item;

	fn next(&mut self) -> Option<Self::Item> {
		self.underlying.by_ref().find(|package| self.criteria.is_package_compatible(package))
	}
}

pub trait CriteriaMatchesExt<'a>: Iterator<Item = &'a Package>
{
	/// Filters the iterator to packages compatible with `criteria`
	fn criteria_matches(self, criteria: &VersionCriteria) -> CriteriaMatches<'a, '_, Self>
	where
		Self: Sized,
	{
		CriteriaMatches { underlying: self, criteria }
	}
}

impl<'a, I: Iterator<Item = &'a Package>> CriteriaMatchesExt<'a> for I {}


pub struct RelationshipMatches<'a, 'r, I>
where
	I: Iterator<Item = &'a Package>,
{
	relationship: &'r Relationship,
	underlying: I,
}

impl<'a, 'r, I> Iterator for RelationshipMatches<'a, 'r, I>
where
	I: Iterator<Item = &'a Package>,
{
	type Item = I::Item;

	fn next(&mut self) -> Option<Self::Item> {
		self.underlying.by_ref().find(|package| does_package_fulfill_relationship(package, self.relationship))
	}
}

pub trait RelationshipMatchesExt<'a>: Iterator<Item = &'a Package>
{
	/// Filters the iterator to only packages fulfilling the relationship including `provides` relationships.
	/// This means the output may not be all the same identifier.
	fn relationship_matches(self, relationship: &Relationship) -> RelationshipMatches<'a, '_, Self>
	where
		Self: Sized,
	{
		RelationshipMatches { underlying: self, relationship }
	}
}

impl<'a, I: Iterator<Item = &'a Package>> RelationshipMatchesExt<'a> for I {}

pub trait LatestPerIdentifierExt<'a>: Iterator<Item = &'a Package>
{
	/// Collapses the iterator to the highest version of each identifier, ordered by identifier.
	fn latest_per_identifier(self) -> Vec<&'a Package>
	where
		Self: Sized,
	{
		let mut map = BTreeMap::<&'a str, &'a Package>::new();
		for package in self {
			map.entry(package.identifier.identifier.as_str())
				.and_modify(|latest| if package.identifier.version > latest.identifier.version { *latest = package })
				.or_insert(package);
		}
		map.into_values().collect()
	}
}

impl<'a, I: Iterator<Item = &'a Package>> LatestPerIdentifierExt<'a> for I {}
