//! Functions and methods for reading CKAN types from JSON

use serde_json::{Map, Value};

use super::*;

/// Reads an optional string field, `Err` when present but not a string.
fn get_opt_string(obj: &Map<String, Value>, key: &str) -> crate::Result<Option<String>> {
	match obj.get(key) {
		None | Some(Value::Null) => Ok(None),
		Some(Value::String(s)) => Ok(Some(s.clone())),
		Some(_) => Err(crate::Error::Parse(format!("{} must be a string", key))),
	}
}

impl PackageDescriptor {
	pub fn from_json(v: &Value) -> crate::Result<Self> {
		use crate::Error::Parse;
		let obj = v.as_object().ok_or_else(|| Parse("relationship must be an object".to_string()))?;
		Ok(PackageDescriptor {
			name: get_opt_string(obj, "name")?.ok_or_else(|| Parse("JSON has no name field".to_string()))?,
			version: get_opt_string(obj, "version")?,
			min_version: get_opt_string(obj, "min_version")?,
			max_version: get_opt_string(obj, "max_version")?,
		})
	}
}

impl Relationship {
	/// Reads a single relationship, either a descriptor object or an `any_of` object.
	pub fn from_json(v: &Value) -> crate::Result<Self> {
		use crate::Error::Parse;
		let obj = v.as_object().ok_or_else(|| Parse("array elements must be objects".to_string()))?;
		if let Some(f) = obj.get("any_of") {
			let arr = f.as_array().ok_or_else(|| Parse("any_of constraint must be an array".to_string()))?;
			Ok(Relationship::AnyOf(
				arr.iter().map(PackageDescriptor::from_json).collect::<crate::Result<Vec<_>>>()?
			))
		} else if obj.get("name").is_some() {
			Ok(Relationship::One(PackageDescriptor::from_json(v)?))
		} else {
			Err(Parse("relationship object must be a relationship or any_of constraint".to_string()))
		}
	}
}

pub fn relationships_from_json(v: &Value) -> crate::Result<Vec<Relationship>> {
	v.as_array()
		.ok_or_else(|| crate::Error::Parse("relationships must be an array".to_string()))?
		.iter()
		.map(Relationship::from_json)
		.collect()
}

impl Package {
	/// Reads the fields of a `.ckan` document needed to describe its relationships.
	/// 
	/// Version requirements inside relationships are not parsed here, see [`Relationship::validate()`].
	pub fn read_from_json(v: &Value) -> crate::Result<Self> {
		use crate::Error::Parse;

		let obj = v.as_object().ok_or_else(|| Parse("JSON is not an object".to_string()))?;

		let identifier = get_opt_string(obj, "identifier")?.ok_or_else(|| Parse("package has no identifier".to_string()))?;
		let version = get_opt_string(obj, "version")?.ok_or_else(|| Parse(format!("package {} has no version", identifier)))?;

		let relationships = |key: &str| -> crate::Result<Vec<Relationship>> {
			obj.get(key).map_or_else(|| Ok(Vec::new()), relationships_from_json)
		};

		Ok(Package {
			name: get_opt_string(obj, "name")?.unwrap_or_else(|| identifier.clone()),
			identifier: PackageIdentifier::new(identifier, PackageVersion::new(version)?),
			blurb: get_opt_string(obj, "abstract")?.unwrap_or_default(),
			ksp_version: KspVersionBounds::new_from_str(
				get_opt_string(obj, "ksp_version")?,
				get_opt_string(obj, "ksp_version_min")?,
				get_opt_string(obj, "ksp_version_max")?,
			)?,
			ksp_version_strict: match obj.get("ksp_version_strict") {
				None | Some(Value::Null) => false,
				Some(Value::Bool(b)) => *b,
				Some(_) => return Err(Parse("ksp_version_strict must be a boolean".to_string())),
			},
			depends: relationships("depends")?,
			recommends: relationships("recommends")?,
			suggests: relationships("suggests")?,
			supports: relationships("supports")?,
			conflicts: relationships("conflicts")?,
			provides: match obj.get("provides") {
				None | Some(Value::Null) => Default::default(),
				Some(Value::Array(arr)) => arr.iter()
					.map(|e| e.as_str().map(str::to_string).ok_or_else(|| Parse("`provides` elements must be strings".to_string())))
					.collect::<crate::Result<_>>()?,
				Some(_) => return Err(Parse("provides must be an array".to_string())),
			},
		})
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn reads_ckan_document() {
		let v = serde_json::json!({
			"identifier": "Core",
			"name": "Core Mod",
			"abstract": "does things",
			"version": "1:1.2.0",
			"ksp_version_min": "1.8",
			"ksp_version_max": "1.12",
			"depends": [ { "name": "Lib", "min_version": "2.0" } ],
			"recommends": [ { "any_of": [ { "name": "WidgetA" }, { "name": "WidgetB" } ] } ],
			"provides": [ "CoreAlias" ],
		});
		let p = Package::read_from_json(&v).unwrap();
		assert_eq!(p.identifier.identifier, "Core");
		assert_eq!(p.identifier.version, PackageVersion::new("1:1.2.0").unwrap());
		assert_eq!(p.name, "Core Mod");
		assert_eq!(p.depends, vec![Relationship::One(PackageDescriptor::new("Lib").with_min_version("2.0"))]);
		assert_eq!(p.recommends.len(), 1);
		assert!(matches!(&p.recommends[0], Relationship::AnyOf(v) if v.len() == 2));
		assert!(p.provides.contains("CoreAlias"));
		assert!(!p.ksp_version_strict);
	}

	#[test]
	fn malformed_relationship_version_is_kept_raw() {
		let v = serde_json::json!({
			"identifier": "Core",
			"version": "1.0",
			"depends": [ { "name": "Lib", "version": "not a version" } ],
		});
		let p = Package::read_from_json(&v).unwrap();
		assert!(p.depends[0].validate().is_err());
	}

	#[test]
	fn missing_identifier_is_err() {
		assert!(Package::read_from_json(&serde_json::json!({ "version": "1.0" })).is_err());
	}

	#[test]
	fn relationship_without_name_is_err() {
		assert!(relationships_from_json(&serde_json::json!([ { "version": "1.0" } ])).is_err());
	}
}
