use ckan_rs_relgraph::*;
use ckan_rs_relgraph::metadb::package::*;
use ckan_rs_relgraph::relationship_graph::NodeVariant;
use ckan_rs_test_utils::{PackageBuilder, core_metadb, criteria, temp_metadb_file};

fn init() {
	let _ = env_logger::builder().is_test(true).try_init();
}

fn registry_document() -> serde_json::Value {
	serde_json::json!({
		"available": [
			{
				"identifier": "Core",
				"version": "1.0",
				"ksp_version": "1.12",
				"depends": [ { "name": "Lib" }, { "name": "ModuleManager" } ],
				"recommends": [ { "any_of": [ { "name": "Ghost" }, { "name": "Widget" } ] } ],
			},
			{ "identifier": "Lib", "version": "1.0", "ksp_version_max": "1.9" },
			{ "identifier": "Lib", "version": "2.0", "ksp_version_min": "1.12" },
			{ "identifier": "WidgetA", "version": "1.0", "provides": [ "Widget" ] },
			{ "identifier": "Broken" },
		],
		"installed": [],
		"installed_dlls": [ "ModuleManager" ],
		"installed_dlc": { "MakingHistory-DLC": "1.1.0" },
	})
}

#[test]
fn imports_registry_document() {
	init();
	let db = MetaDB::from_json(&registry_document()).unwrap();

	/* "Broken" has no version and is skipped */
	assert_eq!(db.get_packages().len(), 4);
	assert!(db.get_installed().is_empty());
	assert!(db.get_installed_dlls().contains("ModuleManager"));
	assert!(db.get_installed_dlc().contains(&PackageIdentifier::new("MakingHistory-DLC", PackageVersion::new("1.1.0").unwrap())));
	assert_eq!(db.get_latest("Lib").unwrap().identifier.version, PackageVersion::new("2.0").unwrap());
	assert!(db.get_latest("Widget").is_none());
}

#[test]
fn rejects_malformed_registry_document() {
	init();
	assert!(MetaDB::from_json(&serde_json::json!([])).is_err());
	assert!(MetaDB::from_json(&serde_json::json!({ "installed_dlls": "ModuleManager" })).is_err());
	assert!(MetaDB::from_json(&serde_json::json!({ "installed_dlc": { "MakingHistory-DLC": "" } })).is_err());
}

#[test]
fn imported_registry_builds_tree() {
	init();
	let db = MetaDB::from_json(&registry_document()).unwrap();
	let core = db.get_latest("Core").unwrap().clone();
	let tree = RelationshipTree::build_root(core, &db, Some(&criteria(&["1.12.5"]).unwrap())).unwrap();

	let children = tree.children(tree.root())
		.into_iter()
		.map(|i| (tree[i].variant(), tree[i].label().to_string()))
		.collect::<Vec<_>>();
	assert_eq!(children, vec![
		(NodeVariant::ResolvedPackage, "Lib 2.0".to_string()),
		(NodeVariant::InstalledCapability, "ModuleManager".to_string()),
		(NodeVariant::ProvidesGroup, "Ghost or Widget (virtual)".to_string()),
	]);
}

#[test]
fn saved_metadb_loads_identically() {
	init();
	let db = core_metadb().unwrap();
	let file = temp_metadb_file(&db).unwrap();

	let loaded = MetaDB::load_from_path(file.path()).unwrap();
	assert_eq!(loaded.get_packages().len(), db.get_packages().len());
	let widget = loaded.get_latest("WidgetA").unwrap();
	assert!(widget.provides.contains("Widget"));

	let core = loaded.get_latest("Core").unwrap().clone();
	let tree = RelationshipTree::build_root(core, &loaded, None).unwrap();
	assert_eq!(tree.children(tree.root()).len(), 2);
}

#[test]
fn loads_registry_document_by_extension() {
	init();
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("registry.json");
	std::fs::write(&path, registry_document().to_string()).unwrap();

	let db = MetaDB::load_from_path(&path).unwrap();
	assert_eq!(db.get_packages().len(), 4);
}

#[test]
fn missing_metadb_is_io_error() {
	init();
	let dir = tempfile::tempdir().unwrap();
	assert!(matches!(MetaDB::load_from_path(dir.path().join("metadb.bin")), Err(Error::IO(_))));
}

#[test]
fn latest_is_chosen_per_identifier() {
	init();
	let mut db = MetaDB::default();
	db.add_package(PackageBuilder::new("B", "1.0").unwrap().provides("Thing").build());
	db.add_package(PackageBuilder::new("A", "1:0.1").unwrap().provides("Thing").build());
	db.add_package(PackageBuilder::new("A", "9.9").unwrap().provides("Thing").build());

	let found = db.available_satisfying(&PackageDescriptor::new("Thing").into(), None).unwrap();
	let ids = found.iter().map(|p| p.identifier.to_string()).collect::<Vec<_>>();
	assert_eq!(ids, vec!["A-1:0.1", "B-1.0"]);
}

#[test]
fn summary_spans_all_releases() {
	init();
	let mut db = MetaDB::default();
	db.add_package(PackageBuilder::new("Lib", "1.0").unwrap().ksp_versions("1.8", "1.9").unwrap().build());
	db.add_package(PackageBuilder::new("Lib", "2.0").unwrap().ksp_versions("1.10", "1.11").unwrap().build());

	assert_eq!(db.compatible_version_summary("Lib").unwrap(), "KSP 1.8 - 1.11");
	assert_eq!(db.compatible_version_summary("Nothing").unwrap(), "KSP none");
}

#[test]
fn config_round_trips_through_disk() {
	init();
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("nested").join("relgraph.json");

	let mut config = Config::default();
	assert!(config.set_data_dir(dir.path().to_path_buf()));
	assert!(!config.set_data_dir(dir.path().join("missing")));
	config.set_compatible_ksp_versions([KspVersionReal::new("1.12").unwrap()]);
	config.set_expand_depth(4);
	config.save_to_path(&path).unwrap();

	let loaded = Config::load_from_path(&path).unwrap();
	assert_eq!(loaded, config);
	assert_eq!(loaded.metadb_path(), dir.path().join("metadb.bin"));
	assert_eq!(loaded.version_criteria().versions().len(), 1);
}

#[test]
fn partial_config_uses_defaults() {
	init();
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("relgraph.json");
	std::fs::write(&path, r#"{ "expand_depth": 1 }"#).unwrap();

	let config = Config::load_from_path(&path).unwrap();
	assert_eq!(config.expand_depth(), 1);
	assert!(config.compatible_ksp_versions().is_empty());
}

#[test]
fn config_game_versions_are_strings() {
	init();
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("relgraph.json");
	std::fs::write(&path, r#"{ "compatible_ksp_versions": ["1.12", "1.11.2"] }"#).unwrap();

	let config = Config::load_from_path(&path).unwrap();
	assert_eq!(config.compatible_ksp_versions(), &[KspVersionReal::new("1.12").unwrap(), KspVersionReal::new("1.11.2").unwrap()]);

	config.save_to_path(&path).unwrap();
	let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
	assert_eq!(saved["compatible_ksp_versions"], serde_json::json!(["1.12", "1.11.2"]));
}

#[test]
fn config_with_bad_game_version_fails() {
	init();
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("relgraph.json");
	std::fs::write(&path, r#"{ "compatible_ksp_versions": ["latest"] }"#).unwrap();

	assert!(matches!(Config::load_from_path(&path), Err(Error::SerdeJSON(_))));
}
