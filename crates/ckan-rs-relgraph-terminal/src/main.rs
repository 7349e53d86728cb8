use ckan_rs_relgraph::metadb::package::KspVersionReal;

mod render;

fn main() {
	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",         "Show help");
		opts.optflag( "v", "verbose",      "Log debug output and show node details");
		opts.optopt(  "r", "registry",     "Registry snapshot to read, a .json registry document or a saved metadb", "PATH");
		opts.optmulti("g", "game-version", "Game version to check compatibility against, may be repeated", "VERSION");
		opts.optopt(  "d", "depth",        "Number of layers to expand below the package", "N");
		opts.optflag( "a", "all-versions", "Ignore game version compatibility");
		opts.optflag( "",  "json",         "Print the tree as JSON");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: ckan-rs-relgraph [options] IDENTIFIER"));
			return;
		}

		parsed_options
	};

	let level = if parsed_options.opt_present("v") { "debug" } else { "warn" };
	env_logger::init_from_env(env_logger::Env::default().default_filter_or(level));

	if let Err(e) = run(&parsed_options) {
		log::error!("{}", e);
		std::process::exit(1);
	}
}

fn run(options: &getopts::Matches) -> Result<(), Error> {
	let mut config = ckan_rs_relgraph::Config::load_from_disk().unwrap_or_else(|e| {
		log::warn!("Failed to read config file: {}", e);
		log::warn!("Using default config.");
		ckan_rs_relgraph::Config::default()
	});

	let game_versions = options.opt_strs("g");
	if !game_versions.is_empty() {
		let versions = game_versions.iter()
			.map(KspVersionReal::new)
			.collect::<ckan_rs_relgraph::Result<Vec<_>>>()?;
		config.set_compatible_ksp_versions(versions);
	}

	if let Some(depth) = options.opt_str("d") {
		config.set_expand_depth(depth.parse().map_err(|_| Error::InvalidArgument(format!("depth \"{}\" is not a number", depth)))?);
	}

	let registry_path = options.opt_str("r").map_or_else(|| config.metadb_path(), std::path::PathBuf::from);
	let db = load_registry(registry_path)?;

	let identifier = options.free.first().ok_or(Error::MissingArgument)?;
	let package = db.get_latest(identifier).ok_or_else(|| Error::UnknownPackage(identifier.clone()))?.clone();

	let criteria = if options.opt_present("a") {
		None
	} else if config.compatible_ksp_versions().is_empty() {
		log::info!("No game versions configured, showing packages for all versions.");
		None
	} else {
		Some(config.version_criteria())
	};

	let mut tree = ckan_rs_relgraph::RelationshipTree::build_root(package, &db, criteria.as_ref())?;
	render::expand_to_depth(&mut tree, &db, criteria.as_ref(), config.expand_depth())?;

	if options.opt_present("json") {
		println!("{}", serde_json::to_string_pretty(&render::render_json(&tree))?);
	} else {
		print!("{}", render::render_text(&tree, options.opt_present("v")));
	}

	Ok(())
}

fn load_registry(path: std::path::PathBuf) -> Result<ckan_rs_relgraph::MetaDB, Error> {
	match ckan_rs_relgraph::MetaDB::load_from_path(&path) {
		Ok(db) => Ok(db),
		Err(ckan_rs_relgraph::Error::IO(e)) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::MissingRegistry(path)),
		Err(e) => Err(e.into()),
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("CKAN-rs error: {0}")]
	CKANrsError(#[from] ckan_rs_relgraph::Error),
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
	#[error("Missing argument")]
	MissingArgument,
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("No package named {0} in the registry")]
	UnknownPackage(String),
	#[error("No registry at {}, pass one with --registry", .0.display())]
	MissingRegistry(std::path::PathBuf),
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn missing_registry_names_path_and_flag() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("metadb.bin");
		let e = load_registry(path.clone()).unwrap_err();
		assert!(matches!(e, Error::MissingRegistry(ref p) if p == &path));
		assert_eq!(e.to_string(), format!("No registry at {}, pass one with --registry", path.display()));
	}

	#[test]
	fn unreadable_registry_is_library_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("registry.json");
		std::fs::write(&path, "not json").unwrap();
		assert!(matches!(load_registry(path), Err(Error::CKANrsError(ckan_rs_relgraph::Error::SerdeJSON(_)))));
	}
}
