use serde::{Serialize, Deserialize};

use crate::metadb::package::{KspVersionReal, VersionCriteria};

/// Persistent settings for viewing relationship graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	data_dir: std::path::PathBuf,
	compatible_ksp_versions: Vec<KspVersionReal>,
	expand_depth: usize,
}

fn platform_dir(xdg_var: &str, home_fallback: &str) -> std::path::PathBuf {
	#[cfg(target_os = "windows")]
	let path = {
		let _ = (xdg_var, home_fallback);
		std::env::var_os("APPDATA").map(std::path::PathBuf::from).unwrap_or_default()
	};

	#[cfg(not(target_os = "windows"))]
	let path = if let Some(e) = std::env::var_os(xdg_var) {
		std::path::PathBuf::from(e)
	} else {
		std::env::var_os("HOME").map(std::path::PathBuf::from).unwrap_or_default().join(home_fallback)
	};

	path.join("CKAN-rs")
}

impl Default for Config {
	fn default() -> Self {
		Self {
			data_dir: platform_dir("XDG_DATA_HOME", ".local/share"),
			compatible_ksp_versions: Vec::new(),
			expand_depth: 2,
		}
	}
}

impl Config {
	/// Where [`Config::load_from_disk()`] looks for the config file.
	pub fn config_path() -> std::path::PathBuf {
		platform_dir("XDG_CONFIG_HOME", ".config").join("relgraph.json")
	}

	pub fn load_from_disk() -> crate::Result<Self> {
		Self::load_from_path(Self::config_path())
	}

	pub fn load_from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let path = path.as_ref();
		log::trace!("Loading config from {}", path.display());
		let file = std::fs::File::open(path)?;
		Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
	}

	pub fn save_to_path(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, serde_json::to_string_pretty(self)?)?;
		Ok(())
	}

	pub fn data_dir(&self) -> &std::path::PathBuf {
		&self.data_dir
	}
	/// returns if the directory is valid or not.
	pub fn set_data_dir(&mut self, data_dir: std::path::PathBuf) -> bool {
		if data_dir.is_dir() {
			self.data_dir = data_dir;
			true
		} else {
			false
		}
	}

	/// Default location of the saved registry snapshot.
	pub fn metadb_path(&self) -> std::path::PathBuf {
		self.data_dir.join("metadb.bin")
	}

	pub fn compatible_ksp_versions(&self) -> &[KspVersionReal] {
		&self.compatible_ksp_versions
	}
	pub fn set_compatible_ksp_versions(&mut self, versions: impl IntoIterator<Item = KspVersionReal>) {
		self.compatible_ksp_versions = versions.into_iter().collect();
	}

	pub fn version_criteria(&self) -> VersionCriteria {
		VersionCriteria::new(self.compatible_ksp_versions.iter().cloned())
	}

	/// How many layers below the root are expanded when printing a tree.
	pub fn expand_depth(&self) -> usize {
		self.expand_depth
	}
	pub fn set_expand_depth(&mut self, expand_depth: usize) {
		self.expand_depth = expand_depth;
	}
}
