use std::path::Path;
use std::path::PathBuf;

use crate::StencilError;
use crate::StencilResult;

/// The data context a template is rendered with.
///
/// A view is either given inline or as the path of a JSON file. Strings
/// convert into paths, so `View::from("data/site.json")` reads that file.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
	Inline(serde_json::Value),
	Path(PathBuf),
}

impl Default for View {
	fn default() -> Self {
		Self::Inline(serde_json::Value::Object(serde_json::Map::new()))
	}
}

impl View {
	/// Produce the view value, reading and parsing the JSON file for path
	/// views. Relative paths resolve against the process working directory.
	pub fn resolve(&self) -> StencilResult<serde_json::Value> {
		match self {
			Self::Inline(value) => Ok(value.clone()),
			Self::Path(path) => load_view_file(path),
		}
	}
}

impl From<serde_json::Value> for View {
	fn from(value: serde_json::Value) -> Self {
		Self::Inline(value)
	}
}

impl From<serde_json::Map<String, serde_json::Value>> for View {
	fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
		Self::Inline(serde_json::Value::Object(map))
	}
}

impl From<PathBuf> for View {
	fn from(path: PathBuf) -> Self {
		Self::Path(path)
	}
}

impl From<&Path> for View {
	fn from(path: &Path) -> Self {
		Self::Path(path.to_path_buf())
	}
}

impl From<&str> for View {
	fn from(path: &str) -> Self {
		Self::Path(PathBuf::from(path))
	}
}

impl From<String> for View {
	fn from(path: String) -> Self {
		Self::Path(PathBuf::from(path))
	}
}

/// Read a JSON view file.
pub fn load_view_file(path: &Path) -> StencilResult<serde_json::Value> {
	read_view_file(path).map_err(|reason| {
		StencilError::ViewLoad {
			path: path.display().to_string(),
			reason,
		}
	})
}

/// Read and parse a JSON view file, returning the failure reason on error.
pub(crate) fn read_view_file(path: &Path) -> Result<serde_json::Value, String> {
	let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
	serde_json::from_str(&content).map_err(|e| e.to_string())
}
