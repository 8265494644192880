use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::Partials;
use crate::RenderOptions;
use crate::StencilError;
use crate::StencilResult;
use crate::TransformStage;
use crate::View;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["stencil.toml", ".stencil.toml", ".config/stencil.toml"];

/// Output directory used when neither the config nor the command line names
/// one.
pub const DEFAULT_DEST: &str = "dist";

/// The view entry of a config file.
///
/// A string is the path of a JSON file relative to the config root:
///
/// ```toml
/// view = "data/site.json"
/// ```
///
/// A table is used as the view itself:
///
/// ```toml
/// [view]
/// title = "My site"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum ViewSource {
	Path(PathBuf),
	Inline(toml::Table),
}

/// Configuration loaded from a `stencil.toml` file.
///
/// ```toml
/// view = "data/site.json"
/// src = ["pages/**/*.jinja"]
/// exclude = ["drafts/"]
/// base = "pages"
/// dest = "dist"
///
/// [options]
/// extension = ".html"
/// tags = ["[[", "]]"]
///
/// [partials]
/// header = "partials/header.jinja"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct StencilConfig {
	/// View data shared by every rendered file.
	#[serde(default)]
	pub view: Option<ViewSource>,
	/// Glob patterns, relative to the project root, selecting the files to
	/// render.
	#[serde(default)]
	pub src: Vec<String>,
	/// Patterns in `.gitignore` syntax removing files from `src`.
	#[serde(default)]
	pub exclude: Vec<String>,
	/// Directory output paths are made relative to. Defaults to the project
	/// root.
	#[serde(default)]
	pub base: Option<PathBuf>,
	/// Output directory. Defaults to `dist`.
	#[serde(default)]
	pub dest: Option<PathBuf>,
	/// Options for the transform stage.
	#[serde(default)]
	pub options: RenderOptions,
	/// Map of partial name to template file, relative to the project root.
	#[serde(default)]
	pub partials: BTreeMap<String, PathBuf>,
}

impl StencilConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> StencilResult<Option<StencilConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		Self::parse(&content).map(Some)
	}

	pub fn parse(content: &str) -> StencilResult<StencilConfig> {
		let config: StencilConfig =
			toml::from_str(content).map_err(|e| StencilError::ConfigParse(e.to_string()))?;
		config.options.validate()?;

		Ok(config)
	}

	/// The configured view with file paths joined onto `root`.
	pub fn load_view(&self, root: &Path) -> StencilResult<Option<View>> {
		let view = match &self.view {
			None => None,
			Some(ViewSource::Path(path)) => Some(View::Path(root.join(path))),
			Some(ViewSource::Inline(table)) => {
				Some(View::Inline(toml_to_json(toml::Value::Table(table.clone()))?))
			}
		};

		Ok(view)
	}

	/// Read every configured partial file.
	pub fn load_partials(&self, root: &Path) -> StencilResult<Partials> {
		Partials::load_files(
			self.partials
				.iter()
				.map(|(name, path)| (name.as_str(), root.join(path))),
		)
	}

	/// Build the transform stage described by this config.
	pub fn stage(&self, root: &Path) -> StencilResult<TransformStage> {
		let view = self.load_view(root)?.unwrap_or_default();
		let partials = self.load_partials(root)?;

		TransformStage::new(view, self.options.clone(), partials)
	}

	/// Output directory joined onto `root`.
	pub fn dest(&self, root: &Path) -> PathBuf {
		root.join(
			self.dest
				.as_deref()
				.unwrap_or_else(|| Path::new(DEFAULT_DEST)),
		)
	}

	/// Base directory joined onto `root`.
	pub fn base(&self, root: &Path) -> PathBuf {
		match &self.base {
			Some(base) => root.join(base),
			None => root.to_path_buf(),
		}
	}
}

/// Convert a `toml::Value` to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> StencilResult<serde_json::Value> {
	let json = match value {
		toml::Value::String(s) => serde_json::Value::String(s),
		toml::Value::Integer(i) => serde_json::Value::Number(i.into()),
		toml::Value::Float(f) => {
			serde_json::Value::Number(serde_json::Number::from_f64(f).ok_or_else(|| {
				StencilError::ConfigParse(format!("unconvertible float value in view: {f}"))
			})?)
		}
		toml::Value::Boolean(b) => serde_json::Value::Bool(b),
		toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
		toml::Value::Array(arr) => {
			let items: StencilResult<Vec<serde_json::Value>> =
				arr.into_iter().map(toml_to_json).collect();
			serde_json::Value::Array(items?)
		}
		toml::Value::Table(table) => {
			let mut map = serde_json::Map::new();
			for (k, v) in table {
				map.insert(k, toml_to_json(v)?);
			}
			serde_json::Value::Object(map)
		}
	};

	Ok(json)
}
