use minijinja::syntax::SyntaxConfig;
use serde::Deserialize;

use crate::StencilError;
use crate::StencilResult;

/// Default extension given to rendered files.
pub const DEFAULT_EXTENSION: &str = ".html";
/// Default variable delimiters.
pub const DEFAULT_TAGS: (&str, &str) = ("{{", "}}");
/// Default block delimiters.
pub const DEFAULT_BLOCK_TAGS: (&str, &str) = ("{%", "%}");
/// Default comment delimiters.
pub const DEFAULT_COMMENT_TAGS: (&str, &str) = ("{#", "#}");

/// A pair of opening and closing delimiters.
///
/// Deserializes from a two-element array:
///
/// ```toml
/// tags = ["[[", "]]"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct Tags {
	open: String,
	close: String,
}

impl Tags {
	pub fn new(open: impl Into<String>, close: impl Into<String>) -> StencilResult<Self> {
		let open = open.into();
		let close = close.into();

		if open.trim().is_empty() || close.trim().is_empty() {
			return Err(StencilError::InvalidTags(format!(
				"delimiters must not be empty, got `{open}` and `{close}`"
			)));
		}

		if open.chars().any(char::is_whitespace) || close.chars().any(char::is_whitespace) {
			return Err(StencilError::InvalidTags(format!(
				"delimiters must not contain whitespace, got `{open}` and `{close}`"
			)));
		}

		Ok(Self { open, close })
	}

	pub fn open(&self) -> &str {
		&self.open
	}

	pub fn close(&self) -> &str {
		&self.close
	}

	fn from_pair((open, close): (&str, &str)) -> Self {
		Self {
			open: open.to_string(),
			close: close.to_string(),
		}
	}
}

impl Default for Tags {
	fn default() -> Self {
		Self::from_pair(DEFAULT_TAGS)
	}
}

impl TryFrom<Vec<String>> for Tags {
	type Error = StencilError;

	fn try_from(pair: Vec<String>) -> StencilResult<Self> {
		let [open, close]: [String; 2] = pair.try_into().map_err(|pair: Vec<String>| {
			StencilError::InvalidTags(format!("expected two delimiters, got {}", pair.len()))
		})?;

		Self::new(open, close)
	}
}

/// How rendered values are escaped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoEscape {
	/// HTML escape every interpolated value.
	#[default]
	Html,
	/// Interpolate values verbatim.
	None,
}

/// What happens when a template references a value missing from the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Undefined {
	/// Missing values render as empty strings.
	#[default]
	Lenient,
	/// Any use of a missing value fails the render.
	Strict,
	/// Attribute access on missing values is allowed and renders empty.
	Chainable,
}

/// Options accepted by the transform stage.
///
/// `extension` and `tags` shape the output file and the template syntax; the
/// remaining fields are handed to the template engine.
///
/// ```toml
/// [options]
/// extension = ".txt"
/// tags = ["[[", "]]"]
/// auto_escape = "none"
/// undefined = "strict"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct RenderOptions {
	/// Extension given to rendered files. Defaults to `.html`.
	pub extension: String,
	/// Variable delimiters. Defaults to `{{` and `}}`.
	pub tags: Tags,
	/// Statement delimiters, used for `include`, `if` and `for`. Defaults to
	/// `{%` and `%}`, or to `tags` extended with `%` when `tags` is custom.
	pub block_tags: Option<Tags>,
	/// Comment delimiters. Defaults to `{#` and `#}`, or to `tags` extended
	/// with `#` when `tags` is custom.
	pub comment_tags: Option<Tags>,
	pub auto_escape: AutoEscape,
	pub undefined: Undefined,
	/// Keep the final newline of templates. Enabled by default so that output
	/// matches the template byte for byte.
	pub keep_trailing_newline: bool,
	/// Remove the first newline after a block tag.
	pub trim_blocks: bool,
	/// Strip whitespace before a block tag on the same line.
	pub lstrip_blocks: bool,
	/// Read partials missing from the partials map from disk, relative to the
	/// directory of the file being rendered.
	pub resolve_partials: bool,
}

impl Default for RenderOptions {
	fn default() -> Self {
		Self {
			extension: DEFAULT_EXTENSION.to_string(),
			tags: Tags::default(),
			block_tags: None,
			comment_tags: None,
			auto_escape: AutoEscape::default(),
			undefined: Undefined::default(),
			keep_trailing_newline: true,
			trim_blocks: false,
			lstrip_blocks: false,
			resolve_partials: false,
		}
	}
}

impl RenderOptions {
	#[must_use]
	pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
		self.extension = extension.into();
		self
	}

	#[must_use]
	pub fn with_tags(mut self, tags: Tags) -> Self {
		self.tags = tags;
		self
	}

	/// Statement delimiters. Unless set explicitly, custom `tags` extend to
	/// statements: `[[` and `]]` give `[[%` and `%]]`.
	pub fn block_tags(&self) -> Tags {
		self.block_tags
			.clone()
			.unwrap_or_else(|| self.derived_tags(DEFAULT_BLOCK_TAGS, "%"))
	}

	/// Comment delimiters. Unless set explicitly, custom `tags` extend to
	/// comments: `[[` and `]]` give `[[#` and `#]]`.
	pub fn comment_tags(&self) -> Tags {
		self.comment_tags
			.clone()
			.unwrap_or_else(|| self.derived_tags(DEFAULT_COMMENT_TAGS, "#"))
	}

	fn derived_tags(&self, default: (&str, &str), marker: &str) -> Tags {
		if self.tags == Tags::default() {
			return Tags::from_pair(default);
		}

		Tags {
			open: format!("{}{marker}", self.tags.open),
			close: format!("{marker}{}", self.tags.close),
		}
	}

	/// Whether any delimiter differs from the engine defaults.
	pub fn has_custom_syntax(&self) -> bool {
		self.tags != Tags::default() || self.block_tags.is_some() || self.comment_tags.is_some()
	}

	/// The engine syntax for these delimiters, or `None` for the defaults.
	///
	/// Fails with [`StencilError::InvalidTags`] when the variable, block and
	/// comment delimiters cannot be told apart.
	pub fn syntax(&self) -> StencilResult<Option<SyntaxConfig>> {
		if !self.has_custom_syntax() {
			return Ok(None);
		}

		let block = self.block_tags();
		let comment = self.comment_tags();
		let syntax = SyntaxConfig::builder()
			.block_delimiters(block.open.clone(), block.close.clone())
			.variable_delimiters(self.tags.open.clone(), self.tags.close.clone())
			.comment_delimiters(comment.open.clone(), comment.close.clone())
			.build()
			.map_err(|e| {
				StencilError::InvalidTags(format!(
					"variable `{} {}`, block `{} {}` and comment `{} {}` delimiters clash: {e}",
					self.tags.open,
					self.tags.close,
					block.open,
					block.close,
					comment.open,
					comment.close
				))
			})?;

		Ok(Some(syntax))
	}

	/// Check that the options can be turned into an engine syntax.
	pub fn validate(&self) -> StencilResult<()> {
		self.syntax().map(|_| ())
	}
}
