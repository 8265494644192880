use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum StencilError {
	#[error(transparent)]
	#[diagnostic(code(stencil::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to load view `{path}`: {reason}")]
	#[diagnostic(
		code(stencil::view_load),
		help("the view file must contain a valid JSON document")
	)]
	ViewLoad { path: String, reason: String },

	/// The message is the template engine's own, unchanged.
	#[error("{0}")]
	#[diagnostic(code(stencil::render))]
	Render(String),

	#[error("Unable to load partial `{name}`")]
	#[diagnostic(
		code(stencil::missing_partial),
		help("register the partial by name or enable `resolve_partials` to read it from disk")
	)]
	MissingPartial { name: String },

	#[error("streaming contents are not supported: `{path}`")]
	#[diagnostic(
		code(stencil::streaming_not_supported),
		help("buffer the file contents before passing them to the stage")
	)]
	StreamingNotSupported { path: String },

	#[error("invalid tags: {0}")]
	#[diagnostic(
		code(stencil::invalid_tags),
		help("tags are a pair of non-empty delimiters, e.g. `[\"[[\", \"]]\"]`")
	)]
	InvalidTags(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(stencil::config_parse),
		help("check that stencil.toml is valid TOML with `view`, `src`, [options] and [partials] entries")
	)]
	ConfigParse(String),

	#[error("failed to load partial `{name}` from `{path}`: {reason}")]
	#[diagnostic(code(stencil::partial_load))]
	PartialLoad {
		name: String,
		path: String,
		reason: String,
	},

	#[error("invalid source pattern `{pattern}`: {reason}")]
	#[diagnostic(code(stencil::invalid_source))]
	InvalidSource { pattern: String, reason: String },
}

/// Broad classification of a [`StencilError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// The view could not be read or parsed.
	ViewLoad,
	/// The template engine rejected the template or a partial was missing.
	Render,
	/// The file carries contents the stage cannot handle.
	Unsupported,
	/// Invalid options, config or source patterns.
	Config,
	/// Filesystem failure outside view loading.
	Io,
}

impl StencilError {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::ViewLoad { .. } => ErrorKind::ViewLoad,
			Self::Render(_) | Self::MissingPartial { .. } => ErrorKind::Render,
			Self::StreamingNotSupported { .. } => ErrorKind::Unsupported,
			Self::InvalidTags(_)
			| Self::ConfigParse(_)
			| Self::PartialLoad { .. }
			| Self::InvalidSource { .. } => ErrorKind::Config,
			Self::Io(_) => ErrorKind::Io,
		}
	}

	/// Returns true for template failures, including unresolved partials.
	pub fn is_render_error(&self) -> bool {
		self.kind() == ErrorKind::Render
	}
}

pub type StencilResult<T> = Result<T, StencilError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
