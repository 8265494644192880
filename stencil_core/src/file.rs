use std::fmt;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::StencilResult;

/// The payload of a [`File`].
///
/// Only buffered contents can be rendered. `Null` marks a file that exists in
/// the pipeline without contents (a directory entry, or a file read with
/// contents disabled) and is forwarded untouched.
#[derive(Default)]
pub enum Contents {
	#[default]
	Null,
	Buffer(Vec<u8>),
	Stream(Box<dyn Read + Send>),
}

impl fmt::Debug for Contents {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Null => write!(f, "Null"),
			Self::Buffer(bytes) => write!(f, "Buffer({} bytes)", bytes.len()),
			Self::Stream(_) => write!(f, "Stream"),
		}
	}
}

impl From<Vec<u8>> for Contents {
	fn from(bytes: Vec<u8>) -> Self {
		Self::Buffer(bytes)
	}
}

impl From<String> for Contents {
	fn from(text: String) -> Self {
		Self::Buffer(text.into_bytes())
	}
}

impl From<&str> for Contents {
	fn from(text: &str) -> Self {
		Self::Buffer(text.as_bytes().to_vec())
	}
}

/// A file travelling through the pipeline.
///
/// `path` is the full path of the file, `base` the directory the file was
/// collected from and `cwd` the working directory of the pipeline. Output
/// locations are derived from [`File::relative`], so replacing the extension
/// of `path` is enough to rename the written file.
#[derive(Debug)]
pub struct File {
	pub cwd: PathBuf,
	pub base: PathBuf,
	pub path: PathBuf,
	pub contents: Contents,
	/// Per-file view data. When present the stage renders the file with it
	/// instead of the view the stage was built with.
	pub data: Option<serde_json::Value>,
}

impl File {
	/// Create a file whose `base` is the parent directory of `path`.
	pub fn new(path: impl Into<PathBuf>, contents: impl Into<Contents>) -> Self {
		let path = path.into();
		let base = path
			.parent()
			.map(Path::to_path_buf)
			.unwrap_or_default();

		Self {
			cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
			base,
			path,
			contents: contents.into(),
			data: None,
		}
	}

	/// Read a file from disk into a buffered [`File`].
	pub fn read(path: impl Into<PathBuf>, base: impl Into<PathBuf>) -> StencilResult<Self> {
		let path = path.into();
		let bytes = std::fs::read(&path)?;
		let mut file = Self::new(path, bytes);
		file.base = base.into();
		Ok(file)
	}

	#[must_use]
	pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
		self.base = base.into();
		self
	}

	#[must_use]
	pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
		self.cwd = cwd.into();
		self
	}

	#[must_use]
	pub fn with_data(mut self, data: serde_json::Value) -> Self {
		self.data = Some(data);
		self
	}

	pub fn is_null(&self) -> bool {
		matches!(self.contents, Contents::Null)
	}

	pub fn is_buffer(&self) -> bool {
		matches!(self.contents, Contents::Buffer(_))
	}

	pub fn is_stream(&self) -> bool {
		matches!(self.contents, Contents::Stream(_))
	}

	/// Buffered contents, if any.
	pub fn bytes(&self) -> Option<&[u8]> {
		match &self.contents {
			Contents::Buffer(bytes) => Some(bytes.as_slice()),
			Contents::Null | Contents::Stream(_) => None,
		}
	}

	/// Buffered contents as UTF-8 text, if any and valid.
	pub fn text(&self) -> Option<&str> {
		self.bytes().and_then(|bytes| std::str::from_utf8(bytes).ok())
	}

	/// The path of the file relative to its base. Falls back to the file name
	/// when the path does not live under `base`.
	pub fn relative(&self) -> PathBuf {
		match self.path.strip_prefix(&self.base) {
			Ok(rel) => rel.to_path_buf(),
			Err(_) => self
				.path
				.file_name()
				.map(PathBuf::from)
				.unwrap_or_default(),
		}
	}

	/// Directory containing the file.
	pub fn dirname(&self) -> &Path {
		self.path.parent().unwrap_or_else(|| Path::new(""))
	}

	/// Extension of the path including the leading dot, or an empty string.
	pub fn extname(&self) -> String {
		self.path
			.extension()
			.and_then(|ext| ext.to_str())
			.map(|ext| format!(".{ext}"))
			.unwrap_or_default()
	}

	/// Replace the extension of the path. `ext` may be given with or without
	/// its leading dot; an empty `ext` strips the extension.
	pub fn replace_extension(&mut self, ext: &str) {
		self.path.set_extension(ext.trim_start_matches('.'));
	}
}
