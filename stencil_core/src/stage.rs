use std::borrow::Cow;
use std::sync::Arc;

use crate::Contents;
use crate::Engine;
use crate::File;
use crate::Partials;
use crate::RenderOptions;
use crate::StencilError;
use crate::StencilResult;
use crate::View;
use crate::view::read_view_file;

/// Outcome of resolving the stage view. A failure is kept so it can be
/// reported on every file the stage receives instead of at construction.
#[derive(Debug)]
enum ResolvedView {
	Ready(Arc<serde_json::Value>),
	Failed { path: String, reason: String },
}

/// Renders files through the template engine.
///
/// The engine and the view are set up once, when the stage is built. Each
/// file is then handled on its own: a failure affects only the file that
/// caused it, and the stage can keep processing files after returning an
/// error.
///
/// ```rust
/// use serde_json::json;
/// use stencil_core::File;
/// use stencil_core::Partials;
/// use stencil_core::RenderOptions;
/// use stencil_core::TransformStage;
///
/// let stage = TransformStage::new(
/// 	json!({ "title": "stencil" }),
/// 	RenderOptions::default(),
/// 	Partials::new(),
/// )
/// .unwrap();
/// let file = stage
/// 	.transform(File::new("pages/index.jinja", "<h1>{{ title }}</h1>"))
/// 	.unwrap();
///
/// assert_eq!(file.text(), Some("<h1>stencil</h1>"));
/// assert_eq!(file.path.to_str(), Some("pages/index.html"));
/// ```
#[derive(Debug)]
pub struct TransformStage {
	view: ResolvedView,
	extension: String,
	engine: Engine,
}

impl TransformStage {
	/// Build a stage.
	///
	/// Fails with [`StencilError::InvalidTags`] when the delimiters in
	/// `options` clash, before any file is seen. A view file that cannot be
	/// loaded does not fail here: it fails every file the stage transforms.
	pub fn new(
		view: impl Into<View>,
		options: RenderOptions,
		partials: Partials,
	) -> StencilResult<Self> {
		let engine = Engine::new(&options, partials)?;
		let view = match view.into() {
			View::Inline(value) => ResolvedView::Ready(Arc::new(value)),
			View::Path(path) => {
				match read_view_file(&path) {
					Ok(value) => ResolvedView::Ready(Arc::new(value)),
					Err(reason) => {
						let path = path.display().to_string();
						tracing::warn!(%path, %reason, "view could not be loaded");
						ResolvedView::Failed { path, reason }
					}
				}
			}
		};

		Ok(Self {
			view,
			extension: options.extension,
			engine,
		})
	}

	/// The resolved view, or the error every file will receive.
	pub fn view(&self) -> StencilResult<&serde_json::Value> {
		match &self.view {
			ResolvedView::Ready(value) => Ok(value),
			ResolvedView::Failed { path, reason } => {
				Err(StencilError::ViewLoad {
					path: path.clone(),
					reason: reason.clone(),
				})
			}
		}
	}

	/// Render a single file.
	///
	/// Files without contents, or with empty contents, are returned unchanged.
	/// A file's own `data` is merged over the top level of the stage view.
	/// On success the contents are replaced with the rendered text and the
	/// extension with [`RenderOptions::extension`]. On failure the file is
	/// consumed and only the error is returned.
	pub fn transform(&self, mut file: File) -> StencilResult<File> {
		if file.is_stream() {
			return Err(dropped(StencilError::StreamingNotSupported {
				path: file.path.display().to_string(),
			}));
		}

		let Some(bytes) = file.bytes().filter(|bytes| !bytes.is_empty()) else {
			tracing::debug!(path = %file.path.display(), "forwarding file without contents");
			return Ok(file);
		};

		let view = merge_data(self.view().map_err(dropped)?, file.data.as_ref());
		let source = std::str::from_utf8(bytes).map_err(|e| {
			dropped(StencilError::Render(format!(
				"{} is not valid UTF-8: {e}",
				file.path.display()
			)))
		})?;
		let rendered = self
			.engine
			.render(&file.path.to_string_lossy(), source, &view)
			.map_err(dropped)?;

		file.contents = Contents::Buffer(rendered.into_bytes());
		file.replace_extension(&self.extension);
		tracing::debug!(path = %file.path.display(), "rendered file");

		Ok(file)
	}

	/// Lazily transform every file yielded by `files`.
	pub fn pipe<I>(&self, files: I) -> Pipe<'_, I::IntoIter>
	where
		I: IntoIterator<Item = File>,
	{
		Pipe {
			stage: self,
			files: files.into_iter(),
		}
	}
}

/// Shallow merge of per-file data over the stage view. Data that is not an
/// object replaces the view.
fn merge_data<'a>(
	view: &'a serde_json::Value,
	data: Option<&'a serde_json::Value>,
) -> Cow<'a, serde_json::Value> {
	match (view, data) {
		(_, None) => Cow::Borrowed(view),
		(serde_json::Value::Object(base), Some(serde_json::Value::Object(extra))) => {
			let mut merged = base.clone();
			merged.extend(extra.iter().map(|(key, value)| (key.clone(), value.clone())));
			Cow::Owned(serde_json::Value::Object(merged))
		}
		(_, Some(data)) => Cow::Borrowed(data),
	}
}

fn dropped(error: StencilError) -> StencilError {
	tracing::warn!(%error, "dropping file");
	error
}

/// Iterator returned by [`TransformStage::pipe`].
#[derive(Debug)]
pub struct Pipe<'a, I> {
	stage: &'a TransformStage,
	files: I,
}

impl<I> Iterator for Pipe<'_, I>
where
	I: Iterator<Item = File>,
{
	type Item = StencilResult<File>;

	fn next(&mut self) -> Option<Self::Item> {
		self.files.next().map(|file| self.stage.transform(file))
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		self.files.size_hint()
	}
}
