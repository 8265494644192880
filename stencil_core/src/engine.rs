use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use minijinja::Environment;
use minijinja::UndefinedBehavior;

use crate::AutoEscape;
use crate::Partials;
use crate::RenderOptions;
use crate::StencilError;
use crate::StencilResult;
use crate::Undefined;

/// Names the loader was asked for and could not resolve, in request order.
type Misses = Arc<Mutex<Vec<String>>>;

/// A minijinja environment configured from [`RenderOptions`] and
/// [`Partials`], shared by every file a stage renders.
///
/// Partials are looked up in the partial map first. When
/// [`RenderOptions::resolve_partials`] is set, other names are read from disk
/// relative to the directory of the including template, so a partial loaded
/// from disk resolves its own includes against its own directory. An
/// `include` that resolves to nothing fails with
/// [`StencilError::MissingPartial`]; every other engine failure is returned as
/// [`StencilError::Render`] carrying the engine message.
pub struct Engine {
	env: Environment<'static>,
	misses: Misses,
}

impl fmt::Debug for Engine {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Engine").finish_non_exhaustive()
	}
}

impl Engine {
	/// Build the environment. Fails with [`StencilError::InvalidTags`] when
	/// the configured delimiters clash.
	pub fn new(options: &RenderOptions, partials: Partials) -> StencilResult<Self> {
		let mut env = Environment::new();
		env.set_keep_trailing_newline(options.keep_trailing_newline);
		env.set_trim_blocks(options.trim_blocks);
		env.set_lstrip_blocks(options.lstrip_blocks);
		env.set_undefined_behavior(match options.undefined {
			Undefined::Lenient => UndefinedBehavior::Lenient,
			Undefined::Strict => UndefinedBehavior::Strict,
			Undefined::Chainable => UndefinedBehavior::Chainable,
		});

		let escape_html = options.auto_escape == AutoEscape::Html;
		env.set_auto_escape_callback(move |_| {
			if escape_html {
				minijinja::AutoEscape::Html
			} else {
				minijinja::AutoEscape::None
			}
		});

		if let Some(syntax) = options.syntax()? {
			env.set_syntax(syntax);
		}

		let resolve_partials = options.resolve_partials;
		if resolve_partials {
			let registered: BTreeSet<String> = partials.keys().cloned().collect();
			env.set_path_join_callback(move |name, parent| {
				if registered.contains(name) {
					return Cow::Borrowed(name);
				}

				match partial_path(parent, name) {
					Some(path) => Cow::Owned(path.to_string_lossy().into_owned()),
					None => Cow::Borrowed(name),
				}
			});
		}

		let misses: Misses = Arc::default();
		let loader_misses = Arc::clone(&misses);
		env.set_loader(move |name| {
			if let Some(source) = partials.get(name) {
				return Ok(Some(source.clone()));
			}

			let path = Path::new(name);
			if resolve_partials && path.is_absolute() {
				match std::fs::read_to_string(path) {
					Ok(source) => {
						tracing::debug!(partial = name, "loaded partial from disk");
						return Ok(Some(source));
					}
					Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
					Err(e) => {
						return Err(minijinja::Error::new(
							minijinja::ErrorKind::InvalidOperation,
							format!("could not read partial at {name}"),
						)
						.with_source(e));
					}
				}
			}

			if let Ok(mut misses) = loader_misses.lock() {
				misses.push(name.to_string());
			}

			Ok(None)
		});

		Ok(Self { env, misses })
	}

	/// Render `source` with `view` as the context.
	///
	/// `name` identifies the template in error messages. For partials read
	/// from disk it is also the path they are resolved against, and its
	/// extension is given to partial names without one.
	pub fn render(&self, name: &str, source: &str, view: &serde_json::Value) -> StencilResult<String> {
		let ctx = minijinja::Value::from_serialize(view);
		self.env
			.render_named_str(name, source, ctx)
			.map_err(|e| engine_error(&e, &self.misses))
	}
}

/// Absolute location of an existing partial file named `name`, included from
/// the template `parent`. Names that already carry an extension are used as
/// given, others borrow the extension of `parent`.
fn partial_path(parent: &str, name: &str) -> Option<PathBuf> {
	let parent = Path::new(parent);
	let dir = parent.parent().unwrap_or_else(|| Path::new(""));
	let path = if Path::new(name).extension().is_some() {
		dir.join(name)
	} else {
		let extension = parent
			.extension()
			.and_then(|ext| ext.to_str())
			.map(|ext| format!(".{ext}"))
			.unwrap_or_default();
		dir.join(format!("{name}{extension}"))
	};

	if !path.is_file() {
		return None;
	}

	std::path::absolute(&path).ok()
}

fn engine_error(err: &minijinja::Error, misses: &Mutex<Vec<String>>) -> StencilError {
	if let Some(not_found) = find_template_not_found(err) {
		let detail = not_found.detail().unwrap_or_default();
		let missing = misses.lock().ok().and_then(|names| {
			names
				.iter()
				.rev()
				.find(|name| detail.contains(name.as_str()))
				.or_else(|| names.last())
				.cloned()
		});
		if let Some(name) = missing {
			return StencilError::MissingPartial { name };
		}
	}

	StencilError::Render(err.to_string())
}

fn find_template_not_found(err: &minijinja::Error) -> Option<&minijinja::Error> {
	let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);

	while let Some(error) = current {
		if let Some(engine_error) = error.downcast_ref::<minijinja::Error>() {
			if engine_error.kind() == minijinja::ErrorKind::TemplateNotFound {
				return Some(engine_error);
			}
		}
		current = error.source();
	}

	None
}
