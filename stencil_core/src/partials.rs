use std::collections::BTreeMap;
use std::path::Path;

use derive_more::Deref;
use derive_more::DerefMut;

use crate::StencilError;
use crate::StencilResult;

/// Named template fragments available to `include` statements.
///
/// ```rust
/// use stencil_core::Partials;
///
/// let partials = Partials::from_iter([("header", "<h1>{{ title }}</h1>")]);
/// assert_eq!(partials.get("header").map(String::as_str), Some("<h1>{{ title }}</h1>"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct Partials(BTreeMap<String, String>);

impl Partials {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a partial, replacing any existing partial with the same name.
	#[must_use]
	pub fn with(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
		self.0.insert(name.into(), source.into());
		self
	}

	/// Read each `(name, path)` pair from disk into a partial map.
	pub fn load_files<I, N, P>(files: I) -> StencilResult<Self>
	where
		I: IntoIterator<Item = (N, P)>,
		N: Into<String>,
		P: AsRef<Path>,
	{
		let mut partials = Self::new();

		for (name, path) in files {
			let name = name.into();
			let path = path.as_ref();
			let source = std::fs::read_to_string(path).map_err(|e| {
				StencilError::PartialLoad {
					name: name.clone(),
					path: path.display().to_string(),
					reason: e.to_string(),
				}
			})?;
			partials.0.insert(name, source);
		}

		Ok(partials)
	}
}

impl<N, S> FromIterator<(N, S)> for Partials
where
	N: Into<String>,
	S: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = (N, S)>>(iter: T) -> Self {
		Self(
			iter.into_iter()
				.map(|(name, source)| (name.into(), source.into()))
				.collect(),
		)
	}
}

impl From<BTreeMap<String, String>> for Partials {
	fn from(map: BTreeMap<String, String>) -> Self {
		Self(map)
	}
}
