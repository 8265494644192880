//! Reading files into a pipe and writing its results back to disk.

use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::Contents;
use crate::File;
use crate::StencilError;
use crate::StencilResult;

/// Build a `GlobSet` from a list of glob pattern strings.
fn build_glob_set(patterns: &[String]) -> StencilResult<GlobSet> {
	let mut builder = GlobSetBuilder::new();
	for pattern in patterns {
		let glob = Glob::new(pattern).map_err(|e| StencilError::InvalidSource {
			pattern: pattern.clone(),
			reason: e.to_string(),
		})?;
		builder.add(glob);
	}

	builder.build().map_err(|e| StencilError::InvalidSource {
		pattern: patterns.join(", "),
		reason: e.to_string(),
	})
}

/// Build a `Gitignore` matcher from the root `.gitignore` (if any) and the
/// configured exclude patterns, which follow `.gitignore` syntax.
fn build_exclude_matcher(root: &Path, exclude: &[String]) -> StencilResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.is_file() {
		if let Some(e) = builder.add(&gitignore_path) {
			tracing::warn!(path = %gitignore_path.display(), error = %e, "ignoring unreadable .gitignore");
		}
	}

	for pattern in exclude {
		builder
			.add_line(None, pattern)
			.map_err(|e| StencilError::InvalidSource {
				pattern: pattern.clone(),
				reason: e.to_string(),
			})?;
	}

	builder.build().map_err(|e| StencilError::InvalidSource {
		pattern: exclude.join(", "),
		reason: e.to_string(),
	})
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

/// Collect every file below `root` whose path relative to `root` matches one
/// of `patterns`.
///
/// Hidden entries, `node_modules`, `target`, anything listed in the root
/// `.gitignore` and anything matching `exclude` are skipped. Files are
/// returned sorted by path with `cwd = root` and the given `base`.
pub fn collect_sources(
	root: &Path,
	patterns: &[String],
	exclude: &[String],
	base: &Path,
) -> StencilResult<Vec<File>> {
	let include_set = build_glob_set(patterns)?;
	let exclude_matcher = build_exclude_matcher(root, exclude)?;
	let mut paths = Vec::new();

	walk_sources(root, root, &include_set, &exclude_matcher, &mut paths)?;
	// Sort for deterministic ordering.
	paths.sort();

	paths
		.into_iter()
		.map(|path| Ok(File::read(path, base)?.with_cwd(root)))
		.collect()
}

fn walk_sources(
	root: &Path,
	dir: &Path,
	include_set: &GlobSet,
	exclude_matcher: &Gitignore,
	paths: &mut Vec<PathBuf>,
) -> StencilResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();

		if path
			.file_name()
			.and_then(|name| name.to_str())
			.is_some_and(is_ignored_directory_name)
		{
			continue;
		}

		let is_dir = path.is_dir();
		if exclude_matcher.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			walk_sources(root, &path, include_set, exclude_matcher, paths)?;
			continue;
		}

		let Ok(rel_path) = path.strip_prefix(root) else {
			continue;
		};
		if include_set.is_match(rel_path) {
			paths.push(path);
		}
	}

	Ok(())
}

/// Write a file to `dest`, at its path relative to its base.
///
/// Returns the written path, or `None` for files without contents.
pub fn write_file(file: &File, dest: &Path) -> StencilResult<Option<PathBuf>> {
	let bytes = match &file.contents {
		Contents::Null => return Ok(None),
		Contents::Stream(_) => {
			return Err(StencilError::StreamingNotSupported {
				path: file.path.display().to_string(),
			});
		}
		Contents::Buffer(bytes) => bytes,
	};

	let out_path = dest.join(file.relative());
	if let Some(parent) = out_path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(&out_path, bytes)?;

	Ok(Some(out_path))
}
