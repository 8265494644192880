use std::path::Path;
use std::path::PathBuf;

use serde_json::json;

use crate::File;

pub fn fixtures_dir() -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn expected_dir() -> PathBuf {
	Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/expected")
}

/// Load a fixture as a buffered file based in the fixtures directory.
pub fn fixture_file(name: &str) -> File {
	let base = fixtures_dir();
	File::read(base.join(name), &base).unwrap_or_else(|e| panic!("fixture `{name}`: {e}"))
}

pub fn fixture_text(name: &str) -> String {
	std::fs::read_to_string(fixtures_dir().join(name))
		.unwrap_or_else(|e| panic!("fixture `{name}`: {e}"))
}

pub fn expected_text(name: &str) -> String {
	std::fs::read_to_string(expected_dir().join(name))
		.unwrap_or_else(|e| panic!("expected `{name}`: {e}"))
}

pub fn title_view() -> serde_json::Value {
	json!({ "title": "stencil" })
}

pub fn nested_view() -> serde_json::Value {
	json!({ "title": "stencil", "nested": "I am nested" })
}
