//! `stencil_core` renders files through [`minijinja`](https://docs.rs/minijinja)
//! templates as one stage of a file pipeline. Each [`File`] handed to a
//! [`TransformStage`] is rendered with a shared view, a map of partials and
//! configurable delimiters, then handed back with its contents replaced and
//! its extension changed.
//!
//! ## Processing Pipeline
//!
//! ```text
//! File (path, base, contents)
//!   → TransformStage (view resolved once: inline value or JSON file)
//!   → Engine (minijinja environment built from RenderOptions + Partials)
//!   → File (rendered contents, new extension) | StencilError
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `stencil.toml`: view, source patterns, output directory, options and partial files.
//! - [`pipeline`]: Collecting source files with glob patterns and writing rendered files to an output directory.
//!
//! ## Key Types
//!
//! - [`TransformStage`]: Renders one file at a time; [`TransformStage::pipe`] adapts any iterator of files.
//! - [`File`]: A file in flight: path, base directory, contents and optional per-file data.
//! - [`View`]: Inline JSON value or the path of a JSON file.
//! - [`RenderOptions`]: Output extension, delimiter [`Tags`] and engine settings.
//! - [`Engine`]: The minijinja environment a stage renders with, built once per stage.
//! - [`Partials`]: Named template fragments available to `{% include %}`.
//! - [`StencilError`]: View load, render, missing partial and configuration failures.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use stencil_core::File;
//! use stencil_core::Partials;
//! use stencil_core::RenderOptions;
//! use stencil_core::Tags;
//! use stencil_core::TransformStage;
//!
//! let options = RenderOptions::default()
//! 	.with_extension(".txt")
//! 	.with_tags(Tags::new("[[", "]]").unwrap());
//! let partials = Partials::new().with("footer", "-- [[ author ]]");
//! let stage = TransformStage::new(json!({ "author": "ifiok" }), options, partials).unwrap();
//!
//! // Custom tags extend to statements: `[[% ... %]]`.
//! let files = vec![File::new("notes.tpl", "Hello\n[[% include \"footer\" %]]")];
//! for result in stage.pipe(files) {
//! 	let file = result.unwrap();
//! 	assert_eq!(file.text(), Some("Hello\n-- ifiok"));
//! 	assert_eq!(file.extname(), ".txt");
//! }
//! ```

pub use engine::*;
pub use error::*;
pub use file::*;
pub use options::*;
pub use partials::*;
pub use stage::*;
pub use view::*;

pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
mod file;
mod options;
mod partials;
pub mod pipeline;
mod stage;
mod view;

#[cfg(test)]
mod __fixtures;
