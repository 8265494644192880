use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render template files with view data and partials.",
	long_about = "stencil renders template files through minijinja with a shared view, named \
	              partials and configurable delimiters, writing each rendered file to an output \
	              directory with a new extension.\n\nQuick start:\n  stencil init    Create a \
	              sample stencil.toml\n  stencil render  Render every configured source file"
)]
pub struct StencilCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `stencil.toml` in the project root.
	///
	/// If a config file already exists this command is a no-op and exits
	/// successfully.
	Init,
	/// Render template files into the output directory.
	///
	/// Files are taken from the command line or, when none are given, from
	/// the `src` patterns of `stencil.toml`. Every value passed on the command
	/// line overrides the config file.
	///
	/// A file that fails to render is reported and skipped; the remaining
	/// files are still rendered. The command exits with status 1 when any
	/// file failed and 2 when the run could not start.
	Render(RenderArgs),
}

#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct RenderArgs {
	/// Template files to render, relative to the project root.
	pub files: Vec<PathBuf>,

	/// JSON file used as the view.
	#[arg(long, value_name = "PATH")]
	pub view: Option<PathBuf>,

	/// Inline JSON used as the view.
	#[arg(long, value_name = "JSON", conflicts_with = "view")]
	pub data: Option<String>,

	/// Output directory. Defaults to `dist`.
	#[arg(long, short, value_name = "DIR")]
	pub out: Option<PathBuf>,

	/// Extension given to rendered files, such as `.html` or `.txt`.
	#[arg(long, short)]
	pub extension: Option<String>,

	/// Variable delimiters, for example `--tags '[[' ']]'`.
	#[arg(long, num_args = 2, value_names = ["OPEN", "CLOSE"], allow_hyphen_values = true)]
	pub tags: Option<Vec<String>>,

	/// Register a partial read from a file. Can be repeated.
	#[arg(long = "partial", value_name = "NAME=PATH", value_parser = parse_partial)]
	pub partials: Vec<(String, PathBuf)>,

	/// Read partials missing from the partial map from disk, relative to the
	/// file being rendered.
	#[arg(long, default_value_t = false)]
	pub resolve_partials: bool,

	/// Stop at the first file that fails to render.
	#[arg(long, default_value_t = false)]
	pub fail_fast: bool,

	/// Render without writing any files.
	#[arg(long, default_value_t = false)]
	pub dry_run: bool,
}

fn parse_partial(value: &str) -> Result<(String, PathBuf), String> {
	let Some((name, path)) = value.split_once('=') else {
		return Err(format!("expected NAME=PATH, got `{value}`"));
	};

	if name.is_empty() || path.is_empty() {
		return Err(format!("expected NAME=PATH, got `{value}`"));
	}

	Ok((name.to_string(), PathBuf::from(path)))
}
