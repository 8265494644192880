use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use stencil_cli::Commands;
use stencil_cli::RenderArgs;
use stencil_cli::StencilCli;
use stencil_core::AnyError;
use stencil_core::AnyResult;
use stencil_core::File;
use stencil_core::StencilError;
use stencil_core::StencilResult;
use stencil_core::Tags;
use stencil_core::TransformStage;
use stencil_core::View;
use stencil_core::config::StencilConfig;
use stencil_core::pipeline::collect_sources;
use stencil_core::pipeline::write_file;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = "# stencil configuration\n\n# Glob patterns, relative to this \
                             file, selecting the templates to render.\nsrc = \
                             [\"pages/**/*.jinja\"]\n\n# Output paths are relative to \
                             this directory.\nbase = \"pages\"\n\n# Output \
                             directory.\ndest = \"dist\"\n\n# View data shared by every \
                             template. Either the path of a JSON file:\n# view = \
                             \"data/site.json\"\n# or an inline table:\n[view]\ntitle = \
                             \"Hello from stencil\"\n\n[options]\nextension = \".html\"\n# \
                             tags = [\"[[\", \"]]\"]\n# resolve_partials = true\n\n# \
                             [partials]\n# header = \"partials/header.jinja\"\n";

fn main() {
	let args = StencilCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args).map(|()| true),
		Some(Commands::Render(render)) => run_render(&args, render),
		None => {
			eprintln!("No subcommand specified. Run `stencil --help` for usage.");
			process::exit(2);
		}
	};

	match result {
		Ok(true) => {}
		Ok(false) => process::exit(1),
		Err(e) => {
			// Try to render through miette for rich diagnostics with help text
			// and error codes.
			match e.downcast::<StencilError>() {
				Ok(stencil_err) => report(*stencil_err),
				Err(e) => {
					eprintln!("{} {e}", colored!("error:", red));
				}
			}
			process::exit(2);
		}
	}
}

/// Log to stderr. `STENCIL_LOG` selects the filter, `--verbose` forces
/// `debug`.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_env("STENCIL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init()
		.ok();
}

fn report(error: StencilError) {
	let report: miette::Report = error.into();
	eprintln!("{report:?}");
}

fn resolve_root(args: &StencilCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_init(args: &StencilCli) -> Result<(), AnyError> {
	let root = resolve_root(args);

	if let Some(existing) = StencilConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join("stencil.toml");
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created config file: {}", config_path.display());

	println!();
	println!("Next steps:");
	println!("  1. Add templates under {}", root.join("pages").display());
	println!("  2. Reference view values with {{{{ title }}}}");
	println!("  3. Run `stencil render` to write them to dist");

	Ok(())
}

/// Render every selected file. Returns `false` when at least one file failed.
fn run_render(args: &StencilCli, render: &RenderArgs) -> AnyResult<bool> {
	let root = resolve_root(args);
	let mut config = StencilConfig::load(&root)?.unwrap_or_default();

	if let Some(extension) = &render.extension {
		config.options.extension.clone_from(extension);
	}
	if let Some(tags) = &render.tags {
		config.options.tags = Tags::try_from(tags.clone())?;
	}
	if render.resolve_partials {
		config.options.resolve_partials = true;
	}
	for (name, path) in &render.partials {
		config.partials.insert(name.clone(), path.clone());
	}

	let view = if let Some(data) = &render.data {
		View::Inline(serde_json::from_str(data)?)
	} else if let Some(path) = &render.view {
		View::Path(root.join(path))
	} else {
		config.load_view(&root)?.unwrap_or_default()
	};

	let stage = TransformStage::new(view, config.options.clone(), config.load_partials(&root)?)?;
	let base = config.base(&root);
	let dest = match &render.out {
		Some(out) => root.join(out),
		None => config.dest(&root),
	};
	let files = select_files(&root, &base, &config, render)?;
	tracing::debug!(count = files.len(), dest = %dest.display(), "rendering files");

	let mut failures = 0usize;
	for result in stage.pipe(files) {
		let file = match result {
			Ok(file) => file,
			Err(e) => {
				failures += 1;
				report(e);
				if render.fail_fast {
					break;
				}
				continue;
			}
		};

		if file.is_null() {
			continue;
		}

		if render.dry_run {
			println!(
				"{} {}",
				colored!("would write", yellow),
				dest.join(file.relative()).display()
			);
		} else if let Some(path) = write_file(&file, &dest)? {
			println!("{} {}", colored!("wrote", green), path.display());
		}
	}

	if failures > 0 {
		eprintln!(
			"{} {failures} file(s) failed to render",
			colored!("error:", red)
		);
	}

	Ok(failures == 0)
}

/// Files named on the command line win over the configured `src` patterns.
fn select_files(
	root: &Path,
	base: &Path,
	config: &StencilConfig,
	render: &RenderArgs,
) -> AnyResult<Vec<File>> {
	if !render.files.is_empty() {
		let files = render
			.files
			.iter()
			.map(|path| Ok(File::read(root.join(path), base)?.with_cwd(root)))
			.collect::<StencilResult<Vec<_>>>()?;
		return Ok(files);
	}

	if config.src.is_empty() {
		return Err("no files to render: pass FILES or set `src` in stencil.toml".into());
	}

	Ok(collect_sources(root, &config.src, &config.exclude, base)?)
}
