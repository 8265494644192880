mod common;

use stencil_core::AnyEmptyResult;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let mut cmd = common::stencil_cmd();
	cmd.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created config file"));

	let config_path = tmp.path().join("stencil.toml");
	assert!(config_path.exists());

	let content = std::fs::read_to_string(&config_path)?;
	assert!(content.contains("src = [\"pages/**/*.jinja\"]"));
	assert!(content.contains("[options]"));

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	let config_path = tmp.path().join(".config/stencil.toml");
	std::fs::write(&config_path, "existing config")?;

	let mut cmd = common::stencil_cmd();
	cmd.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "existing config");
	assert!(!tmp.path().join("stencil.toml").exists());

	Ok(())
}

#[test]
fn init_config_renders_sample_pages() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::stencil_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	std::fs::create_dir_all(tmp.path().join("pages"))?;
	std::fs::write(tmp.path().join("pages/index.jinja"), "<h1>{{ title }}</h1>\n")?;

	common::stencil_cmd()
		.arg("render")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let rendered = std::fs::read_to_string(tmp.path().join("dist/index.html"))?;
	assert_eq!(rendered, "<h1>Hello from stencil</h1>\n");

	Ok(())
}
