use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn stencil_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("stencil"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("STENCIL_LOG");
	cmd
}
