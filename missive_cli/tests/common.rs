#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const BROKEN_TEMPLATE: &str =
	"<mjml><mj-body><mj-section><mj-column><mj-text>[[NotAToken]]</mj-text></mj-column></mj-section></mj-body></mjml>\n";

pub const WELCOME_TEMPLATE: &str = "<mjml><mj-body><mj-section><mj-column><mj-text><h1>[[ContentTitle]]</h1>[[ContentBody]]</mj-text></mj-column></mj-section></mj-body></mjml>\n";

pub fn missive_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("missive"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// Write a `missive.toml` pointing at `templates/` and the given template
/// files into `root`.
pub fn write_project(root: &Path, templates: &[(&str, &str)]) -> std::io::Result<()> {
	std::fs::write(root.join("missive.toml"), "[templates]\npaths = [\"templates\"]\n")?;
	let dir = root.join("templates");
	std::fs::create_dir_all(&dir)?;
	for (name, content) in templates {
		std::fs::write(dir.join(format!("{name}.mjml")), content)?;
	}
	Ok(())
}
