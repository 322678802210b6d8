mod common;

use missive_core::AnyEmptyResult;
use serde_json::Value;
use similar_asserts::assert_eq;

#[test]
fn list_shows_builtin_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let output = common::missive_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	assert_eq!(
		String::from_utf8(output.stdout)?,
		"Templates:\n  default built-in [BrowserLink, HomeLink, ContentLogo, ContentTitle, \
		 ContentBody, EmailUnsubscribeLink]\n\n1 template(s)\n"
	);

	Ok(())
}

#[test]
fn list_json_includes_project_templates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), &[("welcome", common::WELCOME_TEMPLATE)])?;

	let output = common::missive_cmd()
		.arg("list")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let json: Value = serde_json::from_slice(&output.stdout)?;
	let entries = json.as_array().ok_or("expected an array")?;
	assert_eq!(entries.len(), 2);
	assert_eq!(entries[0]["name"], "default");
	assert_eq!(entries[0]["file"], Value::Null);
	assert_eq!(entries[1]["name"], "welcome");
	assert_eq!(entries[1]["file"], "templates/welcome.mjml");
	assert_eq!(
		entries[1]["tokens"],
		serde_json::json!(["ContentTitle", "ContentBody"])
	);

	Ok(())
}
