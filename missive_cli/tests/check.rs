mod common;

use missive_core::AnyEmptyResult;
use serde_json::Value;

#[test]
fn check_passes_for_builtin_templates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::missive_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"));

	Ok(())
}

#[test]
fn check_fails_for_unknown_markers() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(
		tmp.path(),
		&[
			("broken", common::BROKEN_TEMPLATE),
			("welcome", common::WELCOME_TEMPLATE),
		],
	)?;

	common::missive_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("NotAToken"))
		.stderr(predicates::str::contains("Check failed"));

	Ok(())
}

#[test]
fn check_json_lists_issues() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), &[("broken", common::BROKEN_TEMPLATE)])?;

	let output = common::missive_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(false));
	assert_eq!(json["templates"], 2);
	assert_eq!(json["issues"][0]["template"], "broken");
	assert_eq!(json["issues"][0]["marker"], "[[NotAToken]]");
	assert_eq!(json["issues"][0]["line"], 1);

	Ok(())
}

#[test]
fn check_fails_for_duplicate_template_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path(), &[("welcome", common::WELCOME_TEMPLATE)])?;
	let nested = tmp.path().join("templates").join("nested");
	std::fs::create_dir_all(&nested)?;
	std::fs::write(nested.join("welcome.mjml"), common::WELCOME_TEMPLATE)?;

	common::missive_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("duplicate template"));

	Ok(())
}
