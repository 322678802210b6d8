use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MissiveError {
	#[error(transparent)]
	#[diagnostic(code(missive::io_error))]
	Io(#[from] std::io::Error),

	#[error("no template registered under the name `{0}`")]
	#[diagnostic(
		code(missive::unknown_template),
		help("run `missive list` to see the registered templates")
	)]
	UnknownTemplate(String),

	#[error("template `{template}` contains an unknown token marker `{marker}` at {line}:{column}")]
	#[diagnostic(
		code(missive::malformed_template),
		help(
			"valid tokens: BrowserLink, HomeLink, ContentLogo, ContentTitle, ContentBody, \
			 EmailUnsubscribeLink (no whitespace inside the brackets)"
		)
	)]
	MalformedTemplate {
		template: String,
		marker: String,
		line: usize,
		column: usize,
	},

	#[error("failed to compile template `{template}`: {message}")]
	#[diagnostic(
		code(missive::markup_compile),
		help("check that the template is a well-formed MJML document with a root `<mjml>` element")
	)]
	MarkupCompile { template: String, message: String },

	#[error("duplicate template `{name}`: defined in `{first_file}` and `{second_file}`")]
	#[diagnostic(
		code(missive::duplicate_template),
		help("each template file name must be unique across the configured template paths")
	)]
	DuplicateTemplate {
		name: String,
		first_file: String,
		second_file: String,
	},

	#[error("failed to load template file `{path}`: {reason}")]
	#[diagnostic(code(missive::template_file))]
	TemplateFile { path: String, reason: String },

	#[error("invalid template file pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(missive::invalid_pattern),
		help("use a glob such as `*.mjml` in the `[templates]` section")
	)]
	InvalidPattern { pattern: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(missive::config_parse),
		help("check that missive.toml is valid TOML with [templates] and/or [render] sections")
	)]
	ConfigParse(String),
}

pub type MissiveResult<T> = Result<T, MissiveError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
