use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use missive_core::Token;
use missive_core::TokenValues;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render notification and newsletter emails from named MJML templates.",
	long_about = "missive renders transactional emails and newsletter digests from named MJML \
	              templates.\n\nTemplates contain `[[Token]]` markers that are replaced with the \
	              values you supply, then compiled to HTML.\n\nQuick start:\n  missive init     \
	              Create a config and a sample template\n  missive list     Show registered \
	              templates\n  missive check    Validate every template\n  missive render   \
	              Render a template to HTML"
)]
pub struct MissiveCli {
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
	/// Initialize missive in a project with a config file and a sample
	/// template.
	///
	/// Creates `missive.toml` and `templates/welcome.mjml`. Existing files are
	/// left untouched.
	Init,
	/// Render a registered template to HTML.
	///
	/// Each `--set` assigns a value to one token. Tokens without a value are
	/// rendered as empty content. Compiler diagnostics are printed as
	/// warnings and do not fail the command.
	Render {
		/// Name of the template to render.
		template: String,

		/// Assign a token value, e.g. `--set ContentTitle=Welcome`. Token
		/// names are case-insensitive.
		#[arg(long = "set", value_name = "TOKEN=VALUE", value_parser = parse_assignment)]
		values: Vec<TokenAssignment>,

		/// Read the `ContentBody` value from a file of pre-rendered HTML.
		#[arg(long, value_name = "PATH")]
		body_file: Option<PathBuf>,

		/// Write the HTML to a file instead of stdout.
		#[arg(long, short, value_name = "PATH")]
		output: Option<PathBuf>,

		/// Pretty-print the HTML, overriding the config.
		#[arg(long, default_value_t = false)]
		beautify: bool,
	},
	/// Render the built-in default template.
	///
	/// The browser link and unsubscribe link are left empty.
	Default {
		/// Link to the site home page, wrapped around the logo.
		#[arg(long)]
		home: String,

		/// Image source of the header logo.
		#[arg(long)]
		logo: String,

		/// Headline of the message.
		#[arg(long)]
		title: String,

		/// Body of the message as HTML.
		#[arg(long)]
		body: String,

		/// Write the HTML to a file instead of stdout.
		#[arg(long, short, value_name = "PATH")]
		output: Option<PathBuf>,
	},
	/// List every registered template and the tokens it uses.
	List {
		/// Output format for the listing.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Check that every marker in every template names a known token.
	///
	/// Exits with a non-zero status code when a template contains an unknown
	/// marker. Ideal for CI pipelines that ship hand-authored templates.
	Check {
		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

/// A single `--set TOKEN=VALUE` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAssignment {
	pub token: Token,
	pub value: String,
}

/// Parse `TOKEN=VALUE`. The value may itself contain `=`.
pub fn parse_assignment(input: &str) -> Result<TokenAssignment, String> {
	let Some((name, value)) = input.split_once('=') else {
		return Err(format!("expected TOKEN=VALUE, got `{input}`"));
	};

	let token = Token::from_str(name).map_err(|e| {
		let valid: Vec<String> = Token::ALL.iter().map(ToString::to_string).collect();
		format!("{e}; expected one of: {}", valid.join(", "))
	})?;

	Ok(TokenAssignment {
		token,
		value: value.to_string(),
	})
}

/// Collect assignments into token values. Later assignments win.
pub fn assignments_to_values(assignments: &[TokenAssignment]) -> TokenValues {
	assignments
		.iter()
		.map(|assignment| (assignment.token, assignment.value.clone()))
		.collect()
}
