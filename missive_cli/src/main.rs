use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use missive_cli::Commands;
use missive_cli::MissiveCli;
use missive_cli::OutputFormat;
use missive_cli::TokenAssignment;
use missive_cli::assignments_to_values;
use missive_core::MissiveConfig;
use missive_core::MissiveError;
use missive_core::TemplateEngine;
use missive_core::Token;
use missive_core::referenced_tokens;
use owo_colors::OwoColorize;
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
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = "# missive configuration\n\n[templates]\n# Directories searched for \
                             template files, relative to this file.\npaths = [\"templates\"]\n# \
                             The template name is the file name without its extension.\npattern \
                             = \"*.mjml\"\n\n[render]\n# Pretty-print the compiled HTML.\nbeautify \
                             = false\n# \"text\" escapes every token except ContentBody, \"none\" \
                             inserts values as-is.\nescape = \"text\"\n";

const SAMPLE_TEMPLATE: &str = r#"<mjml>
  <mj-body>
    <mj-section>
      <mj-column>
        <mj-text font-size="20px" font-family="Ubuntu,Verdana">
          <h1>[[ContentTitle]]</h1>
        </mj-text>
        <mj-text font-size="13px" font-family="Ubuntu,Verdana">[[ContentBody]]</mj-text>
        <mj-button href="[[HomeLink]]">Visit the site</mj-button>
      </mj-column>
    </mj-section>
  </mj-body>
</mjml>
"#;

fn main() {
	let args = MissiveCli::parse();

	// Respect NO_COLOR env var, --no-color flag and terminal support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
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
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Render {
			template,
			values,
			body_file,
			output,
			beautify,
		}) => {
			run_render(
				&args,
				template,
				values,
				body_file.as_deref(),
				output.as_deref(),
				*beautify,
			)
		}
		Some(Commands::Default {
			home,
			logo,
			title,
			body,
			output,
		}) => run_default(&args, [home, logo, title, body], output.as_deref()),
		Some(Commands::List { format }) => run_list(&args, *format),
		Some(Commands::Check { format }) => run_check(&args, *format),
		None => {
			eprintln!("No subcommand specified. Run `missive --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<MissiveError>() {
			Ok(missive_err) => {
				let report: miette::Report = (*missive_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr so rendered HTML on stdout stays clean. `--verbose` shows
/// debug output, otherwise `RUST_LOG` decides and defaults to warnings.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = if verbose {
		EnvFilter::new("debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init()
		.ok();
}

fn resolve_root(args: &MissiveCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(root: &Path) -> Result<MissiveConfig, Box<dyn std::error::Error>> {
	Ok(MissiveConfig::load(root)?.unwrap_or_default())
}

fn load_engine(args: &MissiveCli) -> Result<TemplateEngine, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = load_config(&root)?;
	Ok(TemplateEngine::from_config(&root, &config)?)
}

fn run_init(args: &MissiveCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config_path = root.join("missive.toml");
	let template_path = root.join("templates").join("welcome.mjml");

	if config_path.exists() {
		println!("Config file already exists: {}", config_path.display());
	} else {
		std::fs::write(&config_path, SAMPLE_CONFIG)?;
		println!("Created missive.toml");
	}

	let template_exists = template_path.exists();
	if template_exists {
		println!("Template file already exists: {}", template_path.display());
	} else {
		if let Some(parent) = template_path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&template_path, SAMPLE_TEMPLATE)?;
		println!("Created template file: {}", template_path.display());
	}

	if !template_exists {
		println!();
		println!("Next steps:");
		println!(
			"  1. Edit {} to design your email",
			template_path.display()
		);
		println!("  2. Run `missive check` to validate the markers");
		println!("  3. Render it:");
		println!("     missive render welcome --set ContentTitle=Hello --set \"ContentBody=<p>Hi</p>\"");
	}

	Ok(())
}

fn run_render(
	args: &MissiveCli,
	template: &str,
	assignments: &[TokenAssignment],
	body_file: Option<&Path>,
	output: Option<&Path>,
	beautify: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let mut config = load_config(&root)?;
	config.render.beautify |= beautify;
	let engine = TemplateEngine::from_config(&root, &config)?;

	let mut values = assignments_to_values(assignments);
	if let Some(body_file) = body_file {
		let body = std::fs::read_to_string(body_file)?;
		values.set(Token::ContentBody, Some(body));
	}

	let result = engine.render(template, &values)?;
	if result.has_diagnostics() {
		eprintln!(
			"{} template `{template}` compiled with {} diagnostic(s)",
			colored!("warning:", yellow),
			result.diagnostics.len()
		);
	}

	write_html(&result.html, output)
}

fn run_default(
	args: &MissiveCli,
	[home, logo, title, body]: [&String; 4],
	output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
	let engine = load_engine(args)?;
	let html = engine.render_default(home, logo, title, body)?;

	write_html(&html, output)
}

fn write_html(html: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
	match output {
		Some(path) => {
			std::fs::write(path, html)?;
			eprintln!("Wrote {}", path.display());
		}
		None => println!("{html}"),
	}

	Ok(())
}

fn run_list(args: &MissiveCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let engine = load_engine(args)?;
	let registry = engine.registry();

	match format {
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = registry
				.iter()
				.map(|skeleton| {
					let tokens: Vec<String> = referenced_tokens(skeleton)
						.iter()
						.map(ToString::to_string)
						.collect();
					serde_json::json!({
						"name": skeleton.name(),
						"file": skeleton.file().map(|file| make_relative(file, &root)),
						"tokens": tokens,
					})
				})
				.collect();
			println!("{}", serde_json::to_string_pretty(&entries)?);
		}
		OutputFormat::Text => {
			println!("{}", colored!("Templates:", bold));
			for skeleton in registry.iter() {
				let source = skeleton
					.file()
					.map_or_else(|| "built-in".to_string(), |file| make_relative(file, &root));
				let tokens: Vec<String> = referenced_tokens(skeleton)
					.iter()
					.map(ToString::to_string)
					.collect();
				println!("  {} {source} [{}]", skeleton.name(), tokens.join(", "));
			}
			println!("\n{} template(s)", registry.len());
		}
	}

	Ok(())
}

fn run_check(args: &MissiveCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let engine = load_engine(args)?;
	let issues = engine.check();
	let template_count = engine.registry().len();

	match format {
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = issues
				.iter()
				.map(|issue| {
					serde_json::json!({
						"template": issue.template,
						"marker": issue.marker,
						"line": issue.position.start.line,
						"column": issue.position.start.column,
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": issues.is_empty(),
				"templates": template_count,
				"issues": entries,
			});
			println!("{}", serde_json::to_string_pretty(&output)?);
		}
		OutputFormat::Text => {
			if issues.is_empty() {
				println!(
					"{} all {template_count} template(s) are valid.",
					colored!("Check passed:", green)
				);
			} else {
				for issue in &issues {
					let report = miette::Report::new(MissiveError::from(issue.clone()));
					eprintln!("{report:?}");
				}
				eprintln!(
					"{} {} unknown marker(s) found.",
					colored!("Check failed:", red),
					issues.len()
				);
			}
		}
	}

	if !issues.is_empty() {
		process::exit(1);
	}

	Ok(())
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
