use std::path::Path;
use std::sync::Arc;

use crate::CompileOptions;
use crate::CompileOutput;
use crate::EscapePolicy;
use crate::MarkupCompiler;
use crate::MissiveError;
use crate::MissiveResult;
use crate::MjmlCompiler;
use crate::Position;
use crate::RenderDiagnostic;
use crate::TemplateRegistry;
use crate::Token;
use crate::TokenValues;
use crate::config::MissiveConfig;
use crate::registry::DEFAULT_TEMPLATE;
use crate::substitute::find_unknown_markers;
use crate::substitute::substitute;

/// The HTML produced by a single render call and the diagnostics the markup
/// compiler raised while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
	pub html: String,
	/// Advisory only. Already logged by the engine.
	pub diagnostics: Vec<RenderDiagnostic>,
}

impl RenderResult {
	/// Returns true if the compiler reported any diagnostics.
	pub fn has_diagnostics(&self) -> bool {
		!self.diagnostics.is_empty()
	}
}

/// A marker in a registered skeleton that names no [`Token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateIssue {
	/// Name of the template containing the marker.
	pub template: String,
	/// The full marker, e.g. `[[NotAToken]]`.
	pub marker: String,
	/// Location of the marker in the skeleton.
	pub position: Position,
}

impl From<TemplateIssue> for MissiveError {
	fn from(issue: TemplateIssue) -> Self {
		MissiveError::MalformedTemplate {
			template: issue.template,
			marker: issue.marker,
			line: issue.position.start.line,
			column: issue.position.start.column,
		}
	}
}

/// Turns a template name and a set of token values into HTML.
///
/// The engine holds no mutable state: the registry is fixed when the engine
/// is built, so a single instance can be shared between threads and every
/// call is independent of the others.
///
/// ```rust
/// use missive_core::TemplateEngine;
///
/// let engine = TemplateEngine::new();
/// let html = engine
/// 	.render_default(
/// 		"https://example.com",
/// 		"https://example.com/logo.png",
/// 		"Welcome",
/// 		"<p>Hello World</p>",
/// 	)
/// 	.unwrap();
///
/// assert!(html.contains("Hello World"));
/// assert!(!html.contains("[["));
/// ```
#[derive(Clone)]
pub struct TemplateEngine {
	registry: TemplateRegistry,
	compiler: Arc<dyn MarkupCompiler>,
	options: CompileOptions,
	escape: EscapePolicy,
}

impl std::fmt::Debug for TemplateEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TemplateEngine")
			.field("templates", &self.registry.names())
			.field("options", &self.options)
			.field("escape", &self.escape)
			.finish_non_exhaustive()
	}
}

impl Default for TemplateEngine {
	fn default() -> Self {
		Self::new()
	}
}

impl TemplateEngine {
	/// An engine with the built-in templates, the MJML compiler and default
	/// options.
	pub fn new() -> Self {
		Self::builder().build()
	}

	pub fn builder() -> TemplateEngineBuilder {
		TemplateEngineBuilder::default()
	}

	/// Build an engine from a loaded `missive.toml`. Template paths are
	/// resolved relative to `root`.
	pub fn from_config(root: &Path, config: &MissiveConfig) -> MissiveResult<Self> {
		let registry = TemplateRegistry::from_config(root, config)?;

		Ok(Self::builder()
			.registry(registry)
			.beautify(config.render.beautify)
			.escape(config.render.escape)
			.build())
	}

	pub fn registry(&self) -> &TemplateRegistry {
		&self.registry
	}

	pub fn options(&self) -> CompileOptions {
		self.options
	}

	pub fn escape_policy(&self) -> EscapePolicy {
		self.escape
	}

	/// Render the template registered under `name` and return its HTML.
	pub fn process(&self, name: &str, values: &TokenValues) -> MissiveResult<String> {
		self.render(name, values).map(|result| result.html)
	}

	/// Render the built-in default template. The browser and unsubscribe links
	/// are left empty.
	pub fn render_default(
		&self,
		home_link: &str,
		logo_link: &str,
		title: &str,
		body_html: &str,
	) -> MissiveResult<String> {
		let values = TokenValues::new()
			.with(Token::HomeLink, home_link)
			.with(Token::ContentLogo, logo_link)
			.with(Token::ContentTitle, title)
			.with(Token::ContentBody, body_html);

		self.process(DEFAULT_TEMPLATE, &values)
	}

	/// Render the template registered under `name`, returning the HTML and
	/// the compiler diagnostics. Each diagnostic is also logged as a warning.
	pub fn render(&self, name: &str, values: &TokenValues) -> MissiveResult<RenderResult> {
		let skeleton = self.registry.resolve(name)?;
		let document = substitute(skeleton, values, self.escape)?;

		let CompileOutput { html, diagnostics } = self
			.compiler
			.compile(&document, &self.options)
			.map_err(|e| {
				MissiveError::MarkupCompile {
					template: name.to_string(),
					message: e.to_string(),
				}
			})?;

		for diagnostic in &diagnostics {
			tracing::warn!(
				template = name,
				position = %diagnostic.position,
				kind = %diagnostic.kind,
				message = %diagnostic.message,
				"validation error in template"
			);
		}

		Ok(RenderResult { html, diagnostics })
	}

	/// Find every marker in every registered template that names no
	/// [`Token`]. Templates are not rendered.
	pub fn check(&self) -> Vec<TemplateIssue> {
		self.registry
			.iter()
			.flat_map(|skeleton| {
				find_unknown_markers(skeleton)
					.into_iter()
					.map(|marker| {
						TemplateIssue {
							template: skeleton.name().to_string(),
							marker: marker.text.to_string(),
							position: marker.position,
						}
					})
					.collect::<Vec<_>>()
			})
			.collect()
	}
}

/// Builder for [`TemplateEngine`].
pub struct TemplateEngineBuilder {
	registry: TemplateRegistry,
	compiler: Arc<dyn MarkupCompiler>,
	options: CompileOptions,
	escape: EscapePolicy,
}

impl Default for TemplateEngineBuilder {
	fn default() -> Self {
		Self {
			registry: TemplateRegistry::new(),
			compiler: Arc::new(MjmlCompiler),
			options: CompileOptions::default(),
			escape: EscapePolicy::default(),
		}
	}
}

impl TemplateEngineBuilder {
	#[must_use]
	pub fn registry(mut self, registry: TemplateRegistry) -> Self {
		self.registry = registry;
		self
	}

	#[must_use]
	pub fn compiler(mut self, compiler: Arc<dyn MarkupCompiler>) -> Self {
		self.compiler = compiler;
		self
	}

	#[must_use]
	pub fn beautify(mut self, beautify: bool) -> Self {
		self.options.beautify = beautify;
		self
	}

	#[must_use]
	pub fn escape(mut self, escape: EscapePolicy) -> Self {
		self.escape = escape;
		self
	}

	pub fn build(self) -> TemplateEngine {
		TemplateEngine {
			registry: self.registry,
			compiler: self.compiler,
			options: self.options,
			escape: self.escape,
		}
	}
}
