use std::fmt::Display;

use mrml::prelude::render::RenderOptions;
use thiserror::Error;

use crate::Position;
use crate::position::LineTable;

/// Options passed to the markup compiler on every render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
	/// Pretty-print the output. Disabled for production payloads.
	pub beautify: bool,
}

/// A non-fatal structural problem reported while compiling a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDiagnostic {
	/// Where the problem is in the substituted document.
	pub position: Position,
	/// Category of the problem, e.g. `unexpected-attribute`.
	pub kind: String,
	/// Human readable description.
	pub message: String,
}

impl Display for RenderDiagnostic {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{}] [{}] {}", self.position, self.kind, self.message)
	}
}

/// The compiled HTML together with any diagnostics raised on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOutput {
	pub html: String,
	pub diagnostics: Vec<RenderDiagnostic>,
}

/// The compiler could not produce any HTML for the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CompileError(pub String);

/// Compiles a fully substituted markup document into HTML.
///
/// Structural problems that still allow output are returned as
/// [`RenderDiagnostic`]s rather than errors.
pub trait MarkupCompiler: Send + Sync {
	fn compile(&self, source: &str, options: &CompileOptions) -> Result<CompileOutput, CompileError>;
}

/// [`MarkupCompiler`] for MJML documents, backed by `mrml`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MjmlCompiler;

impl MarkupCompiler for MjmlCompiler {
	fn compile(&self, source: &str, options: &CompileOptions) -> Result<CompileOutput, CompileError> {
		let parsed = mrml::parse(source).map_err(|e| CompileError(e.to_string()))?;

		let line_table = LineTable::new(source);
		let diagnostics = parsed
			.warnings
			.iter()
			.map(|warning| {
				RenderDiagnostic {
					position: line_table.span(warning.span.start..warning.span.end),
					kind: warning.kind.as_str().to_string(),
					message: warning.to_string(),
				}
			})
			.collect();

		let html = parsed
			.element
			.render(&RenderOptions::default())
			.map_err(|e| CompileError(e.to_string()))?;

		let html = if options.beautify {
			beautify_html(&html)
		} else {
			html
		};

		Ok(CompileOutput { html, diagnostics })
	}
}

/// Elements whose text content is rendered with its whitespace intact.
const PRESERVE_WHITESPACE: [&str; 4] = ["pre", "script", "style", "textarea"];

/// Inline elements. A line break next to one of these renders as a space.
const INLINE_ELEMENTS: [&str; 16] = [
	"a", "abbr", "b", "br", "code", "em", "font", "i", "img", "label", "small", "span", "strong",
	"sub", "sup", "u",
];

/// Put adjacent block-level tags on separate lines.
///
/// Boundaries touching an inline element and anything inside `pre`,
/// `textarea`, `script` or `style` are left alone, so the rendered email is
/// unchanged.
pub(crate) fn beautify_html(html: &str) -> String {
	let mut result = String::with_capacity(html.len() + html.len() / 16);
	let mut preserved_depth = 0_usize;
	let mut rest = html;

	while let Some(open) = rest.find('<') {
		result.push_str(&rest[..open]);
		let from_tag = &rest[open..];
		let Some(close) = from_tag.find('>') else {
			result.push_str(from_tag);
			return result;
		};

		let tag = &from_tag[..=close];
		result.push_str(tag);
		rest = &from_tag[close + 1..];

		let (name, closing) = tag_name(tag);
		if PRESERVE_WHITESPACE.contains(&name.as_str()) && !tag.ends_with("/>") {
			if closing {
				preserved_depth = preserved_depth.saturating_sub(1);
			} else {
				preserved_depth += 1;
			}
		}

		if preserved_depth == 0
			&& rest.starts_with('<')
			&& !is_inline(&name)
			&& !is_inline(&tag_name(rest).0)
		{
			result.push('\n');
		}
	}

	result.push_str(rest);
	result
}

/// Lowercased element name of the tag at the start of `tag` and whether it
/// is a closing tag.
fn tag_name(tag: &str) -> (String, bool) {
	let inner = tag.strip_prefix('<').unwrap_or(tag);
	let (inner, closing) = match inner.strip_prefix('/') {
		Some(inner) => (inner, true),
		None => (inner, false),
	};
	let name = inner
		.chars()
		.take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '-')
		.collect::<String>()
		.to_ascii_lowercase();

	(name, closing)
}

fn is_inline(name: &str) -> bool {
	INLINE_ELEMENTS.contains(&name)
}
