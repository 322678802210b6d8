use std::sync::Arc;

use crate::CompileError;
use crate::CompileOptions;
use crate::CompileOutput;
use crate::MarkupCompiler;
use crate::Position;
use crate::RenderDiagnostic;
use crate::TemplateEngine;
use crate::TemplateRegistry;

/// Returns the substituted document unchanged, plus a fixed set of
/// diagnostics.
#[derive(Debug, Default)]
pub struct EchoCompiler {
	pub diagnostics: Vec<RenderDiagnostic>,
}

impl MarkupCompiler for EchoCompiler {
	fn compile(&self, source: &str, _options: &CompileOptions) -> Result<CompileOutput, CompileError> {
		Ok(CompileOutput {
			html: source.to_string(),
			diagnostics: self.diagnostics.clone(),
		})
	}
}

/// Always fails to compile.
#[derive(Debug, Default)]
pub struct FailingCompiler;

impl MarkupCompiler for FailingCompiler {
	fn compile(&self, _source: &str, _options: &CompileOptions) -> Result<CompileOutput, CompileError> {
		Err(CompileError("unexpected end of document".to_string()))
	}
}

pub fn unexpected_attribute_diagnostic() -> RenderDiagnostic {
	RenderDiagnostic {
		position: Position::new(1, 7, 6, 1, 16, 15),
		kind: "unexpected-attribute".to_string(),
		message: "unexpected attribute in root template at position 6:15".to_string(),
	}
}

/// An engine whose registry holds exactly the given templates and whose
/// compiler echoes the substituted document.
pub fn echo_engine(templates: &[(&str, &str)]) -> TemplateEngine {
	echo_engine_with_diagnostics(templates, Vec::new())
}

pub fn echo_engine_with_diagnostics(
	templates: &[(&str, &str)],
	diagnostics: Vec<RenderDiagnostic>,
) -> TemplateEngine {
	let mut registry = TemplateRegistry::empty();
	for (name, source) in templates {
		registry.insert(*name, *source);
	}

	TemplateEngine::builder()
		.registry(registry)
		.compiler(Arc::new(EchoCompiler { diagnostics }))
		.build()
}

pub const GREETING_TEMPLATE: &str = "<h1>[[ContentTitle]]</h1>\n<div>[[ContentBody]]</div>\n<a \
                                     href=\"[[EmailUnsubscribeLink]]\">Unsubscribe</a>";
