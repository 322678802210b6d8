//! `missive_core` is the rendering core of [missive](https://github.com/missive-rs/missive). It turns a named MJML template plus a small set of named values into a finished HTML email, for transactional account messages and newsletter digests alike.
//!
//! ## Processing Pipeline
//!
//! ```text
//! template name + TokenValues
//!   → Registry (name → immutable skeleton)
//!   → Scanner (finds every `[[Token]]` marker, compiled once per process)
//!   → Substitution (marker → value, empty when missing, unknown name fails)
//!   → Markup compiler (MJML → HTML, structural problems become diagnostics)
//!   → Diagnostics logged through `tracing`, HTML returned
//! ```
//!
//! ## Modules
//!
//! - [`config`]: loading `missive.toml`, including template paths and render options.
//! - [`registry`]: the template registry, the built-in `default` skeleton and on-disk template loading.
//! - [`scanner`]: discovery of `[[Token]]` markers.
//!
//! ## Key Types
//!
//! - [`Token`]: the closed vocabulary of substitution points shared by every template.
//! - [`TokenValues`]: the per-call mapping from token to value.
//! - [`TemplateEngine`]: the entry point, with [`TemplateEngine::process`] and [`TemplateEngine::render_default`].
//! - [`RenderResult`]: HTML plus the compiler's [`RenderDiagnostic`]s.
//! - [`MarkupCompiler`]: the seam to the markup compiler, implemented by [`MjmlCompiler`].
//!
//! ## Quick Start
//!
//! ```rust
//! use missive_core::TemplateEngine;
//! use missive_core::Token;
//! use missive_core::TokenValues;
//!
//! let engine = TemplateEngine::new();
//! let values = TokenValues::new()
//! 	.with(Token::ContentTitle, "Weekly digest")
//! 	.with(Token::ContentBody, "<p>Three new articles this week.</p>")
//! 	.with(Token::EmailUnsubscribeLink, "https://example.com/unsubscribe");
//!
//! let html = engine.process("default", &values).unwrap();
//! assert!(html.contains("Weekly digest"));
//! ```

pub use compiler::*;
pub use config::MissiveConfig;
pub use engine::*;
pub use error::*;
pub use position::*;
pub use registry::DEFAULT_TEMPLATE;
pub use registry::Skeleton;
pub use registry::TemplateRegistry;
pub use substitute::*;
pub use tokens::*;

mod compiler;
pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
mod position;
pub mod registry;
pub mod scanner;
mod substitute;
mod tokens;

#[cfg(test)]
mod __fixtures;
