use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::EscapePolicy;
use crate::MissiveError;
use crate::MissiveResult;
use crate::registry::DEFAULT_TEMPLATE_PATTERN;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["missive.toml", ".missive.toml", ".config/missive.toml"];

/// Configuration loaded from a `missive.toml` file.
///
/// ```toml
/// [templates]
/// paths = ["templates", "emails/newsletter"]
/// pattern = "*.mjml"
///
/// [render]
/// beautify = false
/// escape = "text"
/// ```
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MissiveConfig {
	/// Where template files are discovered.
	#[serde(default)]
	pub templates: TemplatesConfig,
	/// Options applied to every render.
	#[serde(default)]
	pub render: RenderConfig,
}

/// Configuration for template search paths.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TemplatesConfig {
	/// Directories searched recursively for template files, relative to the
	/// project root.
	#[serde(default)]
	pub paths: Vec<PathBuf>,
	/// Glob matched against file names. The template name is the file name
	/// without its extension.
	#[serde(default = "default_template_pattern")]
	pub pattern: String,
}

impl Default for TemplatesConfig {
	fn default() -> Self {
		Self {
			paths: Vec::new(),
			pattern: default_template_pattern(),
		}
	}
}

fn default_template_pattern() -> String {
	DEFAULT_TEMPLATE_PATTERN.to_string()
}

/// Rendering options.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
	/// Pretty-print the compiled HTML. Off by default to keep payloads small.
	#[serde(default)]
	pub beautify: bool,
	/// Whether text-valued tokens are HTML-escaped before substitution.
	#[serde(default)]
	pub escape: EscapePolicy,
}

impl MissiveConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> MissiveResult<Option<MissiveConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::from_toml(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	pub fn from_toml(content: &str) -> MissiveResult<MissiveConfig> {
		toml::from_str(content).map_err(|e| MissiveError::ConfigParse(e.to_string()))
	}
}
