use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use globset::Glob;
use globset::GlobMatcher;

use crate::MissiveError;
use crate::MissiveResult;
use crate::config::MissiveConfig;

/// Name of the built-in template used by
/// [`TemplateEngine::render_default`](crate::TemplateEngine::render_default).
pub const DEFAULT_TEMPLATE: &str = "default";

/// Default glob for template files inside the configured template paths.
pub const DEFAULT_TEMPLATE_PATTERN: &str = "*.mjml";

/// The built-in skeleton: an empty preview, a "read in browser" link, a
/// header with the logo and title, the body between two dividers and an
/// unsubscribe footer.
const DEFAULT_SKELETON: &str = r##"<mjml>
  <mj-head>
    <mj-preview/>
  </mj-head>
  <mj-body>
    <mj-section>
      <mj-column>
        <mj-text align="center" font-size="13px" font-family="Ubuntu,Verdana">
          <a href="[[BrowserLink]]">Read in Browser</a></mj-text>
      </mj-column>
    </mj-section>
    <mj-section direction="rtl" padding-bottom="15px" padding-left="0px" padding-right="0px" padding-top="15px" padding="15px 0px 15px 0px">
      <mj-column vertical-align="middle" width="33%">
        <mj-image align="center" alt="" border-radius="0" border="none" container-background-color="transparent" height="auto" padding-bottom="5px" padding-left="5px" padding-right="5px" padding-top="5px" padding="5px 5px 5px 5px" href="[[HomeLink]]" src="[[ContentLogo]]"></mj-image>
      </mj-column>
      <mj-column vertical-align="middle" width="67%">
        <mj-text font-size="13px" font-family="Ubuntu,Verdana">
          <h1>[[ContentTitle]]</h1>
        </mj-text>
      </mj-column>
    </mj-section>
    <mj-section>
      <mj-column>
        <mj-divider border-width="1px"></mj-divider>
      </mj-column>
    </mj-section>
    <mj-section>
      <mj-column>
        <mj-text color="#55575d" font-size="13px" font-family="Ubuntu,Verdana">[[ContentBody]]</mj-text>
      </mj-column>
    </mj-section>
    <mj-section>
      <mj-column>
        <mj-divider border-width="1px"></mj-divider>
      </mj-column>
    </mj-section>
    <mj-section>
      <mj-column>
        <mj-text align="center" font-size="13px" font-family="Ubuntu,Verdana">
          <a href="[[EmailUnsubscribeLink]]">Unsubscribe</a>
        </mj-text>
      </mj-column>
    </mj-section>
  </mj-body>
</mjml>
"##;

/// An immutable named document containing token markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
	name: String,
	source: Arc<str>,
	file: Option<PathBuf>,
}

impl Skeleton {
	pub fn new(name: impl Into<String>, source: impl Into<Arc<str>>) -> Self {
		Self {
			name: name.into(),
			source: source.into(),
			file: None,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	/// The file this skeleton was loaded from. `None` for built-in and
	/// programmatically registered skeletons.
	pub fn file(&self) -> Option<&Path> {
		self.file.as_deref()
	}
}

/// Maps template names to skeletons.
///
/// The registry is filled while the engine is being built and is read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRegistry {
	templates: BTreeMap<String, Skeleton>,
}

impl Default for TemplateRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl TemplateRegistry {
	/// A registry holding only the built-in [`DEFAULT_TEMPLATE`].
	pub fn new() -> Self {
		let mut registry = Self::empty();
		registry.insert(DEFAULT_TEMPLATE, DEFAULT_SKELETON);
		registry
	}

	/// A registry with no templates at all.
	pub fn empty() -> Self {
		Self {
			templates: BTreeMap::new(),
		}
	}

	/// The built-in skeletons plus every template found in the configured
	/// template paths (relative to `root`). A file named `default.mjml`
	/// replaces the built-in default template.
	pub fn from_config(root: &Path, config: &MissiveConfig) -> MissiveResult<Self> {
		let mut registry = Self::new();
		let matcher = template_matcher(&config.templates.pattern)?;

		for dir in &config.templates.paths {
			registry.load_dir_with(&root.join(dir), &matcher)?;
		}

		Ok(registry)
	}

	/// Register `source` under `name`, returning the skeleton it replaced.
	pub fn insert(&mut self, name: impl Into<String>, source: impl Into<Arc<str>>) -> Option<Skeleton> {
		let skeleton = Skeleton::new(name, source);
		self.templates.insert(skeleton.name.clone(), skeleton)
	}

	/// Look up the skeleton registered under `name`.
	pub fn resolve(&self, name: &str) -> MissiveResult<&Skeleton> {
		self.templates
			.get(name)
			.ok_or_else(|| MissiveError::UnknownTemplate(name.to_string()))
	}

	pub fn contains(&self, name: &str) -> bool {
		self.templates.contains_key(name)
	}

	/// Registered template names in sorted order.
	pub fn names(&self) -> Vec<&str> {
		self.templates.keys().map(String::as_str).collect()
	}

	/// Iterate over the skeletons in name order.
	pub fn iter(&self) -> impl Iterator<Item = &Skeleton> {
		self.templates.values()
	}

	pub fn len(&self) -> usize {
		self.templates.len()
	}

	pub fn is_empty(&self) -> bool {
		self.templates.is_empty()
	}

	/// Load every file below `dir` whose name matches the glob `pattern`.
	/// Returns the number of templates loaded.
	pub fn load_dir(&mut self, dir: &Path, pattern: &str) -> MissiveResult<usize> {
		let matcher = template_matcher(pattern)?;
		self.load_dir_with(dir, &matcher)
	}

	fn load_dir_with(&mut self, dir: &Path, matcher: &GlobMatcher) -> MissiveResult<usize> {
		if !dir.is_dir() {
			return Err(MissiveError::TemplateFile {
				path: dir.display().to_string(),
				reason: "template path is not a directory".to_string(),
			});
		}

		let mut files = Vec::new();
		collect_template_files(dir, matcher, &mut files)?;
		// Deterministic duplicate reporting regardless of directory order.
		files.sort();

		for file in &files {
			self.insert_file(file)?;
		}

		tracing::debug!(
			dir = %dir.display(),
			count = files.len(),
			"loaded template files"
		);

		Ok(files.len())
	}

	fn insert_file(&mut self, path: &Path) -> MissiveResult<()> {
		let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
			return Err(MissiveError::TemplateFile {
				path: path.display().to_string(),
				reason: "file name is not valid UTF-8".to_string(),
			});
		};

		if let Some(first_file) = self.templates.get(name).and_then(Skeleton::file) {
			return Err(MissiveError::DuplicateTemplate {
				name: name.to_string(),
				first_file: first_file.display().to_string(),
				second_file: path.display().to_string(),
			});
		}

		let content = std::fs::read_to_string(path).map_err(|e| {
			MissiveError::TemplateFile {
				path: path.display().to_string(),
				reason: e.to_string(),
			}
		})?;

		let skeleton = Skeleton {
			name: name.to_string(),
			source: normalize_line_endings(&content).into(),
			file: Some(path.to_path_buf()),
		};

		if self.templates.insert(name.to_string(), skeleton).is_some() {
			tracing::debug!(template = name, file = %path.display(), "template file overrides built-in");
		}

		Ok(())
	}
}

fn template_matcher(pattern: &str) -> MissiveResult<GlobMatcher> {
	Glob::new(pattern)
		.map(|glob| glob.compile_matcher())
		.map_err(|e| {
			MissiveError::InvalidPattern {
				pattern: pattern.to_string(),
				reason: e.to_string(),
			}
		})
}

/// Recursively collect files whose file name matches `matcher`. Hidden
/// entries are skipped.
fn collect_template_files(
	dir: &Path,
	matcher: &GlobMatcher,
	files: &mut Vec<PathBuf>,
) -> MissiveResult<()> {
	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();

		let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};

		if file_name.starts_with('.') {
			continue;
		}

		if path.is_dir() {
			collect_template_files(&path, matcher, files)?;
		} else if matcher.is_match(file_name) {
			files.push(path);
		}
	}

	Ok(())
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}
