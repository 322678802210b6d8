use std::sync::LazyLock;

use regex::Regex;

use crate::Position;
use crate::position::LineTable;

/// Opening delimiter of a token marker.
pub const MARKER_OPEN: &str = "[[";
/// Closing delimiter of a token marker.
pub const MARKER_CLOSE: &str = "]]";

/// Matches `[[...]]` across lines, stopping at the first `]]`.
static TOKEN_MATCHER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?is)\[\[.*?\]\]").expect("token matcher pattern must be valid"));

/// A `[[Name]]` occurrence found in a skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMarker<'a> {
	/// The full marker including its delimiters.
	pub text: &'a str,
	/// Location of the marker in the scanned document.
	pub position: Position,
}

impl<'a> TokenMarker<'a> {
	/// The text between the delimiters, untrimmed.
	pub fn name(&self) -> &'a str {
		&self.text[MARKER_OPEN.len()..self.text.len() - MARKER_CLOSE.len()]
	}
}

/// Lazily find every token marker in `source`, in document order. Repeated
/// markers are reported once per occurrence.
pub fn scan(source: &str) -> impl Iterator<Item = TokenMarker<'_>> {
	let line_table = LineTable::new(source);

	TOKEN_MATCHER.find_iter(source).map(move |found| {
		TokenMarker {
			text: found.as_str(),
			position: line_table.span(found.range()),
		}
	})
}

/// Check whether `content` still contains marker delimiters.
pub fn has_marker_syntax(content: &str) -> bool {
	content.contains(MARKER_OPEN) || content.contains(MARKER_CLOSE)
}
