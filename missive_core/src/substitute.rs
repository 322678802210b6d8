use std::str::FromStr;

use serde::Deserialize;

use crate::MissiveError;
use crate::MissiveResult;
use crate::Skeleton;
use crate::Token;
use crate::TokenContent;
use crate::TokenValues;
use crate::scanner::TokenMarker;
use crate::scanner::scan;

/// Controls whether supplied values are HTML-escaped on substitution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapePolicy {
	/// Escape values of [`TokenContent::Text`] tokens. Values of
	/// [`TokenContent::Html`] tokens are inserted as-is.
	#[default]
	Text,
	/// Insert every value as-is. Callers must supply HTML-safe content.
	None,
}

/// Replace every marker in `skeleton` with the matching value from `values`.
///
/// Markers whose token has no value become empty strings. A marker naming
/// anything outside the [`Token`] vocabulary fails the whole call with
/// [`MissiveError::MalformedTemplate`].
///
/// The output is assembled from the text between markers, so a value that
/// itself contains `[[...]]` is never expanded.
pub fn substitute(
	skeleton: &Skeleton,
	values: &TokenValues,
	escape: EscapePolicy,
) -> MissiveResult<String> {
	let source = skeleton.source();
	let mut result = String::with_capacity(source.len());
	let mut last = 0;

	for marker in scan(source) {
		let token = resolve_marker(skeleton, &marker)?;
		let range = marker.position.range();

		result.push_str(&source[last..range.start]);
		if let Some(value) = values.value(token) {
			match (escape, token.content()) {
				(EscapePolicy::Text, TokenContent::Text) => escape_html_into(value, &mut result),
				_ => result.push_str(value),
			}
		}
		last = range.end;
	}

	result.push_str(&source[last..]);

	Ok(result)
}

/// All markers in `skeleton` that do not name a [`Token`].
pub fn find_unknown_markers(skeleton: &Skeleton) -> Vec<TokenMarker<'_>> {
	scan(skeleton.source())
		.filter(|marker| Token::from_str(marker.name()).is_err())
		.collect()
}

/// The distinct tokens referenced by `skeleton`, in vocabulary order. Unknown
/// markers are ignored.
pub fn referenced_tokens(skeleton: &Skeleton) -> Vec<Token> {
	let found: Vec<Token> = scan(skeleton.source())
		.filter_map(|marker| Token::from_str(marker.name()).ok())
		.collect();

	Token::ALL
		.into_iter()
		.filter(|token| found.contains(token))
		.collect()
}

fn resolve_marker(skeleton: &Skeleton, marker: &TokenMarker<'_>) -> MissiveResult<Token> {
	Token::from_str(marker.name()).map_err(|_| {
		MissiveError::MalformedTemplate {
			template: skeleton.name().to_string(),
			marker: marker.text.to_string(),
			line: marker.position.start.line,
			column: marker.position.start.column,
		}
	})
}

/// Append `value` to `out` with the HTML special characters escaped.
fn escape_html_into(value: &str, out: &mut String) {
	for ch in value.chars() {
		match ch {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(ch),
		}
	}
}

/// Escape the HTML special characters in `value`.
pub fn escape_html(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	escape_html_into(value, &mut out);
	out
}
