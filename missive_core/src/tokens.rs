use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use derive_more::Deref;
use derive_more::DerefMut;
use thiserror::Error;

/// The closed vocabulary of substitution points shared by every template.
///
/// A skeleton refers to a token with a `[[Name]]` marker. Names are matched
/// case-insensitively, so `[[contentbody]]` and `[[ContentBody]]` both
/// resolve to [`Token::ContentBody`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
	/// Link to a hosted copy of the message ("Read in Browser").
	BrowserLink,
	/// Link to the site home page, used around the logo.
	HomeLink,
	/// Image source of the header logo.
	ContentLogo,
	/// Headline of the message.
	ContentTitle,
	/// Main body, already rendered to HTML.
	ContentBody,
	/// Link that removes the recipient from the mailing list.
	EmailUnsubscribeLink,
}

/// How a token's value is treated when it is inserted into a skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenContent {
	/// Plain text or a URL. Escaped when the engine escapes text values.
	Text,
	/// Markup that was sanitised before it reached the engine. Never escaped.
	Html,
}

impl Token {
	/// Every member of the vocabulary, in declaration order.
	pub const ALL: [Token; 6] = [
		Token::BrowserLink,
		Token::HomeLink,
		Token::ContentLogo,
		Token::ContentTitle,
		Token::ContentBody,
		Token::EmailUnsubscribeLink,
	];

	/// The canonical name used inside a `[[...]]` marker.
	pub const fn name(self) -> &'static str {
		match self {
			Token::BrowserLink => "BrowserLink",
			Token::HomeLink => "HomeLink",
			Token::ContentLogo => "ContentLogo",
			Token::ContentTitle => "ContentTitle",
			Token::ContentBody => "ContentBody",
			Token::EmailUnsubscribeLink => "EmailUnsubscribeLink",
		}
	}

	pub const fn content(self) -> TokenContent {
		match self {
			Token::ContentBody => TokenContent::Html,
			Token::BrowserLink
			| Token::HomeLink
			| Token::ContentLogo
			| Token::ContentTitle
			| Token::EmailUnsubscribeLink => TokenContent::Text,
		}
	}

	/// The marker text for this token, e.g. `[[HomeLink]]`.
	pub fn marker(self) -> String {
		format!("[[{}]]", self.name())
	}
}

impl Display for Token {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

/// A marker or command-line argument named something outside the token
/// vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown token `{0}`")]
pub struct UnknownTokenError(pub String);

impl FromStr for Token {
	type Err = UnknownTokenError;

	/// Case-insensitive lookup. Surrounding whitespace is part of the name, so
	/// `" HomeLink"` does not match.
	fn from_str(name: &str) -> Result<Self, Self::Err> {
		Token::ALL
			.into_iter()
			.find(|token| token.name().eq_ignore_ascii_case(name))
			.ok_or_else(|| UnknownTokenError(name.to_string()))
	}
}

/// The values supplied for a single render call.
///
/// An entry may be present with no value (`None`), which renders the same as
/// a missing entry: the marker becomes an empty string.
///
/// ```rust
/// use missive_core::Token;
/// use missive_core::TokenValues;
///
/// let values = TokenValues::new()
/// 	.with(Token::ContentTitle, "Welcome")
/// 	.with_optional(Token::BrowserLink, None::<String>);
///
/// assert_eq!(values.value(Token::ContentTitle), Some("Welcome"));
/// assert_eq!(values.value(Token::BrowserLink), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, DerefMut)]
pub struct TokenValues(BTreeMap<Token, Option<String>>);

impl TokenValues {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with(mut self, token: Token, value: impl Into<String>) -> Self {
		self.0.insert(token, Some(value.into()));
		self
	}

	#[must_use]
	pub fn with_optional(mut self, token: Token, value: Option<impl Into<String>>) -> Self {
		self.0.insert(token, value.map(Into::into));
		self
	}

	/// Set or clear the value for `token`, returning the previous entry.
	pub fn set(&mut self, token: Token, value: Option<String>) -> Option<Option<String>> {
		self.0.insert(token, value)
	}

	/// The value to substitute for `token`, if one was supplied.
	pub fn value(&self, token: Token) -> Option<&str> {
		self.0.get(&token).and_then(Option::as_deref)
	}
}

impl<V> FromIterator<(Token, V)> for TokenValues
where
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (Token, V)>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|(token, value)| (token, Some(value.into())))
				.collect(),
		)
	}
}
