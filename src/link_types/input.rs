//! Free-text URL link type

use super::{EntityKind, LinkEntity, LinkType, payload_as_str};
use crate::field::Widget;
use crate::fields::CharField;
use crate::form::Form;
use crate::link::Target;
use crate::validators::UrlValidator;
use serde_json::Value;

/// Longest URL accepted by the input sub-form
pub const DEFAULT_INPUT_MAX_LENGTH: usize = 2048;

const STRICT_URL_MESSAGE: &str = "Enter a full http(s) URL or a path starting with '/'.";

/// A link whose payload is the href itself
///
/// By default any text is accepted. In strict mode the text must be an
/// http(s) URL or a site-relative path, query or fragment. Free-text links
/// open in a new window unless the field lets editors pick a target.
///
/// # Examples
///
/// ```
/// use reinhardt_link::link_types::{InputType, LinkType};
/// use serde_json::json;
///
/// let input = InputType::new();
/// assert_eq!(input.href(&json!("https://example.com")), Some("https://example.com".to_string()));
/// assert_eq!(input.href(&json!("")), None);
/// ```
#[derive(Debug, Clone)]
pub struct InputType {
	strict: bool,
	max_length: usize,
}

impl InputType {
	pub fn new() -> Self {
		Self {
			strict: false,
			max_length: DEFAULT_INPUT_MAX_LENGTH,
		}
	}

	/// Require a well-formed URL
	pub fn strict(mut self, strict: bool) -> Self {
		self.strict = strict;
		self
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = max_length;
		self
	}
}

impl Default for InputType {
	fn default() -> Self {
		Self::new()
	}
}

impl LinkType for InputType {
	fn identifier(&self) -> &str {
		"input"
	}

	fn verbose_name(&self) -> &str {
		"URL"
	}

	fn resolve(&self, payload: &Value) -> Option<LinkEntity> {
		let url = payload_as_str(payload)?;
		Some(LinkEntity {
			kind: EntityKind::Text,
			pk: None,
			href: Some(url.clone()),
			label: url,
			mime_type: None,
		})
	}

	fn default_target(&self) -> Target {
		Target::Blank
	}

	fn form(&self, prefix: &str, required: bool) -> Form {
		let mut field = CharField::new(self.identifier().to_string())
			.with_required(required)
			.with_max_length(self.max_length)
			.with_label("Website")
			.with_widget(Widget::UrlInput);
		if self.strict {
			field = field
				.with_help_text("An http(s) URL or a path on this site")
				.with_validator(
					UrlValidator::new()
						.allow_relative()
						.with_message(STRICT_URL_MESSAGE),
				);
		} else {
			field = field.with_help_text("Prefix with https, mailto or tel");
		}
		Form::with_prefix(prefix.to_string()).field(field)
	}
}
