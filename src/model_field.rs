//! Database column adapter for links

use crate::error::{LinkError, LinkResult};
use crate::link::{Link, LinkConfig};
use crate::link_field::LinkFormField;
use crate::registry::LinkTypeManager;
use std::sync::Arc;

/// Default capacity of the link column, in characters
pub const DEFAULT_MAX_LENGTH: usize = 2000;

/// Stores a [`Link`] as its JSON text in a bounded string column
///
/// # Examples
///
/// ```
/// use reinhardt_link::{Link, LinkModelField, LinkTypeManager};
/// use reinhardt_link::link_types::InputType;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let registry = Arc::new(LinkTypeManager::builder().register(InputType::new()).build().unwrap());
/// let field = LinkModelField::new(registry);
///
/// let link = Link::new("input", json!({"input": "https://example.com"}));
/// let stored = field.to_db(Some(&link)).unwrap().unwrap();
/// assert_eq!(field.from_db(Some(&stored)).unwrap(), Some(link));
/// assert_eq!(field.from_db(Some("")).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct LinkModelField {
	registry: Arc<LinkTypeManager>,
	max_length: usize,
	config: LinkConfig,
	required: bool,
}

impl LinkModelField {
	pub fn new(registry: Arc<LinkTypeManager>) -> Self {
		Self {
			registry,
			max_length: DEFAULT_MAX_LENGTH,
			config: LinkConfig::default(),
			required: true,
		}
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = max_length;
		self
	}

	pub fn with_config(mut self, config: LinkConfig) -> Self {
		self.config = config;
		self
	}

	/// Allow the column to hold an empty link
	pub fn blank(mut self, blank: bool) -> Self {
		self.required = !blank;
		self
	}

	pub fn max_length(&self) -> usize {
		self.max_length
	}

	pub fn config(&self) -> &LinkConfig {
		&self.config
	}

	/// Serialize a link for storage
	///
	/// Empty links are stored as `None`. Fails when the link names an
	/// unregistered type or its JSON does not fit the column.
	pub fn to_db(&self, link: Option<&Link>) -> LinkResult<Option<String>> {
		let Some(link) = link.filter(|link| link.link_type().is_some()) else {
			return Ok(None);
		};
		self.registry.check(link)?;

		let stored = link.to_json_string()?;
		let length = stored.chars().count();
		if length > self.max_length {
			return Err(LinkError::TooLong {
				length,
				max_length: self.max_length,
			});
		}
		Ok(Some(stored))
	}

	/// Rebuild a link from its stored text
	///
	/// `None` and blank strings read as no link. A stored type that is no
	/// longer registered is an error.
	pub fn from_db(&self, stored: Option<&str>) -> LinkResult<Option<Link>> {
		let Some(stored) = stored.map(str::trim).filter(|s| !s.is_empty()) else {
			return Ok(None);
		};
		let link = Link::from_json_str(stored).inspect_err(|err| {
			tracing::warn!(error = %err, "stored link is not valid JSON");
		})?;
		if let Err(err) = self.registry.check(&link) {
			tracing::warn!(error = %err, "stored link names an unregistered type");
			return Err(err);
		}
		Ok(Some(link))
	}

	/// Form field for editing this column
	pub fn formfield(&self, name: impl Into<String>) -> LinkFormField {
		LinkFormField::new(name, Arc::clone(&self.registry), self.config.clone())
			.required(self.required)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::link::Target;
	use crate::link_types::InputType;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn field() -> LinkModelField {
		let registry = Arc::new(
			LinkTypeManager::builder()
				.register(InputType::new())
				.build()
				.unwrap(),
		);
		LinkModelField::new(registry)
	}

	#[rstest]
	fn test_to_db_writes_all_keys(field: LinkModelField) {
		// Arrange
		let link = Link::new("input", json!({"input": "/x/"})).with_target(Target::Blank);

		// Act
		let stored = field.to_db(Some(&link)).unwrap().unwrap();

		// Assert
		let parsed: serde_json::Value = serde_json::from_str(&stored).unwrap();
		assert_eq!(
			parsed,
			json!({"type": "input", "value": {"input": "/x/"}, "label": null, "target": "_blank", "no_follow": false})
		);
	}

	#[rstest]
	fn test_to_db_empty_link(field: LinkModelField) {
		assert_eq!(field.to_db(None).unwrap(), None);
		assert_eq!(field.to_db(Some(&Link::default())).unwrap(), None);
	}

	#[rstest]
	fn test_to_db_unknown_type(field: LinkModelField) {
		// Act
		let result = field.to_db(Some(&Link::new("page", json!(1))));

		// Assert
		assert!(matches!(result, Err(LinkError::UnknownLinkType(id)) if id == "page"));
	}

	#[rstest]
	fn test_to_db_too_long(field: LinkModelField) {
		// Arrange
		let field = field.with_max_length(40);
		let link = Link::new("input", json!({"input": "https://example.com/a/long/path"}));

		// Act
		let result = field.to_db(Some(&link));

		// Assert
		assert!(matches!(result, Err(LinkError::TooLong { max_length: 40, .. })));
	}

	#[rstest]
	fn test_from_db_malformed(field: LinkModelField) {
		assert!(matches!(
			field.from_db(Some("{not json")),
			Err(LinkError::Serialization(_))
		));
	}

	#[rstest]
	fn test_from_db_unregistered_type(field: LinkModelField) {
		assert!(matches!(
			field.from_db(Some(r#"{"type": "page", "value": 3}"#)),
			Err(LinkError::UnknownLinkType(_))
		));
	}

	#[rstest]
	fn test_defaults(field: LinkModelField) {
		// Assert
		assert_eq!(field.max_length(), 2000);
		assert!(field.config().allow_label);
		assert!(!field.config().allow_target);
		assert!(!field.config().allow_no_follow);
	}

	#[rstest]
	fn test_formfield_inherits_blank(field: LinkModelField) {
		// Act
		let form_field = field.blank(true).formfield("cta");

		// Assert
		assert_eq!(form_field.name, "cta");
		assert!(!form_field.required);
	}
}
