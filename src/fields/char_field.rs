//! Character field for text input

use crate::field::{FieldError, FieldResult, FormField, Widget};
use crate::validators::Validator;
use std::sync::Arc;

/// Character field with length validation and pluggable string validators
#[derive(Debug, Clone)]
pub struct CharField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub widget: Widget,
	pub initial: Option<serde_json::Value>,
	pub max_length: Option<usize>,
	pub min_length: Option<usize>,
	pub strip: bool,
	pub validators: Vec<Arc<dyn Validator>>,
}

impl CharField {
	/// Create a new CharField with the given name
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::fields::CharField;
	///
	/// let field = CharField::new("input".to_string());
	/// assert_eq!(field.name, "input");
	/// assert!(!field.required);
	/// assert_eq!(field.max_length, None);
	/// ```
	pub fn new(name: String) -> Self {
		Self {
			name,
			label: None,
			required: false,
			help_text: None,
			widget: Widget::TextInput,
			initial: None,
			max_length: None,
			min_length: None,
			strip: true,
			validators: Vec::new(),
		}
	}
	/// Set the field as required
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::fields::CharField;
	///
	/// let field = CharField::new("input".to_string()).required();
	/// assert!(field.required);
	/// ```
	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}
	pub fn with_required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}
	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}
	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
		self
	}
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}
	pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
		self.help_text = Some(help_text.into());
		self
	}
	pub fn with_widget(mut self, widget: Widget) -> Self {
		self.widget = widget;
		self
	}
	/// Attach a validator that runs after length checks
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::fields::CharField;
	/// use reinhardt_link::validators::EmailValidator;
	/// use reinhardt_link::FormField;
	/// use serde_json::json;
	///
	/// let field = CharField::new("mail".to_string()).with_validator(EmailValidator::new());
	/// assert!(field.clean(Some(&json!("editor@example.com"))).is_ok());
	/// assert!(field.clean(Some(&json!("editor"))).is_err());
	/// ```
	pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
		self.validators.push(Arc::new(validator));
		self
	}
}

impl FormField for CharField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn required(&self) -> bool {
		self.required
	}

	fn help_text(&self) -> Option<&str> {
		self.help_text.as_deref()
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn initial(&self) -> Option<&serde_json::Value> {
		self.initial.as_ref()
	}

	fn clean(&self, value: Option<&serde_json::Value>) -> FieldResult<serde_json::Value> {
		let str_value = match value {
			Some(serde_json::Value::Null) | None => None,
			Some(serde_json::Value::String(s)) => Some(s.as_str()),
			// Numeric ids posted through generic JSON payloads
			Some(serde_json::Value::Number(n)) => {
				return self.clean(Some(&serde_json::Value::String(n.to_string())));
			}
			Some(_) => return Err(FieldError::Validation("Value must be a string".to_string())),
		};

		let processed = match str_value.map(|v| if self.strip { v.trim() } else { v }) {
			Some(v) if !v.is_empty() => v.to_string(),
			_ => {
				if self.required {
					return Err(FieldError::Required(self.name.clone()));
				}
				return Ok(serde_json::Value::String(String::new()));
			}
		};

		// Character count, not byte count
		let char_count = processed.chars().count();
		if let Some(max_length) = self.max_length
			&& char_count > max_length
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value has at most {} characters (it has {})",
				max_length, char_count
			)));
		}

		if let Some(min_length) = self.min_length
			&& char_count < min_length
		{
			return Err(FieldError::Validation(format!(
				"Ensure this value has at least {} characters (it has {})",
				min_length, char_count
			)));
		}

		for validator in &self.validators {
			validator.validate(&processed)?;
		}

		Ok(serde_json::Value::String(processed))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::validators::UrlValidator;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_char_field_required() {
		// Arrange
		let field = CharField::new("test".to_string()).required();

		// Act & Assert
		assert!(matches!(field.clean(None), Err(FieldError::Required(_))));
		assert!(field.clean(Some(&json!(""))).is_err());
		assert!(field.clean(Some(&json!("  "))).is_err());
	}

	#[rstest]
	fn test_char_field_optional_empty() {
		// Arrange
		let field = CharField::new("test".to_string());

		// Act & Assert
		assert_eq!(field.clean(None).unwrap(), json!(""));
	}

	#[rstest]
	fn test_char_field_strips_whitespace() {
		// Arrange
		let field = CharField::new("test".to_string());

		// Act
		let cleaned = field.clean(Some(&json!("  https://example.com \n"))).unwrap();

		// Assert
		assert_eq!(cleaned, json!("https://example.com"));
	}

	#[rstest]
	fn test_char_field_max_length_uses_char_count() {
		// Arrange
		let field = CharField::new("test".to_string()).with_max_length(3);

		// Act & Assert
		assert!(field.clean(Some(&json!("äöü"))).is_ok());
		assert!(field.clean(Some(&json!("äöüß"))).is_err());
	}

	#[rstest]
	fn test_char_field_runs_validators() {
		// Arrange
		let field = CharField::new("url".to_string()).with_validator(UrlValidator::new());

		// Act & Assert
		assert!(field.clean(Some(&json!("https://example.com"))).is_ok());
		assert_eq!(
			field.clean(Some(&json!("example"))).unwrap_err(),
			FieldError::Validation("Enter a valid URL.".to_string())
		);
	}

	#[rstest]
	fn test_char_field_accepts_numbers() {
		// Arrange
		let field = CharField::new("id".to_string());

		// Act & Assert
		assert_eq!(field.clean(Some(&json!(42))).unwrap(), json!("42"));
	}
}
