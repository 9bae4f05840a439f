//! ModelChoiceField for picking a link target out of a model source

use crate::Widget;
use crate::field::{FieldError, FieldResult, FormField};
use crate::sources::{LinkModel, ModelSource};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A field for selecting a single model instance from a [`ModelSource`]
///
/// This field displays model instances as choices in a select widget and
/// cleans a submitted primary key to the instance's stored key value.
pub struct ModelChoiceField<S: ModelSource> {
	pub name: String,
	pub required: bool,
	pub error_messages: HashMap<String, String>,
	pub widget: Widget,
	pub help_text: String,
	pub initial: Option<Value>,
	pub source: Arc<S>,
	pub empty_label: Option<String>,
}

impl<S: ModelSource> ModelChoiceField<S> {
	/// Create a new ModelChoiceField
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::fields::ModelChoiceField;
	/// use reinhardt_link::sources::{InMemorySource, Page};
	/// use reinhardt_link::FormField;
	/// use serde_json::json;
	/// use std::sync::Arc;
	///
	/// let pages = Arc::new(InMemorySource::with_items(
	///     "page",
	///     [Page::new(1, "Home", "/"), Page::new(2, "About", "/about/")],
	/// ));
	///
	/// let field = ModelChoiceField::new("page", pages);
	/// assert!(FormField::required(&field));
	/// assert_eq!(field.clean(Some(&json!("2"))).unwrap(), json!(2));
	/// assert!(field.clean(Some(&json!("3"))).is_err());
	/// ```
	pub fn new(name: impl Into<String>, source: Arc<S>) -> Self {
		let mut error_messages = HashMap::new();
		error_messages.insert(
			"required".to_string(),
			"This field is required.".to_string(),
		);
		error_messages.insert(
			"invalid_choice".to_string(),
			"Select a valid choice. That choice is not one of the available choices.".to_string(),
		);

		let mut field = Self {
			name: name.into(),
			required: true,
			error_messages,
			widget: Widget::Select {
				choices: Vec::new(),
			},
			help_text: String::new(),
			initial: None,
			source,
			empty_label: Some("--------".to_string()),
		};
		field.widget = Widget::Select {
			choices: field.get_choices(),
		};
		field
	}
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self.widget = Widget::Select {
			choices: self.get_choices(),
		};
		self
	}
	pub fn help_text(mut self, text: impl Into<String>) -> Self {
		self.help_text = text.into();
		self
	}
	pub fn initial(mut self, value: Value) -> Self {
		self.initial = Some(value);
		self
	}
	pub fn error_message(
		mut self,
		error_type: impl Into<String>,
		message: impl Into<String>,
	) -> Self {
		self.error_messages
			.insert(error_type.into(), message.into());
		self
	}

	/// Converts source instances to (value, label) pairs for the select widget
	pub fn get_choices(&self) -> Vec<(String, String)> {
		let mut choices = Vec::new();

		if !self.required
			&& let Some(empty_label) = &self.empty_label
		{
			choices.push((String::new(), empty_label.clone()));
		}

		for instance in self.source.all() {
			choices.push((instance.pk(), instance.label()));
		}

		choices
	}

	fn error(&self, key: &str, fallback: &str) -> FieldError {
		let msg = self
			.error_messages
			.get(key)
			.cloned()
			.unwrap_or_else(|| fallback.to_string());
		if key == "required" {
			FieldError::Required(self.name.clone())
		} else {
			FieldError::validation(None, &msg)
		}
	}
}

impl<S: ModelSource> FormField for ModelChoiceField<S> {
	fn name(&self) -> &str {
		&self.name
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn required(&self) -> bool {
		self.required
	}

	fn initial(&self) -> Option<&Value> {
		self.initial.as_ref()
	}

	fn help_text(&self) -> Option<&str> {
		if self.help_text.is_empty() {
			None
		} else {
			Some(&self.help_text)
		}
	}

	fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		let pk = match value {
			None | Some(Value::Null) => String::new(),
			Some(Value::String(s)) => s.trim().to_string(),
			Some(Value::Number(n)) => n.to_string(),
			Some(_) => return Err(self.error("invalid_choice", "Select a valid choice.")),
		};

		if pk.is_empty() {
			if self.required {
				return Err(self.error("required", "This field is required."));
			}
			return Ok(Value::Null);
		}

		match self.source.get(&pk) {
			Some(instance) => Ok(instance.pk_value()),
			None => {
				tracing::debug!(
					model = self.source.model_name(),
					pk = %pk,
					"rejected choice for missing instance"
				);
				Err(self.error("invalid_choice", "Select a valid choice."))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sources::{InMemorySource, Page};
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn pages() -> Arc<InMemorySource<Page>> {
		Arc::new(InMemorySource::with_items(
			"page",
			[Page::new(1, "Option 1", "/one/"), Page::new(2, "Option 2", "/two/")],
		))
	}

	#[rstest]
	fn test_model_choice_field_required(pages: Arc<InMemorySource<Page>>) {
		// Arrange
		let field = ModelChoiceField::new("choice", pages);

		// Act
		let result = field.clean(None);

		// Assert
		assert!(matches!(result, Err(FieldError::Required(_))));
	}

	#[rstest]
	fn test_model_choice_field_not_required(pages: Arc<InMemorySource<Page>>) {
		// Arrange
		let field = ModelChoiceField::new("choice", pages).required(false);

		// Act & Assert
		assert_eq!(field.clean(Some(&json!(""))).unwrap(), Value::Null);
	}

	#[rstest]
	fn test_model_choice_field_accepts_numeric_pk(pages: Arc<InMemorySource<Page>>) {
		// Arrange
		let field = ModelChoiceField::new("choice", pages);

		// Act & Assert
		assert_eq!(field.clean(Some(&json!(1))).unwrap(), json!(1));
	}

	#[rstest]
	fn test_model_choice_field_invalid_choice(pages: Arc<InMemorySource<Page>>) {
		// Arrange
		let field = ModelChoiceField::new("choice", pages);

		// Act
		let err = field.clean(Some(&json!("99"))).unwrap_err();

		// Assert
		assert!(err.to_string().starts_with("Select a valid choice."));
	}

	#[rstest]
	fn test_model_choice_field_choices(pages: Arc<InMemorySource<Page>>) {
		// Arrange
		let field = ModelChoiceField::new("choice", pages).required(false);

		// Act
		let choices = field.get_choices();

		// Assert
		assert_eq!(
			choices,
			vec![
				("".to_string(), "--------".to_string()),
				("1".to_string(), "Option 1".to_string()),
				("2".to_string(), "Option 2".to_string()),
			]
		);
	}
}
