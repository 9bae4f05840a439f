//! Fixed-choice and checkbox fields for the link's auxiliary controls

use crate::field::{FieldError, FieldResult, FormField, Widget};
use serde_json::Value;

/// A field restricted to a fixed list of `(value, label)` choices
#[derive(Debug, Clone)]
pub struct ChoiceField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub widget: Widget,
	pub initial: Option<Value>,
	pub choices: Vec<(String, String)>,
}

impl ChoiceField {
	/// Create a new ChoiceField
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::fields::ChoiceField;
	/// use reinhardt_link::FormField;
	/// use serde_json::json;
	///
	/// let field = ChoiceField::new(
	///     "target".to_string(),
	///     vec![("".to_string(), "Same window".to_string()), ("_blank".to_string(), "New window".to_string())],
	/// );
	/// assert_eq!(field.clean(Some(&json!("_blank"))).unwrap(), json!("_blank"));
	/// assert!(field.clean(Some(&json!("_elsewhere"))).is_err());
	/// ```
	pub fn new(name: String, choices: Vec<(String, String)>) -> Self {
		Self {
			name,
			label: None,
			required: false,
			widget: Widget::Select {
				choices: choices.clone(),
			},
			initial: None,
			choices,
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	pub fn valid_value(&self, value: &str) -> bool {
		self.choices.iter().any(|(v, _)| v == value)
	}
}

impl FormField for ChoiceField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn required(&self) -> bool {
		self.required
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn initial(&self) -> Option<&Value> {
		self.initial.as_ref()
	}

	fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		let s = match value {
			None | Some(Value::Null) => "",
			Some(Value::String(s)) => s.as_str(),
			Some(_) => {
				return Err(FieldError::Validation(
					"Select a valid choice.".to_string(),
				));
			}
		};

		if s.is_empty() && self.required {
			return Err(FieldError::Required(self.name.clone()));
		}

		if !self.valid_value(s) {
			if s.is_empty() {
				return Ok(Value::String(String::new()));
			}
			return Err(FieldError::Validation(format!(
				"Select a valid choice. {} is not one of the available choices.",
				s
			)));
		}

		Ok(Value::String(s.to_string()))
	}
}

/// A checkbox; any truthy submission cleans to `true`
#[derive(Debug, Clone)]
pub struct BooleanField {
	pub name: String,
	pub label: Option<String>,
	pub widget: Widget,
	pub initial: Option<Value>,
}

impl BooleanField {
	pub fn new(name: String) -> Self {
		Self {
			name,
			label: None,
			widget: Widget::CheckboxInput,
			initial: None,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = Some(label.into());
		self
	}

	/// Interpret a raw POST value the way HTML checkboxes submit it
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::fields::BooleanField;
	/// use serde_json::json;
	///
	/// assert!(BooleanField::to_bool(Some(&json!("on"))));
	/// assert!(BooleanField::to_bool(Some(&json!(true))));
	/// assert!(!BooleanField::to_bool(Some(&json!("false"))));
	/// assert!(!BooleanField::to_bool(None));
	/// ```
	pub fn to_bool(value: Option<&Value>) -> bool {
		match value {
			Some(Value::Bool(b)) => *b,
			Some(Value::String(s)) => !matches!(
				s.trim().to_ascii_lowercase().as_str(),
				"" | "0" | "false" | "off" | "no"
			),
			Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
			_ => false,
		}
	}
}

impl FormField for BooleanField {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> Option<&str> {
		self.label.as_deref()
	}

	fn required(&self) -> bool {
		false
	}

	fn widget(&self) -> &Widget {
		&self.widget
	}

	fn initial(&self) -> Option<&Value> {
		self.initial.as_ref()
	}

	fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		Ok(Value::Bool(Self::to_bool(value)))
	}
}
