//! Field trait and shared field types used by the per-type link sub-forms

use serde::Serialize;
use serde_json::Value;

/// Error raised while cleaning a single field value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
	#[error("This field is required.")]
	Required(String),
	#[error("{0}")]
	Validation(String),
	#[error("{0}")]
	Invalid(String),
}

impl FieldError {
	/// Build a `Validation` error, prefixing the field name when present
	pub fn validation(name: Option<&str>, message: &str) -> Self {
		match name {
			Some(name) if !name.is_empty() => Self::Validation(format!("{}: {}", name, message)),
			_ => Self::Validation(message.to_string()),
		}
	}

	pub fn is_required(&self) -> bool {
		matches!(self, Self::Required(_))
	}
}

pub type FieldResult<T> = Result<T, FieldError>;

/// Input widget used to render a field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
	TextInput,
	UrlInput,
	EmailInput,
	TelInput,
	CheckboxInput,
	HiddenInput,
	Select { choices: Vec<(String, String)> },
}

impl Widget {
	/// HTML input type, or `None` for non-input widgets
	pub fn input_type(&self) -> Option<&'static str> {
		match self {
			Widget::TextInput => Some("text"),
			Widget::UrlInput => Some("url"),
			Widget::EmailInput => Some("email"),
			Widget::TelInput => Some("tel"),
			Widget::CheckboxInput => Some("checkbox"),
			Widget::HiddenInput => Some("hidden"),
			Widget::Select { .. } => None,
		}
	}
}

/// A single form field
pub trait FormField: Send + Sync {
	fn name(&self) -> &str;

	fn label(&self) -> Option<&str> {
		None
	}

	fn required(&self) -> bool;

	fn help_text(&self) -> Option<&str> {
		None
	}

	fn widget(&self) -> &Widget;

	fn initial(&self) -> Option<&Value> {
		None
	}

	/// Validate and normalize a raw submitted value
	fn clean(&self, value: Option<&Value>) -> FieldResult<Value>;
}

/// Returns true for values the form layer treats as "nothing submitted"
///
/// A map counts as empty when every entry in it is empty.
pub(crate) fn is_empty_value(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => true,
		Some(Value::String(s)) => s.trim().is_empty(),
		Some(Value::Array(a)) => a.is_empty(),
		Some(Value::Object(o)) => o.values().all(|v| is_empty_value(Some(v))),
		_ => false,
	}
}
