use crate::field::{FieldError, FormField};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum FormError {
	#[error("Field error in {field}: {error}")]
	Field { field: String, error: FieldError },
	#[error("Form is not bound to any data")]
	Unbound,
}

pub type FormResult<T> = Result<T, FormError>;

/// An ordered set of fields validated together
///
/// Link types build one of these per submission. Data is looked up by the
/// prefixed HTML name first (`"{prefix}-{field}"`), then by the bare field
/// name, so the same form validates both raw POST data and stored payloads.
pub struct Form {
	fields: Vec<Box<dyn FormField>>,
	data: HashMap<String, Value>,
	cleaned: HashMap<String, Value>,
	first_error: Option<(String, FieldError)>,
	is_bound: bool,
	prefix: String,
}

impl Form {
	/// Create a new empty form
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::Form;
	///
	/// let form = Form::new();
	/// assert!(!form.is_bound());
	/// assert!(form.fields().is_empty());
	/// ```
	pub fn new() -> Self {
		Self::with_prefix(String::new())
	}
	/// Create a new form with a field prefix
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::Form;
	///
	/// let form = Form::with_prefix("cta_link_page".to_string());
	/// assert_eq!(form.prefix(), "cta_link_page");
	/// assert_eq!(form.add_prefix_to_field_name("page"), "cta_link_page-page");
	/// ```
	pub fn with_prefix(prefix: String) -> Self {
		Self {
			fields: vec![],
			data: HashMap::new(),
			cleaned: HashMap::new(),
			first_error: None,
			is_bound: false,
			prefix,
		}
	}
	/// Append a field; fields are cleaned in the order they were added
	pub fn field(mut self, field: impl FormField + 'static) -> Self {
		self.fields.push(Box::new(field));
		self
	}
	/// Bind form data for validation
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::Form;
	/// use std::collections::HashMap;
	/// use serde_json::json;
	///
	/// let mut form = Form::new();
	/// let mut data = HashMap::new();
	/// data.insert("input".to_string(), json!("https://example.com"));
	///
	/// form.bind(data);
	/// assert!(form.is_bound());
	/// ```
	pub fn bind(&mut self, data: HashMap<String, Value>) {
		self.data = data;
		self.is_bound = true;
	}
	/// Validate the form and return true if all fields are valid
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::{CharField, Form};
	/// use std::collections::HashMap;
	/// use serde_json::json;
	///
	/// let mut form = Form::with_prefix("cta_link_input".to_string())
	///     .field(CharField::new("input".to_string()).required());
	///
	/// let mut data = HashMap::new();
	/// data.insert("cta_link_input-input".to_string(), json!("https://example.com"));
	/// form.bind(data);
	///
	/// assert!(form.is_valid());
	/// assert_eq!(form.full_clean().unwrap().get("input"), Some(&json!("https://example.com")));
	/// ```
	pub fn is_valid(&mut self) -> bool {
		if !self.is_bound {
			return false;
		}

		self.cleaned.clear();
		self.first_error = None;

		for field in &self.fields {
			let html_name = self.add_prefix_to_field_name(field.name());
			let value = self
				.data
				.get(&html_name)
				.or_else(|| self.data.get(field.name()));

			match field.clean(value) {
				Ok(cleaned) => {
					self.cleaned.insert(field.name().to_string(), cleaned);
				}
				Err(e) => {
					if self.first_error.is_none() {
						self.first_error = Some((field.name().to_string(), e));
					}
				}
			}
		}

		self.first_error.is_none()
	}
	/// Validate and hand back the cleaned data, or the first field error
	pub fn full_clean(&mut self) -> FormResult<&HashMap<String, Value>> {
		if !self.is_bound {
			return Err(FormError::Unbound);
		}
		self.is_valid();
		match self.first_error.clone() {
			Some((field, error)) => Err(FormError::Field { field, error }),
			None => Ok(&self.cleaned),
		}
	}
	pub fn is_bound(&self) -> bool {
		self.is_bound
	}
	pub fn fields(&self) -> &[Box<dyn FormField>] {
		&self.fields
	}
	pub fn prefix(&self) -> &str {
		&self.prefix
	}
	pub fn add_prefix_to_field_name(&self, field_name: &str) -> String {
		if self.prefix.is_empty() {
			field_name.to_string()
		} else {
			format!("{}-{}", self.prefix, field_name)
		}
	}
}

impl Default for Form {
	fn default() -> Self {
		Self::new()
	}
}
