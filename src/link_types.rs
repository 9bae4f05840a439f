//! Link type dispatch
//!
//! Every kind of link (page, file, free-text URL, ...) implements
//! [`LinkType`]. A variant knows how to turn the payload stored for it into a
//! [`LinkEntity`] and how to build the sub-form that validates a submission.

use crate::field::{FieldError, FieldResult, is_empty_value};
use crate::form::{Form, FormError};
use crate::link::Target;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub mod contact;
pub mod input;
pub mod model;

pub use contact::{EmailType, PhoneType};
pub use input::InputType;
pub use model::{FileType, ModelLinkType, PageType};

/// What a resolved link points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
	Page,
	File,
	Text,
	Email,
	Phone,
	/// Any other model, by model name
	Model(String),
}

/// The target of a link after resolving its payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEntity {
	pub kind: EntityKind,
	/// Primary key for model-backed entities
	pub pk: Option<String>,
	pub href: Option<String>,
	pub label: String,
	/// Content type of a downloadable target
	pub mime_type: Option<String>,
}

/// One concrete kind of link
pub trait LinkType: Send + Sync {
	/// Registry key, also the key of the payload inside `Link::value`
	fn identifier(&self) -> &str;

	/// Human readable name shown in the type selector
	fn verbose_name(&self) -> &str;

	/// Resolve a payload to its entity; `None` when it no longer exists
	fn resolve(&self, payload: &Value) -> Option<LinkEntity>;

	fn href(&self, payload: &Value) -> Option<String> {
		self.resolve(payload).and_then(|entity| entity.href)
	}

	fn label(&self, payload: &Value) -> Option<String> {
		self.resolve(payload).map(|entity| entity.label)
	}

	/// Target used when the field does not let editors choose one
	fn default_target(&self) -> Target {
		Target::SelfFrame
	}

	/// The part of a stored `Link::value` that [`resolve`](LinkType::resolve) reads
	///
	/// Single-field types read the entry under their identifier, or a bare
	/// scalar. Types whose sub-form has several fields override this to
	/// receive the whole map.
	fn payload<'v>(&self, value: &'v Value) -> Option<&'v Value> {
		let payload = match value {
			Value::Object(map) => map.get(self.identifier())?,
			other => other,
		};
		(!is_empty_value(Some(payload))).then_some(payload)
	}

	/// Build the sub-form validating this type's payload
	///
	/// `required` is threaded in from the enclosing link field.
	fn form(&self, prefix: &str, required: bool) -> Form;

	/// Values shown by the sub-form controls for a stored value, by field name
	fn initial_data(&self, value: &Value) -> Map<String, Value> {
		let entries = match value {
			Value::Object(map) => map.clone(),
			scalar if !is_empty_value(Some(scalar)) => {
				Map::from_iter([(self.identifier().to_string(), scalar.clone())])
			}
			_ => Map::new(),
		};
		entries
			.into_iter()
			.map(|(name, value)| match value {
				Value::Number(n) => (name, Value::String(n.to_string())),
				other => (name, other),
			})
			.collect()
	}

	/// Validate submitted data through [`form`](LinkType::form)
	///
	/// `data` is keyed by sub-form field name. Returns the cleaned map of every
	/// field, or the first error of the sub-form.
	fn clean(
		&self,
		data: &HashMap<String, Value>,
		prefix: &str,
		required: bool,
	) -> FieldResult<Value> {
		let mut form = self.form(prefix, required);
		form.bind(data.clone());
		let cleaned = match form.full_clean() {
			Ok(cleaned) => cleaned.clone(),
			Err(FormError::Field { error, .. }) => return Err(error),
			Err(other) => return Err(FieldError::Invalid(other.to_string())),
		};
		Ok(Value::Object(cleaned.into_iter().collect()))
	}
}

/// Payload scalars as the string form used for lookups
pub(crate) fn payload_as_str(payload: &Value) -> Option<String> {
	match payload {
		Value::String(s) => {
			let s = s.trim();
			(!s.is_empty()).then(|| s.to_string())
		}
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}
