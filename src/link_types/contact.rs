//! `mailto:` and `tel:` link types

use super::{EntityKind, LinkEntity, LinkType, payload_as_str};
use crate::field::Widget;
use crate::fields::CharField;
use crate::form::Form;
use crate::validators::{EmailValidator, PhoneValidator, normalize_phone};
use serde_json::Value;

/// A link to an e-mail address
///
/// # Examples
///
/// ```
/// use reinhardt_link::link_types::{EmailType, LinkType};
/// use serde_json::json;
///
/// let mail = EmailType::new();
/// assert_eq!(mail.href(&json!("editor@example.com")), Some("mailto:editor@example.com".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmailType;

impl EmailType {
	pub fn new() -> Self {
		Self
	}
}

impl LinkType for EmailType {
	fn identifier(&self) -> &str {
		"mail"
	}

	fn verbose_name(&self) -> &str {
		"Email address"
	}

	fn resolve(&self, payload: &Value) -> Option<LinkEntity> {
		let address = payload_as_str(payload)?;
		Some(LinkEntity {
			kind: EntityKind::Email,
			pk: None,
			href: Some(format!("mailto:{}", address)),
			label: address,
			mime_type: None,
		})
	}

	fn form(&self, prefix: &str, required: bool) -> Form {
		let field = CharField::new(self.identifier().to_string())
			.with_required(required)
			.with_max_length(254)
			.with_widget(Widget::EmailInput)
			.with_validator(EmailValidator::new());
		Form::with_prefix(prefix.to_string()).field(field)
	}
}

/// A link to a phone number
///
/// The label keeps the number as entered, the href is normalized.
///
/// # Examples
///
/// ```
/// use reinhardt_link::link_types::{LinkType, PhoneType};
/// use serde_json::json;
///
/// let phone = PhoneType::new();
/// assert_eq!(phone.href(&json!("+49 (30) 123-456")), Some("tel:+4930123456".to_string()));
/// assert_eq!(phone.label(&json!("+49 (30) 123-456")), Some("+49 (30) 123-456".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PhoneType;

impl PhoneType {
	pub fn new() -> Self {
		Self
	}
}

impl LinkType for PhoneType {
	fn identifier(&self) -> &str {
		"phone"
	}

	fn verbose_name(&self) -> &str {
		"Phone"
	}

	fn resolve(&self, payload: &Value) -> Option<LinkEntity> {
		let number = payload_as_str(payload)?;
		Some(LinkEntity {
			kind: EntityKind::Phone,
			pk: None,
			href: Some(format!("tel:{}", normalize_phone(&number))),
			label: number,
			mime_type: None,
		})
	}

	fn form(&self, prefix: &str, required: bool) -> Form {
		let field = CharField::new(self.identifier().to_string())
			.with_required(required)
			.with_max_length(32)
			.with_widget(Widget::TelInput)
			.with_validator(PhoneValidator::new());
		Form::with_prefix(prefix.to_string()).field(field)
	}
}
