//! String validators for the free-text link types
//!
//! These plug into [`CharField`](crate::fields::CharField) through the
//! [`Validator`] trait so the input, e-mail and phone link types can share a
//! single text field implementation.

use crate::field::{FieldError, FieldResult};
use regex::Regex;
use std::fmt::Debug;
use std::sync::LazyLock;

// HTTP/HTTPS URL pattern.
//
// Validates URLs with:
// - http or https scheme only
// - Valid domain labels (no leading/trailing hyphens)
// - Optional port number (1-5 digits)
// - Optional path, query string, and fragment
static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"^https?://[a-zA-Z0-9]([a-zA-Z0-9\-]{0,61}[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9\-]*[a-zA-Z0-9])?)*(:[0-9]{1,5})?(/[^\s?#]*)?(\?[^\s#]*)?(#[^\s]*)?$",
	)
	.expect("URL_REGEX: invalid regex pattern")
});

// Site-relative path, query or fragment: "/about", "?page=2", "#top".
static RELATIVE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(/[^\s]*|\?[^\s#]*(#[^\s]*)?|#[^\s]*)$")
		.expect("RELATIVE_URL_REGEX: invalid regex pattern")
});

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)+$")
		.expect("EMAIL_REGEX: invalid regex pattern")
});

// Optional leading '+', then digits with common separators.
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\+?[0-9][0-9 ().\-]{2,30}[0-9]$").expect("PHONE_REGEX: invalid regex pattern")
});

/// A check applied to an already-stripped, non-empty string value
pub trait Validator: Debug + Send + Sync {
	fn validate(&self, value: &str) -> FieldResult<()>;
}

/// Validates that a string value is a well-formed HTTP or HTTPS URL.
///
/// With [`allow_relative`](UrlValidator::allow_relative), site-relative
/// paths, bare query strings and fragments are accepted as well.
///
/// # Examples
///
/// ```
/// use reinhardt_link::validators::{UrlValidator, Validator};
///
/// let validator = UrlValidator::new();
/// assert!(validator.validate("https://example.com").is_ok());
/// assert!(validator.validate("/about/").is_err());
///
/// let relative = UrlValidator::new().allow_relative();
/// assert!(relative.validate("/about/").is_ok());
/// assert!(relative.validate("#contact").is_ok());
/// assert!(relative.validate("ftp://example.com").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct UrlValidator {
	message: Option<String>,
	allow_relative: bool,
}

impl UrlValidator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	pub fn allow_relative(mut self) -> Self {
		self.allow_relative = true;
		self
	}
}

impl Validator for UrlValidator {
	fn validate(&self, value: &str) -> FieldResult<()> {
		if URL_REGEX.is_match(value) || (self.allow_relative && RELATIVE_URL_REGEX.is_match(value))
		{
			Ok(())
		} else {
			let msg = self.message.as_deref().unwrap_or("Enter a valid URL.");
			Err(FieldError::Validation(msg.to_string()))
		}
	}
}

/// Validates an e-mail address
///
/// # Examples
///
/// ```
/// use reinhardt_link::validators::{EmailValidator, Validator};
///
/// let validator = EmailValidator::new();
/// assert!(validator.validate("editor@example.com").is_ok());
/// assert!(validator.validate("editor@").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailValidator;

impl EmailValidator {
	pub fn new() -> Self {
		Self
	}
}

impl Validator for EmailValidator {
	fn validate(&self, value: &str) -> FieldResult<()> {
		if EMAIL_REGEX.is_match(value) {
			Ok(())
		} else {
			Err(FieldError::Validation(
				"Enter a valid email address.".to_string(),
			))
		}
	}
}

/// Validates a phone number in a loose international format
///
/// # Examples
///
/// ```
/// use reinhardt_link::validators::{PhoneValidator, Validator};
///
/// let validator = PhoneValidator::new();
/// assert!(validator.validate("+49 (30) 123-4567").is_ok());
/// assert!(validator.validate("call me").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneValidator;

impl PhoneValidator {
	pub fn new() -> Self {
		Self
	}
}

impl Validator for PhoneValidator {
	fn validate(&self, value: &str) -> FieldResult<()> {
		if PHONE_REGEX.is_match(value) {
			Ok(())
		} else {
			Err(FieldError::Validation(
				"Enter a valid phone number.".to_string(),
			))
		}
	}
}

/// Strip everything but digits and a leading '+', for `tel:` hrefs
pub(crate) fn normalize_phone(value: &str) -> String {
	let trimmed = value.trim();
	let mut out = String::with_capacity(trimmed.len());
	if trimmed.starts_with('+') {
		out.push('+');
	}
	out.extend(trimmed.chars().filter(char::is_ascii_digit));
	out
}
