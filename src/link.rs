//! The `Link` value object and its per-field configuration

use crate::field::is_empty_value;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Browsing context a link opens in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Target {
	#[default]
	SameWindow,
	Blank,
	SelfFrame,
	Parent,
	Top,
}

impl Target {
	pub const ALL: [Target; 5] = [
		Target::SameWindow,
		Target::Blank,
		Target::SelfFrame,
		Target::Parent,
		Target::Top,
	];

	/// Value of the HTML `target` attribute; empty for the same window
	pub fn as_str(&self) -> &'static str {
		match self {
			Target::SameWindow => "",
			Target::Blank => "_blank",
			Target::SelfFrame => "_self",
			Target::Parent => "_parent",
			Target::Top => "_top",
		}
	}

	pub fn verbose_name(&self) -> &'static str {
		match self {
			Target::SameWindow => "Same window",
			Target::Blank => "New window",
			Target::SelfFrame => "Same frame",
			Target::Parent => "Parent window",
			Target::Top => "Topmost frame",
		}
	}

	/// `(value, label)` pairs for a select widget
	pub fn choices() -> Vec<(String, String)> {
		Self::ALL
			.iter()
			.map(|t| (t.as_str().to_string(), t.verbose_name().to_string()))
			.collect()
	}
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown link target: {0}")]
pub struct UnknownTarget(pub String);

impl FromStr for Target {
	type Err = UnknownTarget;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|t| t.as_str() == s.trim())
			.ok_or_else(|| UnknownTarget(s.to_string()))
	}
}

impl Serialize for Target {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.as_str())
	}
}

impl<'de> Deserialize<'de> for Target {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
		Ok(raw.parse().unwrap_or_else(|err: UnknownTarget| {
			tracing::warn!(stored = %err.0, "ignoring unknown stored link target");
			Target::SameWindow
		}))
	}
}

fn deserialize_label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
	Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

/// A configured hyperlink: which kind of link it is plus that kind's payload
///
/// Only the JSON form of a `Link` is ever persisted. Validation writes the
/// cleaned sub-form as an object keyed by field name, e.g. `{"page": 12}`;
/// a bare scalar payload is accepted when reading.
///
/// # Examples
///
/// ```
/// use reinhardt_link::Link;
/// use serde_json::json;
///
/// let link = Link::new("input", json!({"input": "https://example.com"})).with_label("Example");
/// let stored = link.to_json_string().unwrap();
/// assert_eq!(Link::from_json_str(&stored).unwrap(), link);
/// assert!(!link.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
	#[serde(rename = "type", default)]
	pub link_type: Option<String>,
	#[serde(default)]
	pub value: Value,
	#[serde(default, deserialize_with = "deserialize_label")]
	pub label: Option<String>,
	#[serde(default)]
	pub target: Target,
	#[serde(default)]
	pub no_follow: bool,
}

impl Link {
	pub fn new(link_type: impl Into<String>, value: Value) -> Self {
		Self {
			link_type: Some(link_type.into()),
			value,
			..Self::default()
		}
	}

	/// Set the label override; an empty label clears it
	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		let label = label.into();
		self.label = (!label.is_empty()).then_some(label);
		self
	}

	pub fn with_target(mut self, target: Target) -> Self {
		self.target = target;
		self
	}

	pub fn with_no_follow(mut self, no_follow: bool) -> Self {
		self.no_follow = no_follow;
		self
	}

	pub fn link_type(&self) -> Option<&str> {
		self.link_type.as_deref().filter(|t| !t.is_empty())
	}

	/// True when there is no type or every stored value is empty
	pub fn is_empty(&self) -> bool {
		self.link_type().is_none() || is_empty_value(Some(&self.value))
	}

	/// Drop the payload while keeping the type and auxiliary settings
	pub fn clear_value(&mut self) {
		self.value = Value::Null;
	}

	/// `rel` attribute value for rendering
	pub fn rel(&self) -> Option<&'static str> {
		self.no_follow.then_some("nofollow")
	}

	pub fn to_json_value(&self) -> Value {
		// Every field is plain JSON data
		serde_json::to_value(self).unwrap_or(Value::Null)
	}

	pub fn to_json_string(&self) -> serde_json::Result<String> {
		serde_json::to_string(self)
	}

	pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
		serde_json::from_str(s)
	}

	pub fn from_json_value(value: Value) -> serde_json::Result<Self> {
		serde_json::from_value(value)
	}
}

/// Per-field configuration: allowed types and which auxiliary controls exist
///
/// By default every registered type is offered and only the label override
/// is editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
	/// Allowed type identifiers; empty allows every registered type
	pub types: Vec<String>,
	pub allow_target: bool,
	pub allow_label: bool,
	pub allow_no_follow: bool,
}

impl LinkConfig {
	pub const fn new() -> Self {
		Self {
			types: Vec::new(),
			allow_target: false,
			allow_label: true,
			allow_no_follow: false,
		}
	}

	/// Restrict the field to the given type identifiers
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::LinkConfig;
	///
	/// let config = LinkConfig::new().with_types(["page", "input"]);
	/// assert!(config.allows_type("page"));
	/// assert!(!config.allows_type("file"));
	/// assert!(LinkConfig::new().allows_type("file"));
	/// ```
	pub fn with_types<I, S>(mut self, types: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.types = types.into_iter().map(Into::into).collect();
		self
	}

	pub fn allow_target(mut self, allow: bool) -> Self {
		self.allow_target = allow;
		self
	}

	pub fn allow_label(mut self, allow: bool) -> Self {
		self.allow_label = allow;
		self
	}

	pub fn allow_no_follow(mut self, allow: bool) -> Self {
		self.allow_no_follow = allow;
		self
	}

	pub fn allows_type(&self, identifier: &str) -> bool {
		self.types.is_empty() || self.types.iter().any(|t| t == identifier)
	}
}

impl Default for LinkConfig {
	fn default() -> Self {
		Self::new()
	}
}
