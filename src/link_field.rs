//! Form field validating a submitted link

use crate::field::{FieldError, FieldResult, FormField, Widget, is_empty_value};
use crate::fields::{BooleanField, CharField, ChoiceField};
use crate::link::{Link, LinkConfig, Target};
use crate::registry::LinkTypeManager;
use crate::widget::LinkWidget;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Longest label override accepted
pub const LABEL_MAX_LENGTH: usize = 255;

/// Form field for a [`Link`]
///
/// The submitted value has the stored link shape (see
/// [`LinkWidget::value_from_data`]). Cleaning picks the active type, hands the
/// submitted sub-form values to that type's form and stores its cleaned data
/// as the link value. Returns the stored JSON of the resulting link, or
/// `Null` for an empty optional link.
///
/// # Examples
///
/// ```
/// use reinhardt_link::{FormField, Link, LinkConfig, LinkFormField, LinkTypeManager};
/// use reinhardt_link::link_types::InputType;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let registry = Arc::new(LinkTypeManager::builder().register(InputType::new()).build().unwrap());
/// let field = LinkFormField::new("link", registry, LinkConfig::new().with_types(["input"]).allow_label(true));
///
/// let cleaned = field
///     .clean(Some(&json!({"type": "input", "value": {"input": "https://example.com"}})))
///     .unwrap();
/// let link = Link::from_json_value(cleaned).unwrap();
/// assert_eq!(link.value, json!({"input": "https://example.com"}));
/// ```
pub struct LinkFormField {
	pub name: String,
	pub label: Option<String>,
	pub required: bool,
	pub help_text: Option<String>,
	pub initial: Option<Value>,
	pub config: LinkConfig,
	registry: Arc<LinkTypeManager>,
	widget: Widget,
}

impl LinkFormField {
	pub fn new(name: impl Into<String>, registry: Arc<LinkTypeManager>, config: LinkConfig) -> Self {
		let widget = Widget::Select {
			choices: registry.choices(&config.types),
		};
		Self {
			name: name.into(),
			label: None,
			required: true,
			help_text: None,
			initial: None,
			config,
			registry,
			widget,
		}
	}
	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
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
	pub fn with_initial(mut self, link: &Link) -> Self {
		self.initial = Some(link.to_json_value());
		self
	}

	pub fn registry(&self) -> &Arc<LinkTypeManager> {
		&self.registry
	}

	/// The widget rendering this field
	pub fn link_widget(&self) -> LinkWidget {
		LinkWidget::new(Arc::clone(&self.registry), self.config.clone()).required(self.required)
	}

	/// Extract the submitted value of this field from POST data
	pub fn value_from_data(&self, data: &HashMap<String, Value>) -> Value {
		self.link_widget().value_from_data(&self.name, data)
	}

	/// Typed variant of [`FormField::clean`]
	///
	/// Returns `Ok(None)` for an empty, optional link.
	pub fn clean_link(&self, value: Option<&Value>) -> FieldResult<Option<Link>> {
		if is_empty_value(value) {
			return self.empty();
		}
		let Some(submitted) = value.and_then(Value::as_object) else {
			return Err(FieldError::Invalid("Enter a valid link.".to_string()));
		};

		let identifier = match submitted.get("type").and_then(Value::as_str).map(str::trim) {
			Some(t) if !t.is_empty() => t.to_string(),
			// A field limited to one type does not submit the selector
			_ => match self.config.types.as_slice() {
				[only] => only.clone(),
				_ => return self.empty(),
			},
		};

		if !self.config.allows_type(&identifier) || !self.registry.contains(&identifier) {
			return Err(FieldError::Validation(format!(
				"Select a valid choice. {} is not one of the available choices.",
				identifier
			)));
		}
		let link_type = self
			.registry
			.get(&identifier)
			.map_err(|e| FieldError::Validation(e.to_string()))?;

		let data: HashMap<String, Value> = match submitted.get("value") {
			Some(Value::Object(map)) => map.clone().into_iter().collect(),
			Some(scalar) => HashMap::from([(identifier.clone(), scalar.clone())]),
			None => HashMap::new(),
		};
		if data.values().all(|v| is_empty_value(Some(v))) {
			return self.empty();
		}

		let prefix = LinkWidget::type_prefix(&self.name, &identifier);
		let cleaned = link_type.clean(&data, &prefix, self.required)?;
		if is_empty_value(Some(&cleaned)) {
			return self.empty();
		}

		let mut link = Link::new(identifier, cleaned);

		if self.config.allow_label {
			let label = CharField::new("label".to_string())
				.with_max_length(LABEL_MAX_LENGTH)
				.clean(submitted.get("label"))?;
			link = link.with_label(label.as_str().unwrap_or_default());
		}

		if self.config.allow_target {
			let target = ChoiceField::new("target".to_string(), Target::choices())
				.clean(submitted.get("target"))?;
			link.target = target
				.as_str()
				.unwrap_or_default()
				.parse()
				.map_err(|e: crate::link::UnknownTarget| FieldError::Validation(e.to_string()))?;
		}

		if self.config.allow_no_follow {
			link.no_follow = BooleanField::to_bool(submitted.get("no_follow"));
		}

		Ok(Some(link))
	}

	fn empty(&self) -> FieldResult<Option<Link>> {
		if self.required {
			Err(FieldError::Required(self.name.clone()))
		} else {
			Ok(None)
		}
	}
}

impl FormField for LinkFormField {
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

	fn initial(&self) -> Option<&Value> {
		self.initial.as_ref()
	}

	fn clean(&self, value: Option<&Value>) -> FieldResult<Value> {
		Ok(self
			.clean_link(value)?
			.map(|link| link.to_json_value())
			.unwrap_or(Value::Null))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::form::Form;
	use crate::link_types::{EntityKind, InputType, LinkEntity, LinkType, ModelLinkType};
	use crate::sources::{InMemorySource, Page};
	use rstest::{fixture, rstest};
	use serde_json::json;

	/// A path plus an optional fragment, edited as two separate inputs
	struct AnchorType;

	impl LinkType for AnchorType {
		fn identifier(&self) -> &str {
			"anchor"
		}

		fn verbose_name(&self) -> &str {
			"Anchor"
		}

		fn payload<'v>(&self, value: &'v Value) -> Option<&'v Value> {
			(!is_empty_value(Some(value))).then_some(value)
		}

		fn resolve(&self, payload: &Value) -> Option<LinkEntity> {
			let path = payload.get("anchor")?.as_str()?;
			let href = match payload.get("fragment").and_then(Value::as_str) {
				Some(fragment) if !fragment.is_empty() => format!("{}#{}", path, fragment),
				_ => path.to_string(),
			};
			Some(LinkEntity {
				kind: EntityKind::Text,
				pk: None,
				href: Some(href.clone()),
				label: href,
				mime_type: None,
			})
		}

		fn form(&self, prefix: &str, required: bool) -> Form {
			Form::with_prefix(prefix.to_string())
				.field(CharField::new("anchor".to_string()).with_required(required))
				.field(CharField::new("fragment".to_string()))
		}
	}

	#[fixture]
	fn registry() -> Arc<LinkTypeManager> {
		let pages = Arc::new(InMemorySource::with_items("page", [Page::new(1, "Home", "/")]));
		Arc::new(
			LinkTypeManager::builder()
				.register(ModelLinkType::page(pages))
				.register(InputType::new())
				.register(AnchorType)
				.build()
				.unwrap(),
		)
	}

	#[rstest]
	fn test_multi_field_type_keeps_every_field(registry: Arc<LinkTypeManager>) {
		// Arrange
		let field = LinkFormField::new("cta", Arc::clone(&registry), LinkConfig::new());
		let post = HashMap::from([
			("cta_link_type".to_string(), json!("anchor")),
			("cta_link_anchor-anchor".to_string(), json!(" /faq/ ")),
			("cta_link_anchor-fragment".to_string(), json!("billing")),
		]);

		// Act
		let link = field
			.clean_link(Some(&field.value_from_data(&post)))
			.unwrap()
			.unwrap();

		// Assert
		assert_eq!(link.value, json!({"anchor": "/faq/", "fragment": "billing"}));
		let bound = registry.bind(&link).unwrap();
		assert_eq!(bound.href().as_deref(), Some("/faq/#billing"));
	}

	#[rstest]
	fn test_multi_field_type_initial_values(registry: Arc<LinkTypeManager>) {
		// Arrange
		let field = LinkFormField::new("cta", registry, LinkConfig::new());
		let link = Link::new("anchor", json!({"anchor": "/faq/", "fragment": "billing"}));

		// Act
		let ctx = field.link_widget().context("cta", Some(&link));

		// Assert
		let anchor_form = ctx
			.type_forms
			.iter()
			.find(|form| form.identifier == "anchor")
			.unwrap();
		assert!(anchor_form.active);
		assert_eq!(anchor_form.controls[0].name, "cta_link_anchor-anchor");
		assert_eq!(anchor_form.controls[0].value, json!("/faq/"));
		assert_eq!(anchor_form.controls[1].name, "cta_link_anchor-fragment");
		assert_eq!(anchor_form.controls[1].value, json!("billing"));
	}

	#[rstest]
	fn test_single_type_field_infers_type(registry: Arc<LinkTypeManager>) {
		// Arrange
		let field = LinkFormField::new("link", registry, LinkConfig::new().with_types(["page"]));

		// Act
		let link = field.clean_link(Some(&json!({"value": {"page": "1"}}))).unwrap();

		// Assert
		assert_eq!(link, Some(Link::new("page", json!({"page": 1}))));
	}

	#[rstest]
	fn test_disallowed_type_rejected(registry: Arc<LinkTypeManager>) {
		// Arrange
		let field = LinkFormField::new("link", registry, LinkConfig::new().with_types(["page"]));

		// Act
		let err = field
			.clean_link(Some(&json!({"type": "input", "value": "/x/"})))
			.unwrap_err();

		// Assert
		assert!(err.to_string().contains("input is not one of the available choices"));
	}

	#[rstest]
	fn test_auxiliary_fields_dropped_unless_allowed(registry: Arc<LinkTypeManager>) {
		// Arrange
		let field = LinkFormField::new("link", registry, LinkConfig::new().allow_label(false));
		let submitted = json!({
			"type": "input",
			"value": {"input": "/x/"},
			"label": "X",
			"target": "_blank",
			"no_follow": "on",
		});

		// Act
		let link = field.clean_link(Some(&submitted)).unwrap().unwrap();

		// Assert
		assert_eq!(link.label, None);
		assert_eq!(link.target, Target::SameWindow);
		assert!(!link.no_follow);
	}

	#[rstest]
	fn test_auxiliary_fields_kept_when_allowed(registry: Arc<LinkTypeManager>) {
		// Arrange
		let config = LinkConfig::new()
			.allow_label(true)
			.allow_target(true)
			.allow_no_follow(true);
		let field = LinkFormField::new("link", registry, config);
		let submitted = json!({
			"type": "input",
			"value": {"input": "/x/"},
			"label": " X ",
			"target": "_blank",
			"no_follow": "on",
		});

		// Act
		let link = field.clean_link(Some(&submitted)).unwrap().unwrap();

		// Assert
		assert_eq!(link.label.as_deref(), Some("X"));
		assert_eq!(link.target, Target::Blank);
		assert!(link.no_follow);
	}

	#[rstest]
	fn test_invalid_target_rejected(registry: Arc<LinkTypeManager>) {
		// Arrange
		let field = LinkFormField::new("link", registry, LinkConfig::new().allow_target(true));

		// Act
		let result = field.clean_link(Some(&json!({
			"type": "input",
			"value": {"input": "/x/"},
			"target": "_new",
		})));

		// Assert
		assert!(matches!(result, Err(FieldError::Validation(_))));
	}

	#[rstest]
	fn test_non_object_value_invalid(registry: Arc<LinkTypeManager>) {
		// Arrange
		let field = LinkFormField::new("link", registry, LinkConfig::new());

		// Act & Assert
		assert_eq!(
			field.clean_link(Some(&json!("https://example.com"))),
			Err(FieldError::Invalid("Enter a valid link.".to_string()))
		);
	}

	#[rstest]
	fn test_widget_choices_follow_config(registry: Arc<LinkTypeManager>) {
		// Arrange
		let field = LinkFormField::new("link", registry, LinkConfig::new().with_types(["input"]));

		// Act & Assert
		assert_eq!(
			FormField::widget(&field),
			&Widget::Select {
				choices: vec![("input".to_string(), "URL".to_string())]
			}
		);
	}
}
