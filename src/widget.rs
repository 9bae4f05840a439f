//! Widget for link fields: POST data extraction and render context
//!
//! Markup is left to templates. The widget produces a [`WidgetContext`]
//! describing every control it would render, named the way
//! [`value_from_data`](LinkWidget::value_from_data) expects them back.

use crate::error::LinkError;
use crate::field::Widget;
use crate::link::{Link, LinkConfig, Target};
use crate::registry::LinkTypeManager;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// One rendered control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlContext {
	/// HTML `name` attribute
	pub name: String,
	/// HTML `id` attribute
	pub id: String,
	pub widget: Widget,
	pub value: Value,
	pub required: bool,
	pub label: Option<String>,
	pub help_text: Option<String>,
}

impl ControlContext {
	fn new(name: String, widget: Widget, value: Value, required: bool) -> Self {
		Self {
			id: format!("id_{}", name),
			name,
			widget,
			value,
			required,
			label: None,
			help_text: None,
		}
	}

	fn describe(mut self, label: Option<&str>, help_text: Option<&str>) -> Self {
		self.label = label.map(str::to_string);
		self.help_text = help_text.map(str::to_string);
		self
	}
}

/// The sub-form of one link type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeFormContext {
	pub identifier: String,
	pub verbose_name: String,
	pub prefix: String,
	pub active: bool,
	pub controls: Vec<ControlContext>,
}

/// Everything a template needs to render a link field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetContext {
	pub name: String,
	pub type_select: ControlContext,
	pub active_type: Option<String>,
	pub type_forms: Vec<TypeFormContext>,
	pub label: Option<ControlContext>,
	pub target: Option<ControlContext>,
	pub no_follow: Option<ControlContext>,
	/// True when a stored value pointed at something that no longer exists
	pub value_was_reset: bool,
}

/// Widget for a link field
pub struct LinkWidget {
	registry: Arc<LinkTypeManager>,
	config: LinkConfig,
	required: bool,
}

impl LinkWidget {
	pub fn new(registry: Arc<LinkTypeManager>, config: LinkConfig) -> Self {
		Self {
			registry,
			config,
			required: false,
		}
	}

	pub fn required(mut self, required: bool) -> Self {
		self.required = required;
		self
	}

	pub fn type_field_name(name: &str) -> String {
		format!("{}_link_type", name)
	}

	pub fn label_field_name(name: &str) -> String {
		format!("{}_link_label", name)
	}

	pub fn target_field_name(name: &str) -> String {
		format!("{}_link_target", name)
	}

	pub fn no_follow_field_name(name: &str) -> String {
		format!("{}_link_no_follow", name)
	}

	/// Prefix of a type's sub-form, `{name}_link_{identifier}`
	pub fn type_prefix(name: &str, identifier: &str) -> String {
		format!("{}_link_{}", name, identifier)
	}

	/// Collect the submitted link for field `name` out of POST data
	///
	/// Every key under the active type's prefix is kept, so sub-forms with
	/// several fields arrive whole.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::{LinkConfig, LinkTypeManager, LinkWidget};
	/// use reinhardt_link::link_types::InputType;
	/// use serde_json::json;
	/// use std::collections::HashMap;
	/// use std::sync::Arc;
	///
	/// let registry = Arc::new(LinkTypeManager::builder().register(InputType::new()).build().unwrap());
	/// let widget = LinkWidget::new(registry, LinkConfig::new().allow_label(true));
	///
	/// let post = HashMap::from([
	///     ("cta_link_type".to_string(), json!("input")),
	///     ("cta_link_input-input".to_string(), json!("https://example.com")),
	///     ("cta_link_label".to_string(), json!("Read more")),
	/// ]);
	///
	/// assert_eq!(
	///     widget.value_from_data("cta", &post),
	///     json!({"type": "input", "value": {"input": "https://example.com"}, "label": "Read more"})
	/// );
	/// ```
	pub fn value_from_data(&self, name: &str, data: &HashMap<String, Value>) -> Value {
		let mut submitted = Map::new();

		let link_type = data
			.get(&Self::type_field_name(name))
			.and_then(Value::as_str)
			.map(str::trim)
			.filter(|t| !t.is_empty())
			.map(str::to_string)
			.or_else(|| match self.config.types.as_slice() {
				[only] => Some(only.clone()),
				_ => None,
			});

		if let Some(identifier) = link_type {
			let sub_prefix = format!("{}-", Self::type_prefix(name, &identifier));
			let value: Map<String, Value> = data
				.iter()
				.filter_map(|(key, raw)| {
					let field = key.strip_prefix(&sub_prefix)?;
					Some((field.to_string(), raw.clone()))
				})
				.collect();
			submitted.insert("type".to_string(), Value::String(identifier));
			submitted.insert("value".to_string(), Value::Object(value));
		}

		let aux = [
			("label", Self::label_field_name(name), self.config.allow_label),
			("target", Self::target_field_name(name), self.config.allow_target),
			(
				"no_follow",
				Self::no_follow_field_name(name),
				self.config.allow_no_follow,
			),
		];
		for (key, field_name, allowed) in aux {
			if allowed && let Some(raw) = data.get(&field_name) {
				submitted.insert(key.to_string(), raw.clone());
			}
		}

		Value::Object(submitted)
	}

	/// Reset a stored link whose reference no longer resolves
	///
	/// Returns true when the value was cleared. A link naming an unregistered
	/// type loses its type as well, so the editor starts from a clean slate.
	pub fn prepare(&self, link: &mut Link) -> bool {
		if link.is_empty() {
			return false;
		}
		let resolved = self
			.registry
			.bind(link)
			.map(|bound| bound.resolve().is_some());
		match resolved {
			Ok(true) => return false,
			Ok(false) => {
				tracing::debug!(
					link_type = link.link_type().unwrap_or_default(),
					"resetting link value that no longer resolves"
				);
			}
			Err(LinkError::UnknownLinkType(identifier)) => {
				tracing::warn!(link_type = %identifier, "resetting link with unregistered type");
				link.link_type = None;
			}
			Err(err) => {
				tracing::warn!(error = %err, "resetting unusable link");
			}
		}
		link.clear_value();
		true
	}

	/// Build the render context for field `name` holding `link`
	pub fn context(&self, name: &str, link: Option<&Link>) -> WidgetContext {
		let mut link = link.cloned().unwrap_or_default();
		let value_was_reset = self.prepare(&mut link);

		let active_type = link
			.link_type()
			.filter(|t| self.config.allows_type(t))
			.map(str::to_string);

		let choices = self.registry.choices(&self.config.types);
		let type_select = ControlContext::new(
			Self::type_field_name(name),
			Widget::Select {
				choices: choices.clone(),
			},
			active_type.clone().map(Value::String).unwrap_or(Value::Null),
			self.required,
		);

		let type_forms = choices
			.iter()
			.filter_map(|(identifier, _)| self.registry.get(identifier).ok())
			.map(|link_type| {
				let identifier = link_type.identifier().to_string();
				let prefix = Self::type_prefix(name, &identifier);
				let active = active_type.as_deref() == Some(identifier.as_str());
				let form = link_type.form(&prefix, self.required);
				let initial = if active && !link.is_empty() {
					link_type.initial_data(&link.value)
				} else {
					Map::new()
				};
				let controls = form
					.fields()
					.iter()
					.map(|field| {
						let value = initial
							.get(field.name())
							.or_else(|| field.initial())
							.cloned()
							.unwrap_or(Value::Null);
						ControlContext::new(
							form.add_prefix_to_field_name(field.name()),
							field.widget().clone(),
							value,
							field.required(),
						)
						.describe(field.label(), field.help_text())
					})
					.collect();
				TypeFormContext {
					verbose_name: link_type.verbose_name().to_string(),
					identifier,
					prefix,
					active,
					controls,
				}
			})
			.collect();

		let label = self.config.allow_label.then(|| {
			ControlContext::new(
				Self::label_field_name(name),
				Widget::TextInput,
				link.label.clone().map(Value::String).unwrap_or(Value::Null),
				false,
			)
		});
		let target = self.config.allow_target.then(|| {
			ControlContext::new(
				Self::target_field_name(name),
				Widget::Select {
					choices: Target::choices(),
				},
				Value::String(link.target.as_str().to_string()),
				false,
			)
		});
		let no_follow = self.config.allow_no_follow.then(|| {
			ControlContext::new(
				Self::no_follow_field_name(name),
				Widget::CheckboxInput,
				Value::Bool(link.no_follow),
				false,
			)
		});

		WidgetContext {
			name: name.to_string(),
			type_select,
			active_type,
			type_forms,
			label,
			target,
			no_follow,
			value_was_reset,
		}
	}
}
