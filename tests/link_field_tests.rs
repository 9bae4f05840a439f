//! Link form field tests
//!
//! Submission through the widget, validation by the active type's sub-form,
//! storage and re-rendering.

use reinhardt_link::link_types::{InputType, ModelLinkType};
use reinhardt_link::sources::{InMemorySource, MediaFile, Page};
use reinhardt_link::{
	FieldError, FormField, Link, LinkConfig, LinkFormField, LinkModelField, LinkTypeManager,
	LinkWidget, Target,
};
use rstest::*;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

#[fixture]
fn pages() -> Arc<InMemorySource<Page>> {
	Arc::new(InMemorySource::with_items(
		"page",
		[Page::new(1, "Home", "/"), Page::new(7, "Contact", "/contact/")],
	))
}

fn registry_for(pages: Arc<InMemorySource<Page>>) -> Arc<LinkTypeManager> {
	let files = Arc::new(InMemorySource::<MediaFile>::new("file"));
	Arc::new(LinkTypeManager::with_defaults(pages, files))
}

#[fixture]
fn registry(pages: Arc<InMemorySource<Page>>) -> Arc<LinkTypeManager> {
	registry_for(pages)
}

fn post(entries: &[(&str, &str)]) -> HashMap<String, Value> {
	entries
		.iter()
		.map(|(key, value)| (key.to_string(), json!(value)))
		.collect()
}

#[rstest]
fn test_input_link_stored_and_resolved(registry: Arc<LinkTypeManager>) {
	// Arrange
	let config = LinkConfig::new().with_types(["input"]).allow_label(true);
	let field = LinkFormField::new("link", Arc::clone(&registry), config.clone());
	let column = LinkModelField::new(Arc::clone(&registry)).with_config(config);
	let data = post(&[("link_link_input-input", "https://example.com")]);

	// Act
	let submitted = field.value_from_data(&data);
	let link = field.clean_link(Some(&submitted)).unwrap().unwrap();
	let stored = column.to_db(Some(&link)).unwrap().unwrap();

	// Assert
	let stored_json: Value = serde_json::from_str(&stored).unwrap();
	assert_eq!(stored_json["type"], json!("input"));
	assert_eq!(stored_json["value"], json!({"input": "https://example.com"}));
	let restored = column.from_db(Some(&stored)).unwrap().unwrap();
	assert_eq!(
		registry.bind(&restored).unwrap().href().as_deref(),
		Some("https://example.com")
	);
}

#[rstest]
#[case(json!({"type": "input", "value": {}}))]
#[case(json!({"type": "input", "value": {"input": "  "}}))]
#[case(json!({"type": "page", "value": {"page": ""}}))]
#[case(json!({}))]
#[case(Value::Null)]
fn test_empty_value_required(registry: Arc<LinkTypeManager>, #[case] submitted: Value) {
	// Arrange
	let field = LinkFormField::new("link", registry, LinkConfig::new());

	// Act
	let err = field.clean(Some(&submitted)).unwrap_err();

	// Assert
	assert!(err.is_required());
	assert_eq!(err.to_string(), "This field is required.");
}

#[rstest]
#[case(json!({"type": "input", "value": {}}))]
#[case(json!({"type": "page", "value": {"page": ""}}))]
#[case(Value::Null)]
fn test_empty_value_optional(registry: Arc<LinkTypeManager>, #[case] submitted: Value) {
	// Arrange
	let field = LinkFormField::new("link", registry, LinkConfig::new()).required(false);

	// Act
	let cleaned = field.clean(Some(&submitted)).unwrap();

	// Assert
	assert_eq!(cleaned, Value::Null);
}

#[rstest]
#[case(json!({"type": "mail", "value": {"mail": "not-an-address"}}), "Enter a valid email address.")]
#[case(json!({"type": "phone", "value": {"phone": "call me"}}), "Enter a valid phone number.")]
#[case(json!({"type": "page", "value": {"page": "99"}}), "Select a valid choice. That choice is not one of the available choices.")]
fn test_sub_form_error_surfaces(
	registry: Arc<LinkTypeManager>,
	#[case] submitted: Value,
	#[case] message: &str,
) {
	// Arrange
	let field = LinkFormField::new("link", registry, LinkConfig::new());

	// Act
	let err = field.clean(Some(&submitted)).unwrap_err();

	// Assert
	assert!(matches!(err, FieldError::Validation(_)));
	assert!(err.to_string().contains(message), "{err}");
}

#[rstest]
fn test_page_link_from_post_data(registry: Arc<LinkTypeManager>) {
	// Arrange
	let config = LinkConfig::new()
		.with_types(["page", "input"])
		.allow_target(true)
		.allow_label(false)
		.allow_no_follow(true);
	let field = LinkFormField::new("cta", registry, config);
	let data = post(&[
		("cta_link_type", "page"),
		("cta_link_page-page", "7"),
		("cta_link_input-input", "https://ignored.example"),
		("cta_link_target", "_blank"),
		("cta_link_no_follow", "on"),
		("cta_link_label", "dropped"),
	]);

	// Act
	let link = field
		.clean_link(Some(&field.value_from_data(&data)))
		.unwrap()
		.unwrap();

	// Assert
	assert_eq!(
		link,
		Link::new("page", json!({"page": 7}))
			.with_target(Target::Blank)
			.with_no_follow(true)
	);
}

#[rstest]
fn test_deleted_page_resets_on_render(pages: Arc<InMemorySource<Page>>) {
	// Arrange
	let registry = registry_for(Arc::clone(&pages));
	let link = Link::new("page", json!({"page": 7})).with_label("Get in touch");
	pages.remove("7");
	let widget = LinkWidget::new(Arc::clone(&registry), LinkConfig::new());

	// Act
	let bound = registry.bind(&link).unwrap();
	let context = widget.context("cta", Some(&link));

	// Assert
	assert_eq!(bound.resolve(), None);
	assert_eq!(bound.href(), None);
	assert_eq!(bound.label().as_deref(), Some("Get in touch"));
	assert_eq!(bound.to_html(None), "Get in touch");
	assert!(context.value_was_reset);
	assert_eq!(context.active_type.as_deref(), Some("page"));
	let page_form = context
		.type_forms
		.iter()
		.find(|form| form.identifier == "page")
		.unwrap();
	assert!(page_form.controls.iter().all(|control| control.value.is_null()));
}

#[rstest]
fn test_strict_input_rejects_scheme(pages: Arc<InMemorySource<Page>>) {
	// Arrange
	let registry = Arc::new(
		LinkTypeManager::builder()
			.register(ModelLinkType::page(pages))
			.register(InputType::new().strict(true))
			.build()
			.unwrap(),
	);
	let field = LinkFormField::new("link", registry, LinkConfig::new());

	// Act
	let relative = field.clean_link(Some(&json!({"type": "input", "value": {"input": "/about/"}})));
	let script = field.clean_link(Some(&json!({"type": "input", "value": {"input": "javascript:alert(1)"}})));

	// Assert
	assert!(relative.is_ok());
	assert!(matches!(script, Err(FieldError::Validation(_))));
}
