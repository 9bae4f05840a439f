//! Model-backed link types

use super::{EntityKind, LinkEntity, LinkType, payload_as_str};
use crate::fields::ModelChoiceField;
use crate::form::Form;
use crate::link::Target;
use crate::sources::{LinkModel, MediaFile, ModelSource, Page};
use serde_json::Value;
use std::sync::Arc;

/// A link to an instance of some model, selected from a [`ModelSource`]
///
/// The stored payload is the instance's primary key.
pub struct ModelLinkType<S: ModelSource> {
	identifier: String,
	verbose_name: String,
	kind: EntityKind,
	default_target: Target,
	source: Arc<S>,
}

/// Link to a CMS page
pub type PageType<S> = ModelLinkType<S>;

/// Link to an uploaded file
pub type FileType<S> = ModelLinkType<S>;

impl<S: ModelSource> ModelLinkType<S> {
	/// Create a link type for an arbitrary model
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::link_types::{LinkType, ModelLinkType};
	/// use reinhardt_link::sources::{InMemorySource, Page};
	/// use serde_json::json;
	/// use std::sync::Arc;
	///
	/// let landing_pages = Arc::new(InMemorySource::with_items("landing", [Page::new(5, "Spring sale", "/sale/")]));
	/// let link_type = ModelLinkType::new("landing", "Landing page", landing_pages);
	///
	/// assert_eq!(link_type.href(&json!(5)), Some("/sale/".to_string()));
	/// assert_eq!(link_type.label(&json!("5")), Some("Spring sale".to_string()));
	/// assert_eq!(link_type.resolve(&json!(6)), None);
	/// ```
	pub fn new(
		identifier: impl Into<String>,
		verbose_name: impl Into<String>,
		source: Arc<S>,
	) -> Self {
		let kind = EntityKind::Model(source.model_name().to_string());
		Self {
			identifier: identifier.into(),
			verbose_name: verbose_name.into(),
			kind,
			default_target: Target::SelfFrame,
			source,
		}
	}

	/// Target used when the field does not let editors choose one
	pub fn with_default_target(mut self, target: Target) -> Self {
		self.default_target = target;
		self
	}

	pub fn source(&self) -> &Arc<S> {
		&self.source
	}

	/// Fetch the model instance a payload refers to
	pub fn get_object(&self, payload: &Value) -> Option<S::Model> {
		let pk = payload_as_str(payload)?;
		let instance = self.source.get(&pk);
		if instance.is_none() {
			tracing::debug!(
				link_type = %self.identifier,
				model = self.source.model_name(),
				pk = %pk,
				"link target no longer exists"
			);
		}
		instance
	}
}

impl<S: ModelSource<Model = Page>> ModelLinkType<S> {
	/// The standard `page` link type
	pub fn page(source: Arc<S>) -> Self {
		Self {
			identifier: "page".to_string(),
			verbose_name: "Page".to_string(),
			kind: EntityKind::Page,
			default_target: Target::SelfFrame,
			source,
		}
	}
}

impl<S: ModelSource<Model = MediaFile>> ModelLinkType<S> {
	/// The standard `file` link type; downloads open in a new window
	pub fn file(source: Arc<S>) -> Self {
		Self {
			identifier: "file".to_string(),
			verbose_name: "File".to_string(),
			kind: EntityKind::File,
			default_target: Target::Blank,
			source,
		}
	}
}

impl<S: ModelSource + 'static> LinkType for ModelLinkType<S> {
	fn identifier(&self) -> &str {
		&self.identifier
	}

	fn verbose_name(&self) -> &str {
		&self.verbose_name
	}

	fn resolve(&self, payload: &Value) -> Option<LinkEntity> {
		let instance = self.get_object(payload)?;
		Some(LinkEntity {
			kind: self.kind.clone(),
			pk: Some(instance.pk()),
			href: instance.href(),
			label: instance.label(),
			mime_type: instance.mime_type(),
		})
	}

	fn default_target(&self) -> Target {
		self.default_target
	}

	fn form(&self, prefix: &str, required: bool) -> Form {
		let field = ModelChoiceField::new(self.identifier.clone(), Arc::clone(&self.source))
			.required(required);
		Form::with_prefix(prefix.to_string()).field(field)
	}
}
