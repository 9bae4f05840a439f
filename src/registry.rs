//! Registry of available link types

use crate::error::{LinkError, LinkResult};
use crate::html::{escape_html, escape_html_attr, is_safe_url};
use crate::link::{Link, LinkConfig, Target};
use crate::link_types::{EmailType, InputType, LinkEntity, LinkType, ModelLinkType, PhoneType};
use crate::sources::{MediaFile, ModelSource, Page};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Immutable mapping from identifier to link type, in registration order
///
/// Build one at start-up with [`LinkTypeManager::builder`] and share it as an
/// `Arc<LinkTypeManager>`.
///
/// # Examples
///
/// ```
/// use reinhardt_link::LinkTypeManager;
/// use reinhardt_link::link_types::{EmailType, InputType};
///
/// let registry = LinkTypeManager::builder()
///     .register(InputType::new())
///     .register(EmailType::new())
///     .build()
///     .unwrap();
///
/// assert_eq!(registry.get("input").unwrap().verbose_name(), "URL");
/// assert!(registry.get("page").is_err());
/// assert_eq!(
///     registry.choices(&["mail"]),
///     vec![("mail".to_string(), "Email address".to_string())]
/// );
/// ```
pub struct LinkTypeManager {
	types: IndexMap<String, Arc<dyn LinkType>>,
}

impl LinkTypeManager {
	pub fn builder() -> LinkTypeManagerBuilder {
		LinkTypeManagerBuilder::default()
	}

	/// Registry with the standard types: page, file, input, mail, phone
	pub fn with_defaults<P, F>(pages: Arc<P>, files: Arc<F>) -> Self
	where
		P: ModelSource<Model = Page> + 'static,
		F: ModelSource<Model = MediaFile> + 'static,
	{
		Self::builder()
			.default_types(pages, files, InputType::new())
			.build_unchecked()
	}

	/// Look up a link type by identifier
	pub fn get(&self, identifier: &str) -> LinkResult<Arc<dyn LinkType>> {
		self.types
			.get(identifier)
			.cloned()
			.ok_or_else(|| LinkError::UnknownLinkType(identifier.to_string()))
	}

	pub fn contains(&self, identifier: &str) -> bool {
		self.types.contains_key(identifier)
	}

	pub fn identifiers(&self) -> impl Iterator<Item = &str> {
		self.types.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// `(identifier, verbose_name)` pairs limited to an allow-list
	///
	/// Order follows registration, not the allow-list. An empty allow-list
	/// selects every registered type; unknown identifiers in it are ignored.
	pub fn choices<S: AsRef<str>>(&self, allowed: &[S]) -> Vec<(String, String)> {
		self.types
			.iter()
			.filter(|(identifier, _)| {
				allowed.is_empty() || allowed.iter().any(|a| a.as_ref() == identifier.as_str())
			})
			.map(|(identifier, link_type)| {
				(identifier.clone(), link_type.verbose_name().to_string())
			})
			.collect()
	}

	/// Pair a link with its type for one render or request
	///
	/// Uses the default [`LinkConfig`]. Fails when the link names a type that
	/// is not registered, or has none.
	pub fn bind<'a>(&self, link: &'a Link) -> LinkResult<BoundLink<'a>> {
		self.bind_with(link, &DEFAULT_CONFIG)
	}

	/// Like [`bind`](Self::bind), honouring the configuration of the field
	/// the link was stored by
	pub fn bind_with<'a>(&self, link: &'a Link, config: &'a LinkConfig) -> LinkResult<BoundLink<'a>> {
		let identifier = link
			.link_type()
			.ok_or_else(|| LinkError::UnknownLinkType(String::new()))?;
		let link_type = self.get(identifier)?;
		tracing::debug!(link_type = identifier, "dispatching link");
		Ok(BoundLink {
			link,
			link_type,
			config,
		})
	}

	/// Check that a link's type, when set, is registered
	pub fn check(&self, link: &Link) -> LinkResult<()> {
		match link.link_type() {
			Some(identifier) if !self.contains(identifier) => {
				Err(LinkError::UnknownLinkType(identifier.to_string()))
			}
			_ => Ok(()),
		}
	}
}

impl fmt::Debug for LinkTypeManager {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LinkTypeManager")
			.field("types", &self.types.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Collects link types before the registry is frozen
#[derive(Default)]
pub struct LinkTypeManagerBuilder {
	types: Vec<Arc<dyn LinkType>>,
}

impl LinkTypeManagerBuilder {
	pub fn register(self, link_type: impl LinkType + 'static) -> Self {
		self.register_arc(Arc::new(link_type))
	}

	pub fn register_arc(mut self, link_type: Arc<dyn LinkType>) -> Self {
		tracing::trace!(link_type = link_type.identifier(), "registering link type");
		self.types.push(link_type);
		self
	}

	/// Register the standard types with the given input variant
	pub fn default_types<P, F>(self, pages: Arc<P>, files: Arc<F>, input: InputType) -> Self
	where
		P: ModelSource<Model = Page> + 'static,
		F: ModelSource<Model = MediaFile> + 'static,
	{
		self.register(ModelLinkType::page(pages))
			.register(ModelLinkType::file(files))
			.register(input)
			.register(EmailType::new())
			.register(PhoneType::new())
	}

	/// Freeze the registry; duplicate identifiers are rejected
	pub fn build(self) -> LinkResult<LinkTypeManager> {
		let mut types = IndexMap::with_capacity(self.types.len());
		for link_type in self.types {
			let identifier = link_type.identifier().to_string();
			if types.contains_key(&identifier) {
				return Err(LinkError::DuplicateLinkType(identifier));
			}
			types.insert(identifier, link_type);
		}
		Ok(LinkTypeManager { types })
	}

	// Only for sets assembled in this module, whose identifiers are distinct
	fn build_unchecked(self) -> LinkTypeManager {
		LinkTypeManager {
			types: self
				.types
				.into_iter()
				.map(|t| (t.identifier().to_string(), t))
				.collect(),
		}
	}
}

static DEFAULT_CONFIG: LinkConfig = LinkConfig::new();

/// A [`Link`] bound to its [`LinkType`]
///
/// Lives for a single request or render; nothing here is persisted. Stored
/// target and label overrides only apply when the field's [`LinkConfig`]
/// allows them.
pub struct BoundLink<'a> {
	link: &'a Link,
	link_type: Arc<dyn LinkType>,
	config: &'a LinkConfig,
}

impl<'a> BoundLink<'a> {
	pub fn link(&self) -> &'a Link {
		self.link
	}

	pub fn link_type(&self) -> &dyn LinkType {
		self.link_type.as_ref()
	}

	pub fn resolve(&self) -> Option<LinkEntity> {
		self.link_type.resolve(self.link_type.payload(&self.link.value)?)
	}

	pub fn href(&self) -> Option<String> {
		self.resolve()?.href
	}

	fn label_override(&self) -> Option<String> {
		self.link.label.clone().filter(|_| self.config.allow_label)
	}

	/// Label override when allowed, else the entity's label
	///
	/// An override is returned even when the target no longer resolves.
	pub fn label(&self) -> Option<String> {
		self.label_override()
			.or_else(|| self.resolve().map(|entity| entity.label))
	}

	/// Stored target when editors may choose one, else the type's default
	pub fn target(&self) -> Target {
		if self.config.allow_target {
			self.link.target
		} else {
			self.link_type.default_target()
		}
	}

	/// True when the link leaves the current browsing context
	pub fn is_external(&self) -> bool {
		!matches!(self.target(), Target::SelfFrame | Target::SameWindow)
	}

	/// Render as an anchor, or as plain escaped text when there is no usable href
	///
	/// `text` replaces the link label when given.
	pub fn to_html(&self, text: Option<&str>) -> String {
		let text = text.map(str::to_string);
		let Some(entity) = self.resolve() else {
			return text
				.or_else(|| self.label_override())
				.map(|label| escape_html(&label))
				.unwrap_or_default();
		};
		let label = text
			.or_else(|| self.label_override())
			.unwrap_or(entity.label);

		let Some(href) = entity.href.filter(|href| is_safe_url(href)) else {
			return escape_html(&label);
		};

		let mut html = format!(r#"<a href="{}""#, escape_html_attr(&href));
		let target = self.target();
		if !target.as_str().is_empty() {
			html.push_str(&format!(r#" target="{}""#, target.as_str()));
		}
		if let Some(rel) = self.link.rel() {
			html.push_str(&format!(r#" rel="{}""#, rel));
		}
		if let Some(mime_type) = &entity.mime_type {
			html.push_str(&format!(r#" type="{}""#, escape_html_attr(mime_type)));
		}
		html.push('>');
		html.push_str(&escape_html(&label));
		html.push_str("</a>");
		html
	}
}

impl fmt::Display for BoundLink<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.href().unwrap_or_default())
	}
}
