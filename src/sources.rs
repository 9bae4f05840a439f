//! Entity lookup for model-backed link types
//!
//! Link types never talk to a database directly. They resolve primary keys
//! through a [`ModelSource`], which a host application implements on top of
//! its ORM. [`InMemorySource`] is provided for tests and small sites.

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A model instance that can be the target of a link
pub trait LinkModel: Clone + Send + Sync {
	/// Primary key in its string form, as submitted by choice widgets
	fn pk(&self) -> String;

	/// Primary key as stored inside the link payload
	fn pk_value(&self) -> Value {
		Value::String(self.pk())
	}

	/// Human readable label, used when the link has no label override
	fn label(&self) -> String;

	/// Public URL of the instance, if it currently has one
	fn href(&self) -> Option<String>;

	/// Content type of the resource behind `href`, for downloadable files
	fn mime_type(&self) -> Option<String> {
		None
	}
}

/// Read access to the instances a model-backed link type can point at
pub trait ModelSource: Send + Sync {
	type Model: LinkModel;

	/// Name of the model, used in log output and entity kinds
	fn model_name(&self) -> &str;

	fn get(&self, pk: &str) -> Option<Self::Model>;

	/// Every selectable instance, in display order
	fn all(&self) -> Vec<Self::Model>;
}

/// A CMS page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
	pub id: i64,
	pub title: String,
	/// Absolute path of the page, e.g. `/blog/hello/`
	pub path: String,
	pub published: bool,
}

impl Page {
	pub fn new(id: i64, title: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			id,
			title: title.into(),
			path: path.into(),
			published: true,
		}
	}

	pub fn unpublished(mut self) -> Self {
		self.published = false;
		self
	}
}

impl LinkModel for Page {
	fn pk(&self) -> String {
		self.id.to_string()
	}

	fn pk_value(&self) -> Value {
		Value::from(self.id)
	}

	fn label(&self) -> String {
		self.title.clone()
	}

	fn href(&self) -> Option<String> {
		// Drafts keep their link but have no public URL yet
		self.published.then(|| self.path.clone())
	}
}

/// An uploaded media file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFile {
	pub id: Uuid,
	pub filename: String,
	pub url: String,
	pub mime_type: String,
}

impl MediaFile {
	pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
		let filename = filename.into();
		let mime_type = mime_guess::from_path(&filename)
			.first_or_octet_stream()
			.to_string();
		Self {
			id: Uuid::new_v4(),
			filename,
			url: url.into(),
			mime_type,
		}
	}
}

impl LinkModel for MediaFile {
	fn pk(&self) -> String {
		self.id.to_string()
	}

	fn label(&self) -> String {
		self.filename.clone()
	}

	fn href(&self) -> Option<String> {
		Some(self.url.clone())
	}

	fn mime_type(&self) -> Option<String> {
		Some(self.mime_type.clone())
	}
}

/// A [`ModelSource`] backed by an insertion-ordered map
///
/// # Examples
///
/// ```
/// use reinhardt_link::sources::{InMemorySource, ModelSource, Page};
///
/// let pages = InMemorySource::new("page");
/// pages.insert(Page::new(1, "Home", "/"));
/// assert_eq!(pages.get("1").map(|p| p.title), Some("Home".to_string()));
///
/// pages.remove("1");
/// assert!(pages.get("1").is_none());
/// ```
pub struct InMemorySource<M: LinkModel> {
	model_name: String,
	items: RwLock<IndexMap<String, M>>,
}

impl<M: LinkModel> InMemorySource<M> {
	pub fn new(model_name: impl Into<String>) -> Self {
		Self {
			model_name: model_name.into(),
			items: RwLock::new(IndexMap::new()),
		}
	}

	pub fn with_items(model_name: impl Into<String>, items: impl IntoIterator<Item = M>) -> Self {
		let source = Self::new(model_name);
		for item in items {
			source.insert(item);
		}
		source
	}

	/// Insert or replace an instance, keyed by its primary key
	pub fn insert(&self, item: M) {
		self.items.write().insert(item.pk(), item);
	}

	pub fn remove(&self, pk: &str) -> Option<M> {
		self.items.write().shift_remove(pk)
	}

	pub fn len(&self) -> usize {
		self.items.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.read().is_empty()
	}
}

impl<M: LinkModel> ModelSource for InMemorySource<M> {
	type Model = M;

	fn model_name(&self) -> &str {
		&self.model_name
	}

	fn get(&self, pk: &str) -> Option<M> {
		self.items.read().get(pk).cloned()
	}

	fn all(&self) -> Vec<M> {
		self.items.read().values().cloned().collect()
	}
}
