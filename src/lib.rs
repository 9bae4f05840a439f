//! # Reinhardt Link
//!
//! A single model field that can point at one of several kinds of target:
//! an internal page, an uploaded file, a free-text URL, an email address or a
//! phone number.
//!
//! ## Pieces
//!
//! - [`Link`] is the stored value: the active type, its payload and optional
//!   label/target/nofollow overrides, persisted as one JSON string.
//! - [`LinkType`] implementations resolve a payload to a [`LinkEntity`] and
//!   supply the sub-form that edits it.
//! - [`LinkTypeManager`] is the immutable registry of types, built once at
//!   start-up.
//! - [`LinkFormField`] and [`LinkWidget`] handle editing; [`LinkModelField`]
//!   handles the database column.
//!
//! ## Example
//!
//! ```
//! use reinhardt_link::{LinkConfig, LinkFormField, LinkTypeManager};
//! use reinhardt_link::sources::{InMemorySource, MediaFile, Page};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let pages = Arc::new(InMemorySource::with_items("page", [Page::new(1, "Home", "/")]));
//! let files = Arc::new(InMemorySource::<MediaFile>::new("file"));
//! let registry = Arc::new(LinkTypeManager::with_defaults(pages, files));
//!
//! let field = LinkFormField::new("cta", registry.clone(), LinkConfig::new());
//! let link = field
//!     .clean_link(Some(&json!({"type": "page", "value": {"page": "1"}})))
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(registry.bind(&link).unwrap().href().as_deref(), Some("/"));
//! ```

pub mod error;
pub mod field;
pub mod fields;
pub mod form;
pub mod html;
pub mod link;
pub mod link_field;
pub mod link_types;
pub mod model_field;
pub mod registry;
pub mod settings;
pub mod sources;
pub mod validators;
pub mod widget;

pub use error::{LinkError, LinkResult};
pub use field::{FieldError, FieldResult, FormField, Widget};
pub use fields::{BooleanField, CharField, ChoiceField, ModelChoiceField};
pub use form::{Form, FormError, FormResult};
pub use link::{Link, LinkConfig, Target};
pub use link_field::LinkFormField;
pub use link_types::{EntityKind, LinkEntity, LinkType};
pub use model_field::LinkModelField;
pub use registry::{BoundLink, LinkTypeManager, LinkTypeManagerBuilder};
pub use settings::{LinkSettings, SettingsError};
pub use sources::{LinkModel, ModelSource};
pub use widget::{LinkWidget, WidgetContext};
