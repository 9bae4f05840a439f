//! Process-wide link settings
//!
//! Settings are read once at start-up from the `[link]` table of a TOML file.
//! Every key is optional:
//!
//! ```toml
//! [link]
//! max_length = 2000
//! default_types = ["page", "input"]
//! allow_target = false
//! allow_label = true
//! allow_no_follow = false
//! strict_input_urls = false
//! ```

use crate::error::LinkResult;
use crate::link::LinkConfig;
use crate::link_types::InputType;
use crate::model_field::{DEFAULT_MAX_LENGTH, LinkModelField};
use crate::registry::LinkTypeManager;
use crate::sources::{MediaFile, ModelSource, Page};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Error type for loading settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("Invalid link setting: {0}")]
	Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSettings {
	/// Maximum length of the stored JSON string
	pub max_length: usize,
	/// Types offered by fields that do not name their own; empty offers all
	pub default_types: Vec<String>,
	pub allow_target: bool,
	pub allow_label: bool,
	pub allow_no_follow: bool,
	/// Require free-text links to be http(s) URLs or site-relative
	pub strict_input_urls: bool,
}

impl Default for LinkSettings {
	fn default() -> Self {
		Self {
			max_length: DEFAULT_MAX_LENGTH,
			default_types: Vec::new(),
			allow_target: false,
			allow_label: true,
			allow_no_follow: false,
			strict_input_urls: false,
		}
	}
}

#[derive(Deserialize)]
struct SettingsFile {
	#[serde(default)]
	link: LinkSettings,
}

impl LinkSettings {
	/// Parse settings from TOML text
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_link::settings::LinkSettings;
	///
	/// let settings = LinkSettings::from_toml_str("[link]\nmax_length = 512\n").unwrap();
	/// assert_eq!(settings.max_length, 512);
	/// assert!(settings.allow_label);
	///
	/// assert_eq!(LinkSettings::from_toml_str("").unwrap(), LinkSettings::default());
	/// ```
	pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
		let file: SettingsFile = toml::from_str(s)?;
		file.link.validate()?;
		Ok(file.link)
	}

	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let path = path.as_ref();
		let content = fs::read_to_string(path)?;
		let settings = Self::from_toml_str(&content)?;
		tracing::debug!(path = %path.display(), "loaded link settings");
		Ok(settings)
	}

	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.max_length == 0 {
			return Err(SettingsError::Invalid(
				"max_length must be greater than zero".to_string(),
			));
		}
		if let Some(blank) = self.default_types.iter().find(|t| t.trim().is_empty()) {
			return Err(SettingsError::Invalid(format!(
				"default_types contains a blank identifier: {:?}",
				blank
			)));
		}
		Ok(())
	}

	/// Field configuration derived from these settings
	pub fn config(&self) -> LinkConfig {
		LinkConfig::new()
			.with_types(self.default_types.iter().cloned())
			.allow_target(self.allow_target)
			.allow_label(self.allow_label)
			.allow_no_follow(self.allow_no_follow)
	}

	pub fn input_type(&self) -> InputType {
		InputType::new().strict(self.strict_input_urls)
	}

	/// Registry with the standard types, honouring `strict_input_urls`
	pub fn registry<P, F>(&self, pages: Arc<P>, files: Arc<F>) -> LinkResult<LinkTypeManager>
	where
		P: ModelSource<Model = Page> + 'static,
		F: ModelSource<Model = MediaFile> + 'static,
	{
		LinkTypeManager::builder()
			.default_types(pages, files, self.input_type())
			.build()
	}

	/// Model field using these settings
	///
	/// Fails when `default_types` names a type the registry does not know.
	pub fn model_field(&self, registry: Arc<LinkTypeManager>) -> LinkResult<LinkModelField> {
		for identifier in &self.default_types {
			registry.get(identifier)?;
		}
		Ok(LinkModelField::new(registry)
			.with_max_length(self.max_length)
			.with_config(self.config()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::LinkError;
	use crate::sources::InMemorySource;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	fn test_settings_from_toml() {
		// Arrange
		let toml = r#"
			[link]
			default_types = ["page", "input"]
			allow_target = false
			allow_no_follow = true
			strict_input_urls = true
		"#;

		// Act
		let settings = LinkSettings::from_toml_str(toml).unwrap();

		// Assert
		assert_eq!(settings.max_length, DEFAULT_MAX_LENGTH);
		let config = settings.config();
		assert_eq!(config.types, vec!["page".to_string(), "input".to_string()]);
		assert!(config.allow_target);
		assert!(config.allow_label);
		assert!(config.allow_no_follow);
	}

	#[rstest]
	fn test_settings_defaults() {
		// Act
		let config = LinkSettings::default().config();

		// Assert
		assert_eq!(config, LinkConfig::default());
		assert_eq!(LinkSettings::default().max_length, 2000);
	}

	#[rstest]
	#[case("[link]\nmax_length = 0\n")]
	#[case("[link]\ndefault_types = [\"page\", \" \"]\n")]
	fn test_settings_invalid(#[case] toml: &str) {
		assert!(matches!(
			LinkSettings::from_toml_str(toml),
			Err(SettingsError::Invalid(_))
		));
	}

	#[rstest]
	fn test_settings_malformed_toml() {
		assert!(matches!(
			LinkSettings::from_toml_str("[link\n"),
			Err(SettingsError::Toml(_))
		));
	}

	#[rstest]
	fn test_settings_from_file() {
		// Arrange
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "[link]\nmax_length = 300").unwrap();

		// Act
		let settings = LinkSettings::from_file(file.path()).unwrap();

		// Assert
		assert_eq!(settings.max_length, 300);
	}

	#[rstest]
	fn test_settings_missing_file() {
		assert!(matches!(
			LinkSettings::from_file("/nonexistent/link.toml"),
			Err(SettingsError::Io(_))
		));
	}

	#[rstest]
	fn test_model_field_rejects_unregistered_default_type() {
		// Arrange
		let settings = LinkSettings {
			default_types: vec!["anchor".to_string()],
			..LinkSettings::default()
		};
		let registry = Arc::new(
			settings
				.registry(
					Arc::new(InMemorySource::<Page>::new("page")),
					Arc::new(InMemorySource::<MediaFile>::new("file")),
				)
				.unwrap(),
		);

		// Act
		let result = settings.model_field(registry);

		// Assert
		assert!(matches!(result, Err(LinkError::UnknownLinkType(id)) if id == "anchor"));
	}
}
