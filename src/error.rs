//! Link error types

use thiserror::Error;

/// Errors raised by the link registry and storage layers
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum LinkError {
	/// Identifier is not present in the registry
	#[error("Unknown link type: {0}")]
	UnknownLinkType(String),

	/// Identifier was registered twice
	#[error("Link type already registered: {0}")]
	DuplicateLinkType(String),

	/// Stored value is not valid link JSON
	#[error("Invalid stored link: {0}")]
	Serialization(#[from] serde_json::Error),

	/// Serialized link does not fit the storage column
	#[error("Serialized link is {length} characters long, the maximum is {max_length}")]
	TooLong { length: usize, max_length: usize },
}

/// Result type for link operations
pub type LinkResult<T> = Result<T, LinkError>;
