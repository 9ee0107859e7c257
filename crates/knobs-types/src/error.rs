//! Error type shared by the registry, the cache layer and the adapters.

use std::fmt;

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// A group or declaration is malformed (bad name, duplicate name, type clash).
	/// Raised while settings are being declared and aborts startup.
	DeclarationConflict(String),
	/// User-supplied input failed to parse or validate
	ValidationError(String),
	/// A setting key that was never registered
	UnknownSetting(String),
	/// A setting handle used outside of the group it was declared on
	Detached(String),
	/// The durable store could not be reached or failed the query
	DbError,
	NotFound,
	ConfigError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl Error {
	/// Message suitable for showing next to a form field
	pub fn user_message(&self) -> String {
		match self {
			Error::ValidationError(msg) => msg.clone(),
			err => err.to_string(),
		}
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::DeclarationConflict(msg) => write!(f, "declaration conflict: {}", msg),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::UnknownSetting(key) => write!(f, "unknown setting: {}", key),
			Error::Detached(msg) => write!(f, "{}", msg),
			Error::DbError => write!(f, "settings store unavailable"),
			Error::NotFound => write!(f, "not found"),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_user_message_strips_prefix() {
		let err = Error::ValidationError("Enter a whole number.".into());
		assert_eq!(err.user_message(), "Enter a whole number.");
		assert_eq!(err.to_string(), "validation error: Enter a whole number.");
	}

	#[test]
	fn test_io_error_source() {
		let err: Error = std::io::Error::other("disk gone").into();
		assert!(std::error::Error::source(&err).is_some());
		assert!(matches!(Error::DbError, Error::DbError));
	}
}

// vim: ts=4
