//! Runtime options of the settings layer

use std::fmt;
use std::str::FromStr;

use crate::prelude::*;

pub const DEFAULT_VALUE_LENGTH: usize = 255;
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// What a read does when the durable store fails
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreFallback {
	/// Return the store error to the caller
	#[default]
	Propagate,
	/// Log the error and serve the declared default
	UseDefault,
}

impl FromStr for StoreFallback {
	type Err = Error;

	fn from_str(s: &str) -> ClResult<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"propagate" => Ok(Self::Propagate),
			"default" | "use_default" => Ok(Self::UseDefault),
			other => Err(Error::ConfigError(format!("Invalid store fallback: {}", other))),
		}
	}
}

impl fmt::Display for StoreFallback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Propagate => write!(f, "propagate"),
			Self::UseDefault => write!(f, "default"),
		}
	}
}

#[derive(Clone, Debug)]
pub struct SettingsOpts {
	/// Cache values between reads. Without it every read hits the store.
	pub use_cache: bool,
	/// Partition stored values and cache entries by tenant
	pub use_tenants: bool,
	/// Maximum length of a serialized value
	pub value_length: usize,
	/// Capacity of the in-process cache
	pub cache_capacity: usize,
	pub store_fallback: StoreFallback,
}

impl Default for SettingsOpts {
	fn default() -> Self {
		Self {
			use_cache: true,
			use_tenants: false,
			value_length: DEFAULT_VALUE_LENGTH,
			cache_capacity: DEFAULT_CACHE_CAPACITY,
			store_fallback: StoreFallback::Propagate,
		}
	}
}

fn parse_bool(name: &str, value: &str) -> ClResult<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(Error::ConfigError(format!("{} must be a boolean, got '{}'", name, value))),
	}
}

fn parse_usize(name: &str, value: &str) -> ClResult<usize> {
	match value.trim().parse::<usize>() {
		Ok(n) if n > 0 => Ok(n),
		_ => Err(Error::ConfigError(format!("{} must be a positive number, got '{}'", name, value))),
	}
}

impl SettingsOpts {
	/// Loads options from `KNOBS_*` environment variables, unset ones keep their default
	pub fn from_env() -> ClResult<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClResult<Self> {
		let mut opts = Self::default();
		if let Some(v) = lookup("KNOBS_USE_CACHE") {
			opts.use_cache = parse_bool("KNOBS_USE_CACHE", &v)?;
		}
		if let Some(v) = lookup("KNOBS_USE_TENANTS") {
			opts.use_tenants = parse_bool("KNOBS_USE_TENANTS", &v)?;
		}
		if let Some(v) = lookup("KNOBS_VALUE_LENGTH") {
			opts.value_length = parse_usize("KNOBS_VALUE_LENGTH", &v)?;
		}
		if let Some(v) = lookup("KNOBS_CACHE_SIZE") {
			opts.cache_capacity = parse_usize("KNOBS_CACHE_SIZE", &v)?;
		}
		if let Some(v) = lookup("KNOBS_STORE_FALLBACK") {
			opts.store_fallback = v.parse()?;
		}
		Ok(opts)
	}
}


// vim: ts=4
