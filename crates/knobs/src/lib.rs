//! Runtime-editable, typed settings.
//!
//! Settings are declared in code, persisted as strings in a shared store and
//! read back as native values through a cache that stays consistent across
//! processes.
//!
//! # Features
//!
//! - Typed values (numbers, decimals, percentages, text, lists, dates, images, ...)
//! - Reusable groups, composable with `+`
//! - Stable, declaration-ordered registry
//! - Read-through / write-through cache with optional tenant partitioning
//! - UI-agnostic editor model with per-app permissions

#![forbid(unsafe_code)]

// Re-export shared types and adapter traits from knobs-types
pub use knobs_types::cache_adapter;
pub use knobs_types::error;
pub use knobs_types::key;
pub use knobs_types::media_adapter;
pub use knobs_types::store_adapter;
pub use knobs_types::types;
pub use knobs_types::utils;

// Core re-exports
pub use knobs_core::cache;
pub use knobs_core::declaration;
pub use knobs_core::editor;
pub use knobs_core::group;
pub use knobs_core::memory_store;
pub use knobs_core::opts;
pub use knobs_core::registry;
pub use knobs_core::service;
pub use knobs_core::store;
pub use knobs_core::value;

pub use knobs_core::{
	AllowAll, AttachedGroup, BoundSetting, CachedStore, Choice, Declaration, DefaultValue,
	EditorField, EditorOutcome, FieldError, Group, Owner, PermissionCheck, Registry, Setting,
	Settings, SettingsOpts, StoreFallback, Submission,
};

// Local modules
pub mod builder;
pub mod prelude;

pub use builder::SettingsBuilder;

/// Installs a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Returns `false` and leaves the current one in place if a global
/// subscriber is already set.
pub fn init_tracing() -> bool {
	match tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.try_init()
	{
		Ok(()) => true,
		Err(err) => {
			tracing::debug!("Tracing subscriber not installed: {}", err);
			false
		}
	}
}


// vim: ts=4
