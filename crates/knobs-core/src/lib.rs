//! Core of the knobs settings registry.
//!
//! Settings are declared on [`group::Group`]s, attached to an owner through
//! the [`service::Settings`] service, and read or written as native values.
//! Every value lives in a durable store as a string and is served through a
//! shared cache.

#![forbid(unsafe_code)]

pub mod cache;
pub mod declaration;
pub mod editor;
pub mod group;
pub mod memory_store;
pub mod opts;
pub mod prelude;
pub mod registry;
pub mod service;
pub mod store;
pub mod value;

pub use declaration::{Choice, Declaration, Setting};
pub use editor::{AllowAll, EditorField, EditorOutcome, FieldError, PermissionCheck, Submission};
pub use group::Group;
pub use opts::{SettingsOpts, StoreFallback};
pub use registry::Registry;
pub use service::{AttachedGroup, BoundSetting, DefaultValue, Owner, Settings};
pub use store::CachedStore;

// vim: ts=4
