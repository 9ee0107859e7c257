pub use knobs_core::prelude::*;

pub use crate::builder::SettingsBuilder;
pub use knobs_core::value::ValueType;
pub use knobs_core::{AttachedGroup, Group, Owner, Setting, Settings};

// vim: ts=4
