//! Shared types, adapter traits, and core utilities for the knobs settings registry.
//!
//! This crate contains the foundational types that are shared between the
//! core crate and all adapter implementations, so adapter crates do not have
//! to depend on the registry itself.

#![forbid(unsafe_code)]

pub mod cache_adapter;
pub mod error;
pub mod key;
pub mod media_adapter;
pub mod prelude;
pub mod store_adapter;
pub mod types;
pub mod utils;

// vim: ts=4
