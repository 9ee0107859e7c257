pub use knobs_types::prelude::*;

// vim: ts=4
