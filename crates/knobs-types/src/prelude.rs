pub use crate::error::{ClResult, Error};
pub use crate::key::SettingKey;
pub use crate::types::{Context, Timestamp, TnId};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
