//! Utility functions

/// Uppercases the first character, leaves the rest untouched
///
/// # Examples
/// - `"max items"` → `"Max items"`
/// - `"API key"` → `"API key"`
pub fn capfirst(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(c) => c.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Derives the app label from a dotted namespace: the second to last segment,
/// or the whole namespace when it has no dots.
///
/// # Examples
/// - `"shop.settings"` → `"shop"`
/// - `"site.shop.models"` → `"shop"`
/// - `"shop"` → `"shop"`
pub fn app_label_from_namespace(namespace: &str) -> &str {
	let mut parts = namespace.rsplit('.');
	let _last = parts.next();
	parts.next().unwrap_or(namespace)
}

/// Human-readable label derived from an attribute name
pub fn description_from_name(name: &str) -> String {
	name.replace('_', " ")
}


// vim: ts=4
