//! Process-wide registry of setting declarations.
//!
//! Declarations are kept in creation-counter order so enumeration is stable
//! no matter in which order groups were attached.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::declaration::Declaration;
use crate::prelude::*;

/// Declarations sorted by their slot's counter. A slot keeps the counter of
/// the first declaration registered under its key, so replacing a
/// declaration never moves it.
#[derive(Debug, Default)]
struct RegistryInner {
	ordered: Vec<(u64, Arc<Declaration>)>,
	index: HashMap<SettingKey, Arc<Declaration>>,
}

impl RegistryInner {
	/// Returns whether an existing registration was replaced
	fn insert(&mut self, decl: Arc<Declaration>) -> bool {
		if let Some(old) = self.index.insert(decl.key().clone(), decl.clone())
			&& let Some(slot) = self.ordered.iter_mut().find(|(_, d)| Arc::ptr_eq(d, &old))
		{
			debug!("Replacing setting {}", decl.key());
			slot.1 = decl;
			return true;
		}
		let counter = decl.creation_counter();
		let pos = self.ordered.partition_point(|(c, _)| *c <= counter);
		self.ordered.insert(pos, (counter, decl));
		false
	}

	fn remove(&mut self, decl: &Arc<Declaration>) -> bool {
		match self.index.get(decl.key()) {
			Some(current) if Arc::ptr_eq(current, decl) => {
				self.index.remove(decl.key());
				self.ordered.retain(|(_, d)| !Arc::ptr_eq(d, decl));
				true
			}
			_ => false,
		}
	}

	fn filtered(&self, pred: impl Fn(&Declaration) -> bool) -> Vec<Arc<Declaration>> {
		self.ordered.iter().map(|(_, d)| d).filter(|d| pred(d)).cloned().collect()
	}
}

#[derive(Debug, Default)]
pub struct Registry {
	inner: RwLock<RegistryInner>,
}

impl Registry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a declaration. A declaration already registered under the
	/// same key is replaced in place. Returns whether that happened.
	pub fn register(&self, decl: Arc<Declaration>) -> bool {
		debug!("Registering setting: {}", decl.key());
		self.inner.write().insert(decl)
	}

	/// Removes a declaration, but only if this exact declaration is the
	/// registered one. Returns whether it was removed.
	pub fn unregister(&self, decl: &Arc<Declaration>) -> bool {
		self.inner.write().remove(decl)
	}

	/// Moves a declaration to a new key atomically.
	///
	/// The old registration is dropped only if it is `old` itself.
	pub fn rekey(&self, old: &Arc<Declaration>, new: Arc<Declaration>) {
		let mut inner = self.inner.write();
		inner.remove(old);
		debug!("Re-keying setting {} to {}", old.key(), new.key());
		inner.insert(new);
	}

	/// [`Registry::rekey`] for several declarations under one lock
	pub fn rekey_all(&self, pairs: Vec<(Arc<Declaration>, Arc<Declaration>)>) {
		let mut inner = self.inner.write();
		for (old, new) in pairs {
			inner.remove(&old);
			debug!("Re-keying setting {} to {}", old.key(), new.key());
			inner.insert(new);
		}
	}

	pub fn get(&self, key: &SettingKey) -> Option<Arc<Declaration>> {
		self.inner.read().index.get(key).cloned()
	}

	pub fn lookup(&self, namespace: &str, scope: &str, name: &str) -> ClResult<Arc<Declaration>> {
		let key = SettingKey::new(namespace, scope, name);
		self.get(&key).ok_or_else(|| {
			warn!("Unknown setting: {}", key);
			Error::UnknownSetting(key.to_string())
		})
	}

	/// All declarations in creation order
	pub fn enumerate_all(&self) -> Vec<Arc<Declaration>> {
		self.inner.read().filtered(|_| true)
	}

	pub fn enumerate_by_namespace(&self, namespace: &str) -> Vec<Arc<Declaration>> {
		self.inner.read().filtered(|d| d.namespace() == namespace)
	}

	pub fn enumerate_by_app(&self, app: &str) -> Vec<Arc<Declaration>> {
		self.inner.read().filtered(|d| d.app() == app)
	}

	pub fn len(&self) -> usize {
		self.inner.read().ordered.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.read().ordered.is_empty()
	}

	pub fn clear(&self) {
		let mut inner = self.inner.write();
		inner.ordered.clear();
		inner.index.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value::StringValue;

	fn decl(ns: &str, scope: &str, name: &str) -> Arc<Declaration> {
		Arc::new(Declaration::new(name, StringValue::new(), None).finalize(ns, scope, "app", ""))
	}

	fn names(decls: &[Arc<Declaration>]) -> Vec<&str> {
		decls.iter().map(|d| d.name()).collect()
	}

	#[test]
	fn test_enumeration_follows_counter() {
		let registry = Registry::new();
		let a = decl("app.models", "", "a");
		let b = decl("app.models", "", "b");
		let c = decl("other.models", "", "c");
		registry.register(c.clone());
		registry.register(a.clone());
		registry.register(b.clone());
		assert_eq!(names(&registry.enumerate_all()), vec!["a", "b", "c"]);
		assert_eq!(names(&registry.enumerate_by_namespace("app.models")), vec!["a", "b"]);
	}

	#[test]
	fn test_register_replaces_same_key() {
		let registry = Registry::new();
		let first = decl("app.models", "", "x");
		let second = decl("app.models", "", "x");
		registry.register(first.clone());
		registry.register(second.clone());
		assert_eq!(registry.len(), 1);
		let found = registry.lookup("app.models", "", "x").expect("registered");
		assert!(Arc::ptr_eq(&found, &second));
	}

	#[test]
	fn test_insert_after_replace_stays_ordered() {
		let registry = Registry::new();
		let a = decl("app.models", "", "a");
		let b = decl("app.models", "", "b");
		registry.register(a.clone());
		registry.register(b.clone());
		registry.register(decl("app.models", "", "a"));
		registry.register(decl("app.models", "", "c"));
		assert_eq!(names(&registry.enumerate_all()), vec!["a", "b", "c"]);
	}

	#[test]
	fn test_replace_keeps_position() {
		let registry = Registry::new();
		let a = decl("app.models", "", "a");
		let b = decl("app.models", "", "b");
		let c = decl("app.models", "", "c");
		assert!(!registry.register(a.clone()));
		assert!(!registry.register(b.clone()));
		assert!(!registry.register(c.clone()));

		let new_b = decl("app.models", "", "b");
		assert!(registry.register(new_b.clone()));
		let new_a = decl("app.models", "", "a");
		assert!(registry.register(new_a.clone()));

		let all = registry.enumerate_all();
		assert_eq!(names(&all), vec!["a", "b", "c"]);
		assert!(Arc::ptr_eq(&all[0], &new_a));
		assert!(Arc::ptr_eq(&all[1], &new_b));
		assert_eq!(names(&registry.enumerate_by_namespace("app.models")), vec!["a", "b", "c"]);
	}

	#[test]
	fn test_unregister_checks_identity() {
		let registry = Registry::new();
		let first = decl("app.models", "", "x");
		let second = decl("app.models", "", "x");
		registry.register(second.clone());
		assert!(!registry.unregister(&first));
		assert_eq!(registry.len(), 1);
		assert!(registry.unregister(&second));
		assert!(registry.is_empty());
	}

	#[test]
	fn test_rekey() {
		let registry = Registry::new();
		let old = decl("app.models", "", "x");
		registry.register(old.clone());
		let new = Arc::new(old.with_key(SettingKey::new("app.models", "Thing", "x")));
		registry.rekey(&old, new);
		assert!(registry.get(old.key()).is_none());
		assert!(registry.lookup("app.models", "Thing", "x").is_ok());
	}

	#[test]
	fn test_lookup_unknown() {
		let registry = Registry::new();
		assert!(matches!(registry.lookup("a", "", "b"), Err(Error::UnknownSetting(_))));
	}

	#[test]
	fn test_enumerate_by_app() {
		let registry = Registry::new();
		registry.register(decl("shop.models", "", "x"));
		assert_eq!(registry.enumerate_by_app("app").len(), 1);
		assert!(registry.enumerate_by_app("shop").is_empty());
	}
}

// vim: ts=4
