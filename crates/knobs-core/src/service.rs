//! Settings service: ties groups, the registry and the cached store together

use std::marker::PhantomData;
use std::sync::Arc;

use knobs_types::media_adapter::{MediaAdapter, Upload};
use knobs_types::store_adapter::StoredValue;
use knobs_types::utils::app_label_from_namespace;

use crate::declaration::{Declaration, Setting, Typed};
use crate::group::Group;
use crate::opts::{SettingsOpts, StoreFallback};
use crate::prelude::*;
use crate::registry::Registry;
use crate::store::CachedStore;
use crate::value::{ImageValue, ValueType};

/// What a group is attached to: a namespace, optionally narrowed to a scope
/// (typically the name of a type the settings describe)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Owner {
	namespace: Box<str>,
	scope: Box<str>,
	app: Option<Box<str>>,
}

impl Owner {
	pub fn namespace(namespace: impl Into<Box<str>>) -> Self {
		Self { namespace: namespace.into(), scope: Box::default(), app: None }
	}

	pub fn scoped(namespace: impl Into<Box<str>>, scope: impl Into<Box<str>>) -> Self {
		Self { namespace: namespace.into(), scope: scope.into(), app: None }
	}

	pub fn with_app(mut self, app: impl Into<Box<str>>) -> Self {
		self.app = Some(app.into());
		self
	}

	fn app_for(&self, group: &Group) -> Box<str> {
		self.app
			.as_deref()
			.or(group.app())
			.unwrap_or_else(|| app_label_from_namespace(&self.namespace))
			.into()
	}
}

/// A default installed by [`Settings::install_defaults`]
#[derive(Clone, Debug)]
pub struct DefaultValue {
	pub scope: Box<str>,
	pub name: Box<str>,
	pub value: Box<str>,
}

impl DefaultValue {
	pub fn new(
		scope: impl Into<Box<str>>,
		name: impl Into<Box<str>>,
		value: impl Into<Box<str>>,
	) -> Self {
		Self { scope: scope.into(), name: name.into(), value: value.into() }
	}
}

#[derive(Clone, Debug)]
pub struct Settings {
	registry: Arc<Registry>,
	store: Arc<CachedStore>,
	media: Option<Arc<dyn MediaAdapter>>,
	opts: SettingsOpts,
}

impl Settings {
	pub fn new(
		registry: Arc<Registry>,
		store: Arc<CachedStore>,
		media: Option<Arc<dyn MediaAdapter>>,
		opts: SettingsOpts,
	) -> Self {
		Self { registry, store, media, opts }
	}

	pub fn registry(&self) -> &Arc<Registry> {
		&self.registry
	}

	pub fn store(&self) -> &Arc<CachedStore> {
		&self.store
	}

	pub fn media(&self) -> Option<&Arc<dyn MediaAdapter>> {
		self.media.as_ref()
	}

	pub fn opts(&self) -> &SettingsOpts {
		&self.opts
	}

	/// Attaches a group to its owner: every declaration is copied,
	/// renumbered, keyed and registered
	pub fn attach(&self, group: &Group, owner: Owner) -> ClResult<AttachedGroup> {
		if owner.namespace.is_empty() {
			return Err(Error::DeclarationConflict(format!(
				"Group '{}' attached without a namespace",
				group.name()
			)));
		}
		let app = owner.app_for(group);
		let entries: Vec<Arc<Declaration>> = group
			.declarations()
			.iter()
			.map(|decl| {
				Arc::new(decl.finalize(&owner.namespace, &owner.scope, &app, group.label()))
			})
			.collect();
		for decl in &entries {
			self.registry.register(decl.clone());
		}
		debug!("Attached group {} ({} settings) to {}", group.name(), entries.len(), owner.namespace);

		Ok(AttachedGroup {
			settings: self.clone(),
			group_name: group.name().into(),
			namespace: owner.namespace,
			scope: owner.scope,
			entries,
		})
	}

	/// Attaches a group at namespace level. Its settings can be moved to a
	/// scope later with [`AttachedGroup::bind_scope`].
	pub fn instantiate(&self, group: &Group, namespace: &str) -> ClResult<AttachedGroup> {
		self.attach(group, Owner::namespace(namespace))
	}

	/// Stored value of a declaration, applying the configured store fallback
	pub async fn read_stored(&self, ctx: &Context, decl: &Declaration) -> ClResult<StoredValue> {
		match self.store.get(ctx, decl).await {
			Err(Error::DbError) if self.opts.store_fallback == StoreFallback::UseDefault => {
				warn!("Store unavailable, serving default of {}", decl.key());
				Ok(StoredValue::transient(decl.default_serialized()))
			}
			res => res,
		}
	}

	/// Current value of a declaration in the form an editor shows it
	pub async fn read_editor(&self, ctx: &Context, decl: &Declaration) -> ClResult<String> {
		let stored = self.read_stored(ctx, decl).await?;
		Ok(decl.editor_value(&stored))
	}

	/// Validates user input and stores it if it changes the value.
	/// Returns whether a write happened.
	pub async fn write_input(&self, ctx: &Context, decl: &Declaration, input: &str) -> ClResult<bool> {
		if decl.value().keeps_on_blank() && input.trim().is_empty() {
			return Ok(false);
		}
		let cleaned = decl.clean(input)?;
		self.write_cleaned(ctx, decl, &cleaned).await
	}

	/// Stores an already validated storage-form value if it differs from
	/// the current one
	pub async fn write_cleaned(
		&self,
		ctx: &Context,
		decl: &Declaration,
		serialized: &str,
	) -> ClResult<bool> {
		let stored = self.read_stored(ctx, decl).await?;
		if !decl.value().differs(&stored, serialized) {
			return Ok(false);
		}
		self.store.set(ctx, decl.key(), serialized).await?;
		info!("Updated {} on {}", decl.description(), decl.location());
		Ok(true)
	}

	/// Sets a value by key. The value must parse but the required flag is
	/// not enforced.
	pub async fn set_value(
		&self,
		ctx: &Context,
		namespace: &str,
		scope: &str,
		name: &str,
		value: &str,
	) -> ClResult<bool> {
		let decl = self.registry.lookup(namespace, scope, name)?;
		decl.check(value)?;
		self.write_cleaned(ctx, &decl, value).await
	}

	/// Whether a value is persisted for the key
	pub async fn is_stored(&self, ctx: &Context, key: &SettingKey) -> ClResult<bool> {
		self.store.contains(ctx, key).await
	}

	/// Deletes the stored value so reads return the default again
	pub async fn reset(&self, ctx: &Context, key: &SettingKey) -> ClResult<bool> {
		let deleted = self.store.delete(ctx, key).await?;
		if deleted {
			info!("Reset {} to its default", key);
		}
		Ok(deleted)
	}

	/// Writes each default that has no stored value yet. Returns the number
	/// of values written.
	pub async fn install_defaults(
		&self,
		ctx: &Context,
		namespace: &str,
		defaults: &[DefaultValue],
	) -> ClResult<usize> {
		let app = app_label_from_namespace(namespace);
		if defaults.is_empty() {
			return Err(Error::ConfigError(format!("No defaults were supplied for {}", app)));
		}

		// Every default must resolve and parse before anything is written
		let mut pending = Vec::with_capacity(defaults.len());
		for default in defaults {
			let decl = self.registry.lookup(namespace, &default.scope, &default.name)?;
			decl.check(&default.value)?;
			pending.push((decl, &*default.value));
		}

		let mut installed = 0;
		for (decl, value) in pending {
			if self.store.contains(ctx, decl.key()).await? {
				continue;
			}
			if installed == 0 {
				info!("Installing default settings for {}", app);
			}
			self.store.set(ctx, decl.key(), value).await?;
			installed += 1;
		}
		Ok(installed)
	}
}

/// A group attached to an owner
#[derive(Clone, Debug)]
pub struct AttachedGroup {
	settings: Settings,
	group_name: Box<str>,
	namespace: Box<str>,
	scope: Box<str>,
	entries: Vec<Arc<Declaration>>,
}

impl AttachedGroup {
	pub fn namespace(&self) -> &str {
		&self.namespace
	}

	pub fn scope(&self) -> &str {
		&self.scope
	}

	pub fn keys(&self) -> Vec<&str> {
		self.entries.iter().map(|d| d.name()).collect()
	}

	pub fn declarations(&self) -> &[Arc<Declaration>] {
		&self.entries
	}

	pub fn declaration(&self, name: &str) -> Option<&Arc<Declaration>> {
		self.entries.iter().find(|d| d.name() == name)
	}

	fn location(&self) -> &str {
		if self.scope.is_empty() { &self.namespace } else { &self.scope }
	}

	/// Resolves a handle against this group
	pub fn setting<V: ValueType>(&self, handle: &Setting<V>) -> ClResult<BoundSetting<'_, V>> {
		let decl = self
			.entries
			.iter()
			.find(|d| d.lineage() == handle.lineage())
			.ok_or_else(|| {
				Error::Detached(format!(
					"'{}' is not accessible from {} instances",
					handle.name(),
					self.location()
				))
			})?;
		if decl.typed::<V>().is_none() {
			return Err(Error::Internal(format!("'{}' has a different value type", handle.name())));
		}
		Ok(BoundSetting { settings: &self.settings, decl: decl.clone(), _type: PhantomData })
	}

	pub async fn read<V: ValueType>(&self, ctx: &Context, handle: &Setting<V>) -> ClResult<V::Native> {
		self.setting(handle)?.read(ctx).await
	}

	pub async fn write<V: ValueType>(
		&self,
		ctx: &Context,
		handle: &Setting<V>,
		value: V::Native,
	) -> ClResult<bool> {
		self.setting(handle)?.write(ctx, value).await
	}

	/// Editor-form values of all settings, in declaration order
	pub async fn values(&self, ctx: &Context) -> ClResult<Vec<(&str, String)>> {
		let mut values = Vec::with_capacity(self.entries.len());
		for decl in &self.entries {
			values.push((decl.name(), self.settings.read_editor(ctx, decl).await?));
		}
		Ok(values)
	}

	/// Moves namespace-level settings to a scope and re-registers them under
	/// their final keys. `app` overrides the app label when given.
	pub fn bind_scope(&mut self, scope: &str, app: Option<&str>) -> ClResult<()> {
		if !self.scope.is_empty() {
			return Err(Error::DeclarationConflict(format!(
				"Group '{}' is already bound to {}",
				self.group_name, self.scope
			)));
		}
		if scope.is_empty() {
			return Err(Error::DeclarationConflict("Cannot bind to an empty scope".into()));
		}

		let mut pairs = Vec::with_capacity(self.entries.len());
		for old in &self.entries {
			let mut new = old.with_key(SettingKey::new(&*self.namespace, scope, old.name()));
			if let Some(app) = app {
				new.set_app(app);
			}
			pairs.push((old.clone(), Arc::new(new)));
		}
		self.entries = pairs.iter().map(|(_, new)| new.clone()).collect();
		self.settings.registry.rekey_all(pairs);
		self.scope = scope.into();
		debug!("Bound group {} to {}.{}", self.group_name, self.namespace, self.scope);
		Ok(())
	}
}

/// A setting handle resolved against an attached group
#[derive(Debug)]
pub struct BoundSetting<'a, V: ValueType> {
	settings: &'a Settings,
	decl: Arc<Declaration>,
	_type: PhantomData<fn() -> V>,
}

impl<V: ValueType> BoundSetting<'_, V> {
	pub fn declaration(&self) -> &Arc<Declaration> {
		&self.decl
	}

	fn typed(&self) -> ClResult<&Typed<V>> {
		self.decl
			.typed::<V>()
			.ok_or_else(|| Error::Internal(format!("'{}' has a different value type", self.decl.name())))
	}

	/// Current value. Nothing stored yields the default, a stored value that
	/// does not parse yields the uninitialized value.
	pub async fn read(&self, ctx: &Context) -> ClResult<V::Native> {
		let typed = self.typed()?;
		let stored = self.settings.read_stored(ctx, &self.decl).await?;
		Ok(typed.current(&stored))
	}

	/// Stores a value if it differs from the current one. Returns whether a
	/// write happened.
	pub async fn write(&self, ctx: &Context, value: V::Native) -> ClResult<bool> {
		let typed = self.typed()?;
		if self.read(ctx).await? == value {
			return Ok(false);
		}
		let serialized = typed.value_type.serialize(&value);
		self.decl.check(&serialized)?;
		self.settings.store.set(ctx, self.decl.key(), &serialized).await?;
		info!("Updated {} on {}", self.decl.description(), self.decl.location());
		Ok(true)
	}

	/// Removes the stored value
	pub async fn reset(&self, ctx: &Context) -> ClResult<bool> {
		self.settings.reset(ctx, self.decl.key()).await
	}
}

impl BoundSetting<'_, ImageValue> {
	/// Stores an uploaded image and points the setting at it. An empty
	/// upload keeps the current image.
	pub async fn upload(&self, ctx: &Context, upload: &Upload) -> ClResult<bool> {
		let media = self
			.settings
			.media
			.as_ref()
			.ok_or_else(|| Error::ConfigError("No media adapter configured".into()))?;
		match self.typed()?.value_type.save_upload(&**media, upload).await? {
			Some(path) => self.write(ctx, Some(path)).await,
			None => Ok(false),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::cache::LruCacheAdapter;
	use crate::memory_store::MemoryStoreAdapter;
	use crate::value::{IntegerValue, StringValue};

	fn service() -> (Settings, Arc<MemoryStoreAdapter>) {
		let mem = Arc::new(MemoryStoreAdapter::new());
		let opts = SettingsOpts::default();
		let store = CachedStore::new(mem.clone(), Some(Arc::new(LruCacheAdapter::new(64))), &opts);
		(Settings::new(Arc::new(Registry::new()), Arc::new(store), None, opts), mem)
	}

	#[tokio::test]
	async fn test_attach_registers_in_order() {
		let (settings, _) = service();
		let mut group = Group::new("limits");
		group.declare("low", IntegerValue::new()).build().expect("low");
		group.declare("high", IntegerValue::new()).build().expect("high");

		let attached = settings.attach(&group, Owner::namespace("shop.settings")).expect("attach");
		assert_eq!(attached.keys(), vec!["low", "high"]);
		let names: Vec<String> =
			settings.registry().enumerate_all().iter().map(|d| d.key().to_string()).collect();
		assert_eq!(names, vec!["shop.settings..low", "shop.settings..high"]);
		assert_eq!(attached.declarations()[0].app(), "shop");
	}

	#[tokio::test]
	async fn test_read_write_round_trip() {
		let (settings, mem) = service();
		let mut group = Group::new("g");
		let title = group.declare("title", StringValue::new()).default("Hi".into()).build().expect("title");
		let attached = settings.attach(&group, Owner::namespace("site.settings")).expect("attach");
		let ctx = Context::global();

		assert_eq!(attached.read(&ctx, &title).await.expect("read"), "Hi");
		assert!(attached.write(&ctx, &title, "Hello".into()).await.expect("write"));
		assert!(!attached.write(&ctx, &title, "Hello".into()).await.expect("unchanged"));
		assert_eq!(mem.writes(), 1);
		assert_eq!(attached.read(&ctx, &title).await.expect("read"), "Hello");
	}

	#[tokio::test]
	async fn test_foreign_handle_is_detached() {
		let (settings, _) = service();
		let mut mine = Group::new("mine");
		mine.declare("x", StringValue::new()).build().expect("x");
		let mut theirs = Group::new("theirs");
		let foreign = theirs.declare("x", StringValue::new()).build().expect("x");

		let attached = settings.attach(&mine, Owner::scoped("app.models", "Thing")).expect("attach");
		let err = attached.setting(&foreign).expect_err("detached");
		assert_eq!(err.to_string(), "'x' is not accessible from Thing instances");
	}

	#[tokio::test]
	async fn test_bind_scope_rekeys() {
		let (settings, _) = service();
		let mut group = Group::new("g");
		let color = group.declare("color", StringValue::new()).build().expect("color");
		let mut attached = settings.instantiate(&group, "app.models").expect("instantiate");
		assert!(settings.registry().lookup("app.models", "", "color").is_ok());

		attached.bind_scope("Widget", Some("widgets")).expect("bind");
		assert!(settings.registry().lookup("app.models", "", "color").is_err());
		let decl = settings.registry().lookup("app.models", "Widget", "color").expect("rekeyed");
		assert_eq!(decl.app(), "widgets");
		assert!(attached.setting(&color).is_ok());
		assert!(attached.bind_scope("Other", None).is_err());
	}

	#[tokio::test]
	async fn test_install_defaults() {
		let (settings, _) = service();
		let mut group = Group::new("g");
		group.declare("a", IntegerValue::new()).build().expect("a");
		group.declare("b", IntegerValue::new()).build().expect("b");
		settings.attach(&group, Owner::namespace("app.models")).expect("attach");
		let ctx = Context::global();

		settings.set_value(&ctx, "app.models", "", "a", "1").await.expect("set a");
		let defaults = [DefaultValue::new("", "a", "10"), DefaultValue::new("", "b", "20")];
		assert_eq!(settings.install_defaults(&ctx, "app.models", &defaults).await.expect("install"), 1);
		assert_eq!(settings.install_defaults(&ctx, "app.models", &defaults).await.expect("again"), 0);
		assert!(matches!(
			settings.install_defaults(&ctx, "app.models", &[]).await,
			Err(Error::ConfigError(_))
		));
	}
}

// vim: ts=4
