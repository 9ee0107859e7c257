//! Settings service tests
//!
//! Declares groups, attaches them and reads/writes values through the cached
//! store, checking ordering, defaults, change detection and cache consistency

#![allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use chrono::{NaiveDate, TimeDelta};
use knobs::cache::LruCacheAdapter;
use knobs::memory_store::MemoryStoreAdapter;
use knobs::prelude::*;
use knobs::value::{
	BooleanValue, DateTimeValue, DateValue, DecimalValue, DurationValue, IntegerValue, MultiSeparatorValue,
	StringValue,
};
use knobs::{DefaultValue, StoreFallback};
use rust_decimal::Decimal;

fn build(mem: &Arc<MemoryStoreAdapter>) -> Settings {
	knobs::init_tracing();
	SettingsBuilder::new().store_adapter(mem.clone()).build().expect("build")
}

#[tokio::test]
async fn test_unpopulated_reads_defaults() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut group = Group::new("shop");
	let title = group.declare("title", StringValue::new()).default("My shop".into()).build().unwrap();
	let limit = group.declare("limit", IntegerValue::new()).build().unwrap();
	let price = group.declare("price", DecimalValue::new()).default(Some(Decimal::new(995, 2))).build().unwrap();
	let open = group.declare("open", BooleanValue::new()).build().unwrap();
	let tags = group.declare("tags", MultiSeparatorValue::new()).build().unwrap();
	let shop = settings.attach(&group, Owner::namespace("shop.settings")).unwrap();

	assert_eq!(shop.read(&ctx, &title).await.unwrap(), "My shop");
	assert_eq!(shop.read(&ctx, &limit).await.unwrap(), None);
	assert_eq!(shop.read(&ctx, &price).await.unwrap(), Some(Decimal::new(995, 2)));
	assert!(!shop.read(&ctx, &open).await.unwrap());
	assert!(shop.read(&ctx, &tags).await.unwrap().is_empty());
	assert_eq!(mem.writes(), 0, "Reading defaults must not write");
}

#[tokio::test]
async fn test_populated_reads_stored_values() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut group = Group::new("shop");
	let tags = group.declare("tags", MultiSeparatorValue::new()).build().unwrap();
	let opens = group.declare("opens", DateValue::new()).build().unwrap();
	let timeout = group.declare("timeout", DurationValue::new()).build().unwrap();
	let shop = settings.attach(&group, Owner::namespace("shop.settings")).unwrap();

	assert!(settings.set_value(&ctx, "shop.settings", "", "tags", "a ; b;c ").await.unwrap());
	assert!(settings.set_value(&ctx, "shop.settings", "", "opens", "2024-03-01").await.unwrap());
	assert!(settings.set_value(&ctx, "shop.settings", "", "timeout", "90").await.unwrap());

	assert_eq!(shop.read(&ctx, &tags).await.unwrap(), vec!["a", "b", "c"]);
	assert_eq!(shop.read(&ctx, &opens).await.unwrap(), NaiveDate::from_ymd_opt(2024, 3, 1));
	assert_eq!(shop.read(&ctx, &timeout).await.unwrap(), Some(TimeDelta::seconds(90)));

	let err = settings.set_value(&ctx, "shop.settings", "", "opens", "someday").await.unwrap_err();
	assert_eq!(err.user_message(), "Enter a valid date.");
	let err = settings.set_value(&ctx, "shop.settings", "", "missing", "1").await.unwrap_err();
	assert!(matches!(err, Error::UnknownSetting(_)));
}

#[tokio::test]
async fn test_unparsable_stored_value_reads_uninitialized() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut group = Group::new("shop");
	let limit = group.declare("limit", IntegerValue::new()).default(Some(3)).build().unwrap();
	let shop = settings.attach(&group, Owner::namespace("shop.settings")).unwrap();

	settings.store().set(&ctx, &SettingKey::new("shop.settings", "", "limit"), "lots").await.unwrap();
	assert_eq!(shop.read(&ctx, &limit).await.unwrap(), None);
}

#[tokio::test]
async fn test_ordering_follows_declaration() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);

	let mut group = Group::new("shop");
	group.declare("zeta", StringValue::new()).build().unwrap();
	group.declare("alpha", StringValue::new()).build().unwrap();
	group.declare("mid", StringValue::new()).build().unwrap();
	assert_eq!(group.keys(), vec!["zeta", "alpha", "mid"]);

	let shop = settings.attach(&group, Owner::namespace("shop.settings")).unwrap();
	assert_eq!(shop.keys(), vec!["zeta", "alpha", "mid"]);

	let names: Vec<String> = settings
		.registry()
		.enumerate_by_namespace("shop.settings")
		.iter()
		.map(|d| d.name().to_owned())
		.collect();
	assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[tokio::test]
async fn test_group_composition() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut mail = Group::new("mail");
	let host = mail.declare("host", StringValue::new()).default("localhost".into()).build().unwrap();
	mail.declare("port", IntegerValue::new()).default(Some(25)).build().unwrap();
	let mut ui = Group::new("ui");
	let theme = ui.declare("theme", StringValue::new()).default("light".into()).build().unwrap();

	// each part used on its own elsewhere
	settings.attach(&mail, Owner::namespace("mail.settings")).unwrap();
	settings.attach(&ui, Owner::namespace("ui.settings")).unwrap();

	let combined = (&mail + &ui).unwrap();
	assert_eq!(combined.keys(), vec!["host", "port", "theme"]);

	let site = settings.attach(&combined, Owner::namespace("site.settings")).unwrap();
	assert_eq!(site.keys(), vec!["host", "port", "theme"]);
	assert_eq!(site.read(&ctx, &host).await.unwrap(), "localhost");
	assert!(site.write(&ctx, &theme, "dark".into()).await.unwrap());
	assert_eq!(site.read(&ctx, &theme).await.unwrap(), "dark");

	let err = (&mail + &mail).unwrap_err();
	assert!(matches!(err, Error::DeclarationConflict(_)));
}

#[tokio::test]
async fn test_unchanged_write_is_skipped() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut group = Group::new("shop");
	let limit = group.declare("limit", IntegerValue::new()).default(Some(10)).build().unwrap();
	let shop = settings.attach(&group, Owner::namespace("shop.settings")).unwrap();

	// writing the default over nothing stored changes nothing
	assert!(!shop.write(&ctx, &limit, Some(10)).await.unwrap());
	assert_eq!(mem.writes(), 0);
	assert_eq!(settings.store().stats().invalidations(), 0);

	assert!(shop.write(&ctx, &limit, Some(11)).await.unwrap());
	assert_eq!(mem.writes(), 1);
	let invalidations = settings.store().stats().invalidations();

	assert!(!shop.write(&ctx, &limit, Some(11)).await.unwrap());
	assert_eq!(mem.writes(), 1);
	assert_eq!(settings.store().stats().invalidations(), invalidations);
}

#[tokio::test]
async fn test_unchanged_subsecond_write_is_skipped() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut group = Group::new("shop");
	let opens = group.declare("opens", DateTimeValue::new()).build().unwrap();
	let shop = settings.attach(&group, Owner::namespace("shop.settings")).unwrap();

	let at = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_milli_opt(14, 30, 0, 250);
	assert!(shop.write(&ctx, &opens, at).await.unwrap());
	assert!(!shop.write(&ctx, &opens, at).await.unwrap());
	assert!(!shop.write(&ctx, &opens, at).await.unwrap());
	assert_eq!(mem.writes(), 1);
	assert_eq!(shop.read(&ctx, &opens).await.unwrap(), at);

	assert!(!settings.set_value(&ctx, "shop.settings", "", "opens", "2024-03-09 14:30:00.25").await.unwrap());
	assert_eq!(mem.writes(), 1);
}

#[tokio::test]
async fn test_shared_cache_stays_consistent() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let cache = Arc::new(LruCacheAdapter::new(64));
	let first = SettingsBuilder::new()
		.store_adapter(mem.clone())
		.cache_adapter(cache.clone())
		.build()
		.unwrap();
	let second = SettingsBuilder::new()
		.store_adapter(mem.clone())
		.cache_adapter(cache.clone())
		.build()
		.unwrap();
	let ctx = Context::global();

	let mut group = Group::new("shop");
	let title = group.declare("title", StringValue::new()).default("Old".into()).build().unwrap();
	let a = first.attach(&group, Owner::namespace("shop.settings")).unwrap();
	let b = second.attach(&group, Owner::namespace("shop.settings")).unwrap();

	assert_eq!(b.read(&ctx, &title).await.unwrap(), "Old");
	assert!(a.write(&ctx, &title, "New".into()).await.unwrap());
	assert_eq!(b.read(&ctx, &title).await.unwrap(), "New");

	// served from the cache from now on
	let reads = mem.reads();
	b.read(&ctx, &title).await.unwrap();
	a.read(&ctx, &title).await.unwrap();
	assert_eq!(mem.reads(), reads);
}

#[tokio::test]
async fn test_out_of_band_delete_after_invalidation() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut group = Group::new("shop");
	let limit = group.declare("limit", IntegerValue::new()).default(Some(5)).build().unwrap();
	let shop = settings.attach(&group, Owner::namespace("shop.settings")).unwrap();
	let key = SettingKey::new("shop.settings", "", "limit");

	shop.write(&ctx, &limit, Some(7)).await.unwrap();
	assert_eq!(shop.read(&ctx, &limit).await.unwrap(), Some(7));

	assert!(mem.remove_row(None, &key));
	assert_eq!(shop.read(&ctx, &limit).await.unwrap(), Some(7), "Cached until invalidated");

	settings.store().invalidate(&ctx, &key).await;
	assert_eq!(shop.read(&ctx, &limit).await.unwrap(), Some(5));
	assert!(!settings.is_stored(&ctx, &key).await.unwrap());
}

#[tokio::test]
async fn test_reset_restores_default() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut group = Group::new("shop");
	let title = group.declare("title", StringValue::new()).default("Shop".into()).build().unwrap();
	let shop = settings.attach(&group, Owner::namespace("shop.settings")).unwrap();

	shop.write(&ctx, &title, "Renamed".into()).await.unwrap();
	let bound = shop.setting(&title).unwrap();
	assert!(bound.reset(&ctx).await.unwrap());
	assert!(!bound.reset(&ctx).await.unwrap());
	assert_eq!(bound.read(&ctx).await.unwrap(), "Shop");
}

#[tokio::test]
async fn test_store_outage() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let strict = build(&mem);
	let lenient = SettingsBuilder::new()
		.store_adapter(mem.clone())
		.use_cache(false)
		.store_fallback(StoreFallback::UseDefault)
		.build()
		.unwrap();
	let ctx = Context::global();

	let mut group = Group::new("shop");
	let title = group.declare("title", StringValue::new()).default("Shop".into()).build().unwrap();
	let a = strict.attach(&group, Owner::namespace("shop.settings")).unwrap();
	let b = lenient.attach(&group, Owner::namespace("shop.settings")).unwrap();

	mem.set_available(false);
	assert!(matches!(a.read(&ctx, &title).await, Err(Error::DbError)));
	assert_eq!(b.read(&ctx, &title).await.unwrap(), "Shop");
	assert!(matches!(b.write(&ctx, &title, "New".into()).await, Err(Error::DbError)));
}

#[tokio::test]
async fn test_tenants_are_isolated() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = SettingsBuilder::new()
		.store_adapter(mem.clone())
		.use_tenants(true)
		.build()
		.unwrap();

	let mut group = Group::new("site");
	let title = group.declare("title", StringValue::new()).default("Untitled".into()).build().unwrap();
	let site = settings.attach(&group, Owner::namespace("site.settings")).unwrap();

	let alice = Context::tenant(TnId(1));
	let bob = Context::tenant(TnId(2));
	site.write(&alice, &title, "Alice's".into()).await.unwrap();
	assert_eq!(site.read(&alice, &title).await.unwrap(), "Alice's");
	assert_eq!(site.read(&bob, &title).await.unwrap(), "Untitled");
}

#[tokio::test]
async fn test_detached_handle() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut first = Group::new("first");
	let title = first.declare("title", StringValue::new()).build().unwrap();
	let mut second = Group::new("second");
	second.declare("title", StringValue::new()).build().unwrap();
	let other = settings.attach(&second, Owner::scoped("shop.models", "Product")).unwrap();

	let err = other.read(&ctx, &title).await.unwrap_err();
	assert!(matches!(err, Error::Detached(_)));
	assert_eq!(err.to_string(), "'title' is not accessible from Product instances");
}

#[tokio::test]
async fn test_deferred_scope_binding() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut group = Group::new("product");
	let label = group.declare("label", StringValue::new()).default("Item".into()).build().unwrap();
	let mut product = settings.instantiate(&group, "shop.models").unwrap();
	assert!(settings.registry().lookup("shop.models", "", "label").is_ok());

	product.bind_scope("Product", Some("catalog")).unwrap();
	assert_eq!(product.scope(), "Product");
	let decl = settings.registry().lookup("shop.models", "Product", "label").unwrap();
	assert_eq!(decl.app(), "catalog");
	assert_eq!(decl.permission_codename(), "catalog.can_edit_product_settings");
	assert!(matches!(
		settings.registry().lookup("shop.models", "", "label"),
		Err(Error::UnknownSetting(_))
	));

	assert!(product.write(&ctx, &label, "Widget".into()).await.unwrap());
	assert!(settings.is_stored(&ctx, &SettingKey::new("shop.models", "Product", "label")).await.unwrap());
	assert!(matches!(product.bind_scope("Other", None), Err(Error::DeclarationConflict(_))));
}

#[tokio::test]
async fn test_install_defaults() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut group = Group::new("site");
	let title = group.declare("title", StringValue::new()).build().unwrap();
	group.declare("motto", StringValue::new()).build().unwrap();
	let site = settings.attach(&group, Owner::namespace("site.settings")).unwrap();

	site.write(&ctx, &title, "Kept".into()).await.unwrap();
	let defaults = [DefaultValue::new("", "title", "Installed"), DefaultValue::new("", "motto", "Hi")];
	assert_eq!(settings.install_defaults(&ctx, "site.settings", &defaults).await.unwrap(), 1);
	assert_eq!(settings.install_defaults(&ctx, "site.settings", &defaults).await.unwrap(), 0);
	assert_eq!(site.read(&ctx, &title).await.unwrap(), "Kept");

	let err = settings.install_defaults(&ctx, "site.settings", &[]).await.unwrap_err();
	assert!(matches!(err, Error::ConfigError(_)));
}

#[tokio::test]
async fn test_install_defaults_is_all_or_nothing() {
	let mem = Arc::new(MemoryStoreAdapter::new());
	let settings = build(&mem);
	let ctx = Context::global();

	let mut group = Group::new("site");
	let title = group.declare("title", StringValue::new()).build().unwrap();
	let limit = group.declare("limit", IntegerValue::new()).default(Some(5)).build().unwrap();
	let site = settings.attach(&group, Owner::namespace("site.settings")).unwrap();

	let unparsable = [DefaultValue::new("", "title", "Installed"), DefaultValue::new("", "limit", "abc")];
	let err = settings.install_defaults(&ctx, "site.settings", &unparsable).await.unwrap_err();
	assert!(matches!(err, Error::ValidationError(_)));

	let unknown = [
		DefaultValue::new("", "title", "Installed"),
		DefaultValue::new("", "missing", "x"),
		DefaultValue::new("", "limit", "7"),
	];
	let err = settings.install_defaults(&ctx, "site.settings", &unknown).await.unwrap_err();
	assert!(matches!(err, Error::UnknownSetting(_)));

	assert_eq!(mem.writes(), 0);
	assert_eq!(site.read(&ctx, &title).await.unwrap(), "");
	assert_eq!(site.read(&ctx, &limit).await.unwrap(), Some(5));
}

// vim: ts=4
