//! Editor support.
//!
//! Builds a UI-agnostic form model out of the registry and applies submitted
//! forms. Rendering is up to the host; this module only decides which fields
//! an actor may see, what they contain, and which values change.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use knobs_types::media_adapter::Upload;

use crate::declaration::{Choice, Declaration};
use crate::prelude::*;
use crate::service::Settings;
use crate::value::{ImageValue, ValueKind};

/// Decides whether an actor holds a permission. Hosts plug in their own
/// access control here.
pub trait PermissionCheck: Send + Sync {
	fn is_permitted(&self, actor: Option<&str>, permission: &str) -> bool;
}

/// Grants everything, for trusted contexts and tests
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl PermissionCheck for AllowAll {
	fn is_permitted(&self, _actor: Option<&str>, _permission: &str) -> bool {
		true
	}
}

impl<F> PermissionCheck for F
where
	F: Fn(Option<&str>, &str) -> bool + Send + Sync,
{
	fn is_permitted(&self, actor: Option<&str>, permission: &str) -> bool {
		self(actor, permission)
	}
}

/// One form field
#[derive(Clone, Debug, Serialize)]
pub struct EditorField {
	/// `namespace__scope__name`
	pub field_name: String,
	pub label: String,
	pub help_text: Option<String>,
	pub required: bool,
	pub choices: Vec<Choice>,
	pub kind: ValueKind,
	pub initial: String,
	pub app: String,
	pub location: String,
	pub verbose_name: String,
}

/// A submitted form: text values by field name, plus uploaded files
#[derive(Clone, Debug, Default)]
pub struct Submission {
	pub fields: HashMap<String, String>,
	pub files: HashMap<String, Upload>,
}

impl Submission {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.fields.insert(name.into(), value.into());
		self
	}

	pub fn file(mut self, name: impl Into<String>, upload: Upload) -> Self {
		self.files.insert(name.into(), upload);
		self
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
	pub field_name: String,
	pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorOutcome {
	/// Nothing was written
	Invalid(Vec<FieldError>),
	/// One change message per written field
	Applied(Vec<String>),
}

enum Pending<'a> {
	Value(String),
	Upload(&'a Upload),
	Keep,
}

impl Settings {
	/// Declarations of an app (or all apps) the actor may edit
	pub fn editable(
		&self,
		perms: &dyn PermissionCheck,
		actor: Option<&str>,
		app: Option<&str>,
	) -> Vec<Arc<Declaration>> {
		let decls = match app {
			Some(app) => self.registry().enumerate_by_app(app),
			None => self.registry().enumerate_all(),
		};
		decls.into_iter().filter(|d| perms.is_permitted(actor, &d.permission_codename())).collect()
	}

	pub async fn editor_fields(
		&self,
		ctx: &Context,
		perms: &dyn PermissionCheck,
		app: Option<&str>,
	) -> ClResult<Vec<EditorField>> {
		let mut fields = Vec::new();
		for decl in self.editable(perms, ctx.actor.as_deref(), app) {
			let initial = self.read_editor(ctx, &decl).await?;
			fields.push(EditorField {
				field_name: decl.key().field_name(),
				label: decl.label(),
				help_text: decl.help_text().map(str::to_owned),
				required: decl.required(),
				choices: decl.choices().to_vec(),
				kind: decl.kind(),
				initial,
				app: decl.app().to_owned(),
				location: decl.location().to_owned(),
				verbose_name: decl.verbose_name().to_owned(),
			});
		}
		Ok(fields)
	}

	/// Validates every editable field, then writes the changed ones.
	///
	/// A field missing from the submission counts as empty input. If any
	/// field fails validation nothing is written.
	pub async fn apply_submission(
		&self,
		ctx: &Context,
		perms: &dyn PermissionCheck,
		app: Option<&str>,
		submission: &Submission,
	) -> ClResult<EditorOutcome> {
		let decls = self.editable(perms, ctx.actor.as_deref(), app);

		let mut errors = Vec::new();
		let mut pending = Vec::with_capacity(decls.len());
		for decl in decls {
			let field_name = decl.key().field_name();
			let input = submission.fields.get(&field_name).map_or("", String::as_str);
			let upload = submission.files.get(&field_name).filter(|u| !u.data.is_empty());

			let action = if let Some(upload) = upload.filter(|_| decl.kind() == ValueKind::Image) {
				Ok(Pending::Upload(upload))
			} else if decl.value().keeps_on_blank() && input.trim().is_empty() {
				Ok(Pending::Keep)
			} else {
				decl.clean(input).map(Pending::Value)
			};
			match action {
				Ok(action) => pending.push((decl, action)),
				Err(Error::ValidationError(message)) => errors.push(FieldError { field_name, message }),
				Err(err) => return Err(err),
			}
		}
		if !errors.is_empty() {
			debug!("Rejected settings submission with {} invalid fields", errors.len());
			return Ok(EditorOutcome::Invalid(errors));
		}

		let mut messages = Vec::new();
		for (decl, action) in pending {
			let changed = match action {
				Pending::Keep => false,
				Pending::Value(cleaned) => self.write_cleaned(ctx, &decl, &cleaned).await?,
				Pending::Upload(upload) => self.store_upload(ctx, &decl, upload).await?,
			};
			if changed {
				messages.push(format!("Updated {} on {}", decl.description(), decl.location()));
			}
		}
		Ok(EditorOutcome::Applied(messages))
	}

	async fn store_upload(&self, ctx: &Context, decl: &Declaration, upload: &Upload) -> ClResult<bool> {
		let media = self
			.media()
			.ok_or_else(|| Error::ConfigError("No media adapter configured".into()))?;
		let image = decl
			.typed::<ImageValue>()
			.ok_or_else(|| Error::Internal(format!("'{}' is not an image setting", decl.name())))?;
		match image.value_type.save_upload(&**media, upload).await? {
			Some(path) => self.write_cleaned(ctx, decl, &path).await,
			None => Ok(false),
		}
	}
}


// vim: ts=4
