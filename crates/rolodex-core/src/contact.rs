//! Contact types — the single record kind held by the Rolodex store.
//!
//! A [`Contact`] is what the store returns. [`NewContact`] and
//! [`ContactPatch`] are the validated inputs accepted by the store; both are
//! produced by [`crate::validate`] and are never deserialised directly from
//! request bodies.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned identifier. Never reused once deleted.
pub type ContactId = i64;

// ─── Field limits ────────────────────────────────────────────────────────────

pub const FIRST_NAME_MAX: usize = 50;
pub const LAST_NAME_MAX: usize = 50;
pub const EMAIL_MAX: usize = 320;
pub const PHONE_MAX: usize = 15;
pub const ADDITIONAL_INFO_MAX: usize = 350;

// ─── Contact ─────────────────────────────────────────────────────────────────

/// A persisted contact, as rendered in every API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
  pub id:              ContactId,
  pub first_name:      String,
  pub last_name:       String,
  pub email:           String,
  pub phone:           String,
  pub birthday:        NaiveDate,
  pub additional_info: Option<String>,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:      DateTime<Utc>,
}

// ─── NewContact ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::ContactStore::create`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
  pub first_name:      String,
  pub last_name:       String,
  pub email:           String,
  pub phone:           String,
  pub birthday:        NaiveDate,
  pub additional_info: Option<String>,
}

// ─── ContactPatch ────────────────────────────────────────────────────────────

/// A partial update. `None` means "leave unchanged".
///
/// `additional_info` is the only nullable column, so it carries a second
/// layer: `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
  pub first_name:      Option<String>,
  pub last_name:       Option<String>,
  pub email:           Option<String>,
  pub phone:           Option<String>,
  pub birthday:        Option<NaiveDate>,
  pub additional_info: Option<Option<String>>,
}

impl ContactPatch {
  /// `true` if applying this patch would change nothing.
  pub fn is_empty(&self) -> bool { *self == Self::default() }
}

// ─── Query types ─────────────────────────────────────────────────────────────

/// Offset/limit pagination for [`crate::store::ContactStore::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub offset: u32,
  pub limit:  u32,
}

impl Page {
  pub const DEFAULT_LIMIT: u32 = 100;
}

impl Default for Page {
  fn default() -> Self {
    Self {
      offset: 0,
      limit:  Self::DEFAULT_LIMIT,
    }
  }
}

/// Search criteria. Every present criterion must match (case-insensitive
/// substring); an all-`None` query matches every contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      Option<String>,
}

impl ContactQuery {
  pub fn is_empty(&self) -> bool {
    self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
  }
}
