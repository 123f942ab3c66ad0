//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and birthdays as `YYYY-MM-DD`,
//! so both sort lexically.

use chrono::{DateTime, NaiveDate, Utc};
use rolodex_core::contact::{Contact, ContactPatch};
use rusqlite::types::Value;

use crate::{Error, Result};

/// Column list shared by every `SELECT` and `RETURNING` clause; order
/// matches [`RawContact::from_row`].
pub const COLUMNS: &str =
  "id, first_name, last_name, email, phone, birthday, additional_info, created_at";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Wrap `needle` for a substring `LIKE … ESCAPE '\'` match, escaping the
/// wildcard characters it may contain.
pub fn like_pattern(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for ch in needle.chars() {
    if matches!(ch, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(ch);
  }
  out.push('%');
  out
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// `(column, value)` pairs for the fields a patch supplies, in column order.
pub fn encode_patch(patch: ContactPatch) -> Vec<(&'static str, Value)> {
  let mut sets = Vec::new();
  if let Some(v) = patch.first_name {
    sets.push(("first_name", Value::Text(v)));
  }
  if let Some(v) = patch.last_name {
    sets.push(("last_name", Value::Text(v)));
  }
  if let Some(v) = patch.email {
    sets.push(("email", Value::Text(v)));
  }
  if let Some(v) = patch.phone {
    sets.push(("phone", Value::Text(v)));
  }
  if let Some(v) = patch.birthday {
    sets.push(("birthday", Value::Text(encode_date(v))));
  }
  if let Some(v) = patch.additional_info {
    sets.push(("additional_info", v.map_or(Value::Null, Value::Text)));
  }
  sets
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `contacts` row.
pub struct RawContact {
  pub id:              i64,
  pub first_name:      String,
  pub last_name:       String,
  pub email:           String,
  pub phone:           String,
  pub birthday:        String,
  pub additional_info: Option<String>,
  pub created_at:      String,
}

impl RawContact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:              row.get(0)?,
      first_name:      row.get(1)?,
      last_name:       row.get(2)?,
      email:           row.get(3)?,
      phone:           row.get(4)?,
      birthday:        row.get(5)?,
      additional_info: row.get(6)?,
      created_at:      row.get(7)?,
    })
  }

  pub fn into_contact(self) -> Result<Contact> {
    Ok(Contact {
      id:              self.id,
      first_name:      self.first_name,
      last_name:       self.last_name,
      email:           self.email,
      phone:           self.phone,
      birthday:        decode_date(&self.birthday)?,
      additional_info: self.additional_info,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
