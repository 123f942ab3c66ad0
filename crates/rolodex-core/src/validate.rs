//! Validation and normalisation of untyped input.
//!
//! Request bodies arrive as arbitrary JSON and are turned into
//! [`NewContact`] or [`ContactPatch`] here, before anything touches the
//! store. Every violated constraint is collected; callers get the whole list
//! rather than the first failure.
//!
//! Text fields are trimmed, then measured in `char`s. In a patch, an omitted
//! field means "unchanged" while an explicit `null` is rejected for every
//! column except `additional_info`, where it clears the stored value.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::contact::{
  ADDITIONAL_INFO_MAX, ContactId, ContactPatch, ContactQuery, EMAIL_MAX, FIRST_NAME_MAX,
  LAST_NAME_MAX, NewContact, PHONE_MAX, Page,
};

/// Birthday window used when the caller does not supply `days`.
pub const DEFAULT_BIRTHDAY_DAYS: u32 = 7;

const WRITABLE: [&str; 6] = [
  "first_name",
  "last_name",
  "email",
  "phone",
  "birthday",
  "additional_info",
];
const READ_ONLY: [&str; 2] = ["id", "created_at"];

// ─── Errors ──────────────────────────────────────────────────────────────────

/// What is wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
  #[error("field required")]
  Missing,
  #[error("may not be null")]
  Null,
  #[error("expected {0}")]
  WrongType(&'static str),
  #[error("may not be empty")]
  Empty,
  #[error("at most {max} characters allowed, got {actual}")]
  TooLong { max: usize, actual: usize },
  #[error("invalid date {0:?}, expected YYYY-MM-DD")]
  InvalidDate(String),
  #[error("must be between {min} and {max}, got {actual}")]
  OutOfRange { min: i64, max: i64, actual: i64 },
  #[error("field is read-only")]
  ReadOnly,
  #[error("unknown field")]
  Unknown,
}

/// A [`Problem`] attributed to a named field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {problem}")]
pub struct FieldError {
  pub field:   String,
  pub problem: Problem,
}

/// One or more field constraints were violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed: {}", joined(.errors))]
pub struct ValidationError {
  pub errors: Vec<FieldError>,
}

fn joined(errors: &[FieldError]) -> String {
  errors
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join("; ")
}

impl ValidationError {
  pub fn single(field: impl Into<String>, problem: Problem) -> Self {
    Self {
      errors: vec![FieldError {
        field: field.into(),
        problem,
      }],
    }
  }

  #[cfg(test)]
  fn has_field(&self, field: &str) -> bool { self.errors.iter().any(|e| e.field == field) }
}

// ─── Collector ───────────────────────────────────────────────────────────────

struct Fields<'a> {
  obj:    &'a Map<String, Value>,
  errors: Vec<FieldError>,
}

impl<'a> Fields<'a> {
  fn new(input: &'a Value) -> Result<Self, ValidationError> {
    let obj = input
      .as_object()
      .ok_or_else(|| ValidationError::single("body", Problem::WrongType("a JSON object")))?;
    let mut fields = Self {
      obj,
      errors: Vec::new(),
    };
    fields.reject_unexpected();
    Ok(fields)
  }

  fn push(&mut self, field: &str, problem: Problem) {
    self.errors.push(FieldError {
      field: field.to_owned(),
      problem,
    });
  }

  fn reject_unexpected(&mut self) {
    let obj = self.obj;
    for key in obj.keys() {
      if READ_ONLY.contains(&key.as_str()) {
        self.push(key, Problem::ReadOnly);
      } else if !WRITABLE.contains(&key.as_str()) {
        self.push(key, Problem::Unknown);
      }
    }
  }

  /// Look up a field that may not be null. `None` if absent or invalid.
  fn present(&mut self, field: &'static str) -> Option<&'a Value> {
    let obj = self.obj;
    match obj.get(field) {
      None => None,
      Some(Value::Null) => {
        self.push(field, Problem::Null);
        None
      }
      Some(v) => Some(v),
    }
  }

  fn require(&mut self, field: &'static str) -> Option<&'a Value> {
    if !self.obj.contains_key(field) {
      self.push(field, Problem::Missing);
      return None;
    }
    self.present(field)
  }

  fn text(&mut self, field: &'static str, value: &Value, max: usize) -> Option<String> {
    let Some(s) = value.as_str() else {
      self.push(field, Problem::WrongType("a string"));
      return None;
    };
    let s = s.trim();
    if s.is_empty() {
      self.push(field, Problem::Empty);
      return None;
    }
    self.bounded(field, s, max)
  }

  fn bounded(&mut self, field: &'static str, s: &str, max: usize) -> Option<String> {
    let actual = s.chars().count();
    if actual > max {
      self.push(field, Problem::TooLong { max, actual });
      return None;
    }
    Some(s.to_owned())
  }

  fn date(&mut self, field: &'static str, value: &Value) -> Option<NaiveDate> {
    let Some(s) = value.as_str() else {
      self.push(field, Problem::WrongType("a date string"));
      return None;
    };
    match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
      Ok(d) => Some(d),
      Err(_) => {
        self.push(field, Problem::InvalidDate(s.to_owned()));
        None
      }
    }
  }

  /// `additional_info`: null or blank both mean "no value". Outer `None`
  /// means invalid.
  fn note(&mut self, field: &'static str, value: &Value) -> Option<Option<String>> {
    match value {
      Value::Null => Some(None),
      Value::String(s) if s.trim().is_empty() => Some(None),
      Value::String(s) => self.bounded(field, s.trim(), ADDITIONAL_INFO_MAX).map(Some),
      _ => {
        self.push(field, Problem::WrongType("a string or null"));
        None
      }
    }
  }

  fn required_text(&mut self, field: &'static str, max: usize) -> Option<String> {
    let value = self.require(field)?;
    self.text(field, value, max)
  }

  fn optional_text(&mut self, field: &'static str, max: usize) -> Option<String> {
    let value = self.present(field)?;
    self.text(field, value, max)
  }

  fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
    match value {
      Some(v) if self.errors.is_empty() => Ok(v),
      _ => Err(ValidationError {
        errors: self.errors,
      }),
    }
  }
}

// ─── Bodies ──────────────────────────────────────────────────────────────────

/// Validate a create body. Every field except `additional_info` is required.
pub fn validate_new_contact(input: &Value) -> Result<NewContact, ValidationError> {
  let mut f = Fields::new(input)?;

  let first_name = f.required_text("first_name", FIRST_NAME_MAX);
  let last_name = f.required_text("last_name", LAST_NAME_MAX);
  let email = f.required_text("email", EMAIL_MAX);
  let phone = f.required_text("phone", PHONE_MAX);
  let birthday = f.require("birthday").and_then(|v| f.date("birthday", v));
  let additional_info = match f.obj.get("additional_info") {
    None => Some(None),
    Some(v) => f.note("additional_info", v),
  };

  let contact = match (first_name, last_name, email, phone, birthday, additional_info) {
    (
      Some(first_name),
      Some(last_name),
      Some(email),
      Some(phone),
      Some(birthday),
      Some(additional_info),
    ) => Some(NewContact {
      first_name,
      last_name,
      email,
      phone,
      birthday,
      additional_info,
    }),
    _ => None,
  };
  f.finish(contact)
}

/// Validate an update body. Omitted fields are left as `None` in the patch.
pub fn validate_patch(input: &Value) -> Result<ContactPatch, ValidationError> {
  let mut f = Fields::new(input)?;

  let patch = ContactPatch {
    first_name:      f.optional_text("first_name", FIRST_NAME_MAX),
    last_name:       f.optional_text("last_name", LAST_NAME_MAX),
    email:           f.optional_text("email", EMAIL_MAX),
    phone:           f.optional_text("phone", PHONE_MAX),
    birthday:        f.present("birthday").and_then(|v| f.date("birthday", v)),
    additional_info: match f.obj.get("additional_info") {
      None => None,
      Some(v) => f.note("additional_info", v),
    },
  };
  f.finish(Some(patch))
}

// ─── Query parameters ────────────────────────────────────────────────────────

/// Parse an integer query parameter, falling back to `default` when absent.
fn integer(field: &str, raw: Option<&str>, default: i64) -> Result<i64, FieldError> {
  match raw {
    None => Ok(default),
    Some(s) => s.trim().parse().map_err(|_| FieldError {
      field:   field.to_owned(),
      problem: Problem::WrongType("an integer"),
    }),
  }
}

fn in_range(field: &str, value: i64, min: i64) -> Result<u32, FieldError> {
  u32::try_from(value)
    .ok()
    .filter(|_| value >= min)
    .ok_or_else(|| FieldError {
      field:   field.to_owned(),
      problem: Problem::OutOfRange {
        min,
        max: i64::from(u32::MAX),
        actual: value,
      },
    })
}

/// `skip` defaults to 0 and must be ≥ 0; `limit` defaults to
/// [`Page::DEFAULT_LIMIT`] and must be > 0. Both arrive as raw query text.
pub fn validate_page(skip: Option<&str>, limit: Option<&str>) -> Result<Page, ValidationError> {
  let offset = integer("skip", skip, 0).and_then(|v| in_range("skip", v, 0));
  let limit = integer("limit", limit, i64::from(Page::DEFAULT_LIMIT))
    .and_then(|v| in_range("limit", v, 1));
  match (offset, limit) {
    (Ok(offset), Ok(limit)) => Ok(Page { offset, limit }),
    (offset, limit) => Err(ValidationError {
      errors: [offset.err(), limit.err()].into_iter().flatten().collect(),
    }),
  }
}

/// `days` defaults to [`DEFAULT_BIRTHDAY_DAYS`] and must be ≥ 0.
pub fn validate_days(days: Option<&str>) -> Result<u32, ValidationError> {
  integer("days", days, i64::from(DEFAULT_BIRTHDAY_DAYS))
    .and_then(|v| in_range("days", v, 0))
    .map_err(|e| ValidationError { errors: vec![e] })
}

/// A contact id taken from a URL path segment.
pub fn validate_id(raw: &str) -> Result<ContactId, ValidationError> {
  raw
    .trim()
    .parse()
    .map_err(|_| ValidationError::single("id", Problem::WrongType("an integer")))
}

/// Build a search query; blank criteria are dropped.
pub fn normalize_query(
  first_name: Option<String>,
  last_name: Option<String>,
  email: Option<String>,
) -> ContactQuery {
  fn clean(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
  }
  ContactQuery {
    first_name: clean(first_name),
    last_name:  clean(last_name),
    email:      clean(email),
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn ann() -> Value {
    json!({
      "first_name": "Ann",
      "last_name":  "Lee",
      "email":      "ann@x.com",
      "phone":      "12345",
      "birthday":   "2000-01-01",
    })
  }

  // ── Create ────────────────────────────────────────────────────────────────

  #[test]
  fn valid_create_body() {
    let c = validate_new_contact(&ann()).unwrap();
    assert_eq!(c.first_name, "Ann");
    assert_eq!(c.birthday, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
    assert_eq!(c.additional_info, None);
  }

  #[test]
  fn create_trims_text_and_blank_info() {
    let mut body = ann();
    body["first_name"] = json!("  Ann ");
    body["additional_info"] = json!("   ");
    let c = validate_new_contact(&body).unwrap();
    assert_eq!(c.first_name, "Ann");
    assert_eq!(c.additional_info, None);
  }

  #[test]
  fn create_reports_every_violation() {
    let body = json!({
      "first_name": "x".repeat(51),
      "last_name":  "",
      "phone":      "1234567890123456",
      "birthday":   "2000-13-01",
      "additional_info": 7,
    });
    let err = validate_new_contact(&body).unwrap_err();

    assert_eq!(err.errors.len(), 6, "{err}");
    assert!(err.errors.contains(&FieldError {
      field:   "first_name".into(),
      problem: Problem::TooLong { max: 50, actual: 51 },
    }));
    assert!(err.errors.contains(&FieldError {
      field:   "last_name".into(),
      problem: Problem::Empty,
    }));
    assert!(err.errors.contains(&FieldError {
      field:   "email".into(),
      problem: Problem::Missing,
    }));
    assert!(err.has_field("phone"));
    assert!(err.has_field("birthday"));
    assert!(err.has_field("additional_info"));
  }

  #[test]
  fn length_is_counted_in_chars() {
    let mut body = ann();
    body["first_name"] = json!("é".repeat(50));
    assert!(validate_new_contact(&body).is_ok());
  }

  #[test]
  fn create_rejects_read_only_and_unknown_fields() {
    let mut body = ann();
    body["id"] = json!(9);
    body["nickname"] = json!("annie");
    let err = validate_new_contact(&body).unwrap_err();
    assert!(err.errors.contains(&FieldError {
      field:   "id".into(),
      problem: Problem::ReadOnly,
    }));
    assert!(err.errors.contains(&FieldError {
      field:   "nickname".into(),
      problem: Problem::Unknown,
    }));
  }

  #[test]
  fn create_rejects_null_required_field() {
    let mut body = ann();
    body["email"] = Value::Null;
    let err = validate_new_contact(&body).unwrap_err();
    assert_eq!(err.errors, vec![FieldError {
      field:   "email".into(),
      problem: Problem::Null,
    }]);
  }

  #[test]
  fn non_object_body_is_rejected() {
    let err = validate_new_contact(&json!([1, 2])).unwrap_err();
    assert!(err.has_field("body"));
  }

  // ── Patch ─────────────────────────────────────────────────────────────────

  #[test]
  fn patch_keeps_omitted_fields_unset() {
    let patch = validate_patch(&json!({ "last_name": "Smith" })).unwrap();
    assert_eq!(patch, ContactPatch {
      last_name: Some("Smith".into()),
      ..Default::default()
    });
  }

  #[test]
  fn empty_patch_is_valid() {
    assert!(validate_patch(&json!({})).unwrap().is_empty());
  }

  #[test]
  fn patch_null_clears_info_but_not_names() {
    let patch = validate_patch(&json!({ "additional_info": null })).unwrap();
    assert_eq!(patch.additional_info, Some(None));

    let err = validate_patch(&json!({ "first_name": null })).unwrap_err();
    assert_eq!(err.errors[0].problem, Problem::Null);
  }

  #[test]
  fn patch_enforces_length_limits() {
    let err = validate_patch(&json!({
      "email": format!("{}@x.com", "a".repeat(320)),
      "additional_info": "i".repeat(351),
    }))
    .unwrap_err();
    assert!(err.has_field("email"));
    assert!(err.has_field("additional_info"));
  }

  // ── Query parameters ──────────────────────────────────────────────────────

  #[test]
  fn page_defaults() {
    assert_eq!(validate_page(None, None).unwrap(), Page::default());
  }

  #[test]
  fn page_rejects_negative_skip_and_zero_limit() {
    let err = validate_page(Some("-1"), Some("0")).unwrap_err();
    assert!(err.has_field("skip"));
    assert!(err.has_field("limit"));
  }

  #[test]
  fn page_rejects_non_integers() {
    let err = validate_page(Some("abc"), Some("1.5")).unwrap_err();
    assert_eq!(err.errors, vec![
      FieldError {
        field:   "skip".into(),
        problem: Problem::WrongType("an integer"),
      },
      FieldError {
        field:   "limit".into(),
        problem: Problem::WrongType("an integer"),
      },
    ]);
    assert_eq!(validate_page(Some(" 2 "), None).unwrap().offset, 2);
  }

  #[test]
  fn days_default_and_bounds() {
    assert_eq!(validate_days(None).unwrap(), DEFAULT_BIRTHDAY_DAYS);
    assert_eq!(validate_days(Some("0")).unwrap(), 0);
    assert!(validate_days(Some("-3")).is_err());
    assert!(validate_days(Some("soon")).unwrap_err().has_field("days"));
  }

  #[test]
  fn id_must_be_an_integer() {
    assert_eq!(validate_id("42").unwrap(), 42);
    assert!(validate_id("abc").unwrap_err().has_field("id"));
  }

  #[test]
  fn error_message_lists_every_field() {
    let err = validate_page(Some("-1"), Some("x")).unwrap_err();
    assert_eq!(
      err.to_string(),
      "validation failed: skip: must be between 0 and 4294967295, got -1; limit: expected an integer"
    );
  }

  #[test]
  fn blank_search_criteria_are_dropped() {
    let q = normalize_query(Some("  ".into()), Some(" Lee ".into()), None);
    assert_eq!(q.first_name, None);
    assert_eq!(q.last_name.as_deref(), Some("Lee"));
    assert!(normalize_query(None, None, Some(String::new())).is_empty());
  }
}
