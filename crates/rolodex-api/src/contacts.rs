//! Handlers for `/contacts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/contacts` | Optional `?skip` (default 0) and `?limit` (default 100) |
//! | `GET`    | `/contacts/search` | Optional `first_name`, `last_name`, `email` |
//! | `GET`    | `/contacts/birthdays` | Optional `?days` (default 7) |
//! | `GET`    | `/contacts/:id` | 404 if not found |
//! | `POST`   | `/contacts` | Body: all fields but `additional_info` required; returns 201 |
//! | `PUT`    | `/contacts/:id` | Body: any subset of fields; 404 if not found |
//! | `DELETE` | `/contacts/:id` | Returns the deleted record; 404 if not found |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use rolodex_core::{
  ContactService, ValidationError,
  contact::Contact,
  store::ContactStore,
  validate::{
    Problem, normalize_query, validate_days, validate_id, validate_new_contact, validate_page,
    validate_patch,
  },
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;

fn not_found() -> ApiError { ApiError::NotFound("Contact not found".to_string()) }

fn body_json(body: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
  body
    .map(|Json(v)| v)
    .map_err(|rejection| ApiError::Rejected(rejection.status(), rejection.body_text()))
}

/// Query parameters are taken as text and parsed during validation, so a
/// malformed value is reported per field like any other input.
fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
  query.map(|Query(params)| params).map_err(|_| {
    ApiError::Validation(ValidationError::single(
      "query",
      Problem::WrongType("a valid query string"),
    ))
  })
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub skip:  Option<String>,
  pub limit: Option<String>,
}

/// `GET /contacts[?skip=<n>][&limit=<n>]`
pub async fn list<S>(
  State(service): State<ContactService<S>>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore + 'static,
{
  let params = query_params(params)?;
  let page = validate_page(params.skip.as_deref(), params.limit.as_deref())?;
  let contacts = service.list(page).await.map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      Option<String>,
}

/// `GET /contacts/search[?first_name=...][&last_name=...][&email=...]`
pub async fn search<S>(
  State(service): State<ContactService<S>>,
  params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore + 'static,
{
  let params = query_params(params)?;
  let query = normalize_query(params.first_name, params.last_name, params.email);
  let contacts = service.search(&query).await.map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Birthdays ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct BirthdayParams {
  pub days: Option<String>,
}

/// `GET /contacts/birthdays[?days=<n>]`
pub async fn birthdays<S>(
  State(service): State<ContactService<S>>,
  params: Result<Query<BirthdayParams>, QueryRejection>,
) -> Result<Json<Vec<Contact>>, ApiError>
where
  S: ContactStore + 'static,
{
  let params = query_params(params)?;
  let days = validate_days(params.days.as_deref())?;
  let contacts = service
    .upcoming_birthdays(days)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(contacts))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /contacts/:id`
pub async fn get_one<S>(
  State(service): State<ContactService<S>>,
  Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore + 'static,
{
  let id = validate_id(&id)?;
  let contact = service
    .get(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  Ok(Json(contact))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contacts` — returns 201 + the stored [`Contact`].
pub async fn create<S>(
  State(service): State<ContactService<S>>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore + 'static,
{
  let input = validate_new_contact(&body_json(body)?)?;
  let contact = service.create(input).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(contact)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /contacts/:id` — omitted fields are left unchanged.
pub async fn update<S>(
  State(service): State<ContactService<S>>,
  Path(id): Path<String>,
  body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore + 'static,
{
  let id = validate_id(&id)?;
  let patch = validate_patch(&body_json(body)?)?;
  let contact = service
    .update(id, patch)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  Ok(Json(contact))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contacts/:id` — returns the record as it was before deletion.
pub async fn delete_one<S>(
  State(service): State<ContactService<S>>,
  Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError>
where
  S: ContactStore + 'static,
{
  let id = validate_id(&id)?;
  let contact = service
    .delete(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  Ok(Json(contact))
}
