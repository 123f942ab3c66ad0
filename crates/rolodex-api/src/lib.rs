//! JSON REST API for Rolodex.
//!
//! Exposes an axum [`Router`] backed by a [`ContactService`] over any
//! [`rolodex_core::store::ContactStore`]. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = rolodex_api::app(ContactService::new(store));
//! axum::serve(listener, app).await?;
//! ```

pub mod contacts;
pub mod error;

use axum::{Json, Router, routing::get};
use rolodex_core::{ContactService, store::ContactStore};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build the `/contacts` router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: ContactService<S>) -> Router<()>
where
  S: ContactStore + 'static,
{
  Router::new()
    .route("/contacts", get(contacts::list::<S>).post(contacts::create::<S>))
    .route("/contacts/search", get(contacts::search::<S>))
    .route("/contacts/birthdays", get(contacts::birthdays::<S>))
    .route(
      "/contacts/{id}",
      get(contacts::get_one::<S>)
        .put(contacts::update::<S>)
        .delete(contacts::delete_one::<S>),
    )
    .with_state(service)
}

/// `GET /health`
pub async fn health() -> Json<Value> { Json(json!({ "status": "healthy" })) }

/// The full application: the contacts API under `/api`, the liveness check
/// at `/health`, and request tracing.
pub fn app<S>(service: ContactService<S>) -> Router
where
  S: ContactStore + 'static,
{
  Router::new()
    .nest("/api", api_router(service))
    .route("/health", get(health))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
