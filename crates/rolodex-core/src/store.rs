//! The `ContactStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `rolodex-store-sqlite`).
//! Higher layers ([`crate::service`], `rolodex-api`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::contact::{Contact, ContactId, ContactPatch, ContactQuery, NewContact, Page};

/// Abstraction over a Rolodex contact store backend.
///
/// Each call is atomic with respect to the single record it touches. Absence
/// is reported as `Ok(None)`, never as an error.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Contacts in id order, skipping `page.offset` and returning at most
  /// `page.limit`.
  fn list(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Every contact, in id order.
  fn all(&self) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + '_;

  /// Retrieve a contact by id. Returns `None` if not found.
  fn get(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Persist a new contact. `id` and `created_at` are set by the store.
  fn create(
    &self,
    input: NewContact,
  ) -> impl Future<Output = Result<Contact, Self::Error>> + Send + '_;

  /// Merge `patch` into the stored contact and return the result, or `None`
  /// if `id` does not exist.
  fn update(
    &self,
    id: ContactId,
    patch: ContactPatch,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Remove a contact and return its final state, or `None` if absent.
  fn delete(
    &self,
    id: ContactId,
  ) -> impl Future<Output = Result<Option<Contact>, Self::Error>> + Send + '_;

  /// Contacts matching every present criterion of `query` as a
  /// case-insensitive substring, in id order.
  fn search<'a>(
    &'a self,
    query: &'a ContactQuery,
  ) -> impl Future<Output = Result<Vec<Contact>, Self::Error>> + Send + 'a;
}
