//! [`ContactService`] — the contact operations exposed to the API layer.
//!
//! Inputs are expected to have passed through [`crate::validate`] already.
//! The service adds the rules that sit above raw storage: empty patches do
//! not write, an empty search lists everything, and the birthday window is
//! evaluated against the current UTC date.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::{
  birthday::BirthdayWindow,
  contact::{Contact, ContactId, ContactPatch, ContactQuery, NewContact, Page},
  store::ContactStore,
};

/// Contact operations over a shared store handle.
///
/// Cheap to clone; clones share the same store.
pub struct ContactService<S> {
  store: Arc<S>,
}

impl<S> Clone for ContactService<S> {
  fn clone(&self) -> Self {
    Self {
      store: Arc::clone(&self.store),
    }
  }
}

impl<S: ContactStore> ContactService<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  pub async fn list(&self, page: Page) -> Result<Vec<Contact>, S::Error> {
    tracing::debug!(offset = page.offset, limit = page.limit, "listing contacts");
    self.store.list(page).await
  }

  pub async fn get(&self, id: ContactId) -> Result<Option<Contact>, S::Error> {
    tracing::debug!(id, "fetching contact");
    self.store.get(id).await
  }

  pub async fn create(&self, input: NewContact) -> Result<Contact, S::Error> {
    let contact = self.store.create(input).await?;
    tracing::info!(id = contact.id, "contact created");
    Ok(contact)
  }

  /// Apply a partial update. An empty patch is answered with the current
  /// record without writing.
  pub async fn update(
    &self,
    id: ContactId,
    patch: ContactPatch,
  ) -> Result<Option<Contact>, S::Error> {
    if patch.is_empty() {
      return self.store.get(id).await;
    }
    let updated = self.store.update(id, patch).await?;
    if updated.is_some() {
      tracing::info!(id, "contact updated");
    }
    Ok(updated)
  }

  pub async fn delete(&self, id: ContactId) -> Result<Option<Contact>, S::Error> {
    let deleted = self.store.delete(id).await?;
    if deleted.is_some() {
      tracing::info!(id, "contact deleted");
    }
    Ok(deleted)
  }

  /// With no criteria this is every contact.
  pub async fn search(&self, query: &ContactQuery) -> Result<Vec<Contact>, S::Error> {
    tracing::debug!(?query, "searching contacts");
    if query.is_empty() {
      self.store.all().await
    } else {
      self.store.search(query).await
    }
  }

  /// Contacts whose birthday falls within `days` days of today (UTC).
  pub async fn upcoming_birthdays(&self, days: u32) -> Result<Vec<Contact>, S::Error> {
    self
      .upcoming_birthdays_from(Utc::now().date_naive(), days)
      .await
  }

  pub async fn upcoming_birthdays_from(
    &self,
    today: NaiveDate,
    days: u32,
  ) -> Result<Vec<Contact>, S::Error> {
    let window = BirthdayWindow::new(today, days);
    let contacts = self.store.all().await?;
    let hits = window.select(contacts);
    tracing::debug!(%today, days, found = hits.len(), "birthday window");
    Ok(hits)
  }
}
