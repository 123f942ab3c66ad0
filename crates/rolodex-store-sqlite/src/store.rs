//! [`SqliteStore`] — the SQLite implementation of [`ContactStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use rolodex_core::{
  contact::{Contact, ContactId, ContactPatch, ContactQuery, NewContact, Page},
  store::ContactStore,
};

use crate::{
  Result,
  encode::{COLUMNS, RawContact, encode_date, encode_dt, encode_patch, like_pattern},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Rolodex contact store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    tracing::debug!(?path, "opening sqlite store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT {COLUMNS} …` style query and decode every row.
  async fn query_contacts(
    &self,
    sql: String,
    params: Vec<rusqlite::types::Value>,
  ) -> Result<Vec<Contact>> {
    let raws: Vec<RawContact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawContact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawContact::into_contact).collect()
  }

  /// Like [`Self::query_contacts`] for statements that touch at most one row.
  async fn query_one(
    &self,
    sql: String,
    params: Vec<rusqlite::types::Value>,
  ) -> Result<Option<Contact>> {
    let raw: Option<RawContact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), RawContact::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawContact::into_contact).transpose()
  }
}

// ─── ContactStore impl ───────────────────────────────────────────────────────

impl ContactStore for SqliteStore {
  type Error = crate::Error;

  async fn list(&self, page: Page) -> Result<Vec<Contact>> {
    self
      .query_contacts(
        format!("SELECT {COLUMNS} FROM contacts ORDER BY id LIMIT ?1 OFFSET ?2"),
        vec![
          i64::from(page.limit).into(),
          i64::from(page.offset).into(),
        ],
      )
      .await
  }

  async fn all(&self) -> Result<Vec<Contact>> {
    self
      .query_contacts(format!("SELECT {COLUMNS} FROM contacts ORDER BY id"), vec![])
      .await
  }

  async fn get(&self, id: ContactId) -> Result<Option<Contact>> {
    self
      .query_one(
        format!("SELECT {COLUMNS} FROM contacts WHERE id = ?1"),
        vec![id.into()],
      )
      .await
  }

  async fn create(&self, input: NewContact) -> Result<Contact> {
    let created_at = Utc::now();
    let at_str = encode_dt(created_at);
    let birthday_str = encode_date(input.birthday);
    let row = input.clone();

    let id: ContactId = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contacts (
             first_name, last_name, email, phone,
             birthday, additional_info, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            row.first_name,
            row.last_name,
            row.email,
            row.phone,
            birthday_str,
            row.additional_info,
            at_str,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(Contact {
      id,
      first_name: input.first_name,
      last_name: input.last_name,
      email: input.email,
      phone: input.phone,
      birthday: input.birthday,
      additional_info: input.additional_info,
      created_at,
    })
  }

  async fn update(&self, id: ContactId, patch: ContactPatch) -> Result<Option<Contact>> {
    let sets = encode_patch(patch);
    if sets.is_empty() {
      return self.get(id).await;
    }

    // A single UPDATE … RETURNING keeps the merge atomic.
    let assignments = sets
      .iter()
      .enumerate()
      .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    let id_param = sets.len() + 1;
    let mut params: Vec<rusqlite::types::Value> = sets.into_iter().map(|(_, v)| v).collect();
    params.push(id.into());

    self
      .query_one(
        format!("UPDATE contacts SET {assignments} WHERE id = ?{id_param} RETURNING {COLUMNS}"),
        params,
      )
      .await
  }

  async fn delete(&self, id: ContactId) -> Result<Option<Contact>> {
    self
      .query_one(
        format!("DELETE FROM contacts WHERE id = ?1 RETURNING {COLUMNS}"),
        vec![id.into()],
      )
      .await
  }

  async fn search(&self, query: &ContactQuery) -> Result<Vec<Contact>> {
    // SQLite's LIKE folds ASCII case only.
    let criteria = [
      ("first_name", &query.first_name),
      ("last_name", &query.last_name),
      ("email", &query.email),
    ];

    let mut conds: Vec<String> = vec![];
    let mut params: Vec<rusqlite::types::Value> = vec![];
    for (column, needle) in criteria {
      if let Some(needle) = needle {
        params.push(like_pattern(needle).into());
        conds.push(format!("{column} LIKE ?{} ESCAPE '\\'", params.len()));
      }
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };

    self
      .query_contacts(
        format!("SELECT {COLUMNS} FROM contacts {where_clause} ORDER BY id"),
        params,
      )
      .await
  }
}
