//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use rapsheet_core::{Cnic, Record, store::RecordStore};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A record store backed by a single SQLite file.
///
/// One store can hold several record schemas side by side; rows are
/// partitioned on [`Record::KIND`].
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
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
}

// CNICs are at most 13 digits, well inside the range of an i64.
fn encode_cnic(cnic: Cnic) -> i64 { cnic.get() as i64 }

fn decode_record<R: Record>(cnic: Cnic, json: &str) -> Result<R> {
  let record: R = serde_json::from_str(json)?;
  if record.cnic() != cnic {
    return Err(Error::CorruptRow {
      key:   cnic.get(),
      found: record.cnic().get(),
    });
  }
  Ok(record)
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl<R: Record> RecordStore<R> for SqliteStore {
  type Error = Error;

  async fn put(&self, record: R) -> Result<bool> {
    let cnic       = encode_cnic(record.cnic());
    let value_json = serde_json::to_string(&record)?;

    let replaced = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existed = tx
          .query_row(
            "SELECT 1 FROM records WHERE kind = ?1 AND cnic = ?2",
            rusqlite::params![R::KIND, cnic],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        tx.execute(
          "INSERT INTO records (kind, cnic, value_json) VALUES (?1, ?2, ?3)
           ON CONFLICT (kind, cnic) DO UPDATE SET
             value_json = excluded.value_json,
             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
          rusqlite::params![R::KIND, cnic, value_json],
        )?;
        tx.commit()?;
        Ok(existed)
      })
      .await?;

    Ok(replaced)
  }

  async fn get(&self, cnic: Cnic) -> Result<Option<R>> {
    let key = encode_cnic(cnic);

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT value_json FROM records WHERE kind = ?1 AND cnic = ?2",
            rusqlite::params![R::KIND, key],
            |row| row.get(0),
          )
          .optional()?)
      })
      .await?;

    raw.map(|json| decode_record(cnic, &json)).transpose()
  }

  async fn contains(&self, cnic: Cnic) -> Result<bool> {
    let key = encode_cnic(cnic);

    let exists = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM records WHERE kind = ?1 AND cnic = ?2",
            rusqlite::params![R::KIND, key],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;

    Ok(exists)
  }

  async fn replace(&self, cnic: Cnic, record: R) -> Result<bool> {
    let key        = encode_cnic(cnic);
    let value_json = serde_json::to_string(&record)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE records
           SET value_json = ?3,
               updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
           WHERE kind = ?1 AND cnic = ?2",
          rusqlite::params![R::KIND, key, value_json],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn remove(&self, cnic: Cnic) -> Result<bool> {
    let key = encode_cnic(cnic);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM records WHERE kind = ?1 AND cnic = ?2",
          rusqlite::params![R::KIND, key],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn len(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM records WHERE kind = ?1",
          rusqlite::params![R::KIND],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as usize)
  }
}
