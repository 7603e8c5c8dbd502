use crate::db::models::{Record, RecordPatch};
use crate::db::schema::SQLITE_INIT;
use crate::error::RecordsError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub type SqlitePool = Pool<Sqlite>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Data access for the `records` table. Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct RecordStore {
    pool: SqlitePool,
}

impl RecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `database_url`, creating the database file if missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, RecordsError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_opts)
            .await?;
        Ok(Self::new(pool))
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), RecordsError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Every record, in insertion order.
    pub async fn list_all(&self) -> Result<Vec<Record>, RecordsError> {
        let rows = sqlx::query_as::<_, Record>("SELECT id, title FROM records ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;
        debug!(count = rows.len(), "listed records");
        Ok(rows)
    }

    /// Insert exactly the supplied fields and return the stored row.
    pub async fn insert(&self, record: Record) -> Result<Record, RecordsError> {
        let id = record.id.clone();
        sqlx::query_as::<_, Record>(
            "INSERT INTO records (id, title) VALUES (?, ?) RETURNING id, title",
        )
        .bind(record.id)
        .bind(record.title)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RecordsError::Duplicate(id)
            }
            other => other.into(),
        })
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Record, RecordsError> {
        sqlx::query_as::<_, Record>("SELECT id, title FROM records WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RecordsError::NotFound(id.to_string()))
    }

    /// Merge `patch` onto the stored row in one statement; absent fields keep their value.
    pub async fn update_by_id(&self, id: &str, patch: RecordPatch) -> Result<(), RecordsError> {
        let result = sqlx::query("UPDATE records SET title = COALESCE(?, title) WHERE id = ?")
            .bind(patch.title)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RecordsError::NotFound(id.to_string()));
        }
        debug!(id, "updated record");
        Ok(())
    }

    pub async fn delete_by_id(&self, id: &str) -> Result<(), RecordsError> {
        let result = sqlx::query("DELETE FROM records WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RecordsError::NotFound(id.to_string()));
        }
        debug!(id, "deleted record");
        Ok(())
    }

    /// Remove every row. SQLite has no TRUNCATE; an unqualified DELETE is its equivalent.
    pub async fn clear(&self) -> Result<u64, RecordsError> {
        let result = sqlx::query("DELETE FROM records")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// One trivial round trip to the database.
    pub async fn ping(&self) -> Result<(), RecordsError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store() -> (RecordStore, TempDir) {
        store_with_connections(2).await
    }

    async fn store_with_connections(max_connections: u32) -> (RecordStore, TempDir) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let url = format!("sqlite:{}", dir.path().join("records.sqlite").display());
        let store = RecordStore::connect(&url, max_connections)
            .await
            .expect("failed to open database");
        store.init_schema().await.expect("failed to init schema");
        (store, dir)
    }

    #[tokio::test]
    async fn list_all_on_empty_table() {
        let (store, _dir) = store().await;
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn insert_returns_stored_row_and_lists_in_insertion_order() {
        let (store, _dir) = store().await;
        for (id, title) in [("3", "c"), ("1", "a"), ("2", "b")] {
            let stored = store.insert(Record::new(id, title)).await.unwrap();
            assert_eq!(stored, Record::new(id, title));
        }

        let ids: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }

    #[tokio::test]
    async fn duplicate_id_is_reported() {
        let (store, _dir) = store().await;
        store.insert(Record::new("1", "first")).await.unwrap();

        let err = store.insert(Record::new("1", "second")).await.unwrap_err();
        assert!(matches!(err, RecordsError::Duplicate(ref id) if id == "1"));
        assert_eq!(store.get_by_id("1").await.unwrap().title, "first");
    }

    #[tokio::test]
    async fn get_update_delete_missing_ids() {
        let (store, _dir) = store().await;
        assert!(matches!(
            store.get_by_id("404").await,
            Err(RecordsError::NotFound(_))
        ));
        assert!(matches!(
            store.update_by_id("404", RecordPatch::default()).await,
            Err(RecordsError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_by_id("404").await,
            Err(RecordsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_merges_and_delete_removes_one() {
        let (store, _dir) = store().await;
        store.insert(Record::new("1", "one")).await.unwrap();
        store.insert(Record::new("2", "two")).await.unwrap();

        store
            .update_by_id(
                "2",
                RecordPatch {
                    id: None,
                    title: Some("deux".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(store.get_by_id("2").await.unwrap(), Record::new("2", "deux"));

        store.update_by_id("1", RecordPatch::default()).await.unwrap();
        assert_eq!(store.get_by_id("1").await.unwrap(), Record::new("1", "one"));

        store.delete_by_id("1").await.unwrap();
        assert_eq!(store.list_all().await.unwrap(), vec![Record::new("2", "deux")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_updates_on_distinct_ids_all_succeed() {
        let (store, _dir) = store_with_connections(5).await;
        for i in 0..50 {
            store
                .insert(Record::new(i.to_string(), format!("title {i}")))
                .await
                .unwrap();
        }

        let handles: Vec<_> = (0..200)
            .map(|n| {
                let store = store.clone();
                tokio::spawn(async move {
                    let id = (n % 50).to_string();
                    let patch = RecordPatch {
                        id: None,
                        title: Some(format!("round {} of {id}", n / 50)),
                    };
                    store.update_by_id(&id, patch).await
                })
            })
            .collect();

        for handle in handles {
            handle.await.expect("task panicked").expect("update failed");
        }

        let records = store.list_all().await.unwrap();
        assert_eq!(records.len(), 50);
        for record in records {
            assert!(record.title.starts_with("round "), "{record:?}");
            assert!(record.title.ends_with(&format!(" of {}", record.id)));
        }
    }

    #[tokio::test]
    async fn clear_empties_the_table() {
        let (store, _dir) = store().await;
        store.insert(Record::new("1", "one")).await.unwrap();
        store.insert(Record::new("2", "two")).await.unwrap();

        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.list_all().await.unwrap().is_empty());
        store.ping().await.unwrap();
    }
}
