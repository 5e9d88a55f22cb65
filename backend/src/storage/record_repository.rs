use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, Utc};
use sqlx::Row;

use crate::db::DbConnection;
use crate::domain::models::record::RecordEntry;
use shared::RecordType;

/// Repository for the per-baby record collection.
///
/// Writes are full overwrites keyed by document id (last write wins, no
/// versioning). Deletes set a tombstone flag; every read path filters
/// tombstones out, so the domain layer never sees a deleted entry.
#[derive(Clone)]
pub struct RecordRepository {
    db: DbConnection,
}

impl RecordRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Upsert one record by its identity key. Overwriting clears any
    /// tombstone left by an earlier delete of the same key.
    pub async fn upsert_record(&self, baby_number: &str, entry: &RecordEntry) -> Result<String> {
        let record_id = entry.document_id();
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO records
                (baby_number, record_id, date, time, record_type, value, deleted, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(baby_number)
        .bind(&record_id)
        .bind(entry.date.format("%Y-%m-%d").to_string())
        .bind(entry.time.as_deref())
        .bind(entry.record_type.as_str())
        .bind(entry.value)
        .bind(Utc::now().to_rfc3339())
        .execute(self.db.pool())
        .await
        .context("Failed to upsert record")?;
        Ok(record_id)
    }

    /// Retrieve one live record by document id.
    pub async fn get_record(&self, baby_number: &str, record_id: &str) -> Result<Option<RecordEntry>> {
        let row = sqlx::query(
            r#"
            SELECT date, time, record_type, value FROM records
            WHERE baby_number = ? AND record_id = ? AND deleted = 0
            "#,
        )
        .bind(baby_number)
        .bind(record_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(row_to_entry).transpose()
    }

    /// List live records in a closed date range, ordered by date then
    /// time. Range filtering happens in the query, not after the fetch.
    pub async fn list_range(
        &self,
        baby_number: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RecordEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT date, time, record_type, value FROM records
            WHERE baby_number = ? AND date BETWEEN ? AND ? AND deleted = 0
            ORDER BY date ASC, time ASC
            "#,
        )
        .bind(baby_number)
        .bind(start.format("%Y-%m-%d").to_string())
        .bind(end.format("%Y-%m-%d").to_string())
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(row_to_entry).collect()
    }

    /// Tombstone one record. Returns false when no live record exists
    /// under that id.
    pub async fn tombstone(&self, baby_number: &str, record_id: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE records SET deleted = 1 WHERE baby_number = ? AND record_id = ? AND deleted = 0",
        )
        .bind(baby_number)
        .bind(record_id)
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_entry(row: sqlx::sqlite::SqliteRow) -> Result<RecordEntry> {
    let date: String = row.get("date");
    let record_type: String = row.get("record_type");
    Ok(RecordEntry {
        date: NaiveDate::parse_from_str(&date, "%Y-%m-%d")
            .context("Invalid date in records table")?,
        time: row.get("time"),
        record_type: RecordType::parse(&record_type)
            .ok_or_else(|| anyhow!("Unknown record type in records table: {}", record_type))?,
        value: row.get("value"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BABY: &str = "20250301-01";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(d: NaiveDate, time: Option<&str>, ty: RecordType, value: f64) -> RecordEntry {
        RecordEntry {
            date: d,
            time: time.map(str::to_string),
            record_type: ty,
            value,
        }
    }

    async fn setup() -> RecordRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        RecordRepository::new(db)
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_identity_key() {
        let repo = setup().await;
        let d = date(2025, 8, 20);

        let first = entry(d, Some("09:00"), RecordType::Feeding, 120.0);
        let id = repo.upsert_record(BABY, &first).await.unwrap();

        let second = entry(d, Some("09:00"), RecordType::Feeding, 140.0);
        let second_id = repo.upsert_record(BABY, &second).await.unwrap();
        assert_eq!(id, second_id);

        // Exactly one logical entry survives, holding the second value
        let all = repo.list_range(BABY, d, d).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].value, 140.0);
    }

    #[tokio::test]
    async fn test_list_range_filters_in_query() {
        let repo = setup().await;

        repo.upsert_record(BABY, &entry(date(2025, 8, 10), Some("08:00"), RecordType::Feeding, 100.0))
            .await
            .unwrap();
        repo.upsert_record(BABY, &entry(date(2025, 8, 15), Some("08:00"), RecordType::Feeding, 110.0))
            .await
            .unwrap();
        repo.upsert_record(BABY, &entry(date(2025, 8, 21), Some("08:00"), RecordType::Feeding, 120.0))
            .await
            .unwrap();
        // Another baby's record must never leak into the range
        repo.upsert_record("20250301-02", &entry(date(2025, 8, 15), Some("08:00"), RecordType::Feeding, 999.0))
            .await
            .unwrap();

        let range = repo
            .list_range(BABY, date(2025, 8, 12), date(2025, 8, 21))
            .await
            .unwrap();
        let values: Vec<f64> = range.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![110.0, 120.0]);
    }

    #[tokio::test]
    async fn test_tombstone_hides_record_from_reads() {
        let repo = setup().await;
        let d = date(2025, 8, 20);
        let id = repo
            .upsert_record(BABY, &entry(d, Some("09:00"), RecordType::Poop, 1.0))
            .await
            .unwrap();

        assert!(repo.tombstone(BABY, &id).await.unwrap());
        assert!(repo.get_record(BABY, &id).await.unwrap().is_none());
        assert!(repo.list_range(BABY, d, d).await.unwrap().is_empty());

        // A second tombstone of the same id finds nothing
        assert!(!repo.tombstone(BABY, &id).await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_after_tombstone_revives_key() {
        let repo = setup().await;
        let d = date(2025, 8, 20);
        let e = entry(d, Some("09:00"), RecordType::Urine, 1.0);

        let id = repo.upsert_record(BABY, &e).await.unwrap();
        repo.tombstone(BABY, &id).await.unwrap();
        repo.upsert_record(BABY, &e).await.unwrap();

        assert!(repo.get_record(BABY, &id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_weight_record_round_trip() {
        let repo = setup().await;
        let d = date(2025, 8, 20);
        let id = repo
            .upsert_record(BABY, &entry(d, None, RecordType::Weight, 5.2))
            .await
            .unwrap();
        assert_eq!(id, "2025-08-20-weight");

        let fetched = repo.get_record(BABY, &id).await.unwrap().unwrap();
        assert_eq!(fetched.record_type, RecordType::Weight);
        assert_eq!(fetched.time, None);
        assert_eq!(fetched.value, 5.2);
    }
}
