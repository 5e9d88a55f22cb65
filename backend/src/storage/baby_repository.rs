use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use sqlx::Row;

use crate::db::DbConnection;
use crate::domain::models::baby::Baby;
use shared::Gender;

/// Repository for the baby registry collection. Documents are keyed by
/// the generated baby number and never updated after registration.
#[derive(Clone)]
pub struct BabyRepository {
    db: DbConnection,
}

impl BabyRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Store a newly registered baby. The baby number is the primary key,
    /// so registering the same number twice fails.
    pub async fn store_baby(&self, baby: &Baby) -> Result<()> {
        sqlx::query(
            "INSERT INTO babies (baby_number, name, birthdate, gender) VALUES (?, ?, ?, ?)",
        )
        .bind(&baby.baby_number)
        .bind(&baby.name)
        .bind(baby.birthdate.format("%Y-%m-%d").to_string())
        .bind(gender_to_str(baby.gender))
        .execute(self.db.pool())
        .await
        .context("Failed to store baby")?;
        Ok(())
    }

    /// Retrieve a baby by its number.
    pub async fn get_baby(&self, baby_number: &str) -> Result<Option<Baby>> {
        let row = sqlx::query(
            "SELECT baby_number, name, birthdate, gender FROM babies WHERE baby_number = ?",
        )
        .bind(baby_number)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(row_to_baby).transpose()
    }

    /// List all babies, newest registration number first.
    pub async fn list_babies(&self) -> Result<Vec<Baby>> {
        let rows = sqlx::query(
            "SELECT baby_number, name, birthdate, gender FROM babies ORDER BY baby_number DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        rows.into_iter().map(row_to_baby).collect()
    }

    /// Count registrations whose number starts with the given birthdate
    /// prefix. Used to pick the next sequence number.
    pub async fn count_with_prefix(&self, prefix: &str) -> Result<u32> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM babies WHERE baby_number LIKE ?")
            .bind(format!("{}-%", prefix))
            .fetch_one(self.db.pool())
            .await?;
        let n: i64 = row.get("n");
        Ok(n as u32)
    }
}

fn gender_to_str(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => "male",
        Gender::Female => "female",
    }
}

fn row_to_baby(row: sqlx::sqlite::SqliteRow) -> Result<Baby> {
    let birthdate: String = row.get("birthdate");
    let gender: String = row.get("gender");
    Ok(Baby {
        baby_number: row.get("baby_number"),
        name: row.get("name"),
        birthdate: NaiveDate::parse_from_str(&birthdate, "%Y-%m-%d")
            .context("Invalid birthdate in babies table")?,
        gender: match gender.as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            other => return Err(anyhow!("Unknown gender in babies table: {}", other)),
        },
    })
}
