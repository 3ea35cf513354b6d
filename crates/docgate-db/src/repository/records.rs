//! Record operations

use chrono::Utc;
use sqlx::Row;
use uuid::Uuid;

use crate::error::DbError;
use crate::models::{NewRecord, Record, RecordUpdate};
use crate::repository::Database;

const RECORD_COLUMNS: &str = "id, title, content, owner, created_at, updated_at";

impl Database {
    // ==================== Record Operations ====================

    /// Insert a new record
    pub async fn insert_record(&self, record: NewRecord) -> Result<Record, DbError> {
        let now = Utc::now();
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO records (id, title, content, owner, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&record.title)
        .bind(&record.content)
        .bind(&record.owner)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(Record {
            id,
            title: record.title,
            content: record.content,
            owner: record.owner,
            created_at: now,
            updated_at: now,
        })
    }

    /// List all records in insertion order
    pub async fn list_records(&self) -> Result<Vec<Record>, DbError> {
        let rows = sqlx::query(&format!("SELECT {} FROM records ORDER BY seq", RECORD_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| Record::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Get a record by ID
    pub async fn get_record(&self, id: Uuid) -> Result<Option<Record>, DbError> {
        let result = sqlx::query(&format!("SELECT {} FROM records WHERE id = ?", RECORD_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        result.map(|row| Record::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Apply a partial update and return the updated record
    pub async fn update_record(
        &self,
        id: Uuid,
        update: RecordUpdate,
    ) -> Result<Option<Record>, DbError> {
        let now = Utc::now();
        let result = sqlx::query(&format!(
            r#"
            UPDATE records
            SET title = COALESCE(?, title),
                content = COALESCE(?, content),
                updated_at = ?
            WHERE id = ?
            RETURNING {}
            "#,
            RECORD_COLUMNS
        ))
        .bind(update.title)
        .bind(update.content)
        .bind(now.to_rfc3339())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Record::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Delete a record and return what was removed
    pub async fn delete_record(&self, id: Uuid) -> Result<Option<Record>, DbError> {
        let result = sqlx::query(&format!(
            "DELETE FROM records WHERE id = ? RETURNING {}",
            RECORD_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Record::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Count stored records
    pub async fn count_records(&self) -> Result<i64, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM records")
            .fetch_one(&self.pool)
            .await?;
        Ok(result.get("count"))
    }
}
