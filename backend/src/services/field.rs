//! Field management service for estate configuration

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Field;
use shared::validation::validate_name;

/// Field service for managing cultivated fields
#[derive(Clone)]
pub struct FieldService {
    db: PgPool,
}

/// Database row for a field
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct FieldRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<FieldRow> for Field {
    fn from(row: FieldRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

/// Input for creating a field
#[derive(Debug, Deserialize)]
pub struct CreateFieldInput {
    pub name: String,
}

/// Input for renaming a field
#[derive(Debug, Deserialize)]
pub struct UpdateFieldInput {
    pub name: String,
}

impl FieldService {
    /// Create a new FieldService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all fields, ordered by name
    pub async fn get_fields(&self) -> AppResult<Vec<Field>> {
        let rows = sqlx::query_as::<_, FieldRow>(
            "SELECT id, name, created_at FROM fields ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Field::from).collect())
    }

    /// Get a field by ID
    pub async fn get_field(&self, field_id: Uuid) -> AppResult<Field> {
        let row = sqlx::query_as::<_, FieldRow>(
            "SELECT id, name, created_at FROM fields WHERE id = $1",
        )
        .bind(field_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Field".to_string()))?;

        Ok(Field::from(row))
    }

    /// Create a new field
    pub async fn create_field(&self, input: CreateFieldInput) -> AppResult<Field> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
            message_si: format!("නම වලංගු නොවේ: {}", msg),
        })?;

        let row = sqlx::query_as::<_, FieldRow>(
            "INSERT INTO fields (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(input.name.trim())
        .fetch_one(&self.db)
        .await?;

        Ok(Field::from(row))
    }

    /// Rename a field
    pub async fn update_field(&self, field_id: Uuid, input: UpdateFieldInput) -> AppResult<Field> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
            message_si: format!("නම වලංගු නොවේ: {}", msg),
        })?;

        let row = sqlx::query_as::<_, FieldRow>(
            "UPDATE fields SET name = $1 WHERE id = $2 RETURNING id, name, created_at",
        )
        .bind(input.name.trim())
        .bind(field_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Field".to_string()))?;

        Ok(Field::from(row))
    }

    /// Delete a field. Refused while harvests or expenses still reference it.
    pub async fn delete_field(&self, field_id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM fields WHERE id = $1")
                .bind(field_id)
                .fetch_one(&self.db)
                .await?;

        if exists == 0 {
            return Err(AppError::NotFound("Field".to_string()));
        }

        let referenced = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT (SELECT COUNT(*) FROM harvests WHERE field_id = $1)
                 + (SELECT COUNT(*) FROM transactions WHERE field_id = $1)
            "#,
        )
        .bind(field_id)
        .fetch_one(&self.db)
        .await?;

        if referenced > 0 {
            return Err(AppError::Conflict {
                resource: "field".to_string(),
                message: format!(
                    "Cannot delete field: {} records are linked to it",
                    referenced
                ),
                message_si: format!(
                    "ක්ෂේත්‍රය මැකීමට නොහැක: වාර්තා {} ක් ඊට සම්බන්ධ වී ඇත",
                    referenced
                ),
            });
        }

        sqlx::query("DELETE FROM fields WHERE id = $1")
            .bind(field_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
