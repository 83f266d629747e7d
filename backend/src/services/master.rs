//! Master data service: activity and inventory lookup tables

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{ActivityMaster, InventoryItem};
use shared::validation::{validate_name, validate_rate};

/// Master data service for expense entry lookups
#[derive(Clone)]
pub struct MasterDataService {
    db: PgPool,
}

/// Database row for an activity
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ActivityRow {
    pub id: Uuid,
    pub name: String,
    pub default_rate: Option<Decimal>,
}

impl From<ActivityRow> for ActivityMaster {
    fn from(row: ActivityRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            default_rate: row.default_rate,
        }
    }
}

/// Database row for an inventory item
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct InventoryItemRow {
    pub id: Uuid,
    pub name: String,
    pub unit_price: Option<Decimal>,
}

impl From<InventoryItemRow> for InventoryItem {
    fn from(row: InventoryItemRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            unit_price: row.unit_price,
        }
    }
}

/// Input for updating an activity's standard rate
#[derive(Debug, Deserialize)]
pub struct UpdateActivityInput {
    pub name: String,
    pub default_rate: Option<Decimal>,
}

impl MasterDataService {
    /// Create a new MasterDataService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get all labor activities in their configured order
    pub async fn get_activities(&self) -> AppResult<Vec<ActivityMaster>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            "SELECT id, name, default_rate FROM activity_master ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(ActivityMaster::from).collect())
    }

    /// Update an activity's name and default rate
    pub async fn update_activity(
        &self,
        activity_id: Uuid,
        input: UpdateActivityInput,
    ) -> AppResult<ActivityMaster> {
        validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
            message_si: format!("නම වලංගු නොවේ: {}", msg),
        })?;
        if let Some(rate) = input.default_rate {
            validate_rate(rate).map_err(|msg| AppError::Validation {
                field: "default_rate".to_string(),
                message: msg.to_string(),
                message_si: format!("මිල වලංගු නොවේ: {}", msg),
            })?;
        }

        let row = sqlx::query_as::<_, ActivityRow>(
            r#"
            UPDATE activity_master
            SET name = $1, default_rate = $2
            WHERE id = $3
            RETURNING id, name, default_rate
            "#,
        )
        .bind(input.name.trim())
        .bind(input.default_rate)
        .bind(activity_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Activity".to_string()))?;

        Ok(ActivityMaster::from(row))
    }

    /// Get all inventory items
    pub async fn get_inventory_items(&self) -> AppResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryItemRow>(
            "SELECT id, name, unit_price FROM inventory_master ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(InventoryItem::from).collect())
    }
}
