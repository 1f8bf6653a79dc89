//! Persisted row shapes for the three menu tables.
//!
//! `is_removed` exists on every table but no query path filters on it;
//! deletes are hard deletes. The column is kept to match the schema, not to
//! implement soft deletion.

use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct MenuRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub is_removed: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmenuRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Nullable at the type level, but always set by the creation flow.
    pub parent_id: Option<Uuid>,
    pub is_removed: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DishRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// NUMERIC(8,2) in Postgres; normalized to two decimal places here.
    pub price: String,
    pub menu_id: Uuid,
    pub submenu_id: Uuid,
    pub is_removed: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
