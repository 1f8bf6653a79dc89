//! Request payloads and response projections exchanged with the HTTP layer.
//!
//! Response projections are exactly what gets cached: the serialized JSON of
//! these types is stored verbatim and returned on a hit. Create/update
//! responses built from a live row carry zero counts; counts are only
//! computed by the aggregate list/get queries.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repos::{MenuListRecord, SubmenuListRecord};
use crate::domain::entities::{DishRecord, MenuRecord, SubmenuRecord};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuRead {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub submenus_count: i64,
    pub dishes_count: i64,
}

/// Menu detail: the aggregate projection plus its child submenu summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub submenus_count: i64,
    pub dishes_count: i64,
    pub submenus: Vec<SubmenuRead>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmenuRead {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub dishes_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DishRead {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Decimal string with two decimal places, e.g. "12.50".
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusMessage {
    pub status: bool,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuCreate {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct MenuUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmenuCreate {
    /// Ignored: the service injects the menu id from the URL path.
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SubmenuUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DishCreate {
    /// Ignored: the service injects both ids from the URL path.
    #[serde(default)]
    pub menu_id: Option<Uuid>,
    #[serde(default)]
    pub submenu_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub price: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DishUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
}

impl From<MenuListRecord> for MenuRead {
    fn from(record: MenuListRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            submenus_count: record.submenus_count,
            dishes_count: record.dishes_count,
        }
    }
}

impl MenuDetail {
    pub fn new(record: MenuListRecord, submenus: Vec<SubmenuRead>) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            submenus_count: record.submenus_count,
            dishes_count: record.dishes_count,
            submenus,
        }
    }
}

impl From<MenuRecord> for MenuRead {
    fn from(record: MenuRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            submenus_count: 0,
            dishes_count: 0,
        }
    }
}

impl From<SubmenuListRecord> for SubmenuRead {
    fn from(record: SubmenuListRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            dishes_count: record.dishes_count,
        }
    }
}

impl From<SubmenuRecord> for SubmenuRead {
    fn from(record: SubmenuRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            dishes_count: 0,
        }
    }
}

impl From<DishRecord> for DishRead {
    fn from(record: DishRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            price: record.price,
        }
    }
}
