//! Repository traits describing persistence adapters.
//!
//! Each repository operates against the transactional connection owned by
//! the active unit of work; `add`/`update`/`delete` stage changes and never
//! commit. `delete` is idempotent by contract: removing an id that does not
//! exist reports success, while `get`/`update` surface the absence.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{DishRecord, MenuRecord, SubmenuRecord};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }

    pub fn integrity(message: impl Into<String>) -> Self {
        Self::Integrity {
            message: message.into(),
        }
    }
}

/// Menu row plus its aggregate counts, computed per query via outer joins.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuListRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub submenus_count: i64,
    pub dishes_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmenuListRecord {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub dishes_count: i64,
}

#[derive(Debug, Clone)]
pub struct CreateMenuParams {
    pub title: String,
    pub description: String,
}

/// Sparse patch: only set fields overwrite the stored row.
#[derive(Debug, Clone, Default)]
pub struct MenuPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateSubmenuParams {
    pub parent_id: Option<Uuid>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct SubmenuPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateDishParams {
    pub menu_id: Uuid,
    pub submenu_id: Uuid,
    pub title: String,
    pub description: String,
    /// Normalized decimal string, two decimal places.
    pub price: String,
}

#[derive(Debug, Clone, Default)]
pub struct DishPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
}

#[async_trait]
pub trait MenusRepo: Send {
    async fn list(&mut self) -> Result<Vec<MenuListRecord>, RepoError>;

    async fn get(&mut self, menu_id: Uuid) -> Result<Option<MenuListRecord>, RepoError>;

    async fn add(&mut self, params: CreateMenuParams) -> Result<MenuRecord, RepoError>;

    async fn update(
        &mut self,
        menu_id: Uuid,
        patch: MenuPatch,
    ) -> Result<Option<MenuRecord>, RepoError>;

    /// Deletes the menu and, through cascade, its submenus and dishes.
    /// Always reports `true`, present or not.
    async fn delete(&mut self, menu_id: Uuid) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait SubmenusRepo: Send {
    async fn list(&mut self, menu_id: Uuid) -> Result<Vec<SubmenuListRecord>, RepoError>;

    async fn get(&mut self, submenu_id: Uuid) -> Result<Option<SubmenuListRecord>, RepoError>;

    async fn add(&mut self, params: CreateSubmenuParams) -> Result<SubmenuRecord, RepoError>;

    async fn update(
        &mut self,
        submenu_id: Uuid,
        patch: SubmenuPatch,
    ) -> Result<Option<SubmenuRecord>, RepoError>;

    /// Deletes the submenu and, through cascade, its dishes.
    async fn delete(&mut self, submenu_id: Uuid) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait DishesRepo: Send {
    async fn list(&mut self, submenu_id: Uuid) -> Result<Vec<DishRecord>, RepoError>;

    async fn get(&mut self, dish_id: Uuid) -> Result<Option<DishRecord>, RepoError>;

    async fn add(&mut self, params: CreateDishParams) -> Result<DishRecord, RepoError>;

    async fn update(
        &mut self,
        dish_id: Uuid,
        patch: DishPatch,
    ) -> Result<Option<DishRecord>, RepoError>;

    async fn delete(&mut self, dish_id: Uuid) -> Result<bool, RepoError>;
}
