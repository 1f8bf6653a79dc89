use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateMenuParams, MenuListRecord, MenuPatch, MenusRepo, RepoError,
};
use crate::domain::entities::MenuRecord;

use super::map_sqlx_error;

// Aggregate counts are computed per query; nothing is denormalized.
const MENU_PROJECTION: &str = "\
    SELECT m.id, m.title, m.description, \
           COALESCE(COUNT(DISTINCT s.id), 0) AS submenus_count, \
           COALESCE(COUNT(d.id), 0) AS dishes_count \
    FROM menu m \
    LEFT OUTER JOIN submenu s ON s.parent_id = m.id \
    LEFT OUTER JOIN dish d ON d.submenu_id = s.id";

#[derive(sqlx::FromRow)]
struct MenuRow {
    id: Uuid,
    title: String,
    description: String,
    is_removed: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<MenuRow> for MenuRecord {
    fn from(row: MenuRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            is_removed: row.is_removed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MenuListRow {
    id: Uuid,
    title: String,
    description: String,
    submenus_count: i64,
    dishes_count: i64,
}

impl From<MenuListRow> for MenuListRecord {
    fn from(row: MenuListRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            submenus_count: row.submenus_count,
            dishes_count: row.dishes_count,
        }
    }
}

pub struct PgMenusRepo<'a> {
    pub(super) conn: &'a mut PgConnection,
}

#[async_trait]
impl MenusRepo for PgMenusRepo<'_> {
    async fn list(&mut self) -> Result<Vec<MenuListRecord>, RepoError> {
        let sql = format!("{MENU_PROJECTION} GROUP BY m.id ORDER BY m.created_at, m.id");
        let rows = sqlx::query_as::<_, MenuListRow>(&sql)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(MenuListRecord::from).collect())
    }

    async fn get(&mut self, menu_id: Uuid) -> Result<Option<MenuListRecord>, RepoError> {
        let sql = format!("{MENU_PROJECTION} WHERE m.id = $1 GROUP BY m.id");
        let row = sqlx::query_as::<_, MenuListRow>(&sql)
            .bind(menu_id)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(MenuListRecord::from))
    }

    async fn add(&mut self, params: CreateMenuParams) -> Result<MenuRecord, RepoError> {
        let row = sqlx::query_as::<_, MenuRow>(
            "INSERT INTO menu (id, title, description) \
             VALUES ($1, $2, $3) \
             RETURNING id, title, description, is_removed, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(params.title)
        .bind(params.description)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(map_sqlx_error)?;

        Ok(MenuRecord::from(row))
    }

    async fn update(
        &mut self,
        menu_id: Uuid,
        patch: MenuPatch,
    ) -> Result<Option<MenuRecord>, RepoError> {
        let row = sqlx::query_as::<_, MenuRow>(
            "UPDATE menu \
             SET title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING id, title, description, is_removed, created_at, updated_at",
        )
        .bind(menu_id)
        .bind(patch.title)
        .bind(patch.description)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(MenuRecord::from))
    }

    async fn delete(&mut self, menu_id: Uuid) -> Result<bool, RepoError> {
        // Submenus and dishes go with it via ON DELETE CASCADE.
        sqlx::query("DELETE FROM menu WHERE id = $1")
            .bind(menu_id)
            .execute(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(true)
    }
}
