use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateSubmenuParams, RepoError, SubmenuListRecord, SubmenuPatch, SubmenusRepo,
};
use crate::domain::entities::SubmenuRecord;

use super::map_sqlx_error;

const SUBMENU_PROJECTION: &str = "\
    SELECT s.id, s.title, s.description, \
           COALESCE(COUNT(d.id), 0) AS dishes_count \
    FROM submenu s \
    LEFT OUTER JOIN dish d ON d.submenu_id = s.id";

#[derive(sqlx::FromRow)]
struct SubmenuRow {
    id: Uuid,
    title: String,
    description: String,
    parent_id: Option<Uuid>,
    is_removed: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<SubmenuRow> for SubmenuRecord {
    fn from(row: SubmenuRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            parent_id: row.parent_id,
            is_removed: row.is_removed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SubmenuListRow {
    id: Uuid,
    title: String,
    description: String,
    dishes_count: i64,
}

impl From<SubmenuListRow> for SubmenuListRecord {
    fn from(row: SubmenuListRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            dishes_count: row.dishes_count,
        }
    }
}

pub struct PgSubmenusRepo<'a> {
    pub(super) conn: &'a mut PgConnection,
}

#[async_trait]
impl SubmenusRepo for PgSubmenusRepo<'_> {
    async fn list(&mut self, menu_id: Uuid) -> Result<Vec<SubmenuListRecord>, RepoError> {
        let sql = format!(
            "{SUBMENU_PROJECTION} WHERE s.parent_id = $1 GROUP BY s.id ORDER BY s.created_at, s.id"
        );
        let rows = sqlx::query_as::<_, SubmenuListRow>(&sql)
            .bind(menu_id)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(SubmenuListRecord::from).collect())
    }

    async fn get(&mut self, submenu_id: Uuid) -> Result<Option<SubmenuListRecord>, RepoError> {
        let sql = format!("{SUBMENU_PROJECTION} WHERE s.id = $1 GROUP BY s.id");
        let row = sqlx::query_as::<_, SubmenuListRow>(&sql)
            .bind(submenu_id)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(SubmenuListRecord::from))
    }

    async fn add(&mut self, params: CreateSubmenuParams) -> Result<SubmenuRecord, RepoError> {
        let row = sqlx::query_as::<_, SubmenuRow>(
            "INSERT INTO submenu (id, title, description, parent_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, title, description, parent_id, is_removed, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(params.title)
        .bind(params.description)
        .bind(params.parent_id)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(map_sqlx_error)?;

        Ok(SubmenuRecord::from(row))
    }

    async fn update(
        &mut self,
        submenu_id: Uuid,
        patch: SubmenuPatch,
    ) -> Result<Option<SubmenuRecord>, RepoError> {
        let row = sqlx::query_as::<_, SubmenuRow>(
            "UPDATE submenu \
             SET title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING id, title, description, parent_id, is_removed, created_at, updated_at",
        )
        .bind(submenu_id)
        .bind(patch.title)
        .bind(patch.description)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(SubmenuRecord::from))
    }

    async fn delete(&mut self, submenu_id: Uuid) -> Result<bool, RepoError> {
        sqlx::query("DELETE FROM submenu WHERE id = $1")
            .bind(submenu_id)
            .execute(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(true)
    }
}
