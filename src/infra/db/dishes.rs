use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{CreateDishParams, DishPatch, DishesRepo, RepoError};
use crate::domain::entities::DishRecord;

use super::map_sqlx_error;

// Price is NUMERIC(8,2) in the schema and a normalized string everywhere
// else, so it crosses the boundary as text in both directions.
const DISH_COLUMNS: &str = "id, title, description, price::text AS price, \
                            menu_id, submenu_id, is_removed, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct DishRow {
    id: Uuid,
    title: String,
    description: String,
    price: String,
    menu_id: Uuid,
    submenu_id: Uuid,
    is_removed: bool,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl From<DishRow> for DishRecord {
    fn from(row: DishRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            menu_id: row.menu_id,
            submenu_id: row.submenu_id,
            is_removed: row.is_removed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgDishesRepo<'a> {
    pub(super) conn: &'a mut PgConnection,
}

#[async_trait]
impl DishesRepo for PgDishesRepo<'_> {
    async fn list(&mut self, submenu_id: Uuid) -> Result<Vec<DishRecord>, RepoError> {
        let sql = format!(
            "SELECT {DISH_COLUMNS} FROM dish WHERE submenu_id = $1 ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, DishRow>(&sql)
            .bind(submenu_id)
            .fetch_all(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(DishRecord::from).collect())
    }

    async fn get(&mut self, dish_id: Uuid) -> Result<Option<DishRecord>, RepoError> {
        let sql = format!("SELECT {DISH_COLUMNS} FROM dish WHERE id = $1");
        let row = sqlx::query_as::<_, DishRow>(&sql)
            .bind(dish_id)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(DishRecord::from))
    }

    async fn add(&mut self, params: CreateDishParams) -> Result<DishRecord, RepoError> {
        let sql = format!(
            "INSERT INTO dish (id, title, description, price, menu_id, submenu_id) \
             VALUES ($1, $2, $3, $4::numeric, $5, $6) \
             RETURNING {DISH_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DishRow>(&sql)
            .bind(Uuid::new_v4())
            .bind(params.title)
            .bind(params.description)
            .bind(params.price)
            .bind(params.menu_id)
            .bind(params.submenu_id)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(DishRecord::from(row))
    }

    async fn update(
        &mut self,
        dish_id: Uuid,
        patch: DishPatch,
    ) -> Result<Option<DishRecord>, RepoError> {
        let sql = format!(
            "UPDATE dish \
             SET title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 price = COALESCE($4::numeric, price), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {DISH_COLUMNS}"
        );
        let row = sqlx::query_as::<_, DishRow>(&sql)
            .bind(dish_id)
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.price)
            .fetch_optional(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(DishRecord::from))
    }

    async fn delete(&mut self, dish_id: Uuid) -> Result<bool, RepoError> {
        sqlx::query("DELETE FROM dish WHERE id = $1")
            .bind(dish_id)
            .execute(&mut *self.conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(true)
    }
}
