use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::application::dto::{DishCreate, DishRead, DishUpdate, StatusMessage};
use crate::application::uow::UowFactory;

use super::{ApiError, ApiState};

pub async fn list<F>(
    State(state): State<ApiState<F>>,
    Path((_menu_id, submenu_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<DishRead>>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    Ok(Json(state.dishes.get_list(submenu_id).await?))
}

pub async fn detail<F>(
    State(state): State<ApiState<F>>,
    Path((_menu_id, _submenu_id, dish_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<DishRead>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    Ok(Json(state.dishes.get_detail(dish_id).await?))
}

pub async fn create<F>(
    State(state): State<ApiState<F>>,
    Path((menu_id, submenu_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<DishCreate>,
) -> Result<(StatusCode, Json<DishRead>), ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    let dish = state.dishes.create(menu_id, submenu_id, payload).await?;
    Ok((StatusCode::CREATED, Json(dish)))
}

pub async fn update<F>(
    State(state): State<ApiState<F>>,
    Path((_menu_id, _submenu_id, dish_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(payload): Json<DishUpdate>,
) -> Result<Json<DishRead>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    Ok(Json(state.dishes.update(dish_id, payload).await?))
}

pub async fn delete<F>(
    State(state): State<ApiState<F>>,
    Path((menu_id, submenu_id, dish_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<StatusMessage>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    let status = state.dishes.delete(menu_id, submenu_id, dish_id).await?;
    Ok(Json(StatusMessage {
        status,
        message: "The dish has been deleted".to_string(),
    }))
}
