use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::application::dto::{MenuCreate, MenuDetail, MenuRead, MenuUpdate, StatusMessage};
use crate::application::uow::UowFactory;

use super::{ApiError, ApiState};

pub async fn list<F>(State(state): State<ApiState<F>>) -> Result<Json<Vec<MenuRead>>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    Ok(Json(state.menus.get_list().await?))
}

pub async fn detail<F>(
    State(state): State<ApiState<F>>,
    Path(menu_id): Path<Uuid>,
) -> Result<Json<MenuDetail>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    Ok(Json(state.menus.get_detail(menu_id).await?))
}

pub async fn create<F>(
    State(state): State<ApiState<F>>,
    Json(payload): Json<MenuCreate>,
) -> Result<(StatusCode, Json<MenuRead>), ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    let menu = state.menus.create(payload).await?;
    Ok((StatusCode::CREATED, Json(menu)))
}

pub async fn update<F>(
    State(state): State<ApiState<F>>,
    Path(menu_id): Path<Uuid>,
    Json(payload): Json<MenuUpdate>,
) -> Result<Json<MenuRead>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    Ok(Json(state.menus.update(menu_id, payload).await?))
}

pub async fn delete<F>(
    State(state): State<ApiState<F>>,
    Path(menu_id): Path<Uuid>,
) -> Result<Json<StatusMessage>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    let status = state.menus.delete(menu_id).await?;
    Ok(Json(StatusMessage {
        status,
        message: "The menu has been deleted".to_string(),
    }))
}
