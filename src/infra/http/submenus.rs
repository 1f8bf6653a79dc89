use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::application::dto::{StatusMessage, SubmenuCreate, SubmenuRead, SubmenuUpdate};
use crate::application::uow::UowFactory;

use super::{ApiError, ApiState};

pub async fn list<F>(
    State(state): State<ApiState<F>>,
    Path(menu_id): Path<Uuid>,
) -> Result<Json<Vec<SubmenuRead>>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    Ok(Json(state.submenus.get_list(menu_id).await?))
}

pub async fn detail<F>(
    State(state): State<ApiState<F>>,
    Path((_menu_id, submenu_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SubmenuRead>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    Ok(Json(state.submenus.get_detail(submenu_id).await?))
}

pub async fn create<F>(
    State(state): State<ApiState<F>>,
    Path(menu_id): Path<Uuid>,
    Json(payload): Json<SubmenuCreate>,
) -> Result<(StatusCode, Json<SubmenuRead>), ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    let submenu = state.submenus.create(menu_id, payload).await?;
    Ok((StatusCode::CREATED, Json(submenu)))
}

pub async fn update<F>(
    State(state): State<ApiState<F>>,
    Path((_menu_id, submenu_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SubmenuUpdate>,
) -> Result<Json<SubmenuRead>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    Ok(Json(state.submenus.update(submenu_id, payload).await?))
}

pub async fn delete<F>(
    State(state): State<ApiState<F>>,
    Path((menu_id, submenu_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<StatusMessage>, ApiError>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    let status = state.submenus.delete(menu_id, submenu_id).await?;
    Ok(Json(StatusMessage {
        status,
        message: "The submenu has been deleted".to_string(),
    }))
}
