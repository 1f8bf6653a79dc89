//! HTTP surface: the versioned REST API over the entity services.
//!
//! Handlers are thin: decode path/body, call the service, encode the
//! projection. Error payloads are `{"detail": "..."}` with the status chosen
//! by error kind; `NotFound` is the only service error with an entity-specific
//! message.

mod dishes;
mod menus;
mod submenus;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;
use sqlx::PgPool;

use crate::application::dishes::DishService;
use crate::application::error::ServiceError;
use crate::application::menus::MenuService;
use crate::application::submenus::SubmenuService;
use crate::application::uow::UowFactory;

#[derive(Debug, Clone, serde::Serialize)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

pub struct ApiState<F> {
    pub menus: MenuService<F>,
    pub submenus: SubmenuService<F>,
    pub dishes: DishService<F>,
    pub info: AppInfo,
    /// Absent when running against the in-memory backend.
    pub db: Option<PgPool>,
}

impl<F: Clone> Clone for ApiState<F> {
    fn clone(&self) -> Self {
        Self {
            menus: self.menus.clone(),
            submenus: self.submenus.clone(),
            dishes: self.dishes.clone(),
            info: self.info.clone(),
            db: self.db.clone(),
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { entity } => {
                Self::new(StatusCode::NOT_FOUND, format!("{entity} not found"))
            }
            ServiceError::Domain(domain) => Self::new(StatusCode::BAD_REQUEST, domain.to_string()),
            ServiceError::Repo(repo) => {
                use crate::application::repos::RepoError;
                match repo {
                    RepoError::Integrity { message } => Self::new(StatusCode::CONFLICT, message),
                    RepoError::Timeout => {
                        Self::new(StatusCode::SERVICE_UNAVAILABLE, "database timeout")
                    }
                    RepoError::Persistence(message) => {
                        tracing::error!(error = %message, "persistence failure");
                        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
                    }
                }
            }
        }
    }
}

pub fn build_router<F>(state: ApiState<F>) -> Router
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(app_info::<F>))
        .route("/health/db", get(db_health::<F>))
        .route(
            "/api/v1/menus",
            get(menus::list::<F>).post(menus::create::<F>),
        )
        .route(
            "/api/v1/menus/{menu_id}",
            get(menus::detail::<F>)
                .patch(menus::update::<F>)
                .delete(menus::delete::<F>),
        )
        .route(
            "/api/v1/menus/{menu_id}/submenus",
            get(submenus::list::<F>).post(submenus::create::<F>),
        )
        .route(
            "/api/v1/menus/{menu_id}/submenus/{submenu_id}",
            get(submenus::detail::<F>)
                .patch(submenus::update::<F>)
                .delete(submenus::delete::<F>),
        )
        .route(
            "/api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes",
            get(dishes::list::<F>).post(dishes::create::<F>),
        )
        .route(
            "/api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id}",
            get(dishes::detail::<F>)
                .patch(dishes::update::<F>)
                .delete(dishes::delete::<F>),
        )
        .with_state(state)
}

async fn app_info<F>(State(state): State<ApiState<F>>) -> Json<AppInfo>
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    Json(state.info)
}

async fn db_health<F>(State(state): State<ApiState<F>>) -> Response
where
    F: UowFactory + Clone + Send + Sync + 'static,
{
    let Some(pool) = state.db.as_ref() else {
        return StatusCode::NO_CONTENT.into_response();
    };

    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "database health check failed");
            ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "database unreachable")
                .into_response()
        }
    }
}
