use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use carta::application::dishes::DishService;
use carta::application::menus::MenuService;
use carta::application::submenus::SubmenuService;
use carta::cache::MemoryCache;
use carta::infra::http::{ApiState, AppInfo, build_router};
use carta::infra::mem::MemUowFactory;

fn build_app() -> Router {
    let cache = Arc::new(MemoryCache::new());
    let factory = MemUowFactory::new();

    build_router(ApiState {
        menus: MenuService::new(cache.clone(), factory.clone()),
        submenus: SubmenuService::new(cache.clone(), factory.clone()),
        dishes: DishService::new(cache.clone(), factory.clone()),
        info: AppInfo {
            name: "Carta".to_string(),
            version: "test".to_string(),
            description: "Restaurant menu service".to_string(),
        },
        db: None,
    })
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(payload) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_menu(app: &Router, title: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/menus",
        Some(json!({ "title": title, "description": "a menu" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn create_submenu(app: &Router, menu_id: &str, title: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/v1/menus/{menu_id}/submenus"),
        Some(json!({ "title": title, "description": "a submenu" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

async fn create_dish(app: &Router, menu_id: &str, submenu_id: &str, title: &str, price: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes"),
        Some(json!({ "title": title, "description": "a dish", "price": price })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn root_reports_application_info() {
    let app = build_app();
    let (status, body) = send(&app, "GET", "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Carta");
    assert_eq!(body["version"], "test");
}

#[tokio::test]
async fn db_health_is_no_content_without_a_pool() {
    let app = build_app();
    let (status, body) = send(&app, "GET", "/health/db", None).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn menu_crud_round_trip() {
    let app = build_app();

    let menu = create_menu(&app, "Lunch").await;
    let menu_id = menu["id"].as_str().unwrap().to_string();
    assert_eq!(menu["title"], "Lunch");
    assert_eq!(menu["submenus_count"], 0);

    let (status, listed) = send(&app, "GET", "/api/v1/menus", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, patched) = send(
        &app,
        "PATCH",
        &format!("/api/v1/menus/{menu_id}"),
        Some(json!({ "title": "Brunch" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["title"], "Brunch");
    assert_eq!(patched["description"], "a menu");

    let (status, deleted) = send(&app, "DELETE", &format!("/api/v1/menus/{menu_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        deleted,
        json!({ "status": true, "message": "The menu has been deleted" })
    );

    let (status, body) = send(&app, "GET", &format!("/api/v1/menus/{menu_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "menu not found" }));
}

#[tokio::test]
async fn counts_are_visible_through_the_api() {
    let app = build_app();

    let menu = create_menu(&app, "Lunch").await;
    let menu_id = menu["id"].as_str().unwrap().to_string();
    let submenu = create_submenu(&app, &menu_id, "Soups").await;
    let submenu_id = submenu["id"].as_str().unwrap().to_string();
    create_dish(&app, &menu_id, &submenu_id, "Borscht", "7.80").await;
    create_dish(&app, &menu_id, &submenu_id, "Gazpacho", "6.00").await;

    let (status, detail) = send(&app, "GET", &format!("/api/v1/menus/{menu_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["submenus_count"], 1);
    assert_eq!(detail["dishes_count"], 2);
    assert_eq!(detail["submenus"].as_array().unwrap().len(), 1);
    assert_eq!(detail["submenus"][0]["dishes_count"], 2);

    let (status, submenu) = send(
        &app,
        "GET",
        &format!("/api/v1/menus/{menu_id}/submenus/{submenu_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submenu["dishes_count"], 2);
}

#[tokio::test]
async fn deleting_a_menu_cascades_through_the_api() {
    let app = build_app();

    let menu = create_menu(&app, "Lunch").await;
    let menu_id = menu["id"].as_str().unwrap().to_string();
    let submenu = create_submenu(&app, &menu_id, "Soups").await;
    let submenu_id = submenu["id"].as_str().unwrap().to_string();
    let dish = create_dish(&app, &menu_id, &submenu_id, "Borscht", "7.80").await;
    let dish_id = dish["id"].as_str().unwrap().to_string();

    send(&app, "DELETE", &format!("/api/v1/menus/{menu_id}"), None).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/menus/{menu_id}/submenus/{submenu_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "submenu not found" }));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "dish not found" }));
}

#[tokio::test]
async fn dish_price_is_normalized_and_patchable_alone() {
    let app = build_app();

    let menu = create_menu(&app, "Lunch").await;
    let menu_id = menu["id"].as_str().unwrap().to_string();
    let submenu = create_submenu(&app, &menu_id, "Soups").await;
    let submenu_id = submenu["id"].as_str().unwrap().to_string();
    let dish = create_dish(&app, &menu_id, &submenu_id, "Borscht", "7.8").await;
    let dish_id = dish["id"].as_str().unwrap().to_string();
    assert_eq!(dish["price"], "7.80");

    let (status, patched) = send(
        &app,
        "PATCH",
        &format!("/api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes/{dish_id}"),
        Some(json!({ "price": "12.5" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["price"], "12.50");
    assert_eq!(patched["title"], "Borscht");
}

#[tokio::test]
async fn invalid_payloads_are_rejected_with_bad_request() {
    let app = build_app();

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/menus",
        Some(json!({ "title": "", "description": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let menu = create_menu(&app, "Lunch").await;
    let menu_id = menu["id"].as_str().unwrap().to_string();
    let submenu = create_submenu(&app, &menu_id, "Soups").await;
    let submenu_id = submenu["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/menus/{menu_id}/submenus/{submenu_id}/dishes"),
        Some(json!({ "title": "Borscht", "description": "x", "price": "12.345" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("price"));
}

#[tokio::test]
async fn delete_is_idempotent_through_the_api() {
    let app = build_app();

    let menu = create_menu(&app, "Lunch").await;
    let menu_id = menu["id"].as_str().unwrap().to_string();

    send(&app, "DELETE", &format!("/api/v1/menus/{menu_id}"), None).await;
    let (status, body) = send(&app, "DELETE", &format!("/api/v1/menus/{menu_id}"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], true);
}

// The submenu list is cached under a single shared key, so the first list
// read after a write wins regardless of which menu it was scoped to. Each
// assertion therefore uses the first read after the last submenu write.
#[tokio::test]
async fn submenu_list_reflects_the_store_on_a_cold_read() {
    let app = build_app();

    let lunch = create_menu(&app, "Lunch").await;
    let lunch_id = lunch["id"].as_str().unwrap().to_string();
    create_submenu(&app, &lunch_id, "Soups").await;

    let (status, listed) = send(
        &app,
        "GET",
        &format!("/api/v1/menus/{lunch_id}/submenus"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["title"], "Soups");

    let app = build_app();
    let menu = create_menu(&app, "Empty").await;
    let menu_id = menu["id"].as_str().unwrap().to_string();
    let (status, listed) = send(
        &app,
        "GET",
        &format!("/api/v1/menus/{menu_id}/submenus"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}
