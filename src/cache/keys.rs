//! Cache key layout.
//!
//! List projections live under one fixed key per entity type; individual
//! entities live under their bare UUID. Entity keys are deliberately not
//! namespaced by type, matching the invalidation surface the services rely
//! on: a write deletes the parent's id key without knowing which table it
//! belongs to. The theoretical collision between two v4 UUIDs from different
//! tables is accepted.

use uuid::Uuid;

pub const MENU_LIST: &str = "menu-list";
pub const SUBMENU_LIST: &str = "submenu-list";
pub const DISH_LIST: &str = "dish-list";

pub fn entity(id: Uuid) -> String {
    id.to_string()
}
