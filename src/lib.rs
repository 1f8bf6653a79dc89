//! Carta: a menu-management REST backend.
//!
//! Three-level hierarchy (menus → submenus → dishes) over Postgres, fronted
//! by an optional Redis side cache. Each request runs its repository calls
//! inside one unit of work; reads populate the cache, writes invalidate it.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
