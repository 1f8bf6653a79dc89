pub mod dishes;
pub mod dto;
pub mod error;
pub mod menus;
pub mod repos;
pub mod submenus;
pub mod uow;

mod cache_ops;
