pub mod entities;
pub mod error;
pub mod price;
pub mod validate;
