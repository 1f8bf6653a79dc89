//! Unit of work: one transaction, three repositories, one commit boundary.
//!
//! A unit of work is begun per request by a [`UowFactory`] and exposes the
//! entity repositories bound to a single transaction. `commit` consumes it;
//! dropping it uncommitted rolls the transaction back and releases the
//! underlying connection on every exit path, including early returns and
//! commit failures. The unit of work never catches errors raised inside its
//! scope; they propagate to the caller after the implicit rollback.

use async_trait::async_trait;

use super::repos::{DishesRepo, MenusRepo, RepoError, SubmenusRepo};

#[async_trait]
pub trait UnitOfWork: Send + Sized {
    type Menus<'a>: MenusRepo + Send
    where
        Self: 'a;
    type Submenus<'a>: SubmenusRepo + Send
    where
        Self: 'a;
    type Dishes<'a>: DishesRepo + Send
    where
        Self: 'a;

    fn menus(&mut self) -> Self::Menus<'_>;

    fn submenus(&mut self) -> Self::Submenus<'_>;

    fn dishes(&mut self) -> Self::Dishes<'_>;

    async fn commit(self) -> Result<(), RepoError>;

    /// Explicit rollback. Equivalent to dropping the unit of work; provided
    /// for call sites that want the discard to be visible.
    async fn rollback(self) -> Result<(), RepoError>;
}

/// Begins a fresh unit of work per request. Constructed once at startup and
/// injected into every service; there is no global mutable slot.
#[async_trait]
pub trait UowFactory: Send + Sync {
    type Uow: UnitOfWork;

    async fn begin(&self) -> Result<Self::Uow, RepoError>;
}
