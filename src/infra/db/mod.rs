//! Postgres-backed unit of work and repositories.
//!
//! `PgUowFactory` wraps the connection pool; each `begin` checks out a
//! connection and opens a transaction that the unit of work owns for its
//! whole lifetime. `commit` consumes the transaction; dropping the unit of
//! work uncommitted rolls it back and returns the connection to the pool,
//! which is what makes early returns and commit failures safe.

mod dishes;
mod menus;
mod submenus;

pub use dishes::PgDishesRepo;
pub use menus::PgMenusRepo;
pub use submenus::PgSubmenusRepo;

use async_trait::async_trait;
use sqlx::{
    Postgres, Transaction,
    postgres::{PgPool, PgPoolOptions},
    query,
};

use crate::application::repos::RepoError;
use crate::application::uow::{UnitOfWork, UowFactory};

#[derive(Clone)]
pub struct PgUowFactory {
    pool: PgPool,
}

impl PgUowFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }
}

#[async_trait]
impl UowFactory for PgUowFactory {
    type Uow = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork, RepoError> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(PgUnitOfWork { tx })
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    type Menus<'a> = PgMenusRepo<'a>;
    type Submenus<'a> = PgSubmenusRepo<'a>;
    type Dishes<'a> = PgDishesRepo<'a>;

    fn menus(&mut self) -> PgMenusRepo<'_> {
        PgMenusRepo {
            conn: &mut *self.tx,
        }
    }

    fn submenus(&mut self) -> PgSubmenusRepo<'_> {
        PgSubmenusRepo {
            conn: &mut *self.tx,
        }
    }

    fn dishes(&mut self) -> PgDishesRepo<'_> {
        PgDishesRepo {
            conn: &mut *self.tx,
        }
    }

    async fn commit(self) -> Result<(), RepoError> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }

    async fn rollback(self) -> Result<(), RepoError> {
        self.tx.rollback().await.map_err(map_sqlx_error)
    }
}

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        sqlx::Error::Database(db) => match db.code().as_deref() {
            // not_null, foreign_key and unique violations
            Some("23502") | Some("23503") | Some("23505") => RepoError::Integrity {
                message: db.message().to_string(),
            },
            _ => RepoError::Persistence(db.message().to_string()),
        },
        other => RepoError::from_persistence(other),
    }
}
