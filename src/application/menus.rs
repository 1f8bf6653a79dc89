//! Menu service: read-through cache over the menu repository, with
//! write-through invalidation of every key a menu write can stale.

use std::sync::Arc;

use uuid::Uuid;

use super::cache_ops;
use super::dto::{MenuCreate, MenuDetail, MenuRead, MenuUpdate, SubmenuRead};
use super::error::ServiceError;
use super::repos::{CreateMenuParams, MenuPatch, MenusRepo, SubmenusRepo};
use super::uow::{UnitOfWork, UowFactory};
use crate::cache::{keys, Cache};
use crate::domain::validate;

pub struct MenuService<F> {
    cache: Arc<dyn Cache>,
    uow: F,
}

impl<F: Clone> Clone for MenuService<F> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            uow: self.uow.clone(),
        }
    }
}

impl<F: UowFactory> MenuService<F> {
    pub fn new(cache: Arc<dyn Cache>, uow: F) -> Self {
        Self { cache, uow }
    }

    pub async fn get_list(&self) -> Result<Vec<MenuRead>, ServiceError> {
        if let Some(cached) = cache_ops::fetch::<Vec<MenuRead>>(&*self.cache, keys::MENU_LIST).await
        {
            return Ok(cached);
        }

        let mut uow = self.uow.begin().await?;
        let rows = uow.menus().list().await?;
        let menus: Vec<MenuRead> = rows.into_iter().map(MenuRead::from).collect();
        cache_ops::store(&*self.cache, keys::MENU_LIST, &menus).await;
        uow.commit().await?;
        Ok(menus)
    }

    pub async fn get_detail(&self, menu_id: Uuid) -> Result<MenuDetail, ServiceError> {
        let key = keys::entity(menu_id);
        if let Some(cached) = cache_ops::fetch::<MenuDetail>(&*self.cache, &key).await {
            return Ok(cached);
        }

        let mut uow = self.uow.begin().await?;
        let Some(menu) = uow.menus().get(menu_id).await? else {
            return Err(ServiceError::not_found("menu"));
        };
        let submenus: Vec<SubmenuRead> = uow
            .submenus()
            .list(menu_id)
            .await?
            .into_iter()
            .map(SubmenuRead::from)
            .collect();
        let detail = MenuDetail::new(menu, submenus);
        cache_ops::store(&*self.cache, &key, &detail).await;
        uow.commit().await?;
        Ok(detail)
    }

    pub async fn create(&self, data: MenuCreate) -> Result<MenuRead, ServiceError> {
        validate::title(&data.title)?;
        validate::description(&data.description)?;

        let mut uow = self.uow.begin().await?;
        let menu = uow
            .menus()
            .add(CreateMenuParams {
                title: data.title,
                description: data.description,
            })
            .await?;
        cache_ops::invalidate(&*self.cache, &[keys::MENU_LIST]).await;
        uow.commit().await?;
        Ok(MenuRead::from(menu))
    }

    pub async fn update(&self, menu_id: Uuid, data: MenuUpdate) -> Result<MenuRead, ServiceError> {
        if let Some(title) = data.title.as_deref() {
            validate::title(title)?;
        }
        if let Some(description) = data.description.as_deref() {
            validate::description(description)?;
        }

        let mut uow = self.uow.begin().await?;
        let patch = MenuPatch {
            title: data.title,
            description: data.description,
        };
        let Some(menu) = uow.menus().update(menu_id, patch).await? else {
            return Err(ServiceError::not_found("menu"));
        };
        cache_ops::invalidate(&*self.cache, &[&keys::entity(menu_id), keys::MENU_LIST]).await;
        uow.commit().await?;
        Ok(MenuRead::from(menu))
    }

    pub async fn delete(&self, menu_id: Uuid) -> Result<bool, ServiceError> {
        let mut uow = self.uow.begin().await?;
        let deleted = uow.menus().delete(menu_id).await?;
        cache_ops::invalidate(&*self.cache, &[&keys::entity(menu_id), keys::MENU_LIST]).await;
        uow.commit().await?;
        Ok(deleted)
    }
}
