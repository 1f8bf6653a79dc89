//! Submenu service. A submenu write can stale its own keys and the owning
//! menu's projection (counts), so invalidation reaches one level up.

use std::sync::Arc;

use uuid::Uuid;

use super::cache_ops;
use super::dto::{SubmenuCreate, SubmenuRead, SubmenuUpdate};
use super::error::ServiceError;
use super::repos::{CreateSubmenuParams, SubmenuPatch, SubmenusRepo};
use super::uow::{UnitOfWork, UowFactory};
use crate::cache::{keys, Cache};
use crate::domain::validate;

pub struct SubmenuService<F> {
    cache: Arc<dyn Cache>,
    uow: F,
}

impl<F: Clone> Clone for SubmenuService<F> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            uow: self.uow.clone(),
        }
    }
}

impl<F: UowFactory> SubmenuService<F> {
    pub fn new(cache: Arc<dyn Cache>, uow: F) -> Self {
        Self { cache, uow }
    }

    pub async fn get_list(&self, menu_id: Uuid) -> Result<Vec<SubmenuRead>, ServiceError> {
        if let Some(cached) =
            cache_ops::fetch::<Vec<SubmenuRead>>(&*self.cache, keys::SUBMENU_LIST).await
        {
            return Ok(cached);
        }

        let mut uow = self.uow.begin().await?;
        let rows = uow.submenus().list(menu_id).await?;
        let submenus: Vec<SubmenuRead> = rows.into_iter().map(SubmenuRead::from).collect();
        cache_ops::store(&*self.cache, keys::SUBMENU_LIST, &submenus).await;
        uow.commit().await?;
        Ok(submenus)
    }

    pub async fn get_detail(&self, submenu_id: Uuid) -> Result<SubmenuRead, ServiceError> {
        let key = keys::entity(submenu_id);
        if let Some(cached) = cache_ops::fetch::<SubmenuRead>(&*self.cache, &key).await {
            return Ok(cached);
        }

        let mut uow = self.uow.begin().await?;
        let Some(submenu) = uow.submenus().get(submenu_id).await? else {
            return Err(ServiceError::not_found("submenu"));
        };
        let submenu = SubmenuRead::from(submenu);
        cache_ops::store(&*self.cache, &key, &submenu).await;
        uow.commit().await?;
        Ok(submenu)
    }

    /// The parent menu id comes from the URL path and overrides whatever the
    /// payload carried.
    pub async fn create(
        &self,
        menu_id: Uuid,
        data: SubmenuCreate,
    ) -> Result<SubmenuRead, ServiceError> {
        validate::title(&data.title)?;
        validate::description(&data.description)?;

        let mut uow = self.uow.begin().await?;
        let submenu = uow
            .submenus()
            .add(CreateSubmenuParams {
                parent_id: Some(menu_id),
                title: data.title,
                description: data.description,
            })
            .await?;
        cache_ops::invalidate(
            &*self.cache,
            &[&keys::entity(menu_id), keys::MENU_LIST, keys::SUBMENU_LIST],
        )
        .await;
        uow.commit().await?;
        Ok(SubmenuRead::from(submenu))
    }

    pub async fn update(
        &self,
        submenu_id: Uuid,
        data: SubmenuUpdate,
    ) -> Result<SubmenuRead, ServiceError> {
        if let Some(title) = data.title.as_deref() {
            validate::title(title)?;
        }
        if let Some(description) = data.description.as_deref() {
            validate::description(description)?;
        }

        let mut uow = self.uow.begin().await?;
        let patch = SubmenuPatch {
            title: data.title,
            description: data.description,
        };
        let Some(submenu) = uow.submenus().update(submenu_id, patch).await? else {
            return Err(ServiceError::not_found("submenu"));
        };
        cache_ops::invalidate(
            &*self.cache,
            &[&keys::entity(submenu_id), keys::SUBMENU_LIST],
        )
        .await;
        uow.commit().await?;
        Ok(SubmenuRead::from(submenu))
    }

    pub async fn delete(&self, menu_id: Uuid, submenu_id: Uuid) -> Result<bool, ServiceError> {
        let mut uow = self.uow.begin().await?;
        let deleted = uow.submenus().delete(submenu_id).await?;
        cache_ops::invalidate(
            &*self.cache,
            &[
                &keys::entity(submenu_id),
                &keys::entity(menu_id),
                keys::SUBMENU_LIST,
            ],
        )
        .await;
        uow.commit().await?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::MenuCreate;
    use crate::application::menus::MenuService;
    use crate::cache::MemoryCache;
    use crate::infra::mem::MemUowFactory;

    struct Fixture {
        menus: MenuService<MemUowFactory>,
        submenus: SubmenuService<MemUowFactory>,
        cache: MemoryCache,
    }

    fn fixture() -> Fixture {
        let cache = MemoryCache::new();
        let factory = MemUowFactory::new();
        Fixture {
            menus: MenuService::new(Arc::new(cache.clone()), factory.clone()),
            submenus: SubmenuService::new(Arc::new(cache.clone()), factory),
            cache,
        }
    }

    async fn seed_menu(fixture: &Fixture) -> Uuid {
        fixture
            .menus
            .create(MenuCreate {
                title: "Lunch".into(),
                description: "midday".into(),
            })
            .await
            .unwrap()
            .id
    }

    fn payload(title: &str) -> SubmenuCreate {
        SubmenuCreate {
            parent_id: None,
            title: title.to_string(),
            description: "a submenu".to_string(),
        }
    }

    #[tokio::test]
    async fn create_injects_parent_from_path_over_payload() {
        let fixture = fixture();
        let menu_id = seed_menu(&fixture).await;

        let bogus = SubmenuCreate {
            parent_id: Some(Uuid::new_v4()),
            ..payload("Soups")
        };
        fixture.submenus.create(menu_id, bogus).await.unwrap();

        let listed = fixture.submenus.get_list(menu_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Soups");
    }

    #[tokio::test]
    async fn create_invalidates_parent_menu_keys() {
        let fixture = fixture();
        let menu_id = seed_menu(&fixture).await;
        fixture.menus.get_list().await.unwrap();
        fixture.menus.get_detail(menu_id).await.unwrap();

        fixture
            .submenus
            .create(menu_id, payload("Soups"))
            .await
            .unwrap();

        assert_eq!(fixture.cache.get(keys::MENU_LIST).await.unwrap(), None);
        assert_eq!(
            fixture.cache.get(&keys::entity(menu_id)).await.unwrap(),
            None
        );
        assert_eq!(fixture.cache.get(keys::SUBMENU_LIST).await.unwrap(), None);
    }

    #[tokio::test]
    async fn get_detail_unknown_id_is_not_found() {
        let fixture = fixture();
        let err = fixture
            .submenus
            .get_detail(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "submenu" }));
        assert!(fixture.cache.is_empty().await);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let fixture = fixture();
        let menu_id = seed_menu(&fixture).await;
        assert!(fixture
            .submenus
            .delete(menu_id, Uuid::new_v4())
            .await
            .unwrap());
    }
}
