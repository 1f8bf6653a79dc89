//! Dish service. Creating or deleting a dish changes the aggregate counts
//! two levels up, so invalidation covers the submenu, the menu, and every
//! affected list key.

use std::sync::Arc;

use uuid::Uuid;

use super::cache_ops;
use super::dto::{DishCreate, DishRead, DishUpdate};
use super::error::ServiceError;
use super::repos::{CreateDishParams, DishPatch, DishesRepo};
use super::uow::{UnitOfWork, UowFactory};
use crate::cache::{keys, Cache};
use crate::domain::{price, validate};

pub struct DishService<F> {
    cache: Arc<dyn Cache>,
    uow: F,
}

impl<F: Clone> Clone for DishService<F> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            uow: self.uow.clone(),
        }
    }
}

impl<F: UowFactory> DishService<F> {
    pub fn new(cache: Arc<dyn Cache>, uow: F) -> Self {
        Self { cache, uow }
    }

    pub async fn get_list(&self, submenu_id: Uuid) -> Result<Vec<DishRead>, ServiceError> {
        if let Some(cached) = cache_ops::fetch::<Vec<DishRead>>(&*self.cache, keys::DISH_LIST).await
        {
            return Ok(cached);
        }

        let mut uow = self.uow.begin().await?;
        let rows = uow.dishes().list(submenu_id).await?;
        let dishes: Vec<DishRead> = rows.into_iter().map(DishRead::from).collect();
        cache_ops::store(&*self.cache, keys::DISH_LIST, &dishes).await;
        uow.commit().await?;
        Ok(dishes)
    }

    pub async fn get_detail(&self, dish_id: Uuid) -> Result<DishRead, ServiceError> {
        let key = keys::entity(dish_id);
        if let Some(cached) = cache_ops::fetch::<DishRead>(&*self.cache, &key).await {
            return Ok(cached);
        }

        let mut uow = self.uow.begin().await?;
        let Some(dish) = uow.dishes().get(dish_id).await? else {
            return Err(ServiceError::not_found("dish"));
        };
        let dish = DishRead::from(dish);
        cache_ops::store(&*self.cache, &key, &dish).await;
        uow.commit().await?;
        Ok(dish)
    }

    /// Both foreign keys come from the URL path, overriding the payload.
    pub async fn create(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        data: DishCreate,
    ) -> Result<DishRead, ServiceError> {
        validate::title(&data.title)?;
        validate::description(&data.description)?;
        let price = price::normalize(&data.price)?;

        let mut uow = self.uow.begin().await?;
        let dish = uow
            .dishes()
            .add(CreateDishParams {
                menu_id,
                submenu_id,
                title: data.title,
                description: data.description,
                price,
            })
            .await?;
        cache_ops::invalidate(
            &*self.cache,
            &[
                &keys::entity(menu_id),
                &keys::entity(submenu_id),
                keys::MENU_LIST,
                keys::SUBMENU_LIST,
                keys::DISH_LIST,
            ],
        )
        .await;
        uow.commit().await?;
        Ok(DishRead::from(dish))
    }

    pub async fn update(&self, dish_id: Uuid, data: DishUpdate) -> Result<DishRead, ServiceError> {
        if let Some(title) = data.title.as_deref() {
            validate::title(title)?;
        }
        if let Some(description) = data.description.as_deref() {
            validate::description(description)?;
        }
        let price = match data.price.as_deref() {
            Some(raw) => Some(price::normalize(raw)?),
            None => None,
        };

        let mut uow = self.uow.begin().await?;
        let patch = DishPatch {
            title: data.title,
            description: data.description,
            price,
        };
        let Some(dish) = uow.dishes().update(dish_id, patch).await? else {
            return Err(ServiceError::not_found("dish"));
        };
        cache_ops::invalidate(&*self.cache, &[&keys::entity(dish_id), keys::DISH_LIST]).await;
        uow.commit().await?;
        Ok(DishRead::from(dish))
    }

    pub async fn delete(
        &self,
        menu_id: Uuid,
        submenu_id: Uuid,
        dish_id: Uuid,
    ) -> Result<bool, ServiceError> {
        let mut uow = self.uow.begin().await?;
        let deleted = uow.dishes().delete(dish_id).await?;
        cache_ops::invalidate(
            &*self.cache,
            &[
                &keys::entity(dish_id),
                &keys::entity(submenu_id),
                &keys::entity(menu_id),
                keys::DISH_LIST,
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
    use crate::application::dto::{MenuCreate, SubmenuCreate};
    use crate::application::menus::MenuService;
    use crate::application::submenus::SubmenuService;
    use crate::cache::MemoryCache;
    use crate::infra::mem::MemUowFactory;

    struct Fixture {
        menus: MenuService<MemUowFactory>,
        submenus: SubmenuService<MemUowFactory>,
        dishes: DishService<MemUowFactory>,
        cache: MemoryCache,
    }

    fn fixture() -> Fixture {
        let cache = MemoryCache::new();
        let factory = MemUowFactory::new();
        Fixture {
            menus: MenuService::new(Arc::new(cache.clone()), factory.clone()),
            submenus: SubmenuService::new(Arc::new(cache.clone()), factory.clone()),
            dishes: DishService::new(Arc::new(cache.clone()), factory),
            cache,
        }
    }

    async fn seed_menu_and_submenu(fixture: &Fixture) -> (Uuid, Uuid) {
        let menu = fixture
            .menus
            .create(MenuCreate {
                title: "Lunch".into(),
                description: "midday".into(),
            })
            .await
            .unwrap();
        let submenu = fixture
            .submenus
            .create(
                menu.id,
                SubmenuCreate {
                    parent_id: None,
                    title: "Soups".into(),
                    description: "broths".into(),
                },
            )
            .await
            .unwrap();
        (menu.id, submenu.id)
    }

    fn payload(title: &str, price: &str) -> DishCreate {
        DishCreate {
            menu_id: None,
            submenu_id: None,
            title: title.to_string(),
            description: "a dish".to_string(),
            price: price.to_string(),
        }
    }

    #[tokio::test]
    async fn create_invalidates_both_parents_and_all_list_keys() {
        let fixture = fixture();
        let (menu_id, submenu_id) = seed_menu_and_submenu(&fixture).await;

        // Warm every key a dish create must clear.
        fixture.menus.get_list().await.unwrap();
        fixture.menus.get_detail(menu_id).await.unwrap();
        fixture.submenus.get_list(menu_id).await.unwrap();
        fixture.submenus.get_detail(submenu_id).await.unwrap();
        fixture.dishes.get_list(submenu_id).await.unwrap();

        fixture
            .dishes
            .create(menu_id, submenu_id, payload("Borscht", "12.50"))
            .await
            .unwrap();

        for key in [
            keys::entity(menu_id),
            keys::entity(submenu_id),
            keys::MENU_LIST.to_string(),
            keys::SUBMENU_LIST.to_string(),
            keys::DISH_LIST.to_string(),
        ] {
            assert_eq!(
                fixture.cache.get(&key).await.unwrap(),
                None,
                "key `{key}` should have been invalidated"
            );
        }

        // The next read recomputes counts from the store.
        let detail = fixture.menus.get_detail(menu_id).await.unwrap();
        assert_eq!(detail.dishes_count, 1);
    }

    #[tokio::test]
    async fn create_normalizes_price_and_injects_path_ids() {
        let fixture = fixture();
        let (menu_id, submenu_id) = seed_menu_and_submenu(&fixture).await;

        let bogus = DishCreate {
            menu_id: Some(Uuid::new_v4()),
            submenu_id: Some(Uuid::new_v4()),
            ..payload("Borscht", "12.5")
        };
        let dish = fixture
            .dishes
            .create(menu_id, submenu_id, bogus)
            .await
            .unwrap();
        assert_eq!(dish.price, "12.50");

        let listed = fixture.dishes.get_list(submenu_id).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn price_only_patch_leaves_title_and_description() {
        let fixture = fixture();
        let (menu_id, submenu_id) = seed_menu_and_submenu(&fixture).await;
        let dish = fixture
            .dishes
            .create(menu_id, submenu_id, payload("Borscht", "12.50"))
            .await
            .unwrap();

        let updated = fixture
            .dishes
            .update(
                dish.id,
                DishUpdate {
                    price: Some("500.00".into()),
                    ..DishUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Borscht");
        assert_eq!(updated.description, "a dish");
        assert_eq!(updated.price, "500.00");
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_and_leaves_cache_untouched() {
        let fixture = fixture();
        let err = fixture
            .dishes
            .update(Uuid::new_v4(), DishUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "dish" }));
        assert!(fixture.cache.is_empty().await);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let fixture = fixture();
        let (menu_id, submenu_id) = seed_menu_and_submenu(&fixture).await;
        assert!(fixture
            .dishes
            .delete(menu_id, submenu_id, Uuid::new_v4())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn create_rejects_malformed_price() {
        let fixture = fixture();
        let (menu_id, submenu_id) = seed_menu_and_submenu(&fixture).await;
        let err = fixture
            .dishes
            .create(menu_id, submenu_id, payload("Borscht", "cheap"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(_)));
    }
}
