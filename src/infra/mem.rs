//! In-memory backend: the unit-of-work test double.
//!
//! `MemUowFactory` hands out units of work that clone the shared state and
//! mutate the working copy; `commit` swaps it back in atomically, while drop
//! or `rollback` discards it. This gives real transaction semantics (staged
//! writes invisible until commit, §-style rollback) without a database.
//! Cascades are applied explicitly, mirroring the schema's ON DELETE CASCADE.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreateDishParams, CreateMenuParams, CreateSubmenuParams, DishPatch, DishesRepo,
    MenuListRecord, MenuPatch, MenusRepo, RepoError, SubmenuListRecord, SubmenuPatch,
    SubmenusRepo,
};
use crate::application::uow::{UnitOfWork, UowFactory};
use crate::domain::entities::{DishRecord, MenuRecord, SubmenuRecord};

#[derive(Debug, Clone, Default)]
pub struct MemState {
    pub menus: HashMap<Uuid, MenuRecord>,
    pub submenus: HashMap<Uuid, SubmenuRecord>,
    pub dishes: HashMap<Uuid, DishRecord>,
}

#[derive(Clone, Default)]
pub struct MemUowFactory {
    shared: Arc<Mutex<MemState>>,
}

impl MemUowFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone of the committed state; test helper.
    pub fn snapshot(&self) -> MemState {
        self.shared
            .lock()
            .map(|state| state.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UowFactory for MemUowFactory {
    type Uow = MemUnitOfWork;

    async fn begin(&self) -> Result<MemUnitOfWork, RepoError> {
        let working = self
            .shared
            .lock()
            .map_err(|_| RepoError::from_persistence("in-memory state lock poisoned"))?
            .clone();
        Ok(MemUnitOfWork {
            shared: self.shared.clone(),
            working,
        })
    }
}

pub struct MemUnitOfWork {
    shared: Arc<Mutex<MemState>>,
    working: MemState,
}

#[async_trait]
impl UnitOfWork for MemUnitOfWork {
    type Menus<'a> = MemMenusRepo<'a>;
    type Submenus<'a> = MemSubmenusRepo<'a>;
    type Dishes<'a> = MemDishesRepo<'a>;

    fn menus(&mut self) -> MemMenusRepo<'_> {
        MemMenusRepo {
            state: &mut self.working,
        }
    }

    fn submenus(&mut self) -> MemSubmenusRepo<'_> {
        MemSubmenusRepo {
            state: &mut self.working,
        }
    }

    fn dishes(&mut self) -> MemDishesRepo<'_> {
        MemDishesRepo {
            state: &mut self.working,
        }
    }

    async fn commit(self) -> Result<(), RepoError> {
        let mut shared = self
            .shared
            .lock()
            .map_err(|_| RepoError::from_persistence("in-memory state lock poisoned"))?;
        *shared = self.working;
        Ok(())
    }

    async fn rollback(self) -> Result<(), RepoError> {
        // Dropping the working copy is the rollback.
        Ok(())
    }
}

pub struct MemMenusRepo<'a> {
    state: &'a mut MemState,
}

fn submenu_ids_of(state: &MemState, menu_id: Uuid) -> Vec<Uuid> {
    state
        .submenus
        .values()
        .filter(|submenu| submenu.parent_id == Some(menu_id))
        .map(|submenu| submenu.id)
        .collect()
}

fn menu_projection(state: &MemState, menu: &MenuRecord) -> MenuListRecord {
    let submenu_ids = submenu_ids_of(state, menu.id);
    let dishes_count = state
        .dishes
        .values()
        .filter(|dish| submenu_ids.contains(&dish.submenu_id))
        .count() as i64;
    MenuListRecord {
        id: menu.id,
        title: menu.title.clone(),
        description: menu.description.clone(),
        submenus_count: submenu_ids.len() as i64,
        dishes_count,
    }
}

#[async_trait]
impl MenusRepo for MemMenusRepo<'_> {
    async fn list(&mut self) -> Result<Vec<MenuListRecord>, RepoError> {
        let mut menus: Vec<&MenuRecord> = self.state.menus.values().collect();
        menus.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(menus
            .into_iter()
            .map(|menu| menu_projection(self.state, menu))
            .collect())
    }

    async fn get(&mut self, menu_id: Uuid) -> Result<Option<MenuListRecord>, RepoError> {
        Ok(self
            .state
            .menus
            .get(&menu_id)
            .map(|menu| menu_projection(self.state, menu)))
    }

    async fn add(&mut self, params: CreateMenuParams) -> Result<MenuRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let menu = MenuRecord {
            id: Uuid::new_v4(),
            title: params.title,
            description: params.description,
            is_removed: false,
            created_at: now,
            updated_at: now,
        };
        self.state.menus.insert(menu.id, menu.clone());
        Ok(menu)
    }

    async fn update(
        &mut self,
        menu_id: Uuid,
        patch: MenuPatch,
    ) -> Result<Option<MenuRecord>, RepoError> {
        let Some(menu) = self.state.menus.get_mut(&menu_id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            menu.title = title;
        }
        if let Some(description) = patch.description {
            menu.description = description;
        }
        menu.updated_at = OffsetDateTime::now_utc();
        Ok(Some(menu.clone()))
    }

    async fn delete(&mut self, menu_id: Uuid) -> Result<bool, RepoError> {
        let submenu_ids = submenu_ids_of(self.state, menu_id);
        self.state
            .dishes
            .retain(|_, dish| dish.menu_id != menu_id && !submenu_ids.contains(&dish.submenu_id));
        self.state
            .submenus
            .retain(|_, submenu| submenu.parent_id != Some(menu_id));
        self.state.menus.remove(&menu_id);
        Ok(true)
    }
}

pub struct MemSubmenusRepo<'a> {
    state: &'a mut MemState,
}

fn submenu_projection(state: &MemState, submenu: &SubmenuRecord) -> SubmenuListRecord {
    let dishes_count = state
        .dishes
        .values()
        .filter(|dish| dish.submenu_id == submenu.id)
        .count() as i64;
    SubmenuListRecord {
        id: submenu.id,
        title: submenu.title.clone(),
        description: submenu.description.clone(),
        dishes_count,
    }
}

#[async_trait]
impl SubmenusRepo for MemSubmenusRepo<'_> {
    async fn list(&mut self, menu_id: Uuid) -> Result<Vec<SubmenuListRecord>, RepoError> {
        let mut submenus: Vec<&SubmenuRecord> = self
            .state
            .submenus
            .values()
            .filter(|submenu| submenu.parent_id == Some(menu_id))
            .collect();
        submenus.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(submenus
            .into_iter()
            .map(|submenu| submenu_projection(self.state, submenu))
            .collect())
    }

    async fn get(&mut self, submenu_id: Uuid) -> Result<Option<SubmenuListRecord>, RepoError> {
        Ok(self
            .state
            .submenus
            .get(&submenu_id)
            .map(|submenu| submenu_projection(self.state, submenu)))
    }

    async fn add(&mut self, params: CreateSubmenuParams) -> Result<SubmenuRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let submenu = SubmenuRecord {
            id: Uuid::new_v4(),
            title: params.title,
            description: params.description,
            parent_id: params.parent_id,
            is_removed: false,
            created_at: now,
            updated_at: now,
        };
        self.state.submenus.insert(submenu.id, submenu.clone());
        Ok(submenu)
    }

    async fn update(
        &mut self,
        submenu_id: Uuid,
        patch: SubmenuPatch,
    ) -> Result<Option<SubmenuRecord>, RepoError> {
        let Some(submenu) = self.state.submenus.get_mut(&submenu_id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            submenu.title = title;
        }
        if let Some(description) = patch.description {
            submenu.description = description;
        }
        submenu.updated_at = OffsetDateTime::now_utc();
        Ok(Some(submenu.clone()))
    }

    async fn delete(&mut self, submenu_id: Uuid) -> Result<bool, RepoError> {
        self.state
            .dishes
            .retain(|_, dish| dish.submenu_id != submenu_id);
        self.state.submenus.remove(&submenu_id);
        Ok(true)
    }
}

pub struct MemDishesRepo<'a> {
    state: &'a mut MemState,
}

#[async_trait]
impl DishesRepo for MemDishesRepo<'_> {
    async fn list(&mut self, submenu_id: Uuid) -> Result<Vec<DishRecord>, RepoError> {
        let mut dishes: Vec<DishRecord> = self
            .state
            .dishes
            .values()
            .filter(|dish| dish.submenu_id == submenu_id)
            .cloned()
            .collect();
        dishes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(dishes)
    }

    async fn get(&mut self, dish_id: Uuid) -> Result<Option<DishRecord>, RepoError> {
        Ok(self.state.dishes.get(&dish_id).cloned())
    }

    async fn add(&mut self, params: CreateDishParams) -> Result<DishRecord, RepoError> {
        let now = OffsetDateTime::now_utc();
        let dish = DishRecord {
            id: Uuid::new_v4(),
            title: params.title,
            description: params.description,
            price: params.price,
            menu_id: params.menu_id,
            submenu_id: params.submenu_id,
            is_removed: false,
            created_at: now,
            updated_at: now,
        };
        self.state.dishes.insert(dish.id, dish.clone());
        Ok(dish)
    }

    async fn update(
        &mut self,
        dish_id: Uuid,
        patch: DishPatch,
    ) -> Result<Option<DishRecord>, RepoError> {
        let Some(dish) = self.state.dishes.get_mut(&dish_id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            dish.title = title;
        }
        if let Some(description) = patch.description {
            dish.description = description;
        }
        if let Some(price) = patch.price {
            dish.price = price;
        }
        dish.updated_at = OffsetDateTime::now_utc();
        Ok(Some(dish.clone()))
    }

    async fn delete(&mut self, dish_id: Uuid) -> Result<bool, RepoError> {
        self.state.dishes.remove(&dish_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed_menu(factory: &MemUowFactory, title: &str) -> Uuid {
        let mut uow = factory.begin().await.unwrap();
        let menu = uow
            .menus()
            .add(CreateMenuParams {
                title: title.into(),
                description: "desc".into(),
            })
            .await
            .unwrap();
        uow.commit().await.unwrap();
        menu.id
    }

    async fn seed_submenu(factory: &MemUowFactory, menu_id: Uuid, title: &str) -> Uuid {
        let mut uow = factory.begin().await.unwrap();
        let submenu = uow
            .submenus()
            .add(CreateSubmenuParams {
                parent_id: Some(menu_id),
                title: title.into(),
                description: "desc".into(),
            })
            .await
            .unwrap();
        uow.commit().await.unwrap();
        submenu.id
    }

    async fn seed_dish(factory: &MemUowFactory, menu_id: Uuid, submenu_id: Uuid, title: &str) {
        let mut uow = factory.begin().await.unwrap();
        uow.dishes()
            .add(CreateDishParams {
                menu_id,
                submenu_id,
                title: title.into(),
                description: "desc".into(),
                price: "10.00".into(),
            })
            .await
            .unwrap();
        uow.commit().await.unwrap();
    }

    #[tokio::test]
    async fn counts_aggregate_across_both_levels() {
        let factory = MemUowFactory::new();
        let menu_id = seed_menu(&factory, "Lunch").await;
        let submenu_a = seed_submenu(&factory, menu_id, "A").await;
        let _submenu_b = seed_submenu(&factory, menu_id, "B").await;
        for title in ["one", "two", "three"] {
            seed_dish(&factory, menu_id, submenu_a, title).await;
        }

        let mut uow = factory.begin().await.unwrap();
        let listed = uow.menus().list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].submenus_count, 2);
        assert_eq!(listed[0].dishes_count, 3);

        let fetched = uow.menus().get(menu_id).await.unwrap().unwrap();
        assert_eq!(fetched.submenus_count, 2);
        assert_eq!(fetched.dishes_count, 3);

        let submenus = uow.submenus().list(menu_id).await.unwrap();
        assert_eq!(submenus[0].dishes_count, 3);
        assert_eq!(submenus[1].dishes_count, 0);
    }

    #[tokio::test]
    async fn deleting_a_menu_cascades_to_submenus_and_dishes() {
        let factory = MemUowFactory::new();
        let menu_id = seed_menu(&factory, "Lunch").await;
        let submenu_id = seed_submenu(&factory, menu_id, "A").await;
        seed_dish(&factory, menu_id, submenu_id, "one").await;
        let other_menu = seed_menu(&factory, "Dinner").await;
        let other_submenu = seed_submenu(&factory, other_menu, "B").await;
        seed_dish(&factory, other_menu, other_submenu, "two").await;

        let mut uow = factory.begin().await.unwrap();
        assert!(uow.menus().delete(menu_id).await.unwrap());
        uow.commit().await.unwrap();

        let state = factory.snapshot();
        assert_eq!(state.menus.len(), 1);
        assert_eq!(state.submenus.len(), 1);
        assert_eq!(state.dishes.len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_submenu_cascades_to_its_dishes_only() {
        let factory = MemUowFactory::new();
        let menu_id = seed_menu(&factory, "Lunch").await;
        let submenu_a = seed_submenu(&factory, menu_id, "A").await;
        let submenu_b = seed_submenu(&factory, menu_id, "B").await;
        seed_dish(&factory, menu_id, submenu_a, "one").await;
        seed_dish(&factory, menu_id, submenu_b, "two").await;

        let mut uow = factory.begin().await.unwrap();
        uow.submenus().delete(submenu_a).await.unwrap();
        uow.commit().await.unwrap();

        let state = factory.snapshot();
        assert_eq!(state.submenus.len(), 1);
        assert_eq!(state.dishes.len(), 1);
        assert!(state.dishes.values().all(|d| d.submenu_id == submenu_b));
    }

    #[tokio::test]
    async fn deleting_a_dish_removes_only_that_dish() {
        let factory = MemUowFactory::new();
        let menu_id = seed_menu(&factory, "Lunch").await;
        let submenu_id = seed_submenu(&factory, menu_id, "A").await;
        seed_dish(&factory, menu_id, submenu_id, "one").await;
        seed_dish(&factory, menu_id, submenu_id, "two").await;

        let victim = {
            let mut uow = factory.begin().await.unwrap();
            let dishes = uow.dishes().list(submenu_id).await.unwrap();
            dishes[0].id
        };

        let mut uow = factory.begin().await.unwrap();
        uow.dishes().delete(victim).await.unwrap();
        uow.commit().await.unwrap();

        let state = factory.snapshot();
        assert_eq!(state.dishes.len(), 1);
        assert_eq!(state.submenus.len(), 1);
        assert_eq!(state.menus.len(), 1);
    }

    #[tokio::test]
    async fn uncommitted_writes_are_invisible_after_drop() {
        let factory = MemUowFactory::new();

        {
            let mut uow = factory.begin().await.unwrap();
            uow.menus()
                .add(CreateMenuParams {
                    title: "staged".into(),
                    description: "never committed".into(),
                })
                .await
                .unwrap();
            // dropped without commit
        }

        assert!(factory.snapshot().menus.is_empty());
    }

    #[tokio::test]
    async fn rollback_discards_the_first_write_when_the_second_fails() {
        let factory = MemUowFactory::new();
        let menu_id = seed_menu(&factory, "Lunch").await;
        let before = factory.snapshot();

        let mut uow = factory.begin().await.unwrap();
        uow.menus()
            .update(
                menu_id,
                MenuPatch {
                    title: Some("changed".into()),
                    description: None,
                },
            )
            .await
            .unwrap();
        // Treat the second write as having failed: roll everything back.
        uow.rollback().await.unwrap();

        let after = factory.snapshot();
        assert_eq!(after.menus[&menu_id].title, before.menus[&menu_id].title);
    }

    #[tokio::test]
    async fn commit_makes_staged_writes_visible() {
        let factory = MemUowFactory::new();
        let mut uow = factory.begin().await.unwrap();
        uow.menus()
            .add(CreateMenuParams {
                title: "Lunch".into(),
                description: "desc".into(),
            })
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(factory.snapshot().menus.len(), 1);
    }
}
