//! SeaORM repository implementations

use crate::contract::{
    Delivery, NewDelivery, NewOrder, NewRecipe, NewSubscription, NewUser, Order, Recipe,
    Subscription, SubscriptionStatus, User,
};
use crate::domain::repository::{
    DeliveryRepository, OrderRepository, RecipeRepository, Repositories, StoreError, StoreResult,
    SubscriptionRepository, UserRepository,
};
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, SqlErr,
};
use std::sync::Arc;
use uuid::Uuid;

use super::entity;

/// Map a database error, keeping constraint violations distinguishable
fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(reason))
        | Some(SqlErr::ForeignKeyConstraintViolation(reason)) => {
            StoreError::ConstraintViolation(reason)
        }
        _ => StoreError::Other(err.into()),
    }
}

/// Bundle of SeaORM repositories sharing one connection pool
pub fn sea_orm_repositories(db: Arc<DatabaseConnection>) -> Repositories {
    Repositories {
        users: Arc::new(SeaOrmUserRepository::new(db.clone())),
        subscriptions: Arc::new(SeaOrmSubscriptionRepository::new(db.clone())),
        recipes: Arc::new(SeaOrmRecipeRepository::new(db.clone())),
        orders: Arc::new(SeaOrmOrderRepository::new(db.clone())),
        deliveries: Arc::new(SeaOrmDeliveryRepository::new(db)),
    }
}

// ===== User Repository =====

pub struct SeaOrmUserRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmUserRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let active: entity::user::ActiveModel = user.into();
        let model = active.insert(&*self.db).await.map_err(store_error)?;
        Ok(model.into())
    }

    async fn list_all(&self, limit: u64) -> StoreResult<Vec<User>> {
        let results = entity::user::Entity::find()
            .filter(entity::user::Column::DeletedAt.is_null())
            .order_by_asc(entity::user::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await
            .map_err(store_error)?;

        Ok(results.into_iter().map(Into::into).collect())
    }
}

// ===== Subscription Repository =====

pub struct SeaOrmSubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSubscriptionRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubscriptionRepository for SeaOrmSubscriptionRepository {
    async fn create(&self, subscription: NewSubscription) -> StoreResult<Subscription> {
        let active: entity::subscription::ActiveModel = subscription.into();
        let model = active.insert(&*self.db).await.map_err(store_error)?;
        Ok(model.try_into()?)
    }

    async fn list_all(
        &self,
        status: Option<SubscriptionStatus>,
        limit: u64,
    ) -> StoreResult<Vec<Subscription>> {
        let mut query = entity::subscription::Entity::find()
            .filter(entity::subscription::Column::DeletedAt.is_null());

        if let Some(status) = status {
            query = query.filter(entity::subscription::Column::Status.eq(status.as_str()));
        }

        let results = query
            .order_by_asc(entity::subscription::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await
            .map_err(store_error)?;

        Ok(results
            .into_iter()
            .map(Subscription::try_from)
            .collect::<anyhow::Result<_>>()?)
    }
}

// ===== Recipe Repository =====

pub struct SeaOrmRecipeRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRecipeRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecipeRepository for SeaOrmRecipeRepository {
    async fn create(&self, recipe: NewRecipe) -> StoreResult<Recipe> {
        let active: entity::recipe::ActiveModel = recipe.into();
        let model = active.insert(&*self.db).await.map_err(store_error)?;
        Ok(model.try_into()?)
    }

    async fn list_all(&self, limit: u64) -> StoreResult<Vec<Recipe>> {
        let results = entity::recipe::Entity::find()
            .filter(entity::recipe::Column::DeletedAt.is_null())
            .order_by_asc(entity::recipe::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await
            .map_err(store_error)?;

        Ok(results
            .into_iter()
            .map(Recipe::try_from)
            .collect::<anyhow::Result<_>>()?)
    }
}

// ===== Order Repository =====

pub struct SeaOrmOrderRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmOrderRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn create(&self, order: NewOrder) -> StoreResult<Order> {
        let active: entity::order::ActiveModel = order.into();
        let model = active.insert(&*self.db).await.map_err(store_error)?;
        Ok(model.try_into()?)
    }

    async fn list_all(&self, limit: u64) -> StoreResult<Vec<Order>> {
        let results = entity::order::Entity::find()
            .filter(entity::order::Column::DeletedAt.is_null())
            .order_by_asc(entity::order::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await
            .map_err(store_error)?;

        Ok(results
            .into_iter()
            .map(Order::try_from)
            .collect::<anyhow::Result<_>>()?)
    }

    async fn list_without_delivery(&self, limit: u64) -> StoreResult<Vec<Order>> {
        // Soft-deleted deliveries still occupy their order, so the join
        // does not filter on deliveries.deleted_at.
        let results = entity::order::Entity::find()
            .join(JoinType::LeftJoin, entity::order::Relation::Delivery.def())
            .filter(entity::order::Column::DeletedAt.is_null())
            .filter(entity::delivery::Column::Id.is_null())
            .order_by_asc(entity::order::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await
            .map_err(store_error)?;

        Ok(results
            .into_iter()
            .map(Order::try_from)
            .collect::<anyhow::Result<_>>()?)
    }
}

// ===== Delivery Repository =====

pub struct SeaOrmDeliveryRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmDeliveryRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DeliveryRepository for SeaOrmDeliveryRepository {
    async fn create(&self, delivery: NewDelivery) -> StoreResult<Delivery> {
        let active: entity::delivery::ActiveModel = delivery.into();
        let model = active.insert(&*self.db).await.map_err(store_error)?;
        Ok(model.try_into()?)
    }

    // Soft-deleted deliveries still hold the unique order_id, so they count
    async fn find_by_order(&self, order_id: Uuid) -> StoreResult<Option<Delivery>> {
        let result = entity::delivery::Entity::find()
            .filter(entity::delivery::Column::OrderId.eq(order_id))
            .one(&*self.db)
            .await
            .map_err(store_error)?;

        Ok(result.map(Delivery::try_from).transpose()?)
    }
}
