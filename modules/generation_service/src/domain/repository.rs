//! Repository traits for data access
//!
//! These traits define the persistence collaborator the generators rely on.
//! Implementations are in infra/storage/repositories.rs

use crate::contract::{
    Delivery, NewDelivery, NewOrder, NewRecipe, NewSubscription, NewUser, Order, Recipe,
    Subscription, SubscriptionStatus, User,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Persistence failure, with constraint violations kept distinguishable
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique or foreign-key constraint rejected the write
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Repository for users
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user; identifier and timestamps are stamped by the store
    async fn create(&self, user: NewUser) -> StoreResult<User>;

    /// List non-deleted users
    async fn list_all(&self, limit: u64) -> StoreResult<Vec<User>>;
}

/// Repository for subscriptions
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, subscription: NewSubscription) -> StoreResult<Subscription>;

    /// List non-deleted subscriptions, optionally filtered by status
    async fn list_all(
        &self,
        status: Option<SubscriptionStatus>,
        limit: u64,
    ) -> StoreResult<Vec<Subscription>>;
}

/// Repository for recipes
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn create(&self, recipe: NewRecipe) -> StoreResult<Recipe>;

    async fn list_all(&self, limit: u64) -> StoreResult<Vec<Recipe>>;
}

/// Repository for orders
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: NewOrder) -> StoreResult<Order>;

    async fn list_all(&self, limit: u64) -> StoreResult<Vec<Order>>;

    /// Oldest non-deleted orders that have no delivery yet
    async fn list_without_delivery(&self, limit: u64) -> StoreResult<Vec<Order>>;
}

/// Repository for deliveries
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// Create a delivery; a second delivery for the same order is a
    /// [`StoreError::ConstraintViolation`]
    async fn create(&self, delivery: NewDelivery) -> StoreResult<Delivery>;

    /// Find the delivery of an order, if any
    async fn find_by_order(&self, order_id: Uuid) -> StoreResult<Option<Delivery>>;
}

/// One repository per entity kind
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub subscriptions: Arc<dyn SubscriptionRepository>,
    pub recipes: Arc<dyn RecipeRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub deliveries: Arc<dyn DeliveryRepository>,
}
