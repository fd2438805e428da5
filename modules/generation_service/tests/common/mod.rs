//! Common test utilities: in-memory store and seed helpers
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use generation_service::contract::*;
use generation_service::domain::repository::*;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    subscriptions: HashMap<Uuid, Subscription>,
    recipes: HashMap<Uuid, Recipe>,
    orders: HashMap<Uuid, Order>,
    deliveries: HashMap<Uuid, Delivery>,
}

/// In-memory implementation of every repository trait.
///
/// Enforces the same constraints as the database schema: unique user email,
/// unique delivery order, and existing parent rows.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    failing_user_creates: Arc<AtomicUsize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        let store = Arc::new(self.clone());
        Repositories {
            users: store.clone(),
            subscriptions: store.clone(),
            recipes: store.clone(),
            orders: store.clone(),
            deliveries: store,
        }
    }

    /// Make the next `n` user inserts fail with a generic error
    pub fn fail_next_user_creates(&self, n: usize) {
        self.failing_user_creates.store(n, Ordering::SeqCst);
    }

    // ===== Seeding =====

    pub fn seed_user(&self, email: &str) -> User {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            timezone: "UTC".to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.tables.write().users.insert(user.id, user.clone());
        user
    }

    pub fn seed_subscription(&self, user_id: Uuid, status: SubscriptionStatus) -> Subscription {
        let now = Utc::now();
        let subscription = Subscription {
            id: Uuid::new_v4(),
            user_id,
            status,
            preferences: None,
            started_at: now,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.tables
            .write()
            .subscriptions
            .insert(subscription.id, subscription.clone());
        subscription
    }

    pub fn seed_recipe(&self, name: &str, price: Option<Decimal>) -> Recipe {
        let now = Utc::now();
        let recipe = Recipe {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            calories: 600,
            tags: None,
            price,
            preparation_time: None,
            servings: None,
            image_url: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.tables.write().recipes.insert(recipe.id, recipe.clone());
        recipe
    }

    pub fn seed_order(&self, subscription_id: Uuid, order_date: DateTime<Utc>) -> Order {
        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            subscription_id,
            recipes: vec![OrderRecipe {
                id: Uuid::new_v4(),
                name: "Classic Beef Tacos".to_string(),
            }],
            total_amount: Decimal::new(2500, 2),
            status: OrderStatus::Shipped,
            order_date,
            delivery_date: order_date + chrono::Duration::days(7),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.tables.write().orders.insert(order.id, order.clone());
        order
    }

    pub fn seed_delivery(&self, order_id: Uuid) -> Delivery {
        let now = Utc::now();
        let delivery = Delivery {
            id: Uuid::new_v4(),
            order_id,
            status: DeliveryStatus::Delivered,
            expected_delivery_date: now,
            actual_delivery_date: Some(now),
            tracking_number: None,
            notes: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.tables
            .write()
            .deliveries
            .insert(delivery.id, delivery.clone());
        delivery
    }

    // ===== Inspection =====

    pub fn users(&self) -> Vec<User> {
        self.tables.read().users.values().cloned().collect()
    }

    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.tables.read().subscriptions.values().cloned().collect()
    }

    pub fn recipes(&self) -> Vec<Recipe> {
        self.tables.read().recipes.values().cloned().collect()
    }

    pub fn orders(&self) -> Vec<Order> {
        self.tables.read().orders.values().cloned().collect()
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.tables.read().deliveries.values().cloned().collect()
    }

    pub fn deliveries_for(&self, order_id: Uuid) -> usize {
        self.tables
            .read()
            .deliveries
            .values()
            .filter(|d| d.order_id == order_id)
            .count()
    }
}

fn live<T>(rows: impl Iterator<Item = T>, limit: u64) -> Vec<T> {
    rows.take(limit as usize).collect()
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: NewUser) -> StoreResult<User> {
        tokio::task::yield_now().await;

        let pending_failures = self.failing_user_creates.load(Ordering::SeqCst);
        if pending_failures > 0 {
            self.failing_user_creates
                .store(pending_failures - 1, Ordering::SeqCst);
            return Err(StoreError::Other(anyhow::anyhow!("connection reset")));
        }

        let mut tables = self.tables.write();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::ConstraintViolation(format!(
                "duplicate email {}",
                user.email
            )));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            timezone: user.timezone,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_all(&self, limit: u64) -> StoreResult<Vec<User>> {
        let tables = self.tables.read();
        Ok(live(
            tables.users.values().filter(|u| u.deleted_at.is_none()).cloned(),
            limit,
        ))
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn create(&self, subscription: NewSubscription) -> StoreResult<Subscription> {
        tokio::task::yield_now().await;

        let mut tables = self.tables.write();
        if !tables.users.contains_key(&subscription.user_id) {
            return Err(StoreError::ConstraintViolation("unknown user".to_string()));
        }

        let now = Utc::now();
        let created = Subscription {
            id: Uuid::new_v4(),
            user_id: subscription.user_id,
            status: subscription.status,
            preferences: subscription.preferences,
            started_at: subscription.started_at,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.subscriptions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_all(
        &self,
        status: Option<SubscriptionStatus>,
        limit: u64,
    ) -> StoreResult<Vec<Subscription>> {
        let tables = self.tables.read();
        Ok(live(
            tables
                .subscriptions
                .values()
                .filter(|s| s.deleted_at.is_none())
                .filter(|s| status.map_or(true, |status| s.status == status))
                .cloned(),
            limit,
        ))
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn create(&self, recipe: NewRecipe) -> StoreResult<Recipe> {
        tokio::task::yield_now().await;

        let now = Utc::now();
        let created = Recipe {
            id: Uuid::new_v4(),
            name: recipe.name,
            description: recipe.description,
            calories: recipe.calories,
            tags: recipe.tags,
            price: recipe.price,
            preparation_time: recipe.preparation_time,
            servings: recipe.servings,
            image_url: recipe.image_url,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.tables.write().recipes.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_all(&self, limit: u64) -> StoreResult<Vec<Recipe>> {
        let tables = self.tables.read();
        Ok(live(
            tables.recipes.values().filter(|r| r.deleted_at.is_none()).cloned(),
            limit,
        ))
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn create(&self, order: NewOrder) -> StoreResult<Order> {
        tokio::task::yield_now().await;

        let mut tables = self.tables.write();
        if !tables.subscriptions.contains_key(&order.subscription_id) {
            return Err(StoreError::ConstraintViolation(
                "unknown subscription".to_string(),
            ));
        }

        let now = Utc::now();
        let created = Order {
            id: Uuid::new_v4(),
            subscription_id: order.subscription_id,
            recipes: order.recipes,
            total_amount: order.total_amount,
            status: order.status,
            order_date: order.order_date,
            delivery_date: order.delivery_date,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.orders.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list_all(&self, limit: u64) -> StoreResult<Vec<Order>> {
        let tables = self.tables.read();
        Ok(live(
            tables.orders.values().filter(|o| o.deleted_at.is_none()).cloned(),
            limit,
        ))
    }

    async fn list_without_delivery(&self, limit: u64) -> StoreResult<Vec<Order>> {
        let tables = self.tables.read();
        let delivered: HashSet<Uuid> = tables.deliveries.values().map(|d| d.order_id).collect();
        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| o.deleted_at.is_none() && !delivered.contains(&o.id))
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.created_at);
        Ok(live(orders.into_iter(), limit))
    }
}

#[async_trait]
impl DeliveryRepository for InMemoryStore {
    async fn create(&self, delivery: NewDelivery) -> StoreResult<Delivery> {
        // Widens the window between the existence check and the insert
        tokio::task::yield_now().await;

        let mut tables = self.tables.write();
        if !tables.orders.contains_key(&delivery.order_id) {
            return Err(StoreError::ConstraintViolation("unknown order".to_string()));
        }
        if tables.deliveries.values().any(|d| d.order_id == delivery.order_id) {
            return Err(StoreError::ConstraintViolation(format!(
                "order {} already has a delivery",
                delivery.order_id
            )));
        }

        let now = Utc::now();
        let created = Delivery {
            id: Uuid::new_v4(),
            order_id: delivery.order_id,
            status: delivery.status,
            expected_delivery_date: delivery.expected_delivery_date,
            actual_delivery_date: delivery.actual_delivery_date,
            tracking_number: delivery.tracking_number,
            notes: delivery.notes,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tables.deliveries.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_order(&self, order_id: Uuid) -> StoreResult<Option<Delivery>> {
        tokio::task::yield_now().await;

        Ok(self
            .tables
            .read()
            .deliveries
            .values()
            .find(|d| d.order_id == order_id)
            .cloned())
    }
}
