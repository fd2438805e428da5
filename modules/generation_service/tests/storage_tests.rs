//! SeaORM repository tests against an in-memory SQLite database

use chrono::{Duration as ChronoDuration, Utc};
use generation_service::config::{Config, GeneratorConfig};
use generation_service::contract::{
    DeliveryStatus, NewDelivery, NewOrder, NewRecipe, NewSubscription, NewUser, Order,
    OrderRecipe, OrderStatus, Recipe, Subscription, SubscriptionStatus,
};
use generation_service::domain::generators::DeliveryGenerator;
use generation_service::domain::repository::{Repositories, StoreError};
use generation_service::domain::{Generator, GeneratorSettings, TickOutcome};
use generation_service::infra::storage::{sea_orm_repositories, Migrator};
use generation_service::GenerationModule;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use uuid::Uuid;

mod common;
use common::print_test_header;

async fn connect() -> DatabaseConnection {
    // Every SQLite memory connection is its own database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = Database::connect(options).await.expect("connect");
    GenerationModule::migrate(&conn).await.expect("migrate");
    conn
}

async fn repositories() -> Repositories {
    sea_orm_repositories(Arc::new(connect().await))
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        first_name: "Ivan".to_string(),
        last_name: "Petrov".to_string(),
        timezone: "Europe/London".to_string(),
    }
}

fn new_recipe(name: &str, price: Decimal) -> NewRecipe {
    NewRecipe {
        name: name.to_string(),
        description: Some("Weeknight favourite".to_string()),
        calories: 640,
        tags: Some(vec!["quick".to_string(), "spicy".to_string()]),
        price: Some(price),
        preparation_time: Some(35),
        servings: Some(2),
        image_url: Some("https://picsum.photos/seed/tacos/400/300".to_string()),
    }
}

async fn active_subscription(repos: &Repositories, email: &str) -> Subscription {
    let user = repos.users.create(new_user(email)).await.expect("user");
    repos
        .subscriptions
        .create(NewSubscription {
            user_id: user.id,
            status: SubscriptionStatus::Active,
            preferences: None,
            started_at: Utc::now(),
        })
        .await
        .expect("subscription")
}

async fn create_order(repos: &Repositories, subscription_id: Uuid, recipe: &Recipe) -> Order {
    let order_date = Utc::now() - ChronoDuration::days(2);
    repos
        .orders
        .create(NewOrder {
            subscription_id,
            recipes: vec![OrderRecipe {
                id: recipe.id,
                name: recipe.name.clone(),
            }],
            total_amount: recipe.price.unwrap_or_default(),
            status: OrderStatus::Shipped,
            order_date,
            delivery_date: order_date + ChronoDuration::days(7),
        })
        .await
        .expect("order")
}

fn new_delivery(order_id: Uuid) -> NewDelivery {
    NewDelivery {
        order_id,
        status: DeliveryStatus::InTransit,
        expected_delivery_date: Utc::now() + ChronoDuration::days(3),
        actual_delivery_date: None,
        tracking_number: Some("TRACK123456".to_string()),
        notes: None,
    }
}

// ===== Schema =====

#[tokio::test]
async fn test_fresh_database_applies_every_migration() {
    let conn = connect().await;

    let applied = Migrator::get_applied_migrations(&conn).await.expect("applied");
    assert_eq!(applied.len(), Migrator::migrations().len());
    assert!(Migrator::get_pending_migrations(&conn)
        .await
        .expect("pending")
        .is_empty());

    GenerationModule::migrate(&conn).await.expect("second migrate is a no-op");
}

// ===== Users and subscriptions =====

#[tokio::test]
async fn test_user_round_trip_and_unique_email() {
    print_test_header(
        "test_user_round_trip_and_unique_email",
        &["Verify users persist and a duplicate email maps to a constraint violation"],
    );

    let repos = repositories().await;

    println!("\n📝 Stage 1: Insert");
    let created = repos.users.create(new_user("ivan@example.com")).await.expect("create");
    assert_eq!(created.email, "ivan@example.com");
    assert!(created.deleted_at.is_none());

    println!("\n📝 Stage 2: Duplicate email");
    let err = repos
        .users
        .create(new_user("ivan@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)), "got {err:?}");

    println!("\n📝 Stage 3: List");
    let users = repos.users.list_all(10).await.expect("list");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, created.id);
}

#[tokio::test]
async fn test_subscription_status_filter() {
    let repos = repositories().await;
    let user = repos.users.create(new_user("judy@example.com")).await.expect("user");

    let mut preferences = serde_json::Map::new();
    preferences.insert("dietary".to_string(), serde_json::json!(["Vegetarian"]));

    for status in [
        SubscriptionStatus::Active,
        SubscriptionStatus::Active,
        SubscriptionStatus::Cancelled,
    ] {
        repos
            .subscriptions
            .create(NewSubscription {
                user_id: user.id,
                status,
                preferences: Some(preferences.clone()),
                started_at: Utc::now(),
            })
            .await
            .expect("subscription");
    }

    let active = repos
        .subscriptions
        .list_all(Some(SubscriptionStatus::Active), 100)
        .await
        .expect("list active");
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|s| s.status == SubscriptionStatus::Active));
    assert_eq!(active[0].preferences.as_ref(), Some(&preferences));

    let all = repos.subscriptions.list_all(None, 100).await.expect("list all");
    assert_eq!(all.len(), 3);

    let limited = repos.subscriptions.list_all(None, 1).await.expect("list limited");
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn test_subscription_for_unknown_user_is_rejected() {
    let repos = repositories().await;

    let err = repos
        .subscriptions
        .create(NewSubscription {
            user_id: Uuid::new_v4(),
            status: SubscriptionStatus::Active,
            preferences: None,
            started_at: Utc::now(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::ConstraintViolation(_)), "got {err:?}");
}

// ===== Recipes and orders =====

#[tokio::test]
async fn test_recipe_round_trip_keeps_tags_and_price() {
    let repos = repositories().await;

    let created = repos
        .recipes
        .create(new_recipe("Spicy Chicken Tacos", Decimal::new(1999, 2)))
        .await
        .expect("recipe");

    let recipes = repos.recipes.list_all(10).await.expect("list");
    assert_eq!(recipes.len(), 1);
    let recipe = &recipes[0];
    assert_eq!(recipe.id, created.id);
    assert_eq!(recipe.price, Some(Decimal::new(1999, 2)));
    assert_eq!(
        recipe.tags.as_deref(),
        Some(["quick".to_string(), "spicy".to_string()].as_slice())
    );
    assert_eq!(recipe.preparation_time, Some(35));
    assert_eq!(recipe.servings, Some(2));
}

#[tokio::test]
async fn test_order_round_trip_keeps_recipe_snapshot_and_total() {
    print_test_header(
        "test_order_round_trip_keeps_recipe_snapshot_and_total",
        &["Verify the JSON recipe snapshot and the decimal total survive storage"],
    );

    let repos = repositories().await;
    let subscription = active_subscription(&repos, "kate@example.com").await;
    let recipe = repos
        .recipes
        .create(new_recipe("Lemon Herb Salmon", Decimal::new(2450, 2)))
        .await
        .expect("recipe");

    let created = create_order(&repos, subscription.id, &recipe).await;

    let orders = repos.orders.list_all(10).await.expect("list");
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.id, created.id);
    assert_eq!(order.subscription_id, subscription.id);
    assert_eq!(order.total_amount, Decimal::new(2450, 2));
    assert_eq!(order.status, OrderStatus::Shipped);
    assert_eq!(order.recipes.len(), 1);
    assert_eq!(order.recipes[0].id, recipe.id);
    assert_eq!(order.recipes[0].name, "Lemon Herb Salmon");
}

// ===== Deliveries =====

#[tokio::test]
async fn test_second_delivery_for_order_is_a_constraint_violation() {
    print_test_header(
        "test_second_delivery_for_order_is_a_constraint_violation",
        &["Verify the unique order key backs up the generator's delivery check"],
    );

    let repos = repositories().await;
    let subscription = active_subscription(&repos, "liam@example.com").await;
    let recipe = repos
        .recipes
        .create(new_recipe("Beef Stir Fry", Decimal::new(2100, 2)))
        .await
        .expect("recipe");
    let order = create_order(&repos, subscription.id, &recipe).await;

    println!("\n📝 Stage 1: First delivery");
    let delivery = repos.deliveries.create(new_delivery(order.id)).await.expect("delivery");
    let found = repos
        .deliveries
        .find_by_order(order.id)
        .await
        .expect("find")
        .expect("delivery exists");
    assert_eq!(found.id, delivery.id);
    assert_eq!(found.tracking_number.as_deref(), Some("TRACK123456"));

    println!("\n📝 Stage 2: Duplicate delivery");
    let err = repos
        .deliveries
        .create(new_delivery(order.id))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::ConstraintViolation(_)), "got {err:?}");

    println!("\n📝 Stage 3: Order no longer listed as undelivered");
    assert!(repos
        .orders
        .list_without_delivery(10)
        .await
        .expect("list")
        .is_empty());
}

#[tokio::test]
async fn test_delivery_generator_finds_orders_past_the_first_thousand() {
    print_test_header(
        "test_delivery_generator_finds_orders_past_the_first_thousand",
        &[
            "Verify 1000 older delivered orders do not hide a newer undelivered order",
            "from the delivery generator running on the database adapter",
        ],
    );

    let repos = repositories().await;
    let subscription = active_subscription(&repos, "mia@example.com").await;
    let recipe = repos
        .recipes
        .create(new_recipe("Veggie Curry", Decimal::new(1650, 2)))
        .await
        .expect("recipe");

    println!("\n📝 Stage 1: Seed 1000 delivered orders");
    for _ in 0..1000 {
        let order = create_order(&repos, subscription.id, &recipe).await;
        repos.deliveries.create(new_delivery(order.id)).await.expect("delivery");
    }
    let fresh = create_order(&repos, subscription.id, &recipe).await;

    let undelivered = repos.orders.list_without_delivery(1000).await.expect("list");
    assert_eq!(undelivered.len(), 1);
    assert_eq!(undelivered[0].id, fresh.id);

    println!("\n📝 Stage 2: Generator tick");
    let generator = DeliveryGenerator::new(
        repos.orders.clone(),
        repos.deliveries.clone(),
        GeneratorSettings::from_config(&Config::default()).delivery,
        GeneratorConfig::new(5, 90),
    );
    let outcome = generator.generate().await.expect("tick");

    assert_eq!(
        outcome,
        TickOutcome::Completed {
            requested: 1,
            created: 1
        }
    );
    assert!(repos
        .deliveries
        .find_by_order(fresh.id)
        .await
        .expect("find")
        .is_some());

    println!("\n📝 Stage 3: Nothing left to deliver");
    assert_eq!(
        generator.generate().await.expect("tick"),
        TickOutcome::Skipped {
            reason: "all orders already have deliveries"
        }
    );
}
