//! Contract models for generated meal-kit entities
//!
//! These models are transport-agnostic and shared by the generators and the
//! storage layer. NO serde derives - storage has its own JSON helpers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::error::ParseStatusError;

/// Free-form subscription preferences (e.g. `{"allergies": ["Nuts"]}`)
pub type Preferences = serde_json::Map<String, serde_json::Value>;

// ===== Users =====

/// Registered user
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    /// Unique email address
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// IANA timezone label
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Fields for a user about to be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub timezone: String,
}

/// Gender drawn when synthesizing a user name; never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];
}

// ===== Subscriptions =====

/// Subscription lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
}

impl SubscriptionStatus {
    /// Outcomes in the order used by subscription weight vectors
    pub const ALL: [SubscriptionStatus; 3] = [
        SubscriptionStatus::Active,
        SubscriptionStatus::Paused,
        SubscriptionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paused => "Paused",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Meal-kit subscription owned by a user
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: SubscriptionStatus,
    pub preferences: Option<Preferences>,
    pub started_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSubscription {
    pub user_id: Uuid,
    pub status: SubscriptionStatus,
    pub preferences: Option<Preferences>,
    pub started_at: DateTime<Utc>,
}

// ===== Recipes =====

/// Catalog recipe
#[derive(Debug, Clone, PartialEq)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Calories per serving
    pub calories: i32,
    pub tags: Option<Vec<String>>,
    pub price: Option<Decimal>,
    /// Preparation time in minutes
    pub preparation_time: Option<i32>,
    pub servings: Option<i32>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub name: String,
    pub description: Option<String>,
    pub calories: i32,
    pub tags: Option<Vec<String>>,
    pub price: Option<Decimal>,
    pub preparation_time: Option<i32>,
    pub servings: Option<i32>,
    pub image_url: Option<String>,
}

// ===== Orders =====

/// Order fulfilment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Outcomes in the order used by order weight vectors
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Snapshot of a recipe copied into an order at creation time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecipe {
    pub id: Uuid,
    pub name: String,
}

/// Weekly meal-kit box
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Uuid,
    pub subscription_id: Uuid,
    /// Never empty
    pub recipes: Vec<OrderRecipe>,
    /// Non-negative
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub subscription_id: Uuid,
    pub recipes: Vec<OrderRecipe>,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub order_date: DateTime<Utc>,
    pub delivery_date: DateTime<Utc>,
}

// ===== Deliveries =====

/// Delivery tracking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    Delivered,
    Delayed,
    Failed,
    InTransit,
}

impl DeliveryStatus {
    /// Outcomes in the order used by delivery weight vectors
    pub const ALL: [DeliveryStatus; 4] = [
        DeliveryStatus::Delivered,
        DeliveryStatus::Delayed,
        DeliveryStatus::Failed,
        DeliveryStatus::InTransit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delivered => "delivered",
            Self::Delayed => "delayed",
            Self::Failed => "failed",
            Self::InTransit => "in_transit",
        }
    }
}

/// Delivery of exactly one order
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub id: Uuid,
    /// Unique: at most one delivery per order
    pub order_id: Uuid,
    pub status: DeliveryStatus,
    pub expected_delivery_date: DateTime<Utc>,
    pub actual_delivery_date: Option<DateTime<Utc>>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDelivery {
    pub order_id: Uuid,
    pub status: DeliveryStatus,
    pub expected_delivery_date: DateTime<Utc>,
    pub actual_delivery_date: Option<DateTime<Utc>>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
}

// ===== String conversions =====

macro_rules! status_strings {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = ParseStatusError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Self::ALL
                        .into_iter()
                        .find(|status| status.as_str() == s)
                        .ok_or_else(|| ParseStatusError {
                            kind: stringify!($ty),
                            value: s.to_string(),
                        })
                }
            }
        )+
    };
}

status_strings!(SubscriptionStatus, OrderStatus, DeliveryStatus);
