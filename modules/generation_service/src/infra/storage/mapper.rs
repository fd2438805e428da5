//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models. Inserts get their
//! identifier and envelope timestamps stamped here.

use crate::contract::{
    Delivery, NewDelivery, NewOrder, NewRecipe, NewSubscription, NewUser, Order, OrderRecipe,
    Recipe, Subscription, User,
};
use super::entity;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use serde_json::Value;
use uuid::Uuid;

// ===== Users =====

impl From<entity::user::Model> for User {
    fn from(entity: entity::user::Model) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            first_name: entity.first_name,
            last_name: entity.last_name,
            timezone: entity.timezone,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        }
    }
}

impl From<NewUser> for entity::user::ActiveModel {
    fn from(model: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Set(Uuid::new_v4()),
            email: Set(model.email),
            first_name: Set(model.first_name),
            last_name: Set(model.last_name),
            timezone: Set(model.timezone),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: NotSet,
        }
    }
}

// ===== Subscriptions =====

impl TryFrom<entity::subscription::Model> for Subscription {
    type Error = anyhow::Error;

    fn try_from(entity: entity::subscription::Model) -> Result<Self, Self::Error> {
        let preferences = match entity.preferences {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => anyhow::bail!("subscription preferences must be an object, got {other}"),
        };

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            status: entity.status.parse()?,
            preferences,
            started_at: entity.started_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        })
    }
}

impl From<NewSubscription> for entity::subscription::ActiveModel {
    fn from(model: NewSubscription) -> Self {
        let now = Utc::now();
        Self {
            id: Set(Uuid::new_v4()),
            user_id: Set(model.user_id),
            status: Set(model.status.as_str().to_string()),
            preferences: Set(model.preferences.map(Value::Object)),
            started_at: Set(model.started_at),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: NotSet,
        }
    }
}

// ===== Recipes =====

impl TryFrom<entity::recipe::Model> for Recipe {
    type Error = anyhow::Error;

    fn try_from(entity: entity::recipe::Model) -> Result<Self, Self::Error> {
        let tags = entity.tags.map(serde_json::from_value).transpose()?;

        Ok(Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            calories: entity.calories,
            tags,
            price: entity.price,
            preparation_time: entity.preparation_time,
            servings: entity.servings,
            image_url: entity.image_url,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        })
    }
}

impl From<NewRecipe> for entity::recipe::ActiveModel {
    fn from(model: NewRecipe) -> Self {
        let now = Utc::now();
        Self {
            id: Set(Uuid::new_v4()),
            name: Set(model.name),
            description: Set(model.description),
            calories: Set(model.calories),
            tags: Set(model
                .tags
                .map(|tags| Value::Array(tags.into_iter().map(Value::String).collect()))),
            price: Set(model.price),
            preparation_time: Set(model.preparation_time),
            servings: Set(model.servings),
            image_url: Set(model.image_url),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: NotSet,
        }
    }
}

// ===== Orders =====

impl TryFrom<entity::order::Model> for Order {
    type Error = anyhow::Error;

    fn try_from(entity: entity::order::Model) -> Result<Self, Self::Error> {
        let recipes: Vec<OrderRecipeJson> = serde_json::from_value(entity.recipes)?;

        Ok(Self {
            id: entity.id,
            subscription_id: entity.subscription_id,
            recipes: recipes.into_iter().map(Into::into).collect(),
            total_amount: entity.total_amount,
            status: entity.status.parse()?,
            order_date: entity.order_date,
            delivery_date: entity.delivery_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        })
    }
}

impl From<NewOrder> for entity::order::ActiveModel {
    fn from(model: NewOrder) -> Self {
        let now = Utc::now();
        let recipes = model
            .recipes
            .into_iter()
            .map(|recipe| serde_json::json!({ "id": recipe.id, "name": recipe.name }))
            .collect();

        Self {
            id: Set(Uuid::new_v4()),
            subscription_id: Set(model.subscription_id),
            recipes: Set(Value::Array(recipes)),
            total_amount: Set(model.total_amount),
            status: Set(model.status.as_str().to_string()),
            order_date: Set(model.order_date),
            delivery_date: Set(model.delivery_date),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: NotSet,
        }
    }
}

// ===== Deliveries =====

impl TryFrom<entity::delivery::Model> for Delivery {
    type Error = anyhow::Error;

    fn try_from(entity: entity::delivery::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: entity.id,
            order_id: entity.order_id,
            status: entity.status.parse()?,
            expected_delivery_date: entity.expected_delivery_date,
            actual_delivery_date: entity.actual_delivery_date,
            tracking_number: entity.tracking_number,
            notes: entity.notes,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            deleted_at: entity.deleted_at,
        })
    }
}

impl From<NewDelivery> for entity::delivery::ActiveModel {
    fn from(model: NewDelivery) -> Self {
        let now = Utc::now();
        Self {
            id: Set(Uuid::new_v4()),
            order_id: Set(model.order_id),
            status: Set(model.status.as_str().to_string()),
            expected_delivery_date: Set(model.expected_delivery_date),
            actual_delivery_date: Set(model.actual_delivery_date),
            tracking_number: Set(model.tracking_number),
            notes: Set(model.notes),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: NotSet,
        }
    }
}

// ===== JSON Serialization Helpers =====

/// JSON representation of a recipe snapshot inside an order
#[derive(Debug, serde::Deserialize)]
struct OrderRecipeJson {
    id: Uuid,
    name: String,
}

impl From<OrderRecipeJson> for OrderRecipe {
    fn from(json: OrderRecipeJson) -> Self {
        Self {
            id: json.id,
            name: json.name,
        }
    }
}
