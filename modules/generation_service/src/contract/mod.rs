//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.

pub mod client;
pub mod error;
pub mod model;
pub mod settings;

pub use client::GenerationSettingsApi;
pub use error::{GenerationError, ParseStatusError};
pub use model::{
    Delivery, DeliveryStatus, Gender, NewDelivery, NewOrder, NewRecipe, NewSubscription, NewUser,
    Order, OrderRecipe, OrderStatus, Preferences, Recipe, Subscription, SubscriptionStatus, User,
};
pub use settings::{
    AllGenerationSettings, AllSettingsUpdate, DeliveryGenerationSettings, GenerationSettings,
    GeneratorKind, OrderGenerationSettings, RecipeGenerationSettings, RecipeSettingsUpdate,
    SettingsUpdate, SubscriptionGenerationSettings, UserGenerationSettings, UserSettingsUpdate,
    WeightedGenerationSettings, WeightedSettingsUpdate,
};
