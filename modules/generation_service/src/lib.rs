//! Generation Service Module
//!
//! Background generators that keep a meal-kit database populated with
//! plausible users, recipes, subscriptions, orders and deliveries. Each
//! generator runs on its own interval; its outcome weights and interval can
//! be tuned at runtime through [`GenerationSettingsApi`].

// Public exports
pub mod contract;
pub use contract::{
    client::GenerationSettingsApi, error::GenerationError, AllGenerationSettings,
    AllSettingsUpdate, GenerationSettings, GeneratorKind, SettingsUpdate,
};

pub mod config;
pub use config::{Config, GeneratorConfig};

pub mod module;
pub use module::GenerationModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
