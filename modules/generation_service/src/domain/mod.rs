//! Domain layer - business logic and services

pub mod generators;
pub mod repository;
pub mod sampler;
pub mod scheduler;
pub mod service;
pub mod settings;
pub mod validation;

pub use generators::{Generator, GeneratorJob, TickOutcome};
pub use repository::{
    DeliveryRepository, OrderRepository, RecipeRepository, Repositories, StoreError, StoreResult,
    SubscriptionRepository, UserRepository,
};
pub use sampler::{SamplerError, WeightedSampler};
pub use scheduler::{Job, Scheduler, SchedulerError};
pub use service::Service;
pub use settings::{GeneratorSettings, SettingsStore};
