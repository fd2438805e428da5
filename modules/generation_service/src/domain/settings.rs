//! Process-wide generator settings stores
//!
//! One store per generator kind. Readers get copies; writers validate every
//! present field before committing any of them, under the same write lock.

use crate::config::Config;
use crate::contract::{
    AllGenerationSettings, DeliveryGenerationSettings, OrderGenerationSettings,
    RecipeGenerationSettings, RecipeSettingsUpdate, SubscriptionGenerationSettings,
    UserGenerationSettings, UserSettingsUpdate, WeightedGenerationSettings, WeightedSettingsUpdate,
};
use super::validation::{validate_interval, validate_male_weight, validate_status_weights};
use parking_lot::RwLock;
use std::sync::Arc;

pub const DEFAULT_MALE_WEIGHT: f64 = 0.5;
/// `[Active, Paused, Cancelled]`
pub const DEFAULT_SUBSCRIPTION_WEIGHTS: [f64; 3] = [0.70, 0.15, 0.15];
/// `[pending, shipped, delivered, cancelled]`
pub const DEFAULT_ORDER_WEIGHTS: [f64; 4] = [0.15, 0.20, 0.60, 0.05];
/// `[delivered, delayed, failed, in_transit]`
pub const DEFAULT_DELIVERY_WEIGHTS: [f64; 4] = [0.60, 0.15, 0.05, 0.20];

/// Settings value that can absorb a partial update of type `U`
pub trait ApplyUpdate<U>: Sized {
    /// Produce the merged settings, or the first validation failure
    fn merged(&self, update: &U) -> Result<Self, String>;

    fn interval_secs(&self) -> u64;
}

impl ApplyUpdate<UserSettingsUpdate> for UserGenerationSettings {
    fn merged(&self, update: &UserSettingsUpdate) -> Result<Self, String> {
        let mut next = *self;
        if let Some(male_weight) = update.male_weight {
            next.male_weight = validate_male_weight(male_weight)?;
        }
        if let Some(interval_secs) = update.interval_secs {
            next.interval_secs = validate_interval(interval_secs)?;
        }
        Ok(next)
    }

    fn interval_secs(&self) -> u64 {
        self.interval_secs
    }
}

impl ApplyUpdate<RecipeSettingsUpdate> for RecipeGenerationSettings {
    fn merged(&self, update: &RecipeSettingsUpdate) -> Result<Self, String> {
        let mut next = *self;
        if let Some(interval_secs) = update.interval_secs {
            next.interval_secs = validate_interval(interval_secs)?;
        }
        Ok(next)
    }

    fn interval_secs(&self) -> u64 {
        self.interval_secs
    }
}

impl<const N: usize> ApplyUpdate<WeightedSettingsUpdate> for WeightedGenerationSettings<N> {
    fn merged(&self, update: &WeightedSettingsUpdate) -> Result<Self, String> {
        let mut next = *self;
        if let Some(weights) = &update.status_weights {
            next.status_weights = validate_status_weights::<N>(weights)?;
        }
        if let Some(interval_secs) = update.interval_secs {
            next.interval_secs = validate_interval(interval_secs)?;
        }
        Ok(next)
    }

    fn interval_secs(&self) -> u64 {
        self.interval_secs
    }
}

/// Lock-guarded settings of one generator kind
#[derive(Debug)]
pub struct SettingsStore<S> {
    current: RwLock<S>,
}

impl<S: Clone> SettingsStore<S> {
    pub fn new(initial: S) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    /// Copy of the current settings
    pub fn get(&self) -> S {
        self.current.read().clone()
    }

    /// Validate and commit `update` atomically.
    ///
    /// `on_interval_change` runs with the write lock still held, so interval
    /// changes reach it in commit order. On error nothing is modified.
    pub fn update<U, F>(&self, update: &U, on_interval_change: F) -> Result<S, String>
    where
        S: ApplyUpdate<U>,
        F: FnOnce(u64),
    {
        let mut current = self.current.write();
        let next = current.merged(update)?;
        let interval_changed = next.interval_secs() != current.interval_secs();
        *current = next.clone();
        if interval_changed {
            on_interval_change(next.interval_secs());
        }
        Ok(next)
    }
}

/// Settings stores of every generator kind
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub user: Arc<SettingsStore<UserGenerationSettings>>,
    pub recipe: Arc<SettingsStore<RecipeGenerationSettings>>,
    pub subscription: Arc<SettingsStore<SubscriptionGenerationSettings>>,
    pub order: Arc<SettingsStore<OrderGenerationSettings>>,
    pub delivery: Arc<SettingsStore<DeliveryGenerationSettings>>,
}

impl GeneratorSettings {
    /// Hard-coded default weights, intervals taken from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            user: Arc::new(SettingsStore::new(UserGenerationSettings {
                male_weight: DEFAULT_MALE_WEIGHT,
                interval_secs: config.users.interval_secs,
            })),
            recipe: Arc::new(SettingsStore::new(RecipeGenerationSettings {
                interval_secs: config.recipes.interval_secs,
            })),
            subscription: Arc::new(SettingsStore::new(WeightedGenerationSettings {
                status_weights: DEFAULT_SUBSCRIPTION_WEIGHTS,
                interval_secs: config.subscriptions.interval_secs,
            })),
            order: Arc::new(SettingsStore::new(WeightedGenerationSettings {
                status_weights: DEFAULT_ORDER_WEIGHTS,
                interval_secs: config.orders.interval_secs,
            })),
            delivery: Arc::new(SettingsStore::new(WeightedGenerationSettings {
                status_weights: DEFAULT_DELIVERY_WEIGHTS,
                interval_secs: config.deliveries.interval_secs,
            })),
        }
    }

    pub fn snapshot(&self) -> AllGenerationSettings {
        AllGenerationSettings {
            user: self.user.get(),
            recipe: self.recipe.get(),
            subscription: self.subscription.get(),
            order: self.order.get(),
            delivery: self.delivery.get(),
        }
    }
}
