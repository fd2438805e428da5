//! Generator settings models exchanged through the settings façade
//!
//! Snapshots are plain values: callers always receive copies and never a
//! live reference into a settings store. Update structs carry only optional
//! fields; absent fields leave the stored value untouched.

use std::fmt;

/// Generator kind; each kind owns its own settings and scheduled job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorKind {
    User,
    Recipe,
    Subscription,
    Order,
    Delivery,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 5] = [
        GeneratorKind::User,
        GeneratorKind::Recipe,
        GeneratorKind::Subscription,
        GeneratorKind::Order,
        GeneratorKind::Delivery,
    ];

    /// Scheduler job name for this kind
    pub fn job_name(&self) -> &'static str {
        match self {
            Self::User => "generate_users",
            Self::Recipe => "generate_recipes",
            Self::Subscription => "generate_subscriptions",
            Self::Order => "generate_orders",
            Self::Delivery => "generate_deliveries",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::User => "User",
            Self::Recipe => "Recipe",
            Self::Subscription => "Subscription",
            Self::Order => "Order",
            Self::Delivery => "Delivery",
        };
        f.write_str(label)
    }
}

// ===== Snapshots =====

/// User generator settings. The female weight is always `1.0 - male_weight`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserGenerationSettings {
    pub male_weight: f64,
    pub interval_secs: u64,
}

impl UserGenerationSettings {
    pub fn female_weight(&self) -> f64 {
        1.0 - self.male_weight
    }
}

/// Recipe generator settings (recipes are drawn from fixed template pools)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeGenerationSettings {
    pub interval_secs: u64,
}

/// Settings for generators that draw a status from `N` weighted outcomes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedGenerationSettings<const N: usize> {
    pub status_weights: [f64; N],
    pub interval_secs: u64,
}

/// Weights for `[Active, Paused, Cancelled]`
pub type SubscriptionGenerationSettings = WeightedGenerationSettings<3>;
/// Weights for `[pending, shipped, delivered, cancelled]`
pub type OrderGenerationSettings = WeightedGenerationSettings<4>;
/// Weights for `[delivered, delayed, failed, in_transit]`
pub type DeliveryGenerationSettings = WeightedGenerationSettings<4>;

/// Settings snapshot of a single generator kind
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationSettings {
    User(UserGenerationSettings),
    Recipe(RecipeGenerationSettings),
    Subscription(SubscriptionGenerationSettings),
    Order(OrderGenerationSettings),
    Delivery(DeliveryGenerationSettings),
}

impl GenerationSettings {
    pub fn kind(&self) -> GeneratorKind {
        match self {
            Self::User(_) => GeneratorKind::User,
            Self::Recipe(_) => GeneratorKind::Recipe,
            Self::Subscription(_) => GeneratorKind::Subscription,
            Self::Order(_) => GeneratorKind::Order,
            Self::Delivery(_) => GeneratorKind::Delivery,
        }
    }

    pub fn interval_secs(&self) -> u64 {
        match self {
            Self::User(s) => s.interval_secs,
            Self::Recipe(s) => s.interval_secs,
            Self::Subscription(s) => s.interval_secs,
            Self::Order(s) => s.interval_secs,
            Self::Delivery(s) => s.interval_secs,
        }
    }

    /// Status weight vector, for kinds that have one
    pub fn status_weights(&self) -> Option<&[f64]> {
        match self {
            Self::Subscription(s) => Some(&s.status_weights),
            Self::Order(s) => Some(&s.status_weights),
            Self::Delivery(s) => Some(&s.status_weights),
            Self::User(_) | Self::Recipe(_) => None,
        }
    }

    /// Male weight, for the user generator only
    pub fn male_weight(&self) -> Option<f64> {
        match self {
            Self::User(s) => Some(s.male_weight),
            _ => None,
        }
    }
}

/// Settings of every generator, read in one call
#[derive(Debug, Clone, PartialEq)]
pub struct AllGenerationSettings {
    pub user: UserGenerationSettings,
    pub recipe: RecipeGenerationSettings,
    pub subscription: SubscriptionGenerationSettings,
    pub order: OrderGenerationSettings,
    pub delivery: DeliveryGenerationSettings,
}

// ===== Partial updates =====

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSettingsUpdate {
    /// Must lie in `[0.0, 1.0]`
    pub male_weight: Option<f64>,
    /// Must be at least 1
    pub interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeSettingsUpdate {
    pub interval_secs: Option<u64>,
}

/// Update for weighted generators. The vector length is checked against the
/// kind at validation time, so a wrong-length vector is a validation error
/// rather than a type error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightedSettingsUpdate {
    pub status_weights: Option<Vec<f64>>,
    pub interval_secs: Option<u64>,
}

/// Partial update addressed to one generator kind
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsUpdate {
    User(UserSettingsUpdate),
    Recipe(RecipeSettingsUpdate),
    Subscription(WeightedSettingsUpdate),
    Order(WeightedSettingsUpdate),
    Delivery(WeightedSettingsUpdate),
}

impl SettingsUpdate {
    pub fn kind(&self) -> GeneratorKind {
        match self {
            Self::User(_) => GeneratorKind::User,
            Self::Recipe(_) => GeneratorKind::Recipe,
            Self::Subscription(_) => GeneratorKind::Subscription,
            Self::Order(_) => GeneratorKind::Order,
            Self::Delivery(_) => GeneratorKind::Delivery,
        }
    }
}

/// Bulk update; only kinds that are present are touched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllSettingsUpdate {
    pub user: Option<UserSettingsUpdate>,
    pub recipe: Option<RecipeSettingsUpdate>,
    pub subscription: Option<WeightedSettingsUpdate>,
    pub order: Option<WeightedSettingsUpdate>,
    pub delivery: Option<WeightedSettingsUpdate>,
}

impl AllSettingsUpdate {
    /// Split into per-kind updates in a fixed kind order
    pub fn into_updates(self) -> Vec<SettingsUpdate> {
        [
            self.user.map(SettingsUpdate::User),
            self.recipe.map(SettingsUpdate::Recipe),
            self.subscription.map(SettingsUpdate::Subscription),
            self.order.map(SettingsUpdate::Order),
            self.delivery.map(SettingsUpdate::Delivery),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
