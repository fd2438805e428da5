//! Configuration for generation service module

use crate::contract::GeneratorKind;
use serde::{Deserialize, Deserializer};

/// Generation service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Global switch; when off the scheduler never fires any job
    #[serde(default = "default_true")]
    pub scheduler_enabled: bool,

    #[serde(default = "default_users", deserialize_with = "users_section")]
    pub users: GeneratorConfig,

    #[serde(default = "default_recipes", deserialize_with = "recipes_section")]
    pub recipes: GeneratorConfig,

    #[serde(default = "default_subscriptions", deserialize_with = "subscriptions_section")]
    pub subscriptions: GeneratorConfig,

    #[serde(default = "default_orders", deserialize_with = "orders_section")]
    pub orders: GeneratorConfig,

    #[serde(default = "default_deliveries", deserialize_with = "deliveries_section")]
    pub deliveries: GeneratorConfig,
}

/// Per-generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub enabled: bool,

    /// Records attempted per tick
    pub count: u32,

    /// Initial interval; later changes go through the settings façade
    pub interval_secs: u64,
}

impl GeneratorConfig {
    pub const fn new(count: u32, interval_secs: u64) -> Self {
        Self {
            enabled: true,
            count,
            interval_secs,
        }
    }
}

/// Generator section as written in configuration. Keys left out keep the
/// defaults of the generator kind the section belongs to.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GeneratorSection {
    enabled: Option<bool>,
    count: Option<u32>,
    interval_secs: Option<u64>,
}

impl GeneratorSection {
    fn over(self, defaults: GeneratorConfig) -> GeneratorConfig {
        GeneratorConfig {
            enabled: self.enabled.unwrap_or(defaults.enabled),
            count: self.count.unwrap_or(defaults.count),
            interval_secs: self.interval_secs.unwrap_or(defaults.interval_secs),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scheduler_enabled: true,
            users: default_users(),
            recipes: default_recipes(),
            subscriptions: default_subscriptions(),
            orders: default_orders(),
            deliveries: default_deliveries(),
        }
    }
}

impl Config {
    pub fn generator(&self, kind: GeneratorKind) -> &GeneratorConfig {
        match kind {
            GeneratorKind::User => &self.users,
            GeneratorKind::Recipe => &self.recipes,
            GeneratorKind::Subscription => &self.subscriptions,
            GeneratorKind::Order => &self.orders,
            GeneratorKind::Delivery => &self.deliveries,
        }
    }

    /// Reject configurations the scheduler cannot run
    pub fn validate(&self) -> anyhow::Result<()> {
        for kind in GeneratorKind::ALL {
            if self.generator(kind).interval_secs == 0 {
                anyhow::bail!("{kind} generator interval_secs must be at least 1");
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_users() -> GeneratorConfig {
    GeneratorConfig::new(5, 60)
}

fn default_recipes() -> GeneratorConfig {
    GeneratorConfig::new(2, 300)
}

fn default_subscriptions() -> GeneratorConfig {
    GeneratorConfig::new(3, 120)
}

fn default_orders() -> GeneratorConfig {
    GeneratorConfig::new(5, 60)
}

fn default_deliveries() -> GeneratorConfig {
    GeneratorConfig::new(5, 90)
}

fn users_section<'de, D: Deserializer<'de>>(d: D) -> Result<GeneratorConfig, D::Error> {
    GeneratorSection::deserialize(d).map(|s| s.over(default_users()))
}

fn recipes_section<'de, D: Deserializer<'de>>(d: D) -> Result<GeneratorConfig, D::Error> {
    GeneratorSection::deserialize(d).map(|s| s.over(default_recipes()))
}

fn subscriptions_section<'de, D: Deserializer<'de>>(d: D) -> Result<GeneratorConfig, D::Error> {
    GeneratorSection::deserialize(d).map(|s| s.over(default_subscriptions()))
}

fn orders_section<'de, D: Deserializer<'de>>(d: D) -> Result<GeneratorConfig, D::Error> {
    GeneratorSection::deserialize(d).map(|s| s.over(default_orders()))
}

fn deliveries_section<'de, D: Deserializer<'de>>(d: D) -> Result<GeneratorConfig, D::Error> {
    GeneratorSection::deserialize(d).map(|s| s.over(default_deliveries()))
}
