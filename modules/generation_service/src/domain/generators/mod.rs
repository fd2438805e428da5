//! Generator jobs
//!
//! Each generator synthesizes one kind of record per tick. Randomness is
//! confined to synchronous builder functions that take the RNG as a
//! parameter; the async part only reads prerequisites and writes records.

mod delivery;
mod order;
mod recipe;
mod subscription;
mod user;

pub use delivery::{build_delivery, DeliveryGenerator};
pub use order::{build_order, OrderGenerator};
pub use recipe::{build_recipe, RecipeGenerator};
pub use subscription::{build_subscription, SubscriptionGenerator};
pub use user::{build_user, UserGenerator};

use super::repository::{Repositories, StoreResult};
use super::scheduler::Job;
use super::settings::GeneratorSettings;
use crate::config::{Config, GeneratorConfig};
use crate::contract::GeneratorKind;
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::sync::Arc;

/// Maximum number of prerequisite rows read per tick
pub const PREREQUISITE_LIMIT: u64 = 1000;

/// Result of one generator tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Generator switched off or configured with a zero count
    Disabled,
    /// Prerequisite data missing; nothing was attempted
    Skipped { reason: &'static str },
    Completed { requested: usize, created: usize },
}

impl TickOutcome {
    pub fn created(&self) -> usize {
        match self {
            Self::Completed { created, .. } => *created,
            Self::Disabled | Self::Skipped { .. } => 0,
        }
    }
}

/// One generator kind's tick
#[async_trait]
pub trait Generator: Send + Sync {
    fn kind(&self) -> GeneratorKind;

    /// Run one tick. Errors only for failures reading prerequisites;
    /// per-record failures are logged and counted.
    async fn generate(&self) -> anyhow::Result<TickOutcome>;
}

/// Adapts a [`Generator`] to the scheduler and logs each tick's outcome
pub struct GeneratorJob<G> {
    generator: G,
}

impl<G: Generator> GeneratorJob<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl<G: Generator> Job for GeneratorJob<G> {
    async fn run(&self) -> anyhow::Result<()> {
        let kind = self.generator.kind();
        match self.generator.generate().await? {
            TickOutcome::Disabled => {
                tracing::debug!(%kind, "generator disabled, tick ignored");
            }
            TickOutcome::Skipped { reason } => {
                tracing::warn!(%kind, reason, "generation skipped");
            }
            TickOutcome::Completed { requested, created } => {
                tracing::info!(%kind, requested, created, "generation tick completed");
            }
        }
        Ok(())
    }
}

/// Build the scheduler job of every generator kind
pub fn build_jobs(
    config: &Config,
    settings: &GeneratorSettings,
    repos: &Repositories,
) -> Vec<(GeneratorKind, Arc<dyn Job>)> {
    vec![
        (
            GeneratorKind::User,
            job(UserGenerator::new(
                repos.users.clone(),
                settings.user.clone(),
                config.users,
            )),
        ),
        (
            GeneratorKind::Recipe,
            job(RecipeGenerator::new(
                repos.recipes.clone(),
                config.recipes,
            )),
        ),
        (
            GeneratorKind::Subscription,
            job(SubscriptionGenerator::new(
                repos.users.clone(),
                repos.subscriptions.clone(),
                settings.subscription.clone(),
                config.subscriptions,
            )),
        ),
        (
            GeneratorKind::Order,
            job(OrderGenerator::new(
                repos.subscriptions.clone(),
                repos.recipes.clone(),
                repos.orders.clone(),
                settings.order.clone(),
                config.orders,
            )),
        ),
        (
            GeneratorKind::Delivery,
            job(DeliveryGenerator::new(
                repos.orders.clone(),
                repos.deliveries.clone(),
                settings.delivery.clone(),
                config.deliveries,
            )),
        ),
    ]
}

fn job<G: Generator + 'static>(generator: G) -> Arc<dyn Job> {
    Arc::new(GeneratorJob::new(generator))
}

fn is_active(config: &GeneratorConfig) -> bool {
    config.enabled && config.count > 0
}

/// Log a failed create and report whether it succeeded
fn record_created<T>(kind: GeneratorKind, result: StoreResult<T>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(%kind, error = %e, "failed to create record");
            false
        }
    }
}

/// Uniform pick from a fixed, non-empty word pool
fn pick<'a, R: Rng + ?Sized>(rng: &mut R, pool: &[&'a str]) -> &'a str {
    pool.choose(rng).copied().unwrap_or_default()
}
