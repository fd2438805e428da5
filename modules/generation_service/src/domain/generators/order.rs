use super::{is_active, record_created, Generator, TickOutcome, PREREQUISITE_LIMIT};
use crate::config::GeneratorConfig;
use crate::contract::{
    GeneratorKind, NewOrder, OrderGenerationSettings, OrderRecipe, OrderStatus, Recipe,
    Subscription, SubscriptionStatus,
};
use crate::domain::repository::{OrderRepository, RecipeRepository, SubscriptionRepository};
use crate::domain::sampler::WeightedSampler;
use crate::domain::settings::SettingsStore;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;

const MAX_RECIPES_PER_ORDER: usize = 4;
const MAX_BACKDATE_DAYS: i64 = 90;
/// Orders are weekly boxes
const DELIVERY_LEAD_DAYS: i64 = 7;

/// Sum of the known recipe prices, or a random plausible amount when none
/// of the recipes carries a price
fn order_total<R: Rng + ?Sized>(rng: &mut R, recipes: &[&Recipe]) -> Decimal {
    let total: Decimal = recipes.iter().filter_map(|recipe| recipe.price).sum();
    if total.is_zero() {
        Decimal::new(rng.random_range(2000..=10000), 2)
    } else {
        total
    }
}

/// Synthesize an order for a random subscription over 1 to 4 distinct
/// recipes; `None` if either input is empty
pub fn build_order<R: Rng + ?Sized>(
    rng: &mut R,
    subscriptions: &[Subscription],
    recipes: &[Recipe],
    statuses: &WeightedSampler<'_, OrderStatus>,
    now: DateTime<Utc>,
) -> Option<NewOrder> {
    let subscription = subscriptions.choose(rng)?;
    let max_recipes = recipes.len().min(MAX_RECIPES_PER_ORDER);
    if max_recipes == 0 {
        return None;
    }

    let recipe_count = rng.random_range(1..=max_recipes);
    let selected: Vec<&Recipe> = recipes.choose_multiple(rng, recipe_count).collect();
    let total_amount = order_total(rng, &selected);
    let status = *statuses.draw(rng);
    let order_date = now - Duration::days(rng.random_range(0..=MAX_BACKDATE_DAYS));

    Some(NewOrder {
        subscription_id: subscription.id,
        recipes: selected
            .iter()
            .map(|recipe| OrderRecipe {
                id: recipe.id,
                name: recipe.name.clone(),
            })
            .collect(),
        total_amount,
        status,
        order_date,
        delivery_date: order_date + Duration::days(DELIVERY_LEAD_DAYS),
    })
}

pub struct OrderGenerator {
    subscriptions: Arc<dyn SubscriptionRepository>,
    recipes: Arc<dyn RecipeRepository>,
    orders: Arc<dyn OrderRepository>,
    settings: Arc<SettingsStore<OrderGenerationSettings>>,
    config: GeneratorConfig,
}

impl OrderGenerator {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        recipes: Arc<dyn RecipeRepository>,
        orders: Arc<dyn OrderRepository>,
        settings: Arc<SettingsStore<OrderGenerationSettings>>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            subscriptions,
            recipes,
            orders,
            settings,
            config,
        }
    }
}

#[async_trait]
impl Generator for OrderGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Order
    }

    async fn generate(&self) -> anyhow::Result<TickOutcome> {
        if !is_active(&self.config) {
            return Ok(TickOutcome::Disabled);
        }

        let subscriptions = self
            .subscriptions
            .list_all(Some(SubscriptionStatus::Active), PREREQUISITE_LIMIT)
            .await?;
        if subscriptions.is_empty() {
            return Ok(TickOutcome::Skipped {
                reason: "no active subscriptions found",
            });
        }

        let recipes = self.recipes.list_all(PREREQUISITE_LIMIT).await?;
        if recipes.is_empty() {
            return Ok(TickOutcome::Skipped {
                reason: "no recipes found",
            });
        }

        let settings = self.settings.get();
        let batch: Vec<NewOrder> = {
            let statuses = WeightedSampler::new(&OrderStatus::ALL, &settings.status_weights)?;
            let mut rng = rand::rng();
            let now = Utc::now();
            (0..self.config.count)
                .filter_map(|_| build_order(&mut rng, &subscriptions, &recipes, &statuses, now))
                .collect()
        };
        let requested = batch.len();

        let mut created = 0;
        for order in batch {
            if record_created(self.kind(), self.orders.create(order).await) {
                created += 1;
            }
        }

        Ok(TickOutcome::Completed { requested, created })
    }
}
