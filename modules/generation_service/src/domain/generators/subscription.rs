use super::{is_active, record_created, Generator, TickOutcome, PREREQUISITE_LIMIT};
use crate::config::GeneratorConfig;
use crate::contract::{
    GeneratorKind, NewSubscription, Preferences, SubscriptionGenerationSettings,
    SubscriptionStatus, User,
};
use crate::domain::repository::{SubscriptionRepository, UserRepository};
use crate::domain::sampler::WeightedSampler;
use crate::domain::settings::SettingsStore;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::sync::Arc;

const PREFERENCES_PROBABILITY: f64 = 0.5;
const MAX_BACKDATE_DAYS: i64 = 365;

/// `(category, value)` pairs, stored as `{category: [value]}`
const PREFERENCE_TEMPLATES: &[(&str, &str)] = &[
    ("dietary_restrictions", "No Fish"),
    ("dietary_restrictions", "Vegan"),
    ("dietary_restrictions", "Vegetarian"),
    ("allergies", "Nuts"),
    ("allergies", "Dairy"),
    ("preferences", "Spicy"),
];

fn preferences<R: Rng + ?Sized>(rng: &mut R) -> Option<Preferences> {
    if !rng.random_bool(PREFERENCES_PROBABILITY) {
        return None;
    }
    let (category, value) = PREFERENCE_TEMPLATES.choose(rng)?;

    let mut preferences = Preferences::new();
    preferences.insert(category.to_string(), serde_json::json!([value]));
    Some(preferences)
}

/// Synthesize a subscription for a random user; `None` if there are no users
pub fn build_subscription<R: Rng + ?Sized>(
    rng: &mut R,
    users: &[User],
    statuses: &WeightedSampler<'_, SubscriptionStatus>,
    now: DateTime<Utc>,
) -> Option<NewSubscription> {
    let user = users.choose(rng)?;
    let status = *statuses.draw(rng);
    let preferences = preferences(rng);
    let started_at = now - Duration::days(rng.random_range(0..=MAX_BACKDATE_DAYS));

    Some(NewSubscription {
        user_id: user.id,
        status,
        preferences,
        started_at,
    })
}

pub struct SubscriptionGenerator {
    users: Arc<dyn UserRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    settings: Arc<SettingsStore<SubscriptionGenerationSettings>>,
    config: GeneratorConfig,
}

impl SubscriptionGenerator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        settings: Arc<SettingsStore<SubscriptionGenerationSettings>>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            users,
            subscriptions,
            settings,
            config,
        }
    }
}

#[async_trait]
impl Generator for SubscriptionGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Subscription
    }

    async fn generate(&self) -> anyhow::Result<TickOutcome> {
        if !is_active(&self.config) {
            return Ok(TickOutcome::Disabled);
        }

        let users = self.users.list_all(PREREQUISITE_LIMIT).await?;
        if users.is_empty() {
            return Ok(TickOutcome::Skipped {
                reason: "no users found",
            });
        }

        let settings = self.settings.get();
        let batch: Vec<NewSubscription> = {
            let statuses = WeightedSampler::new(&SubscriptionStatus::ALL, &settings.status_weights)?;
            let mut rng = rand::rng();
            let now = Utc::now();
            (0..self.config.count)
                .filter_map(|_| build_subscription(&mut rng, &users, &statuses, now))
                .collect()
        };
        let requested = batch.len();

        let mut created = 0;
        for subscription in batch {
            if record_created(self.kind(), self.subscriptions.create(subscription).await) {
                created += 1;
            }
        }

        Ok(TickOutcome::Completed { requested, created })
    }
}
