use super::{is_active, pick, Generator, TickOutcome, PREREQUISITE_LIMIT};
use crate::config::GeneratorConfig;
use crate::contract::{
    DeliveryGenerationSettings, DeliveryStatus, GeneratorKind, NewDelivery, Order,
};
use crate::domain::repository::{DeliveryRepository, OrderRepository, StoreError};
use crate::domain::sampler::WeightedSampler;
use crate::domain::settings::SettingsStore;
use async_trait::async_trait;
use chrono::Duration;
use rand::seq::IndexedRandom;
use rand::Rng;
use std::sync::Arc;

const TRACKING_PROBABILITY: f64 = 0.7;
const NOTES_PROBABILITY: f64 = 0.3;

const DELIVERY_NOTES: &[&str] = &[
    "Left at front door",
    "Left with neighbor",
    "Delivered to mailbox",
    "Customer complaint",
    "Package damaged",
];

/// Synthesize the delivery of `order`. The actual arrival depends on the
/// drawn status: delivered within a day of the expected date, delayed by
/// one to three days, absent otherwise.
pub fn build_delivery<R: Rng + ?Sized>(
    rng: &mut R,
    order: &Order,
    statuses: &WeightedSampler<'_, DeliveryStatus>,
) -> NewDelivery {
    let status = *statuses.draw(rng);
    let expected_delivery_date = order.order_date + Duration::days(rng.random_range(2..=5));
    let actual_delivery_date = match status {
        DeliveryStatus::Delivered => {
            Some(expected_delivery_date + Duration::days(rng.random_range(-1..=1)))
        }
        DeliveryStatus::Delayed => {
            Some(expected_delivery_date + Duration::days(rng.random_range(1..=3)))
        }
        DeliveryStatus::Failed | DeliveryStatus::InTransit => None,
    };

    let tracking_number = rng
        .random_bool(TRACKING_PROBABILITY)
        .then(|| format!("TRACK{}", rng.random_range(100_000..=999_999)));
    let notes = rng
        .random_bool(NOTES_PROBABILITY)
        .then(|| pick(rng, DELIVERY_NOTES).to_string());

    NewDelivery {
        order_id: order.id,
        status,
        expected_delivery_date,
        actual_delivery_date,
        tracking_number,
        notes,
    }
}

pub struct DeliveryGenerator {
    orders: Arc<dyn OrderRepository>,
    deliveries: Arc<dyn DeliveryRepository>,
    settings: Arc<SettingsStore<DeliveryGenerationSettings>>,
    config: GeneratorConfig,
}

impl DeliveryGenerator {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        deliveries: Arc<dyn DeliveryRepository>,
        settings: Arc<SettingsStore<DeliveryGenerationSettings>>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            orders,
            deliveries,
            settings,
            config,
        }
    }

    /// Create one delivery unless its order already has one. Returns whether
    /// a delivery was created.
    async fn deliver(&self, delivery: NewDelivery) -> bool {
        let order_id = delivery.order_id;
        match self.deliveries.find_by_order(order_id).await {
            Ok(Some(_)) => {
                tracing::debug!(%order_id, "order already has a delivery, skipped");
                return false;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(%order_id, error = %e, "failed to check existing delivery");
                return false;
            }
        }

        match self.deliveries.create(delivery).await {
            Ok(_) => true,
            Err(StoreError::ConstraintViolation(reason)) => {
                tracing::debug!(%order_id, reason = %reason, "delivery created concurrently, skipped");
                false
            }
            Err(e) => {
                tracing::warn!(kind = %self.kind(), error = %e, "failed to create record");
                false
            }
        }
    }
}

#[async_trait]
impl Generator for DeliveryGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Delivery
    }

    async fn generate(&self) -> anyhow::Result<TickOutcome> {
        if !is_active(&self.config) {
            return Ok(TickOutcome::Disabled);
        }

        let undelivered = self.orders.list_without_delivery(PREREQUISITE_LIMIT).await?;
        if undelivered.is_empty() {
            let reason = if self.orders.list_all(1).await?.is_empty() {
                "no orders found"
            } else {
                "all orders already have deliveries"
            };
            return Ok(TickOutcome::Skipped { reason });
        }

        let settings = self.settings.get();
        let batch: Vec<NewDelivery> = {
            let statuses = WeightedSampler::new(&DeliveryStatus::ALL, &settings.status_weights)?;
            let mut rng = rand::rng();
            let amount = (self.config.count as usize).min(undelivered.len());
            let selected: Vec<&Order> = undelivered.choose_multiple(&mut rng, amount).collect();
            selected
                .into_iter()
                .map(|order| build_delivery(&mut rng, order, &statuses))
                .collect()
        };
        let requested = batch.len();

        let mut created = 0;
        for delivery in batch {
            if self.deliver(delivery).await {
                created += 1;
            }
        }

        Ok(TickOutcome::Completed { requested, created })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{OrderRecipe, OrderStatus};
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn order() -> Order {
        let now = Utc::now();
        Order {
            id: Uuid::new_v4(),
            subscription_id: Uuid::new_v4(),
            recipes: vec![OrderRecipe {
                id: Uuid::new_v4(),
                name: "Thai Chicken Bowl".to_string(),
            }],
            total_amount: Decimal::new(2000, 2),
            status: OrderStatus::Shipped,
            order_date: now,
            delivery_date: now + Duration::days(7),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn only(status: DeliveryStatus) -> WeightedSampler<'static, DeliveryStatus> {
        let weights = DeliveryStatus::ALL.map(|s| if s == status { 1.0 } else { 0.0 });
        WeightedSampler::new(&DeliveryStatus::ALL, &weights).unwrap()
    }

    #[test]
    fn test_expected_date_follows_order_date() {
        let mut rng = StdRng::seed_from_u64(21);
        let order = order();
        let sampler = only(DeliveryStatus::InTransit);

        for _ in 0..100 {
            let delivery = build_delivery(&mut rng, &order, &sampler);
            let lead = delivery.expected_delivery_date - order.order_date;

            assert_eq!(delivery.order_id, order.id);
            assert!(lead >= Duration::days(2) && lead <= Duration::days(5));
            assert!(delivery.actual_delivery_date.is_none());
        }
    }

    #[test]
    fn test_actual_date_depends_on_status() {
        let mut rng = StdRng::seed_from_u64(22);
        let order = order();

        let delivered = only(DeliveryStatus::Delivered);
        let delayed = only(DeliveryStatus::Delayed);
        let failed = only(DeliveryStatus::Failed);

        for _ in 0..100 {
            let d = build_delivery(&mut rng, &order, &delivered);
            let offset = d.actual_delivery_date.unwrap() - d.expected_delivery_date;
            assert!(offset >= Duration::days(-1) && offset <= Duration::days(1));

            let d = build_delivery(&mut rng, &order, &delayed);
            let offset = d.actual_delivery_date.unwrap() - d.expected_delivery_date;
            assert!(offset >= Duration::days(1) && offset <= Duration::days(3));

            let d = build_delivery(&mut rng, &order, &failed);
            assert!(d.actual_delivery_date.is_none());
        }
    }

    #[test]
    fn test_tracking_number_format() {
        let mut rng = StdRng::seed_from_u64(23);
        let order = order();
        let sampler = only(DeliveryStatus::Delivered);

        let tracking: Vec<String> = (0..100)
            .filter_map(|_| build_delivery(&mut rng, &order, &sampler).tracking_number)
            .collect();

        assert!(!tracking.is_empty());
        for code in tracking {
            let digits = code.strip_prefix("TRACK").unwrap();
            assert_eq!(digits.len(), 6);
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
