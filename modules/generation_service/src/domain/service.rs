//! Domain service - settings façade over the stores and the scheduler

use crate::contract::{
    AllGenerationSettings, AllSettingsUpdate, GenerationError, GenerationSettings, GeneratorKind,
    SettingsUpdate,
};
use super::scheduler::{Scheduler, SchedulerError};
use super::settings::GeneratorSettings;
use std::sync::Arc;
use std::time::Duration;

/// Domain service for reading and tuning generator settings
pub struct Service {
    settings: GeneratorSettings,
    scheduler: Arc<Scheduler>,
}

impl Service {
    pub fn new(settings: GeneratorSettings, scheduler: Arc<Scheduler>) -> Self {
        Self {
            settings,
            scheduler,
        }
    }

    // ===== Reads =====

    pub fn get_settings(&self, kind: GeneratorKind) -> GenerationSettings {
        match kind {
            GeneratorKind::User => GenerationSettings::User(self.settings.user.get()),
            GeneratorKind::Recipe => GenerationSettings::Recipe(self.settings.recipe.get()),
            GeneratorKind::Subscription => {
                GenerationSettings::Subscription(self.settings.subscription.get())
            }
            GeneratorKind::Order => GenerationSettings::Order(self.settings.order.get()),
            GeneratorKind::Delivery => GenerationSettings::Delivery(self.settings.delivery.get()),
        }
    }

    pub fn get_all_settings(&self) -> AllGenerationSettings {
        self.settings.snapshot()
    }

    // ===== Updates =====

    /// Validate and apply one kind's partial update. Nothing changes on error.
    pub fn update_settings(
        &self,
        update: SettingsUpdate,
    ) -> Result<GenerationSettings, GenerationError> {
        let kind = update.kind();
        let reschedule = |secs: u64| self.reschedule(kind, secs);

        let updated = match &update {
            SettingsUpdate::User(u) => self
                .settings
                .user
                .update(u, reschedule)
                .map(GenerationSettings::User),
            SettingsUpdate::Recipe(u) => self
                .settings
                .recipe
                .update(u, reschedule)
                .map(GenerationSettings::Recipe),
            SettingsUpdate::Subscription(u) => self
                .settings
                .subscription
                .update(u, reschedule)
                .map(GenerationSettings::Subscription),
            SettingsUpdate::Order(u) => self
                .settings
                .order
                .update(u, reschedule)
                .map(GenerationSettings::Order),
            SettingsUpdate::Delivery(u) => self
                .settings
                .delivery
                .update(u, reschedule)
                .map(GenerationSettings::Delivery),
        };

        updated.map_err(|message| {
            tracing::debug!(%kind, %message, "settings update rejected");
            GenerationError::Validation { kind, message }
        })
    }

    /// Apply every present kind independently. Valid kinds are committed even
    /// when others fail; the failures come back as one aggregated error.
    pub fn update_all_settings(
        &self,
        update: AllSettingsUpdate,
    ) -> Result<AllGenerationSettings, GenerationError> {
        let errors: Vec<String> = update
            .into_updates()
            .into_iter()
            .filter_map(|u| self.update_settings(u).err())
            .map(|e| e.to_string())
            .collect();

        if errors.is_empty() {
            Ok(self.get_all_settings())
        } else {
            Err(GenerationError::InvalidSettings { errors })
        }
    }

    fn reschedule(&self, kind: GeneratorKind, interval_secs: u64) {
        match self
            .scheduler
            .reschedule(kind.job_name(), Duration::from_secs(interval_secs))
        {
            Ok(()) => {}
            // Jobs are registered on module start; the stored interval is
            // picked up then.
            Err(SchedulerError::JobNotFound(job)) => {
                tracing::debug!(%job, interval_secs, "job not registered yet, interval stored only");
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "failed to reschedule generator");
            }
        }
    }
}
