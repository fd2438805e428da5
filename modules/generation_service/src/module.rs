//! Module declaration and lifecycle implementation

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::{GenerationSettingsApi, GeneratorKind};
use crate::domain::generators::build_jobs;
use crate::domain::{GeneratorSettings, Repositories, Scheduler, Service};
use anyhow::Result;
use parking_lot::Mutex;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Synthetic data generation module
pub struct GenerationModule {
    config: Config,
    repositories: Repositories,
    settings: GeneratorSettings,
    scheduler: Arc<Scheduler>,
    service: Arc<Service>,
    jobs_registered: Mutex<bool>,
}

impl GenerationModule {
    /// Build the module over any repository implementation
    pub fn new(config: Config, repositories: Repositories) -> Result<Self> {
        config.validate()?;

        let settings = GeneratorSettings::from_config(&config);
        let scheduler = Arc::new(Scheduler::new(config.scheduler_enabled));
        let service = Arc::new(Service::new(settings.clone(), scheduler.clone()));

        tracing::info!(
            scheduler_enabled = config.scheduler_enabled,
            "Generation service initialized"
        );
        Ok(Self {
            config,
            repositories,
            settings,
            scheduler,
            service,
            jobs_registered: Mutex::new(false),
        })
    }

    /// Build the module over the sea-orm repositories
    pub fn with_database(config: Config, conn: DatabaseConnection) -> Result<Self> {
        let repositories = crate::infra::storage::repositories::sea_orm_repositories(Arc::new(conn));
        Self::new(config, repositories)
    }

    /// Run the module's database migrations
    pub async fn migrate(conn: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(conn, None).await?;
        tracing::info!("Generation service migrations completed");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn scheduler(&self) -> Arc<Scheduler> {
        self.scheduler.clone()
    }

    /// Settings façade handle for the HTTP layer
    pub fn settings_api(&self) -> Arc<dyn GenerationSettingsApi> {
        Arc::new(NativeClient::new(self.service.clone()))
    }

    /// Register the generator jobs (first call only) and start ticking.
    /// Returns `false` if the scheduler is disabled or already running.
    pub fn start(&self) -> Result<bool> {
        self.register_jobs()?;
        Ok(self.scheduler.start())
    }

    /// Stop ticking and wait for in-flight generator runs
    pub async fn stop(&self) {
        self.scheduler.stop().await;
    }

    /// Serve entry point: run until `cancel` fires, then drain
    pub async fn serve(self: Arc<Self>, cancel: CancellationToken) -> Result<()> {
        self.start()?;
        cancel.cancelled().await;
        tracing::info!("Generation service shutting down");
        self.stop().await;
        Ok(())
    }

    fn register_jobs(&self) -> Result<()> {
        let mut registered = self.jobs_registered.lock();
        if *registered {
            return Ok(());
        }

        for (kind, job) in build_jobs(&self.config, &self.settings, &self.repositories) {
            self.scheduler
                .register(kind.job_name(), self.current_interval(kind), job)?;
        }
        *registered = true;

        // An interval updated while the jobs were being registered found no
        // job to reschedule.
        for kind in GeneratorKind::ALL {
            let interval = self.current_interval(kind);
            if self.scheduler.interval_of(kind.job_name()) != Some(interval) {
                self.scheduler.reschedule(kind.job_name(), interval)?;
            }
        }
        Ok(())
    }

    fn current_interval(&self, kind: GeneratorKind) -> Duration {
        Duration::from_secs(self.service.get_settings(kind).interval_secs())
    }
}
