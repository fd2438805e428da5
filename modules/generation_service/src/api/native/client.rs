//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    AllGenerationSettings, AllSettingsUpdate, GenerationError, GenerationSettings,
    GenerationSettingsApi, GeneratorKind, SettingsUpdate,
};
use crate::domain::Service;
use std::sync::Arc;

/// Native client implementation that directly calls the domain service
///
/// This is the handle the HTTP layer receives; it never touches the
/// settings stores or the scheduler directly.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

impl GenerationSettingsApi for NativeClient {
    fn get_settings(&self, kind: GeneratorKind) -> GenerationSettings {
        self.service.get_settings(kind)
    }

    fn get_all_settings(&self) -> AllGenerationSettings {
        self.service.get_all_settings()
    }

    fn update_settings(&self, update: SettingsUpdate) -> Result<GenerationSettings, GenerationError> {
        self.service.update_settings(update)
    }

    fn update_all_settings(
        &self,
        update: AllSettingsUpdate,
    ) -> Result<AllGenerationSettings, GenerationError> {
        self.service.update_all_settings(update)
    }
}
