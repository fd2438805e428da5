//! Native client trait for the generation settings façade
//!
//! This is the surface the HTTP layer (or any other in-process caller) uses
//! to read and tune generator settings. Calls are plain in-process method
//! calls on a shared trait object.

use super::{
    error::GenerationError,
    settings::{AllGenerationSettings, AllSettingsUpdate, GenerationSettings, GeneratorKind, SettingsUpdate},
};

/// Generation settings API for inter-module communication
pub trait GenerationSettingsApi: Send + Sync {
    /// Current settings of one generator kind
    fn get_settings(&self, kind: GeneratorKind) -> GenerationSettings;

    /// Current settings of every generator kind
    fn get_all_settings(&self) -> AllGenerationSettings;

    /// Apply a partial update to one kind; all-or-nothing for that kind
    fn update_settings(&self, update: SettingsUpdate) -> Result<GenerationSettings, GenerationError>;

    /// Apply partial updates to several kinds, reporting every rejected kind
    fn update_all_settings(
        &self,
        update: AllSettingsUpdate,
    ) -> Result<AllGenerationSettings, GenerationError>;
}
