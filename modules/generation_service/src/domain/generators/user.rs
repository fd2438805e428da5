use super::{is_active, pick, record_created, Generator, TickOutcome};
use crate::config::GeneratorConfig;
use crate::contract::{Gender, GeneratorKind, NewUser, UserGenerationSettings};
use crate::domain::repository::UserRepository;
use crate::domain::sampler::WeightedSampler;
use crate::domain::settings::SettingsStore;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;

const MALE_FIRST_NAMES: &[&str] = &[
    "James", "Robert", "Michael", "William", "David", "Daniel", "Thomas", "Matthew", "Anthony",
    "Andrew", "Joshua", "Kevin", "Brian", "Ryan", "Jacob", "Nathan", "Samuel", "Lucas",
];

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Mary", "Jennifer", "Linda", "Elizabeth", "Susan", "Jessica", "Sarah", "Karen", "Emily",
    "Michelle", "Amanda", "Melissa", "Laura", "Rachel", "Olivia", "Sophia", "Hannah", "Grace",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Wilson", "Anderson", "Taylor", "Thomas", "Moore", "Jackson", "Martin", "Lee",
    "Thompson", "White", "Harris", "Clark", "Lewis", "Walker",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

const TIMEZONES: &[&str] = &[
    "America/New_York",
    "America/Chicago",
    "America/Denver",
    "America/Los_Angeles",
    "America/Toronto",
    "Europe/London",
    "Europe/Berlin",
    "Europe/Madrid",
    "Asia/Tokyo",
    "Asia/Singapore",
    "Australia/Sydney",
    "Pacific/Auckland",
];

/// Synthesize a user whose first name fits `gender`
pub fn build_user<R: Rng + ?Sized>(rng: &mut R, gender: Gender) -> NewUser {
    let first_names = match gender {
        Gender::Male => MALE_FIRST_NAMES,
        Gender::Female => FEMALE_FIRST_NAMES,
    };
    let first_name = pick(rng, first_names);
    let last_name = pick(rng, LAST_NAMES);
    let email = format!(
        "{}.{}.{:08x}@{}",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        rng.random::<u32>(),
        pick(rng, EMAIL_DOMAINS)
    );

    NewUser {
        email,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        timezone: pick(rng, TIMEZONES).to_string(),
    }
}

pub struct UserGenerator {
    users: Arc<dyn UserRepository>,
    settings: Arc<SettingsStore<UserGenerationSettings>>,
    config: GeneratorConfig,
}

impl UserGenerator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        settings: Arc<SettingsStore<UserGenerationSettings>>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            users,
            settings,
            config,
        }
    }
}

#[async_trait]
impl Generator for UserGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::User
    }

    async fn generate(&self) -> anyhow::Result<TickOutcome> {
        if !is_active(&self.config) {
            return Ok(TickOutcome::Disabled);
        }

        let settings = self.settings.get();
        let weights = [settings.male_weight, settings.female_weight()];
        let batch: Vec<NewUser> = {
            let sampler = WeightedSampler::new(&Gender::ALL, &weights)?;
            let mut rng = rand::rng();
            (0..self.config.count)
                .map(|_| {
                    let gender = *sampler.draw(&mut rng);
                    build_user(&mut rng, gender)
                })
                .collect()
        };

        let requested = batch.len();
        tracing::debug!(requested, "generating users");

        let mut created = 0;
        for user in batch {
            if record_created(self.kind(), self.users.create(user).await) {
                created += 1;
            }
        }

        Ok(TickOutcome::Completed { requested, created })
    }
}
