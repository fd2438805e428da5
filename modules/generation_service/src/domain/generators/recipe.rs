use super::{is_active, pick, record_created, Generator, TickOutcome};
use crate::config::GeneratorConfig;
use crate::contract::{GeneratorKind, NewRecipe};
use crate::domain::repository::RecipeRepository;
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;

const DESCRIPTION_PROBABILITY: f64 = 0.7;
const IMAGE_PROBABILITY: f64 = 0.6;
const PRICE_PROBABILITY: f64 = 0.9;
const PREPARATION_TIME_PROBABILITY: f64 = 0.8;
const SERVINGS_PROBABILITY: f64 = 0.8;

const RECIPE_TAGS: &[&str] = &[
    "Keto",
    "Vegetarian",
    "Vegan",
    "Gluten-Free",
    "Dairy-Free",
    "Family-Friendly",
    "Quick",
    "Comfort Food",
    "Healthy",
    "Low-Carb",
    "High-Protein",
    "Mediterranean",
    "Asian",
    "Italian",
    "Mexican",
    "Spicy",
    "Kid-Friendly",
    "Date Night",
    "Meal Prep",
    "Pescatarian",
];

const PROTEINS: &[&str] = &["Chicken", "Salmon", "Beef", "Turkey", "Pork", "Tofu", "Shrimp", "Cod"];
const CUISINES: &[&str] = &[
    "Thai", "Italian", "Mexican", "Mediterranean", "Asian", "Indian", "French", "American",
];
const COOKING_METHODS: &[&str] = &["Teriyaki", "Herb-Crusted", "Balsamic", "Lemon", "Garlic", "Spicy"];
const SIDES: &[&str] = &["Rice", "Quinoa", "Pasta", "Potatoes", "Vegetables", "Salad", "Couscous"];
const DISH_TYPES: &[&str] = &["Stir-Fry", "Skillet", "Casserole", "Wrap", "Pasta", "Bowl", "Tacos"];
const FLAVORS: &[&str] = &["Honey", "Sesame", "Cilantro", "Rosemary", "Basil", "Ginger"];
const BASES: &[&str] = &["Pasta", "Rice Bowl", "Quinoa Bowl", "Noodles", "Salad"];
const STYLES: &[&str] = &["Classic", "Herbed", "Spiced", "Marinated", "Glazed"];
const ACCOMPANIMENTS: &[&str] = &[
    "Asparagus",
    "Broccoli",
    "Green Beans",
    "Sweet Potatoes",
    "Brussels Sprouts",
];

const DESCRIPTION_SENTENCES: &[&str] = &[
    "A weeknight favourite that comes together in one pan.",
    "Bright, fresh flavours balanced with a little heat.",
    "Hearty enough for a cold evening and light enough for summer.",
    "Every ingredient arrives pre-portioned, so there is nothing to measure.",
    "A crowd-pleaser the whole family can help cook.",
    "Finished with a quick sauce made from pantry staples.",
    "Packed with vegetables and plenty of protein.",
    "Restaurant-style plating without the restaurant price.",
];

/// Number of name templates; see [`recipe_name`]
const NAME_TEMPLATES: u32 = 8;

fn recipe_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let protein = pick(rng, PROTEINS);
    match rng.random_range(0..NAME_TEMPLATES) {
        0 => format!("{protein} {} Bowl", pick(rng, CUISINES)),
        1 => format!("{protein} {} with {}", pick(rng, COOKING_METHODS), pick(rng, SIDES)),
        2 => format!("{} {protein} {}", pick(rng, CUISINES), pick(rng, DISH_TYPES)),
        3 => format!("{} {protein} {}", pick(rng, FLAVORS), pick(rng, BASES)),
        4 => format!("{protein} {} {}", pick(rng, STYLES), pick(rng, CUISINES)),
        5 => format!("Grilled {protein} {}", pick(rng, SIDES)),
        6 => format!("Pan-Seared {protein} {}", pick(rng, ACCOMPANIMENTS)),
        _ => format!("{} {protein} Skillet", pick(rng, CUISINES)),
    }
}

fn recipe_description<R: Rng + ?Sized>(rng: &mut R) -> String {
    DESCRIPTION_SENTENCES
        .choose_multiple(rng, 2)
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Synthesize a recipe from the name templates and tag vocabulary
pub fn build_recipe<R: Rng + ?Sized>(rng: &mut R) -> NewRecipe {
    let name = recipe_name(rng);
    let description = rng
        .random_bool(DESCRIPTION_PROBABILITY)
        .then(|| recipe_description(rng));
    let calories = rng.random_range(300..=800);

    let tag_count = rng.random_range(1..=4);
    let tags = RECIPE_TAGS
        .choose_multiple(rng, tag_count)
        .map(|tag| tag.to_string())
        .collect();

    let price = rng
        .random_bool(PRICE_PROBABILITY)
        .then(|| Decimal::new(rng.random_range(1599..=3499), 2));
    let preparation_time = rng
        .random_bool(PREPARATION_TIME_PROBABILITY)
        .then(|| rng.random_range(20..=60));
    let servings = rng
        .random_bool(SERVINGS_PROBABILITY)
        .then(|| rng.random_range(2..=6));
    let image_url = rng
        .random_bool(IMAGE_PROBABILITY)
        .then(|| format!("https://picsum.photos/seed/{:08x}/640/480", rng.random::<u32>()));

    NewRecipe {
        name,
        description,
        calories,
        tags: Some(tags),
        price,
        preparation_time,
        servings,
        image_url,
    }
}

pub struct RecipeGenerator {
    recipes: Arc<dyn RecipeRepository>,
    config: GeneratorConfig,
}

impl RecipeGenerator {
    pub fn new(recipes: Arc<dyn RecipeRepository>, config: GeneratorConfig) -> Self {
        Self { recipes, config }
    }
}

#[async_trait]
impl Generator for RecipeGenerator {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Recipe
    }

    async fn generate(&self) -> anyhow::Result<TickOutcome> {
        if !is_active(&self.config) {
            return Ok(TickOutcome::Disabled);
        }

        let batch: Vec<NewRecipe> = {
            let mut rng = rand::rng();
            (0..self.config.count).map(|_| build_recipe(&mut rng)).collect()
        };
        let requested = batch.len();

        let mut created = 0;
        for recipe in batch {
            if record_created(self.kind(), self.recipes.create(recipe).await) {
                created += 1;
            }
        }

        Ok(TickOutcome::Completed { requested, created })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_recipe_fields_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let min_price = Decimal::new(1599, 2);
        let max_price = Decimal::new(3499, 2);

        for _ in 0..200 {
            let recipe = build_recipe(&mut rng);

            assert!(!recipe.name.is_empty());
            assert!((300..=800).contains(&recipe.calories));
            if let Some(price) = recipe.price {
                assert!(price >= min_price && price <= max_price, "price {price}");
            }
            if let Some(minutes) = recipe.preparation_time {
                assert!((20..=60).contains(&minutes));
            }
            if let Some(servings) = recipe.servings {
                assert!((2..=6).contains(&servings));
            }
        }
    }

    #[test]
    fn test_tags_are_distinct_and_known() {
        let mut rng = StdRng::seed_from_u64(12);

        for _ in 0..200 {
            let tags = build_recipe(&mut rng).tags.unwrap();
            assert!((1..=4).contains(&tags.len()));

            let unique: HashSet<_> = tags.iter().collect();
            assert_eq!(unique.len(), tags.len(), "duplicate tag in {tags:?}");
            assert!(tags.iter().all(|t| RECIPE_TAGS.contains(&t.as_str())));
        }
    }

    #[test]
    fn test_optional_fields_are_sometimes_absent() {
        let mut rng = StdRng::seed_from_u64(13);
        let recipes: Vec<_> = (0..500).map(|_| build_recipe(&mut rng)).collect();

        assert!(recipes.iter().any(|r| r.description.is_none()));
        assert!(recipes.iter().any(|r| r.description.is_some()));
        assert!(recipes.iter().any(|r| r.image_url.is_none()));
        assert!(recipes.iter().any(|r| r.price.is_none()));
    }
}
