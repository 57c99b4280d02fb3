use rand::{
    distributions::{Distribution, WeightedIndex},
    seq::SliceRandom,
    Rng,
};

use crate::{
    errors::Error,
    prompt::{
        category::{Category, CategoryWeights},
        template::{join_natural, SlotValues, Template},
        vocabulary::Vocabulary,
    },
    Result,
};

/// Upper bound on actors in a single scene.
pub const MAX_ACTORS: usize = 4;

const INJURED_TEMPLATE: &str =
    "{camera} of {actors}, {action} in {environment} {time_of_day}, {weather}.";
const UNINJURED_TEMPLATE: &str =
    "{camera} of {actors}, {action} in {environment} {time_of_day}, {weather}. No one is hurt.";
const MIXED_TEMPLATE: &str = "{camera} of {actors}, {action} in {environment} {time_of_day}, \
{weather}. {injured_count} of {actor_count} are wounded.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedPrompt {
    pub category: Category,
    pub text: String,
    pub actor_count: usize,
    pub injured_count: usize,
}

/// Weighted random scene-prompt generator.
///
/// Construction validates vocabularies, weights and templates; generation is then
/// infallible and only consumes the random source.
#[derive(Clone, Debug)]
pub struct PromptGenerator {
    vocab: Vocabulary,
    weights: CategoryWeights,
    categories: WeightedIndex<u32>,
    injured: Template,
    uninjured: Template,
    mixed: Template,
}

impl PromptGenerator {
    pub fn new(vocab: Vocabulary, weights: CategoryWeights) -> Result<Self> {
        vocab.validate()?;
        weights.validate()?;
        let categories = WeightedIndex::new(weights.as_array())
            .map_err(|e| Error::Config(format!("invalid prompt category weights: {e}")))?;

        Ok(Self {
            vocab,
            weights,
            categories,
            injured: Template::parse(INJURED_TEMPLATE)?,
            uninjured: Template::parse(UNINJURED_TEMPLATE)?,
            mixed: Template::parse(MIXED_TEMPLATE)?,
        })
    }

    pub fn weights(&self) -> CategoryWeights {
        self.weights
    }

    pub fn generate(&self) -> GeneratedPrompt {
        self.generate_with(&mut rand::thread_rng())
    }

    pub fn generate_with<R: Rng>(&self, rng: &mut R) -> GeneratedPrompt {
        let category = Category::ALL[self.categories.sample(rng)];
        self.generate_category(category, rng)
    }

    pub fn generate_category<R: Rng>(&self, category: Category, rng: &mut R) -> GeneratedPrompt {
        // Mixed always has at least one injured and one unhurt actor.
        let (actor_count, injured_count) = match category {
            Category::Injured => {
                let n = rng.gen_range(1..=MAX_ACTORS);
                (n, n)
            }
            Category::Uninjured => (rng.gen_range(1..=MAX_ACTORS), 0),
            Category::Mixed => {
                let n = rng.gen_range(2..=MAX_ACTORS);
                (n, rng.gen_range(1..n))
            }
        };

        let soldiers = self.pick_soldiers(actor_count, rng);
        let mut clauses = Vec::with_capacity(actor_count);
        for (i, soldier) in soldiers.into_iter().enumerate() {
            let clause = if i < injured_count {
                format!("{soldier} with {}", pick(self.vocab.injuries, rng))
            } else if category == Category::Mixed {
                format!("{soldier} without a scratch")
            } else {
                soldier.to_string()
            };
            clauses.push(clause);
        }
        if category == Category::Mixed {
            clauses.shuffle(rng);
        }

        let values = SlotValues {
            camera: pick(self.vocab.camera, rng).to_string(),
            actors: join_natural(&clauses),
            action: pick(self.vocab.actions, rng).to_string(),
            environment: pick(self.vocab.environments, rng).to_string(),
            time_of_day: pick(self.vocab.times_of_day, rng).to_string(),
            weather: pick(self.vocab.weather, rng).to_string(),
            injured_count,
            actor_count,
        };

        let template = match category {
            Category::Injured => &self.injured,
            Category::Uninjured => &self.uninjured,
            Category::Mixed => &self.mixed,
        };

        GeneratedPrompt {
            category,
            text: template.render(&values),
            actor_count,
            injured_count,
        }
    }

    /// Distinct soldiers while the list allows it, repeats after that.
    fn pick_soldiers<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = self
            .vocab
            .soldiers
            .choose_multiple(rng, n)
            .copied()
            .collect();
        while out.len() < n {
            out.push(pick(self.vocab.soldiers, rng));
        }
        out.shuffle(rng);
        out
    }
}

/// Lists are validated non-empty in `PromptGenerator::new`.
fn pick<R: Rng>(list: &'static [&'static str], rng: &mut R) -> &'static str {
    list[rng.gen_range(0..list.len())]
}
