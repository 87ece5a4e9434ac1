use super::transform::{Transform, TransformTheory};
use crate::error::Result;
use crate::muse::{Muse, MuseFactory};
use crate::theory::{abstain_all, Prediction, Theory};
use crate::value::{flags, Example, Input};
use std::collections::BTreeSet;
use tracing::debug;

/// Projects one key out of a mapping.
#[derive(Debug, Clone)]
pub struct FieldSelect {
    key: String,
}

impl FieldSelect {
    /// Selects `key`.
    pub fn new(key: impl Into<String>) -> Self {
        FieldSelect { key: key.into() }
    }

    /// The selected key.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Transform for FieldSelect {
    fn name(&self) -> String {
        format!("field:{}", self.key)
    }

    fn relevant(&self, input: &Input) -> bool {
        input.value.is_map()
    }

    fn apply(&self, input: &Input) -> Result<Option<Input>> {
        Ok(input
            .value
            .as_map()
            .and_then(|map| map.get(&self.key))
            .map(|value| Input {
                value: value.clone(),
                context: input.context.with(flags::FIELD_SELECTED),
            }))
    }
}

/// Decomposes mapping inputs into one projection theory per key.
///
/// Keys are collected over the whole lifetime of the theory; each one gets a single
/// [`FieldSelect`] projection in an inner ensemble, which then picks the field that explains the
/// outputs best. Values that were already selected out of a mapping are not decomposed again.
pub struct FieldTheory {
    factory: MuseFactory,
    fields: BTreeSet<String>,
    inner: Muse,
}

impl FieldTheory {
    /// A theory that has seen no keys yet.
    pub fn new(factory: MuseFactory) -> Self {
        let inner = Muse::new(factory.config());
        FieldTheory {
            factory,
            fields: BTreeSet::new(),
            inner,
        }
    }

    /// Keys seen so far, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|s| s.as_str())
    }

    fn discover(&mut self, examples: &[Example]) {
        for example in examples {
            if example.input.context.has(flags::FIELD_SELECTED) {
                continue;
            }
            let map = match example.input.value.as_map() {
                Some(map) => map,
                None => continue,
            };
            for key in map.keys() {
                if self.fields.insert(key.clone()) {
                    debug!(field = %key, "field discovered");
                    self.inner.add_theory(Box::new(TransformTheory::new(
                        FieldSelect::new(key.as_str()),
                        self.factory.clone(),
                    )));
                }
            }
        }
    }
}

impl Theory for FieldTheory {
    fn name(&self) -> String {
        String::from("fields")
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn train(&mut self, examples: &[Example]) -> Result<()> {
        self.discover(examples);
        if self.inner.is_empty() {
            return Ok(());
        }
        self.inner.train(examples)
    }

    fn leak(&mut self, examples: &[Example], validation: &[Example]) -> Result<bool> {
        self.discover(examples);
        self.discover(validation);
        self.inner.leak(examples, validation)
    }

    fn predict(&self, inputs: &[Input]) -> Result<Vec<Prediction>> {
        if self.inner.is_empty() {
            return Ok(abstain_all(inputs));
        }
        self.inner.predict(inputs)
    }
}
