//! Projection theories.
//!
//! A [`Transform`] maps an input to a different input: a field out of a mapping, or an enriched
//! record fetched from an external source. [`TransformTheory`] applies it and lets a nested
//! ensemble learn from the projected inputs.

use crate::error::Result;
use crate::muse::{Muse, MuseFactory};
use crate::theory::{Prediction, Theory};
use crate::value::{Example, Input, Output};
use tracing::{debug, warn};

/// Maps inputs to projected inputs.
pub trait Transform {
    /// Identifies the transform; also the name of its theory.
    fn name(&self) -> String;

    /// Whether the transform should be attempted on `input` at all.
    fn relevant(&self, input: &Input) -> bool;

    /// Projects `input`.
    ///
    /// `Ok(None)` means the input has nothing to project and is skipped. Errors are failures of
    /// an external collaborator and abort training or prediction.
    fn apply(&self, input: &Input) -> Result<Option<Input>>;
}

/// Delegates projected inputs to a nested ensemble.
///
/// Until some example is relevant to the transform there is no nested ensemble, and inputs are
/// passed through unchanged.
pub struct TransformTheory<T: Transform> {
    transform: T,
    factory: MuseFactory,
    nested: Option<Muse>,
}

impl<T: Transform> TransformTheory<T> {
    /// A theory that stays inactive until an input is relevant to `transform`.
    pub fn new(transform: T, factory: MuseFactory) -> Self {
        TransformTheory {
            transform,
            factory,
            nested: None,
        }
    }

    /// The wrapped transform.
    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// The ensemble trained on projected examples; `None` while inactive.
    pub fn nested(&self) -> Option<&Muse> {
        self.nested.as_ref()
    }

    fn activate<'a>(&mut self, mut examples: impl Iterator<Item = &'a Example>) {
        if self.nested.is_none() && examples.any(|e| self.transform.relevant(&e.input)) {
            debug!(transform = %self.transform.name(), "transform activated");
            self.nested = Some(self.factory.spawn());
        }
    }

    fn project(&self, input: &Input) -> Result<Option<Input>> {
        if !self.transform.relevant(input) {
            return Ok(None);
        }
        self.transform.apply(input).map_err(|err| {
            warn!(transform = %self.transform.name(), %err, "transform failed");
            err
        })
    }

    fn project_examples(&self, examples: &[Example]) -> Result<Vec<Example>> {
        let mut projected = Vec::with_capacity(examples.len());
        for example in examples {
            if let Some(input) = self.project(&example.input)? {
                projected.push(Example {
                    input,
                    output: example.output.clone(),
                });
            }
        }
        Ok(projected)
    }
}

impl<T: Transform> Theory for TransformTheory<T> {
    fn name(&self) -> String {
        self.transform.name()
    }

    fn reset(&mut self) {
        if let Some(nested) = &mut self.nested {
            nested.reset();
        }
    }

    fn train(&mut self, examples: &[Example]) -> Result<()> {
        self.activate(examples.iter());
        if self.nested.is_none() {
            return Ok(());
        }
        let projected = self.project_examples(examples)?;
        match &mut self.nested {
            Some(nested) => nested.train(&projected),
            None => Ok(()),
        }
    }

    fn leak(&mut self, examples: &[Example], validation: &[Example]) -> Result<bool> {
        self.activate(examples.iter().chain(validation));
        if self.nested.is_none() {
            return Ok(true);
        }
        let projected = self.project_examples(examples)?;
        let projected_validation = self.project_examples(validation)?;
        if let Some(nested) = &mut self.nested {
            nested.leak(&projected, &projected_validation)?;
        }
        Ok(true)
    }

    fn predict(&self, inputs: &[Input]) -> Result<Vec<Prediction>> {
        let nested = match &self.nested {
            Some(nested) => nested,
            None => {
                return Ok(inputs
                    .iter()
                    .map(|i| Some(Output {
                        value: i.value.clone(),
                        context: i.context.clone(),
                    }))
                    .collect())
            }
        };
        let mut slots = Vec::with_capacity(inputs.len());
        let mut batch = Vec::new();
        for input in inputs {
            match self.project(input)? {
                Some(projected) => {
                    slots.push(Some(batch.len()));
                    batch.push(projected);
                }
                None => slots.push(None),
            }
        }
        let answers = if batch.is_empty() {
            Vec::new()
        } else {
            nested.predict(&batch)?
        };
        Ok(inputs
            .iter()
            .zip(slots)
            .map(|(input, slot)| {
                let answer = answers.get(slot?)?.as_ref()?;
                Some(Output {
                    value: answer.value.clone(),
                    context: input.context.clone(),
                })
            })
            .collect())
    }
}
