//! Structural patterns: wrappers around a residual problem.
//!
//! A [`PatternTool`] recognizes a wrapper shared by all examples (a constant suffix or prefix,
//! characters that are always dropped, surrounding whitespace that is trimmed), strips it to
//! expose the residual problem, and puts it back on predicted outputs. [`PatternTheory`] hands
//! the residual to a nested ensemble, so patterns compose: a prefix inside a suffix around a
//! case change is three nested levels.

mod affix;
mod removal;
mod trim;

pub use affix::{PrefixTool, SuffixTool};
pub use removal::RemovalTool;
pub use trim::TrimTool;

use crate::error::Result;
use crate::muse::{Muse, MuseFactory};
use crate::theory::{abstain_all, Prediction, Theory};
use crate::value::{Example, Input, Output};
use tracing::debug;

/// Outcome of deriving a structural parameter from a batch.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PatternState {
    /// No parameter fits the batch.
    NotFound,
    /// The parameter was derived, and it matches the one already held (if any).
    Found,
    /// The parameter was derived and replaces a different one.
    Changed,
}

/// Stores a freshly derived parameter, reporting whether it replaced a different one.
fn update<T: PartialEq>(held: &mut Option<T>, derived: T) -> PatternState {
    let state = match held {
        Some(previous) if *previous != derived => PatternState::Changed,
        _ => PatternState::Found,
    };
    *held = Some(derived);
    state
}

/// A strategy for recognizing and stripping one kind of wrapper.
pub trait PatternTool {
    /// Identifies the tool; also the name of its theory.
    fn name(&self) -> &'static str;

    /// Derives the structural parameter from `data`, keeping it if found.
    fn derive(&mut self, data: &[Example]) -> PatternState;

    /// Applies the wrapper to a residual output.
    fn forward(&self, output: Output) -> Output;

    /// Strips the wrapper from the input side of an example.
    fn reverse_input(&self, input: &Input) -> Input {
        input.clone()
    }

    /// Strips the wrapper from the output side of an example.
    fn reverse_output(&self, output: &Output) -> Output {
        output.clone()
    }

    /// Exposes the residual example.
    fn reverse(&self, example: &Example) -> Example {
        Example {
            input: self.reverse_input(&example.input),
            output: self.reverse_output(&example.output),
        }
    }

    /// Forgets the derived parameter.
    fn clear(&mut self);
}

/// Delegates the residual left by a [`PatternTool`] to a nested ensemble.
///
/// Once a parameter is found it persists: a later batch in which the pattern is not found leaves
/// both the parameter and the nested ensemble untouched.
pub struct PatternTheory<T: PatternTool> {
    tool: T,
    factory: MuseFactory,
    nested: Option<Muse>,
}

impl<T: PatternTool> PatternTheory<T> {
    /// A theory that abstains until `tool` derives a parameter.
    pub fn new(tool: T, factory: MuseFactory) -> Self {
        PatternTheory {
            tool,
            factory,
            nested: None,
        }
    }

    /// The wrapped tool.
    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// The ensemble trained on residuals; `None` until a parameter is found.
    pub fn nested(&self) -> Option<&Muse> {
        self.nested.as_ref()
    }

    fn residuals(&self, examples: &[Example]) -> Vec<Example> {
        examples.iter().map(|e| self.tool.reverse(e)).collect()
    }

    /// Derives the parameter; on success returns a fresh nested ensemble to fit.
    fn rederive(&mut self, data: &[Example]) -> Option<Muse> {
        match self.tool.derive(data) {
            PatternState::NotFound => None,
            state => {
                debug!(pattern = self.tool.name(), ?state, "pattern derived");
                Some(self.factory.spawn())
            }
        }
    }
}

impl<T: PatternTool> Theory for PatternTheory<T> {
    fn name(&self) -> String {
        String::from(self.tool.name())
    }

    fn reset(&mut self) {
        self.tool.clear();
        self.nested = None;
    }

    fn train(&mut self, examples: &[Example]) -> Result<()> {
        if let Some(mut nested) = self.rederive(examples) {
            nested.train(&self.residuals(examples))?;
            self.nested = Some(nested);
        }
        Ok(())
    }

    fn leak(&mut self, examples: &[Example], validation: &[Example]) -> Result<bool> {
        let union: Vec<Example> = examples.iter().chain(validation).cloned().collect();
        if let Some(mut nested) = self.rederive(&union) {
            nested.leak(&self.residuals(examples), &self.residuals(validation))?;
            self.nested = Some(nested);
        }
        Ok(true)
    }

    fn predict(&self, inputs: &[Input]) -> Result<Vec<Prediction>> {
        let nested = match &self.nested {
            Some(nested) => nested,
            None => return Ok(abstain_all(inputs)),
        };
        let residual: Vec<Input> = inputs.iter().map(|i| self.tool.reverse_input(i)).collect();
        let predictions = nested.predict(&residual)?;
        if predictions.len() != inputs.len() {
            return Ok(abstain_all(inputs));
        }
        Ok(predictions
            .into_iter()
            .map(|p| p.map(|output| self.tool.forward(output)))
            .collect())
    }
}
