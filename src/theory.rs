use crate::error::Result;
use crate::value::{Example, Input, Output};

/// The answer of a theory for a single input; `None` means the theory abstains.
pub type Prediction = Option<Output>;

/// A composable predictor that learns from examples.
///
/// A theory is constructed empty, optionally [reset](Theory::reset), trained on a batch of
/// examples, and then asked for predictions. Theories may own nested ensembles of further
/// theories.
pub trait Theory {
    /// Identifies the theory. Ensembles report the name of their best candidate.
    fn name(&self) -> String;

    /// Whether cross-validation should fit this theory before scoring it.
    ///
    /// Stateless transforms return `false`; they are scored directly against every example since
    /// there is nothing to overfit.
    fn trainable(&self) -> bool {
        true
    }

    /// Clears all state derived from training.
    fn reset(&mut self);

    /// Updates the theory from a batch of examples.
    fn train(&mut self, examples: &[Example]) -> Result<()>;

    /// Fits the theory on `examples` while allowed to look at `validation`.
    ///
    /// A theory may derive structure (never targets to fit) from the union of both batches.
    /// Returns `true` if the batches were consumed, in which case the caller must not also call
    /// [`train`](Theory::train); returns `false` if nothing was done.
    fn leak(&mut self, _examples: &[Example], _validation: &[Example]) -> Result<bool> {
        Ok(false)
    }

    /// Predicts one answer per input, in input order.
    ///
    /// Inputs the theory cannot handle yield an abstention, not an error. Errors are reserved for
    /// failures of external collaborators, such as an enrichment lookup.
    fn predict(&self, inputs: &[Input]) -> Result<Vec<Prediction>>;
}

/// Convenience for theories that answer every input the same way: abstain.
pub(crate) fn abstain_all(inputs: &[Input]) -> Vec<Prediction> {
    vec![None; inputs.len()]
}
