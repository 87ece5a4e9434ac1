use crate::error::Result;
use crate::theory::{Prediction, Theory};
use crate::value::{Example, Input, Output};

/// A candidate theory together with the evidence collected about it.
pub struct ScoredTheory {
    theory: Box<dyn Theory>,
    hits: usize,
    misses: usize,
}

impl ScoredTheory {
    /// Wraps a theory with no evidence yet.
    pub fn new(theory: Box<dyn Theory>) -> Self {
        ScoredTheory {
            theory,
            hits: 0,
            misses: 0,
        }
    }

    /// The wrapped theory.
    pub fn theory(&self) -> &dyn Theory {
        self.theory.as_ref()
    }

    /// The wrapped theory, mutably.
    pub fn theory_mut(&mut self) -> &mut dyn Theory {
        self.theory.as_mut()
    }

    /// Predictions that matched the expected output.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Predictions that did not.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Fraction of scored predictions that were right; 0 without evidence.
    pub fn score(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Records one prediction. Abstentions are not evidence either way.
    pub fn record(&mut self, prediction: &Prediction, expected: &Output) {
        if let Some(output) = prediction {
            if output.value.same_as(&expected.value) {
                self.hits += 1;
            } else {
                self.misses += 1;
            }
        }
    }

    /// Forgets all evidence.
    pub fn clear(&mut self) {
        self.hits = 0;
        self.misses = 0;
    }

    /// Refits the theory on `train`, letting it peek at `validation` if it supports leaking.
    pub(crate) fn fit(&mut self, train: &[Example], validation: &[Example]) -> Result<()> {
        self.theory.reset();
        if !self.theory.leak(train, validation)? {
            self.theory.train(train)?;
        }
        Ok(())
    }

    /// Predicts every example in one batch and records the outcomes.
    pub(crate) fn evaluate(&mut self, examples: &[Example]) -> Result<()> {
        if examples.is_empty() {
            return Ok(());
        }
        let inputs: Vec<Input> = examples.iter().map(|e| e.input.clone()).collect();
        let predictions = self.theory.predict(&inputs)?;
        for (prediction, example) in predictions.iter().zip(examples) {
            self.record(prediction, &example.output);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theories::SimpleTheory;

    #[test]
    fn score_without_evidence_is_zero() {
        let scored = ScoredTheory::new(Box::new(SimpleTheory::identity()));
        assert_eq!(scored.score(), 0.0);
    }

    #[test]
    fn abstentions_do_not_count() {
        let mut scored = ScoredTheory::new(Box::new(SimpleTheory::identity()));
        let expected = Output::new("a");
        scored.record(&None, &expected);
        assert_eq!(scored.hits() + scored.misses(), 0);
        scored.record(&Some(Output::new("a")), &expected);
        scored.record(&Some(Output::new("b")), &expected);
        scored.record(&Some(Output::new("a")), &expected);
        assert_eq!(scored.hits(), 2);
        assert_eq!(scored.misses(), 1);
        assert!((scored.score() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn evaluate_direct() {
        let mut scored = ScoredTheory::new(Box::new(SimpleTheory::upper()));
        scored
            .evaluate(&[Example::new("hi", "HI"), Example::new("yo", "yo")])
            .unwrap();
        assert_eq!(scored.score(), 0.5);
        scored.clear();
        assert_eq!(scored.score(), 0.0);
    }
}
