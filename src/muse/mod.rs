//! The cross-validated ensemble ("muse") and the factory that composes it.
//!
//! A [`Muse`] holds candidate theories in registration order. Training estimates every
//! candidate's out-of-sample accuracy by cross-validation and then fits it on the whole batch;
//! prediction asks every candidate and keeps the non-abstaining answer with the best score, the
//! earliest registered candidate winning ties.
//!
//! Structural theories hand a reduced problem to a nested ensemble of the same composition. They
//! get it from a [`MuseFactory`], which is created once at the root and cloned down the tree, so
//! that nested ensembles are built lazily and only when a theory finds something to delegate.

mod scored;
mod validation;

pub use scored::ScoredTheory;

use crate::config::{Config, Registry};
use crate::error::Result;
use crate::theories::{
    Constant, FieldTheory, FragmentTheory, Memorization, PatternTheory, PrefixTool, RemovalTool,
    SimpleTheory, SuffixTool, TrimTool,
};
use crate::theory::{Prediction, Theory};
use crate::value::{Example, Input, Output};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};
use validation::Plan;

/// A collection of scored candidate theories that answers with its best performer.
pub struct Muse {
    candidates: Vec<ScoredTheory>,
    config: Config,
    rng: StdRng,
}

impl Muse {
    /// Creates an ensemble with no candidates.
    pub fn new(config: &Config) -> Self {
        Muse {
            candidates: Vec::new(),
            config: config.clone(),
            rng: StdRng::seed_from_u64(config.seed),
        }
    }

    /// Appends a candidate; among equal scores, earlier candidates win.
    pub fn add_theory(&mut self, theory: Box<dyn Theory>) {
        self.candidates.push(ScoredTheory::new(theory));
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the ensemble has no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The candidates with their evidence, in registration order.
    pub fn candidates(&self) -> &[ScoredTheory] {
        &self.candidates
    }

    /// Name and score of every candidate, in registration order.
    pub fn ranking(&self) -> Vec<(String, f64)> {
        self.candidates
            .iter()
            .map(|c| (c.theory().name(), c.score()))
            .collect()
    }

    /// The highest-scoring candidate; the earliest one wins ties.
    pub fn best(&self) -> Option<&ScoredTheory> {
        let mut best: Option<&ScoredTheory> = None;
        for candidate in &self.candidates {
            if best.map_or(true, |b| candidate.score() > b.score()) {
                best = Some(candidate);
            }
        }
        best
    }

    fn cross_validate(
        candidate: &mut ScoredTheory,
        examples: &[Example],
        plan: Plan,
        rng: &mut StdRng,
    ) -> Result<()> {
        match plan {
            Plan::LeaveOneOut => {
                for held in 0..examples.len() {
                    let (rest, validation) = validation::hold_out(examples, held);
                    candidate.fit(&rest, &validation)?;
                    candidate.evaluate(&validation)?;
                }
            }
            Plan::KFold(k) => {
                let folds = validation::assign_folds(examples.len(), k, rng);
                for fold in 0..k {
                    let (train, validation) = validation::split_fold(examples, &folds, fold);
                    if validation.is_empty() {
                        continue;
                    }
                    candidate.fit(&train, &validation)?;
                    candidate.evaluate(&validation)?;
                }
            }
        }
        // leave the theory fitted on everything for real use
        candidate.theory_mut().reset();
        candidate.theory_mut().train(examples)
    }
}

impl Theory for Muse {
    fn name(&self) -> String {
        match self.best() {
            Some(best) => best.theory().name(),
            None => String::from("muse"),
        }
    }

    fn reset(&mut self) {
        for candidate in &mut self.candidates {
            candidate.clear();
            candidate.theory_mut().reset();
        }
        self.rng = StdRng::seed_from_u64(self.config.seed);
    }

    fn train(&mut self, examples: &[Example]) -> Result<()> {
        let plan = Plan::for_size(examples.len(), &self.config);
        trace!(examples = examples.len(), ?plan, "training ensemble");
        let Muse {
            candidates, rng, ..
        } = self;
        for candidate in candidates.iter_mut() {
            if candidate.theory().trainable() {
                Self::cross_validate(candidate, examples, plan, rng)?;
            } else {
                candidate.evaluate(examples)?;
            }
        }
        if let Some(best) = self.best() {
            debug!(
                best = %best.theory().name(),
                score = best.score(),
                examples = examples.len(),
                "ensemble trained"
            );
        }
        Ok(())
    }

    fn leak(&mut self, examples: &[Example], validation: &[Example]) -> Result<bool> {
        for candidate in &mut self.candidates {
            if candidate.theory().trainable() {
                candidate.fit(examples, validation)?;
            } else {
                candidate.evaluate(examples)?;
            }
            candidate.evaluate(validation)?;
        }
        Ok(true)
    }

    fn predict(&self, inputs: &[Input]) -> Result<Vec<Prediction>> {
        let mut best: Vec<Option<(f64, Output)>> = vec![None; inputs.len()];
        for candidate in &self.candidates {
            let score = candidate.score();
            let predictions = candidate.theory().predict(inputs)?;
            for (slot, prediction) in best.iter_mut().zip(predictions) {
                if let Some(output) = prediction {
                    if slot.as_ref().map_or(true, |(s, _)| score > *s) {
                        *slot = Some((score, output));
                    }
                }
            }
        }
        Ok(best
            .into_iter()
            .map(|slot| slot.map(|(_, output)| output))
            .collect())
    }
}

impl fmt::Debug for Muse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Muse")
            .field("ranking", &self.ranking())
            .finish()
    }
}

struct Shared {
    config: Config,
    registry: Registry,
}

/// Produces fresh, fully composed ensembles.
///
/// Cloning is cheap; every clone spawns ensembles with the same configuration and plugins.
#[derive(Clone)]
pub struct MuseFactory {
    shared: Arc<Shared>,
}

impl MuseFactory {
    /// Validates `config` and freezes it together with the registered plugins.
    pub fn new(config: Config, registry: Registry) -> Result<Self> {
        config.validate()?;
        Ok(MuseFactory {
            shared: Arc::new(Shared { config, registry }),
        })
    }

    /// A factory with the default configuration and no plugins.
    pub fn standard() -> Self {
        MuseFactory {
            shared: Arc::new(Shared {
                config: Config::default(),
                registry: Registry::new(),
            }),
        }
    }

    /// The configuration shared by every spawned ensemble.
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Builds a new ensemble holding the standard theories followed by the plugins.
    pub fn spawn(&self) -> Muse {
        let config = self.config();
        let mut muse = Muse::new(config);
        for simple in SimpleTheory::standard() {
            muse.add_theory(Box::new(simple));
        }
        muse.add_theory(Box::new(Memorization::new()));
        muse.add_theory(Box::new(Constant::new()));
        muse.add_theory(Box::new(PatternTheory::new(SuffixTool::new(), self.clone())));
        muse.add_theory(Box::new(PatternTheory::new(PrefixTool::new(), self.clone())));
        muse.add_theory(Box::new(PatternTheory::new(RemovalTool::new(), self.clone())));
        muse.add_theory(Box::new(PatternTheory::new(TrimTool::new(), self.clone())));
        muse.add_theory(Box::new(FragmentTheory::new(
            config.fragment_window,
            self.clone(),
        )));
        muse.add_theory(Box::new(FieldTheory::new(self.clone())));
        for plugin in self.shared.registry.plugins() {
            muse.add_theory(plugin(self));
        }
        muse
    }
}

impl fmt::Debug for MuseFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MuseFactory")
            .field("config", &self.shared.config)
            .field("registry", &self.shared.registry)
            .finish()
    }
}
