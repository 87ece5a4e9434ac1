//! Partitioning of training batches for cross-validation.

use crate::config::Config;
use crate::value::Example;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Plan {
    LeaveOneOut,
    KFold(usize),
}

impl Plan {
    pub fn for_size(n: usize, config: &Config) -> Plan {
        if n < config.loo_limit {
            Plan::LeaveOneOut
        } else {
            Plan::KFold(config.folds)
        }
    }
}

/// Assigns every example a fold in `0..k` after shuffling; position `idx` of the shuffled order
/// lands in fold `k * idx / n`.
pub fn assign_folds<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);
    let mut folds = vec![0; n];
    for (idx, example) in order.into_iter().enumerate() {
        folds[example] = k * idx / n;
    }
    folds
}

/// Splits off the example at `held`, returning `(rest, [held])`.
pub fn hold_out(examples: &[Example], held: usize) -> (Vec<Example>, Vec<Example>) {
    let rest = examples
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != held)
        .map(|(_, e)| e.clone())
        .collect();
    (rest, vec![examples[held].clone()])
}

/// Splits examples into `(training, validation)` where validation is fold `fold`.
pub fn split_fold(
    examples: &[Example],
    folds: &[usize],
    fold: usize,
) -> (Vec<Example>, Vec<Example>) {
    let mut train = Vec::new();
    let mut validation = Vec::new();
    for (example, f) in examples.iter().zip(folds) {
        if *f == fold {
            validation.push(example.clone());
        } else {
            train.push(example.clone());
        }
    }
    (train, validation)
}
