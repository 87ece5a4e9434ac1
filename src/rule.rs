use crate::error::Result;
use crate::muse::{Muse, MuseFactory};
use crate::theory::Theory;
use crate::value::{Example, Input, Value};
use tracing::debug;

/// A transformation learned from input-output pairs.
///
/// This is the convenience entry point: it spawns a root ensemble, trains it on the pairs, and
/// applies whatever it learned to new inputs.
///
/// ```
/// use smalldata::{MuseFactory, Rule, Value};
///
/// # fn main() -> smalldata::Result<()> {
/// let pairs = &[("tom smith ", "Tom Smith"), (" hans struden", "Hans Struden")];
/// let rule = Rule::learn(&MuseFactory::standard(), pairs)?;
/// let result = rule.apply(&["  jeff thing "])?;
/// assert_eq!(result, vec![Some(Value::from("Jeff Thing"))]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Rule {
    muse: Muse,
}

impl Rule {
    /// Learns a rule from `(input, output)` pairs.
    ///
    /// Fails only if an enrichment plugin fails; a rule that learned nothing useful still exists,
    /// it just abstains.
    pub fn learn<I, O>(factory: &MuseFactory, pairs: &[(I, O)]) -> Result<Rule>
    where
        I: Clone + Into<Value>,
        O: Clone + Into<Value>,
    {
        let examples: Vec<Example> = pairs
            .iter()
            .map(|(i, o)| Example::new(i.clone(), o.clone()))
            .collect();
        let mut muse = factory.spawn();
        muse.train(&examples)?;
        debug!(rule = %muse.name(), examples = examples.len(), "rule learned");
        Ok(Rule { muse })
    }

    /// Applies the rule to each input; `None` where no theory would answer.
    pub fn apply<I>(&self, inputs: &[I]) -> Result<Vec<Option<Value>>>
    where
        I: Clone + Into<Value>,
    {
        let inputs: Vec<Input> = inputs.iter().map(|i| Input::new(i.clone())).collect();
        Ok(self
            .muse
            .predict(&inputs)?
            .into_iter()
            .map(|p| p.map(|output| output.value))
            .collect())
    }

    /// Name of the theory the rule currently trusts most.
    pub fn name(&self) -> String {
        self.muse.name()
    }

    /// The trained root ensemble.
    pub fn muse(&self) -> &Muse {
        &self.muse
    }
}
