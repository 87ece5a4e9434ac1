use crate::error::Result;
use crate::theory::{Prediction, Theory};
use crate::value::{Example, Input, Output, Value};
use std::collections::HashMap;

/// Exact lookup of previously seen inputs.
///
/// Later examples overwrite earlier ones with the same key; unseen inputs abstain.
#[derive(Debug, Default)]
pub struct Memorization {
    past: HashMap<String, Value>,
}

impl Memorization {
    /// An empty lookup.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Theory for Memorization {
    fn name(&self) -> String {
        String::from("memory")
    }

    fn reset(&mut self) {
        self.past.clear();
    }

    fn train(&mut self, examples: &[Example]) -> Result<()> {
        for example in examples {
            self.past.insert(
                example.input.value.canonical(),
                example.output.value.clone(),
            );
        }
        Ok(())
    }

    fn predict(&self, inputs: &[Input]) -> Result<Vec<Prediction>> {
        Ok(inputs
            .iter()
            .map(|input| {
                self.past.get(&input.value.canonical()).map(|value| Output {
                    value: value.clone(),
                    context: input.context.clone(),
                })
            })
            .collect())
    }
}

/// Answers every input with the first output it was ever trained on.
#[derive(Debug, Default)]
pub struct Constant {
    value: Option<Value>,
}

impl Constant {
    /// A constant that abstains until trained.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Theory for Constant {
    fn name(&self) -> String {
        String::from("constant")
    }

    fn reset(&mut self) {
        self.value = None;
    }

    fn train(&mut self, examples: &[Example]) -> Result<()> {
        if self.value.is_none() {
            self.value = examples.first().map(|e| e.output.value.clone());
        }
        Ok(())
    }

    fn predict(&self, inputs: &[Input]) -> Result<Vec<Prediction>> {
        Ok(inputs
            .iter()
            .map(|input| {
                self.value.clone().map(|value| Output {
                    value,
                    context: input.context.clone(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(theory: &dyn Theory, inputs: &[&str]) -> Vec<Option<String>> {
        let inputs: Vec<Input> = inputs.iter().map(|s| Input::new(*s)).collect();
        theory
            .predict(&inputs)
            .unwrap()
            .into_iter()
            .map(|p| p.map(|o| o.value.canonical()))
            .collect()
    }

    #[test]
    fn memorization_overwrites() {
        let mut memory = Memorization::new();
        memory
            .train(&[Example::new("a", "1"), Example::new("b", "2")])
            .unwrap();
        memory.train(&[Example::new("a", "3")]).unwrap();
        assert_eq!(
            answers(&memory, &["a", "b", "c"]),
            vec![Some("3".to_string()), Some("2".to_string()), None]
        );
        memory.reset();
        assert_eq!(answers(&memory, &["a"]), vec![None]);
    }

    #[test]
    fn memorization_keys_canonically() {
        let mut memory = Memorization::new();
        memory.train(&[Example::new(Value::Num(7.0), "seven")]).unwrap();
        assert_eq!(answers(&memory, &["7"]), vec![Some("seven".to_string())]);
    }

    #[test]
    fn constant_keeps_first_value() {
        let mut constant = Constant::new();
        assert_eq!(answers(&constant, &["x"]), vec![None]);
        constant.train(&[]).unwrap();
        assert_eq!(answers(&constant, &["x"]), vec![None]);
        constant
            .train(&[Example::new("a", "goo"), Example::new("b", "gah")])
            .unwrap();
        constant.train(&[Example::new("c", "other")]).unwrap();
        assert_eq!(
            answers(&constant, &["x", "y"]),
            vec![Some("goo".to_string()), Some("goo".to_string())]
        );
        constant.reset();
        assert_eq!(answers(&constant, &["x"]), vec![None]);
    }

    #[test]
    fn constant_keeps_input_context() {
        let mut constant = Constant::new();
        constant.train(&[Example::new("a", "goo")]).unwrap();
        let mut input = Input::new("x");
        input.context.insert("marked");
        let out = constant.predict(&[input]).unwrap().remove(0).unwrap();
        assert_eq!(out.value, Value::from("goo"));
        assert!(out.context.has("marked"));
    }
}
