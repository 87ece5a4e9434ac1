use crate::error::Result;
use crate::theory::{Prediction, Theory};
use crate::value::{Example, Input, Output, Value};
use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// A pure function of the input value. Never abstains and has nothing to train.
#[derive(Debug, Clone)]
pub struct SimpleTheory {
    name: &'static str,
    f: fn(&Value) -> Value,
}

impl SimpleTheory {
    /// A transform named `name` that maps every input value through `f`.
    pub fn new(name: &'static str, f: fn(&Value) -> Value) -> Self {
        SimpleTheory { name, f }
    }

    /// Returns the input value unchanged, mappings included.
    pub fn identity() -> Self {
        Self::new("identity", |v| v.clone())
    }

    /// Upper-cases the canonical string.
    pub fn upper() -> Self {
        Self::new("upper", |v| Value::from(v.canonical().to_uppercase()))
    }

    /// Lower-cases the canonical string.
    pub fn lower() -> Self {
        Self::new("lower", |v| Value::from(v.canonical().to_lowercase()))
    }

    /// Upper-cases the first character of every word and lower-cases the rest.
    pub fn title() -> Self {
        Self::new("title", |v| Value::from(title_case(&v.canonical())))
    }

    /// Upper-cases a leading word character.
    pub fn capitalize() -> Self {
        Self::new("capitalize", |v| Value::from(capitalize(&v.canonical())))
    }

    /// The transforms every ensemble starts with, in registration order.
    pub fn standard() -> Vec<Self> {
        vec![
            Self::identity(),
            Self::upper(),
            Self::lower(),
            Self::title(),
            Self::capitalize(),
        ]
    }
}

impl Theory for SimpleTheory {
    fn name(&self) -> String {
        String::from(self.name)
    }

    fn trainable(&self) -> bool {
        false
    }

    fn reset(&mut self) {}

    fn train(&mut self, _examples: &[Example]) -> Result<()> {
        Ok(())
    }

    fn predict(&self, inputs: &[Input]) -> Result<Vec<Prediction>> {
        Ok(inputs
            .iter()
            .map(|input| {
                Some(Output {
                    value: (self.f)(&input.value),
                    context: input.context.clone(),
                })
            })
            .collect())
    }
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Upper-cases the first character of every word and lower-cases the rest of it.
fn title_case(s: &str) -> String {
    lazy_static! {
        static ref WORD: Regex = Regex::new(r"\w\S*").unwrap();
    }
    WORD.replace_all(s, |caps: &Captures| {
        let word = &caps[0];
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(|c| c.to_lowercase()))
                .collect(),
            None => String::new(),
        }
    })
    .into_owned()
}

/// Upper-cases the leading character if it is a word character.
fn capitalize(s: &str) -> String {
    lazy_static! {
        static ref LEADING: Regex = Regex::new(r"^\w").unwrap();
    }
    LEADING
        .replace(s, |caps: &Captures| upper_first(&caps[0]))
        .into_owned()
}
