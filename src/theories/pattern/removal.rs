use super::{update, PatternState, PatternTool};
use crate::value::{Example, Input, Output};
use std::collections::BTreeSet;

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Characters that appear in inputs but never in outputs, and are dropped wherever they occur.
#[derive(Debug, Default)]
pub struct RemovalTool {
    dead: Option<BTreeSet<char>>,
}

impl RemovalTool {
    /// A tool with nothing to strip.
    pub fn new() -> Self {
        Self::default()
    }

    /// The case-folded characters currently being stripped; `None` until first derived.
    pub fn dead(&self) -> Option<&BTreeSet<char>> {
        self.dead.as_ref()
    }

    fn strip(&self, s: &str) -> String {
        match &self.dead {
            Some(dead) => s.chars().filter(|c| !dead.contains(&fold(*c))).collect(),
            None => String::from(s),
        }
    }
}

impl PatternTool for RemovalTool {
    fn name(&self) -> &'static str {
        "removal"
    }

    fn derive(&mut self, data: &[Example]) -> PatternState {
        let mut left = BTreeSet::new();
        let mut right = BTreeSet::new();
        for example in data {
            let pre: Vec<char> = example.input.value.canonical().chars().map(fold).collect();
            let post: Vec<char> = example.output.value.canonical().chars().map(fold).collect();
            if pre.len() == post.len() || post.is_empty() {
                continue;
            }
            left.extend(pre);
            right.extend(post);
        }
        let dead: BTreeSet<char> = left.difference(&right).copied().collect();
        if dead.is_empty() {
            return PatternState::NotFound;
        }
        update(&mut self.dead, dead)
    }

    fn forward(&self, output: Output) -> Output {
        output.with_value(self.strip(&output.value.canonical()))
    }

    fn reverse_input(&self, input: &Input) -> Input {
        input.with_value(self.strip(&input.value.canonical()))
    }

    fn clear(&mut self) {
        self.dead = None;
    }
}
