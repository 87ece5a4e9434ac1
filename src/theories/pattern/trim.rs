use super::{PatternState, PatternTool};
use crate::value::{Example, Input, Output};

/// Surrounding whitespace dropped from inputs.
#[derive(Debug, Default)]
pub struct TrimTool {
    active: bool,
}

impl TrimTool {
    /// An inactive tool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether some example showed surrounding whitespace being dropped.
    pub fn active(&self) -> bool {
        self.active
    }
}

/// Counts the ends of `pre` that start or end with a space the output does not keep.
fn boundary_drops(pre: &str, post: &str) -> usize {
    if pre.is_empty() {
        return 0;
    }
    let mut drops = 0;
    if pre.starts_with(' ') && post.chars().next().unwrap_or(' ') != ' ' {
        drops += 1;
    }
    if pre.ends_with(' ') && post.chars().last().unwrap_or(' ') != ' ' {
        drops += 1;
    }
    drops
}

impl PatternTool for TrimTool {
    fn name(&self) -> &'static str {
        "trim"
    }

    fn derive(&mut self, data: &[Example]) -> PatternState {
        let drops: usize = data
            .iter()
            .map(|e| boundary_drops(&e.input.value.canonical(), &e.output.value.canonical()))
            .sum();
        if drops == 0 {
            return PatternState::NotFound;
        }
        self.active = true;
        PatternState::Found
    }

    fn forward(&self, output: Output) -> Output {
        output.with_value(output.value.canonical().trim())
    }

    fn reverse_input(&self, input: &Input) -> Input {
        input.with_value(input.value.canonical().trim())
    }

    fn clear(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_boundaries() {
        assert_eq!(boundary_drops("  bob dole", "bob dole"), 1);
        assert_eq!(boundary_drops(" x ", "x"), 2);
        assert_eq!(boundary_drops(" x ", " x "), 0);
        assert_eq!(boundary_drops(" ", ""), 0);
        assert_eq!(boundary_drops("", "x"), 0);
    }

    #[test]
    fn derive_activates() {
        let mut tool = TrimTool::new();
        assert_eq!(
            tool.derive(&[Example::new("ab", "ab")]),
            PatternState::NotFound
        );
        assert!(!tool.active());
        let data = [
            Example::new("  bob dole", "bob dole"),
            Example::new("space monkey planet  ", "space monkey planet"),
        ];
        assert_eq!(tool.derive(&data), PatternState::Found);
        assert!(tool.active());

        let residual = tool.reverse(&Example::new("  for shame  ", "for shame"));
        assert_eq!(residual.input.value.canonical(), "for shame");
        assert_eq!(tool.forward(residual.output).value.canonical(), "for shame");
    }
}
