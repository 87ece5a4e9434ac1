use super::{update, PatternState, PatternTool};
use crate::value::{Example, Output, Value};

fn outputs(data: &[Example]) -> Vec<Vec<char>> {
    data.iter()
        .map(|e| e.output.value.canonical().chars().collect())
        .collect()
}

/// Length of the longest common run of characters taken from the front of every string.
fn common_prefix_len<'a>(mut strs: impl Iterator<Item = &'a [char]>) -> usize {
    let first = match strs.next() {
        Some(first) => first,
        None => return 0,
    };
    strs.fold(first.len(), |len, s| {
        first
            .iter()
            .zip(s)
            .take(len)
            .take_while(|(a, b)| a == b)
            .count()
    })
}

/// A constant string appended to every output.
#[derive(Debug, Default)]
pub struct SuffixTool {
    suffix: Option<String>,
}

impl SuffixTool {
    /// A tool with no suffix derived.
    pub fn new() -> Self {
        Self::default()
    }

    /// The derived suffix, if any.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Checks whether every output is its input (ignoring case) followed by one fixed string.
    fn derive_from_inputs(data: &[Example]) -> Option<String> {
        let first = data.first()?;
        let pre = first.input.value.canonical();
        let post = first.output.value.canonical();
        let pre_len = pre.chars().count();
        if pre_len >= post.chars().count() {
            return None;
        }
        let suffix: String = post.chars().skip(pre_len).collect();
        for example in data {
            let pre = example.input.value.canonical().to_lowercase();
            let post = example.output.value.canonical().to_lowercase();
            if post != pre + &suffix {
                return None;
            }
        }
        Some(suffix)
    }

    /// The longest string every output ends with.
    fn derive_from_outputs(data: &[Example]) -> Option<String> {
        let reversed: Vec<Vec<char>> = outputs(data)
            .into_iter()
            .map(|mut s| {
                s.reverse();
                s
            })
            .collect();
        let min_len = reversed.iter().map(|s| s.len()).min()?;
        let len = common_prefix_len(reversed.iter().map(|s| s.as_slice()));
        if len == 0 || len == min_len {
            // nothing shared, or some output would be left with no residual
            return None;
        }
        Some(reversed[0][..len].iter().rev().collect())
    }
}

impl PatternTool for SuffixTool {
    fn name(&self) -> &'static str {
        "suffix"
    }

    fn derive(&mut self, data: &[Example]) -> PatternState {
        match Self::derive_from_inputs(data).or_else(|| Self::derive_from_outputs(data)) {
            Some(suffix) => update(&mut self.suffix, suffix),
            None => PatternState::NotFound,
        }
    }

    fn forward(&self, output: Output) -> Output {
        let suffix = self.suffix.as_deref().unwrap_or("");
        output.with_value(output.value.canonical() + suffix)
    }

    fn reverse_output(&self, output: &Output) -> Output {
        let mut v = output.value.canonical();
        if let Some(suffix) = &self.suffix {
            if let Some(i) = v.rfind(suffix.as_str()) {
                v.truncate(i);
            }
        }
        output.with_value(Value::Str(v))
    }

    fn clear(&mut self) {
        self.suffix = None;
    }
}

/// A constant string prepended to every output.
#[derive(Debug, Default)]
pub struct PrefixTool {
    prefix: Option<String>,
}

impl PrefixTool {
    /// A tool with no prefix derived.
    pub fn new() -> Self {
        Self::default()
    }

    /// The derived prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn derive_from_inputs(data: &[Example]) -> Option<String> {
        let first = data.first()?;
        let pre_len = first.input.value.canonical().chars().count();
        let post: Vec<char> = first.output.value.canonical().chars().collect();
        if pre_len >= post.len() {
            return None;
        }
        let prefix: String = post[..post.len() - pre_len].iter().collect();
        for example in data {
            let pre = example.input.value.canonical().to_lowercase();
            let post = example.output.value.canonical().to_lowercase();
            if post != prefix.clone() + &pre {
                return None;
            }
        }
        Some(prefix)
    }

    /// The longest string every output starts with.
    fn derive_from_outputs(data: &[Example]) -> Option<String> {
        let outputs = outputs(data);
        let min_len = outputs.iter().map(|s| s.len()).min()?;
        let len = common_prefix_len(outputs.iter().map(|s| s.as_slice()));
        if len == 0 || len == min_len {
            return None;
        }
        Some(outputs[0][..len].iter().collect())
    }
}

impl PatternTool for PrefixTool {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn derive(&mut self, data: &[Example]) -> PatternState {
        match Self::derive_from_inputs(data).or_else(|| Self::derive_from_outputs(data)) {
            Some(prefix) => update(&mut self.prefix, prefix),
            None => PatternState::NotFound,
        }
    }

    fn forward(&self, output: Output) -> Output {
        let prefix = self.prefix.as_deref().unwrap_or("");
        output.with_value(String::from(prefix) + &output.value.canonical())
    }

    fn reverse_output(&self, output: &Output) -> Output {
        let v = output.value.canonical();
        let stripped = match &self.prefix {
            Some(prefix) => v.strip_prefix(prefix.as_str()).unwrap_or(v.as_str()).to_string(),
            None => v.clone(),
        };
        output.with_value(stripped)
    }

    fn clear(&mut self) {
        self.prefix = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn examples(pairs: &[(&str, &str)]) -> Vec<Example> {
        pairs.iter().map(|(i, o)| Example::new(*i, *o)).collect()
    }

    #[test]
    fn suffix_from_inputs() {
        let mut tool = SuffixTool::new();
        let data = examples(&[("Hi", "hi!?"), ("you", "YOU!?")]);
        assert_eq!(tool.derive(&data), PatternState::Found);
        assert_eq!(tool.suffix(), Some("!?"));
    }

    #[test]
    fn suffix_from_outputs() {
        let mut tool = SuffixTool::new();
        let data = examples(&[("hi", "...Hi!!!"), ("you", "...You!!!")]);
        assert_eq!(tool.derive(&data), PatternState::Found);
        assert_eq!(tool.suffix(), Some("!!!"));
        let residual = tool.reverse(&data[1]);
        assert_eq!(residual.output.value.canonical(), "...You");
        assert_eq!(residual.input, data[1].input);
    }

    #[test]
    fn suffix_rejects_degenerate() {
        let mut tool = SuffixTool::new();
        // the whole of the shortest output would be consumed
        assert_eq!(
            tool.derive(&examples(&[("a", "xa"), ("b", "a")])),
            PatternState::NotFound
        );
        assert_eq!(
            tool.derive(&examples(&[("a", "xy"), ("b", "zw")])),
            PatternState::NotFound
        );
        assert_eq!(tool.derive(&[]), PatternState::NotFound);
        assert_eq!(tool.suffix(), None);
    }

    #[test]
    fn suffix_changes() {
        let mut tool = SuffixTool::new();
        assert_eq!(
            tool.derive(&examples(&[("a", "a!"), ("b", "b!")])),
            PatternState::Found
        );
        assert_eq!(
            tool.derive(&examples(&[("a", "a!"), ("b", "b!")])),
            PatternState::Found
        );
        assert_eq!(
            tool.derive(&examples(&[("a", "a?"), ("b", "b?")])),
            PatternState::Changed
        );
    }

    #[test]
    fn suffix_reverse_cuts_at_last_occurrence() {
        let mut tool = SuffixTool::new();
        tool.derive(&examples(&[("a", "a!"), ("b", "b!")]));
        let residual = tool.reverse(&Example::new("x", "x!y!"));
        assert_eq!(residual.output.value.canonical(), "x!y");
        assert_eq!(
            tool.forward(Output::new("x!y")).value.canonical(),
            "x!y!"
        );
    }

    #[test]
    fn prefix_from_inputs_and_outputs() {
        let mut tool = PrefixTool::new();
        assert_eq!(
            tool.derive(&examples(&[("a", "!a"), ("b", "!b")])),
            PatternState::Found
        );
        assert_eq!(tool.prefix(), Some("!"));

        let mut tool = PrefixTool::new();
        assert_eq!(
            tool.derive(&examples(&[("hi", "...Hi"), ("you", "...You")])),
            PatternState::Found
        );
        assert_eq!(tool.prefix(), Some("..."));

        let mut tool = PrefixTool::new();
        assert_eq!(
            tool.derive(&examples(&[("q", "<<A"), ("r", "<<B>")])),
            PatternState::Found
        );
        assert_eq!(tool.prefix(), Some("<<"));
    }

    #[test]
    fn prefix_round_trip() {
        let mut tool = PrefixTool::new();
        let data = examples(&[("hi", "(Hi"), ("you", "(You")]);
        tool.derive(&data);
        for example in &data {
            let residual = tool.reverse(example);
            assert_eq!(tool.forward(residual.output), example.output);
        }
        // outputs without the prefix pass through untouched
        let residual = tool.reverse(&Example::new("x", "x"));
        assert_eq!(residual.output.value.canonical(), "x");
    }

    #[test]
    fn multibyte_characters() {
        let mut tool = SuffixTool::new();
        let data = examples(&[("a", "aé€"), ("b", "bé€")]);
        assert_eq!(tool.derive(&data), PatternState::Found);
        assert_eq!(tool.suffix(), Some("é€"));
    }
}
