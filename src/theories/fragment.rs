use crate::error::Result;
use crate::muse::{Muse, MuseFactory};
use crate::theory::{abstain_all, Prediction, Theory};
use crate::value::{flags, Example, Input, Output};
use tracing::trace;

/// Learns a character-level mapping from fixed-width windows.
///
/// Equal-length example pairs are cut into every window of `window` characters, and a nested
/// ensemble learns window to window. With a width of one this is a per-character substitution.
/// A width of zero is treated as one.
pub struct FragmentTheory {
    window: usize,
    factory: MuseFactory,
    nested: Option<Muse>,
}

/// Every run of `width` consecutive characters, in order.
fn windows(chars: &[char], width: usize) -> impl Iterator<Item = String> + '_ {
    chars.windows(width).map(|w| w.iter().collect())
}

impl FragmentTheory {
    /// A theory over windows of `window` characters.
    pub fn new(window: usize, factory: MuseFactory) -> Self {
        FragmentTheory {
            window: window.max(1),
            factory,
            nested: None,
        }
    }

    /// Window width in characters, at least one.
    pub fn window(&self) -> usize {
        self.window
    }

    /// The ensemble trained on windows; `None` until some pair could be cut.
    pub fn nested(&self) -> Option<&Muse> {
        self.nested.as_ref()
    }

    fn fragments(&self, examples: &[Example]) -> Vec<Example> {
        let mut fragments = Vec::new();
        for example in examples {
            // windows must never be fragmented again
            if example.input.context.has(flags::FRAGMENTED) {
                continue;
            }
            let pre: Vec<char> = example.input.value.canonical().chars().collect();
            let post: Vec<char> = example.output.value.canonical().chars().collect();
            if pre.len() != post.len() || pre.len() < self.window {
                continue;
            }
            let context = example.input.context.with(flags::FRAGMENTED);
            for (i, o) in windows(&pre, self.window).zip(windows(&post, self.window)) {
                fragments.push(Example {
                    input: Input {
                        value: i.into(),
                        context: context.clone(),
                    },
                    output: example.output.with_value(o),
                });
            }
        }
        fragments
    }

    /// Stitches window answers back into a string: the first character of each window, then the
    /// whole of the final one.
    fn stitch(&self, answers: &[Prediction]) -> Option<String> {
        let mut result = String::new();
        for (n, answer) in answers.iter().enumerate() {
            let value = answer.as_ref()?.value.canonical();
            if value.chars().count() != self.window {
                return None;
            }
            if n + 1 == answers.len() {
                result.push_str(&value);
            } else {
                result.extend(value.chars().next());
            }
        }
        Some(result)
    }
}

impl Theory for FragmentTheory {
    fn name(&self) -> String {
        String::from("fragment")
    }

    fn reset(&mut self) {
        self.nested = None;
    }

    fn train(&mut self, examples: &[Example]) -> Result<()> {
        let fragments = self.fragments(examples);
        if fragments.is_empty() {
            return Ok(());
        }
        trace!(
            window = self.window,
            fragments = fragments.len(),
            "training on fragments"
        );
        let factory = &self.factory;
        self.nested
            .get_or_insert_with(|| factory.spawn())
            .train(&fragments)
    }

    fn predict(&self, inputs: &[Input]) -> Result<Vec<Prediction>> {
        let nested = match &self.nested {
            Some(nested) => nested,
            None => return Ok(abstain_all(inputs)),
        };
        // (first window, window count) for every input long enough to cut
        let mut spans = Vec::with_capacity(inputs.len());
        let mut batch = Vec::new();
        for input in inputs {
            let chars: Vec<char> = input.value.canonical().chars().collect();
            if chars.len() < self.window {
                spans.push(None);
                continue;
            }
            let context = input.context.with(flags::FRAGMENTED);
            let start = batch.len();
            batch.extend(windows(&chars, self.window).map(|w| Input {
                value: w.into(),
                context: context.clone(),
            }));
            spans.push(Some((start, batch.len() - start)));
        }
        let answers = if batch.is_empty() {
            Vec::new()
        } else {
            nested.predict(&batch)?
        };
        if answers.len() != batch.len() {
            return Ok(abstain_all(inputs));
        }
        Ok(inputs
            .iter()
            .zip(spans)
            .map(|(input, span)| {
                if input.value.canonical().is_empty() {
                    return Some(input_output(input, String::new()));
                }
                let (start, count) = span?;
                self.stitch(&answers[start..start + count])
                    .map(|s| input_output(input, s))
            })
            .collect())
    }
}

fn input_output(input: &Input, value: String) -> Output {
    Output {
        value: value.into(),
        context: input.context.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn examples(pairs: &[(&str, &str)]) -> Vec<Example> {
        pairs.iter().map(|(i, o)| Example::new(*i, *o)).collect()
    }

    fn answers(theory: &FragmentTheory, inputs: &[&str]) -> Vec<Option<String>> {
        let inputs: Vec<Input> = inputs.iter().map(|s| Input::new(*s)).collect();
        theory
            .predict(&inputs)
            .unwrap()
            .into_iter()
            .map(|p| p.map(|o| o.value.canonical()))
            .collect()
    }

    #[test]
    fn substitution_cipher() {
        let mut theory = FragmentTheory::new(1, MuseFactory::standard());
        theory
            .train(&examples(&[("abc", "xyz"), ("cab", "zxy")]))
            .unwrap();
        assert_eq!(
            answers(&theory, &["cba", "aabbcc"]),
            vec![Some("zyx".to_string()), Some("xxyyzz".to_string())]
        );
    }

    #[test]
    fn wider_windows_stitch() {
        let mut theory = FragmentTheory::new(2, MuseFactory::standard());
        theory.train(&examples(&[("abcd", "ABCD")])).unwrap();
        // windows ab, bc, cd are all upper-cased by the nested ensemble
        assert_eq!(answers(&theory, &["dcba"]), vec![Some("DCBA".to_string())]);
        assert_eq!(answers(&theory, &["a"]), vec![None]);
        assert_eq!(answers(&theory, &[""]), vec![Some(String::new())]);
    }

    #[test]
    fn skips_unequal_and_fragmented() {
        let mut theory = FragmentTheory::new(1, MuseFactory::standard());
        theory.train(&examples(&[("ab", "abc")])).unwrap();
        assert!(theory.nested().is_none());

        let mut fragment = Example::new("a", "b");
        fragment.input.context.insert(flags::FRAGMENTED);
        theory.train(&[fragment]).unwrap();
        assert!(theory.nested().is_none());
        assert_eq!(answers(&theory, &["a"]), vec![None]);
    }

    #[test]
    fn reset_forgets_windows() {
        let mut theory = FragmentTheory::new(1, MuseFactory::standard());
        theory
            .train(&examples(&[("ab", "ba"), ("ba", "ab")]))
            .unwrap();
        theory.reset();
        assert!(theory.nested().is_none());
        assert_eq!(answers(&theory, &["ab"]), vec![None]);

        // nothing to cut, so the theory stays untrained
        theory.train(&examples(&[("abc", "x")])).unwrap();
        assert_eq!(answers(&theory, &["zz"]), vec![None]);
    }

    #[test]
    fn output_keeps_input_context() {
        let mut theory = FragmentTheory::new(1, MuseFactory::standard());
        theory
            .train(&examples(&[("ab", "ba"), ("ba", "ab")]))
            .unwrap();
        let mut input = Input::new("ab");
        input.context.insert("marked");
        let out = theory.predict(&[input]).unwrap().remove(0).unwrap();
        assert_eq!(out.value.canonical(), "ba");
        assert!(out.context.has("marked"));
        assert!(!out.context.has(flags::FRAGMENTED));
    }
}
