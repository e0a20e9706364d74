use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use tracing::debug;

/// Hard cap on the number of words in a sampled phrase.
pub const MAX_PHRASE_WORDS: usize = 10;

const TERMINALS: [char; 3] = ['.', '!', '?'];

/// Word-adjacency ("Markov") model: each word maps to every word observed
/// directly after it, duplicates included, in corpus order.
///
/// Fully derived state. Rebuild it from the memory log whenever a phrase is
/// needed. Keys iterate in first-seen order so a seeded RNG reproduces the
/// same walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyModel {
    order: Vec<String>,
    successors: HashMap<String, Vec<String>>,
}

impl AdjacencyModel {
    /// Build from an ordered sequence of utterances. Tokens are split on
    /// whitespace and pairs never cross utterance boundaries.
    pub fn build<I, S>(utterances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut model = Self::default();
        for utterance in utterances {
            let words: Vec<&str> = utterance.as_ref().split_whitespace().collect();
            for pair in words.windows(2) {
                model.push(pair[0], pair[1]);
            }
        }
        debug!(words = model.len(), "built adjacency model");
        model
    }

    fn push(&mut self, word: &str, next: &str) {
        match self.successors.get_mut(word) {
            Some(list) => list.push(next.to_string()),
            None => {
                self.order.push(word.to_string());
                self.successors
                    .insert(word.to_string(), vec![next.to_string()]);
            }
        }
    }

    /// Successors observed after `word`, if it was ever a predecessor.
    pub fn successors(&self, word: &str) -> Option<&[String]> {
        self.successors.get(word).map(Vec::as_slice)
    }

    /// Words with at least one successor, in first-seen order.
    pub fn words(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Random walk over the model starting from a uniformly chosen key.
///
/// Stops when the current word has no successors, when the phrase reaches
/// [`MAX_PHRASE_WORDS`], or when a word reached by a step ends in `.`, `!`
/// or `?`. Returns an empty string for an empty model.
pub fn sample_phrase<R: Rng + ?Sized>(model: &AdjacencyModel, rng: &mut R) -> String {
    let Some(start) = model.order.choose(rng) else {
        return String::new();
    };

    let mut word = start.as_str();
    let mut phrase = vec![word];

    while let Some(next) = model.successors(word).and_then(|s| s.choose(rng)) {
        word = next.as_str();
        phrase.push(word);
        if phrase.len() >= MAX_PHRASE_WORDS || word.ends_with(TERMINALS) {
            break;
        }
    }

    phrase.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn push_keeps_first_seen_order() {
        let model = AdjacencyModel::build(["z y", "a b", "z q"]);
        assert_eq!(model.words(), ["z".to_string(), "a".to_string()]);
        assert_eq!(model.successors("z").unwrap(), ["y", "q"]);
    }

    #[test]
    fn single_word_utterances_add_nothing() {
        let model = AdjacencyModel::build(["hello", "  ", ""]);
        assert!(model.is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(sample_phrase(&model, &mut rng), "");
    }
}
