use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dictionary::Dictionary;

/// Default number of words generated for a session
pub const DEFAULT_WORD_COUNT: usize = 100;

/// Draws words uniformly, with replacement, from a dictionary
#[derive(Debug, Clone)]
pub struct WordGenerator {
    dictionary: Dictionary,
    rng: StdRng,
}

impl WordGenerator {
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            dictionary,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests and reproducible runs
    pub fn with_seed(dictionary: Dictionary, seed: u64) -> Self {
        Self {
            dictionary,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Returns exactly `count` words. Each draw is independent, so repeats are expected.
    pub fn generate(&mut self, count: usize) -> Vec<String> {
        let words = &self.dictionary.words;
        let rng = &mut self.rng;
        // `choose` only yields None for an empty slice, which Dictionary rules out
        (0..count)
            .filter_map(|_| words.choose(&mut *rng).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_dictionary() -> Dictionary {
        Dictionary::from_words("tiny", vec!["a".into(), "bb".into(), "ccc".into()]).unwrap()
    }

    #[test]
    fn test_generate_exact_count() {
        let mut generator = WordGenerator::new(Dictionary::common().unwrap());

        assert_eq!(generator.generate(0).len(), 0);
        assert_eq!(generator.generate(1).len(), 1);
        assert_eq!(generator.generate(100).len(), 100);
    }

    #[test]
    fn test_generated_words_come_from_dictionary() {
        let mut generator = WordGenerator::new(small_dictionary());
        let words = generator.generate(50);

        for word in &words {
            assert!(generator.dictionary().contains(word), "unexpected word {word}");
        }
    }

    #[test]
    fn test_draws_with_replacement() {
        // more words than the dictionary holds must still succeed
        let mut generator = WordGenerator::with_seed(small_dictionary(), 7);
        let words = generator.generate(30);

        assert_eq!(words.len(), 30);
    }

    #[test]
    fn test_seeded_generators_agree() {
        let mut a = WordGenerator::with_seed(Dictionary::common().unwrap(), 42);
        let mut b = WordGenerator::with_seed(Dictionary::common().unwrap(), 42);

        assert_eq!(a.generate(20), b.generate(20));
    }
}
