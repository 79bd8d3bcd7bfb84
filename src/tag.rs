//! Tag generation.
//!
//! Tags are 8 characters drawn uniformly from an alphabet of uppercase letters
//! and digits, and must contain at least one of each. Draws are rejected until
//! a sample satisfies both, so the source of indices is injected and can be
//! scripted in tests.

use crate::error::SheetError;

/// Length of every generated tag
pub const TAG_LENGTH: usize = 8;

const DIGITS: &str = "0123456789";

/// Source of uniformly distributed indices into a fixed-size alphabet.
pub trait IndexSource {
    /// Returns an index in `[0, bound)`. `bound` is never zero.
    fn next_index(&mut self, bound: usize) -> usize;
}

impl<S: IndexSource + ?Sized> IndexSource for &mut S {
    fn next_index(&mut self, bound: usize) -> usize {
        (**self).next_index(bound)
    }
}

/// xorshift64 generator, seeded explicitly or from the operating system.
#[derive(Debug, Clone)]
pub struct XorShiftSource {
    state: u64,
}

impl XorShiftSource {
    pub fn from_seed(seed: u64) -> Self {
        // zero is a fixed point of xorshift
        Self { state: seed.max(1) }
    }

    pub fn from_entropy() -> Result<Self, getrandom::Error> {
        let mut buf = [0u8; 8];
        getrandom::getrandom(&mut buf)?;
        Ok(Self::from_seed(u64::from_le_bytes(buf)))
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}

impl IndexSource for XorShiftSource {
    fn next_index(&mut self, bound: usize) -> usize {
        let bound = bound as u64;
        // Largest multiple of `bound` that fits, so every index is equally likely.
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let x = self.next_u64();
            if x < zone {
                return (x % bound) as usize;
            }
        }
    }
}

/// Characters a tag may be built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagAlphabet {
    letters: Vec<char>,
    symbols: Vec<char>,
}

impl TagAlphabet {
    /// Uppercase A-Z minus `excluded` (case-insensitive), plus 0-9.
    pub fn excluding(excluded: &str) -> Result<Self, SheetError> {
        let letters: Vec<char> = ('A'..='Z')
            .filter(|c| !excluded.chars().any(|e| e.eq_ignore_ascii_case(c)))
            .collect();
        if letters.is_empty() {
            return Err(SheetError::InvalidAlphabet {
                excluded: excluded.to_string(),
            });
        }
        let symbols = letters.iter().copied().chain(DIGITS.chars()).collect();
        Ok(Self { letters, symbols })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn contains(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }

    pub fn is_letter(&self, c: char) -> bool {
        self.letters.contains(&c)
    }

    pub fn is_digit(c: char) -> bool {
        c.is_ascii_digit()
    }

    fn get(&self, index: usize) -> char {
        self.symbols[index]
    }
}

impl Default for TagAlphabet {
    fn default() -> Self {
        Self {
            letters: ('A'..='Z').filter(|&c| c != 'O').collect(),
            symbols: ('A'..='Z').filter(|&c| c != 'O').chain(DIGITS.chars()).collect(),
        }
    }
}

/// Produces tags satisfying the letter/digit composition rule.
///
/// The generator does not remember what it has issued; uniqueness within a
/// sheet is enforced by the layout.
pub struct TagGenerator<S> {
    alphabet: TagAlphabet,
    source: S,
}

impl<S: IndexSource> TagGenerator<S> {
    pub fn new(alphabet: TagAlphabet, source: S) -> Self {
        Self { alphabet, source }
    }

    /// Draw samples until one holds at least one letter and one digit.
    pub fn generate(&mut self) -> String {
        let bound = self.alphabet.len();
        let mut tag = String::with_capacity(TAG_LENGTH);
        loop {
            tag.clear();
            for _ in 0..TAG_LENGTH {
                let index = self.source.next_index(bound);
                tag.push(self.alphabet.get(index));
            }
            let has_letter = tag.chars().any(|c| self.alphabet.is_letter(c));
            let has_digit = tag.chars().any(TagAlphabet::is_digit);
            if has_letter && has_digit {
                debug_assert!(tag.chars().all(|c| self.alphabet.contains(c)));
                return tag;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed sequence of indices.
    pub(crate) struct Scripted {
        indices: VecDeque<usize>,
        pub(crate) draws: usize,
    }

    impl Scripted {
        pub(crate) fn new(indices: impl IntoIterator<Item = usize>) -> Self {
            Self {
                indices: indices.into_iter().collect(),
                draws: 0,
            }
        }
    }

    impl IndexSource for Scripted {
        fn next_index(&mut self, bound: usize) -> usize {
            self.draws += 1;
            let index = self.indices.pop_front().expect("script exhausted");
            assert!(index < bound, "scripted index {} out of bound {}", index, bound);
            index
        }
    }

    /// Index of the first digit in the default alphabet
    pub(crate) const ZERO: usize = 25;

    #[test]
    fn test_default_alphabet() {
        let alphabet = TagAlphabet::default();
        assert_eq!(alphabet.len(), 35);
        assert!(!alphabet.contains('O'));
        assert!(alphabet.contains('A'));
        assert!(alphabet.contains('9'));
        assert_eq!(alphabet, TagAlphabet::excluding("O").unwrap());
    }

    #[test]
    fn test_alphabet_exclusions_ignore_case() {
        let alphabet = TagAlphabet::excluding("oil").unwrap();
        assert_eq!(alphabet.len(), 33);
        for c in ['O', 'I', 'L'] {
            assert!(!alphabet.contains(c));
        }
    }

    #[test]
    fn test_alphabet_needs_a_letter() {
        let all: String = ('A'..='Z').collect();
        assert!(TagAlphabet::excluding(&all).is_err());
    }

    #[test]
    fn test_generate_first_valid_sample() {
        let script = [0, ZERO, 1, 2, 3, 4, 5, 6];
        let mut generator = TagGenerator::new(TagAlphabet::default(), Scripted::new(script));
        assert_eq!(generator.generate(), "A0BCDEFG");
    }

    #[test]
    fn test_generate_rejects_all_letters_and_all_digits() {
        let mut script = vec![0; TAG_LENGTH];
        script.extend([ZERO + 1; TAG_LENGTH]);
        script.extend([ZERO + 9, 24, 0, 0, 0, 0, 0, 0]);
        let mut source = Scripted::new(script);
        let tag = TagGenerator::new(TagAlphabet::default(), &mut source).generate();
        assert_eq!(tag, "9ZAAAAAA");
        assert_eq!(source.draws, 3 * TAG_LENGTH);
    }

    #[test]
    fn test_generated_tags_follow_composition_rule() {
        let alphabet = TagAlphabet::default();
        let mut generator = TagGenerator::new(alphabet.clone(), XorShiftSource::from_seed(42));
        for _ in 0..500 {
            let tag = generator.generate();
            assert_eq!(tag.len(), TAG_LENGTH);
            assert!(tag.chars().all(|c| alphabet.contains(c)));
            assert!(tag.chars().any(|c| alphabet.is_letter(c)));
            assert!(tag.chars().any(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let mut a = TagGenerator::new(TagAlphabet::default(), XorShiftSource::from_seed(7));
        let mut b = TagGenerator::new(TagAlphabet::default(), XorShiftSource::from_seed(7));
        for _ in 0..10 {
            assert_eq!(a.generate(), b.generate());
        }
    }

    #[test]
    fn test_xorshift_indices_in_bound() {
        let mut source = XorShiftSource::from_seed(0);
        let mut seen = [false; 35];
        for _ in 0..5000 {
            let i = source.next_index(35);
            assert!(i < 35);
            seen[i] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_entropy_source() {
        let mut source = XorShiftSource::from_entropy().unwrap();
        assert!(source.next_index(10) < 10);
    }
}
