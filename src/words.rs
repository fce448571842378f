//! Word/Question provider
//!
//! Supplies random past-tense verbs together with the sound their `-ed`
//! ending makes. The word lists are static data; the only state involved is
//! the caller's random source.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::battle::components::GameRng;

/// The three ways a regular past-tense ending can be pronounced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PronunciationClass {
    /// Voiceless ending, as in "walked"
    #[serde(rename = "t")]
    T,
    /// Voiced ending, as in "played"
    #[serde(rename = "d")]
    D,
    /// Extra syllable, as in "wanted"
    #[serde(rename = "id")]
    Id,
}

impl PronunciationClass {
    pub fn all() -> [PronunciationClass; 3] {
        [
            PronunciationClass::T,
            PronunciationClass::D,
            PronunciationClass::Id,
        ]
    }

    /// IPA-style label shown to the player
    pub fn symbol(&self) -> &'static str {
        match self {
            PronunciationClass::T => "/t/",
            PronunciationClass::D => "/d/",
            PronunciationClass::Id => "/ɪd/",
        }
    }

    /// Parse an answer typed or sent by the input layer.
    ///
    /// Accepts `t`, `d`, `id` or `ɪd`, optionally wrapped in slashes and in any
    /// case. Anything else returns `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim().trim_matches('/').to_lowercase();
        match trimmed.as_str() {
            "t" => Some(PronunciationClass::T),
            "d" => Some(PronunciationClass::D),
            "id" | "ɪd" => Some(PronunciationClass::Id),
            _ => None,
        }
    }

    fn words(&self) -> &'static [&'static str] {
        match self {
            PronunciationClass::T => T_WORDS,
            PronunciationClass::D => D_WORDS,
            PronunciationClass::Id => ID_WORDS,
        }
    }
}

impl fmt::Display for PronunciationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single quiz prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub word: String,
    pub pronunciation_class: PronunciationClass,
}

impl Question {
    pub fn is_correct(&self, answer: Option<PronunciationClass>) -> bool {
        answer == Some(self.pronunciation_class)
    }
}

// Endings after voiceless consonants (p, k, f, s, sh, ch, x)
const T_WORDS: &[&str] = &[
    "walked", "talked", "jumped", "laughed", "kissed", "washed", "watched", "helped",
    "cooked", "stopped", "looked", "danced", "fixed", "passed", "worked", "missed",
    "pushed", "finished", "dropped", "liked", "asked", "hoped", "picked", "brushed",
    "typed", "shopped", "mixed", "wished", "kicked", "knocked",
];

// Endings after vowels and voiced consonants
const D_WORDS: &[&str] = &[
    "played", "called", "cleaned", "opened", "lived", "loved", "moved", "stayed",
    "showed", "listened", "rained", "enjoyed", "cried", "tried", "studied", "closed",
    "used", "arrived", "changed", "answered", "smiled", "filled", "turned", "learned",
    "happened", "allowed", "carried", "robbed", "hugged", "begged",
];

// Endings after t or d
const ID_WORDS: &[&str] = &[
    "wanted", "needed", "started", "waited", "visited", "decided", "ended", "painted",
    "added", "landed", "hated", "counted", "invited", "planted", "shouted", "created",
    "rested", "pointed", "attended", "collected", "expected", "repeated", "printed",
    "lifted", "melted", "tasted", "handed", "guided", "traded", "graduated",
];

/// Stateless access to the built-in word lists
#[derive(Debug, Clone, Copy, Default)]
pub struct WordBank;

impl WordBank {
    /// Pick a class uniformly, then a word uniformly from that class.
    pub fn next_question(&self, rng: &mut GameRng) -> Question {
        let classes = PronunciationClass::all();
        let class = classes[rng.random_index(classes.len())];
        let words = class.words();
        let word = words[rng.random_index(words.len())];
        Question {
            word: word.to_string(),
            pronunciation_class: class,
        }
    }

    /// Look up which class a built-in word belongs to
    pub fn classify(&self, word: &str) -> Option<PronunciationClass> {
        PronunciationClass::all()
            .into_iter()
            .find(|class| class.words().iter().any(|w| w.eq_ignore_ascii_case(word)))
    }

    pub fn word_count(&self, class: PronunciationClass) -> usize {
        class.words().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_accepts_known_spellings() {
        assert_eq!(PronunciationClass::parse("t"), Some(PronunciationClass::T));
        assert_eq!(PronunciationClass::parse("/D/"), Some(PronunciationClass::D));
        assert_eq!(PronunciationClass::parse(" id "), Some(PronunciationClass::Id));
        assert_eq!(PronunciationClass::parse("/ɪd/"), Some(PronunciationClass::Id));
    }

    #[test]
    fn test_parse_rejects_unknown_answers() {
        assert_eq!(PronunciationClass::parse(""), None);
        assert_eq!(PronunciationClass::parse("ed"), None);
        assert_eq!(PronunciationClass::parse("/z/"), None);
    }

    #[test]
    fn test_word_lists_are_populated_and_disjoint() {
        let bank = WordBank;
        let mut seen = HashSet::new();
        for class in PronunciationClass::all() {
            assert!(bank.word_count(class) >= 10, "{:?} list is too short", class);
            for word in class.words() {
                assert!(seen.insert(*word), "{} appears in more than one list", word);
            }
        }
    }

    #[test]
    fn test_next_question_word_matches_its_class() {
        let bank = WordBank;
        let mut rng = GameRng::from_seed(7);
        for _ in 0..200 {
            let question = bank.next_question(&mut rng);
            assert_eq!(bank.classify(&question.word), Some(question.pronunciation_class));
        }
    }

    #[test]
    fn test_next_question_covers_every_class() {
        let bank = WordBank;
        let mut rng = GameRng::from_seed(99);
        let classes: HashSet<_> = (0..300)
            .map(|_| bank.next_question(&mut rng).pronunciation_class)
            .collect();
        assert_eq!(classes.len(), 3);
    }

    #[test]
    fn test_question_correctness() {
        let question = Question {
            word: "wanted".to_string(),
            pronunciation_class: PronunciationClass::Id,
        };
        assert!(question.is_correct(Some(PronunciationClass::Id)));
        assert!(!question.is_correct(Some(PronunciationClass::T)));
        assert!(!question.is_correct(None));
    }
}
