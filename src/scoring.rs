//! Answer scoring.
//!
//! A deliberately rough bag-of-words / bag-of-characters heuristic: word order,
//! spelling distance and grammar are ignored. Good enough to forgive case,
//! punctuation and small omissions in a casual practice tool.
//!
//! Known limitation: the character term looks only at *distinct* characters,
//! so short unrelated answers that happen to share a letter or two still pick
//! up a small score. It never crosses the acceptance threshold on its own
//! (the character term is capped at 0.3).

use std::collections::HashSet;
use std::hash::Hash;

/// Minimum similarity for an answer to count as correct.
pub const ACCEPT_THRESHOLD: f64 = 0.65;

const TOKEN_WEIGHT: f64 = 0.7;
const CHAR_WEIGHT: f64 = 0.3;

/// Outcome of scoring one answer against its reference.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grade {
    pub similarity: f64,
    pub accepted: bool,
}

// Word characters in the ASCII sense: letters, digits and underscore.
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Canonical form used for every comparison: lowercase, punctuation and
/// non-ASCII symbols removed, whitespace runs collapsed to one space, no
/// leading or trailing space. Idempotent.
#[must_use]
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|&c| is_word_char(c) || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Similarity in `[0, 1]` between two answers (normalized internally).
///
/// Both empty scores 1.0, exactly one empty scores 0.0, otherwise
/// `0.7 * word-set Jaccard + 0.3 * character-set Jaccard`.
#[must_use]
pub fn similarity(given: &str, expected: &str) -> f64 {
    let given = normalize(given);
    let expected = normalize(expected);
    match (given.is_empty(), expected.is_empty()) {
        (true, true) => return 1.0,
        (true, false) | (false, true) => return 0.0,
        (false, false) => {}
    }

    let words_given: HashSet<&str> = given.split(' ').collect();
    let words_expected: HashSet<&str> = expected.split(' ').collect();
    let chars_given: HashSet<char> = given.chars().collect();
    let chars_expected: HashSet<char> = expected.chars().collect();

    TOKEN_WEIGHT * jaccard(&words_given, &words_expected)
        + CHAR_WEIGHT * jaccard(&chars_given, &chars_expected)
}

/// True when the normalized answers match exactly or are similar enough.
#[must_use]
pub fn accepted(given: &str, expected: &str) -> bool {
    grade(given, expected).accepted
}

/// Score a raw answer against the expected one.
#[must_use]
pub fn grade(given: &str, expected: &str) -> Grade {
    let similarity = similarity(given, expected);
    let exact = normalize(given) == normalize(expected);
    Grade {
        similarity,
        accepted: exact || similarity >= ACCEPT_THRESHOLD,
    }
}

/// Similarity rounded to two decimals, as stored and shown in feedback.
#[must_use]
pub fn round_score(similarity: f64) -> f64 {
    (similarity * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_case_punctuation_and_extra_space() {
        assert_eq!(normalize("  I need a  cup of TEA. "), "i need a cup of tea");
        assert_eq!(normalize("Thank\tyou!!"), "thank you");
        assert_eq!(normalize("everyone’s"), "everyones");
        assert_eq!(normalize("?!"), "");
    }

    #[test]
    fn normalize_is_idempotent_with_edge_punctuation() {
        for raw in ["hello !", "¿ qué tal ?", " a , b ", "Hindi.", "", "snake_case  words"] {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
        }
    }

    const AWKWARD: [&str; 10] = [
        "नमस्ते, दोस्त!",
        "Ünïcödé   ÀCCENTS",
        "İstanbul",
        "ß and ẞ",
        "emoji 🙂 mid 🙂 sentence",
        "tabs\tand\nnewlines\u{3000}wide space",
        "---",
        "  _ __ _  ",
        "don't, won't; can't!",
        "١٢٣ digits 123",
    ];

    fn every_catalog_answer() -> impl Iterator<Item = &'static str> {
        crate::catalog::iter().map(|(_, p)| p.expected_answer)
    }

    #[test]
    fn normalize_is_idempotent_across_catalog_and_awkward_input() {
        for raw in every_catalog_answer().chain(AWKWARD) {
            let once = normalize(raw);
            assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
            assert_eq!(once.trim(), once);
            assert!(!once.contains("  "));
        }
    }

    #[test]
    fn every_input_scores_one_against_itself() {
        for raw in every_catalog_answer().chain(AWKWARD) {
            assert_eq!(similarity(raw, raw), 1.0, "self-similarity of {raw:?}");
            assert!(grade(raw, raw).accepted);
        }
    }

    #[test]
    fn identical_answers_score_one() {
        assert_eq!(similarity("Can you help me?", "can you help me"), 1.0);
        assert_eq!(similarity("water", "water"), 1.0);
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("...", "  "), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        assert_eq!(similarity("", "abc"), 0.0);
    }

    #[test]
    fn case_only_difference_is_accepted() {
        let g = grade("hello", "Hello");
        assert!(g.accepted);
        assert_eq!(g.similarity, 1.0);
    }

    #[test]
    fn partial_sentence_is_rejected() {
        let g = grade("I want tea", "I need a cup of tea.");
        // words: {i, tea} / 7 distinct; chars: 6 shared of 13
        let expected = 0.7 * (2.0 / 7.0) + 0.3 * (6.0 / 13.0);
        assert!((g.similarity - expected).abs() < 1e-9);
        assert!(!g.accepted);
    }

    #[test]
    fn near_miss_sentence_is_accepted() {
        // one dropped word out of five
        let g = grade("She speaks hindi", "She speaks Hindi.");
        assert!(g.accepted);
        let g = grade("please close door", "Please close the door.");
        assert!(g.similarity >= ACCEPT_THRESHOLD, "got {}", g.similarity);
    }

    #[test]
    fn shared_letters_alone_never_pass() {
        let g = grade("ab", "ac");
        assert!((g.similarity - 0.3 / 3.0).abs() < 1e-9);
        assert!(!g.accepted);
    }

    #[test]
    fn round_score_keeps_two_decimals() {
        assert_eq!(round_score(0.33846), 0.34);
        assert_eq!(round_score(1.0), 1.0);
    }
}
