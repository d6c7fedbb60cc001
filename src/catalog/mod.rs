//! Content catalog: the fixed, ordered sequence of translation prompts.
//!
//! Levels are numbered from 1. Order is the difficulty progression (ten words,
//! then ten sentences, then ten short paragraphs) and never changes at runtime.
//! Each tier lives in its own file; `prompts()` stitches them together once.

use std::fmt;
use std::sync::OnceLock;

use thiserror::Error;

mod paragraphs;
mod sentences;
mod words;

/// Number of levels in the catalog (`N`). A cursor of `LEVEL_COUNT + 1`
/// means every level has been played.
pub const LEVEL_COUNT: u32 = 30;

/// Time budget used when a tier label cannot be resolved.
pub const FALLBACK_TIME_BUDGET_SECS: u32 = 90;

/// Difficulty category of a prompt; decides the countdown length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Word,
    Sentence,
    Paragraph,
}

impl Tier {
    /// Default countdown for a level of this tier, in seconds.
    #[must_use]
    pub const fn default_time_budget(self) -> u32 {
        match self {
            Tier::Word => 60,
            Tier::Sentence => 90,
            Tier::Paragraph => 180,
        }
    }

    /// Lowercase label shown next to each level card.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Tier::Word => "word",
            Tier::Sentence => "sentence",
            Tier::Paragraph => "paragraph",
        }
    }

    /// Parse a tier label (case-insensitive, surrounding whitespace ignored).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Tier> {
        match label.trim().to_ascii_lowercase().as_str() {
            "word" => Some(Tier::Word),
            "sentence" => Some(Tier::Sentence),
            "paragraph" => Some(Tier::Paragraph),
            _ => None,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Time budget for a free-form tier label; unknown labels get 90 seconds.
#[must_use]
pub fn time_budget_for_label(label: &str) -> u32 {
    Tier::from_label(label)
        .map(Tier::default_time_budget)
        .unwrap_or(FALLBACK_TIME_BUDGET_SECS)
}

/// One level's content. Immutable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub tier: Tier,
    /// Hindi text shown to the player.
    pub prompt_text: &'static str,
    /// Reference English translation the answer is scored against.
    pub expected_answer: &'static str,
}

impl Prompt {
    #[must_use]
    pub const fn time_budget(&self) -> u32 {
        self.tier.default_time_budget()
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CatalogError {
    #[error("level {level} is outside the catalog (1..={max})", max = LEVEL_COUNT)]
    OutOfRange { level: u32 },
}

// Runtime-built ordered view over the three tier tables.
fn prompts() -> &'static [&'static Prompt] {
    static PROMPTS: OnceLock<Vec<&'static Prompt>> = OnceLock::new();
    PROMPTS.get_or_init(|| {
        words::WORD_PROMPTS
            .iter()
            .chain(sentences::SENTENCE_PROMPTS.iter())
            .chain(paragraphs::PARAGRAPH_PROMPTS.iter())
            .collect()
    })
}

/// Number of levels; always `LEVEL_COUNT`.
#[must_use]
pub fn size() -> u32 {
    LEVEL_COUNT
}

/// Prompt for a 1-based level number.
///
/// # Errors
///
/// Returns `CatalogError::OutOfRange` when `level` is not in `1..=LEVEL_COUNT`.
pub fn get(level: u32) -> Result<&'static Prompt, CatalogError> {
    if level == 0 {
        return Err(CatalogError::OutOfRange { level });
    }
    prompts()
        .get(level as usize - 1)
        .copied()
        .ok_or(CatalogError::OutOfRange { level })
}

/// All prompts paired with their level number, in play order.
pub fn iter() -> impl Iterator<Item = (u32, &'static Prompt)> {
    prompts().iter().copied().zip(1..).map(|(p, n)| (n, p))
}

/// Default time budget for a tier (free function form of `Tier::default_time_budget`).
#[must_use]
pub fn default_time_budget(tier: Tier) -> u32 {
    tier.default_time_budget()
}
