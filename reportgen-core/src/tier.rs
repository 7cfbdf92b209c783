//! Length tiers derived from the requested word count.
//!
//! Every length-dependent policy (extra chapters, template depth, estimated
//! pages per chapter, table-of-contents subsections) is keyed off a single
//! [`LengthTier`] so the planner, synthesizer and ToC never disagree.

use serde::{Deserialize, Serialize};

/// Word count used when the request does not carry a usable value.
pub const DEFAULT_TARGET_WORDS: u32 = 15_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthTier {
    /// Fewer than 15000 words.
    Compact,
    /// 15000 to 19999 words.
    Standard,
    /// 20000 to 24999 words.
    Extended,
    /// 25000 words and above.
    Comprehensive,
}

impl LengthTier {
    pub fn from_word_count(target_words: u32) -> Self {
        match target_words {
            w if w >= 25_000 => LengthTier::Comprehensive,
            w if w >= 20_000 => LengthTier::Extended,
            w if w >= 15_000 => LengthTier::Standard,
            _ => LengthTier::Compact,
        }
    }

    /// Number of chapters appended after the domain's base template.
    pub fn extra_chapter_count(self) -> usize {
        match self {
            LengthTier::Compact | LengthTier::Standard => 0,
            LengthTier::Extended => 1,
            LengthTier::Comprehensive => 3,
        }
    }

    /// Depth factor for templated chapter bodies.
    pub fn content_multiplier(self) -> f32 {
        match self {
            LengthTier::Compact | LengthTier::Standard => 1.8,
            LengthTier::Extended => 2.5,
            LengthTier::Comprehensive => 3.5,
        }
    }

    /// Estimated printed pages per chapter, used only by the table of contents.
    pub fn pages_per_chapter(self) -> u32 {
        match self {
            LengthTier::Compact => 8,
            LengthTier::Standard => 10,
            LengthTier::Extended => 12,
            LengthTier::Comprehensive => 14,
        }
    }

    /// How many of the standard subsection labels each chapter lists.
    pub fn subsection_count(self) -> usize {
        match self {
            LengthTier::Compact => 5,
            LengthTier::Standard => 8,
            LengthTier::Extended => 10,
            LengthTier::Comprehensive => 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(LengthTier::from_word_count(0), LengthTier::Compact);
        assert_eq!(LengthTier::from_word_count(14_999), LengthTier::Compact);
        assert_eq!(LengthTier::from_word_count(15_000), LengthTier::Standard);
        assert_eq!(LengthTier::from_word_count(19_999), LengthTier::Standard);
        assert_eq!(LengthTier::from_word_count(20_000), LengthTier::Extended);
        assert_eq!(LengthTier::from_word_count(24_999), LengthTier::Extended);
        assert_eq!(LengthTier::from_word_count(25_000), LengthTier::Comprehensive);
    }

    #[test]
    fn multiplier_gates_template_depth() {
        assert!(LengthTier::Standard.content_multiplier() > 1.5);
        assert!(LengthTier::Extended.content_multiplier() <= 2.5);
        assert!(LengthTier::Comprehensive.content_multiplier() > 2.5);
    }
}
