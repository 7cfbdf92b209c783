//! Chapter planning: picks the domain's chapter template and the length tier's extras.

use serde::{Deserialize, Serialize};

use crate::concepts::Domain;
use crate::tier::LengthTier;

/// Standard subsection labels listed under every chapter in the table of
/// contents. A tier uses the first [`LengthTier::subsection_count`] of them.
pub const SUBSECTION_TITLES: [&str; 12] = [
    "Overview and Introduction",
    "Theoretical Background and Literature Review",
    "Methodology and Approach",
    "Implementation Details and Technical Specifications",
    "Results and Analysis",
    "Advanced Features and Capabilities",
    "Integration and Interoperability",
    "Quality Assurance and Validation",
    "Security and Compliance Framework",
    "Performance Optimization and Scalability",
    "Maintenance and Support Infrastructure",
    "Future Enhancements and Roadmap",
];

const EXTENDED_EXTRAS: [&str; 1] = ["ADVANCED IMPLEMENTATION AND OPTIMIZATION"];

const COMPREHENSIVE_EXTRAS: [&str; 3] = [
    "ADVANCED FEATURES AND SYSTEM ENHANCEMENTS",
    "COMPARATIVE ANALYSIS AND BENCHMARKING STUDIES",
    "FUTURE SCOPE, RECOMMENDATIONS AND CONCLUSIONS",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedChapter {
    /// 1-based.
    pub number: usize,
    pub title: String,
}

impl PlannedChapter {
    /// Heading as printed at the top of the chapter: `CHAPTER n: TITLE`.
    pub fn heading(&self) -> String {
        format!("CHAPTER {}: {}", self.number, self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterPlan {
    pub chapters: Vec<PlannedChapter>,
    pub tier: LengthTier,
    pub target_words: u32,
}

impl ChapterPlan {
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn subsection_titles(&self) -> &'static [&'static str] {
        &SUBSECTION_TITLES[..self.tier.subsection_count()]
    }

    pub fn pages_per_chapter(&self) -> u32 {
        self.tier.pages_per_chapter()
    }

    /// Even split of the word target across chapters.
    pub fn words_per_chapter(&self) -> u32 {
        match self.chapters.len() {
            0 => 0,
            n => self.target_words / n as u32,
        }
    }
}

fn base_titles(domain: Domain, project_title: &str) -> Vec<String> {
    let upper = project_title.to_uppercase();
    let first = match domain {
        Domain::ECommerce => format!("INTRODUCTION TO {upper} SYSTEM"),
        _ => format!("INTRODUCTION TO {upper}"),
    };
    let rest: &[&str] = match domain {
        Domain::ECommerce => &[
            "E-COMMERCE PLATFORM ANALYSIS AND LITERATURE REVIEW",
            "SYSTEM ARCHITECTURE AND DESIGN METHODOLOGY",
            "FRONTEND DEVELOPMENT AND USER INTERFACE DESIGN",
            "BACKEND IMPLEMENTATION AND DATABASE INTEGRATION",
            "SECURITY, PAYMENT PROCESSING AND TESTING",
            "PERFORMANCE OPTIMIZATION AND DEPLOYMENT",
        ],
        Domain::ArtificialIntelligence => &[
            "MACHINE LEARNING ALGORITHMS AND THEORETICAL FOUNDATIONS",
            "DATA PREPROCESSING AND FEATURE ENGINEERING",
            "MODEL DEVELOPMENT AND TRAINING METHODOLOGY",
            "IMPLEMENTATION AND SYSTEM INTEGRATION",
            "PERFORMANCE EVALUATION AND VALIDATION",
            "RESULTS ANALYSIS AND FUTURE ENHANCEMENTS",
        ],
        Domain::WebDevelopment => &[
            "WEB TECHNOLOGIES AND FRAMEWORK ANALYSIS",
            "SYSTEM DESIGN AND ARCHITECTURE PLANNING",
            "FRONTEND DEVELOPMENT AND USER EXPERIENCE",
            "BACKEND SERVICES AND API DEVELOPMENT",
            "DATABASE DESIGN AND INTEGRATION",
            "TESTING, DEPLOYMENT AND PERFORMANCE ANALYSIS",
        ],
        Domain::SoftwareDevelopment => &[
            "LITERATURE REVIEW AND TECHNOLOGY ANALYSIS",
            "SYSTEM DESIGN AND METHODOLOGY",
            "IMPLEMENTATION AND DEVELOPMENT PROCESS",
            "TESTING AND QUALITY ASSURANCE",
            "RESULTS AND PERFORMANCE EVALUATION",
        ],
    };

    std::iter::once(first)
        .chain(rest.iter().map(|t| t.to_string()))
        .collect()
}

/// Number of chapters in a domain's base template.
pub fn base_chapter_count(domain: Domain) -> usize {
    base_titles(domain, "").len()
}

/// Builds the ordered chapter list for a project.
pub fn plan_chapters(domain: Domain, project_title: &str, target_words: u32) -> ChapterPlan {
    let tier = LengthTier::from_word_count(target_words);
    let extras: &[&str] = match tier {
        LengthTier::Compact | LengthTier::Standard => &[],
        LengthTier::Extended => &EXTENDED_EXTRAS,
        LengthTier::Comprehensive => &COMPREHENSIVE_EXTRAS,
    };
    debug_assert_eq!(extras.len(), tier.extra_chapter_count());

    let chapters = base_titles(domain, project_title)
        .into_iter()
        .chain(extras.iter().map(|t| t.to_string()))
        .enumerate()
        .map(|(i, title)| PlannedChapter {
            number: i + 1,
            title,
        })
        .collect();

    ChapterPlan {
        chapters,
        tier,
        target_words,
    }
}
