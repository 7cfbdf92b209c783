//! Chapter body synthesis.
//!
//! Two strategies sit behind [`ChapterSynthesizer`]: a fixed template expanded
//! with the project's concepts, and delegation to a [`TextGenerator`]. Neither
//! fails; delegated errors degrade to [`PLACEHOLDER_TEXT`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

use crate::concepts::ProjectConcepts;
use crate::config::ReportConfig;
use crate::contract::TextGenerator;
use crate::error::UnknownStrategy;
use crate::format::strip_chapter_headings;
use crate::planner::{ChapterPlan, PlannedChapter};

pub const PLACEHOLDER_TEXT: &str =
    "[Error generating content for this section. Please check your API key and try again.]";

/// Word count recorded for placeholder content.
pub const PLACEHOLDER_WORD_COUNT: usize = 20;

/// Smallest per-subsection word budget put into a prompt.
pub const MIN_SUBSECTION_WORDS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisStrategy {
    #[default]
    Template,
    Delegated,
}

impl FromStr for SynthesisStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "template" | "Template" | "static" => Ok(SynthesisStrategy::Template),
            "delegated" | "Delegated" | "ai" | "gemini" => Ok(SynthesisStrategy::Delegated),
            other => {
                warn!(strategy = other, "Unknown synthesis strategy");
                Err(UnknownStrategy(other.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentSource {
    Template,
    Generated,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterContent {
    /// `CHAPTER n: TITLE`.
    pub title: String,
    pub body: String,
    pub word_count: usize,
    pub source: ContentSource,
}

impl ChapterContent {
    fn new(chapter: &PlannedChapter, body: String, source: ContentSource) -> Self {
        let word_count = match source {
            ContentSource::Placeholder => PLACEHOLDER_WORD_COUNT,
            _ => count_words(&body),
        };
        ChapterContent {
            title: chapter.heading(),
            body,
            word_count,
            source,
        }
    }

    pub fn placeholder(chapter: &PlannedChapter) -> Self {
        Self::new(chapter, PLACEHOLDER_TEXT.to_string(), ContentSource::Placeholder)
    }
}

/// Whitespace-token count.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Everything a synthesizer may read about the report being built.
#[derive(Debug, Clone)]
pub struct SynthesisContext {
    pub config: ReportConfig,
    pub concepts: ProjectConcepts,
    pub plan: ChapterPlan,
}

#[async_trait]
pub trait ChapterSynthesizer: Send + Sync {
    async fn synthesize(&self, ctx: &SynthesisContext, chapter: &PlannedChapter)
        -> ChapterContent;

    fn strategy(&self) -> SynthesisStrategy;
}

/// Deterministic, offline chapter text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSynthesizer;

#[async_trait]
impl ChapterSynthesizer for TemplateSynthesizer {
    async fn synthesize(
        &self,
        ctx: &SynthesisContext,
        chapter: &PlannedChapter,
    ) -> ChapterContent {
        let multiplier = ctx.plan.tier.content_multiplier();
        let body = template_body(chapter.number, &ctx.config, &ctx.concepts, multiplier);
        ChapterContent::new(chapter, body, ContentSource::Template)
    }

    fn strategy(&self) -> SynthesisStrategy {
        SynthesisStrategy::Template
    }
}

fn template_body(
    n: usize,
    config: &ReportConfig,
    concepts: &ProjectConcepts,
    multiplier: f32,
) -> String {
    let title = &config.project_title;
    let description = &config.project_description;
    let domain = concepts.domain;
    let technologies = concepts.technologies.join(", ");
    let features = concepts.features.join(", ");
    let challenges = concepts.challenges.join(", ");

    let mut sections = vec![
        format!(
            "{n}.1 Project Overview and Introduction\n\n\
             The {title} project addresses critical challenges in the {domain} domain. {description} \
             This comprehensive solution leverages modern {technologies} technologies to deliver a robust and scalable system.\n\n\
             The primary motivation for developing {title} stems from the need to address {challenges}. \
             Current solutions in the market often lack the comprehensive approach that this project provides, \
             making it a valuable contribution to the field.\n\n\
             Key features of {title} include {features}, each designed to address specific user requirements and business objectives. \
             The system architecture ensures scalability, maintainability, and optimal performance under various operational conditions."
        ),
        format!(
            "{n}.2 Theoretical Background and Literature Review\n\n\
             The theoretical foundation for {title} is built upon extensive research in {domain}. \
             This literature review examines current approaches, methodologies, and best practices that are directly relevant to the implementation of {title}.\n\n\
             Key research areas that inform the {title} project include modern development frameworks, system architecture patterns, \
             performance optimization techniques, and user experience design principles. \
             The literature review reveals several important trends that have influenced the design decisions made in this project.\n\n\
             Existing solutions in the {domain} domain provide valuable insights into both successful approaches and common pitfalls. \
             This analysis has been crucial in identifying the unique value proposition of {title} and the specific problems it addresses."
        ),
        format!(
            "{n}.3 Methodology and Approach\n\n\
             The methodology employed in this chapter follows a systematic and structured approach that ensures comprehensive coverage of all relevant aspects. \
             The approach is designed to be both thorough and practical, providing actionable insights and solutions.\n\n\
             The methodology incorporates both quantitative and qualitative analysis techniques to ensure a balanced and comprehensive evaluation of all aspects."
        ),
        format!(
            "{n}.4 Implementation Details and Technical Specifications\n\n\
             The implementation of the concepts and methodologies described in this chapter involves detailed technical specifications \
             and careful consideration of all system requirements. The implementation approach is designed to be modular, scalable, and maintainable.\n\n\
             Technical specifications include detailed descriptions of all system components, interfaces, data structures, and algorithms."
        ),
        format!(
            "{n}.5 Results and Analysis\n\n\
             The results obtained from the implementation and testing of the concepts described in this chapter demonstrate the effectiveness of the proposed approach. \
             Comprehensive analysis of these results provides insights into both the strengths and areas for improvement.\n\n\
             Performance metrics collected during testing and validation demonstrate that the implemented solution meets or exceeds all specified requirements."
        ),
    ];

    if multiplier > 1.5 {
        sections.push(format!(
            "{n}.6 Advanced Features and Capabilities\n\n\
             Advanced features implemented as part of this work extend the basic functionality to support complex use cases and specialized requirements. \
             These features are designed to be modular and extensible, allowing for future enhancements and customizations.\n\n\
             The advanced features include sophisticated algorithms, intelligent automation capabilities, advanced user interface components, \
             and comprehensive integration capabilities."
        ));
        sections.push(format!(
            "{n}.7 Integration and Interoperability\n\n\
             Integration capabilities enable the system to work seamlessly with existing infrastructure and third-party systems. \
             Comprehensive API documentation and integration guidelines support both internal and external integration requirements.\n\n\
             Interoperability standards compliance ensures that the system can communicate effectively with a wide range of external systems and services."
        ));
        sections.push(format!(
            "{n}.8 Quality Assurance and Validation\n\n\
             Comprehensive quality assurance processes ensure that all aspects of the implementation meet the highest standards for reliability, performance, and usability. \
             These processes include both automated and manual testing procedures.\n\n\
             Validation procedures verify that the implemented solution meets all specified requirements and performs as expected under various operating conditions."
        ));
    }

    if multiplier > 2.5 {
        sections.push(format!(
            "{n}.9 Security and Compliance Framework\n\n\
             Security considerations are integrated into all aspects of the system design and implementation. \
             Comprehensive security measures protect against various types of threats and vulnerabilities while maintaining system usability and performance.\n\n\
             The security framework includes authentication mechanisms, authorization controls, data encryption, secure communication protocols, \
             and comprehensive audit logging."
        ));
        sections.push(format!(
            "{n}.10 Performance Optimization and Scalability\n\n\
             Performance optimization techniques are applied throughout the system to ensure optimal performance under various load conditions. \
             These techniques include algorithm optimization, database optimization, caching strategies, and resource management.\n\n\
             Scalability considerations are integrated into the system architecture to support future growth and increased usage."
        ));
        sections.push(format!(
            "{n}.11 Maintenance and Support Infrastructure\n\n\
             Comprehensive maintenance procedures and documentation ensure long-term system reliability and availability. \
             These procedures include preventive maintenance, corrective maintenance, and adaptive maintenance to address changing requirements.\n\n\
             Support infrastructure includes help desk capabilities, user documentation, training materials, and troubleshooting guides."
        ));
        sections.push(format!(
            "{n}.12 Future Enhancements and Roadmap\n\n\
             Future enhancement opportunities have been identified through user feedback, performance analysis, and technology trend analysis. \
             These enhancements are prioritized based on user value, technical feasibility, and resource requirements.\n\n\
             The development roadmap includes both short-term and long-term enhancement plans."
        ));
    }

    sections.join("\n\n")
}

/// Per-subsection word budget: the target split evenly over chapters and
/// subsections, floored at [`MIN_SUBSECTION_WORDS`].
pub fn subsection_word_budget(plan: &ChapterPlan) -> u32 {
    let subsections = plan.subsection_titles().len().max(1) as u32;
    (plan.words_per_chapter() / subsections).max(MIN_SUBSECTION_WORDS)
}

/// Prompt sent to the text generator for one chapter.
pub fn build_chapter_prompt(ctx: &SynthesisContext, chapter: &PlannedChapter) -> String {
    let budget = subsection_word_budget(&ctx.plan);
    let outline = ctx
        .plan
        .subsection_titles()
        .iter()
        .enumerate()
        .map(|(i, label)| format!("{}.{} {} ({budget} words)", chapter.number, i + 1, label))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Generate a focused {chapter_title} chapter for a {report_type} report titled \"{project_title}\".\n\
         Project Description: {description}\n\
         Structure with these subsections: {outline}. \
         Write in formal academic language with proper subsection headings. \
         Use continuous paragraphs under each subsection. \
         DO NOT include any chapter title in the content - only generate the subsection content.",
        chapter_title = chapter.title,
        report_type = ctx.config.report_type,
        project_title = ctx.config.project_title,
        description = ctx.config.project_description,
    )
}

/// Chapter text from an external [`TextGenerator`].
pub struct DelegatedSynthesizer<G> {
    generator: G,
}

impl<G: TextGenerator> DelegatedSynthesizer<G> {
    pub fn new(generator: G) -> Self {
        DelegatedSynthesizer { generator }
    }
}

#[async_trait]
impl<G: TextGenerator> ChapterSynthesizer for DelegatedSynthesizer<G> {
    async fn synthesize(
        &self,
        ctx: &SynthesisContext,
        chapter: &PlannedChapter,
    ) -> ChapterContent {
        let prompt = build_chapter_prompt(ctx, chapter);
        debug!(chapter = chapter.number, prompt_len = prompt.len(), "Requesting chapter text");

        match self.generator.generate(&prompt).await {
            Ok(text) => {
                let body = strip_chapter_headings(&text).trim().to_string();
                if body.is_empty() {
                    warn!(chapter = chapter.number, "Generator returned blank text, using placeholder");
                    return ChapterContent::placeholder(chapter);
                }
                ChapterContent::new(chapter, body, ContentSource::Generated)
            }
            Err(e) => {
                warn!(chapter = chapter.number, error = %e, "Chapter generation failed, using placeholder");
                ChapterContent::placeholder(chapter)
            }
        }
    }

    fn strategy(&self) -> SynthesisStrategy {
        SynthesisStrategy::Delegated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concepts::extract_concepts;
    use crate::config::RawReportConfig;
    use crate::planner::plan_chapters;

    fn context(words: u32) -> SynthesisContext {
        let config = RawReportConfig {
            student_name: Some("Ada Lovelace".into()),
            student_id: Some("S1".into()),
            course: Some("Computing".into()),
            semester: Some("6".into()),
            institution: Some("Institute".into()),
            supervisor: Some("Dr. Babbage".into()),
            project_title: Some("Inventory Tracker".into()),
            project_description: Some("Tracks stock with a database".into()),
            report_type: Some("Project Report".into()),
            target_word_count: None,
            department: None,
        }
        .validate()
        .expect("valid config");
        let concepts = extract_concepts(&config.project_title, &config.project_description);
        let plan = plan_chapters(concepts.domain, &config.project_title, words);
        SynthesisContext {
            config,
            concepts,
            plan,
        }
    }

    #[test]
    fn strategy_names_parse_strictly() {
        assert_eq!("delegated".parse(), Ok(SynthesisStrategy::Delegated));
        assert_eq!(" static ".parse(), Ok(SynthesisStrategy::Template));
        assert_eq!(
            "delegatd".parse::<SynthesisStrategy>(),
            Err(UnknownStrategy("delegatd".to_string()))
        );
    }

    #[tokio::test]
    async fn template_sections_follow_multiplier() {
        let ctx = context(15_000);
        let chapter = &ctx.plan.chapters[1];
        let content = TemplateSynthesizer.synthesize(&ctx, chapter).await;
        assert_eq!(content.source, ContentSource::Template);
        assert!(content.body.starts_with("2.1 Project Overview and Introduction"));
        assert!(content.body.contains("2.8 Quality Assurance and Validation"));
        assert!(!content.body.contains("2.9 "));
        assert_eq!(content.word_count, count_words(&content.body));

        let ctx = context(30_000);
        let content = TemplateSynthesizer.synthesize(&ctx, &ctx.plan.chapters[0]).await;
        assert!(content.body.contains("1.12 Future Enhancements and Roadmap"));
    }

    #[test]
    fn prompt_budget_has_a_floor() {
        let ctx = context(1_000);
        assert_eq!(subsection_word_budget(&ctx.plan), MIN_SUBSECTION_WORDS);
        let prompt = build_chapter_prompt(&ctx, &ctx.plan.chapters[0]);
        assert!(prompt.contains("1.1 Overview and Introduction (50 words)"));
        assert!(prompt.contains("Project Description: Tracks stock with a database"));
    }
}
