//! High-level pipeline: orchestrates plan → synthesize → format → assemble → serialize.
//!
//! This module drives one report job from a validated [`ReportConfig`] to a
//! downloadable [`ReportArtifact`], writing milestones to a [`ProgressReporter`]
//! along the way:
//!   - 5: job accepted
//!   - 10: concepts extracted and chapters planned
//!   - 15..85: one milestone per chapter, `15 + floor(i / n * 70)`
//!   - 85: formatting and assembly
//!   - 90: serialization
//!   - 95: finalizing
//!   - 100: written by [`ProgressReporter::complete`]
//!
//! Each milestone carries a seconds-left estimate: 300 and 280 before synthesis,
//! [`chapter_eta_secs`] per chapter, then 30, 15 and 5.
//!
//! # Responsibilities
//! - Chapters are synthesized through an ordered, buffered stream: at most
//!   [`GenerationOptions::max_concurrent_chapters`] run at once, output order is plan order.
//! - Synthesis never fails; only serialization can fail a job.
//! - Request validation happens in [`spawn_report_job`] before a session exists.
//!
//! # Navigation
//! - Planning only: [`plan_report`]
//! - One job, in the caller's task: [`generate_report`], [`run_report_job`]
//! - Background job: [`spawn_report_job`]

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::concepts::{extract_concepts, ProjectConcepts};
use crate::config::{RawReportConfig, ReportConfig};
use crate::contract::{ProgressReporter, ReportArtifact, SessionId};
use crate::document::{assemble, AssemblyOptions};
use crate::docx::to_docx;
use crate::error::{ConfigError, ReportError};
use crate::planner::{plan_chapters, ChapterPlan};
use crate::synthesis::{ChapterContent, ChapterSynthesizer, SynthesisContext};
use crate::toc::{synthesize_toc, TocEntry};

#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Upper bound on chapters synthesized concurrently. Values below 1 act as 1.
    pub max_concurrent_chapters: usize,
    pub assembly: AssemblyOptions,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions {
            max_concurrent_chapters: 1,
            assembly: AssemblyOptions::default(),
        }
    }
}

/// Everything derived from a config before any chapter text exists.
#[derive(Debug, Clone)]
pub struct ReportPlan {
    pub concepts: ProjectConcepts,
    pub plan: ChapterPlan,
    pub toc: Vec<TocEntry>,
}

pub fn plan_report(config: &ReportConfig) -> ReportPlan {
    let concepts = extract_concepts(&config.project_title, &config.project_description);
    let plan = plan_chapters(concepts.domain, &config.project_title, config.target_word_count);
    let toc = synthesize_toc(&plan);
    ReportPlan {
        concepts,
        plan,
        toc,
    }
}

/// Milestone reported when chapter `index` (0-based) of `total` starts.
pub fn chapter_percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 15;
    }
    (15 + index * 70 / total) as u8
}

/// Seconds assumed per remaining chapter when estimating time left.
pub const SECONDS_PER_CHAPTER: u32 = 35;

/// Estimated seconds left when chapter `index` (0-based) of `total` starts. Never below 10.
pub fn chapter_eta_secs(index: usize, total: usize) -> u32 {
    (total.saturating_sub(index) as u32 * SECONDS_PER_CHAPTER).max(10)
}

pub async fn generate_report(
    session: &SessionId,
    config: &ReportConfig,
    options: &GenerationOptions,
    synthesizer: &dyn ChapterSynthesizer,
    reporter: &dyn ProgressReporter,
) -> Result<ReportArtifact, ReportError> {
    info!(session = %session, strategy = ?synthesizer.strategy(), "[REPORT] Starting report generation");
    reporter
        .report(session, 5, "Initializing report generation...", 300)
        .await;

    let ReportPlan {
        concepts,
        plan,
        toc,
    } = plan_report(config);
    info!(
        domain = %concepts.domain,
        technologies = ?concepts.technologies,
        features = ?concepts.features,
        chapters = plan.len(),
        tier = ?plan.tier,
        "[REPORT] Planned chapters"
    );
    reporter.report(session, 10, "Planning chapters...", 280).await;

    let ctx = SynthesisContext {
        config: config.clone(),
        concepts,
        plan,
    };
    let ctx = &ctx;
    let total = ctx.plan.len();

    let planned = ctx.plan.chapters.clone();
    let chapters: Vec<ChapterContent> = stream::iter(planned.into_iter().enumerate())
        .map(move |(i, chapter)| async move {
            let percent = chapter_percent(i, total);
            let eta = chapter_eta_secs(i, total);
            reporter
                .report(session, percent, &format!("Generating {}...", chapter.heading()), eta)
                .await;
            info!(chapter = chapter.number, percent, "[REPORT] Synthesizing chapter");
            synthesizer.synthesize(ctx, &chapter).await
        })
        .buffered(options.max_concurrent_chapters.max(1))
        .collect()
        .await;

    let word_count: usize = chapters.iter().map(|c| c.word_count).sum();
    debug!(word_count, "[REPORT] All chapters synthesized");

    reporter.report(session, 85, "Formatting document...", 30).await;
    let document = assemble(config, &chapters, &toc, &options.assembly);

    reporter.report(session, 90, "Creating DOCX file...", 15).await;
    let bytes = to_docx(&document).map_err(|e| {
        error!(session = %session, error = %e, "[REPORT][ERROR] Serialization failed");
        e
    })?;

    reporter.report(session, 95, "Finalizing report...", 5).await;
    let artifact = ReportArtifact {
        filename: config.output_filename(),
        bytes,
        word_count,
        chapter_count: chapters.len(),
    };
    info!(
        session = %session,
        filename = %artifact.filename,
        size = artifact.bytes.len(),
        word_count,
        "[REPORT] Report generated"
    );
    Ok(artifact)
}

/// Runs one job to completion and records its terminal state.
pub async fn run_report_job(
    session: SessionId,
    config: ReportConfig,
    options: GenerationOptions,
    synthesizer: Arc<dyn ChapterSynthesizer>,
    reporter: Arc<dyn ProgressReporter>,
) {
    match generate_report(
        &session,
        &config,
        &options,
        synthesizer.as_ref(),
        reporter.as_ref(),
    )
    .await
    {
        Ok(artifact) => reporter.complete(&session, artifact).await,
        Err(e) => {
            error!(session = %session, error = %e, "[REPORT][ERROR] Report generation failed");
            reporter.fail(&session, &e.to_string()).await;
        }
    }
}

/// Validates `raw` and, if it passes, starts the job on the tokio runtime.
///
/// A rejected config never reaches the reporter.
pub fn spawn_report_job(
    raw: RawReportConfig,
    options: GenerationOptions,
    synthesizer: Arc<dyn ChapterSynthesizer>,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<(SessionId, JoinHandle<()>), ConfigError> {
    let config = raw.validate()?;
    config.trace_loaded();

    let session = SessionId::new();
    info!(session = %session, "[REPORT] Job accepted");
    let handle = tokio::spawn(run_report_job(
        session.clone(),
        config,
        options,
        synthesizer,
        reporter,
    ));
    Ok((session, handle))
}
