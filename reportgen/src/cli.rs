//! # reportgen CLI Interface
//!
//! Command parsing and orchestration for the `reportgen` binary. All report
//! logic (planning, synthesis, assembly, serialization) lives in
//! `reportgen-core`; this module wires config, the text-generation client and
//! the in-memory job store together and reports progress on stdout.
//!
//! ## How To Use
//! - Command line: `reportgen generate --config report.yaml --output-dir out/`
//!   or `reportgen plan --config report.yaml`.
//! - Programmatic/integration use: call [`run`] with a constructed [`Cli`].

use crate::load_config::{load_config, GenerationSection, API_KEY_ENV};
use crate::textgen::{GeminiClient, RetryPolicy, RetryingGenerator};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use reportgen_core::contract::{JobState, JobStore};
use reportgen_core::document::AssemblyOptions;
use reportgen_core::pipeline::{plan_report, spawn_report_job, GenerationOptions};
use reportgen_core::progress::InMemoryJobStore;
use reportgen_core::synthesis::{
    ChapterSynthesizer, DelegatedSynthesizer, SynthesisStrategy, TemplateSynthesizer,
};
use reportgen_core::toc::TocEntryKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// How often `generate` polls the job store.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// CLI for reportgen: generate academic-style project reports as DOCX.
#[derive(Parser)]
#[clap(
    name = "reportgen",
    version,
    about = "Generate academic-style project reports (cover, front matter, chapters, references) as DOCX"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a report from the given config file and write the .docx
    Generate {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Directory the report is written to
        #[clap(long, default_value = ".")]
        output_dir: PathBuf,
        /// Chapter text strategy (overrides the config file)
        #[clap(long, value_enum)]
        strategy: Option<StrategyArg>,
    },
    /// Print detected concepts, chapter plan and table of contents without generating text
    Plan {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// `--strategy` values. Anything else is rejected by clap before a job starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Offline template text
    Template,
    /// Text from the Gemini API (needs GEMINI_API_KEY)
    Delegated,
}

impl From<StrategyArg> for SynthesisStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Template => SynthesisStrategy::Template,
            StrategyArg::Delegated => SynthesisStrategy::Delegated,
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Generate {
            config,
            output_dir,
            strategy,
        } => generate(&config, &output_dir, strategy).await,
        Commands::Plan { config } => plan(&config),
    }
}

fn build_synthesizer(
    strategy: SynthesisStrategy,
    generation: &GenerationSection,
) -> Result<Arc<dyn ChapterSynthesizer>> {
    match strategy {
        SynthesisStrategy::Template => Ok(Arc::new(TemplateSynthesizer)),
        SynthesisStrategy::Delegated => {
            let api_key = generation.api_key.clone().ok_or_else(|| {
                tracing::error!("{API_KEY_ENV} missing in environment");
                anyhow::anyhow!("{API_KEY_ENV} must be set for the delegated strategy")
            })?;
            let client = GeminiClient::new(
                api_key,
                generation.model.as_str(),
                Duration::from_secs(generation.request_timeout_secs),
            )?;
            Ok(Arc::new(DelegatedSynthesizer::new(RetryingGenerator::new(
                client,
                RetryPolicy::default(),
            ))))
        }
    }
}

async fn generate(
    config_path: &Path,
    output_dir: &Path,
    strategy: Option<StrategyArg>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let strategy = match (strategy, config.generation.strategy.as_deref()) {
        (Some(arg), _) => SynthesisStrategy::from(arg),
        (None, Some(name)) => name.parse::<SynthesisStrategy>()?,
        (None, None) => SynthesisStrategy::default(),
    };
    tracing::info!(command = "generate", ?strategy, "Starting report generation");

    let synthesizer = build_synthesizer(strategy, &config.generation)?;
    let options = GenerationOptions {
        max_concurrent_chapters: config.generation.max_concurrent_chapters,
        assembly: AssemblyOptions {
            echo_title_in_header: config.generation.echo_title_in_header,
            ..AssemblyOptions::default()
        },
    };

    let store = InMemoryJobStore::new();
    let (session, handle) =
        spawn_report_job(config.report, options, synthesizer, Arc::new(store.clone())).map_err(
            |e| {
                tracing::error!(command = "generate", error = %e, "Invalid report config");
                anyhow::Error::new(e)
            },
        )?;

    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    let mut last_percent = None;
    let status = loop {
        ticker.tick().await;
        let finished = handle.is_finished();
        if let Some(status) = store.status(&session).await {
            if last_percent != Some(status.percent) {
                let eta = match (status.state, status.eta_secs) {
                    (JobState::Running, Some(secs)) => format!(" (~{secs}s left)"),
                    _ => String::new(),
                };
                println!("[{:>3}%] {}{eta}", status.percent, status.message);
                last_percent = Some(status.percent);
            }
            if status.is_terminal() {
                break status;
            }
        }
        if finished {
            anyhow::bail!("Report job {session} ended without a result");
        }
    };

    match (status.state, status.artifact) {
        (JobState::Completed, Some(artifact)) => {
            std::fs::create_dir_all(output_dir)?;
            let path = output_dir.join(&artifact.filename);
            std::fs::write(&path, &artifact.bytes)?;
            store.evict(&session).await;
            tracing::info!(
                command = "generate",
                path = %path.display(),
                word_count = artifact.word_count,
                chapters = artifact.chapter_count,
                "Report written"
            );
            println!(
                "Report written to {} ({} chapters, {} words)",
                path.display(),
                artifact.chapter_count,
                artifact.word_count
            );
            Ok(())
        }
        _ => {
            tracing::error!(command = "generate", message = %status.message, "Report generation failed");
            Err(anyhow::Error::msg(status.message))
        }
    }
}

fn plan(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let report = config.report.validate()?;
    report.trace_loaded();

    let plan = plan_report(&report);
    tracing::info!(command = "plan", chapters = plan.plan.len(), "Planned report");

    println!("Domain: {}", plan.concepts.domain);
    println!("Technologies: {}", plan.concepts.technologies.join(", "));
    println!("Features: {}", plan.concepts.features.join(", "));
    println!(
        "Length: {:?} ({} words, {} pages per chapter)",
        plan.plan.tier,
        plan.plan.target_words,
        plan.plan.pages_per_chapter()
    );
    println!("Output: {}", report.output_filename());
    println!();
    println!("Chapters:");
    for chapter in &plan.plan.chapters {
        println!("  {}", chapter.heading());
    }
    println!();
    println!("Table of contents:");
    for entry in &plan.toc {
        let indent = "  ".repeat(entry.indent_level as usize + 1);
        let gap = if entry.kind == TocEntryKind::Subsection { " " } else { " .. " };
        println!("{indent}{}{gap}{}", entry.label, entry.page_range);
    }
    Ok(())
}
