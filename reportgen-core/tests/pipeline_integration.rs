use async_trait::async_trait;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reportgen_core::config::{RawReportConfig, WordCountInput};
use reportgen_core::contract::{
    JobState, JobStore, MockProgressReporter, MockTextGenerator, ProgressReporter,
    ReportArtifact, SessionId, TextGenerator,
};
use reportgen_core::document::AssemblyOptions;
use reportgen_core::error::{ConfigError, GenerationError};
use reportgen_core::pipeline::{
    generate_report, plan_report, spawn_report_job, GenerationOptions,
};
use reportgen_core::progress::InMemoryJobStore;
use reportgen_core::synthesis::{
    ChapterSynthesizer, DelegatedSynthesizer, TemplateSynthesizer, PLACEHOLDER_TEXT,
    PLACEHOLDER_WORD_COUNT,
};

fn raw_config() -> RawReportConfig {
    RawReportConfig {
        student_name: Some("Katherine Johnson".into()),
        student_id: Some("NASA-1953".into()),
        course: Some("Applied Mathematics".into()),
        semester: Some("Spring".into()),
        institution: Some("West Virginia State".into()),
        supervisor: Some("Dr. Claytor".into()),
        project_title: Some("Orbit Planner".into()),
        project_description: Some("Computes transfer trajectories.".into()),
        report_type: Some("Project Report".into()),
        target_word_count: Some(WordCountInput::Text("15000".into())),
        department: None,
    }
}

fn options() -> GenerationOptions {
    GenerationOptions {
        max_concurrent_chapters: 1,
        assembly: AssemblyOptions {
            echo_title_in_header: false,
            year: 2024,
        },
    }
}

fn document_xml(artifact: &ReportArtifact) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes.as_slice())).expect("zip");
    let mut file = archive.by_name("word/document.xml").expect("document part");
    let mut xml = String::new();
    file.read_to_string(&mut xml).expect("utf-8");
    xml
}

/// Records every milestone in call order.
#[derive(Default)]
struct RecordingReporter {
    percents: Mutex<Vec<u8>>,
    etas: Mutex<Vec<u32>>,
    completed: Mutex<Option<ReportArtifact>>,
}

#[async_trait]
impl ProgressReporter for RecordingReporter {
    async fn report(&self, _session: &SessionId, percent: u8, _message: &str, eta_secs: u32) {
        self.percents.lock().unwrap().push(percent);
        self.etas.lock().unwrap().push(eta_secs);
    }

    async fn complete(&self, _session: &SessionId, artifact: ReportArtifact) {
        *self.completed.lock().unwrap() = Some(artifact);
    }

    async fn fail(&self, _session: &SessionId, message: &str) {
        panic!("unexpected failure: {message}");
    }
}

#[tokio::test]
async fn missing_student_name_is_rejected_before_any_progress() {
    let mut reporter = MockProgressReporter::new();
    reporter.expect_report().never();
    reporter.expect_complete().never();
    reporter.expect_fail().never();

    let mut raw = raw_config();
    raw.student_name = Some("   ".into());
    raw.course = None;

    let result = spawn_report_job(
        raw,
        options(),
        Arc::new(TemplateSynthesizer),
        Arc::new(reporter),
    );
    match result {
        Err(ConfigError::MissingFields(fields)) => {
            assert_eq!(fields, vec!["studentName", "course"]);
        }
        Ok(_) => panic!("config without a student name must be rejected"),
    }
}

#[tokio::test]
async fn failing_generator_degrades_to_placeholder_and_job_completes() {
    let mut generator = MockTextGenerator::new();
    generator
        .expect_generate()
        .returning(|_prompt: &str| Err(GenerationError::Http("connection refused".into())));

    let store = InMemoryJobStore::new();
    let (session, handle) = spawn_report_job(
        raw_config(),
        options(),
        Arc::new(DelegatedSynthesizer::new(generator)),
        Arc::new(store.clone()),
    )
    .expect("valid config");
    handle.await.expect("job task");

    let status = store.status(&session).await.expect("status recorded");
    assert_eq!(status.state, JobState::Completed);
    assert_eq!(status.percent, 100);

    let artifact = status.artifact.expect("artifact");
    assert_eq!(artifact.filename, "Katherine_Johnson_OrbitPlanner_Report.docx");
    assert_eq!(artifact.chapter_count, 6);
    assert_eq!(artifact.word_count, 6 * PLACEHOLDER_WORD_COUNT);

    let xml = document_xml(&artifact);
    assert_eq!(xml.matches(PLACEHOLDER_TEXT).count(), 6);
}

#[tokio::test]
async fn milestones_are_non_decreasing() {
    let reporter = RecordingReporter::default();
    let config = raw_config().validate().expect("valid");
    let session = SessionId::new();

    let artifact = generate_report(&session, &config, &options(), &TemplateSynthesizer, &reporter)
        .await
        .expect("report");
    assert!(!artifact.bytes.is_empty());

    let percents = reporter.percents.lock().unwrap().clone();
    // 6 chapters: 15 + floor(i * 70 / 6).
    assert_eq!(percents, vec![5, 10, 15, 26, 38, 50, 61, 73, 85, 90, 95]);
    assert!(percents.windows(2).all(|w| w[0] <= w[1]));

    // 35 seconds per chapter still to write.
    let etas = reporter.etas.lock().unwrap().clone();
    assert_eq!(etas, vec![300, 280, 210, 175, 140, 105, 70, 35, 30, 15, 5]);
}

#[tokio::test]
async fn serialization_failure_marks_job_failed_at_last_milestone() {
    let mut raw = raw_config();
    raw.project_description = Some("Computes\u{0B}transfer trajectories.".into());

    let store = InMemoryJobStore::new();
    let (session, handle) = spawn_report_job(
        raw,
        options(),
        Arc::new(TemplateSynthesizer),
        Arc::new(store.clone()),
    )
    .expect("valid config");
    handle.await.expect("job task");

    let status = store.status(&session).await.expect("status recorded");
    assert_eq!(status.state, JobState::Failed);
    assert!(status.artifact.is_none());
    assert_eq!(status.percent, 90);
    assert_eq!(status.eta_secs, None);
    assert!(
        status.message.starts_with("Error: Document serialization failed"),
        "unexpected message: {}",
        status.message
    );
    assert!(status.message.contains("U+000B"), "unexpected message: {}", status.message);
}

/// Echoes the first line of the prompt after a delay that is longest for the first chapter.
struct SlowFirstChapter;

#[async_trait]
impl TextGenerator for SlowFirstChapter {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        if prompt.contains("INTRODUCTION TO") {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        let first_line = prompt.lines().next().unwrap_or_default();
        let headline = first_line.split(" for a ").next().unwrap_or_default();
        Ok(format!("## Chapter 1: Echo\n{headline}"))
    }
}

#[tokio::test]
async fn concurrent_chapters_keep_plan_order() {
    let config = raw_config().validate().expect("valid");
    let plan = plan_report(&config).plan;
    let reporter = InMemoryJobStore::new();
    let mut options = options();
    options.max_concurrent_chapters = 4;

    let synthesizer = DelegatedSynthesizer::new(SlowFirstChapter);
    let artifact = generate_report(&SessionId::new(), &config, &options, &synthesizer, &reporter)
        .await
        .expect("report");
    let xml = document_xml(&artifact);

    // Chapter lines from the generator are stripped.
    assert!(!xml.contains("Chapter 1: Echo"));

    let mut last = 0;
    for chapter in &plan.chapters {
        let heading = xml.find(&chapter.heading()).expect("chapter heading");
        let body = xml
            .find(&format!("Generate a focused {} chapter", chapter.title))
            .expect("chapter body");
        assert!(heading > last && body > heading, "chapter {} out of order", chapter.number);
        last = body;
    }
    assert_eq!(synthesizer.strategy(), reportgen_core::synthesis::SynthesisStrategy::Delegated);
}
