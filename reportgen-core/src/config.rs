//! Report request configuration: the untyped boundary record and its validated form.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::tier::{LengthTier, DEFAULT_TARGET_WORDS};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Word count as it arrives from a request: a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordCountInput {
    Number(i64),
    Float(f64),
    Text(String),
}

impl WordCountInput {
    /// Leading-digit parse, so `"20000 words"` still reads as 20000.
    /// Zero, negative and non-numeric values resolve to `None`.
    pub fn resolve(&self) -> Option<u32> {
        let value = match self {
            WordCountInput::Number(n) => *n,
            WordCountInput::Float(f) if f.is_finite() => f.trunc() as i64,
            WordCountInput::Float(_) => return None,
            WordCountInput::Text(s) => {
                let digits: String = s
                    .trim()
                    .chars()
                    .take_while(|c| c.is_ascii_digit())
                    .collect();
                digits.parse::<i64>().ok()?
            }
        };
        u32::try_from(value).ok().filter(|v| *v > 0)
    }
}

/// Report request exactly as supplied by a caller; every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReportConfig {
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub semester: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub supervisor: Option<String>,
    #[serde(default)]
    pub project_title: Option<String>,
    #[serde(default)]
    pub project_description: Option<String>,
    #[serde(default)]
    pub report_type: Option<String>,
    #[serde(default)]
    pub target_word_count: Option<WordCountInput>,
    #[serde(default)]
    pub department: Option<String>,
}

impl RawReportConfig {
    /// Trims every field and checks all required ones at once.
    ///
    /// The error lists every missing field, not just the first.
    pub fn validate(self) -> Result<ReportConfig, ConfigError> {
        let mut missing: Vec<&'static str> = Vec::new();
        let mut required = |value: Option<String>, field: &'static str| -> String {
            match value.map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => v,
                _ => {
                    missing.push(field);
                    String::new()
                }
            }
        };

        let student_name = required(self.student_name, "studentName");
        let student_id = required(self.student_id, "studentId");
        let course = required(self.course, "course");
        let semester = required(self.semester, "semester");
        let institution = required(self.institution, "institution");
        let supervisor = required(self.supervisor, "supervisor");
        let project_title = required(self.project_title, "projectTitle");
        let project_description = required(self.project_description, "projectDescription");
        let report_type = required(self.report_type, "reportType");

        if !missing.is_empty() {
            debug!(?missing, "Rejected report config");
            return Err(ConfigError::MissingFields(missing));
        }

        let target_word_count = self
            .target_word_count
            .as_ref()
            .and_then(WordCountInput::resolve)
            .unwrap_or(DEFAULT_TARGET_WORDS);

        let department = self
            .department
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("Department of {course}"));

        Ok(ReportConfig {
            student_name,
            student_id,
            course,
            semester,
            institution,
            supervisor,
            project_title,
            project_description,
            report_type,
            target_word_count,
            department,
        })
    }
}

/// A validated report request. Built through [`RawReportConfig::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    pub student_name: String,
    pub student_id: String,
    pub course: String,
    pub semester: String,
    pub institution: String,
    pub supervisor: String,
    pub project_title: String,
    pub project_description: String,
    pub report_type: String,
    pub target_word_count: u32,
    pub department: String,
}

impl ReportConfig {
    pub fn tier(&self) -> LengthTier {
        LengthTier::from_word_count(self.target_word_count)
    }

    /// `{student_name}_{ProjectTitle}_Report.docx` with whitespace runs in the
    /// name turned into underscores and non-alphanumerics dropped from the title.
    pub fn output_filename(&self) -> String {
        let name = WHITESPACE_RUN.replace_all(&self.student_name, "_");
        let title: String = self
            .project_title
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        format!("{name}_{title}_Report.docx")
    }

    pub fn trace_loaded(&self) {
        info!(
            project_title = %self.project_title,
            report_type = %self.report_type,
            target_word_count = self.target_word_count,
            tier = ?self.tier(),
            "Loaded ReportConfig"
        );
        debug!(?self, "ReportConfig loaded (full debug)");
    }
}
