//! `load_config` module: Loads a static YAML config, including environment secret injection, into the CLI config.
//!
//! This module is the only place where untrusted YAML is parsed. The `report:`
//! section is handed to the core as a [`RawReportConfig`] unchanged; validation
//! of required fields happens in the core when the job is started.
//!
//! # Schema
//! ```yaml
//! report:
//!   studentName: Ada Lovelace
//!   studentId: "AL-1843"
//!   course: Computer Science
//!   semester: Semester 6
//!   institution: Analytical Engine College
//!   supervisor: Dr. Babbage
//!   projectTitle: Campus E-Commerce Portal
//!   projectDescription: React frontend, Node backend, payment and authentication
//!   reportType: Project Report
//!   targetWordCount: 20000
//! generation:            # optional
//!   strategy: template   # or delegated
//!   maxConcurrentChapters: 2
//!   echoTitleInHeader: false
//!   model: gemini-2.5-flash
//!   requestTimeoutSecs: 120
//! ```
//!
//! # Errors
//! All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.

use anyhow::Result;
use reportgen_core::config::RawReportConfig;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::textgen::{DEFAULT_MODEL, DEFAULT_REQUEST_TIMEOUT};

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug)]
pub struct CliConfig {
    pub report: RawReportConfig,
    pub generation: GenerationSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationSection {
    pub strategy: Option<String>,
    pub max_concurrent_chapters: usize,
    pub echo_title_in_header: bool,
    pub model: String,
    pub request_timeout_secs: u64,
    /// Injected from `GEMINI_API_KEY`, never read from the file.
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GenerationSection {
    fn default() -> Self {
        GenerationSection {
            strategy: None,
            max_concurrent_chapters: 1,
            echo_title_in_header: false,
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            api_key: None,
        }
    }
}

/// Loads a static YAML config file (no secrets) and injects the API key from the environment.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    #[derive(Debug, Deserialize)]
    struct RawConfig {
        report: RawReportConfig,
        #[serde(default)]
        generation: GenerationSection,
    }

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    let mut generation = raw.generation;
    generation.api_key = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|key| !key.trim().is_empty());
    info!(
        strategy = ?generation.strategy,
        api_key_set = generation.api_key.is_some(),
        "Injected secrets from environment"
    );

    Ok(CliConfig {
        report: raw.report,
        generation,
    })
}
