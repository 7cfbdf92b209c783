#![doc = "reportgen-core: core logic library for reportgen."]

//! This crate contains the report pipeline: concept extraction, chapter
//! planning, chapter synthesis, paragraph classification, table-of-contents
//! estimation, document assembly and `.docx` serialization, plus the
//! collaborator traits and an in-memory job store.
//!
//! # Usage
//! Add this as a dependency for anything that builds or serves reports; the
//! HTTP text-generation client lives in the CLI crate.

pub mod concepts;
pub mod config;
pub mod contract;
pub mod document;
pub mod docx;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod planner;
pub mod progress;
pub mod synthesis;
pub mod tier;
pub mod toc;
