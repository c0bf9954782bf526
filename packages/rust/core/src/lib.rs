//! The QROS flows: grounded question answering, colcon build-log analysis,
//! launch file debugging and TF tree analysis.
//!
//! Each flow validates its input, renders a prompt, calls a
//! [`CompletionService`](qros_llm::CompletionService) and parses the JSON
//! reply into a typed result.

pub mod build_log;
pub mod context;
pub mod launch_file;
pub mod prompts;
pub mod qa;
pub mod structured;
pub mod tf_tree;
pub mod validation;

#[cfg(test)]
mod testing;

pub use build_log::{BuildIssue, BuildLogAnalysis, analyze_build_log};
pub use context::{SOURCE_DELIMITER, compose_context};
pub use launch_file::{LaunchFileReport, LaunchFileType, debug_launch_file};
pub use qa::{QuestionAnswer, answer_question, gather_sources};
pub use tf_tree::{TfIssue, TfTreeAnalysis, analyze_tf_tree};
