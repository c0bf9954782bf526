//! colcon build log analysis.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use qros_llm::{CancellationToken, CompletionRequest, CompletionService};
use qros_shared::Result;

use crate::prompts;
use crate::structured::parse_structured;
use crate::validation::BUILD_LOG_MIN_CHARS;

/// One error found in a build log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildIssue {
    /// Short title.
    pub title: String,
    /// The error message as it appears in the log.
    pub error: String,
    /// Root cause.
    pub explanation: String,
    /// Markdown fix.
    pub suggestion: String,
}

/// All issues found in a log; empty when the build is clean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildLogAnalysis {
    pub issues: Vec<BuildIssue>,
}

/// Analyze a `colcon build` log.
///
/// Logs that are blank or shorter than [`BUILD_LOG_MIN_CHARS`] after trimming
/// are answered with no issues and never reach the service.
#[instrument(skip_all, fields(log_len = log.len()))]
pub async fn analyze_build_log<S: CompletionService>(
    service: &S,
    log: &str,
    cancel: &CancellationToken,
) -> Result<BuildLogAnalysis> {
    let log = log.trim();
    if log.chars().count() < BUILD_LOG_MIN_CHARS {
        debug!("build log too short, skipping analysis");
        return Ok(BuildLogAnalysis::default());
    }

    let raw = service
        .complete(
            &CompletionRequest::json(prompts::analyze_build_log(log)),
            cancel,
        )
        .await?;

    let analysis: BuildLogAnalysis = parse_structured(&raw)?;
    info!(issues = analysis.issues.len(), "build log analyzed");
    Ok(analysis)
}
