//! ROS2 launch file debugging.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use qros_llm::{CancellationToken, CompletionRequest, CompletionService};
use qros_shared::{QrosError, Result};

use crate::prompts;
use crate::structured::parse_structured;
use crate::validation::{LAUNCH_FILE_MIN_CHARS, require_length};

/// Launch file syntaxes ROS2 understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchFileType {
    Xml,
    Yaml,
    Py,
}

impl LaunchFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            Self::Yaml => "yaml",
            Self::Py => "py",
        }
    }

    /// Guess the type from a file extension (`foo.launch.py` → `Py`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        ext.parse().ok()
    }
}

impl fmt::Display for LaunchFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LaunchFileType {
    type Err = QrosError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "yaml" | "yml" => Ok(Self::Yaml),
            "py" | "python" => Ok(Self::Py),
            other => Err(QrosError::validation(format!(
                "unknown launch file type '{other}': expected xml, yaml, or py"
            ))),
        }
    }
}

/// The review of a launch file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchFileReport {
    /// Whether any problem was found.
    pub issues_detected: bool,
    /// Markdown fixes; empty when nothing needs changing.
    #[serde(default)]
    pub suggestions: String,
    /// Markdown explanation of the problems.
    #[serde(default)]
    pub explanation: String,
}

/// Review a launch file for structural and syntax problems.
#[instrument(skip_all, fields(file_type = %file_type))]
pub async fn debug_launch_file<S: CompletionService>(
    service: &S,
    content: &str,
    file_type: LaunchFileType,
    cancel: &CancellationToken,
) -> Result<LaunchFileReport> {
    let content = require_length(content, "launch file", LAUNCH_FILE_MIN_CHARS, None)?;

    let raw = service
        .complete(
            &CompletionRequest::json(prompts::debug_launch_file(content, file_type)),
            cancel,
        )
        .await?;

    let report: LaunchFileReport = parse_structured(&raw)?;
    info!(issues_detected = report.issues_detected, "launch file reviewed");
    Ok(report)
}
