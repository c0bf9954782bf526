//! TF tree analysis.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use qros_llm::{CancellationToken, CompletionRequest, CompletionService};
use qros_shared::Result;

use crate::prompts;
use crate::structured::parse_structured;
use crate::validation::{TF_TREE_MIN_CHARS, require_length};

/// One problem in a TF tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfIssue {
    pub description: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TfTreeAnalysis {
    pub issues: Vec<TfIssue>,
}

/// Models sometimes answer with the bare issue array.
#[derive(Deserialize)]
#[serde(untagged)]
enum TfReply {
    Wrapped(Wrapped),
    Bare(Vec<TfIssue>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Wrapped {
    issues: Vec<TfIssue>,
}

/// Look for missing frames, multiple parents and similar TF problems.
#[instrument(skip_all, fields(tree_len = tree.len()))]
pub async fn analyze_tf_tree<S: CompletionService>(
    service: &S,
    tree: &str,
    cancel: &CancellationToken,
) -> Result<TfTreeAnalysis> {
    let tree = require_length(tree, "TF tree", TF_TREE_MIN_CHARS, None)?;

    let raw = service
        .complete(
            &CompletionRequest::json(prompts::analyze_tf_tree(tree)),
            cancel,
        )
        .await?;

    let analysis = match parse_structured::<TfReply>(&raw)? {
        TfReply::Wrapped(Wrapped { issues }) | TfReply::Bare(issues) => TfTreeAnalysis { issues },
    };
    info!(issues = analysis.issues.len(), "TF tree analyzed");
    Ok(analysis)
}
