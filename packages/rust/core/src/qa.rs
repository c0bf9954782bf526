//! Grounded ROS2 question answering.
//!
//! question → keyword retrieval → context block → completion → answer + sources

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use qros_llm::{CancellationToken, CompletionRequest, CompletionService};
use qros_retrieval::{DocumentCollection, KeywordRetriever};
use qros_shared::{Result, RetrievedSource};

use crate::context::compose_context;
use crate::prompts;
use crate::structured::parse_structured;
use crate::validation::{QUESTION_MAX_CHARS, QUESTION_MIN_CHARS, require_length};

/// The answer shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    /// Markdown answer text.
    pub answer: String,
    /// Ids of the documents used as grounding, best first.
    pub sources: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AnswerPayload {
    answer: String,
}

/// Fetch grounding for `question`, degrading to none when the collection is gone.
pub fn gather_sources<C: DocumentCollection>(
    retriever: &KeywordRetriever<C>,
    question: &str,
    max_results: usize,
) -> Result<Vec<RetrievedSource>> {
    match retriever.retrieve(question, max_results) {
        Ok(sources) => Ok(sources),
        Err(e) if e.is_collection_unavailable() => {
            warn!(error = %e, "document collection unavailable, answering without grounding");
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

/// Answer a ROS2 question, grounded in the retriever's collection.
///
/// `sources` in the result always comes from retrieval, never from the model.
#[instrument(skip_all, fields(max_results = max_results))]
pub async fn answer_question<C, S>(
    retriever: &KeywordRetriever<C>,
    service: &S,
    question: &str,
    max_results: usize,
    cancel: &CancellationToken,
) -> Result<QuestionAnswer>
where
    C: DocumentCollection,
    S: CompletionService,
{
    let question = require_length(
        question,
        "question",
        QUESTION_MIN_CHARS,
        Some(QUESTION_MAX_CHARS),
    )?;

    let sources = gather_sources(retriever, question, max_results)?;
    info!(sources = sources.len(), "grounding retrieved");

    let context = compose_context(&sources);
    let prompt = prompts::answer_question(question, &context);

    let raw = service
        .complete(&CompletionRequest::json(prompt), cancel)
        .await?;

    let answer = match parse_structured::<AnswerPayload>(&raw) {
        Ok(payload) => payload.answer,
        Err(e) => {
            // Some models ignore JSON mode for long prose; keep their text.
            debug!(error = %e, "answer was not JSON, using raw reply");
            raw.trim().to_string()
        }
    };

    Ok(QuestionAnswer {
        answer,
        sources: sources.into_iter().map(|s| s.source_id).collect(),
    })
}
