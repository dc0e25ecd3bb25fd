//! Ask command handler.
//!
//! Answers one question, optionally continuing a saved conversation.

use super::{open_session, print_json};
use assist_core::{config::AppConfig, AppError, AppResult};
use assist_knowledge::{AnswerResult, Citation, ConversationTurn};
use clap::Args;
use std::path::PathBuf;

/// Ask one question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// JSON file with prior turns: [{"role": "user", "content": "..."}, ...]
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Output as JSON ({response, sources, usedWebSearch})
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let history = match &self.history {
            Some(path) => read_history(path)?,
            None => Vec::new(),
        };
        let session = open_session(config)?;

        match session
            .assistant
            .answer_question(&self.question, &history)
            .await
        {
            Ok(result) => self.print_answer(&result),
            Err(e) if e.is_provider() => self.print_failure(&e),
            Err(e) => Err(e),
        }
    }

    fn print_answer(&self, result: &AnswerResult) -> AppResult<()> {
        tracing::debug!(
            "Answered via {:?} from generation {}",
            result.trail,
            result.generation
        );

        if self.json {
            return print_json(result);
        }

        println!("{}", result.response);
        if !result.sources.is_empty() {
            println!();
            println!("Fontes:");
            for citation in &result.sources {
                println!("  - {}", describe_citation(citation));
            }
        }
        Ok(())
    }

    /// Provider failures are reported as an answer, not as a process error.
    fn print_failure(&self, error: &AppError) -> AppResult<()> {
        if self.json {
            return print_json(&serde_json::json!({
                "response": error.user_message(),
                "sources": [],
                "usedWebSearch": false,
            }));
        }
        println!("{}", error.user_message());
        Ok(())
    }
}

pub(crate) fn read_history(path: &std::path::Path) -> AppResult<Vec<ConversationTurn>> {
    let text = std::fs::read_to_string(path)?;
    let turns: Vec<ConversationTurn> = serde_json::from_str(&text)?;
    tracing::debug!("Loaded {} history turns from {}", turns.len(), path.display());
    Ok(turns)
}

pub(crate) fn describe_citation(citation: &Citation) -> String {
    match (&citation.section, &citation.link) {
        (_, Some(link)) => format!("{} <{}>", citation.document_title, link),
        (Some(section), None) => format!("{} - {}", citation.document_title, section),
        (None, None) => citation.document_title.clone(),
    }
}
