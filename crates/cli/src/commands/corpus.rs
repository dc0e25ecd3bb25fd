//! Retrieval inspection: ranked search and the document list.

use super::{open_session, print_json};
use assist_core::{config::AppConfig, AppResult};
use clap::Args;

const MAX_TOP_K: usize = 20;
const PREVIEW_CHARS: usize = 500;

/// Show the chunks retrieval ranks for a query
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Number of chunks to show (1-20, default from config)
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command");

        let session = open_session(config)?;
        let top_k = clamp_top_k(self.top_k.unwrap_or(session.knowledge.top_k));
        let results = session.assistant.peek_search(&self.query, top_k);

        if self.json {
            let output: Vec<_> = results
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "content": r.preview(PREVIEW_CHARS),
                        "source": r.chunk.source,
                        "section": r.chunk.section,
                        "score": r.score,
                    })
                })
                .collect();
            return print_json(&serde_json::json!({
                "query": self.query,
                "results": output,
                "total": results.len(),
            }));
        }

        if results.is_empty() {
            println!("Nenhum trecho relevante para \"{}\".", self.query);
            return Ok(());
        }

        for (i, result) in results.iter().enumerate() {
            println!(
                "{}. [{}] {} - {}",
                i + 1,
                result.score,
                result.chunk.source,
                result.chunk.section.as_deref().unwrap_or("-")
            );
            println!("   {}", result.preview(PREVIEW_CHARS).replace('\n', " "));
        }
        Ok(())
    }
}

fn clamp_top_k(requested: usize) -> usize {
    requested.clamp(1, MAX_TOP_K)
}

/// List the indexed documents
#[derive(Args, Debug)]
pub struct DocumentsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl DocumentsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing documents command");

        let session = open_session(config)?;
        let store = session.assistant.store();
        let documents = store.documents();

        if self.json {
            return print_json(&serde_json::json!({
                "documents": documents,
                "stats": store.stats(),
            }));
        }

        if documents.is_empty() {
            println!(
                "Nenhum documento carregado de {}.",
                session.knowledge.corpus_path(&config.workspace).display()
            );
            return Ok(());
        }

        for document in &documents {
            println!(
                "{} ({}, {} trechos)",
                document.title, document.filename, document.chunk_count
            );
        }
        Ok(())
    }
}
