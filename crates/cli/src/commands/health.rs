//! Health command handler.

use super::{open_session, print_json};
use assist_core::{config::AppConfig, AppResult};
use assist_knowledge::HealthStatus;
use clap::Args;

/// Report knowledge base, model, and web search readiness
#[derive(Args, Debug)]
pub struct HealthCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl HealthCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing health command");

        let session = open_session(config)?;
        let report = session.assistant.health(session.ai_configured);

        if self.json {
            return print_json(&report);
        }

        let status = match report.status {
            HealthStatus::Ok => "ok",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Error => "error",
        };
        println!("Status: {}", status);
        println!(
            "Knowledge base: {} ({} documents, {} chunks, generation {})",
            yes_no(report.services.knowledge_base),
            report.index.documents,
            report.index.chunks,
            report.index.generation
        );
        println!("AI service ({}): {}", config.provider, yes_no(report.services.ai_service));
        println!("Web search: {}", yes_no(report.services.web_search));
        for error in &report.errors {
            println!("  ! {}", error);
        }
        Ok(())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "ready"
    } else {
        "unavailable"
    }
}
