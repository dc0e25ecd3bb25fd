//! Interactive chat handler.
//!
//! Reads questions from stdin, keeping the conversation history locally.
//! Lines starting with `/` are session commands.

use super::ask::describe_citation;
use super::open_session;
use assist_core::{config::AppConfig, AppResult};
use assist_knowledge::{Citation, ConversationTurn};
use clap::Args;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Comandos: /sources (fontes da última resposta), /reload (recarregar documentos), /quit";

/// Interactive session with conversation history
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Start without the welcome banner
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Question(&'a str),
    Sources,
    Reload,
    Help,
    Quit,
    Empty,
}

/// Drop all but the last `window` turns.
fn trim_history(history: &mut Vec<ConversationTurn>, window: usize) {
    let excess = history.len().saturating_sub(window);
    history.drain(..excess);
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    match line {
        "" => Input::Empty,
        "/quit" | "/exit" => Input::Quit,
        "/sources" => Input::Sources,
        "/reload" => Input::Reload,
        "/help" => Input::Help,
        question => Input::Question(question),
    }
}

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Starting chat session");

        let session = open_session(config)?;
        let assistant = &session.assistant;
        let window = assistant.policy().history_window;

        if !self.quiet {
            let stats = assistant.store().stats();
            println!(
                "Assistente de Processos Administrativos ({} documentos, {} trechos)",
                stats.documents, stats.chunks
            );
            println!("{}", HELP);
        }

        let mut history: Vec<ConversationTurn> = Vec::new();
        let mut turns = 0usize;
        let mut last_sources: Vec<Citation> = Vec::new();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match parse_input(&line) {
                Input::Empty => continue,
                Input::Quit => break,
                Input::Help => println!("{}", HELP),
                Input::Sources => {
                    if last_sources.is_empty() {
                        println!("Nenhuma fonte na última resposta.");
                    }
                    for citation in &last_sources {
                        println!("  - {}", describe_citation(citation));
                    }
                }
                Input::Reload => match assistant.reload_corpus().await {
                    Ok(stats) => println!(
                        "Base recarregada: {} documentos, {} trechos (geração {})",
                        stats.documents, stats.chunks, stats.generation
                    ),
                    Err(e) => {
                        tracing::error!("Reload failed: {}", e);
                        println!("Falha ao recarregar a base; a versão anterior continua ativa.");
                    }
                },
                Input::Question(question) => {
                    match assistant.answer_question(question, &history).await {
                        Ok(result) => {
                            println!("{}", result.response);
                            history.push(ConversationTurn::user(question));
                            history.push(ConversationTurn::assistant(result.response));
                            trim_history(&mut history, window);
                            last_sources = result.sources;
                            turns += 1;
                        }
                        Err(e) if e.is_provider() => {
                            println!("{}", e.user_message());
                            last_sources.clear();
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        tracing::info!("Chat session ended after {} questions", turns);
        Ok(())
    }
}
