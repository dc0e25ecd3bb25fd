//! Context assembly and citation lists.
//!
//! Formats ranked chunks (and web results) into the context block sent to
//! the model, and derives the deduplicated citations returned with the
//! answer.

use crate::rag::types::Citation;
use crate::types::SearchResult;
use crate::web::WebSearchResult;
use std::collections::HashSet;

/// Context text used when retrieval found nothing.
pub const NO_CONTEXT_FOUND: &str = "Nenhum conteúdo relevante encontrado na base de conhecimento.";

const BLOCK_SEPARATOR: &str = "\n\n---\n\n";

const WEB_CONTEXT_HEADER: &str =
    "\n\n## INFORMAÇÕES ENCONTRADAS NA WEB (Domínios Governamentais)\n\n";

/// One `[Fonte N: title - section]` block per result, in rank order, or
/// [`NO_CONTEXT_FOUND`] when there are none.
pub fn format_context(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_CONTEXT_FOUND.to_string();
    }

    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let chunk = &result.chunk;
            match &chunk.section {
                Some(section) => format!(
                    "[Fonte {}: {} - {}]\n{}",
                    i + 1,
                    chunk.source,
                    section,
                    chunk.content
                ),
                None => format!("[Fonte {}: {}]\n{}", i + 1, chunk.source, chunk.content),
            }
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Citations for `results`, deduplicated by `(source, section)` in
/// first-seen order.
pub fn format_sources(results: &[SearchResult]) -> Vec<Citation> {
    let mut seen = HashSet::new();
    results
        .iter()
        .filter(|r| seen.insert((r.chunk.source.as_str(), r.chunk.section.as_deref())))
        .map(|r| Citation::local(r.chunk.source.clone(), r.chunk.section.clone()))
        .collect()
}

/// Web results as a context section. Empty input yields an empty string.
pub fn format_web_search_context(results: &[WebSearchResult]) -> String {
    if results.is_empty() {
        return String::new();
    }

    let blocks = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "[Fonte Web {}: {}]\nTítulo: {}\nLink: {}\nResumo: {}",
                i + 1,
                r.source,
                r.title,
                r.link,
                r.snippet
            )
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR);

    format!("{}{}", WEB_CONTEXT_HEADER, blocks)
}

/// `[Web] title` citations with links, deduplicated by link.
pub fn format_web_sources(results: &[WebSearchResult]) -> Vec<Citation> {
    let mut seen = HashSet::new();
    results
        .iter()
        .filter(|r| seen.insert(r.link.as_str()))
        .map(|r| Citation::web(format!("[Web] {}", r.title), r.link.clone()))
        .collect()
}
