//! Knowledge base configuration management.

use assist_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Retrieval and answering settings, loaded from `.assist/knowledge.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// Directory holding the corpus, relative to the workspace
    pub corpus_dir: PathBuf,

    /// File extensions (without dot) considered corpus documents
    pub extensions: Vec<String>,

    /// Chunk size in characters
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks
    pub chunk_overlap: usize,

    /// Maximum number of local results fed to the model
    pub top_k: usize,

    /// Trailing conversation turns included in the prompt
    pub history_window: usize,

    /// Filename to title overrides, merged over the built-in titles
    pub titles: HashMap<String, String>,

    pub scoring: ScoringWeights,

    pub web: WebSearchConfig,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("knowledge-base"),
            extensions: vec!["txt".to_string()],
            chunk_size: 2000,
            chunk_overlap: 200,
            top_k: 5,
            history_window: 6,
            titles: HashMap::new(),
            scoring: ScoringWeights::default(),
            web: WebSearchConfig::default(),
        }
    }
}

/// Weights of the lexical scorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Added when the chunk contains the whole query
    pub exact_phrase_bonus: u32,

    /// Added per occurrence of a query token
    pub token_occurrence_weight: u32,

    /// Added per domain term present in both query and chunk
    pub domain_term_bonus: u32,

    pub domain_terms: Vec<String>,

    /// Query tokens shorter than this are ignored
    pub min_token_len: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_phrase_bonus: 10,
            token_occurrence_weight: 1,
            domain_term_bonus: 2,
            domain_terms: [
                "sei",
                "processo",
                "documento",
                "tramitar",
                "assinar",
                "anexar",
                "sdp",
                "prestação",
                "contas",
            ]
            .iter()
            .map(|t| t.to_string())
            .collect(),
            min_token_len: 3,
        }
    }
}

/// Web search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebProvider {
    DuckDuckGo,
    Google,
}

/// Restricted web fallback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebSearchConfig {
    pub enabled: bool,

    pub provider: WebProvider,

    pub max_results: usize,

    /// Hostnames a web result may come from (subdomains included)
    pub allowed_domains: Vec<String>,

    /// Environment variable holding the Google API key
    pub api_key_env: String,

    /// Environment variable holding the Google search engine id
    pub engine_id_env: String,

    pub timeout_secs: u64,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: WebProvider::DuckDuckGo,
            max_results: 5,
            allowed_domains: [
                "gov.br",
                "rio.rj.gov.br",
                "planalto.gov.br",
                "alerj.rj.gov.br",
                "camara.leg.br",
                "senado.leg.br",
                "tcu.gov.br",
                "cgu.gov.br",
                "educacao.rj.gov.br",
                "sme.rio.rj.gov.br",
            ]
            .iter()
            .map(|d| d.to_string())
            .collect(),
            api_key_env: "GOOGLE_SEARCH_API_KEY".to_string(),
            engine_id_env: "GOOGLE_SEARCH_ENGINE_ID".to_string(),
            timeout_secs: 10,
        }
    }
}

impl KnowledgeBaseConfig {
    /// Absolute corpus directory for `workspace`.
    pub fn corpus_path(&self, workspace: &Path) -> PathBuf {
        if self.corpus_dir.is_absolute() {
            self.corpus_dir.clone()
        } else {
            workspace.join(&self.corpus_dir)
        }
    }

    /// Reject settings that cannot work at query time.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunk_size == 0 {
            return Err(AppError::Config("chunk_size must be positive".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(AppError::Config("top_k must be positive".to_string()));
        }
        Ok(())
    }
}

/// Get the path to the knowledge config file.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".assist").join("knowledge.yaml")
}

/// Load knowledge base configuration.
///
/// Loads from `.assist/knowledge.yaml` if it exists, otherwise returns the
/// defaults. The result is validated either way.
pub fn load_config(workspace: &Path) -> AppResult<KnowledgeBaseConfig> {
    let config_path = get_config_path(workspace);

    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path).map_err(|e| {
            AppError::Config(format!("Failed to read config at {:?}: {}", config_path, e))
        })?;

        let config: KnowledgeBaseConfig = serde_yaml::from_str(&content).map_err(|e| {
            AppError::Config(format!("Failed to parse config at {:?}: {}", config_path, e))
        })?;

        tracing::debug!("Loaded knowledge config from {:?}", config_path);
        config
    } else {
        tracing::debug!("Using default knowledge config (no config file found)");
        KnowledgeBaseConfig::default()
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) {
        let assist = dir.join(".assist");
        fs::create_dir_all(&assist).unwrap();
        fs::write(assist.join("knowledge.yaml"), content).unwrap();
    }

    #[test]
    fn test_load_default_config() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path()).unwrap();

        assert_eq!(config.chunk_size, 2000);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.history_window, 6);
        assert_eq!(config.scoring.exact_phrase_bonus, 10);
        assert_eq!(config.scoring.domain_terms.len(), 9);
        assert_eq!(config.web.allowed_domains.len(), 10);
        assert_eq!(
            config.corpus_path(temp.path()),
            temp.path().join("knowledge-base")
        );
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            r#"
chunk_size: 800
scoring:
  exact_phrase_bonus: 25
web:
  provider: google
  allowed_domains: ["tcm.rj.gov.br"]
titles:
  notas.txt: Notas Técnicas
"#,
        );

        let config = load_config(temp.path()).unwrap();
        assert_eq!(config.chunk_size, 800);
        assert_eq!(config.chunk_overlap, 200);
        assert_eq!(config.scoring.exact_phrase_bonus, 25);
        assert_eq!(config.scoring.domain_term_bonus, 2);
        assert_eq!(config.web.provider, WebProvider::Google);
        assert_eq!(config.web.allowed_domains, vec!["tcm.rj.gov.br"]);
        assert_eq!(config.titles["notas.txt"], "Notas Técnicas");
    }

    #[test]
    fn test_overlap_not_below_size_is_config_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "chunk_size: 100\nchunk_overlap: 100\n");

        assert!(matches!(load_config(temp.path()), Err(AppError::Config(_))));
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "chunk_size: [not, a, number]\n");

        assert!(matches!(load_config(temp.path()), Err(AppError::Config(_))));
    }
}
