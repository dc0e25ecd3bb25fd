//! Error types for the SEI assistant.
//!
//! A single error enum covers configuration, corpus loading, the model
//! provider boundary, the web-search boundary, prompts, and serialization.
//! Provider and search errors never carry raw transport text: the
//! implementations log the detail and return a typed kind.

use thiserror::Error;

/// Unified error type for the SEI assistant.
///
/// All fallible functions return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid configuration (fatal at startup, never raised at query time)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The corpus could not be loaded; the previous index is retained
    #[error("Corpus load error: {0}")]
    CorpusLoad(String),

    /// The language model call failed or timed out
    #[error("Provider error: {0}")]
    Provider(ProviderFailure),

    /// The web-search collaborator failed
    #[error("Web search unavailable: {0}")]
    SearchUnavailable(String),

    /// Prompt definition and rendering errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Why a model invocation failed.
///
/// The display text is safe to show to an operator: it never contains
/// endpoints, response bodies, or credentials.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFailure {
    #[error("model provider is not configured")]
    NotConfigured,

    #[error("model provider is unreachable")]
    Unreachable,

    #[error("model provider timed out")]
    Timeout,

    #[error("model provider rejected the request (HTTP {status})")]
    Rejected { status: u16 },

    #[error("model provider returned a malformed response")]
    MalformedResponse,

    #[error("model provider returned an empty response")]
    EmptyResponse,
}

/// Shown when the model call fails for any reason other than configuration.
pub const PROVIDER_APOLOGY: &str =
    "⚠️ **Erro ao processar sua pergunta.**\n\nOcorreu um erro inesperado. Por favor, tente novamente em alguns instantes.";

/// Shown when no model provider credentials are available.
pub const PROVIDER_NOT_CONFIGURED: &str =
    "⚠️ **Configuração de IA não encontrada.**\n\nO serviço de inteligência artificial não está configurado corretamente. Contate o administrador do sistema.";

impl AppError {
    /// Fixed, user-facing text for this error.
    ///
    /// The calling layer renders this instead of the `Display` output.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Provider(ProviderFailure::NotConfigured) => PROVIDER_NOT_CONFIGURED,
            AppError::Config(_) => PROVIDER_NOT_CONFIGURED,
            _ => PROVIDER_APOLOGY,
        }
    }

    /// Whether this error came from the model provider boundary.
    pub fn is_provider(&self) -> bool {
        matches!(self, AppError::Provider(_))
    }
}

impl From<ProviderFailure> for AppError {
    fn from(failure: ProviderFailure) -> Self {
        AppError::Provider(failure)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_display_hides_detail() {
        let err = AppError::from(ProviderFailure::Rejected { status: 503 });
        assert_eq!(
            err.to_string(),
            "Provider error: model provider rejected the request (HTTP 503)"
        );
        assert!(err.is_provider());
    }

    #[test]
    fn test_user_message_for_provider_failures() {
        assert_eq!(
            AppError::Provider(ProviderFailure::Timeout).user_message(),
            PROVIDER_APOLOGY
        );
        assert_eq!(
            AppError::Provider(ProviderFailure::NotConfigured).user_message(),
            PROVIDER_NOT_CONFIGURED
        );
    }

    #[test]
    fn test_yaml_error_converts() {
        let err: AppError = serde_yaml::from_str::<Vec<u32>>("{").unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
