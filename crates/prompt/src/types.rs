//! Prompt types for the SEI assistant.

use serde::{Deserialize, Serialize};

/// Sentence that must open every answer grounded on web results.
pub const DEFAULT_DISCLOSURE: &str =
    "Esta informação não consta no manual interno, mas localizei na legislação externa:";

/// Fixed answer when neither the corpus nor the allow-listed web has support.
pub const DEFAULT_REFUSAL: &str =
    "Não encontrei base documental segura para orientar sobre este caso específico.";

/// A system prompt definition loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    /// Unique prompt identifier
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// API version for schema evolution
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Creator identifier
    #[serde(rename = "createdBy", default)]
    pub created_by: String,

    /// Handlebars template for the system instructions
    pub template: String,

    /// Disclosure sentence prepended to web-grounded answers
    #[serde(default = "default_disclosure")]
    pub disclosure: String,

    /// Refusal returned when no grounding exists
    #[serde(default = "default_refusal")]
    pub refusal: String,
}

fn default_disclosure() -> String {
    DEFAULT_DISCLOSURE.to_string()
}

fn default_refusal() -> String {
    DEFAULT_REFUSAL.to_string()
}

/// Values substituted into a system prompt template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemPromptVars {
    /// Titles of the documents currently in the corpus
    pub documents: Vec<String>,

    /// Hostnames the web fallback may draw from
    #[serde(rename = "allowedDomains")]
    pub allowed_domains: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_definition_deserialization() {
        let yaml = r#"
id: assistant.system
title: Assistente SEI
apiVersion: "1.0"
createdBy: test
template: "Documentos: {{#each documents}}{{this}} {{/each}}"
"#;

        let def: PromptDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.id, "assistant.system");
        assert_eq!(def.disclosure, DEFAULT_DISCLOSURE);
        assert_eq!(def.refusal, DEFAULT_REFUSAL);
    }

    #[test]
    fn test_vars_serialize_camel_case_domains() {
        let vars = SystemPromptVars {
            documents: vec!["Cartilha do Usuário SEI".to_string()],
            allowed_domains: vec!["gov.br".to_string()],
        };
        let json = serde_json::to_value(&vars).unwrap();
        assert_eq!(json["allowedDomains"][0], "gov.br");
    }
}
