//! System prompt rendering.

use crate::types::{PromptDefinition, SystemPromptVars};
use assist_core::{AppError, AppResult};
use handlebars::Handlebars;

const TEMPLATE_NAME: &str = "system";

/// A system prompt whose template has been compiled.
///
/// Compiling happens once, when the prompt is loaded, so a malformed
/// template fails at startup instead of on every question.
#[derive(Clone)]
pub struct SystemPrompt {
    definition: PromptDefinition,
    registry: Handlebars<'static>,
}

impl SystemPrompt {
    /// Compile `definition`'s template.
    ///
    /// # Errors
    /// `AppError::Prompt` when the template is not valid Handlebars.
    pub fn compile(definition: PromptDefinition) -> AppResult<Self> {
        let registry = compile_template(&definition.template)?;
        Ok(Self {
            definition,
            registry,
        })
    }

    pub fn definition(&self) -> &PromptDefinition {
        &self.definition
    }

    pub fn disclosure(&self) -> &str {
        &self.definition.disclosure
    }

    pub fn refusal(&self) -> &str {
        &self.definition.refusal
    }

    /// Render with the current corpus and allow-list.
    ///
    /// The template sees `documents`, `allowedDomains`, `disclosure`, and
    /// `refusal`.
    pub fn render(&self, vars: &SystemPromptVars) -> AppResult<String> {
        tracing::debug!(
            "Rendering system prompt '{}' ({} documents)",
            self.definition.id,
            vars.documents.len()
        );

        let data = serde_json::json!({
            "documents": vars.documents,
            "allowedDomains": vars.allowed_domains,
            "disclosure": self.definition.disclosure,
            "refusal": self.definition.refusal,
        });

        self.registry
            .render(TEMPLATE_NAME, &data)
            .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
    }
}

/// Compile and render a definition in one step.
///
/// # Example
/// ```no_run
/// use assist_prompt::{default_system_prompt, render_system_prompt, SystemPromptVars};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let vars = SystemPromptVars {
///     documents: vec!["Manual do Usuário SEI 4.0".to_string()],
///     allowed_domains: vec!["gov.br".to_string()],
/// };
/// let system = render_system_prompt(&default_system_prompt(), &vars)?;
/// println!("{}", system);
/// # Ok(())
/// # }
/// ```
pub fn render_system_prompt(
    definition: &PromptDefinition,
    vars: &SystemPromptVars,
) -> AppResult<String> {
    SystemPrompt::compile(definition.clone())?.render(vars)
}

/// Register `template` in a fresh registry.
pub(crate) fn compile_template(template: &str) -> AppResult<Handlebars<'static>> {
    let mut handlebars = Handlebars::new();

    // Plain text output, no HTML escaping
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string(TEMPLATE_NAME, template)
        .map_err(|e| AppError::Prompt(format!("Invalid prompt template: {}", e)))?;

    Ok(handlebars)
}
