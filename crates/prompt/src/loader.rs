//! Prompt loader for YAML prompt definitions.

use crate::builder::{compile_template, SystemPrompt};
use crate::defaults::default_system_prompt;
use crate::types::PromptDefinition;
use assist_core::{AppError, AppResult};
use std::path::{Path, PathBuf};

fn prompts_dir(workspace_path: &Path) -> PathBuf {
    workspace_path.join(".assist/prompts")
}

/// Load a prompt definition by ID from the workspace.
///
/// Searches for `<id>.yml` in `.assist/prompts/`.
///
/// # Example
/// ```no_run
/// use assist_prompt::load_prompt;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let prompt = load_prompt(Path::new("."), "assistant.system")?;
/// println!("Loaded prompt: {}", prompt.title);
/// # Ok(())
/// # }
/// ```
pub fn load_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<PromptDefinition> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));

    tracing::debug!("Loading prompt from: {:?}", prompt_file);

    if !prompt_file.exists() {
        return Err(AppError::Prompt(format!(
            "Prompt file not found: {:?}",
            prompt_file
        )));
    }

    let contents = std::fs::read_to_string(&prompt_file).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to read prompt file {:?}: {}",
            prompt_file, e
        ))
    })?;

    let definition: PromptDefinition = serde_yaml::from_str(&contents).map_err(|e| {
        AppError::Prompt(format!(
            "Failed to parse prompt YAML {:?}: {}",
            prompt_file, e
        ))
    })?;

    validate_prompt(&definition)?;

    tracing::info!("Loaded prompt: {} ({})", definition.id, definition.title);

    Ok(definition)
}

/// Load and compile the workspace's system prompt, or the built-in one
/// when the workspace does not override it.
///
/// A present but invalid override is an error, not a silent fallback.
pub fn load_system_prompt(workspace_path: &Path, prompt_id: &str) -> AppResult<SystemPrompt> {
    let prompt_file = prompts_dir(workspace_path).join(format!("{}.yml", prompt_id));
    let definition = if prompt_file.exists() {
        load_prompt(workspace_path, prompt_id)?
    } else {
        tracing::debug!("No override for '{}', using built-in prompt", prompt_id);
        default_system_prompt()
    };
    SystemPrompt::compile(definition)
}

/// List all available prompt IDs in the workspace.
pub fn list_prompts(workspace_path: &Path) -> AppResult<Vec<String>> {
    let dir = prompts_dir(workspace_path);

    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut prompt_ids = Vec::new();

    for entry in walkdir::WalkDir::new(&dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("yml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                prompt_ids.push(stem.to_string());
            }
        }
    }

    prompt_ids.sort();
    Ok(prompt_ids)
}

/// Validate a prompt definition.
fn validate_prompt(def: &PromptDefinition) -> AppResult<()> {
    if def.id.is_empty() {
        return Err(AppError::Prompt("Prompt ID cannot be empty".to_string()));
    }

    if def.title.is_empty() {
        return Err(AppError::Prompt("Prompt title cannot be empty".to_string()));
    }

    if def.template.is_empty() {
        return Err(AppError::Prompt(
            "Prompt template cannot be empty".to_string(),
        ));
    }

    if def.refusal.trim().is_empty() || def.disclosure.trim().is_empty() {
        return Err(AppError::Prompt(
            "Prompt refusal and disclosure cannot be empty".to_string(),
        ));
    }

    if !def.api_version.contains('.') {
        return Err(AppError::Prompt(format!(
            "Invalid apiVersion format: {}. Expected format: 'x.y'",
            def.api_version
        )));
    }

    compile_template(&def.template)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::SYSTEM_PROMPT_ID;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(dir: &Path, id: &str, content: &str) {
        let prompts = dir.join(".assist/prompts");
        fs::create_dir_all(&prompts).unwrap();
        fs::write(prompts.join(format!("{}.yml", id)), content).unwrap();
    }

    fn valid_yaml(id: &str) -> String {
        format!(
            r#"
id: {}
title: "Assistente de Teste"
apiVersion: "1.0"
template: "Responda com base em: {{{{#each documents}}}}{{{{this}}}}{{{{/each}}}}"
refusal: "Sem base."
"#,
            id
        )
    }

    #[test]
    fn test_load_valid_prompt() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "custom", &valid_yaml("custom"));

        let prompt = load_prompt(temp_dir.path(), "custom").unwrap();
        assert_eq!(prompt.id, "custom");
        assert_eq!(prompt.refusal, "Sem base.");
        assert!(prompt.template.contains("{{#each documents}}"));
    }

    #[test]
    fn test_load_nonexistent_prompt() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_prompt(temp_dir.path(), "nonexistent").is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "invalid", "invalid: yaml: content:");
        assert!(load_prompt(temp_dir.path(), "invalid").is_err());
    }

    #[test]
    fn test_system_prompt_falls_back_to_builtin() {
        let temp_dir = TempDir::new().unwrap();
        let prompt = load_system_prompt(temp_dir.path(), SYSTEM_PROMPT_ID).unwrap();
        assert_eq!(prompt.definition().id, SYSTEM_PROMPT_ID);
        assert_eq!(prompt.definition().created_by, "built-in");
    }

    #[test]
    fn test_system_prompt_override_wins() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), SYSTEM_PROMPT_ID, &valid_yaml(SYSTEM_PROMPT_ID));
        let prompt = load_system_prompt(temp_dir.path(), SYSTEM_PROMPT_ID).unwrap();
        assert_eq!(prompt.definition().title, "Assistente de Teste");
    }

    #[test]
    fn test_malformed_template_fails_at_load() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(
            temp_dir.path(),
            SYSTEM_PROMPT_ID,
            r#"
id: assistant.system
title: "Assistente quebrado"
apiVersion: "1.0"
template: "Docs: {{#each documents}}{{this}}"
"#,
        );

        match load_system_prompt(temp_dir.path(), SYSTEM_PROMPT_ID) {
            Err(AppError::Prompt(msg)) => assert!(msg.contains("Invalid prompt template")),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("malformed template was accepted"),
        }
        assert!(load_prompt(temp_dir.path(), SYSTEM_PROMPT_ID).is_err());
    }

    #[test]
    fn test_list_prompts() {
        let temp_dir = TempDir::new().unwrap();
        write_prompt(temp_dir.path(), "prompt2", &valid_yaml("prompt2"));
        write_prompt(temp_dir.path(), "prompt1", &valid_yaml("prompt1"));

        let prompts = list_prompts(temp_dir.path()).unwrap();
        assert_eq!(prompts, vec!["prompt1".to_string(), "prompt2".to_string()]);
    }
}
