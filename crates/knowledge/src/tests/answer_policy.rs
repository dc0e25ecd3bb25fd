//! Tiered answer policy: local corpus, restricted web, refusal.

use super::*;
use crate::rag::sources::format_sources;
use crate::rag::{AnswerState, Citation, NO_CONTEXT_FOUND};
use crate::types::ConversationTurn;
use assist_core::PROVIDER_APOLOGY;
use assist_llm::Role;
use assist_prompt::{DEFAULT_DISCLOSURE, DEFAULT_REFUSAL};

const MANUAL_TEXT: &str = "Para assinar um documento no SEI, clique em Assinar.";

fn manual_store() -> Arc<KnowledgeStore> {
    let corpus = Arc::new(MemoryCorpus::with_documents([("manual.txt", MANUAL_TEXT)]));
    store_over(corpus, &[("manual.txt", "Manual SEI")])
}

fn empty_store() -> Arc<KnowledgeStore> {
    store_over(Arc::new(MemoryCorpus::new()), &[])
}

fn planalto_result() -> WebSearchResult {
    WebSearchResult::new(
        "Lei 14.133/2021",
        "https://www.planalto.gov.br/ccivil_03/_ato2019-2022/2021/lei/l14133.htm",
        "Lei de Licitações e Contratos Administrativos.",
    )
}

#[test]
fn test_local_retrieval_cites_section() {
    let store = manual_store();
    let results = store.search("como assinar documento", 5);

    assert_eq!(results.len(), 1);
    assert!(results[0].score > 0);
    // "assinar" twice, "documento" once, two domain terms present
    assert_eq!(results[0].score, 3 + 2 * 2);
    assert_eq!(results[0].chunk.content, MANUAL_TEXT);

    assert_eq!(
        format_sources(&results),
        vec![Citation::local("Manual SEI", Some("Parte 1".to_string()))]
    );
}

#[tokio::test]
async fn test_local_hit_answers_without_web() {
    let llm = ScriptedLlm::text("Clique em Assinar no menu do processo.");
    let web = CannedWeb::returning(vec![planalto_result()]);
    let assistant = assistant(manual_store(), Arc::clone(&llm)).with_web_search(web.clone(), allow_list());

    let result = assistant
        .answer_question("como assinar documento", &[])
        .await
        .unwrap();

    assert_eq!(result.state, AnswerState::AnsweredLocal);
    assert_eq!(result.trail, vec![AnswerState::LocalLookup, AnswerState::AnsweredLocal]);
    assert!(!result.used_web_search);
    assert_eq!(result.response, "Clique em Assinar no menu do processo.");
    assert_eq!(
        result.sources,
        vec![Citation::local("Manual SEI", Some("Parte 1".to_string()))]
    );
    assert_eq!(llm.calls(), 1);
    assert_eq!(web.calls(), 0);

    let request = llm.last_request().unwrap();
    let context = &request.messages[1].content;
    assert!(context.starts_with("Contexto relevante da base de conhecimento:"));
    assert!(context.contains("[Fonte 1: Manual SEI - Parte 1]"));
    assert_eq!(request.messages.last().unwrap().content, "como assinar documento");
}

#[tokio::test]
async fn test_web_fallback_discloses_external_source() {
    let llm = ScriptedLlm::text("O prazo é definido na Lei 14.133.");
    let web = CannedWeb::returning(vec![planalto_result()]);
    let assistant = assistant(empty_store(), Arc::clone(&llm)).with_web_search(web.clone(), allow_list());

    let result = assistant
        .answer_question("qual o prazo de recurso em licitação", &[])
        .await
        .unwrap();

    assert_eq!(result.state, AnswerState::AnsweredWeb);
    assert_eq!(
        result.trail,
        vec![
            AnswerState::LocalLookup,
            AnswerState::WebFallback,
            AnswerState::AnsweredWeb
        ]
    );
    assert!(result.used_web_search);
    assert!(result.response.starts_with(DEFAULT_DISCLOSURE));
    assert!(result.response.ends_with("O prazo é definido na Lei 14.133."));
    assert_eq!(
        result.sources,
        vec![Citation::web(
            "[Web] Lei 14.133/2021",
            "https://www.planalto.gov.br/ccivil_03/_ato2019-2022/2021/lei/l14133.htm"
        )]
    );
    assert_eq!(web.calls(), 1);
    assert_eq!(llm.calls(), 1);

    let request = llm.last_request().unwrap();
    assert!(request.messages[1].content.contains(NO_CONTEXT_FOUND));
    assert!(request.messages[1].content.contains("[Fonte Web 1: www.planalto.gov.br]"));
    assert!(request.messages[2].content.contains(DEFAULT_DISCLOSURE));
}

#[tokio::test]
async fn test_no_web_results_refuses_without_model_call() {
    let llm = ScriptedLlm::text("não deveria ser chamado");
    let web = CannedWeb::returning(Vec::new());
    let assistant = assistant(empty_store(), Arc::clone(&llm)).with_web_search(web.clone(), allow_list());

    let result = assistant.answer_question("prazo de recurso", &[]).await.unwrap();

    assert_eq!(result.state, AnswerState::Refused);
    assert_eq!(result.response, DEFAULT_REFUSAL);
    assert!(result.sources.is_empty());
    assert!(!result.used_web_search);
    assert_eq!(web.calls(), 1);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_out_of_allow_list_results_refuse() {
    let llm = ScriptedLlm::text("não deveria ser chamado");
    let web = CannedWeb::returning(vec![
        WebSearchResult::new("Blog", "https://example.com/licitacao", "Opinião."),
        WebSearchResult::new("Imitação", "https://gov.br.example.com/lei", "Domínio falso."),
    ]);
    let assistant = assistant(empty_store(), Arc::clone(&llm)).with_web_search(web, allow_list());

    let result = assistant.answer_question("prazo de recurso", &[]).await.unwrap();

    assert_eq!(result.state, AnswerState::Refused);
    assert_eq!(result.response, DEFAULT_REFUSAL);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_allowed_result_behind_off_domain_ones_is_used() {
    let llm = ScriptedLlm::text("Conforme a Lei 14.133.");
    let mut results: Vec<_> = (0..5)
        .map(|i| {
            WebSearchResult::new(
                format!("Blog {}", i),
                format!("https://blog{}.example.com/lei", i),
                "Opinião.",
            )
        })
        .collect();
    results.push(planalto_result());
    let assistant = assistant(empty_store(), Arc::clone(&llm))
        .with_web_search(CannedWeb::returning(results), allow_list());

    let result = assistant.answer_question("lei de licitações", &[]).await.unwrap();

    assert_eq!(result.state, AnswerState::AnsweredWeb);
    assert_eq!(result.sources.len(), 1);
    assert_eq!(llm.calls(), 1);
}

#[tokio::test]
async fn test_search_failure_is_treated_as_no_results() {
    let llm = ScriptedLlm::text("não deveria ser chamado");
    let web = CannedWeb::failing();
    let assistant = assistant(empty_store(), Arc::clone(&llm)).with_web_search(web.clone(), allow_list());

    let result = assistant.answer_question("prazo de recurso", &[]).await.unwrap();

    assert_eq!(
        result.trail,
        vec![
            AnswerState::LocalLookup,
            AnswerState::WebFallback,
            AnswerState::Refused
        ]
    );
    assert_eq!(result.response, DEFAULT_REFUSAL);
    assert_eq!(web.calls(), 1);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_without_web_search_local_miss_refuses() {
    let llm = ScriptedLlm::text("não deveria ser chamado");
    let assistant = assistant(manual_store(), Arc::clone(&llm));

    let result = assistant.answer_question("férias escolares", &[]).await.unwrap();

    assert_eq!(result.state, AnswerState::Refused);
    assert_eq!(llm.calls(), 0);
}

#[tokio::test]
async fn test_provider_failure_propagates() {
    let llm = ScriptedLlm::new(Reply::Fail(ProviderFailure::Timeout));
    let assistant = assistant(manual_store(), Arc::clone(&llm));

    let err = assistant
        .answer_question("como assinar documento", &[])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Provider(ProviderFailure::Timeout)));
    assert_eq!(err.user_message(), PROVIDER_APOLOGY);
}

#[tokio::test]
async fn test_history_window_keeps_latest_turns() {
    let llm = ScriptedLlm::text("ok");
    let policy = AnswerPolicy {
        history_window: 2,
        ..AnswerPolicy::default()
    };
    let assistant = Assistant::new(manual_store(), llm.clone(), system_prompt(), policy);

    let history = vec![
        ConversationTurn::user("primeira pergunta"),
        ConversationTurn::assistant("primeira resposta"),
        ConversationTurn::user("segunda pergunta"),
        ConversationTurn::assistant("segunda resposta"),
    ];
    assistant
        .answer_question("como assinar documento", &history)
        .await
        .unwrap();

    let request = llm.last_request().unwrap();
    let conversation: Vec<(Role, &str)> = request
        .messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| (m.role, m.content.as_str()))
        .collect();

    assert_eq!(
        conversation,
        vec![
            (Role::User, "segunda pergunta"),
            (Role::Assistant, "segunda resposta"),
            (Role::User, "como assinar documento"),
        ]
    );
}

#[tokio::test]
async fn test_answer_serializes_to_wire_shape() {
    let assistant = assistant(empty_store(), ScriptedLlm::text("ok"));
    let result = assistant.answer_question("prazo", &[]).await.unwrap();

    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({
            "response": DEFAULT_REFUSAL,
            "sources": [],
            "usedWebSearch": false
        })
    );
}
