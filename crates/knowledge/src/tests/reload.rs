//! Reload while answering: readers see one whole generation.

use super::*;
use crate::rag::AnswerState;

fn write_version(corpus: &MemoryCorpus, version: usize) {
    corpus.insert(
        "alpha.txt",
        format!("Alpha: como assinar documento. marcador-v{}", version),
    );
    corpus.insert(
        "beta.txt",
        format!("Beta: assinar documento em lote. marcador-v{}", version),
    );
}

fn markers(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter(|w| w.starts_with("marcador-v"))
        .collect()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_answers_never_mix_generations() {
    let corpus = Arc::new(MemoryCorpus::new());
    write_version(&corpus, 0);
    let store = store_over(Arc::clone(&corpus), &[]);
    let assistant = Arc::new(assistant(store, ScriptedLlm::new(Reply::EchoContext)));

    let writer = {
        let assistant = Arc::clone(&assistant);
        let corpus = Arc::clone(&corpus);
        tokio::spawn(async move {
            for version in 1..=30 {
                write_version(&corpus, version % 2);
                assistant.reload_corpus().await.unwrap();
            }
        })
    };

    let mut readers = Vec::new();
    for _ in 0..4 {
        let assistant = Arc::clone(&assistant);
        readers.push(tokio::spawn(async move {
            for _ in 0..50 {
                let result = assistant
                    .answer_question("assinar documento", &[])
                    .await
                    .unwrap();
                assert_eq!(result.state, AnswerState::AnsweredLocal);

                let seen = markers(&result.response);
                assert_eq!(seen.len(), 2, "both documents retrieved: {:?}", seen);
                assert_eq!(seen[0], seen[1], "mixed generations: {:?}", seen);
                tokio::task::yield_now().await;
            }
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    assert_eq!(assistant.store().stats().generation, 31);
}

#[test]
fn test_snapshot_survives_reload() {
    let corpus = Arc::new(MemoryCorpus::new());
    write_version(&corpus, 1);
    let store = store_over(Arc::clone(&corpus), &[]);

    let held = store.snapshot();
    write_version(&corpus, 2);
    corpus.remove("beta.txt");
    store.reload().unwrap();

    assert_eq!(held.documents().len(), 2);
    assert!(held.chunks().iter().all(|c| c.content.contains("marcador-v1")));
    let current = store.snapshot();
    assert_eq!(current.documents().len(), 1);
    assert!(current.chunks()[0].content.contains("marcador-v2"));
    assert!(current.generation() > held.generation());
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_index() {
    let corpus = Arc::new(MemoryCorpus::new());
    write_version(&corpus, 1);
    let store = store_over(Arc::clone(&corpus), &[]);
    let assistant = assistant(Arc::clone(&store), ScriptedLlm::text("ok"));
    let before = store.stats();

    corpus.clear();
    corpus.insert_unreadable("alpha.txt");
    corpus.insert_unreadable("beta.txt");

    let err = assistant.reload_corpus().await.unwrap_err();
    assert!(matches!(err, AppError::CorpusLoad(_)));

    let after = store.stats();
    assert_eq!(after.generation, before.generation);
    assert_eq!(after.chunks, before.chunks);
    assert_eq!(assistant.peek_search("assinar documento", 5).len(), 2);
}

#[test]
fn test_partial_reload_skips_unreadable() {
    let corpus = Arc::new(MemoryCorpus::new());
    write_version(&corpus, 1);
    let store = store_over(Arc::clone(&corpus), &[]);

    corpus.insert_unreadable("beta.txt");
    let stats = store.reload().unwrap();

    assert_eq!(stats.documents, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(store.documents()[0].title, "alpha");
}
