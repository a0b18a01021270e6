//! End-to-end runs of the orchestrator over small in-memory datasets.

use agents::{DescriptionAgent, EmbeddingAgent};
use async_trait::async_trait;
use data_loader::{
    AgeGroup, ChatMessage, Description, Gender, MovieDataset, MovieItem, MovieUser, MusicItem,
    MusicUser, Profile, PromptStyle, UserKey,
};
use indexmap::IndexMap;
use llm_client::{
    ChatCompletion, Choice, ClientError, CompletionService, EmbeddingService, ResponseMessage,
};
use orchestrator::{ProfileOrchestrator, persist};
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Fails any prompt mentioning "Cursed", describes everything else
#[derive(Default)]
struct SelectiveCompletion {
    calls: AtomicUsize,
}

#[async_trait]
impl CompletionService for SelectiveCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ChatCompletion, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = &messages[1].content;
        if prompt.contains("Cursed") {
            return Err(ClientError::Api {
                status: 500,
                body: "model crashed".into(),
            });
        }
        Ok(ChatCompletion::from_text(format!("Profile of {} chars", prompt.len())))
    }
}

#[derive(Default)]
struct CountingEmbedder {
    calls: AtomicUsize,
}

#[async_trait]
impl EmbeddingService for CountingEmbedder {
    async fn embed(&self, text: &str, _model: &str) -> Result<Vec<f32>, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![text.len() as f32, 1.0, -1.0])
    }
}

/// Answers with a choice whose message has no content
struct ContentlessCompletion;

#[async_trait]
impl CompletionService for ContentlessCompletion {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<ChatCompletion, ClientError> {
        Ok(ChatCompletion {
            choices: vec![Choice {
                index: 0,
                message: ResponseMessage {
                    role: None,
                    content: None,
                },
            }],
        })
    }
}

struct FailingEmbedder;

#[async_trait]
impl EmbeddingService for FailingEmbedder {
    async fn embed(&self, _text: &str, _model: &str) -> Result<Vec<f32>, ClientError> {
        Err(ClientError::RateLimited("quota exhausted".into()))
    }
}

fn movie_dataset(titles: &[&str]) -> MovieDataset {
    MovieDataset::from_users(titles.iter().enumerate().map(|(i, title)| {
        let mut user = MovieUser::new(i as u32 + 1, Gender::Male, AgeGroup::from_code(18).unwrap());
        user.rate(MovieItem::new(*title), 4);
        user
    }))
}

fn build_orchestrator(
    completion: Arc<SelectiveCompletion>,
    embedder: Arc<dyn EmbeddingService>,
) -> ProfileOrchestrator {
    ProfileOrchestrator::new(
        DescriptionAgent::new(completion),
        EmbeddingAgent::new(embedder),
    )
}

#[tokio::test]
async fn test_failing_user_does_not_stop_the_run() {
    let completion = Arc::new(SelectiveCompletion::default());
    let embedder = Arc::new(CountingEmbedder::default());
    let mut dataset = movie_dataset(&["Alien (1979)", "Cursed (2005)", "Heat (1995)"]);

    let mut orchestrator = build_orchestrator(completion.clone(), embedder.clone());
    let report = orchestrator.process(dataset.iter_mut()).await;

    let ids: Vec<_> = report.records.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![UserKey::Numeric(1), UserKey::Numeric(3)]);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors["2"].contains("model crashed"));
    assert_eq!(completion.calls.load(Ordering::SeqCst), 3);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);

    // Successful users carry their artifacts, the failed one carries none
    let first = dataset.get(1).unwrap();
    assert!(first.description().is_some());
    assert_eq!(first.embedding().map(<[f32]>::len), Some(3));
    assert!(dataset.get(2).unwrap().description().is_none());

    let dir = tempfile::tempdir().unwrap();
    let summary = persist(&report, dir.path(), "ml-1m").unwrap();
    assert_eq!(summary.record_count, 2);
    assert_eq!(summary.error_count, 1);

    let records: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&summary.results_path).unwrap()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[1]["id"], 3);
    assert_eq!(records[1]["ratings"]["Heat (1995)"], 4);
    assert_eq!(
        records[1]["prompt"],
        "I am a Male of age 18-24 and I rank movies as follows: Heat (1995): 4"
    );

    let errors: IndexMap<String, String> =
        serde_json::from_str(&fs::read_to_string(summary.errors_path.unwrap()).unwrap())
            .unwrap();
    assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["2"]);
}

#[tokio::test]
async fn test_successful_run_writes_no_errors_file() {
    let mut dataset = movie_dataset(&["Alien (1979)", "Heat (1995)"]);
    let mut orchestrator = build_orchestrator(
        Arc::new(SelectiveCompletion::default()),
        Arc::new(CountingEmbedder::default()),
    );

    let report = orchestrator.process(dataset.iter_mut()).await;
    assert!(!report.has_errors());

    let dir = tempfile::tempdir().unwrap();
    let summary = persist(&report, dir.path(), "ml-1m").unwrap();
    assert!(summary.errors_path.is_none());
    assert!(!dir.path().join("ml-1m_errors.json").exists());
    assert!(dir.path().join("ml-1m_description.json").exists());
}

#[tokio::test]
async fn test_test_mode_skips_remote_calls() {
    let completion = Arc::new(SelectiveCompletion::default());
    let embedder = Arc::new(CountingEmbedder::default());
    let mut dataset = movie_dataset(&["Alien (1979)", "Cursed (2005)"]);

    let mut orchestrator = build_orchestrator(completion.clone(), embedder.clone()).with_test_mode(true);
    let report = orchestrator.process(dataset.iter_mut()).await;

    assert_eq!(report.records.len(), 2);
    assert!(report.errors.is_empty());
    assert_eq!(completion.calls.load(Ordering::SeqCst), 0);
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);

    let record = &report.records[0];
    assert!(record.embedding.is_none());
    match &record.description {
        Description::Prompt(messages) => assert_eq!(messages[1].content, record.prompt),
        other => panic!("expected prompt description, got {:?}", other),
    }
}

#[tokio::test]
async fn test_embedding_failure_is_recorded() {
    let mut dataset = movie_dataset(&["Alien (1979)"]);
    let mut orchestrator = build_orchestrator(
        Arc::new(SelectiveCompletion::default()),
        Arc::new(FailingEmbedder),
    );

    let report = orchestrator.process(dataset.iter_mut()).await;

    assert!(report.records.is_empty());
    assert!(report.errors["1"].contains("quota exhausted"));
    // Nothing is attached to a user that did not make it through
    assert!(dataset.get(1).unwrap().description().is_none());
    assert!(dataset.get(1).unwrap().embedding().is_none());
}

#[tokio::test]
async fn test_missing_description_text_is_recorded() {
    let embedder = Arc::new(CountingEmbedder::default());
    let mut dataset = movie_dataset(&["Alien (1979)"]);
    let mut orchestrator = ProfileOrchestrator::new(
        DescriptionAgent::new(Arc::new(ContentlessCompletion)),
        EmbeddingAgent::new(embedder.clone()),
    );

    let report = orchestrator.process(dataset.iter_mut()).await;

    assert!(report.records.is_empty());
    assert_eq!(
        report.errors["1"],
        "Completion service returned no description text"
    );
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert!(dataset.get(1).unwrap().description().is_none());
}

#[tokio::test]
async fn test_limit_stops_early() {
    let completion = Arc::new(SelectiveCompletion::default());
    let mut dataset = movie_dataset(&["A (2000)", "B (2000)", "C (2000)"]);

    let mut orchestrator =
        build_orchestrator(completion.clone(), Arc::new(CountingEmbedder::default())).with_limit(Some(2));
    let report = orchestrator.process(dataset.iter_mut()).await;

    assert_eq!(report.records.len(), 2);
    assert_eq!(completion.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_music_users_keep_text_ids() {
    let mut users = vec![MusicUser::new("A2SUAM1J3GNN3B", PromptStyle::Grouped)];
    users[0].add(
        MusicItem::new("0001393774", "Songs of Faith", "['Gospel']", "Various", "CD").unwrap(),
        5,
        100,
    );

    let mut orchestrator = build_orchestrator(
        Arc::new(SelectiveCompletion::default()),
        Arc::new(CountingEmbedder::default()),
    );
    let report = orchestrator.process(users.iter_mut()).await;

    let record = &report.records[0];
    assert_eq!(record.id, UserKey::Text("A2SUAM1J3GNN3B".into()));
    assert_eq!(
        record.prompt,
        "I found following items excellent and rate theme five of five: Songs of Faith of Various in Gospel category. "
    );

    let value = serde_json::to_value(record).unwrap();
    assert_eq!(value["id"], "A2SUAM1J3GNN3B");
    let key = value["ratings"].as_object().unwrap().keys().next().unwrap().clone();
    assert!(key.contains("\"id\":\"1393774\""));
}
