//! Runtime wiring: content loading, workers, presence and shutdown.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use cultivation_content::ContentFactory;
use cultivation_core::{CharacterSnapshot, EngineConfig, Timestamp};
use cultivation_runtime::{
    DocumentStore, GameEvent, InMemoryDocumentStore, ManualClock, PresenceEvent, PresenceInfo,
    Repositories, Runtime, RuntimeConfig, RuntimeError, Topic,
};
use tempfile::TempDir;

fn clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Timestamp::from_secs(10_000)))
}

async fn bundled_runtime(
    store: Arc<dyn DocumentStore>,
    clock: Arc<ManualClock>,
    config: RuntimeConfig,
) -> Runtime {
    Runtime::builder()
        .config(config)
        .store(store)
        .clock(clock)
        .build()
        .await
        .unwrap()
}

#[tokio::test]
async fn builder_requires_a_store() {
    let result = Runtime::builder()
        .engine(EngineConfig::default())
        .build()
        .await;
    assert!(matches!(result, Err(RuntimeError::MissingStore)));
}

#[tokio::test]
async fn bundled_content_is_loaded_by_default() {
    let runtime = bundled_runtime(
        Arc::new(InMemoryDocumentStore::new()),
        clock(),
        RuntimeConfig::default(),
    )
    .await;

    assert!(runtime.trials().catalog().get("bandit_camp").is_some());
    assert_eq!(runtime.engine().combat.max_turns, 10);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn content_dir_and_overrides_apply() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(ContentFactory::BALANCE_FILE),
        "[combat]\nmax_turns = 3\n\n[flush]\namount_threshold = 500\n",
    )
    .unwrap();
    let bundled = ContentFactory::bundled();
    fs::copy(
        bundled.data_dir().join(ContentFactory::TRIALS_FILE),
        dir.path().join(ContentFactory::TRIALS_FILE),
    )
    .unwrap();

    let config = RuntimeConfig {
        content_dir: Some(dir.path().to_path_buf()),
        flush_interval_secs: Some(30),
        ..RuntimeConfig::default()
    };
    let runtime = bundled_runtime(Arc::new(InMemoryDocumentStore::new()), clock(), config).await;
    assert_eq!(runtime.engine().combat.max_turns, 3);
    assert_eq!(runtime.engine().flush.amount_threshold, 500);
    assert_eq!(runtime.engine().flush.interval_secs, 30);

    let overridden = RuntimeConfig {
        content_dir: Some(dir.path().to_path_buf()),
        combat_max_turns: Some(6),
        ..RuntimeConfig::default()
    };
    let runtime = bundled_runtime(Arc::new(InMemoryDocumentStore::new()), clock(), overridden).await;
    assert_eq!(runtime.engine().combat.max_turns, 6);
}

#[tokio::test]
async fn missing_content_is_a_content_error() {
    let dir = TempDir::new().unwrap();
    let result = Runtime::builder()
        .config(RuntimeConfig {
            content_dir: Some(dir.path().to_path_buf()),
            ..RuntimeConfig::default()
        })
        .store(Arc::new(InMemoryDocumentStore::new()))
        .build()
        .await;
    assert!(matches!(result, Err(RuntimeError::Content(_))));
}

#[tokio::test]
async fn presence_lapses_and_is_announced() {
    let clock = clock();
    let runtime = bundled_runtime(
        Arc::new(InMemoryDocumentStore::new()),
        clock.clone(),
        RuntimeConfig::default(),
    )
    .await;
    let mut presence = runtime.subscribe(Topic::Presence);

    runtime.heartbeat(PresenceInfo {
        character_id: "c1".into(),
        name: "Lin".into(),
        activity: "cultivating".into(),
    });
    assert_eq!(runtime.online().len(), 1);

    clock.advance(Duration::from_secs(30));
    assert_eq!(runtime.sweep_presence(), 0);

    clock.advance(Duration::from_secs(31));
    assert!(runtime.online().is_empty());
    assert_eq!(runtime.sweep_presence(), 1);
    assert_eq!(
        presence.recv().await.unwrap(),
        GameEvent::Presence(PresenceEvent::Expired { key: "c1".into() })
    );
}

#[tokio::test]
async fn flush_worker_persists_due_progress() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let repos = Repositories::new(store.clone());
    let clock = clock();
    let config = RuntimeConfig {
        flush_tick: Duration::from_millis(100),
        ..RuntimeConfig::default()
    };
    let runtime = bundled_runtime(store, clock.clone(), config).await;
    runtime
        .create_character(&CharacterSnapshot::new("c1", "Lin", 1))
        .await
        .unwrap();

    clock.advance(Duration::from_secs(10));
    assert_eq!(runtime.character("c1").await.unwrap().unwrap().qi, 10);
    clock.advance(Duration::from_secs(10));

    tokio::time::sleep(Duration::from_millis(400)).await;
    let stored = repos.characters.get("c1").await.unwrap().unwrap().value;
    assert_eq!(stored.qi, 10);
    runtime.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_writes_pending_progress() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let repos = Repositories::new(store.clone());
    let clock = clock();
    let runtime = bundled_runtime(store, clock.clone(), RuntimeConfig::default()).await;
    runtime
        .create_character(&CharacterSnapshot::new("c1", "Lin", 1))
        .await
        .unwrap();

    clock.advance(Duration::from_secs(7));
    runtime.character("c1").await.unwrap();
    assert_eq!(runtime.progression().pending_count(), 1);

    assert_eq!(runtime.shutdown().await.unwrap(), 1);
    let stored = repos.characters.get("c1").await.unwrap().unwrap().value;
    assert_eq!(stored.qi, 7);
}
