use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use turnloop_core::{
    Describer, Interpretation, Interpreter, LoopRunner, MemoryStore, Prompter, SerializedState,
    StateIdentity, StoreError,
};
use turnloop_logging::{LogFormat, Logger};

/// Echoes the state back and stops once it has been extended `limit` times.
struct Echo {
    limit: usize,
}

#[async_trait]
impl Describer for Echo {
    type Error = StoreError;

    async fn describe(&self, state: &SerializedState) -> Result<String, StoreError> {
        Ok(state.to_string_lossy())
    }
}

#[async_trait]
impl Prompter for Echo {
    type Error = StoreError;

    async fn prompt(&self, description: &str) -> Result<String, StoreError> {
        Ok(format!("{}!", description))
    }
}

#[async_trait]
impl Interpreter for Echo {
    type Error = StoreError;

    async fn interpret(
        &self,
        response: &str,
        _state: &SerializedState,
    ) -> Result<Interpretation, StoreError> {
        let bangs = response.matches('!').count();
        Ok(Interpretation::new(response, bangs < self.limit))
    }
}

fn read_events(logger: &Logger) -> Vec<serde_json::Value> {
    let content = fs::read_to_string(logger.session_path().unwrap()).unwrap();
    content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_session_file_records_each_turn() {
    let dir = TempDir::new().unwrap();
    let identity = StateIdentity::from("echo");
    let store: MemoryStore = MemoryStore::new().with_state("echo", "hi");
    let echo = Echo { limit: 2 };
    let logger = Arc::new(Logger::with_session(LogFormat::Compact, dir.path(), &identity).unwrap());

    LoopRunner::new(&store, &echo, &echo, &echo, &store)
        .with_observer(logger.clone())
        .run(identity.clone())
        .await
        .unwrap();

    assert_eq!(store.get(&identity), Some(SerializedState::from("hi!!")));

    let events = read_events(&logger);
    // loop_started + 2 turns of 6 events + loop_stopped
    assert_eq!(events.len(), 14);
    assert_eq!(events[0]["event"], "loop_started");
    assert_eq!(events[0]["identity"], "echo");
    assert_eq!(events[1]["event"], "turn_started");
    assert_eq!(events[5]["continue_loop"], true);
    assert_eq!(events[11]["continue_loop"], false);
    assert_eq!(events[13]["event"], "loop_stopped");
    assert_eq!(events[13]["turns"], 2);
}

#[tokio::test]
async fn test_session_file_records_failure() {
    let dir = TempDir::new().unwrap();
    let identity = StateIdentity::from("missing");
    let store: MemoryStore = MemoryStore::new();
    let echo = Echo { limit: 1 };
    let logger = Arc::new(Logger::with_session(LogFormat::Json, dir.path(), &identity).unwrap());

    let err = LoopRunner::new(&store, &echo, &echo, &echo, &store)
        .with_observer(logger.clone())
        .run(identity.clone())
        .await
        .unwrap_err();

    assert_eq!(err, StoreError::NotFound(identity));

    let events = read_events(&logger);
    let last = events.last().unwrap();
    assert_eq!(last["event"], "loop_failed");
    assert_eq!(last["stage"], "retrieve");
    assert_eq!(last["turn"], 1);
}
