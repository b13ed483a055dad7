use async_trait::async_trait;

use crate::{SerializedState, StateIdentity};

/// Result of interpreting a response against the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    /// State to store at the end of the turn
    pub state: SerializedState,
    /// Whether another turn should run after this one is stored
    pub continue_loop: bool,
}

impl Interpretation {
    pub fn new(state: impl Into<SerializedState>, continue_loop: bool) -> Self {
        Self {
            state: state.into(),
            continue_loop,
        }
    }

    /// Store `state` and run another turn
    pub fn continue_with(state: impl Into<SerializedState>) -> Self {
        Self::new(state, true)
    }

    /// Store `state` and end the loop
    pub fn stop_with(state: impl Into<SerializedState>) -> Self {
        Self::new(state, false)
    }
}

/// Loads the state for a single turn of the loop
#[async_trait]
pub trait Retriever: Send + Sync {
    type Error: Send;

    async fn retrieve(&self, identity: &StateIdentity) -> Result<SerializedState, Self::Error>;
}

/// Renders a state into a human-presentable description
#[async_trait]
pub trait Describer: Send + Sync {
    type Error: Send;

    async fn describe(&self, state: &SerializedState) -> Result<String, Self::Error>;
}

/// Presents a description to whoever drives the loop and collects a response.
///
/// This is the only capability expected to talk to an external actor, and
/// it may block for as long as that actor takes. Deadlines, if wanted,
/// belong here and surface as an error.
#[async_trait]
pub trait Prompter: Send + Sync {
    type Error: Send;

    async fn prompt(&self, description: &str) -> Result<String, Self::Error>;
}

/// Turns a response and the current state into the next state
#[async_trait]
pub trait Interpreter: Send + Sync {
    type Error: Send;

    async fn interpret(
        &self,
        response: &str,
        state: &SerializedState,
    ) -> Result<Interpretation, Self::Error>;
}

/// Persists a state under its identity
#[async_trait]
pub trait Storer: Send + Sync {
    type Error: Send;

    async fn store(&self, identity: &StateIdentity, state: SerializedState)
        -> Result<(), Self::Error>;
}

/// Groups [`Storer`] and [`Retriever`] for collaborators backed by one store
pub trait StoreRetriever: Storer + Retriever {}

impl<T> StoreRetriever for T where T: Storer + Retriever {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpretation_constructors() {
        let next = Interpretation::continue_with("state1");
        assert!(next.continue_loop);
        assert_eq!(next.state, SerializedState::from("state1"));

        let last = Interpretation::stop_with("state2");
        assert!(!last.continue_loop);
        assert_eq!(last, Interpretation::new("state2", false));
    }
}
