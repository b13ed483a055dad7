use async_trait::async_trait;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::{Retriever, SerializedState, StateIdentity, Storer};

/// Errors raised by [`MemoryStore`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("No state stored for identity {0:?}")]
    NotFound(StateIdentity),

    #[error("State store lock poisoned")]
    Poisoned,
}

/// In-process store keyed by [`StateIdentity`].
///
/// `E` is the error type the store reports through its capabilities, so it
/// can be combined with collaborators that share an application error
/// type. Any `E: From<StoreError>` works.
pub struct MemoryStore<E = StoreError> {
    states: Mutex<HashMap<StateIdentity, SerializedState>>,
    _error: PhantomData<fn() -> E>,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            _error: PhantomData,
        }
    }
}

impl<E> MemoryStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an initial state
    pub fn with_state(
        mut self,
        identity: impl Into<StateIdentity>,
        state: impl Into<SerializedState>,
    ) -> Self {
        self.states
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(identity.into(), state.into());
        self
    }

    /// Current state for `identity`, if any
    pub fn get(&self, identity: &StateIdentity) -> Option<SerializedState> {
        self.lock().ok()?.get(identity).cloned()
    }

    /// Number of identities with stored state
    pub fn len(&self) -> usize {
        self.lock().map(|states| states.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<StateIdentity, SerializedState>>, StoreError> {
        self.states.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl<E> Retriever for MemoryStore<E>
where
    E: From<StoreError> + Send,
{
    type Error = E;

    async fn retrieve(&self, identity: &StateIdentity) -> Result<SerializedState, E> {
        self.lock()?
            .get(identity)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(identity.clone()).into())
    }
}

#[async_trait]
impl<E> Storer for MemoryStore<E>
where
    E: From<StoreError> + Send,
{
    type Error = E;

    async fn store(&self, identity: &StateIdentity, state: SerializedState) -> Result<(), E> {
        self.lock()?.insert(identity.clone(), state);
        Ok(())
    }
}
