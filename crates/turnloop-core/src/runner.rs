use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::observer::{LoopEvent, LoopObserver, NoopObserver, Stage};
use crate::{
    Describer, Interpretation, Interpreter, Prompter, Retriever, SerializedState, StateIdentity,
    Storer,
};

/// Orchestrates the retrieve → describe → prompt → interpret → store loop.
///
/// All five capabilities share one error type. Whatever a capability
/// returns as an error is handed back from [`LoopRunner::run`] as is.
pub struct LoopRunner<'a, E> {
    retriever: &'a dyn Retriever<Error = E>,
    describer: &'a dyn Describer<Error = E>,
    prompter: &'a dyn Prompter<Error = E>,
    interpreter: &'a dyn Interpreter<Error = E>,
    storer: &'a dyn Storer<Error = E>,
    observer: Arc<dyn LoopObserver>,
}

impl<'a, E> LoopRunner<'a, E>
where
    E: fmt::Display + Send,
{
    pub fn new<R, D, P, I, S>(
        retriever: &'a R,
        describer: &'a D,
        prompter: &'a P,
        interpreter: &'a I,
        storer: &'a S,
    ) -> Self
    where
        R: Retriever<Error = E> + 'a,
        D: Describer<Error = E> + 'a,
        P: Prompter<Error = E> + 'a,
        I: Interpreter<Error = E> + 'a,
        S: Storer<Error = E> + 'a,
    {
        Self {
            retriever,
            describer,
            prompter,
            interpreter,
            storer,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LoopObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run turns for `identity` until the interpreter asks to stop.
    ///
    /// State is retrieved afresh at the start of every turn, even right
    /// after it was stored, so changes made outside the loop are picked up.
    pub async fn run(&self, identity: StateIdentity) -> Result<(), E> {
        let started = Instant::now();
        self.observer.observe(&LoopEvent::LoopStarted {
            identity: identity.clone(),
        });

        let mut turn = 0;
        let mut continue_loop = true;
        while continue_loop {
            turn += 1;
            continue_loop = match self.run_turn(&identity, turn).await {
                Ok(continue_loop) => continue_loop,
                Err((stage, error)) => {
                    warn!(turn, %stage, error = %error, "Loop failed");
                    self.observer.observe(&LoopEvent::LoopFailed {
                        turn,
                        stage,
                        error: error.to_string(),
                        duration_secs: started.elapsed().as_secs_f64(),
                    });
                    return Err(error);
                }
            };
        }

        info!(turns = turn, "Loop stopped");
        self.observer.observe(&LoopEvent::LoopStopped {
            turns: turn,
            duration_secs: started.elapsed().as_secs_f64(),
        });
        Ok(())
    }

    /// Run one full turn. Returns whether another turn should follow,
    /// or the failing stage with its untouched error.
    async fn run_turn(&self, identity: &StateIdentity, turn: usize) -> Result<bool, (Stage, E)> {
        self.observer.observe(&LoopEvent::TurnStarted { turn });

        let state: SerializedState = self
            .retriever
            .retrieve(identity)
            .await
            .map_err(|e| (Stage::Retrieve, e))?;
        debug!(turn, state_len = state.len(), "State retrieved");
        self.observer.observe(&LoopEvent::StateRetrieved {
            turn,
            state_len: state.len(),
        });

        let description = self
            .describer
            .describe(&state)
            .await
            .map_err(|e| (Stage::Describe, e))?;
        debug!(turn, description_len = description.len(), "State described");
        self.observer.observe(&LoopEvent::StateDescribed {
            turn,
            description_len: description.len(),
        });

        let response = self
            .prompter
            .prompt(&description)
            .await
            .map_err(|e| (Stage::Prompt, e))?;
        debug!(turn, response_len = response.len(), "Response received");
        self.observer.observe(&LoopEvent::ResponseReceived {
            turn,
            response_len: response.len(),
        });

        let Interpretation {
            state: next_state,
            continue_loop,
        } = self
            .interpreter
            .interpret(&response, &state)
            .await
            .map_err(|e| (Stage::Interpret, e))?;
        // The retrieved state is superseded from here on
        drop(state);
        debug!(turn, continue_loop, "Response interpreted");
        self.observer.observe(&LoopEvent::StateInterpreted {
            turn,
            state_len: next_state.len(),
            continue_loop,
        });

        self.storer
            .store(identity, next_state)
            .await
            .map_err(|e| (Stage::Store, e))?;
        debug!(turn, "State stored");
        self.observer.observe(&LoopEvent::StateStored { turn });

        Ok(continue_loop)
    }
}

/// Run the loop for a single identity with the given capabilities.
///
/// Returns `Ok(())` once a turn whose interpretation said stop has been
/// stored, or the first error any capability returns.
pub async fn run<R, D, P, I, S, E>(
    identity: StateIdentity,
    retriever: &R,
    describer: &D,
    prompter: &P,
    interpreter: &I,
    storer: &S,
) -> Result<(), E>
where
    R: Retriever<Error = E>,
    D: Describer<Error = E>,
    P: Prompter<Error = E>,
    I: Interpreter<Error = E>,
    S: Storer<Error = E>,
    E: fmt::Display + Send,
{
    LoopRunner::new(retriever, describer, prompter, interpreter, storer)
        .run(identity)
        .await
}
