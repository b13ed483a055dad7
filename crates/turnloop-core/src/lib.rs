//! # turnloop-core
//!
//! A generic interaction loop: retrieve a state, describe it, prompt for a
//! response, interpret the response into the next state, store it, and
//! repeat until the interpreter says stop.
//!
//! The loop owns no storage, rendering, input or parsing logic. Each of
//! those is a single-method capability supplied by the embedding
//! application.
//!
//! ## Key Types
//!
//! - [`LoopRunner`] / [`run`] - The orchestrator
//! - [`Retriever`], [`Describer`], [`Prompter`], [`Interpreter`], [`Storer`] - Capabilities
//! - [`StateIdentity`], [`SerializedState`] - Opaque byte handles
//! - [`LoopObserver`], [`LoopEvent`] - Progress notifications
//! - [`MemoryStore`] - In-process [`StoreRetriever`]

mod capability;
mod memory;
mod observer;
mod runner;
mod state;

pub use capability::{
    Describer, Interpretation, Interpreter, Prompter, Retriever, StoreRetriever, Storer,
};
pub use memory::{MemoryStore, StoreError};
pub use observer::{LoopEvent, LoopObserver, NoopObserver, Stage};
pub use runner::{run, LoopRunner};
pub use state::{SerializedState, StateIdentity};
