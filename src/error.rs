//! # Error Types
//!
//! One error enum for the whole crate. Most simulation faults are soft: they
//! are logged through `log` and the offending operation is skipped, so these
//! values mostly surface from setup, persistence and explicit registration calls.

use thiserror::Error;

/// Errors raised by the simulation core.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A component needs a sibling that isn't attached to the same game object.
    #[error("game object `{owner}` has a {component} but no {required}")]
    MissingComponent {
        owner: String,
        component: &'static str,
        required: &'static str,
    },

    /// A second component of an already present kind was offered.
    #[error("game object `{owner}` already has a {kind} component")]
    DuplicateComponent { owner: String, kind: String },

    /// A game object with this name is already registered.
    #[error("a game object named `{0}` already exists")]
    DuplicateName(String),

    /// Lookup or removal of something that was never registered.
    #[error("`{0}` is not registered")]
    NotRegistered(String),

    /// Attaching the parent would make a transform its own ancestor.
    #[error("attaching this parent would make a transform its own ancestor")]
    HierarchyCycle,

    /// Main-thread-only work was attempted from another thread.
    #[error("main-thread tasks can only be drained by the thread that owns the queue")]
    WrongThread,

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// A saved component carries a tag no loader knows about.
    #[error("unknown component tag `{0}`")]
    UnknownComponentTag(String),

    /// A saved stream ended early or carried impossible lengths.
    #[error("corrupt save data: {0}")]
    Corrupt(String),
}

/// Shorthand used by every fallible API in the crate.
pub type EngineResult<T> = Result<T, EngineError>;
