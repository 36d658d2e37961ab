//! Error types for the state machine

use std::fmt::Debug;
use thiserror::Error;

use crate::fsm::Control;

/// Result type alias for state machine operations
pub type Result<T, S, E> = std::result::Result<T, Error<S, E>>;

/// Errors that can occur while driving a state machine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error<S: Debug, E: Debug> {
    /// The current state has no node in the graph; only reachable after `close`
    #[error("State machine has no current state (closed)")]
    InvalidState,

    /// The current state has no transition registered for the delivered event
    #[error("State {state:?} rejected event {event:?}")]
    RejectedEvent {
        /// State the machine was in when the event arrived
        state: S,
        /// The event that was rejected
        event: E,
    },

    /// A driving operation was not allowed in the current control state
    #[error("Cannot {operation} while {control}")]
    Lifecycle {
        /// Name of the refused operation
        operation: &'static str,
        /// Control state at the time of the call
        control: Control,
    },
}

impl<S: Debug, E: Debug> Error<S, E> {
    /// Whether this error is a rejected event, which callers often treat as "ignore"
    pub fn is_rejected(&self) -> bool {
        matches!(self, Error::RejectedEvent { .. })
    }
}
