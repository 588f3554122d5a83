//! Typed error for the chat flow.

use thiserror::Error;

/// Errors the chat flow reports to its caller.
///
/// Provider failures are deliberately absent: they degrade to a fallback
/// reply inside the engine and never reach the caller as errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    /// No live session has this id.
    #[error("unknown session: {0}")]
    UnknownSession(String),

    /// A send is already awaiting its reply on this session.
    #[error("a send is already in flight for this session")]
    SendPending,

    /// The session spent its user-message allowance.
    #[error("session limit of {0} user messages reached")]
    LimitReached(usize),

    /// Input was empty after trimming.
    #[error("message text is empty")]
    EmptyInput,
}
