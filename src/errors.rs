// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::command::CommandResult;
use crate::output::StreamKind;

#[derive(Error, Debug)]
pub enum CmdstreamError {
    /// The process adapter could not create the process (missing executable,
    /// permission denied, ...). Fatal for the command being executed.
    #[error("failed to spawn process for '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Resolution produced no tokens, so there is nothing to execute.
    #[error("no command tokens to execute")]
    EmptyCommand,

    /// A stdout/stderr byte stream failed before natural EOF. Only surfaced
    /// by observers that choose to propagate it; the drain itself recovers
    /// locally and keeps the other stream and the termination wait running.
    #[error("reading {kind} stream failed: {source}")]
    StreamRead {
        kind: StreamKind,
        #[source]
        source: std::io::Error,
    },

    /// An observer invocation failed. Never aborts the drain loop.
    #[error("observer failed while handling {kind} output: {source}")]
    Observer {
        kind: StreamKind,
        #[source]
        source: anyhow::Error,
    },

    /// Waiting for process termination failed at the OS level.
    #[error("waiting for process exit failed: {0}")]
    Wait(#[source] std::io::Error),

    /// The scheduling scope was cancelled while the command was running.
    #[error("execution cancelled")]
    Cancelled,

    /// A command inside a group failed. The results of the members that
    /// completed before the failure are carried along so callers can still
    /// inspect the successful prefix.
    #[error("command at index {index} in group failed: {source}")]
    GroupFailed {
        index: usize,
        completed: Vec<CommandResult>,
        #[source]
        source: Box<CmdstreamError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CmdstreamError>;
