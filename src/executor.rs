// src/executor.rs

//! Consumption styles for executable units.
//!
//! Both [`Command`](crate::Command) and [`CommandGroup`](crate::CommandGroup)
//! can be consumed two ways:
//!
//! - [`AsyncExecutor`]: start now and join later ([`dispatch`]), or suspend
//!   the calling task until the result is available ([`execute`]).
//! - [`StreamExecutor`]: a lazy stream that runs the unit when polled. A
//!   command emits its single result; a group emits one result per member
//!   as each completes, in order.
//!
//! Every call triggers a fresh execution of the underlying process(es);
//! nothing is cached between calls.
//!
//! [`dispatch`]: AsyncExecutor::dispatch
//! [`execute`]: AsyncExecutor::execute

use std::future::Future;
use std::pin::Pin;

use futures::stream::BoxStream;
use tokio::task::JoinHandle;

use crate::errors::Result;

/// One-shot execution: eager handle or cooperative await.
pub trait AsyncExecutor {
    type Output: Send + 'static;

    /// Start executing immediately on the unit's scheduling scope and
    /// return a handle that can be joined later.
    fn dispatch(&self) -> JoinHandle<Result<Self::Output>>;

    /// Execute on the calling task, suspending until the result is
    /// available.
    fn execute(&self) -> Pin<Box<dyn Future<Output = Result<Self::Output>> + Send + '_>>;
}

/// Lazy stream-style execution.
pub trait StreamExecutor {
    type Item;

    /// A stream that executes the unit when first polled. Not a per-line
    /// output stream; incremental output goes to the registered observers.
    fn stream(&self) -> BoxStream<'_, Result<Self::Item>>;
}
