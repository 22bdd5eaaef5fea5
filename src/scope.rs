// src/scope.rs

//! Scheduling scope: where command futures run and how they get cancelled.
//!
//! Every command carries a [`Scope`] explicitly; there is no ambient global
//! context. [`Scope::current`] is the convenience constructor for simple
//! scripts that just want "the runtime I'm already on".

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// A cloneable scheduling and cancellation context.
///
/// Clones share the same underlying state: cancelling one cancels them all.
/// Equality is identity, so two commands are "on the same scope" only when
/// their scopes originate from the same [`Scope::new`]/[`Scope::current`]
/// call.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<Inner>,
}

struct Inner {
    handle: Handle,
    cancelled: AtomicBool,
    notify: Notify,
}

impl Scope {
    /// Create a scope that schedules onto the given runtime handle.
    pub fn new(handle: Handle) -> Self {
        Scope {
            inner: Arc::new(Inner {
                handle,
                cancelled: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        }
    }

    /// Create a scope on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime, like
    /// [`Handle::current`].
    pub fn current() -> Self {
        Scope::new(Handle::current())
    }

    pub fn handle(&self) -> &Handle {
        &self.inner.handle
    }

    /// Spawn a future onto this scope's runtime.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.inner.handle.spawn(future)
    }

    /// Request cancellation of everything running on this scope.
    ///
    /// Output drains stop promptly and running processes are asked to
    /// terminate (best-effort); awaited executions then fail with
    /// [`CmdstreamError::Cancelled`](crate::CmdstreamError::Cancelled).
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Wait until this scope is cancelled.
    pub async fn cancelled(&self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            let notified = self.inner.notify.notified();
            // Re-check after registering the waiter so a cancel between the
            // first check and registration cannot be missed.
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Scope {}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
