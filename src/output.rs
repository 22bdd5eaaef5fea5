// src/output.rs

//! Incremental process-output snapshots and their observers.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::Result;

/// Which standard stream a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}

/// An incremental snapshot of one process stream.
///
/// Within a single execution, `total_lines` grows append-only across the
/// emissions of a stream, and `diff_lines` is exactly the suffix added since
/// the previous emission. Concatenating every `diff_lines` in emission order
/// reproduces the final `total_lines` with no gaps and no duplicates.
///
/// A partial final line at stream close (no trailing newline) is flushed as
/// a last emission rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub kind: StreamKind,
    pub total_lines: Vec<String>,
    pub diff_lines: Vec<String>,
}

/// An observer of [`ProcessOutput`] emissions.
///
/// Observers for a single stream are invoked once per emission, in
/// registration order. An `Err` return is logged and does not stop the
/// remaining observers of the emission, nor the drain itself. Invocations
/// for one stream are strictly ordered, but observers must not assume any
/// particular task identity.
pub trait OutputObserver: Send + Sync {
    fn handle(&self, output: ProcessOutput)
    -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

struct FnObserver<F> {
    f: F,
}

impl<F> OutputObserver for FnObserver<F>
where
    F: Fn(ProcessOutput) + Send + Sync,
{
    fn handle(
        &self,
        output: ProcessOutput,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        (self.f)(output);
        Box::pin(std::future::ready(Ok(())))
    }
}

/// Wrap a plain closure as an [`OutputObserver`].
pub fn observer_fn<F>(f: F) -> Arc<dyn OutputObserver>
where
    F: Fn(ProcessOutput) + Send + Sync + 'static,
{
    Arc::new(FnObserver { f })
}
