// src/exec/spawner.rs

//! Pluggable process-adapter boundary.
//!
//! The engine talks to a [`ProcessSpawner`] instead of `tokio::process`
//! directly. This keeps the platform-specific spawning primitive behind a
//! small capability contract and makes it easy to substitute a scripted
//! fake in tests while the production backend stays in [`TokioSpawner`].

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command as TokioCommand};
use tracing::warn;

use crate::errors::{CmdstreamError, Result};
use crate::exit::ExitCode;

pub type ByteReader = Box<dyn AsyncRead + Send + Unpin>;
pub type ByteWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// A handle to one spawned native process.
///
/// The stdio accessors are take-once: the first call returns the stream,
/// later calls return `None`. Implementations without a native asynchronous
/// wait primitive must poll liveness at a bounded interval inside [`wait`]
/// (10ms is the reference cadence) so cancellation stays responsive.
///
/// [`wait`]: ProcessHandle::wait
pub trait ProcessHandle: Send {
    /// Whether the process is still running.
    fn is_alive(&mut self) -> bool;

    fn take_stdout(&mut self) -> Option<ByteReader>;

    fn take_stderr(&mut self) -> Option<ByteReader>;

    fn take_stdin(&mut self) -> Option<ByteWriter>;

    /// Request termination. Best-effort and non-blocking; callers reap the
    /// process through [`wait`](ProcessHandle::wait) afterwards.
    fn terminate(&mut self);

    /// Wait until the process terminates and return its exit code.
    fn wait(&mut self) -> Pin<Box<dyn Future<Output = std::io::Result<ExitCode>> + Send + '_>>;
}

/// The platform boundary: spawn a native process for a resolved token list.
pub trait ProcessSpawner: Send + Sync {
    /// Spawn `tokens[0]` with the remaining tokens as arguments.
    ///
    /// Fails with [`CmdstreamError::Spawn`] when the executable cannot be
    /// located or the OS refuses to create the process, and with
    /// [`CmdstreamError::EmptyCommand`] when `tokens` is empty.
    fn spawn(
        &self,
        tokens: &[String],
        working_dir: Option<&Path>,
    ) -> Result<Box<dyn ProcessHandle>>;
}

/// Default backend built on `tokio::process`.
///
/// All three stdio streams are piped, and the child is killed when the
/// handle is dropped so an abandoned execution cannot leak a process.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl ProcessSpawner for TokioSpawner {
    fn spawn(
        &self,
        tokens: &[String],
        working_dir: Option<&Path>,
    ) -> Result<Box<dyn ProcessHandle>> {
        let (program, args) = tokens.split_first().ok_or(CmdstreamError::EmptyCommand)?;

        let mut command = TokioCommand::new(program);
        command
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| CmdstreamError::Spawn {
            command: program.clone(),
            source,
        })?;

        Ok(Box::new(TokioProcess { child }))
    }
}

struct TokioProcess {
    child: Child,
}

impl ProcessHandle for TokioProcess {
    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    fn take_stdout(&mut self) -> Option<ByteReader> {
        self.child.stdout.take().map(|s| Box::new(s) as ByteReader)
    }

    fn take_stderr(&mut self) -> Option<ByteReader> {
        self.child.stderr.take().map(|s| Box::new(s) as ByteReader)
    }

    fn take_stdin(&mut self) -> Option<ByteWriter> {
        self.child.stdin.take().map(|s| Box::new(s) as ByteWriter)
    }

    fn terminate(&mut self) {
        if let Err(err) = self.child.start_kill() {
            warn!(error = %err, "failed to request child process termination");
        }
    }

    fn wait(&mut self) -> Pin<Box<dyn Future<Output = std::io::Result<ExitCode>> + Send + '_>> {
        Box::pin(async move {
            let status = self.child.wait().await?;
            // A signal-killed child has no code; report -1.
            Ok(ExitCode::from(status.code().unwrap_or(-1)))
        })
    }
}
