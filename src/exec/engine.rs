// src/exec/engine.rs

//! The command execution algorithm.

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::command::{Command, CommandResult};
use crate::errors::{CmdstreamError, Result};
use crate::exec::streamer::drain_stream;
use crate::output::StreamKind;
use crate::value;

/// Execute a command once: resolve tokens, spawn, drain both streams
/// concurrently, wait for termination, and assemble the result.
///
/// The result echoes the original (pre-resolution) command and argument
/// values. It is not returned until both drains have delivered their final
/// emissions, so "result available" implies "all buffered output has been
/// dispatched to observers".
pub(crate) async fn execute(command: &Command) -> Result<CommandResult> {
    let scope = command.scope().clone();
    if scope.is_cancelled() {
        return Err(CmdstreamError::Cancelled);
    }

    let tokens = value::resolve_tokens(
        command.command(),
        command.arguments(),
        command.split_command_on_whitespace(),
        command.split_arguments_on_whitespace(),
    )
    .await?;

    if tokens.is_empty() {
        return Err(CmdstreamError::EmptyCommand);
    }

    let command_line = tokens.join(" ");
    info!(command = %command_line, "starting process");

    let mut handle = command.spawner().spawn(&tokens, command.working_dir())?;

    let stdout = handle.take_stdout();
    let stderr = handle.take_stderr();

    let stdout_drain = scope.spawn(drain_stream(
        stdout,
        StreamKind::Stdout,
        command.stdout_observers().to_vec(),
        scope.clone(),
    ));
    let stderr_drain = scope.spawn(drain_stream(
        stderr,
        StreamKind::Stderr,
        command.stderr_observers().to_vec(),
        scope.clone(),
    ));

    // Either the process exits on its own (normal case), or the scope is
    // cancelled and we request termination of the child.
    let waited = tokio::select! {
        status = handle.wait() => Some(status),
        _ = scope.cancelled() => None,
    };

    let Some(status) = waited else {
        info!(command = %command_line, "scope cancelled; terminating process");
        handle.terminate();
        if let Err(err) = handle.wait().await {
            warn!(command = %command_line, error = %err, "failed to reap terminated process");
        }
        join_drains(stdout_drain, stderr_drain).await;
        return Err(CmdstreamError::Cancelled);
    };

    let exit_code = status.map_err(CmdstreamError::Wait)?;

    // Join both drains before the result becomes observable.
    join_drains(stdout_drain, stderr_drain).await;

    info!(
        command = %command_line,
        exit_code = exit_code.value(),
        success = exit_code.is_success(),
        "process exited"
    );

    Ok(CommandResult {
        command: command.command().clone(),
        arguments: command.arguments().to_vec(),
        exit_code,
    })
}

async fn join_drains(stdout_drain: JoinHandle<()>, stderr_drain: JoinHandle<()>) {
    if let Err(err) = stdout_drain.await {
        warn!(error = %err, "stdout drain task failed");
    }
    if let Err(err) = stderr_drain.await {
        warn!(error = %err, "stderr drain task failed");
    }
    debug!("both stream drains joined");
}
