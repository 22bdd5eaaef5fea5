//! End-to-end tests against real OS processes through the default
//! `TokioSpawner` backend.

mod common;
use crate::common::init_tracing;

use std::time::{Duration, Instant};

use cmdstream::{
    AsyncExecutor, CmdstreamError, CommandBuilder, Scope, exec,
};
use cmdstream_test_utils::recorders::RecordingObserver;

/// Build a shell invocation appropriate for the platform.
fn shell(script: &str, scope: &Scope) -> CommandBuilder {
    if cfg!(windows) {
        CommandBuilder::new("cmd", scope.clone()).args(["/C", script])
    } else {
        CommandBuilder::new("sh", scope.clone()).args(["-c", script])
    }
}

#[tokio::test]
async fn echoed_lines_arrive_as_two_emissions() {
    init_tracing();

    let scope = Scope::current();
    let observer = RecordingObserver::new("out");

    let script = if cfg!(windows) {
        "echo line1 & echo line2"
    } else {
        "echo line1; echo line2"
    };

    let result = shell(script, &scope)
        .on_stdout(observer.clone())
        .build()
        .execute()
        .await
        .unwrap();

    assert!(result.exit_code.is_success());

    let outputs = observer.outputs();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0].diff_lines, vec!["line1"]);
    assert_eq!(outputs[1].diff_lines, vec!["line2"]);
    assert_eq!(outputs[1].total_lines, vec!["line1", "line2"]);
}

#[tokio::test]
async fn non_zero_exit_codes_are_reported_as_data() {
    init_tracing();

    let scope = Scope::current();
    let result = shell("exit 3", &scope).build().execute().await.unwrap();

    assert_eq!(result.exit_code.value(), 3);
    assert!(result.exit_code.is_failure());
    // A tool whose success code happens to be 3 is still a success for it.
    assert!(result.exit_code.is_success_against(3.into()));
}

#[tokio::test]
async fn stderr_is_drained_independently_of_stdout() {
    init_tracing();

    let scope = Scope::current();
    let out = RecordingObserver::new("out");
    let err = RecordingObserver::new("err");

    let script = if cfg!(windows) {
        "echo visible & echo hidden 1>&2"
    } else {
        "echo visible; echo hidden >&2"
    };

    shell(script, &scope)
        .on_stdout(out.clone())
        .on_stderr(err.clone())
        .build()
        .execute()
        .await
        .unwrap();

    assert_eq!(out.outputs().last().unwrap().total_lines, vec!["visible"]);
    assert_eq!(err.outputs().last().unwrap().total_lines, vec!["hidden"]);
}

#[tokio::test]
async fn missing_executable_is_a_spawn_error() {
    init_tracing();

    let scope = Scope::current();
    let err = CommandBuilder::new("cmdstream-no-such-binary-anywhere", scope)
        .build()
        .execute()
        .await
        .unwrap_err();

    assert!(matches!(err, CmdstreamError::Spawn { .. }));
}

#[cfg(unix)]
#[tokio::test]
async fn working_directory_is_honored() {
    init_tracing();

    let dir = tempfile::tempdir().unwrap();
    let scope = Scope::current();
    let observer = RecordingObserver::new("out");

    shell("pwd", &scope)
        .working_dir(dir.path())
        .on_stdout(observer.clone())
        .build()
        .execute()
        .await
        .unwrap();

    let reported = observer.outputs().last().unwrap().total_lines[0].clone();
    assert_eq!(
        std::fs::canonicalize(&reported).unwrap(),
        std::fs::canonicalize(dir.path()).unwrap()
    );
}

#[cfg(unix)]
#[tokio::test]
async fn cancellation_terminates_a_sleeping_child_promptly() {
    init_tracing();

    let scope = Scope::current();
    let command = shell("sleep 30", &scope).build();

    let canceller = scope.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = command.execute().await.unwrap_err();

    assert!(matches!(err, CmdstreamError::Cancelled));
    assert!(
        started.elapsed() < Duration::from_secs(5),
        "cancellation took {:?}",
        started.elapsed()
    );
}

#[cfg(unix)]
#[tokio::test]
async fn stdin_sink_reaches_the_child() {
    use cmdstream::{ProcessSpawner, TokioSpawner};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    init_tracing();

    let mut handle = TokioSpawner
        .spawn(&["cat".to_string()], None)
        .unwrap();

    let mut stdin = handle.take_stdin().unwrap();
    let stdout = handle.take_stdout().unwrap();

    stdin.write_all(b"over stdin\n").await.unwrap();
    stdin.shutdown().await.unwrap();
    drop(stdin); // close the pipe so `cat` sees EOF

    let mut lines = BufReader::new(stdout).lines();
    assert_eq!(lines.next_line().await.unwrap().unwrap(), "over stdin");
    assert!(lines.next_line().await.unwrap().is_none());

    let code = handle.wait().await.unwrap();
    assert!(code.is_success());
    assert!(!handle.is_alive());
}

#[cfg(unix)]
#[tokio::test]
async fn exec_runs_a_minimal_command_on_the_current_runtime() {
    init_tracing();

    let result = exec("echo", ["plain"]).await.unwrap();
    assert!(result.exit_code.is_success());
}
