use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cmdstream::errors::{CmdstreamError, Result};
use cmdstream::exec::{ByteReader, ByteWriter, ProcessHandle, ProcessSpawner};
use cmdstream::exit::ExitCode;

use crate::recorders::SharedEvents;

/// Scripted behaviour for one fake process spawn.
#[derive(Debug, Clone)]
pub struct ProcessScript {
    stdout: Vec<u8>,
    stderr: Vec<u8>,
    exit_code: i32,
    exit_delay: Duration,
    fail_spawn: bool,
}

impl ProcessScript {
    /// A process that writes nothing and exits 0.
    pub fn success() -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            exit_code: 0,
            exit_delay: Duration::ZERO,
            fail_spawn: false,
        }
    }

    /// A spawn attempt that fails with a not-found error.
    pub fn failing_spawn() -> Self {
        Self {
            fail_spawn: true,
            ..Self::success()
        }
    }

    /// Write the given lines (newline-terminated) to stdout.
    pub fn with_stdout_lines(mut self, lines: &[&str]) -> Self {
        self.stdout = newline_terminated(lines);
        self
    }

    /// Write the given lines (newline-terminated) to stderr.
    pub fn with_stderr_lines(mut self, lines: &[&str]) -> Self {
        self.stderr = newline_terminated(lines);
        self
    }

    /// Write raw bytes to stdout, exactly as given (no newline appended).
    pub fn with_stdout_raw(mut self, raw: &str) -> Self {
        self.stdout = raw.as_bytes().to_vec();
        self
    }

    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Delay process exit, simulating a long-running command.
    pub fn with_exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay = delay;
        self
    }
}

fn newline_terminated(lines: &[&str]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for line in lines {
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
    }
    bytes
}

/// One recorded spawn request.
#[derive(Debug, Clone)]
pub struct SpawnRecord {
    pub tokens: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

/// A fake process backend that:
/// - records every spawn request (tokens + working dir),
/// - plays back queued [`ProcessScript`]s, one per spawn, falling back to a
///   reusable template (or a plain success) when the queue is empty,
/// - optionally pushes `spawn:<program>` markers into a shared event log so
///   tests can assert ordering against observer emissions.
pub struct ScriptedSpawner {
    scripts: Mutex<VecDeque<ProcessScript>>,
    fallback: Mutex<Option<ProcessScript>>,
    records: Mutex<Vec<SpawnRecord>>,
    events: Mutex<Option<SharedEvents>>,
}

impl ScriptedSpawner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(None),
            records: Mutex::new(Vec::new()),
            events: Mutex::new(None),
        })
    }

    /// A spawner that plays the same script for every spawn.
    pub fn with_fallback(script: ProcessScript) -> Arc<Self> {
        let spawner = Self::new();
        *spawner.fallback.lock().unwrap() = Some(script);
        spawner
    }

    /// Queue a script for the next spawn.
    pub fn push(&self, script: ProcessScript) {
        self.scripts.lock().unwrap().push_back(script);
    }

    /// Mirror spawns into a shared event log.
    pub fn set_events(&self, events: SharedEvents) {
        *self.events.lock().unwrap() = Some(events);
    }

    pub fn spawn_records(&self) -> Vec<SpawnRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn spawn_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    fn next_script(&self) -> ProcessScript {
        if let Some(script) = self.scripts.lock().unwrap().pop_front() {
            return script;
        }
        self.fallback
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(ProcessScript::success)
    }
}

impl ProcessSpawner for ScriptedSpawner {
    fn spawn(
        &self,
        tokens: &[String],
        working_dir: Option<&Path>,
    ) -> Result<Box<dyn ProcessHandle>> {
        let program = tokens.first().ok_or(CmdstreamError::EmptyCommand)?.clone();

        self.records.lock().unwrap().push(SpawnRecord {
            tokens: tokens.to_vec(),
            working_dir: working_dir.map(Path::to_path_buf),
        });

        if let Some(events) = self.events.lock().unwrap().as_ref() {
            events.lock().unwrap().push(format!("spawn:{program}"));
        }

        let script = self.next_script();
        if script.fail_spawn {
            return Err(CmdstreamError::Spawn {
                command: program,
                source: io::Error::new(io::ErrorKind::NotFound, "scripted spawn failure"),
            });
        }

        Ok(Box::new(ScriptedProcess {
            stdout: Some(Box::new(io::Cursor::new(script.stdout))),
            stderr: Some(Box::new(io::Cursor::new(script.stderr))),
            exit_code: script.exit_code,
            exit_delay: script.exit_delay,
            alive: true,
            terminated: false,
        }))
    }
}

struct ScriptedProcess {
    stdout: Option<ByteReader>,
    stderr: Option<ByteReader>,
    exit_code: i32,
    exit_delay: Duration,
    alive: bool,
    terminated: bool,
}

impl ProcessHandle for ScriptedProcess {
    fn is_alive(&mut self) -> bool {
        self.alive
    }

    fn take_stdout(&mut self) -> Option<ByteReader> {
        self.stdout.take()
    }

    fn take_stderr(&mut self) -> Option<ByteReader> {
        self.stderr.take()
    }

    fn take_stdin(&mut self) -> Option<ByteWriter> {
        Some(Box::new(tokio::io::sink()))
    }

    fn terminate(&mut self) {
        self.terminated = true;
    }

    fn wait(&mut self) -> Pin<Box<dyn Future<Output = io::Result<ExitCode>> + Send + '_>> {
        Box::pin(async move {
            if self.terminated {
                self.alive = false;
                return Ok(ExitCode::from(-1));
            }
            if !self.exit_delay.is_zero() {
                tokio::time::sleep(self.exit_delay).await;
            }
            self.alive = false;
            Ok(ExitCode::from(self.exit_code))
        })
    }
}
