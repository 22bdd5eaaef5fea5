// src/command.rs

//! A single executable unit and its builder.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio::task::JoinHandle;

use crate::errors::Result;
use crate::exec::engine;
use crate::exec::spawner::{ProcessSpawner, TokioSpawner};
use crate::executor::{AsyncExecutor, StreamExecutor};
use crate::exit::ExitCode;
use crate::group::{CommandGroupBuilder, IntoCommands};
use crate::output::OutputObserver;
use crate::scope::Scope;
use crate::value::CommandValue;

/// The structured result of one command execution: the inputs as supplied
/// (pre-resolution) plus the exit code the process terminated with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub command: CommandValue,
    pub arguments: Vec<CommandValue>,
    pub exit_code: ExitCode,
}

/// A resolved-on-demand external command with registered output observers.
///
/// Immutable once built; use [`Command::to_builder`] to derive a
/// reconfigured copy. Each [`dispatch`](AsyncExecutor::dispatch),
/// [`execute`](AsyncExecutor::execute), or [`stream`](StreamExecutor::stream)
/// call runs a fresh process; no state leaks between runs.
///
/// Equality is value semantics: command value, arguments, observer lists
/// (by identity), splitting flags, working directory, scope, and spawner.
#[derive(Clone)]
pub struct Command {
    command: CommandValue,
    arguments: Vec<CommandValue>,
    stdout_observers: Vec<Arc<dyn OutputObserver>>,
    stderr_observers: Vec<Arc<dyn OutputObserver>>,
    split_command_on_whitespace: bool,
    split_arguments_on_whitespace: bool,
    working_dir: Option<PathBuf>,
    scope: Scope,
    spawner: Arc<dyn ProcessSpawner>,
}

impl Command {
    pub fn command(&self) -> &CommandValue {
        &self.command
    }

    pub fn arguments(&self) -> &[CommandValue] {
        &self.arguments
    }

    pub fn stdout_observers(&self) -> &[Arc<dyn OutputObserver>] {
        &self.stdout_observers
    }

    pub fn stderr_observers(&self) -> &[Arc<dyn OutputObserver>] {
        &self.stderr_observers
    }

    pub fn split_command_on_whitespace(&self) -> bool {
        self.split_command_on_whitespace
    }

    pub fn split_arguments_on_whitespace(&self) -> bool {
        self.split_arguments_on_whitespace
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn spawner(&self) -> &Arc<dyn ProcessSpawner> {
        &self.spawner
    }

    /// A draft with this command's configuration, for reconfiguring without
    /// mutating the original.
    pub fn to_builder(&self) -> CommandBuilder {
        CommandBuilder {
            command: self.command.clone(),
            arguments: self.arguments.clone(),
            stdout_observers: self.stdout_observers.clone(),
            stderr_observers: self.stderr_observers.clone(),
            split_command_on_whitespace: self.split_command_on_whitespace,
            split_arguments_on_whitespace: self.split_arguments_on_whitespace,
            working_dir: self.working_dir.clone(),
            scope: self.scope.clone(),
            spawner: self.spawner.clone(),
        }
    }

    /// Seed a group draft with `[self] ++ next`, preserving order.
    pub fn then(&self, next: impl IntoCommands) -> CommandGroupBuilder {
        let mut commands = vec![self.clone()];
        commands.extend(next.into_commands());
        CommandGroupBuilder::from_commands(commands, self.scope.clone())
    }
}

impl AsyncExecutor for Command {
    type Output = CommandResult;

    fn dispatch(&self) -> JoinHandle<Result<CommandResult>> {
        let command = self.clone();
        self.scope
            .spawn(async move { engine::execute(&command).await })
    }

    fn execute(&self) -> Pin<Box<dyn Future<Output = Result<CommandResult>> + Send + '_>> {
        Box::pin(engine::execute(self))
    }
}

impl StreamExecutor for Command {
    type Item = CommandResult;

    fn stream(&self) -> BoxStream<'_, Result<CommandResult>> {
        stream::once(engine::execute(self)).boxed()
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.command == other.command
            && self.arguments == other.arguments
            && observer_lists_equal(&self.stdout_observers, &other.stdout_observers)
            && observer_lists_equal(&self.stderr_observers, &other.stderr_observers)
            && self.split_command_on_whitespace == other.split_command_on_whitespace
            && self.split_arguments_on_whitespace == other.split_arguments_on_whitespace
            && self.working_dir == other.working_dir
            && self.scope == other.scope
            && Arc::ptr_eq(&self.spawner, &other.spawner)
    }
}

impl Eq for Command {}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("command", &self.command)
            .field("arguments", &self.arguments)
            .field("stdout_observers", &self.stdout_observers.len())
            .field("stderr_observers", &self.stderr_observers.len())
            .field(
                "split_command_on_whitespace",
                &self.split_command_on_whitespace,
            )
            .field(
                "split_arguments_on_whitespace",
                &self.split_arguments_on_whitespace,
            )
            .field("working_dir", &self.working_dir)
            .finish_non_exhaustive()
    }
}

fn observer_lists_equal(a: &[Arc<dyn OutputObserver>], b: &[Arc<dyn OutputObserver>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| Arc::ptr_eq(x, y))
}

/// Mutable draft for a [`Command`].
#[derive(Clone)]
pub struct CommandBuilder {
    command: CommandValue,
    arguments: Vec<CommandValue>,
    stdout_observers: Vec<Arc<dyn OutputObserver>>,
    stderr_observers: Vec<Arc<dyn OutputObserver>>,
    split_command_on_whitespace: bool,
    split_arguments_on_whitespace: bool,
    working_dir: Option<PathBuf>,
    scope: Scope,
    spawner: Arc<dyn ProcessSpawner>,
}

impl CommandBuilder {
    /// Start a draft for the given command value on the given scope.
    ///
    /// Defaults: no arguments, no observers, no whitespace splitting,
    /// inherited working directory, [`TokioSpawner`] backend.
    pub fn new(command: impl Into<CommandValue>, scope: Scope) -> Self {
        CommandBuilder {
            command: command.into(),
            arguments: Vec::new(),
            stdout_observers: Vec::new(),
            stderr_observers: Vec::new(),
            split_command_on_whitespace: false,
            split_arguments_on_whitespace: false,
            working_dir: None,
            scope,
            spawner: Arc::new(TokioSpawner),
        }
    }

    pub fn arg(mut self, argument: impl Into<CommandValue>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn args<I, V>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CommandValue>,
    {
        self.arguments.extend(arguments.into_iter().map(Into::into));
        self
    }

    /// Register an observer for stdout emissions, after any already
    /// registered.
    pub fn on_stdout(mut self, observer: Arc<dyn OutputObserver>) -> Self {
        self.stdout_observers.push(observer);
        self
    }

    /// Register an observer for stderr emissions, after any already
    /// registered.
    pub fn on_stderr(mut self, observer: Arc<dyn OutputObserver>) -> Self {
        self.stderr_observers.push(observer);
        self
    }

    pub fn split_command_on_whitespace(mut self, split: bool) -> Self {
        self.split_command_on_whitespace = split;
        self
    }

    pub fn split_arguments_on_whitespace(mut self, split: bool) -> Self {
        self.split_arguments_on_whitespace = split;
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Use a different process backend (the default is [`TokioSpawner`]).
    pub fn spawner(mut self, spawner: Arc<dyn ProcessSpawner>) -> Self {
        self.spawner = spawner;
        self
    }

    /// Build this draft, then seed a group draft with `[built] ++ next`.
    pub fn then(self, next: impl IntoCommands) -> CommandGroupBuilder {
        self.build().then(next)
    }

    /// Freeze the draft into an immutable [`Command`].
    pub fn build(self) -> Command {
        Command {
            command: self.command,
            arguments: self.arguments,
            stdout_observers: self.stdout_observers,
            stderr_observers: self.stderr_observers,
            split_command_on_whitespace: self.split_command_on_whitespace,
            split_arguments_on_whitespace: self.split_arguments_on_whitespace,
            working_dir: self.working_dir,
            scope: self.scope,
            spawner: self.spawner,
        }
    }
}
