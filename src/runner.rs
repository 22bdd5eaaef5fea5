// src/runner.rs

//! Reusable execution configuration.
//!
//! A [`CommandRunner`] holds default observers, splitting flags, a scope,
//! and a process backend, and stamps those defaults onto any command it is
//! asked to run. Default observers run *in addition to* the command's own
//! (appended after them), so a runner can, say, tee every command's output
//! into a shared log without the commands knowing about it.

use std::sync::Arc;

use crate::command::{Command, CommandBuilder, CommandResult};
use crate::errors::Result;
use crate::exec::engine;
use crate::exec::spawner::{ProcessSpawner, TokioSpawner};
use crate::output::OutputObserver;
use crate::scope::Scope;
use crate::value::CommandValue;

/// Read-only default configuration shared by reference across runs.
#[derive(Clone)]
pub struct CommandRunner {
    stdout_observers: Vec<Arc<dyn OutputObserver>>,
    stderr_observers: Vec<Arc<dyn OutputObserver>>,
    split_command_on_whitespace: bool,
    split_arguments_on_whitespace: bool,
    scope: Scope,
    spawner: Arc<dyn ProcessSpawner>,
}

impl CommandRunner {
    pub fn builder(scope: Scope) -> CommandRunnerBuilder {
        CommandRunnerBuilder {
            stdout_observers: Vec::new(),
            stderr_observers: Vec::new(),
            split_command_on_whitespace: false,
            split_arguments_on_whitespace: false,
            scope,
            spawner: Arc::new(TokioSpawner),
        }
    }

    /// Run a command with this runner's defaults stamped on.
    ///
    /// The given command is left untouched; a stamped clone executes.
    pub async fn run(&self, command: &Command) -> Result<CommandResult> {
        let stamped = self.stamp(command);
        engine::execute(&stamped).await
    }

    /// Convenience overload: build a minimal command from raw values and
    /// run it.
    pub async fn run_values<I, V>(
        &self,
        command: impl Into<CommandValue>,
        arguments: I,
    ) -> Result<CommandResult>
    where
        I: IntoIterator<Item = V>,
        V: Into<CommandValue>,
    {
        let command = CommandBuilder::new(command, self.scope.clone())
            .args(arguments)
            .build();
        self.run(&command).await
    }

    fn stamp(&self, command: &Command) -> Command {
        let mut builder = command
            .to_builder()
            .split_command_on_whitespace(self.split_command_on_whitespace)
            .split_arguments_on_whitespace(self.split_arguments_on_whitespace)
            .scope(self.scope.clone())
            .spawner(self.spawner.clone());

        for observer in &self.stdout_observers {
            builder = builder.on_stdout(observer.clone());
        }
        for observer in &self.stderr_observers {
            builder = builder.on_stderr(observer.clone());
        }

        builder.build()
    }
}

/// Mutable draft for a [`CommandRunner`].
pub struct CommandRunnerBuilder {
    stdout_observers: Vec<Arc<dyn OutputObserver>>,
    stderr_observers: Vec<Arc<dyn OutputObserver>>,
    split_command_on_whitespace: bool,
    split_arguments_on_whitespace: bool,
    scope: Scope,
    spawner: Arc<dyn ProcessSpawner>,
}

impl CommandRunnerBuilder {
    pub fn on_stdout(mut self, observer: Arc<dyn OutputObserver>) -> Self {
        self.stdout_observers.push(observer);
        self
    }

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

    pub fn spawner(mut self, spawner: Arc<dyn ProcessSpawner>) -> Self {
        self.spawner = spawner;
        self
    }

    pub fn build(self) -> CommandRunner {
        CommandRunner {
            stdout_observers: self.stdout_observers,
            stderr_observers: self.stderr_observers,
            split_command_on_whitespace: self.split_command_on_whitespace,
            split_arguments_on_whitespace: self.split_arguments_on_whitespace,
            scope: self.scope,
            spawner: self.spawner,
        }
    }
}
