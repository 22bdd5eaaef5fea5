// src/group.rs

//! Ordered, sequentially-executed command groups.

use std::future::Future;
use std::pin::Pin;

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::command::{Command, CommandBuilder, CommandResult};
use crate::errors::{CmdstreamError, Result};
use crate::exec::engine;
use crate::executor::{AsyncExecutor, StreamExecutor};
use crate::scope::Scope;

/// Aggregated results of a group run, positionally aligned with the
/// group's commands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandGroupResult {
    pub results: Vec<CommandResult>,
}

/// An ordered sequence of commands executed one after another.
///
/// Members run strictly sequentially: a command does not begin spawning
/// until its predecessor's result (including final output emissions) is
/// available. This keeps output interleaving on shared resources
/// deterministic; there is no implicit parallelism across members.
#[derive(Clone)]
pub struct CommandGroup {
    commands: Vec<Command>,
    scope: Scope,
}

impl CommandGroup {
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// A group draft with this group's commands followed by `next`.
    pub fn then(&self, next: impl IntoCommands) -> CommandGroupBuilder {
        let mut commands = self.commands.clone();
        commands.extend(next.into_commands());
        CommandGroupBuilder::from_commands(commands, self.scope.clone())
    }

    async fn execute_all(&self) -> Result<CommandGroupResult> {
        let mut results = Vec::with_capacity(self.commands.len());

        for (index, command) in self.commands.iter().enumerate() {
            debug!(index, total = self.commands.len(), "executing group member");
            match engine::execute(command).await {
                Ok(result) => results.push(result),
                Err(source) => {
                    // Abort the remainder, but surface the completed prefix.
                    return Err(CmdstreamError::GroupFailed {
                        index,
                        completed: results,
                        source: Box::new(source),
                    });
                }
            }
        }

        Ok(CommandGroupResult { results })
    }
}

impl AsyncExecutor for CommandGroup {
    type Output = CommandGroupResult;

    fn dispatch(&self) -> JoinHandle<Result<CommandGroupResult>> {
        let group = self.clone();
        self.scope.spawn(async move { group.execute_all().await })
    }

    fn execute(&self) -> Pin<Box<dyn Future<Output = Result<CommandGroupResult>> + Send + '_>> {
        Box::pin(self.execute_all())
    }
}

impl StreamExecutor for CommandGroup {
    type Item = CommandResult;

    /// Emits one result per member as each completes, in order, so a
    /// consumer can react per-step instead of only at group end. A member
    /// failure is emitted as the final `Err` item and ends the stream.
    fn stream(&self) -> BoxStream<'_, Result<CommandResult>> {
        stream::unfold(
            (self.commands.iter(), false),
            |(mut commands, failed)| async move {
                if failed {
                    return None;
                }
                let command = commands.next()?;
                match engine::execute(command).await {
                    Ok(result) => Some((Ok(result), (commands, false))),
                    Err(err) => Some((Err(err), (commands, true))),
                }
            },
        )
        .boxed()
    }
}

impl PartialEq for CommandGroup {
    fn eq(&self, other: &Self) -> bool {
        self.commands == other.commands && self.scope == other.scope
    }
}

impl Eq for CommandGroup {}

impl std::fmt::Debug for CommandGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandGroup")
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

/// Anything that can be appended to a group draft: a command, a command
/// draft, another group, or another group draft.
pub trait IntoCommands {
    fn into_commands(self) -> Vec<Command>;
}

impl IntoCommands for Command {
    fn into_commands(self) -> Vec<Command> {
        vec![self]
    }
}

impl IntoCommands for &Command {
    fn into_commands(self) -> Vec<Command> {
        vec![self.clone()]
    }
}

impl IntoCommands for CommandBuilder {
    fn into_commands(self) -> Vec<Command> {
        vec![self.build()]
    }
}

impl IntoCommands for CommandGroup {
    fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

impl IntoCommands for &CommandGroup {
    fn into_commands(self) -> Vec<Command> {
        self.commands.clone()
    }
}

impl IntoCommands for CommandGroupBuilder {
    fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

/// Mutable draft for a [`CommandGroup`]. `then` always appends, never
/// reorders.
#[derive(Clone)]
pub struct CommandGroupBuilder {
    commands: Vec<Command>,
    scope: Scope,
}

impl CommandGroupBuilder {
    pub fn new(scope: Scope) -> Self {
        CommandGroupBuilder {
            commands: Vec::new(),
            scope,
        }
    }

    pub(crate) fn from_commands(commands: Vec<Command>, scope: Scope) -> Self {
        CommandGroupBuilder { commands, scope }
    }

    pub fn then(mut self, next: impl IntoCommands) -> Self {
        self.commands.extend(next.into_commands());
        self
    }

    pub fn build(self) -> CommandGroup {
        CommandGroup {
            commands: self.commands,
            scope: self.scope,
        }
    }
}
