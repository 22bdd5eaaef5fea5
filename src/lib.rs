// src/lib.rs

//! Cross-platform command execution with incrementally streamed output.
//!
//! Build a [`Command`] (or chain several into a [`CommandGroup`]), register
//! observers for stdout/stderr, and consume it as a one-shot future-like
//! result or as a lazy stream. While the process runs, both standard
//! streams are drained concurrently and each new line is pushed to the
//! registered observers as an incremental [`ProcessOutput`] snapshot.
//!
//! ```no_run
//! use cmdstream::{command, observer_fn, AsyncExecutor, Scope};
//!
//! # async fn demo() -> cmdstream::Result<()> {
//! let scope = Scope::current();
//! let result = command("cargo", &scope)
//!     .args(["build", "--release"])
//!     .on_stdout(observer_fn(|out| {
//!         for line in &out.diff_lines {
//!             println!("{line}");
//!         }
//!     }))
//!     .build()
//!     .execute()
//!     .await?;
//!
//! assert!(result.exit_code.is_success());
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod errors;
pub mod exec;
pub mod executor;
pub mod exit;
pub mod group;
pub mod output;
pub mod runner;
pub mod scope;
pub mod value;

pub use command::{Command, CommandBuilder, CommandResult};
pub use errors::{CmdstreamError, Result};
pub use exec::{ByteReader, ByteWriter, ProcessHandle, ProcessSpawner, TokioSpawner};
pub use executor::{AsyncExecutor, StreamExecutor};
pub use exit::ExitCode;
pub use group::{CommandGroup, CommandGroupBuilder, CommandGroupResult, IntoCommands};
pub use output::{OutputObserver, ProcessOutput, StreamKind, observer_fn};
pub use runner::{CommandRunner, CommandRunnerBuilder};
pub use scope::Scope;
pub use value::{CommandValue, FixedProvider, ValueProvider, chain, sudo};

/// Start a command draft on the given scope.
pub fn command(value: impl Into<CommandValue>, scope: &Scope) -> CommandBuilder {
    CommandBuilder::new(value, scope.clone())
}

/// Build a minimal command on the current runtime and execute it.
///
/// For simple scripts; anything that wants observers, splitting policies,
/// or an explicit scope should go through [`command`] instead.
pub async fn exec<I, V>(value: impl Into<CommandValue>, arguments: I) -> Result<CommandResult>
where
    I: IntoIterator<Item = V>,
    V: Into<CommandValue>,
{
    CommandBuilder::new(value, Scope::current())
        .args(arguments)
        .build()
        .execute()
        .await
}
