// src/value.rs

//! Command-line value resolution.
//!
//! A [`CommandValue`] is anything that can contribute tokens to a command
//! line: a literal string, a pre-tokenized list, or an asynchronous
//! [`ValueProvider`]. Resolution turns a value into an ordered token list;
//! the full command line of a [`Command`](crate::Command) is the resolved
//! command followed by the flattened resolved arguments.
//!
//! Whitespace splitting only ever applies to literals. Lists are already
//! tokenized, and provider results are returned verbatim so that a provider
//! emitting a multi-word value (an elevation prefix, say) is not re-split
//! behind its back.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::errors::Result;

/// An asynchronous source of command-line tokens.
///
/// Implementations may re-resolve on every call (credentials that rotate,
/// paths discovered at runtime, ...). Within a single command execution the
/// engine resolves each value at most once.
pub trait ValueProvider: Send + Sync {
    fn resolve(&self) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + '_>>;
}

/// A polymorphic command-line value: literal token, pre-tokenized list, or
/// asynchronous provider.
#[derive(Clone)]
pub enum CommandValue {
    Literal(String),
    List(Vec<String>),
    Provider(Arc<dyn ValueProvider>),
}

impl CommandValue {
    /// Wrap a [`ValueProvider`] implementation.
    pub fn provider<P>(provider: P) -> Self
    where
        P: ValueProvider + 'static,
    {
        CommandValue::Provider(Arc::new(provider))
    }
}

impl fmt::Debug for CommandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandValue::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            CommandValue::List(tokens) => f.debug_tuple("List").field(tokens).finish(),
            CommandValue::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

impl PartialEq for CommandValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CommandValue::Literal(a), CommandValue::Literal(b)) => a == b,
            (CommandValue::List(a), CommandValue::List(b)) => a == b,
            // Providers are opaque behaviour; equality is identity.
            (CommandValue::Provider(a), CommandValue::Provider(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Eq for CommandValue {}

impl From<&str> for CommandValue {
    fn from(value: &str) -> Self {
        CommandValue::Literal(value.to_owned())
    }
}

impl From<String> for CommandValue {
    fn from(value: String) -> Self {
        CommandValue::Literal(value)
    }
}

impl From<Vec<String>> for CommandValue {
    fn from(tokens: Vec<String>) -> Self {
        CommandValue::List(tokens)
    }
}

impl From<&[&str]> for CommandValue {
    fn from(tokens: &[&str]) -> Self {
        CommandValue::List(tokens.iter().map(|t| (*t).to_owned()).collect())
    }
}

impl From<Arc<dyn ValueProvider>> for CommandValue {
    fn from(provider: Arc<dyn ValueProvider>) -> Self {
        CommandValue::Provider(provider)
    }
}

/// A provider that always resolves to the same fixed token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedProvider {
    values: Vec<String>,
}

impl FixedProvider {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FixedProvider {
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl ValueProvider for FixedProvider {
    fn resolve(&self) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + '_>> {
        Box::pin(std::future::ready(Ok(self.values.clone())))
    }
}

struct ChainedProvider {
    first: Arc<dyn ValueProvider>,
    second: Arc<dyn ValueProvider>,
}

impl ValueProvider for ChainedProvider {
    fn resolve(&self) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + '_>> {
        Box::pin(async move {
            let mut tokens = self.first.resolve().await?;
            tokens.extend(self.second.resolve().await?);
            Ok(tokens)
        })
    }
}

/// Concatenate two providers into one whose resolution is the resolution of
/// `first` followed by the resolution of `second`.
pub fn chain(
    first: Arc<dyn ValueProvider>,
    second: Arc<dyn ValueProvider>,
) -> Arc<dyn ValueProvider> {
    Arc::new(ChainedProvider { first, second })
}

/// Fixed provider for the `sudo` elevation prefix.
///
/// Chain it in front of another provider, or pass it as the command value
/// with the real program as the first argument.
pub fn sudo() -> Arc<dyn ValueProvider> {
    Arc::new(FixedProvider::new(["sudo"]))
}

/// Resolve a single value into its token list.
///
/// Splitting applies to literals only; blank literals under splitting
/// resolve to no tokens at all.
pub async fn resolve(value: &CommandValue, split_on_whitespace: bool) -> Result<Vec<String>> {
    match value {
        CommandValue::Provider(provider) => provider.resolve().await,
        CommandValue::List(tokens) => Ok(tokens.clone()),
        CommandValue::Literal(text) => {
            if split_on_whitespace {
                Ok(split_whitespace_tokens(text))
            } else {
                Ok(vec![text.clone()])
            }
        }
    }
}

/// Resolve the full token list for a command and its arguments.
pub(crate) async fn resolve_tokens(
    command: &CommandValue,
    arguments: &[CommandValue],
    split_command: bool,
    split_arguments: bool,
) -> Result<Vec<String>> {
    let mut tokens = resolve(command, split_command).await?;
    for argument in arguments {
        tokens.extend(resolve(argument, split_arguments).await?);
    }
    Ok(tokens)
}

/// Tokenize on runs of whitespace, discarding empty tokens.
fn split_whitespace_tokens(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}
