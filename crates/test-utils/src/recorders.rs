use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use cmdstream::errors::{CmdstreamError, Result};
use cmdstream::output::{OutputObserver, ProcessOutput};

/// A shared, ordered log of test events (spawns, observer emissions).
pub type SharedEvents = Arc<Mutex<Vec<String>>>;

pub fn shared_events() -> SharedEvents {
    Arc::new(Mutex::new(Vec::new()))
}

/// An observer that records every snapshot it receives, and optionally
/// mirrors `<label>:<line>` markers into a shared event log for ordering
/// assertions across commands.
pub struct RecordingObserver {
    label: String,
    outputs: Mutex<Vec<ProcessOutput>>,
    events: Option<SharedEvents>,
}

impl RecordingObserver {
    pub fn new(label: &str) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            outputs: Mutex::new(Vec::new()),
            events: None,
        })
    }

    pub fn with_events(label: &str, events: SharedEvents) -> Arc<Self> {
        Arc::new(Self {
            label: label.to_string(),
            outputs: Mutex::new(Vec::new()),
            events: Some(events),
        })
    }

    /// All snapshots received so far, in emission order.
    pub fn outputs(&self) -> Vec<ProcessOutput> {
        self.outputs.lock().unwrap().clone()
    }
}

impl OutputObserver for RecordingObserver {
    fn handle(
        &self,
        output: ProcessOutput,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        if let Some(events) = &self.events {
            let mut events = events.lock().unwrap();
            for line in &output.diff_lines {
                events.push(format!("{}:{line}", self.label));
            }
        }
        self.outputs.lock().unwrap().push(output);
        Box::pin(std::future::ready(Ok(())))
    }
}

/// An observer that always fails, for exercising error isolation.
pub struct FailingObserver {
    invocations: AtomicUsize,
}

impl FailingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            invocations: AtomicUsize::new(0),
        })
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

impl OutputObserver for FailingObserver {
    fn handle(
        &self,
        output: ProcessOutput,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        let kind = output.kind;
        Box::pin(std::future::ready(Err(CmdstreamError::Observer {
            kind,
            source: anyhow!("scripted observer failure"),
        })))
    }
}
