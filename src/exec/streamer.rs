// src/exec/streamer.rs

//! Line-by-line stream drain with incremental snapshots.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::errors::CmdstreamError;
use crate::exec::spawner::ByteReader;
use crate::output::{OutputObserver, ProcessOutput, StreamKind};
use crate::scope::Scope;

/// Drain one byte stream until EOF, cancellation, or a read error.
///
/// Each line becomes one [`ProcessOutput`] emission carrying the full
/// accumulated history plus the new line as the diff. A partial final line
/// at stream close is flushed as a last emission. A read error before EOF
/// stops this drain only; the sibling stream and the termination wait keep
/// running.
pub(crate) async fn drain_stream(
    reader: Option<ByteReader>,
    kind: StreamKind,
    observers: Vec<Arc<dyn OutputObserver>>,
    scope: Scope,
) {
    let Some(reader) = reader else {
        debug!(%kind, "no pipe available; nothing to drain");
        return;
    };

    let mut lines = BufReader::new(reader).lines();
    let mut total_lines: Vec<String> = Vec::new();

    loop {
        let next = tokio::select! {
            line = lines.next_line() => line,
            _ = scope.cancelled() => {
                debug!(%kind, "scope cancelled; stopping drain");
                break;
            }
        };

        match next {
            Ok(Some(line)) => {
                debug!(%kind, "{}", line);
                total_lines.push(line.clone());

                let snapshot = ProcessOutput {
                    kind,
                    total_lines: total_lines.clone(),
                    diff_lines: vec![line],
                };
                dispatch(&observers, kind, snapshot).await;
            }
            Ok(None) => break,
            Err(source) => {
                // Recovered locally: this drain stops, the sibling stream
                // and the termination wait keep running.
                let err = CmdstreamError::StreamRead { kind, source };
                warn!(%kind, error = %err, "stream read failed before EOF; stopping drain");
                break;
            }
        }
    }

    debug!(%kind, lines = total_lines.len(), "drain finished");
}

/// Invoke every observer once for this emission, in registration order.
///
/// Observer failures are logged and do not stop the remaining observers.
async fn dispatch(observers: &[Arc<dyn OutputObserver>], kind: StreamKind, snapshot: ProcessOutput) {
    for (index, observer) in observers.iter().enumerate() {
        if let Err(err) = observer.handle(snapshot.clone()).await {
            warn!(
                %kind,
                observer = index,
                error = %err,
                "observer failed; continuing with remaining observers"
            );
        }
    }
}
