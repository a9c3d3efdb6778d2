//! Causal messaging example: three processes exchanging stamped messages.
//!
//! Reproduces the classic two-hop scenario:
//!
//! ```text
//! (1) P0 -> P1, P1 receives once   (P1 merges P0's clock)
//! (2) P1 -> P0, P0 receives once   (P0 merges P1's clock)
//! ```
//!
//! ```bash
//! cargo run --example causal_messaging
//! ```
//!
//! The library itself emits only structured outcomes; this example wires a
//! `tracing`-backed sink to render them, dumps one full message as JSON,
//! and closes every mailbox at the end.

use std::sync::Arc;

use vectorclock::{ClockEvent, ClockTable, EventSink, Process, ProcessId};

// ============================================================================
// Observability
// ============================================================================

/// Renders structured clock events through `tracing`.
struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &ClockEvent) {
        match event {
            ClockEvent::Sent {
                from, to, vector, ..
            } => {
                tracing::info!(%from, %to, %vector, "sent message");
            }
            ClockEvent::Received {
                process,
                from,
                merged,
                clock,
                ..
            } => {
                if *merged {
                    tracing::info!(%process, %from, %clock, "received and merged message");
                } else {
                    tracing::info!(%process, %from, %clock, "received message");
                }
            }
        }
    }
}

// ============================================================================
// Scenario
// ============================================================================

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let n = 3;
    let table = Arc::new(ClockTable::new(n));
    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);

    let processes = (0..n)
        .map(|id| {
            Process::new(ProcessId(id), table.clone()).map(|p| p.with_sink(sink.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // (1) P0 -> P1, P1 receives once.
    let message = processes[0]
        .send(&processes[1].handle(), "Message from P0 to P1")
        .await?;
    tracing::debug!(dump = %serde_json::to_string_pretty(&message)?, "full message");
    processes[1].receive().await?;

    // (2) P1 -> P0, P0 receives once.
    processes[1]
        .send(&processes[0].handle(), "Message from P1 to P0")
        .await?;
    processes[0].receive().await?;

    for process in &processes {
        tracing::info!(process = %process.id(), clock = %process.clock(), "final row");
        process.close();
    }
    tracing::info!("simulation stopped gracefully");
    Ok(())
}
