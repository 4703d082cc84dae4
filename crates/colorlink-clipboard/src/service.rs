//! Arbiter event loop
//!
//! [`spawn`] moves a [`ClipboardArbiter`] into its own task fed by a bounded
//! channel. Events are handled strictly in arrival order; [`ArbiterHandle`]
//! is the cheap, cloneable sending side.

use crate::arbiter::{ClipboardArbiter, InboundOutcome, OutboundOutcome, PasteOutcome};
use crate::error::ClipboardError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Clipboard-related events from the host shell and the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardEvent {
    /// The document clipboard changed
    DocumentChanged {
        /// The change came from a copy or cut inside the document, as
        /// opposed to an import or a programmatic write
        local_copy: bool,
    },
    /// The host clipboard may hold new content (focus gained)
    HostReadOpportunity,
    /// The user asked to paste into the document
    PasteRequested,
}

/// What the loop did with an event
#[derive(Debug)]
pub enum ArbiterOutcome {
    /// Outbound write attempted
    Outbound(OutboundOutcome),
    /// Inbound import attempted
    Inbound(InboundOutcome),
    /// Paste attempted
    Paste(PasteOutcome),
    /// Event did not call for arbitration
    Ignored,
}

enum Command {
    Event {
        event: ClipboardEvent,
        reply: Option<oneshot::Sender<ArbiterOutcome>>,
    },
    Shutdown,
}

/// Sending side of a running arbiter
#[derive(Debug, Clone)]
pub struct ArbiterHandle {
    sender: mpsc::Sender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event { event, .. } => f.debug_tuple("Event").field(event).finish(),
            Self::Shutdown => f.write_str("Shutdown"),
        }
    }
}

impl ArbiterHandle {
    /// Queue an event without waiting for its outcome
    ///
    /// # Errors
    /// [`ClipboardError::Closed`] when the loop has stopped.
    pub async fn notify(&self, event: ClipboardEvent) -> Result<(), ClipboardError> {
        self.sender
            .send(Command::Event { event, reply: None })
            .await
            .map_err(|_| ClipboardError::Closed)
    }

    /// Queue an event and wait until it was handled
    ///
    /// # Errors
    /// [`ClipboardError::Closed`] when the loop has stopped.
    pub async fn dispatch(&self, event: ClipboardEvent) -> Result<ArbiterOutcome, ClipboardError> {
        let (reply, outcome) = oneshot::channel();
        self.sender
            .send(Command::Event {
                event,
                reply: Some(reply),
            })
            .await
            .map_err(|_| ClipboardError::Closed)?;
        outcome.await.map_err(|_| ClipboardError::Closed)
    }

    /// Stop the loop after the events already queued
    ///
    /// # Errors
    /// [`ClipboardError::Closed`] when the loop has already stopped.
    pub async fn shutdown(&self) -> Result<(), ClipboardError> {
        self.sender
            .send(Command::Shutdown)
            .await
            .map_err(|_| ClipboardError::Closed)
    }

    /// Whether the loop is gone
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// Start the event loop on the current runtime
pub fn spawn(arbiter: ClipboardArbiter) -> (ArbiterHandle, JoinHandle<ClipboardArbiter>) {
    let (sender, receiver) = mpsc::channel(arbiter.config().queue_capacity.max(1));
    let task = tokio::spawn(run_loop(arbiter, receiver));
    (ArbiterHandle { sender }, task)
}

async fn run_loop(
    arbiter: ClipboardArbiter,
    mut receiver: mpsc::Receiver<Command>,
) -> ClipboardArbiter {
    info!("clipboard arbiter started");

    while let Some(command) = receiver.recv().await {
        match command {
            Command::Event { event, reply } => {
                let outcome = handle(&arbiter, event).await;
                if let Some(reply) = reply {
                    // Caller may have stopped waiting
                    let _ = reply.send(outcome);
                }
            }
            Command::Shutdown => break,
        }
    }

    info!("clipboard arbiter stopped");
    arbiter
}

async fn handle(arbiter: &ClipboardArbiter, event: ClipboardEvent) -> ArbiterOutcome {
    match event {
        ClipboardEvent::DocumentChanged { local_copy: true } => {
            ArbiterOutcome::Outbound(arbiter.on_local_copy().await)
        }
        ClipboardEvent::DocumentChanged { local_copy: false } => {
            debug!("document clipboard changed without a local copy, ignoring");
            ArbiterOutcome::Ignored
        }
        ClipboardEvent::HostReadOpportunity => {
            ArbiterOutcome::Inbound(arbiter.on_host_read_opportunity().await)
        }
        ClipboardEvent::PasteRequested => ArbiterOutcome::Paste(arbiter.on_paste_request().await),
    }
}
