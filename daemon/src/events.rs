//! Event intake and the UI command channel.

use crate::indicator::LockIndicator;
use crate::orchestrator::Orchestrator;
use crate::provider::TreeProvider;
use crate::store::SettingsStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// A mutation reported by the live tree provider. The payload carries no
/// detail on purpose: any change anywhere triggers the same full check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    Created,
    Moved,
    Changed,
    Removed,
}

/// Current lock state, as reported to the UI surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockState {
    pub locked: bool,
}

/// Commands from the UI toggle surface.
#[derive(Debug)]
pub enum Command {
    UpdateLock { value: bool },
    GetState { reply: oneshot::Sender<LockState> },
}

/// Drive the orchestrator from event and command channels until both
/// close.
///
/// Each tree event is dispatched as its own task: the orchestrator's pass
/// guard is what drops events arriving mid-pass, so a burst of corrective
/// side effects never queues additional passes behind the first.
pub async fn run<P, S, I>(
    orchestrator: Arc<Orchestrator<P, S, I>>,
    mut events: mpsc::Receiver<TreeEvent>,
    mut commands: mpsc::Receiver<Command>,
) where
    P: TreeProvider + 'static,
    S: SettingsStore + 'static,
    I: LockIndicator + 'static,
{
    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                let orchestrator = Arc::clone(&orchestrator);
                tokio::spawn(async move {
                    if let Err(err) = orchestrator.handle_event(event).await {
                        tracing::error!(target: "marklock::error", %err, "reconciliation pass failed");
                    }
                });
            }
            Some(command) = commands.recv() => {
                handle_command(orchestrator.as_ref(), command).await;
            }
            else => break,
        }
    }
}

async fn handle_command<P, S, I>(orchestrator: &Orchestrator<P, S, I>, command: Command)
where
    P: TreeProvider,
    S: SettingsStore,
    I: LockIndicator,
{
    match command {
        Command::UpdateLock { value } => {
            if let Err(err) = orchestrator.update_lock(value).await {
                tracing::error!(target: "marklock::error", %err, "failed to update lock");
            }
        }
        Command::GetState { reply } => match orchestrator.state().await {
            Ok(state) => {
                // The UI may have gone away; nothing to do about it.
                let _ = reply.send(state);
            }
            Err(err) => {
                tracing::error!(target: "marklock::error", %err, "failed to read lock state");
            }
        },
    }
}
