//! Data bridge: runs the poll loops and forwards their results to the UI
//! loop as [`Action::Poll`].

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use ripwatch_core::Poller;

use crate::action::Action;

/// Start `poller` and forward every event until `cancel` fires or the UI
/// stops listening. Waits for the poll loops to wind down before returning.
pub async fn spawn_data_bridge(
    poller: Poller,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let (poll_tx, mut poll_rx) = mpsc::unbounded_channel();
    let handles = poller.spawn(poll_tx, &cancel);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = poll_rx.recv() => {
                let Some(event) = event else { break };
                debug!(generation = event.generation(), "forwarding poll result");
                if action_tx.send(Action::Poll(event)).is_err() {
                    break;
                }
            }
        }
    }

    cancel.cancel();
    for handle in handles {
        let _ = handle.await;
    }
    info!("data bridge stopped");
}
