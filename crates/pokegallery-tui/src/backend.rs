use std::sync::Arc;

use pokegallery_core::{Executor, RecordSource, load_detail};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{BackendCommand, BackendEvent, DetailError};

/// Receive commands until the channel closes or `cancel` fires. Each command
/// runs on its own task so a slow batch never blocks newer ones.
pub async fn run_command_loop(
    executor: Executor,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };

        let tx = event_tx.clone();
        match cmd {
            BackendCommand::Run { ticket } => {
                let executor = executor.clone();
                tokio::spawn(async move {
                    let outcome = executor.run(&ticket).await;
                    let _ = tx.send(BackendEvent::Batch { ticket, outcome });
                });
            }
            BackendCommand::LoadDetail { request, key } => {
                let source: Arc<dyn RecordSource> = Arc::clone(executor.source());
                tokio::spawn(async move {
                    let result = match load_detail(source.as_ref(), &key).await {
                        Ok(view) => Ok(Box::new(view)),
                        Err(e) if e.is_not_found() => Err(DetailError::NotFound(key.to_string())),
                        Err(e) => Err(DetailError::Failed(e.to_string())),
                    };
                    let _ = tx.send(BackendEvent::Detail { request, result });
                });
            }
        }
    }
    tracing::debug!("backend command loop stopped");
}
