// Author: Dustin Pilgrim
// License: MIT

use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::sync::watch;

use crate::{dinfo, dwarn};

fn listen(kind: SignalKind, name: &str) -> Option<Signal> {
    match signal(kind) {
        Ok(s) => Some(s),
        Err(e) => {
            dwarn!("Signals", "cannot listen for {name}: {e}");
            None
        }
    }
}

async fn recv_or_pending(sig: &mut Option<Signal>) {
    match sig {
        Some(s) => {
            s.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Turns SIGINT, SIGTERM and SIGHUP into a shutdown request.
///
/// The daemon treats shutdown as the final suspend: it commits running time
/// and waits for the save before exiting. The sender is kept alive for the
/// life of the task, so a signal that cannot be registered never looks like
/// a shutdown.
pub fn spawn_signal_listener(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let mut term = listen(SignalKind::terminate(), "SIGTERM");
        let mut hup = listen(SignalKind::hangup(), "SIGHUP");

        let name = tokio::select! {
            _ = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    dwarn!("Signals", "cannot listen for SIGINT: {e}");
                    std::future::pending::<()>().await;
                }
            } => "SIGINT",
            _ = recv_or_pending(&mut term) => "SIGTERM",
            _ = recv_or_pending(&mut hup) => "SIGHUP",
        };

        dinfo!("Signals", "received {name}, shutting down");
        let _ = shutdown_tx.send(true);
    });
}
