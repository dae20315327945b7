// Author: Dustin Pilgrim
// License: MIT

use std::path::Path;

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
    sync::{mpsc, watch},
    time::{timeout, Duration},
};

use crate::core::{info::ElapsedUpdate, manager_msg::ManagerMsg};
use crate::{ddebug, derror};

use super::router::{parse_request, route, Request};

const MAX_REQUEST_BYTES: u64 = 4096;

/// Binds the command socket, replacing a stale socket file from an earlier run.
pub fn bind(path: &Path) -> std::io::Result<UnixListener> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if path.exists() {
        let _ = std::fs::remove_file(path);
    }
    UnixListener::bind(path)
}

/// Accepts connections forever; each one carries a single request.
pub fn spawn_ipc_server(
    listener: UnixListener,
    tx: mpsc::Sender<ManagerMsg>,
    updates: watch::Receiver<ElapsedUpdate>,
) {
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let tx = tx.clone();
                    let updates = updates.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, tx, updates).await {
                            derror!("Ipc", "error handling connection: {}", e);
                        }
                    });
                }
                Err(e) => derror!("Ipc", "failed to accept connection: {}", e),
            }
        }
    });
}

async fn handle_connection(
    mut stream: UnixStream,
    tx: mpsc::Sender<ManagerMsg>,
    updates: watch::Receiver<ElapsedUpdate>,
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    timeout(Duration::from_secs(2), (&mut stream).take(MAX_REQUEST_BYTES).read_to_end(&mut buf))
        .await
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::TimedOut, "request read timed out"))??;

    let line = String::from_utf8_lossy(&buf).trim().to_string();
    if line.is_empty() {
        return Ok(());
    }
    ddebug!("Ipc", "request: {}", line);

    let response = match parse_request(&line) {
        Ok(Request::Watch) => return stream_updates(stream, updates).await,
        Ok(req) => match timeout(Duration::from_secs(10), route(req, &tx)).await {
            Ok(Ok(out)) => out,
            Ok(Err(e)) => format!("ERROR: {e}"),
            Err(_) => "ERROR: daemon did not answer in time".to_string(),
        },
        Err(e) => format!("ERROR: {e}"),
    };

    stream.write_all(response.as_bytes()).await?;
    if !response.ends_with('\n') {
        stream.write_all(b"\n").await?;
    }
    stream.flush().await?;
    stream.shutdown().await?;
    Ok(())
}

/// One line now, then one per display update, until the client hangs up.
async fn stream_updates(
    mut stream: UnixStream,
    mut updates: watch::Receiver<ElapsedUpdate>,
) -> std::io::Result<()> {
    loop {
        let line = format!("{}\n", updates.borrow_and_update().render());
        if stream.write_all(line.as_bytes()).await.is_err() {
            return Ok(());
        }

        if updates.changed().await.is_err() {
            return Ok(());
        }
    }
}
