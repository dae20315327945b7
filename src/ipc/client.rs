// Author: Dustin Pilgrim
// License: MIT

use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
    time::{timeout, Duration},
};

async fn connect_and_send(cmd: &str) -> Result<UnixStream, String> {
    let path = crate::ipc::socket_path()?;

    if !path.exists() {
        return Err("daemon not running".to_string());
    }

    let mut stream = match timeout(Duration::from_secs(2), UnixStream::connect(&path)).await {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => return Err(format!("failed to connect to {}: {e}", path.display())),
        Err(_) => return Err("timeout connecting to daemon".to_string()),
    };

    timeout(Duration::from_secs(2), stream.write_all(cmd.as_bytes()))
        .await
        .map_err(|_| "timeout writing to daemon".to_string())?
        .map_err(|e| format!("write failed: {e}"))?;

    timeout(Duration::from_secs(2), stream.shutdown())
        .await
        .map_err(|_| "timeout finalizing request".to_string())?
        .map_err(|e| format!("shutdown failed: {e}"))?;

    Ok(stream)
}

/// One request, one response.
pub async fn send_raw(cmd: &str) -> Result<String, String> {
    let mut stream = connect_and_send(cmd).await?;

    let mut resp = Vec::new();
    timeout(Duration::from_secs(12), stream.read_to_end(&mut resp))
        .await
        .map_err(|_| "timeout reading response".to_string())?
        .map_err(|e| format!("read failed: {e}"))?;

    let text = String::from_utf8_lossy(&resp).to_string();
    match text.strip_prefix("ERROR: ") {
        Some(err) => Err(err.trim_end().to_string()),
        None => Ok(text),
    }
}

/// Streams response lines to `on_line` until the daemon closes the connection.
pub async fn stream_lines(cmd: &str, mut on_line: impl FnMut(&str)) -> Result<(), String> {
    let stream = connect_and_send(cmd).await?;
    let mut lines = BufReader::new(stream).lines();

    while let Some(line) = lines.next_line().await.map_err(|e| format!("read failed: {e}"))? {
        on_line(&line);
    }
    Ok(())
}
