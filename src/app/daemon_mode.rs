// Author: Dustin Pilgrim
// License: MIT

use std::io;
use std::sync::Arc;

use crate::cli::Args;
use crate::core::store::{ActivityStore, MemoryStore};
use crate::daemon::{AnyError, Daemon};
use crate::log::{self, LogPolicy};
use crate::services::{signals::spawn_signal_listener, store::JsonFileStore};
use crate::{derror, dinfo, dwarn};

pub async fn run(args: Args) -> Result<(), AnyError> {
    // single-instance
    let _instance_lock = crate::app::platform::acquire_single_instance_lock().map_err(|e| {
        eprintln!("dayflow: {e}");
        io::Error::new(io::ErrorKind::AlreadyExists, e)
    })?;

    // logging
    log::set_verbose(args.verbose);
    let log_path = log::default_log_path();
    if let Err(e) = log::enable_file_output(&log_path, LogPolicy::default()) {
        dwarn!("Dayflow", "file logging disabled ({}): {}", log_path.display(), e);
    }

    dinfo!("Dayflow", "dayflow starting (v{})", env!("CARGO_PKG_VERSION"));

    // config
    let loaded = crate::config::load(args.config.as_deref()).map_err(|e| {
        derror!("Config", "{e}");
        io::Error::new(io::ErrorKind::InvalidData, e.to_string())
    })?;
    match &loaded.path {
        Some(p) => dinfo!("Config", "loaded {}", p.display()),
        None => dinfo!("Config", "no config file; using defaults"),
    }
    let cfg = loaded.cfg;

    // store
    let store: Arc<dyn ActivityStore> = if args.ephemeral {
        dinfo!("Dayflow", "ephemeral mode: activities are kept in memory only");
        Arc::new(MemoryStore::new())
    } else {
        let file = JsonFileStore::new(cfg.store_path.clone());
        dinfo!("Dayflow", "activities stored at {}", file.path().display());
        Arc::new(file)
    };

    let mut daemon = Daemon::new(&cfg, store);

    // ipc
    let socket_path = crate::ipc::socket_path().map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
    let listener = crate::ipc::server::bind(&socket_path)?;
    crate::ipc::server::spawn_ipc_server(listener, daemon.sender(), daemon.subscribe());
    dinfo!("Ipc", "listening on {}", socket_path.display());

    // shutdown
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    spawn_signal_listener(shutdown_tx);

    let result = daemon.run(shutdown_rx).await;

    let _ = std::fs::remove_file(&socket_path);
    crate::app::platform::release_single_instance_lock();

    match &result {
        Ok(()) => dinfo!("Dayflow", "dayflow stopped"),
        Err(e) => derror!("Dayflow", "daemon exited with error: {}", e),
    }
    result
}
