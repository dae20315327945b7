// Author: Dustin Pilgrim
// License: MIT

use tokio::sync::{mpsc, oneshot};

use crate::core::{
    info::render_list,
    manager_msg::{ManagerMsg, SessionCommand},
};
use crate::dwarn;

/// A parsed IPC request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Command(SessionCommand),
    List,
    Info { json: bool },
    Watch,
    Suspend,
    Quit,
}

fn split_verb(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    }
}

/// `<target>\t<value>` keeps spaces inside the target; without a tab the
/// target is the first word.
fn split_target(rest: &str) -> (&str, &str) {
    match rest.split_once('\t') {
        Some((target, value)) => (target.trim(), value.trim()),
        None => split_verb(rest),
    }
}

fn required<'a>(rest: &'a str, usage: &str) -> Result<&'a str, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest)
    }
}

pub fn parse_request(line: &str) -> Result<Request, String> {
    let (verb, rest) = split_verb(line);

    let req = match verb {
        "list" => Request::List,
        "info" => Request::Info {
            json: rest.split_whitespace().any(|a| a == "--json"),
        },
        "watch" => Request::Watch,
        "suspend" => Request::Suspend,
        "quit" => Request::Quit,

        "add" => Request::Command(SessionCommand::Add {
            title: required(rest, "add <title>")?.to_string(),
        }),
        "start" => Request::Command(SessionCommand::Start {
            target: required(rest, "start <id|title>")?.to_string(),
        }),
        "stop" => Request::Command(SessionCommand::Stop {
            target: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "remove" => Request::Command(SessionCommand::Remove {
            target: required(rest, "remove <id|title>")?.to_string(),
        }),
        "rename" => {
            let (target, title) = split_target(required(rest, "rename <id> <title>")?);
            Request::Command(SessionCommand::Rename {
                target: target.to_string(),
                title: required(title, "rename <id> <title>")?.to_string(),
            })
        }
        "set-time" => {
            let (target, ms) = split_target(required(rest, "set-time <id> <ms>")?);
            let time_ms = ms
                .parse::<u64>()
                .map_err(|_| format!("invalid time '{ms}' (expected milliseconds)"))?;
            Request::Command(SessionCommand::SetTime {
                target: target.to_string(),
                time_ms,
            })
        }

        "" => return Err("empty request".to_string()),
        other => return Err(format!("unknown command '{other}'")),
    };

    Ok(req)
}

async fn ask<T>(
    tx: &mpsc::Sender<ManagerMsg>,
    make: impl FnOnce(oneshot::Sender<T>) -> ManagerMsg,
) -> Result<T, String> {
    let (reply, wait) = oneshot::channel();
    tx.send(make(reply))
        .await
        .map_err(|_| "daemon is shutting down".to_string())?;
    wait.await.map_err(|_| "daemon dropped the request".to_string())
}

/// Runs a single non-streaming request against the daemon loop.
pub async fn route(req: Request, tx: &mpsc::Sender<ManagerMsg>) -> Result<String, String> {
    match req {
        Request::Command(cmd) => ask(tx, |reply| ManagerMsg::Command { cmd, reply }).await?,

        Request::List => {
            let snap = ask(tx, |reply| ManagerMsg::GetInfo { reply }).await?;
            Ok(render_list(&snap.activities, snap.active_id.as_deref(), snap.elapsed_ms))
        }

        Request::Info { json } => {
            let snap = ask(tx, |reply| ManagerMsg::GetInfo { reply }).await?;
            if json {
                serde_json::to_string(&snap).map_err(|e| format!("encode failed: {e}"))
            } else {
                Ok(snap.pretty_text)
            }
        }

        Request::Suspend => ask(tx, |reply| ManagerMsg::Suspend { reply }).await?,

        Request::Quit => ask(tx, |reply| ManagerMsg::StopDaemon { reply }).await?,

        Request::Watch => {
            dwarn!("Router", "watch must be served as a stream");
            Err("watch is a streaming request".to_string())
        }
    }
}
