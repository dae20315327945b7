// Author: Dustin Pilgrim
// License: MIT

use crate::cli::{Args, Command};
use crate::daemon::AnyError;

/// Parses `1h30m`, `90s`, `1500ms` or a bare millisecond count.
pub fn parse_duration_ms(raw: &str) -> Result<u64, String> {
    let raw = raw.trim().to_ascii_lowercase();
    if raw.is_empty() {
        return Err("empty duration".to_string());
    }
    if let Ok(ms) = raw.parse::<u64>() {
        return Ok(ms);
    }

    let invalid = || format!("invalid duration '{raw}' (try 1h30m, 45s or 1500ms)");

    let mut total: u64 = 0;
    let mut digits = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let value: u64 = digits.parse().map_err(|_| invalid())?;
        digits.clear();

        let unit_ms = match c {
            'h' => 3_600_000,
            's' => 1_000,
            'm' if chars.peek() == Some(&'s') => {
                chars.next();
                1
            }
            'm' => 60_000,
            _ => return Err(invalid()),
        };

        total = value
            .checked_mul(unit_ms)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(invalid)?;
    }

    if !digits.is_empty() {
        return Err(invalid());
    }
    Ok(total)
}

/// Wire line for a CLI command.
pub fn request_line(cmd: &Command) -> Result<String, String> {
    let line = match cmd {
        Command::List => "list".to_string(),
        Command::Add { title } => format!("add {}", title.join(" ")),
        Command::Start { target } => format!("start {}", target.join(" ")),
        Command::Stop { target } if target.is_empty() => "stop".to_string(),
        Command::Stop { target } => format!("stop {}", target.join(" ")),
        Command::Rename { target, title } => format!("rename {}\t{}", target.trim(), title.join(" ")),
        Command::SetTime { target, time } => {
            format!("set-time {}\t{}", target.trim(), parse_duration_ms(time)?)
        }
        Command::Remove { target } => format!("remove {}", target.join(" ")),
        Command::Info { json: true } => "info --json".to_string(),
        Command::Info { json: false } => "info".to_string(),
        Command::Watch => "watch".to_string(),
        Command::Suspend => "suspend".to_string(),
        Command::Quit => "quit".to_string(),
    };
    Ok(line)
}

pub async fn run(args: Args) -> Result<(), AnyError> {
    let Some(cmd) = args.command.as_ref() else {
        return Ok(());
    };

    let line = match request_line(cmd) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("dayflow: {e}");
            return Ok(());
        }
    };

    if matches!(cmd, Command::Watch) {
        if let Err(e) = crate::ipc::client::stream_lines(&line, |l| println!("{l}")).await {
            eprintln!("dayflow: {e}");
        }
        return Ok(());
    }

    match crate::ipc::client::send_raw(&line).await {
        Ok(resp) => {
            let out = resp.trim_end();
            if !out.is_empty() {
                println!("{out}");
            }
        }
        Err(e) => eprintln!("dayflow: {e}"),
    }

    Ok(())
}
