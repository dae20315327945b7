// Author: Dustin Pilgrim
// License: MIT

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "dayflow",
    version = env!("CARGO_PKG_VERSION"),
    about = "Dayflow activity timer"
)]
pub struct Args {
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action)]
    pub verbose: bool,

    /// Keep activities in memory only (nothing is read from or written to disk)
    #[arg(long, action)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(about = "List activities and their tracked time")]
    List,

    #[command(about = "Add a new activity")]
    Add {
        #[arg(required = true, trailing_var_arg = true)]
        title: Vec<String>,
    },

    #[command(about = "Start tracking an activity (stops the running one)")]
    Start {
        #[arg(required = true, trailing_var_arg = true)]
        target: Vec<String>,
    },

    #[command(about = "Stop tracking (the running activity if none is given)")]
    Stop {
        #[arg(trailing_var_arg = true)]
        target: Vec<String>,
    },

    #[command(about = "Rename an activity")]
    Rename {
        /// Id or title; quote titles that contain spaces
        target: String,
        #[arg(required = true, trailing_var_arg = true)]
        title: Vec<String>,
    },

    #[command(about = "Overwrite the tracked time of an activity (e.g. 1h30m, 45s, 1500ms)")]
    SetTime {
        /// Id or title; quote titles that contain spaces
        target: String,
        time: String,
    },

    #[command(about = "Remove an activity and its tracked time")]
    Remove {
        #[arg(required = true, trailing_var_arg = true)]
        target: Vec<String>,
    },

    #[command(about = "Display current session information")]
    Info {
        #[arg(long)]
        json: bool,
    },

    #[command(about = "Follow the running timer")]
    Watch,

    #[command(about = "Commit running time and save now")]
    Suspend,

    #[command(about = "Save and stop the running daemon")]
    Quit,
}
