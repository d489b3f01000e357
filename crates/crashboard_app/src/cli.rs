use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use crashboard_core::{Key, Msg, TaskKind};

use crate::config::LogSetting;

/// Terminal client for the Crashscraper backend.
#[derive(Debug, Parser)]
#[command(name = "crashboard", version, about)]
pub struct Cli {
    /// Configuration file (defaults to ./crashboard.ron when present)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Where to write logs, overrides the config file
    #[arg(long, global = true, value_enum)]
    pub log: Option<LogSetting>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable coloured chart output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run every scraper and stream its progress log
    Scrape {
        /// Stop collecting articles older than this date
        #[arg(long = "fecha-limite", value_name = "YYYY-MM-DD")]
        fecha_limite: Option<String>,
    },
    /// Run the classifiers and stream their progress log
    Classify,
    /// Show the statistics dashboard
    Stats,
    /// Ask a question about the collected news
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Interactive session; type `:help` for commands
    Shell,
}

impl Command {
    /// UI events a one-shot command replays; `None` for the shell.
    pub fn initial_msgs(&self) -> Option<Vec<Msg>> {
        match self {
            Command::Scrape { fecha_limite } => Some(vec![
                Msg::CutoffDateChanged(fecha_limite.clone().unwrap_or_default()),
                Msg::RunTaskClicked(TaskKind::Scrapers),
            ]),
            Command::Classify => Some(vec![Msg::RunTaskClicked(TaskKind::Classifiers)]),
            Command::Stats => Some(vec![Msg::DashboardOpened]),
            Command::Ask { question } => Some(vec![
                Msg::QueryInputChanged(question.join(" ")),
                Msg::QueryKeyPressed(Key::Enter),
            ]),
            Command::Shell => None,
        }
    }
}
