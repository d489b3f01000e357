//! Everything that touches the outside world: logger, engine, terminal, stdin.
mod app;
mod effects;
mod logging;
mod shell;
mod ui;

use anyhow::{bail, Context};
use crashboard_core::{AppViewModel, DashboardView, RunOutcome, TaskKind};
use crashboard_logging::crash_info;

use crate::cli::{Cli, Command};
use crate::config;

use app::{run_app, Mode};

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = config::load(cli.config.as_deref()).context("loading configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(log) = cli.log {
        config.log = log;
    }
    if cli.no_color {
        config.color = false;
    }

    logging::initialize(&config, cli.verbose);
    crash_info!("crashboard {} against {}", env!("CARGO_PKG_VERSION"), config.base_url);

    let settings = config.client_settings()?;
    let mode = match cli.command.initial_msgs() {
        Some(msgs) => Mode::Once(msgs),
        None => Mode::Shell,
    };
    let surface = ui::TerminalSurface::new(std::io::stdout(), config.color, mode == Mode::Shell);
    let view = run_app(settings, mode, surface)?;

    check_outcome(&cli.command, &view)
}

/// Maps the final view of a one-shot command onto the process exit status.
fn check_outcome(command: &Command, view: &AppViewModel) -> anyhow::Result<()> {
    match command {
        Command::Scrape { .. } => check_task(view, TaskKind::Scrapers),
        Command::Classify => check_task(view, TaskKind::Classifiers),
        Command::Stats => match view.dashboard {
            DashboardView::Ready { .. } => Ok(()),
            _ => bail!("statistics could not be loaded"),
        },
        Command::Ask { .. } => match (&view.query.error, &view.query.answer) {
            (None, Some(_)) => Ok(()),
            (Some(error), _) => bail!("query failed: {error}"),
            (None, None) => bail!("query produced no answer"),
        },
        Command::Shell => Ok(()),
    }
}

fn check_task(view: &AppViewModel, kind: TaskKind) -> anyhow::Result<()> {
    match view.task(kind).and_then(|panel| panel.last_outcome) {
        Some(RunOutcome::Completed) => Ok(()),
        Some(RunOutcome::Failed) => bail!("{} task failed", kind.title()),
        Some(RunOutcome::Rejected) => bail!("{} task was not started", kind.title()),
        None => bail!("{} task did not finish", kind.title()),
    }
}
