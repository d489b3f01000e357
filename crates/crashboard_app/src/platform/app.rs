use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use crashboard_core::{update, AppState, AppViewModel, Msg};
use crashboard_engine::{Backend, ClientSettings, ReqwestBackend};
use crashboard_logging::{crash_debug, crash_info, crash_warn};

use super::effects::EffectRunner;
use super::shell::{self, ShellInput};
use super::ui::{self, TerminalSurface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Replay these UI events, then wait until every request has settled.
    Once(Vec<Msg>),
    /// Read commands from stdin until `:quit` or end of input.
    Shell,
}

/// Everything the event loop reacts to, from the engine or from stdin.
#[derive(Debug)]
pub(crate) enum AppEvent {
    Ui(Msg),
    Help,
    Unknown(String),
    Quit,
}

struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    surface: TerminalSurface<W>,
}

impl<W: Write> App<W> {
    fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        crash_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        if state.consume_dirty() {
            self.surface.apply(ui::render::render(&state.view()))?;
        }
        self.state = state;
        Ok(())
    }
}

/// Runs the event loop and returns the last view for exit-status checks.
pub(crate) fn run_app<W: Write>(
    settings: ClientSettings,
    mode: Mode,
    mut surface: TerminalSurface<W>,
) -> anyhow::Result<AppViewModel> {
    let backend: Arc<dyn Backend> =
        Arc::new(ReqwestBackend::new(settings).context("building http client")?);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let runner = EffectRunner::new(backend, event_tx.clone()).context("starting engine")?;

    let state = AppState::new();
    surface.apply(ui::render::render(&state.view()))?;
    let mut app = App {
        state,
        runner,
        surface,
    };

    match mode {
        Mode::Once(msgs) => {
            drop(event_tx);
            for msg in msgs {
                app.dispatch(msg)?;
            }
            while app.state.is_busy() {
                match event_rx.recv() {
                    Ok(AppEvent::Ui(msg)) => app.dispatch(msg)?,
                    Ok(other) => crash_warn!("Ignoring {:?} outside the shell", other),
                    Err(_) => {
                        crash_warn!("Engine stopped with requests outstanding");
                        break;
                    }
                }
            }
        }
        Mode::Shell => {
            spawn_stdin_reader(event_tx);
            app.surface.notice(shell::HELP)?;
            for event in event_rx.iter() {
                match event {
                    AppEvent::Ui(msg) => app.dispatch(msg)?,
                    AppEvent::Help => app.surface.notice(shell::HELP)?,
                    AppEvent::Unknown(command) => app
                        .surface
                        .notice(&format!("Comando desconocido: :{command} (prueba :help)"))?,
                    AppEvent::Quit => break,
                }
            }
        }
    }

    crash_info!("Event loop finished");
    Ok(app.state.view())
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    crash_warn!("Reading stdin failed: {}", err);
                    break;
                }
            };
            let events: Vec<AppEvent> = match shell::parse_line(&line) {
                ShellInput::Msgs(msgs) => msgs.into_iter().map(AppEvent::Ui).collect(),
                ShellInput::Help => vec![AppEvent::Help],
                ShellInput::Unknown(command) => vec![AppEvent::Unknown(command)],
                ShellInput::Quit => vec![AppEvent::Quit],
            };
            for event in events {
                if event_tx.send(event).is_err() {
                    return;
                }
            }
        }
        let _ = event_tx.send(AppEvent::Quit);
    });
}
