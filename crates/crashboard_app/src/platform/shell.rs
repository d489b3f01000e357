//! Line-oriented input for `crashboard shell`.

use crashboard_core::{Key, Msg, TaskKind};

pub(crate) const HELP: &str = "\
Comandos:
  :scrape [AAAA-MM-DD]  ejecutar los scrapers (fecha límite opcional)
  :classify             ejecutar los clasificadores
  :stats                mostrar estadísticas
  :help                 mostrar esta ayuda
  :quit                 salir
Cualquier otra línea se envía como pregunta.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ShellInput {
    Msgs(Vec<Msg>),
    Help,
    Unknown(String),
    Quit,
}

/// Each line is one round of UI events: a command, or a question typed into
/// the query box followed by Enter.
pub(crate) fn parse_line(line: &str) -> ShellInput {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return ShellInput::Msgs(vec![
            Msg::QueryInputChanged(line.trim_end_matches(['\r', '\n']).to_string()),
            Msg::QueryKeyPressed(Key::Enter),
        ]);
    };

    let mut words = command.split_whitespace();
    match words.next().unwrap_or_default() {
        "scrape" => ShellInput::Msgs(vec![
            Msg::CutoffDateChanged(words.next().unwrap_or_default().to_string()),
            Msg::RunTaskClicked(TaskKind::Scrapers),
        ]),
        "classify" => ShellInput::Msgs(vec![Msg::RunTaskClicked(TaskKind::Classifiers)]),
        "stats" => ShellInput::Msgs(vec![Msg::DashboardOpened]),
        "help" => ShellInput::Help,
        "quit" | "salir" | "exit" => ShellInput::Quit,
        other => ShellInput::Unknown(other.to_string()),
    }
}
