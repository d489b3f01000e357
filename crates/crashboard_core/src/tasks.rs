//! Task runner controller: two run controls sharing one in-flight lock.
use chrono::NaiveDate;

use crate::Effect;

pub const SCRAPERS_PATH: &str = "/acciones/ejecutar-scrapers";
pub const CLASSIFIERS_PATH: &str = "/acciones/ejecutar-clasificadores";

pub const LABEL_IDLE: &str = "Ejecutar Todos";
pub const LABEL_RUNNING: &str = "Ejecutando...";

pub const LOG_START: &str = "Iniciando tarea...\n";
pub const LOG_DONE: &str = "\n✅ Tarea completada.\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TaskKind {
    Scrapers,
    Classifiers,
}

impl TaskKind {
    pub const ALL: [TaskKind; 2] = [TaskKind::Scrapers, TaskKind::Classifiers];

    pub fn title(self) -> &'static str {
        match self {
            TaskKind::Scrapers => "Scrapers",
            TaskKind::Classifiers => "Clasificadores",
        }
    }
}

/// How the most recent run of a panel ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCutoff(pub String);

/// Builds the scraper endpoint path. The cutoff is appended only when the
/// trimmed input is non-empty, and it must be a `YYYY-MM-DD` date.
pub fn scraper_path(cutoff: &str) -> Result<String, InvalidCutoff> {
    let cutoff = cutoff.trim();
    if cutoff.is_empty() {
        return Ok(SCRAPERS_PATH.to_string());
    }
    // chrono accepts unpadded fields and signed years; only the canonical
    // form is passed through.
    let canonical = NaiveDate::parse_from_str(cutoff, "%Y-%m-%d")
        .map(|date| date.format("%Y-%m-%d").to_string());
    if canonical.as_deref() != Ok(cutoff) {
        return Err(InvalidCutoff(cutoff.to_string()));
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("fecha_limite", cutoff)
        .finish();
    Ok(format!("{SCRAPERS_PATH}?{query}"))
}

/// The single "task in flight" flag both run handlers consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct TaskCoordinator {
    in_flight: Option<TaskKind>,
}

impl TaskCoordinator {
    pub(crate) fn in_flight(&self) -> Option<TaskKind> {
        self.in_flight
    }

    fn try_acquire(&mut self, kind: TaskKind) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        self.in_flight = Some(kind);
        true
    }

    fn release(&mut self, kind: TaskKind) -> bool {
        if self.in_flight != Some(kind) {
            return false;
        }
        self.in_flight = None;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct TaskRunState {
    log_visible: bool,
    log_text: String,
    last_outcome: Option<RunOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPanelView {
    pub kind: TaskKind,
    pub button_label: &'static str,
    pub button_enabled: bool,
    pub log_visible: bool,
    pub log_text: String,
    pub last_outcome: Option<RunOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct TaskRunner {
    coordinator: TaskCoordinator,
    scrapers: TaskRunState,
    classifiers: TaskRunState,
    cutoff_input: String,
}

impl TaskRunner {
    fn panel_mut(&mut self, kind: TaskKind) -> &mut TaskRunState {
        match kind {
            TaskKind::Scrapers => &mut self.scrapers,
            TaskKind::Classifiers => &mut self.classifiers,
        }
    }

    fn panel(&self, kind: TaskKind) -> &TaskRunState {
        match kind {
            TaskKind::Scrapers => &self.scrapers,
            TaskKind::Classifiers => &self.classifiers,
        }
    }

    pub(crate) fn in_flight(&self) -> Option<TaskKind> {
        self.coordinator.in_flight()
    }

    pub(crate) fn set_cutoff(&mut self, raw: String) -> bool {
        if self.cutoff_input == raw {
            return false;
        }
        self.cutoff_input = raw;
        true
    }

    /// Returns `None` when the click is refused: another run holds the lock,
    /// or the cutoff date was rejected locally.
    pub(crate) fn start(&mut self, kind: TaskKind) -> Option<Effect> {
        if self.coordinator.in_flight().is_some() {
            return None;
        }
        let path = match kind {
            TaskKind::Scrapers => match scraper_path(&self.cutoff_input) {
                Ok(path) => path,
                Err(InvalidCutoff(value)) => {
                    let panel = self.panel_mut(kind);
                    panel.log_visible = true;
                    panel.log_text = format!("❌ Fecha límite inválida: {value}\n");
                    panel.last_outcome = Some(RunOutcome::Rejected);
                    return None;
                }
            },
            TaskKind::Classifiers => CLASSIFIERS_PATH.to_string(),
        };
        if !self.coordinator.try_acquire(kind) {
            return None;
        }
        let panel = self.panel_mut(kind);
        panel.log_visible = true;
        panel.log_text = LOG_START.to_string();
        panel.last_outcome = None;
        Some(Effect::RunTask { kind, path })
    }

    pub(crate) fn append_output(&mut self, kind: TaskKind, text: &str) -> bool {
        if self.coordinator.in_flight() != Some(kind) || text.is_empty() {
            return false;
        }
        self.panel_mut(kind).log_text.push_str(text);
        true
    }

    /// Ends the run on either exit path; the lock is cleared unconditionally.
    pub(crate) fn finish(&mut self, kind: TaskKind, failure: Option<&str>) -> bool {
        if !self.coordinator.release(kind) {
            return false;
        }
        let panel = self.panel_mut(kind);
        match failure {
            None => {
                panel.log_text.push_str(LOG_DONE);
                panel.last_outcome = Some(RunOutcome::Completed);
            }
            Some(message) => {
                panel
                    .log_text
                    .push_str(&format!("\n❌ Error al ejecutar la tarea: {message}\n"));
                panel.last_outcome = Some(RunOutcome::Failed);
            }
        }
        true
    }

    pub(crate) fn view(&self) -> Vec<TaskPanelView> {
        let in_flight = self.coordinator.in_flight();
        TaskKind::ALL
            .iter()
            .map(|&kind| {
                let panel = self.panel(kind);
                TaskPanelView {
                    kind,
                    button_label: if in_flight == Some(kind) {
                        LABEL_RUNNING
                    } else {
                        LABEL_IDLE
                    },
                    button_enabled: in_flight.is_none(),
                    log_visible: panel.log_visible,
                    log_text: panel.log_text.clone(),
                    last_outcome: panel.last_outcome,
                }
            })
            .collect()
    }
}
