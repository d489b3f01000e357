pub(crate) mod chart;
pub(crate) mod constants;
pub(crate) mod render;
mod terminal;

pub(crate) use terminal::TerminalSurface;

use crashboard_core::{ChartView, KpiView, SourcesView};

use self::constants::ControlId;

/// Retained-mode instructions for a surface; applying the same command twice
/// leaves the surface unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UiCommand {
    SetButton {
        control_id: ControlId,
        caption: &'static str,
        label: &'static str,
        enabled: bool,
    },
    SetLog {
        control_id: ControlId,
        title: &'static str,
        visible: bool,
        text: String,
    },
    SetLoader {
        control_id: ControlId,
        visible: bool,
        text: &'static str,
    },
    SetKpis {
        control_id: ControlId,
        kpis: Vec<KpiView>,
    },
    DrawChart {
        control_id: ControlId,
        title: &'static str,
        chart: ChartView,
    },
    /// Discards every child of the container and shows only this message.
    ReplaceContainer {
        control_id: ControlId,
        heading: &'static str,
        body: &'static str,
    },
    SetAnswer {
        control_id: ControlId,
        text: Option<String>,
    },
    SetSources {
        control_id: ControlId,
        sources: Option<SourcesView>,
    },
    SetError {
        control_id: ControlId,
        message: Option<String>,
    },
}

impl UiCommand {
    pub(crate) fn control_id(&self) -> ControlId {
        match self {
            UiCommand::SetButton { control_id, .. }
            | UiCommand::SetLog { control_id, .. }
            | UiCommand::SetLoader { control_id, .. }
            | UiCommand::SetKpis { control_id, .. }
            | UiCommand::DrawChart { control_id, .. }
            | UiCommand::ReplaceContainer { control_id, .. }
            | UiCommand::SetAnswer { control_id, .. }
            | UiCommand::SetSources { control_id, .. }
            | UiCommand::SetError { control_id, .. } => *control_id,
        }
    }
}
