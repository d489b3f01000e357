use crashboard_core::{AppViewModel, DashboardView, QueryView, TaskKind, TaskPanelView};

use super::constants::*;
use super::UiCommand;

const DASHBOARD_LOADING: &str = "Cargando estadísticas...";
const QUERY_LOADING: &str = "Consultando...";

pub(crate) fn render(view: &AppViewModel) -> Vec<UiCommand> {
    let mut cmds = Vec::new();

    for panel in &view.tasks {
        render_task_panel(panel, &mut cmds);
    }
    render_dashboard(&view.dashboard, &mut cmds);
    render_query(&view.query, &mut cmds);

    cmds
}

fn render_task_panel(panel: &TaskPanelView, cmds: &mut Vec<UiCommand>) {
    let (button, log) = match panel.kind {
        TaskKind::Scrapers => (BUTTON_RUN_SCRAPERS, LOG_SCRAPERS),
        TaskKind::Classifiers => (BUTTON_RUN_CLASSIFIERS, LOG_CLASSIFIERS),
    };
    cmds.push(UiCommand::SetButton {
        control_id: button,
        caption: panel.kind.title(),
        label: panel.button_label,
        enabled: panel.button_enabled,
    });
    cmds.push(UiCommand::SetLog {
        control_id: log,
        title: panel.kind.title(),
        visible: panel.log_visible,
        text: panel.log_text.clone(),
    });
}

fn render_dashboard(dashboard: &DashboardView, cmds: &mut Vec<UiCommand>) {
    match dashboard {
        DashboardView::Closed => {}
        DashboardView::Loading => cmds.push(UiCommand::SetLoader {
            control_id: LOADER_DASHBOARD,
            visible: true,
            text: DASHBOARD_LOADING,
        }),
        DashboardView::Ready {
            kpis,
            media_chart,
            classification_chart,
        } => {
            cmds.push(UiCommand::SetLoader {
                control_id: LOADER_DASHBOARD,
                visible: false,
                text: DASHBOARD_LOADING,
            });
            cmds.push(UiCommand::SetKpis {
                control_id: PANEL_KPIS,
                kpis: kpis.clone(),
            });
            cmds.push(UiCommand::DrawChart {
                control_id: CHART_MEDIA,
                title: "Noticias por medio",
                chart: media_chart.clone(),
            });
            cmds.push(UiCommand::DrawChart {
                control_id: CHART_CLASSIFICATION,
                title: "Clasificación",
                chart: classification_chart.clone(),
            });
        }
        DashboardView::Failed { heading, body } => cmds.push(UiCommand::ReplaceContainer {
            control_id: PANEL_DASHBOARD,
            heading: *heading,
            body: *body,
        }),
    }
}

fn render_query(query: &QueryView, cmds: &mut Vec<UiCommand>) {
    cmds.push(UiCommand::SetLoader {
        control_id: LOADER_QUERY,
        visible: query.loader_visible,
        text: QUERY_LOADING,
    });
    let answer = query.answer.as_ref().filter(|_| query.results_visible);
    cmds.push(UiCommand::SetAnswer {
        control_id: LABEL_ANSWER,
        text: answer.map(|answer| answer.text.clone()),
    });
    cmds.push(UiCommand::SetSources {
        control_id: PANEL_SOURCES,
        sources: answer.map(|answer| answer.sources.clone()),
    });
    cmds.push(UiCommand::SetError {
        control_id: LABEL_QUERY_ERROR,
        message: query.error.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crashboard_core::{
        update, AppState, Msg, QueryResult, SourcesView, NO_SOURCES_PLACEHOLDER,
    };
    use pretty_assertions::assert_eq;

    fn find(cmds: &[UiCommand], control_id: ControlId) -> Option<&UiCommand> {
        cmds.iter().find(|cmd| cmd.control_id() == control_id)
    }

    #[test]
    fn both_buttons_lock_while_one_task_runs() {
        let (state, _) = update(AppState::new(), Msg::RunTaskClicked(TaskKind::Scrapers));
        let cmds = render(&state.view());

        assert_eq!(
            find(&cmds, BUTTON_RUN_SCRAPERS),
            Some(&UiCommand::SetButton {
                control_id: BUTTON_RUN_SCRAPERS,
                caption: "Scrapers",
                label: "Ejecutando...",
                enabled: false,
            })
        );
        assert_eq!(
            find(&cmds, BUTTON_RUN_CLASSIFIERS),
            Some(&UiCommand::SetButton {
                control_id: BUTTON_RUN_CLASSIFIERS,
                caption: "Clasificadores",
                label: "Ejecutar Todos",
                enabled: false,
            })
        );
    }

    #[test]
    fn closed_dashboard_renders_nothing() {
        let cmds = render(&AppState::new().view());
        assert!(find(&cmds, LOADER_DASHBOARD).is_none());
        assert!(find(&cmds, PANEL_DASHBOARD).is_none());
    }

    #[test]
    fn failed_dashboard_only_replaces_container() {
        let (state, _) = update(AppState::new(), Msg::DashboardOpened);
        let (state, _) = update(state, Msg::StatisticsFailed("boom".to_string()));
        let cmds = render(&state.view());

        assert!(matches!(
            find(&cmds, PANEL_DASHBOARD),
            Some(UiCommand::ReplaceContainer { .. })
        ));
        assert!(find(&cmds, PANEL_KPIS).is_none());
        assert!(find(&cmds, CHART_MEDIA).is_none());
    }

    #[test]
    fn placeholder_sources_render_without_cards() {
        let (state, _) = update(AppState::new(), Msg::QueryInputChanged("hola".to_string()));
        let (state, _) = update(state, Msg::QuerySubmitClicked);
        let (state, _) = update(
            state,
            Msg::QueryAnswered(QueryResult {
                answer_text: "Nada.".to_string(),
                sources: Vec::new(),
            }),
        );
        let cmds = render(&state.view());

        assert_eq!(
            find(&cmds, PANEL_SOURCES),
            Some(&UiCommand::SetSources {
                control_id: PANEL_SOURCES,
                sources: Some(SourcesView::Placeholder(NO_SOURCES_PLACEHOLDER)),
            })
        );
        assert_eq!(
            find(&cmds, LABEL_ANSWER),
            Some(&UiCommand::SetAnswer {
                control_id: LABEL_ANSWER,
                text: Some("Nada.".to_string()),
            })
        );
    }
}
