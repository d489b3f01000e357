use crate::{DashboardView, QueryView, TaskPanelView};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// Scraper panel first, classifier panel second.
    pub tasks: Vec<TaskPanelView>,
    pub dashboard: DashboardView,
    pub query: QueryView,
}

impl AppViewModel {
    pub fn task(&self, kind: crate::TaskKind) -> Option<&TaskPanelView> {
        self.tasks.iter().find(|panel| panel.kind == kind)
    }
}
