use crate::dashboard::DashboardController;
use crate::query::QueryController;
use crate::tasks::TaskRunner;
use crate::view_model::AppViewModel;
use crate::TaskKind;

/// One controller per page, each owning only the view state it touches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    pub(crate) tasks: TaskRunner,
    pub(crate) dashboard: DashboardController,
    pub(crate) query: QueryController,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            tasks: self.tasks.view(),
            dashboard: self.dashboard.view(),
            query: self.query.view(),
        }
    }

    pub fn task_in_flight(&self) -> Option<TaskKind> {
        self.tasks.in_flight()
    }

    /// True while any request issued by a controller is still outstanding.
    pub fn is_busy(&self) -> bool {
        self.tasks.in_flight().is_some() || self.dashboard.is_loading() || self.query.is_pending()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
