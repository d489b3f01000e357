//! Crashboard core: pure controllers, state machine and view-model helpers.
mod dashboard;
mod effect;
mod format;
mod msg;
mod query;
mod state;
mod tasks;
mod update;
mod view_model;

pub use dashboard::{
    ChartKind, ChartView, Color, DashboardView, GeneralStats, KpiView, MediumStats,
    StatisticsSnapshot, CLASSIFICATION_LABELS, ERROR_BODY, ERROR_HEADING,
};
pub use effect::Effect;
pub use format::format_es_date;
pub use msg::{Key, Msg};
pub use query::{
    AnswerView, QueryFailure, QueryResult, QueryView, SourceCardView, SourceDoc, SourcesView,
    EMPTY_QUERY_ERROR, GENERIC_SERVER_ERROR, NO_SOURCES_PLACEHOLDER, READ_MORE_LABEL,
};
pub use state::AppState;
pub use tasks::{
    scraper_path, InvalidCutoff, RunOutcome, TaskKind, TaskPanelView, CLASSIFIERS_PATH,
    LABEL_IDLE, LABEL_RUNNING, LOG_DONE, LOG_START, SCRAPERS_PATH,
};
pub use update::update;
pub use view_model::AppViewModel;
