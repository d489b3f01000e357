use crate::{QueryFailure, QueryResult, StatisticsSnapshot, TaskKind};

/// Keys the query input reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the cutoff date field of the scraper panel.
    CutoffDateChanged(String),
    /// User clicked the run control of a task panel.
    RunTaskClicked(TaskKind),
    /// Engine decoded another fragment of a task's progress stream.
    TaskOutput { kind: TaskKind, text: String },
    /// Engine reached the end of a task's progress stream.
    TaskFinished { kind: TaskKind },
    /// Request or stream read failed for a task.
    TaskFailed { kind: TaskKind, message: String },
    /// Dashboard page was opened.
    DashboardOpened,
    /// Statistics payload arrived.
    StatisticsLoaded(StatisticsSnapshot),
    /// Statistics request failed.
    StatisticsFailed(String),
    /// User edited the query input.
    QueryInputChanged(String),
    /// User clicked the query button.
    QuerySubmitClicked,
    /// Key released while the query input has focus.
    QueryKeyPressed(Key),
    /// Query endpoint answered.
    QueryAnswered(QueryResult),
    /// Query request failed.
    QueryFailed(QueryFailure),
}
