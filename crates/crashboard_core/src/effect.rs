use crate::TaskKind;

/// Side effects requested by [`crate::update`]; the app executes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// POST `path` and stream the response body back as task output.
    RunTask { kind: TaskKind, path: String },
    /// GET the statistics payload.
    FetchStatistics,
    /// POST the trimmed question to the query endpoint.
    SubmitQuery { question: String },
}
