use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Decoded fragment of a task's progress stream, in arrival order.
    TaskOutput { request_id: RequestId, text: String },
    /// The task stream ended or failed; sent after every fragment.
    TaskCompleted {
        request_id: RequestId,
        result: Result<(), RequestError>,
    },
    StatisticsFetched {
        request_id: RequestId,
        result: Result<StatisticsPayload, RequestError>,
    },
    QueryCompleted {
        request_id: RequestId,
        result: Result<QueryAnswer, QueryError>,
    },
}

/// `GET /estadisticas` body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatisticsPayload {
    pub estadisticas_generales: GeneralPayload,
    /// Keyed by outlet; iteration follows the order the server wrote.
    #[serde(default)]
    pub estadisticas_por_medio: IndexMap<String, MediumPayload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GeneralPayload {
    pub total_noticias: u64,
    pub cantidad_accidentes: u64,
    pub cantidad_no_accidentes: u64,
    pub cantidad_sin_clasificar: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MediumPayload {
    pub total_noticias: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub pregunta: &'a str,
}

/// `POST /consultar` success body.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryAnswer {
    pub respuesta: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub noticias_relevantes: Vec<NewsPayload>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsPayload {
    pub titulo: String,
    pub contenido: String,
    pub fecha: String,
    #[serde(default)]
    pub media_id: Option<String>,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// String details are used as-is; structured ones (validation errors)
    /// are rendered as compact JSON.
    pub(crate) fn into_detail(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text),
            other => Some(other.to_string()),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<NewsPayload>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<NewsPayload>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
}

impl RequestError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Non-success status; `detail` is taken from a JSON `{detail}` body.
    #[error("query rejected with status {status}")]
    Rejected { status: u16, detail: Option<String> },
    #[error(transparent)]
    Request(#[from] RequestError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "invalid response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
