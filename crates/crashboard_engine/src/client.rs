use std::time::Duration;

use crashboard_logging::{crash_net, crash_warn};
use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::types::{ErrorBody, QueryRequest};
use crate::{
    EngineEvent, FailureKind, QueryAnswer, QueryError, RequestError, RequestId, StatisticsPayload,
    StreamDecoder,
};

pub const STATISTICS_PATH: &str = "/estadisticas";
pub const QUERY_PATH: &str = "/consultar";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// Overall limit for `/consultar`. Task streams and statistics never time out.
    pub query_timeout: Option<Duration>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:8000").expect("static url"),
            connect_timeout: Duration::from_secs(10),
            query_timeout: None,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// The three backend services the dashboard talks to.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// POSTs `path` and forwards the decoded body to `sink` as
    /// [`EngineEvent::TaskOutput`] until the stream ends.
    async fn run_task(
        &self,
        request_id: RequestId,
        path: &str,
        sink: &dyn ProgressSink,
    ) -> Result<(), RequestError>;

    async fn fetch_statistics(&self) -> Result<StatisticsPayload, RequestError>;

    async fn submit_query(&self, question: &str) -> Result<QueryAnswer, QueryError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: ClientSettings) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| RequestError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    /// Appends `path` to the base URL, keeping any path prefix the base has.
    fn endpoint(&self, path: &str) -> Result<Url, RequestError> {
        let base = self.settings.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}"))
            .map_err(|err| RequestError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn run_task(
        &self,
        request_id: RequestId,
        path: &str,
        sink: &dyn ProgressSink,
    ) -> Result<(), RequestError> {
        let url = self.endpoint(path)?;
        crash_net!("POST {} request_id={}", url, request_id);

        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("http status {status}"),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        let mut decoder = StreamDecoder::for_content_type(content_type.as_deref());

        let mut received: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            received += chunk.len() as u64;
            let text = decoder.feed(&chunk);
            if !text.is_empty() {
                sink.emit(EngineEvent::TaskOutput { request_id, text });
            }
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            sink.emit(EngineEvent::TaskOutput {
                request_id,
                text: tail,
            });
        }
        crash_net!("stream request_id={} ended after {} bytes", request_id, received);
        Ok(())
    }

    async fn fetch_statistics(&self) -> Result<StatisticsPayload, RequestError> {
        let url = self.endpoint(STATISTICS_PATH)?;
        crash_net!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("HTTP error! status: {}", status.as_u16()),
            ));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| RequestError::new(FailureKind::Decode, err.to_string()))
    }

    async fn submit_query(&self, question: &str) -> Result<QueryAnswer, QueryError> {
        let url = self.endpoint(QUERY_PATH)?;
        crash_net!("POST {} question_len={}", url, question.len());

        let body = serde_json::to_vec(&QueryRequest { pregunta: question })
            .map_err(|err| RequestError::new(FailureKind::Decode, err.to_string()))?;
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(timeout) = self.settings.query_timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();

        if !status.is_success() {
            let detail = match response.bytes().await {
                Ok(body) => match serde_json::from_slice::<ErrorBody>(&body) {
                    Ok(error_body) => error_body.into_detail(),
                    Err(err) => {
                        crash_warn!("Unreadable error body for status {}: {}", status, err);
                        None
                    }
                },
                Err(err) => {
                    crash_warn!("Error body for status {} was cut short: {}", status, err);
                    None
                }
            };
            return Err(QueryError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&body)
            .map_err(|err| RequestError::new(FailureKind::Decode, err.to_string()).into())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return RequestError::new(FailureKind::Decode, err.to_string());
    }
    RequestError::new(FailureKind::Network, err.to_string())
}
