//! Crashboard engine: backend client, stream decoding and effect execution.
mod client;
mod decode;
mod engine;
mod types;

pub use client::{Backend, ChannelProgressSink, ClientSettings, ProgressSink, ReqwestBackend};
pub use decode::StreamDecoder;
pub use engine::EngineHandle;
pub use types::{
    EngineEvent, FailureKind, GeneralPayload, MediumPayload, NewsPayload, QueryAnswer,
    QueryError, RequestError, RequestId, StatisticsPayload,
};
