use std::sync::{mpsc, Arc};
use std::time::Duration;

use crashboard_engine::{
    Backend, ChannelProgressSink, EngineEvent, EngineHandle, FailureKind, GeneralPayload,
    ProgressSink, QueryAnswer, QueryError, RequestError, RequestId, StatisticsPayload,
    StreamDecoder,
};
use pretty_assertions::assert_eq;

/// Replays raw byte chunks, then either ends or fails.
struct ScriptedBackend {
    chunks: Vec<Vec<u8>>,
    fail_after: bool,
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn run_task(
        &self,
        request_id: RequestId,
        _path: &str,
        sink: &dyn ProgressSink,
    ) -> Result<(), RequestError> {
        let mut decoder = StreamDecoder::utf8();
        for chunk in &self.chunks {
            let text = decoder.feed(chunk);
            if !text.is_empty() {
                sink.emit(EngineEvent::TaskOutput { request_id, text });
            }
        }
        if self.fail_after {
            return Err(RequestError {
                kind: FailureKind::Network,
                message: "connection reset".to_string(),
            });
        }
        Ok(())
    }

    async fn fetch_statistics(&self) -> Result<StatisticsPayload, RequestError> {
        Ok(StatisticsPayload {
            estadisticas_generales: GeneralPayload {
                total_noticias: 1,
                cantidad_accidentes: 1,
                cantidad_no_accidentes: 0,
                cantidad_sin_clasificar: 0,
            },
            estadisticas_por_medio: Default::default(),
        })
    }

    async fn submit_query(&self, _question: &str) -> Result<QueryAnswer, QueryError> {
        Err(QueryError::Rejected {
            status: 500,
            detail: None,
        })
    }
}

fn start(backend: ScriptedBackend) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    let sink: Arc<dyn ProgressSink> = Arc::new(ChannelProgressSink::new(tx));
    let engine = EngineHandle::start(Arc::new(backend), sink).expect("engine");
    (engine, rx)
}

fn collect_until_completed(rx: &mpsc::Receiver<EngineEvent>) -> Vec<EngineEvent> {
    let mut events = Vec::new();
    loop {
        let event = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("engine event");
        let done = matches!(event, EngineEvent::TaskCompleted { .. });
        events.push(event);
        if done {
            return events;
        }
    }
}

#[test]
fn task_output_precedes_completion_and_keeps_split_characters() {
    let bytes = "línea 1\nlínea 2\n".as_bytes();
    let chunks = bytes.chunks(3).map(<[u8]>::to_vec).collect();
    let (engine, rx) = start(ScriptedBackend {
        chunks,
        fail_after: false,
    });

    engine.run_task(7, "/acciones/ejecutar-clasificadores");
    let events = collect_until_completed(&rx);

    let (last, output) = events.split_last().unwrap();
    let text: String = output
        .iter()
        .map(|event| match event {
            EngineEvent::TaskOutput {
                request_id: 7,
                text,
            } => text.as_str(),
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(text, "línea 1\nlínea 2\n");
    assert_eq!(
        last,
        &EngineEvent::TaskCompleted {
            request_id: 7,
            result: Ok(()),
        }
    );
}

#[test]
fn failure_mid_stream_is_reported_after_delivered_chunks() {
    let (engine, rx) = start(ScriptedBackend {
        chunks: vec![b"uno\n".to_vec(), b"dos\n".to_vec()],
        fail_after: true,
    });

    engine.run_task(9, "/acciones/ejecutar-scrapers");
    let events = collect_until_completed(&rx);

    assert_eq!(
        events,
        vec![
            EngineEvent::TaskOutput {
                request_id: 9,
                text: "uno\n".to_string(),
            },
            EngineEvent::TaskOutput {
                request_id: 9,
                text: "dos\n".to_string(),
            },
            EngineEvent::TaskCompleted {
                request_id: 9,
                result: Err(RequestError {
                    kind: FailureKind::Network,
                    message: "connection reset".to_string(),
                }),
            },
        ]
    );
}

#[test]
fn statistics_and_query_results_carry_request_ids() {
    let (engine, rx) = start(ScriptedBackend {
        chunks: Vec::new(),
        fail_after: false,
    });

    engine.fetch_statistics(1);
    engine.submit_query(2, "hola");

    let mut seen = Vec::new();
    for _ in 0..2 {
        match rx.recv_timeout(Duration::from_secs(5)).expect("event") {
            EngineEvent::StatisticsFetched { request_id, result } => {
                assert!(result.is_ok());
                seen.push(request_id);
            }
            EngineEvent::QueryCompleted { request_id, result } => {
                assert!(matches!(result, Err(QueryError::Rejected { status: 500, .. })));
                seen.push(request_id);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2]);
}
