use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex, PoisonError};

use crashboard_core::{
    Effect, GeneralStats, MediumStats, Msg, QueryFailure, QueryResult, SourceDoc,
    StatisticsSnapshot, TaskKind,
};
use crashboard_engine::{
    Backend, EngineEvent, EngineHandle, ProgressSink, QueryAnswer, QueryError, RequestId,
    StatisticsPayload,
};
use crashboard_logging::{crash_info, crash_warn};

use super::app::AppEvent;

type TaskRoutes = Arc<Mutex<HashMap<RequestId, TaskKind>>>;

/// Executes core effects on the engine and feeds engine events back as `Msg`s.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
    routes: TaskRoutes,
    next_request_id: RequestId,
}

impl EffectRunner {
    pub(crate) fn new(
        backend: Arc<dyn Backend>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> std::io::Result<Self> {
        let routes = TaskRoutes::default();
        let sink = Arc::new(MsgSink {
            event_tx,
            routes: routes.clone(),
        });
        let engine = EngineHandle::start(backend, sink)?;
        Ok(Self {
            engine,
            routes,
            next_request_id: 1,
        })
    }

    pub(crate) fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let request_id = self.next_request_id;
            self.next_request_id += 1;
            match effect {
                Effect::RunTask { kind, path } => {
                    crash_info!("RunTask request_id={} kind={:?} path={}", request_id, kind, path);
                    self.routes
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .insert(request_id, kind);
                    self.engine.run_task(request_id, path);
                }
                Effect::FetchStatistics => {
                    crash_info!("FetchStatistics request_id={}", request_id);
                    self.engine.fetch_statistics(request_id);
                }
                Effect::SubmitQuery { question } => {
                    crash_info!(
                        "SubmitQuery request_id={} question_len={}",
                        request_id,
                        question.len()
                    );
                    self.engine.submit_query(request_id, question);
                }
            }
        }
    }
}

struct MsgSink {
    event_tx: mpsc::Sender<AppEvent>,
    routes: TaskRoutes,
}

impl MsgSink {
    fn task_kind(&self, request_id: RequestId, finished: bool) -> Option<TaskKind> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        let kind = if finished {
            routes.remove(&request_id)
        } else {
            routes.get(&request_id).copied()
        };
        if kind.is_none() {
            crash_warn!("Event for unknown task request_id={}", request_id);
        }
        kind
    }
}

impl ProgressSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        if let Some(msg) = self.translate(event) {
            let _ = self.event_tx.send(AppEvent::Ui(msg));
        }
    }
}

impl MsgSink {
    fn translate(&self, event: EngineEvent) -> Option<Msg> {
        let msg = match event {
            EngineEvent::TaskOutput { request_id, text } => {
                let kind = self.task_kind(request_id, false)?;
                Msg::TaskOutput { kind, text }
            }
            EngineEvent::TaskCompleted { request_id, result } => {
                let kind = self.task_kind(request_id, true)?;
                match result {
                    Ok(()) => Msg::TaskFinished { kind },
                    Err(err) => {
                        crash_warn!("Task {:?} failed: {} ({})", kind, err, err.kind);
                        Msg::TaskFailed {
                            kind,
                            message: err.to_string(),
                        }
                    }
                }
            }
            EngineEvent::StatisticsFetched { result, .. } => match result {
                Ok(payload) => Msg::StatisticsLoaded(map_statistics(payload)),
                Err(err) => {
                    crash_warn!("Error fetching dashboard data: {}", err);
                    Msg::StatisticsFailed(err.to_string())
                }
            },
            EngineEvent::QueryCompleted { result, .. } => match result {
                Ok(answer) => Msg::QueryAnswered(map_answer(answer)),
                Err(err) => {
                    crash_warn!("Query failed: {}", err);
                    Msg::QueryFailed(map_query_error(err))
                }
            },
        };
        Some(msg)
    }
}

fn map_statistics(payload: StatisticsPayload) -> StatisticsSnapshot {
    let general = payload.estadisticas_generales;
    StatisticsSnapshot {
        general: GeneralStats {
            total: general.total_noticias,
            accidentes: general.cantidad_accidentes,
            no_accidentes: general.cantidad_no_accidentes,
            sin_clasificar: general.cantidad_sin_clasificar,
        },
        by_medium: payload
            .estadisticas_por_medio
            .into_iter()
            .map(|(name, medium)| {
                (
                    name,
                    MediumStats {
                        total_noticias: medium.total_noticias,
                    },
                )
            })
            .collect(),
    }
}

fn map_answer(answer: QueryAnswer) -> QueryResult {
    QueryResult {
        answer_text: answer.respuesta,
        sources: answer
            .noticias_relevantes
            .into_iter()
            .map(|news| SourceDoc {
                title: news.titulo,
                content: news.contenido,
                date: news.fecha,
                medium_id: news.media_id,
                url: news.url,
            })
            .collect(),
    }
}

fn map_query_error(err: QueryError) -> QueryFailure {
    match err {
        QueryError::Rejected { detail, .. } => QueryFailure::ServerRejected { detail },
        QueryError::Request(err) => QueryFailure::Transport(err.to_string()),
    }
}
