use std::sync::{mpsc, Arc};
use std::thread;

use crashboard_logging::{crash_debug, crash_warn};

use crate::client::{Backend, ProgressSink};
use crate::{EngineEvent, RequestId};

enum EngineCommand {
    RunTask { request_id: RequestId, path: String },
    FetchStatistics { request_id: RequestId },
    SubmitQuery { request_id: RequestId, question: String },
}

/// Runs backend requests on a dedicated thread with its own tokio runtime.
///
/// Every event, including task output, is delivered through the sink given
/// at start-up. Commands run concurrently; the caller decides what may overlap.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn start(
        backend: Arc<dyn Backend>,
        sink: Arc<dyn ProgressSink>,
    ) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("crashboard-engine")
            .build()?;

        thread::Builder::new()
            .name("crashboard-engine-dispatch".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backend = backend.clone();
                    let sink = sink.clone();
                    runtime.spawn(async move {
                        handle_command(backend.as_ref(), command, sink.as_ref()).await;
                    });
                }
                crash_debug!("Engine command channel closed");
                runtime.shutdown_background();
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn run_task(&self, request_id: RequestId, path: impl Into<String>) {
        self.send(EngineCommand::RunTask {
            request_id,
            path: path.into(),
        });
    }

    pub fn fetch_statistics(&self, request_id: RequestId) {
        self.send(EngineCommand::FetchStatistics { request_id });
    }

    pub fn submit_query(&self, request_id: RequestId, question: impl Into<String>) {
        self.send(EngineCommand::SubmitQuery {
            request_id,
            question: question.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            crash_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(backend: &dyn Backend, command: EngineCommand, sink: &dyn ProgressSink) {
    match command {
        EngineCommand::RunTask { request_id, path } => {
            let result = backend.run_task(request_id, &path, sink).await;
            sink.emit(EngineEvent::TaskCompleted { request_id, result });
        }
        EngineCommand::FetchStatistics { request_id } => {
            let result = backend.fetch_statistics().await;
            sink.emit(EngineEvent::StatisticsFetched { request_id, result });
        }
        EngineCommand::SubmitQuery {
            request_id,
            question,
        } => {
            let result = backend.submit_query(&question).await;
            sink.emit(EngineEvent::QueryCompleted { request_id, result });
        }
    }
}
