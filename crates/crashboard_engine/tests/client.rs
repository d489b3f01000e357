use std::sync::{Arc, Mutex};
use std::time::Duration;

use crashboard_engine::{
    Backend, ClientSettings, EngineEvent, FailureKind, ProgressSink, QueryError, ReqwestBackend,
};
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    fn text(&self) -> String {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|event| match event {
                EngineEvent::TaskOutput { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn backend_for(server: &MockServer) -> ReqwestBackend {
    backend_at(Url::parse(&server.uri()).unwrap())
}

/// Serves one connection: reads the request, writes `head` and `fragment`,
/// then drops the socket without finishing the body.
async fn truncating_server(head: &'static str, fragment: &'static str) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(fragment.as_bytes()).await.unwrap();
        socket.flush().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

async fn read_request(socket: &mut tokio::net::TcpStream) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            return;
        }
        request.extend_from_slice(&buf[..n]);
        let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&request[..end]).to_ascii_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if request.len() >= end + 4 + body_len {
            return;
        }
    }
}

fn backend_at(base_url: Url) -> ReqwestBackend {
    ReqwestBackend::new(ClientSettings {
        base_url,
        ..ClientSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn run_task_streams_decoded_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/acciones/ejecutar-scrapers"))
        .and(query_param("fecha_limite", "2024-01-01"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "🚀 Iniciando scrapers\n✅ todojujuy: 12 noticias\n".as_bytes().to_vec(),
            "text/plain; charset=utf-8",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let sink = TestSink::default();
    backend
        .run_task(1, "/acciones/ejecutar-scrapers?fecha_limite=2024-01-01", &sink)
        .await
        .expect("stream ok");

    assert_eq!(sink.text(), "🚀 Iniciando scrapers\n✅ todojujuy: 12 noticias\n");
    assert!(sink
        .events
        .lock()
        .unwrap()
        .iter()
        .all(|event| matches!(event, EngineEvent::TaskOutput { request_id: 1, .. })));
}

#[tokio::test]
async fn run_task_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/acciones/ejecutar-clasificadores"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let sink = TestSink::default();
    let err = backend
        .run_task(2, "/acciones/ejecutar-clasificadores", &sink)
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(sink.text(), "");
}

#[tokio::test]
async fn run_task_reports_unreachable_backend() {
    let settings = ClientSettings {
        base_url: Url::parse("http://127.0.0.1:9").unwrap(),
        connect_timeout: Duration::from_millis(500),
        query_timeout: None,
    };
    let backend = ReqwestBackend::new(settings).unwrap();
    let err = backend
        .run_task(3, "/acciones/ejecutar-scrapers", &TestSink::default())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
}

#[tokio::test]
async fn base_url_path_prefix_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/panel/estadisticas"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"estadisticas_generales": {"total_noticias": 0, "cantidad_accidentes": 0,
                "cantidad_no_accidentes": 0, "cantidad_sin_clasificar": 0},
                "estadisticas_por_medio": {}}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: Url::parse(&format!("{}/panel/", server.uri())).unwrap(),
        ..ClientSettings::default()
    };
    let backend = ReqwestBackend::new(settings).unwrap();
    let payload = backend.fetch_statistics().await.expect("statistics");
    assert!(payload.estadisticas_por_medio.is_empty());
}

#[tokio::test]
async fn fetch_statistics_decodes_payload_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/estadisticas"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"estadisticas_generales": {"total_noticias": 8, "cantidad_accidentes": 3,
                "cantidad_no_accidentes": 4, "cantidad_sin_clasificar": 1},
                "estadisticas_por_medio": {"B": {"total_noticias": 5}, "A": {"total_noticias": 3}}}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let payload = backend_for(&server).fetch_statistics().await.unwrap();
    assert_eq!(payload.estadisticas_generales.total_noticias, 8);
    let outlets: Vec<_> = payload
        .estadisticas_por_medio
        .iter()
        .map(|(name, stats)| (name.as_str(), stats.total_noticias))
        .collect();
    assert_eq!(outlets, vec![("B", 5), ("A", 3)]);
}

#[tokio::test]
async fn fetch_statistics_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/estadisticas"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = backend_for(&server).fetch_statistics().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
    assert_eq!(err.message, "HTTP error! status: 503");
}

#[tokio::test]
async fn fetch_statistics_rejects_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/estadisticas"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server).fetch_statistics().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn submit_query_posts_json_and_decodes_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/consultar"))
        .and(body_json(serde_json::json!({"pregunta": "¿Hubo choques?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "respuesta": "Sí, dos.",
            "noticias_relevantes": [{
                "titulo": "Choque",
                "contenido": "Detalle",
                "fecha": "2024-05-02T09:00:00",
                "media_id": "pregon",
                "url": "https://example.com/n/1"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let answer = backend_for(&server)
        .submit_query("¿Hubo choques?")
        .await
        .expect("answer");
    assert_eq!(answer.respuesta, "Sí, dos.");
    assert_eq!(answer.noticias_relevantes.len(), 1);
    assert_eq!(
        answer.noticias_relevantes[0].media_id.as_deref(),
        Some("pregon")
    );
}

#[tokio::test]
async fn submit_query_surfaces_error_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/consultar"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"detail": "LLM no disponible"})),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server).submit_query("hola").await.unwrap_err();
    assert_eq!(
        err,
        QueryError::Rejected {
            status: 500,
            detail: Some("LLM no disponible".to_string()),
        }
    );
}

#[tokio::test]
async fn submit_query_without_json_error_body_has_no_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/consultar"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = backend_for(&server).submit_query("hola").await.unwrap_err();
    assert_eq!(
        err,
        QueryError::Rejected {
            status: 502,
            detail: None,
        }
    );
}

#[tokio::test]
async fn submit_query_honours_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/consultar"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(serde_json::json!({"respuesta": "tarde"})),
        )
        .mount(&server)
        .await;

    let settings = ClientSettings {
        base_url: Url::parse(&server.uri()).unwrap(),
        query_timeout: Some(Duration::from_millis(50)),
        ..ClientSettings::default()
    };
    let err = ReqwestBackend::new(settings)
        .unwrap()
        .submit_query("hola")
        .await
        .unwrap_err();
    match err {
        QueryError::Request(err) => assert_eq!(err.kind, FailureKind::Timeout),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn run_task_delivers_fragments_before_dropped_connection_error() {
    let base_url = truncating_server(
        concat!(
            "HTTP/1.1 200 OK\r\n",
            "Content-Type: text/plain; charset=utf-8\r\n",
            "Transfer-Encoding: chunked\r\n\r\n",
        ),
        "a\r\nIniciando\n\r\n",
    )
    .await;

    let sink = TestSink::default();
    let err = backend_at(base_url)
        .run_task(9, "/acciones/ejecutar-clasificadores", &sink)
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Network);
    assert_eq!(sink.text(), "Iniciando\n");
}

#[tokio::test]
async fn submit_query_with_truncated_error_body_falls_back_to_no_detail() {
    let base_url = truncating_server(
        concat!(
            "HTTP/1.1 500 Internal Server Error\r\n",
            "Content-Type: application/json\r\n",
            "Content-Length: 64\r\n\r\n",
        ),
        "{\"detail\": \"LLM",
    )
    .await;

    let err = backend_at(base_url).submit_query("hola").await.unwrap_err();
    assert_eq!(
        err,
        QueryError::Rejected {
            status: 500,
            detail: None,
        }
    );
}
