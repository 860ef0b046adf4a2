use super::*;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use tokio::{net::TcpListener, sync::oneshot};

type CapturedRequest = (HeaderMap, String);

#[derive(Clone)]
struct ServerState {
    tx: Arc<Mutex<Option<oneshot::Sender<CapturedRequest>>>>,
    status: StatusCode,
    body: &'static str,
}

async fn handle_table(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, String) {
    if let Some(tx) = state.tx.lock().await.take() {
        let _ = tx.send((headers, body));
    }
    (state.status, state.body.to_string())
}

async fn spawn_table_server(
    status: StatusCode,
    body: &'static str,
) -> std::io::Result<(String, oneshot::Receiver<CapturedRequest>)> {
    let (tx, rx) = oneshot::channel();
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = Router::new()
        .route("/table", post(handle_table))
        .with_state(ServerState {
            tx: Arc::new(Mutex::new(Some(tx))),
            status,
            body,
        });
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/table"), rx))
}

#[tokio::test]
async fn http_transport_posts_json_with_auth_and_accept_headers() {
    let (endpoint, captured) = spawn_table_server(StatusCode::OK, r#"{"page":1}"#)
        .await
        .expect("spawn server");

    let response = HttpTransport::new()
        .send(OutgoingRequest {
            endpoint,
            auth_token: "secret-token".to_string(),
            accept: "application/csv",
            body: r#"{"page":"all"}"#.to_string(),
        })
        .await
        .expect("send");

    assert_eq!(response.status, 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(response.body, r#"{"page":1}"#);
    assert!(response.is_success());

    let (headers, body) = captured.await.expect("captured request");
    assert_eq!(headers["x-auth"], "secret-token");
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["accept"], "application/csv");
    assert_eq!(body, r#"{"page":"all"}"#);
}

#[tokio::test]
async fn http_transport_keeps_error_status_and_reason() {
    let (endpoint, _captured) = spawn_table_server(StatusCode::FORBIDDEN, "nope")
        .await
        .expect("spawn server");

    let response = HttpTransport::new()
        .send(OutgoingRequest {
            endpoint,
            auth_token: String::new(),
            accept: "application/json",
            body: "{}".to_string(),
        })
        .await
        .expect("send");

    assert_eq!(response.status, 403);
    assert_eq!(response.status_text, "Forbidden");
    assert!(!response.is_success());
}

#[tokio::test]
async fn http_transport_reports_unreachable_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let result = HttpTransport::new()
        .send(OutgoingRequest {
            endpoint: format!("http://{addr}/table"),
            auth_token: String::new(),
            accept: "application/json",
            body: "{}".to_string(),
        })
        .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn controller_over_http_surfaces_server_error() {
    let (endpoint, captured) =
        spawn_table_server(StatusCode::FORBIDDEN, r#"{"error":"bad token"}"#)
            .await
            .expect("spawn server");

    let controller = TableController::new(
        TableConfig::new(endpoint).with_token("wrong", false),
        Arc::new(HttpTransport::new()),
        Arc::new(DetachedUrlStore),
        Arc::new(DirectoryFileSaver::new(std::env::temp_dir())),
    );
    controller.apply_filters().await;

    let state = controller.state().await;
    assert_eq!(state.error.as_deref(), Some("bad token"));
    assert!(!state.is_loading);
    assert!(!state.were_filters_applied);

    let (headers, body) = captured.await.expect("captured request");
    assert_eq!(headers["x-auth"], "wrong");
    assert_eq!(headers["accept"], "application/json");
    let body: serde_json::Value = serde_json::from_str(&body).expect("json body");
    assert_eq!(body["page"], serde_json::json!(1));
    assert_eq!(body["pageSize"], serde_json::json!(10));
}
