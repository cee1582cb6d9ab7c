use axum::{
    Router,
    body::{Body, to_bytes},
    extract::{Request, State},
    http::{StatusCode, header},
    response::Response,
};
use std::sync::{Arc, Mutex};
use tokio::{net::TcpListener, sync::oneshot};

/// What the stub saw of the first request it answered.
#[derive(Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path_and_query: String,
    pub body: String,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: String,
    seen: Arc<Mutex<Option<oneshot::Sender<RecordedRequest>>>>,
}

/// Answers every request on a random local port with `status` and a JSON `body`.
///
/// Returns the base URL and a receiver yielding the first request received.
pub async fn serve_once(
    status: u16,
    body: String,
) -> (String, oneshot::Receiver<RecordedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    let (tx, rx) = oneshot::channel();

    let stub = Stub {
        status: StatusCode::from_u16(status).expect("valid status"),
        body,
        seen: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new().fallback(answer).with_state(stub);

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });

    (format!("http://{addr}"), rx)
}

async fn answer(State(stub): State<Stub>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.expect("read body");

    if let Some(tx) = stub.seen.lock().expect("stub lock").take() {
        let _ = tx.send(RecordedRequest {
            method: parts.method.to_string(),
            path_and_query: parts
                .uri
                .path_and_query()
                .map(|pq| pq.to_string())
                .unwrap_or_default(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    Response::builder()
        .status(stub.status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(stub.body))
        .expect("stub response")
}
