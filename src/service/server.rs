// Copyright 2023-2025 Contributors to the Veraison project.
// SPDX-License-Identifier: Apache-2.0

use super::errors::Error;
use super::relay::Relay;
use super::response::AttestationResponse;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

/// Where the HTTP server listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 1234,
        }
    }
}

#[derive(Clone)]
struct AppState {
    relay: Arc<Relay>,
    stop: Arc<watch::Sender<bool>>,
}

impl IntoResponse for AttestationResponse {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}

async fn hello() -> &'static str {
    "Hello World!"
}

async fn stop(State(state): State<AppState>) -> StatusCode {
    tracing::info!("stop requested");
    state.stop.send_replace(true);
    StatusCode::OK
}

async fn attestation_report(State(state): State<AppState>, body: String) -> AttestationResponse {
    let relay = state.relay.clone();

    // the quote verification library blocks, possibly on the network
    tokio::task::spawn_blocking(move || relay.attest(&body))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "attestation task failed");
            AttestationResponse::failure(&Error::Internal(e.to_string()))
        })
}

/// Build the relay's routes.  A `GET /stop` sets the value in `shutdown` to
/// `true`.
pub fn router(relay: Arc<Relay>, shutdown: Arc<watch::Sender<bool>>) -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/stop", get(stop))
        .route("/attestation/report", post(attestation_report))
        .with_state(AppState {
            relay,
            stop: shutdown,
        })
        .layer(TraceLayer::new_for_http())
}

/// Bind to the configured address and serve until stopped
pub async fn run(relay: Arc<Relay>, config: &ServerConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;

    serve(listener, relay).await
}

/// Serve on an already bound listener until `GET /stop` or Ctrl-C.  In-flight
/// requests are allowed to complete.
pub async fn serve(listener: TcpListener, relay: Arc<Relay>) -> std::io::Result<()> {
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let app = router(relay, Arc::new(stop_tx));

    tracing::info!(addr = %listener.local_addr()?, "start dcap service");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = stop_rx.changed() => tracing::info!("shutting down on stop request"),
                _ = tokio::signal::ctrl_c() => tracing::info!("shutting down on interrupt"),
            }
        })
        .await?;

    tracing::info!("dcap service stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ServiceKeyPair;
    use crate::testutil::{request_body, Enclave, ScriptedOracle};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    const ACCOUNT: &str = "0102030405060708";

    fn app_state(outcome: u32) -> (AppState, watch::Receiver<bool>) {
        let relay = Relay::new(
            ServiceKeyPair::from_seed(&[3; 32]).unwrap(),
            ScriptedOracle::outcome(outcome),
        );
        let (tx, rx) = watch::channel(false);

        (
            AppState {
                relay: Arc::new(relay),
                stop: Arc::new(tx),
            },
            rx,
        )
    }

    async fn json_of(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn hello_world() {
        assert_eq!(hello().await, "Hello World!");
    }

    #[tokio::test]
    async fn stop_signals_shutdown() {
        let (state, rx) = app_state(0x0000);

        assert_eq!(stop(State(state)).await, StatusCode::OK);
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn report_success_is_200() {
        let (state, _rx) = app_state(0x0000);
        let enclave = Enclave::new();
        let quote = enclave.quote([0x77; 32]);
        let sig = enclave.sign(&quote, ACCOUNT.as_bytes());

        let resp = attestation_report(State(state), request_body(&quote, ACCOUNT, &sig))
            .await
            .into_response();

        assert_eq!(resp.status(), StatusCode::OK);
        let v = json_of(resp).await;
        assert_eq!(v["message"], "Verify quote successfully!");
        assert_eq!(v["report_body"][0]["payload"]["who"], "0x0102030405060708");
    }

    #[tokio::test]
    async fn report_decode_failure_is_400() {
        let (state, _rx) = app_state(0x0000);

        let resp = attestation_report(State(state), "{}".to_string())
            .await
            .into_response();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let v = json_of(resp).await;
        assert_eq!(v["status_code"], 400);
        assert!(v.get("report_body").is_none());
    }

    #[tokio::test]
    async fn report_rejected_quote_is_500() {
        let (state, _rx) = app_state(0xA004);
        let enclave = Enclave::new();
        let quote = enclave.quote([0x77; 32]);
        let sig = enclave.sign(&quote, ACCOUNT.as_bytes());

        let resp = attestation_report(State(state), request_body(&quote, ACCOUNT, &sig))
            .await
            .into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_of(resp).await["message"], "Verify quote failed!");
    }

    async fn http_get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(req.as_bytes()).await.unwrap();

        let mut out = String::new();
        stream.read_to_string(&mut out).await.unwrap();
        out
    }

    #[tokio::test]
    async fn serve_until_stopped() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (state, _rx) = app_state(0x0000);

        let server = tokio::spawn(serve(listener, state.relay));

        let hello = http_get(addr, "/hello").await;
        assert!(hello.starts_with("HTTP/1.1 200"), "{hello}");
        assert!(hello.ends_with("Hello World!"), "{hello}");

        let stopped = http_get(addr, "/stop").await;
        assert!(stopped.starts_with("HTTP/1.1 200"), "{stopped}");

        server.await.unwrap().unwrap();
    }
}
