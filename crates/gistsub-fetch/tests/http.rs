//! `ReqwestClient` against a local HTTP server.

#![cfg(feature = "reqwest")]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use bytes::Bytes;
use futures_util::stream;
use gistsub_fetch::core::metadata_headers;
use gistsub_fetch::{FetchOptions, HttpClient, ReqwestClient, TransportError};
use tokio::net::TcpListener;

const ETAG: &str = "\"v9\"";
const METADATA: &str = r#"{"files": {}}"#;
const CAP: usize = 40;

struct TestServer {
    base:        String,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    async fn new(router: Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server = axum::serve(listener, router).with_graceful_shutdown(async {
            shutdown_rx.await.ok();
        });
        tokio::spawn(async move {
            server.await.unwrap();
        });

        Self {
            base:        format!("http://{addr}"),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    fn url(&self, path: &str) -> String { format!("{}{}", self.base, path) }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }
    }
}

async fn gist_endpoint(headers: HeaderMap) -> Response {
    if headers
        .get(header::IF_NONE_MATCH)
        .is_some_and(|v| v.as_bytes() == ETAG.as_bytes())
    {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, ETAG)]).into_response();
    }

    (
        [
            (header::ETAG, ETAG),
            (HeaderName::from_static("x-gist-rev"), "7"),
        ],
        METADATA,
    )
        .into_response()
}

async fn sized_endpoint() -> Vec<u8> { vec![b'a'; CAP + 24] }

async fn chunked_endpoint() -> Response {
    let chunks = stream::iter(vec![
        Ok::<_, std::io::Error>(Bytes::from(vec![b'b'; 32])),
        Ok(Bytes::from(vec![b'b'; 32])),
    ]);
    Response::new(Body::from_stream(chunks))
}

async fn small_endpoint() -> &'static str { "proxies: []\n" }

fn router() -> Router {
    Router::new()
        .route("/gists/g1", get(gist_endpoint))
        .route("/sized", get(sized_endpoint))
        .route("/chunked", get(chunked_endpoint))
        .route("/small", get(small_endpoint))
}

fn client() -> ReqwestClient {
    ReqwestClient::new(&FetchOptions::default().max_body_bytes(CAP)).unwrap()
}

#[tokio::test]
async fn test_etag_round_trip_ends_in_not_modified() {
    let server = TestServer::new(router()).await;
    let client = client();
    let url = server.url("/gists/g1");

    let response = client.get(&url, &metadata_headers(None, None)).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.headers.etag(), Some(ETAG));
    assert_eq!(response.headers.get("X-Gist-Rev"), Some("7"));
    assert!(
        response
            .headers
            .iter()
            .all(|(name, _)| name == name.to_ascii_lowercase())
    );
    assert_eq!(&response.body[..], METADATA.as_bytes());

    let err = client
        .get(&url, &metadata_headers(None, Some(ETAG)))
        .await
        .unwrap_err();
    assert!(err.is_not_modified());
    assert_eq!(err.headers().and_then(|h| h.etag()), Some(ETAG));
}

#[tokio::test]
async fn test_unknown_path_is_a_status_error() {
    let server = TestServer::new(router()).await;

    let err = client()
        .get(&server.url("/gists/nope"), &[])
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert_eq!(err.classify(), "http_error:404:Not Found");
}

#[tokio::test]
async fn test_declared_length_over_cap() {
    let server = TestServer::new(router()).await;

    let err = client().get(&server.url("/sized"), &[]).await.unwrap_err();

    assert!(matches!(err, TransportError::BodyTooLarge { limit: CAP }), "{err:?}");
}

#[tokio::test]
async fn test_chunked_body_over_cap() {
    let server = TestServer::new(router()).await;

    let err = client().get(&server.url("/chunked"), &[]).await.unwrap_err();

    assert!(matches!(err, TransportError::BodyTooLarge { limit: CAP }), "{err:?}");
}

#[tokio::test]
async fn test_body_under_cap() {
    let server = TestServer::new(router()).await;

    let response = client().get(&server.url("/small"), &[]).await.unwrap();

    assert_eq!(&response.body[..], b"proxies: []\n");
}

#[tokio::test]
async fn test_refused_connection_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client()
        .get(&format!("http://{addr}/gists/g1"), &[])
        .await
        .unwrap_err();

    assert!(matches!(err, TransportError::Network(_)), "{err:?}");
    assert!(err.classify().starts_with("network_error:"));
}
