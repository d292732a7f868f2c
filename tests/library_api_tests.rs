//! Exercises `LibraryApiClient` against a loopback axum server playing the
//! library application.
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    http::{header::COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse},
    routing::{post, MethodRouter},
    Json, Router,
};
use axum_test::TestServer;
use serde_json::{json, Value};

use library_recs::{
    api::{create_router, handlers::LOAD_STATE_HEADER, AppState, WidgetSettings},
    error::AppError,
    models::{load_state::LOAD_ERROR_MESSAGE, LoadStateKind},
    services::{
        providers::{BookActions, LibraryApiClient, LibrarySession, RecommendationProvider},
        LoadOptions, RecencyTracker, RecommendationLoader,
    },
    storage::MemoryStore,
    view::ContainerSet,
};

type Received = Arc<Mutex<Vec<Value>>>;

const SESSION_COOKIE: &str = "session=reader-42";

fn catalog() -> Vec<Value> {
    vec![
        json!({"isbn": "111", "title": "The Rust Programming Language", "author": "Klabnik & Nichols",
               "category": "Programming", "availableCopies": 3, "totalCopies": 3, "relevanceScore": 1}),
        json!({"isbn": "222", "title": "Computer Networks", "author": "Tanenbaum",
               "category": "Networking", "availableCopies": 0, "totalCopies": 2, "relevanceScore": 1}),
        json!({"isbn": "333", "title": "Deep Learning", "author": null,
               "category": null, "availableCopies": 1, "totalCopies": 1, "relevanceScore": 1}),
    ]
}

fn reader_session() -> LibrarySession {
    LibrarySession::from_cookie("session", "reader-42")
}

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.split(';').any(|pair| pair.trim() == SESSION_COOKIE))
}

/// Circulation endpoint that, like the library application, fails with an
/// HTML error page when the reader has no session
fn circulation(received: Received, message: &'static str) -> MethodRouter {
    post(move |headers: HeaderMap, Json(body): Json<Value>| async move {
        if !has_session(&headers) {
            return (StatusCode::INTERNAL_SERVER_ERROR, Html("<h1>KeyError: 'user_id'</h1>"))
                .into_response();
        }
        received.lock().unwrap().push(body);
        Json(json!({ "success": true, "message": message })).into_response()
    })
}

/// Personalization that recommends the catalog minus what was recently
/// viewed, for readers with a library session
fn library_router(received: Received) -> Router {
    let personalized = {
        let received = received.clone();
        move |headers: HeaderMap, Json(body): Json<Value>| async move {
            if !has_session(&headers) {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({ "success": false, "message": "Not authenticated" })),
                )
                    .into_response();
            }
            received.lock().unwrap().push(body.clone());
            let recent: Vec<String> =
                serde_json::from_value(body["recentISBNs"].clone()).unwrap_or_default();
            let results: Vec<Value> = catalog()
                .into_iter()
                .filter(|book| !recent.iter().any(|isbn| book["isbn"] == isbn.as_str()))
                .collect();
            Json(json!({ "success": true, "count": results.len(), "results": results }))
                .into_response()
        }
    };

    Router::new()
        .route("/api/recommendations/personalized", post(personalized))
        .route("/api/issue", circulation(received.clone(), "Book issued successfully"))
        .route("/api/reserve", circulation(received, "Book reserved"))
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_library() -> (String, Received) {
    let received: Received = Arc::default();
    let url = spawn_server(library_router(received.clone())).await;
    (url, received)
}

fn loader_for(client: LibraryApiClient) -> (RecommendationLoader, Arc<ContainerSet>, RecencyTracker) {
    let containers = Arc::new(ContainerSet::new());
    containers.register("recommendations");
    let tracker = RecencyTracker::new(Arc::new(MemoryStore::new()));
    let loader = RecommendationLoader::new(Arc::new(client), tracker.clone(), containers.clone());
    (loader, containers, tracker)
}

#[tokio::test]
async fn test_personalized_sends_recent_isbns() {
    let (url, received) = spawn_library().await;
    let client = LibraryApiClient::new(&url, None)
        .unwrap()
        .for_session(&reader_session());

    let response = client
        .personalized(&["111".to_string()])
        .await
        .unwrap();

    assert!(response.success);
    let results = response.into_results();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].isbn, "222");
    assert_eq!(results[0].available_copies, 0);
    assert_eq!(results[1].author, "");
    assert_eq!(received.lock().unwrap()[0], json!({ "recentISBNs": ["111"] }));
}

#[tokio::test]
async fn test_issue_and_reserve_post_isbn() {
    let (url, received) = spawn_library().await;
    let client = LibraryApiClient::new(&format!("{}/", url), None)
        .unwrap()
        .for_session(&reader_session());

    let issued = client.issue_book("333").await.unwrap();
    let reserved = client.reserve_book("222").await.unwrap();

    assert!(issued.success);
    assert_eq!(issued.message.as_deref(), Some("Book issued successfully"));
    assert_eq!(reserved.message.as_deref(), Some("Book reserved"));
    assert_eq!(
        received.lock().unwrap().clone(),
        vec![json!({ "isbn": "333" }), json!({ "isbn": "222" })]
    );
}

#[tokio::test]
async fn test_actions_need_a_library_session() {
    let (url, received) = spawn_library().await;
    let client = LibraryApiClient::new(&url, None).unwrap();

    let refused = client.issue_book("333").await;
    assert!(matches!(refused, Err(AppError::Unauthorized(_))));

    let wrong_session = client.for_session(&LibrarySession::from_cookie("session", "someone-else"));
    let failed = wrong_session.reserve_book("333").await;
    assert!(matches!(failed, Err(AppError::ExternalApi(_))));

    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_personalized_without_session_renders_empty() {
    let (url, received) = spawn_library().await;
    let (loader, containers, _) = loader_for(LibraryApiClient::new(&url, None).unwrap());

    let outcome = loader
        .load("recommendations", &LoadOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.state, LoadStateKind::Empty);
    assert!(containers
        .get("recommendations")
        .unwrap()
        .html()
        .contains("No recommendations yet."));
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unauthenticated_envelope_is_parsed() {
    let router = Router::new().route(
        "/api/recommendations/personalized",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": "Not authenticated" })),
            )
        }),
    );
    let url = spawn_server(router).await;
    let (loader, containers, _) = loader_for(LibraryApiClient::new(&url, None).unwrap());

    let outcome = loader
        .load("recommendations", &LoadOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.state, LoadStateKind::Empty);
    assert!(containers
        .get("recommendations")
        .unwrap()
        .html()
        .contains("No recommendations yet."));
}

#[tokio::test]
async fn test_non_json_body_renders_error() {
    let router = Router::new().route(
        "/api/recommendations/personalized",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
    );
    let url = spawn_server(router).await;
    let client = LibraryApiClient::new(&url, None).unwrap();
    assert!(client.personalized(&[]).await.is_err());

    let (loader, containers, _) = loader_for(client);
    let outcome = loader
        .load("recommendations", &LoadOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.state, LoadStateKind::Error);
    assert!(containers
        .get("recommendations")
        .unwrap()
        .html()
        .contains(LOAD_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_unreachable_backend_renders_error() {
    // Grab a free port, then close it again
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = LibraryApiClient::new(&format!("http://{}", addr), None).unwrap();
    let (loader, _, _) = loader_for(client);

    let outcome = loader
        .load("recommendations", &LoadOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.state, LoadStateKind::Error);
    assert!(outcome.applied);
}

#[tokio::test]
async fn test_transport_timeout_renders_error() {
    let router = Router::new().route(
        "/api/recommendations/personalized",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Json(json!({ "success": true, "results": [] }))
        }),
    );
    let url = spawn_server(router).await;
    let client = LibraryApiClient::new(&url, Some(Duration::from_millis(100))).unwrap();
    let (loader, _, _) = loader_for(client);

    let outcome = loader
        .load("recommendations", &LoadOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.state, LoadStateKind::Error);
}

#[tokio::test]
async fn test_loader_excludes_recently_viewed() {
    let (url, _) = spawn_library().await;
    let client = LibraryApiClient::new(&url, None)
        .unwrap()
        .for_session(&reader_session());
    let (loader, containers, tracker) = loader_for(client);
    tracker.record_viewed(&["111", "333"]).await;

    let outcome = loader
        .load("recommendations", &LoadOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.state, LoadStateKind::Populated);
    let html = containers.get("recommendations").unwrap().html();
    assert!(html.contains("Computer Networks"));
    assert!(html.contains("Out of Stock"));
    assert!(!html.contains("Deep Learning"));
}

fn widget_server(url: &str) -> TestServer {
    let state = AppState::with_library(
        Arc::new(MemoryStore::new()),
        Arc::new(LibraryApiClient::new(url, None).unwrap()),
        WidgetSettings::default(),
    );
    TestServer::new(create_router(state)).unwrap()
}

fn reader_cookies() -> HeaderValue {
    HeaderValue::from_static("theme=dark; session=reader-42")
}

#[tokio::test]
async fn test_widget_server_end_to_end() {
    let (url, received) = spawn_library().await;
    let server = widget_server(&url);

    server
        .post("/sessions/reader-1/actions")
        .add_header(COOKIE, reader_cookies())
        .json(&json!({ "action": "issue", "isbn": "111" }))
        .await
        .assert_status_ok();

    let response = server
        .get("/sessions/reader-1/recommendations")
        .add_header(COOKIE, reader_cookies())
        .await;

    response.assert_status_ok();
    assert_eq!(response.header(LOAD_STATE_HEADER), "populated");
    let html = response.text();
    assert!(!html.contains("The Rust Programming Language"));
    assert!(html.contains("Deep Learning"));

    let received = received.lock().unwrap().clone();
    assert_eq!(received[0], json!({ "isbn": "111" }));
    assert_eq!(received[1], json!({ "recentISBNs": ["111"] }));
}

#[tokio::test]
async fn test_widget_server_without_library_session() {
    let (url, received) = spawn_library().await;
    let server = widget_server(&url);

    let response = server
        .post("/sessions/reader-1/actions")
        .add_header(COOKIE, HeaderValue::from_static("theme=dark"))
        .json(&json!({ "action": "reserve", "isbn": "222" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server.get("/sessions/reader-1/recommendations").await;
    response.assert_status_ok();
    assert_eq!(response.header(LOAD_STATE_HEADER), "empty");

    assert!(received.lock().unwrap().is_empty());
}
