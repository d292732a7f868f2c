/// HTTP client for the library application
///
/// Endpoints:
/// 1. Personalization: POST /api/recommendations/personalized with `{"recentISBNs": [...]}`
/// 2. Circulation: POST /api/issue and POST /api/reserve with `{"isbn": "..."}`
///
/// Response bodies are JSON envelopes carrying a `success` flag, and the
/// application answers some failures (e.g. an unauthenticated session) with a
/// non-2xx status *and* a well-formed envelope. Bodies are therefore parsed
/// regardless of status; only an unparsable body is an error.
///
/// The application keys readers by its session cookie. A client bound to a
/// [`LibrarySession`] replays that cookie on every request; circulation actions
/// are refused locally when there is no session to act for.
use std::sync::Arc;
use std::time::Duration;

use reqwest::{header::COOKIE, Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::{ActionOutcome, BookAction, BookActionRequest, PersonalizedRequest, PersonalizedResponse},
    services::providers::{BookActions, LibraryConnector, LibrarySession, RecommendationProvider},
};

#[derive(Clone)]
pub struct LibraryApiClient {
    http_client: HttpClient,
    api_url: String,
    session: LibrarySession,
}

impl LibraryApiClient {
    /// Creates a client for the library application at `api_url`
    ///
    /// `timeout` bounds each request at the transport; `None` leaves requests unbounded.
    pub fn new(api_url: &str, timeout: Option<Duration>) -> AppResult<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            session: LibrarySession::anonymous(),
        })
    }

    /// Same client acting for `session`; the connection pool is shared
    pub fn for_session(&self, session: &LibrarySession) -> Self {
        Self {
            session: session.clone(),
            ..self.clone()
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn session(&self) -> &LibrarySession {
        &self.session
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let request = self.http_client.post(format!("{}{}", self.api_url, path));
        match self.session.cookie() {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    async fn post_action(&self, action: BookAction, isbn: &str) -> AppResult<ActionOutcome> {
        if !self.session.is_authenticated() {
            return Err(AppError::Unauthorized(format!(
                "a library session is required to {} books",
                action
            )));
        }

        let response = self
            .post(&format!("/api/{}", action))
            .json(&BookActionRequest {
                isbn: isbn.to_string(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let outcome: ActionOutcome = parse_envelope(status, &body)?;

        tracing::info!(
            action = %action,
            isbn = %isbn,
            status = %status,
            success = outcome.success,
            "Book action forwarded"
        );

        Ok(outcome)
    }
}

/// Parses a JSON envelope, reporting anything else as a misbehaving backend
fn parse_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> AppResult<T> {
    serde_json::from_str(body).map_err(|e| {
        tracing::warn!(status = %status, error = %e, "Library application sent a non-JSON body");
        AppError::ExternalApi(format!(
            "library application answered {} without a JSON envelope",
            status
        ))
    })
}

#[async_trait::async_trait]
impl RecommendationProvider for LibraryApiClient {
    async fn personalized(&self, recent_isbns: &[String]) -> AppResult<PersonalizedResponse> {
        let response = self
            .post("/api/recommendations/personalized")
            .json(&PersonalizedRequest {
                recent_isbns: recent_isbns.to_vec(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Personalization endpoint returned non-success status");
        }

        let body = response.text().await?;
        let parsed: PersonalizedResponse = parse_envelope(status, &body)?;

        tracing::info!(
            recent = recent_isbns.len(),
            authenticated = self.session.is_authenticated(),
            success = parsed.success,
            results = parsed.results.as_ref().map_or(0, Vec::len),
            provider = self.name(),
            "Personalized recommendations fetched"
        );

        Ok(parsed)
    }

    fn name(&self) -> &'static str {
        "library_api"
    }
}

#[async_trait::async_trait]
impl BookActions for LibraryApiClient {
    async fn issue_book(&self, isbn: &str) -> AppResult<ActionOutcome> {
        self.post_action(BookAction::Issue, isbn).await
    }

    async fn reserve_book(&self, isbn: &str) -> AppResult<ActionOutcome> {
        self.post_action(BookAction::Reserve, isbn).await
    }
}

impl LibraryConnector for LibraryApiClient {
    fn provider(&self, session: &LibrarySession) -> Arc<dyn RecommendationProvider> {
        Arc::new(self.for_session(session))
    }

    fn actions(&self, session: &LibrarySession) -> Arc<dyn BookActions> {
        Arc::new(self.for_session(session))
    }
}
