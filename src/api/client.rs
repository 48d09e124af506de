//! HTTP implementation of the SEES backend API
//!
//! Wraps a `reqwest` client with the configured base URL, timeout and the
//! session's bearer token. Transport failures, non-success statuses and
//! undecodable bodies are mapped onto [`ApiError`] variants that name the
//! endpoint involved.

use std::time::{Duration, Instant};

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::{CheckoutOutcome, EventApi};
use crate::config::ApiConfig;
use crate::models::{
    ContentKind, Event, EventDraft, EventFeed, LoginRequest, LoginResponse, RegisterRequest,
    UpdateProfileRequest, UserProfile,
};
use crate::state::Session;
use crate::utils::errors::{ApiError, Result, SeesError};
use crate::utils::logging;

/// Error body shapes the backend uses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
    detail: Option<String>,
}

#[derive(Debug, Serialize)]
struct VisibilityPatch {
    visible: bool,
}

#[derive(Debug, Deserialize)]
struct CheckoutResponse {
    #[serde(default)]
    success: bool,
    url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct HttpEventApi {
    client: Client,
    base_url: Url,
    /// Bearer token only; the viewer's identity lives in the caller's `Session`
    token: Option<String>,
}

impl HttpEventApi {
    /// Create a client for the configured backend using `session`'s token
    pub fn new(config: &ApiConfig, session: &Session) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(SeesError::Http)?;

        // Relative joins keep any path prefix only when the base ends in '/'
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        Ok(Self {
            client,
            base_url,
            token: session.token().map(str::to_string),
        })
    }

    /// Same backend, authenticated as a different session
    pub fn with_session(&self, session: &Session) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: session.token().map(str::to_string),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        let mut builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = self.token.as_deref() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Send a request and return the successful response
    async fn dispatch(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<reqwest::Response> {
        let started = Instant::now();
        debug!(method = %method, endpoint = path, "Sending API request");

        let response = builder.send().await.map_err(|e| {
            logging::log_api_call(method.as_str(), path, started.elapsed().as_millis() as u64, false);
            SeesError::Api(ApiError::from_transport(path, &e))
        })?;

        let status = response.status();
        let elapsed = started.elapsed().as_millis() as u64;
        logging::log_api_call(method.as_str(), path, elapsed, status.is_success());

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_message(&body);
        logging::log_api_error(path, &format!("HTTP {}", status.as_u16()), Some(&message));

        if status == StatusCode::UNAUTHORIZED {
            return Err(SeesError::Authentication(if message.is_empty() {
                "Not authenticated".to_string()
            } else {
                message
            }));
        }

        Err(SeesError::Api(ApiError::Status {
            endpoint: path.to_string(),
            status: status.as_u16(),
            message,
        }))
    }

    async fn send_json<T: DeserializeOwned>(&self, method: Method, path: &str, builder: RequestBuilder) -> Result<T> {
        let response = self.dispatch(method, path, builder).await?;
        response.json::<T>().await.map_err(|e| {
            SeesError::Api(ApiError::InvalidResponse {
                endpoint: path.to_string(),
                reason: e.to_string(),
            })
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let builder = self.request(Method::GET, path)?;
        self.send_json(Method::GET, path, builder).await
    }

    async fn send_body<B: Serialize, T: DeserializeOwned>(&self, method: Method, path: &str, body: &B) -> Result<T> {
        let builder = self.request(method.clone(), path)?.json(body);
        self.send_json(method, path, builder).await
    }

    /// Map a 404 on an event endpoint onto the event it concerns
    fn event_not_found(event_id: i64, error: SeesError) -> SeesError {
        match error {
            SeesError::Api(ApiError::Status { status: 404, .. }) => SeesError::EventNotFound { event_id },
            other => other,
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile> {
        request.validate()?;
        self.send_body(Method::POST, "api/users/", request).await
    }

    /// Log in and return the session for the authenticated user
    pub async fn login(&self, request: &LoginRequest) -> Result<(LoginResponse, Session)> {
        let response: LoginResponse = self.send_body(Method::POST, "api/login/", request).await?;
        let session = Session::from_login(&response);
        info!(user_id = response.user.id, "Logged in");
        Ok((response, session))
    }

    pub async fn update_profile(&self, request: &UpdateProfileRequest) -> Result<UserProfile> {
        self.send_body(Method::PUT, "api/profile/", request).await
    }

    /// Find users by name or email, for organizer and speaker pickers
    pub async fn search_users(&self, query: &str) -> Result<Vec<UserProfile>> {
        let path = format!("api/users/search/?q={}", urlencoding::encode(query.trim()));
        self.get(&path).await
    }

    /// Create an event; the backend makes the caller an organizer
    pub async fn create_event(&self, session: &Session, draft: &EventDraft) -> Result<Event> {
        if !session.is_authenticated() {
            return Err(SeesError::Authentication(
                "You need to be logged in to create events".to_string()
            ));
        }
        draft.validate()?;
        let event: Event = self.send_body(Method::POST, "api/events/", draft).await?;
        logging::log_event_action(event.id, "create", session.user_id(), Some(&event.title));
        Ok(event)
    }
}

impl EventApi for HttpEventApi {
    async fn fetch_profile(&self) -> Result<UserProfile> {
        self.get("api/profile/").await
    }

    async fn fetch_event_feed(&self) -> Result<EventFeed> {
        self.get("api/events/").await
    }

    async fn fetch_event(&self, event_id: i64) -> Result<Event> {
        self.get(&format!("api/events/{}/", event_id))
            .await
            .map_err(|e| Self::event_not_found(event_id, e))
    }

    async fn update_event(&self, event_id: i64, draft: &EventDraft) -> Result<Event> {
        self.send_body(Method::PUT, &format!("api/events/{}/", event_id), draft)
            .await
            .map_err(|e| Self::event_not_found(event_id, e))
    }

    async fn mark_viewed(&self, event_id: i64) -> Result<()> {
        let path = format!("api/events/{}/mark-viewed/", event_id);
        let builder = self.request(Method::POST, &path)?;
        self.dispatch(Method::POST, &path, builder)
            .await
            .map(|_| ())
            .map_err(|e| Self::event_not_found(event_id, e))
    }

    async fn set_visibility(&self, kind: ContentKind, item_id: i64, visible: bool) -> Result<()> {
        let path = format!("{}/{}/", kind.collection_path(), item_id);
        let builder = self
            .request(Method::PATCH, &path)?
            .json(&VisibilityPatch { visible });
        self.dispatch(Method::PATCH, &path, builder).await.map(|_| ())
    }

    async fn checkout(&self, event_id: i64) -> Result<CheckoutOutcome> {
        let path = format!("api/events/{}/checkout/", event_id);
        let builder = self.request(Method::POST, &path)?;
        let response: CheckoutResponse = self
            .send_json(Method::POST, &path, builder)
            .await
            .map_err(|e| Self::event_not_found(event_id, e))?;

        if response.success {
            return Ok(CheckoutOutcome::Registered);
        }

        match response.url {
            Some(url) => Ok(CheckoutOutcome::Redirect(Url::parse(&url)?)),
            None => Err(SeesError::Api(ApiError::InvalidResponse {
                endpoint: path,
                reason: "No checkout URL returned".to_string(),
            })),
        }
    }
}

/// Pull a human readable message out of an error body
fn extract_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .or(parsed.message)
            .or(parsed.detail)
            .unwrap_or_default(),
        Err(_) => body.trim().chars().take(200).collect(),
    }
}
