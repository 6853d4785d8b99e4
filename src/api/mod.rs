//! Blocking client for the task REST API.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::model::session::{Session, User};
use crate::model::task::{Task, TaskDraft, TaskId, TaskPatch};
use crate::ops::filter::Filter;

/// Error type for API calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid API base URL {url}: {reason}")]
    BadBaseUrl { url: String, reason: String },
    /// HTTP 401: the credential is missing, expired or revoked
    #[error("{0}")]
    Unauthorized(String),
    /// Any other non-success status, carrying the server's message
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Error connecting to server: {0}")]
    Network(String),
    #[error("unexpected response from server: {0}")]
    Decode(String),
}

/// `{ "message": ... }` error bodies. flask-jwt-extended uses `msg`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(alias = "msg")]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|e| ApiError::BadBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::BadBaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical URL".into(),
            });
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(ApiClient {
            http,
            base_url: base,
        })
    }

    /// Base URL with `segments` appended as path components
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for seg in segments {
                path.push(seg);
            }
        }
        url
    }

    pub fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let resp = send(
            self.http
                .post(self.endpoint(&["auth", "login"]))
                .json(&json!({ "email": email, "password": password })),
        )?;
        let body: LoginResponse = decode(resp)?;
        Ok(Session {
            token: body.token,
            user: body.user,
        })
    }

    /// Create an account. Returns the server's confirmation message.
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<String, ApiError> {
        let resp = send(
            self.http
                .post(self.endpoint(&["auth", "register"]))
                .json(&json!({ "username": username, "email": email, "password": password })),
        )?;
        let body: MessageResponse = decode(resp).unwrap_or(MessageResponse { message: None });
        Ok(body
            .message
            .unwrap_or_else(|| "Registration successful! Please login.".to_string()))
    }

    pub fn list_tasks(&self, token: &str, filter: Filter) -> Result<Vec<Task>, ApiError> {
        let resp = send(
            self.http
                .get(self.endpoint(&["tasks"]))
                .bearer_auth(token)
                .query(&[("filter", filter.as_str())]),
        )?;
        decode(resp)
    }

    /// Create a task. Any 2xx is success; the created task is returned only
    /// when the body carries one with its id.
    pub fn create_task(&self, token: &str, draft: &TaskDraft) -> Result<Option<Task>, ApiError> {
        let resp = send(
            self.http
                .post(self.endpoint(&["tasks"]))
                .bearer_auth(token)
                .json(draft),
        )?;
        Ok(decode_optional(resp))
    }

    /// Apply a partial update. The response body is not needed.
    pub fn update_task(&self, token: &str, id: &TaskId, patch: &TaskPatch) -> Result<(), ApiError> {
        send(
            self.http
                .put(self.endpoint(&["tasks", id.as_str()]))
                .bearer_auth(token)
                .json(patch),
        )?;
        Ok(())
    }

    pub fn delete_task(&self, token: &str, id: &TaskId) -> Result<(), ApiError> {
        send(
            self.http
                .delete(self.endpoint(&["tasks", id.as_str()]))
                .bearer_auth(token),
        )?;
        Ok(())
    }
}

/// Send a request and map non-success statuses to `ApiError`
fn send(req: RequestBuilder) -> Result<Response, ApiError> {
    let resp = req.send().map_err(|e| {
        warn!(error = %e, "request failed");
        ApiError::Network(e.to_string())
    })?;
    let status = resp.status();
    debug!(url = %resp.url(), status = status.as_u16(), "response");
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed: HTTP {}", status));

    if status == StatusCode::UNAUTHORIZED {
        Err(ApiError::Unauthorized(message))
    } else {
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    resp.json().map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode a body that success does not depend on
fn decode_optional<T: serde::de::DeserializeOwned>(resp: Response) -> Option<T> {
    match resp.json() {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(error = %e, "response body ignored");
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod test_server;

#[cfg(test)]
mod tests {
    use super::test_server::{StubResponse, StubServer};
    use super::*;

    fn client(server: &StubServer) -> ApiClient {
        ApiClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn list_sends_bearer_and_filter() {
        let server = StubServer::start(vec![StubResponse::json(200, "[]")]);
        let tasks = client(&server).list_tasks("tok123", Filter::Active).unwrap();
        assert!(tasks.is_empty());

        let requests = server.finish();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path, "/api/tasks?filter=active");
        assert_eq!(requests[0].header("authorization"), Some("Bearer tok123"));
    }

    #[test]
    fn unauthorized_maps_to_unauthorized() {
        let server = StubServer::start(vec![StubResponse::json(401, r#"{"msg":"Token has expired"}"#)]);
        let err = client(&server).list_tasks("old", Filter::All).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(ref m) if m == "Token has expired"));
        server.finish();
    }

    #[test]
    fn server_message_is_surfaced() {
        let server = StubServer::start(vec![StubResponse::json(404, r#"{"message":"Task not found"}"#)]);
        let err = client(&server)
            .delete_task("tok", &TaskId::new("abc"))
            .unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Task not found");
            }
            other => panic!("unexpected {:?}", other),
        }
        let requests = server.finish();
        assert_eq!(requests[0].method, "DELETE");
        assert_eq!(requests[0].path, "/api/tasks/abc");
    }

    #[test]
    fn error_without_body_gets_generic_message() {
        let server = StubServer::start(vec![StubResponse::json(500, "")]);
        let err = client(&server).list_tasks("tok", Filter::All).unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
        server.finish();
    }

    #[test]
    fn login_returns_session() {
        let server = StubServer::start(vec![StubResponse::json(
            200,
            r#"{"message":"Login successful","token":"jwt","user":{"id":"u1","username":"ann","email":"ann@example.com"}}"#,
        )]);
        let session = client(&server).login("ann@example.com", "secret1").unwrap();
        assert_eq!(session.token, "jwt");
        assert_eq!(session.user.username, "ann");

        let requests = server.finish();
        assert_eq!(requests[0].path, "/api/auth/login");
        let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
        assert_eq!(body["email"], "ann@example.com");
    }

    #[test]
    fn connection_refused_is_network_error() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            l.local_addr().unwrap().port()
        };
        let api = ApiClient::new(&format!("http://127.0.0.1:{}/api", port), Duration::from_secs(2))
            .unwrap();
        assert!(matches!(
            api.list_tasks("tok", Filter::All),
            Err(ApiError::Network(_))
        ));
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", Duration::from_secs(1)),
            Err(ApiError::BadBaseUrl { .. })
        ));
    }
}
