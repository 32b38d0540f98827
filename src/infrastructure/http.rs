//! Reqwest-backed map backend adapter.
//!
//! This adapter owns transport details only: endpoint paths, timeouts,
//! status handling and JSON decoding into domain types.

use std::time::Duration;
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::domain::{BackendError, BackendResult, MapBackend, SaveAck, Session, User};

const MAP_GET_PATH: &str = "api/map/get";
const USER_GET_PATH: &str = "api/user/get";
const USER_SAVE_PATH: &str = "api/user/save";
const USER_AGENT: &str = concat!("pinmap/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct MapResponse {
    #[serde(default)]
    success: bool,
    map: Option<Session>,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    success: Option<bool>,
    users: Option<Vec<User>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveRequest<'a> {
    session_no: &'a str,
    user: &'a User,
}

#[derive(Debug, Default, Deserialize)]
struct SaveResponse {
    success: Option<bool>,
    message: Option<String>,
    #[serde(default)]
    committed: bool,
}

/// Map backend reached over HTTP.
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Builds an adapter whose requests time out after `timeout`.
    ///
    /// `base_url` should end in `/` (see
    /// [`parse_base_url`](crate::config::parse_base_url)) so endpoint paths
    /// resolve beneath it.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).user_agent(USER_AGENT).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str, session_no: Option<&str>) -> BackendResult<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| BackendError::transport(format!("bad endpoint {}: {}", path, e)))?;
        if let Some(session_no) = session_no {
            url.query_pairs_mut().append_pair("sessionNo", session_no);
        }
        Ok(url)
    }
}

impl MapBackend for HttpBackend {
    fn fetch_session(&self, session_no: &str) -> BackendResult<Session> {
        let url = self.endpoint(MAP_GET_PATH, Some(session_no))?;
        debug!(%url, "fetching session");
        let response = self.client.get(url).send().map_err(map_transport_error)?;
        let body = response.bytes().map_err(map_transport_error)?;
        parse_map_response(session_no, &body)
    }

    fn fetch_users(&self, session_no: &str) -> BackendResult<Option<Vec<User>>> {
        let url = self.endpoint(USER_GET_PATH, Some(session_no))?;
        debug!(%url, "fetching roster");
        let response = self.client.get(url).send().map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().map_err(map_transport_error)?;
        parse_users_response(status, &body)
    }

    fn save_user(&self, session_no: &str, user: &User) -> BackendResult<SaveAck> {
        let url = self.endpoint(USER_SAVE_PATH, None)?;
        debug!(%url, session_no, "saving user");
        let response = self
            .client
            .post(url)
            .json(&SaveRequest { session_no, user })
            .send()
            .map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().map_err(map_transport_error)?;
        parse_save_response(status, &body)
    }
}

fn map_transport_error(error: reqwest::Error) -> BackendError {
    if error.is_timeout() {
        BackendError::transport(format!("request timed out: {}", error))
    } else {
        BackendError::transport(error.to_string())
    }
}

/// The lookup body is decoded whatever the status; `success=false` or a
/// missing map both mean the session does not exist.
fn parse_map_response(session_no: &str, body: &[u8]) -> BackendResult<Session> {
    let decoded: MapResponse = serde_json::from_slice(body)
        .map_err(|e| BackendError::decode(format!("invalid map payload: {}", e)))?;
    match decoded {
        MapResponse { success: true, map: Some(session) } => Ok(session),
        _ => Err(BackendError::NotFound { session_no: session_no.to_string() }),
    }
}

fn parse_users_response(status: StatusCode, body: &[u8]) -> BackendResult<Option<Vec<User>>> {
    if !status.is_success() {
        return Err(BackendError::rejected(status_text(status)));
    }
    let decoded: UsersResponse = serde_json::from_slice(body)
        .map_err(|e| BackendError::decode(format!("invalid roster payload: {}", e)))?;
    if decoded.success == Some(false) {
        return Ok(None);
    }
    Ok(decoded.users)
}

fn parse_save_response(status: StatusCode, body: &[u8]) -> BackendResult<SaveAck> {
    let decoded: Option<SaveResponse> = serde_json::from_slice(body).ok();
    let accepted = status.is_success() && decoded.as_ref().and_then(|r| r.success) != Some(false);
    if !accepted {
        let message = decoded
            .and_then(|r| r.message)
            .unwrap_or_else(|| status_text(status));
        return Err(BackendError::rejected(message));
    }
    match decoded {
        Some(SaveResponse { committed: true, .. }) => Ok(SaveAck::Committed),
        _ => Ok(SaveAck::Accepted),
    }
}

fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
