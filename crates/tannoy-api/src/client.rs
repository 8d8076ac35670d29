// Speaker HTTP client
//
// Wraps `reqwest::Client` with speaker-specific URL construction, the
// `{code?, message?, data?}` envelope, and `X-Token` session auth. The
// endpoint groups (session, device, program) are implemented as inherent
// methods via separate files to keep this module focused on transport
// mechanics.

use std::sync::RwLock;
use std::time::Duration;

use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::{ConnectReason, Error};
use crate::transport::TransportConfig;

/// Raw HTTP client for the speaker's `/prod-api` surface.
///
/// Holds the connection parameters and the session token obtained by
/// [`login`](SpeakerClient::login). The token lives in memory only; it is
/// overwritten by each successful login and never cleared by the client
/// itself. Callers decide when to re-login (on `Auth` errors).
#[derive(Debug)]
pub struct SpeakerClient {
    http: reqwest::Client,
    host: String,
    base_url: Url,
    username: String,
    password: SecretString,
    timeout: Duration,
    /// Bearer token from `uer/login`, sent as `X-Token` on every
    /// subsequent request.
    token: RwLock<Option<String>>,
}

impl SpeakerClient {
    /// Create a new client from connection parameters.
    ///
    /// `host` is the bare host (optionally `host:port`), e.g.
    /// `192.168.1.50`. No request is made until [`login`](Self::login).
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, host, username, password, transport.timeout)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        host: impl Into<String>,
        username: impl Into<String>,
        password: SecretString,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let host = host.into();
        let base_url = Url::parse(&format!("http://{host}/prod-api/"))?;
        Ok(Self {
            http,
            host,
            base_url,
            username: username.into(),
            password,
            timeout,
            token: RwLock::new(None),
        })
    }

    /// The speaker host this client talks to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether a login has succeeded on this client.
    pub fn has_token(&self) -> bool {
        self.token.read().expect("token lock poisoned").is_some()
    }

    // ── Token management ─────────────────────────────────────────────

    /// Store the session token (captured from the login response).
    /// Overwrites any previous token.
    pub(crate) fn set_token(&self, token: String) {
        trace!("storing session token");
        *self.token.write().expect("token lock poisoned") = Some(token);
    }

    /// Apply the stored token to a request builder.
    fn apply_token(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let guard = self.token.read().expect("token lock poisoned");
        match guard.as_deref() {
            Some(token) => builder.header("X-Token", token),
            None => builder,
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build a full URL under the fixed `/prod-api` prefix.
    pub(crate) fn api_url(&self, path: &str) -> Url {
        self.base_url.join(path).expect("invalid API path")
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get(&self, url: Url, op: &'static str) -> Result<Value, Error> {
        debug!("GET {}", url);
        let resp = self
            .apply_token(self.http.get(url))
            .send()
            .await
            .map_err(|e| self.connect_error(op, e))?;
        self.parse_envelope(resp, op).await
    }

    /// Send a POST request with JSON body and unwrap the envelope.
    pub(crate) async fn post(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
        op: &'static str,
    ) -> Result<Value, Error> {
        debug!("POST {}", url);
        let resp = self
            .apply_token(self.http.post(url).json(body))
            .send()
            .await
            .map_err(|e| self.connect_error(op, e))?;
        self.parse_envelope(resp, op).await
    }

    /// Send a POST request with a multipart body and unwrap the envelope.
    pub(crate) async fn post_multipart(
        &self,
        url: Url,
        form: reqwest::multipart::Form,
        op: &'static str,
    ) -> Result<Value, Error> {
        debug!("POST (multipart) {}", url);
        let resp = self
            .apply_token(self.http.post(url).multipart(form))
            .send()
            .await
            .map_err(|e| self.connect_error(op, e))?;
        self.parse_envelope(resp, op).await
    }

    // ── Error mapping ────────────────────────────────────────────────

    /// Classify a transport failure per the shared error-mapping protocol.
    ///
    /// reqwest does not surface hyper's connection-closed cause directly:
    /// a transport failure that is neither a timeout nor a connect failure
    /// happened after the connection was established, which is how the
    /// speaker's idle keep-alive drop shows up.
    pub(crate) fn connect_error(&self, op: &'static str, err: reqwest::Error) -> Error {
        let reason = if err.is_timeout() {
            ConnectReason::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else if err.is_connect() {
            ConnectReason::Refused
        } else if err.is_decode() {
            ConnectReason::BadPayload("response body is not valid JSON")
        } else {
            ConnectReason::Disconnected
        };
        Error::Connect {
            op,
            host: self.host.clone(),
            reason,
            source: Some(err),
        }
    }

    /// Shorthand for a `Connect` error with no underlying transport cause.
    pub(crate) fn protocol_error(&self, op: &'static str, reason: ConnectReason) -> Error {
        Error::Connect {
            op,
            host: self.host.clone(),
            reason,
            source: None,
        }
    }

    /// Check HTTP status, parse the JSON body, and enforce the
    /// application envelope.
    ///
    /// Envelope rules: absent `code` or `code == 200` is success and the
    /// whole body is returned (some endpoints echo values at the top
    /// level, outside `data`). `code == 401`, or `code == 400` with an
    /// invalid-credentials message, is an auth failure; every other
    /// non-200 code is a generic API error.
    pub(crate) async fn parse_envelope(
        &self,
        resp: reqwest::Response,
        op: &'static str,
    ) -> Result<Value, Error> {
        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(self.protocol_error(op, ConnectReason::Status(status.as_u16())));
        }

        let body: Value = resp.json().await.map_err(|e| self.connect_error(op, e))?;

        if let Some(code) = body.get("code").and_then(Value::as_u64) {
            if code != 200 {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_owned();
                if code == 401 || (code == 400 && message.contains("username or password")) {
                    return Err(Error::Auth { message });
                }
                return Err(Error::Api {
                    code: u16::try_from(code).unwrap_or(u16::MAX),
                    message,
                });
            }
        }

        Ok(body)
    }

    // ── Accessors for endpoint modules ───────────────────────────────

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    pub(crate) fn password(&self) -> &SecretString {
        &self.password
    }
}

// ── Payload helpers ──────────────────────────────────────────────────

/// Extract the `data` field of an envelope body, `Null` when absent.
pub(crate) fn take_data(mut body: Value) -> Value {
    body.get_mut("data").map(Value::take).unwrap_or(Value::Null)
}

/// Deserialize a payload, mapping serde failures to `Error::Deserialization`.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|e| Error::Deserialization {
        message: e.to_string(),
    })
}
