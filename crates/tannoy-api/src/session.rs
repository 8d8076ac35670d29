// Session authentication
//
// Token-based login against `uer/login` (the typo is the firmware's, not
// ours). The endpoint returns `{data: {token}}`; the token is stored on
// the client and sent as `X-Token` on every subsequent request. There is
// no logout endpoint: sessions die server-side when the token expires.

use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tracing::debug;

use crate::client::SpeakerClient;
use crate::error::{ConnectReason, Error};

const OP: &str = "logging in";

impl SpeakerClient {
    /// Authenticate with the speaker using the stored credentials.
    ///
    /// `POST /prod-api/uer/login`
    ///
    /// On success the session token is stored and used for all subsequent
    /// requests, overwriting any previous token. A 200 response without a
    /// token is treated as a connection-level failure: it means we are
    /// talking to something that is not a speaker.
    pub async fn login(&self) -> Result<(), Error> {
        let url = self.api_url("uer/login");
        debug!("logging in at {}", url);

        let body = json!({
            "username": self.username(),
            "password": self.password().expose_secret(),
        });

        // Login never carries the token header, even on re-login.
        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.connect_error(OP, e))?;
        let body = self.parse_envelope(resp, OP).await?;

        let token = body
            .get("data")
            .and_then(|d| d.get("token"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                self.protocol_error(OP, ConnectReason::BadPayload("no token in login response"))
            })?;

        self.set_token(token.to_owned());
        debug!("login successful");
        Ok(())
    }
}
