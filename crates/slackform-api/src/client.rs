// Web API HTTP client
//
// Wraps `reqwest::Client` with method URL construction and envelope
// unwrapping. Endpoint families (conversations, usergroups) are inherent
// methods implemented in separate files so this module stays focused on
// transport mechanics.

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::Envelope;
use crate::transport::{DEFAULT_BASE_URL, TransportConfig};

/// Raw HTTP client for the Slack Web API.
///
/// Every method is a form-encoded POST to `{base_url}{method}`. Responses
/// are checked for `ok` and decoded into the caller's payload type; a
/// `false` envelope becomes [`Error::Slack`] carrying the error code.
pub struct SlackClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SlackClient {
    /// Create a client against the public Web API.
    pub fn new(token: &SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        Self::with_base_url(Url::parse(DEFAULT_BASE_URL)?, token, transport)
    }

    /// Create a client against a custom API root (Enterprise Grid gateways,
    /// test servers). A trailing slash is appended when missing so method
    /// names join correctly.
    pub fn with_base_url(
        base_url: Url,
        token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client(token)?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for the `Authorization` header.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
        }
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    pub(crate) fn method_url(&self, method: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(method)?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// POST a form body to `method` and decode the payload.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        form: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.method_url(method)?;
        debug!(method, "POST {}", url);

        let resp = self
            .http
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_envelope(method, resp).await
    }

    /// Like [`call`](Self::call) for methods whose payload we ignore.
    pub(crate) async fn call_unit(&self, method: &str, form: &[(&str, &str)]) -> Result<(), Error> {
        let _: serde_json::Value = self.call(method, form).await?;
        Ok(())
    }
}

/// Check the HTTP status and the `{ok, error}` envelope, then decode
/// the whole body as `T` (payload fields sit next to `ok`).
async fn parse_envelope<T: DeserializeOwned>(
    method: &str,
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(60);
        return Err(Error::RateLimited { retry_after_secs });
    }

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            body: preview(&body).to_owned(),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    let envelope: Envelope = serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body: body.clone(),
    })?;

    if let Some(ref warning) = envelope.warning {
        trace!(method, warning, "Web API warning");
    }

    if !envelope.ok {
        return Err(Error::Slack {
            method: method.to_owned(),
            code: envelope.error.unwrap_or_else(|| "unknown_error".into()),
        });
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{method}: {e}"),
        body,
    })
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = SlackClient::with_client(
            reqwest::Client::new(),
            Url::parse("http://localhost:1234/api").unwrap(),
        );
        assert_eq!(
            client.method_url("conversations.info").unwrap().as_str(),
            "http://localhost:1234/api/conversations.info"
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        assert!(preview(&body).len() <= 200);
    }
}
