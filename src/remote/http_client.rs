use super::*;

pub(super) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Maps a success body to JSON (empty => `null`) and anything else to
/// [`RequestError::Status`] carrying the raw body.
pub(super) async fn decode(resp: reqwest::Response) -> Result<serde_json::Value, RequestError> {
    let status = resp.status();
    let text = resp.text().await.map_err(network_error)?;
    if !status.is_success() {
        return Err(RequestError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| RequestError::Decode(e.to_string()))
}

pub(super) fn network_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        RequestError::Network(format!("timed out: {}", err))
    } else {
        RequestError::Network(err.to_string())
    }
}

impl RequestGateway {
    pub(super) fn url(&self, path: &str) -> String {
        join_url(&self.settings.base_url, path)
    }

    pub(super) async fn issue(
        &self,
        method: &Method,
        endpoint: &str,
        body: Option<&serde_json::Value>,
        bearer: Option<&Token>,
    ) -> Result<reqwest::Response, RequestError> {
        tracing::debug!(%method, endpoint, authorized = bearer.is_some(), "request");
        let mut req = self.client.request(method.clone(), self.url(endpoint));
        if let Some(token) = bearer {
            req = req.header(reqwest::header::AUTHORIZATION, token.bearer());
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        req.send().await.map_err(network_error)
    }
}
