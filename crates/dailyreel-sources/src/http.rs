//! Request plumbing shared by every adapter.

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::SourceError;

pub(crate) const USER_AGENT: &str = concat!("dailyreel/", env!("CARGO_PKG_VERSION"));

/// Turn a non-2xx response into [`SourceError::Server`].
pub(crate) async fn ensure_success(resp: Response) -> Result<Response, SourceError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SourceError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}

/// Send `req` and decode a JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, SourceError> {
    let resp = ensure_success(req.send().await?).await?;
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Send `req` and return the body as text.
pub(crate) async fn get_text(req: RequestBuilder) -> Result<String, SourceError> {
    let resp = ensure_success(req.send().await?).await?;
    Ok(resp.text().await?)
}
