use std::sync::Arc;
use std::time::Duration;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};
use url::Url;
use crate::session::SessionStore;
use super::ApiError;

/// HTTP client for the backend.
///
/// Every request carries the session's bearer token when one is present,
/// read fresh from the session store so sign-in and sign-out apply to the
/// next call.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: with_trailing_slash(base_url),
            session,
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    /// `path` under the base URL with `segment` appended, percent-encoded.
    pub(crate) fn endpoint_with_segment(&self, path: &str, segment: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(path)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        self.get_url(url).await
    }

    pub(crate) async fn get_url<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        self.send(self.http.request(Method::GET, url)).await
    }

    pub(crate) async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        self.send(self.http.request(Method::POST, url).json(body)).await
    }

    #[instrument(skip_all)]
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let request = match self.session.token().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "Response received");

        if !status.is_success() {
            let error = ApiError::from_status(status, body.as_ref());
            warn!(%url, error = %error, "Request failed");
            return Err(error);
        }
        serde_json::from_slice(body.as_ref()).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_is_kept_when_joining() {
        let base = with_trailing_slash(Url::parse("https://api.example.com/api/v1").unwrap());
        let joined = base.join("payments/create-order").unwrap();
        assert_eq!(joined.as_str(), "https://api.example.com/api/v1/payments/create-order");
    }
}
