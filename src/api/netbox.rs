//! NetBox REST implementation of [`ResourceClient`].

use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

use super::{
    ApiError, DeleteOutcome, HttpClient, HttpError, HttpRequest, HttpResponse, RemoteObject,
    ResourceClient,
};

/// One page of a NetBox list response.
#[derive(Debug, Deserialize)]
struct Page {
    /// Absolute URL of the next page, if any
    next: Option<String>,
    /// Objects on this page
    results: Vec<Value>,
}

/// Resource client speaking NetBox's REST dialect.
///
/// - Authenticates with `Authorization: Token <token>`
/// - Follows `next` links on list endpoints
/// - Uses PATCH for updates, so only the sent attributes change
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
///
/// # Example
///
/// ```
/// use netbox_reconcile::api::{NetboxClient, ReqwestClient};
/// use url::Url;
///
/// let client = NetboxClient::new(
///     ReqwestClient::new(),
///     Url::parse("https://netbox.example.com/api/").unwrap(),
///     "0123456789abcdef",
/// )
/// .unwrap();
/// assert_eq!(client.api_root().path(), "/api/");
/// ```
#[derive(Debug)]
pub struct NetboxClient<H> {
    http: H,
    api_root: Url,
    authorization: http::HeaderValue,
}

impl<H> NetboxClient<H> {
    /// Creates a client for the API rooted at `api_root` (ending in `/api/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the token contains characters not allowed in a header.
    pub fn new(
        http: H,
        api_root: Url,
        token: &str,
    ) -> Result<Self, http::header::InvalidHeaderValue> {
        let mut authorization = http::HeaderValue::from_str(&format!("Token {token}"))?;
        authorization.set_sensitive(true);

        Ok(Self {
            http,
            api_root,
            authorization,
        })
    }

    /// Returns the API root URL.
    #[must_use]
    pub const fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Builds `<api_root>/<endpoint>/[<id>/]`.
    fn endpoint_url(&self, endpoint: &str, id: Option<u64>) -> Result<Url, HttpError> {
        let mut path = format!("{}/", endpoint.trim_matches('/'));
        if let Some(id) = id {
            path.push_str(&format!("{id}/"));
        }

        self.api_root
            .join(&path)
            .map_err(|e| HttpError::InvalidUrl(format!("{endpoint}: {e}")))
    }

    fn prepare(&self, request: HttpRequest) -> HttpRequest {
        request
            .with_header(http::header::AUTHORIZATION, self.authorization.clone())
            .with_header(
                http::header::ACCEPT,
                http::HeaderValue::from_static("application/json"),
            )
    }
}

impl<H: HttpClient> NetboxClient<H> {
    /// Sends a request and turns non-2xx statuses into errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.clone();
        let url = request.url.clone();
        let response = self.http.request(self.prepare(request)).await?;

        tracing::debug!("{method} {url} -> {}", response.status);

        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::from_status(response.status, &response.body))
        }
    }

    async fn send_for_object(&self, request: HttpRequest) -> Result<RemoteObject, ApiError> {
        let response = self.send(request).await?;
        let value: Value = serde_json::from_slice(&response.body)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        RemoteObject::from_value(value)
    }
}

impl<H: HttpClient> ResourceClient for NetboxClient<H> {
    async fn list(
        &self,
        endpoint: &str,
        query: &[(String, String)],
    ) -> Result<Vec<RemoteObject>, ApiError> {
        let mut url = self.endpoint_url(endpoint, None)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let mut objects = Vec::new();
        let mut next = Some(url);

        while let Some(page_url) = next.take() {
            let response = self.send(HttpRequest::get(page_url)).await?;
            let page: Page = serde_json::from_slice(&response.body)
                .map_err(|e| ApiError::Decode(e.to_string()))?;

            for value in page.results {
                objects.push(RemoteObject::from_value(value)?);
            }

            next = page
                .next
                .map(|link| Url::parse(&link).map_err(|e| HttpError::InvalidUrl(e.to_string())))
                .transpose()?;
        }

        Ok(objects)
    }

    async fn create(
        &self,
        endpoint: &str,
        payload: &Map<String, Value>,
    ) -> Result<RemoteObject, ApiError> {
        let url = self.endpoint_url(endpoint, None)?;
        let request = HttpRequest::post(url)
            .with_json(payload)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send_for_object(request).await
    }

    async fn update(
        &self,
        endpoint: &str,
        id: u64,
        payload: &Map<String, Value>,
    ) -> Result<RemoteObject, ApiError> {
        let url = self.endpoint_url(endpoint, Some(id))?;
        let request = HttpRequest::patch(url)
            .with_json(payload)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.send_for_object(request).await
    }

    async fn delete(&self, endpoint: &str, id: u64) -> Result<DeleteOutcome, ApiError> {
        let url = self.endpoint_url(endpoint, Some(id))?;

        match self.send(HttpRequest::delete(url)).await {
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(ApiError::Rejected { status, .. }) if status == http::StatusCode::NOT_FOUND => {
                Ok(DeleteOutcome::NotFound)
            }
            Err(e) => Err(e),
        }
    }
}
