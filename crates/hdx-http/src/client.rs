//! HTTP client wrapper.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, LOCATION};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};
use url::Url;

use hdx_core::error::InvalidInputError;
use hdx_core::{Credentials, Result};

use crate::endpoints::{CLIENT_ID_HEADER, CLIENT_SECRET_HEADER, FHIR_JSON};
use crate::error::{decode_error, protocol_error, transport_error};

/// Status, `Location` header and body of a response, read in full.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

/// HTTP client shared by the authenticator and the connection.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hdx/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self { client })
    }

    /// GET with the client credentials as headers.
    #[instrument(skip(self, credentials), fields(client_id = credentials.client_id()))]
    pub async fn get_with_credentials(
        &self,
        url: &Url,
        credentials: &Credentials,
    ) -> Result<RawResponse> {
        debug!(%url, "Requesting token");

        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_ID_HEADER, header_value(credentials.client_id())?);
        let mut secret = header_value(credentials.client_secret())?;
        secret.set_sensitive(true);
        headers.insert(CLIENT_SECRET_HEADER, secret);

        self.send(self.client.get(url.clone()).headers(headers))
            .await
    }

    /// Authenticated GET, any status.
    #[instrument(skip(self, headers))]
    pub async fn get(&self, url: &Url, headers: HeaderMap) -> Result<RawResponse> {
        debug!(%url, "GET");
        self.send(self.client.get(url.clone()).headers(headers))
            .await
    }

    /// Authenticated GET, decoding a successful JSON body.
    pub async fn get_json<R>(&self, url: &Url, headers: HeaderMap) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let response = self.get(url, headers).await?;
        handle_response(url, response)
    }

    /// Authenticated POST of a FHIR JSON body, any status.
    #[instrument(skip(self, body, headers))]
    pub async fn post_json<B>(&self, url: &Url, body: &B, headers: HeaderMap) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        debug!(%url, "POST");
        let body = serde_json::to_vec(body).map_err(|e| InvalidInputError::Other {
            message: format!("request body is not serializable: {}", e),
        })?;

        self.send(
            self.client
                .post(url.clone())
                .headers(headers)
                .header(CONTENT_TYPE, HeaderValue::from_static(FHIR_JSON))
                .body(body),
        )
        .await
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<RawResponse> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.map_err(transport_error)?;
        trace!(status = %status, bytes = body.len(), "Response");

        Ok(RawResponse {
            status,
            location,
            body,
        })
    }
}

/// Headers for an authenticated FHIR request.
pub(crate) fn fhir_headers(authorization: &HeaderValue) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(reqwest::header::AUTHORIZATION, authorization.clone());
    headers.insert(ACCEPT, HeaderValue::from_static(FHIR_JSON));
    headers
}

/// Decode a successful JSON body, or turn the status into an error.
pub(crate) fn handle_response<R: DeserializeOwned>(url: &Url, response: RawResponse) -> Result<R> {
    if response.status.is_success() {
        serde_json::from_str(&response.body).map_err(|e| decode_error(url, e))
    } else {
        Err(protocol_error(url, response.status.as_u16(), &response.body))
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value).map_err(|_| {
        InvalidInputError::Other {
            message: "credentials contain characters not allowed in a header".to_string(),
        }
        .into()
    })
}
