//! Authenticated FHIR connection.

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use serde_json::Value;
use tracing::{debug, info, instrument};
use url::Url;

use hdx_core::error::{AuthError, ProtocolError};
use hdx_core::fhir::QueryParameters;
use hdx_core::paginate::{self, PageLimit};
use hdx_core::poll::{self, PollConfig, QueryOutcome};
use hdx_core::{
    AccessToken, BaseUrl, Credentials, FhirConnection, Page, Purpose, QueryManifest, QueryStatus,
    RecordId, ResourceCollection, Result, SearchUrl,
};

use crate::auth::Authenticator;
use crate::client::{HttpClient, fhir_headers, handle_response};
use crate::endpoints::{CreatedResource, PATIENT, id_from_location};
use crate::error::{decode_error, protocol_error};

/// Result of registering a patient: the new record and the raw response to
/// the query submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub record_id: RecordId,
    pub response: Value,
}

/// An authenticated handle to the FHIR server.
///
/// Holds the bearer token and the HTTP client; every operation takes the
/// handle by reference. Cloning is cheap and shares the connection pool.
#[derive(Clone)]
pub struct HttpConnection {
    client: HttpClient,
    base: BaseUrl,
    token: AccessToken,
    authorization: HeaderValue,
}

impl HttpConnection {
    /// Authenticate with the client credentials and open a connection.
    pub async fn connect(base: BaseUrl, credentials: &Credentials) -> Result<Self> {
        Authenticator::new(base)?.connect(credentials).await
    }

    /// Open a connection with a token obtained earlier.
    pub fn with_token(base: BaseUrl, token: AccessToken) -> Result<Self> {
        Self::from_parts(HttpClient::new()?, base, token)
    }

    pub(crate) fn from_parts(client: HttpClient, base: BaseUrl, token: AccessToken) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", token.as_str()))
            .map_err(|_| AuthError::InvalidToken)?;
        authorization.set_sensitive(true);

        Ok(Self {
            client,
            base,
            token,
            authorization,
        })
    }

    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Create a patient record and return its server-assigned id.
    ///
    /// The id comes from the response body, or from the `Location` header
    /// when the server answers with an empty body.
    #[instrument(skip(self, patient), fields(base = %self.base))]
    pub async fn create_patient(&self, patient: &Value) -> Result<RecordId> {
        let url = self.base.fhir_url(PATIENT)?;
        let response = self
            .client
            .post_json(&url, patient, fhir_headers(&self.authorization))
            .await?;

        let status = response.status.as_u16();
        if !response.status.is_success() {
            return Err(protocol_error(&url, status, &response.body));
        }

        let from_body = if response.body.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<CreatedResource>(&response.body)
                .map_err(|e| decode_error(&url, e))?
                .id
        };

        let id = match from_body {
            Some(id) => id,
            None => response
                .location
                .as_deref()
                .and_then(|location| id_from_location(location, PATIENT))
                .map(str::to_string)
                .ok_or_else(|| {
                    ProtocolError::new(
                        status,
                        url.as_str(),
                        Some("no resource id in response".to_string()),
                    )
                })?,
        };

        let record_id = RecordId::new(id)?;
        info!(patient = %record_id, "Created patient");
        Ok(record_id)
    }

    /// Submit `Patient/{id}/$query` with the given purpose.
    ///
    /// The response is returned as-is (`Null` for an empty body). Completion
    /// is only observable through [`wait_for_query`](Self::wait_for_query).
    #[instrument(skip(self), fields(patient = %patient))]
    pub async fn submit_query(&self, patient: &RecordId, purpose: Purpose) -> Result<Value> {
        let url = self.base.fhir_url(&patient.query_path())?;
        let body = QueryParameters::for_purpose(purpose);

        let response = self
            .client
            .post_json(&url, &body, fhir_headers(&self.authorization))
            .await?;
        debug!(status = %response.status, "Query submitted");

        if response.body.trim().is_empty() && response.status.is_success() {
            return Ok(Value::Null);
        }
        handle_response(&url, response)
    }

    /// Create the patient, then submit the query for it.
    pub async fn register_patient(&self, patient: &Value, purpose: Purpose) -> Result<Submission> {
        let record_id = self.create_patient(patient).await?;
        let response = self.submit_query(&record_id, purpose).await?;
        Ok(Submission {
            record_id,
            response,
        })
    }

    /// Poll until the patient's query completes or `config.max_wait` passes.
    pub async fn wait_for_query(
        &self,
        patient: &RecordId,
        config: PollConfig,
    ) -> Result<QueryOutcome> {
        poll::wait_for_query(self, patient, config).await
    }

    /// Fetch every page of a preset search.
    pub async fn fetch_all(
        &self,
        search: &SearchUrl,
        limit: PageLimit,
    ) -> Result<ResourceCollection> {
        paginate::fetch_search(self, search, limit).await
    }
}

#[async_trait]
impl FhirConnection for HttpConnection {
    fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    #[instrument(skip(self), fields(patient = %patient))]
    async fn query_status(&self, patient: &RecordId) -> Result<QueryStatus> {
        let url = self.base.fhir_url(&patient.query_path())?;
        let response = self
            .client
            .get(&url, fhir_headers(&self.authorization))
            .await?;

        let status = response.status.as_u16();
        let manifest = if status == 200 && !response.body.trim().is_empty() {
            serde_json::from_str::<QueryManifest>(&response.body).ok()
        } else {
            None
        };

        Ok(QueryStatus::from_status(status, manifest))
    }

    async fn fetch_page(&self, url: &Url) -> Result<Page> {
        self.client
            .get_json(url, fhir_headers(&self.authorization))
            .await
    }
}

impl std::fmt::Debug for HttpConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConnection")
            .field("base", &self.base)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
