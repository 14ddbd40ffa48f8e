//! Exchanging client credentials for a bearer token.

use reqwest::StatusCode;
use tracing::{info, instrument, warn};

use hdx_core::error::AuthError;
use hdx_core::{AccessToken, BaseUrl, Credentials, Result};

use crate::client::HttpClient;
use crate::connection::HttpConnection;

/// Issues the single `GET {base}/auth/` request that yields a token.
///
/// There is no retry: a rejected attempt is final and the caller must not
/// proceed.
#[derive(Debug, Clone)]
pub struct Authenticator {
    base: BaseUrl,
    client: HttpClient,
}

impl Authenticator {
    pub fn new(base: BaseUrl) -> Result<Self> {
        Ok(Self {
            base,
            client: HttpClient::new()?,
        })
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    /// Request a token.
    ///
    /// # Errors
    ///
    /// [`AuthError::Rejected`] with the observed status for anything but
    /// 200, [`AuthError::EmptyToken`] for an empty 200 body, or a transport
    /// error.
    #[instrument(skip(self, credentials), fields(url = %self.base.auth_url()))]
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken> {
        if self.base.is_plaintext() {
            warn!("Sending client secret over plain HTTP");
        }

        let response = self
            .client
            .get_with_credentials(self.base.auth_url(), credentials)
            .await?;

        if response.status != StatusCode::OK {
            warn!(status = %response.status, "Authentication rejected");
            return Err(AuthError::Rejected {
                status: response.status.as_u16(),
            }
            .into());
        }

        if response.body.is_empty() {
            return Err(AuthError::EmptyToken.into());
        }

        info!("Authenticated");
        Ok(AccessToken::new(response.body))
    }

    /// Authenticate and open a connection that reuses this client.
    pub async fn connect(self, credentials: &Credentials) -> Result<HttpConnection> {
        let token = self.authenticate(credentials).await?;
        HttpConnection::from_parts(self.client, self.base, token)
    }
}
