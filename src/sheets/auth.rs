use std::{fmt::Debug, path::Path};

use error_stack::ResultExt;
use google_sheets4::oauth2::{self, authenticator::Authenticator};
use thiserror::Error;
use tracing::{debug, instrument};

use super::http_client::{self, HttpClient, HttpsConnector};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Could not read service account key")]
    ReadKey,
    #[error("Could not create an authenticator")]
    BuildAuthenticator,
    #[error("Identity provider rejected the service account")]
    TokenRejected,
}

/// Service account authenticator bound to the scopes it was validated for.
pub struct Credential {
    pub(crate) client: HttpClient,
    pub(crate) authenticator: Authenticator<HttpsConnector>,
    pub scopes: Vec<String>,
    pub client_email: String,
}

impl Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("client_email", &self.client_email)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

/// Parses the key file only; never touches the network.
pub async fn read_key(
    key_path: &Path,
) -> error_stack::Result<oauth2::ServiceAccountKey, AuthError> {
    oauth2::read_service_account_key(key_path)
        .await
        .change_context(AuthError::ReadKey)
        .attach_printable_lazy(|| {
            format!(
                "could not read service account private key at '{}'",
                key_path.display()
            )
        })
}

/// Reads the key, then asks the identity provider for a token covering
/// `scopes` so a rejected key fails here rather than on the first API call.
#[instrument(skip(scopes))]
pub async fn authenticate(
    key_path: &Path,
    scopes: &[String],
) -> error_stack::Result<Credential, AuthError> {
    let secret = read_key(key_path).await?;
    let client_email = secret.client_email.clone();
    debug!(%client_email, "service account key loaded");

    let client = http_client::http_client();
    let authenticator = oauth2::ServiceAccountAuthenticator::with_client(secret, client.clone())
        .build()
        .await
        .change_context(AuthError::BuildAuthenticator)?;

    authenticator
        .token(scopes)
        .await
        .change_context(AuthError::TokenRejected)
        .attach_printable_lazy(|| format!("service account: {client_email}"))
        .attach_printable_lazy(|| format!("scopes: {}", scopes.join(", ")))?;

    Ok(Credential {
        client,
        authenticator,
        scopes: scopes.to_vec(),
        client_email,
    })
}
