//! Delivery of login credentials to newly registered staff.
//!
//! The platform hands the temporary password to a [`CredentialNotifier`].
//! The default [`LogNotifier`] records that a delivery happened without ever
//! writing the secret to the log; deployments with a mail relay plug in their
//! own implementation.

use async_trait::async_trait;

/// Credentials issued to a new user.
#[derive(Clone)]
pub struct IssuedCredentials {
    pub name: String,
    pub email: String,
    pub temporary_password: String,
}

impl std::fmt::Debug for IssuedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IssuedCredentials")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("temporary_password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Credential delivery failed: {0}")]
pub struct NotifyError(pub String);

#[async_trait]
pub trait CredentialNotifier: Send + Sync {
    async fn send_credentials(&self, credentials: &IssuedCredentials) -> Result<(), NotifyError>;
}

/// Logs the delivery; the password itself is not logged.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl CredentialNotifier for LogNotifier {
    async fn send_credentials(&self, credentials: &IssuedCredentials) -> Result<(), NotifyError> {
        tracing::info!(
            email = %credentials.email,
            name = %credentials.name,
            "Issued login credentials to new user"
        );
        Ok(())
    }
}
