//! Credential vault boundary.
//!
//! Adapters call exactly one collaborator function, `decrypt`, and never
//! persist or re-encrypt the result. The concrete vault (KMS, local key,
//! whatever the deployment uses) is injected by the application.

use api_models::admin::EncryptedCredentials;
use common_utils::errors::CustomResult;
use masking::Secret;

/// Errors raised by the credential vault.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The blob could not be decrypted with the configured key material
    #[error("Failed to decrypt stored credentials")]
    DecryptionFailed,

    /// The decrypted blob is not a JSON credential map
    #[error("Decrypted credentials are malformed")]
    MalformedCredentials,
}

/// Decrypts credential blobs into a structured credential map.
#[async_trait::async_trait]
pub trait CredentialVault: Send + Sync {
    /// Decrypt the blob. The result stays wrapped in a [`Secret`] and is
    /// parsed into a provider-specific auth type immediately by the caller;
    /// it must not outlive the call that needs it.
    async fn decrypt(
        &self,
        blob: &EncryptedCredentials,
    ) -> CustomResult<Secret<serde_json::Value>, VaultError>;
}
