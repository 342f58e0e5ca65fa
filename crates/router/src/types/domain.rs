//! Domain-level collaborators.

use api_models::admin::EncryptedCredentials;
use common_utils::errors::CustomResult;
use error_stack::ResultExt;
use masking::{PeekInterface, Secret};
use payment_interfaces::vault::{CredentialVault, VaultError};

/// Development-mode vault: treats the stored blob as plaintext JSON.
///
/// Production deployments inject a KMS-backed implementation through the
/// same trait; the payment core never knows the difference.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainJsonVault;

#[async_trait::async_trait]
impl CredentialVault for PlainJsonVault {
    async fn decrypt(
        &self,
        blob: &EncryptedCredentials,
    ) -> CustomResult<Secret<serde_json::Value>, VaultError> {
        serde_json::from_str(blob.inner().peek())
            .map(Secret::new)
            .change_context(VaultError::MalformedCredentials)
    }
}
