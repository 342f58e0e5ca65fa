//! Constants shared by the adapters.

/// Header names used across adapters.
pub mod headers {
    pub const AUTHORIZATION: &str = "Authorization";
    pub const IDEMPOTENCY_KEY: &str = "Idempotency-Key";
    pub const SQUARE_VERSION: &str = "Square-Version";
}

/// Pinned Square API version sent on every Square call.
pub const SQUARE_API_VERSION: &str = "2024-01-18";

/// Minimum length a credential field must have to pass the offline shape
/// check. Provider keys are far longer; this only catches obvious
/// misconfiguration (truncated paste, placeholder values).
pub const MIN_CREDENTIAL_LENGTH: usize = 10;

/// Guidance appended to Square probe failures that look like an OAuth scope
/// problem; the merchant-listing endpoint needs a scope not granted on all
/// accounts.
pub const SQUARE_SCOPE_GUIDANCE: &str = "The access token may be missing the \
MERCHANT_PROFILE_READ OAuth scope. Re-authorize the application with merchant \
and location read permissions, or use a full-access token from the developer \
dashboard.";
