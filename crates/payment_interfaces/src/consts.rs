//! Constants shared by the adapters.

/// Error code used when a provider error payload carries none
pub const NO_ERROR_CODE: &str = "No error code";

/// Error message used when a provider error payload carries none
pub const NO_ERROR_MESSAGE: &str = "No error message received";
