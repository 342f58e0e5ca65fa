//! Consts module

/// Default length of generated identifiers
pub const ID_LENGTH: usize = 20;

/// Upper bound on idempotency keys accepted by the card and terminal-POS
/// providers. Caller-supplied keys longer than this are truncated, not
/// rejected.
pub const MAX_IDEMPOTENCY_KEY_LENGTH: usize = 45;

/// Default transport timeout for outbound provider calls, in seconds
pub const REQUEST_TIME_OUT: u64 = 30;

/// Maximum number of transport-level attempts for a single outbound call
pub const MAX_REQUEST_ATTEMPTS: u8 = 3;
