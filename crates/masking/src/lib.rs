#![forbid(unsafe_code)]
#![warn(missing_docs)]

//!
//! Wrapper types and traits for secret management which help ensure secrets
//! aren't accidentally copied, logged, or otherwise exposed (as much as
//! possible), and also ensure secrets are securely wiped from memory when
//! dropped. Secret-keeping library inspired by secrecy.
//!

pub use zeroize::{self, Zeroize as ZeroizableSecret};

mod strategy;
pub use strategy::{Strategy, WithType, WithoutType};

mod abs;
pub use abs::{ExposeInterface, ExposeOptionInterface, PeekInterface};

mod secret;
mod strong_secret;
pub use secret::Secret;
pub use strong_secret::StrongSecret;

mod serde;
pub use crate::serde::{Deserialize, ErasedSerialize, SerializableSecret, Serialize};

/// This module should be included with asterisk.
///
/// `use masking::prelude::*;`
///
pub mod prelude {
    pub use super::{ExposeInterface, ExposeOptionInterface, PeekInterface};
}

mod maskable;
pub use maskable::{Mask, Maskable};
