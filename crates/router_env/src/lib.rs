#![forbid(unsafe_code)]

//!
//! Environment of payment router: logger, basic config, its environment
//! awareness.
//!

pub mod env;
pub mod logger;

#[doc(inline)]
pub use logger::*;
pub use tracing;
pub use tracing::instrument;

#[doc(inline)]
pub use self::env::*;
