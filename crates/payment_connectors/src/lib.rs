//! Provider adapters implementing the uniform payment capability.
//!
//! Each adapter lives in its own module with a `transformers` submodule
//! holding the provider's wire types and the conversions between them and
//! the canonical models. Provider wire formats, amount encodings and error
//! shapes never leak past the adapter boundary.

pub mod connectors;
pub mod constants;
pub mod utils;

pub use connectors::{Paypal, Square, Stripe};
