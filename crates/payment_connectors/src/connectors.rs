//! Adapter modules, one per provider.

pub mod paypal;
pub mod square;
pub mod stripe;

pub use self::{paypal::Paypal, square::Square, stripe::Stripe};
