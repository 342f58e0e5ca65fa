//! Domain types owned by the router.

pub mod domain;
