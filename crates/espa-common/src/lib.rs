//! Common types shared across the ESPA geolocation crates.

pub mod bbox;
pub mod error;

pub use bbox::BoundingBox;
pub use error::{ErrorCategory, EspaError, EspaResult};
