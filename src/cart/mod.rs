//! Session cart: the [`Cart`](aggregator::Cart) reducer and the [`CartService`] actor that owns it.

pub mod aggregator;
pub mod error;
pub mod service;

pub use error::CartError;
pub use service::{CartRequest, CartService};
