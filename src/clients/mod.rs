#[macro_use]
mod macros;

pub mod cart_client;
pub mod product_client;

pub use cart_client::CartClient;
pub use product_client::ProductClient;
