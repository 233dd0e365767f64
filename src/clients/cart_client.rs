use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::cart::{CartError, CartRequest};
use crate::domain::{CartSnapshot, Product, QuantityChange};

/// Client for interacting with the Cart actor.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    pub async fn increase_quantity(&self, product_id: u64) -> Result<CartSnapshot, CartError> {
        self.adjust_quantity(product_id, QuantityChange::Increase).await
    }

    pub async fn decrease_quantity(&self, product_id: u64) -> Result<CartSnapshot, CartError> {
        self.adjust_quantity(product_id, QuantityChange::Decrease).await
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CartError> {
        debug!("Sending request");
        self.sender
            .send(CartRequest::Shutdown)
            .await
            .map_err(|_| CartError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(CartClient => fn add_to_cart(product: Product) -> CartSnapshot as CartRequest::Add, Error = CartError);
client_method!(CartClient => fn remove_from_cart(product_id: u64) -> CartSnapshot as CartRequest::Remove, Error = CartError);
client_method!(CartClient => fn adjust_quantity(product_id: u64, change: QuantityChange) -> CartSnapshot as CartRequest::Adjust, Error = CartError);
client_method!(CartClient => fn snapshot() -> CartSnapshot as CartRequest::Snapshot, Error = CartError);
client_method!(CartClient => fn subscribe() -> mpsc::UnboundedReceiver<CartSnapshot> as CartRequest::Subscribe, Error = CartError);
