use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument};

use super::aggregator::Cart;
use super::error::CartError;
use crate::clients::CartClient;
use crate::domain::{CartSnapshot, Product, QuantityChange};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

#[derive(Debug)]
pub enum CartRequest {
    Add {
        product: Product,
        respond_to: ServiceResponse<CartSnapshot, CartError>,
    },
    Remove {
        product_id: u64,
        respond_to: ServiceResponse<CartSnapshot, CartError>,
    },
    Adjust {
        product_id: u64,
        change: QuantityChange,
        respond_to: ServiceResponse<CartSnapshot, CartError>,
    },
    Snapshot {
        respond_to: ServiceResponse<CartSnapshot, CartError>,
    },
    Subscribe {
        respond_to: ServiceResponse<mpsc::UnboundedReceiver<CartSnapshot>, CartError>,
    },
    Shutdown,
}

/// Session cart actor. Owns one [`Cart`] and applies requests strictly in the
/// order they reach its mailbox, so any number of [`CartClient`] clones can share
/// it without interleaving read-modify-write steps.
pub struct CartService {
    receiver: mpsc::Receiver<CartRequest>,
    cart: Cart,
}

impl CartService {
    pub fn new(buffer_size: usize) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            cart: Cart::new(),
        };
        let client = CartClient::new(sender);
        (service, client)
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!("CartService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::Add { product, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_add(product)));
                }
                CartRequest::Remove { product_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_remove(product_id)));
                }
                CartRequest::Adjust {
                    product_id,
                    change,
                    respond_to,
                } => {
                    let _ = respond_to.send(Ok(self.handle_adjust(product_id, change)));
                }
                CartRequest::Snapshot { respond_to } => {
                    let _ = respond_to.send(Ok(self.cart.snapshot()));
                }
                CartRequest::Subscribe { respond_to } => {
                    let receiver = self.cart.subscribe();
                    debug!(subscribers = self.cart.subscriber_count(), "Subscriber registered");
                    let _ = respond_to.send(Ok(receiver));
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }

        info!("CartService stopped");
    }

    #[instrument(fields(product_id = product.id, product_name = %product.display_name()), skip(self, product))]
    fn handle_add(&mut self, product: Product) -> CartSnapshot {
        let snapshot = self.cart.add(&product);
        info!(
            total_quantity = snapshot.total_quantity,
            total_price = snapshot.total_price,
            "Product added to cart"
        );
        snapshot
    }

    #[instrument(skip(self))]
    fn handle_remove(&mut self, product_id: u64) -> CartSnapshot {
        let snapshot = self.cart.remove(product_id);
        info!(lines = snapshot.items.len(), "Product removed from cart");
        snapshot
    }

    #[instrument(skip(self))]
    fn handle_adjust(&mut self, product_id: u64, change: QuantityChange) -> CartSnapshot {
        let snapshot = self.cart.adjust(product_id, change);
        match snapshot.line(product_id) {
            Some(line) => debug!(quantity = line.quantity, "Quantity adjusted"),
            None => debug!("Product not in cart after adjustment"),
        }
        snapshot
    }
}
