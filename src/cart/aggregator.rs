use tokio::sync::mpsc;

use crate::domain::{CartLine, CartSnapshot, Product, QuantityChange};

/// In-memory cart for one session.
///
/// Holds at most one line per product id, in the order products were first
/// added. Every operation, including the ones that turn out to be no-ops, ends by
/// pushing a fresh snapshot to each live subscriber before returning. Totals are
/// recomputed from the lines for every snapshot.
///
/// Not meant to be shared between threads; [`CartService`](super::CartService)
/// owns one and applies requests in arrival order.
#[derive(Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    subscribers: Vec<mpsc::UnboundedSender<CartSnapshot>>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one unit of `product`, appending a new line if it is not in the cart.
    pub fn add(&mut self, product: &Product) -> CartSnapshot {
        match self.line_mut(product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::from_product(product)),
        }
        self.publish()
    }

    /// Drops the line for `product_id`. Unknown ids leave the cart unchanged.
    pub fn remove(&mut self, product_id: u64) -> CartSnapshot {
        self.lines.retain(|line| line.product_id != product_id);
        self.publish()
    }

    /// Moves the quantity of an existing line by one.
    ///
    /// Increasing a product that is not in the cart does nothing. Decreasing a line
    /// at quantity 1 removes it instead of leaving a zero-quantity row.
    pub fn adjust(&mut self, product_id: u64, change: QuantityChange) -> CartSnapshot {
        match change {
            QuantityChange::Increase => {
                if let Some(line) = self.line_mut(product_id) {
                    line.quantity = line.quantity.saturating_add(1);
                }
            }
            QuantityChange::Decrease => {
                let decremented = match self.line_mut(product_id) {
                    Some(line) if line.quantity > 1 => {
                        line.quantity -= 1;
                        true
                    }
                    _ => false,
                };
                if !decremented {
                    self.lines.retain(|line| line.product_id != product_id);
                }
            }
        }
        self.publish()
    }

    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from_lines(&self.lines)
    }

    /// Registers a subscriber. The receiver immediately holds the current
    /// snapshot, then one snapshot per later operation, in order.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<CartSnapshot> {
        let (sender, receiver) = mpsc::unbounded_channel();
        // Receiver is alive, so this cannot fail.
        let _ = sender.send(self.snapshot());
        self.subscribers.push(sender);
        receiver
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn line_mut(&mut self, product_id: u64) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.product_id == product_id)
    }

    /// Sends the current snapshot to every subscriber and forgets dropped ones.
    fn publish(&mut self) -> CartSnapshot {
        let snapshot = self.snapshot();
        self.subscribers.retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chair() -> Product {
        Product::new(1, "Chair", 50.0, 10)
    }

    fn desk() -> Product {
        Product::new(2, "Desk", 150.0, 4)
    }

    fn quantities(snapshot: &CartSnapshot) -> Vec<(u64, u32)> {
        snapshot.items.iter().map(|l| (l.product_id, l.quantity)).collect()
    }

    #[test]
    fn test_add_twice_then_remove() {
        let mut cart = Cart::new();

        assert_eq!(quantities(&cart.add(&chair())), vec![(1, 1)]);
        assert_eq!(quantities(&cart.add(&chair())), vec![(1, 2)]);

        let snapshot = cart.remove(1);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.total_quantity, 0);
        assert_eq!(snapshot.total_price, 0.0);
    }

    #[test]
    fn test_lines_keep_first_insertion_order() {
        let mut cart = Cart::new();
        cart.add(&desk());
        cart.add(&chair());
        cart.add(&desk());

        assert_eq!(quantities(&cart.snapshot()), vec![(2, 2), (1, 1)]);
    }

    #[test]
    fn test_decrease_at_one_removes_line() {
        let mut cart = Cart::new();
        cart.add(&chair());

        let snapshot = cart.adjust(1, QuantityChange::Decrease);
        assert!(snapshot.line(1).is_none());
    }

    #[test]
    fn test_decrease_above_one_keeps_line() {
        let mut cart = Cart::new();
        cart.add(&chair());
        cart.adjust(1, QuantityChange::Increase);
        cart.adjust(1, QuantityChange::Increase);

        assert_eq!(quantities(&cart.adjust(1, QuantityChange::Decrease)), vec![(1, 2)]);
    }

    #[test]
    fn test_absent_ids_are_no_ops() {
        let mut cart = Cart::new();
        cart.add(&chair());
        let before = cart.snapshot();

        assert_eq!(cart.remove(42), before);
        assert_eq!(cart.adjust(42, QuantityChange::Increase), before);
        assert_eq!(cart.adjust(42, QuantityChange::Decrease), before);
    }

    #[test]
    fn test_quantity_saturates_instead_of_overflowing() {
        let mut cart = Cart::new();
        cart.add(&chair());
        cart.lines[0].quantity = u32::MAX;

        cart.add(&chair());
        let snapshot = cart.adjust(1, QuantityChange::Increase);
        assert_eq!(quantities(&snapshot), vec![(1, u32::MAX)]);
        assert_eq!(snapshot.total_quantity, u64::from(u32::MAX));
    }

    #[test]
    fn test_line_keeps_display_snapshot_from_first_add() {
        let mut cart = Cart::new();
        cart.add(&chair());

        let mut repriced = chair();
        repriced.price = 80.0;
        let snapshot = cart.add(&repriced);

        assert_eq!(snapshot.items[0].price, 50.0);
        assert_eq!(snapshot.total_price, 100.0);
    }

    #[test]
    fn test_totals_match_independent_recompute() {
        let mut cart = Cart::new();
        let lamp = Product::new(3, "Lamp", 19.99, 8);

        let mut last = cart.add(&chair());
        for step in 0..30u64 {
            last = match step % 6 {
                0 => cart.add(&desk()),
                1 => cart.add(&lamp),
                2 => cart.adjust(3, QuantityChange::Increase),
                3 => cart.adjust(1, QuantityChange::Decrease),
                4 => cart.add(&chair()),
                _ => cart.adjust(2, QuantityChange::Decrease),
            };

            let expected_price: f64 = last.items.iter().map(|l| l.price * f64::from(l.quantity)).sum();
            let expected_quantity: u64 = last.items.iter().map(|l| u64::from(l.quantity)).sum();
            assert_eq!(last.total_price, expected_price);
            assert_eq!(last.total_quantity, expected_quantity);
            assert!(last.items.iter().all(|l| l.quantity >= 1));
        }
        assert_eq!(last, cart.snapshot());
    }

    #[test]
    fn test_subscribers_get_current_then_every_change_in_order() {
        let mut cart = Cart::new();
        cart.add(&chair());

        let mut rx = cart.subscribe();
        cart.add(&chair());
        cart.remove(1);

        assert_eq!(quantities(&rx.try_recv().unwrap()), vec![(1, 1)]);
        assert_eq!(quantities(&rx.try_recv().unwrap()), vec![(1, 2)]);
        assert!(rx.try_recv().unwrap().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut cart = Cart::new();
        let rx = cart.subscribe();
        let _kept = cart.subscribe();
        drop(rx);

        cart.add(&desk());
        assert_eq!(cart.subscriber_count(), 1);
    }
}
