//! FIFO queues of market orders parked when the opposing book could not
//! fully satisfy them on arrival.
//!
//! Grounded in `original_source/engine/order_book.go`'s
//! `pushMarketBuyOrder`/`lpushMarketBuyOrder`/`popMarketBuyOrder` family:
//! new arrivals always join the tail (never overtake), a drain pops the
//! front, and a drain that can't fully fill its head pushes it back to the
//! front and stops — the rest of the queue can't be satisfied either if the
//! head, with full priority, wasn't.

use std::collections::VecDeque;

use super::types::Order;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PendingQueue {
    orders: VecDeque<Order>,
}

impl PendingQueue {
    pub fn new() -> Self {
        PendingQueue::default()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// A newly arrived market order joins the tail.
    pub fn push_back(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    /// A popped order that didn't fully fill is returned to the front.
    pub fn push_front(&mut self, order: Order) {
        self.orders.push_front(order);
    }

    pub fn pop_front(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    /// Remove by id for a market cancel. `true` if an order was removed.
    pub fn remove(&mut self, id: super::types::OrderId) -> bool {
        if let Some(pos) = self.orders.iter().position(|o| o.id == id) {
            self.orders.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}
