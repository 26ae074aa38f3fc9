//! Core order/side/status types shared by every other module.

use serde::{Deserialize, Serialize};

pub type OrderId = u64;
pub type OwnerId = u64;

/// Which side of the book an order rests on, or which side a trade hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

/// A conditional order's activation rule. `None` on a plain limit/market order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopKind {
    Loss,
    Entry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Untouched,
    PartiallyFilled,
    Filled,
    Cancelled,
}

/// The command verb carried on an incoming [`Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    NewOrder,
    CancelOrder,
}

/// The unit of intent processed by the matching engine.
///
/// Fields mirror the wire command exactly; the engine never adds fields that
/// aren't supplied by the caller. A `CancelOrder` command only needs `id`,
/// `side`, `price`, `order_type` (and `stop`/`stop_price` for a stop cancel)
/// populated — the rest may be left at their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub owner_id: OwnerId,
    pub side: Side,
    pub order_type: OrderType,
    pub stop: Option<StopKind>,
    pub price: u64,
    pub stop_price: u64,
    pub amount: u64,
    pub funds: u64,
    pub filled_amount: u64,
    pub used_funds: u64,
    pub status: OrderStatus,
    pub event_type: EventType,
}

impl Default for Order {
    fn default() -> Self {
        Order {
            id: 0,
            owner_id: 0,
            side: Side::Buy,
            order_type: OrderType::Limit,
            stop: None,
            price: 0,
            stop_price: 0,
            amount: 0,
            funds: 0,
            filled_amount: 0,
            used_funds: 0,
            status: OrderStatus::Pending,
            event_type: EventType::NewOrder,
        }
    }
}

impl Order {
    pub fn unfilled_amount(&self) -> u64 {
        self.amount.saturating_sub(self.filled_amount)
    }

    pub fn unused_funds(&self) -> u64 {
        self.funds.saturating_sub(self.used_funds)
    }

    pub fn is_filled(&self) -> bool {
        self.unfilled_amount() == 0
    }
}
