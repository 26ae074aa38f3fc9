//! The three event variants the matching core emits, and the sequencing
//! discipline around them.
//!
//! Grounded in `OrderBookSyncer`'s `add_order`/`update_order`/`matched`
//! callback split: the same three notifications, collapsed from a trait a
//! concurrent syncer thread implements into a plain tagged union a single
//! synchronous caller drains from an output buffer.

use serde::{Deserialize, Serialize};

use super::types::{OrderId, OrderStatus, OwnerId, Side, StopKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    pub seq: u64,
    pub market_id: String,
    pub trade_seq: u64,
    pub taker_side: Side,
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub maker_owner: OwnerId,
    pub taker_owner: OwnerId,
    pub amount: u64,
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusEvent {
    pub seq: u64,
    pub market_id: String,
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub filled_amount: u64,
    pub used_funds: u64,
    pub price: u64,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderActivationEvent {
    pub seq: u64,
    pub market_id: String,
    pub order_id: OrderId,
    pub price: u64,
    pub amount: u64,
    pub side: Side,
    pub stop_price: u64,
    pub stop_kind: StopKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Trade(TradeEvent),
    OrderStatus(OrderStatusEvent),
    Activation(OrderActivationEvent),
}

/// The output buffer every `process`/`cancel` call appends to. A plain
/// `Vec` — there is exactly one synchronous caller, so there is nothing for
/// a callback trait to abstract over.
pub type EventBuffer = Vec<Event>;
