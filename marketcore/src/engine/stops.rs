//! The armed stop-order table and its activation check.
//!
//! No conditional-order concept exists anywhere in `original_source/engine/
//! *.go`, so this module is built fresh, in the style of `Order::validate`'s
//! per-order-type field checks and `DefaultOrderBook`'s cheap scalar
//! best-price caching, rather than translated from anywhere.
//!
//! Trigger direction is determined by the armed order's `side`, not by its
//! `stop` label: a buy-side stop (labeled Loss or Entry — the label is the
//! trader's intent, not the mechanics) fires when `last_price` rises to meet
//! or cross `stop_price`; a sell-side stop fires when `last_price` falls to
//! meet or cross it. This is the standard real-world convention: a stop
//! order armed on the buy side protects against the market running away
//! upward, regardless of whether the trader calls it a "loss" or an "entry".

use std::collections::BTreeMap;

use super::types::{Order, OrderId, Side};

type StopKey = (u64, u64); // (stop_price, insertion_seq) — orders iteration by both.

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StopTable {
    buy: BTreeMap<StopKey, Order>,
    sell: BTreeMap<StopKey, Order>,
    next_seq: u64,
}

impl StopTable {
    pub fn new() -> Self {
        StopTable::default()
    }

    pub fn len(&self) -> usize {
        self.buy.len() + self.sell.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Arm a stop order. Caller has already validated `stop.is_some()` and
    /// `stop_price > 0`.
    pub fn insert(&mut self, order: Order) {
        let key = (order.stop_price, self.next_seq);
        self.next_seq += 1;
        match order.side {
            Side::Buy => self.buy.insert(key, order),
            Side::Sell => self.sell.insert(key, order),
        };
    }

    /// Cached extremum: the highest `stop_price` among armed sell-side
    /// stops — the first to fire as price falls.
    pub fn highest_loss_price(&self) -> u64 {
        self.sell.keys().next_back().map(|(p, _)| *p).unwrap_or(0)
    }

    /// Cached extremum: the lowest `stop_price` among armed buy-side stops —
    /// the first to fire as price rises.
    pub fn lowest_entry_price(&self) -> u64 {
        self.buy.keys().next().map(|(p, _)| *p).unwrap_or(0)
    }

    /// Remove an armed stop by id for a stop cancel. `true` if found.
    pub fn remove(&mut self, id: OrderId, side: Side, stop_price: u64) -> bool {
        let map = match side {
            Side::Buy => &mut self.buy,
            Side::Sell => &mut self.sell,
        };
        if let Some(key) = map
            .iter()
            .find(|(k, o)| k.0 == stop_price && o.id == id)
            .map(|(k, _)| *k)
        {
            map.remove(&key);
            true
        } else {
            false
        }
    }

    /// Pop every armed stop whose trigger is satisfied by `last_price`, in
    /// deterministic order: buy-side triggers then sell-side triggers, each
    /// ordered by `stop_price` then insertion order (the `BTreeMap`'s own
    /// iteration order, since the key is exactly `(stop_price, seq)`).
    pub fn activate(&mut self, last_price: u64) -> Vec<Order> {
        let mut activated = Vec::new();

        let buy_keys: Vec<StopKey> = self
            .buy
            .range(..=(last_price, u64::MAX))
            .map(|(k, _)| *k)
            .collect();
        for key in buy_keys {
            if let Some(order) = self.buy.remove(&key) {
                activated.push(order);
            }
        }

        let sell_keys: Vec<StopKey> = self
            .sell
            .range((last_price, 0)..)
            .map(|(k, _)| *k)
            .collect();
        for key in sell_keys {
            if let Some(order) = self.sell.remove(&key) {
                activated.push(order);
            }
        }

        activated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{EventType, OrderType, StopKind};

    fn stop_order(id: u64, side: Side, stop: StopKind, stop_price: u64) -> Order {
        Order {
            id,
            side,
            order_type: OrderType::Limit,
            stop: Some(stop),
            stop_price,
            price: 1,
            amount: 10,
            event_type: EventType::NewOrder,
            ..Order::default()
        }
    }

    #[test]
    fn buy_side_stop_activates_on_rise_regardless_of_label() {
        let mut table = StopTable::new();
        table.insert(stop_order(1, Side::Buy, StopKind::Loss, 113_000));
        assert_eq!(table.lowest_entry_price(), 113_000);
        assert!(table.activate(112_999).is_empty());
        let activated = table.activate(113_000);
        assert_eq!(activated.len(), 1);
        assert_eq!(activated[0].id, 1);
        assert_eq!(table.lowest_entry_price(), 0);
    }

    #[test]
    fn sell_side_stop_activates_on_fall() {
        let mut table = StopTable::new();
        table.insert(stop_order(2, Side::Sell, StopKind::Loss, 90_000));
        assert_eq!(table.highest_loss_price(), 90_000);
        assert!(table.activate(90_001).is_empty());
        let activated = table.activate(90_000);
        assert_eq!(activated.len(), 1);
        assert_eq!(activated[0].id, 2);
    }

    #[test]
    fn activation_order_is_price_then_insertion() {
        let mut table = StopTable::new();
        table.insert(stop_order(1, Side::Buy, StopKind::Entry, 100));
        table.insert(stop_order(2, Side::Buy, StopKind::Entry, 90));
        table.insert(stop_order(3, Side::Buy, StopKind::Entry, 90));
        let activated = table.activate(1_000);
        let ids: Vec<_> = activated.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn remove_by_id_updates_extremum() {
        let mut table = StopTable::new();
        table.insert(stop_order(1, Side::Sell, StopKind::Loss, 90_000));
        table.insert(stop_order(2, Side::Sell, StopKind::Loss, 80_000));
        assert_eq!(table.highest_loss_price(), 90_000);
        assert!(table.remove(1, Side::Sell, 90_000));
        assert_eq!(table.highest_loss_price(), 80_000);
        assert!(!table.remove(1, Side::Sell, 90_000));
    }
}
