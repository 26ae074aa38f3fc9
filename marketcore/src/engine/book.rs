//! Price-level index (component A): two ordered maps from price to a
//! time-ordered FIFO of resting orders, plus the market-wide state the
//! matching core mutates alongside them — pending-market queues, the armed
//! stop-order table, sequence counters, and the cached best-price pointers.
//!
//! Grounded in `DefaultOrderBook`'s two-skip-list-plus-cache shape: the
//! teacher keeps a buy side and a sell side, each ordered by a composite
//! `(price, priority)` key, with best-price access cached. Here the ordered
//! container is a `BTreeMap<u64, PriceLevel>` per side — any ordered
//! associative container with O(log n) insert/delete would do — and a
//! level's FIFO is an owned `VecDeque<Order>` rather than interior pointers
//! into a shared skip list — no back-references escape a level.

use std::collections::{BTreeMap, VecDeque};

use super::pending::PendingQueue;
use super::stops::StopTable;
use super::types::{Order, OrderId, OrderStatus, Side};

/// All resting orders at one price, ordered purely by arrival (time
/// priority). Invariant: every order in the deque shares `price`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PriceLevel {
    pub price: u64,
    orders: VecDeque<Order>,
}

impl PriceLevel {
    pub fn new(price: u64) -> Self {
        PriceLevel {
            price,
            orders: VecDeque::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn push_back(&mut self, order: Order) {
        self.orders.push_back(order);
    }

    pub fn front(&self) -> Option<&Order> {
        self.orders.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Apply a fill to the order resting at the front of the level. Returns
    /// a snapshot of the order's post-fill state and whether it was fully
    /// filled (and therefore popped).
    pub fn fill_front(&mut self, fill_amount: u64, cost: u64) -> (Order, bool) {
        let maker = self
            .orders
            .front_mut()
            .expect("fill_front called on an empty level");
        maker.filled_amount += fill_amount;
        maker.used_funds += cost;
        let filled = maker.is_filled();
        maker.status = if filled {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
        let snapshot = maker.clone();
        if filled {
            self.orders.pop_front();
        }
        (snapshot, filled)
    }

    /// Remove a resting order by id for a limit cancel. `None` if absent.
    pub fn remove(&mut self, id: OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id == id)?;
        self.orders.remove(pos)
    }
}

/// One side (buy or sell) of the price-level index.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BookSide {
    levels: BTreeMap<u64, PriceLevel>,
}

impl BookSide {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn lowest_price(&self) -> u64 {
        self.levels.keys().next().copied().unwrap_or(0)
    }

    pub fn highest_price(&self) -> u64 {
        self.levels.keys().next_back().copied().unwrap_or(0)
    }

    pub fn level(&self, price: u64) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn level_mut(&mut self, price: u64) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    pub fn entry(&mut self, price: u64) -> &mut PriceLevel {
        self.levels.entry(price).or_insert_with(|| PriceLevel::new(price))
    }

    pub fn remove_if_empty(&mut self, price: u64) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    pub fn levels_ascending(&self) -> impl Iterator<Item = &PriceLevel> {
        self.levels.values()
    }

    pub fn levels_descending(&self) -> impl Iterator<Item = &PriceLevel> {
        self.levels.values().rev()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }
}

/// Full per-market state: both price-level indexes, both pending-market
/// queues, the armed stop table, sequence counters, and the cached best
/// bid/ask. One instance is owned exclusively by one market's
/// [`super::matching::MatchingEngine`].
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrderBook {
    pub market_id: String,
    pub price_precision: u32,
    pub volume_precision: u32,
    pub buy_levels: BookSide,
    pub sell_levels: BookSide,
    pub highest_bid: u64,
    pub lowest_ask: u64,
    pub buy_market_pending: PendingQueue,
    pub sell_market_pending: PendingQueue,
    pub stop_orders: StopTable,
    pub last_event_seq_id: u64,
    pub last_trade_seq_id: u64,
    pub last_price: u64,
}

impl OrderBook {
    pub fn new(market_id: impl Into<String>, price_precision: u32, volume_precision: u32) -> Self {
        OrderBook {
            market_id: market_id.into(),
            price_precision,
            volume_precision,
            buy_levels: BookSide::default(),
            sell_levels: BookSide::default(),
            highest_bid: 0,
            lowest_ask: 0,
            buy_market_pending: PendingQueue::new(),
            sell_market_pending: PendingQueue::new(),
            stop_orders: StopTable::new(),
            last_event_seq_id: 0,
            last_trade_seq_id: 0,
            last_price: 0,
        }
    }

    pub fn side(&self, side: Side) -> &BookSide {
        match side {
            Side::Buy => &self.buy_levels,
            Side::Sell => &self.sell_levels,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Buy => &mut self.buy_levels,
            Side::Sell => &mut self.sell_levels,
        }
    }

    /// The best resting price on `side`, or 0 if that side is empty —
    /// highest for buys, lowest for sells (I1 in the invariant list).
    pub fn best_price(&self, side: Side) -> u64 {
        match side {
            Side::Buy => self.highest_bid,
            Side::Sell => self.lowest_ask,
        }
    }

    pub fn has_liquidity(&self, side: Side) -> bool {
        self.best_price(side) != 0
    }

    /// Recompute the cached best price for `side` from the index itself.
    /// Called whenever a level may have been emptied or a new best
    /// inserted — keeps invariant I1 true after every mutation.
    pub fn recompute_best(&mut self, side: Side) {
        let best = match side {
            Side::Buy => self.buy_levels.highest_price(),
            Side::Sell => self.sell_levels.lowest_price(),
        };
        match side {
            Side::Buy => self.highest_bid = best,
            Side::Sell => self.lowest_ask = best,
        }
    }

    pub fn insert_resting(&mut self, side: Side, price: u64, order: Order) {
        self.side_mut(side).entry(price).push_back(order);
        match side {
            Side::Buy => {
                if price > self.highest_bid {
                    self.highest_bid = price;
                }
            }
            Side::Sell => {
                if self.lowest_ask == 0 || price < self.lowest_ask {
                    self.lowest_ask = price;
                }
            }
        }
    }

    pub fn pending(&self, side: Side) -> &PendingQueue {
        match side {
            Side::Buy => &self.buy_market_pending,
            Side::Sell => &self.sell_market_pending,
        }
    }

    pub fn pending_mut(&mut self, side: Side) -> &mut PendingQueue {
        match side {
            Side::Buy => &mut self.buy_market_pending,
            Side::Sell => &mut self.sell_market_pending,
        }
    }

    pub fn next_event_seq(&mut self) -> u64 {
        self.last_event_seq_id += 1;
        self.last_event_seq_id
    }

    pub fn next_trade_seq(&mut self) -> u64 {
        self.last_trade_seq_id += 1;
        self.last_trade_seq_id
    }
}
