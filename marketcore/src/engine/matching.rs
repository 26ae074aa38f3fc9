//! The matching core (component B): dispatches incoming commands, runs the
//! limit/market algorithms against the price-level index, drains pending
//! market orders, and activates stop orders as trades move `last_price`.
//!
//! Grounded in `DefaultMatchingEngine`'s `create_order`/`cancel_order`/
//! `match_orders` split and in `process_order_pair`'s maker/taker trade-pair
//! construction — the shape of "compute a fill, mutate both sides, emit a
//! trade" survives verbatim even though the walker-callback plumbing
//! underneath it is replaced by direct `BTreeMap` access.

use tracing::{debug, trace};

use super::book::OrderBook;
use super::events::{Event, EventBuffer, OrderActivationEvent, OrderStatusEvent, TradeEvent};
use super::fixed_point::{divide, multiply};
use super::types::{EventType, Order, OrderStatus, OrderType, Side};

/// One per-market matching engine. Owns its [`OrderBook`] exclusively — see
/// the crate root docs for the single-owner/no-locking contract.
#[derive(Debug, Clone)]
pub struct MatchingEngine {
    pub book: OrderBook,
}

impl MatchingEngine {
    pub fn new(market_id: impl Into<String>, price_precision: u32, volume_precision: u32) -> Self {
        MatchingEngine {
            book: OrderBook::new(market_id, price_precision, volume_precision),
        }
    }

    /// The sole hot-path entry point. Dispatches on `order.event_type` and
    /// appends every emitted event to `events`, including any cascading
    /// stop activations.
    pub fn process(&mut self, order: Order, events: &mut EventBuffer) {
        match order.event_type {
            EventType::CancelOrder => self.cancel(order, events),
            EventType::NewOrder => {
                self.accept(order, events);
                self.activate_due_stops(events);
            }
        }
        self.debug_check_invariants();
    }

    /// Cheap sanity checks for invariants that must hold after every
    /// command: no crossed book, no empty price level left behind. A
    /// violation here is an internal programming defect, not a user-input
    /// error, so it panics rather than returning a `Result` — compiled out
    /// of release builds the same way an `unreachable!`-guarded lifecycle
    /// transition would be.
    #[cfg(debug_assertions)]
    fn debug_check_invariants(&self) {
        if self.book.highest_bid != 0 && self.book.lowest_ask != 0 {
            debug_assert!(
                self.book.highest_bid < self.book.lowest_ask,
                "locked/crossed book: bid {} >= ask {}",
                self.book.highest_bid,
                self.book.lowest_ask
            );
        }
        for level in self.book.buy_levels.levels_ascending() {
            debug_assert!(!level.is_empty(), "empty price level left in buy_levels");
        }
        for level in self.book.sell_levels.levels_ascending() {
            debug_assert!(!level.is_empty(), "empty price level left in sell_levels");
        }
    }

    #[cfg(not(debug_assertions))]
    fn debug_check_invariants(&self) {}

    /// Equivalent to `process` for a command already known to be a cancel.
    pub fn cancel(&mut self, order: Order, events: &mut EventBuffer) {
        if order.stop.is_some() {
            let removed = self
                .book
                .stop_orders
                .remove(order.id, order.side, order.stop_price);
            trace!(order_id = order.id, removed, "stop cancel");
            return;
        }
        match order.order_type {
            OrderType::Limit => self.cancel_limit(order, events),
            OrderType::Market => {
                let removed = self.book.pending_mut(order.side).remove(order.id);
                trace!(order_id = order.id, removed, "market cancel");
            }
        }
    }

    fn cancel_limit(&mut self, order: Order, events: &mut EventBuffer) {
        let Some(level) = self.book.side_mut(order.side).level_mut(order.price) else {
            return;
        };
        let Some(mut removed) = level.remove(order.id) else {
            return;
        };
        self.book.side_mut(order.side).remove_if_empty(order.price);
        self.book.recompute_best(order.side);
        removed.status = OrderStatus::Cancelled;
        self.emit_status(&removed, events);
    }

    fn accept(&mut self, order: Order, events: &mut EventBuffer) {
        if order.stop.is_some() {
            debug!(
                order_id = order.id,
                stop_price = order.stop_price,
                "arming stop order"
            );
            self.book.stop_orders.insert(order);
            return;
        }
        match order.order_type {
            OrderType::Limit => self.match_limit(order, events),
            OrderType::Market => self.accept_market(order, events),
        }
    }

    /// Match a limit order against the opposite side up to its own price,
    /// rest any residual, then drain the opposite-type pending-market queue
    /// against the newly available liquidity.
    fn match_limit(&mut self, mut taker: Order, events: &mut EventBuffer) {
        taker.status = OrderStatus::Pending;
        self.emit_status(&taker, events);

        let opposite = taker.side.opposite();
        if self.crosses(taker.side, taker.price) {
            self.sweep(&mut taker, Some(taker.price), false, events);
        }

        if taker.is_filled() {
            taker.status = OrderStatus::Filled;
            self.emit_status(&taker, events);
        } else {
            taker.status = if taker.filled_amount > 0 {
                OrderStatus::PartiallyFilled
            } else {
                OrderStatus::Untouched
            };
            let price = taker.price;
            let side = taker.side;
            self.book.insert_resting(side, price, taker.clone());
            self.emit_status(&taker, events);
        }

        self.drain_pending(opposite, events);
    }

    /// A market order either joins the same-side pending queue (if it is
    /// already non-empty, preserving FIFO) or is matched immediately. The
    /// queue only ever holds orders that joined this way — an order that
    /// arrives with nothing ahead of it either fills against the book or is
    /// cancelled in [`Self::match_market`], never parked, so in practice the
    /// first entry a queue ever carries comes from a restored snapshot
    /// rather than from a live command.
    fn accept_market(&mut self, order: Order, events: &mut EventBuffer) {
        if !self.book.pending(order.side).is_empty() {
            self.book.pending_mut(order.side).push_back(order);
            return;
        }
        self.match_market(order, events);
    }

    /// A market order arriving directly (not via the pending queue). If
    /// there is no opposing liquidity at all it cancels outright; otherwise
    /// it sweeps what it can and cancels any unfillable residual — a market
    /// order has no price to rest at, so once liquidity runs out there is
    /// nowhere left for it to wait.
    fn match_market(&mut self, mut taker: Order, events: &mut EventBuffer) {
        if !self.book.has_liquidity(taker.side.opposite()) {
            taker.status = OrderStatus::Cancelled;
            self.emit_status(&taker, events);
            return;
        }

        let use_funds_cap = taker.side == Side::Buy;
        self.sweep(&mut taker, None, use_funds_cap, events);

        taker.status = if taker.is_filled() {
            OrderStatus::Filled
        } else {
            OrderStatus::Cancelled
        };
        self.emit_status(&taker, events);
    }

    /// Re-attempt a market order popped from a pending queue. Unlike
    /// [`Self::match_market`], a residual is not cancelled — it is handed
    /// back to the caller to requeue at the front.
    fn retry_pending(&mut self, mut order: Order, events: &mut EventBuffer) -> Result<(), Order> {
        let use_funds_cap = order.side == Side::Buy;
        self.sweep(&mut order, None, use_funds_cap, events);
        if order.is_filled() {
            order.status = OrderStatus::Filled;
            self.emit_status(&order, events);
            Ok(())
        } else {
            Err(order)
        }
    }

    /// Drain `queue_side`'s pending-market queue against whatever liquidity
    /// now exists on its opposite. Stops the moment the head can't fully
    /// fill — if the head (full time priority) can't clear, nothing behind
    /// it can either.
    fn drain_pending(&mut self, queue_side: Side, events: &mut EventBuffer) {
        loop {
            if !self.book.has_liquidity(queue_side.opposite()) {
                break;
            }
            if self.book.pending(queue_side).is_empty() {
                break;
            }
            let order = self.book.pending_mut(queue_side).pop_front().unwrap();
            match self.retry_pending(order, events) {
                Ok(()) => continue,
                Err(residual) => {
                    self.book.pending_mut(queue_side).push_front(residual);
                    break;
                }
            }
        }
    }

    fn crosses(&self, taker_side: Side, limit_price: u64) -> bool {
        let opposite_best = self.book.best_price(taker_side.opposite());
        if opposite_best == 0 {
            return false;
        }
        match taker_side {
            Side::Buy => opposite_best <= limit_price,
            Side::Sell => opposite_best >= limit_price,
        }
    }

    /// The shared fill loop: consumes resting liquidity on the opposite
    /// side of `taker`, honoring an optional price bound (`None` for market
    /// orders) and an optional funds cap (market buys only). Emits a
    /// `TradeEvent` and a maker `OrderStatusEvent` per fill. Does not emit
    /// any event for `taker` itself — the caller emits exactly one terminal
    /// status event once the sweep finishes.
    fn sweep(
        &mut self,
        taker: &mut Order,
        price_bound: Option<u64>,
        use_funds_cap: bool,
        events: &mut EventBuffer,
    ) {
        let opposite = taker.side.opposite();
        let price_precision = self.book.price_precision;
        let volume_precision = self.book.volume_precision;

        'levels: loop {
            if taker.unfilled_amount() == 0 || (use_funds_cap && taker.unused_funds() == 0) {
                break;
            }
            let level_price = self.book.best_price(opposite);
            if level_price == 0 {
                break;
            }
            if let Some(bound) = price_bound {
                let crosses = match taker.side {
                    Side::Buy => level_price <= bound,
                    Side::Sell => level_price >= bound,
                };
                if !crosses {
                    break;
                }
            }

            let mut affordable = if use_funds_cap {
                Some(divide(
                    taker.unused_funds(),
                    level_price,
                    price_precision,
                    price_precision,
                    volume_precision,
                ))
            } else {
                None
            };

            loop {
                if taker.unfilled_amount() == 0 {
                    break 'levels;
                }
                if use_funds_cap && taker.unused_funds() == 0 {
                    break 'levels;
                }
                if matches!(affordable, Some(0)) {
                    break;
                }

                let maker_info = self
                    .book
                    .side(opposite)
                    .level(level_price)
                    .and_then(|level| level.front())
                    .map(|maker| (maker.id, maker.owner_id, maker.unfilled_amount()));
                let Some((maker_id, maker_owner, maker_unfilled)) = maker_info else {
                    break;
                };

                let mut fill = taker.unfilled_amount().min(maker_unfilled);
                if let Some(a) = affordable {
                    fill = fill.min(a);
                }
                if fill == 0 {
                    break;
                }

                let cost = multiply(fill, level_price, volume_precision, price_precision, price_precision);

                let (maker_snapshot, maker_removed, level_empty) = {
                    let level = self
                        .book
                        .side_mut(opposite)
                        .level_mut(level_price)
                        .expect("level exists while its price is the cached best");
                    let (snapshot, removed) = level.fill_front(fill, cost);
                    (snapshot, removed, level.is_empty())
                };

                taker.filled_amount += fill;
                if use_funds_cap {
                    taker.used_funds += cost;
                }
                if let Some(a) = &mut affordable {
                    *a -= fill;
                }

                let trade_seq = self.book.next_trade_seq();
                let seq = self.book.next_event_seq();
                events.push(Event::Trade(TradeEvent {
                    seq,
                    market_id: self.book.market_id.clone(),
                    trade_seq,
                    taker_side: taker.side,
                    maker_order_id: maker_id,
                    taker_order_id: taker.id,
                    maker_owner,
                    taker_owner: taker.owner_id,
                    amount: fill,
                    price: level_price,
                }));
                self.book.last_price = level_price;
                self.emit_status(&maker_snapshot, events);

                if level_empty {
                    self.book.side_mut(opposite).remove_if_empty(level_price);
                    self.book.recompute_best(opposite);
                    continue 'levels;
                }
                if maker_removed {
                    continue;
                }
                // A partial maker fill only happens when the taker was the
                // limiting factor, so the taker must now be exhausted.
                break 'levels;
            }
            self.book.recompute_best(opposite);
        }
        self.book.recompute_best(opposite);
    }

    /// Pop every armed stop whose trigger `last_price` satisfies, reprocess
    /// each as its underlying Limit/Market order, and loop — reprocessing
    /// may itself trade and move `last_price`, triggering further stops,
    /// until a fixpoint is reached.
    fn activate_due_stops(&mut self, events: &mut EventBuffer) {
        loop {
            let due = self.book.stop_orders.activate(self.book.last_price);
            if due.is_empty() {
                break;
            }
            for mut stop_order in due {
                let stop_kind = stop_order.stop.take().expect("activated order was armed");
                let seq = self.book.next_event_seq();
                events.push(Event::Activation(OrderActivationEvent {
                    seq,
                    market_id: self.book.market_id.clone(),
                    order_id: stop_order.id,
                    price: stop_order.price,
                    amount: stop_order.amount,
                    side: stop_order.side,
                    stop_price: stop_order.stop_price,
                    stop_kind,
                }));
                self.accept(stop_order, events);
            }
        }
    }

    fn emit_status(&mut self, order: &Order, events: &mut EventBuffer) {
        let seq = self.book.next_event_seq();
        events.push(Event::OrderStatus(OrderStatusEvent {
            seq,
            market_id: self.book.market_id.clone(),
            order_id: order.id,
            status: order.status,
            filled_amount: order.filled_amount,
            used_funds: order.used_funds,
            price: order.price,
            amount: order.amount,
        }));
    }
}
