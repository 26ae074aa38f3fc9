mod common;

use crate::common::*;
use marketcore::prelude::*;

#[test]
fn test_market_order_full_fill() {
    let mut engine = MatchingEngine::new("btcusd", 8, 8);
    let mut events = EventBuffer::new();

    engine.process(make_limit_order(1, 1, Side::Sell, 100, 10), &mut events);
    events.clear();
    engine.process(make_market_order(2, 2, Side::Buy, 10, 10_000), &mut events);

    assert!(book_state(&engine.book, Side::Sell).is_empty());
    let last = status_events(&events).into_iter().last().unwrap();
    assert_eq!(last.status, OrderStatus::Filled);
}

#[test]
fn test_market_order_partial_fill_cancels_residual() {
    let mut engine = MatchingEngine::new("btcusd", 8, 8);
    let mut events = EventBuffer::new();

    engine.process(make_limit_order(1, 1, Side::Sell, 100, 5), &mut events);
    events.clear();
    engine.process(make_market_order(2, 2, Side::Buy, 10, 10_000), &mut events);

    // sell side fully consumed, taker residual cancelled rather than parked
    assert!(book_state(&engine.book, Side::Sell).is_empty());
    assert!(engine.book.buy_market_pending.is_empty());
    let last = status_events(&events).into_iter().last().unwrap();
    assert_eq!(last.status, OrderStatus::Cancelled);
    assert_eq!(last.filled_amount, 5);
}

/// A market buy on an empty book has no price to rest at, so it is
/// cancelled outright rather than parked.
#[test]
fn scenario_market_buy_on_empty_book() {
    let mut engine = MatchingEngine::new("btcusd", 8, 8);
    let mut events = EventBuffer::new();

    engine.process(make_market_order(7, 7, Side::Buy, 1, 100), &mut events);

    assert_eq!(events.len(), 1);
    assert_eq!(status_events(&events)[0].status, OrderStatus::Cancelled);
    assert!(trade_events(&events).is_empty());
    assert!(book_state(&engine.book, Side::Buy).is_empty());
    assert!(book_state(&engine.book, Side::Sell).is_empty());
}

/// A market sell on an empty book is cancelled, not parked, so a later
/// opposing limit rests cleanly instead of being swept against it.
#[test]
fn scenario_market_sell_not_parked() {
    let mut engine = MatchingEngine::new("btcusd", 8, 8);
    let mut events = EventBuffer::new();

    engine.process(make_market_order(100, 100, Side::Sell, 10, 0), &mut events);
    assert!(engine.book.sell_market_pending.is_empty());

    events.clear();
    engine.process(make_limit_order(101, 101, Side::Buy, 100, 5), &mut events);
    assert_eq!(engine.book.highest_bid, 100);
}

#[test]
fn market_buy_funds_cap_limits_fill() {
    // zero-precision market so multiply/divide reduce to plain integer
    // arithmetic, making the funds cap easy to reason about exactly.
    let mut engine = MatchingEngine::new("testpair", 0, 0);
    let mut events = EventBuffer::new();

    // one unit costs 100 quote units at this level
    engine.process(make_limit_order(1, 1, Side::Sell, 100, 1_000), &mut events);
    events.clear();

    // only enough funds for 5 units even though amount asks for 10
    engine.process(make_market_order(2, 2, Side::Buy, 10, 500), &mut events);

    let remaining = book_state(&engine.book, Side::Sell);
    assert_eq!(remaining, vec![(1, 995)]);
    let last = status_events(&events).into_iter().last().unwrap();
    assert_eq!(last.status, OrderStatus::Cancelled);
    assert_eq!(last.filled_amount, 5);
}

// A market order only ever joins `*_market_pending` by arriving while that
// side's queue is already non-empty — on a live book, an order with no
// opposing liquidity at all is cancelled outright (see
// `scenario_market_buy_on_empty_book`/`scenario_market_sell_not_parked`
// above), so the first entry a queue ever holds comes from a restored
// snapshot, not from `process()`. These tests seed the queue directly the
// same way a restore would, to exercise draining independently of how the
// queue got populated.

#[test]
fn pending_market_order_drains_fifo_on_new_liquidity() {
    let mut engine = MatchingEngine::new("btcusd", 8, 8);
    let mut events = EventBuffer::new();

    engine
        .book
        .pending_mut(Side::Buy)
        .push_back(make_market_order(1, 1, Side::Buy, 5, 10_000));
    engine
        .book
        .pending_mut(Side::Buy)
        .push_back(make_market_order(2, 2, Side::Buy, 5, 10_000));
    assert_eq!(engine.book.buy_market_pending.len(), 2);

    // a resting sell limit arrives — draining should satisfy id=1 then id=2
    engine.process(make_limit_order(3, 3, Side::Sell, 100, 10), &mut events);

    assert!(engine.book.buy_market_pending.is_empty());
    let trades = trade_events(&events);
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].taker_order_id, 1);
    assert_eq!(trades[1].taker_order_id, 2);
}

#[test]
fn pending_drain_stops_when_head_cannot_fully_fill() {
    let mut engine = MatchingEngine::new("btcusd", 8, 8);
    let mut events = EventBuffer::new();

    engine
        .book
        .pending_mut(Side::Buy)
        .push_back(make_market_order(1, 1, Side::Buy, 10, 10_000));
    engine
        .book
        .pending_mut(Side::Buy)
        .push_back(make_market_order(2, 2, Side::Buy, 5, 10_000));

    // only 4 units of liquidity — not enough for the queue head (10)
    engine.process(make_limit_order(3, 3, Side::Sell, 100, 4), &mut events);

    // head stays parked at the front, tail order never gets a chance
    assert_eq!(engine.book.buy_market_pending.len(), 2);
    assert_eq!(engine.book.buy_market_pending.iter().next().unwrap().id, 1);
}
