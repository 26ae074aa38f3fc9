use marketcore::prelude::*;

/// Quickly build a limit order for testing.
pub fn make_limit_order(id: OrderId, owner: OwnerId, side: Side, price: u64, amount: u64) -> Order {
    Order {
        id,
        owner_id: owner,
        side,
        order_type: OrderType::Limit,
        event_type: EventType::NewOrder,
        price,
        amount,
        ..Order::default()
    }
}

/// Quickly build a market order for testing.
pub fn make_market_order(id: OrderId, owner: OwnerId, side: Side, amount: u64, funds: u64) -> Order {
    Order {
        id,
        owner_id: owner,
        side,
        order_type: OrderType::Market,
        event_type: EventType::NewOrder,
        amount,
        funds,
        ..Order::default()
    }
}

/// Quickly build a stop order for testing.
pub fn make_stop_order(
    id: OrderId,
    owner: OwnerId,
    side: Side,
    stop: StopKind,
    stop_price: u64,
    price: u64,
    amount: u64,
    funds: u64,
) -> Order {
    Order {
        id,
        owner_id: owner,
        side,
        order_type: OrderType::Limit,
        event_type: EventType::NewOrder,
        stop: Some(stop),
        stop_price,
        price,
        amount,
        funds,
        ..Order::default()
    }
}

/// Quickly build a cancel command for a resting limit order.
pub fn cancel_limit(id: OrderId, side: Side, price: u64) -> Order {
    Order {
        id,
        side,
        order_type: OrderType::Limit,
        event_type: EventType::CancelOrder,
        price,
        ..Order::default()
    }
}

/// Quickly build a cancel command for a pending market order.
pub fn cancel_market(id: OrderId, side: Side) -> Order {
    Order {
        id,
        side,
        order_type: OrderType::Market,
        event_type: EventType::CancelOrder,
        ..Order::default()
    }
}

/// The ids and remaining amounts resting on one side of the book, in
/// ascending-price then FIFO order, for asserting on book contents after a
/// match.
pub fn book_state(book: &OrderBook, side: Side) -> Vec<(OrderId, u64)> {
    let levels: Vec<_> = match side {
        Side::Buy => book.buy_levels.levels_ascending().collect(),
        Side::Sell => book.sell_levels.levels_ascending().collect(),
    };
    levels
        .into_iter()
        .flat_map(|level| level.iter().map(|o| (o.id, o.unfilled_amount())))
        .collect()
}

pub fn trade_events(events: &EventBuffer) -> Vec<&TradeEvent> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::Trade(t) => Some(t),
            _ => None,
        })
        .collect()
}

pub fn status_events(events: &EventBuffer) -> Vec<&OrderStatusEvent> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::OrderStatus(s) => Some(s),
            _ => None,
        })
        .collect()
}
