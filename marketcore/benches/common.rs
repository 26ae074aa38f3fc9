use marketcore::prelude::*;

/// Quickly generate a simple limit order for benchmarking.
pub fn make_limit_order(id: u64, side: Side, price: u64, amount: u64) -> Order {
    Order {
        id,
        owner_id: 1,
        side,
        order_type: OrderType::Limit,
        event_type: EventType::NewOrder,
        price,
        amount,
        ..Order::default()
    }
}

/// Quickly generate a market order for benchmarking.
pub fn make_market_order(id: u64, side: Side, amount: u64, funds: u64) -> Order {
    Order {
        id,
        owner_id: 1,
        side,
        order_type: OrderType::Market,
        event_type: EventType::NewOrder,
        amount,
        funds,
        ..Order::default()
    }
}
