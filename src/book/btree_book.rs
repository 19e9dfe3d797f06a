use std::fmt::Display;

use eq_float::F64;
use tracing::{debug, warn};

use crate::event::{Event, EventKind};
use crate::ladder::{PriceLadder, PriceLevel};
use crate::order::{OrderId, PlainOrder};
use crate::store::OrderStore;
use crate::{
    book::Book,
    common::{Price, Quantity, Side},
    order::Order,
};

use super::{BookError, BookId, MarketDepth};

/// Information about the market an order book represents
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Metadata {
    /// A unique identifier for the book
    pub id: BookId,
    /// The human-readable name of the market
    pub name: String,
    /// The abbreviated, human-readable identifier of the market
    pub ticker: String,
}

/// Limit order book holding resting orders only. Order detail lives in an
/// identity-indexed store while each side of the book is an ordered mapping
/// (using B-trees) from price to the aggregate quantity resting there.
///
/// Orders on opposite sides are never matched against each other, even when
/// their prices cross.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BTreeBook<T: Order> {
    /// Metadata for the market this book represents
    metadata: Metadata,
    /// Event log for this book (describes all mutations)
    events: Vec<Event<T>>,
    /// Every active order, keyed on identity
    orders: OrderStore<T>,
    /// Bid-side of the market
    bids: PriceLadder,
    /// Ask-side of the market
    asks: PriceLadder,
    /// Lower bound for the next system-assigned identity
    next_id: OrderId,
}

impl<T> Display for BTreeBook<T>
where
    T: Order,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut asks = self.asks.snapshot();
        asks.reverse();
        let bids = self.bids.snapshot();

        let col_width = 17;

        writeln!(f, "{:>17} | {:<17}", "BIDS", "ASKS")?;

        for ask in asks {
            writeln!(
                f,
                "{} | {:<8.2} {:<8}",
                " ".repeat(col_width),
                ask.0,
                ask.1
            )?;
        }

        for bid in bids {
            writeln!(f, "{:8.2} {:8} |", bid.0, bid.1)?;
        }

        Ok(())
    }
}

impl<T> BTreeBook<T>
where
    T: Order,
{
    pub fn new(id: BookId, name: String, ticker: String) -> Self {
        Self::meta(Metadata { id, name, ticker })
    }

    pub fn meta(metadata: Metadata) -> Self {
        Self {
            metadata,
            events: vec![],
            orders: OrderStore::new(),
            bids: PriceLadder::new(Side::Buy),
            asks: PriceLadder::new(Side::Sell),
            next_id: 1,
        }
    }

    pub fn events(&self) -> &[Event<T>] {
        &self.events
    }

    pub fn ladder(&self, side: Side) -> &PriceLadder {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }

    fn ladder_mut(&mut self, side: Side) -> &mut PriceLadder {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }

    /// Aggregate at `price` on the given side, if any order rests there
    pub fn level(&self, side: Side, price: Price) -> Option<PriceLevel> {
        self.ladder(side).level(price)
    }

    /// As [`Book::market_depth`], limited to the best `n` levels per side
    pub fn market_depth_n(&self, n: usize) -> MarketDepth {
        MarketDepth {
            bids: self.bids.snapshot_n(n),
            asks: self.asks.snapshot_n(n),
        }
    }

    /// Number of active orders
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterate over every active order in no particular order
    pub fn orders(&self) -> impl Iterator<Item = &T> {
        self.orders.iter()
    }

    /// Is an order with this identity currently active?
    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.contains(id)
    }

    /// Every active order on one side, best price first. Orders sharing a
    /// price are listed oldest first, then by identity.
    pub fn orders_on(&self, side: Side) -> Vec<&T> {
        let mut orders: Vec<&T> =
            self.orders.iter().filter(|x| x.side() == side).collect();

        orders.sort_by(|a, b| {
            let by_price = F64(a.price()).cmp(&F64(b.price()));
            match side {
                Side::Buy => by_price.reverse(),
                Side::Sell => by_price,
            }
            .then(a.created_at().cmp(&b.created_at()))
            .then(a.id().cmp(&b.id()))
        });
        orders
    }

    fn validate(price: Price, quantity: Quantity) -> Result<(), BookError> {
        if !price.is_finite() || price <= 0.0 {
            return Err(BookError::InvalidPrice(price));
        }

        if quantity == 0 {
            return Err(BookError::InvalidQuantity(quantity));
        }

        Ok(())
    }

    /// Smallest identity at or above the assignment cursor that is not
    /// currently active
    fn vacant_id(&self) -> Result<OrderId, BookError> {
        let mut id = self.next_id;
        while self.orders.contains(id) {
            id = id.checked_add(1).ok_or(BookError::IdentitiesExhausted)?;
        }
        Ok(id)
    }

    fn add_order(&mut self, order: T) -> Result<(), BookError> {
        Self::validate(order.price(), order.quantity())?;
        self.ladder(order.side())
            .check_add(order.price(), order.quantity())
            .map_err(|_| BookError::QuantityOverflow {
                price: order.price(),
                quantity: order.quantity(),
            })?;
        self.orders.put(order.clone())?;

        if let Err(e) = self
            .ladder_mut(order.side())
            .add_quantity(order.price(), order.quantity())
        {
            panic!(
                "book {} lost track of order {}: {e}",
                self.metadata.id,
                order.id()
            );
        }

        debug!(
            book = self.metadata.id,
            id = %order.id(),
            side = ?order.side(),
            price = order.price(),
            quantity = order.quantity(),
            "posted order"
        );
        self.events.push(Event::new(EventKind::Post(order)));
        Ok(())
    }

    fn remove_order(&mut self, order_id: OrderId) -> Result<T, BookError> {
        let order = self.orders.remove(order_id)?;

        if let Err(e) = self
            .ladder_mut(order.side())
            .remove_quantity(order.price(), order.quantity())
        {
            panic!(
                "book {} lost track of order {order_id}: {e}",
                self.metadata.id
            );
        }

        debug!(
            book = self.metadata.id,
            id = %order_id,
            side = ?order.side(),
            price = order.price(),
            quantity = order.quantity(),
            "cancelled order"
        );
        self.events.push(Event::new(EventKind::Cancel(order.clone())));
        Ok(order)
    }
}

impl BTreeBook<PlainOrder> {
    /// Place an order under a caller-supplied identity
    pub fn place_order(
        &mut self,
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), BookError> {
        self.place(PlainOrder::new(id, side, price, quantity))
    }

    /// Place an order under a system-assigned identity, returning it
    pub fn submit(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Result<OrderId, BookError> {
        let id = self.vacant_id()?;
        self.place(PlainOrder::new(id, side, price, quantity))?;
        self.next_id = id.saturating_add(1);
        Ok(id)
    }
}

impl<T> Book<T> for BTreeBook<T>
where
    T: Order,
{
    type Error = BookError;

    fn id(&self) -> BookId {
        self.metadata.id
    }

    fn name(&self) -> String {
        self.metadata.name.clone()
    }

    fn ticker(&self) -> String {
        self.metadata.ticker.clone()
    }

    fn order(&self, id: OrderId) -> Result<&T, BookError> {
        Ok(self.orders.get(id)?)
    }

    fn place(&mut self, order: T) -> Result<(), BookError> {
        let id = order.id();
        self.add_order(order).inspect_err(|e| {
            warn!(book = self.metadata.id, id = %id, error = %e, "rejected order")
        })
    }

    fn cancel(&mut self, order_id: OrderId) -> Result<T, BookError> {
        self.remove_order(order_id).inspect_err(|e| {
            warn!(book = self.metadata.id, id = %order_id, error = %e, "rejected cancel")
        })
    }

    fn market_depth(&self) -> MarketDepth {
        MarketDepth {
            bids: self.bids.snapshot(),
            asks: self.asks.snapshot(),
        }
    }

    fn volume(&self) -> (Quantity, Quantity) {
        (self.bids.volume(), self.asks.volume())
    }

    fn top(&self) -> (Option<Price>, Option<Price>) {
        (
            self.bids.best().map(|l| l.price),
            self.asks.best().map(|l| l.price),
        )
    }

    fn crossed(&self) -> bool {
        match self.top() {
            (Some(best_bid), Some(best_ask)) => best_bid >= best_ask,
            _ => false,
        }
    }
}
