pub mod btree_book;
pub mod shared;

use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    common::{Price, Quantity, Side},
    order::{Order, OrderId},
    store::StoreError,
};

pub type BookId = u64;

#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum BookError {
    #[error("price must be a finite, strictly positive number (got {0})")]
    InvalidPrice(Price),
    #[error("quantity must be strictly positive (got {0})")]
    InvalidQuantity(Quantity),
    #[error("order {0} is already active")]
    DuplicateIdentity(OrderId),
    #[error("order {0} not found")]
    OrderNotFound(OrderId),
    #[error("resting quantity at {price} cannot absorb another {quantity}")]
    QuantityOverflow { price: Price, quantity: Quantity },
    #[error("no order identities left to assign")]
    IdentitiesExhausted,
}

impl From<StoreError> for BookError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateIdentity(id) => Self::DuplicateIdentity(id),
            StoreError::NotFound(id) => Self::OrderNotFound(id),
        }
    }
}

/// Aggregated depth of both sides of the book, best price first on each
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct MarketDepth {
    /// Bid levels in strictly descending price order
    pub bids: Vec<(Price, Quantity)>,
    /// Ask levels in strictly ascending price order
    pub asks: Vec<(Price, Quantity)>,
}

impl MarketDepth {
    pub fn side(&self, side: Side) -> &[(Price, Quantity)] {
        match side {
            Side::Buy => &self.bids,
            Side::Sell => &self.asks,
        }
    }
}

pub trait Book<T: Order>: Clone + Debug {
    type Error;

    fn id(&self) -> BookId;
    fn name(&self) -> String;
    fn ticker(&self) -> String;
    fn order(&self, id: OrderId) -> Result<&T, Self::Error>;
    fn place(&mut self, order: T) -> Result<(), Self::Error>;
    fn cancel(&mut self, order_id: OrderId) -> Result<T, Self::Error>;
    fn market_depth(&self) -> MarketDepth;
    fn volume(&self) -> (Quantity, Quantity);
    fn top(&self) -> (Option<Price>, Option<Price>);
    fn crossed(&self) -> bool;
}
