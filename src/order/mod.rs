use std::fmt::Debug;

use chrono::{DateTime, Utc};

use crate::common::{Price, Quantity, Side};

pub mod plain;
pub use plain::*;

pub type OrderId = u128;

/// A resting limit order. Orders are immutable once placed; the book never
/// changes an order's price or quantity, it only adds or removes whole orders.
pub trait Order: Clone + Debug + Eq + PartialEq {
    fn id(&self) -> OrderId;
    fn side(&self) -> Side;
    fn price(&self) -> Price;
    fn quantity(&self) -> Quantity;
    fn created_at(&self) -> DateTime<Utc>;
}
