use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::Order;

/// A successful mutation of the book
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum EventKind<T: Order> {
    Post(T),
    Cancel(T),
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Event<T: Order> {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind<T>,
}

impl<T> Event<T>
where
    T: Order,
{
    pub fn new(kind: EventKind<T>) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
        }
    }
}
