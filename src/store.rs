use std::collections::hash_map::{Entry, HashMap};

use thiserror::Error;

use crate::order::{Order, OrderId};

#[derive(Clone, Copy, Debug, Error, Eq, PartialEq)]
pub enum StoreError {
    #[error("order {0} is already active")]
    DuplicateIdentity(OrderId),
    #[error("order {0} not found")]
    NotFound(OrderId),
}

/// Canonical, identity-indexed storage for every active order
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OrderStore<T: Order> {
    orders: HashMap<OrderId, T>,
}

impl<T> Default for OrderStore<T>
where
    T: Order,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> OrderStore<T>
where
    T: Order,
{
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
        }
    }

    /// Insert a new order. The store is left untouched if the identity is
    /// already active.
    pub fn put(&mut self, order: T) -> Result<(), StoreError> {
        match self.orders.entry(order.id()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateIdentity(order.id())),
            Entry::Vacant(slot) => {
                slot.insert(order);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: OrderId) -> Result<&T, StoreError> {
        self.orders.get(&id).ok_or(StoreError::NotFound(id))
    }

    pub fn remove(&mut self, id: OrderId) -> Result<T, StoreError> {
        self.orders.remove(&id).ok_or(StoreError::NotFound(id))
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Iterate over active orders in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.orders.values()
    }
}
