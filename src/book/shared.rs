use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    common::{Price, Quantity},
    order::{Order, OrderId},
};

use super::{btree_book::BTreeBook, Book, BookError, MarketDepth};

/// Cloneable handle to a single book shared between threads
///
/// The whole book sits behind one reader-writer lock: placing and cancelling
/// take it exclusively, so a reader never sees an order in the store without
/// its quantity on the ladder (or vice versa). Queries may run concurrently
/// with one another.
#[derive(Clone, Debug)]
pub struct SharedBook<T: Order> {
    inner: Arc<RwLock<BTreeBook<T>>>,
}

impl<T> From<BTreeBook<T>> for SharedBook<T>
where
    T: Order,
{
    fn from(book: BTreeBook<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(book)),
        }
    }
}

impl<T> SharedBook<T>
where
    T: Order,
{
    pub fn place(&self, order: T) -> Result<(), BookError> {
        self.inner.write().place(order)
    }

    pub fn cancel(&self, order_id: OrderId) -> Result<T, BookError> {
        self.inner.write().cancel(order_id)
    }

    /// Copy of the order's detail as of the time of the call
    pub fn order(&self, id: OrderId) -> Result<T, BookError> {
        self.inner.read().order(id).cloned()
    }

    pub fn market_depth(&self) -> MarketDepth {
        self.inner.read().market_depth()
    }

    pub fn volume(&self) -> (Quantity, Quantity) {
        self.inner.read().volume()
    }

    pub fn top(&self) -> (Option<Price>, Option<Price>) {
        self.inner.read().top()
    }

    /// Run `f` against the book while holding the read lock
    pub fn with<R>(&self, f: impl FnOnce(&BTreeBook<T>) -> R) -> R {
        f(&self.inner.read())
    }
}
