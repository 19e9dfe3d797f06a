//! In-memory limit order book for a single instrument.
//!
//! The book keeps two views of the resting orders in step with one another: an
//! identity-indexed [`store::OrderStore`] holding every order's detail, and a
//! pair of [`ladder::PriceLadder`]s (one per side) holding the aggregate
//! quantity at each price. See [`book::btree_book::BTreeBook`] for the entry
//! point.
//!
//! ```
//! use depthbook::{
//!     book::{btree_book::BTreeBook, Book},
//!     common::Side,
//!     order::PlainOrder,
//! };
//!
//! let mut book: BTreeBook<PlainOrder> =
//!     BTreeBook::new(1, "Example".to_string(), "EXM".to_string());
//! book.place_order(1, Side::Buy, 100.0, 10).unwrap();
//! book.place_order(2, Side::Buy, 100.0, 5).unwrap();
//! assert_eq!(book.market_depth().bids, vec![(100.0, 15)]);
//! ```
pub mod book;
pub mod common;
pub mod event;
pub mod ladder;
pub mod order;
pub mod store;
