use std::collections::BTreeMap;

use eq_float::F64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::{Price, Quantity, Side};

/// Failures of ladder mutations. Apart from `QuantityOverflow`, these can only
/// arise when the caller removes quantity it never added, so they indicate a
/// bug in the owning book.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum LadderError {
    #[error("adding {added} at {price} would overflow the resting quantity")]
    QuantityOverflow { price: Price, added: Quantity },
    #[error("no level at price {0}")]
    MissingLevel(Price),
    #[error(
        "cannot remove {requested} from level at {price} holding {resting}"
    )]
    QuantityUnderflow {
        price: Price,
        resting: Quantity,
        requested: Quantity,
    },
    #[error("last order at {price} leaves {residual} unaccounted for")]
    ResidualQuantity { price: Price, residual: Quantity },
}

/// Aggregate view of a single price on one side of the book
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct PriceLevel {
    pub price: Price,
    /// Sum of the quantities of every order resting at this price
    pub quantity: Quantity,
    /// Number of orders contributing to `quantity`
    pub orders: usize,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct Aggregate {
    quantity: Quantity,
    orders: usize,
}

/// One side of the book, as an ordered mapping (using a B-tree) from price to
/// the aggregate resting there
///
/// Levels are iterated in priority order for the side: descending for
/// [`Side::Buy`] (best bid first) and ascending for [`Side::Sell`] (best ask
/// first).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceLadder {
    side: Side,
    levels: BTreeMap<F64, Aggregate>,
    /// Total quantity across all levels
    volume: Quantity,
}

impl PriceLadder {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
            volume: 0,
        }
    }

    /// Would adding `quantity` at `price` keep both the level aggregate and
    /// the side's volume representable?
    pub fn check_add(
        &self,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), LadderError> {
        let resting = self.levels.get(&F64(price)).map_or(0, |l| l.quantity);

        match (
            resting.checked_add(quantity),
            self.volume.checked_add(quantity),
        ) {
            (Some(_), Some(_)) => Ok(()),
            _ => Err(LadderError::QuantityOverflow {
                price,
                added: quantity,
            }),
        }
    }

    /// Add one contributing order of `quantity` at `price`, opening the level
    /// if it does not exist yet. On error the ladder is left unchanged.
    pub fn add_quantity(
        &mut self,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), LadderError> {
        self.check_add(price, quantity)?;

        let level = self.levels.entry(F64(price)).or_default();
        level.quantity += quantity;
        level.orders += 1;
        self.volume += quantity;
        Ok(())
    }

    /// Withdraw one contributing order of `quantity` at `price`, closing the
    /// level once its last contributor is gone. On error the ladder is left
    /// unchanged.
    pub fn remove_quantity(
        &mut self,
        price: Price,
        quantity: Quantity,
    ) -> Result<(), LadderError> {
        let key = F64(price);
        let level = self
            .levels
            .get_mut(&key)
            .ok_or(LadderError::MissingLevel(price))?;

        if quantity > level.quantity {
            return Err(LadderError::QuantityUnderflow {
                price,
                resting: level.quantity,
                requested: quantity,
            });
        }

        if level.orders == 1 && level.quantity != quantity {
            return Err(LadderError::ResidualQuantity {
                price,
                residual: level.quantity - quantity,
            });
        }

        level.quantity -= quantity;
        level.orders -= 1;

        if level.orders == 0 {
            self.levels.remove(&key);
        }

        self.volume -= quantity;
        Ok(())
    }

    pub fn level(&self, price: Price) -> Option<PriceLevel> {
        self.levels.get(&F64(price)).map(|agg| PriceLevel {
            price,
            quantity: agg.quantity,
            orders: agg.orders,
        })
    }

    pub fn best(&self) -> Option<PriceLevel> {
        self.levels().next()
    }

    /// Iterate over every level, best price first
    pub fn levels(&self) -> Box<dyn Iterator<Item = PriceLevel> + '_> {
        let iter = self.levels.iter().map(|(price, agg)| PriceLevel {
            price: price.0,
            quantity: agg.quantity,
            orders: agg.orders,
        });

        match self.side {
            Side::Buy => Box::new(iter.rev()),
            Side::Sell => Box::new(iter),
        }
    }

    /// Materialise the full depth of this side as `(price, quantity)` pairs,
    /// best price first
    pub fn snapshot(&self) -> Vec<(Price, Quantity)> {
        self.levels().map(|l| (l.price, l.quantity)).collect()
    }

    /// As [`PriceLadder::snapshot`], truncated to the best `n` levels
    pub fn snapshot_n(&self, n: usize) -> Vec<(Price, Quantity)> {
        self.levels().take(n).map(|l| (l.price, l.quantity)).collect()
    }

    pub fn volume(&self) -> Quantity {
        self.volume
    }

    /// Number of distinct price levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_opens_level() {
        let mut ladder = PriceLadder::new(Side::Buy);
        ladder.add_quantity(100.0, 10).unwrap();

        assert_eq!(
            ladder.level(100.0),
            Some(PriceLevel {
                price: 100.0,
                quantity: 10,
                orders: 1
            })
        );
        assert_eq!(ladder.volume(), 10);
    }

    #[test]
    fn test_add_accumulates() {
        let mut ladder = PriceLadder::new(Side::Sell);
        ladder.add_quantity(100.0, 10).unwrap();
        ladder.add_quantity(100.0, 5).unwrap();

        let level = ladder.level(100.0).unwrap();
        assert_eq!(level.quantity, 15);
        assert_eq!(level.orders, 2);
        assert_eq!(ladder.len(), 1);
    }

    #[test]
    fn test_remove_closes_level_on_last_contributor() {
        let mut ladder = PriceLadder::new(Side::Buy);
        ladder.add_quantity(100.0, 10).unwrap();
        ladder.add_quantity(100.0, 5).unwrap();

        ladder.remove_quantity(100.0, 10).unwrap();
        assert_eq!(ladder.snapshot(), vec![(100.0, 5)]);

        ladder.remove_quantity(100.0, 5).unwrap();
        assert!(ladder.is_empty());
        assert_eq!(ladder.level(100.0), None);
        assert_eq!(ladder.volume(), 0);

        ladder.add_quantity(100.0, 2).unwrap();
        assert_eq!(ladder.snapshot(), vec![(100.0, 2)]);
    }

    #[test]
    fn test_remove_missing_level() {
        let mut ladder = PriceLadder::new(Side::Sell);
        assert_eq!(
            ladder.remove_quantity(50.0, 1),
            Err(LadderError::MissingLevel(50.0))
        );
    }

    #[test]
    fn test_remove_inconsistent_quantity_leaves_ladder_unchanged() {
        let mut ladder = PriceLadder::new(Side::Sell);
        ladder.add_quantity(50.0, 4).unwrap();
        let before = ladder.clone();

        assert_eq!(
            ladder.remove_quantity(50.0, 5),
            Err(LadderError::QuantityUnderflow {
                price: 50.0,
                resting: 4,
                requested: 5
            })
        );
        assert_eq!(
            ladder.remove_quantity(50.0, 3),
            Err(LadderError::ResidualQuantity {
                price: 50.0,
                residual: 1
            })
        );
        assert_eq!(ladder, before);
    }

    #[test]
    fn test_add_overflow_leaves_ladder_unchanged() {
        let half = Quantity::MAX / 2 + 1;
        let mut ladder = PriceLadder::new(Side::Buy);
        ladder.add_quantity(10.0, half).unwrap();
        let before = ladder.clone();

        // same level
        assert_eq!(
            ladder.add_quantity(10.0, half),
            Err(LadderError::QuantityOverflow {
                price: 10.0,
                added: half
            })
        );
        // fresh level, but the side's volume would overflow
        assert_eq!(
            ladder.add_quantity(11.0, half),
            Err(LadderError::QuantityOverflow {
                price: 11.0,
                added: half
            })
        );
        assert_eq!(ladder, before);
        assert_eq!(ladder.level(11.0), None);

        ladder.add_quantity(11.0, half - 1).unwrap();
        assert_eq!(ladder.volume(), Quantity::MAX);
    }

    #[test]
    fn test_buy_side_descending() {
        let mut ladder = PriceLadder::new(Side::Buy);
        ladder.add_quantity(99.0, 1).unwrap();
        ladder.add_quantity(101.0, 2).unwrap();
        ladder.add_quantity(100.0, 3).unwrap();

        assert_eq!(ladder.snapshot(), vec![(101.0, 2), (100.0, 3), (99.0, 1)]);
        assert_eq!(ladder.best().map(|l| l.price), Some(101.0));
    }

    #[test]
    fn test_sell_side_ascending() {
        let mut ladder = PriceLadder::new(Side::Sell);
        ladder.add_quantity(101.0, 7).unwrap();
        ladder.add_quantity(99.0, 3).unwrap();

        assert_eq!(ladder.snapshot(), vec![(99.0, 3), (101.0, 7)]);
        assert_eq!(ladder.snapshot_n(1), vec![(99.0, 3)]);
        assert_eq!(ladder.best().map(|l| l.price), Some(99.0));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut ladder = PriceLadder::new(Side::Sell);
        ladder.add_quantity(10.0, 1).unwrap();
        let snapshot = ladder.snapshot();

        ladder.add_quantity(11.0, 1).unwrap();
        ladder.remove_quantity(10.0, 1).unwrap();

        assert_eq!(snapshot, vec![(10.0, 1)]);
    }
}
