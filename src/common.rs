use arbitrary::Arbitrary;
use serde::{Deserialize, Serialize};

pub type Price = f64;
pub type Quantity = u64;

/// Which side of the market an order rests on
#[derive(
    Arbitrary, Copy, Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize,
)]
pub enum Side {
    Buy,
    Sell,
}
