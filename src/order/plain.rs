use arbitrary::Arbitrary;
use chrono::{DateTime, Utc};
use eq_float::F64;
use serde::{Deserialize, Serialize};

use crate::common::{Price, Quantity, Side};

use super::{Order, OrderId};

#[derive(Arbitrary, Clone, Debug, Deserialize, Serialize)]
pub struct PlainOrder {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,
}

impl PlainOrder {
    pub fn new(
        id: OrderId,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            side,
            price,
            quantity,
            created: Utc::now(),
        }
    }
}

impl PartialEq for PlainOrder {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.side == other.side
            && F64(self.price) == F64(other.price)
            && self.quantity == other.quantity
            && self.created == other.created
    }
}

impl Eq for PlainOrder {}

impl Order for PlainOrder {
    fn id(&self) -> OrderId {
        self.id
    }

    fn side(&self) -> Side {
        self.side
    }

    fn price(&self) -> Price {
        self.price
    }

    fn quantity(&self) -> Quantity {
        self.quantity
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created
    }
}
