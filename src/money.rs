// 💵 Money - integer cents with dollar formatting
//
// Arithmetic is checked: callers get None on overflow and turn it into a
// TollError.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    cents: u64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub fn from_cents(cents: u64) -> Self {
        Money { cents }
    }

    pub fn cents(&self) -> u64 {
        self.cents
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.cents.checked_add(rhs.cents).map(Money::from_cents)
    }

    pub fn checked_mul(self, rhs: u64) -> Option<Money> {
        self.cents.checked_mul(rhs).map(Money::from_cents)
    }
}

/// `$0.00` layout: always a leading digit and two decimals
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}
