use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use serde::{Deserialize, Serialize};

/// Amount of money in integer cents.
///
/// Every calculation stays in cents; the only place the value is split into
/// dollars is [`Money::format`], and that split is integer division too.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub fn add(self, other: Money) -> Money {
        Money(self.0 + other.0)
    }

    /// Multiply a unit price by a quantity. Quantities are never negative.
    pub fn scale(self, qty: u32) -> Money {
        Money(self.0 * i64::from(qty))
    }

    /// `None` on overflow.
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// `None` on overflow.
    pub fn checked_scale(self, qty: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(qty)).map(Money)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Render as `{integer}.{2-digit fraction}`, e.g. `1800` -> `18.00`.
    pub fn format(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::add(self, rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Money::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_pads_fraction() {
        assert_eq!(Money::from_cents(1800).format(), "18.00");
        assert_eq!(Money::from_cents(5).format(), "0.05");
        assert_eq!(Money::from_cents(0).format(), "0.00");
        assert_eq!(Money::from_cents(123_456).format(), "1234.56");
    }

    #[test]
    fn format_negative() {
        assert_eq!(Money::from_cents(-150).format(), "-1.50");
        assert_eq!(Money::from_cents(-7).format(), "-0.07");
    }

    #[test]
    fn scale_and_sum() {
        let unit = Money::from_cents(1250);
        assert_eq!(unit.scale(0), Money::ZERO);
        assert_eq!(unit.scale(3), Money::from_cents(3750));

        let total: Money = [Money::from_cents(1800), Money::from_cents(2200)].iter().sum();
        assert_eq!(total, Money::from_cents(4000));
        assert_eq!(Money::from_cents(600) + Money::from_cents(0), Money::from_cents(600));
    }

    #[test]
    fn checked_math_reports_overflow() {
        assert_eq!(Money::from_cents(1250).checked_scale(3), Some(Money::from_cents(3750)));
        assert_eq!(Money::from_cents(9_000_000_000).checked_scale(4_000_000_000), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(-5).checked_add(Money::from_cents(5)), Some(Money::ZERO));
    }

    #[test]
    fn serializes_as_plain_cents() {
        assert_eq!(serde_json::to_string(&Money::from_cents(1200)).unwrap(), "1200");
        let parsed: Money = serde_json::from_str("300").unwrap();
        assert_eq!(parsed, Money::from_cents(300));
    }
}
