use rust_decimal::Decimal;

/// An amount of money expressed as an integer number of minor currency units, which is how payment processors report
/// amounts (`2599` is $25.99).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct MinorUnits(i64);

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl MinorUnits {
    /// Converts to major units. The conversion is exact: `2599` becomes `25.99`.
    pub fn to_major(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}
