//! Lossless decimal numeric type backed by rust_decimal.
//!
//! Hyperliquid reports sizes and prices as decimal strings; keeping them as
//! decimals avoids float noise when comparing successive snapshots.

use rust_decimal::Decimal as RustDecimal;
use std::fmt;
use std::str::FromStr;

/// Lossless decimal numeric type for sizes, prices and fees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(RustDecimal);

impl Decimal {
    /// `units * 10^-scale`, usable in const context.
    pub const fn from_scaled(units: u32, scale: u32) -> Self {
        Decimal(RustDecimal::from_parts(units, 0, 0, false, scale))
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s.trim()).map(Decimal)
    }

    /// Format without exponent notation and without trailing zeros.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the value is < 0.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    pub fn abs(&self) -> Self {
        Decimal(self.0.abs())
    }

    /// Absolute difference between two values.
    pub fn abs_diff(&self, other: &Decimal) -> Self {
        Decimal((self.0 - other.0).abs())
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_canonical_string_drops_trailing_zeros() {
        assert_eq!(d("1.50000").to_canonical_string(), "1.5");
        assert_eq!(d("100").to_canonical_string(), "100");
        assert_eq!(d("-0.00010").to_canonical_string(), "-0.0001");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(d(" 42.5 "), d("42.5"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Decimal::from_str_canonical("N/A").is_err());
        assert!(Decimal::from_str_canonical("").is_err());
    }

    #[test]
    fn test_sign_helpers() {
        assert!(d("1.5").is_positive());
        assert!(d("-2").is_negative());
        assert!(!d("0").is_positive());
        assert!(!d("-0").is_negative());
        assert!(d("0.0").is_zero());
    }

    #[test]
    fn test_abs_diff_is_symmetric() {
        assert_eq!(d("1.5").abs_diff(&d("1.5002")), d("0.0002"));
        assert_eq!(d("1.5002").abs_diff(&d("1.5")), d("0.0002"));
        assert_eq!(d("-1").abs_diff(&d("1")), d("2"));
    }
}
