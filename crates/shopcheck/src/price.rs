//! Currency amounts as shown by the storefront.

use crate::result::{SuiteError, SuiteResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;
use std::sync::OnceLock;

fn amount_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"\$(\d+)\.(\d{2})\b").ok())
        .as_ref()
}

/// A dollar amount held as integer cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Price {
    cents: u64,
}

impl Price {
    /// Zero dollars
    pub const ZERO: Self = Self { cents: 0 };

    /// From a cent count
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    /// Cent count
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.cents
    }

    /// Find the first `$X.YY` amount in a label such as `"Tax: $2.40"`
    pub fn parse_label(text: &str) -> SuiteResult<Self> {
        let caps = amount_pattern()
            .and_then(|re| re.captures(text))
            .ok_or_else(|| SuiteError::assertion(format!("no $X.YY amount in {text:?}")))?;
        let dollars: u64 = caps[1]
            .parse()
            .map_err(|_| SuiteError::assertion(format!("amount out of range in {text:?}")))?;
        let cents: u64 = caps[2]
            .parse()
            .map_err(|_| SuiteError::assertion(format!("bad cents in {text:?}")))?;
        dollars
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .map(Self::from_cents)
            .ok_or_else(|| SuiteError::assertion(format!("amount out of range in {text:?}")))
    }

    /// `rate_percent` of this amount, rounded half-up to the cent.
    /// Saturates at `u64::MAX` hundredths of a cent.
    #[must_use]
    pub const fn percent(&self, rate_percent: u64) -> Self {
        Self::from_cents(self.cents.saturating_mul(rate_percent).saturating_add(50) / 100)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl FromStr for Price {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_cents(self.cents.saturating_add(rhs.cents))
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

/// Amounts read from the checkout overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Sum of item prices
    pub subtotal: Price,
    /// Sales tax
    pub tax: Price,
    /// Amount charged
    pub total: Price,
}

impl OrderSummary {
    /// Total equals subtotal plus tax, to the cent
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.subtotal + self.tax == self.total
    }
}
