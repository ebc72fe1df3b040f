//! Price formatting

use rusty_money::{Findable, Money, iso::Currency};
use thiserror::Error;

/// Unknown ISO 4217 code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown currency code: {0}")]
pub struct UnknownCurrency(pub String);

/// Look up an ISO 4217 currency by code, ignoring case.
///
/// # Errors
///
/// Returns [`UnknownCurrency`] when the code is not recognised.
pub fn currency(code: &str) -> Result<&'static Currency, UnknownCurrency> {
    Currency::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| UnknownCurrency(code.to_owned()))
}

/// Render minor units as a display price, e.g. `$12.50`.
///
/// Amounts beyond `i64::MAX` are clamped.
#[must_use]
pub fn format_price(minor_units: u64, currency: &'static Currency) -> String {
    let minor = i64::try_from(minor_units).unwrap_or(i64::MAX);

    Money::from_minor(minor, currency).to_string()
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn formats_minor_units() {
        assert_eq!(format_price(1_250, iso::USD), "$12.50");
        assert_eq!(format_price(0, iso::GBP), "£0.00");
    }

    #[test]
    fn finds_currencies_by_code() -> TestResult {
        assert_eq!(currency("NZD")?, iso::NZD);
        assert_eq!(currency(" nzd ")?, iso::NZD);
        assert_eq!(currency("Gbp")?, iso::GBP);
        assert_eq!(currency("XYZ"), Err(UnknownCurrency("XYZ".to_owned())));

        Ok(())
    }
}
