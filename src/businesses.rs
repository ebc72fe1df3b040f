//! Businesses

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Business
#[derive(Debug)]
pub struct Business;

/// Business identifier.
pub type BusinessUuid = TypedUuid<Business>;

/// Unknown business type name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown business type: {0}")]
pub struct UnknownBusinessType(pub String);

/// What kind of organisation a business is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessType {
    /// Cafes, restaurants, hotels.
    AccommodationAndFoodServices,

    /// Shops.
    RetailTrade,

    /// Registered charities.
    CharitableOrganisation,

    /// Other not-for-profits.
    NonProfitOrganisation,
}

impl BusinessType {
    /// Every business type, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::AccommodationAndFoodServices,
        Self::RetailTrade,
        Self::CharitableOrganisation,
        Self::NonProfitOrganisation,
    ];

    /// Name used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccommodationAndFoodServices => "AccommodationAndFoodServices",
            Self::RetailTrade => "RetailTrade",
            Self::CharitableOrganisation => "CharitableOrganisation",
            Self::NonProfitOrganisation => "NonProfitOrganisation",
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BusinessType {
    type Err = UnknownBusinessType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| UnknownBusinessType(value.to_owned()))
    }
}

/// Postal address of a business, used as the pickup location for purchases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street number and name.
    pub street: Option<String>,

    /// City or town.
    pub city: Option<String>,

    /// Region, state or county.
    pub region: Option<String>,

    /// Country.
    pub country: String,

    /// Postal code.
    pub postcode: Option<String>,
}

impl fmt::Display for Address {
    /// Comma separated, skipping missing parts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [
            self.street.as_deref(),
            self.city.as_deref(),
            self.region.as_deref(),
            self.postcode.as_deref(),
            Some(self.country.as_str()),
        ];

        let mut first = true;

        for part in parts.into_iter().flatten().map(str::trim) {
            if part.is_empty() {
                continue;
            }

            if !first {
                f.write_str(", ")?;
            }

            f.write_str(part)?;
            first = false;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_business_types_case_insensitively() -> TestResult {
        assert_eq!("RetailTrade".parse::<BusinessType>()?, BusinessType::RetailTrade);
        assert_eq!(
            "charitableorganisation".parse::<BusinessType>()?,
            BusinessType::CharitableOrganisation
        );

        Ok(())
    }

    #[test]
    fn rejects_unknown_business_types() {
        let result = "Bakery".parse::<BusinessType>();

        assert_eq!(result, Err(UnknownBusinessType("Bakery".to_owned())));
    }

    #[test]
    fn address_skips_missing_parts() {
        let address = Address {
            street: Some("12 High Street".to_owned()),
            city: Some("Christchurch".to_owned()),
            region: None,
            country: "New Zealand".to_owned(),
            postcode: Some(" ".to_owned()),
        };

        assert_eq!(address.to_string(), "12 High Street, Christchurch, New Zealand");
    }
}
