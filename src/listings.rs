//! Listings
//!
//! Draft validation for new listings, ordering keys for search results, and
//! bookmark state.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Maximum length, in characters, of a listing's free-text notes.
pub const MORE_INFO_MAX_CHARS: usize = 250;

/// Highest price, in minor units, storage can hold.
pub const MAX_PRICE: u64 = i64::MAX.unsigned_abs();

/// Listing
#[derive(Debug)]
pub struct Listing;

/// Listing identifier.
pub type ListingUuid = TypedUuid<Listing>;

/// Listing draft validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListingError {
    /// Quantity was zero.
    #[error("quantity must be greater than zero")]
    ZeroQuantity,

    /// Price above [`MAX_PRICE`].
    #[error("price must be at most {MAX_PRICE}")]
    PriceTooHigh,

    /// Closing time was not given.
    #[error("closing date is required")]
    MissingCloses,

    /// Notes exceed [`MORE_INFO_MAX_CHARS`].
    #[error("more info must be at most {MORE_INFO_MAX_CHARS} characters")]
    MoreInfoTooLong,

    /// Unrecognised ordering key.
    #[error("unknown ordering: {0}")]
    UnknownOrdering(String),
}

/// Validated fields of a new listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingTerms {
    /// Units on offer.
    pub quantity: u32,

    /// Asking price in minor units; `None` means price on request.
    pub price: Option<u64>,

    /// Free-text notes.
    pub more_info: Option<String>,

    /// When the listing stops being available.
    pub closes: Timestamp,
}

impl ListingTerms {
    /// Validate a listing draft.
    ///
    /// Blank notes are stored as absent.
    ///
    /// # Errors
    ///
    /// Returns a [`ListingError`] describing the first field that fails.
    pub fn new(
        quantity: u32,
        price: Option<u64>,
        more_info: Option<String>,
        closes: Option<Timestamp>,
    ) -> Result<Self, ListingError> {
        if quantity == 0 {
            return Err(ListingError::ZeroQuantity);
        }

        if price.is_some_and(|price| price > MAX_PRICE) {
            return Err(ListingError::PriceTooHigh);
        }

        let closes = closes.ok_or(ListingError::MissingCloses)?;

        let more_info = more_info.filter(|text| !text.trim().is_empty());

        if more_info
            .as_deref()
            .is_some_and(|text| text.chars().count() > MORE_INFO_MAX_CHARS)
        {
            return Err(ListingError::MoreInfoTooLong);
        }

        Ok(Self {
            quantity,
            price,
            more_info,
            closes,
        })
    }
}

/// Column a search is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Units on offer.
    Quantity,

    /// Asking price; listings without a price sort last.
    Price,

    /// Closing time.
    Closes,

    /// Creation time.
    Created,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,

    /// Largest first.
    Descending,
}

/// Ordering of search results. Ties are always broken by listing id ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingOrdering {
    /// Primary sort column.
    pub key: SortKey,

    /// Direction of the primary sort.
    pub direction: SortDirection,
}

impl Default for ListingOrdering {
    fn default() -> Self {
        Self {
            key: SortKey::Created,
            direction: SortDirection::Descending,
        }
    }
}

impl FromStr for ListingOrdering {
    type Err = ListingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let unknown = || ListingError::UnknownOrdering(value.to_owned());

        let (column, direction) = if let Some(column) = value.strip_suffix("ASC") {
            (column, SortDirection::Ascending)
        } else if let Some(column) = value.strip_suffix("DESC") {
            (column, SortDirection::Descending)
        } else {
            return Err(unknown());
        };

        let key = match column {
            "quantity" => SortKey::Quantity,
            "price" => SortKey::Price,
            "closes" => SortKey::Closes,
            "created" => SortKey::Created,
            _ => return Err(unknown()),
        };

        Ok(Self { key, direction })
    }
}

impl fmt::Display for ListingOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = match self.key {
            SortKey::Quantity => "quantity",
            SortKey::Price => "price",
            SortKey::Closes => "closes",
            SortKey::Created => "created",
        };

        let direction = match self.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };

        write!(f, "{column}{direction}")
    }
}

/// Whether a user has a listing bookmarked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkState {
    /// The pair now exists.
    Bookmarked,

    /// The pair was removed.
    Unbookmarked,
}

impl BookmarkState {
    /// `true` when bookmarked.
    #[must_use]
    pub const fn is_bookmarked(self) -> bool {
        matches!(self, Self::Bookmarked)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn closes() -> Timestamp {
        Timestamp::from_second(1_750_000_000).unwrap_or(Timestamp::UNIX_EPOCH)
    }

    #[test]
    fn accepts_a_complete_draft() -> TestResult {
        let terms = ListingTerms::new(3, Some(450), Some("Ask at the counter".into()), Some(closes()))?;

        assert_eq!(terms.quantity, 3);
        assert_eq!(terms.price, Some(450));
        assert_eq!(terms.closes, closes());

        Ok(())
    }

    #[test]
    fn free_listings_are_allowed() -> TestResult {
        let terms = ListingTerms::new(1, Some(0), None, Some(closes()))?;

        assert_eq!(terms.price, Some(0));

        Ok(())
    }

    #[test]
    fn rejects_prices_storage_cannot_hold() -> TestResult {
        ListingTerms::new(1, Some(MAX_PRICE), None, Some(closes()))?;

        assert_eq!(
            ListingTerms::new(1, Some(MAX_PRICE + 1), None, Some(closes())),
            Err(ListingError::PriceTooHigh)
        );

        Ok(())
    }

    #[test]
    fn rejects_zero_quantity() {
        assert_eq!(
            ListingTerms::new(0, None, None, Some(closes())),
            Err(ListingError::ZeroQuantity)
        );
    }

    #[test]
    fn requires_a_closing_date() {
        assert_eq!(
            ListingTerms::new(1, None, None, None),
            Err(ListingError::MissingCloses)
        );
    }

    #[test]
    fn more_info_limit_counts_characters() -> TestResult {
        let at_limit = "é".repeat(MORE_INFO_MAX_CHARS);
        ListingTerms::new(1, None, Some(at_limit), Some(closes()))?;

        let over = "a".repeat(MORE_INFO_MAX_CHARS + 1);
        assert_eq!(
            ListingTerms::new(1, None, Some(over), Some(closes())),
            Err(ListingError::MoreInfoTooLong)
        );

        Ok(())
    }

    #[test]
    fn blank_more_info_is_dropped() -> TestResult {
        let terms = ListingTerms::new(1, None, Some("   ".into()), Some(closes()))?;

        assert_eq!(terms.more_info, None);

        Ok(())
    }

    #[test]
    fn parses_every_ordering_key() -> TestResult {
        for key in [
            "quantityASC",
            "quantityDESC",
            "priceASC",
            "priceDESC",
            "closesASC",
            "closesDESC",
            "createdASC",
            "createdDESC",
        ] {
            let ordering: ListingOrdering = key.parse()?;

            assert_eq!(ordering.to_string(), key);
        }

        Ok(())
    }

    #[test]
    fn rejects_unknown_ordering_keys() {
        for key in ["nameASC", "price", "priceasc", ""] {
            assert_eq!(
                key.parse::<ListingOrdering>(),
                Err(ListingError::UnknownOrdering(key.to_owned())),
                "{key} should be rejected"
            );
        }
    }
}
