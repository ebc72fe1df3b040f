//! Inventory
//!
//! Registration rules for inventory items and the policy applied when a sale
//! draws stock down.

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// Product
#[derive(Debug)]
pub struct Product;

/// Product identifier.
pub type ProductUuid = TypedUuid<Product>;

/// Inventory Item
#[derive(Debug)]
pub struct InventoryItem;

/// Inventory item identifier.
pub type InventoryItemUuid = TypedUuid<InventoryItem>;

/// Errors from inventory registration and stock movements.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Negative quantity at registration.
    #[error("quantity must not be negative")]
    NegativeQuantity,

    /// Expiry date before today.
    #[error("expiry date {expires} is in the past")]
    Expired {
        /// Expiry date.
        expires: Date,
    },

    /// Manufacture date after today.
    #[error("manufacture date {manufactured} is in the future")]
    ManufacturedInFuture {
        /// Manufacture date.
        manufactured: Date,
    },

    /// Expiry date before manufacture date.
    #[error("expiry date must not be before the manufacture date")]
    ExpiresBeforeManufactured,

    /// Sell-by or best-before date outside the shelf life.
    #[error("{field} date must fall between manufacture and expiry")]
    OutsideShelfLife {
        /// Which date was out of range.
        field: &'static str,
    },

    /// `price_per_item * quantity` does not fit.
    #[error("total price is too large")]
    TotalPriceOverflow,

    /// Requested more than is on hand.
    #[error("insufficient inventory: {available} available, {requested} requested")]
    Insufficient {
        /// Quantity on hand.
        available: i64,

        /// Quantity asked for.
        requested: u32,
    },
}

/// Dates describing the shelf life of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShelfLife {
    /// Date of manufacture.
    pub manufactured: Option<Date>,

    /// Sell-by date.
    pub sell_by: Option<Date>,

    /// Best-before date.
    pub best_before: Option<Date>,

    /// Expiry date.
    pub expires: Date,
}

impl ShelfLife {
    /// Check the dates against each other and `today`.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn validate(&self, today: Date) -> Result<(), InventoryError> {
        if self.expires < today {
            return Err(InventoryError::Expired {
                expires: self.expires,
            });
        }

        if let Some(manufactured) = self.manufactured {
            if manufactured > today {
                return Err(InventoryError::ManufacturedInFuture { manufactured });
            }

            if self.expires < manufactured {
                return Err(InventoryError::ExpiresBeforeManufactured);
            }
        }

        for (field, date) in [("sell-by", self.sell_by), ("best-before", self.best_before)] {
            let Some(date) = date else {
                continue;
            };

            if date > self.expires || self.manufactured.is_some_and(|made| date < made) {
                return Err(InventoryError::OutsideShelfLife { field });
            }
        }

        Ok(())
    }
}

/// Validated inventory item fields, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryTerms {
    /// Quantity on hand.
    pub quantity: i64,

    /// Price of one unit in minor units.
    pub price_per_item: Option<u64>,

    /// Price of the whole batch in minor units.
    pub total_price: Option<u64>,

    /// Shelf life dates.
    pub shelf_life: ShelfLife,
}

impl InventoryTerms {
    /// Validate a registration, defaulting the total price from the unit price.
    ///
    /// # Errors
    ///
    /// Returns an error when the quantity is negative, the dates are
    /// inconsistent, or the defaulted total overflows.
    pub fn new(
        quantity: i64,
        price_per_item: Option<u64>,
        total_price: Option<u64>,
        shelf_life: ShelfLife,
        today: Date,
    ) -> Result<Self, InventoryError> {
        if quantity < 0 {
            return Err(InventoryError::NegativeQuantity);
        }

        shelf_life.validate(today)?;

        let total_price = match (total_price, price_per_item) {
            (Some(total), _) => Some(total),
            (None, Some(unit)) => Some(
                u64::try_from(quantity)
                    .ok()
                    .and_then(|quantity| unit.checked_mul(quantity))
                    .ok_or(InventoryError::TotalPriceOverflow)?,
            ),
            (None, None) => None,
        };

        Ok(Self {
            quantity,
            price_per_item,
            total_price,
            shelf_life,
        })
    }
}

/// Unknown policy name.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown inventory policy: {0}")]
pub struct UnknownInventoryPolicy(pub String);

/// How stock is drawn down when a listing sells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InventoryPolicy {
    /// Refuse anything that would take the quantity below zero.
    #[default]
    Guarded,

    /// Subtract unconditionally; quantities may go negative.
    Permissive,
}

impl InventoryPolicy {
    /// Check a new listing's quantity against stock on hand.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Insufficient`] under the guarded policy when
    /// the listing asks for more than is available.
    pub fn check_listing(self, available: i64, requested: u32) -> Result<(), InventoryError> {
        match self {
            Self::Guarded if i64::from(requested) > available => {
                Err(InventoryError::Insufficient {
                    available,
                    requested,
                })
            }
            _ => Ok(()),
        }
    }

    /// Quantity remaining after selling `sold` units.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Insufficient`] under the guarded policy when
    /// the result would be negative.
    pub fn decrement(self, available: i64, sold: u32) -> Result<i64, InventoryError> {
        let remaining = available.saturating_sub(i64::from(sold));

        match self {
            Self::Guarded if remaining < 0 => Err(InventoryError::Insufficient {
                available,
                requested: sold,
            }),
            _ => Ok(remaining),
        }
    }
}

impl fmt::Display for InventoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Guarded => "guarded",
            Self::Permissive => "permissive",
        })
    }
}

impl FromStr for InventoryPolicy {
    type Err = UnknownInventoryPolicy;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "guarded" => Ok(Self::Guarded),
            "permissive" => Ok(Self::Permissive),
            _ => Err(UnknownInventoryPolicy(value.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    const TODAY: Date = date(2024, 6, 15);

    fn shelf_life() -> ShelfLife {
        ShelfLife {
            manufactured: Some(date(2024, 6, 1)),
            sell_by: Some(date(2024, 6, 20)),
            best_before: Some(date(2024, 6, 25)),
            expires: date(2024, 6, 30),
        }
    }

    #[test]
    fn accepts_consistent_dates() -> TestResult {
        shelf_life().validate(TODAY)?;

        Ok(())
    }

    #[test]
    fn expiring_today_is_allowed() -> TestResult {
        let dates = ShelfLife {
            manufactured: None,
            sell_by: None,
            best_before: None,
            expires: TODAY,
        };

        dates.validate(TODAY)?;

        Ok(())
    }

    #[test]
    fn rejects_expired_batches() {
        let dates = ShelfLife {
            expires: date(2024, 6, 14),
            manufactured: None,
            sell_by: None,
            best_before: None,
        };

        assert_eq!(
            dates.validate(TODAY),
            Err(InventoryError::Expired {
                expires: date(2024, 6, 14)
            })
        );
    }

    #[test]
    fn rejects_future_manufacture() {
        let dates = ShelfLife {
            manufactured: Some(date(2024, 6, 16)),
            ..shelf_life()
        };

        assert_eq!(
            dates.validate(TODAY),
            Err(InventoryError::ManufacturedInFuture {
                manufactured: date(2024, 6, 16)
            })
        );
    }

    #[test]
    fn rejects_sell_by_after_expiry() {
        let dates = ShelfLife {
            sell_by: Some(date(2024, 7, 1)),
            ..shelf_life()
        };

        assert_eq!(
            dates.validate(TODAY),
            Err(InventoryError::OutsideShelfLife { field: "sell-by" })
        );
    }

    #[test]
    fn rejects_best_before_before_manufacture() {
        let dates = ShelfLife {
            best_before: Some(date(2024, 5, 31)),
            ..shelf_life()
        };

        assert_eq!(
            dates.validate(TODAY),
            Err(InventoryError::OutsideShelfLife {
                field: "best-before"
            })
        );
    }

    #[test]
    fn total_price_defaults_from_unit_price() -> TestResult {
        let terms = InventoryTerms::new(4, Some(250), None, shelf_life(), TODAY)?;

        assert_eq!(terms.total_price, Some(1000));

        Ok(())
    }

    #[test]
    fn explicit_total_price_wins() -> TestResult {
        let terms = InventoryTerms::new(4, Some(250), Some(900), shelf_life(), TODAY)?;

        assert_eq!(terms.total_price, Some(900));

        Ok(())
    }

    #[test]
    fn rejects_negative_quantity() {
        let result = InventoryTerms::new(-1, None, None, shelf_life(), TODAY);

        assert_eq!(result, Err(InventoryError::NegativeQuantity));
    }

    #[test]
    fn guarded_decrement_refuses_to_go_negative() {
        assert_eq!(InventoryPolicy::Guarded.decrement(5, 5), Ok(0));
        assert_eq!(
            InventoryPolicy::Guarded.decrement(3, 5),
            Err(InventoryError::Insufficient {
                available: 3,
                requested: 5
            })
        );
    }

    #[test]
    fn permissive_decrement_goes_negative() {
        assert_eq!(InventoryPolicy::Permissive.decrement(3, 5), Ok(-2));
    }

    #[test]
    fn listing_quantity_is_only_checked_when_guarded() {
        assert!(InventoryPolicy::Guarded.check_listing(2, 3).is_err());
        assert!(InventoryPolicy::Guarded.check_listing(3, 3).is_ok());
        assert!(InventoryPolicy::Permissive.check_listing(2, 3).is_ok());
    }

    #[test]
    fn parses_policy_names() -> TestResult {
        assert_eq!("Permissive".parse::<InventoryPolicy>()?, InventoryPolicy::Permissive);
        assert!("lenient".parse::<InventoryPolicy>().is_err());

        Ok(())
    }
}
