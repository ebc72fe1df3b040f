//! Sales reports
//!
//! A report splits a date range into chronological buckets of one
//! [`Granularity`] and totals the sales that fall in each. All calendar
//! arithmetic happens on UTC civil date-times.
//!
//! Weeks follow US numbering: they run Sunday to Saturday, week 1 is the week
//! containing 1 January, and a week belongs to the year its Saturday falls in.

use std::{fmt, str::FromStr};

use jiff::{
    Timestamp, ToSpan,
    civil::{Date, DateTime, Time, datetime},
    tz::Offset,
};
use thiserror::Error;

/// Nothing sold on the platform before this instant.
pub const PLATFORM_EPOCH: DateTime = datetime(2021, 1, 1, 0, 0, 0, 0);

/// Label of the single bucket of a [`Granularity::Total`] report.
pub const TOTAL_LABEL: &str = "Total";

/// Report errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Start after end once clamped.
    #[error("report start {from} is after its end {to}")]
    EmptyRange {
        /// Clamped start.
        from: DateTime,

        /// Clamped end.
        to: DateTime,
    },

    /// Unrecognised granularity name.
    #[error("unknown granularity: {0}")]
    UnknownGranularity(String),

    /// Date arithmetic left the supported range.
    #[error(transparent)]
    Calendar(#[from] jiff::Error),
}

/// Bucket size of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// One bucket for the whole range.
    Total,

    /// Calendar years.
    Yearly,

    /// Calendar months.
    Monthly,

    /// Sunday to Saturday weeks.
    Weekly,

    /// Calendar days.
    Daily,
}

impl Granularity {
    const ALL: [Self; 5] = [
        Self::Total,
        Self::Yearly,
        Self::Monthly,
        Self::Weekly,
        Self::Daily,
    ];

    /// Wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Total => "Total",
            Self::Yearly => "Yearly",
            Self::Monthly => "Monthly",
            Self::Weekly => "Weekly",
            Self::Daily => "Daily",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|granularity| granularity.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| ReportError::UnknownGranularity(value.to_owned()))
    }
}

/// Convert an instant to a UTC civil date-time.
#[must_use]
pub fn to_civil(timestamp: Timestamp) -> DateTime {
    Offset::UTC.to_datetime(timestamp)
}

/// Convert a UTC civil date-time to an instant.
///
/// # Errors
///
/// Returns an error when the date-time is outside the supported range.
pub fn to_timestamp(civil: DateTime) -> Result<Timestamp, ReportError> {
    Ok(Offset::UTC.to_timestamp(civil)?)
}

/// The last millisecond of a day.
#[must_use]
pub fn end_of_day(date: Date) -> DateTime {
    date.to_datetime(Time::constant(23, 59, 59, 999_000_000))
}

/// A report range clamped to the platform epoch and the present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    /// Inclusive start.
    pub from: DateTime,

    /// End; sales up to the end of this day are counted.
    pub to: DateTime,
}

impl ReportRange {
    /// Clamp `from` to [`PLATFORM_EPOCH`] and `to` to `now`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::EmptyRange`] when the clamped start is after the
    /// clamped end.
    pub fn clamped(from: DateTime, to: DateTime, now: DateTime) -> Result<Self, ReportError> {
        let from = from.max(PLATFORM_EPOCH);
        let to = to.min(now);

        if from > to {
            return Err(ReportError::EmptyRange { from, to });
        }

        Ok(Self { from, to })
    }

    /// Instants bounding every sale the report can count, inclusive.
    ///
    /// # Errors
    ///
    /// Returns an error when either bound is outside the supported range.
    pub fn window(self) -> Result<(Timestamp, Timestamp), ReportError> {
        Ok((
            to_timestamp(self.from)?,
            to_timestamp(end_of_day(self.to.date()))?,
        ))
    }
}

/// One row of a report before totals are filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBucket {
    /// Display label.
    pub label: String,

    /// Inclusive start.
    pub from: DateTime,

    /// Last moment of the bucket; widened to the end of its day.
    pub to: DateTime,
}

impl ReportBucket {
    /// Whether a sale at `at` falls in the bucket.
    #[must_use]
    pub fn contains(&self, at: DateTime) -> bool {
        self.from <= at && at <= end_of_day(self.to.date())
    }
}

/// A sale as seen by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleEntry {
    /// When it sold.
    pub sold_at: Timestamp,

    /// Sale price in minor units.
    pub price: u64,
}

/// A finished report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Period label.
    pub label: String,

    /// Number of sales in the period.
    pub total_sales: u64,

    /// Sum of sale prices in minor units.
    pub total_revenue: u64,
}

/// Split a range into chronological buckets.
///
/// # Errors
///
/// Returns an error when period arithmetic leaves the supported date range.
pub fn plan_buckets(
    range: ReportRange,
    granularity: Granularity,
) -> Result<Vec<ReportBucket>, ReportError> {
    if granularity == Granularity::Total {
        return Ok(vec![ReportBucket {
            label: TOTAL_LABEL.to_owned(),
            from: range.from,
            to: range.to,
        }]);
    }

    let last = range.to.date();
    let mut buckets = Vec::new();
    let mut current = range.from;

    while !same_period(current.date(), last, granularity)? {
        let end = period_end(current.date(), granularity)?;

        buckets.push(ReportBucket {
            label: label(current.date(), granularity)?,
            from: current,
            to: end.to_datetime(Time::midnight()),
        });

        current = end.tomorrow()?.to_datetime(Time::midnight());
    }

    buckets.push(ReportBucket {
        label: label(current.date(), granularity)?,
        from: current,
        to: range.to,
    });

    Ok(buckets)
}

/// Total the sales falling in each bucket.
pub fn summarise(buckets: &[ReportBucket], sales: &[SaleEntry]) -> Vec<ReportRow> {
    let sales: Vec<(DateTime, u64)> = sales
        .iter()
        .map(|sale| (to_civil(sale.sold_at), sale.price))
        .collect();

    buckets
        .iter()
        .map(|bucket| {
            let (total_sales, total_revenue) = sales
                .iter()
                .filter(|(sold_at, _)| bucket.contains(*sold_at))
                .fold((0_u64, 0_u64), |(count, revenue), (_, price)| {
                    (count + 1, revenue.saturating_add(*price))
                });

            ReportRow {
                label: bucket.label.clone(),
                total_sales,
                total_revenue,
            }
        })
        .collect()
}

fn same_period(a: Date, b: Date, granularity: Granularity) -> Result<bool, ReportError> {
    Ok(match granularity {
        Granularity::Total => true,
        Granularity::Yearly => a.year() == b.year(),
        Granularity::Monthly => a.year() == b.year() && a.month() == b.month(),
        Granularity::Weekly => week_start(a)? == week_start(b)?,
        Granularity::Daily => a == b,
    })
}

fn period_end(date: Date, granularity: Granularity) -> Result<Date, ReportError> {
    Ok(match granularity {
        Granularity::Total | Granularity::Daily => date,
        Granularity::Yearly => date.last_of_year(),
        Granularity::Monthly => date.last_of_month(),
        Granularity::Weekly => week_start(date)?.checked_add(6.days())?,
    })
}

fn label(date: Date, granularity: Granularity) -> Result<String, ReportError> {
    Ok(match granularity {
        Granularity::Total => TOTAL_LABEL.to_owned(),
        Granularity::Yearly => date.year().to_string(),
        Granularity::Monthly => date.strftime("%B %Y").to_string(),
        Granularity::Weekly => {
            let (week, year) = us_week(date)?;
            format!("Week {week}, {year}")
        }
        Granularity::Daily => format!("{} {}", date.day(), date.strftime("%B %Y")),
    })
}

fn week_start(date: Date) -> Result<Date, ReportError> {
    let offset = i64::from(date.weekday().to_sunday_zero_offset());

    Ok(date.checked_sub(offset.days())?)
}

/// Week number and week-based year.
fn us_week(date: Date) -> Result<(i16, i16), ReportError> {
    let saturday = week_start(date)?.checked_add(6.days())?;
    let week = (saturday.day_of_year() - 1) / 7 + 1;

    Ok((week, saturday.year()))
}
