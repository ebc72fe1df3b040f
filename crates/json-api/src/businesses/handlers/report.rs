//! Sales Report Handler

use std::sync::Arc;

use jiff::{
    Timestamp,
    civil::{Date, DateTime},
};
use marketplace::reports::{PLATFORM_EPOCH, ReportRow, TOTAL_LABEL, end_of_day, to_civil};
use marketplace_app::domain::sales::data::SalesReportRequest;
use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{businesses::into_status_error, extensions::*, state::State};

/// One period of a sales report.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReportRowResponse {
    /// Period label, e.g. `March 2021` or `Week 11, 2021`
    pub label: String,

    /// Number of sales in the period
    pub total_sales: u64,

    /// Sum of sale prices in minor units
    pub total_revenue: u64,
}

impl From<ReportRow> for ReportRowResponse {
    fn from(row: ReportRow) -> Self {
        ReportRowResponse {
            label: row.label,
            total_sales: row.total_sales,
            total_revenue: row.total_revenue,
        }
    }
}

/// Which end of the range a bare date is pinned to.
#[derive(Debug, Clone, Copy)]
enum Bound {
    Start,
    End,
}

/// Accepts `YYYY-MM-DD` or a civil date-time such as `2021-03-15T09:30`.
/// The date parser also accepts date-times and drops the time, so anything
/// with a time separator goes to the date-time parser.
fn parse_bound(value: &str, bound: Bound) -> Option<DateTime> {
    if value.contains(['T', 't', ' ']) {
        return value.parse::<DateTime>().ok();
    }

    let date = value.parse::<Date>().ok()?;

    Some(match bound {
        Bound::Start => date.to_datetime(jiff::civil::Time::midnight()),
        Bound::End => end_of_day(date),
    })
}

fn report_bound(
    value: Option<String>,
    bound: Bound,
    name: &str,
    default: DateTime,
) -> Result<DateTime, StatusError> {
    let Some(value) = value else {
        return Ok(default);
    };

    parse_bound(&value, bound).ok_or_else(|| {
        StatusError::bad_request().brief(format!("could not parse \"{name}\": {value}"))
    })
}

/// Sales Report Handler
///
/// Sales counts and revenue for a business, split into periods. `from`
/// defaults to the platform launch and is clamped to it; `to` defaults to
/// now and is clamped to it. A bare `to` date covers that whole day.
#[endpoint(
    tags("businesses"),
    summary = "Sales Report",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Report rows in chronological order"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid range or granularity"),
        (status_code = StatusCode::FORBIDDEN, description = "Not an administrator of the business"),
        (status_code = StatusCode::NOT_FOUND, description = "Business not found"),
    ),
)]
pub(crate) async fn handler(
    business: PathParam<Uuid>,
    from: QueryParam<String, false>,
    to: QueryParam<String, false>,
    granularity: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<ReportRowResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let actor = depot.actor_or_401()?;
    let now = Timestamp::now();

    let request = SalesReportRequest {
        from: report_bound(from.into_inner(), Bound::Start, "from", PLATFORM_EPOCH)?,
        to: report_bound(to.into_inner(), Bound::End, "to", to_civil(now))?,
        granularity: granularity
            .into_inner()
            .unwrap_or_else(|| TOTAL_LABEL.to_owned()),
    };

    let rows = state
        .app
        .reports
        .sales_report(actor, business.into_inner().into(), request, now)
        .await
        .map_err(into_status_error)?;

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}
