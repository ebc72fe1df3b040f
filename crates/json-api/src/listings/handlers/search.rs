//! Search Listings Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{ToParameters, ToSchema},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use marketplace_app::domain::listings::{data::SearchListings, records::ListingPage};

use crate::{
    extensions::*,
    listings::{get::ListingResponse, into_status_error},
    state::State,
};

/// Listing search filters. Every filter given must match.
#[derive(Debug, Default, Deserialize, ToParameters)]
#[salvo(parameters(default_parameter_in = Query))]
pub(crate) struct SearchQuery {
    /// Words or "quoted phrases" matched against product name, business
    /// name and location. `AND` is accepted between terms, `OR` is not.
    pub query: Option<String>,

    /// Comma-separated business types, e.g. `RetailTrade,CharitableOrganisation`
    pub business_types: Option<String>,

    /// Inclusive lower price bound in minor units
    pub min_price: Option<u64>,

    /// Inclusive upper price bound in minor units
    pub max_price: Option<u64>,

    /// Earliest closing instant (RFC 3339)
    pub closes_from: Option<String>,

    /// Latest closing instant (RFC 3339)
    pub closes_to: Option<String>,

    /// Exact product barcode
    pub barcode: Option<String>,

    /// One of quantityASC, quantityDESC, priceASC, priceDESC, closesASC,
    /// closesDESC, createdASC, createdDESC
    pub order_by: Option<String>,

    /// Zero-based page index
    pub page: Option<u32>,

    /// Results per page, 1 to 100
    pub page_size: Option<u32>,
}

impl SearchQuery {
    fn into_search(self) -> Result<SearchListings, StatusError> {
        Ok(SearchListings {
            query: self.query,
            business_types: self
                .business_types
                .as_deref()
                .map(split_list)
                .unwrap_or_default(),
            min_price: self.min_price,
            max_price: self.max_price,
            closes_from: parse_instant(self.closes_from.as_deref(), "closes_from")?,
            closes_to: parse_instant(self.closes_to.as_deref(), "closes_to")?,
            barcode: self.barcode,
            order_by: self.order_by,
            page: self.page,
            page_size: self.page_size,
        })
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_instant(value: Option<&str>, name: &str) -> Result<Option<Timestamp>, StatusError> {
    value
        .map(str::parse::<Timestamp>)
        .transpose()
        .or_400(&format!("could not parse \"{name}\""))
}

/// A page of search results.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ListingPageResponse {
    /// Listings on this page
    pub listings: Vec<ListingResponse>,

    /// Matching listings across all pages
    pub total: u64,

    /// Zero-based page index
    pub page: u32,

    /// Results per page
    pub page_size: u32,
}

impl From<ListingPage> for ListingPageResponse {
    fn from(page: ListingPage) -> Self {
        ListingPageResponse {
            listings: page.listings.into_iter().map(Into::into).collect(),
            total: page.total,
            page: page.page.page,
            page_size: page.page.size,
        }
    }
}

/// Search Listings Handler
///
/// Returns open listings matching every given filter.
#[endpoint(
    tags("listings"),
    summary = "Search Listings",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Matching listings"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid filter"),
    ),
)]
pub(crate) async fn handler(
    filters: SearchQuery,
    depot: &mut Depot,
) -> Result<Json<ListingPageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let search = filters.into_search()?;

    let page = state
        .app
        .listings
        .search_listings(search, Timestamp::now())
        .await
        .map_err(into_status_error)?;

    Ok(Json(page.into()))
}

#[cfg(test)]
mod tests {
    use marketplace::{listings::ListingUuid, search::PageRequest};
    use marketplace_app::domain::listings::ListingsServiceError;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, make_listing};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        mocks.service(Router::with_path("listings").get(handler))
    }

    #[tokio::test]
    async fn filters_are_passed_through() -> TestResult {
        let listing = make_listing(ListingUuid::new());
        let closes_from: Timestamp = "2030-01-01T00:00:00Z".parse()?;

        let mut mocks = Mocks::default();
        mocks
            .listings
            .expect_search_listings()
            .once()
            .withf(move |search, _| {
                *search
                    == SearchListings {
                        query: Some("oat milk".to_owned()),
                        business_types: vec![
                            "RetailTrade".to_owned(),
                            "CharitableOrganisation".to_owned(),
                        ],
                        min_price: Some(100),
                        max_price: None,
                        closes_from: Some(closes_from),
                        closes_to: None,
                        barcode: None,
                        order_by: Some("priceASC".to_owned()),
                        page: Some(1),
                        page_size: Some(5),
                    }
            })
            .return_once(move |_, _| {
                Ok(ListingPage {
                    listings: vec![listing],
                    total: 6,
                    page: PageRequest { page: 1, size: 5 },
                })
            });

        let mut res = TestClient::get(
            "http://example.com/listings?query=oat%20milk&business_types=RetailTrade,%20CharitableOrganisation\
             &min_price=100&closes_from=2030-01-01T00:00:00Z&order_by=priceASC&page=1&page_size=5",
        )
        .send(&make_service(mocks))
        .await;

        let body: ListingPageResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.listings.len(), 1);
        assert_eq!(body.total, 6);
        assert_eq!((body.page, body.page_size), (1, 5));

        Ok(())
    }

    #[tokio::test]
    async fn no_filters_search_everything_open() -> TestResult {
        let mut mocks = Mocks::default();
        mocks
            .listings
            .expect_search_listings()
            .once()
            .withf(|search, _| *search == SearchListings::default())
            .return_once(|_, _| {
                Ok(ListingPage {
                    listings: Vec::new(),
                    total: 0,
                    page: PageRequest::default(),
                })
            });

        let mut res = TestClient::get("http://example.com/listings")
            .send(&make_service(mocks))
            .await;

        let body: ListingPageResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.page_size, 10);

        Ok(())
    }

    #[tokio::test]
    async fn or_queries_return_400() {
        let mut mocks = Mocks::default();
        mocks
            .listings
            .expect_search_listings()
            .once()
            .return_once(|_, _| {
                Err(ListingsServiceError::InvalidArgument(
                    "OR is not supported".to_owned(),
                ))
            });

        let res = TestClient::get("http://example.com/listings?query=oat%20OR%20soy")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn malformed_dates_return_400() {
        let res = TestClient::get("http://example.com/listings?closes_to=tomorrow")
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn blank_list_entries_are_dropped() {
        assert_eq!(split_list("a,, b ,"), vec!["a".to_owned(), "b".to_owned()]);
    }
}
