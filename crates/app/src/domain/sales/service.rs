//! Sales service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use marketplace::{
    actors::{Actor, Capability},
    businesses::BusinessUuid,
    reports::{Granularity, ReportRange, ReportRow, plan_buckets, summarise, to_civil},
    sales::SoldListing,
    search::PageRequest,
};
use mockall::automock;
use tracing::info;

use crate::domain::{
    directory::DirectoryRepository,
    sales::{SalesServiceError, data::SalesReportRequest, repository::SalesRepository},
};

/// Reads over the sold-listing archive.
#[derive(Clone)]
pub struct SalesReports {
    sales: Arc<dyn SalesRepository>,
    directory: Arc<dyn DirectoryRepository>,
}

impl SalesReports {
    #[must_use]
    pub fn new(sales: Arc<dyn SalesRepository>, directory: Arc<dyn DirectoryRepository>) -> Self {
        Self { sales, directory }
    }

    async fn authorise(&self, actor: &Actor, business: BusinessUuid) -> Result<(), SalesServiceError> {
        if !actor.permits(&Capability::ViewSalesReport(business)) {
            return Err(SalesServiceError::Forbidden);
        }

        self.directory
            .find_business(business)
            .await?
            .ok_or(SalesServiceError::NotFound)?;

        Ok(())
    }
}

#[async_trait]
impl ReportsService for SalesReports {
    #[tracing::instrument(
        name = "sales.service.sales_report",
        skip(self, actor, request),
        fields(
            user_uuid = %actor.uuid,
            business_uuid = %business,
            granularity = %request.granularity
        ),
        err
    )]
    async fn sales_report(
        &self,
        actor: &Actor,
        business: BusinessUuid,
        request: SalesReportRequest,
        now: Timestamp,
    ) -> Result<Vec<ReportRow>, SalesServiceError> {
        self.authorise(actor, business).await?;

        let granularity: Granularity = request.granularity.parse()?;
        let range = ReportRange::clamped(request.from, request.to, to_civil(now))?;
        let buckets = plan_buckets(range, granularity)?;
        let (from, until) = range.window()?;

        let sales = self.sales.list_sales(business, from, until).await?;
        let rows = summarise(&buckets, &sales);

        info!(
            business_uuid = %business,
            buckets = rows.len(),
            sales = sales.len(),
            "built sales report"
        );

        Ok(rows)
    }

    async fn sales_history(
        &self,
        actor: &Actor,
        business: BusinessUuid,
        page: PageRequest,
    ) -> Result<Vec<SoldListing>, SalesServiceError> {
        self.authorise(actor, business).await?;

        Ok(self.sales.list_sold_listings(business, page).await?)
    }
}

#[automock]
#[async_trait]
pub trait ReportsService: Send + Sync {
    /// Sales totals for a business, bucketed by period.
    async fn sales_report(
        &self,
        actor: &Actor,
        business: BusinessUuid,
        request: SalesReportRequest,
        now: Timestamp,
    ) -> Result<Vec<ReportRow>, SalesServiceError>;

    /// Archived sales for a business, newest first.
    async fn sales_history(
        &self,
        actor: &Actor,
        business: BusinessUuid,
        page: PageRequest,
    ) -> Result<Vec<SoldListing>, SalesServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::civil::{DateTime, datetime};
    use marketplace::{
        actors::{Role, UserUuid},
        businesses::{Address, BusinessType},
        reports::SaleEntry,
    };
    use testresult::TestResult;

    use super::*;
    use crate::domain::{
        directory::{MockDirectoryRepository, records::BusinessRecord},
        sales::MockSalesRepository,
    };

    fn business(uuid: BusinessUuid) -> BusinessRecord {
        BusinessRecord {
            uuid,
            name: "Harbour Grocer".to_owned(),
            business_type: BusinessType::RetailTrade,
            address: Address {
                street: None,
                city: Some("Wellington".to_owned()),
                region: None,
                country: "New Zealand".to_owned(),
                postcode: None,
            },
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn directory_with(uuid: BusinessUuid) -> MockDirectoryRepository {
        let mut directory = MockDirectoryRepository::new();

        directory
            .expect_find_business()
            .returning(move |_| Ok(Some(business(uuid))));

        directory
    }

    fn request(from: DateTime, to: DateTime, granularity: &str) -> SalesReportRequest {
        SalesReportRequest {
            from,
            to,
            granularity: granularity.to_owned(),
        }
    }

    #[tokio::test]
    async fn monthly_report_covers_the_whole_year() -> TestResult {
        let uuid = BusinessUuid::new();
        let actor = Actor::new(UserUuid::new(), Role::User).administering(uuid);

        let entries = vec![
            SaleEntry {
                sold_at: "2021-03-15T09:30:00Z".parse()?,
                price: 1_250,
            },
            SaleEntry {
                sold_at: "2021-04-02T17:00:00Z".parse()?,
                price: 800,
            },
        ];

        let mut sales = MockSalesRepository::new();
        sales
            .expect_list_sales()
            .once()
            .withf(|_, from, until| {
                from.to_string() == "2021-01-01T00:00:00Z"
                    && until.to_string() == "2021-12-31T23:59:59.999Z"
            })
            .return_once(move |_, _, _| Ok(entries));

        let reports = SalesReports::new(Arc::new(sales), Arc::new(directory_with(uuid)));

        let rows = reports
            .sales_report(
                &actor,
                uuid,
                request(
                    datetime(2021, 1, 1, 0, 0, 0, 0),
                    datetime(2021, 12, 31, 0, 0, 0, 0),
                    "Monthly",
                ),
                "2025-06-01T00:00:00Z".parse()?,
            )
            .await?;

        assert_eq!(rows.len(), 12);
        assert_eq!(rows.first().map(|row| row.label.as_str()), Some("January 2021"));
        assert_eq!(rows.last().map(|row| row.label.as_str()), Some("December 2021"));

        let totals: Vec<_> = rows
            .iter()
            .map(|row| (row.total_sales, row.total_revenue))
            .collect();

        assert_eq!(totals.get(2), Some(&(1, 1_250)), "March");
        assert_eq!(totals.get(3), Some(&(1, 800)), "April");
        assert_eq!(
            totals.iter().map(|(count, _)| count).sum::<u64>(),
            2,
            "no other month has sales"
        );

        Ok(())
    }

    #[tokio::test]
    async fn report_range_is_clamped_to_epoch_and_now() -> TestResult {
        let uuid = BusinessUuid::new();
        let actor = Actor::new(UserUuid::new(), Role::Admin);

        let mut sales = MockSalesRepository::new();
        sales
            .expect_list_sales()
            .once()
            .withf(|_, from, until| {
                from.to_string() == "2021-01-01T00:00:00Z"
                    && until.to_string() == "2022-03-10T23:59:59.999Z"
            })
            .returning(|_, _, _| Ok(Vec::new()));

        let reports = SalesReports::new(Arc::new(sales), Arc::new(directory_with(uuid)));

        let rows = reports
            .sales_report(
                &actor,
                uuid,
                request(
                    datetime(2019, 1, 1, 0, 0, 0, 0),
                    datetime(2030, 1, 1, 0, 0, 0, 0),
                    "yearly",
                ),
                "2022-03-10T12:00:00Z".parse()?,
            )
            .await?;

        let labels: Vec<_> = rows.iter().map(|row| row.label.as_str()).collect();
        assert_eq!(labels, vec!["2021", "2022"]);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_granularity_is_invalid() -> TestResult {
        let uuid = BusinessUuid::new();
        let actor = Actor::new(UserUuid::new(), Role::Admin);

        let mut sales = MockSalesRepository::new();
        sales.expect_list_sales().never();

        let reports = SalesReports::new(Arc::new(sales), Arc::new(directory_with(uuid)));

        let result = reports
            .sales_report(
                &actor,
                uuid,
                request(
                    datetime(2021, 1, 1, 0, 0, 0, 0),
                    datetime(2021, 2, 1, 0, 0, 0, 0),
                    "Fortnightly",
                ),
                "2022-01-01T00:00:00Z".parse()?,
            )
            .await;

        assert!(matches!(result, Err(SalesServiceError::InvalidArgument(_))));

        Ok(())
    }

    #[tokio::test]
    async fn other_businesses_are_forbidden() -> TestResult {
        let mut directory = MockDirectoryRepository::new();
        directory.expect_find_business().never();

        let reports = SalesReports::new(Arc::new(MockSalesRepository::new()), Arc::new(directory));

        let result = reports
            .sales_history(
                &Actor::new(UserUuid::new(), Role::User),
                BusinessUuid::new(),
                PageRequest::default(),
            )
            .await;

        assert!(matches!(result, Err(SalesServiceError::Forbidden)));

        Ok(())
    }

    #[tokio::test]
    async fn missing_businesses_are_not_found() -> TestResult {
        let mut directory = MockDirectoryRepository::new();
        directory
            .expect_find_business()
            .once()
            .returning(|_| Ok(None));

        let reports = SalesReports::new(Arc::new(MockSalesRepository::new()), Arc::new(directory));

        let result = reports
            .sales_history(
                &Actor::new(UserUuid::new(), Role::DefaultAdmin),
                BusinessUuid::new(),
                PageRequest::default(),
            )
            .await;

        assert!(matches!(result, Err(SalesServiceError::NotFound)));

        Ok(())
    }
}
