use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, instrument};

use crate::api::DashboardStats;
use crate::clients::ReportApi;
use crate::domain::Invoice;
use crate::error::RemoteError;

/// Read-only client for the cashier dashboard and invoice reports.
#[derive(Clone)]
pub struct ReportClient {
    inner: Arc<dyn ReportApi>,
}

impl ReportClient {
    pub fn new(inner: Arc<dyn ReportApi>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, RemoteError> {
        debug!("Sending request");
        self.inner.dashboard_stats().await
    }

    /// Invoices issued within the inclusive date range.
    #[instrument(skip(self))]
    pub async fn invoices_by_date(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Invoice>, RemoteError> {
        debug!("Sending request");
        self.inner.invoices_by_date(start, end).await
    }
}
