//! Sales report endpoints.

use serde::{Deserialize, Serialize};

use crate::client::models::ApiEnvelope;
use crate::client::ApiClient;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductEntry {
    pub product_id: u64,
    pub product_name: String,
    pub units_sold: u64,
}

/// Aggregated sales for one day or month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReportResponse {
    pub period: String,
    pub total_orders: u64,
    pub total_revenue: f64,
    pub average_order_value: f64,
    #[serde(default)]
    pub top_products: Vec<TopProductEntry>,
}

/// Typed access to `/api/reports`.
#[derive(Clone, Copy)]
pub struct ReportService<'a> {
    client: &'a ApiClient,
}

impl<'a> ReportService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Report for `date` (`YYYY-MM-DD`), or today when absent.
    pub async fn daily(&self, date: Option<&str>) -> Result<ApiEnvelope<SalesReportResponse>> {
        let query: Vec<(&str, &str)> = date.map(|d| ("date", d)).into_iter().collect();
        self.client.get_json("/api/reports/sales/daily", &query).await
    }

    /// Report for a month; the backend defaults missing parts to the
    /// current year and month.
    pub async fn monthly(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<ApiEnvelope<SalesReportResponse>> {
        let year = year.map(|y| y.to_string());
        let month = month.map(|m| m.to_string());
        let mut query = Vec::new();
        if let Some(year) = year.as_deref() {
            query.push(("year", year));
        }
        if let Some(month) = month.as_deref() {
            query.push(("month", month));
        }
        self.client.get_json("/api/reports/sales/monthly", &query).await
    }
}
