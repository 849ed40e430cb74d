//! Product catalog endpoints.

use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::models::{ApiEnvelope, Page};
use crate::client::ApiClient;
use crate::error::Result;

const PRODUCTS: &str = "/api/products";

/// Body of product create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub active: bool,
    pub initial_stock: u32,
    pub low_stock_threshold: u32,
}

/// A product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub category_id: Option<u64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub active: bool,
    pub quantity: i64,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

/// Catalog counters shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    pub out_of_stock: u64,
}

/// Filters and paging for [`ProductService::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category_id: Option<u64>,
    pub page: u32,
    pub size: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            category_id: None,
            page: 0,
            size: 20,
        }
    }
}

impl ProductQuery {
    fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(id) = self.category_id {
            pairs.push(("categoryId", id.to_string()));
        }
        pairs
    }
}

/// Typed access to `/api/products`.
#[derive(Clone, Copy)]
pub struct ProductService<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ProductQuery) -> Result<ApiEnvelope<Page<ProductResponse>>> {
        let pairs = query.pairs();
        let pairs: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.client.get_json(PRODUCTS, &pairs).await
    }

    pub async fn get(&self, id: u64) -> Result<ApiEnvelope<ProductResponse>> {
        self.client.get_json(&format!("{PRODUCTS}/{id}"), &[]).await
    }

    pub async fn by_barcode(&self, barcode: &str) -> Result<ApiEnvelope<ProductResponse>> {
        self.client
            .get_json(&format!("{PRODUCTS}/barcode/{barcode}"), &[])
            .await
    }

    pub async fn create(&self, product: &ProductRequest) -> Result<ApiEnvelope<ProductResponse>> {
        self.client.send_json(Method::POST, PRODUCTS, product).await
    }

    pub async fn update(
        &self,
        id: u64,
        product: &ProductRequest,
    ) -> Result<ApiEnvelope<ProductResponse>> {
        self.client
            .send_json(Method::PUT, &format!("{PRODUCTS}/{id}"), product)
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<ApiEnvelope<Option<Value>>> {
        let response = self.client.delete(&format!("{PRODUCTS}/{id}")).await?;
        crate::client::decode(&response)
    }

    /// Dashboard counters. Failures are silent: the dashboard renders
    /// without them.
    pub async fn stats(&self) -> Result<ApiEnvelope<ProductStats>> {
        self.client
            .get_json_silent(&format!("{PRODUCTS}/stats"), &[])
            .await
    }

    /// Which of `skus` already exist. Blank entries are not sent.
    pub async fn bulk_check_skus(&self, skus: &[&str]) -> Result<ApiEnvelope<Vec<String>>> {
        let skus: Vec<&str> = skus.iter().copied().filter(|s| !s.trim().is_empty()).collect();
        self.client
            .send_json(Method::POST, &format!("{PRODUCTS}/bulk-check"), &skus)
            .await
    }
}
