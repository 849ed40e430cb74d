//! Response envelope types shared by every backend endpoint.

use serde::{Deserialize, Serialize};

/// Standard envelope wrapping every backend payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    pub number: u32,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.number.saturating_add(1) >= self.total_pages
    }
}
