//! JSON response bodies.
//!
//! Every body carries a `status` field: `"ok"`/`"success"` on the happy path,
//! `"error"` on failure.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::analytics::{
    CategoryTotals, CustomerTotals, ProductTotals, RegionTotals, SalesSummary, StoreInfo,
};
use crate::loader::LoadReport;
use crate::model::RecordView;

pub const SUCCESS: &str = "success";

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub database: &'static str,
    pub endpoints: &'static [&'static str],
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(flatten)]
    pub report: LoadReport,
}

#[derive(Debug, Serialize)]
pub struct RecordsResponse<'a> {
    pub status: &'static str,
    pub count: usize,
    pub data: Vec<RecordView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub status: &'static str,
    pub summary: SalesSummary,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub status: &'static str,
    pub categories: Vec<CategoryTotals>,
}

#[derive(Debug, Serialize)]
pub struct RegionsResponse {
    pub status: &'static str,
    pub regions: Vec<RegionTotals>,
}

#[derive(Debug, Serialize)]
pub struct CustomersResponse {
    pub status: &'static str,
    pub customers: Vec<CustomerTotals>,
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub status: &'static str,
    pub products: Vec<ProductTotals>,
}

#[derive(Debug, Serialize)]
pub struct DatabaseInfoResponse {
    pub status: &'static str,
    pub database_type: &'static str,
    pub version: String,
    pub total_records_in_sales_table: i64,
    pub sales_table_size: String,
    pub recent_activity_last_hour: i64,
    pub connection_status: &'static str,
}

impl From<StoreInfo> for DatabaseInfoResponse {
    fn from(info: StoreInfo) -> Self {
        Self {
            status: SUCCESS,
            database_type: info.engine,
            version: info.version,
            total_records_in_sales_table: info.record_count,
            sales_table_size: info.table_size,
            recent_activity_last_hour: info.recent_activity,
            connection_status: "active",
        }
    }
}

/// A failed request: HTTP 500 with `{status: "error", message}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    message: String,
    connection_failed: bool,
}

impl ApiError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            connection_failed: false,
        }
    }

    /// Failure talking to the database; the body also reports
    /// `connection_status: "failed"`.
    pub fn connection(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            connection_failed: true,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    connection_status: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error",
            message: &self.message,
            connection_status: self.connection_failed.then_some("failed"),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
