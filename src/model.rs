//! Sales record model.
//!
//! One [`SalesRecord`] per source transaction. Measures are exact decimals;
//! they only become floats when a record is rendered through [`RecordView`].

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Date format used by the CSV feed and the JSON API.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Scale of the `sales` and `profit` measures.
pub const MONEY_SCALE: u32 = 2;

/// Scale of the `discount` measure.
pub const DISCOUNT_SCALE: u32 = 4;

/// A single sales transaction as stored in the `sales` table.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    /// Generated primary key, distinct from the source-provided identifiers.
    pub id: Uuid,
    pub no: Option<i32>,
    /// Source row identifier, unique when present.
    pub row_id: Option<i32>,
    /// Order identifier; never null, shared by all lines of an order.
    pub order_id: String,
    pub order_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub ship_mode: String,
    pub customer_id: String,
    pub customer_name: String,
    pub segment: String,
    pub country: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub region: String,
    pub product_id: String,
    pub category: String,
    pub sub_category: String,
    pub product_name: String,
    /// Sale amount, 2 decimal places.
    pub sales: Decimal,
    pub quantity: i32,
    /// Discount rate, 4 decimal places.
    pub discount: Decimal,
    /// Profit amount, 2 decimal places.
    pub profit: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SalesRecord {
    /// Create an empty record for `order_id`, stamped with `at`.
    ///
    /// Dimensional fields start empty and measures at zero; callers fill in
    /// what the source provides.
    pub fn new(order_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            no: None,
            row_id: None,
            order_id: order_id.into(),
            order_date: None,
            ship_date: None,
            ship_mode: String::new(),
            customer_id: String::new(),
            customer_name: String::new(),
            segment: String::new(),
            country: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            region: String::new(),
            product_id: String::new(),
            category: String::new(),
            sub_category: String::new(),
            product_name: String::new(),
            sales: Decimal::ZERO,
            quantity: 0,
            discount: Decimal::ZERO,
            profit: Decimal::ZERO,
            created_at: at,
            updated_at: at,
        }
    }

    /// JSON view of this record using the feed's field names.
    pub fn view(&self) -> RecordView<'_> {
        RecordView(self)
    }
}

/// Serializes a [`SalesRecord`] with the feed's field names.
///
/// Dates render as `MM/DD/YYYY` (or null) and measures as JSON numbers.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a>(&'a SalesRecord);

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "PascalCase")]
        struct Wire<'a> {
            no: Option<i32>,
            #[serde(rename = "RowID")]
            row_id: Option<i32>,
            #[serde(rename = "OrderID")]
            order_id: &'a str,
            order_date: Option<String>,
            ship_date: Option<String>,
            ship_mode: &'a str,
            #[serde(rename = "CustomerID")]
            customer_id: &'a str,
            customer_name: &'a str,
            segment: &'a str,
            country: &'a str,
            city: &'a str,
            state: &'a str,
            postal_code: &'a str,
            region: &'a str,
            #[serde(rename = "ProductID")]
            product_id: &'a str,
            category: &'a str,
            sub_category: &'a str,
            product_name: &'a str,
            #[serde(with = "rust_decimal::serde::float")]
            sales: Decimal,
            quantity: i32,
            #[serde(with = "rust_decimal::serde::float")]
            discount: Decimal,
            #[serde(with = "rust_decimal::serde::float")]
            profit: Decimal,
        }

        let r = self.0;
        let format_date = |d: Option<NaiveDate>| d.map(|d| d.format(DATE_FORMAT).to_string());

        Wire {
            no: r.no,
            row_id: r.row_id,
            order_id: &r.order_id,
            order_date: format_date(r.order_date),
            ship_date: format_date(r.ship_date),
            ship_mode: &r.ship_mode,
            customer_id: &r.customer_id,
            customer_name: &r.customer_name,
            segment: &r.segment,
            country: &r.country,
            city: &r.city,
            state: &r.state,
            postal_code: &r.postal_code,
            region: &r.region,
            product_id: &r.product_id,
            category: &r.category,
            sub_category: &r.sub_category,
            product_name: &r.product_name,
            sales: r.sales,
            quantity: r.quantity,
            discount: r.discount,
            profit: r.profit,
        }
        .serialize(serializer)
    }
}
