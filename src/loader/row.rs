//! Typed decoding of one CSV row into a [`SalesRecord`].
//!
//! Every source column is looked up by header name once per file; each row is
//! then decoded field by field through [`Column`] positions. Blank cells count
//! as missing.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use csv::StringRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::model::{SalesRecord, DATE_FORMAT, DISCOUNT_SCALE, MONEY_SCALE};

/// Why a single row could not be decoded. The row is skipped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
    #[error("column {column} not present in header")]
    MissingColumn { column: &'static str },

    #[error("invalid date in {column}: '{value}'")]
    InvalidDate { column: &'static str, value: String },

    #[error("invalid integer in {column}: '{value}'")]
    InvalidInteger { column: &'static str, value: String },

    #[error("invalid decimal in {column}: '{value}'")]
    InvalidDecimal { column: &'static str, value: String },
}

/// Header names of the feed, in feed order.
pub const SOURCE_COLUMNS: [&str; 22] = [
    "No",
    "RowID",
    "OrderID",
    "OrderDate",
    "ShipDate",
    "ShipMode",
    "CustomerID",
    "CustomerName",
    "Segment",
    "Country",
    "City",
    "State",
    "Postal Code",
    "Region",
    "ProductID",
    "Category",
    "Sub-Category",
    "ProductName",
    "Sales",
    "Quantity",
    "Discount",
    "Profit",
];

/// Source column, discriminant equal to its slot in [`SOURCE_COLUMNS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    No,
    RowId,
    OrderId,
    OrderDate,
    ShipDate,
    ShipMode,
    CustomerId,
    CustomerName,
    Segment,
    Country,
    City,
    State,
    PostalCode,
    Region,
    ProductId,
    Category,
    SubCategory,
    ProductName,
    Sales,
    Quantity,
    Discount,
    Profit,
}

impl Column {
    pub fn name(self) -> &'static str {
        SOURCE_COLUMNS[self as usize]
    }
}

/// Position of each source column within a row.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: [Option<usize>; SOURCE_COLUMNS.len()],
}

impl ColumnIndex {
    /// Locate every source column in `headers`. Absent columns are recorded;
    /// rows decoded against them fail with [`RowError::MissingColumn`].
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut positions = [None; SOURCE_COLUMNS.len()];
        for (slot, name) in positions.iter_mut().zip(SOURCE_COLUMNS) {
            *slot = headers.iter().position(|h| h.trim() == name);
        }
        Self { positions }
    }

    /// Source columns absent from the header.
    pub fn missing(&self) -> Vec<&'static str> {
        SOURCE_COLUMNS
            .iter()
            .zip(&self.positions)
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| *name)
            .collect()
    }

    fn cell<'r>(
        &self,
        row: &'r StringRecord,
        column: Column,
    ) -> Result<Option<&'r str>, RowError> {
        let pos = self.positions[column as usize].ok_or(RowError::MissingColumn {
            column: column.name(),
        })?;
        Ok(row.get(pos).map(str::trim).filter(|v| !v.is_empty()))
    }
}

/// Decode one row, stamping the record with `at`.
pub fn decode_row(
    columns: &ColumnIndex,
    row: &StringRecord,
    at: DateTime<Utc>,
) -> Result<SalesRecord, RowError> {
    let text = |column| {
        columns
            .cell(row, column)
            .map(|v| v.unwrap_or_default().to_string())
    };
    let integer_at = |column| -> Result<Option<i32>, RowError> {
        integer(columns.cell(row, column)?, column)
    };
    let date_at = |column| -> Result<Option<NaiveDate>, RowError> {
        date(columns.cell(row, column)?, column)
    };
    let decimal_at = |column, scale| -> Result<Decimal, RowError> {
        decimal(columns.cell(row, column)?, column, scale)
    };

    let mut record = SalesRecord::new(text(Column::OrderId)?, at);
    record.no = integer_at(Column::No)?;
    record.row_id = integer_at(Column::RowId)?;
    record.order_date = date_at(Column::OrderDate)?;
    record.ship_date = date_at(Column::ShipDate)?;
    record.ship_mode = text(Column::ShipMode)?;
    record.customer_id = text(Column::CustomerId)?;
    record.customer_name = text(Column::CustomerName)?;
    record.segment = text(Column::Segment)?;
    record.country = text(Column::Country)?;
    record.city = text(Column::City)?;
    record.state = text(Column::State)?;
    record.postal_code = text(Column::PostalCode)?;
    record.region = text(Column::Region)?;
    record.product_id = text(Column::ProductId)?;
    record.category = text(Column::Category)?;
    record.sub_category = text(Column::SubCategory)?;
    record.product_name = text(Column::ProductName)?;
    record.sales = decimal_at(Column::Sales, MONEY_SCALE)?;
    record.quantity = integer_at(Column::Quantity)?.unwrap_or(0);
    record.discount = decimal_at(Column::Discount, DISCOUNT_SCALE)?;
    record.profit = decimal_at(Column::Profit, MONEY_SCALE)?;

    Ok(record)
}

fn date(value: Option<&str>, column: Column) -> Result<Option<NaiveDate>, RowError> {
    value
        .map(|v| {
            NaiveDate::parse_from_str(v, DATE_FORMAT).map_err(|_| RowError::InvalidDate {
                column: column.name(),
                value: v.to_string(),
            })
        })
        .transpose()
}

/// Integer cell; whole-valued decimals such as `"12.0"` are accepted.
fn integer(value: Option<&str>, column: Column) -> Result<Option<i32>, RowError> {
    let Some(v) = value else {
        return Ok(None);
    };

    let invalid = || RowError::InvalidInteger {
        column: column.name(),
        value: v.to_string(),
    };

    if let Ok(n) = v.parse::<i32>() {
        return Ok(Some(n));
    }

    let d = Decimal::from_str(v).map_err(|_| invalid())?;
    if !d.fract().is_zero() {
        return Err(invalid());
    }
    d.to_i32().map(Some).ok_or_else(invalid)
}

/// Decimal cell rounded to `scale`; missing means zero.
fn decimal(value: Option<&str>, column: Column, scale: u32) -> Result<Decimal, RowError> {
    let Some(v) = value else {
        return Ok(Decimal::ZERO);
    };

    Decimal::from_str(v)
        .or_else(|_| Decimal::from_scientific(v))
        .map(|d| d.round_dp(scale))
        .map_err(|_| RowError::InvalidDecimal {
            column: column.name(),
            value: v.to_string(),
        })
}
