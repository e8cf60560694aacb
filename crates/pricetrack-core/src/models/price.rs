//! Price history and price change models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::document::DocumentType;

/// Date format used on documents and in the price change table.
pub const DOCUMENT_DATE_FORMAT: &str = "%m/%d/%Y";

/// One observation of an item's unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// Item description, compared as an exact string.
    pub item_name: String,

    /// Date of the document the price was seen on.
    pub date: NaiveDate,

    /// Unit price on that date.
    pub unit_rate: Decimal,

    /// Number of the source document.
    pub document_number: String,

    /// Kind of the source document.
    pub document_type: DocumentType,
}

/// A change in unit price between two consecutive purchases of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChangeEvent {
    pub item_name: String,
    pub previous_date: NaiveDate,
    pub current_date: NaiveDate,
    pub previous_price: Decimal,
    pub current_price: Decimal,
    /// `current_price - previous_price`.
    pub price_change: Decimal,
    /// Change relative to the previous price, in percent, rounded half-to-even to 2 places.
    pub percentage_change: Decimal,
}

impl PriceChangeEvent {
    pub fn is_increase(&self) -> bool {
        self.percentage_change > Decimal::ZERO
    }

    pub fn is_decrease(&self) -> bool {
        self.percentage_change < Decimal::ZERO
    }
}
