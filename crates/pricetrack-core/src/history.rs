//! Chronological per-item price history.

use chrono::NaiveDate;
use tracing::debug;

use crate::models::document::Document;
use crate::models::price::{PriceRecord, DOCUMENT_DATE_FORMAT};

/// Flatten the items of `documents` into price records sorted by item name, then date.
///
/// Records from documents whose date does not parse as `MM/DD/YYYY` are dropped.
/// The sort is stable: same-item, same-date records keep document order.
pub fn build_price_history<'a, I>(documents: I) -> Vec<PriceRecord>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut records = Vec::new();
    let mut dropped = 0usize;

    for document in documents {
        let date = match NaiveDate::parse_from_str(&document.date, DOCUMENT_DATE_FORMAT) {
            Ok(date) => date,
            Err(e) => {
                debug!(
                    "Dropping {} items from {}: unparseable date '{}' ({})",
                    document.items.len(),
                    document.file_name,
                    document.date,
                    e
                );
                dropped += document.items.len();
                continue;
            }
        };

        records.extend(document.items.iter().map(|item| PriceRecord {
            item_name: item.description.clone(),
            date,
            unit_rate: item.unit_rate,
            document_number: document.document_number.clone(),
            document_type: document.document_type,
        }));
    }

    records.sort_by(|a, b| a.item_name.cmp(&b.item_name).then(a.date.cmp(&b.date)));

    debug!("Built price history of {} records ({} dropped)", records.len(), dropped);
    records
}
