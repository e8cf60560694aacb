//! Receipt field extraction.
//!
//! Receipts have no item table header, so every line is tried against a
//! `<text> <qty> <amount>` shape first and a bare `<text> <amount>` shape second,
//! with a wider exclusion list on the second to keep totals and tenders out.
//! Stray numeric lines that slip through are accepted as items.

use rust_decimal::Decimal;
use tracing::trace;

use super::patterns::{
    contains_marker, first_capture, HEADER_ARTIFACTS, RECEIPT_DATES, RECEIPT_ITEM,
    RECEIPT_ITEM_WITH_QTY, RECEIPT_NUMBERS, SUMMARY_LINES,
};
use super::{parse_amount, DocumentFieldParser};
use crate::models::document::LineItem;

/// Minimum description length for lines without a quantity.
const MIN_BARE_DESCRIPTION_LEN: usize = 4;

/// Parser for store receipts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReceiptFieldParser;

impl ReceiptFieldParser {
    pub fn new() -> Self {
        Self
    }

    /// `<description> <qty> <amount>`; the unit rate is derived from the total.
    ///
    /// `Some(None)` means the shape matched but the line was rejected.
    fn parse_with_quantity(line: &str) -> Option<Option<LineItem>> {
        let caps = RECEIPT_ITEM_WITH_QTY.captures(line)?;

        let description = caps[1].trim();
        if contains_marker(description, HEADER_ARTIFACTS) {
            return Some(None);
        }

        let (Ok(quantity), Some(amount)) = (caps[2].parse::<u32>(), parse_amount(&caps[3])) else {
            return Some(None);
        };
        let unit_rate = if quantity == 0 {
            amount
        } else {
            amount / Decimal::from(quantity)
        };
        Some(Some(LineItem::new(description, quantity, unit_rate, amount)))
    }

    /// `<description> <amount>`; a single unit.
    fn parse_bare_amount(line: &str) -> Option<LineItem> {
        let caps = RECEIPT_ITEM.captures(line)?;

        let description = caps[1].trim();
        if description.chars().count() < MIN_BARE_DESCRIPTION_LEN
            || contains_marker(description, SUMMARY_LINES)
        {
            return None;
        }

        let amount = parse_amount(&caps[2])?;
        Some(LineItem::new(description, 1, amount, amount))
    }
}

impl DocumentFieldParser for ReceiptFieldParser {
    fn extract_date(&self, text: &str) -> String {
        first_capture(text, &*RECEIPT_DATES)
            .map(|raw| normalize_date(&raw))
            .unwrap_or_default()
    }

    fn extract_document_number(&self, text: &str) -> String {
        first_capture(text, &*RECEIPT_NUMBERS).unwrap_or_default()
    }

    fn extract_items(&self, text: &str) -> Vec<LineItem> {
        let mut items = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let item = match Self::parse_with_quantity(line) {
                Some(decided) => decided,
                None => Self::parse_bare_amount(line),
            };

            match item {
                Some(item) => items.push(item),
                None => trace!("No item on line: {}", line),
            }
        }

        items
    }
}

/// Rewrite `M/D/YYYY` and `MM-DD-YYYY` into zero-padded `MM/DD/YYYY`.
///
/// Calendar validity is not checked here; the price history drops impossible dates.
fn normalize_date(raw: &str) -> String {
    let parts: Vec<&str> = raw.split(['/', '-']).collect();
    match parts.as_slice() {
        [month, day, year] => format!("{:0>2}/{:0>2}/{}", month, day, year),
        _ => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bare_amount_line() {
        let parser = ReceiptFieldParser::new();
        let items = parser.extract_items("TURMERIC POWDER 8.99");
        assert_eq!(
            items,
            vec![LineItem::new("TURMERIC POWDER", 1, Decimal::new(899, 2), Decimal::new(899, 2))]
        );
    }

    #[test]
    fn test_summary_lines_are_not_items() {
        let parser = ReceiptFieldParser::new();
        let text = "TOTAL 45.00\nSales Tax 2.10\nCASH 50.00\nChange Due 5.00\nVisa Credit 45.00\n";
        assert!(parser.extract_items(text).is_empty());
    }

    #[test]
    fn test_quantity_line_derives_unit_rate() {
        let parser = ReceiptFieldParser::new();
        let items = parser.extract_items("MANGO PULP 3 7.50");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "MANGO PULP");
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].unit_rate, Decimal::new(250, 2));
        assert_eq!(items[0].amount, Decimal::new(750, 2));
    }

    #[test]
    fn test_zero_quantity_keeps_amount() {
        let parser = ReceiptFieldParser::new();
        let items = parser.extract_items("PAPAD 0 3.00");
        assert_eq!(items[0].quantity, 0);
        assert_eq!(items[0].unit_rate, Decimal::new(300, 2));
    }

    #[test]
    fn test_short_description_rejected() {
        let parser = ReceiptFieldParser::new();
        assert!(parser.extract_items("ABC 1.00").is_empty());
        assert_eq!(parser.extract_items("ABCD 1.00").len(), 1);
    }

    #[test]
    fn test_rejected_quantity_line_not_retried() {
        let parser = ReceiptFieldParser::new();
        // Would pass as a bare amount with description "SHIP TO DOCK 4"
        assert!(parser.extract_items("SHIP TO DOCK 4 12.00").is_empty());
    }

    #[test]
    fn test_quantity_line_keeps_summary_words() {
        let parser = ReceiptFieldParser::new();
        let items = parser.extract_items("SUBTOTAL 2 45.00");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].description, "SUBTOTAL");
    }

    #[test]
    fn test_receipt_dates() {
        let parser = ReceiptFieldParser::new();
        assert_eq!(parser.extract_date("DATE 02/03/2024"), "02/03/2024");
        assert_eq!(parser.extract_date("Date:02/04/2024"), "02/04/2024");
        assert_eq!(parser.extract_date("Sold 02/05/2024 10:31"), "02/05/2024");
        assert_eq!(parser.extract_date("Sold 2/6/2024 10:31"), "02/06/2024");
        assert_eq!(parser.extract_date("Sold 02-07-2024"), "02/07/2024");
        assert_eq!(parser.extract_date("no date"), "");
    }

    #[test]
    fn test_receipt_numbers() {
        let parser = ReceiptFieldParser::new();
        assert_eq!(parser.extract_document_number("RECEIPT 5531"), "5531");
        assert_eq!(parser.extract_document_number("Receipt # 88"), "88");
        assert_eq!(parser.extract_document_number("REF#412"), "412");
        assert_eq!(parser.extract_document_number("Reference 9001"), "9001");
        assert_eq!(parser.extract_document_number("Order 12"), "");
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("1/5/2024"), "01/05/2024");
        assert_eq!(normalize_date("12-31-2023"), "12/31/2023");
        assert_eq!(normalize_date("12/31/2023"), "12/31/2023");
    }
}
