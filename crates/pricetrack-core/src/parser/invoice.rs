//! Invoice field extraction.

use tracing::trace;

use super::patterns::{
    contains_marker, HEADER_ARTIFACTS, INVOICE_DATE, INVOICE_ITEM, INVOICE_NUMBER,
};
use super::{parse_amount, DocumentFieldParser};
use crate::models::document::LineItem;

/// Parser for supplier invoices laid out as a DESCRIPTION / QTY / RATE / AMOUNT table.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvoiceFieldParser;

impl InvoiceFieldParser {
    pub fn new() -> Self {
        Self
    }

    fn is_table_header(line: &str) -> bool {
        line.contains("DESCRIPTION") && line.contains("QTY") && line.contains("RATE")
    }

    fn is_table_end(line: &str) -> bool {
        line.contains("VERIFIED") || line.contains("TOTAL DUE") || line.contains("PAYMENT")
    }

    fn parse_item_line(line: &str) -> Option<LineItem> {
        let caps = INVOICE_ITEM.captures(line)?;

        let description = caps[1].trim();
        if contains_marker(description, HEADER_ARTIFACTS) {
            trace!("Discarding header artifact: {}", line);
            return None;
        }

        let quantity: u32 = caps[2].parse().ok()?;
        let unit_rate = parse_amount(&caps[3])?;
        let amount = parse_amount(&caps[4])?;

        Some(LineItem::new(description, quantity, unit_rate, amount))
    }
}

impl DocumentFieldParser for InvoiceFieldParser {
    fn extract_date(&self, text: &str) -> String {
        INVOICE_DATE
            .captures(text)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default()
    }

    fn extract_document_number(&self, text: &str) -> String {
        INVOICE_NUMBER
            .captures(text)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default()
    }

    fn extract_items(&self, text: &str) -> Vec<LineItem> {
        let mut items = Vec::new();
        let mut in_table = false;

        for line in text.lines() {
            let line = line.trim();

            // A repeated header on a later page reopens the table
            if Self::is_table_header(line) {
                in_table = true;
                continue;
            }

            if Self::is_table_end(line) {
                in_table = false;
                continue;
            }

            if !in_table || line.is_empty() {
                continue;
            }

            match Self::parse_item_line(line) {
                Some(item) => items.push(item),
                None => trace!("No item on line: {}", line),
            }
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    const SAMPLE: &str = r#"
        SPICE TRADERS LLC
        INVOICE 10452
        DATE 01/15/2024
        BILL TO 1 2.00 2.00
        DESCRIPTION QTY RATE AMOUNT
        BASMATI RICE 5LB  10  12.50  125.00
        TURMERIC POWDER 400G 6 3.25 19.50

        SHIP TO WAREHOUSE 1 0.00 0.00
        Continued on next page
        CHANA DAL 2 4.1.0 8.20
        VERIFIED BY
        GHEE 1 9.99 9.99
        TOTAL DUE 144.50
    "#;

    #[test]
    fn test_extract_header_fields() {
        let parser = InvoiceFieldParser::new();
        assert_eq!(parser.extract_document_number(SAMPLE), "10452");
        assert_eq!(parser.extract_date(SAMPLE), "01/15/2024");
    }

    #[test]
    fn test_missing_header_fields_are_empty() {
        let parser = InvoiceFieldParser::new();
        assert_eq!(parser.extract_document_number("no number"), "");
        assert_eq!(parser.extract_date("Date: 2024-01-15"), "");
    }

    #[test]
    fn test_single_item_line() {
        let parser = InvoiceFieldParser::new();
        let text = "DESCRIPTION QTY RATE AMOUNT\nBASMATI RICE 5LB  10  12.50  125.00\n";

        let items = parser.extract_items(text);
        assert_eq!(
            items,
            vec![LineItem::new(
                "BASMATI RICE 5LB",
                10,
                Decimal::new(1250, 2),
                Decimal::new(12500, 2),
            )]
        );
    }

    #[test]
    fn test_items_only_inside_table() {
        let parser = InvoiceFieldParser::new();
        let items = parser.extract_items(SAMPLE);

        let names: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(names, vec!["BASMATI RICE 5LB", "TURMERIC POWDER 400G"]);
        assert_eq!(items[1].quantity, 6);
        assert_eq!(items[1].unit_rate, Decimal::new(325, 2));
    }

    #[test]
    fn test_header_on_next_page_reopens_table() {
        let parser = InvoiceFieldParser::new();
        let text = "\
DESCRIPTION QTY RATE AMOUNT
RICE 2 10.00 20.00
PAYMENT TERMS NET 30
INVOICE 7 page 2
DESCRIPTION QTY RATE AMOUNT
DAL 3 4.00 12.00
TOTAL DUE 32.00
";
        let items = parser.extract_items(text);
        let names: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(names, vec!["RICE", "DAL"]);
    }

    #[test]
    fn test_amount_is_not_recomputed() {
        let parser = InvoiceFieldParser::new();
        let text = "DESCRIPTION QTY RATE AMOUNT\nSALT 3 1.00 5.00\n";

        let items = parser.extract_items(text);
        assert_eq!(items[0].amount, Decimal::new(500, 2));
        assert_eq!(items[0].unit_rate, Decimal::new(100, 2));
    }

    #[test]
    fn test_no_table_header_yields_nothing() {
        let parser = InvoiceFieldParser::new();
        assert!(parser.extract_items("RICE 2 10.00 20.00\n").is_empty());
    }
}
