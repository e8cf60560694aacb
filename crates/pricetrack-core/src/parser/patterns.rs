//! Regex patterns for invoice and receipt field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice header fields
    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"DATE\s+(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"INVOICE\s+(\d+)"
    ).unwrap();

    // DESCRIPTION QTY RATE AMOUNT
    pub static ref INVOICE_ITEM: Regex = Regex::new(
        r"^(.+?)\s+(\d+)\s+([\d.]+)\s+([\d.]+)$"
    ).unwrap();

    // Receipt dates, most specific first
    pub static ref RECEIPT_DATES: [Regex; 5] = [
        Regex::new(r"DATE\s+(\d{2}/\d{2}/\d{4})").unwrap(),
        Regex::new(r"Date:\s*(\d{2}/\d{2}/\d{4})").unwrap(),
        Regex::new(r"(\d{2}/\d{2}/\d{4})").unwrap(),
        Regex::new(r"(\d{1,2}/\d{1,2}/\d{4})").unwrap(),
        Regex::new(r"(\d{2}-\d{2}-\d{4})").unwrap(),
    ];

    // Receipt numbers, most specific first
    pub static ref RECEIPT_NUMBERS: [Regex; 4] = [
        Regex::new(r"RECEIPT\s+(\d+)").unwrap(),
        Regex::new(r"Receipt\s*#?\s*(\d+)").unwrap(),
        Regex::new(r"REF\s*#?\s*(\d+)").unwrap(),
        Regex::new(r"Reference\s*#?\s*(\d+)").unwrap(),
    ];

    // DESCRIPTION QTY AMOUNT
    pub static ref RECEIPT_ITEM_WITH_QTY: Regex = Regex::new(
        r"^(.+?)\s+(\d+)\s+([\d.]+)$"
    ).unwrap();

    // DESCRIPTION AMOUNT
    pub static ref RECEIPT_ITEM: Regex = Regex::new(
        r"^(.+?)\s+([\d.]+)$"
    ).unwrap();
}

/// Address and header artifacts that look like item lines.
pub const HEADER_ARTIFACTS: &[&str] = &["BILL TO", "SHIP TO", "INVOICE"];

/// Receipt summary lines that look like `<text> <amount>`.
pub const SUMMARY_LINES: &[&str] = &[
    "BILL TO", "SHIP TO", "INVOICE", "TOTAL", "TAX", "SUBTOTAL", "PAYMENT", "CHANGE", "CASH",
    "CREDIT",
];

/// Whether the description contains any of the given markers, ignoring case.
pub fn contains_marker(description: &str, markers: &[&str]) -> bool {
    let upper = description.to_uppercase();
    markers.iter().any(|m| upper.contains(m))
}

/// First capture group of the first pattern that matches.
pub fn first_capture(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns
        .iter()
        .find_map(|p| p.captures(text))
        .map(|caps| caps[1].to_string())
}
