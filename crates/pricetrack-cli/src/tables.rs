//! Flat CSV tables written by the process command.

use std::fs;
use std::io::Write;
use std::path::Path;

use pricetrack_core::models::price::DOCUMENT_DATE_FORMAT;
use pricetrack_core::{Document, PriceChangeEvent, PriceRecord};

/// Column layout of a line item table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemsLayout {
    /// Invoice items only.
    Invoice,
    /// Receipt items only, tagged with the document type.
    Receipt,
    /// Invoices and receipts together.
    Combined,
}

impl ItemsLayout {
    fn header(&self) -> &'static [&'static str] {
        match self {
            ItemsLayout::Invoice => &[
                "invoice_number",
                "date",
                "file_name",
                "item_name",
                "quantity",
                "rate_per_item",
                "total_amount",
            ],
            ItemsLayout::Receipt => &[
                "receipt_number",
                "date",
                "file_name",
                "item_name",
                "quantity",
                "rate_per_item",
                "total_amount",
                "type",
            ],
            ItemsLayout::Combined => &[
                "document_number",
                "date",
                "file_name",
                "item_name",
                "quantity",
                "rate_per_item",
                "total_amount",
                "type",
            ],
        }
    }

    fn with_type(&self) -> bool {
        !matches!(self, ItemsLayout::Invoice)
    }
}

/// Write one row per line item across `documents`.
pub fn write_items<'a, W, I>(out: W, documents: I, layout: ItemsLayout) -> anyhow::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Document>,
{
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(layout.header())?;

    let mut rows = 0;
    for document in documents {
        for item in &document.items {
            let mut record = vec![
                document.document_number.clone(),
                document.date.clone(),
                document.file_name.clone(),
                item.description.clone(),
                item.quantity.to_string(),
                item.unit_rate.to_string(),
                item.amount.to_string(),
            ];
            if layout.with_type() {
                record.push(document.document_type.to_string());
            }
            wtr.write_record(&record)?;
            rows += 1;
        }
    }

    wtr.flush()?;
    Ok(rows)
}

/// Write the items of a single document.
pub fn write_document<W: Write>(out: W, document: &Document) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["item_name", "quantity", "rate_per_item", "total_amount"])?;

    for item in &document.items {
        wtr.write_record([
            &item.description,
            &item.quantity.to_string(),
            &item.unit_rate.to_string(),
            &item.amount.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the sorted price history.
pub fn write_price_tracking<W: Write>(out: W, records: &[PriceRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(["date", "item_name", "price_per_item", "document_number", "document_type"])?;

    for record in records {
        wtr.write_record([
            &record.date.format("%Y-%m-%d").to_string(),
            &record.item_name,
            &record.unit_rate.to_string(),
            &record.document_number,
            &record.document_type.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write price change events.
pub fn write_price_changes<W: Write>(out: W, events: &[PriceChangeEvent]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        "item_name",
        "previous_date",
        "current_date",
        "previous_price",
        "current_price",
        "price_change",
        "percentage_change",
    ])?;

    for event in events {
        wtr.write_record([
            &event.item_name,
            &event.previous_date.format(DOCUMENT_DATE_FORMAT).to_string(),
            &event.current_date.format(DOCUMENT_DATE_FORMAT).to_string(),
            &event.previous_price.to_string(),
            &event.current_price.to_string(),
            &event.price_change.to_string(),
            &format!("{:.2}", event.percentage_change),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Create `path` (and its parent directory) and hand it to `write`.
pub fn write_file<F, T>(path: &Path, write: F) -> anyhow::Result<T>
where
    F: FnOnce(fs::File) -> anyhow::Result<T>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;
    write(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use pricetrack_core::{DocumentType, LineItem};
    use rust_decimal::Decimal;

    fn sample_documents() -> Vec<Document> {
        vec![
            Document {
                file_name: "inv1.pdf".to_string(),
                document_number: "1001".to_string(),
                date: "01/15/2024".to_string(),
                document_type: DocumentType::Invoice,
                items: vec![LineItem::new(
                    "BASMATI RICE 5LB",
                    10,
                    Decimal::new(1250, 2),
                    Decimal::new(12500, 2),
                )],
            },
            Document {
                file_name: "r1.pdf".to_string(),
                document_number: "77".to_string(),
                date: "02/01/2024".to_string(),
                document_type: DocumentType::Receipt,
                items: vec![LineItem::new(
                    "GHEE, PURE",
                    1,
                    Decimal::new(999, 2),
                    Decimal::new(999, 2),
                )],
            },
        ]
    }

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> anyhow::Result<()>,
    {
        let mut buffer = Vec::new();
        write(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_invoice_items_table() {
        let docs = sample_documents();
        let csv = render(|b| write_items(b, &docs[..1], ItemsLayout::Invoice).map(|_| ()));
        assert_eq!(
            csv,
            "invoice_number,date,file_name,item_name,quantity,rate_per_item,total_amount\n\
             1001,01/15/2024,inv1.pdf,BASMATI RICE 5LB,10,12.50,125.00\n"
        );
    }

    #[test]
    fn test_combined_table_tags_type() {
        let docs = sample_documents();
        let csv = render(|b| write_items(b, &docs, ItemsLayout::Combined).map(|_| ()));
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "document_number,date,file_name,item_name,quantity,rate_per_item,total_amount,type"
        );
        assert!(lines[1].ends_with(",invoice"));
        assert_eq!(lines[2], "77,02/01/2024,r1.pdf,\"GHEE, PURE\",1,9.99,9.99,receipt");
    }

    #[test]
    fn test_per_document_table() {
        let docs = sample_documents();
        let csv = render(|b| write_document(b, &docs[0]));
        assert_eq!(
            csv,
            "item_name,quantity,rate_per_item,total_amount\nBASMATI RICE 5LB,10,12.50,125.00\n"
        );
    }

    #[test]
    fn test_price_changes_table_dates() {
        let events = vec![PriceChangeEvent {
            item_name: "RICE".to_string(),
            previous_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            current_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            previous_price: Decimal::new(1000, 2),
            current_price: Decimal::new(1200, 2),
            price_change: Decimal::new(200, 2),
            percentage_change: Decimal::new(2000, 2),
        }];

        let csv = render(|b| write_price_changes(b, &events));
        assert_eq!(
            csv.lines().nth(1),
            Some("RICE,02/01/2024,03/01/2024,10.00,12.00,2.00,20.00")
        );
    }

    #[test]
    fn test_price_tracking_table_is_reproducible() {
        let docs = sample_documents();
        let history = pricetrack_core::build_price_history(&docs);

        let first = render(|b| write_price_tracking(b, &history));
        let second = render(|b| write_price_tracking(b, &history));
        assert_eq!(first, second);
        assert_eq!(
            first.lines().nth(1),
            Some("2024-01-15,BASMATI RICE 5LB,12.50,1001,invoice")
        );
    }
}
