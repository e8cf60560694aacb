//! Price increase report rendered as a PDF.

use std::io::Read;

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use rust_decimal::Decimal;
use serde::Deserialize;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 40;
const MAX_ITEM_CHARS: usize = 42;

/// Table columns: header and x position.
const COLUMNS: [(&str, i64); 7] = [
    ("Item Name", 40),
    ("Prev Price", 255),
    ("Prev Date", 305),
    ("New Price", 370),
    ("New Date", 420),
    ("Increase", 485),
    ("% Change", 530),
];

const NOTES: [&str; 4] = [
    "- Rows marked * and printed in red are increases above the highlight threshold",
    "- Data extracted from purchase invoices and receipts",
    "- Only items with price increases are shown in this report",
    "- Price comparison is based on consecutive purchase dates of the same item",
];

/// One row of the price changes table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceChangeRow {
    pub item_name: String,
    pub previous_date: String,
    pub current_date: String,
    pub previous_price: Decimal,
    pub current_price: Decimal,
    pub price_change: Decimal,
    pub percentage_change: Decimal,
}

/// Read every row of a price changes table.
pub fn read_price_changes<R: Read>(input: R) -> anyhow::Result<Vec<PriceChangeRow>> {
    let mut rdr = csv::Reader::from_reader(input);
    let rows = rdr.deserialize().collect::<Result<Vec<PriceChangeRow>, _>>()?;
    Ok(rows)
}

/// Price increases selected for the report, largest first.
#[derive(Debug, Clone)]
pub struct PriceReport {
    rows: Vec<PriceChangeRow>,
}

impl PriceReport {
    /// Keep increases only and sort them by percentage, descending.
    ///
    /// Returns `None` when there are no increases.
    pub fn from_rows(rows: Vec<PriceChangeRow>) -> Option<Self> {
        let mut rows: Vec<PriceChangeRow> = rows
            .into_iter()
            .filter(|r| r.percentage_change > Decimal::ZERO)
            .collect();
        if rows.is_empty() {
            return None;
        }

        rows.sort_by(|a, b| b.percentage_change.cmp(&a.percentage_change));
        Some(Self { rows })
    }

    pub fn rows(&self) -> &[PriceChangeRow] {
        &self.rows
    }

    pub fn count(&self) -> usize {
        self.rows.len()
    }

    pub fn average_increase(&self) -> Decimal {
        let percentages: Vec<Decimal> = self.rows.iter().map(|r| r.percentage_change).collect();
        pricetrack_core::mean(&percentages).unwrap_or_default()
    }

    /// The row with the largest increase (the first after sorting).
    pub fn largest(&self) -> &PriceChangeRow {
        &self.rows[0]
    }

    /// Render the report into a new PDF document.
    pub fn render(
        &self,
        title: &str,
        generated: NaiveDate,
        threshold: Decimal,
    ) -> anyhow::Result<Document> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular,
                "F2" => bold,
            },
        });

        let mut layout = PageLayout::new();

        layout.line(&sanitize(title), Font::Bold, 20, 30);
        let generated_on = format!("Generated on: {}", generated.format("%B %d, %Y"));
        layout.line(&generated_on, Font::Regular, 10, 24);

        layout.line("Summary", Font::Bold, 14, 18);
        let count = format!("- Total items with price increases: {}", self.count());
        layout.line(&count, Font::Regular, 10, 14);
        let average = format!("- Average price increase: {:.2}%", self.average_increase());
        layout.line(&average, Font::Regular, 10, 14);
        let largest = self.largest();
        layout.line(
            &format!(
                "- Largest price increase: {:.2}% ({})",
                largest.percentage_change,
                sanitize(&largest.item_name)
            ),
            Font::Regular,
            10,
            24,
        );

        layout.line("Detailed Price Increases", Font::Bold, 14, 18);
        layout.table_header();
        for row in &self.rows {
            layout.table_row(row, row.percentage_change > threshold);
        }
        layout.skip(16);

        layout.line("Notes", Font::Bold, 14, 18);
        for note in NOTES {
            layout.line(note, Font::Regular, 10, 14);
        }

        let mut kids = Vec::new();
        for operations in layout.finish() {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        Ok(doc)
    }
}

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(&self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Top-down text layout that starts a new page when the cursor runs out.
struct PageLayout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: i64,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn ensure_room(&mut self, height: i64) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn skip(&mut self, height: i64) {
        self.y -= height;
    }

    fn text(&mut self, x: i64, text: &str, font: Font, size: i64) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![Object::Name(font.resource().as_bytes().to_vec()), Object::Integer(size)],
            ),
            Operation::new("Td", vec![Object::Integer(x), Object::Integer(self.y)]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// A full-width line of `size` text followed by `advance` points of space.
    fn line(&mut self, text: &str, font: Font, size: i64, advance: i64) {
        self.ensure_room(size);
        self.y -= size;
        self.text(MARGIN, text, font, size);
        self.y -= advance - size;
    }

    fn table_header(&mut self) {
        self.ensure_room(12);
        self.y -= 10;
        for (name, x) in COLUMNS {
            self.text(x, name, Font::Bold, 8);
        }
        self.y -= 6;
    }

    fn table_row(&mut self, row: &PriceChangeRow, highlight: bool) {
        if self.y - 12 < MARGIN {
            self.new_page();
            self.table_header();
        }
        self.y -= 12;

        if highlight {
            self.current.push(fill_color(1));
        }

        let marker = if highlight { "* " } else { "" };
        let cells = [
            format!("{}{}", marker, truncate(&sanitize(&row.item_name), MAX_ITEM_CHARS)),
            format!("${:.2}", row.previous_price),
            sanitize(&row.previous_date),
            format!("${:.2}", row.current_price),
            sanitize(&row.current_date),
            format!("${:.2}", row.price_change),
            format!("{:.2}%", row.percentage_change),
        ];
        for ((_, x), cell) in COLUMNS.iter().zip(cells.iter()) {
            self.text(*x, cell, Font::Regular, 8);
        }

        if highlight {
            self.current.push(fill_color(0));
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}

/// RGB fill with only the red channel set to `red` (0 or 1).
fn fill_color(red: i64) -> Operation {
    Operation::new("rg", vec![Object::Integer(red), Object::Integer(0), Object::Integer(0)])
}

/// Replace characters the standard fonts cannot show.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars - 3).collect();
    format!("{}...", kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TABLE: &str = "\
item_name,previous_date,current_date,previous_price,current_price,price_change,percentage_change
RICE,02/01/2024,03/01/2024,10.00,12.00,2.00,20.00
SALT,01/01/2024,02/01/2024,4.00,3.00,-1.00,-25.00
GHEE,01/01/2024,02/01/2024,10.00,10.40,0.40,4.00
DAL,01/01/2024,03/01/2024,4.00,4.80,0.80,20.00
";

    fn report() -> PriceReport {
        let rows = read_price_changes(TABLE.as_bytes()).unwrap();
        PriceReport::from_rows(rows).unwrap()
    }

    #[test]
    fn test_only_increases_largest_first() {
        let report = report();
        let names: Vec<&str> = report.rows().iter().map(|r| r.item_name.as_str()).collect();
        // Ties keep table order
        assert_eq!(names, vec!["RICE", "DAL", "GHEE"]);
    }

    #[test]
    fn test_summary_statistics() {
        let report = report();
        assert_eq!(report.count(), 3);
        assert_eq!(report.average_increase(), Decimal::new(1467, 2));
        assert_eq!(report.largest().item_name, "RICE");
    }

    #[test]
    fn test_no_increases() {
        let table = format!(
            "{}\nSALT,01/01/2024,02/01/2024,4.00,3.00,-1.00,-25.00\n",
            TABLE.lines().next().unwrap()
        );
        let rows = read_price_changes(table.as_bytes()).unwrap();
        assert!(PriceReport::from_rows(rows).is_none());
    }

    #[test]
    fn test_average_of_huge_increases() {
        let row = |name: &str| PriceChangeRow {
            item_name: name.to_string(),
            previous_date: "01/01/2024".to_string(),
            current_date: "02/01/2024".to_string(),
            previous_price: Decimal::ONE,
            current_price: Decimal::MAX,
            price_change: Decimal::MAX - Decimal::ONE,
            percentage_change: Decimal::MAX,
        };
        let report = PriceReport::from_rows(vec![row("A"), row("B")]).unwrap();

        assert!(report.average_increase() >= Decimal::MAX - Decimal::ONE);
    }

    #[test]
    fn test_render_produces_loadable_pdf() {
        let generated = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let mut doc = report().render("Acme Foods", generated, Decimal::new(5, 0)).unwrap();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();

        let loaded = Document::load_mem(&buffer).unwrap();
        assert_eq!(loaded.get_pages().len(), 1);
    }

    #[test]
    fn test_long_report_paginates() {
        let rows: Vec<PriceChangeRow> = (1..=120)
            .map(|i| PriceChangeRow {
                item_name: format!("ITEM {}", i),
                previous_date: "01/01/2024".to_string(),
                current_date: "02/01/2024".to_string(),
                previous_price: Decimal::new(100, 2),
                current_price: Decimal::new(100 + i, 2),
                price_change: Decimal::new(i, 2),
                percentage_change: Decimal::new(i * 100, 2),
            })
            .collect();
        let report = PriceReport::from_rows(rows).unwrap();

        let generated = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let mut doc = report.render("Report", generated, Decimal::new(5, 0)).unwrap();
        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();

        let loaded = Document::load_mem(&buffer).unwrap();
        assert!(loaded.get_pages().len() >= 2);
    }

    #[test]
    fn test_truncate_and_sanitize() {
        assert_eq!(truncate("SHORT", 10), "SHORT");
        assert_eq!(truncate("ABCDEFGHIJKL", 8), "ABCDE...");
        assert_eq!(sanitize("Jalapeño"), "Jalape?o");
    }
}
