//! Single-page PDFs with a text layer, built with lopdf for tests.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

const FONT_SIZE: i64 = 12;
const LINE_HEIGHT: i64 = 20;

/// One line of Helvetica text per entry, top to bottom.
pub fn text_pdf(lines: &[&str]) -> Vec<u8> {
    build(lines, true)
}

/// Same layout, but the page has no font resources, so `/F1` cannot be resolved.
pub fn text_pdf_without_fonts(lines: &[&str]) -> Vec<u8> {
    build(lines, false)
}

fn build(lines: &[&str], with_fonts: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let resources = if with_fonts {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        }
    } else {
        Dictionary::new()
    };
    let resources_id = doc.add_object(resources);

    let mut operations = Vec::new();
    let mut y: i64 = 780;
    for line in lines {
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(FONT_SIZE)]),
            Operation::new("Td", vec![Object::Integer(50), Object::Integer(y)]),
            Operation::new("Tj", vec![Object::string_literal(*line)]),
            Operation::new("ET", vec![]),
        ]);
        y -= LINE_HEIGHT;
    }

    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(595),
            Object::Integer(842),
        ],
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => Object::Integer(1),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}
