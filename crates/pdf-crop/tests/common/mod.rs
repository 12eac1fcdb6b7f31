#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, Stream};

/// `num_pages` US Letter pages
pub fn create_test_pdf(num_pages: usize) -> Document {
    create_pdf_with_pages(&vec![(612.0, 792.0, 0); num_pages])
}

/// One page per `(width, height, rotate)` entry
pub fn create_pdf_with_pages(pages: &[(f32, f32, i64)]) -> Document {
    let mut doc = Document::with_version("1.7");

    // Create page tree root ID
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for &(width, height, rotate) in pages {
        let content_id = doc.add_object(Stream::new(Dictionary::new(), b"q Q".to_vec()));

        let mut page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(width),
                    Object::Real(height),
                ]),
            ),
            ("Resources", Object::Dictionary(Dictionary::new())),
            ("Contents", Object::Reference(content_id)),
        ]);
        if rotate != 0 {
            page.set("Rotate", Object::Integer(rotate));
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(pages.len() as i64)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));

    doc.trailer.set("Root", catalog_id);

    doc
}

/// Serialize a document to bytes
pub fn to_bytes(doc: &Document) -> Vec<u8> {
    let mut doc = doc.clone();
    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

fn page_box(doc: &Document, index: usize, key: &[u8]) -> Option<[f64; 4]> {
    let page_id = *doc.get_pages().values().nth(index)?;
    let page = doc.get_dictionary(page_id).ok()?;
    let values = page.get(key).and_then(Object::as_array).ok()?;
    let mut out = [0.0; 4];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = match value {
            Object::Integer(i) => *i as f64,
            Object::Real(r) => *r as f64,
            _ => return None,
        };
    }
    Some(out)
}

pub fn crop_box(doc: &Document, index: usize) -> Option<[f64; 4]> {
    page_box(doc, index, b"CropBox")
}

pub fn media_box(doc: &Document, index: usize) -> Option<[f64; 4]> {
    page_box(doc, index, b"MediaBox")
}

pub fn assert_box_eq(actual: [f64; 4], expected: [f64; 4]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 0.01, "expected {:?}, got {:?}", expected, actual);
    }
}
