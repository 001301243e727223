//! In-memory PDF fixtures shared by the unit tests

use crate::page_size::PageSize;
use lopdf::{content::Content, content::Operation, Dictionary, Document, Object, ObjectId, Stream};

/// Build a document with one page per entry of `sizes`, each with a small text content stream
pub fn create_test_document(sizes: &[PageSize]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();

    for (i, size) in sizes.iter().enumerate() {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                ),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Page {}", i + 1).into_bytes(),
                        lopdf::StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(size.width),
                    Object::Real(size.height),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(sizes.len() as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    doc
}

/// Serialized form of [`create_test_document`]
pub fn create_test_pdf(sizes: &[PageSize]) -> Vec<u8> {
    let mut doc = create_test_document(sizes);
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Width and height of one of the page's box entries
pub fn page_box(doc: &Document, page_id: ObjectId, key: &str) -> PageSize {
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let rect: Vec<f32> = page
        .get(key.as_bytes())
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|obj| match obj {
            Object::Integer(i) => *i as f32,
            Object::Real(r) => *r,
            other => panic!("not a number: {:?}", other),
        })
        .collect();
    PageSize::new(rect[2] - rect[0], rect[3] - rect[1])
}

/// Stream object ids referenced by the page's `/Contents`, in order
pub fn content_ids(doc: &Document, page_id: ObjectId) -> Vec<ObjectId> {
    let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
    match page.get(b"Contents").unwrap() {
        Object::Reference(id) => vec![*id],
        Object::Array(items) => items
            .iter()
            .map(|item| item.as_reference().unwrap())
            .collect(),
        other => panic!("unexpected /Contents: {:?}", other),
    }
}

/// Raw bytes of a content stream object
pub fn stream_bytes(doc: &Document, id: ObjectId) -> Vec<u8> {
    doc.get_object(id).unwrap().as_stream().unwrap().content.clone()
}

/// Route `tracing` output through the test harness; safe to call repeatedly
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
