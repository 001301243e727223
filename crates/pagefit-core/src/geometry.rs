//! Page box geometry
//!
//! Reads the effective MediaBox of each page and rewrites the page boxes.

use crate::error::{PageFitError, Result};
use crate::page_size::PageSize;
use lopdf::{Document, Object, ObjectId};

/// The box entries kept in sync whenever a page is resized
pub const PAGE_BOXES: [&str; 5] = ["MediaBox", "CropBox", "BleedBox", "TrimBox", "ArtBox"];

/// Guards against cyclic `/Parent` chains in broken files
const MAX_INHERITANCE_DEPTH: usize = 32;

/// A page together with its measured size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// 1-indexed page number
    pub number: u32,
    pub id: ObjectId,
    pub size: PageSize,
}

/// Measure every page of the document, in page order
///
/// Fails on the first page without a usable MediaBox or with a zero,
/// negative or non-finite dimension.
pub fn page_geometry(doc: &Document) -> Result<Vec<PageGeometry>> {
    doc.get_pages()
        .into_iter()
        .map(|(number, id)| {
            let size = page_size(doc, number, id)?;
            Ok(PageGeometry { number, id, size })
        })
        .collect()
}

/// Size of a single page from its MediaBox (inherited from the page tree if absent)
pub fn page_size(doc: &Document, number: u32, page_id: ObjectId) -> Result<PageSize> {
    let media_box =
        inherited_media_box(doc, page_id).ok_or(PageFitError::MissingMediaBox(number))?;

    let coords = media_box
        .iter()
        .map(|obj| resolve(doc, obj).ok().and_then(as_number))
        .collect::<Option<Vec<f32>>>()
        .filter(|coords| coords.len() == 4)
        .ok_or(PageFitError::MissingMediaBox(number))?;

    let width = (coords[2] - coords[0]).abs();
    let height = (coords[3] - coords[1]).abs();

    let usable = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
    if !usable {
        return Err(PageFitError::InvalidGeometry {
            page: number,
            width,
            height,
        });
    }

    Ok(PageSize::new(width, height))
}

/// Replace all five page boxes with a rectangle of `size` anchored at the origin
pub fn set_page_boxes(doc: &mut Document, page_id: ObjectId, size: PageSize) -> Result<()> {
    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PageFitError::OperationError(format!("Page {:?}: {}", page_id, e)))?;

    let rect = vec![
        Object::Real(0.0),
        Object::Real(0.0),
        Object::Real(size.width),
        Object::Real(size.height),
    ];
    for key in PAGE_BOXES {
        page.set(key, Object::Array(rect.clone()));
    }

    Ok(())
}

fn inherited_media_box(doc: &Document, page_id: ObjectId) -> Option<Vec<Object>> {
    let mut node_id = page_id;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        let node = doc.get_object(node_id).and_then(Object::as_dict).ok()?;
        if let Ok(media_box) = node.get(b"MediaBox") {
            return resolve(doc, media_box)
                .and_then(Object::as_array)
                .ok()
                .cloned();
        }
        node_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    None
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> lopdf::Result<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id),
        other => Ok(other),
    }
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
