//! Content stream splicing
//!
//! Page content is never rewritten in place. Instead a new stream is placed
//! in front of the existing `/Contents` and another one after it, so the
//! original drawing operators run unchanged inside whatever graphics state
//! the surrounding streams set up.

use crate::error::{PageFitError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Operators placed before the page content to scale it uniformly by `factor`
///
/// Two graphics states are saved, so the closing fragment must restore twice.
/// When spliced in by [`wrap_page_content`] both fragments are padded with a
/// newline on the side facing the page content, so their operators cannot
/// merge with a token at the edge of a neighbouring stream.
pub fn scale_prefix(factor: f32) -> Content {
    Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(factor),
                    Object::Real(0.0),
                    Object::Real(0.0),
                    Object::Real(factor),
                    Object::Real(0.0),
                    Object::Real(0.0),
                ],
            ),
            Operation::new("q", vec![]),
        ],
    }
}

/// Operators placed after the page content, balancing [`scale_prefix`]
pub fn scale_suffix() -> Content {
    Content {
        operations: vec![Operation::new("Q", vec![]), Operation::new("Q", vec![])],
    }
}

/// Scale everything drawn on the page by `factor`, anchored at the origin
pub fn scale_page_content(doc: &mut Document, page_id: ObjectId, factor: f32) -> Result<()> {
    let prefix = encode(&scale_prefix(factor))?;
    let suffix = encode(&scale_suffix())?;
    wrap_page_content(doc, page_id, prefix, suffix)
}

/// Insert `prefix` as a new stream before all existing page content and
/// `suffix` as a new stream after it
///
/// Streams are joined without separators when a page is rendered, and
/// content streams often end without trailing whitespace (`...ET`), so the
/// prefix is given a trailing newline and the suffix a leading and trailing one.
pub fn wrap_page_content(
    doc: &mut Document,
    page_id: ObjectId,
    mut prefix: Vec<u8>,
    mut suffix: Vec<u8>,
) -> Result<()> {
    let existing = existing_contents(doc, page_id)?;

    if !prefix.last().is_some_and(u8::is_ascii_whitespace) {
        prefix.push(b'\n');
    }
    if !suffix.first().is_some_and(u8::is_ascii_whitespace) {
        suffix.insert(0, b'\n');
    }
    if !suffix.last().is_some_and(u8::is_ascii_whitespace) {
        suffix.push(b'\n');
    }

    let prefix_id = doc.add_object(Stream::new(Dictionary::new(), prefix));
    let suffix_id = doc.add_object(Stream::new(Dictionary::new(), suffix));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(prefix_id));
    contents.extend(existing);
    contents.push(Object::Reference(suffix_id));

    let page = doc
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| PageFitError::OperationError(format!("Page {:?}: {}", page_id, e)))?;
    page.set("Contents", Object::Array(contents));

    Ok(())
}

/// Current `/Contents` entries of a page as a flat list of stream references
///
/// A page without content yields an empty list; an indirect array is unwrapped.
fn existing_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| PageFitError::OperationError(format!("Page {:?}: {}", page_id, e)))?;

    let contents = match page.get(b"Contents") {
        Ok(contents) => contents,
        Err(_) => return Ok(Vec::new()),
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => Ok(items.clone()),
            Ok(Object::Stream(_)) => Ok(vec![Object::Reference(*id)]),
            Ok(_) => Err(PageFitError::OperationError(format!(
                "Page {:?} /Contents is neither a stream nor an array",
                page_id
            ))),
            Err(e) => Err(PageFitError::OperationError(format!(
                "Page {:?} /Contents: {}",
                page_id, e
            ))),
        },
        Object::Array(items) => Ok(items.clone()),
        Object::Null => Ok(Vec::new()),
        _ => Err(PageFitError::OperationError(format!(
            "Page {:?} has malformed /Contents",
            page_id
        ))),
    }
}

fn encode(content: &Content) -> Result<Vec<u8>> {
    content
        .encode()
        .map_err(|e| PageFitError::SerializationError(e.to_string()))
}
