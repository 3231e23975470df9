//! Document outline built on top of `lopdf`.
//!
//! The layout engine knows on which page every section and the gallery
//! start; this module turns that knowledge into `/Outlines` entries of the
//! serialized PDF.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};

use crate::document::RenderReport;

/// Outline title of the evidence gallery.
pub const GALLERY_OUTLINE_TITLE: &str = "Galería de evidencias";

/// Errors that can occur while embedding the outline into a rendered document.
#[derive(Debug)]
pub enum BookmarkError {
    /// The PDF bytes could not be parsed or written by `lopdf`.
    Parse(lopdf::Error),
    /// The trailer has no usable `/Root` entry.
    MissingCatalog,
    /// The catalog object is not a dictionary.
    InvalidCatalog,
    /// An outline entry points past the last page.
    MissingPage { title: String, page_number: usize },
}

impl From<lopdf::Error> for BookmarkError {
    fn from(err: lopdf::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<std::io::Error> for BookmarkError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

impl std::fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "Failed to parse PDF bytes: {err}"),
            Self::MissingCatalog => write!(f, "PDF catalog entry is missing"),
            Self::InvalidCatalog => write!(f, "PDF catalog entry is not a dictionary"),
            Self::MissingPage { title, page_number } => write!(
                f,
                "Outline entry {title:?} refers to missing page {page_number}"
            ),
        }
    }
}

impl std::error::Error for BookmarkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::MissingCatalog | Self::InvalidCatalog | Self::MissingPage { .. } => None,
        }
    }
}

/// One outline entry: a title and the 1-based page it jumps to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineEntry {
    pub title: String,
    pub page: usize,
}

/// Outline of a rendered document: every section, then the gallery when present.
pub fn outline_entries(report: &RenderReport) -> Vec<OutlineEntry> {
    let sections = report.sections.iter().map(|section| OutlineEntry {
        title: section.title.to_string(),
        page: section.first_page,
    });
    let gallery = report.gallery.iter().map(|gallery| OutlineEntry {
        title: GALLERY_OUTLINE_TITLE.to_string(),
        page: gallery.first_page,
    });
    sections.chain(gallery).collect()
}

/// Adds a flat `/Outlines` tree to `pdf_bytes`, each entry a `/Dest [page /Fit]`.
///
/// Returns the input unchanged when `entries` is empty.
pub fn apply_outline(pdf_bytes: &[u8], entries: &[OutlineEntry]) -> Result<Vec<u8>, BookmarkError> {
    if entries.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();
    let nodes = resolve_nodes(&mut document, entries, &pages)?;

    let outlines_id = document.new_object_id();
    link_nodes(outlines_id, &mut document, &nodes);
    insert_outlines_root(outlines_id, &mut document, &nodes)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

struct OutlineNode<'a> {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: &'a str,
}

fn resolve_nodes<'a>(
    document: &mut Document,
    entries: &'a [OutlineEntry],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineNode<'a>>, BookmarkError> {
    entries
        .iter()
        .map(|entry| {
            let page_ref = u32::try_from(entry.page)
                .ok()
                .and_then(|number| pages.get(&number).copied())
                .ok_or_else(|| BookmarkError::MissingPage {
                    title: entry.title.clone(),
                    page_number: entry.page,
                })?;
            Ok(OutlineNode {
                object_id: document.new_object_id(),
                page_ref,
                title: &entry.title,
            })
        })
        .collect()
}

/// PDF text string: literal for ASCII, UTF-16BE with byte order mark otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn link_nodes(outlines_id: ObjectId, document: &mut Document, nodes: &[OutlineNode<'_>]) {
    for (index, node) in nodes.iter().enumerate() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", text_string(node.title));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(node.page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if let Some(previous) = index.checked_sub(1).and_then(|prev| nodes.get(prev)) {
            dictionary.set("Prev", Object::Reference(previous.object_id));
        }
        if let Some(next) = nodes.get(index + 1) {
            dictionary.set("Next", Object::Reference(next.object_id));
        }

        document
            .objects
            .insert(node.object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    nodes: &[OutlineNode<'_>],
) -> Result<(), BookmarkError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| BookmarkError::MissingCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(nodes.len() as i64));
    if let Some(first) = nodes.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = nodes.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }
    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(BookmarkError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| BookmarkError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));

    Ok(())
}
