//! Export entry points turning the active profile into a document.

use log::info;

use crate::document::{CvContent, DocumentRenderer, RenderReport};
use crate::error::ExportError;
use crate::evidence::collect_evidence;
use crate::fonts::LoadedFonts;
use crate::images::ImageStore;
use crate::provider::ProfileSource;
use crate::sections::SectionSelection;
use crate::surface::pdf::PdfSurface;
use crate::surface::Surface;

/// Media type of the exported document.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";
/// Download name of the exported document.
pub const PDF_FILENAME: &str = "hoja_de_vida_pro.pdf";

/// A finished PDF export.
#[derive(Clone, Debug)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    pub report: RenderReport,
}

impl ExportedDocument {
    pub fn media_type(&self) -> &'static str {
        PDF_MEDIA_TYPE
    }

    pub fn filename(&self) -> &'static str {
        PDF_FILENAME
    }

    /// `Content-Disposition` value for serving the document inline.
    pub fn content_disposition(&self) -> String {
        format!("inline; filename=\"{PDF_FILENAME}\"")
    }
}

/// Reads the active profile and the selected sections.
///
/// Fails with [`ExportError::NotFound`] when no profile is active and with
/// [`ExportError::NotAuthorized`] when it does not allow printing.
pub fn prepare_content(
    source: &dyn ProfileSource,
    selection: SectionSelection,
) -> Result<CvContent, ExportError> {
    let profile = source.active_profile().ok_or(ExportError::NotFound)?;
    if !profile.printing_allowed {
        return Err(ExportError::NotAuthorized);
    }

    let sections: Vec<_> = selection
        .enabled()
        .map(|kind| (kind, source.section_items(&profile, kind)))
        .collect();
    let evidence = collect_evidence(&sections);

    Ok(CvContent {
        profile,
        sections,
        evidence,
    })
}

/// Renders the selected sections of the active profile onto `surface`.
///
/// Nothing is drawn when the profile is missing or not printable.
pub fn export_document<S: Surface + ?Sized>(
    source: &dyn ProfileSource,
    images: &dyn ImageStore,
    selection: SectionSelection,
    surface: &mut S,
) -> Result<RenderReport, ExportError> {
    let content = prepare_content(source, selection)?;
    Ok(DocumentRenderer::new(&content, images).render(surface))
}

/// Renders the selected sections of the active profile into PDF bytes.
pub fn export_pdf(
    source: &dyn ProfileSource,
    images: &dyn ImageStore,
    selection: SectionSelection,
) -> Result<ExportedDocument, ExportError> {
    let content = prepare_content(source, selection)?;
    let title = document_title(&content);

    let mut surface = PdfSurface::new(&title, LoadedFonts::load()?)?;
    let report = DocumentRenderer::new(&content, images).render(&mut surface);
    let bytes = surface.finish()?;

    info!(
        "exported {} with {} pages, {} cards and {} evidence images ({} bytes)",
        PDF_FILENAME,
        report.pages,
        report.cards(),
        report.gallery.as_ref().map_or(0, |gallery| gallery.placed),
        bytes.len()
    );
    Ok(ExportedDocument { bytes, report })
}

/// Like [`export_pdf`], with an outline entry per section and one for the gallery.
#[cfg(feature = "bookmarks")]
pub fn export_pdf_with_bookmarks(
    source: &dyn ProfileSource,
    images: &dyn ImageStore,
    selection: SectionSelection,
) -> Result<ExportedDocument, ExportError> {
    let exported = export_pdf(source, images, selection)?;
    let outline = crate::bookmarks::outline_entries(&exported.report);
    let bytes = crate::bookmarks::apply_outline(&exported.bytes, &outline)
        .map_err(|err| ExportError::Pdf(err.to_string()))?;
    Ok(ExportedDocument {
        bytes,
        report: exported.report,
    })
}

fn document_title(content: &CvContent) -> String {
    let name = [&content.profile.first_names, &content.profile.last_names]
        .into_iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        "Hoja de vida".to_string()
    } else {
        format!("Hoja de vida - {name}")
    }
}
