//! Layout engine producing a portfolio-style CV as a paginated A4 PDF.
//!
//! The active profile and its selected section collections are read through
//! [`provider::ProfileSource`], images through [`images::ImageStore`], and the
//! document is drawn onto a [`surface::Surface`]: a sidebar identity panel on
//! every content page, titled sections of timeline cards, and a trailing
//! two-column evidence gallery.

pub mod document;
pub mod error;
pub mod evidence;
pub mod export;
pub mod fonts;
pub mod images;
pub mod layout;
pub mod model;
pub mod provider;
pub mod sections;
pub mod surface;

#[cfg(feature = "bookmarks")]
pub mod bookmarks;

pub use error::ExportError;
#[cfg(feature = "bookmarks")]
pub use export::export_pdf_with_bookmarks;
pub use export::{export_document, export_pdf, prepare_content, ExportedDocument};
pub use model::{Profile, SectionItem, SectionKind};
pub use sections::SectionSelection;
