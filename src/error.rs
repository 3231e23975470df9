//! Errors returned by the export entry points.

use std::fmt;

/// Failure of a CV export.
///
/// `NotFound` and `NotAuthorized` are raised before anything is drawn; the
/// remaining variants come from the output backend.
#[derive(Debug)]
pub enum ExportError {
    /// No profile is flagged as active.
    NotFound,
    /// The active profile does not allow printing.
    NotAuthorized,
    /// Font files exist but could not be loaded.
    Fonts(genpdf::error::Error),
    /// The PDF backend failed to build or serialize the document.
    Pdf(String),
}

impl ExportError {
    /// HTTP-style status code matching the error, for front ends that serve the export.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::NotAuthorized => 403,
            Self::Fonts(_) | Self::Pdf(_) => 500,
        }
    }
}

impl From<genpdf::error::Error> for ExportError {
    fn from(err: genpdf::error::Error) -> Self {
        Self::Fonts(err)
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "Perfil no encontrado"),
            Self::NotAuthorized => write!(f, "No autorizado"),
            Self::Fonts(err) => write!(f, "Failed to load fonts: {err}"),
            Self::Pdf(message) => write!(f, "Failed to write PDF: {message}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fonts(err) => Some(err),
            Self::NotFound | Self::NotAuthorized | Self::Pdf(_) => None,
        }
    }
}
