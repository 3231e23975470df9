//! Font loading and text measurement for the CV export.
//!
//! The bundled Roboto pair is searched in `HOJA_VIDA_FONTS_DIR`, then in
//! `assets/fonts` next to the running binary, then in `assets/fonts` of the
//! crate manifest.  When neither holds the files, the export falls back to the
//! builtin Helvetica pair, measured with the static tables in [`builtin`].

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{FontCache, FontData, FontFamily};
use genpdf::style::{Style, StyledString};
use log::warn;

pub mod builtin;

/// Environment variable overriding the font search path.
pub const FONTS_DIR_ENV: &str = "HOJA_VIDA_FONTS_DIR";

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

const REGULAR_FILE: &str = "Roboto-Regular.ttf";
const BOLD_FILE: &str = "Roboto-Bold.ttf";
const FONT_FILES: &[&str] = &[REGULAR_FILE, BOLD_FILE];

const MM_PER_PT: f64 = 25.4 / 72.0;

/// Weight of a drawn text run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Measures the advance width of text runs.
pub trait TextMetrics {
    /// Width of `text` in millimetres at `size_pt`.
    fn text_width(&self, text: &str, weight: FontWeight, size_pt: f64) -> f64;
}

/// Converts typographic points to millimetres.
pub fn pt_to_mm(points: f64) -> f64 {
    points * MM_PER_PT
}

/// Fonts used by the PDF surface.
pub enum LoadedFonts {
    /// TrueType files embedded into the document and measured through `genpdf`.
    Bundled {
        regular: Vec<u8>,
        bold: Vec<u8>,
        cache: FontCache,
    },
    /// The standard Helvetica pair every PDF viewer provides.
    Builtin,
}

impl fmt::Debug for LoadedFonts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled { regular, bold, .. } => f
                .debug_struct("Bundled")
                .field("regular_bytes", &regular.len())
                .field("bold_bytes", &bold.len())
                .finish(),
            Self::Builtin => f.write_str("Builtin"),
        }
    }
}

impl LoadedFonts {
    /// Loads the bundled fonts, falling back to the builtin pair when they are missing.
    ///
    /// Files that exist but cannot be parsed are reported as errors.
    pub fn load() -> Result<Self, Error> {
        match resolve_font_directory() {
            Ok(directory) => Self::from_directory(&directory),
            Err(err) => {
                warn!(
                    "{} fonts unavailable ({}); falling back to builtin Helvetica.",
                    DEFAULT_FONT_FAMILY_NAME, err
                );
                Ok(Self::Builtin)
            }
        }
    }

    /// Loads the Roboto pair from `directory`.
    pub fn from_directory(directory: &Path) -> Result<Self, Error> {
        let regular = read_font(directory, REGULAR_FILE)?;
        let bold = read_font(directory, BOLD_FILE)?;

        let family = FontFamily {
            regular: parse_font(&regular, directory, REGULAR_FILE)?,
            bold: parse_font(&bold, directory, BOLD_FILE)?,
            italic: parse_font(&regular, directory, REGULAR_FILE)?,
            bold_italic: parse_font(&bold, directory, BOLD_FILE)?,
        };

        Ok(Self::Bundled {
            regular,
            bold,
            cache: FontCache::new(family),
        })
    }

    /// Returns whether the builtin fallback is in use.
    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin)
    }
}

impl TextMetrics for LoadedFonts {
    fn text_width(&self, text: &str, weight: FontWeight, size_pt: f64) -> f64 {
        match self {
            Self::Bundled { cache, .. } => {
                let mut style = Style::new().with_font_size(size_pt.round().clamp(1.0, 255.0) as u8);
                if weight == FontWeight::Bold {
                    style.set_bold();
                }
                let width: printpdf::Mm = StyledString::new(text, style).width(cache).into();
                width.0
            }
            Self::Builtin => builtin::BuiltinMetrics.text_width(text, weight, size_pt),
        }
    }
}

fn read_font(directory: &Path, file: &str) -> Result<Vec<u8>, Error> {
    let path = directory.join(file);
    fs::read(&path).map_err(|err| {
        Error::new(
            format!("Failed to read font file {}: {}", path.display(), err),
            err,
        )
    })
}

fn parse_font(bytes: &[u8], directory: &Path, file: &str) -> Result<FontData, Error> {
    FontData::new(bytes.to_vec(), None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font '{}' from {}: {}",
                file,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
        )
    })
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(path) = env::var(FONTS_DIR_ENV) {
        if !path.trim().is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn missing_font_files(path: &Path) -> Vec<&'static str> {
    FONT_FILES
        .iter()
        .copied()
        .filter(|name| !path.join(name).is_file())
        .collect()
}

fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        if !candidate.is_dir() {
            attempts.push(format!("{} (directory missing)", candidate.display()));
            continue;
        }

        let missing = missing_font_files(&candidate);
        if missing.is_empty() {
            return Ok(candidate);
        }
        attempts.push(format!(
            "{} (missing files [{}])",
            candidate.display(),
            missing.join(", ")
        ));
    }

    Err(Error::new(
        format!(
            "Unable to locate the {} fonts. Checked: {}. Set {} to a directory holding {}.",
            DEFAULT_FONT_FAMILY_NAME,
            attempts.join(", "),
            FONTS_DIR_ENV,
            FONT_FILES.join(" and ")
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

/// Indicates whether the bundled fonts can be found on disk.
pub fn bundled_fonts_available() -> bool {
    resolve_font_directory().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_reported_per_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join(REGULAR_FILE), b"").expect("write stub");
        assert_eq!(missing_font_files(dir.path()), [BOLD_FILE]);
    }

    #[test]
    fn unreadable_font_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = LoadedFonts::from_directory(dir.path()).unwrap_err();
        assert!(err.to_string().contains(REGULAR_FILE));
    }

    #[test]
    fn builtin_fonts_measure_with_static_tables() {
        let fonts = LoadedFonts::Builtin;
        let regular = fonts.text_width("Hola", FontWeight::Regular, 10.0);
        let bold = fonts.text_width("Hola", FontWeight::Bold, 10.0);
        assert!(regular > 0.0);
        assert!(bold > regular);
    }
}
