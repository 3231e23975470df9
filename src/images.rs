//! Image retrieval and decoding with explicit degraded outcomes.
//!
//! Images never abort an export: every failure to fetch or decode is turned
//! into an [`ImageOutcome::Skipped`] value that the layout code can log and
//! step over while still drawing the surrounding captions.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use image::{DynamicImage, GenericImageView};

use crate::layout::geometry::Rect;
use crate::model::ImageRef;

/// Resolution used to derive the natural printed size of a raster image.
pub const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

/// Source of raw image bytes.
pub trait ImageStore {
    /// Reads the complete contents of the referenced image.
    fn fetch(&self, reference: &ImageRef) -> io::Result<Vec<u8>>;
}

impl<T: ImageStore + ?Sized> ImageStore for &T {
    fn fetch(&self, reference: &ImageRef) -> io::Result<Vec<u8>> {
        (**self).fetch(reference)
    }
}

/// Image store reading files below a media root directory.
#[derive(Clone, Debug)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    /// Creates a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, reference: &ImageRef) -> io::Result<PathBuf> {
        let relative = Path::new(reference.name());
        let escapes = relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("image reference {reference} escapes the media root"),
            ));
        }
        Ok(self.root.join(relative))
    }
}

impl ImageStore for FsImageStore {
    fn fetch(&self, reference: &ImageRef) -> io::Result<Vec<u8>> {
        let path = self.resolve(reference)?;
        fs::read(&path)
    }
}

/// Reason an image was left out of the document.
#[derive(Debug)]
pub enum SkipReason {
    /// The store could not deliver the bytes.
    Fetch(io::Error),
    /// The bytes are not a decodable raster image.
    Decode(image::ImageError),
    /// The reference points to a format the layout cannot place (PDF certificates).
    UnsupportedFormat,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "image could not be read: {err}"),
            Self::Decode(err) => write!(f, "image could not be decoded: {err}"),
            Self::UnsupportedFormat => f.write_str("image format is not supported"),
        }
    }
}

/// Result of loading one image for placement.
#[derive(Debug)]
pub enum ImageOutcome {
    Decoded(DynamicImage),
    Skipped(SkipReason),
}

impl ImageOutcome {
    /// Returns whether the image was decoded.
    pub fn is_decoded(&self) -> bool {
        matches!(self, Self::Decoded(_))
    }
}

/// Loads an image from in-memory bytes using the [`image`] crate.
pub fn decode_image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<DynamicImage, image::ImageError> {
    image::load_from_memory(bytes.as_ref())
}

/// Fetches and decodes `reference`, folding every failure into [`ImageOutcome::Skipped`].
pub fn load_image(store: &dyn ImageStore, reference: &ImageRef) -> ImageOutcome {
    if reference.is_pdf() {
        return ImageOutcome::Skipped(SkipReason::UnsupportedFormat);
    }

    let bytes = match store.fetch(reference) {
        Ok(bytes) => bytes,
        Err(err) => return ImageOutcome::Skipped(SkipReason::Fetch(err)),
    };

    match decode_image_from_bytes(bytes) {
        Ok(image) => ImageOutcome::Decoded(image),
        Err(err) => ImageOutcome::Skipped(SkipReason::Decode(err)),
    }
}

/// Natural printed size of `image` in millimetres at `dpi`.
pub fn natural_size_mm(image: &DynamicImage, dpi: f64) -> (f64, f64) {
    let (px_width, px_height) = image.dimensions();
    (
        MM_PER_INCH * px_width as f64 / dpi,
        MM_PER_INCH * px_height as f64 / dpi,
    )
}

/// Largest rectangle with the aspect ratio of `image` that fits `frame`, centred in it.
pub fn fit_centered(image: &DynamicImage, frame: Rect) -> Rect {
    let (px_width, px_height) = image.dimensions();
    if px_width == 0 || px_height == 0 || frame.width <= 0.0 || frame.height <= 0.0 {
        return Rect::new(frame.x, frame.y, 0.0, 0.0);
    }

    let scale = (frame.width / px_width as f64).min(frame.height / px_height as f64);
    let width = px_width as f64 * scale;
    let height = px_height as f64 * scale;
    Rect::new(
        frame.x + (frame.width - width) / 2.0,
        frame.y + (frame.height - height) / 2.0,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Cursor;

    use image::{ImageBuffer, ImageOutputFormat, Rgb};

    fn png(width: u32, height: u32) -> Vec<u8> {
        let buffer = ImageBuffer::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(buffer)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .expect("encode png");
        bytes
    }

    struct Fixed(Vec<u8>, Cell<usize>);

    impl ImageStore for Fixed {
        fn fetch(&self, _reference: &ImageRef) -> io::Result<Vec<u8>> {
            self.1.set(self.1.get() + 1);
            Ok(self.0.clone())
        }
    }

    #[test]
    fn fit_preserves_aspect_ratio_and_centres() {
        let image = decode_image_from_bytes(png(200, 100)).expect("decode");
        let fitted = fit_centered(&image, Rect::new(10.0, 20.0, 80.0, 80.0));
        assert!((fitted.width - 80.0).abs() < 1e-9);
        assert!((fitted.height - 40.0).abs() < 1e-9);
        assert!((fitted.y - 40.0).abs() < 1e-9);
        assert!((fitted.x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn pdf_references_are_skipped_without_fetching() {
        let store = Fixed(png(4, 4), Cell::new(0));
        let outcome = load_image(&store, &ImageRef::new("cert.pdf"));
        assert!(matches!(
            outcome,
            ImageOutcome::Skipped(SkipReason::UnsupportedFormat)
        ));
        assert_eq!(store.1.get(), 0);
    }

    #[test]
    fn undecodable_bytes_are_skipped() {
        let store = Fixed(b"not an image".to_vec(), Cell::new(0));
        let outcome = load_image(&store, &ImageRef::new("broken.png"));
        assert!(matches!(outcome, ImageOutcome::Skipped(SkipReason::Decode(_))));
    }

    #[test]
    fn filesystem_store_rejects_escaping_references() {
        let store = FsImageStore::new("/srv/media");
        let err = store.fetch(&ImageRef::new("../secrets.png")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn filesystem_store_reads_relative_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::create_dir_all(dir.path().join("fotos")).expect("create dir");
        fs::write(dir.path().join("fotos/yo.png"), png(3, 3)).expect("write image");

        let store = FsImageStore::new(dir.path());
        let outcome = load_image(&store, &ImageRef::new("fotos/yo.png"));
        assert!(outcome.is_decoded());
    }
}
