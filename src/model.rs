//! Records describing the CV content that feeds the export.
//!
//! The types mirror what the data provider hands over: one [`Profile`] with its
//! identity fields and a handful of [`SectionItem`] collections.  They derive
//! `serde` traits so the file-backed store in [`crate::provider`] can read them
//! straight from JSON, and they never reference the rendering crates.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reference to an image held by the image store.
///
/// The wrapped value is the storage name of the file (a path relative to the
/// media root for the filesystem store).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Creates a reference from a storage name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the storage name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns whether the reference has no usable name.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Returns whether the referenced file is a PDF document rather than a raster image.
    pub fn is_pdf(&self) -> bool {
        self.0.to_ascii_lowercase().ends_with(".pdf")
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Personal data shown in the sidebar of every page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub id: i64,
    pub first_names: String,
    pub last_names: String,
    pub national_id: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: String,
    pub address: String,
    pub marital_status: String,
    pub photo: Option<ImageRef>,
    pub printing_allowed: bool,
    pub active: bool,
}

impl Profile {
    /// Returns the photo reference when one is set and not blank.
    pub fn photo(&self) -> Option<&ImageRef> {
        self.photo.as_ref().filter(|photo| !photo.is_empty())
    }

    /// Returns the labelled personal fields in display order, skipping blank values.
    pub fn personal_fields(&self) -> Vec<(&'static str, String)> {
        let birth_date = self
            .birth_date
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        [
            ("Cédula", self.national_id.clone()),
            ("Nacimiento", birth_date),
            ("Teléfono", self.phone.clone()),
            ("Dirección", self.address.clone()),
            ("Estado Civil", self.marital_status.clone()),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            let value = value.trim();
            (!value.is_empty()).then(|| (label, value.to_string()))
        })
        .collect()
    }
}

/// Content categories of the CV.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Experience,
    Courses,
    AcademicProducts,
    LaborProducts,
    Recognitions,
    GarageSale,
}

impl SectionKind {
    /// Every kind in render priority order.
    pub const ALL: [SectionKind; 6] = [
        SectionKind::Experience,
        SectionKind::Courses,
        SectionKind::AcademicProducts,
        SectionKind::LaborProducts,
        SectionKind::Recognitions,
        SectionKind::GarageSale,
    ];
}

/// One entry of a section: a course, a job, a product, a recognition or a garage-sale article.
///
/// `organization` holds the employer for work experience and the sponsoring
/// entity for recognitions.  `end_date` is the end, issue or publication date
/// depending on the section.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionItem {
    pub id: i64,
    pub title: Option<String>,
    pub organization: Option<String>,
    pub body: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub certificate_image: Option<ImageRef>,
    pub product_image: Option<ImageRef>,
    pub visible: bool,
}

impl SectionItem {
    /// Creates a visible item with the given identifier and title.
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            visible: true,
            ..Self::default()
        }
    }

    /// Sets the body text and returns the updated item.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the organization and returns the updated item.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Sets the start and end dates and returns the updated item.
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Sets the certificate image and returns the updated item.
    pub fn with_certificate(mut self, image: impl Into<ImageRef>) -> Self {
        self.certificate_image = Some(image.into());
        self
    }

    /// Sets the product photograph and returns the updated item.
    pub fn with_product_image(mut self, image: impl Into<ImageRef>) -> Self {
        self.product_image = Some(image.into());
        self
    }

    /// Sets the visibility flag and returns the updated item.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Returns the trimmed title, if any.
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    /// Returns the trimmed organization, if any.
    pub fn organization(&self) -> Option<&str> {
        non_blank(self.organization.as_deref())
    }

    /// Returns the body text or an empty string.
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    /// Returns the certificate reference when set and not blank.
    pub fn certificate(&self) -> Option<&ImageRef> {
        self.certificate_image.as_ref().filter(|image| !image.is_empty())
    }

    /// Returns the product photograph reference when set and not blank.
    pub fn product_photo(&self) -> Option<&ImageRef> {
        self.product_image.as_ref().filter(|image| !image.is_empty())
    }

    /// Returns whether the certificate is a PDF file, which web pages embed instead of showing.
    pub fn certificate_is_pdf(&self) -> bool {
        self.certificate().is_some_and(ImageRef::is_pdf)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personal_fields_skip_blank_values() {
        let profile = Profile {
            national_id: "0102030405".into(),
            phone: "   ".into(),
            address: " Av. Siempre Viva 742 ".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 2),
            ..Profile::default()
        };

        let fields = profile.personal_fields();
        let labels: Vec<_> = fields.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, ["Cédula", "Nacimiento", "Dirección"]);
        assert_eq!(fields[1].1, "1990-04-02");
        assert_eq!(fields[2].1, "Av. Siempre Viva 742");
    }

    #[test]
    fn blank_photo_counts_as_absent() {
        let profile = Profile {
            photo: Some(ImageRef::new("  ")),
            ..Profile::default()
        };
        assert!(profile.photo().is_none());
    }

    #[test]
    fn pdf_certificates_are_detected_case_insensitively() {
        let item = SectionItem::new(1, "Rust").with_certificate("certs/Rust.PDF");
        assert!(item.certificate_is_pdf());

        let item = SectionItem::new(2, "Go").with_certificate("certs/go.png");
        assert!(!item.certificate_is_pdf());
    }
}
