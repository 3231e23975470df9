//! Data provider seam and a JSON file backed implementation.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{Profile, SectionItem, SectionKind};
use crate::sections::{SectionCounts, SectionDescriptor};

/// Supplies the active profile and its section collections.
///
/// Implementations return only visible items, already ordered by the rule of
/// the section descriptor.
pub trait ProfileSource {
    /// Returns the profile currently flagged as active, if any.
    fn active_profile(&self) -> Option<Profile>;

    /// Returns the visible, ordered items of `kind` belonging to `profile`.
    fn section_items(&self, profile: &Profile, kind: SectionKind) -> Vec<SectionItem>;

    /// Counts the visible items of every section for the active profile.
    fn section_counts(&self) -> SectionCounts {
        match self.active_profile() {
            Some(profile) => SectionCounts::new(
                profile.printing_allowed,
                SectionKind::ALL
                    .into_iter()
                    .map(|kind| (kind, self.section_items(&profile, kind).len()))
                    .collect(),
            ),
            None => SectionCounts::default(),
        }
    }
}

/// A profile together with all of its section collections, as stored on disk.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    #[serde(flatten)]
    pub profile: Profile,
    #[serde(default)]
    pub experiences: Vec<SectionItem>,
    #[serde(default)]
    pub courses: Vec<SectionItem>,
    #[serde(default)]
    pub academic_products: Vec<SectionItem>,
    #[serde(default)]
    pub labor_products: Vec<SectionItem>,
    #[serde(default)]
    pub recognitions: Vec<SectionItem>,
    #[serde(default)]
    pub garage_sale: Vec<SectionItem>,
}

impl ProfileRecord {
    /// Creates a record without any section items.
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    /// Returns the raw collection of `kind`.
    pub fn items(&self, kind: SectionKind) -> &[SectionItem] {
        match kind {
            SectionKind::Experience => &self.experiences,
            SectionKind::Courses => &self.courses,
            SectionKind::AcademicProducts => &self.academic_products,
            SectionKind::LaborProducts => &self.labor_products,
            SectionKind::Recognitions => &self.recognitions,
            SectionKind::GarageSale => &self.garage_sale,
        }
    }

    /// Returns the raw collection of `kind` for modification.
    pub fn items_mut(&mut self, kind: SectionKind) -> &mut Vec<SectionItem> {
        match kind {
            SectionKind::Experience => &mut self.experiences,
            SectionKind::Courses => &mut self.courses,
            SectionKind::AcademicProducts => &mut self.academic_products,
            SectionKind::LaborProducts => &mut self.labor_products,
            SectionKind::Recognitions => &mut self.recognitions,
            SectionKind::GarageSale => &mut self.garage_sale,
        }
    }

    /// Appends `item` to the collection of `kind` and returns the updated record.
    pub fn with_item(mut self, kind: SectionKind, item: SectionItem) -> Self {
        self.items_mut(kind).push(item);
        self
    }
}

/// Errors raised while loading a [`JsonStore`].
#[derive(Debug)]
pub enum StoreError {
    /// The store file could not be read.
    Io(std::io::Error),
    /// The store file is not valid JSON for the expected layout.
    Parse(serde_json::Error),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "Failed to read profile store: {err}"),
            Self::Parse(err) => write!(f, "Failed to parse profile store: {err}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

/// In-memory profile store, usually loaded from a JSON document of the form
/// `{ "profiles": [ { "id": 1, "first_names": "...", "courses": [...] } ] }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonStore {
    #[serde(default)]
    profiles: Vec<ProfileRecord>,
}

impl JsonStore {
    /// Creates a store from already built records.
    pub fn new(profiles: Vec<ProfileRecord>) -> Self {
        Self { profiles }
    }

    /// Parses a store from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses the store file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let store = Self::from_json(&contents)?;
        log::debug!(
            "loaded {} profile(s) from {}",
            store.profiles.len(),
            path.as_ref().display()
        );
        Ok(store)
    }

    fn record(&self, profile: &Profile) -> Option<&ProfileRecord> {
        self.profiles
            .iter()
            .find(|record| record.profile.id == profile.id)
    }
}

impl ProfileSource for JsonStore {
    /// The active record with the highest identifier wins when several are flagged.
    fn active_profile(&self) -> Option<Profile> {
        self.profiles
            .iter()
            .filter(|record| record.profile.active)
            .max_by_key(|record| record.profile.id)
            .map(|record| record.profile.clone())
    }

    fn section_items(&self, profile: &Profile, kind: SectionKind) -> Vec<SectionItem> {
        let Some(record) = self.record(profile) else {
            return Vec::new();
        };

        let mut items: Vec<SectionItem> = record
            .items(kind)
            .iter()
            .filter(|item| item.visible)
            .cloned()
            .collect();
        SectionDescriptor::of(kind).ordering.sort(&mut items);
        items
    }
}
