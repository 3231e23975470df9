//! Catalogue of CV sections and the per-export section selection.
//!
//! Every section is described once by a [`SectionDescriptor`]; the provider,
//! the evidence collector and the layout engine all look sections up here
//! instead of carrying their own copies of titles, ordering and query keys.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::model::{SectionItem, SectionKind};

/// Ordering applied by the data layer before items reach the layout engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemOrdering {
    /// End date, then start date, then identifier, all descending.
    ByDateRange,
    /// End/issue date, then identifier, both descending.
    ByDate,
    /// Identifier descending.
    ById,
}

impl ItemOrdering {
    /// Compares two items so that sorting yields the newest entries first.
    ///
    /// Missing dates sort ahead of present ones, matching a relational
    /// `ORDER BY ... DESC` on a nullable column.
    pub fn compare(self, a: &SectionItem, b: &SectionItem) -> Ordering {
        let by_id = b.id.cmp(&a.id);
        match self {
            ItemOrdering::ByDateRange => date_desc(a.end_date, b.end_date)
                .then_with(|| date_desc(a.start_date, b.start_date))
                .then(by_id),
            ItemOrdering::ByDate => date_desc(a.end_date, b.end_date).then(by_id),
            ItemOrdering::ById => by_id,
        }
    }

    /// Sorts `items` in place.
    pub fn sort(self, items: &mut [SectionItem]) {
        items.sort_by(|a, b| self.compare(a, b));
    }
}

fn date_desc(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => b.cmp(&a),
    }
}

/// Names a section uses in evidence captions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvidenceNaming {
    /// Section name drawn above the caption.
    pub section: &'static str,
    /// Noun prefixed to evidence labels.
    pub noun: &'static str,
}

/// Static description of one section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectionDescriptor {
    pub kind: SectionKind,
    /// Heading drawn above the section cards.
    pub print_title: &'static str,
    /// Caption names for gallery entries; `None` when the section has no evidence.
    pub evidence: Option<EvidenceNaming>,
    /// Label used when an item has no title.
    pub untitled: &'static str,
    /// Request parameter that toggles the section in the export.
    pub query_key: &'static str,
    pub ordering: ItemOrdering,
}

const DESCRIPTORS: [SectionDescriptor; 6] = [
    SectionDescriptor {
        kind: SectionKind::Experience,
        print_title: "Experiencia Laboral",
        evidence: Some(EvidenceNaming {
            section: "Experiencia laboral",
            noun: "Experiencia",
        }),
        untitled: "Sin título",
        query_key: "experiencia",
        ordering: ItemOrdering::ByDateRange,
    },
    SectionDescriptor {
        kind: SectionKind::Courses,
        print_title: "Formación y Cursos",
        evidence: Some(EvidenceNaming {
            section: "Cursos",
            noun: "Curso",
        }),
        untitled: "Sin título",
        query_key: "cursos",
        ordering: ItemOrdering::ByDateRange,
    },
    SectionDescriptor {
        kind: SectionKind::AcademicProducts,
        print_title: "Productos Académicos",
        evidence: Some(EvidenceNaming {
            section: "Productos académicos",
            noun: "Producto académico",
        }),
        untitled: "Sin título",
        query_key: "prod_acad",
        ordering: ItemOrdering::ById,
    },
    SectionDescriptor {
        kind: SectionKind::LaborProducts,
        print_title: "Productos Laborales",
        evidence: Some(EvidenceNaming {
            section: "Productos laborales",
            noun: "Producto laboral",
        }),
        untitled: "Sin título",
        query_key: "prod_lab",
        ordering: ItemOrdering::ByDate,
    },
    SectionDescriptor {
        kind: SectionKind::Recognitions,
        print_title: "Reconocimientos",
        evidence: Some(EvidenceNaming {
            section: "Reconocimientos",
            noun: "Reconocimiento",
        }),
        untitled: "Reconocimiento",
        query_key: "reconocimientos",
        ordering: ItemOrdering::ByDate,
    },
    SectionDescriptor {
        kind: SectionKind::GarageSale,
        print_title: "Otros",
        evidence: None,
        untitled: "Sin título",
        query_key: "venta",
        ordering: ItemOrdering::ByDate,
    },
];

impl SectionDescriptor {
    /// All descriptors in render priority order.
    pub fn all() -> &'static [SectionDescriptor] {
        &DESCRIPTORS
    }

    /// Looks up the descriptor of `kind`.
    pub fn of(kind: SectionKind) -> &'static SectionDescriptor {
        DESCRIPTORS
            .iter()
            .find(|descriptor| descriptor.kind == kind)
            .unwrap_or(&DESCRIPTORS[0])
    }

    /// Looks up a descriptor by its request parameter name.
    pub fn by_query_key(key: &str) -> Option<&'static SectionDescriptor> {
        DESCRIPTORS.iter().find(|descriptor| descriptor.query_key == key)
    }

    /// Title shown on an item card.
    pub fn card_title<'a>(&self, item: &'a SectionItem) -> &'a str {
        item.title().unwrap_or_default()
    }

    /// Base label identifying `item` in evidence captions.
    pub fn evidence_label(&self, item: &SectionItem) -> Option<String> {
        let naming = self.evidence?;
        let title = item.title().unwrap_or(self.untitled);
        let organization = match self.kind {
            SectionKind::Experience | SectionKind::Recognitions => item
                .organization()
                .map(|organization| format!(" - {organization}"))
                .unwrap_or_default(),
            _ => String::new(),
        };
        Some(format!("{} \"{}{}\"", naming.noun, title, organization))
    }

    /// Whether product photographs of this section are collected as evidence.
    pub fn collects_product_photos(&self) -> bool {
        matches!(
            self.kind,
            SectionKind::AcademicProducts | SectionKind::LaborProducts
        )
    }
}

/// Six independent toggles choosing which sections take part in an export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionSelection {
    pub experience: bool,
    pub courses: bool,
    pub recognitions: bool,
    pub academic_products: bool,
    pub labor_products: bool,
    pub garage_sale: bool,
}

impl SectionSelection {
    /// Selection with every section disabled.
    pub fn none() -> Self {
        Self::default()
    }

    /// Selection with every section enabled.
    pub fn all() -> Self {
        let mut selection = Self::none();
        for kind in SectionKind::ALL {
            selection.set(kind, true);
        }
        selection
    }

    /// Parses `key=value` pairs separated by `&`; only the value `on` enables a section.
    ///
    /// Unknown keys are ignored. A repeated key takes its last value.
    pub fn from_query(query: &str) -> Self {
        let mut selection = Self::none();
        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if let Some(descriptor) = SectionDescriptor::by_query_key(key.trim()) {
                selection.set(descriptor.kind, value.trim() == "on");
            }
        }
        selection
    }

    /// Enables or disables `kind` and returns the updated selection.
    pub fn with(mut self, kind: SectionKind, enabled: bool) -> Self {
        self.set(kind, enabled);
        self
    }

    /// Enables or disables `kind`.
    pub fn set(&mut self, kind: SectionKind, enabled: bool) {
        let flag = match kind {
            SectionKind::Experience => &mut self.experience,
            SectionKind::Courses => &mut self.courses,
            SectionKind::AcademicProducts => &mut self.academic_products,
            SectionKind::LaborProducts => &mut self.labor_products,
            SectionKind::Recognitions => &mut self.recognitions,
            SectionKind::GarageSale => &mut self.garage_sale,
        };
        *flag = enabled;
    }

    /// Returns whether `kind` is enabled.
    pub fn includes(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Experience => self.experience,
            SectionKind::Courses => self.courses,
            SectionKind::AcademicProducts => self.academic_products,
            SectionKind::LaborProducts => self.labor_products,
            SectionKind::Recognitions => self.recognitions,
            SectionKind::GarageSale => self.garage_sale,
        }
    }

    /// Enabled kinds in render priority order.
    pub fn enabled(&self) -> impl Iterator<Item = SectionKind> + '_ {
        SectionKind::ALL
            .into_iter()
            .filter(move |kind| self.includes(*kind))
    }
}

/// Number of visible items per section, as shown on the landing page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SectionCounts {
    pub printing_allowed: bool,
    counts: Vec<(SectionKind, usize)>,
}

impl SectionCounts {
    /// Creates counts from `(kind, count)` pairs.
    pub fn new(printing_allowed: bool, counts: Vec<(SectionKind, usize)>) -> Self {
        Self {
            printing_allowed,
            counts,
        }
    }

    /// Returns the number of visible items of `kind`.
    pub fn get(&self, kind: SectionKind) -> usize {
        self.counts
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Total number of visible items.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, count)| count).sum()
    }
}
