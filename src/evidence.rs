//! Evidence images collected from the selected section items.

use crate::model::{ImageRef, SectionItem, SectionKind};
use crate::sections::SectionDescriptor;

const PRODUCT_PHOTO_SUFFIX: &str = "Imagen del producto";

/// Kind of evidence image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvidenceKind {
    /// A certificate scan attached to an item.
    Certificate,
    /// A photograph of an academic or labor product.
    Product,
}

/// One image of the evidence gallery with its caption parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evidence {
    pub kind: EvidenceKind,
    /// Section name drawn in bold above the label.
    pub section: &'static str,
    pub label: String,
    pub image: ImageRef,
}

/// Sections in the order their certificates enter the gallery.
///
/// Courses lead even though experience is rendered first.
const CERTIFICATE_ORDER: [SectionKind; 5] = [
    SectionKind::Courses,
    SectionKind::Experience,
    SectionKind::AcademicProducts,
    SectionKind::LaborProducts,
    SectionKind::Recognitions,
];

/// Builds the gallery list: every certificate first, then every product photograph.
///
/// Certificates follow [`CERTIFICATE_ORDER`], product photographs the
/// academic then labor collections; inside a collection the item order is
/// kept.
pub fn collect_evidence(sections: &[(SectionKind, Vec<SectionItem>)]) -> Vec<Evidence> {
    let mut evidence = Vec::new();

    for kind in CERTIFICATE_ORDER {
        let descriptor = SectionDescriptor::of(kind);
        let Some(naming) = descriptor.evidence else {
            continue;
        };
        for item in visible_items(sections, kind) {
            if let (Some(certificate), Some(label)) =
                (item.certificate(), descriptor.evidence_label(item))
            {
                evidence.push(Evidence {
                    kind: EvidenceKind::Certificate,
                    section: naming.section,
                    label,
                    image: certificate.clone(),
                });
            }
        }
    }

    for descriptor in SectionDescriptor::all()
        .iter()
        .filter(|descriptor| descriptor.collects_product_photos())
    {
        let Some(naming) = descriptor.evidence else {
            continue;
        };
        for item in visible_items(sections, descriptor.kind) {
            if let (Some(photo), Some(label)) =
                (item.product_photo(), descriptor.evidence_label(item))
            {
                evidence.push(Evidence {
                    kind: EvidenceKind::Product,
                    section: naming.section,
                    label: format!("{label} — {PRODUCT_PHOTO_SUFFIX}"),
                    image: photo.clone(),
                });
            }
        }
    }

    evidence
}

fn visible_items(
    sections: &[(SectionKind, Vec<SectionItem>)],
    kind: SectionKind,
) -> impl Iterator<Item = &SectionItem> {
    sections
        .iter()
        .filter(move |(section, _)| *section == kind)
        .flat_map(|(_, items)| items.iter())
        .filter(|item| item.visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificates_come_before_product_photos() {
        let sections = vec![
            (
                SectionKind::Experience,
                vec![SectionItem::new(1, "Dev")
                    .with_organization("ACME")
                    .with_certificate("exp.png")],
            ),
            (
                SectionKind::Courses,
                vec![
                    SectionItem::new(2, "Rust").with_certificate("rust.png"),
                    SectionItem::new(3, "Go"),
                ],
            ),
            (
                SectionKind::AcademicProducts,
                vec![SectionItem::new(4, "Paper")
                    .with_product_image("paper.jpg")
                    .with_certificate("paper-cert.png")],
            ),
            (
                SectionKind::GarageSale,
                vec![SectionItem::new(5, "Bike")
                    .with_product_image("bike.jpg")
                    .with_certificate("bike.png")],
            ),
        ];

        let evidence = collect_evidence(&sections);
        let images: Vec<_> = evidence.iter().map(|e| e.image.name()).collect();
        assert_eq!(images, ["rust.png", "exp.png", "paper-cert.png", "paper.jpg"]);
        assert_eq!(evidence[1].label, "Experiencia \"Dev - ACME\"");
        assert_eq!(evidence[1].section, "Experiencia laboral");
        assert_eq!(
            evidence[3].label,
            "Producto académico \"Paper\" — Imagen del producto"
        );
        assert_eq!(evidence[3].kind, EvidenceKind::Product);
    }

    #[test]
    fn hidden_items_and_blank_references_are_ignored() {
        let sections = vec![(
            SectionKind::Courses,
            vec![
                SectionItem::new(1, "Hidden")
                    .with_certificate("hidden.png")
                    .with_visible(false),
                SectionItem::new(2, "Blank").with_certificate(" "),
            ],
        )];
        assert!(collect_evidence(&sections).is_empty());
    }
}
