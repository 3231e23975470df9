//! Orchestration of one document: sidebar, sections, gallery.

use log::debug;

use crate::evidence::Evidence;
use crate::images::ImageStore;
use crate::layout::cards::{draw_section, RenderedSection};
use crate::layout::gallery::{draw_gallery, GallerySummary};
use crate::layout::sidebar::{PhotoStatus, Sidebar, SidebarPhoto};
use crate::layout::PageFlow;
use crate::model::{Profile, SectionItem, SectionKind};
use crate::sections::SectionDescriptor;
use crate::surface::Surface;

/// Stage of a document generation.
///
/// A generation walks `Init → SidebarDrawn → RenderingSections → Gallery → Done`;
/// the gallery stage is left out when there is no evidence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentStage {
    Init,
    SidebarDrawn,
    RenderingSections,
    Gallery,
    Done,
}

/// Everything a document is rendered from, already filtered and ordered.
#[derive(Clone, Debug, Default)]
pub struct CvContent {
    pub profile: Profile,
    /// Selected collections in render priority order.
    pub sections: Vec<(SectionKind, Vec<SectionItem>)>,
    pub evidence: Vec<Evidence>,
}

/// What a finished generation produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderReport {
    pub pages: usize,
    pub sections: Vec<RenderedSection>,
    pub gallery: Option<GallerySummary>,
    pub photo: PhotoStatus,
    pub stage: DocumentStage,
}

impl RenderReport {
    /// Total number of cards over all sections.
    pub fn cards(&self) -> usize {
        self.sections.iter().map(|section| section.cards).sum()
    }

    /// The rendered section of `kind`, if it was drawn.
    pub fn section(&self, kind: SectionKind) -> Option<&RenderedSection> {
        self.sections.iter().find(|section| section.kind == kind)
    }
}

/// Runs the generation stages over a surface.
pub struct DocumentRenderer<'a> {
    content: &'a CvContent,
    images: &'a dyn ImageStore,
    stage: DocumentStage,
}

impl<'a> DocumentRenderer<'a> {
    pub fn new(content: &'a CvContent, images: &'a dyn ImageStore) -> Self {
        Self {
            content,
            images,
            stage: DocumentStage::Init,
        }
    }

    /// Current stage.
    pub fn stage(&self) -> DocumentStage {
        self.stage
    }

    /// Draws the whole document onto `surface`, which must be on its first, empty page.
    pub fn render<S: Surface + ?Sized>(mut self, surface: &mut S) -> RenderReport {
        let (content, images) = (self.content, self.images);
        let photo = SidebarPhoto::load(&content.profile, images);
        let sidebar = Sidebar::new(&content.profile, &photo);

        sidebar.draw(surface);
        self.enter(DocumentStage::SidebarDrawn);

        let mut flow = PageFlow::new(sidebar);
        let mut sections = Vec::new();
        self.enter(DocumentStage::RenderingSections);
        for (kind, items) in &content.sections {
            if items.is_empty() {
                debug!("section {kind:?} has no visible items, skipped");
                continue;
            }
            let descriptor = SectionDescriptor::of(*kind);
            sections.push(draw_section(surface, &mut flow, descriptor, items));
        }

        let gallery = if content.evidence.is_empty() {
            None
        } else {
            self.enter(DocumentStage::Gallery);
            Some(draw_gallery(surface, images, &content.evidence))
        };

        self.enter(DocumentStage::Done);
        RenderReport {
            pages: surface.page_count(),
            sections,
            gallery,
            photo: photo.status(),
            stage: self.stage,
        }
    }

    fn enter(&mut self, stage: DocumentStage) {
        debug!("document stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }
}
