use std::cell::Cell;
use std::collections::HashMap;
use std::io::{self, Cursor};

use chrono::NaiveDate;
use hoja_vida::document::DocumentStage;
use hoja_vida::images::ImageStore;
use hoja_vida::layout::sidebar::PhotoStatus;
use hoja_vida::model::ImageRef;
use hoja_vida::provider::{JsonStore, ProfileRecord};
use hoja_vida::surface::recording::{DrawOp, RecordingSurface};
use hoja_vida::surface::Surface;
use hoja_vida::{export_document, ExportError, Profile, SectionItem, SectionKind, SectionSelection};
use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};

/// In-memory image store counting every fetch.
#[derive(Default)]
struct MemoryImages {
    files: HashMap<String, Vec<u8>>,
    fetches: Cell<usize>,
}

impl MemoryImages {
    fn with_png(mut self, name: &str) -> Self {
        self.files.insert(name.to_string(), png(64, 48));
        self
    }

    fn with_bytes(mut self, name: &str, bytes: &[u8]) -> Self {
        self.files.insert(name.to_string(), bytes.to_vec());
        self
    }
}

impl ImageStore for MemoryImages {
    fn fetch(&self, reference: &ImageRef) -> io::Result<Vec<u8>> {
        self.fetches.set(self.fetches.get() + 1);
        self.files
            .get(reference.name())
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, reference.to_string()))
    }
}

fn png(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([x as u8, y as u8, 90])
    }));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .expect("encode png");
    bytes
}

fn profile(printing_allowed: bool) -> Profile {
    Profile {
        id: 7,
        first_names: "María José".into(),
        last_names: "Zambrano Cedeño".into(),
        national_id: "1309876543".into(),
        birth_date: NaiveDate::from_ymd_opt(1998, 3, 14),
        phone: "0991234567".into(),
        address: "Manta, Barrio Jocay".into(),
        printing_allowed,
        active: true,
        ..Profile::default()
    }
}

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn courses_store() -> JsonStore {
    let record = ProfileRecord::new(profile(true))
        .with_item(
            SectionKind::Courses,
            SectionItem::new(1, "Fundamentos de Rust")
                .with_body("Ownership, préstamos y tiempos de vida.")
                .with_dates(date(2022, 1, 10), date(2022, 3, 1)),
        )
        .with_item(
            SectionKind::Courses,
            SectionItem::new(2, "PostgreSQL avanzado")
                .with_body("Índices, planes de ejecución\ny particionamiento.")
                .with_dates(date(2023, 5, 2), date(2023, 6, 30))
                .with_certificate("certs/postgres.png"),
        )
        .with_item(
            SectionKind::Courses,
            SectionItem::new(3, "Docker en producción").with_dates(date(2021, 8, 1), date(2021, 9, 1)),
        )
        .with_item(
            SectionKind::Experience,
            SectionItem::new(4, "Desarrolladora backend").with_organization("Tecnosur"),
        );
    JsonStore::new(vec![record])
}

#[test]
fn printing_disabled_draws_nothing() {
    let store = JsonStore::new(vec![ProfileRecord::new(profile(false))]);
    let images = MemoryImages::default();
    let mut surface = RecordingSurface::new();

    let err = export_document(&store, &images, SectionSelection::all(), &mut surface).unwrap_err();

    assert!(matches!(err, ExportError::NotAuthorized));
    assert!(surface.is_empty());
    assert_eq!(images.fetches.get(), 0);
}

#[test]
fn missing_active_profile_is_not_found() {
    let mut inactive = profile(true);
    inactive.active = false;
    let store = JsonStore::new(vec![ProfileRecord::new(inactive)]);
    let mut surface = RecordingSurface::new();

    let err = export_document(&store, &MemoryImages::default(), SectionSelection::all(), &mut surface)
        .unwrap_err();

    assert!(matches!(err, ExportError::NotFound));
    assert_eq!(err.status_code(), 404);
    assert!(surface.is_empty());
}

#[test]
fn courses_only_export_has_one_section_and_one_gallery_image() {
    let images = MemoryImages::default().with_png("certs/postgres.png");
    let mut surface = RecordingSurface::new();

    let report = export_document(
        &courses_store(),
        &images,
        SectionSelection::from_query("cursos=on"),
        &mut surface,
    )
    .expect("export succeeds");

    assert_eq!(report.stage, DocumentStage::Done);
    assert_eq!(report.sections.len(), 1);
    assert_eq!(report.sections[0].kind, SectionKind::Courses);
    assert_eq!(report.sections[0].cards, 3);
    assert_eq!(surface.count_text("FORMACIÓN Y CURSOS"), 1);
    assert_eq!(surface.count_text("EXPERIENCIA LABORAL"), 0);

    let gallery = report.gallery.as_ref().expect("gallery drawn");
    assert_eq!(gallery.placed, 1);
    assert_eq!(gallery.rows, 1);
    assert_eq!(surface.images().len(), 1);
    assert_eq!(surface.images()[0].0, gallery.first_page);
    assert_eq!(surface.count_text("GALERÍA DE EVIDENCIAS"), 1);
}

#[test]
fn items_keep_the_provider_order() {
    let mut surface = RecordingSurface::new();
    export_document(
        &courses_store(),
        &MemoryImages::default(),
        SectionSelection::none().with(SectionKind::Courses, true),
        &mut surface,
    )
    .expect("export succeeds");

    let titles: Vec<_> = surface
        .texts()
        .into_iter()
        .filter(|text| {
            ["Fundamentos de Rust", "PostgreSQL avanzado", "Docker en producción"].contains(text)
        })
        .collect();
    assert_eq!(
        titles,
        ["PostgreSQL avanzado", "Fundamentos de Rust", "Docker en producción"]
    );
}

#[test]
fn gallery_rows_and_continuation_pages() {
    let mut record = ProfileRecord::new(profile(true));
    let mut images = MemoryImages::default();
    for id in 1..=9 {
        let name = format!("certs/{id}.png");
        images = images.with_png(&name);
        record = record.with_item(
            SectionKind::Recognitions,
            SectionItem::new(id, format!("Premio {id}"))
                .with_organization("ULEAM")
                .with_dates(None, date(2020, 1, id as u32))
                .with_certificate(name.as_str()),
        );
    }
    let store = JsonStore::new(vec![record]);
    let mut surface = RecordingSurface::new();

    let report = export_document(
        &store,
        &images,
        SectionSelection::none().with(SectionKind::Recognitions, true),
        &mut surface,
    )
    .expect("export succeeds");

    let gallery = report.gallery.as_ref().expect("gallery drawn");
    assert_eq!(gallery.placed, 9);
    assert_eq!(gallery.rows, 5);
    assert_eq!(gallery.pages, 2);
    assert_eq!(surface.images().len(), 9);
    assert_eq!(surface.count_text("Galería (cont.)"), 1);
    assert_eq!(report.pages, gallery.first_page + 1);

    let continuation: Vec<_> = surface
        .images()
        .into_iter()
        .filter(|(page, _)| *page == gallery.first_page + 1)
        .collect();
    assert_eq!(continuation.len(), 3);
}

#[test]
fn long_sections_repeat_the_sidebar_on_every_page() {
    let mut record = ProfileRecord::new(profile(true));
    for id in 1..=30 {
        record = record.with_item(
            SectionKind::Experience,
            SectionItem::new(id, format!("Cargo {id}"))
                .with_organization("Empresa")
                .with_body("Responsable de la operación diaria.\nCoordinación de equipos."),
        );
    }
    let store = JsonStore::new(vec![record]);
    let mut surface = RecordingSurface::new();

    let report = export_document(
        &store,
        &MemoryImages::default(),
        SectionSelection::all(),
        &mut surface,
    )
    .expect("export succeeds");

    assert!(report.pages > 1);
    assert!(report.gallery.is_none());
    for page in 1..=report.pages {
        assert!(
            surface.texts_on_page(page).contains(&"INFORMACIÓN PERSONAL"),
            "sidebar missing on page {page}"
        );
    }
    assert_eq!(report.sections[0].cards, 30);
}

#[test]
fn absent_photo_never_touches_the_image_store() {
    let images = MemoryImages::default();
    let mut surface = RecordingSurface::new();

    let report = export_document(
        &courses_store(),
        &images,
        SectionSelection::none().with(SectionKind::Experience, true),
        &mut surface,
    )
    .expect("export succeeds");

    assert_eq!(report.photo, PhotoStatus::Absent);
    assert!(report.pages >= 1);
    assert_eq!(images.fetches.get(), 0);
    assert_eq!(surface.count(|op| matches!(op, DrawOp::PushClipCircle { .. })), 0);
}

#[test]
fn present_photo_is_fetched_once_and_clipped_on_every_page() {
    let mut owner = profile(true);
    owner.photo = Some(ImageRef::new("fotos/perfil.png"));
    let mut record = ProfileRecord::new(owner);
    for id in 1..=25 {
        record = record.with_item(
            SectionKind::Courses,
            SectionItem::new(id, format!("Curso {id}")).with_body("Uno\nDos\nTres"),
        );
    }
    let store = JsonStore::new(vec![record]);
    let images = MemoryImages::default().with_png("fotos/perfil.png");
    let mut surface = RecordingSurface::new();

    let report = export_document(&store, &images, SectionSelection::all(), &mut surface)
        .expect("export succeeds");

    assert_eq!(report.photo, PhotoStatus::Drawn);
    assert!(report.pages > 1);
    assert_eq!(images.fetches.get(), 1);
    assert_eq!(
        surface.count(|op| matches!(op, DrawOp::PushClipCircle { .. })),
        report.pages
    );
    assert_eq!(surface.images().len(), report.pages);
}

#[test]
fn broken_images_degrade_to_captions() {
    let mut owner = profile(true);
    owner.photo = Some(ImageRef::new("fotos/rota.jpg"));
    let store = JsonStore::new(vec![ProfileRecord::new(owner)
        .with_item(
            SectionKind::AcademicProducts,
            SectionItem::new(1, "Artículo indexado")
                .with_product_image("productos/articulo.png")
                .with_certificate("certs/articulo.pdf"),
        )
        .with_item(
            SectionKind::Courses,
            SectionItem::new(2, "Redes").with_certificate("certs/redes.png"),
        )]);
    let images = MemoryImages::default()
        .with_bytes("fotos/rota.jpg", b"not a jpeg")
        .with_png("certs/redes.png");
    let mut surface = RecordingSurface::new();

    let report = export_document(&store, &images, SectionSelection::all(), &mut surface)
        .expect("export succeeds");

    assert_eq!(report.photo, PhotoStatus::Skipped);
    let gallery = report.gallery.as_ref().expect("gallery drawn");
    assert_eq!(gallery.placed, 1);
    assert_eq!(gallery.skipped, 2);
    assert_eq!(gallery.rows, 2);
    assert_eq!(surface.images().len(), 1);
    assert_eq!(
        surface.count(|op| matches!(op, DrawOp::RoundedRect { .. })),
        3
    );
    assert!(surface.texts().join(" ").contains("Imagen del producto"));
}

#[test]
fn gallery_starts_on_its_own_page() {
    let images = MemoryImages::default().with_png("certs/postgres.png");
    let mut surface = RecordingSurface::new();
    let report = export_document(
        &courses_store(),
        &images,
        SectionSelection::all(),
        &mut surface,
    )
    .expect("export succeeds");

    let gallery = report.gallery.as_ref().expect("gallery drawn");
    let sections_end = report
        .sections
        .iter()
        .map(|section| section.first_page)
        .max()
        .unwrap_or(1);
    assert!(gallery.first_page > sections_end);
    assert_eq!(surface.page_count(), report.pages);
    assert!(!surface
        .texts_on_page(gallery.first_page)
        .contains(&"INFORMACIÓN PERSONAL"));
}
