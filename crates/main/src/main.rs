use std::error::Error;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hoja_vida::images::FsImageStore;
use hoja_vida::provider::{JsonStore, ProfileSource};
use hoja_vida::sections::SectionDescriptor;
use hoja_vida::{SectionKind, SectionSelection};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exports the active CV profile of a JSON store as a PDF.
///
/// Settings can also come from a `.env` file in the working directory.
/// Bundled fonts are looked up in `HOJA_VIDA_FONTS_DIR` or `assets/fonts`
/// next to the binary; without them the builtin Helvetica pair is used.
#[derive(Parser)]
#[command(author, version, about = "Hoja de vida PDF export")]
struct Cli {
    /// JSON document holding the profiles and their sections.
    #[arg(long, global = true, env = "HOJA_VIDA_STORE", default_value = "hoja_vida.json")]
    store: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the selected sections of the active profile to a PDF file.
    Export(ExportArgs),

    /// Print how many visible items every section of the active profile has.
    Summary,

    /// List the visible items of one section in print order.
    #[command(name = "sections", alias = "list")]
    Sections {
        #[arg(value_enum)]
        kind: SectionArg,
    },
}

#[derive(Args)]
struct ExportArgs {
    /// Directory image references are resolved against.
    #[arg(long, env = "HOJA_VIDA_MEDIA_ROOT", default_value = "media")]
    media_root: PathBuf,

    /// Output file.
    #[arg(long, short, default_value = hoja_vida::export::PDF_FILENAME)]
    out: PathBuf,

    /// Query string selecting sections, e.g. `experiencia=on&cursos=on`.
    #[arg(long, conflicts_with = "all")]
    query: Option<String>,

    /// Include every section.
    #[arg(long)]
    all: bool,

    /// Sections to include; repeatable.
    #[arg(long = "section", short = 's', value_enum)]
    sections: Vec<SectionArg>,

    /// Add an outline entry per section and for the gallery.
    #[arg(long)]
    bookmarks: bool,
}

impl ExportArgs {
    fn selection(&self) -> SectionSelection {
        let mut selection = match (&self.query, self.all) {
            (Some(query), _) => SectionSelection::from_query(query),
            (None, true) => SectionSelection::all(),
            (None, false) => SectionSelection::none(),
        };
        for section in &self.sections {
            selection.set(section.kind(), true);
        }
        selection
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SectionArg {
    Experiencia,
    Cursos,
    ProdAcad,
    ProdLab,
    Reconocimientos,
    Venta,
}

impl SectionArg {
    fn kind(self) -> SectionKind {
        match self {
            Self::Experiencia => SectionKind::Experience,
            Self::Cursos => SectionKind::Courses,
            Self::ProdAcad => SectionKind::AcademicProducts,
            Self::ProdLab => SectionKind::LaborProducts,
            Self::Reconocimientos => SectionKind::Recognitions,
            Self::Venta => SectionKind::GarageSale,
        }
    }
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let store = JsonStore::load(&cli.store)
        .with_context(|| format!("failed to open store {}", cli.store.display()))?;

    match cli.command {
        Commands::Export(args) => export(&store, &args),
        Commands::Summary => summary(&store),
        Commands::Sections { kind } => list_section(&store, kind.kind()),
    }
}

fn export(store: &JsonStore, args: &ExportArgs) -> Result<()> {
    let images = FsImageStore::new(&args.media_root);
    let selection = args.selection();

    #[cfg(feature = "bookmarks")]
    let exported = if args.bookmarks {
        hoja_vida::export_pdf_with_bookmarks(store, &images, selection)
    } else {
        hoja_vida::export_pdf(store, &images, selection)
    };
    #[cfg(not(feature = "bookmarks"))]
    let exported = {
        if args.bookmarks {
            tracing::warn!("built without the bookmarks feature, writing the document without an outline");
        }
        hoja_vida::export_pdf(store, &images, selection)
    };

    let exported = exported.context("export failed")?;
    fs::write(&args.out, &exported.bytes)
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    info!(
        pages = exported.report.pages,
        cards = exported.report.cards(),
        "wrote {} ({})",
        args.out.display(),
        exported.media_type()
    );
    Ok(())
}

fn summary(store: &JsonStore) -> Result<()> {
    let profile = store
        .active_profile()
        .context("no active profile in the store")?;
    let counts = store.section_counts();

    println!(
        "{} {} (impresión {})",
        profile.first_names.trim(),
        profile.last_names.trim(),
        if counts.printing_allowed {
            "permitida"
        } else {
            "bloqueada"
        }
    );
    for descriptor in SectionDescriptor::all() {
        println!(
            "  {:<22} {:>3}  [{}]",
            descriptor.print_title,
            counts.get(descriptor.kind),
            descriptor.query_key
        );
    }
    println!("  {:<22} {:>3}", "Total", counts.total());
    Ok(())
}

fn list_section(store: &JsonStore, kind: SectionKind) -> Result<()> {
    let profile = store
        .active_profile()
        .context("no active profile in the store")?;
    let descriptor = SectionDescriptor::of(kind);

    println!("{}", descriptor.print_title);
    for item in store.section_items(&profile, kind) {
        let mut line = format!("  #{:<5} {}", item.id, item.title().unwrap_or(descriptor.untitled));
        if let Some(organization) = item.organization() {
            line.push_str(&format!(" - {organization}"));
        }
        if item.certificate_is_pdf() {
            line.push_str("  (certificado PDF)");
        } else if item.certificate().is_some() {
            line.push_str("  (certificado)");
        }
        println!("{line}");
    }
    Ok(())
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
