mod config;
mod error;
mod layout;
mod manifest;
mod pdf;
mod tag;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::{load_settings_config, Dimension, MarginSetting, Orientation, PaperSize, SheetSettings};
use layout::create_sheet;
use manifest::save_manifest;
use pdf::{render_sheet, PdfRenderer, QrSymbolEncoder, StandardFont};
use tag::XorShiftSource;

/// Lay out a grid of uniquely tagged QR codes on a printable page.
#[derive(Parser, Debug)]
#[command(name = "qr_tag_sheet")]
#[command(about = "Lay out a grid of uniquely tagged QR codes on a printable page.", long_about = None)]
struct Args {
    /// settings.json to start from; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of rows of tags
    #[arg(short, long)]
    rows: Option<usize>,

    /// Number of columns of tags
    #[arg(short = 'k', long)]
    cols: Option<usize>,

    /// Margin on every side, in mm
    #[arg(short, long)]
    margin: Option<f64>,

    /// URI prefix each tag is appended to in its QR code
    #[arg(short, long)]
    prefix: Option<String>,

    #[arg(long, value_enum)]
    paper: Option<PaperSize>,

    #[arg(long)]
    landscape: bool,

    /// Standard PDF font name, e.g. Helvetica or Courier-Bold
    #[arg(long)]
    font: Option<String>,

    /// Seed for reproducible tags
    #[arg(long)]
    seed: Option<u64>,

    /// Print tags without QR codes
    #[arg(long)]
    no_symbols: bool,

    /// Also write a CSV listing every tag and its position
    #[arg(long)]
    manifest: Option<PathBuf>,

    #[arg(short, long, default_value = "tags.pdf")]
    output: PathBuf,
}

fn settings_from_args(args: &Args) -> Result<SheetSettings> {
    let mut settings = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            load_settings_config(path)?
        }
        None => SheetSettings::default(),
    };

    if let Some(rows) = args.rows {
        settings.rows = rows;
    }
    if let Some(cols) = args.cols {
        settings.cols = cols;
    }
    if let Some(margin) = args.margin {
        settings.margin = MarginSetting::Uniform(Dimension(margin));
    }
    if let Some(prefix) = &args.prefix {
        settings.prefix = Some(prefix.clone());
    }
    if let Some(paper) = args.paper {
        settings.paper = paper;
    }
    if args.landscape {
        settings.orientation = Orientation::Landscape;
    }
    if let Some(font) = &args.font {
        settings.render.font = font.clone();
    }
    if args.no_symbols {
        settings.render.symbols = false;
    }
    Ok(settings)
}

fn run(args: Args) -> Result<()> {
    let settings = settings_from_args(&args)?;

    let font = StandardFont::from_name(&settings.render.font)
        .ok_or_else(|| anyhow!("Unknown font: {}", settings.render.font))?;

    let source = match args.seed {
        Some(seed) => XorShiftSource::from_seed(seed),
        None => XorShiftSource::from_entropy()
            .map_err(|e| anyhow!("Failed to seed tag generator: {}", e))?,
    };

    let mut sheet = create_sheet(&settings, source)?;
    info!(
        margin = %sheet.margin(),
        content_area = %sheet.content_area(),
        cell_size = %sheet.cell_size(),
        "Laid out {} x {} tags",
        sheet.rows(),
        sheet.cols()
    );

    if settings.render.symbols {
        sheet = sheet
            .with_symbols(&QrSymbolEncoder::default())
            .context("Failed to encode QR codes")?;
    }

    let renderer = PdfRenderer {
        font,
        font_size: settings.render.font_size.as_mm(),
    };
    render_sheet(&sheet, &renderer, &args.output)
        .with_context(|| format!("Failed to write {:?}", args.output))?;
    info!("Saved {:?}", args.output);

    if let Some(path) = &args.manifest {
        save_manifest(&sheet, path).with_context(|| format!("Failed to write manifest {:?}", path))?;
        info!("Saved manifest {:?}", path);
    }

    println!("{}", sheet);
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("Caused by: {}", cause);
        }
        std::process::exit(1);
    }
}
