//! CLI tool for extracting visual slides from PowerPoint files.

#[cfg(test)]
mod fixtures;
mod pipeline;

use anyhow::{Context, Result};
use clap::Parser;
use pdfium_render::prelude::Pdfium;
use slidepick_convert::{Converter, ConverterConfig, HttpConverter, LocalPdf};
use slidepick_core::{Error, ScanReport};
use slidepick_render::{bind_pdfium, PdfiumRenderer};
use slidepick_report::DOCX_MIME;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Collect the slides of a presentation that carry pictures, tables, charts,
/// groups or drawn shapes into a Word document.
#[derive(Parser, Debug)]
#[command(name = "slidepick")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file(s) (.pptx)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// URL of the PPTX-to-PDF conversion service
    #[arg(long, env = "SLIDEPICK_CONVERTER_URL")]
    converter_url: Option<String>,

    /// Conversion request timeout in seconds
    #[arg(long, default_value = "120")]
    timeout: u64,

    /// Retries on transient conversion failures
    #[arg(long, default_value = "2")]
    retries: u32,

    /// Delay between conversion retries in milliseconds (grows linearly)
    #[arg(long, default_value = "500")]
    retry_backoff_ms: u64,

    /// Use an already converted PDF instead of the conversion service
    /// (takes precedence over --converter-url)
    #[arg(long)]
    pdf: Option<PathBuf>,

    /// Directory containing the PDFium library
    #[arg(long)]
    pdfium_dir: Option<PathBuf>,

    /// Render scale (1.0 renders at 72 DPI)
    #[arg(long, default_value = "1.0")]
    scale: f32,

    /// Only print which slides would be extracted
    #[arg(long)]
    scan_only: bool,

    /// Print the classification as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if args.pdf.is_some() && args.input.len() > 1 {
        anyhow::bail!("--pdf can only be used with a single input file");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut stages = Stages::default();

    let mut failed = 0;
    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        let result = process_file(input_path, &args, &mut out, |presentation, scan| {
            let (converter, pdfium) = stages.get(&args)?;
            write_report(input_path, &args, presentation, scan, converter, pdfium)
        });
        if let Err(e) = result {
            eprintln!("Error processing {}: {:#}", input_path.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, args.input.len());
    }

    Ok(())
}

/// Converter and PDFium binding, set up on first use.
#[derive(Default)]
struct Stages {
    ready: Option<(Box<dyn Converter>, Pdfium)>,
}

impl Stages {
    fn get(&mut self, args: &Args) -> Result<(&dyn Converter, &Pdfium)> {
        let ready = match self.ready.take() {
            Some(ready) => ready,
            None => {
                let converter = build_converter(args)?;
                let pdfium = bind_pdfium(args.pdfium_dir.as_deref())
                    .context("Failed to load the PDFium library")?;
                (converter, pdfium)
            }
        };
        let (converter, pdfium) = self.ready.insert(ready);
        Ok((&**converter, pdfium))
    }
}

/// Pick the PDF source: a local file or the conversion service.
fn build_converter(args: &Args) -> Result<Box<dyn Converter>> {
    if let Some(pdf_path) = &args.pdf {
        let pdf = std::fs::read(pdf_path)
            .with_context(|| format!("Failed to read {}", pdf_path.display()))?;
        return Ok(Box::new(LocalPdf::new(pdf)));
    }

    let endpoint = args.converter_url.as_deref().ok_or_else(|| {
        anyhow::anyhow!(
            "No conversion service configured; pass --converter-url, set SLIDEPICK_CONVERTER_URL, or use --pdf"
        )
    })?;

    let config = ConverterConfig::new(endpoint)
        .with_timeout(Duration::from_secs(args.timeout))
        .with_max_retries(args.retries)
        .with_retry_backoff(Duration::from_millis(args.retry_backoff_ms));

    let converter = HttpConverter::new(config).context("Invalid converter configuration")?;
    Ok(Box::new(converter))
}

/// Classify a single presentation and print the selection, then hand it to
/// `report` unless scanning only.
///
/// The selection is printed before `report` runs, so it stays visible when
/// conversion setup or rendering fails.
fn process_file<W, F>(input_path: &Path, args: &Args, out: &mut W, report: F) -> Result<()>
where
    W: Write,
    F: FnOnce(&[u8], &ScanReport) -> Result<()>,
{
    let presentation = std::fs::read(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;

    let filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let scan = pipeline::classify(&presentation, filename)
        .with_context(|| format!("Failed to read presentation {}", filename))?;
    print_scan(out, input_path, &scan, args.json)?;
    out.flush()?;

    if args.scan_only {
        return Ok(());
    }

    report(&presentation, &scan)
}

/// Convert, render and write the report for one presentation.
fn write_report(
    input_path: &Path,
    args: &Args,
    presentation: &[u8],
    scan: &ScanReport,
    converter: &dyn Converter,
    pdfium: &Pdfium,
) -> Result<()> {
    log::debug!("Rendering {} slide(s) from {}", scan.merged.len(), input_path.display());
    let report = pipeline::render_report(presentation, scan, converter, |pdf| {
        PdfiumRenderer::load(pdfium, pdf, args.scale)
    });

    let docx = match report {
        Ok(docx) => docx,
        Err(Error::Conversion(e)) => {
            anyhow::bail!("Conversion to PDF failed: {}", e)
        }
        Err(e) if e.is_internal() => {
            anyhow::bail!(
                "Converted PDF does not match the presentation (internal inconsistency): {}",
                e
            )
        }
        Err(e) => return Err(e).context("Failed to build the report"),
    };

    let output_path = get_output_path(input_path, args.output.as_ref())?;
    write_output(&output_path, &docx)?;
    log::info!("Wrote {} ({})", output_path.display(), DOCX_MIME);
    if args.verbose {
        eprintln!("Written to: {}", output_path.display());
    }

    Ok(())
}

/// Show which slides were selected.
fn print_scan<W: Write>(out: &mut W, input_path: &Path, scan: &ScanReport, json: bool) -> Result<()> {
    if json {
        let value = serde_json::json!({
            "file": input_path.display().to_string(),
            "scan": scan,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }

    let image_slides: Vec<String> = scan
        .image_slides
        .iter()
        .map(|(slide, ext)| format!("{} ({})", slide, ext))
        .collect();
    let visual_slides: Vec<String> = scan.visual_slides.iter().map(|n| n.to_string()).collect();
    let merged: Vec<String> = scan.merged.iter().map(|n| n.to_string()).collect();

    writeln!(out, "{}", input_path.display())?;
    writeln!(out, "  Slides with images: [{}]", image_slides.join(", "))?;
    writeln!(out, "  Slides with visual elements: [{}]", visual_slides.join(", "))?;
    writeln!(out, "  Combined slides with visuals: [{}]", merged.join(", "))?;

    Ok(())
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: Option<&PathBuf>) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}_visuals.docx", stem);

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

/// Write the report to a file.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
