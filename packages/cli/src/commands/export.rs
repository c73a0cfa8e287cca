use crate::commands::validate::load_report;
use crate::config::Config;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use reportkit_editor::ReportSession;
use reportkit_export::{encode_pdf, ExportOutcome, PageGeometry, PageSize, PaginationExporter};
use reportkit_render::{LocalImageLoader, PlaceholderDispatch, RemoteImageLoader, RenderDispatch};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Report file (JSON array of blocks)
    pub input: PathBuf,

    /// Output PDF path (defaults to <outDir>/<report>.pdf)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Page size (a4, letter), overrides config
    #[arg(long)]
    pub page: Option<String>,

    /// Page margin in points, overrides config
    #[arg(long)]
    pub margin: Option<f64>,

    /// Also write a JSON layout summary next to the PDF
    #[arg(long)]
    pub summary: bool,

    /// Capture blocks from a live canvas page instead of placeholders
    #[cfg(feature = "chrome")]
    #[arg(long, conflicts_with = "canvas_html")]
    pub canvas_url: Option<String>,

    /// Capture blocks from a saved HTML snapshot of the canvas
    #[cfg(feature = "chrome")]
    #[arg(long)]
    pub canvas_html: Option<PathBuf>,
}

fn resolve_geometry(args: &ExportArgs, config: &Config) -> Result<PageGeometry> {
    let mut geometry = config.geometry();

    if let Some(page) = &args.page {
        let size: PageSize = page.parse()?;
        geometry = PageGeometry::from_size(size)
            .with_margin(geometry.margin)
            .with_block_gap(geometry.block_gap);
    }
    if let Some(margin) = args.margin {
        geometry = geometry.with_margin(margin);
    }

    geometry.validate()?;
    Ok(geometry)
}

fn dispatch_for(args: &ExportArgs, cwd: &str) -> Result<Box<dyn RenderDispatch>> {
    #[cfg(feature = "chrome")]
    if let Some(url) = &args.canvas_url {
        println!("   Canvas: {}", url);
        let dispatch = reportkit_render::ChromeDispatch::connect(url)?;
        return Ok(Box::new(dispatch));
    }

    #[cfg(feature = "chrome")]
    if let Some(html_path) = &args.canvas_html {
        let path = PathBuf::from(cwd).join(html_path);
        let html = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read canvas snapshot {}", path.display()))?;
        println!("   Canvas: {}", html_path.display());
        let dispatch = reportkit_render::ChromeDispatch::from_html(html)?;
        return Ok(Box::new(dispatch));
    }

    let _ = (args, cwd);
    Ok(Box::new(PlaceholderDispatch::new()))
}

fn output_path(args: &ExportArgs, config: &Config, cwd: &str, input: &Path) -> PathBuf {
    match &args.output {
        Some(path) => PathBuf::from(cwd).join(path),
        None => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "report".to_string());
            config.get_out_dir(cwd).join(format!("{}.pdf", stem))
        }
    }
}

pub fn export(args: ExportArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = PathBuf::from(cwd).join(&args.input);
    let doc = load_report(&input)?;
    let title = doc.name.clone();
    let geometry = resolve_geometry(&args, &config)?;

    println!("{}", "📄 Exporting report...".bright_blue().bold());
    println!("   Input:  {}", args.input.display());
    println!(
        "   Page:   {:.0} × {:.0} pt, margin {}",
        geometry.width, geometry.height, geometry.margin
    );

    let dispatch = dispatch_for(&args, cwd)?;
    let loader = RemoteImageLoader::new(LocalImageLoader::new(
        input.parent().unwrap_or(Path::new(cwd)),
    ))?;

    let mut session = ReportSession::new("cli", doc);
    let ticket = session.begin_export()?;

    let runtime = tokio::runtime::Runtime::new().context("Cannot start async runtime")?;
    let ExportOutcome { artifact, warnings } = runtime.block_on(
        PaginationExporter::new(geometry).export(&ticket.blocks, dispatch.as_ref(), &loader),
    )?;
    drop(ticket);

    for warning in &warnings {
        println!("  {} {}", "⚠️".yellow(), warning);
    }

    let out_path = output_path(&args, &config, cwd, &args.input);
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let bytes = encode_pdf(&artifact, &title)?;
    fs::write(&out_path, bytes)
        .with_context(|| format!("Cannot write {}", out_path.display()))?;

    println!(
        "  {} {} → {} ({} page{})",
        "✓".green(),
        args.input.display(),
        out_path.display(),
        artifact.page_count(),
        if artifact.page_count() == 1 { "" } else { "s" }
    );

    if args.summary {
        let summary_path = out_path.with_extension("summary.json");
        let summary = serde_json::to_string_pretty(&artifact.summary())?;
        fs::write(&summary_path, summary)?;
        println!("  {} {}", "✓".green(), summary_path.display());
    }

    println!();
    println!("{}", "✨ Export complete!".green().bold());
    Ok(())
}
