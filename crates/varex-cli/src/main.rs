use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use varex_codegen::{css, json, style_guide, CssExportOptions, DownloadFile};
use varex_model::{ModeSelection, OrganizedExport};
use varex_organizer::{Organizer, Snapshot};

/// varex - design variable exporter
#[derive(Parser)]
#[command(name = "varex")]
#[command(about = "Export design variables from a host snapshot as JSON or CSS")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print variable counts per type and per mode
    Summary {
        /// Snapshot file (JSON dump of the document's variables)
        snapshot: PathBuf,
    },

    /// Export variables as JSON
    Json {
        snapshot: PathBuf,

        /// Spaces per indent level (default 2, max 10)
        #[arg(long)]
        indent: Option<usize>,

        /// Mode name, or "all"
        #[arg(long)]
        mode: Option<String>,

        /// Write the file into this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export variables as CSS custom properties
    Css {
        snapshot: PathBuf,

        /// Prefix prepended to every property name
        #[arg(long)]
        prefix: Option<String>,

        /// Omit the per-type comment headers
        #[arg(long)]
        flat: bool,

        /// Keep repeated consecutive words in property names
        #[arg(long)]
        keep_duplicate_words: bool,

        /// Mode name, or "all"
        #[arg(long)]
        mode: Option<String>,

        /// Write the file into this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the style guide layout as JSON
    StyleGuide { snapshot: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match cli.command {
        Command::Summary { snapshot } => cmd_summary(&snapshot),
        Command::Json {
            snapshot,
            indent,
            mode,
            output,
        } => cmd_json(&snapshot, indent, mode, output.as_deref()),
        Command::Css {
            snapshot,
            prefix,
            flat,
            keep_duplicate_words,
            mode,
            output,
        } => {
            let options = css_options(prefix, flat, keep_duplicate_words, mode);
            cmd_css(&snapshot, &options, output.as_deref())
        }
        Command::StyleGuide { snapshot } => cmd_style_guide(&snapshot),
    }
}

fn load(path: &Path) -> Result<OrganizedExport> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let snapshot = Snapshot::from_json(&source)
        .with_context(|| format!("failed to load {}", path.display()))?;
    debug!(
        variables = snapshot.variables.len(),
        collections = snapshot.collections.len(),
        "loaded snapshot"
    );

    let export = pollster::block_on(Organizer::new(&snapshot).collect())?;
    Ok(export)
}

fn emit(file: &DownloadFile, output: Option<&Path>) -> Result<()> {
    match output {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let path = dir.join(&file.filename);
            std::fs::write(&path, &file.content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
            eprintln!("Wrote: {}", path.display());
        }
        None => print!("{}", file.content),
    }
    Ok(())
}

fn css_options(
    prefix: Option<String>,
    flat: bool,
    keep_duplicate_words: bool,
    mode: Option<String>,
) -> CssExportOptions {
    CssExportOptions {
        use_prefix: prefix.is_some(),
        prefix: prefix.unwrap_or_default(),
        group_by_collection: !flat,
        remove_duplicate_words: !keep_duplicate_words,
        mode: ModeSelection::from(mode),
    }
}

fn cmd_summary(path: &Path) -> Result<()> {
    let export = load(path)?;
    print!("{}", summarize(&export));
    Ok(())
}

fn summarize(export: &OrganizedExport) -> String {
    let mut out = String::new();
    let meta = &export.metadata;
    out.push_str(&format!("{}: {} variables\n", meta.file_name, meta.total_variables));

    for (ty, bucket) in &export.variables_by_type {
        out.push_str(&format!("  {ty}: {}\n", bucket.count));
    }

    if let Some(by_mode) = &export.variables_by_mode {
        out.push_str("Modes:\n");
        for (mode, groups) in by_mode {
            let count: usize = groups.values().map(|bucket| bucket.count).sum();
            out.push_str(&format!("  {mode}: {count}\n"));
        }
    }
    out
}

fn cmd_json(
    path: &Path,
    indent: Option<usize>,
    mode: Option<String>,
    output: Option<&Path>,
) -> Result<()> {
    let export = load(path)?;
    let file = json::download(&export, indent, &ModeSelection::from(mode))?;
    emit(&file, output)
}

fn cmd_css(path: &Path, options: &CssExportOptions, output: Option<&Path>) -> Result<()> {
    let export = load(path)?;
    emit(&css::download(&export, options), output)
}

fn cmd_style_guide(path: &Path) -> Result<()> {
    let export = load(path)?;
    let plan = style_guide::build(&export);
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
