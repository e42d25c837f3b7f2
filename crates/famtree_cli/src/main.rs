//! Command-line entry point for the family-tree engine.
//!
//! # Responsibility
//! - Wire files, configuration and logging to the core passes.
//! - Print pass results and warnings; exit non-zero on any pass error.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use famtree_core::{
    init_logging, DocumentWriter, FamilyName, FamilyTree, LogTarget, PagedText, PagedTextSink,
    PassOutput, TemplateConfig, TemplateGenerator, TemplateReader, TextFile,
};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "famtree")]
#[command(about = "Decompose family-tree narratives and read paginated family documents")]
#[command(version)]
struct Args {
    /// JSON configuration file (page layout, logging)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files (stderr when omitted)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decompose a narrative text file and write the paginated document
    Generate {
        /// Narrative text file
        #[arg(long)]
        text: PathBuf,
        /// Family name, `Name` or `Name-id`
        #[arg(long)]
        family: String,
        /// Output file, pages separated by form feeds
        #[arg(long)]
        output: PathBuf,
    },
    /// Read a paginated document back into the model
    Read {
        /// Paginated document, pages separated by form feeds
        #[arg(long)]
        pages: PathBuf,
        /// Family name `Name-id`, or a container path ending in `Name-id/<file>`
        #[arg(long)]
        family: String,
        /// Print the model as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read a paginated document and print its generation tree
    Tree {
        #[arg(long)]
        pages: PathBuf,
        #[arg(long)]
        family: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => TemplateConfig::load(path)
            .with_context(|| format!("failed to load config `{}`", path.display()))?,
        None => TemplateConfig::default(),
    };
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if let Some(dir) = args.log_dir {
        config.log_dir = Some(dir);
    }
    init_logging(
        &config.log_level,
        LogTarget::from_option(config.log_dir.as_deref()),
    )
    .map_err(anyhow::Error::msg)
    .context("failed to initialize logging")?;

    match args.command {
        Command::Generate {
            text,
            family,
            output,
        } => generate(&config, &text, &family, &output),
        Command::Read {
            pages,
            family,
            json,
        } => {
            let output = read(&pages, &family)?;
            if json {
                let rendered = serde_json::to_string_pretty(&output.template)
                    .context("failed to serialize template")?;
                println!("{rendered}");
            } else {
                println!("{}", output.template);
            }
            Ok(())
        }
        Command::Tree { pages, family } => {
            let output = read(&pages, &family)?;
            let tree = FamilyTree::build(&output.template)
                .with_context(|| format!("failed to build tree from `{}`", pages.display()))?;
            println!("{tree}");
            Ok(())
        }
    }
}

fn generate(config: &TemplateConfig, text: &Path, family: &str, output: &Path) -> Result<()> {
    // `Name-id` keeps an existing identity; a bare name gets a fresh id.
    let family_name = family
        .parse::<FamilyName>()
        .or_else(|_| FamilyName::generate(family))
        .with_context(|| format!("invalid family name `{family}`"))?;

    let pass = TemplateGenerator::new(family_name)
        .generate(&TextFile::new(text))
        .with_context(|| format!("failed to decompose `{}`", text.display()))?;
    print_warnings(&pass);

    let mut sink = PagedTextSink::new(config.layout.usable_height);
    let summary = DocumentWriter::new(config.layout)
        .write(&pass.template.lines, &mut sink)
        .context("failed to paginate template")?;
    sink.save(output)
        .with_context(|| format!("failed to write `{}`", output.display()))?;

    info!(
        "event=cli_generate module=cli status=ok lines={} pages={}",
        summary.lines, summary.pages
    );
    println!(
        "family={} lines={} pages={} output={}",
        pass.template.family_name,
        summary.lines,
        summary.pages,
        output.display()
    );
    Ok(())
}

fn read(pages: &Path, family: &str) -> Result<PassOutput> {
    let family_name = if family.contains('/') {
        FamilyName::from_container_path(family)
    } else {
        family.parse::<FamilyName>()
    }
    .with_context(|| format!("invalid family name `{family}`"))?;

    let source = PagedText::load(pages)
        .with_context(|| format!("failed to open `{}`", pages.display()))?;
    let pass = TemplateReader::new(family_name)
        .read(&source)
        .with_context(|| format!("failed to read `{}`", pages.display()))?;
    print_warnings(&pass);
    Ok(pass)
}

fn print_warnings(pass: &PassOutput) {
    for warning in &pass.warnings {
        eprintln!("warning: {warning}");
    }
}

#[cfg(test)]
mod tests {
    use super::read;
    use std::path::Path;

    #[test]
    fn read_errors_name_the_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pages");
        let err = read(&missing, "Smith-1").unwrap_err();
        let rendered = format!("{err:#}");
        assert!(rendered.starts_with(&format!("failed to open `{}`", missing.display())));
        assert!(err.chain().count() >= 2);
    }

    #[test]
    fn read_errors_name_the_bad_family() {
        let err = read(Path::new("unused.pages"), "Smith").unwrap_err();
        assert!(format!("{err:#}").starts_with("invalid family name `Smith`"));
    }
}
