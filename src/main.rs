//! Main entry point for the fipack CLI application.
//!
//! Three modes share one command line:
//! - pack (default): add files and directories to a new archive
//! - extract (`-e DIR`): write every member of the input archives below DIR
//! - info (`-i ARCHIVE`): print the entry table of an archive

mod cli;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use fipack::config::PackConfig;
use fipack::extract::extract_all;
use fipack::inputs::collect_inputs;
use fipack::{listing, ArchiveBuilder, ArchiveReader, FiasError};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the -v/-q flags
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    if let Some(archive) = &cli.info {
        return show_info(archive, cli.json);
    }

    if let Some(dir) = &cli.extract {
        return extract(&cli, dir);
    }

    pack(&cli)
}

fn pack(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => PackConfig::load(path)?,
        None => PackConfig::default(),
    };

    let roots = if cli.inputs.is_empty() {
        config.inputs.clone()
    } else {
        cli.inputs.clone()
    };
    if roots.is_empty() {
        bail!("no input files given");
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| config.output_or_default());

    let inputs = collect_inputs(&roots, config.strip_prefix.as_deref())?;
    let mut builder = ArchiveBuilder::new().with_limits(config.limits);
    let mut skipped = 0usize;

    for input in &inputs {
        match builder.add_as(&input.member, &input.source) {
            Ok(()) => {}
            Err(e @ FiasError::SourceUnreadable { .. }) if !cli.strict => {
                tracing::warn!(error = %e, "Skipping input");
                skipped += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("cannot add {}", input.source.display()));
            }
        }
    }

    let written = builder
        .write(&output)
        .with_context(|| format!("cannot write archive {}", output.display()))?;

    println!(
        "packed {} files ({} bytes) into {}",
        builder.entry_count(),
        written,
        output.display()
    );
    if skipped > 0 {
        println!("skipped {} unreadable inputs", skipped);
    }
    Ok(())
}

fn extract(cli: &Cli, dir: &Path) -> Result<()> {
    if cli.inputs.is_empty() {
        bail!("no archive given to extract");
    }

    let mut failed = 0usize;
    for archive in &cli.inputs {
        if archive.is_dir() {
            bail!("cannot extract directories: {}", archive.display());
        }

        let mut reader = ArchiveReader::open(archive)
            .with_context(|| format!("cannot open archive {}", archive.display()))?;
        let summary = extract_all(&mut reader, dir)
            .with_context(|| format!("cannot extract {}", archive.display()))?;

        println!(
            "extracted {} files ({} bytes) from {} into {}",
            summary.files,
            summary.bytes,
            archive.display(),
            dir.display()
        );
        for member in &summary.skipped {
            println!("refused unsafe path: {}", member);
        }
        for member in &summary.failed {
            println!("failed to write: {}", member);
        }
        failed += summary.failed.len();
    }

    if failed > 0 {
        bail!("{} members could not be written", failed);
    }
    Ok(())
}

fn show_info(archive: &Path, json: bool) -> Result<()> {
    let reader = ArchiveReader::open(archive)
        .with_context(|| format!("cannot open archive {}", archive.display()))?;

    if json {
        println!("{}", listing::render_json(reader.entries())?);
        return Ok(());
    }

    println!("\npackage contents:\n");
    for line in listing::render_table(reader.entries(), reader.longest_path_len()) {
        println!("{}", line);
    }
    println!();
    Ok(())
}
