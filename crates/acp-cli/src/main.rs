//! ACP builder CLI

mod config;

use acp_compiler::Compiler;
use anyhow::{Context, Result};
use clap::Parser;
use config::{BuildConfig, Overrides};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "acp-build")]
#[command(author, version, about = "Compile an ACP project into an Arduino library", long_about = None)]
struct Cli {
    /// Project description (JSON)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Root directory of the module tree
    #[arg(short, long)]
    modules: Option<PathBuf>,

    /// Directory that receives the generated library
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the generated library (defaults to the project file name)
    #[arg(short = 'n', long)]
    library_name: Option<String>,

    /// Flatten module sources into a single directory
    #[arg(long)]
    merge_sources: bool,

    /// Build the library with ACP_DEBUG enabled
    #[arg(long)]
    debug: bool,

    /// Remove a previously generated library first
    #[arg(long)]
    clean: bool,

    /// JSON build config; flags take precedence over its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log per-module and per-file detail
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => BuildConfig::load(path)?,
        None => BuildConfig::default(),
    };
    let (modules, settings) = config.resolve(Overrides {
        modules_path: cli.modules,
        project_file: cli.project,
        output_root: cli.output,
        library_name: cli.library_name,
        merge_source_directories: cli.merge_sources,
        debug_mode: cli.debug,
    })?;

    let library_dir = settings.library_dir();
    if cli.clean && library_dir.exists() {
        info!(dir = %library_dir.display(), "removing previous library");
        fs::remove_dir_all(&library_dir)
            .with_context(|| format!("cannot remove {}", library_dir.display()))?;
    }

    let report = Compiler::new(modules)
        .compile(&settings)
        .with_context(|| format!("compilation of {} failed", settings.project_file.display()))?;

    println!(
        "Library '{}' generated in {} ({} modules, {} files, {} bytes of EEPROM)",
        settings.library_name,
        library_dir.display(),
        report.modules.len(),
        report.files.len(),
        report.eeprom_usage,
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "acp-build",
            "-p",
            "blink.json",
            "-m",
            "modules",
            "-o",
            "out",
            "--merge-sources",
            "--clean",
        ]);
        assert_eq!(cli.project, Some(PathBuf::from("blink.json")));
        assert!(cli.merge_sources);
        assert!(cli.clean);
        assert!(!cli.debug);
        assert!(cli.library_name.is_none());
    }

    #[test]
    fn test_run_reports_missing_project() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "acp-build",
            "-p",
            dir.path().join("missing.json").to_str().unwrap(),
            "-m",
            dir.path().to_str().unwrap(),
            "-o",
            dir.path().join("out").to_str().unwrap(),
        ]);
        let err = run(cli).unwrap_err();
        let text = format!("{err:#}");
        assert!(text.contains("Project configuration contains errors."));
    }

    #[test]
    fn test_clean_removes_previous_library() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("out/Blink/stale.txt");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "old").unwrap();
        fs::write(
            dir.path().join("Blink.json"),
            r#"{"project": {"platform": "ArduinoUno"}}"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("modules")).unwrap();

        let cli = Cli::parse_from([
            "acp-build",
            "-p",
            dir.path().join("Blink.json").to_str().unwrap(),
            "-m",
            dir.path().join("modules").to_str().unwrap(),
            "-o",
            dir.path().join("out").to_str().unwrap(),
            "--clean",
        ]);
        run(cli).unwrap();
        assert!(!stale.exists());
        assert!(dir.path().join("out/Blink/src/Blink.h").is_file());
    }
}
