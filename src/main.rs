//! Trifactor demo CLI
//!
//! Stands in for the calling layer: reads enrollment requests and login
//! attempts as JSON files, runs them through the verifier and prints JSON.
//! Transcription, embedding extraction and storage happen elsewhere.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use tracing_subscriber::EnvFilter;

use trifactor::{
    EnrollRequest, InMemoryTemplateStore, LoggingYamlConfig, MatchAttempt, MatchResult,
    TrifactorConfig, UserTemplate, Verifier,
};

/// Trifactor - passphrase, gesture and voice verification
#[derive(Parser, Debug)]
#[command(name = "trifactor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML config file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a user template and print it as JSON
    Enroll {
        /// Enrollment request JSON
        request: PathBuf,

        /// Write the template here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a login attempt against a stored template
    Verify {
        /// Template JSON produced by `enroll`
        #[arg(short, long)]
        template: PathBuf,

        /// Login attempt JSON
        attempt: PathBuf,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TrifactorConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TrifactorConfig::default(),
    };
    init_tracing(&config.logging);

    let verifier = config.build_verifier()?;
    tracing::debug!(name = ?config.name, "verifier ready");

    match cli.command {
        Commands::Enroll { request, output } => {
            let json = enroll_file(&verifier, &request)?;
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("writing template {}", path.display()))?,
                None => println!("{json}"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Verify { template, attempt } => {
            let result = verify_files(&verifier, &template, &attempt)?;
            println!("{}", serde_json::to_string(&result)?);
            Ok(exit_code(&result))
        }
    }
}

/// Template JSON for the enrollment request stored at `request`.
fn enroll_file(verifier: &Verifier, request: &Path) -> anyhow::Result<String> {
    let request: EnrollRequest = read_json(request)?;
    let store = InMemoryTemplateStore::new();
    let template = verifier.enroll(&store, request)?;
    Ok(template.to_json()?)
}

fn verify_files(verifier: &Verifier, template: &Path, attempt: &Path) -> anyhow::Result<MatchResult> {
    let raw = fs::read_to_string(template)
        .with_context(|| format!("reading template {}", template.display()))?;
    let template = UserTemplate::from_json(&raw)?;
    let attempt: MatchAttempt = read_json(attempt)?;
    Ok(verifier.verify(&attempt, &template))
}

/// 0 when accepted, 2 when rejected; 1 stays reserved for errors.
fn exit_code_value(result: &MatchResult) -> u8 {
    if result.is_accepted() { 0 } else { 2 }
}

fn exit_code(result: &MatchResult) -> ExitCode {
    ExitCode::from(exit_code_value(result))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn init_tracing(cfg: &LoggingYamlConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cfg.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
