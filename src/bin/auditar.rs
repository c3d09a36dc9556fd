use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use resolucao_auditor::config::{Config, ProfileArgs};
use resolucao_auditor::render::{render_report_html, render_text};
use resolucao_auditor::{Auditor, ProfileRegistry};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Html,
    Text,
}

/// Audit a resolution and print the findings
#[derive(Debug, Parser)]
#[command(name = "auditar")]
#[command(about = "Audit the structure of a legal resolution")]
#[command(version)]
struct Cli {
    /// UTF-8 text file to audit, or `-` for stdin
    file: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    #[command(flatten)]
    profile: ProfileArgs,
}

fn read_input(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::from_profile_args(cli.profile)?;
    let text = read_input(&cli.file)?;

    let auditor = Auditor::new(ProfileRegistry::from_config(&config))
        .with_forced_type(config.forced_document_type);
    let result = auditor.audit(&text);
    log::debug!(
        "{} diagnostic(s) over {} rule evaluation(s)",
        result.diagnostics.len(),
        result.rules.len()
    );

    // Rendering works on the same normalised text the offsets refer to
    let document = resolucao_auditor::Document::new(&text);
    let output = match cli.format {
        Format::Json => serde_json::to_string_pretty(&result).context("Failed to serialize result")?,
        Format::Html => render_report_html(document.text(), &result),
        Format::Text => render_text(document.text(), &result),
    };
    println!("{}", output);

    Ok(if result.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
