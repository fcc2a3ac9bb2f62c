//! Zentinel SOAP inspection tool.
//!
//! Run with: `zentinel-soap-inspect --config config.yaml request.xml`
//!
//! Parses one SOAP document, checks its envelope structure and lists the
//! header and message entries a dispatcher would see.

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use zentinel_soap_dispatch::{DispatchConfig, Document, Fault, HeaderDispatcher, Parser};

/// SOAP envelope inspector for Zentinel.
///
/// Reports envelope violations as a JSON fault and otherwise prints every
/// header (with role targeting and MustUnderstand flags) and message entry.
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML)
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// SOAP document to inspect
    input: PathBuf,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging
    let log_level = args.log_level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Config file: {}", args.config.display());

    // Load configuration
    let config = if args.config.exists() {
        DispatchConfig::load(&args.config).context("Failed to load config file")?
    } else {
        info!("Config file not found, using defaults");
        DispatchConfig::default()
    };

    info!(
        soap_namespace = config.soap_namespace(),
        roles = config.header_roles().len(),
        "Configuration loaded"
    );

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let document = Document::parse_with(&content, &config.xml).context("Failed to parse document")?;

    let parser = Parser::new(&document, config.soap_namespace());
    let dispatcher = HeaderDispatcher::from_config(&config);

    match inspect(&parser, &dispatcher) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(fault) => {
            println!("{}", serde_json::to_string_pretty(&fault)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn inspect(parser: &Parser<'_>, dispatcher: &HeaderDispatcher) -> Result<(), Fault> {
    parser.ensure_basics()?;

    println!("headers:");
    for header in parser.headers()? {
        println!(
            "  {{{}}}{} role={} mustUnderstand={} targeted={}",
            header.namespace().unwrap_or(""),
            header.tag(),
            header.role().unwrap_or("-"),
            header.must_understand(),
            dispatcher.has_role(header.role()),
        );
    }

    println!("messages ({}):", parser.count_messages());
    for message in parser.messages()? {
        println!("  {{{}}}{}", message.namespace().unwrap_or(""), message.tag());
    }

    Ok(())
}
