//! Command-line interface for reading harvested metadata.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use roxmltree::Document;
use serde::Serialize;

use crate::config::OAI_DC_PREFIX;
use crate::error::{FormatKind, MetadataError, Result};
use crate::oai::{metadata_elements, record_identifier};
use crate::registry::{create_default_registry, MetadataRegistry};
use crate::schema::SchemaConfig;
use crate::types::FieldValue;

/// RegelRecht OAI-PMH - Read metadata records from harvested XML.
#[derive(Parser)]
#[command(name = "regelrecht-oaipmh")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read metadata from an OAI-PMH response or a bare metadata document.
    Read {
        /// XML file to read
        file: PathBuf,

        /// Metadata prefix selecting the reader
        #[arg(short, long, default_value = OAI_DC_PREFIX)]
        prefix: String,

        /// YAML schema file with additional formats
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
    },

    /// List metadata prefixes that have a reader.
    Formats {
        /// YAML schema file with additional formats
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },
}

/// Serialization used for records on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// One record as printed by `read`.
#[derive(Debug, Serialize)]
pub struct RecordOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub metadata: BTreeMap<String, FieldValue>,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    execute(Cli::parse())
}

/// Execute a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Read {
            file,
            prefix,
            schema,
            format,
        } => read_command(&file, &prefix, schema.as_deref(), format),
        Commands::Formats { schema } => formats_command(schema.as_deref()),
    }
}

/// Build the default registry, extended with the formats from a schema file.
fn build_registry(schema: Option<&Path>) -> Result<MetadataRegistry> {
    let mut registry = create_default_registry();
    if let Some(path) = schema {
        let config = SchemaConfig::load(path)?;
        registry.register_from_config(&config)?;
    }
    Ok(registry)
}

/// Execute the read command.
fn read_command(
    file: &Path,
    prefix: &str,
    schema: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let registry = build_registry(schema)?;

    // Fail before reading the file when the format is unsupported
    if !registry.has_reader(prefix) {
        return Err(MetadataError::UnknownFormat {
            prefix: prefix.to_string(),
            kind: FormatKind::Reader,
        });
    }

    let xml = fs::read_to_string(file)?;
    let doc = Document::parse(&xml)?;

    let mut records = Vec::new();
    let mut degraded = 0;
    for element in metadata_elements(&doc) {
        let metadata = registry.read_metadata(prefix, element)?;
        let identifier = record_identifier(element);

        if metadata.is_degraded() {
            degraded += 1;
        }
        for diagnostic in metadata.diagnostics() {
            eprintln!(
                "{} {}: {}",
                style("warning:").yellow().bold(),
                identifier
                    .as_deref()
                    .map_or_else(|| file.display().to_string(), String::from),
                diagnostic
            );
        }

        records.push(RecordOutput {
            identifier,
            metadata: metadata.into_map(),
        });
    }

    print!("{}", render_records(&records, format)?);

    eprintln!(
        "{} {} record(s) as {}",
        style("Read").bold(),
        style(records.len()).cyan(),
        style(prefix).green()
    );
    if degraded > 0 {
        eprintln!("  Degraded: {}", style(degraded).yellow().bold());
    }

    Ok(())
}

/// Execute the formats command.
fn formats_command(schema: Option<&Path>) -> Result<()> {
    let registry = build_registry(schema)?;
    for prefix in registry.reader_prefixes() {
        println!("{prefix}");
    }
    Ok(())
}

/// Serialize records for stdout.
pub fn render_records(records: &[RecordOutput], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(records)?),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(records)?;
            json.push('\n');
            Ok(json)
        }
    }
}
