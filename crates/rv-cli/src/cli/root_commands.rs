use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use rv_core::QueryType;
use rv_lake::Source;

use crate::cli::subcommands::ConcernCommands;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Ingest a source and print the assembled report.
    Report(ReportArgs),
    /// Ingest a source and print the tables and columns it carries.
    Probe(ProbeArgs),
    /// Ingest a source and print the synthesized query per report domain.
    Queries(QueriesArgs),
    /// Read or clear persisted VM concerns.
    Concerns {
        #[command(subcommand)]
        action: ConcernCommands,
    },
    /// Print the JSON Schema of an output record type.
    Schema(SchemaArgs),
}

/// Where to ingest from. Exactly one is required.
#[derive(Clone, Debug, Args)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Spreadsheet export from the inspection tool.
    #[arg(long, value_name = "PATH")]
    pub excel_file: Option<PathBuf>,
    /// Relational (SQLite) snapshot from the migration-planning tool.
    #[arg(long, value_name = "PATH")]
    pub sqlite_file: Option<PathBuf>,
}

impl SourceArgs {
    /// The selected source. `None` only if clap's group check was bypassed.
    #[must_use]
    pub fn source(&self) -> Option<Source> {
        match (&self.excel_file, &self.sqlite_file) {
            (Some(path), _) => Some(Source::Tabular(path.clone())),
            (None, Some(path)) => Some(Source::Foreign(path.clone())),
            (None, None) => None,
        }
    }
}

/// Arguments for `rvl report`.
#[derive(Clone, Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Report domains to assemble (repeat or comma-separate). Defaults to all.
    #[arg(long, value_name = "DOMAIN", value_delimiter = ',')]
    pub only: Vec<QueryType>,
    /// Only VMs in this cluster.
    #[arg(long)]
    pub cluster: Option<String>,
    /// Max VMs to return.
    #[arg(long)]
    pub limit: Option<u64>,
    /// VMs to skip before the first one returned.
    #[arg(long)]
    pub offset: Option<u64>,
}

/// Arguments for `rvl probe`.
#[derive(Clone, Debug, Args)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for `rvl queries`.
#[derive(Clone, Debug, Args)]
pub struct QueriesArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Output record types with a published schema.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    Vm,
    Datastore,
    Network,
    Host,
    Os,
    Vcenter,
    Concern,
    ConcernRecord,
}

/// Arguments for `rvl schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    pub type_name: SchemaType,
}
