// SPDX-License-Identifier: Apache-2.0
//! Skiff CLI
//!
//! Batch surface over the chart engine: validate a chart file, rewrite it in
//! canonical form, or summarize its contents.

#![allow(clippy::print_stdout)] // a CLI's job is printing

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use skiff_codec::{deserialize, layout_graph, serialize, Deserialized};
use skiff_graph::{is_valid, DiagnosticMap, Graph, LinkKind, NodeKind, Severity};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Skiff deployment-chart toolkit", long_about = None)]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Validate a chart file and report every finding
    Validate {
        /// Chart file to check
        file: PathBuf,
    },
    /// Parse a chart file and rewrite it in canonical form
    Fmt {
        /// Chart file to canonicalize
        file: PathBuf,
        /// Write here instead of stdout
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarize a chart file: node and link counts
    Inspect {
        /// Chart file to summarize
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    match args.cmd {
        Command::Validate { file } => validate(&file),
        Command::Fmt { file, output } => fmt(&file, output.as_deref()),
        Command::Inspect { file } => inspect(&file),
    }
}

fn load(file: &Path) -> Result<Deserialized> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    Ok(deserialize(&text))
}

fn validate(file: &Path) -> Result<()> {
    let mut out = load(file)?;
    let diagnostics = skiff_rules::analyze(&mut out.graph);
    print_findings(&out.graph, &diagnostics);
    let errors = diagnostics
        .values()
        .flatten()
        .filter(|d| d.severity == Severity::Error)
        .count();
    if errors > 0 {
        bail!("{errors} error(s) in {}", file.display());
    }
    println!("{}: ok ({} nodes)", file.display(), out.graph.len());
    Ok(())
}

fn fmt(file: &Path, output: Option<&Path>) -> Result<()> {
    let mut out = load(file)?;
    layout_graph(&mut out.graph);
    let yaml = match serialize(&mut out.graph, &out.info) {
        Ok(yaml) => yaml,
        Err(skiff_codec::CodecError::Invalid(diagnostics)) => {
            print_findings(&out.graph, &diagnostics);
            bail!("refusing to rewrite {}: chart has errors", file.display());
        }
        Err(err) => return Err(err.into()),
    };
    match output {
        Some(path) => fs::write(path, yaml)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{yaml}"),
    }
    Ok(())
}

fn inspect(file: &Path) -> Result<()> {
    let out = load(file)?;
    for (label, kind) in [
        ("data sources", NodeKind::DataSource),
        ("stored procedures", NodeKind::StoredProcedure),
        ("event triggers", NodeKind::EventTrigger),
        ("events", NodeKind::Event),
    ] {
        let count = out.graph.iter().filter(|n| n.kind == kind).count();
        println!("{label}: {count}");
    }
    for (label, kind) in [
        ("hard links", LinkKind::Hard),
        ("soft links", LinkKind::Soft),
        ("event links", LinkKind::Event),
    ] {
        let count = out.graph.edges().filter(|e| e.kind == kind).count();
        println!("{label}: {count}");
    }
    Ok(())
}

fn print_findings(graph: &Graph, diagnostics: &DiagnosticMap) {
    for (origin, findings) in diagnostics {
        let name = graph
            .node(origin)
            .map_or_else(|| origin.to_string(), |n| n.name.clone());
        for finding in findings {
            println!("{}: [{}] {name}: {}", finding.severity, finding.code, finding.message);
            for detail in &finding.details {
                println!("    - {detail}");
            }
        }
    }
    if is_valid(diagnostics) && !diagnostics.is_empty() {
        println!("(warnings only; chart is serializable)");
    }
}
