// SPDX-License-Identifier: Apache-2.0
//! Structured validation findings and the per-run reporter.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ident::NodeId;

/// Finding severity. Only [`Severity::Error`] blocks serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocking rule violation.
    Error,
    /// Non-blocking finding (e.g. repeated display name).
    Warning,
    /// Informational note.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

/// One structured validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Finding severity.
    pub severity: Severity,
    /// Stable rule identifier, e.g. `edge.self-loop`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Node the finding is attributed to. Findings with no origin (or an
    /// origin absent from the graph) are dropped during grouping.
    pub origin: Option<NodeId>,
    /// Per-entry payload for list-field findings (the offending entries).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Diagnostic {
    /// Creates a finding with `severity`.
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
            origin: None,
            details: Vec::new(),
        }
    }

    /// Creates an error finding.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a warning finding.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Creates an info finding.
    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }

    /// Attributes the finding to a node.
    #[must_use]
    pub fn with_origin(mut self, origin: NodeId) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Attaches per-entry details.
    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// Diagnostics grouped by origin node id.
pub type DiagnosticMap = BTreeMap<NodeId, Vec<Diagnostic>>;

/// Returns `true` when the map holds no error-severity finding.
///
/// Warnings and infos never block.
#[must_use]
pub fn is_valid(diagnostics: &DiagnosticMap) -> bool {
    diagnostics
        .values()
        .flatten()
        .all(|d| d.severity != Severity::Error)
}

/// Accumulates findings for one traversal run.
///
/// Visitors report through this; the engine drains it at `exit_graph` and
/// groups by origin. A reporter is fresh per run, never persisted.
#[derive(Debug, Default)]
pub struct Reporter {
    findings: Vec<Diagnostic>,
}

impl Reporter {
    /// Creates an empty reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a finding.
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.findings.push(diagnostic);
    }

    /// Number of findings recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Returns `true` when nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Consumes the reporter, yielding findings in report order.
    #[must_use]
    pub fn into_findings(self) -> Vec<Diagnostic> {
        self.findings
    }
}
