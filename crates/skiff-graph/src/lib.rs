// SPDX-License-Identifier: Apache-2.0
//! Deployment-chart graph model shared across skiff tools.
//!
//! Pure data (typed nodes, derived links, payloads) plus the machinery every
//! consumer needs: the connection-policy table, structured diagnostics, the
//! visitor protocol, and the two-pass traversal engine. Rule logic and codecs
//! live in `skiff-rules` and `skiff-codec`; this crate stays contract-only.

mod diag;
mod graph;
mod ident;
mod node;
mod policy;
mod traverse;
mod visitor;

pub use diag::{is_valid, Diagnostic, DiagnosticMap, Reporter, Severity};
pub use graph::{Edge, Graph};
pub use ident::NodeId;
pub use node::{DataSourcePayload, DataType, Node, NodeKind, Payload, Position, WorkloadPayload};
pub use policy::{allowed_kinds, is_allowed, LinkKind, LINK_KINDS};
pub use traverse::run;
pub use visitor::GraphVisitor;
