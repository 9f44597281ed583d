// SPDX-License-Identifier: Apache-2.0
//! CLI behavior: exit codes, diagnostic output, fmt idempotence.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

const GOOD_CHART: &str = "\
apiVersion: skiff.dev/v1alpha1
schemaVersion: v1
kind: DeploymentChart
metadata:
  name: sample
chart:
  dataSources:
    datasource_0:
      id: ds
      name: inbox
      type: file
      path: /data/in
      resourceName: input
  storedProcedures:
    procedure_0:
      metadata:
        id: sp
        name: processor
        image: hvt://repo/app
      links:
        hardLinks:
          - destination: datasource_0
";

const BAD_CHART: &str = "\
chart:
  storedProcedures:
    procedure_0:
      metadata:
        id: sp
        name: broken
        image: not-an-image
      links:
        hardLinks:
          - destination: procedure_0
";

fn skiff() -> Command {
    #[allow(clippy::unwrap_used)]
    Command::cargo_bin("skiff").unwrap()
}

#[test]
fn validate_accepts_a_good_chart() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let path = dir.path().join("chart.yaml");
    fs::write(&path, GOOD_CHART).unwrap_or_else(|e| panic!("write: {e}"));

    skiff()
        .args(["validate"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok (2 nodes)"));
}

#[test]
fn validate_rejects_a_broken_chart_with_codes() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let path = dir.path().join("chart.yaml");
    fs::write(&path, BAD_CHART).unwrap_or_else(|e| panic!("write: {e}"));

    skiff()
        .args(["validate"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(
            predicate::str::contains("workload.image.invalid")
                .and(predicate::str::contains("edge.self-loop")),
        );
}

#[test]
fn fmt_is_idempotent() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let path = dir.path().join("chart.yaml");
    fs::write(&path, GOOD_CHART).unwrap_or_else(|e| panic!("write: {e}"));

    let first = skiff().args(["fmt"]).arg(&path).assert().success();
    let canonical = String::from_utf8_lossy(&first.get_output().stdout).into_owned();

    let canon_path = dir.path().join("canonical.yaml");
    fs::write(&canon_path, &canonical).unwrap_or_else(|e| panic!("write: {e}"));
    skiff()
        .args(["fmt"])
        .arg(&canon_path)
        .assert()
        .success()
        .stdout(canonical);
}

#[test]
fn inspect_counts_nodes_and_links() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("tempdir: {e}"));
    let path = dir.path().join("chart.yaml");
    fs::write(&path, GOOD_CHART).unwrap_or_else(|e| panic!("write: {e}"));

    skiff()
        .args(["inspect"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("data sources: 1")
                .and(predicate::str::contains("stored procedures: 1"))
                .and(predicate::str::contains("hard links: 1")),
        );
}
