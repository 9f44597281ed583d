// SPDX-License-Identifier: Apache-2.0
//! Stateless field-syntax predicates.
//!
//! Every predicate answers "is this one string a well-formed X" and nothing
//! else; emptiness of optional fields is the rule visitor's concern. All
//! predicates reject the empty string.

use std::net::Ipv4Addr;
use std::sync::LazyLock;

use regex::Regex;

static ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[A-Za-z0-9\s]+$"));
static PATH: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[A-Za-z0-9_\-/.]+$"));
static IMAGE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^[A-Za-z0-9_\-/.]+://[A-Za-z0-9_\-/.]+$"));
static MEMORY: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[1-9][0-9]*[KMG]i?$"));
static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[A-Za-z_][A-Za-z0-9_]*(=.*)?$"));
static NETWORK_NAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[A-Za-z0-9_-]+$"));
static HOST_NAME: LazyLock<Regex> = LazyLock::new(|| pattern(r"^[A-Za-z0-9.-]+$"));

// Patterns are literals; a typo is caught by the `regex_literals_compile` test.
#[allow(clippy::expect_used)]
fn pattern(raw: &str) -> Regex {
    Regex::new(raw).expect("hard-coded pattern must compile")
}

/// Letters, digits, and whitespace. Used for display names, resource names,
/// prefixes, and topics.
#[must_use]
pub fn is_alphanumeric(s: &str) -> bool {
    ALPHANUMERIC.is_match(s)
}

/// Filesystem path charset: letters, digits, `_ - / .`.
#[must_use]
pub fn is_path(s: &str) -> bool {
    PATH.is_match(s)
}

/// Image reference, `scheme://path` shaped with path charset on both sides.
#[must_use]
pub fn is_image(s: &str) -> bool {
    IMAGE.is_match(s)
}

/// Memory quantity: `[1-9][0-9]*` followed by `K`, `M`, or `G`, optionally
/// suffixed `i` (e.g. `128Mi`, `2G`).
#[must_use]
pub fn is_memory(s: &str) -> bool {
    MEMORY.is_match(s)
}

/// `KEY` or `KEY=value`; the key is a C-style identifier, the value is free.
#[must_use]
pub fn is_env_var(s: &str) -> bool {
    ENV_VAR.is_match(s)
}

/// `hostPort:containerPort`, both in 0–65535.
#[must_use]
pub fn is_port_mapping(s: &str) -> bool {
    match s.split_once(':') {
        Some((host, container)) => {
            !container.contains(':')
                && host.parse::<u16>().is_ok()
                && container.parse::<u16>().is_ok()
        }
        None => false,
    }
}

/// `hostPath:containerPath`, both valid paths.
#[must_use]
pub fn is_volume(s: &str) -> bool {
    match s.split_once(':') {
        Some((host, container)) => {
            !container.contains(':') && is_path(host) && is_path(container)
        }
        None => false,
    }
}

/// Deployment target `platform/architecture`:
/// platform in `{qemu, xen, firecracker}`, architecture in `{x86_64, arm64}`.
#[must_use]
pub fn is_target(s: &str) -> bool {
    match s.split_once('/') {
        Some((platform, arch)) => {
            matches!(platform, "qemu" | "xen" | "firecracker")
                && matches!(arch, "x86_64" | "arm64")
        }
        None => false,
    }
}

/// Network descriptor:
/// `name[:ip[/mask][:gateway[:dns0[:dns1[:hostname[:domain]]]]]]`.
///
/// Each *present* field is checked independently; absent trailing fields are
/// unchecked. A present-but-empty field fails its own check.
#[must_use]
pub fn is_network(s: &str) -> bool {
    let fields: Vec<&str> = s.split(':').collect();
    if fields.is_empty() || fields.len() > 7 {
        return false;
    }
    if !NETWORK_NAME.is_match(fields[0]) {
        return false;
    }
    for (index, field) in fields.iter().enumerate().skip(1) {
        let ok = match index {
            1 => is_ip_with_mask(field),
            2..=4 => field.parse::<Ipv4Addr>().is_ok(),
            _ => HOST_NAME.is_match(field),
        };
        if !ok {
            return false;
        }
    }
    true
}

fn is_ip_with_mask(field: &str) -> bool {
    match field.split_once('/') {
        Some((ip, mask)) => {
            ip.parse::<Ipv4Addr>().is_ok()
                && mask.parse::<u8>().is_ok_and(|m| m <= 32)
        }
        None => field.parse::<Ipv4Addr>().is_ok(),
    }
}
