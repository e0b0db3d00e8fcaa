//! Release-name and namespace validation
//!
//! Release names follow the DNS subdomain grammar; namespaces follow the
//! stricter DNS label grammar. The limits mirror what the cluster itself
//! enforces on object names.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{CoreError, Result};

/// Maximum length of a release name (DNS subdomain).
pub const DNS_SUBDOMAIN_MAX_LENGTH: usize = 253;

/// Maximum length of a namespace (DNS label).
pub const DNS_LABEL_MAX_LENGTH: usize = 63;

static DNS_SUBDOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
        .expect("valid regex")
});

static DNS_LABEL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?$").expect("valid regex"));

/// Validate a release name.
///
/// Names must be non-empty, at most [`DNS_SUBDOMAIN_MAX_LENGTH`] characters,
/// and match the DNS subdomain grammar.
pub fn validate_release_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CoreError::InvalidReleaseName {
            message: "name is empty".to_string(),
        });
    }
    if name.len() > DNS_SUBDOMAIN_MAX_LENGTH {
        return Err(CoreError::InvalidReleaseName {
            message: format!(
                "'{}' is longer than {} characters",
                name, DNS_SUBDOMAIN_MAX_LENGTH
            ),
        });
    }
    if !DNS_SUBDOMAIN_PATTERN.is_match(name) {
        return Err(CoreError::InvalidReleaseName {
            message: format!("'{}' must match {}", name, DNS_SUBDOMAIN_PATTERN.as_str()),
        });
    }
    Ok(())
}

/// Validate a namespace.
///
/// An empty namespace is accepted and means "unspecified"; the remote service
/// applies its own default in that case.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.is_empty() {
        return Ok(());
    }
    if namespace.len() > DNS_LABEL_MAX_LENGTH {
        return Err(CoreError::InvalidNamespace {
            message: format!(
                "'{}' is longer than {} characters",
                namespace, DNS_LABEL_MAX_LENGTH
            ),
        });
    }
    if !DNS_LABEL_PATTERN.is_match(namespace) {
        return Err(CoreError::InvalidNamespace {
            message: format!("'{}' must match {}", namespace, DNS_LABEL_PATTERN.as_str()),
        });
    }
    Ok(())
}
