//! Capstan Core - foundational types for the Capstan release tooling
//!
//! This crate provides:
//! - `Chart`: the in-memory chart tree, loaded from a directory or archive
//! - Archive codec: read/write gzip-compressed chart archives
//! - Validation: release-name and namespace checks shared by every task

pub mod archive;
pub mod chart;
pub mod error;
pub mod validate;

pub use archive::{default_archive_name, read_chart, read_chart_bytes, write_chart};
pub use chart::{Chart, ChartFile, ChartMetadata};
pub use error::{CoreError, Result};
pub use validate::{
    DNS_LABEL_MAX_LENGTH, DNS_SUBDOMAIN_MAX_LENGTH, validate_namespace, validate_release_name,
};
