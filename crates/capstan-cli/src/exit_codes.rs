//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

#![allow(dead_code)]

/// Success - task completed (or was skipped) without errors
pub const SUCCESS: i32 = 0;

/// General error - connectivity or remote failure
pub const ERROR: i32 = 1;

/// Configuration error - rejected before any network activity
pub const CONFIG_ERROR: i32 = 2;

/// Failed run - a release test reported failure status
pub const FAILED_RUN: i32 = 3;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
