//! Capstan Tasks - release-management operations as build-pipeline tasks
//!
//! Every task follows the same contract:
//! 1. a `skip` flag short-circuits immediately
//! 2. configuration is validated eagerly, before any network activity
//! 3. tasks whose only purpose is to feed listeners skip the remote call
//!    entirely when no listener is registered
//! 4. exactly one connection is built, exactly one remote operation runs
//! 5. every response is wrapped in an event and dispatched to listeners in
//!    list order, with no per-listener error containment
//! 6. the connection is released on every exit path; close-time failures are
//!    attached to the primary outcome, never dropped
//!
//! Tasks are plain async functions over a configuration record, a
//! [`BuildContext`] where chart sources are involved, and a
//! [`capstan_client::ConnectionFactory`].

pub mod context;
pub mod error;
pub mod event;
mod source;
pub mod tasks;

pub use context::BuildContext;
pub use error::{Result, TaskError};
pub use event::{ListenerError, LogListener, Operation, ReleaseEvent, ReleaseListener};
pub use tasks::content::{self, ContentConfig};
pub use tasks::history::{self, HistoryConfig};
pub use tasks::install::{self, InstallConfig};
pub use tasks::list::{self, ListConfig};
pub use tasks::package::{self, PackageConfig};
pub use tasks::rollback::{self, RollbackConfig};
pub use tasks::status::{self, StatusConfig};
pub use tasks::test::{self, TestConfig};
pub use tasks::uninstall::{self, UninstallConfig};
pub use tasks::upgrade::{self, UpgradeConfig};
