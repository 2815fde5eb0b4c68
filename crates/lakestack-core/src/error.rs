//! Error types for LakeStack synthesis.

use crate::config::ConfigKey;
use crate::exports::ExportKey;

/// Error type shared by all LakeStack crates.
///
/// Every variant is fatal at construction time: synthesis either produces a
/// complete set of templates or nothing at all. There are no retries; the
/// remedy is always to fix the configuration and re-run.
#[derive(Debug, thiserror::Error)]
pub enum LakeStackError {
    /// The requested environment name is not one of the known environments.
    #[error("unknown target environment: {0} (expected Dev, Test, or Prod)")]
    UnknownEnvironment(String),

    /// A required configuration key is absent for the requested environment.
    #[error("missing configuration key {key} for environment {environment}")]
    MissingConfig {
        /// Environment (or layer) the lookup was performed against.
        environment: String,
        /// The key that was absent.
        key: ConfigKey,
    },

    /// Invalid AWS account ID format.
    #[error("invalid AWS account ID: {0} (must be 12-digit numeric string)")]
    InvalidAccountId(String),

    /// A CIDR block could not be parsed or subdivided.
    #[error("invalid CIDR block: {0}")]
    InvalidCidr(String),

    /// The deployment target cannot provide the three availability zones the
    /// downstream stacks expect.
    #[error("availability zones unavailable: {0}")]
    AvailabilityZones(String),

    /// An export key was published twice within one deployment scope.
    #[error("export {0} is already published in this scope")]
    DuplicateExport(ExportKey),

    /// A consumer requested an export that no stack published.
    #[error("export {0} has not been published by any stack")]
    MissingExport(ExportKey),

    /// Two resources were declared under the same logical ID.
    #[error("duplicate logical resource ID: {0}")]
    DuplicateLogicalId(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for LakeStack operations.
pub type LakeStackResult<T> = Result<T, LakeStackError>;
