//! Per-environment resource policy bundle.
//!
//! Retention, lifecycle, and deletion-protection decisions all derive from
//! the same environment classification, so they are computed once here and
//! passed down instead of being re-derived inside each stack.

use crate::types::TargetEnvironment;

/// Whether a resource is retained or destroyed when its declaration is
/// removed from the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RemovalPolicy {
    /// Keep the resource after the stack stops declaring it.
    Retain,
    /// Delete the resource together with its declaration.
    Destroy,
}

/// Time-based transition and expiration policy for stored objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicy {
    /// Days until current object versions expire.
    pub expiration_days: u32,
    /// Days until noncurrent object versions expire.
    pub noncurrent_version_expiration_days: u32,
    /// Days until objects transition to cold storage, if the environment
    /// keeps data long enough for a transition to pay off.
    pub cold_transition_days: Option<u32>,
}

/// The bundle of environment-conditioned resource behavior.
///
/// Built exactly once per stack from the target environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentPolicy {
    /// Retain-on-delete for long-lived environments, destroy otherwise.
    pub removal_policy: RemovalPolicy,
    /// Flow-log retention in days.
    pub log_retention_days: u32,
    /// Object lifecycle applied to the data-zone buckets.
    pub lifecycle: LifecyclePolicy,
    /// Whether buckets carry a deny policy blocking direct user deletion.
    pub block_bucket_deletion: bool,
}

impl EnvironmentPolicy {
    /// Derive the policy bundle for a target environment.
    #[must_use]
    pub fn for_environment(environment: TargetEnvironment) -> Self {
        let lifecycle = if environment == TargetEnvironment::Prod {
            LifecyclePolicy {
                expiration_days: 2555,
                noncurrent_version_expiration_days: 90,
                cold_transition_days: Some(365),
            }
        } else {
            LifecyclePolicy {
                expiration_days: 60,
                noncurrent_version_expiration_days: 30,
                cold_transition_days: None,
            }
        };

        if environment.is_long_lived() {
            Self {
                removal_policy: RemovalPolicy::Retain,
                log_retention_days: 180,
                lifecycle,
                block_bucket_deletion: true,
            }
        } else {
            Self {
                removal_policy: RemovalPolicy::Destroy,
                log_retention_days: 30,
                lifecycle,
                block_bucket_deletion: false,
            }
        }
    }
}
