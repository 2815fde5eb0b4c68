//! Core building blocks for LakeStack infrastructure synthesis.
//!
//! This crate provides the pieces every stack shares: the target-environment
//! and account/region types, the layered configuration resolver, the
//! per-environment policy bundle, and the typed cross-stack export registry.

mod config;
mod error;
mod exports;
mod policy;
mod types;

pub use config::{ConfigKey, Configuration, DeploymentConfig, ResolvedConfig};
pub use error::{LakeStackError, LakeStackResult};
pub use exports::{Export, ExportKey, ExportRegistry, ZoneIndex};
pub use policy::{EnvironmentPolicy, LifecyclePolicy, RemovalPolicy};
pub use types::{AccountId, AwsEnvironment, AwsRegion, TargetEnvironment};
