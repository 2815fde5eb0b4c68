//! End-to-end synthesis tests for LakeStack.
//!
//! These tests run the full pipeline for each target environment, from the
//! checked-in configuration table through [`DeployStage`] to serialized
//! CloudFormation JSON, and assert on the documents that come out. They use
//! no network and no AWS credentials.

use std::sync::Once;

use lakestack_core::{AccountId, AwsEnvironment, AwsRegion, Configuration, TargetEnvironment};
use lakestack_stacks::DeployStage;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// The deployment account used by the checked-in configuration table.
#[must_use]
pub fn deployment_account() -> AccountId {
    AccountId::new("111111111111").unwrap_or_else(|e| panic!("deployment account: {e}"))
}

/// An explicit account/region pair for one environment of the checked-in
/// configuration table.
#[must_use]
pub fn aws_env_for(environment: TargetEnvironment) -> AwsEnvironment {
    let account = match environment {
        TargetEnvironment::Dev => "222222222222",
        TargetEnvironment::Test => "333333333333",
        TargetEnvironment::Prod => "444444444444",
    };
    AwsEnvironment::new(
        AccountId::new(account).unwrap_or_else(|e| panic!("environment account: {e}")),
        AwsRegion::new("us-east-2"),
    )
}

/// Build the full deploy stage for one environment of the checked-in
/// configuration table.
#[must_use]
pub fn stage_for(environment: TargetEnvironment) -> DeployStage {
    init_tracing();
    DeployStage::new(
        &Configuration::builtin(),
        environment,
        &deployment_account(),
        &aws_env_for(environment),
    )
    .unwrap_or_else(|e| panic!("stage for {environment}: {e}"))
}

/// Serialize every template in a stage and parse it back as generic JSON.
#[must_use]
pub fn synthesized_json(stage: &DeployStage) -> Vec<(String, serde_json::Value)> {
    stage
        .templates()
        .into_iter()
        .map(|t| {
            let json = t
                .template
                .to_json_pretty()
                .unwrap_or_else(|e| panic!("serialize {}: {e}", t.name));
            let value = serde_json::from_str(&json)
                .unwrap_or_else(|e| panic!("parse {}: {e}", t.name));
            (t.name, value)
        })
        .collect()
}

mod test_config;
mod test_network;
mod test_stage;
mod test_storage;
