//! The deploy-stage composition root.

use lakestack_core::{
    AccountId, AwsEnvironment, Configuration, LakeStackResult, TargetEnvironment,
};
use tracing::info;

use crate::network::NetworkStack;
use crate::storage::StorageStack;
use crate::tagging::apply_standard_tags;

/// A named template ready to be written to disk.
#[derive(Debug)]
pub struct SynthesizedTemplate<'a> {
    /// File-name stem, e.g. `Dev-network`.
    pub name: String,
    /// The serialized CloudFormation document.
    pub template: &'a lakestack_cfn::Template,
}

/// Composition root for one target environment.
///
/// Resolves the environment configuration exactly once, then constructs the
/// network stack (only when a VPC CIDR is configured) and the storage stack,
/// threading the resolved values and tagging policy through both.
#[derive(Debug)]
pub struct DeployStage {
    environment: TargetEnvironment,
    network: Option<NetworkStack>,
    storage: StorageStack,
}

impl DeployStage {
    /// Construct the stage for a target environment.
    pub fn new(
        configuration: &Configuration,
        environment: TargetEnvironment,
        deployment_account_id: &AccountId,
        aws_env: &AwsEnvironment,
    ) -> LakeStackResult<Self> {
        let config = configuration.resolve(environment)?;

        let network = if config.vpc_cidr().is_some() {
            let mut stack = NetworkStack::new(&config, aws_env)?;
            apply_standard_tags(
                stack.template_mut(),
                environment,
                config.resource_name_prefix(),
            );
            info!(stack = %stack.name(), "declared network stack");
            Some(stack)
        } else {
            info!(environment = %environment, "no VPC CIDR configured; skipping network stack");
            None
        };

        let mut storage = StorageStack::new(&config, deployment_account_id)?;
        apply_standard_tags(
            storage.template_mut(),
            environment,
            config.resource_name_prefix(),
        );
        info!(stack = %storage.name(), "declared storage stack");

        Ok(Self {
            environment,
            network,
            storage,
        })
    }

    /// The target environment.
    #[must_use]
    pub fn environment(&self) -> TargetEnvironment {
        self.environment
    }

    /// The network stack, if this environment carries one.
    #[must_use]
    pub fn network(&self) -> Option<&NetworkStack> {
        self.network.as_ref()
    }

    /// The storage stack.
    #[must_use]
    pub fn storage(&self) -> &StorageStack {
        &self.storage
    }

    /// The named templates this stage synthesized, in deploy order.
    #[must_use]
    pub fn templates(&self) -> Vec<SynthesizedTemplate<'_>> {
        let mut templates = Vec::new();
        if let Some(network) = &self.network {
            templates.push(SynthesizedTemplate {
                name: format!("{}-network", self.environment),
                template: network.template(),
            });
        }
        templates.push(SynthesizedTemplate {
            name: format!("{}-storage", self.environment),
            template: self.storage.template(),
        });
        templates
    }
}
