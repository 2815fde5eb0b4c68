//! Layered environment configuration.
//!
//! Configuration is a two-layer mapping: a deployment-wide layer with shared
//! defaults (naming prefixes, the deployment secret name) and one override
//! layer per target environment (account, region, CIDR). Resolution merges
//! the two, validates every required key, and hands stacks a fully typed
//! view. Resolution is a pure lookup: resolving the same environment twice
//! yields identical results.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::error::{LakeStackError, LakeStackResult};
use crate::types::{AccountId, AwsRegion, TargetEnvironment};

/// The closed set of recognized configuration keys.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKey {
    /// Target AWS account ID.
    AccountId,
    /// Target AWS region.
    Region,
    /// CIDR block for the environment VPC. Optional; its presence gates
    /// creation of the network stack.
    VpcCidr,
    /// PascalCase prefix applied to logical resource IDs and export names.
    LogicalIdPrefix,
    /// Lowercase prefix applied to physical resource names.
    ResourceNamePrefix,
    /// Name of the Secrets Manager secret holding the pipeline access token.
    DeploySecretName,
}

impl ConfigKey {
    /// Keys that must be present (in either layer) for every environment.
    pub const REQUIRED: [Self; 4] = [
        Self::AccountId,
        Self::Region,
        Self::LogicalIdPrefix,
        Self::ResourceNamePrefix,
    ];

    /// Returns the string value of this key, as used in configuration files.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccountId => "account_id",
            Self::Region => "region",
            Self::VpcCidr => "vpc_cidr",
            Self::LogicalIdPrefix => "logical_id_prefix",
            Self::ResourceNamePrefix => "resource_name_prefix",
            Self::DeploySecretName => "deploy_secret_name",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type ConfigLayer = BTreeMap<ConfigKey, String>;

/// The full environment-keyed configuration mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Deployment-wide defaults, shared by every environment.
    #[serde(default)]
    deployment: ConfigLayer,
    /// Per-environment override layers.
    #[serde(default)]
    environments: BTreeMap<TargetEnvironment, ConfigLayer>,
}

impl Configuration {
    /// The checked-in configuration table.
    ///
    /// Account IDs here are placeholders; real deployments override them via
    /// a configuration file.
    #[must_use]
    pub fn builtin() -> Self {
        let deployment = ConfigLayer::from([
            (ConfigKey::AccountId, "111111111111".to_owned()),
            (ConfigKey::Region, "us-east-2".to_owned()),
            (ConfigKey::LogicalIdPrefix, "DataLake".to_owned()),
            (ConfigKey::ResourceNamePrefix, "datalake".to_owned()),
            (
                ConfigKey::DeploySecretName,
                "datalake/deploy/pipeline-token".to_owned(),
            ),
        ]);

        let environments = BTreeMap::from([
            (
                TargetEnvironment::Dev,
                ConfigLayer::from([
                    (ConfigKey::AccountId, "222222222222".to_owned()),
                    (ConfigKey::Region, "us-east-2".to_owned()),
                    (ConfigKey::VpcCidr, "10.20.0.0/22".to_owned()),
                ]),
            ),
            (
                TargetEnvironment::Test,
                ConfigLayer::from([
                    (ConfigKey::AccountId, "333333333333".to_owned()),
                    (ConfigKey::Region, "us-east-2".to_owned()),
                    (ConfigKey::VpcCidr, "10.30.0.0/22".to_owned()),
                ]),
            ),
            (
                TargetEnvironment::Prod,
                ConfigLayer::from([
                    (ConfigKey::AccountId, "444444444444".to_owned()),
                    (ConfigKey::Region, "us-east-2".to_owned()),
                    (ConfigKey::VpcCidr, "10.40.0.0/22".to_owned()),
                ]),
            ),
        ]);

        Self {
            deployment,
            environments,
        }
    }

    /// Load a configuration document from a JSON string.
    pub fn from_json_str(json: &str) -> LakeStackResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LakeStackError::Internal(anyhow::anyhow!("invalid configuration: {e}")))?;
        Ok(config)
    }

    /// Load a configuration document from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> LakeStackResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LakeStackError::Internal(anyhow::anyhow!(
                "cannot read configuration file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&contents)
    }

    /// Resolve the complete settings for one target environment.
    ///
    /// Merges the deployment layer with the environment layer (environment
    /// wins), then fails if any required key is still absent. A partially
    /// configured environment must never synthesize silently.
    pub fn resolve(&self, environment: TargetEnvironment) -> LakeStackResult<ResolvedConfig> {
        let mut merged = self.deployment.clone();
        if let Some(overrides) = self.environments.get(&environment) {
            merged.extend(overrides.iter().map(|(k, v)| (*k, v.clone())));
        }

        for key in ConfigKey::REQUIRED {
            if !merged.contains_key(&key) {
                return Err(LakeStackError::MissingConfig {
                    environment: environment.to_string(),
                    key,
                });
            }
        }

        let lookup = |key: ConfigKey| -> LakeStackResult<&String> {
            merged.get(&key).ok_or(LakeStackError::MissingConfig {
                environment: environment.to_string(),
                key,
            })
        };

        Ok(ResolvedConfig {
            environment,
            account_id: AccountId::new(lookup(ConfigKey::AccountId)?.clone())?,
            region: AwsRegion::new(lookup(ConfigKey::Region)?.clone()),
            logical_id_prefix: lookup(ConfigKey::LogicalIdPrefix)?.clone(),
            resource_name_prefix: lookup(ConfigKey::ResourceNamePrefix)?.clone(),
            vpc_cidr: merged.get(&ConfigKey::VpcCidr).cloned(),
            deploy_secret_name: merged.get(&ConfigKey::DeploySecretName).cloned(),
        })
    }

    /// Settings for the central deployment account, used by the credential
    /// bootstrap. All three values must be present in the deployment layer.
    pub fn deployment(&self) -> LakeStackResult<DeploymentConfig> {
        let lookup = |key: ConfigKey| -> LakeStackResult<&String> {
            self.deployment
                .get(&key)
                .ok_or(LakeStackError::MissingConfig {
                    environment: "Deployment".to_owned(),
                    key,
                })
        };

        Ok(DeploymentConfig {
            account_id: AccountId::new(lookup(ConfigKey::AccountId)?.clone())?,
            region: AwsRegion::new(lookup(ConfigKey::Region)?.clone()),
            secret_name: lookup(ConfigKey::DeploySecretName)?.clone(),
        })
    }
}

/// The fully resolved, validated settings for one target environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    environment: TargetEnvironment,
    account_id: AccountId,
    region: AwsRegion,
    logical_id_prefix: String,
    resource_name_prefix: String,
    vpc_cidr: Option<String>,
    deploy_secret_name: Option<String>,
}

impl ResolvedConfig {
    /// The environment these settings were resolved for.
    #[must_use]
    pub fn environment(&self) -> TargetEnvironment {
        self.environment
    }

    /// Target account ID.
    #[must_use]
    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Target region.
    #[must_use]
    pub fn region(&self) -> &AwsRegion {
        &self.region
    }

    /// PascalCase prefix for logical IDs and export names.
    #[must_use]
    pub fn logical_id_prefix(&self) -> &str {
        &self.logical_id_prefix
    }

    /// Lowercase prefix for physical resource names.
    #[must_use]
    pub fn resource_name_prefix(&self) -> &str {
        &self.resource_name_prefix
    }

    /// VPC CIDR block, if this environment carries a network stack.
    #[must_use]
    pub fn vpc_cidr(&self) -> Option<&str> {
        self.vpc_cidr.as_deref()
    }

    /// Name of the deployment secret, if configured.
    #[must_use]
    pub fn deploy_secret_name(&self) -> Option<&str> {
        self.deploy_secret_name.as_deref()
    }
}

/// Validated settings for the central deployment account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    /// Deployment account ID.
    pub account_id: AccountId,
    /// Deployment region.
    pub region: AwsRegion,
    /// Secrets Manager name for the pipeline access token.
    pub secret_name: String,
}
