//! Typed cross-stack export registry.
//!
//! Downstream stacks historically imported values by reconstructing export
//! name strings, which meant a typo on either side failed only at deploy
//! time. Here every cross-stack value is published under an [`ExportKey`]
//! enum variant: the export name is derived in exactly one place, duplicate
//! publication fails immediately, and consumers resolve by key rather than
//! by convention.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{LakeStackError, LakeStackResult};
use crate::types::TargetEnvironment;

/// Index of an availability zone within the three-zone layout.
///
/// A fixed enum rather than a numeric loop index, so per-zone exports are
/// iterated with compile-time-known bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ZoneIndex {
    /// First zone.
    One,
    /// Second zone.
    Two,
    /// Third zone.
    Three,
}

impl ZoneIndex {
    /// All three zone indexes, in order.
    pub const ALL: [Self; 3] = [Self::One, Self::Two, Self::Three];

    /// One-based ordinal used in names.
    #[must_use]
    pub fn ordinal(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }

    /// Zero-based position for slice access.
    #[must_use]
    pub fn position(self) -> usize {
        usize::from(self.ordinal() - 1)
    }
}

/// The role of a resource attribute shared across stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExportKey {
    /// VPC identifier.
    VpcId,
    /// Name of one of the three availability zones.
    AvailabilityZone(ZoneIndex),
    /// Identifier of one of the three private subnets.
    SubnetId(ZoneIndex),
    /// Identifier of one of the three private route tables.
    RouteTableId(ZoneIndex),
    /// Identifier of the shared self-referencing security group.
    SharedSecurityGroupId,
    /// ARN of the storage encryption key.
    KmsKeyArn,
    /// Name of the access-log sink bucket.
    AccessLogsBucketName,
    /// Name of the raw-zone (collect) bucket.
    CollectBucketName,
    /// Name of the conformed-zone (cleanse) bucket.
    CleanseBucketName,
    /// Name of the purpose-built-zone (consume) bucket.
    ConsumeBucketName,
}

impl ExportKey {
    /// The role component of the export name.
    #[must_use]
    pub fn role(self) -> String {
        match self {
            Self::VpcId => "VpcId".to_owned(),
            Self::AvailabilityZone(zone) => format!("AvailabilityZone{}", zone.ordinal()),
            Self::SubnetId(zone) => format!("SubnetId{}", zone.ordinal()),
            Self::RouteTableId(zone) => format!("RouteTable{}", zone.ordinal()),
            Self::SharedSecurityGroupId => "SharedSecurityGroupId".to_owned(),
            Self::KmsKeyArn => "S3KmsKeyArn".to_owned(),
            Self::AccessLogsBucketName => "S3AccessLogBucket".to_owned(),
            Self::CollectBucketName => "CollectBucketName".to_owned(),
            Self::CleanseBucketName => "CleanseBucketName".to_owned(),
            Self::ConsumeBucketName => "ConsumeBucketName".to_owned(),
        }
    }

    /// Derive the globally unique export name for this role.
    ///
    /// Producer and consumer both call this; they cannot disagree on the
    /// name by construction.
    #[must_use]
    pub fn export_name(self, environment: TargetEnvironment, logical_id_prefix: &str) -> String {
        format!("{environment}{logical_id_prefix}{}", self.role())
    }
}

impl fmt::Display for ExportKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.role())
    }
}

/// A published export: the deploy-scope-unique name plus the template value
/// it resolves to (a literal or a CloudFormation intrinsic).
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    /// Export name, unique across the account/region deploy scope.
    pub name: String,
    /// The value published under that name.
    pub value: serde_json::Value,
}

/// Registry of the exports one deployment scope has published.
///
/// Validated at construction time: publishing a role twice or resolving an
/// unpublished role is an immediate error, not a remote-apply failure.
#[derive(Debug, Default)]
pub struct ExportRegistry {
    environment: Option<TargetEnvironment>,
    exports: BTreeMap<ExportKey, Export>,
}

impl ExportRegistry {
    /// Create an empty registry for one target environment.
    #[must_use]
    pub fn new(environment: TargetEnvironment) -> Self {
        Self {
            environment: Some(environment),
            exports: BTreeMap::new(),
        }
    }

    /// Publish a value under a role.
    pub fn publish(
        &mut self,
        key: ExportKey,
        name: String,
        value: serde_json::Value,
    ) -> LakeStackResult<()> {
        if self.exports.contains_key(&key) {
            return Err(LakeStackError::DuplicateExport(key));
        }
        tracing::debug!(export = %key, name = %name, "publishing export");
        self.exports.insert(key, Export { name, value });
        Ok(())
    }

    /// Look up a published export.
    pub fn resolve(&self, key: ExportKey) -> LakeStackResult<&Export> {
        self.exports
            .get(&key)
            .ok_or(LakeStackError::MissingExport(key))
    }

    /// The `Fn::ImportValue` intrinsic a consumer template uses for a role.
    pub fn import_value(&self, key: ExportKey) -> LakeStackResult<serde_json::Value> {
        let export = self.resolve(key)?;
        Ok(serde_json::json!({ "Fn::ImportValue": export.name }))
    }

    /// The environment this registry publishes for.
    #[must_use]
    pub fn environment(&self) -> Option<TargetEnvironment> {
        self.environment
    }

    /// Iterate over published exports in key order.
    pub fn iter(&self) -> impl Iterator<Item = (ExportKey, &Export)> {
        self.exports.iter().map(|(k, v)| (*k, v))
    }

    /// Number of published exports.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exports.len()
    }

    /// Whether nothing has been published yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }
}
