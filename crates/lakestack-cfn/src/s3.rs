//! Property structs for `AWS::S3::Bucket` and `AWS::S3::BucketPolicy`.

use serde::Serialize;

use crate::iam::PolicyDocument;
use crate::intrinsic::CfnValue;

/// Canned bucket ACL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BucketAccessControl {
    /// Owner-only access.
    Private,
    /// Grants the log-delivery group write access (access-log sinks only).
    LogDeliveryWrite,
}

/// Public access block settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PublicAccessBlockConfiguration {
    /// Block new public ACLs.
    pub block_public_acls: bool,
    /// Block new public bucket policies.
    pub block_public_policy: bool,
    /// Ignore existing public ACLs.
    pub ignore_public_acls: bool,
    /// Restrict access when a public policy exists.
    pub restrict_public_buckets: bool,
}

impl PublicAccessBlockConfiguration {
    /// Block every form of public access.
    #[must_use]
    pub fn block_all() -> Self {
        Self {
            block_public_acls: true,
            block_public_policy: true,
            ignore_public_acls: true,
            restrict_public_buckets: true,
        }
    }
}

/// Server-side encryption algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SseAlgorithm {
    /// S3-managed keys.
    #[serde(rename = "AES256")]
    Aes256,
    /// Customer-managed KMS key.
    #[serde(rename = "aws:kms")]
    AwsKms,
}

/// Default encryption applied to new objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerSideEncryptionByDefault {
    /// Encryption algorithm.
    #[serde(rename = "SSEAlgorithm")]
    pub sse_algorithm: SseAlgorithm,
    /// KMS key, when the algorithm is `aws:kms`.
    #[serde(rename = "KMSMasterKeyID", skip_serializing_if = "Option::is_none")]
    pub kms_master_key_id: Option<CfnValue>,
}

/// One server-side encryption rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerSideEncryptionRule {
    /// The default encryption for the bucket.
    pub server_side_encryption_by_default: ServerSideEncryptionByDefault,
    /// Reduce KMS request volume with a bucket-level data key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_key_enabled: Option<bool>,
}

/// Bucket encryption configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketEncryption {
    /// Encryption rules (exactly one in practice).
    pub server_side_encryption_configuration: Vec<ServerSideEncryptionRule>,
}

impl BucketEncryption {
    /// SSE-KMS with a customer-managed key and the bucket-key optimization.
    #[must_use]
    pub fn kms(key: CfnValue) -> Self {
        Self {
            server_side_encryption_configuration: vec![ServerSideEncryptionRule {
                server_side_encryption_by_default: ServerSideEncryptionByDefault {
                    sse_algorithm: SseAlgorithm::AwsKms,
                    kms_master_key_id: Some(key),
                },
                bucket_key_enabled: Some(true),
            }],
        }
    }

    /// SSE-S3 with provider-managed keys.
    #[must_use]
    pub fn s3_managed() -> Self {
        Self {
            server_side_encryption_configuration: vec![ServerSideEncryptionRule {
                server_side_encryption_by_default: ServerSideEncryptionByDefault {
                    sse_algorithm: SseAlgorithm::Aes256,
                    kms_master_key_id: None,
                },
                bucket_key_enabled: None,
            }],
        }
    }
}

/// Versioning configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersioningConfiguration {
    /// `Enabled` or `Suspended`.
    pub status: &'static str,
}

impl VersioningConfiguration {
    /// Versioning enabled.
    #[must_use]
    pub fn enabled() -> Self {
        Self { status: "Enabled" }
    }
}

/// Expiration for noncurrent object versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoncurrentVersionExpiration {
    /// Days a version stays noncurrent before expiring.
    pub noncurrent_days: u32,
}

/// A storage-class transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transition {
    /// Destination storage class.
    pub storage_class: &'static str,
    /// Days after creation before the transition.
    pub transition_in_days: u32,
}

/// One lifecycle rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleRule {
    /// `Enabled` or `Disabled`.
    pub status: &'static str,
    /// Days until current versions expire.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_in_days: Option<u32>,
    /// Expiration for noncurrent versions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noncurrent_version_expiration: Option<NoncurrentVersionExpiration>,
    /// Storage-class transitions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transitions: Option<Vec<Transition>>,
}

/// Lifecycle configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleConfiguration {
    /// Lifecycle rules.
    pub rules: Vec<LifecycleRule>,
}

/// Server access logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingConfiguration {
    /// Bucket receiving the access logs.
    pub destination_bucket_name: CfnValue,
    /// Prefix applied to delivered log objects.
    pub log_file_prefix: String,
}

/// Object ownership setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ObjectOwnership {
    /// The writing account owns new objects.
    ObjectWriter,
    /// The bucket owner takes ownership of `bucket-owner-full-control` writes.
    BucketOwnerPreferred,
}

/// One ownership-controls rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OwnershipControlsRule {
    /// The ownership setting.
    pub object_ownership: ObjectOwnership,
}

/// Ownership controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OwnershipControls {
    /// Ownership rules (exactly one in practice).
    pub rules: Vec<OwnershipControlsRule>,
}

impl OwnershipControls {
    /// Ownership controls with a single rule.
    #[must_use]
    pub fn new(object_ownership: ObjectOwnership) -> Self {
        Self {
            rules: vec![OwnershipControlsRule { object_ownership }],
        }
    }
}

/// One intelligent-tiering access tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tiering {
    /// `ARCHIVE_ACCESS` or `DEEP_ARCHIVE_ACCESS`.
    pub access_tier: &'static str,
    /// Days without access before moving to the tier.
    pub days: u32,
}

/// An intelligent-tiering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct IntelligentTieringConfiguration {
    /// Configuration ID.
    pub id: String,
    /// `Enabled` or `Disabled`.
    pub status: &'static str,
    /// Archive tiers.
    pub tierings: Vec<Tiering>,
}

/// Properties for `AWS::S3::Bucket`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketProperties {
    /// Physical bucket name.
    pub bucket_name: String,
    /// Canned ACL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_control: Option<BucketAccessControl>,
    /// Public access block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_access_block_configuration: Option<PublicAccessBlockConfiguration>,
    /// Default encryption.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_encryption: Option<BucketEncryption>,
    /// Versioning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versioning_configuration: Option<VersioningConfiguration>,
    /// Lifecycle rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_configuration: Option<LifecycleConfiguration>,
    /// Server access logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging_configuration: Option<LoggingConfiguration>,
    /// Ownership controls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ownership_controls: Option<OwnershipControls>,
    /// Intelligent tiering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intelligent_tiering_configurations: Option<Vec<IntelligentTieringConfiguration>>,
}

/// Properties for `AWS::S3::BucketPolicy`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketPolicyProperties {
    /// The bucket the policy attaches to.
    pub bucket: CfnValue,
    /// The policy document.
    pub policy_document: PolicyDocument,
}
