//! The storage-zone declaration: one encryption key and four buckets.

use lakestack_cfn::iam::{PolicyDocument, PolicyStatement, Principal};
use lakestack_cfn::kms::{AliasProperties, KeyProperties};
use lakestack_cfn::s3::{
    BucketAccessControl, BucketEncryption, BucketPolicyProperties, BucketProperties,
    IntelligentTieringConfiguration, LifecycleConfiguration, LifecycleRule, LoggingConfiguration,
    NoncurrentVersionExpiration, ObjectOwnership, OwnershipControls,
    PublicAccessBlockConfiguration, Tiering, Transition, VersioningConfiguration,
};
use lakestack_cfn::{CfnValue, Output, Resource, Template};
use lakestack_core::{
    AccountId, EnvironmentPolicy, ExportKey, ExportRegistry, LakeStackResult, ResolvedConfig,
};
use tracing::debug;

/// The three data zones and their export roles.
const DATA_ZONES: [(&str, &str, ExportKey); 3] = [
    ("Collect", "collect", ExportKey::CollectBucketName),
    ("Cleanse", "cleanse", ExportKey::CleanseBucketName),
    ("Consume", "consume", ExportKey::ConsumeBucketName),
];

/// Declares the data lake storage: a customer-managed encryption key, an
/// access-log sink, and the collect/cleanse/consume zone buckets with
/// environment-conditioned lifecycle and deletion protection.
#[derive(Debug)]
pub struct StorageStack {
    name: String,
    template: Template,
    exports: ExportRegistry,
}

impl StorageStack {
    /// Construct the storage stack for a resolved environment.
    ///
    /// `deployment_account_id` is the central deployment account, granted
    /// key usage so the pipeline can manage the buckets it deploys.
    pub fn new(
        config: &ResolvedConfig,
        deployment_account_id: &AccountId,
    ) -> LakeStackResult<Self> {
        let environment = config.environment();
        let prefix = config.logical_id_prefix();
        let policy = EnvironmentPolicy::for_environment(environment);

        let name = format!("{environment}{prefix}Storage");
        let mut template = Template::new(format!(
            "LakeStack storage zones for the {environment} data lake"
        ));
        let mut exports = ExportRegistry::new(environment);

        debug!(stack = %name, "declaring storage stack");

        let key_id = Self::declare_kms_key(&mut template, config, deployment_account_id, &policy)?;
        let access_logs_id = Self::declare_access_logs_bucket(&mut template, config, &policy)?;

        let mut publish = |template: &mut Template,
                           exports: &mut ExportRegistry,
                           key: ExportKey,
                           value: CfnValue|
         -> LakeStackResult<()> {
            let export_name = key.export_name(environment, prefix);
            template.add_output(key.role(), Output::exported(&value, &export_name))?;
            exports.publish(key, export_name, value.to_json())
        };

        for (logical_role, name_role, export_key) in DATA_ZONES {
            let bucket_id = Self::declare_data_bucket(
                &mut template,
                config,
                &policy,
                logical_role,
                name_role,
                &access_logs_id,
                &key_id,
            )?;
            publish(
                &mut template,
                &mut exports,
                export_key,
                CfnValue::ref_to(bucket_id),
            )?;
        }

        publish(
            &mut template,
            &mut exports,
            ExportKey::KmsKeyArn,
            CfnValue::get_att(&key_id, "Arn"),
        )?;
        publish(
            &mut template,
            &mut exports,
            ExportKey::AccessLogsBucketName,
            CfnValue::ref_to(&access_logs_id),
        )?;

        Ok(Self {
            name,
            template,
            exports,
        })
    }

    /// Declare the customer-managed key used by every data-zone bucket.
    fn declare_kms_key(
        template: &mut Template,
        config: &ResolvedConfig,
        deployment_account_id: &AccountId,
        policy: &EnvironmentPolicy,
    ) -> LakeStackResult<String> {
        let environment = config.environment();
        let prefix = config.logical_id_prefix();
        let account_root = config.account_id().root_arn();

        let key_policy = PolicyDocument::new(vec![
            PolicyStatement::allow(
                "AccountRootKeyAdministration",
                Principal::Aws(vec![account_root.clone()]),
                &["kms:*"],
                vec![CfnValue::literal("*")],
            ),
            // The deployment account manages the buckets, so it needs full
            // data-key access alongside the environment account.
            PolicyStatement::allow(
                "DeploymentAndEnvUserKeyAccess",
                Principal::Aws(vec![account_root, deployment_account_id.root_arn()]),
                &[
                    "kms:Encrypt",
                    "kms:Decrypt",
                    "kms:ReEncrypt*",
                    "kms:GenerateDataKey*",
                    "kms:DescribeKey",
                ],
                vec![CfnValue::literal("*")],
            ),
            // Notification topics downstream encrypt with this key;
            // subscribers need the service principal granted.
            PolicyStatement::allow(
                "SnsEncryptedTopicKeyAccess",
                Principal::Service("sns.amazonaws.com".to_owned()),
                &["kms:Decrypt", "kms:GenerateDataKey*"],
                vec![CfnValue::literal("*")],
            ),
            PolicyStatement::allow(
                "LogsEncryptedLogsKeyAccess",
                Principal::Service("logs.amazonaws.com".to_owned()),
                &["kms:Decrypt", "kms:GenerateDataKey*"],
                vec![CfnValue::literal("*")],
            ),
        ]);

        let key_id = format!("{environment}{prefix}KmsKey");
        template.add_resource(
            &key_id,
            Resource::new(
                "AWS::KMS::Key",
                KeyProperties {
                    description: "Key used for encrypting data lake buckets and downstream \
                                  tables, topics, and job resources"
                        .to_owned(),
                    enable_key_rotation: true,
                    pending_window_in_days: 30,
                    key_policy,
                },
            )?
            .with_removal_policy(policy.removal_policy),
        )?;
        template.add_resource(
            format!("{key_id}Alias"),
            Resource::new(
                "AWS::KMS::Alias",
                AliasProperties::new(
                    &format!(
                        "{}-{}-kms-key",
                        environment.as_lowercase(),
                        config.resource_name_prefix()
                    ),
                    CfnValue::ref_to(&key_id),
                ),
            )?,
        )?;

        Ok(key_id)
    }

    /// Declare the access-log sink bucket.
    fn declare_access_logs_bucket(
        template: &mut Template,
        config: &ResolvedConfig,
        policy: &EnvironmentPolicy,
    ) -> LakeStackResult<String> {
        let environment = config.environment();
        let bucket_id = format!("{environment}{}AccessLogsBucket", config.logical_id_prefix());
        let bucket_name = Self::bucket_name(config, "access-logs");

        template.add_resource(
            &bucket_id,
            Resource::new(
                "AWS::S3::Bucket",
                BucketProperties {
                    bucket_name: bucket_name.clone(),
                    access_control: Some(BucketAccessControl::LogDeliveryWrite),
                    public_access_block_configuration: Some(
                        PublicAccessBlockConfiguration::block_all(),
                    ),
                    // Server access log delivery only supports provider-managed
                    // keys for default bucket encryption; the custom key cannot
                    // be used here.
                    bucket_encryption: Some(BucketEncryption::s3_managed()),
                    versioning_configuration: Some(VersioningConfiguration::enabled()),
                    lifecycle_configuration: None,
                    logging_configuration: None,
                    ownership_controls: Some(OwnershipControls::new(
                        ObjectOwnership::BucketOwnerPreferred,
                    )),
                    intelligent_tiering_configurations: Some(vec![
                        IntelligentTieringConfiguration {
                            id: "ServerAccessLogsDeepArchiveConfiguration".to_owned(),
                            status: "Enabled",
                            tierings: vec![
                                Tiering {
                                    access_tier: "ARCHIVE_ACCESS",
                                    days: 90,
                                },
                                Tiering {
                                    access_tier: "DEEP_ARCHIVE_ACCESS",
                                    days: 180,
                                },
                            ],
                        },
                    ]),
                },
            )?
            .with_removal_policy(policy.removal_policy),
        )?;

        template.add_resource(
            format!("{bucket_id}Policy"),
            Resource::new(
                "AWS::S3::BucketPolicy",
                BucketPolicyProperties {
                    bucket: CfnValue::ref_to(&bucket_id),
                    policy_document: PolicyDocument::new(vec![Self::deny_insecure_transport(
                        &bucket_name,
                    )]),
                },
            )?,
        )?;

        Ok(bucket_id)
    }

    /// The TLS-only guardrail every bucket carries.
    fn deny_insecure_transport(bucket_name: &str) -> PolicyStatement {
        PolicyStatement::deny_when(
            "OnlyAllowSecureTransport",
            Principal::Any,
            &["s3:GetObject", "s3:PutObject"],
            vec![CfnValue::literal(format!("arn:aws:s3:::{bucket_name}/*"))],
            serde_json::json!({ "Bool": { "aws:SecureTransport": "false" } }),
        )
    }

    /// Declare one data-zone bucket and its guardrail policy.
    fn declare_data_bucket(
        template: &mut Template,
        config: &ResolvedConfig,
        policy: &EnvironmentPolicy,
        logical_role: &str,
        name_role: &str,
        access_logs_id: &str,
        key_id: &str,
    ) -> LakeStackResult<String> {
        let environment = config.environment();
        let bucket_id = format!("{environment}{}{logical_role}Bucket", config.logical_id_prefix());
        let bucket_name = Self::bucket_name(config, name_role);

        let lifecycle = LifecycleRule {
            status: "Enabled",
            expiration_in_days: Some(policy.lifecycle.expiration_days),
            noncurrent_version_expiration: Some(NoncurrentVersionExpiration {
                noncurrent_days: policy.lifecycle.noncurrent_version_expiration_days,
            }),
            transitions: policy.lifecycle.cold_transition_days.map(|days| {
                vec![Transition {
                    storage_class: "GLACIER",
                    transition_in_days: days,
                }]
            }),
        };

        template.add_resource(
            &bucket_id,
            Resource::new(
                "AWS::S3::Bucket",
                BucketProperties {
                    bucket_name: bucket_name.clone(),
                    access_control: Some(BucketAccessControl::Private),
                    public_access_block_configuration: Some(
                        PublicAccessBlockConfiguration::block_all(),
                    ),
                    bucket_encryption: Some(BucketEncryption::kms(CfnValue::get_att(
                        key_id, "Arn",
                    ))),
                    versioning_configuration: Some(VersioningConfiguration::enabled()),
                    lifecycle_configuration: Some(LifecycleConfiguration {
                        rules: vec![lifecycle],
                    }),
                    logging_configuration: Some(LoggingConfiguration {
                        destination_bucket_name: CfnValue::ref_to(access_logs_id),
                        log_file_prefix: format!("{bucket_name}-"),
                    }),
                    ownership_controls: Some(OwnershipControls::new(ObjectOwnership::ObjectWriter)),
                    intelligent_tiering_configurations: None,
                },
            )?
            .with_removal_policy(policy.removal_policy),
        )?;

        let bucket_arn = CfnValue::get_att(&bucket_id, "Arn");
        let mut statements = vec![Self::deny_insecure_transport(&bucket_name)];
        if policy.block_bucket_deletion {
            statements.push(PolicyStatement::deny_when(
                "BlockUserDeletionOfBucket",
                Principal::Any,
                &["s3:DeleteBucket"],
                vec![bucket_arn],
                serde_json::json!({
                    "StringLike": {
                        "aws:userId": format!("arn:aws:iam::{}:user/*", config.account_id())
                    }
                }),
            ));
        }

        template.add_resource(
            format!("{bucket_id}Policy"),
            Resource::new(
                "AWS::S3::BucketPolicy",
                BucketPolicyProperties {
                    bucket: CfnValue::ref_to(&bucket_id),
                    policy_document: PolicyDocument::new(statements),
                },
            )?,
        )?;

        Ok(bucket_id)
    }

    /// Physical bucket name: `{env}-{prefix}-{account}-{region}-{role}`.
    fn bucket_name(config: &ResolvedConfig, role: &str) -> String {
        format!(
            "{}-{}-{}-{}-{role}",
            config.environment().as_lowercase(),
            config.resource_name_prefix(),
            config.account_id(),
            config.region(),
        )
    }

    /// The stack name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The assembled template.
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Mutable template access, used by the stage for tagging.
    pub fn template_mut(&mut self) -> &mut Template {
        &mut self.template
    }

    /// The exports this stack published.
    #[must_use]
    pub fn exports(&self) -> &ExportRegistry {
        &self.exports
    }
}
