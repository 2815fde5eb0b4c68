//! End-to-end checks on the synthesized storage template.

#[cfg(test)]
mod tests {
    use lakestack_core::TargetEnvironment;

    use crate::stage_for;

    #[test]
    fn test_should_declare_four_buckets_and_one_key_per_environment() {
        for environment in TargetEnvironment::ALL {
            let stage = stage_for(environment);
            let template = stage.storage().template();

            assert_eq!(template.resource_count_of("AWS::S3::Bucket"), 4);
            assert_eq!(template.resource_count_of("AWS::KMS::Key"), 1);
            assert_eq!(template.resource_count_of("AWS::KMS::Alias"), 1);
            assert_eq!(template.resource_count_of("AWS::S3::BucketPolicy"), 4);
        }
    }

    #[test]
    fn test_should_encrypt_data_buckets_with_the_customer_key() {
        let stage = stage_for(TargetEnvironment::Dev);
        let template = stage.storage().template();

        for zone in ["Collect", "Cleanse", "Consume"] {
            let bucket = &template.resources()[&format!("DevDataLake{zone}Bucket")];
            let rule =
                &bucket.properties()["BucketEncryption"]["ServerSideEncryptionConfiguration"][0];
            assert_eq!(
                rule["ServerSideEncryptionByDefault"]["SSEAlgorithm"],
                "aws:kms",
                "{zone}"
            );
            assert_eq!(
                rule["ServerSideEncryptionByDefault"]["KMSMasterKeyID"],
                serde_json::json!({ "Fn::GetAtt": ["DevDataLakeKmsKey", "Arn"] })
            );
            assert_eq!(rule["BucketKeyEnabled"], true);
        }
    }

    #[test]
    fn test_should_keep_the_access_log_sink_on_provider_managed_keys() {
        for environment in TargetEnvironment::ALL {
            let stage = stage_for(environment);
            let bucket = &stage.storage().template().resources()
                [&format!("{environment}DataLakeAccessLogsBucket")];
            let rule =
                &bucket.properties()["BucketEncryption"]["ServerSideEncryptionConfiguration"][0];
            assert_eq!(
                rule["ServerSideEncryptionByDefault"]["SSEAlgorithm"],
                "AES256"
            );
            assert!(
                rule["ServerSideEncryptionByDefault"]
                    .get("KMSMasterKeyID")
                    .is_none()
            );
        }
    }

    #[test]
    fn test_should_route_data_bucket_access_logs_to_the_sink() {
        let stage = stage_for(TargetEnvironment::Test);
        let template = stage.storage().template();

        for (zone, role) in [("Collect", "collect"), ("Cleanse", "cleanse"), ("Consume", "consume")]
        {
            let bucket = &template.resources()[&format!("TestDataLake{zone}Bucket")];
            let logging = &bucket.properties()["LoggingConfiguration"];
            assert_eq!(
                logging["DestinationBucketName"],
                serde_json::json!({ "Ref": "TestDataLakeAccessLogsBucket" })
            );
            assert_eq!(
                logging["LogFilePrefix"],
                format!("test-datalake-333333333333-us-east-2-{role}-")
            );
        }
    }

    #[test]
    fn test_should_deny_insecure_transport_on_every_bucket() {
        let stage = stage_for(TargetEnvironment::Dev);
        let template = stage.storage().template();

        for role in ["AccessLogs", "Collect", "Cleanse", "Consume"] {
            let policy = &template.resources()[&format!("DevDataLake{role}BucketPolicy")];
            let statements = policy.properties()["PolicyDocument"]["Statement"]
                .as_array()
                .unwrap();
            let deny = &statements[0];
            assert_eq!(deny["Sid"], "OnlyAllowSecureTransport");
            assert_eq!(deny["Effect"], "Deny");
            assert_eq!(deny["Principal"], "*");
            assert_eq!(
                deny["Condition"],
                serde_json::json!({ "Bool": { "aws:SecureTransport": "false" } })
            );
        }
    }

    #[test]
    fn test_should_export_storage_values_under_derived_names() {
        let stage = stage_for(TargetEnvironment::Dev);
        let template = stage.storage().template();

        let expected = [
            ("S3KmsKeyArn", "DevDataLakeS3KmsKeyArn"),
            ("S3AccessLogBucket", "DevDataLakeS3AccessLogBucket"),
            ("CollectBucketName", "DevDataLakeCollectBucketName"),
            ("CleanseBucketName", "DevDataLakeCleanseBucketName"),
            ("ConsumeBucketName", "DevDataLakeConsumeBucketName"),
        ];
        assert_eq!(template.outputs().len(), expected.len());
        for (logical_id, export_name) in expected {
            let output = &template.outputs()[logical_id];
            let export = output.export.as_ref().expect("exported output");
            assert_eq!(export.name, export_name);
        }
    }

    #[test]
    fn test_should_alias_the_key_per_environment() {
        let stage = stage_for(TargetEnvironment::Prod);
        let alias = &stage.storage().template().resources()["ProdDataLakeKmsKeyAlias"];
        assert_eq!(alias.properties()["AliasName"], "alias/prod-datalake-kms-key");
    }
}
