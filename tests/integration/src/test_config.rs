//! Configuration-file-driven synthesis tests.

#[cfg(test)]
mod tests {
    use std::io::Write;

    use lakestack_core::{Configuration, LakeStackError, TargetEnvironment};
    use lakestack_stacks::DeployStage;

    use crate::{aws_env_for, deployment_account, stage_for};

    fn write_config(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(json.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_should_synthesize_from_configuration_file() {
        let file = write_config(
            r#"{
                "deployment": {
                    "account_id": "999999999999",
                    "region": "us-east-2",
                    "logical_id_prefix": "Insurance",
                    "resource_name_prefix": "insurance",
                    "deploy_secret_name": "insurance/deploy/token"
                },
                "environments": {
                    "Dev": {
                        "account_id": "888888888888",
                        "vpc_cidr": "10.50.0.0/22"
                    }
                }
            }"#,
        );

        let configuration = Configuration::from_json_file(file.path()).expect("load");
        let stage = DeployStage::new(
            &configuration,
            TargetEnvironment::Dev,
            &deployment_account(),
            &aws_env_for(TargetEnvironment::Dev),
        )
        .expect("stage");

        let network = stage.network().expect("network stack");
        assert!(network.template().resources().contains_key("InsuranceVpc"));

        let storage = stage.storage();
        let bucket = &storage.template().resources()["DevInsuranceCollectBucket"];
        assert_eq!(
            bucket.properties()["BucketName"],
            "dev-insurance-888888888888-us-east-2-collect"
        );
    }

    #[test]
    fn test_should_skip_network_when_file_omits_cidr() {
        let file = write_config(
            r#"{
                "deployment": {
                    "account_id": "999999999999",
                    "region": "us-east-2",
                    "logical_id_prefix": "Insurance",
                    "resource_name_prefix": "insurance"
                },
                "environments": {
                    "Dev": { "account_id": "888888888888" }
                }
            }"#,
        );

        let configuration = Configuration::from_json_file(file.path()).expect("load");
        let stage = DeployStage::new(
            &configuration,
            TargetEnvironment::Dev,
            &deployment_account(),
            &aws_env_for(TargetEnvironment::Dev),
        )
        .expect("stage");

        assert!(stage.network().is_none());
        assert_eq!(stage.templates().len(), 1);
    }

    #[test]
    fn test_should_fail_stage_on_incomplete_environment() {
        let file = write_config(
            r#"{
                "deployment": { "logical_id_prefix": "Insurance" },
                "environments": { "Test": { "account_id": "888888888888" } }
            }"#,
        );

        let configuration = Configuration::from_json_file(file.path()).expect("load");
        let err = DeployStage::new(
            &configuration,
            TargetEnvironment::Test,
            &deployment_account(),
            &aws_env_for(TargetEnvironment::Test),
        )
        .unwrap_err();

        assert!(matches!(err, LakeStackError::MissingConfig { .. }));
    }

    #[test]
    fn test_should_synthesize_identical_documents_on_repeat() {
        for environment in TargetEnvironment::ALL {
            let first = crate::synthesized_json(&stage_for(environment));
            let second = crate::synthesized_json(&stage_for(environment));
            assert_eq!(first, second, "{environment} synthesis should be stable");
        }
    }
}
