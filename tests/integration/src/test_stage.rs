//! Full-stage synthesis checks across environments.

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use lakestack_core::TargetEnvironment;

    use crate::{stage_for, synthesized_json};

    #[test]
    fn test_should_synthesize_a_network_and_a_storage_document() {
        for environment in TargetEnvironment::ALL {
            let stage = stage_for(environment);
            let documents = synthesized_json(&stage);

            assert_eq!(documents.len(), 2);
            assert_eq!(documents[0].0, format!("{environment}-network"));
            assert_eq!(documents[1].0, format!("{environment}-storage"));
            for (name, document) in &documents {
                assert!(document["Description"].is_string(), "{name}");
                assert!(document["Resources"].is_object(), "{name}");
                assert!(document["Outputs"].is_object(), "{name}");
            }
        }
    }

    #[test]
    fn test_should_keep_export_names_unique_across_the_deploy_scope() {
        // Exports live in one account/region namespace, so every name must be
        // unique across both documents of an environment, and environments
        // deployed side by side must not collide either.
        let mut all_names = BTreeSet::new();
        let mut total = 0usize;

        for environment in TargetEnvironment::ALL {
            let stage = stage_for(environment);
            for (name, document) in synthesized_json(&stage) {
                for (logical_id, output) in document["Outputs"].as_object().unwrap() {
                    let export_name = output["Export"]["Name"]
                        .as_str()
                        .unwrap_or_else(|| panic!("{name}/{logical_id} lacks an export name"));
                    assert!(
                        all_names.insert(export_name.to_owned()),
                        "duplicate export name {export_name}"
                    );
                    total += 1;
                }
            }
        }

        // 11 network exports + 5 storage exports per environment.
        assert_eq!(total, 3 * 16);
    }

    #[test]
    fn test_should_tag_every_taggable_resource_in_both_documents() {
        let stage = stage_for(TargetEnvironment::Dev);
        let taggable = [
            "AWS::EC2::FlowLog",
            "AWS::EC2::RouteTable",
            "AWS::EC2::SecurityGroup",
            "AWS::EC2::Subnet",
            "AWS::EC2::VPC",
            "AWS::KMS::Key",
            "AWS::Logs::LogGroup",
            "AWS::S3::Bucket",
        ];

        for (name, document) in synthesized_json(&stage) {
            for (logical_id, resource) in document["Resources"].as_object().unwrap() {
                let resource_type = resource["Type"].as_str().unwrap();
                if !taggable.contains(&resource_type) {
                    continue;
                }
                let tags = resource["Properties"]["Tags"]
                    .as_array()
                    .unwrap_or_else(|| panic!("{name}/{logical_id} has no tags"));
                assert!(
                    tags.iter()
                        .any(|t| t["Key"] == "environment" && t["Value"] == "Dev"),
                    "{name}/{logical_id}"
                );
                assert!(
                    tags.iter()
                        .any(|t| t["Key"] == "application" && t["Value"] == "datalake"),
                    "{name}/{logical_id}"
                );
            }
        }
    }

    #[test]
    fn test_should_keep_environment_documents_account_scoped() {
        // Physical bucket names embed the environment account; templates for
        // different environments must never reference each other's accounts.
        let dev = synthesized_json(&stage_for(TargetEnvironment::Dev));
        let prod = synthesized_json(&stage_for(TargetEnvironment::Prod));

        let dev_storage = serde_json::to_string(&dev[1].1).unwrap();
        let prod_storage = serde_json::to_string(&prod[1].1).unwrap();

        assert!(dev_storage.contains("222222222222"));
        assert!(!dev_storage.contains("444444444444"));
        assert!(prod_storage.contains("444444444444"));
        assert!(!prod_storage.contains("222222222222"));
    }
}
