//! End-to-end checks on the synthesized network template.

#[cfg(test)]
mod tests {
    use lakestack_core::{AwsEnvironment, Configuration, TargetEnvironment};
    use lakestack_stacks::DeployStage;

    use crate::{deployment_account, stage_for};

    #[test]
    fn test_should_declare_expected_network_resource_counts() {
        for environment in TargetEnvironment::ALL {
            let stage = stage_for(environment);
            let template = stage.network().expect("network stack").template();

            assert_eq!(template.resource_count_of("AWS::EC2::VPC"), 1);
            assert_eq!(template.resource_count_of("AWS::EC2::Subnet"), 6);
            assert_eq!(template.resource_count_of("AWS::EC2::RouteTable"), 6);
            assert_eq!(
                template.resource_count_of("AWS::EC2::SubnetRouteTableAssociation"),
                6
            );
            assert_eq!(template.resource_count_of("AWS::EC2::SecurityGroup"), 1);
            assert_eq!(template.resource_count_of("AWS::EC2::SecurityGroupIngress"), 1);
            assert_eq!(template.resource_count_of("AWS::EC2::VPCEndpoint"), 7);
            assert_eq!(template.resource_count_of("AWS::Logs::LogGroup"), 1);
            assert_eq!(template.resource_count_of("AWS::EC2::FlowLog"), 1);
            assert_eq!(template.resource_count_of("AWS::IAM::Role"), 1);
        }
    }

    #[test]
    fn test_should_carve_subnets_from_the_configured_cidr() {
        let stage = stage_for(TargetEnvironment::Dev);
        let template = stage.network().expect("network stack").template();

        let expected = [
            ("DevDataLakePrivateSubnet1", "10.20.0.0/25"),
            ("DevDataLakePrivateSubnet2", "10.20.0.128/25"),
            ("DevDataLakePrivateSubnet3", "10.20.1.0/25"),
            ("DevDataLakePublicSubnet1", "10.20.1.128/25"),
            ("DevDataLakePublicSubnet2", "10.20.2.0/25"),
            ("DevDataLakePublicSubnet3", "10.20.2.128/25"),
        ];
        for (logical_id, cidr) in expected {
            let subnet = &template.resources()[logical_id];
            assert_eq!(subnet.properties()["CidrBlock"], cidr, "{logical_id}");
        }
    }

    #[test]
    fn test_should_place_subnets_across_three_zones() {
        let stage = stage_for(TargetEnvironment::Test);
        let network = stage.network().expect("network stack");

        assert_eq!(
            network.availability_zones(),
            ["us-east-2a", "us-east-2b", "us-east-2c"]
        );
        for (n, zone) in [(1, "us-east-2a"), (2, "us-east-2b"), (3, "us-east-2c")] {
            let subnet = &network.template().resources()[&format!("TestDataLakePrivateSubnet{n}")];
            assert_eq!(subnet.properties()["AvailabilityZone"], zone);
        }
    }

    #[test]
    fn test_should_attach_gateway_endpoints_to_every_route_table() {
        let stage = stage_for(TargetEnvironment::Dev);
        let template = stage.network().expect("network stack").template();

        for logical in ["S3", "DynamoDb"] {
            let endpoint = &template.resources()[&format!("DevDataLake{logical}Endpoint")];
            let properties = endpoint.properties();
            assert_eq!(properties["VpcEndpointType"], "Gateway");
            assert_eq!(properties["RouteTableIds"].as_array().unwrap().len(), 6);
            assert!(properties.get("SubnetIds").is_none());
            assert!(properties.get("PrivateDnsEnabled").is_none());
        }
    }

    #[test]
    fn test_should_bind_interface_endpoints_to_private_subnets() {
        let stage = stage_for(TargetEnvironment::Dev);
        let template = stage.network().expect("network stack").template();

        let services = [
            ("Glue", "glue"),
            ("Kms", "kms"),
            ("Ssm", "ssm"),
            ("SecretsManager", "secretsmanager"),
            ("StepFunctions", "states"),
        ];
        for (logical, service) in services {
            let endpoint = &template.resources()[&format!("DevDataLake{logical}Endpoint")];
            let properties = endpoint.properties();
            assert_eq!(properties["VpcEndpointType"], "Interface");
            assert_eq!(
                properties["ServiceName"],
                format!("com.amazonaws.us-east-2.{service}")
            );
            assert_eq!(properties["SubnetIds"].as_array().unwrap().len(), 3);
            assert_eq!(properties["SecurityGroupIds"].as_array().unwrap().len(), 1);
            assert_eq!(properties["PrivateDnsEnabled"], true);
        }
    }

    #[test]
    fn test_should_export_network_values_under_derived_names() {
        let stage = stage_for(TargetEnvironment::Prod);
        let template = stage.network().expect("network stack").template();

        let expected = [
            ("VpcId", "ProdDataLakeVpcId"),
            ("AvailabilityZone1", "ProdDataLakeAvailabilityZone1"),
            ("AvailabilityZone2", "ProdDataLakeAvailabilityZone2"),
            ("AvailabilityZone3", "ProdDataLakeAvailabilityZone3"),
            ("SubnetId1", "ProdDataLakeSubnetId1"),
            ("SubnetId2", "ProdDataLakeSubnetId2"),
            ("SubnetId3", "ProdDataLakeSubnetId3"),
            ("RouteTable1", "ProdDataLakeRouteTable1"),
            ("RouteTable2", "ProdDataLakeRouteTable2"),
            ("RouteTable3", "ProdDataLakeRouteTable3"),
            ("SharedSecurityGroupId", "ProdDataLakeSharedSecurityGroupId"),
        ];
        assert_eq!(template.outputs().len(), expected.len());
        for (logical_id, export_name) in expected {
            let output = &template.outputs()[logical_id];
            let export = output.export.as_ref().expect("exported output");
            assert_eq!(export.name, export_name);
        }
    }

    #[test]
    fn test_should_refuse_to_synthesize_without_account_and_region() {
        let err = DeployStage::new(
            &Configuration::builtin(),
            TargetEnvironment::Dev,
            &deployment_account(),
            &AwsEnvironment::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("availability zones"), "{err}");
    }
}
