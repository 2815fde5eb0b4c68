//! The three-zone private network declaration.

use lakestack_cfn::ec2::{
    FlowLogProperties, RouteTableProperties, SecurityGroupEgressRule, SecurityGroupIngressProperties,
    SecurityGroupProperties, SubnetProperties, SubnetRouteTableAssociationProperties,
    VpcEndpointProperties, VpcEndpointType, VpcProperties,
};
use lakestack_cfn::iam::{Effect, PolicyDocument, PolicyStatement, RoleProperties};
use lakestack_cfn::logs::LogGroupProperties;
use lakestack_cfn::{CfnValue, Output, Resource, Tag, Template};
use lakestack_core::{
    AwsEnvironment, EnvironmentPolicy, ExportKey, ExportRegistry, LakeStackError, LakeStackResult,
    ResolvedConfig, ZoneIndex,
};
use tracing::debug;

use crate::cidr::CidrBlock;

/// Gateway endpoint services (route-table attached).
const GATEWAY_SERVICES: [(&str, &str); 2] = [("S3", "s3"), ("DynamoDb", "dynamodb")];

/// Interface endpoint services (ENI attached, behind the shared group).
const INTERFACE_SERVICES: [(&str, &str); 5] = [
    ("Glue", "glue"),
    ("Kms", "kms"),
    ("Ssm", "ssm"),
    ("SecretsManager", "secretsmanager"),
    ("StepFunctions", "states"),
];

/// Declares the environment VPC: three private zones with paired public
/// subnets, flow logging, a shared self-referencing ingress group, and the
/// service endpoints the data lake workloads reach privately.
///
/// Downstream stacks import per-zone values and assume exactly three zones,
/// so construction fails before declaring anything if the deployment target
/// cannot guarantee that.
#[derive(Debug)]
pub struct NetworkStack {
    name: String,
    template: Template,
    exports: ExportRegistry,
    availability_zones: Vec<String>,
}

impl NetworkStack {
    /// Construct the network stack for a resolved environment.
    pub fn new(config: &ResolvedConfig, aws_env: &AwsEnvironment) -> LakeStackResult<Self> {
        let (_, region) = aws_env.require()?;

        let zones = region.availability_zones();
        if zones.len() < 3 {
            return Err(LakeStackError::AvailabilityZones(format!(
                "region {region} provides {} availability zones; downstream stacks \
                 import per-zone values and expect exactly 3",
                zones.len()
            )));
        }
        let zones: Vec<String> = zones.into_iter().take(3).collect();

        let environment = config.environment();
        let prefix = config.logical_id_prefix();
        let policy = EnvironmentPolicy::for_environment(environment);

        let vpc_cidr = config.vpc_cidr().ok_or(LakeStackError::MissingConfig {
            environment: environment.to_string(),
            key: lakestack_core::ConfigKey::VpcCidr,
        })?;
        let blocks = CidrBlock::parse(vpc_cidr)?.subdivide(3)?;

        let name = format!("{environment}{prefix}Network");
        let mut template = Template::new(format!(
            "LakeStack networking resources for the {environment} data lake"
        ));
        let mut exports = ExportRegistry::new(environment);

        debug!(stack = %name, vpc_cidr, "declaring network stack");

        // VPC and flow logging.
        let vpc_id = format!("{prefix}Vpc");
        template.add_resource(
            &vpc_id,
            Resource::new(
                "AWS::EC2::VPC",
                VpcProperties {
                    cidr_block: vpc_cidr.to_owned(),
                    enable_dns_support: true,
                    enable_dns_hostnames: true,
                    tags: vec![Tag::new("Name", format!("{environment}{prefix}Vpc"))],
                },
            )?,
        )?;

        let log_group_id = format!("{environment}{prefix}VpcFlowLogGroup");
        template.add_resource(
            &log_group_id,
            Resource::new(
                "AWS::Logs::LogGroup",
                LogGroupProperties {
                    retention_in_days: policy.log_retention_days,
                },
            )?
            .with_removal_policy(policy.removal_policy),
        )?;

        let flow_log_role_id = format!("{environment}{prefix}VpcFlowLogRole");
        template.add_resource(
            &flow_log_role_id,
            Resource::new(
                "AWS::IAM::Role",
                RoleProperties::for_service(
                    "vpc-flow-logs.amazonaws.com",
                    "FlowLogDelivery",
                    PolicyDocument::new(vec![PolicyStatement {
                        sid: None,
                        effect: Effect::Allow,
                        principal: None,
                        action: vec![
                            "logs:CreateLogStream".to_owned(),
                            "logs:PutLogEvents".to_owned(),
                            "logs:DescribeLogGroups".to_owned(),
                            "logs:DescribeLogStreams".to_owned(),
                        ],
                        resource: vec![CfnValue::get_att(&log_group_id, "Arn")],
                        condition: None,
                    }]),
                ),
            )?,
        )?;

        template.add_resource(
            format!("{environment}{prefix}VpcFlowLog"),
            Resource::new(
                "AWS::EC2::FlowLog",
                FlowLogProperties {
                    resource_id: CfnValue::ref_to(&vpc_id),
                    resource_type: "VPC",
                    traffic_type: "ALL",
                    log_destination_type: "cloud-watch-logs",
                    log_group_name: CfnValue::ref_to(&log_group_id),
                    deliver_logs_permission_arn: CfnValue::get_att(&flow_log_role_id, "Arn"),
                },
            )?,
        )?;

        // One private and one public subnet per zone, each with its own
        // route table. The first three CIDR blocks are private, the next
        // three public; the last two stay unused for growth.
        let mut private_subnet_ids = Vec::new();
        let mut private_route_table_ids = Vec::new();
        let mut all_route_table_refs = Vec::new();

        for (kind, offset, public) in [("Private", 0usize, false), ("Public", 3usize, true)] {
            for zone in ZoneIndex::ALL {
                let n = zone.ordinal();
                let subnet_id = format!("{environment}{prefix}{kind}Subnet{n}");
                let route_table_id = format!("{environment}{prefix}{kind}RouteTable{n}");

                template.add_resource(
                    &subnet_id,
                    Resource::new(
                        "AWS::EC2::Subnet",
                        SubnetProperties {
                            vpc_id: CfnValue::ref_to(&vpc_id),
                            cidr_block: blocks[offset + zone.position()].to_string(),
                            availability_zone: zones[zone.position()].clone(),
                            map_public_ip_on_launch: public.then_some(true),
                        },
                    )?,
                )?;
                template.add_resource(
                    &route_table_id,
                    Resource::new(
                        "AWS::EC2::RouteTable",
                        RouteTableProperties {
                            vpc_id: CfnValue::ref_to(&vpc_id),
                        },
                    )?,
                )?;
                template.add_resource(
                    format!("{route_table_id}Association"),
                    Resource::new(
                        "AWS::EC2::SubnetRouteTableAssociation",
                        SubnetRouteTableAssociationProperties {
                            subnet_id: CfnValue::ref_to(&subnet_id),
                            route_table_id: CfnValue::ref_to(&route_table_id),
                        },
                    )?,
                )?;

                all_route_table_refs.push(CfnValue::ref_to(&route_table_id));
                if !public {
                    private_subnet_ids.push(subnet_id);
                    private_route_table_ids.push(route_table_id);
                }
            }
        }

        // Shared security group: members may talk to each other freely,
        // everything else is denied by default.
        let group_id = format!("{environment}{prefix}SharedIngressSecurityGroup");
        template.add_resource(
            &group_id,
            Resource::new(
                "AWS::EC2::SecurityGroup",
                SecurityGroupProperties {
                    group_description:
                        "Shared security group for data lake resources with self-referencing ingress rule"
                            .to_owned(),
                    vpc_id: CfnValue::ref_to(&vpc_id),
                    security_group_egress: vec![SecurityGroupEgressRule {
                        ip_protocol: "-1".to_owned(),
                        cidr_ip: "0.0.0.0/0".to_owned(),
                        description: "Allow all outbound traffic".to_owned(),
                    }],
                },
            )?,
        )?;
        template.add_resource(
            format!("{group_id}SelfReference"),
            Resource::new(
                "AWS::EC2::SecurityGroupIngress",
                SecurityGroupIngressProperties {
                    group_id: CfnValue::get_att(&group_id, "GroupId"),
                    source_security_group_id: CfnValue::get_att(&group_id, "GroupId"),
                    ip_protocol: "-1".to_owned(),
                    description: "Self-referencing ingress rule".to_owned(),
                },
            )?,
        )?;

        // Service endpoints so workloads never leave the VPC.
        for (logical, service) in GATEWAY_SERVICES {
            template.add_resource(
                format!("{environment}{prefix}{logical}Endpoint"),
                Resource::new(
                    "AWS::EC2::VPCEndpoint",
                    VpcEndpointProperties {
                        service_name: format!("com.amazonaws.{region}.{service}"),
                        vpc_id: CfnValue::ref_to(&vpc_id),
                        vpc_endpoint_type: VpcEndpointType::Gateway,
                        route_table_ids: all_route_table_refs.clone(),
                        subnet_ids: Vec::new(),
                        security_group_ids: Vec::new(),
                        private_dns_enabled: None,
                    },
                )?,
            )?;
        }
        for (logical, service) in INTERFACE_SERVICES {
            template.add_resource(
                format!("{environment}{prefix}{logical}Endpoint"),
                Resource::new(
                    "AWS::EC2::VPCEndpoint",
                    VpcEndpointProperties {
                        service_name: format!("com.amazonaws.{region}.{service}"),
                        vpc_id: CfnValue::ref_to(&vpc_id),
                        vpc_endpoint_type: VpcEndpointType::Interface,
                        route_table_ids: Vec::new(),
                        subnet_ids: private_subnet_ids.iter().map(CfnValue::ref_to).collect(),
                        security_group_ids: vec![CfnValue::get_att(&group_id, "GroupId")],
                        private_dns_enabled: Some(true),
                    },
                )?,
            )?;
        }

        // Publish the cross-stack exports: the typed registry and the
        // template outputs are written together so they cannot drift.
        let mut publish = |template: &mut Template,
                           exports: &mut ExportRegistry,
                           key: ExportKey,
                           value: CfnValue|
         -> LakeStackResult<()> {
            let export_name = key.export_name(environment, prefix);
            template.add_output(key.role(), Output::exported(&value, &export_name))?;
            exports.publish(key, export_name, value.to_json())
        };

        publish(
            &mut template,
            &mut exports,
            ExportKey::VpcId,
            CfnValue::ref_to(&vpc_id),
        )?;
        for zone in ZoneIndex::ALL {
            publish(
                &mut template,
                &mut exports,
                ExportKey::AvailabilityZone(zone),
                CfnValue::literal(zones[zone.position()].clone()),
            )?;
            publish(
                &mut template,
                &mut exports,
                ExportKey::SubnetId(zone),
                CfnValue::ref_to(&private_subnet_ids[zone.position()]),
            )?;
            publish(
                &mut template,
                &mut exports,
                ExportKey::RouteTableId(zone),
                CfnValue::ref_to(&private_route_table_ids[zone.position()]),
            )?;
        }
        publish(
            &mut template,
            &mut exports,
            ExportKey::SharedSecurityGroupId,
            CfnValue::get_att(&group_id, "GroupId"),
        )?;

        Ok(Self {
            name,
            template,
            exports,
            availability_zones: zones,
        })
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

    /// The three zones the network spans.
    #[must_use]
    pub fn availability_zones(&self) -> &[String] {
        &self.availability_zones
    }
}
