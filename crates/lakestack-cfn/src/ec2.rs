//! Property structs for the EC2/VPC resource family.

use serde::Serialize;

use crate::intrinsic::CfnValue;
use crate::template::Tag;

/// Properties for `AWS::EC2::VPC`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcProperties {
    /// IPv4 CIDR block.
    pub cidr_block: String,
    /// Resolve AWS DNS inside the VPC.
    pub enable_dns_support: bool,
    /// Assign DNS hostnames to instances.
    pub enable_dns_hostnames: bool,
    /// Tags (the `Name` tag doubles as the VPC display name).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// Properties for `AWS::EC2::Subnet`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetProperties {
    /// Owning VPC.
    pub vpc_id: CfnValue,
    /// Subnet CIDR block.
    pub cidr_block: String,
    /// Availability zone the subnet lives in.
    pub availability_zone: String,
    /// Auto-assign public IPs (public subnets only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_public_ip_on_launch: Option<bool>,
}

/// Properties for `AWS::EC2::RouteTable`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RouteTableProperties {
    /// Owning VPC.
    pub vpc_id: CfnValue,
}

/// Properties for `AWS::EC2::SubnetRouteTableAssociation`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubnetRouteTableAssociationProperties {
    /// The subnet.
    pub subnet_id: CfnValue,
    /// The route table it uses.
    pub route_table_id: CfnValue,
}

/// An egress rule on a security group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroupEgressRule {
    /// Protocol (`-1` for all).
    pub ip_protocol: String,
    /// Destination CIDR.
    pub cidr_ip: String,
    /// Rule description.
    pub description: String,
}

/// Properties for `AWS::EC2::SecurityGroup`.
///
/// No explicit group name: the provider generates one, which avoids
/// replacement failures on updates.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroupProperties {
    /// Group description.
    pub group_description: String,
    /// Owning VPC.
    pub vpc_id: CfnValue,
    /// Egress rules.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_group_egress: Vec<SecurityGroupEgressRule>,
}

/// Properties for `AWS::EC2::SecurityGroupIngress`.
///
/// The self-referencing ingress rule is a standalone resource; declaring it
/// inline on the group would create a circular dependency.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroupIngressProperties {
    /// The group the rule attaches to.
    pub group_id: CfnValue,
    /// The source group allowed in.
    pub source_security_group_id: CfnValue,
    /// Protocol (`-1` for all).
    pub ip_protocol: String,
    /// Rule description.
    pub description: String,
}

/// VPC endpoint type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VpcEndpointType {
    /// Route-table based endpoint (S3, DynamoDB).
    Gateway,
    /// ENI-based endpoint.
    Interface,
}

/// Properties for `AWS::EC2::VPCEndpoint`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcEndpointProperties {
    /// Fully qualified service name, e.g. `com.amazonaws.us-east-2.s3`.
    pub service_name: String,
    /// Owning VPC.
    pub vpc_id: CfnValue,
    /// Gateway or interface.
    pub vpc_endpoint_type: VpcEndpointType,
    /// Route tables (gateway endpoints).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub route_table_ids: Vec<CfnValue>,
    /// Subnets hosting the endpoint ENIs (interface endpoints).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subnet_ids: Vec<CfnValue>,
    /// Security groups on the endpoint ENIs (interface endpoints).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub security_group_ids: Vec<CfnValue>,
    /// Private DNS (interface endpoints).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_dns_enabled: Option<bool>,
}

/// Properties for `AWS::EC2::FlowLog`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FlowLogProperties {
    /// The VPC whose traffic is logged.
    pub resource_id: CfnValue,
    /// Resource type (`VPC`).
    pub resource_type: &'static str,
    /// Which traffic to capture (`ALL`).
    pub traffic_type: &'static str,
    /// Destination type (`cloud-watch-logs`).
    pub log_destination_type: &'static str,
    /// Destination log group.
    pub log_group_name: CfnValue,
    /// Role the flow-log service assumes to deliver logs.
    pub deliver_logs_permission_arn: CfnValue,
}
