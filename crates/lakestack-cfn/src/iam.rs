//! IAM policy documents embedded in key and bucket policies.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::intrinsic::CfnValue;

/// Statement effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    /// Allow the listed actions.
    Allow,
    /// Deny the listed actions.
    Deny,
}

/// The principal a statement applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    /// One or more AWS account/user/role ARNs.
    Aws(Vec<String>),
    /// A service principal, e.g. `logs.amazonaws.com`.
    Service(String),
    /// Any principal (`"*"`).
    Any,
}

impl Serialize for Principal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Aws(arns) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("AWS", arns)?;
                map.end()
            }
            Self::Service(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Service", name)?;
                map.end()
            }
            Self::Any => serializer.serialize_str("*"),
        }
    }
}

/// One policy statement.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    /// Statement identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Allow or deny.
    pub effect: Effect,
    /// Principals the statement applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    /// Actions covered.
    pub action: Vec<String>,
    /// Resources covered (literals or intrinsics). Empty in trust policies,
    /// which carry no resource element.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<CfnValue>,
    /// Condition block, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<serde_json::Value>,
}

impl PolicyStatement {
    /// An allow statement without conditions.
    #[must_use]
    pub fn allow(
        sid: &str,
        principal: Principal,
        actions: &[&str],
        resources: Vec<CfnValue>,
    ) -> Self {
        Self {
            sid: Some(sid.to_owned()),
            effect: Effect::Allow,
            principal: Some(principal),
            action: actions.iter().map(|a| (*a).to_owned()).collect(),
            resource: resources,
            condition: None,
        }
    }

    /// A deny statement with a condition block.
    #[must_use]
    pub fn deny_when(
        sid: &str,
        principal: Principal,
        actions: &[&str],
        resources: Vec<CfnValue>,
        condition: serde_json::Value,
    ) -> Self {
        Self {
            sid: Some(sid.to_owned()),
            effect: Effect::Deny,
            principal: Some(principal),
            action: actions.iter().map(|a| (*a).to_owned()).collect(),
            resource: resources,
            condition: Some(condition),
        }
    }
}

/// A policy document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    /// Policy language version.
    pub version: &'static str,
    /// Statements, evaluated together.
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    /// A document in the current policy language version.
    #[must_use]
    pub fn new(statements: Vec<PolicyStatement>) -> Self {
        Self {
            version: "2012-10-17",
            statement: statements,
        }
    }
}

/// Properties for `AWS::IAM::Role`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleProperties {
    /// Trust policy: who may assume the role.
    pub assume_role_policy_document: PolicyDocument,
    /// Inline policies attached to the role.
    pub policies: Vec<RolePolicy>,
}

/// An inline role policy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RolePolicy {
    /// Policy name, unique within the role.
    pub policy_name: String,
    /// The policy document.
    pub policy_document: PolicyDocument,
}

impl RoleProperties {
    /// A role assumable by one service principal, with a single inline policy.
    #[must_use]
    pub fn for_service(service: &str, policy_name: &str, policy: PolicyDocument) -> Self {
        Self {
            assume_role_policy_document: PolicyDocument::new(vec![PolicyStatement {
                sid: None,
                effect: Effect::Allow,
                principal: Some(Principal::Service(service.to_owned())),
                action: vec!["sts:AssumeRole".to_owned()],
                resource: Vec::new(),
                condition: None,
            }]),
            policies: vec![RolePolicy {
                policy_name: policy_name.to_owned(),
                policy_document: policy,
            }],
        }
    }
}
