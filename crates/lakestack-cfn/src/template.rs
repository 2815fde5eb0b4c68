//! Template document assembly.

use std::collections::BTreeMap;

use serde::Serialize;

use lakestack_core::{LakeStackError, LakeStackResult, RemovalPolicy};

use crate::intrinsic::CfnValue;

/// Resource types that accept a `Tags` property list.
const TAGGABLE_TYPES: &[&str] = &[
    "AWS::EC2::FlowLog",
    "AWS::EC2::RouteTable",
    "AWS::EC2::SecurityGroup",
    "AWS::EC2::Subnet",
    "AWS::EC2::VPC",
    "AWS::KMS::Key",
    "AWS::Logs::LogGroup",
    "AWS::S3::Bucket",
];

/// A resource tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Create a tag.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One declared resource.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    /// CloudFormation resource type, e.g. `AWS::S3::Bucket`.
    #[serde(rename = "Type")]
    resource_type: String,
    /// Resource properties as a JSON object.
    properties: serde_json::Value,
    /// What happens to the physical resource when the declaration is removed.
    #[serde(skip_serializing_if = "Option::is_none")]
    deletion_policy: Option<&'static str>,
    /// Same policy applied on replacement updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    update_replace_policy: Option<&'static str>,
}

impl Resource {
    /// Declare a resource from a typed property struct.
    pub fn new(resource_type: impl Into<String>, properties: impl Serialize) -> LakeStackResult<Self> {
        let properties = serde_json::to_value(properties)
            .map_err(|e| LakeStackError::Internal(anyhow::anyhow!("invalid properties: {e}")))?;
        Ok(Self {
            resource_type: resource_type.into(),
            properties,
            deletion_policy: None,
            update_replace_policy: None,
        })
    }

    /// Attach a removal policy, setting both the deletion and the
    /// update-replace behavior.
    #[must_use]
    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        let value = match policy {
            RemovalPolicy::Retain => "Retain",
            RemovalPolicy::Destroy => "Delete",
        };
        self.deletion_policy = Some(value);
        self.update_replace_policy = Some(value);
        self
    }

    /// The CloudFormation resource type.
    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// The serialized properties object.
    #[must_use]
    pub fn properties(&self) -> &serde_json::Value {
        &self.properties
    }

    /// The deletion policy, if one was set.
    #[must_use]
    pub fn deletion_policy(&self) -> Option<&str> {
        self.deletion_policy
    }

    fn is_taggable(&self) -> bool {
        TAGGABLE_TYPES.contains(&self.resource_type.as_str())
    }

    /// Append tags to the resource's `Tags` list, keeping any existing
    /// entries (existing keys win).
    fn append_tags(&mut self, tags: &[Tag]) {
        let serde_json::Value::Object(properties) = &mut self.properties else {
            return;
        };
        let existing = properties
            .entry("Tags")
            .or_insert_with(|| serde_json::Value::Array(Vec::new()));
        let serde_json::Value::Array(list) = existing else {
            return;
        };
        for tag in tags {
            let already_set = list
                .iter()
                .any(|t| t.get("Key").and_then(|k| k.as_str()) == Some(tag.key.as_str()));
            if !already_set {
                if let Ok(value) = serde_json::to_value(tag) {
                    list.push(value);
                }
            }
        }
    }
}

/// An exported output value.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    /// Export name, unique within the deploy scope.
    pub name: String,
}

/// A template output, optionally exported for cross-stack consumption.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    /// Output value (literal or intrinsic).
    pub value: serde_json::Value,
    /// Cross-stack export binding.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
}

impl Output {
    /// An output exported under a deploy-scope-unique name.
    #[must_use]
    pub fn exported(value: &CfnValue, export_name: impl Into<String>) -> Self {
        Self {
            value: value.to_json(),
            export: Some(Export {
                name: export_name.into(),
            }),
        }
    }
}

/// A CloudFormation template under assembly.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Template {
    /// Human-readable stack description.
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Declared resources by logical ID.
    resources: BTreeMap<String, Resource>,
    /// Declared outputs by logical ID.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<String, Output>,
}

impl Template {
    /// Create an empty template with a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Declare a resource under a logical ID.
    ///
    /// Logical IDs are unique within a template; redeclaration is an error.
    pub fn add_resource(
        &mut self,
        logical_id: impl Into<String>,
        resource: Resource,
    ) -> LakeStackResult<()> {
        let logical_id = logical_id.into();
        if self.resources.contains_key(&logical_id) {
            return Err(LakeStackError::DuplicateLogicalId(logical_id));
        }
        self.resources.insert(logical_id, resource);
        Ok(())
    }

    /// Declare an output under a logical ID.
    pub fn add_output(
        &mut self,
        logical_id: impl Into<String>,
        output: Output,
    ) -> LakeStackResult<()> {
        let logical_id = logical_id.into();
        if self.outputs.contains_key(&logical_id) {
            return Err(LakeStackError::DuplicateLogicalId(logical_id));
        }
        self.outputs.insert(logical_id, output);
        Ok(())
    }

    /// Number of declared resources of a given CloudFormation type.
    #[must_use]
    pub fn resource_count_of(&self, resource_type: &str) -> usize {
        self.resources
            .values()
            .filter(|r| r.resource_type() == resource_type)
            .count()
    }

    /// All declared resources by logical ID.
    #[must_use]
    pub fn resources(&self) -> &BTreeMap<String, Resource> {
        &self.resources
    }

    /// All declared outputs by logical ID.
    #[must_use]
    pub fn outputs(&self) -> &BTreeMap<String, Output> {
        &self.outputs
    }

    /// Apply tags to every taggable resource in the template.
    pub fn add_tags(&mut self, tags: &[Tag]) {
        for resource in self.resources.values_mut() {
            if resource.is_taggable() {
                resource.append_tags(tags);
            }
        }
    }

    /// Serialize the template to pretty-printed CloudFormation JSON.
    pub fn to_json_pretty(&self) -> LakeStackResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LakeStackError::Internal(anyhow::anyhow!("template serialization: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bucket_resource() -> Resource {
        Resource::new("AWS::S3::Bucket", json!({ "BucketName": "b" })).unwrap()
    }

    #[test]
    fn test_should_reject_duplicate_logical_ids() {
        let mut template = Template::new("test");
        template.add_resource("Bucket", bucket_resource()).unwrap();
        let err = template.add_resource("Bucket", bucket_resource()).unwrap_err();
        assert!(matches!(err, LakeStackError::DuplicateLogicalId(id) if id == "Bucket"));
    }

    #[test]
    fn test_should_count_resources_by_type() {
        let mut template = Template::new("test");
        template.add_resource("A", bucket_resource()).unwrap();
        template.add_resource("B", bucket_resource()).unwrap();
        assert_eq!(template.resource_count_of("AWS::S3::Bucket"), 2);
        assert_eq!(template.resource_count_of("AWS::KMS::Key"), 0);
    }

    #[test]
    fn test_should_serialize_removal_policy() {
        let resource = bucket_resource().with_removal_policy(RemovalPolicy::Retain);
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["DeletionPolicy"], json!("Retain"));
        assert_eq!(value["UpdateReplacePolicy"], json!("Retain"));

        let resource = bucket_resource().with_removal_policy(RemovalPolicy::Destroy);
        let value = serde_json::to_value(&resource).unwrap();
        assert_eq!(value["DeletionPolicy"], json!("Delete"));
    }

    #[test]
    fn test_should_tag_only_taggable_resources() {
        let mut template = Template::new("test");
        template.add_resource("Bucket", bucket_resource()).unwrap();
        template
            .add_resource(
                "Policy",
                Resource::new("AWS::S3::BucketPolicy", json!({})).unwrap(),
            )
            .unwrap();

        template.add_tags(&[Tag::new("environment", "Dev")]);

        let bucket = &template.resources()["Bucket"];
        assert_eq!(
            bucket.properties()["Tags"],
            json!([{ "Key": "environment", "Value": "Dev" }])
        );
        let policy = &template.resources()["Policy"];
        assert!(policy.properties().get("Tags").is_none());
    }

    #[test]
    fn test_should_not_overwrite_existing_tag_keys() {
        let mut template = Template::new("test");
        template
            .add_resource(
                "Vpc",
                Resource::new(
                    "AWS::EC2::VPC",
                    json!({ "Tags": [{ "Key": "Name", "Value": "DevVpc" }] }),
                )
                .unwrap(),
            )
            .unwrap();

        template.add_tags(&[Tag::new("Name", "clobbered"), Tag::new("environment", "Dev")]);

        let tags = &template.resources()["Vpc"].properties()["Tags"];
        assert_eq!(
            *tags,
            json!([
                { "Key": "Name", "Value": "DevVpc" },
                { "Key": "environment", "Value": "Dev" }
            ])
        );
    }

    #[test]
    fn test_should_serialize_exported_output() {
        let output = Output::exported(&CfnValue::ref_to("Vpc"), "DevDataLakeVpcId");
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(
            value,
            json!({
                "Value": { "Ref": "Vpc" },
                "Export": { "Name": "DevDataLakeVpcId" }
            })
        );
    }

    #[test]
    fn test_should_round_trip_template_json() {
        let mut template = Template::new("LakeStack test template");
        template.add_resource("Bucket", bucket_resource()).unwrap();
        template
            .add_output(
                "BucketName",
                Output::exported(&CfnValue::ref_to("Bucket"), "DevDataLakeCollectBucketName"),
            )
            .unwrap();

        let json = template.to_json_pretty().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["Description"], json!("LakeStack test template"));
        assert!(parsed["Resources"]["Bucket"].is_object());
        assert!(parsed["Outputs"]["BucketName"]["Export"]["Name"].is_string());
    }
}
