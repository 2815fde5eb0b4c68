//! CloudFormation intrinsic function values.

use serde::{Deserialize, Serialize};

/// A template value: a literal string or one of the intrinsic functions
/// LakeStack templates use (`Ref`, `Fn::GetAtt`, `Fn::ImportValue`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CfnValue {
    /// A literal string value.
    Literal(String),
    /// `{"Ref": "LogicalId"}`.
    Ref {
        /// Logical ID of the referenced resource.
        #[serde(rename = "Ref")]
        logical_id: String,
    },
    /// `{"Fn::GetAtt": ["LogicalId", "Attribute"]}`.
    GetAtt {
        /// Logical ID and attribute name.
        #[serde(rename = "Fn::GetAtt")]
        parts: [String; 2],
    },
    /// `{"Fn::ImportValue": "ExportName"}`.
    ImportValue {
        /// Export name published by another stack.
        #[serde(rename = "Fn::ImportValue")]
        export_name: String,
    },
}

impl CfnValue {
    /// A literal string value.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// A `Ref` to another resource in the same template.
    #[must_use]
    pub fn ref_to(logical_id: impl Into<String>) -> Self {
        Self::Ref {
            logical_id: logical_id.into(),
        }
    }

    /// A `Fn::GetAtt` on another resource in the same template.
    #[must_use]
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            parts: [logical_id.into(), attribute.into()],
        }
    }

    /// A `Fn::ImportValue` of an export published by another stack.
    #[must_use]
    pub fn import(export_name: impl Into<String>) -> Self {
        Self::ImportValue {
            export_name: export_name.into(),
        }
    }

    /// Serialize into a raw JSON value (for the export registry).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl From<&str> for CfnValue {
    fn from(value: &str) -> Self {
        Self::literal(value)
    }
}

impl From<String> for CfnValue {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}
