//! Property structs for `AWS::KMS::Key` and `AWS::KMS::Alias`.

use serde::Serialize;

use crate::iam::PolicyDocument;
use crate::intrinsic::CfnValue;

/// Properties for `AWS::KMS::Key`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyProperties {
    /// Human-readable key description.
    pub description: String,
    /// Annual automatic key rotation.
    pub enable_key_rotation: bool,
    /// Waiting period before a scheduled deletion completes.
    pub pending_window_in_days: u32,
    /// The key resource policy.
    pub key_policy: PolicyDocument,
}

/// Properties for `AWS::KMS::Alias`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AliasProperties {
    /// Alias name; must start with `alias/`.
    pub alias_name: String,
    /// The key the alias points at.
    pub target_key_id: CfnValue,
}

impl AliasProperties {
    /// Create an alias for a key, prepending the required `alias/` prefix.
    #[must_use]
    pub fn new(name: &str, target_key_id: CfnValue) -> Self {
        Self {
            alias_name: format!("alias/{name}"),
            target_key_id,
        }
    }
}
