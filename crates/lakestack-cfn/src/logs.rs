//! Property structs for `AWS::Logs::LogGroup`.

use serde::Serialize;

/// Properties for `AWS::Logs::LogGroup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogGroupProperties {
    /// Days to retain log events.
    pub retention_in_days: u32,
}
