//! Uniform tagging policy applied to every stack in a deploy stage.

use lakestack_cfn::{Tag, Template};
use lakestack_core::TargetEnvironment;

/// Apply the standard data lake tags to every taggable resource.
///
/// Resource-specific tags set during declaration (such as the VPC `Name`
/// tag) take precedence over these.
pub fn apply_standard_tags(
    template: &mut Template,
    environment: TargetEnvironment,
    application: &str,
) {
    template.add_tags(&[
        Tag::new("environment", environment.as_str()),
        Tag::new("application", application),
    ]);
}
