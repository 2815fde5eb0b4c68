//! CloudFormation template model.
//!
//! Stacks assemble a [`Template`] in memory from typed resource property
//! structs and serialize it to a CloudFormation JSON document. Property
//! structs cover exactly the resource types LakeStack declares; field names
//! serialize to the PascalCase keys CloudFormation expects.

mod intrinsic;
mod template;

pub mod ec2;
pub mod iam;
pub mod kms;
pub mod logs;
pub mod s3;

pub use intrinsic::CfnValue;
pub use template::{Export, Output, Resource, Tag, Template};
