//! Stack declarations for the data lake's foundational infrastructure.
//!
//! [`DeployStage`] is the composition root: it resolves configuration once
//! for a target environment, constructs the network stack (when a VPC CIDR
//! is configured) and the storage stack, and applies the tagging policy to
//! both.

mod cidr;
mod network;
mod stage;
mod storage;
mod tagging;

pub use cidr::CidrBlock;
pub use network::NetworkStack;
pub use stage::{DeployStage, SynthesizedTemplate};
pub use storage::StorageStack;
pub use tagging::apply_standard_tags;
