//! Account, region, and environment types shared across stacks.

use std::fmt;
use std::str::FromStr;

use crate::error::LakeStackError;

/// AWS Account ID (12-digit string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID from a string.
    ///
    /// # Errors
    /// Returns an error if the account ID is not a 12-digit numeric string.
    pub fn new(id: impl Into<String>) -> Result<Self, LakeStackError> {
        let id = id.into();
        if id.len() != 12 || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(LakeStackError::InvalidAccountId(id));
        }
        Ok(Self(id))
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ARN of the account root principal, used in key and bucket policies.
    #[must_use]
    pub fn root_arn(&self) -> String {
        format!("arn:aws:iam::{}:root", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Zone counts for the regions this deployment supports. Zone IDs are the
/// region name followed by a letter suffix.
const REGION_ZONE_COUNTS: &[(&str, usize)] = &[
    ("us-east-1", 6),
    ("us-east-2", 3),
    ("us-west-1", 2),
    ("us-west-2", 4),
    ("ca-central-1", 3),
    ("eu-west-1", 3),
    ("eu-west-2", 3),
    ("eu-central-1", 3),
    ("ap-southeast-1", 3),
    ("ap-southeast-2", 3),
    ("ap-northeast-1", 3),
    ("sa-east-1", 3),
];

const ZONE_SUFFIXES: &[char] = &['a', 'b', 'c', 'd', 'e', 'f'];

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Availability zone IDs offered by this region.
    ///
    /// Regions outside the supported table report no zones, which surfaces as
    /// the same fatal error as a region with too few zones.
    #[must_use]
    pub fn availability_zones(&self) -> Vec<String> {
        let count = REGION_ZONE_COUNTS
            .iter()
            .find(|(name, _)| *name == self.0)
            .map_or(0, |(_, count)| *count);

        ZONE_SUFFIXES
            .iter()
            .take(count)
            .map(|suffix| format!("{}{suffix}", self.0))
            .collect()
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A deployable target environment.
///
/// The set is closed: environment names are case-sensitive and anything
/// outside it fails to parse. Test and Prod are the long-lived environments
/// that retain resources on stack deletion.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum TargetEnvironment {
    /// Short-lived development environment.
    Dev,
    /// Long-lived test environment.
    Test,
    /// Long-lived production environment.
    Prod,
}

impl TargetEnvironment {
    /// All deployable environments.
    pub const ALL: [Self; 3] = [Self::Dev, Self::Test, Self::Prod];

    /// Returns the string value of this environment.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dev => "Dev",
            Self::Test => "Test",
            Self::Prod => "Prod",
        }
    }

    /// Lowercase form used in physical resource names.
    #[must_use]
    pub fn as_lowercase(self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Test => "test",
            Self::Prod => "prod",
        }
    }

    /// Whether resources in this environment outlive their stack declaration.
    #[must_use]
    pub fn is_long_lived(self) -> bool {
        matches!(self, Self::Test | Self::Prod)
    }
}

impl fmt::Display for TargetEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetEnvironment {
    type Err = LakeStackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dev" => Ok(Self::Dev),
            "Test" => Ok(Self::Test),
            "Prod" => Ok(Self::Prod),
            other => Err(LakeStackError::UnknownEnvironment(other.to_owned())),
        }
    }
}

/// Explicit deployment target passed to stacks.
///
/// Account and region are deliberately optional here: the network stack must
/// be able to detect an unset pair and fail before declaring anything, since
/// the zone count cannot be determined without them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AwsEnvironment {
    /// Target account, if known.
    pub account: Option<AccountId>,
    /// Target region, if known.
    pub region: Option<AwsRegion>,
}

impl AwsEnvironment {
    /// Create an environment with both account and region set.
    #[must_use]
    pub fn new(account: AccountId, region: AwsRegion) -> Self {
        Self {
            account: Some(account),
            region: Some(region),
        }
    }

    /// Borrow the account and region, or fail if either is unset.
    pub fn require(&self) -> Result<(&AccountId, &AwsRegion), LakeStackError> {
        match (&self.account, &self.region) {
            (Some(account), Some(region)) => Ok((account, region)),
            _ => Err(LakeStackError::AvailabilityZones(
                "deployment target does not specify an explicit account and region, \
                 so the zone count cannot be determined; downstream stacks expect \
                 exactly 3 availability zones"
                    .to_owned(),
            )),
        }
    }
}
